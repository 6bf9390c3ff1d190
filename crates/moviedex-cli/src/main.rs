use clap::{ArgAction, Parser, Subcommand};
use color_eyre::eyre::eyre;
use commands::auth::LoginArgs;
use commands::browse::FilterArgs;
use commands::config::ConfigCommands;
use commands::favorites::FavoritesCommands;
use commands::theme::ThemeCommands;
use commands::{auth, browse, clear, config, details, favorites, recent, theme};
use context::AppContext;
use moviedex_config::{Config, PathManager};
use moviedex_core::{system_preference, FeedSource, PreferenceStore, Session, SessionOptions};
use moviedex_models::{MovieList, TimeWindow};
use std::path::PathBuf;
use std::sync::Arc;

mod commands;
mod context;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "moviedex")]
#[command(about = "MovieDex - discover movies and keep your favorites")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    /// Also write logs to a daily-rotated file (default: the data directory's logs/moviedex.log)
    #[arg(long, global = true, value_name = "PATH", num_args = 0..=1, default_missing_value = "")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Search movies by title
    Search {
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,

        /// Number of result pages to load
        #[arg(long, default_value_t = 1)]
        pages: u32,

        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Title suggestions for partial input, as a search box would show them
    Suggest { query: String },
    /// Trending movies
    Trending {
        /// Trending window: day or week
        #[arg(long, default_value = "day", value_parser = parse_window)]
        window: TimeWindow,

        #[arg(long, default_value_t = 1)]
        pages: u32,

        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Curated lists: popular, top-rated, upcoming
    List {
        #[arg(value_parser = parse_list)]
        kind: MovieList,

        #[arg(long, default_value_t = 1)]
        pages: u32,

        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Movies in a genre, most popular first
    Genre {
        /// Genre name or id
        genre: String,

        #[arg(long, default_value_t = 1)]
        pages: u32,
    },
    /// List all genres
    Genres,
    /// Full details for one movie
    Details { id: u64 },
    /// Recommendations based on a movie
    Recommend {
        id: u64,

        #[arg(long, default_value_t = 1)]
        pages: u32,
    },
    /// Manage favorites
    Favorites {
        #[command(subcommand)]
        cmd: Option<FavoritesCommands>,
    },
    /// Sign in (local only, nothing is verified)
    Login(LoginArgs),
    /// Sign out; favorites stay stored for the next sign-in
    Logout,
    /// Show who is signed in
    Whoami,
    /// Show or change the color theme
    Theme {
        #[command(subcommand)]
        cmd: Option<ThemeCommands>,
    },
    /// Recent searches
    Recent {
        /// Forget the search history
        #[arg(long)]
        clear: bool,
    },
    /// Manage configuration and the TMDb key
    Config {
        #[command(subcommand)]
        cmd: ConfigCommands,
    },
    /// Delete stored preferences and/or credentials
    Clear {
        /// Clear preferences and credentials
        #[arg(long)]
        all: bool,

        /// Clear favorites, history, theme and sign-in state
        #[arg(long)]
        preferences: bool,

        /// Clear the stored TMDb key
        #[arg(long)]
        credentials: bool,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

fn parse_window(s: &str) -> Result<TimeWindow, String> {
    match s.trim().to_lowercase().as_str() {
        "day" => Ok(TimeWindow::Day),
        "week" => Ok(TimeWindow::Week),
        other => Err(format!("Invalid window: {}. Use 'day' or 'week'", other)),
    }
}

fn parse_list(s: &str) -> Result<MovieList, String> {
    match s.trim().to_lowercase().replace('_', "-").as_str() {
        "popular" => Ok(MovieList::Popular),
        "top-rated" => Ok(MovieList::TopRated),
        "upcoming" => Ok(MovieList::Upcoming),
        other => Err(format!("Invalid list: {}. Use 'popular', 'top-rated' or 'upcoming'", other)),
    }
}

impl Commands {
    /// Whether the command reaches TMDb, and so needs a valid config and credentials
    fn needs_catalog(&self) -> bool {
        match self {
            Commands::Search { .. }
            | Commands::Suggest { .. }
            | Commands::Trending { .. }
            | Commands::List { .. }
            | Commands::Genre { .. }
            | Commands::Genres
            | Commands::Details { .. }
            | Commands::Recommend { .. } => true,
            Commands::Favorites { cmd } => cmd.as_ref().map_or(false, FavoritesCommands::needs_catalog),
            Commands::Login(_)
            | Commands::Logout
            | Commands::Whoami
            | Commands::Theme { .. }
            | Commands::Recent { .. }
            | Commands::Config { .. }
            | Commands::Clear { .. } => false,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Commands::Search { .. } => "search",
            Commands::Suggest { .. } => "suggest",
            Commands::Trending { .. } => "trending",
            Commands::List { .. } => "list",
            Commands::Genre { .. } => "genre",
            Commands::Genres => "genres",
            Commands::Details { .. } => "details",
            Commands::Recommend { .. } => "recommend",
            Commands::Favorites { .. } => "favorites",
            Commands::Login(_) => "login",
            Commands::Logout => "logout",
            Commands::Whoami => "whoami",
            Commands::Theme { .. } => "theme",
            Commands::Recent { .. } => "recent",
            Commands::Config { .. } => "config",
            Commands::Clear { .. } => "clear",
        }
    }
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let paths = PathManager::default();

    let log_file = cli
        .log_file
        .map(|p| if p.as_os_str().is_empty() { paths.log_file() } else { p });
    logging::init_logging(cli.verbose, cli.quiet, log_file).map_err(|e| eyre!("{}", e))?;

    // A broken config file must not block commands that only touch local state.
    let config = Config::load_or_default(&paths.config_file()).and_then(|c| c.validate().map(|_| c));
    let options = config
        .as_ref()
        .map(SessionOptions::from_config)
        .unwrap_or_default()
        .with_system_theme(system_preference());
    let store = Arc::new(PreferenceStore::new(paths.preferences_dir()));
    let mut session = Session::open(store, options);

    let mut output = output::Output::new(cli.output, cli.quiet, session.theme().mode());

    match cli.command {
        command if command.needs_catalog() => {
            let config = config.map_err(|e| {
                eyre!("Invalid configuration in {}: {}", paths.config_file().display(), e)
            })?;
            let mut ctx = AppContext { paths, config, session };
            run_catalog_command(command, &mut ctx, &output).await
        }
        Commands::Config { cmd } => config::run_config(cmd, &paths, &output),
        Commands::Clear { all, preferences, credentials, yes } => {
            clear::run_clear(all, preferences, credentials, yes, &paths, &session, &output)
        }
        Commands::Login(args) => {
            let config = config.unwrap_or_default();
            auth::run_login(args, &config, &mut session, &output).await
        }
        Commands::Logout => auth::run_logout(&mut session, &output),
        Commands::Whoami => auth::run_whoami(&session, &output),
        Commands::Theme { cmd } => {
            theme::run_theme(cmd.unwrap_or(ThemeCommands::Show), &mut session, &mut output)
        }
        Commands::Recent { clear } => recent::run_recent(clear, &mut session, &output),
        Commands::Favorites { cmd } => {
            let cmd = cmd.unwrap_or(FavoritesCommands::List { genres: false });
            favorites::run_local(cmd, &mut session, &output)
        }
        command => Err(eyre!("'{}' needs the movie catalog", command.name())),
    }
}

/// Commands that talk to TMDb and therefore need a valid config and credentials
async fn run_catalog_command(command: Commands, ctx: &mut AppContext, output: &output::Output) -> color_eyre::Result<()> {
    match command {
        Commands::Search { query, pages, filter } => {
            browse::run_search(&query.join(" "), pages, &filter, ctx, output).await
        }
        Commands::Suggest { query } => browse::run_suggest(&query, ctx, output).await,
        Commands::Trending { window, pages, filter } => {
            browse::run_feed(FeedSource::Trending(window), pages, &filter, ctx, output).await
        }
        Commands::List { kind, pages, filter } => {
            browse::run_feed(FeedSource::List(kind), pages, &filter, ctx, output).await
        }
        Commands::Genre { genre, pages } => {
            browse::run_genre(&genre, pages, &FilterArgs::default(), ctx, output).await
        }
        Commands::Genres => browse::run_genres(ctx, output).await,
        Commands::Details { id } => details::run_details(id, ctx, output).await,
        Commands::Recommend { id, pages } => {
            browse::run_feed(FeedSource::Recommendations(id), pages, &FilterArgs::default(), ctx, output).await
        }
        Commands::Favorites { cmd } => {
            let cmd = cmd.unwrap_or(FavoritesCommands::List { genres: false });
            favorites::run_favorites(cmd, ctx, output).await
        }
        command => Err(eyre!("'{}' does not use the movie catalog", command.name())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_search_with_filters() {
        let cli = Cli::parse_from([
            "moviedex", "search", "blade", "runner", "--year-from", "1980", "--genre", "878", "--pages", "2",
        ]);
        match cli.command {
            Commands::Search { query, pages, filter } => {
                assert_eq!(query.join(" "), "blade runner");
                assert_eq!(pages, 2);
                assert_eq!(filter.year_from, Some(1980));
                assert_eq!(filter.genres, vec!["878"]);
            }
            _ => panic!("expected search"),
        }
    }

    #[test]
    fn test_list_and_window_parsers() {
        assert_eq!(parse_list("top_rated"), Ok(MovieList::TopRated));
        assert_eq!(parse_list("Top-Rated"), Ok(MovieList::TopRated));
        assert!(parse_list("worst").is_err());
        assert_eq!(parse_window("WEEK"), Ok(TimeWindow::Week));
    }

    fn route(args: &[&str]) -> bool {
        Cli::parse_from(args).command.needs_catalog()
    }

    #[test]
    fn test_local_favorites_commands_skip_catalog() {
        assert!(!route(&["moviedex", "favorites"]));
        assert!(!route(&["moviedex", "favorites", "list"]));
        assert!(!route(&["moviedex", "favorites", "remove", "949"]));
        assert!(route(&["moviedex", "favorites", "list", "--genres"]));
        assert!(route(&["moviedex", "favorites", "add", "949"]));
    }

    #[test]
    fn test_command_routing() {
        assert!(route(&["moviedex", "search", "heat"]));
        assert!(route(&["moviedex", "genres"]));
        assert!(!route(&["moviedex", "theme", "toggle"]));
        assert!(!route(&["moviedex", "recent"]));
        assert!(!route(&["moviedex", "logout"]));
    }

    #[test]
    fn test_external_login_conflicts_with_username() {
        assert!(Cli::try_parse_from(["moviedex", "login", "alice", "--external"]).is_err());
        assert!(Cli::try_parse_from(["moviedex", "login", "--external", "--name", "Alice"]).is_ok());
    }
}
