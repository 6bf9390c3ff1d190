use super::browse::warm_genres;
use super::progress::Spinner;
use super::render::print_movies;
use crate::context::{catalog_failure, AppContext};
use crate::output::Output;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use moviedex_catalog::MovieCatalog;
use moviedex_core::Session;
use serde_json::json;

#[derive(clap::Subcommand)]
pub enum FavoritesCommands {
    /// List favorites of the signed-in user (or the anonymous list)
    List {
        /// Resolve genre names (needs TMDb credentials)
        #[arg(long)]
        genres: bool,
    },
    /// Add a movie by TMDb id
    Add { id: u64 },
    /// Remove a movie by TMDb id
    Remove { id: u64 },
}

impl FavoritesCommands {
    /// Plain listing and removal only touch the preference store.
    pub fn needs_catalog(&self) -> bool {
        matches!(self, FavoritesCommands::Add { .. } | FavoritesCommands::List { genres: true })
    }
}

/// Favorites commands that work without config or credentials
pub fn run_local(cmd: FavoritesCommands, session: &mut Session, output: &Output) -> Result<()> {
    match cmd {
        FavoritesCommands::List { genres: false } => {
            list_favorites(session, output);
            Ok(())
        }
        FavoritesCommands::Remove { id } => remove_favorite(id, session, output),
        FavoritesCommands::Add { .. } | FavoritesCommands::List { genres: true } => {
            Err(eyre!("This favorites command needs the movie catalog"))
        }
    }
}

pub async fn run_favorites(cmd: FavoritesCommands, ctx: &mut AppContext, output: &Output) -> Result<()> {
    match cmd {
        FavoritesCommands::Add { id } => add_favorite(id, ctx, output).await,
        FavoritesCommands::List { genres: true } => {
            let catalog = ctx.catalog()?;
            warm_genres(ctx, &catalog, output).await;
            list_favorites(&ctx.session, output);
            Ok(())
        }
        cmd => run_local(cmd, &mut ctx.session, output),
    }
}

fn list_favorites(session: &Session, output: &Output) {
    let favorites = session.favorites();
    let owner = session
        .user()
        .map_or_else(|| "anonymous".to_string(), |u| u.display_name.clone());
    let movies: Vec<_> = favorites.favorites().iter().collect();
    let title = format!("Favorites of {} ({})", owner, movies.len());
    print_movies(&title, &movies, favorites, session.genres(), output);

    if movies.is_empty() && output.is_human() {
        output.println(output.muted("Add one with 'moviedex favorites add <id>'"));
    }
}

async fn add_favorite(id: u64, ctx: &mut AppContext, output: &Output) -> Result<()> {
    if ctx.session.favorites().is_favorite(id) {
        output.info(format!("Movie {} is already a favorite", id));
        return Ok(());
    }

    // Favorites keep the movie as it looked when it was added.
    let catalog = ctx.catalog()?;
    let spinner = Spinner::start(format!("Looking up movie {}...", id), output);
    let details = catalog.details(id).await.map_err(catalog_failure)?;
    spinner.finish();

    let title = details.movie.title.clone();
    ctx.session.favorites_mut().add_favorite(details.movie);

    if output.is_human() {
        output.success(format!("Added {} to favorites", output.accent(&title)));
    } else {
        output.json(&json!({ "added": id, "title": title, "count": ctx.session.favorites().len() }));
    }
    Ok(())
}

fn remove_favorite(id: u64, session: &mut Session, output: &Output) -> Result<()> {
    let title = session
        .favorites()
        .favorites()
        .iter()
        .find(|m| m.id == id)
        .map(|m| m.title.clone());

    if !session.favorites_mut().remove_favorite(id) {
        output.warn(format!("Movie {} is not in your favorites", id));
        return Ok(());
    }

    if output.is_human() {
        output.success(format!("Removed {} from favorites", title.unwrap_or_else(|| id.to_string())));
    } else {
        output.json(&json!({ "removed": id, "count": session.favorites().len() }));
    }
    Ok(())
}
