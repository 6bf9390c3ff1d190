use super::prompts;
use super::render::styled_table;
use crate::output::Output;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use comfy_table::{Attribute, Cell, Color};
use moviedex_config::{ApiCredentials, Config, CredentialStore, PathManager};
use serde_json::json;

#[derive(clap::Subcommand)]
pub enum ConfigCommands {
    /// Show the effective configuration (secrets masked)
    Show,
    /// Write a config file with every default spelled out
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Store a TMDb API key (or access token) in the credentials file
    SetKey {
        /// The key; prompted without echo when omitted
        value: Option<String>,

        /// Store the value as a v4 read access token instead of a v3 API key
        #[arg(long)]
        token: bool,
    },
}

pub fn run_config(cmd: ConfigCommands, paths: &PathManager, output: &Output) -> Result<()> {
    match cmd {
        ConfigCommands::Show => show_config(paths, output),
        ConfigCommands::Init { force } => init_config(force, paths, output),
        ConfigCommands::SetKey { value, token } => set_key(value, token, paths, output),
    }
}

fn load_config(paths: &PathManager) -> Result<Config> {
    let config_file = paths.config_file();
    let config = Config::load_or_default(&config_file)
        .map_err(|e| eyre!("Failed to load config from {}: {}", config_file.display(), e))?;
    config
        .validate()
        .map_err(|e| eyre!("Invalid configuration in {}: {}", config_file.display(), e))?;
    Ok(config)
}

fn load_credentials(paths: &PathManager) -> Result<CredentialStore> {
    let credentials_file = paths.credentials_file();
    let mut cred_store = CredentialStore::new(credentials_file.clone());
    cred_store
        .load()
        .map_err(|e| eyre!("Failed to load credentials from {}: {}", credentials_file.display(), e))?;
    Ok(cred_store)
}

fn section_table(title: &str, rows: Vec<(&str, String)>) -> comfy_table::Table {
    let mut table = styled_table();
    table.set_header(vec![Cell::new(title).fg(Color::Cyan).add_attribute(Attribute::Bold)]);
    for (key, value) in rows {
        table.add_row(vec![Cell::new(key), Cell::new(value)]);
    }
    table
}

fn show_config(paths: &PathManager, output: &Output) -> Result<()> {
    let config_file = paths.config_file();
    let config = load_config(paths)?;
    let credentials = ApiCredentials::from_env(&load_credentials(paths)?).ok();

    if !output.is_human() {
        output.json(&json!({
            "config_file": config_file.display().to_string(),
            "config_file_exists": config_file.exists(),
            "preferences_dir": paths.preferences_dir().display().to_string(),
            "tmdb": {
                "base_url": config.tmdb.base_url,
                "image_base_url": config.tmdb.image_base_url,
                "language": config.tmdb.language,
                "request_timeout_secs": config.tmdb.request_timeout_secs,
                "credentials": credentials.as_ref().map(|c| json!({ "kind": c.kind(), "value": c.masked() })),
            },
            "search": {
                "debounce_ms": config.search.debounce_ms,
                "min_suggestion_chars": config.search.min_suggestion_chars,
                "suggestion_limit": config.search.suggestion_limit,
                "recent_limit": config.search.recent_limit,
                "max_pages": config.search.max_pages,
            },
            "auth": { "min_password_length": config.auth.min_password_length },
            "theme": { "default_mode": config.theme.default_mode.as_str() },
        }));
        return Ok(());
    }

    let location = if config_file.exists() {
        config_file.display().to_string()
    } else {
        format!("{} (not created, using defaults)", config_file.display())
    };
    let files = section_table(
        "Files",
        vec![
            ("Config", location),
            ("Credentials", paths.credentials_file().display().to_string()),
            ("Preferences", paths.preferences_dir().display().to_string()),
        ],
    );
    output.println(files.to_string());

    let credential_label = match &credentials {
        Some(c) => format!("{} {}", c.kind(), c.masked()),
        None => "<not set>".to_string(),
    };
    let tmdb = section_table(
        "TMDb",
        vec![
            ("Base URL", config.tmdb.base_url.clone()),
            ("Image URL", config.tmdb.image_base_url.clone()),
            ("Language", config.tmdb.language.clone().unwrap_or_else(|| "default".to_string())),
            ("Timeout", format!("{} seconds", config.tmdb.request_timeout_secs)),
            ("Credentials", credential_label),
        ],
    );
    output.println(tmdb.to_string());

    let search = section_table(
        "Search",
        vec![
            ("Debounce", format!("{} ms", config.search.debounce_ms)),
            ("Suggestions after", format!("{} characters", config.search.min_suggestion_chars)),
            ("Suggestion limit", config.search.suggestion_limit.to_string()),
            ("Recent searches kept", config.search.recent_limit.to_string()),
            ("Max pages", config.search.max_pages.to_string()),
        ],
    );
    output.println(search.to_string());

    let other = section_table(
        "Session",
        vec![
            ("Min password length", config.auth.min_password_length.to_string()),
            ("Default theme", config.theme.default_mode.to_string()),
        ],
    );
    output.println(other.to_string());
    Ok(())
}

fn init_config(force: bool, paths: &PathManager, output: &Output) -> Result<()> {
    let config_file = paths.config_file();
    if config_file.exists() && !force {
        output.warn(format!("Configuration already exists at {}", config_file.display()));
        output.info("Use --force to overwrite it with defaults");
        return Ok(());
    }

    paths
        .ensure_directories()
        .map_err(|e| eyre!("Failed to create configuration directories: {}", e))?;
    Config::default()
        .save_to_file(&config_file)
        .map_err(|e| eyre!("Failed to save config to {}: {}", config_file.display(), e))?;

    output.success(format!("Wrote default configuration to {}", config_file.display()));
    Ok(())
}

fn set_key(value: Option<String>, token: bool, paths: &PathManager, output: &Output) -> Result<()> {
    let label = if token { "TMDb read access token" } else { "TMDb API key" };
    let value = match value {
        Some(value) => value,
        None => prompts::prompt_password(label)?,
    };
    let value = value.trim().to_string();
    if value.is_empty() {
        return Err(eyre!("{} cannot be empty", label));
    }

    let mut cred_store = load_credentials(paths)?;
    if token {
        cred_store.set_tmdb_access_token(value);
    } else {
        cred_store.set_tmdb_api_key(value);
    }
    cred_store
        .save()
        .map_err(|e| eyre!("Failed to save credentials to {}: {}", paths.credentials_file().display(), e))?;

    output.success(format!("{} saved to {}", label, paths.credentials_file().display()));
    if std::env::var_os(moviedex_config::ACCESS_TOKEN_ENV).is_some()
        || std::env::var_os(moviedex_config::API_KEY_ENV).is_some()
    {
        output.warn("A TMDB_* environment variable is set and takes precedence over the stored value");
    }
    Ok(())
}
