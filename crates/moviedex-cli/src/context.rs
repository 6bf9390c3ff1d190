use color_eyre::eyre::eyre;
use color_eyre::{Result, Section};
use moviedex_catalog::{CatalogError, ErrorKind, TmdbClient};
use moviedex_config::{ApiCredentials, Config, CredentialStore, PathManager};
use moviedex_core::Session;

/// Everything a catalog-backed command needs.
pub struct AppContext {
    pub paths: PathManager,
    pub config: Config,
    pub session: Session,
}

impl AppContext {
    /// Credentials are read here rather than at startup so local-only commands work without them.
    pub fn catalog(&self) -> Result<TmdbClient> {
        let credentials_file = self.paths.credentials_file();
        let mut cred_store = CredentialStore::new(credentials_file.clone());
        cred_store.load().map_err(|e| {
            eyre!("Failed to load credentials from {}: {}", credentials_file.display(), e)
        })?;

        let credentials = ApiCredentials::from_env(&cred_store)
            .map_err(|e| eyre!("No TMDb credentials: {}", e))
            .suggestion("Run 'moviedex config set-key' to store an API key")?;
        tracing::debug!("Using TMDb {}", credentials.kind());

        TmdbClient::new(&self.config.tmdb, credentials).map_err(catalog_failure)
    }
}

/// Turn a catalog error into a report with a hint about what to try next.
pub fn catalog_failure(error: CatalogError) -> color_eyre::Report {
    tracing::warn!("Catalog request failed: {}", error);
    let hint = match error.kind() {
        ErrorKind::Unauthorized => "Check the key with 'moviedex config show' or store a new one with 'moviedex config set-key'",
        ErrorKind::RateLimited => "Wait a few seconds and run the command again",
        ErrorKind::Transport => "Check your network connection and try again",
        ErrorKind::NotFound => "Double-check the movie id",
        ErrorKind::Upstream | ErrorKind::Decode => "TMDb may be having trouble; try again later",
    };
    eyre!("{}", error.user_message()).suggestion(hint)
}
