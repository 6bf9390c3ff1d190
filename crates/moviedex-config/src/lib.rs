pub mod config;
pub mod credentials;
pub mod paths;

pub use config::{AuthConfig, Config, SearchConfig, ThemeConfig, TmdbConfig};
pub use credentials::{ApiCredentials, CredentialStore, MissingCredentials, ACCESS_TOKEN_ENV, API_KEY_ENV};
pub use paths::{base_path_override, PathManager};
