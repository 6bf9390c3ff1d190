use moviedex_models::ThemeMode;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub tmdb: TmdbConfig,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub theme: ThemeConfig,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TmdbConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_image_base_url")]
    pub image_base_url: String,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SearchConfig {
    /// Quiet period before a suggestion request is issued
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    #[serde(default = "default_min_suggestion_chars")]
    pub min_suggestion_chars: usize,
    #[serde(default = "default_suggestion_limit")]
    pub suggestion_limit: usize,
    #[serde(default = "default_recent_limit")]
    pub recent_limit: usize,
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AuthConfig {
    #[serde(default = "default_min_password_length")]
    pub min_password_length: usize,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct ThemeConfig {
    #[serde(default)]
    pub default_mode: ThemeMode,
}

fn default_base_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_image_base_url() -> String {
    "https://image.tmdb.org/t/p".to_string()
}

fn default_request_timeout_secs() -> u64 {
    15
}

fn default_debounce_ms() -> u64 {
    300
}

fn default_min_suggestion_chars() -> usize {
    2
}

fn default_suggestion_limit() -> usize {
    5
}

fn default_recent_limit() -> usize {
    5
}

fn default_max_pages() -> u32 {
    moviedex_models::MAX_PAGES
}

fn default_min_password_length() -> usize {
    6
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            image_base_url: default_image_base_url(),
            language: None,
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl TmdbConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            min_suggestion_chars: default_min_suggestion_chars(),
            suggestion_limit: default_suggestion_limit(),
            recent_limit: default_recent_limit(),
            max_pages: default_max_pages(),
        }
    }
}

impl SearchConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            min_password_length: default_min_password_length(),
        }
    }
}

impl Config {
    pub fn load_from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load the file if it exists, otherwise fall back to defaults
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save_to_file(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        for (name, url) in [("tmdb.base_url", &self.tmdb.base_url), ("tmdb.image_base_url", &self.tmdb.image_base_url)] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(anyhow::anyhow!("{} must be an http(s) URL, got {:?}", name, url));
            }
        }

        if self.tmdb.request_timeout_secs == 0 {
            return Err(anyhow::anyhow!("tmdb.request_timeout_secs must be positive"));
        }

        if self.search.debounce_ms == 0 {
            return Err(anyhow::anyhow!("search.debounce_ms must be positive"));
        }

        if self.search.suggestion_limit == 0 || self.search.recent_limit == 0 {
            return Err(anyhow::anyhow!("search limits must be positive"));
        }

        if self.search.max_pages == 0 || self.search.max_pages > moviedex_models::MAX_PAGES {
            return Err(anyhow::anyhow!(
                "search.max_pages must be between 1 and {}",
                moviedex_models::MAX_PAGES
            ));
        }

        if self.auth.min_password_length == 0 {
            return Err(anyhow::anyhow!("auth.min_password_length must be positive"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_config_load_and_save() {
        let file = NamedTempFile::new().unwrap();
        let mut config = Config::default();
        config.search.debounce_ms = 450;
        config.theme.default_mode = ThemeMode::Light;
        config.tmdb.language = Some("de-DE".to_string());

        let path = file.path().to_path_buf();
        config.save_to_file(&path).unwrap();

        let loaded = Config::load_from_file(&path).unwrap();
        assert_eq!(loaded.search.debounce_ms, 450);
        assert_eq!(loaded.theme.default_mode, ThemeMode::Light);
        assert_eq!(loaded.tmdb.language.as_deref(), Some("de-DE"));
        assert_eq!(loaded.auth.min_password_length, 6);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = toml::from_str("[search]\nsuggestion_limit = 3\n").unwrap();
        assert_eq!(config.search.suggestion_limit, 3);
        assert_eq!(config.search.debounce_ms, 300);
        assert_eq!(config.search.max_pages, 500);
        assert_eq!(config.tmdb.base_url, "https://api.themoviedb.org/3");
        assert_eq!(config.theme.default_mode, ThemeMode::Dark);
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_or_default(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config.search.recent_limit, 5);
    }

    #[test]
    fn test_config_validate() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.search.debounce_ms = 0;
        assert!(config.validate().is_err());
        config.search.debounce_ms = 300;

        config.search.max_pages = 501;
        assert!(config.validate().is_err());
        config.search.max_pages = 20;

        config.tmdb.base_url = "ftp://example.org".to_string();
        assert!(config.validate().is_err());
    }
}
