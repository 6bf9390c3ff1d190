use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

pub const ACCESS_TOKEN_ENV: &str = "TMDB_ACCESS_TOKEN";
pub const API_KEY_ENV: &str = "TMDB_API_KEY";

#[derive(Debug, Serialize, Deserialize, Default)]
struct CredentialsData {
    #[serde(flatten)]
    data: HashMap<String, String>,
}

pub struct CredentialStore {
    path: PathBuf,
    credentials: HashMap<String, String>,
}

impl CredentialStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            credentials: HashMap::new(),
        }
    }

    pub fn load(&mut self) -> Result<()> {
        if self.path.exists() {
            let content = std::fs::read_to_string(&self.path)?;
            let creds_data: CredentialsData = toml::from_str(&content)?;
            self.credentials = creds_data.data;
        }
        Ok(())
    }

    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let creds_data = CredentialsData {
            data: self.credentials.clone(),
        };
        let content = toml::to_string_pretty(&creds_data)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&String> {
        self.credentials.get(key)
    }

    pub fn set(&mut self, key: String, value: String) {
        self.credentials.insert(key, value);
    }

    pub fn remove(&mut self, key: &str) {
        self.credentials.remove(key);
    }

    pub fn get_tmdb_api_key(&self) -> Option<&String> {
        self.get("tmdb_api_key")
    }

    pub fn set_tmdb_api_key(&mut self, key: String) {
        self.set("tmdb_api_key".to_string(), key);
    }

    pub fn get_tmdb_access_token(&self) -> Option<&String> {
        self.get("tmdb_access_token")
    }

    pub fn set_tmdb_access_token(&mut self, token: String) {
        self.set("tmdb_access_token".to_string(), token);
    }

    pub fn clear(&mut self) {
        self.credentials.clear();
    }
}

#[derive(Debug, thiserror::Error)]
#[error("no TMDb credentials: set TMDB_ACCESS_TOKEN or TMDB_API_KEY, or run `moviedex config set-key`")]
pub struct MissingCredentials;

/// Static credential for the catalog API, read once at startup.
#[derive(Clone, PartialEq, Eq)]
pub enum ApiCredentials {
    /// v4 read access token, sent as a bearer header
    AccessToken(String),
    /// v3 key, sent as the `api_key` query parameter
    ApiKey(String),
}

impl ApiCredentials {
    pub fn from_env(store: &CredentialStore) -> Result<Self, MissingCredentials> {
        Self::resolve(|name| std::env::var(name).ok(), store)
    }

    /// Environment wins over the stored file, and an access token wins over an API key.
    pub fn resolve<F>(env: F, store: &CredentialStore) -> Result<Self, MissingCredentials>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |v: Option<String>| v.filter(|s| !s.trim().is_empty());

        if let Some(token) = non_empty(env(ACCESS_TOKEN_ENV)) {
            return Ok(ApiCredentials::AccessToken(token));
        }
        if let Some(key) = non_empty(env(API_KEY_ENV)) {
            return Ok(ApiCredentials::ApiKey(key));
        }
        if let Some(token) = non_empty(store.get_tmdb_access_token().cloned()) {
            return Ok(ApiCredentials::AccessToken(token));
        }
        if let Some(key) = non_empty(store.get_tmdb_api_key().cloned()) {
            return Ok(ApiCredentials::ApiKey(key));
        }
        Err(MissingCredentials)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ApiCredentials::AccessToken(_) => "access token",
            ApiCredentials::ApiKey(_) => "api key",
        }
    }

    /// The secret with everything but the last four characters masked
    pub fn masked(&self) -> String {
        let secret = match self {
            ApiCredentials::AccessToken(s) | ApiCredentials::ApiKey(s) => s,
        };
        let visible: String = secret.chars().rev().take(4).collect::<Vec<_>>().into_iter().rev().collect();
        format!("****{}", visible)
    }
}

impl fmt::Debug for ApiCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ApiCredentials({}, {})", self.kind(), self.masked())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    fn env_of(pairs: &'static [(&'static str, &'static str)]) -> impl Fn(&str) -> Option<String> {
        move |name| {
            pairs
                .iter()
                .find(|(k, _)| *k == name)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn test_credential_store_load_and_save() {
        let file = NamedTempFile::new().unwrap();
        let path = file.path().to_path_buf();

        let mut store = CredentialStore::new(path.clone());
        store.set_tmdb_api_key("test_key".to_string());
        store.set_tmdb_access_token("test_token".to_string());
        store.save().unwrap();

        let mut loaded_store = CredentialStore::new(path);
        loaded_store.load().unwrap();
        assert_eq!(loaded_store.get_tmdb_api_key(), Some(&"test_key".to_string()));
        assert_eq!(loaded_store.get_tmdb_access_token(), Some(&"test_token".to_string()));
    }

    #[test]
    fn test_credential_store_remove() {
        let mut store = CredentialStore::new(PathBuf::from("/tmp/test"));
        store.set("key1".to_string(), "value1".to_string());
        store.set("key2".to_string(), "value2".to_string());

        assert_eq!(store.get("key1"), Some(&"value1".to_string()));
        store.remove("key1");
        assert_eq!(store.get("key1"), None);
        assert_eq!(store.get("key2"), Some(&"value2".to_string()));
    }

    #[test]
    fn test_env_token_preferred_over_key() {
        let store = CredentialStore::new(PathBuf::from("/tmp/test"));
        let creds = ApiCredentials::resolve(
            env_of(&[(API_KEY_ENV, "key"), (ACCESS_TOKEN_ENV, "token")]),
            &store,
        )
        .unwrap();
        assert_eq!(creds, ApiCredentials::AccessToken("token".to_string()));
    }

    #[test]
    fn test_env_overrides_stored_credentials() {
        let mut store = CredentialStore::new(PathBuf::from("/tmp/test"));
        store.set_tmdb_access_token("stored".to_string());
        let creds = ApiCredentials::resolve(env_of(&[(API_KEY_ENV, "from-env")]), &store).unwrap();
        assert_eq!(creds, ApiCredentials::ApiKey("from-env".to_string()));
    }

    #[test]
    fn test_blank_values_are_ignored() {
        let mut store = CredentialStore::new(PathBuf::from("/tmp/test"));
        assert!(ApiCredentials::resolve(env_of(&[(ACCESS_TOKEN_ENV, "  ")]), &store).is_err());

        store.set_tmdb_api_key("stored-key".to_string());
        let creds = ApiCredentials::resolve(env_of(&[(ACCESS_TOKEN_ENV, "")]), &store).unwrap();
        assert_eq!(creds, ApiCredentials::ApiKey("stored-key".to_string()));
    }

    #[test]
    fn test_masked_hides_secret() {
        let creds = ApiCredentials::ApiKey("abcdef123456".to_string());
        assert_eq!(creds.masked(), "****3456");
        assert!(!format!("{:?}", creds).contains("abcdef"));
    }
}
