use async_trait::async_trait;
use moviedex_models::User;
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, warn};

use crate::store::{keys, Namespace, PreferenceStore};

pub const DEFAULT_MIN_PASSWORD_LENGTH: usize = 6;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Please enter a username")]
    EmptyUsername,

    #[error("Password must be at least {min} characters")]
    PasswordTooShort { min: usize },

    #[error("External profile is missing a display name")]
    MissingDisplayName,

    #[error("{provider} cannot handle this kind of sign-in")]
    Unsupported { provider: String },
}

/// Profile handed back by an external sign-in flow (a browser popup in a GUI).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalProfile {
    pub provider: String,
    pub display_name: String,
    pub email: Option<String>,
    pub avatar_url: Option<String>,
}

#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    Password { username: String, password: String },
    External(ExternalProfile),
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credentials::Password { username, .. } => f
                .debug_struct("Password")
                .field("username", username)
                .field("password", &"***")
                .finish(),
            Credentials::External(profile) => f.debug_tuple("External").field(profile).finish(),
        }
    }
}

/// Turns credentials into an identity. Implementations must not touch storage.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    fn provider_name(&self) -> &str;

    async fn sign_in(&self, credentials: &Credentials) -> Result<User, AuthError>;
}

/// Accepts any non-empty username with a long enough password. Nothing is verified.
#[derive(Debug, Clone)]
pub struct LocalIdentityProvider {
    min_password_length: usize,
}

impl LocalIdentityProvider {
    pub fn new(min_password_length: usize) -> Self {
        Self { min_password_length }
    }

    fn validate_password(&self, username: &str, password: &str) -> Result<User, AuthError> {
        if username.trim().is_empty() {
            return Err(AuthError::EmptyUsername);
        }
        if password.chars().count() < self.min_password_length {
            return Err(AuthError::PasswordTooShort { min: self.min_password_length });
        }
        Ok(User::local(username))
    }

    fn accept_profile(&self, profile: &ExternalProfile) -> Result<User, AuthError> {
        let display_name = profile.display_name.trim();
        if display_name.is_empty() {
            return Err(AuthError::MissingDisplayName);
        }

        // Email is the most stable handle an external profile offers.
        let handle = profile
            .email
            .as_deref()
            .filter(|e| !e.trim().is_empty())
            .unwrap_or(display_name)
            .trim()
            .to_lowercase();

        Ok(User {
            id: format!("{}:{}", profile.provider.to_lowercase(), handle),
            display_name: display_name.to_string(),
            avatar_url: profile.avatar_url.clone(),
            email: profile.email.clone(),
        })
    }
}

impl Default for LocalIdentityProvider {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_PASSWORD_LENGTH)
    }
}

#[async_trait]
impl IdentityProvider for LocalIdentityProvider {
    fn provider_name(&self) -> &str {
        "local"
    }

    async fn sign_in(&self, credentials: &Credentials) -> Result<User, AuthError> {
        match credentials {
            Credentials::Password { username, password } => self.validate_password(username, password),
            Credentials::External(profile) => self.accept_profile(profile),
        }
    }
}

/// Who is signed in, persisted so it survives a restart.
pub struct AuthState {
    store: Arc<PreferenceStore>,
    user: Option<User>,
}

impl AuthState {
    pub fn load(store: Arc<PreferenceStore>) -> Self {
        let user = store.get(&Namespace::Global, keys::USER);
        Self { store, user }
    }

    pub fn current(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// Validates through the provider; nothing is written when validation fails.
    pub async fn login(
        &mut self,
        provider: &dyn IdentityProvider,
        credentials: &Credentials,
    ) -> Result<User, AuthError> {
        let user = provider.sign_in(credentials).await.map_err(|e| {
            warn!("Sign-in via {} rejected: {}", provider.provider_name(), e);
            e
        })?;

        self.store.set(&Namespace::Global, keys::USER, &user);
        self.user = Some(user.clone());
        info!("Signed in as {} via {}", user.id, provider.provider_name());
        Ok(user)
    }

    /// Forgets the identity. Data stored under it is left alone.
    pub fn logout(&mut self) -> Option<User> {
        let previous = self.user.take();
        self.store.remove(&Namespace::Global, keys::USER);
        if let Some(user) = &previous {
            info!("Signed out {}", user.id);
        }
        previous
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn password(username: &str, password: &str) -> Credentials {
        Credentials::Password {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_local_provider_rules() {
        let provider = LocalIdentityProvider::default();

        assert_eq!(
            provider.sign_in(&password("  ", "secret1")).await,
            Err(AuthError::EmptyUsername)
        );
        assert_eq!(
            provider.sign_in(&password("alice", "12345")).await,
            Err(AuthError::PasswordTooShort { min: 6 })
        );

        let user = provider.sign_in(&password("Alice", "123456")).await.unwrap();
        assert_eq!(user.id, "local:alice");
        assert_eq!(user.display_name, "Alice");
    }

    #[tokio::test]
    async fn test_configurable_password_length() {
        let provider = LocalIdentityProvider::new(10);
        assert_eq!(
            provider.sign_in(&password("alice", "123456")).await,
            Err(AuthError::PasswordTooShort { min: 10 })
        );
    }

    #[tokio::test]
    async fn test_external_profile() {
        let provider = LocalIdentityProvider::default();
        let profile = ExternalProfile {
            provider: "Google".to_string(),
            display_name: "Alice Liddell".to_string(),
            email: Some("Alice@Example.com".to_string()),
            avatar_url: Some("https://example.com/a.png".to_string()),
        };

        let user = provider.sign_in(&Credentials::External(profile.clone())).await.unwrap();
        assert_eq!(user.id, "google:alice@example.com");
        assert_eq!(user.avatar_url.as_deref(), Some("https://example.com/a.png"));

        let nameless = ExternalProfile { display_name: " ".to_string(), ..profile };
        assert_eq!(
            provider.sign_in(&Credentials::External(nameless)).await,
            Err(AuthError::MissingDisplayName)
        );
    }

    #[test]
    fn test_debug_hides_password() {
        let rendered = format!("{:?}", password("alice", "hunter22"));
        assert!(rendered.contains("alice"));
        assert!(!rendered.contains("hunter22"));
    }

    #[tokio::test]
    async fn test_rejected_login_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(PreferenceStore::new(dir.path()));
        let mut auth = AuthState::load(store.clone());

        let result = auth
            .login(&LocalIdentityProvider::default(), &password("alice", "123"))
            .await;
        assert!(result.is_err());
        assert!(!auth.is_authenticated());
        assert!(!dir.path().join("global").join("user.json").exists());
    }

    #[tokio::test]
    async fn test_identity_survives_reload_until_logout() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(PreferenceStore::new(dir.path()));
        let mut auth = AuthState::load(store);
        auth.login(&LocalIdentityProvider::default(), &password("alice", "123456"))
            .await
            .unwrap();

        let mut reloaded = AuthState::load(Arc::new(PreferenceStore::new(dir.path())));
        assert_eq!(reloaded.current().map(|u| u.id.as_str()), Some("local:alice"));

        assert_eq!(reloaded.logout().map(|u| u.id), Some("local:alice".to_string()));
        let after = AuthState::load(Arc::new(PreferenceStore::new(dir.path())));
        assert!(!after.is_authenticated());
    }
}
