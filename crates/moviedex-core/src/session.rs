use moviedex_config::Config;
use moviedex_models::{ThemeMode, User};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::info;

use crate::auth::{AuthError, AuthState, Credentials, IdentityProvider};
use crate::events::{EventBus, StateEvent};
use crate::favorites::FavoritesState;
use crate::genres::GenreCache;
use crate::history::{SearchHistory, DEFAULT_RECENT_LIMIT};
use crate::store::PreferenceStore;
use crate::theme::ThemeState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOptions {
    pub recent_limit: usize,
    pub default_theme: ThemeMode,
    /// Environment hint used when no theme has been chosen yet
    pub system_theme: Option<ThemeMode>,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            recent_limit: DEFAULT_RECENT_LIMIT,
            default_theme: ThemeMode::default(),
            system_theme: None,
        }
    }
}

impl SessionOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            recent_limit: config.search.recent_limit,
            default_theme: config.theme.default_mode,
            system_theme: None,
        }
    }

    pub fn with_system_theme(mut self, system_theme: Option<ThemeMode>) -> Self {
        self.system_theme = system_theme;
        self
    }
}

/// All client-side state of one running app, sharing one store and one event bus.
pub struct Session {
    store: Arc<PreferenceStore>,
    events: EventBus,
    auth: AuthState,
    favorites: FavoritesState,
    theme: ThemeState,
    history: SearchHistory,
    genres: GenreCache,
}

impl Session {
    pub fn open(store: Arc<PreferenceStore>, options: SessionOptions) -> Self {
        let events = EventBus::default();
        let auth = AuthState::load(store.clone());
        let favorites = FavoritesState::load(store.clone(), events.clone(), auth.current());
        let theme = ThemeState::resolve(
            store.clone(),
            events.clone(),
            options.system_theme,
            options.default_theme,
        );
        let history = SearchHistory::load(store.clone(), events.clone(), options.recent_limit);

        info!(
            "Session opened ({} favorites for {})",
            favorites.len(),
            favorites.namespace()
        );

        Self {
            store,
            events,
            auth,
            favorites,
            theme,
            history,
            genres: GenreCache::new(),
        }
    }

    pub fn store(&self) -> &Arc<PreferenceStore> {
        &self.store
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StateEvent> {
        self.events.subscribe()
    }

    pub fn user(&self) -> Option<&User> {
        self.auth.current()
    }

    pub fn auth(&self) -> &AuthState {
        &self.auth
    }

    pub fn favorites(&self) -> &FavoritesState {
        &self.favorites
    }

    pub fn favorites_mut(&mut self) -> &mut FavoritesState {
        &mut self.favorites
    }

    pub fn theme(&self) -> &ThemeState {
        &self.theme
    }

    pub fn theme_mut(&mut self) -> &mut ThemeState {
        &mut self.theme
    }

    pub fn history(&self) -> &SearchHistory {
        &self.history
    }

    pub fn history_mut(&mut self) -> &mut SearchHistory {
        &mut self.history
    }

    pub fn genres(&self) -> &GenreCache {
        &self.genres
    }

    /// Sign in and switch the favorites view to the new identity.
    ///
    /// The favorites list is reloaded before `IdentityChanged` is published,
    /// so observers of that event already see the new identity's list.
    pub async fn login(
        &mut self,
        provider: &dyn IdentityProvider,
        credentials: &Credentials,
    ) -> Result<User, AuthError> {
        let user = self.auth.login(provider, credentials).await?;
        self.favorites.switch_identity(Some(&user));
        self.events.publish(StateEvent::IdentityChanged(Some(user.clone())));
        Ok(user)
    }

    pub fn logout(&mut self) -> Option<User> {
        let previous = self.auth.logout();
        self.favorites.switch_identity(None);
        self.events.publish(StateEvent::IdentityChanged(None));
        previous
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::LocalIdentityProvider;
    use crate::store::Namespace;
    use crate::testing::movie;

    fn open(dir: &std::path::Path) -> Session {
        Session::open(Arc::new(PreferenceStore::new(dir)), SessionOptions::default())
    }

    fn password(username: &str) -> Credentials {
        Credentials::Password {
            username: username.to_string(),
            password: "secret123".to_string(),
        }
    }

    fn favorite_ids(session: &Session) -> Vec<u64> {
        session.favorites().favorites().iter().map(|m| m.id).collect()
    }

    #[tokio::test]
    async fn test_favorites_follow_identity() {
        let dir = tempfile::tempdir().unwrap();
        let provider = LocalIdentityProvider::default();
        let mut session = open(dir.path());

        session.login(&provider, &password("alice")).await.unwrap();
        session.favorites_mut().add_favorite(movie(1, "Alien"));
        session.favorites_mut().add_favorite(movie(2, "Brazil"));

        session.logout();
        assert!(session.favorites().is_empty());
        assert_eq!(session.favorites().namespace(), &Namespace::Anonymous);

        session.login(&provider, &password("bob")).await.unwrap();
        assert!(session.favorites().is_empty());
        session.favorites_mut().add_favorite(movie(3, "Heat"));
        session.logout();

        session.login(&provider, &password("alice")).await.unwrap();
        assert_eq!(favorite_ids(&session), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_identity_change_published_after_reload() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = open(dir.path());
        let mut rx = session.subscribe();

        let user = session
            .login(&LocalIdentityProvider::default(), &password("alice"))
            .await
            .unwrap();

        let alice = Namespace::User(user.id.clone());
        assert_eq!(
            rx.try_recv().unwrap(),
            StateEvent::FavoritesReloaded { namespace: alice, count: 0 }
        );
        assert_eq!(rx.try_recv().unwrap(), StateEvent::IdentityChanged(Some(user)));
    }

    #[tokio::test]
    async fn test_rejected_login_changes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = open(dir.path());
        session.favorites_mut().add_favorite(movie(1, "Alien"));
        let mut rx = session.subscribe();

        let weak = Credentials::Password {
            username: "alice".to_string(),
            password: "123".to_string(),
        };
        assert!(session.login(&LocalIdentityProvider::default(), &weak).await.is_err());

        assert!(session.user().is_none());
        assert_eq!(favorite_ids(&session), vec![1]);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_state_survives_restart() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut session = open(dir.path());
            session
                .login(&LocalIdentityProvider::default(), &password("alice"))
                .await
                .unwrap();
            session.favorites_mut().add_favorite(movie(7, "Ran"));
            session.theme_mut().toggle();
            session.history_mut().record("ran");
        }

        let session = open(dir.path());
        assert_eq!(session.user().map(|u| u.display_name.as_str()), Some("alice"));
        assert_eq!(favorite_ids(&session), vec![7]);
        assert_eq!(session.theme().mode(), ThemeMode::Light);
        assert_eq!(session.history().recent(), &["ran"]);
    }

    #[test]
    fn test_options_from_config() {
        let mut config = Config::default();
        config.search.recent_limit = 3;
        config.theme.default_mode = ThemeMode::Light;
        let options = SessionOptions::from_config(&config).with_system_theme(Some(ThemeMode::Dark));
        assert_eq!(options.recent_limit, 3);
        assert_eq!(options.default_theme, ThemeMode::Light);
        assert_eq!(options.system_theme, Some(ThemeMode::Dark));
    }
}
