pub mod store;
pub mod events;
pub mod favorites;
pub mod auth;
pub mod theme;
pub mod history;
pub mod filter;
pub mod genres;
pub mod feed;
pub mod suggest;
pub mod session;

#[cfg(test)]
pub(crate) mod testing;

pub use store::{keys, Namespace, PreferenceStore, SCHEMA_VERSION};
pub use events::{EventBus, StateEvent};
pub use favorites::FavoritesState;
pub use auth::{
    AuthError, AuthState, Credentials, ExternalProfile, IdentityProvider, LocalIdentityProvider,
    DEFAULT_MIN_PASSWORD_LENGTH,
};
pub use theme::{parse_colorfgbg, system_preference, ThemeSource, ThemeState};
pub use history::{SearchHistory, DEFAULT_RECENT_LIMIT};
pub use filter::SearchFilter;
pub use genres::GenreCache;
pub use feed::{FeedSource, PageOutcome, PageTicket, ResultFeed};
pub use suggest::{SuggestOptions, SuggestionEngine, Suggestions};
pub use session::{Session, SessionOptions};
