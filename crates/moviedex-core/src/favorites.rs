use moviedex_models::{Movie, User};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info};

use crate::events::{EventBus, StateEvent};
use crate::store::{keys, Namespace, PreferenceStore};

/// The favorites list of the current identity plus the last-searched pointer.
///
/// Favorites are movie snapshots in insertion order with set semantics on id.
/// Every mutation is persisted before its event is published.
pub struct FavoritesState {
    store: Arc<PreferenceStore>,
    events: EventBus,
    namespace: Namespace,
    favorites: Vec<Movie>,
    last_searched: Option<Movie>,
}

impl FavoritesState {
    pub fn load(store: Arc<PreferenceStore>, events: EventBus, user: Option<&User>) -> Self {
        let namespace = Namespace::for_identity(user);
        let favorites = read_favorites(&store, &namespace);
        let last_searched = store.get(&Namespace::Global, keys::LAST_SEARCHED);

        Self {
            store,
            events,
            namespace,
            favorites,
            last_searched,
        }
    }

    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    pub fn favorites(&self) -> &[Movie] {
        &self.favorites
    }

    pub fn len(&self) -> usize {
        self.favorites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.favorites.is_empty()
    }

    pub fn is_favorite(&self, movie_id: u64) -> bool {
        self.favorites.iter().any(|m| m.id == movie_id)
    }

    /// Returns false when the movie was already a favorite
    pub fn add_favorite(&mut self, movie: Movie) -> bool {
        if self.is_favorite(movie.id) {
            debug!("Movie {} is already a favorite", movie.id);
            return false;
        }

        info!("Adding favorite {} ({})", movie.id, movie.title);
        self.favorites.push(movie);
        self.persist();
        true
    }

    /// Returns false when the movie was not a favorite
    pub fn remove_favorite(&mut self, movie_id: u64) -> bool {
        let before = self.favorites.len();
        self.favorites.retain(|m| m.id != movie_id);
        if self.favorites.len() == before {
            debug!("Movie {} is not a favorite", movie_id);
            return false;
        }

        info!("Removed favorite {}", movie_id);
        self.persist();
        true
    }

    pub fn last_searched(&self) -> Option<&Movie> {
        self.last_searched.as_ref()
    }

    pub fn set_last_searched(&mut self, movie: Movie) {
        self.store.set(&Namespace::Global, keys::LAST_SEARCHED, &movie);
        self.last_searched = Some(movie.clone());
        self.events.publish(StateEvent::LastSearchedChanged(movie));
    }

    /// Replace the view with the favorites of another identity.
    ///
    /// The previous identity's list stays in the store untouched.
    pub fn switch_identity(&mut self, user: Option<&User>) {
        let namespace = Namespace::for_identity(user);
        if namespace == self.namespace {
            return;
        }

        self.favorites = read_favorites(&self.store, &namespace);
        self.namespace = namespace;
        info!("Loaded {} favorites for {}", self.favorites.len(), self.namespace);

        self.events.publish(StateEvent::FavoritesReloaded {
            namespace: self.namespace.clone(),
            count: self.favorites.len(),
        });
    }

    fn persist(&self) {
        self.store.set(&self.namespace, keys::FAVORITES, &self.favorites);
        self.events.publish(StateEvent::FavoritesChanged {
            namespace: self.namespace.clone(),
            count: self.favorites.len(),
        });
    }
}

/// Hand-edited files may repeat an id; the first occurrence wins.
fn read_favorites(store: &PreferenceStore, namespace: &Namespace) -> Vec<Movie> {
    let stored: Vec<Movie> = store.get(namespace, keys::FAVORITES).unwrap_or_default();
    let mut seen = HashSet::new();
    stored.into_iter().filter(|m| seen.insert(m.id)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::movie;
    use moviedex_models::ReleaseDate;
    use tempfile::TempDir;

    fn state(user: Option<&User>) -> (TempDir, Arc<PreferenceStore>, FavoritesState) {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(PreferenceStore::new(dir.path()));
        let state = FavoritesState::load(store.clone(), EventBus::default(), user);
        (dir, store, state)
    }

    #[test]
    fn test_add_is_idempotent() {
        let (_dir, _store, mut favorites) = state(None);
        assert!(favorites.add_favorite(movie(1, "Alien")));
        assert!(!favorites.add_favorite(movie(1, "Alien")));
        assert_eq!(favorites.len(), 1);
        assert!(favorites.is_favorite(1));
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let (_dir, _store, mut favorites) = state(None);
        favorites.add_favorite(movie(1, "Alien"));
        assert!(!favorites.remove_favorite(2));
        assert!(favorites.remove_favorite(1));
        assert!(favorites.is_empty());
        assert!(!favorites.is_favorite(1));
    }

    #[test]
    fn test_insertion_order_preserved() {
        let (_dir, _store, mut favorites) = state(None);
        favorites.add_favorite(movie(3, "Heat"));
        favorites.add_favorite(movie(1, "Alien"));
        favorites.add_favorite(movie(2, "Brazil"));
        let ids: Vec<u64> = favorites.favorites().iter().map(|m| m.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn test_persists_across_reload() {
        let alice = User::local("alice");
        let (dir, _store, mut favorites) = state(Some(&alice));
        favorites.add_favorite(movie(1, "Alien"));
        favorites.set_last_searched(movie(9, "Heat"));

        let store = Arc::new(PreferenceStore::new(dir.path()));
        let reloaded = FavoritesState::load(store, EventBus::default(), Some(&alice));
        assert_eq!(reloaded.favorites(), &[movie(1, "Alien")]);
        assert_eq!(reloaded.last_searched().map(|m| m.id), Some(9));
    }

    #[test]
    fn test_full_snapshot_survives_reload() {
        let heat = Movie {
            id: 949,
            title: "Heat".to_string(),
            overview: "A group of high-end professional thieves.".to_string(),
            release_date: ReleaseDate::parse("1995-12"),
            rating: 7.3,
            genre_ids: vec![28, 80, 18],
            poster_path: Some("/umSVjVdbVwtx5ryCA2QXL44Durm.jpg".to_string()),
            backdrop_path: Some("/rfEXNlql4CafRmtgp2RqaNyUvSf.jpg".to_string()),
            adult: false,
        };
        assert!(heat.release_date.is_some());

        let alice = User::local("alice");
        let (dir, _store, mut favorites) = state(Some(&alice));
        favorites.add_favorite(heat.clone());

        let store = Arc::new(PreferenceStore::new(dir.path()));
        let reloaded = FavoritesState::load(store, EventBus::default(), Some(&alice));
        assert_eq!(reloaded.favorites(), &[heat]);
    }

    #[test]
    fn test_switch_identity_isolates_lists() {
        let alice = User::local("alice");
        let bob = User::local("bob");
        let (_dir, _store, mut favorites) = state(Some(&alice));
        favorites.add_favorite(movie(1, "Alien"));

        favorites.switch_identity(Some(&bob));
        assert!(favorites.is_empty());
        favorites.add_favorite(movie(2, "Brazil"));

        favorites.switch_identity(Some(&alice));
        assert_eq!(favorites.favorites(), &[movie(1, "Alien")]);
    }

    #[test]
    fn test_duplicate_ids_on_disk_are_collapsed() {
        let (_dir, store, _favorites) = state(None);
        store.set(
            &Namespace::Anonymous,
            keys::FAVORITES,
            &vec![movie(1, "Alien"), movie(1, "Alien again"), movie(2, "Brazil")],
        );
        let favorites = FavoritesState::load(store, EventBus::default(), None);
        let titles: Vec<&str> = favorites.favorites().iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, vec!["Alien", "Brazil"]);
    }

    #[test]
    fn test_mutations_publish_events() {
        let (_dir, store, _) = state(None);
        let events = EventBus::default();
        let mut rx = events.subscribe();
        let mut favorites = FavoritesState::load(store, events, None);

        favorites.add_favorite(movie(1, "Alien"));
        favorites.add_favorite(movie(1, "Alien"));
        favorites.remove_favorite(1);

        assert_eq!(
            rx.try_recv().unwrap(),
            StateEvent::FavoritesChanged { namespace: Namespace::Anonymous, count: 1 }
        );
        assert_eq!(
            rx.try_recv().unwrap(),
            StateEvent::FavoritesChanged { namespace: Namespace::Anonymous, count: 0 }
        );
        assert!(rx.try_recv().is_err());
    }
}
