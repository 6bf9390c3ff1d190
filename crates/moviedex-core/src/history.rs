use std::sync::Arc;
use tracing::debug;

use crate::events::{EventBus, StateEvent};
use crate::store::{keys, Namespace, PreferenceStore};

pub const DEFAULT_RECENT_LIMIT: usize = 5;

/// Recently submitted queries (most recent first, distinct) and the last query.
pub struct SearchHistory {
    store: Arc<PreferenceStore>,
    events: EventBus,
    limit: usize,
    recent: Vec<String>,
    last_query: Option<String>,
}

impl SearchHistory {
    pub fn load(store: Arc<PreferenceStore>, events: EventBus, limit: usize) -> Self {
        let mut recent: Vec<String> = store
            .get(&Namespace::Global, keys::RECENT_SEARCHES)
            .unwrap_or_default();
        recent.truncate(limit);
        let last_query = store.get(&Namespace::Global, keys::LAST_SEARCH_QUERY);

        Self {
            store,
            events,
            limit,
            recent,
            last_query,
        }
    }

    pub fn recent(&self) -> &[String] {
        &self.recent
    }

    pub fn last_query(&self) -> Option<&str> {
        self.last_query.as_deref()
    }

    /// Blank queries are ignored. Returns false when nothing changed.
    pub fn record(&mut self, query: &str) -> bool {
        let query = query.trim();
        if query.is_empty() {
            return false;
        }

        self.store.set(&Namespace::Global, keys::LAST_SEARCH_QUERY, &query);
        self.last_query = Some(query.to_string());

        if self.recent.first().map(String::as_str) == Some(query) {
            return false;
        }

        self.recent.retain(|q| q != query);
        self.recent.insert(0, query.to_string());
        self.recent.truncate(self.limit);
        debug!("Recent searches: {:?}", self.recent);

        self.store.set(&Namespace::Global, keys::RECENT_SEARCHES, &self.recent);
        self.events.publish(StateEvent::RecentSearchesChanged(self.recent.clone()));
        true
    }

    pub fn clear(&mut self) {
        self.recent.clear();
        self.last_query = None;
        self.store.remove(&Namespace::Global, keys::RECENT_SEARCHES);
        self.store.remove(&Namespace::Global, keys::LAST_SEARCH_QUERY);
        self.events.publish(StateEvent::RecentSearchesChanged(Vec::new()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history(dir: &std::path::Path) -> SearchHistory {
        let store = Arc::new(PreferenceStore::new(dir));
        SearchHistory::load(store, EventBus::default(), DEFAULT_RECENT_LIMIT)
    }

    #[test]
    fn test_recent_is_bounded_and_most_recent_first() {
        let dir = tempfile::tempdir().unwrap();
        let mut history = history(dir.path());
        for q in ["a1", "b2", "c3", "d4", "e5", "f6"] {
            history.record(q);
        }
        assert_eq!(history.recent(), &["f6", "e5", "d4", "c3", "b2"]);
    }

    #[test]
    fn test_repeat_moves_to_front() {
        let dir = tempfile::tempdir().unwrap();
        let mut history = history(dir.path());
        history.record("alien");
        history.record("heat");
        assert!(history.record("  alien "));
        assert_eq!(history.recent(), &["alien", "heat"]);
        assert!(!history.record("alien"));
    }

    #[test]
    fn test_blank_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let mut history = history(dir.path());
        assert!(!history.record("   "));
        assert!(history.recent().is_empty());
        assert_eq!(history.last_query(), None);
    }

    #[test]
    fn test_survives_reload_and_clear() {
        let dir = tempfile::tempdir().unwrap();
        let mut first = history(dir.path());
        first.record("alien");
        first.record("heat");

        let mut second = history(dir.path());
        assert_eq!(second.recent(), &["heat", "alien"]);
        assert_eq!(second.last_query(), Some("heat"));

        second.clear();
        let third = history(dir.path());
        assert!(third.recent().is_empty());
        assert_eq!(third.last_query(), None);
    }
}
