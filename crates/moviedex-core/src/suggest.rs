use moviedex_catalog::MovieCatalog;
use moviedex_config::SearchConfig;
use moviedex_models::Movie;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Suggestions {
    /// The input these suggestions (or this loading state) belong to
    pub query: String,
    pub movies: Vec<Movie>,
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuggestOptions {
    pub quiet_period: Duration,
    pub min_chars: usize,
    pub limit: usize,
}

impl Default for SuggestOptions {
    fn default() -> Self {
        Self {
            quiet_period: Duration::from_millis(300),
            min_chars: 2,
            limit: 5,
        }
    }
}

impl From<&SearchConfig> for SuggestOptions {
    fn from(config: &SearchConfig) -> Self {
        Self {
            quiet_period: config.debounce(),
            min_chars: config.min_suggestion_chars,
            limit: config.suggestion_limit,
        }
    }
}

/// Type-ahead suggestions with a debounce.
///
/// Every call to [`input`](Self::input) restarts the quiet period and cancels
/// whatever the previous input had scheduled or started, so only the value
/// that stays unchanged for the whole period reaches the catalog. Results are
/// applied only if their generation is still current.
///
/// Must be used from within a tokio runtime.
pub struct SuggestionEngine {
    catalog: Arc<dyn MovieCatalog>,
    options: SuggestOptions,
    generation: Arc<AtomicU64>,
    pending: Option<JoinHandle<()>>,
    state: Arc<watch::Sender<Suggestions>>,
}

impl SuggestionEngine {
    pub fn new(catalog: Arc<dyn MovieCatalog>, options: SuggestOptions) -> Self {
        let (state, _) = watch::channel(Suggestions::default());
        Self {
            catalog,
            options,
            generation: Arc::new(AtomicU64::new(0)),
            pending: None,
            state: Arc::new(state),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Suggestions> {
        self.state.subscribe()
    }

    pub fn current(&self) -> Suggestions {
        self.state.borrow().clone()
    }

    pub fn input(&mut self, query: &str) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }

        let query = query.to_string();
        let term = query.trim().to_string();
        if term.chars().count() < self.options.min_chars {
            self.state.send_replace(Suggestions {
                query,
                ..Suggestions::default()
            });
            return;
        }

        // Keep showing the previous suggestions while the new ones load.
        let previous = self.state.borrow().movies.clone();
        self.state.send_replace(Suggestions {
            query: query.clone(),
            movies: previous,
            loading: true,
            error: None,
        });

        let catalog = self.catalog.clone();
        let token = self.generation.clone();
        let state = self.state.clone();
        let SuggestOptions { quiet_period, limit, .. } = self.options;

        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(quiet_period).await;
            if token.load(Ordering::SeqCst) != generation {
                return;
            }

            debug!("Fetching suggestions for {:?}", term);
            let result = catalog.search(&term, 1).await;
            if token.load(Ordering::SeqCst) != generation {
                debug!("Discarding suggestions for superseded input {:?}", term);
                return;
            }

            let next = match result {
                Ok(page) => Suggestions {
                    query,
                    movies: page.results.into_iter().take(limit).collect(),
                    loading: false,
                    error: None,
                },
                Err(e) => {
                    warn!("Suggestion lookup for {:?} failed: {}", term, e);
                    Suggestions {
                        query,
                        movies: Vec::new(),
                        loading: false,
                        error: Some(e.user_message()),
                    }
                }
            };
            state.send_replace(next);
        }));
    }

    /// Drop whatever is scheduled or in flight and clear the suggestions
    pub fn cancel(&mut self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
        self.state.send_replace(Suggestions::default());
    }

    /// Wait for the latest input to settle and return the result
    pub async fn settle(&mut self) -> Suggestions {
        if let Some(pending) = self.pending.take() {
            if let Err(e) = pending.await {
                if !e.is_cancelled() {
                    warn!("Suggestion task failed: {}", e);
                }
            }
        }
        self.current()
    }
}

impl Drop for SuggestionEngine {
    fn drop(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeCatalog;

    fn engine(catalog: &Arc<FakeCatalog>, options: SuggestOptions) -> SuggestionEngine {
        let catalog: Arc<dyn MovieCatalog> = catalog.clone();
        SuggestionEngine::new(catalog, options)
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_of_keystrokes_sends_one_request() {
        let catalog = Arc::new(FakeCatalog::new());
        let mut engine = engine(&catalog, SuggestOptions::default());

        for prefix in ["al", "ali", "alie", "alien"] {
            engine.input(prefix);
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        assert!(catalog.calls().is_empty());
        assert!(engine.current().loading);

        tokio::time::sleep(Duration::from_millis(400)).await;
        assert_eq!(catalog.calls(), vec!["search:alien:1"]);

        let current = engine.current();
        assert_eq!(current.query, "alien");
        assert!(!current.loading);
        assert_eq!(current.movies.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_short_input_clears_without_request() {
        let catalog = Arc::new(FakeCatalog::new());
        let mut engine = engine(&catalog, SuggestOptions::default());

        engine.input("heat");
        assert_eq!(engine.settle().await.movies.len(), 2);

        engine.input("h");
        let current = engine.settle().await;
        assert!(current.movies.is_empty());
        assert!(!current.loading);
        assert_eq!(catalog.calls(), vec!["search:heat:1"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_superseded_response_is_never_applied() {
        let catalog = Arc::new(FakeCatalog::new().with_latency(Duration::from_millis(500)));
        let mut engine = engine(&catalog, SuggestOptions::default());

        engine.input("alien");
        // Past the quiet period: the request for "alien" is in flight.
        tokio::time::sleep(Duration::from_millis(350)).await;
        engine.input("heat");

        let current = engine.settle().await;
        assert_eq!(catalog.calls(), vec!["search:alien:1", "search:heat:1"]);
        assert_eq!(current.query, "heat");
        assert!(current.movies.iter().all(|m| m.title.starts_with("heat")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_result_limit_and_subscription() {
        let catalog = Arc::new(FakeCatalog::new());
        let options = SuggestOptions { limit: 1, ..SuggestOptions::default() };
        let mut engine = engine(&catalog, options);
        let mut rx = engine.subscribe();

        engine.input("brazil");
        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().loading);

        rx.changed().await.unwrap();
        let settled = rx.borrow_and_update().clone();
        assert!(!settled.loading);
        assert_eq!(settled.movies.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_drops_pending_request() {
        let catalog = Arc::new(FakeCatalog::new());
        let mut engine = engine(&catalog, SuggestOptions::default());

        engine.input("alien");
        engine.cancel();
        tokio::time::sleep(Duration::from_secs(1)).await;

        assert!(catalog.calls().is_empty());
        assert_eq!(engine.current(), Suggestions::default());
    }
}
