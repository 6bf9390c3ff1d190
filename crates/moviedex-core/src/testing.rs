use async_trait::async_trait;
use moviedex_catalog::{CatalogError, MovieCatalog};
use moviedex_models::{Genre, Movie, MovieDetails, MovieList, MoviePage, TimeWindow};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;

pub fn movie(id: u64, title: &str) -> Movie {
    Movie {
        id,
        title: title.to_string(),
        overview: String::new(),
        release_date: None,
        rating: 5.0,
        genre_ids: Vec::new(),
        poster_path: None,
        backdrop_path: None,
        adult: false,
    }
}

/// In-memory catalog that records every request it receives.
///
/// Page `p` of any listing holds two movies with ids `p * 100 + 1` and `p * 100 + 2`.
pub struct FakeCatalog {
    calls: Mutex<Vec<String>>,
    total_pages: u32,
    latency: Option<Duration>,
    fail_genres: AtomicBool,
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self::with_pages(3)
    }

    pub fn with_pages(total_pages: u32) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            total_pages,
            latency: None,
            fail_genres: AtomicBool::new(false),
        }
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn fail_next_genres(&self) {
        self.fail_genres.store(true, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn genre_calls(&self) -> usize {
        self.calls().iter().filter(|c| c.as_str() == "genres").count()
    }

    async fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }

    pub fn page(&self, label: &str, page: u32) -> MoviePage {
        let results = (1..=2)
            .map(|i| movie(u64::from(page) * 100 + i, &format!("{} {}-{}", label, page, i)))
            .collect();
        MoviePage {
            page,
            total_pages: self.total_pages,
            total_results: u64::from(self.total_pages) * 2,
            results,
        }
    }
}

#[async_trait]
impl MovieCatalog for FakeCatalog {
    fn catalog_name(&self) -> &str {
        "fake"
    }

    async fn search(&self, query: &str, page: u32) -> Result<MoviePage, CatalogError> {
        self.record(format!("search:{}:{}", query, page)).await;
        Ok(self.page(query, page))
    }

    async fn trending(&self, window: TimeWindow, page: u32) -> Result<MoviePage, CatalogError> {
        self.record(format!("trending:{}:{}", window.as_str(), page)).await;
        Ok(self.page("trending", page))
    }

    async fn details(&self, movie_id: u64) -> Result<MovieDetails, CatalogError> {
        self.record(format!("details:{}", movie_id)).await;
        Err(CatalogError::upstream(404, "The resource you requested could not be found."))
    }

    async fn genres(&self) -> Result<Vec<Genre>, CatalogError> {
        self.record("genres".to_string()).await;
        if self.fail_genres.swap(false, Ordering::SeqCst) {
            return Err(CatalogError::upstream(500, "Internal error"));
        }
        Ok(vec![
            Genre { id: 28, name: "Action".to_string() },
            Genre { id: 35, name: "Comedy".to_string() },
            Genre { id: 18, name: "Drama".to_string() },
        ])
    }

    async fn recommendations(&self, movie_id: u64, page: u32) -> Result<MoviePage, CatalogError> {
        self.record(format!("recommendations:{}:{}", movie_id, page)).await;
        Ok(self.page("recommended", page))
    }

    async fn list(&self, list: MovieList, page: u32) -> Result<MoviePage, CatalogError> {
        self.record(format!("list:{}:{}", list.as_str(), page)).await;
        Ok(self.page(list.as_str(), page))
    }

    async fn discover_by_genre(&self, genre_id: u32, page: u32) -> Result<MoviePage, CatalogError> {
        self.record(format!("discover:{}:{}", genre_id, page)).await;
        Ok(self.page("genre", page))
    }
}
