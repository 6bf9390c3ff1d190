use crate::error::CatalogError;
use crate::images::ImageUrls;
use crate::tmdb::api::{self, ApiContext};
use crate::traits::MovieCatalog;
use async_trait::async_trait;
use moviedex_config::{ApiCredentials, TmdbConfig};
use moviedex_models::{Genre, MovieDetails, MovieList, MoviePage, TimeWindow};
use reqwest::Client;
use std::sync::Arc;
use tracing::info;

/// Gateway to the TMDb v3 API.
#[derive(Clone)]
pub struct TmdbClient {
    client: Arc<Client>,
    base_url: String,
    credentials: ApiCredentials,
    language: Option<String>,
    images: ImageUrls,
}

impl TmdbClient {
    pub fn new(config: &TmdbConfig, credentials: ApiCredentials) -> Result<Self, CatalogError> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .user_agent(concat!("moviedex/", env!("CARGO_PKG_VERSION")))
            .build()?;

        info!("TMDb client ready ({} via {})", config.base_url, credentials.kind());

        Ok(Self {
            client: Arc::new(client),
            base_url: config.base_url.clone(),
            credentials,
            language: config.language.clone(),
            images: ImageUrls::new(config.image_base_url.clone()),
        })
    }

    pub fn images(&self) -> &ImageUrls {
        &self.images
    }

    fn context(&self) -> ApiContext<'_> {
        ApiContext {
            client: &self.client,
            base_url: &self.base_url,
            credentials: &self.credentials,
            language: self.language.as_deref(),
        }
    }
}

#[async_trait]
impl MovieCatalog for TmdbClient {
    fn catalog_name(&self) -> &str {
        "tmdb"
    }

    async fn search(&self, query: &str, page: u32) -> Result<MoviePage, CatalogError> {
        api::search_movies(&self.context(), query, page).await
    }

    async fn trending(&self, window: TimeWindow, page: u32) -> Result<MoviePage, CatalogError> {
        api::get_trending(&self.context(), window, page).await
    }

    async fn details(&self, movie_id: u64) -> Result<MovieDetails, CatalogError> {
        api::get_movie_details(&self.context(), movie_id).await
    }

    async fn genres(&self) -> Result<Vec<Genre>, CatalogError> {
        api::get_genres(&self.context()).await
    }

    async fn recommendations(&self, movie_id: u64, page: u32) -> Result<MoviePage, CatalogError> {
        api::get_recommendations(&self.context(), movie_id, page).await
    }

    async fn list(&self, list: MovieList, page: u32) -> Result<MoviePage, CatalogError> {
        api::get_list(&self.context(), list, page).await
    }

    async fn discover_by_genre(&self, genre_id: u32, page: u32) -> Result<MoviePage, CatalogError> {
        api::discover_by_genre(&self.context(), genre_id, page).await
    }
}
