use async_trait::async_trait;
use moviedex_models::{Genre, MovieDetails, MovieList, MoviePage, TimeWindow};
use std::sync::Arc;
use crate::error::CatalogError;

/// Read access to a remote movie catalog.
///
/// Every call may fail with a [`CatalogError`]; none of them are fatal and
/// none retry beyond a single shallow transport retry.
#[async_trait]
pub trait MovieCatalog: Send + Sync {
    fn catalog_name(&self) -> &str;

    /// Title search. A blank query yields an empty page without a request.
    async fn search(&self, query: &str, page: u32) -> Result<MoviePage, CatalogError>;

    async fn trending(&self, window: TimeWindow, page: u32) -> Result<MoviePage, CatalogError>;

    /// Expanded record with cast, crew, trailer and resolved genre names
    async fn details(&self, movie_id: u64) -> Result<MovieDetails, CatalogError>;

    async fn genres(&self) -> Result<Vec<Genre>, CatalogError>;

    async fn recommendations(&self, movie_id: u64, page: u32) -> Result<MoviePage, CatalogError>;

    async fn list(&self, list: MovieList, page: u32) -> Result<MoviePage, CatalogError>;

    async fn discover_by_genre(&self, genre_id: u32, page: u32) -> Result<MoviePage, CatalogError>;
}

#[async_trait]
impl<T: MovieCatalog + ?Sized> MovieCatalog for Arc<T> {
    fn catalog_name(&self) -> &str {
        (**self).catalog_name()
    }

    async fn search(&self, query: &str, page: u32) -> Result<MoviePage, CatalogError> {
        (**self).search(query, page).await
    }

    async fn trending(&self, window: TimeWindow, page: u32) -> Result<MoviePage, CatalogError> {
        (**self).trending(window, page).await
    }

    async fn details(&self, movie_id: u64) -> Result<MovieDetails, CatalogError> {
        (**self).details(movie_id).await
    }

    async fn genres(&self) -> Result<Vec<Genre>, CatalogError> {
        (**self).genres().await
    }

    async fn recommendations(&self, movie_id: u64, page: u32) -> Result<MoviePage, CatalogError> {
        (**self).recommendations(movie_id, page).await
    }

    async fn list(&self, list: MovieList, page: u32) -> Result<MoviePage, CatalogError> {
        (**self).list(list, page).await
    }

    async fn discover_by_genre(&self, genre_id: u32, page: u32) -> Result<MoviePage, CatalogError> {
        (**self).discover_by_genre(genre_id, page).await
    }
}
