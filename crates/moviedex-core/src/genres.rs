use moviedex_catalog::{CatalogError, MovieCatalog};
use moviedex_models::Genre;
use std::collections::HashMap;
use tokio::sync::OnceCell;
use tracing::{debug, info};

#[derive(Debug)]
struct GenreTable {
    genres: Vec<Genre>,
    by_id: HashMap<u32, usize>,
}

/// The genre list, fetched at most once per session.
///
/// Concurrent first callers share a single request. A failed fetch leaves the
/// cache empty so the next call tries again.
#[derive(Debug, Default)]
pub struct GenreCache {
    table: OnceCell<GenreTable>,
}

impl GenreCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn load(&self, catalog: &dyn MovieCatalog) -> Result<&[Genre], CatalogError> {
        let table = self
            .table
            .get_or_try_init(|| async {
                info!("Fetching genre list from {}", catalog.catalog_name());
                let genres = catalog.genres().await?;
                let by_id = genres.iter().enumerate().map(|(i, g)| (g.id, i)).collect();
                Ok::<_, CatalogError>(GenreTable { genres, by_id })
            })
            .await?;
        debug!("Genre cache holds {} genres", table.genres.len());
        Ok(&table.genres)
    }

    pub fn is_loaded(&self) -> bool {
        self.table.initialized()
    }

    pub fn name(&self, id: u32) -> Option<&str> {
        let table = self.table.get()?;
        table.by_id.get(&id).map(|&i| table.genres[i].name.as_str())
    }

    /// Names for the ids that are known, in the order given
    pub fn names(&self, ids: &[u32]) -> Vec<&str> {
        ids.iter().filter_map(|id| self.name(*id)).collect()
    }

    /// Case-insensitive lookup by name
    pub fn find(&self, name: &str) -> Option<&Genre> {
        let name = name.trim();
        self.table
            .get()?
            .genres
            .iter()
            .find(|g| g.name.eq_ignore_ascii_case(name))
    }
}
