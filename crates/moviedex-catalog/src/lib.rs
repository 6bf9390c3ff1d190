pub mod traits;
pub mod error;
pub mod images;
pub mod tmdb;

pub use traits::MovieCatalog;
pub use error::{CatalogError, ErrorKind};
pub use images::{ImageKind, ImageUrls};
pub use tmdb::{clamp_page, TmdbClient};
