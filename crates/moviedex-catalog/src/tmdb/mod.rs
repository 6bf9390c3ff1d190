pub mod api;
pub mod client;

pub use api::clamp_page;
pub use client::TmdbClient;
