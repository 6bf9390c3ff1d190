use serde::{Deserialize, Serialize};
use crate::release::ReleaseDate;

/// Upstream refuses pages beyond this, regardless of `total_pages`.
pub const MAX_PAGES: u32 = 500;

/// A catalog entry as returned by list and search endpoints.
///
/// Movies are immutable snapshots: the client never edits one, it only stores
/// or drops it (favorites keep the snapshot taken at the time of favoriting).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Movie {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<ReleaseDate>,
    /// Average vote on a 0-10 scale
    #[serde(default)]
    pub rating: f32,
    #[serde(default)]
    pub genre_ids: Vec<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub adult: bool,
}

impl Movie {
    pub fn year(&self) -> Option<i32> {
        self.release_date.as_ref().map(ReleaseDate::year)
    }

    pub fn has_genre(&self, genre_id: u32) -> bool {
        self.genre_ids.contains(&genre_id)
    }
}

/// One page of a paged catalog listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MoviePage {
    pub page: u32,
    pub total_pages: u32,
    pub total_results: u64,
    pub results: Vec<Movie>,
}

impl MoviePage {
    /// The page returned for queries that never reach the network
    pub fn empty() -> Self {
        Self {
            page: 1,
            total_pages: 0,
            total_results: 0,
            results: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn has_more(&self) -> bool {
        self.page < self.total_pages.min(MAX_PAGES)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum TimeWindow {
    #[default]
    Day,
    Week,
}

impl TimeWindow {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeWindow::Day => "day",
            TimeWindow::Week => "week",
        }
    }
}

/// Curated listings published by the catalog.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum MovieList {
    Popular,
    TopRated,
    Upcoming,
}

impl MovieList {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovieList::Popular => "popular",
            MovieList::TopRated => "top_rated",
            MovieList::Upcoming => "upcoming",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MovieList::Popular => "Popular",
            MovieList::TopRated => "Top Rated",
            MovieList::Upcoming => "Upcoming",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movie(id: u64, release: Option<&str>) -> Movie {
        Movie {
            id,
            title: format!("Movie {}", id),
            overview: String::new(),
            release_date: release.and_then(ReleaseDate::parse),
            rating: 7.0,
            genre_ids: vec![28, 12],
            poster_path: None,
            backdrop_path: None,
            adult: false,
        }
    }

    #[test]
    fn test_movie_year_from_partial_date() {
        assert_eq!(movie(1, Some("1989-06")).year(), Some(1989));
        assert_eq!(movie(2, None).year(), None);
        assert!(movie(3, None).has_genre(12));
        assert!(!movie(3, None).has_genre(18));
    }

    #[test]
    fn test_snapshot_deserializes_with_missing_optional_fields() {
        let json = r#"{"id": 268, "title": "Batman"}"#;
        let parsed: Movie = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.id, 268);
        assert_eq!(parsed.overview, "");
        assert!(parsed.release_date.is_none());
        assert!(parsed.genre_ids.is_empty());
    }

    #[test]
    fn test_page_has_more_respects_upstream_cap() {
        let mut page = MoviePage::empty();
        assert!(!page.has_more());

        page.page = 3;
        page.total_pages = 10;
        assert!(page.has_more());

        page.page = MAX_PAGES;
        page.total_pages = 9000;
        assert!(!page.has_more());
    }

    #[test]
    fn test_list_paths() {
        assert_eq!(MovieList::TopRated.as_str(), "top_rated");
        assert_eq!(TimeWindow::Week.as_str(), "week");
    }
}
