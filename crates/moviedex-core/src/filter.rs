use chrono::{Datelike, Utc};
use moviedex_models::Movie;
use std::ops::RangeInclusive;

pub const EARLIEST_YEAR: i32 = 1900;

/// Client-side narrowing of an already fetched result list.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchFilter {
    pub years: RangeInclusive<i32>,
    pub rating: RangeInclusive<f32>,
    /// A movie matches when it has any of these; empty means no genre filter
    pub genres: Vec<u32>,
}

impl Default for SearchFilter {
    fn default() -> Self {
        Self {
            years: EARLIEST_YEAR..=Utc::now().year(),
            rating: 0.0..=10.0,
            genres: Vec::new(),
        }
    }
}

impl SearchFilter {
    pub fn with_years(mut self, from: Option<i32>, to: Option<i32>) -> Self {
        let from = from.unwrap_or(*self.years.start());
        let to = to.unwrap_or(*self.years.end());
        self.years = from.min(to)..=from.max(to);
        self
    }

    pub fn with_rating(mut self, min: Option<f32>, max: Option<f32>) -> Self {
        let min = min.unwrap_or(*self.rating.start()).clamp(0.0, 10.0);
        let max = max.unwrap_or(*self.rating.end()).clamp(0.0, 10.0);
        self.rating = min.min(max)..=min.max(max);
        self
    }

    pub fn with_genres(mut self, genres: Vec<u32>) -> Self {
        self.genres = genres;
        self
    }

    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    /// Movies without a release year pass the year check
    pub fn matches(&self, movie: &Movie) -> bool {
        let year_ok = movie.year().map_or(true, |y| self.years.contains(&y));
        let rating_ok = self.rating.contains(&movie.rating);
        let genre_ok = self.genres.is_empty() || self.genres.iter().any(|g| movie.has_genre(*g));
        year_ok && rating_ok && genre_ok
    }

    pub fn apply<'a>(&self, movies: impl IntoIterator<Item = &'a Movie>) -> Vec<&'a Movie> {
        movies.into_iter().filter(|m| self.matches(m)).collect()
    }
}
