use crate::output::Output;
use comfy_table::{presets, Cell, CellAlignment, ContentArrangement, Table};
use moviedex_core::{FavoritesState, GenreCache};
use moviedex_models::{year_label, Movie};
use serde_json::json;

const OVERVIEW_WIDTH: usize = 60;

pub fn styled_table() -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table
}

pub fn genre_label(movie: &Movie, genres: &GenreCache) -> String {
    let names = genres.names(&movie.genre_ids);
    if names.is_empty() {
        "-".to_string()
    } else {
        names.join(", ")
    }
}

pub fn rating_label(rating: f32) -> String {
    if rating > 0.0 {
        format!("{:.1}", rating)
    } else {
        "N/A".to_string()
    }
}

/// Cut at a char boundary and mark the cut with an ellipsis
pub fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let cut: String = text.chars().take(width.saturating_sub(1)).collect();
    format!("{}…", cut.trim_end())
}

pub fn movie_json(movie: &Movie, favorites: &FavoritesState, genres: &GenreCache) -> serde_json::Value {
    json!({
        "id": movie.id,
        "title": movie.title,
        "year": movie.year(),
        "release_date": movie.release_date.as_ref().map(|d| d.to_string()),
        "rating": movie.rating,
        "genres": genres.names(&movie.genre_ids),
        "genre_ids": movie.genre_ids,
        "overview": movie.overview,
        "poster_path": movie.poster_path,
        "favorite": favorites.is_favorite(movie.id),
    })
}

/// Render a movie list as a table (human) or an array (JSON).
pub fn print_movies(
    title: &str,
    movies: &[&Movie],
    favorites: &FavoritesState,
    genres: &GenreCache,
    output: &Output,
) {
    if !output.is_human() {
        let items: Vec<_> = movies.iter().map(|m| movie_json(m, favorites, genres)).collect();
        output.json(&json!({ "title": title, "count": movies.len(), "movies": items }));
        return;
    }
    if output.is_quiet() {
        return;
    }

    output.println(format!("\n{}", output.heading(title)));
    if movies.is_empty() {
        output.println(output.muted("No movies found"));
        return;
    }

    let mut table = styled_table();
    table.set_header(vec!["", "ID", "Title", "Year", "Rating", "Genres", "Overview"]);
    for movie in movies {
        let marker = if favorites.is_favorite(movie.id) {
            output.highlight("♥")
        } else {
            String::new()
        };
        table.add_row(vec![
            Cell::new(marker),
            Cell::new(movie.id).set_alignment(CellAlignment::Right),
            Cell::new(output.accent(&movie.title)),
            Cell::new(year_label(movie.release_date.as_ref())),
            Cell::new(rating_label(movie.rating)).set_alignment(CellAlignment::Right),
            Cell::new(genre_label(movie, genres)),
            Cell::new(truncate(&movie.overview, OVERVIEW_WIDTH)),
        ]);
    }
    output.println(table.to_string());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("Amélie", 10), "Amélie");
        assert_eq!(truncate("Crouching Tiger, Hidden Dragon", 10), "Crouching…");
        assert_eq!(truncate("ééééé", 3), "éé…");
    }

    #[test]
    fn test_rating_label() {
        assert_eq!(rating_label(7.26), "7.3");
        assert_eq!(rating_label(0.0), "N/A");
    }
}
