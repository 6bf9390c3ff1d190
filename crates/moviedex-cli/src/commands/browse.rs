use super::progress::Spinner;
use super::render::print_movies;
use crate::context::{catalog_failure, AppContext};
use crate::output::Output;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use moviedex_catalog::MovieCatalog;
use moviedex_core::{FeedSource, ResultFeed, SearchFilter, SuggestOptions, SuggestionEngine};
use serde_json::json;
use std::sync::Arc;

/// Client-side filter flags shared by the listing commands
#[derive(Debug, Default, clap::Args)]
pub struct FilterArgs {
    /// Earliest release year
    #[arg(long)]
    pub year_from: Option<i32>,

    /// Latest release year
    #[arg(long)]
    pub year_to: Option<i32>,

    /// Minimum rating (0-10)
    #[arg(long)]
    pub min_rating: Option<f32>,

    /// Maximum rating (0-10)
    #[arg(long)]
    pub max_rating: Option<f32>,

    /// Only movies in any of these genres (name or id, repeatable)
    #[arg(long = "genre", value_name = "GENRE")]
    pub genres: Vec<String>,
}

impl FilterArgs {
    fn build(&self, ctx: &AppContext) -> Result<SearchFilter> {
        let mut genre_ids = Vec::with_capacity(self.genres.len());
        for genre in &self.genres {
            genre_ids.push(resolve_genre(ctx, genre)?);
        }

        Ok(SearchFilter::default()
            .with_years(self.year_from, self.year_to)
            .with_rating(self.min_rating, self.max_rating)
            .with_genres(genre_ids))
    }
}

/// Accepts a numeric id or a genre name; names need the genre list to be loaded.
pub fn resolve_genre(ctx: &AppContext, genre: &str) -> Result<u32> {
    if let Ok(id) = genre.trim().parse::<u32>() {
        return Ok(id);
    }
    ctx.session
        .genres()
        .find(genre)
        .map(|g| g.id)
        .ok_or_else(|| eyre!("Unknown genre '{}'. Run 'moviedex genres' to list them", genre))
}

/// Load genre names for display; a failure only costs the names.
pub async fn warm_genres(ctx: &AppContext, catalog: &dyn MovieCatalog, output: &Output) {
    if let Err(e) = ctx.session.genres().load(catalog).await {
        tracing::warn!("Genre list unavailable: {}", e);
        output.warn(format!("Genre names unavailable: {}", e.user_message()));
    }
}

pub async fn run_search(query: &str, pages: u32, filter: &FilterArgs, ctx: &mut AppContext, output: &Output) -> Result<()> {
    let query = query.trim();
    if query.is_empty() {
        output.warn("Nothing to search for. Enter a title");
        return Ok(());
    }

    ctx.session.history_mut().record(query);
    run_feed(FeedSource::Search(query.to_string()), pages, filter, ctx, output).await
}

pub async fn run_feed(source: FeedSource, pages: u32, filter: &FilterArgs, ctx: &mut AppContext, output: &Output) -> Result<()> {
    let catalog = ctx.catalog()?;
    warm_genres(ctx, &catalog, output).await;
    let filter = filter.build(ctx)?;

    let mut feed = ResultFeed::new(source, ctx.config.search.max_pages);
    let spinner = Spinner::start(format!("Loading {}...", feed.source()), output);

    for _ in 0..pages.max(1) {
        match feed.load_more(&catalog).await {
            Ok(Some(_)) => {
                spinner.set_message(format!("Loaded {} movies from {}", feed.len(), feed.source()));
            }
            Ok(None) => break,
            Err(e) if feed.is_empty() => return Err(catalog_failure(e)),
            Err(e) => {
                // Keep what was loaded; the next page can be retried later.
                output.warn(format!("Stopped after {} page(s): {}", feed.pages_loaded(), e.user_message()));
                break;
            }
        }
    }
    spinner.finish();

    let movies = filter.apply(feed.movies());
    let title = format!("{} ({} of {} results)", feed.source(), movies.len(), feed.total_results());
    print_movies(&title, &movies, ctx.session.favorites(), ctx.session.genres(), output);

    if let Some(next) = feed.next_page() {
        if output.is_human() {
            output.println(output.muted(&format!(
                "More results available: rerun with --pages {}",
                next
            )));
        }
    }
    Ok(())
}

pub async fn run_genre(genre: &str, pages: u32, filter: &FilterArgs, ctx: &mut AppContext, output: &Output) -> Result<()> {
    let catalog = ctx.catalog()?;
    warm_genres(ctx, &catalog, output).await;
    let genre_id = resolve_genre(ctx, genre)?;
    run_feed(FeedSource::Genre(genre_id), pages, filter, ctx, output).await
}

pub async fn run_genres(ctx: &AppContext, output: &Output) -> Result<()> {
    let catalog = ctx.catalog()?;
    let spinner = Spinner::start("Loading genres...", output);
    let genres = ctx.session.genres().load(&catalog).await.map_err(catalog_failure)?;
    spinner.finish();

    if !output.is_human() {
        output.json(&json!({ "genres": genres }));
        return Ok(());
    }

    let mut table = super::render::styled_table();
    table.set_header(vec!["ID", "Genre"]);
    for genre in genres {
        table.add_row(vec![genre.id.to_string(), output.accent(&genre.name)]);
    }
    output.println(table.to_string());
    Ok(())
}

/// Type-ahead lookup: the same debounced path an interactive search box uses
pub async fn run_suggest(query: &str, ctx: &AppContext, output: &Output) -> Result<()> {
    let catalog: Arc<dyn MovieCatalog> = Arc::new(ctx.catalog()?);
    let mut engine = SuggestionEngine::new(catalog, SuggestOptions::from(&ctx.config.search));

    engine.input(query);
    let suggestions = engine.settle().await;

    if let Some(error) = &suggestions.error {
        return Err(eyre!("{}", error));
    }

    if !output.is_human() {
        let titles: Vec<_> = suggestions
            .movies
            .iter()
            .map(|m| json!({ "id": m.id, "title": m.title, "year": m.year() }))
            .collect();
        output.json(&json!({ "query": suggestions.query, "suggestions": titles }));
        return Ok(());
    }

    if suggestions.movies.is_empty() {
        let min = ctx.config.search.min_suggestion_chars;
        if query.trim().chars().count() < min {
            output.info(output.muted(&format!("Type at least {} characters for suggestions", min)));
        } else {
            output.info(output.muted("No suggestions"));
        }
        return Ok(());
    }

    for movie in &suggestions.movies {
        output.println(format!(
            "{}  {} {}",
            output.muted(&format!("{:>8}", movie.id)),
            output.accent(&movie.title),
            output.muted(&format!("({})", moviedex_models::year_label(movie.release_date.as_ref())))
        ));
    }
    Ok(())
}
