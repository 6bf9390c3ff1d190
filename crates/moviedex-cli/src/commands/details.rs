use super::progress::Spinner;
use super::render::{rating_label, styled_table};
use crate::context::{catalog_failure, AppContext};
use crate::output::Output;
use color_eyre::Result;
use moviedex_catalog::MovieCatalog;
use moviedex_models::{format_runtime, year_label};
use serde_json::json;

const CAST_SHOWN: usize = 10;

pub async fn run_details(movie_id: u64, ctx: &mut AppContext, output: &Output) -> Result<()> {
    let catalog = ctx.catalog()?;
    let spinner = Spinner::start(format!("Loading movie {}...", movie_id), output);
    let details = catalog.details(movie_id).await.map_err(catalog_failure)?;
    spinner.finish();

    ctx.session.favorites_mut().set_last_searched(details.movie.clone());
    let favorite = ctx.session.favorites().is_favorite(movie_id);
    let images = catalog.images();

    if !output.is_human() {
        let mut value = serde_json::to_value(&details)?;
        value["favorite"] = json!(favorite);
        value["poster_url"] = json!(images.poster(details.movie.poster_path.as_deref()));
        value["trailer_url"] = json!(details.trailer_url());
        output.json(&value);
        return Ok(());
    }

    let movie = &details.movie;
    let heart = if favorite { output.highlight(" ♥") } else { String::new() };
    output.println(format!(
        "\n{} {}{}",
        output.heading(&movie.title),
        output.muted(&format!("({})", year_label(movie.release_date.as_ref()))),
        heart
    ));
    if let Some(tagline) = details.tagline.as_deref().filter(|t| !t.is_empty()) {
        output.println(output.muted(&format!("\"{}\"", tagline)));
    }

    let mut facts = styled_table();
    facts.add_row(vec!["Released".to_string(), movie.release_date.as_ref().map_or("Unknown".to_string(), |d| d.format_long())]);
    facts.add_row(vec!["Runtime".to_string(), format_runtime(details.runtime)]);
    facts.add_row(vec!["Rating".to_string(), format!("{} / 10", rating_label(movie.rating))]);
    facts.add_row(vec!["Genres".to_string(), details.genre_names().join(", ")]);
    let directors: Vec<&str> = details.directors().map(|d| d.name.as_str()).collect();
    if !directors.is_empty() {
        facts.add_row(vec!["Director".to_string(), directors.join(", ")]);
    }
    if let Some(url) = details.trailer_url() {
        facts.add_row(vec!["Trailer".to_string(), url]);
    }
    if let Some(url) = images.poster(movie.poster_path.as_deref()) {
        facts.add_row(vec!["Poster".to_string(), url]);
    }
    output.println(facts.to_string());

    if !movie.overview.is_empty() {
        output.println(format!("\n{}", movie.overview));
    }

    if !details.cast.is_empty() {
        output.println(format!("\n{}", output.heading("Cast")));
        let mut cast = styled_table();
        cast.set_header(vec!["Name", "Character"]);
        for member in details.cast.iter().take(CAST_SHOWN) {
            cast.add_row(vec![output.accent(&member.name), member.character.clone()]);
        }
        output.println(cast.to_string());
    }

    let writers: Vec<String> = details
        .crew
        .iter()
        .filter(|c| c.job != "Director")
        .map(|c| format!("{} ({})", c.name, c.job))
        .collect();
    if !writers.is_empty() {
        output.println(format!("\n{} {}", output.heading("Written by"), writers.join(", ")));
    }

    if !details.similar.is_empty() {
        let titles: Vec<String> = details
            .similar
            .iter()
            .take(5)
            .map(|m| format!("{} [{}]", m.title, m.id))
            .collect();
        output.println(format!("\n{} {}", output.heading("Similar"), output.muted(&titles.join(" · "))));
    }
    Ok(())
}
