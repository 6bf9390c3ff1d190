use crate::error::CatalogError;
use moviedex_config::ApiCredentials;
use moviedex_models::{
    CastMember, CrewMember, Genre, Movie, MovieDetails, MovieList, MoviePage, ReleaseDate,
    TimeWindow, MAX_PAGES,
};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

/// Cast entries kept on a details record
const CAST_LIMIT: usize = 10;

/// Crew jobs worth showing on a details page
const CREW_JOBS: [&str; 4] = ["Director", "Writer", "Screenplay", "Story"];

#[derive(Debug, Deserialize)]
pub(crate) struct TmdbMovie {
    id: u64,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    overview: Option<String>,
    #[serde(default)]
    release_date: Option<String>,
    #[serde(default)]
    vote_average: Option<f32>,
    #[serde(default)]
    genre_ids: Option<Vec<u32>>,
    #[serde(default)]
    poster_path: Option<String>,
    #[serde(default)]
    backdrop_path: Option<String>,
    #[serde(default)]
    adult: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TmdbPage {
    #[serde(default = "first_page")]
    page: u32,
    #[serde(default)]
    total_pages: u32,
    #[serde(default)]
    total_results: u64,
    #[serde(default)]
    results: Vec<TmdbMovie>,
}

#[derive(Debug, Deserialize)]
struct TmdbGenreList {
    genres: Vec<Genre>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TmdbDetails {
    #[serde(flatten)]
    movie: TmdbMovie,
    #[serde(default)]
    genres: Vec<Genre>,
    #[serde(default)]
    runtime: Option<u32>,
    #[serde(default)]
    tagline: Option<String>,
    #[serde(default)]
    videos: Option<TmdbVideos>,
    #[serde(default)]
    credits: Option<TmdbCredits>,
    #[serde(default)]
    similar: Option<TmdbPage>,
}

#[derive(Debug, Deserialize)]
struct TmdbVideos {
    #[serde(default)]
    results: Vec<TmdbVideo>,
}

#[derive(Debug, Deserialize)]
struct TmdbVideo {
    key: String,
    #[serde(default)]
    site: String,
    #[serde(rename = "type", default)]
    video_type: String,
}

#[derive(Debug, Deserialize)]
struct TmdbCredits {
    #[serde(default)]
    cast: Vec<TmdbCast>,
    #[serde(default)]
    crew: Vec<TmdbCrew>,
}

#[derive(Debug, Deserialize)]
struct TmdbCast {
    id: u64,
    name: String,
    #[serde(default)]
    character: Option<String>,
    #[serde(default)]
    profile_path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TmdbCrew {
    id: u64,
    name: String,
    #[serde(default)]
    job: String,
    #[serde(default)]
    profile_path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TmdbErrorBody {
    #[serde(default)]
    status_message: Option<String>,
}

fn first_page() -> u32 {
    1
}

/// Everything a request needs besides its path and parameters.
pub struct ApiContext<'a> {
    pub client: &'a Client,
    pub base_url: &'a str,
    pub credentials: &'a ApiCredentials,
    pub language: Option<&'a str>,
}

/// Clamp a requested page into the range upstream will serve
pub fn clamp_page(page: u32) -> u32 {
    page.clamp(1, MAX_PAGES)
}

pub(crate) fn normalize_movie(raw: TmdbMovie) -> Movie {
    Movie {
        id: raw.id,
        title: raw
            .title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| "Untitled".to_string()),
        overview: raw.overview.unwrap_or_default(),
        release_date: raw.release_date.as_deref().and_then(ReleaseDate::parse),
        rating: raw.vote_average.unwrap_or(0.0).clamp(0.0, 10.0),
        genre_ids: raw.genre_ids.unwrap_or_default(),
        poster_path: raw.poster_path.filter(|p| !p.is_empty()),
        backdrop_path: raw.backdrop_path.filter(|p| !p.is_empty()),
        adult: raw.adult.unwrap_or(false),
    }
}

pub(crate) fn normalize_page(raw: TmdbPage) -> MoviePage {
    MoviePage {
        page: raw.page,
        total_pages: raw.total_pages.min(MAX_PAGES),
        total_results: raw.total_results,
        results: raw.results.into_iter().map(normalize_movie).collect(),
    }
}

pub(crate) fn normalize_details(raw: TmdbDetails) -> MovieDetails {
    let mut movie = normalize_movie(raw.movie);
    if movie.genre_ids.is_empty() {
        movie.genre_ids = raw.genres.iter().map(|g| g.id).collect();
    }

    let trailer = raw.videos.and_then(|videos| {
        videos
            .results
            .into_iter()
            .find(|v| v.video_type == "Trailer" && v.site == "YouTube")
            .map(|v| v.key)
    });

    let (cast, crew) = match raw.credits {
        Some(credits) => (
            credits
                .cast
                .into_iter()
                .take(CAST_LIMIT)
                .map(|c| CastMember {
                    id: c.id,
                    name: c.name,
                    character: c.character.unwrap_or_default(),
                    profile_path: c.profile_path,
                })
                .collect(),
            credits
                .crew
                .into_iter()
                .filter(|c| CREW_JOBS.contains(&c.job.as_str()))
                .map(|c| CrewMember {
                    id: c.id,
                    name: c.name,
                    job: c.job,
                    profile_path: c.profile_path,
                })
                .collect(),
        ),
        None => (Vec::new(), Vec::new()),
    };

    MovieDetails {
        movie,
        genres: raw.genres,
        runtime: raw.runtime.filter(|r| *r > 0),
        tagline: raw.tagline.filter(|t| !t.trim().is_empty()),
        cast,
        crew,
        trailer,
        similar: raw
            .similar
            .map(|page| page.results.into_iter().map(normalize_movie).collect())
            .unwrap_or_default(),
    }
}

fn upstream_error(status: StatusCode, body: &str) -> CatalogError {
    let message = serde_json::from_str::<TmdbErrorBody>(body)
        .ok()
        .and_then(|b| b.status_message)
        .or_else(|| status.canonical_reason().map(str::to_string))
        .unwrap_or_default();
    CatalogError::upstream(status.as_u16(), message)
}

fn is_transient(error: &reqwest::Error) -> bool {
    error.is_connect() || error.is_timeout()
}

/// Send once, and once more if the first attempt never reached the server
async fn send_with_retry(request: RequestBuilder) -> Result<Response, CatalogError> {
    let retry = request.try_clone();
    match (request.send().await, retry) {
        (Ok(response), _) => Ok(response),
        (Err(e), Some(retry)) if is_transient(&e) => {
            warn!("Catalog request failed ({}), retrying once", CatalogError::from(e));
            Ok(retry.send().await?)
        }
        (Err(e), _) => Err(e.into()),
    }
}

async fn get_json<T: DeserializeOwned>(
    ctx: &ApiContext<'_>,
    path: &str,
    params: &[(&str, String)],
) -> Result<T, CatalogError> {
    let url = format!("{}{}", ctx.base_url.trim_end_matches('/'), path);

    let mut request = ctx
        .client
        .get(&url)
        .header("Accept", "application/json")
        .query(params);
    if let Some(language) = ctx.language {
        request = request.query(&[("language", language)]);
    }
    request = match ctx.credentials {
        ApiCredentials::AccessToken(token) => request.bearer_auth(token),
        ApiCredentials::ApiKey(key) => request.query(&[("api_key", key.as_str())]),
    };

    debug!("GET {} {:?}", path, params);
    let response = send_with_retry(request).await?;
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(upstream_error(status, &body));
    }

    serde_json::from_str(&body).map_err(|e| CatalogError::Decode(format!("{}: {}", path, e)))
}

async fn get_page(
    ctx: &ApiContext<'_>,
    path: &str,
    mut params: Vec<(&str, String)>,
    page: u32,
) -> Result<MoviePage, CatalogError> {
    params.push(("page", clamp_page(page).to_string()));
    let raw: TmdbPage = get_json(ctx, path, &params).await?;
    Ok(normalize_page(raw))
}

/// Search movies by title
pub async fn search_movies(ctx: &ApiContext<'_>, query: &str, page: u32) -> Result<MoviePage, CatalogError> {
    let query = query.trim();
    if query.is_empty() {
        debug!("Empty search query, skipping request");
        return Ok(MoviePage::empty());
    }

    let params = vec![
        ("query", query.to_string()),
        ("include_adult", "false".to_string()),
    ];
    get_page(ctx, "/search/movie", params, page).await
}

pub async fn get_trending(ctx: &ApiContext<'_>, window: TimeWindow, page: u32) -> Result<MoviePage, CatalogError> {
    let path = format!("/trending/movie/{}", window.as_str());
    get_page(ctx, &path, Vec::new(), page).await
}

pub async fn get_movie_details(ctx: &ApiContext<'_>, movie_id: u64) -> Result<MovieDetails, CatalogError> {
    let path = format!("/movie/{}", movie_id);
    let params = [("append_to_response", "videos,credits,similar".to_string())];
    let raw: TmdbDetails = get_json(ctx, &path, &params).await?;
    Ok(normalize_details(raw))
}

pub async fn get_genres(ctx: &ApiContext<'_>) -> Result<Vec<Genre>, CatalogError> {
    let list: TmdbGenreList = get_json(ctx, "/genre/movie/list", &[]).await?;
    Ok(list.genres)
}

pub async fn get_recommendations(ctx: &ApiContext<'_>, movie_id: u64, page: u32) -> Result<MoviePage, CatalogError> {
    let path = format!("/movie/{}/recommendations", movie_id);
    get_page(ctx, &path, Vec::new(), page).await
}

pub async fn get_list(ctx: &ApiContext<'_>, list: MovieList, page: u32) -> Result<MoviePage, CatalogError> {
    let path = format!("/movie/{}", list.as_str());
    get_page(ctx, &path, Vec::new(), page).await
}

pub async fn discover_by_genre(ctx: &ApiContext<'_>, genre_id: u32, page: u32) -> Result<MoviePage, CatalogError> {
    let params = vec![
        ("with_genres", genre_id.to_string()),
        ("sort_by", "popularity.desc".to_string()),
        ("include_adult", "false".to_string()),
    ];
    get_page(ctx, "/discover/movie", params, page).await
}
