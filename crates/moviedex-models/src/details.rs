use serde::{Deserialize, Serialize};
use crate::genre::Genre;
use crate::movie::Movie;

/// Expanded view of a single movie: the list entry plus resolved genres,
/// credits, trailer and similar titles.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieDetails {
    pub movie: Movie,
    pub genres: Vec<Genre>,
    pub runtime: Option<u32>,
    pub tagline: Option<String>,
    pub cast: Vec<CastMember>,
    pub crew: Vec<CrewMember>,
    /// YouTube video key of the first published trailer
    pub trailer: Option<String>,
    #[serde(default)]
    pub similar: Vec<Movie>,
}

impl MovieDetails {
    pub fn trailer_url(&self) -> Option<String> {
        self.trailer
            .as_ref()
            .map(|key| format!("https://www.youtube.com/watch?v={}", key))
    }

    pub fn directors(&self) -> impl Iterator<Item = &CrewMember> {
        self.crew.iter().filter(|member| member.job == "Director")
    }

    pub fn genre_names(&self) -> Vec<&str> {
        self.genres.iter().map(|g| g.name.as_str()).collect()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CastMember {
    pub id: u64,
    pub name: String,
    pub character: String,
    pub profile_path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CrewMember {
    pub id: u64,
    pub name: String,
    pub job: String,
    pub profile_path: Option<String>,
}
