pub mod movie;
pub mod details;
pub mod genre;
pub mod release;
pub mod theme;
pub mod user;

pub use movie::{Movie, MoviePage, TimeWindow, MovieList, MAX_PAGES};
pub use details::{CastMember, CrewMember, MovieDetails};
pub use genre::Genre;
pub use release::{format_runtime, year_label, ReleaseDate};
pub use theme::{hex_to_rgb, Palette, ThemeMode};
pub use user::User;
