pub mod pages;
pub mod playlist;

pub use playlist::{playlist_routes, AppState};
