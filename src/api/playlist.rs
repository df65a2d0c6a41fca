use axum::{
    extract::State,
    response::{Html, Redirect},
    routing::get,
    Form, Router,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::api::pages;
use crate::config::Config;
use crate::error::{AppError, Result};
use crate::models::{PlaylistRequest, SpotifyCredentials};
use crate::services::{spotify, PlaylistAssembler};

pub struct AppState {
    pub config: Config,
    pub assembler: PlaylistAssembler,
}

pub fn playlist_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(landing))
        .route("/playlist", get(playlist_form).post(create_playlist))
        .route("/authorize", get(authorize))
}

async fn landing() -> Html<&'static str> {
    Html(pages::LANDING)
}

async fn playlist_form() -> Html<&'static str> {
    Html(pages::PLAYLIST_FORM)
}

/// Field names match the original form exactly.
#[derive(Debug, Deserialize)]
struct PlaylistForm {
    #[serde(rename = "Prompt")]
    prompt: String,
    #[serde(rename = "Length", default)]
    length: String,
    #[serde(rename = "Name", default)]
    name: String,
}

async fn create_playlist(
    State(state): State<Arc<AppState>>,
    Form(form): Form<PlaylistForm>,
) -> Result<Html<String>> {
    let prompt = form.prompt.trim().to_string();
    if prompt.is_empty() {
        return Err(AppError::Validation("prompt must not be empty".to_string()));
    }

    let length = parse_length(&form.length)?;
    let name = Some(form.name).filter(|n| !n.trim().is_empty());

    let request = PlaylistRequest::new(prompt, length, name, credentials_from(&state.config));
    let handle = state.assembler.assemble(&request).await?;

    Ok(Html(pages::playlist_created(&playlist_url(&handle.uri))))
}

/// Redirect to the Spotify consent screen, for minting a refresh token.
async fn authorize(State(state): State<Arc<AppState>>) -> Redirect {
    let url = spotify::authorize_url(&credentials_from(&state.config));
    Redirect::temporary(&url)
}

fn credentials_from(config: &Config) -> SpotifyCredentials {
    SpotifyCredentials {
        client_id: config.spotify_client_id.clone(),
        client_secret: config.spotify_client_secret.clone(),
        redirect_uri: config.spotify_redirect_uri.clone(),
        refresh_token: config.spotify_refresh_token.clone(),
    }
}

/// Longest playlist the form accepts. Keeps the generator's token headroom
/// well inside range and matches what a single prompt can sensibly fill.
const MAX_PLAYLIST_LENGTH: usize = 100;

/// The form submits length as text; empty means "use the default".
fn parse_length(raw: &str) -> Result<Option<usize>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    let length: usize = raw
        .parse()
        .map_err(|_| AppError::Validation(format!("length must be a number, got {:?}", raw)))?;
    if length == 0 {
        return Err(AppError::Validation("length must be positive".to_string()));
    }
    if length > MAX_PLAYLIST_LENGTH {
        return Err(AppError::Validation(format!(
            "length must be at most {}",
            MAX_PLAYLIST_LENGTH
        )));
    }
    Ok(Some(length))
}

/// Public share link: the playlist id is the last colon-delimited segment of
/// the playlist URI (`spotify:playlist:{id}`).
pub fn playlist_url(uri: &str) -> String {
    let id = uri.rsplit(':').next().unwrap_or(uri);
    format!("https://open.spotify.com/playlist/{}", id)
}
