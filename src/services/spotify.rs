use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::error::{AppError, Result};
use crate::models::{PlaylistHandle, SpotifyCredentials};

const API_BASE: &str = "https://api.spotify.com/v1";
const TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
const AUTHORIZE_URL: &str = "https://accounts.spotify.com/authorize";

pub const SCOPES: &str =
    "user-read-playback-state user-modify-playback-state playlist-modify-private";

/// A track as the catalog reports it from search or detail lookup.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogTrack {
    pub id: String,
    pub name: String,
}

/// Entry point to the music catalog: exchanges credentials for an
/// authenticated session bound to a user identity.
#[async_trait]
pub trait Catalog: Send + Sync {
    async fn login(&self, credentials: &SpotifyCredentials) -> Result<Box<dyn CatalogSession>>;
}

/// Catalog and playlist operations on behalf of the logged-in user.
#[async_trait]
pub trait CatalogSession: Send + Sync {
    fn user_id(&self) -> &str;
    async fn playlist_names(&self) -> Result<Vec<String>>;
    async fn create_playlist(&self, name: &str) -> Result<PlaylistHandle>;
    async fn search_tracks(&self, query: &str, limit: usize) -> Result<Vec<CatalogTrack>>;
    async fn track_by_id(&self, id: &str) -> Result<CatalogTrack>;
    async fn add_track(&self, playlist_id: &str, track_id: &str) -> Result<()>;
}

#[derive(Debug, Clone, Default)]
pub struct SpotifyClient {
    client: Client,
}

pub struct SpotifySession {
    client: Client,
    access_token: String,
    user_id: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct CurrentUser {
    #[serde(default)]
    id: String,
}

#[derive(Debug, Deserialize)]
struct PlaylistPage {
    #[serde(default)]
    items: Vec<PlaylistSummary>,
    /// Full URL of the next page, absent on the last one.
    next: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PlaylistSummary {
    name: String,
}

#[derive(Debug, Deserialize)]
struct CreatedPlaylist {
    id: String,
    uri: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    tracks: TrackPage,
}

#[derive(Debug, Deserialize)]
struct TrackPage {
    #[serde(default)]
    items: Vec<CatalogTrack>,
}

impl SpotifyClient {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }
}

/// Append one listing page's names; returns the cursor for the next page.
fn take_page(names: &mut Vec<String>, page: PlaylistPage) -> Option<String> {
    names.extend(page.items.into_iter().map(|p| p.name));
    page.next
}

/// Consent URL for the authorization-code grant; visiting it (and completing
/// the redirect) yields the code a refresh token is minted from.
pub fn authorize_url(credentials: &SpotifyCredentials) -> String {
    let params = [
        ("client_id", credentials.client_id.as_str()),
        ("response_type", "code"),
        ("redirect_uri", credentials.redirect_uri.as_str()),
        ("scope", SCOPES),
    ];
    match reqwest::Url::parse_with_params(AUTHORIZE_URL, &params) {
        Ok(url) => url.into(),
        Err(_) => AUTHORIZE_URL.to_string(),
    }
}

#[async_trait]
impl Catalog for SpotifyClient {
    async fn login(&self, credentials: &SpotifyCredentials) -> Result<Box<dyn CatalogSession>> {
        let refresh_token = credentials.refresh_token.as_deref().ok_or_else(|| {
            AppError::Auth(
                "no refresh token configured; complete the /authorize grant first".to_string(),
            )
        })?;

        let response = self
            .client
            .post(TOKEN_URL)
            .basic_auth(&credentials.client_id, Some(&credentials.client_secret))
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
            ])
            .send()
            .await
            .map_err(|e| AppError::Spotify(format!("Token request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Auth(format!(
                "token endpoint returned {}: {}",
                status, body
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| AppError::Spotify(format!("Failed to parse token response: {}", e)))?;

        // A session is only valid once it is bound to a concrete user.
        let user: CurrentUser = self
            .client
            .get(format!("{}/me", API_BASE))
            .bearer_auth(&token.access_token)
            .send()
            .await
            .map_err(|e| AppError::Spotify(format!("Request failed: {}", e)))?
            .json()
            .await
            .map_err(|e| AppError::Spotify(format!("Failed to parse user profile: {}", e)))?;

        if user.id.is_empty() {
            return Err(AppError::Auth(
                "login did not yield a user identity".to_string(),
            ));
        }

        debug!("Logged in to Spotify as {}", user.id);

        Ok(Box::new(SpotifySession {
            client: self.client.clone(),
            access_token: token.access_token,
            user_id: user.id,
        }))
    }
}

impl SpotifySession {
    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        let response = self
            .client
            .get(url)
            .query(query)
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(|e| AppError::Spotify(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Spotify(format!(
                "API returned status: {} - {}",
                status, body
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::Spotify(format!("Failed to parse response: {}", e)))
    }
}

#[async_trait]
impl CatalogSession for SpotifySession {
    fn user_id(&self) -> &str {
        &self.user_id
    }

    async fn playlist_names(&self) -> Result<Vec<String>> {
        // The listing is paged at 50; walk every page so the name-collision
        // check sees the whole library.
        let mut names = Vec::new();
        let mut url = format!("{}/users/{}/playlists?limit=50", API_BASE, self.user_id);
        loop {
            let page: PlaylistPage = self.get_json(&url, &[]).await?;
            match take_page(&mut names, page) {
                Some(next) => url = next,
                None => break,
            }
        }
        Ok(names)
    }

    async fn create_playlist(&self, name: &str) -> Result<PlaylistHandle> {
        let url = format!("{}/users/{}/playlists", API_BASE, self.user_id);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(&serde_json::json!({
                "name": name,
                "public": false,
            }))
            .send()
            .await
            .map_err(|e| AppError::Spotify(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Spotify(format!(
                "playlist creation returned {}: {}",
                status, body
            )));
        }

        let created: CreatedPlaylist = response
            .json()
            .await
            .map_err(|e| AppError::Spotify(format!("Failed to parse playlist: {}", e)))?;

        debug!("Created playlist {} ({})", created.name, created.id);

        Ok(PlaylistHandle {
            id: created.id,
            uri: created.uri,
            name: created.name,
        })
    }

    async fn search_tracks(&self, query: &str, limit: usize) -> Result<Vec<CatalogTrack>> {
        let url = format!("{}/search", API_BASE);
        let limit = limit.to_string();
        debug!("Searching catalog for: {}", query);
        let found: SearchResponse = self
            .get_json(&url, &[("q", query), ("type", "track"), ("limit", &limit)])
            .await?;
        Ok(found.tracks.items)
    }

    async fn track_by_id(&self, id: &str) -> Result<CatalogTrack> {
        let url = format!("{}/tracks/{}", API_BASE, id);
        self.get_json(&url, &[]).await
    }

    async fn add_track(&self, playlist_id: &str, track_id: &str) -> Result<()> {
        let url = format!("{}/playlists/{}/tracks", API_BASE, playlist_id);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(&serde_json::json!({
                "uris": [format!("spotify:track:{}", track_id)],
            }))
            .send()
            .await
            .map_err(|e| AppError::Spotify(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Spotify(format!(
                "add-track returned {}: {}",
                status, body
            )));
        }

        Ok(())
    }
}
