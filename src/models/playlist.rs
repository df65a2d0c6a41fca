use serde::{Deserialize, Serialize};
use std::fmt;

/// OAuth client configuration for the Spotify Web API, sourced from the
/// process environment by the bootstrap layer and passed in explicitly.
#[derive(Debug, Clone)]
pub struct SpotifyCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub refresh_token: Option<String>,
}

/// One playlist-generation job. Immutable once constructed.
#[derive(Debug, Clone)]
pub struct PlaylistRequest {
    pub prompt: String,
    pub length: usize,
    pub name: String,
    pub credentials: SpotifyCredentials,
}

pub const DEFAULT_PLAYLIST_LENGTH: usize = 10;

impl PlaylistRequest {
    /// Length defaults to 10 and the name defaults to the prompt itself,
    /// matching the form's optional fields.
    pub fn new(
        prompt: String,
        length: Option<usize>,
        name: Option<String>,
        credentials: SpotifyCredentials,
    ) -> Self {
        let name = name.filter(|n| !n.trim().is_empty()).unwrap_or_else(|| prompt.clone());
        Self {
            prompt,
            length: length.unwrap_or(DEFAULT_PLAYLIST_LENGTH),
            name,
            credentials,
        }
    }
}

/// A (song, artist) pair suggested by the generator, not yet verified to
/// exist in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TrackCandidate {
    pub song: String,
    pub artist: String,
}

impl fmt::Display for TrackCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\" by {}", self.song, self.artist)
    }
}

/// A candidate matched to a concrete catalog track identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTrack {
    pub catalog_track_id: String,
}

/// The playlist created for one workflow run. Owned by that run; never
/// reused across requests.
#[derive(Debug, Clone, Serialize)]
pub struct PlaylistHandle {
    pub id: String,
    pub uri: String,
    pub name: String,
}
