use std::collections::BTreeSet;

use crate::models::TrackCandidate;

/// Songs and artists that should not come back from the generator within one
/// run: an explicit blacklist plus everything already placed in the playlist.
/// Grows monotonically; there is no removal. The set is rendered into the
/// generation prompt as an advisory hint only, never enforced as a hard
/// filter on the model's reply.
#[derive(Debug, Default)]
pub struct ExclusionSet {
    blacklisted_artists: BTreeSet<String>,
    blacklisted_songs: BTreeSet<TrackCandidate>,
    songs_in_playlist: BTreeSet<TrackCandidate>,
}

impl ExclusionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn blacklist_artist(&mut self, artist: String) {
        self.blacklisted_artists.insert(artist);
    }

    pub fn blacklist_song(&mut self, candidate: TrackCandidate) {
        self.blacklisted_songs.insert(candidate);
    }

    /// Record a candidate committed to the playlist in the current run.
    pub fn mark_placed(&mut self, candidate: TrackCandidate) {
        self.songs_in_playlist.insert(candidate);
    }

    pub fn is_artist_blacklisted(&self, artist: &str) -> bool {
        self.blacklisted_artists.contains(artist)
    }

    /// Blacklisted songs plus songs already placed, in deterministic order.
    pub fn union(&self) -> BTreeSet<&TrackCandidate> {
        self.blacklisted_songs
            .iter()
            .chain(self.songs_in_playlist.iter())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.blacklisted_songs.is_empty() && self.songs_in_playlist.is_empty()
    }

    /// Human-readable rendering of the union for prompt inclusion, or None
    /// when there is nothing to exclude.
    pub fn describe(&self) -> Option<String> {
        if self.is_empty() {
            return None;
        }
        let listed: Vec<String> = self.union().iter().map(|c| c.to_string()).collect();
        Some(listed.join(", "))
    }
}
