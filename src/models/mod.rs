pub mod exclusions;
pub mod playlist;

pub use exclusions::ExclusionSet;
pub use playlist::{
    PlaylistHandle, PlaylistRequest, ResolvedTrack, SpotifyCredentials, TrackCandidate,
};
