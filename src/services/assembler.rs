use std::collections::HashSet;
use std::sync::Arc;

use tracing::info;

use crate::error::Result;
use crate::models::{ExclusionSet, PlaylistHandle, PlaylistRequest};
use crate::services::generator::CandidateSource;
use crate::services::resolver::CatalogResolver;
use crate::services::spotify::Catalog;

/// Orchestrates one playlist run: login, pick a unique name, create the
/// playlist, generate candidates, resolve and add each one in order.
pub struct PlaylistAssembler {
    catalog: Arc<dyn Catalog>,
    generator: Arc<dyn CandidateSource>,
}

/// Pick a display name not already taken (case-insensitively) among the
/// user's playlists: `_{base}`, then `_{base} 2`, `_{base} 3`, ...
/// Pure function of its inputs.
pub fn unique_playlist_name(existing: &[String], base: &str) -> String {
    let taken: HashSet<String> = existing.iter().map(|n| n.to_lowercase()).collect();

    let base = format!("_{}", base);
    if !taken.contains(&base.to_lowercase()) {
        return base;
    }

    let mut suffix = 2;
    loop {
        let candidate = format!("{} {}", base, suffix);
        if !taken.contains(&candidate.to_lowercase()) {
            return candidate;
        }
        suffix += 1;
    }
}

impl PlaylistAssembler {
    pub fn new(catalog: Arc<dyn Catalog>, generator: Arc<dyn CandidateSource>) -> Self {
        Self { catalog, generator }
    }

    /// Runs the whole workflow and returns a handle to the created playlist.
    ///
    /// The playlist is created before any track is resolved; a failure while
    /// resolving or adding tracks aborts the run but leaves the playlist (and
    /// any tracks added so far) in place on the service.
    pub async fn assemble(&self, request: &PlaylistRequest) -> Result<PlaylistHandle> {
        let session = self.catalog.login(&request.credentials).await?;
        info!(
            "Assembling \"{}\" ({} tracks) for user {}",
            request.name,
            request.length,
            session.user_id()
        );

        let existing = session.playlist_names().await?;
        let name = unique_playlist_name(&existing, &request.name);

        let handle = session.create_playlist(&name).await?;

        let mut exclusions = ExclusionSet::new();
        let candidates = self
            .generator
            .generate(&request.prompt, request.length, &exclusions)
            .await?;
        info!("Generator produced {} candidates", candidates.len());

        let resolver = CatalogResolver::new(session.as_ref());
        for candidate in candidates {
            let resolved = resolver.resolve(&candidate).await?;
            session
                .add_track(&handle.id, &resolved.catalog_track_id)
                .await?;
            exclusions.mark_placed(candidate);
        }

        info!("Playlist \"{}\" assembled ({})", handle.name, handle.uri);
        Ok(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::{SpotifyCredentials, TrackCandidate};
    use crate::services::spotify::{CatalogSession, CatalogTrack};
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct CatalogState {
        existing_names: Vec<String>,
        // search queries that return zero hits
        missing: HashSet<String>,
        created: Vec<String>,
        added: Vec<String>,
    }

    struct FakeCatalog {
        state: Arc<Mutex<CatalogState>>,
        fail_login: bool,
    }

    struct FakeSession {
        state: Arc<Mutex<CatalogState>>,
    }

    #[async_trait]
    impl Catalog for FakeCatalog {
        async fn login(&self, _credentials: &SpotifyCredentials) -> Result<Box<dyn CatalogSession>> {
            if self.fail_login {
                return Err(AppError::Auth("login did not yield a user identity".into()));
            }
            Ok(Box::new(FakeSession {
                state: self.state.clone(),
            }))
        }
    }

    #[async_trait]
    impl CatalogSession for FakeSession {
        fn user_id(&self) -> &str {
            "listener"
        }

        async fn playlist_names(&self) -> Result<Vec<String>> {
            Ok(self.state.lock().unwrap().existing_names.clone())
        }

        async fn create_playlist(&self, name: &str) -> Result<PlaylistHandle> {
            self.state.lock().unwrap().created.push(name.to_string());
            Ok(PlaylistHandle {
                id: "pl-1".to_string(),
                uri: "spotify:playlist:pl-1".to_string(),
                name: name.to_string(),
            })
        }

        async fn search_tracks(&self, query: &str, _limit: usize) -> Result<Vec<CatalogTrack>> {
            if self.state.lock().unwrap().missing.contains(query) {
                return Ok(Vec::new());
            }
            Ok(vec![CatalogTrack {
                id: format!("track:{}", query),
                name: query.to_string(),
            }])
        }

        async fn track_by_id(&self, id: &str) -> Result<CatalogTrack> {
            Ok(CatalogTrack {
                id: id.to_string(),
                name: String::new(),
            })
        }

        async fn add_track(&self, _playlist_id: &str, track_id: &str) -> Result<()> {
            self.state.lock().unwrap().added.push(track_id.to_string());
            Ok(())
        }
    }

    struct FakeGenerator {
        candidates: Vec<TrackCandidate>,
    }

    #[async_trait]
    impl CandidateSource for FakeGenerator {
        async fn generate(
            &self,
            _prompt: &str,
            _count: usize,
            _exclusions: &ExclusionSet,
        ) -> Result<Vec<TrackCandidate>> {
            Ok(self.candidates.clone())
        }
    }

    fn candidate(n: usize) -> TrackCandidate {
        TrackCandidate {
            song: format!("Song {}", n),
            artist: format!("Artist {}", n),
        }
    }

    fn workout_request() -> PlaylistRequest {
        PlaylistRequest::new(
            "upbeat workout songs".to_string(),
            Some(5),
            Some("Workout".to_string()),
            SpotifyCredentials {
                client_id: "id".to_string(),
                client_secret: "secret".to_string(),
                redirect_uri: "http://localhost/callback".to_string(),
                refresh_token: Some("token".to_string()),
            },
        )
    }

    fn assembler(
        state: Arc<Mutex<CatalogState>>,
        candidates: Vec<TrackCandidate>,
    ) -> PlaylistAssembler {
        PlaylistAssembler::new(
            Arc::new(FakeCatalog {
                state,
                fail_login: false,
            }),
            Arc::new(FakeGenerator { candidates }),
        )
    }

    #[test]
    fn unique_name_prefixes_underscore() {
        let existing = vec!["Chill".to_string()];
        assert_eq!(unique_playlist_name(&existing, "Workout"), "_Workout");
    }

    #[test]
    fn unique_name_collision_is_case_insensitive() {
        let existing = vec!["_workout".to_string()];
        assert_eq!(unique_playlist_name(&existing, "Workout"), "_Workout 2");
    }

    #[test]
    fn unique_name_skips_taken_suffixes() {
        let existing = vec!["_Workout".to_string(), "_workout 2".to_string()];
        assert_eq!(unique_playlist_name(&existing, "Workout"), "_Workout 3");
    }

    #[test]
    fn unique_name_is_idempotent_and_does_not_mutate_input() {
        let existing = vec!["_Workout".to_string()];
        let first = unique_playlist_name(&existing, "Workout");
        let second = unique_playlist_name(&existing, "Workout");
        assert_eq!(first, second);
        assert_eq!(existing, vec!["_Workout".to_string()]);
    }

    #[tokio::test]
    async fn assembles_five_tracks_into_fresh_playlist() {
        let state = Arc::new(Mutex::new(CatalogState::default()));
        let assembler = assembler(state.clone(), (1..=5).map(candidate).collect());

        let handle = assembler.assemble(&workout_request()).await.unwrap();

        assert_eq!(handle.name, "_Workout");
        let state = state.lock().unwrap();
        assert_eq!(state.created, vec!["_Workout".to_string()]);
        assert_eq!(state.added.len(), 5);
        // Tracks land in generation order.
        assert_eq!(state.added[0], "track:Artist 1 Song 1");
        assert_eq!(state.added[4], "track:Artist 5 Song 5");
    }

    #[tokio::test]
    async fn case_variant_collision_gets_numeric_suffix() {
        let state = Arc::new(Mutex::new(CatalogState {
            existing_names: vec!["_workout".to_string()],
            ..Default::default()
        }));
        let assembler = assembler(state.clone(), (1..=5).map(candidate).collect());

        let handle = assembler.assemble(&workout_request()).await.unwrap();

        assert_eq!(handle.name, "_Workout 2");
        assert_eq!(state.lock().unwrap().created, vec!["_Workout 2".to_string()]);
    }

    #[tokio::test]
    async fn empty_generation_still_creates_the_playlist() {
        let state = Arc::new(Mutex::new(CatalogState::default()));
        let assembler = assembler(state.clone(), Vec::new());

        let handle = assembler.assemble(&workout_request()).await.unwrap();

        assert_eq!(handle.name, "_Workout");
        let state = state.lock().unwrap();
        assert_eq!(state.created.len(), 1);
        assert!(state.added.is_empty());
    }

    #[tokio::test]
    async fn unresolvable_candidate_aborts_after_earlier_adds() {
        let state = Arc::new(Mutex::new(CatalogState {
            missing: HashSet::from(["Artist 3 Song 3".to_string()]),
            ..Default::default()
        }));
        let assembler = assembler(state.clone(), (1..=5).map(candidate).collect());

        let err = assembler.assemble(&workout_request()).await.unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
        let state = state.lock().unwrap();
        // The playlist exists and keeps the two tracks added before the failure.
        assert_eq!(state.created.len(), 1);
        assert_eq!(state.added.len(), 2);
    }

    #[tokio::test]
    async fn login_failure_creates_nothing() {
        let state = Arc::new(Mutex::new(CatalogState::default()));
        let assembler = PlaylistAssembler::new(
            Arc::new(FakeCatalog {
                state: state.clone(),
                fail_login: true,
            }),
            Arc::new(FakeGenerator {
                candidates: vec![candidate(1)],
            }),
        );

        let err = assembler.assemble(&workout_request()).await.unwrap_err();

        assert!(matches!(err, AppError::Auth(_)));
        assert!(state.lock().unwrap().created.is_empty());
    }
}
