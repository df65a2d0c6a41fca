use tracing::debug;

use crate::error::{AppError, Result};
use crate::models::{ResolvedTrack, TrackCandidate};
use crate::services::spotify::CatalogSession;

/// How many search hits to ask the catalog for. The first hit wins; the
/// window only exists so the catalog's own ranking has room to work with.
const SEARCH_LIMIT: usize = 10;

/// Resolves generator candidates to concrete catalog track identifiers.
pub struct CatalogResolver<'a> {
    session: &'a dyn CatalogSession,
}

impl<'a> CatalogResolver<'a> {
    pub fn new(session: &'a dyn CatalogSession) -> Self {
        Self { session }
    }

    /// Best-effort match: free-text search on "{artist} {song}", take the
    /// first hit, then re-fetch by id so the identifier we return is the
    /// canonical one from the track detail endpoint.
    pub async fn resolve(&self, candidate: &TrackCandidate) -> Result<ResolvedTrack> {
        let query = format!("{} {}", candidate.artist, candidate.song);
        let hits = self.session.search_tracks(&query, SEARCH_LIMIT).await?;

        let first = hits
            .into_iter()
            .next()
            .ok_or_else(|| AppError::NotFound(format!("no catalog match for {}", candidate)))?;

        let track = self.session.track_by_id(&first.id).await?;
        debug!("Resolved {} to track {}", candidate, track.id);

        Ok(ResolvedTrack {
            catalog_track_id: track.id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PlaylistHandle;
    use crate::services::spotify::CatalogTrack;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Session whose search returns a fixed hit list and which counts
    /// detail lookups.
    struct StubSession {
        hits: Vec<CatalogTrack>,
        detail_lookups: AtomicUsize,
    }

    impl StubSession {
        fn with_hits(hits: Vec<CatalogTrack>) -> Self {
            Self {
                hits,
                detail_lookups: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl CatalogSession for StubSession {
        fn user_id(&self) -> &str {
            "user"
        }

        async fn playlist_names(&self) -> Result<Vec<String>> {
            Ok(Vec::new())
        }

        async fn create_playlist(&self, name: &str) -> Result<PlaylistHandle> {
            Ok(PlaylistHandle {
                id: "p1".to_string(),
                uri: "spotify:playlist:p1".to_string(),
                name: name.to_string(),
            })
        }

        async fn search_tracks(&self, _query: &str, _limit: usize) -> Result<Vec<CatalogTrack>> {
            Ok(self.hits.clone())
        }

        async fn track_by_id(&self, id: &str) -> Result<CatalogTrack> {
            self.detail_lookups.fetch_add(1, Ordering::SeqCst);
            Ok(CatalogTrack {
                id: id.to_string(),
                name: "whatever".to_string(),
            })
        }

        async fn add_track(&self, _playlist_id: &str, _track_id: &str) -> Result<()> {
            Ok(())
        }
    }

    fn candidate() -> TrackCandidate {
        TrackCandidate {
            song: "Hotel California".to_string(),
            artist: "Eagles".to_string(),
        }
    }

    #[tokio::test]
    async fn resolves_first_hit_through_detail_lookup() {
        let session = StubSession::with_hits(vec![
            CatalogTrack {
                id: "first".to_string(),
                name: "Hotel California".to_string(),
            },
            CatalogTrack {
                id: "second".to_string(),
                name: "Hotel California - Live".to_string(),
            },
        ]);

        let resolver = CatalogResolver::new(&session);
        let resolved = resolver.resolve(&candidate()).await.unwrap();

        assert_eq!(resolved.catalog_track_id, "first");
        assert_eq!(session.detail_lookups.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn empty_search_is_not_found() {
        let session = StubSession::with_hits(Vec::new());
        let resolver = CatalogResolver::new(&session);

        let err = resolver.resolve(&candidate()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(session.detail_lookups.load(Ordering::SeqCst), 0);
    }
}
