use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::insight::Insight;

static NEXT_TRACK_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque identity of a track, unique for the lifetime of the process.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrackId(u64);

impl TrackId {
    /// Allocate the next id. Ingestion is the only caller.
    pub fn next() -> Self {
        Self(NEXT_TRACK_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// A single library entry. Identity fields are immutable after ingestion;
/// `duration` and `insight` are back-filled asynchronously via
/// [`Catalog::update`].
#[derive(Clone)]
pub struct Track {
    pub id: TrackId,
    pub path: PathBuf,
    pub title: String,
    pub artist: Option<String>,
    pub album: Option<String>,
    /// Unknown until the audio device reports it on first playback.
    pub duration: Option<Duration>,
    /// Placeholder artwork reference synthesized at ingestion.
    pub artwork: String,
    /// Written at most once by the enrichment pipeline.
    pub insight: Option<Insight>,
}

impl Track {
    /// "Artist - Title" when an artist is known, otherwise the bare title.
    pub fn display(&self) -> String {
        match self.artist.as_deref().map(str::trim) {
            Some(a) if !a.is_empty() => format!("{} - {}", a, self.title),
            _ => self.title.clone(),
        }
    }
}

/// Partial update applied by id. Empty fields leave the track untouched.
#[derive(Debug, Clone, Default)]
pub struct TrackPatch {
    pub duration: Option<Duration>,
    pub insight: Option<Insight>,
}

impl TrackPatch {
    pub fn duration(duration: Duration) -> Self {
        Self {
            duration: Some(duration),
            ..Self::default()
        }
    }

    pub fn insight(insight: Insight) -> Self {
        Self {
            insight: Some(insight),
            ..Self::default()
        }
    }
}

/// Ordered track collection with copy-on-write snapshots.
///
/// Readers hold an `Arc` snapshot and never observe a half-applied update:
/// `append` and `update` build a fresh vector and swap the `Arc`.
pub struct Catalog {
    tracks: Arc<Vec<Track>>,
}

impl Catalog {
    pub fn new() -> Self {
        Self {
            tracks: Arc::new(Vec::new()),
        }
    }

    /// Insert tracks at the end, preserving the given order.
    pub fn append(&mut self, tracks: Vec<Track>) {
        if tracks.is_empty() {
            return;
        }
        let mut next: Vec<Track> = (*self.tracks).clone();
        next.extend(tracks);
        self.tracks = Arc::new(next);
    }

    /// Merge `patch` into the track with `id`; no-op when the id is absent.
    ///
    /// Insight is write-once: a patch carrying an insight for a track that
    /// already has one leaves the existing insight in place.
    pub fn update(&mut self, id: TrackId, patch: TrackPatch) {
        let Some(pos) = self.tracks.iter().position(|t| t.id == id) else {
            return;
        };

        let mut next: Vec<Track> = (*self.tracks).clone();
        let track = &mut next[pos];
        if let Some(d) = patch.duration {
            track.duration = Some(d);
        }
        if track.insight.is_none() {
            if let Some(insight) = patch.insight {
                track.insight = Some(insight);
            }
        }
        self.tracks = Arc::new(next);
    }

    /// First track satisfying `predicate`, scanning in insertion order.
    pub fn find(&self, predicate: impl Fn(&Track) -> bool) -> Option<&Track> {
        self.tracks.iter().find(|t| predicate(t))
    }

    /// Cheap snapshot for readers; stays valid across later updates.
    pub fn snapshot(&self) -> Arc<Vec<Track>> {
        Arc::clone(&self.tracks)
    }

    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

pub type CatalogHandle = Arc<Mutex<Catalog>>;

pub fn catalog_handle(catalog: Catalog) -> CatalogHandle {
    Arc::new(Mutex::new(catalog))
}
