use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread;
use std::thread::JoinHandle;

use tracing::{debug, warn};

use crate::catalog::{CatalogHandle, TrackId, TrackPatch};

use super::client::InsightSource;

/// Handle to the background enrichment worker.
///
/// The worker annotates catalog tracks one at a time: at most one request is
/// outstanding at any instant, and a track that failed (or came back empty)
/// is never retried during this session.
pub struct Enricher {
    trigger: Sender<()>,
    in_flight: Arc<AtomicBool>,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl Enricher {
    /// Signal that the catalog changed. Signals arriving while a request is
    /// outstanding coalesce in the channel; the worker rescans afterwards.
    pub fn notify(&self) {
        let _ = self.trigger.send(());
    }

    /// Whether a request is currently outstanding.
    pub fn in_flight(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Drop the trigger channel and wait for the worker to drain and exit.
    pub fn shutdown(self) {
        drop(self.trigger);
        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }
}

/// Spawn the enrichment worker over `catalog`, fetching from `source`.
pub fn spawn_enricher(catalog: CatalogHandle, source: Arc<dyn InsightSource>) -> Enricher {
    let (trigger, rx) = mpsc::channel::<()>();
    let in_flight = Arc::new(AtomicBool::new(false));

    let flag = in_flight.clone();
    let join = thread::spawn(move || run_worker(catalog, source, rx, flag));

    Enricher {
        trigger,
        in_flight,
        join: Mutex::new(Some(join)),
    }
}

fn run_worker(
    catalog: CatalogHandle,
    source: Arc<dyn InsightSource>,
    rx: Receiver<()>,
    in_flight: Arc<AtomicBool>,
) {
    // Tracks we already asked about this session. Failures are permanent
    // for the session; there is no retry.
    let mut attempted: HashSet<TrackId> = HashSet::new();

    while rx.recv().is_ok() {
        // Coalesce bursts of catalog-change signals into one rescan.
        while rx.try_recv().is_ok() {}

        loop {
            let candidate = {
                let cat = match catalog.lock() {
                    Ok(c) => c,
                    Err(_) => return,
                };
                cat.find(|t| t.insight.is_none() && !attempted.contains(&t.id))
                    .map(|t| (t.id, t.title.clone(), t.artist.clone()))
            };

            let Some((id, title, artist)) = candidate else {
                break;
            };

            attempted.insert(id);
            in_flight.store(true, Ordering::SeqCst);
            let result = source.fetch_insight(&title, artist.as_deref());

            match result {
                Ok(Some(insight)) => {
                    debug!(%title, mood = %insight.mood, "insight attached");
                    if let Ok(mut cat) = catalog.lock() {
                        cat.update(id, TrackPatch::insight(insight));
                    }
                }
                Ok(None) => {
                    debug!(%title, "no insight available for track");
                }
                Err(e) => {
                    warn!(%title, error = %e, "insight fetch failed; will not retry");
                }
            }

            // Cleared only after the response is fully applied.
            in_flight.store(false, Ordering::SeqCst);
        }
    }
}
