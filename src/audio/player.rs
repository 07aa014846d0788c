use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Mutex;
use std::thread::JoinHandle;

use super::analysis::SampleRing;
use super::thread::spawn_audio_thread;
use super::types::{AudioCmd, AudioEvent};

/// Handle to the audio worker thread.
///
/// Commands go in over one channel, opaque device events come back over
/// another; the sample ring is shared with the analysis feed.
pub struct AudioPlayer {
    tx: Sender<AudioCmd>,
    events: Receiver<AudioEvent>,
    ring: SampleRing,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl AudioPlayer {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel::<AudioCmd>();
        let (event_tx, events) = mpsc::channel::<AudioEvent>();
        let ring = SampleRing::new();

        let join = spawn_audio_thread(rx, event_tx, ring.clone());

        Self {
            tx,
            events,
            ring,
            join: Mutex::new(Some(join)),
        }
    }

    /// Sender the transport uses to drive the device.
    pub fn command_sender(&self) -> Sender<AudioCmd> {
        self.tx.clone()
    }

    /// Shared ring for constructing the analysis feed.
    pub fn sample_ring(&self) -> SampleRing {
        self.ring.clone()
    }

    /// Next pending device event, if any. Non-blocking.
    pub fn poll_event(&self) -> Option<AudioEvent> {
        self.events.try_recv().ok()
    }

    pub fn quit(&self) {
        let _ = self.tx.send(AudioCmd::Quit);
        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }
}

impl Default for AudioPlayer {
    fn default() -> Self {
        Self::new()
    }
}
