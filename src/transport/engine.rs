use std::collections::HashSet;
use std::sync::mpsc::Sender;
use std::time::Duration;

use rand::seq::SliceRandom;
use tracing::warn;

use crate::audio::{AudioCmd, AudioEvent};
use crate::catalog::{Track, TrackId};

use super::state::{PlayerState, RepeatMode};

/// The playback state machine.
///
/// Owns [`PlayerState`] and funnels every mutation through command methods;
/// side effects reach the device through the command channel, so the
/// transport itself never touches audio hardware.
pub struct Transport {
    state: PlayerState,
    tx: Sender<AudioCmd>,
    /// Track ids already played in the current shuffle pass.
    played: HashSet<TrackId>,
    /// Set when the device reported a start failure for the current track;
    /// the worker holds no sink then, so the next resume must re-send Play
    /// instead of Resume.
    needs_restart: bool,
}

impl Transport {
    pub fn new(tx: Sender<AudioCmd>) -> Self {
        Self {
            state: PlayerState::default(),
            tx,
            played: HashSet::new(),
            needs_restart: false,
        }
    }

    pub fn state(&self) -> &PlayerState {
        &self.state
    }

    /// Position of the selected track within `view`, re-located by id so a
    /// changed view cannot leave us acting on a stale index.
    fn position_in(&self, view: &[Track]) -> Option<usize> {
        let id = self.state.current_id?;
        view.iter().position(|t| t.id == id)
    }

    /// Select and start playing `view[index]`. Out-of-range indices leave
    /// the state untouched and send nothing.
    pub fn select_track(&mut self, view: &[Track], index: usize) {
        let Some(track) = view.get(index) else {
            return;
        };

        self.state.current = Some(index);
        self.state.current_id = Some(track.id);
        self.state.is_playing = true;
        self.state.position = Duration::ZERO;
        self.state.duration = track.duration;
        self.played.insert(track.id);
        self.needs_restart = false;

        let _ = self.tx.send(AudioCmd::Play {
            id: track.id,
            path: track.path.clone(),
        });
    }

    /// Flip play/pause; with nothing selected, start the first track.
    pub fn toggle_play(&mut self, view: &[Track]) {
        if self.state.current_id.is_none() {
            if !view.is_empty() {
                self.select_track(view, 0);
            }
            return;
        }

        if self.state.is_playing {
            self.state.is_playing = false;
            let _ = self.tx.send(AudioCmd::Pause);
        } else if self.needs_restart {
            // The worker dropped the sink (failure or natural end); Resume
            // would be a silent no-op there.
            match self.position_in(view) {
                Some(pos) => self.select_track(view, pos),
                None => self.select_track(view, 0),
            }
        } else {
            self.state.is_playing = true;
            let _ = self.tx.send(AudioCmd::Resume);
        }
    }

    /// Move to the next track under the current repeat/shuffle policy.
    pub fn advance(&mut self, view: &[Track]) {
        if view.is_empty() {
            return;
        }

        if self.state.repeat == RepeatMode::One {
            // Restart the current track; the index does not change. A track
            // the view no longer contains falls back to index 0, like the
            // sequential branch, so playback never dangles on a drained
            // device.
            match self.position_in(view) {
                Some(pos) => self.select_track(view, pos),
                None => self.select_track(view, 0),
            }
            return;
        }

        if self.state.shuffle {
            if let Some(i) = self.pick_shuffled(view) {
                self.select_track(view, i);
            }
            return;
        }

        match self.position_in(view) {
            None => self.select_track(view, 0),
            Some(pos) => {
                let next = pos + 1;
                if next < view.len() {
                    self.select_track(view, next);
                } else if self.state.repeat == RepeatMode::All {
                    self.select_track(view, 0);
                }
                // Repeat off: stay parked on the last track.
            }
        }
    }

    /// Move to the previous track under the current repeat/shuffle policy.
    pub fn retreat(&mut self, view: &[Track]) {
        if view.is_empty() {
            return;
        }

        // Manual prev respects repeat-all wrap, but does not repeat-one.
        if self.state.shuffle {
            if let Some(i) = self.pick_shuffled(view) {
                self.select_track(view, i);
            }
            return;
        }

        match self.position_in(view) {
            None => self.select_track(view, view.len() - 1),
            Some(0) => {
                if self.state.repeat == RepeatMode::All {
                    self.select_track(view, view.len() - 1);
                } else {
                    self.select_track(view, 0);
                }
            }
            Some(pos) => self.select_track(view, pos - 1),
        }
    }

    /// Jump to an absolute position, clamped into `[0, duration]`.
    pub fn seek(&mut self, position: Duration) {
        if self.state.current_id.is_none() {
            return;
        }
        let clamped = match self.state.duration {
            Some(d) => position.min(d),
            None => position,
        };
        self.state.position = clamped;
        let _ = self.tx.send(AudioCmd::SeekTo(clamped));
    }

    /// Set the output volume, clamped into `[0, 1]`.
    pub fn set_volume(&mut self, volume: f32) {
        let v = volume.clamp(0.0, 1.0);
        self.state.volume = v;
        let _ = self.tx.send(AudioCmd::SetVolume(v));
    }

    pub fn cycle_repeat(&mut self) {
        self.state.repeat = self.state.repeat.cycled();
    }

    /// Flip shuffle and start a fresh shuffle pass.
    pub fn toggle_shuffle(&mut self) {
        self.state.shuffle = !self.state.shuffle;
        self.played.clear();
        if let Some(id) = self.state.current_id {
            self.played.insert(id);
        }
    }

    /// Apply a device event against live state and the view active *now*.
    pub fn handle_event(&mut self, event: AudioEvent, view: &[Track]) {
        match event {
            AudioEvent::Position(position) => {
                if self.state.is_playing {
                    self.state.position = position;
                }
            }
            AudioEvent::DurationKnown { id, duration } => {
                if self.state.current_id == Some(id) {
                    self.state.duration = Some(duration);
                }
            }
            AudioEvent::PlaybackFailed { id } => {
                if self.state.current_id == Some(id) {
                    warn!("playback did not start; clearing playing flag");
                    self.state.is_playing = false;
                    self.needs_restart = true;
                }
            }
            AudioEvent::Ended { id } => {
                // The event may belong to a track we already replaced.
                if self.state.current_id != Some(id) {
                    return;
                }
                if view.is_empty() {
                    self.state.is_playing = false;
                    self.needs_restart = true;
                    return;
                }

                let parked = self.state.repeat == RepeatMode::Off
                    && !self.state.shuffle
                    && self
                        .position_in(view)
                        .is_some_and(|pos| pos + 1 >= view.len());
                if parked {
                    // The device genuinely finished; leaving is_playing set
                    // would contradict it. The sink is gone too, so a later
                    // resume must start fresh.
                    self.state.is_playing = false;
                    self.needs_restart = true;
                } else {
                    self.advance(view);
                }
            }
        }
    }

    /// Random unplayed index for the current shuffle pass, avoiding an
    /// immediate repeat; the pass resets once every view track was played.
    fn pick_shuffled(&mut self, view: &[Track]) -> Option<usize> {
        let unplayed: Vec<usize> = view
            .iter()
            .enumerate()
            .filter(|(_, t)| !self.played.contains(&t.id))
            .map(|(i, _)| i)
            .collect();

        let candidates = if unplayed.is_empty() {
            self.played.clear();
            if let Some(id) = self.state.current_id {
                self.played.insert(id);
            }
            view.iter()
                .enumerate()
                .filter(|(_, t)| Some(t.id) != self.state.current_id)
                .map(|(i, _)| i)
                .collect()
        } else {
            unplayed
        };

        if candidates.is_empty() {
            // Single-track view: the only choice is the current track.
            return self.position_in(view);
        }
        candidates.choose(&mut rand::thread_rng()).copied()
    }
}
