use std::time::Duration;

use crate::catalog::TrackId;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RepeatMode {
    /// Do not wrap at the end of the view.
    Off,
    /// Wrap around to the start of the view.
    All,
    /// Repeat the current track when it ends.
    One,
}

impl RepeatMode {
    /// Off -> All -> One -> Off.
    pub fn cycled(self) -> Self {
        match self {
            RepeatMode::Off => RepeatMode::All,
            RepeatMode::All => RepeatMode::One,
            RepeatMode::One => RepeatMode::Off,
        }
    }
}

impl Default for RepeatMode {
    fn default() -> Self {
        Self::Off
    }
}

/// The transport's whole state. One per process, owned by [`super::Transport`].
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerState {
    pub is_playing: bool,
    /// Index into the filtered view active when it was set; `None` = nothing
    /// selected (the initial state).
    pub current: Option<usize>,
    /// Identity of the selected track, used to re-locate it when the active
    /// view changes underneath the index.
    pub current_id: Option<TrackId>,
    /// Output volume in `[0, 1]`.
    pub volume: f32,
    /// Playback position as last echoed by the device.
    pub position: Duration,
    /// Duration of the selected track, once known.
    pub duration: Option<Duration>,
    pub repeat: RepeatMode,
    pub shuffle: bool,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            is_playing: false,
            current: None,
            current_id: None,
            volume: 1.0,
            position: Duration::ZERO,
            duration: None,
            repeat: RepeatMode::default(),
            shuffle: false,
        }
    }
}
