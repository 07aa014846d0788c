//! Small types shared by the audio subsystem: commands into the worker
//! thread, events back out of it, and playback errors.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::catalog::TrackId;

/// Commands accepted by the audio worker thread.
#[derive(Debug)]
pub enum AudioCmd {
    /// Start playing the given file from the beginning.
    Play { id: TrackId, path: PathBuf },
    /// Pause the current sink.
    Pause,
    /// Resume a paused sink.
    Resume,
    /// Jump to an absolute position in the current track.
    SeekTo(Duration),
    /// Set the output volume (0.0 - 1.0, already clamped by the transport).
    SetVolume(f32),
    /// Shut the worker down.
    Quit,
}

/// Opaque events emitted by the audio worker.
///
/// The transport reads these against its *live* state and the view active
/// at the moment they are processed; nothing is captured at subscribe time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioEvent {
    /// The device learned the total duration of the track it was given.
    DurationKnown { id: TrackId, duration: Duration },
    /// Periodic playback position report.
    Position(Duration),
    /// The track finished naturally.
    Ended { id: TrackId },
    /// The track could not be opened, decoded or routed to an output.
    PlaybackFailed { id: TrackId },
}

#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("failed to open {path:?}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode {path:?}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: rodio::decoder::DecoderError,
    },

    #[error("no audio output device: {0}")]
    Device(#[from] rodio::StreamError),
}
