//! Sink construction for the audio worker.
//!
//! Decoding, the analysis tap and the seek primitive all live here: a sink
//! is always decoder -> tap -> mixer, and seeking rebuilds the chain with
//! `skip_duration` at the requested position.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;

use lofty::AudioFile;
use rodio::{Decoder, OutputStream, Sink, Source};

use super::analysis::{SampleRing, TapSource};
use super::types::PlaybackError;

/// Create a paused `Sink` for `path` starting at `start_at`, tapped into
/// `ring` for analysis. Also reports the track duration when the decoder
/// (or a tag probe) knows it.
pub(super) fn create_sink_at(
    handle: &OutputStream,
    path: &Path,
    start_at: Duration,
    ring: &SampleRing,
) -> Result<(Sink, Option<Duration>), PlaybackError> {
    let file = File::open(path).map_err(|source| PlaybackError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let decoder = Decoder::new(BufReader::new(file)).map_err(|source| PlaybackError::Decode {
        path: path.to_path_buf(),
        source,
    })?;

    let duration = decoder.total_duration().or_else(|| probe_duration(path));

    // `skip_duration` is our seeking primitive; even Duration::ZERO is fine.
    let source = TapSource::new(decoder.skip_duration(start_at), ring.clone());

    let sink = Sink::connect_new(handle.mixer());
    sink.append(source);
    sink.pause();
    Ok((sink, duration))
}

/// Tag-level duration probe for formats whose decoder reports none.
fn probe_duration(path: &Path) -> Option<Duration> {
    lofty::read_from_path(path)
        .ok()
        .map(|tagged| tagged.properties().duration())
}
