use crate::config;
use crate::transport::Transport;

/// Push configured playback defaults into the transport before the first
/// frame, so the audio thread starts with the right volume.
pub fn apply_playback_defaults(transport: &mut Transport, settings: &config::Settings) {
    transport.set_volume(settings.audio.initial_volume);
}
