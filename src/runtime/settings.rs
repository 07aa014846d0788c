use tracing::warn;

use crate::config;

/// Load settings, falling back to defaults when loading or validation
/// fails. A broken config file must never stop the player from starting.
pub fn load_settings() -> config::Settings {
    let settings = match config::Settings::load() {
        Ok(s) => s,
        Err(e) => {
            warn!(error = %e, "failed to load config, using defaults");
            return config::Settings::default();
        }
    };

    if let Err(msg) = settings.validate() {
        warn!(%msg, "invalid config, using defaults");
        return config::Settings::default();
    }

    settings
}
