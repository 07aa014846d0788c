use serde::{Deserialize, Serialize};

/// AI-derived descriptive metadata for one track. Immutable once attached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insight {
    /// Free-text mood category; matched case-insensitively by smart playlists.
    pub mood: String,
    /// A short descriptive fact about the track.
    pub fact: String,
    /// Color token used for UI theming.
    pub vibe: String,
}
