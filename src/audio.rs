//! Audio playback and analysis: a rodio worker thread driven by commands,
//! opaque device events consumed by the transport, and the pull-based
//! frequency-analysis feed that powers the visualizer.

mod analysis;
mod player;
mod sink;
mod thread;
mod types;

pub use analysis::*;
pub use player::*;
pub use types::*;

#[cfg(test)]
mod tests;
