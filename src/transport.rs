//! Playback transport: the state machine owning what is selected, whether it
//! is playing, position, volume and the repeat/shuffle policy. All
//! index-based operations are relative to the filtered view passed in at
//! call time, never to the raw catalog.

mod engine;
mod state;

pub use engine::*;
pub use state::*;
