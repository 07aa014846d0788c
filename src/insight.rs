//! AI insight support: the `Insight` value object, the HTTP client for the
//! external insight service, and the single-flight enrichment pipeline that
//! annotates catalog tracks in the background.

mod client;
mod model;
mod pipeline;

pub use client::*;
pub use model::*;
pub use pipeline::*;
