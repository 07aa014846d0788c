//! Track catalog: ordered track storage with copy-on-write snapshots,
//! plus the ingestion step that turns user-supplied files into tracks.

mod ingest;
mod model;

pub use ingest::*;
pub use model::*;

#[cfg(test)]
mod tests;
