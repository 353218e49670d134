//! Slice layer: filtering, edge dedup, and compression.

mod compress;
mod filter;

pub use compress::{compress, CompressOptions, ConfigInfluence, Slice};
pub use filter::{collapse_two_cycles, dedup_edges, filter_framework, DedupedEdge};
