//! ctxslice-core
//!
//! Core primitives for ctxslice:
//! - IR wire model for `static_ir.json` / `runtime_trace.json`
//! - Validation (schema version gate, symbol/edge quarantine)
//! - Static + runtime merge
//! - Borrowed call graph, hot path, and neighborhood expansion
//! - Slice compression (edge dedup, topological order, file/config maps)
//!
//! The core crate performs no filesystem or network I/O and reads no clocks
//! or environment variables. Callers load bytes, inject timestamps, and write
//! artifacts; given identical inputs the core's outputs are byte-stable.

pub mod determinism;
pub mod errors;
pub mod graph;
pub mod hash;
pub mod ir;
pub mod merge;
pub mod pipeline;
pub mod slice;
pub mod validate;

pub use crate::errors::{SliceError, SliceResult};

/// The only IR schema version this core accepts. Compared as an exact string.
pub const IR_VERSION: &str = "0.1";

/// Core version identifier recorded into packaged metadata.
pub const CORE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Convenience re-exports.
pub mod prelude {
    pub use crate::graph::{build_graph, expand, hot_path, CallGraph, ExpandedGraph};
    pub use crate::ir::{IrRoot, RuntimeTrace, Symbol, SymbolKind};
    pub use crate::merge::{merge, MergedIr};
    pub use crate::pipeline::{merged_from_parts, slice_merged, PipelineStats, SliceOptions};
    pub use crate::slice::{CompressOptions, ConfigInfluence, DedupedEdge, Slice};
    pub use crate::validate::{validate, ValidationResult, ValidationWarning};
    pub use crate::{SliceError, SliceResult};
}
