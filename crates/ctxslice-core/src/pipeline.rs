//! High-level pipeline orchestration, no I/O.
//!
//! Callers (CLI, tests) load the IR files themselves and feed parsed values
//! in; the stages here run validate -> merge -> graph -> hot path -> expand
//! -> compress. The merged IR is returned separately from the slice because
//! the slice borrows from it: keep the [`MergedIr`] alive for as long as the
//! [`Slice`] is in use.

use crate::errors::SliceResult;
use crate::graph::{build_graph, expand, hot_path};
use crate::ir::{IrRoot, RuntimeTrace};
use crate::merge::{merge, MergedIr};
use crate::slice::{compress, CompressOptions, Slice};
use crate::validate::{validate, ValidationWarning};

/// Options threaded through a slice run.
#[derive(Debug, Clone, Default)]
pub struct SliceOptions {
    pub compress: CompressOptions,
}

/// Counters for presentation; logging only, no behavior hangs off these.
#[derive(Debug, Clone, Default)]
pub struct PipelineStats {
    pub symbols: usize,
    pub edges: usize,
    pub hot_path_len: usize,
    pub expanded_len: usize,
    pub sliced_symbols: usize,
    pub sliced_edges: usize,
    pub relevant_files: usize,
}

/// Validate and merge the two IR inputs. Fails only on a schema version
/// mismatch; quarantine findings come back as warnings.
pub fn merged_from_parts(
    ir: IrRoot,
    trace: &RuntimeTrace,
) -> SliceResult<(MergedIr, Vec<ValidationWarning>)> {
    let validated = validate(ir)?;
    let warnings = validated.warnings.clone();
    let merged = merge(validated, trace);
    tracing::debug!(
        symbols = merged.symbols.len(),
        edges = merged.call_edges.len(),
        warnings = warnings.len(),
        "merged IR"
    );
    Ok((merged, warnings))
}

/// Run the graph and compression stages over merged IR.
pub fn slice_merged<'ir>(ir: &'ir MergedIr, opts: &SliceOptions) -> (Slice<'ir>, PipelineStats) {
    let graph = build_graph(ir);
    let hot = hot_path(&graph);
    let expanded = expand(&graph, &hot);
    let slice = compress(&graph, &expanded, ir, &opts.compress);

    let stats = PipelineStats {
        symbols: graph.node_count(),
        edges: graph.edge_count(),
        hot_path_len: hot.len(),
        expanded_len: expanded.len(),
        sliced_symbols: slice.ordered_symbols.len(),
        sliced_edges: slice.edges.len(),
        relevant_files: slice.relevant_files.len(),
    };
    tracing::debug!(
        hot = stats.hot_path_len,
        expanded = stats.expanded_len,
        sliced = stats.sliced_symbols,
        "computed slice"
    );

    (slice, stats)
}
