//! Graph construction from merged IR.

use std::collections::HashMap;

use super::{CallGraph, EdgeMeta};
use crate::merge::MergedIr;

/// Populate a [`CallGraph`] from merged IR in two passes: every symbol first
/// (with its file mapping), then every edge. Edge endpoints are guaranteed by
/// the validator and merger; an unknown endpoint here is an upstream bug and
/// the edge is skipped with a log line rather than poisoning the graph.
pub fn build_graph(ir: &MergedIr) -> CallGraph<'_> {
    let files: HashMap<&str, &str> = ir
        .files
        .iter()
        .map(|f| (f.id.as_str(), f.path.as_str()))
        .collect();

    let mut graph = CallGraph::new();

    for sym in &ir.symbols {
        let path = sym
            .file_id
            .as_deref()
            .and_then(|fid| files.get(fid).copied());
        graph.add_node(sym, path);
    }

    for edge in &ir.call_edges {
        if graph.get_node(&edge.caller_id).is_none() || graph.get_node(&edge.callee_id).is_none() {
            tracing::debug!(caller = %edge.caller_id, callee = %edge.callee_id, "skipping edge with unknown endpoint");
            continue;
        }
        graph.add_edge(
            &edge.caller_id,
            &edge.callee_id,
            EdgeMeta {
                call_count: edge.call_count,
                runtime_observed: edge.runtime_observed,
                is_static: edge.is_static,
            },
        );
    }

    graph
}
