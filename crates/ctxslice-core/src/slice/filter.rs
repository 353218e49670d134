//! Framework filtering, edge deduplication, and 2-cycle collapse.
//!
//! Ordering rules here are explicit and auditable: dedup output preserves
//! first-occurrence order of each (caller, callee) pair, and the cycle
//! collapse picks its surviving direction lexicographically.

use std::collections::{HashMap, HashSet};

use crate::graph::{CallGraph, EdgeMeta, ExpandedGraph};

/// One edge per (caller, callee) pair after dedup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DedupedEdge<'ir> {
    pub caller_id: &'ir str,
    pub callee_id: &'ir str,
    pub call_count: u64,
    pub runtime_observed: bool,
    pub is_static: bool,
}

/// Drop framework symbols from the expanded set unless they are protected
/// (hot path or interface-resolution additions). Edges touching a removed
/// symbol disappear with it, since edge extraction requires both endpoints.
pub fn filter_framework<'ir>(
    graph: &CallGraph<'ir>,
    expanded: &ExpandedGraph<'ir>,
) -> ExpandedGraph<'ir> {
    expanded.retain(|id| {
        let framework = graph.get_node(id).map(|s| s.is_framework).unwrap_or(false);
        !framework || expanded.is_protected(id)
    })
}

/// Collapse edges sharing a (caller, callee) pair: counts sum, observation
/// and staticness OR. Keyed by the pair joined with NUL, which symbol ids
/// cannot contain.
pub fn dedup_edges<'ir>(
    edges: impl IntoIterator<Item = (&'ir str, &'ir str, EdgeMeta)>,
) -> Vec<DedupedEdge<'ir>> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut out: Vec<DedupedEdge<'ir>> = Vec::new();

    for (caller, callee, meta) in edges {
        debug_assert!(!caller.contains('\0') && !callee.contains('\0'));
        let key = format!("{caller}\0{callee}");
        match index.get(&key) {
            Some(&i) => {
                let e = &mut out[i];
                e.call_count += meta.call_count;
                e.runtime_observed |= meta.runtime_observed;
                e.is_static |= meta.is_static;
            }
            None => {
                index.insert(key, out.len());
                out.push(DedupedEdge {
                    caller_id: caller,
                    callee_id: callee,
                    call_count: meta.call_count,
                    runtime_observed: meta.runtime_observed,
                    is_static: meta.is_static,
                });
            }
        }
    }

    out
}

/// For every 2-node cycle `A -> B`, `B -> A`, drop the back-edge whose caller
/// is lexicographically larger, leaving a single representative direction.
/// Longer cycles are untouched.
pub fn collapse_two_cycles(edges: &mut Vec<DedupedEdge<'_>>) {
    let pairs: HashSet<(&str, &str)> = edges.iter().map(|e| (e.caller_id, e.callee_id)).collect();
    edges.retain(|e| {
        let reversed = pairs.contains(&(e.callee_id, e.caller_id));
        !(reversed && e.caller_id > e.callee_id)
    });
}
