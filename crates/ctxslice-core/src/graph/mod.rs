//! Weighted directed call graph.
//!
//! The graph borrows every string from the owning [`crate::merge::MergedIr`];
//! the IR must outlive the graph, and the graph must outlive anything that
//! borrows node references from it. Nodes remember insertion order so that
//! every downstream iteration is reproducible; no `HashMap` iteration order
//! escapes this module.

use std::collections::HashMap;

use crate::ir::Symbol;

mod build;
mod expand;
mod traversal;

pub use build::build_graph;
pub use expand::{expand, ExpandedGraph};
pub use traversal::{bfs_reachable, dfs_reachable, hot_path};

/// Per-edge metadata carried through filtering and packaging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeMeta {
    pub call_count: u64,
    pub runtime_observed: bool,
    pub is_static: bool,
}

/// An outgoing edge of the adjacency list.
#[derive(Debug, Clone, Copy)]
pub struct GraphEdge<'ir> {
    pub callee_id: &'ir str,
    pub meta: EdgeMeta,
}

/// Adjacency-list call graph over borrowed symbol ids.
#[derive(Debug, Default)]
pub struct CallGraph<'ir> {
    nodes: HashMap<&'ir str, &'ir Symbol>,
    node_order: Vec<&'ir str>,
    out_edges: HashMap<&'ir str, Vec<GraphEdge<'ir>>>,
    file_map: HashMap<&'ir str, &'ir str>,
    edge_count: usize,
}

impl<'ir> CallGraph<'ir> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node, recording where the symbol lives. Idempotent: a second
    /// add with the same id is a no-op and preserves the first insertion.
    pub fn add_node(&mut self, sym: &'ir Symbol, file_path: Option<&'ir str>) {
        if self.nodes.contains_key(sym.id.as_str()) {
            return;
        }
        self.nodes.insert(&sym.id, sym);
        self.node_order.push(&sym.id);
        if let Some(path) = file_path {
            self.file_map.insert(&sym.id, path);
        }
    }

    /// Append an edge. Duplicate (caller, callee) pairs are allowed here and
    /// collapsed later by the slice layer.
    pub fn add_edge(&mut self, caller_id: &'ir str, callee_id: &'ir str, meta: EdgeMeta) {
        self.out_edges
            .entry(caller_id)
            .or_default()
            .push(GraphEdge { callee_id, meta });
        self.edge_count += 1;
    }

    /// Outgoing edges of a node; empty slice for unknown ids.
    pub fn get_out_edges(&self, id: &str) -> &[GraphEdge<'ir>] {
        self.out_edges.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn get_node(&self, id: &str) -> Option<&'ir Symbol> {
        self.nodes.get(id).copied()
    }

    /// Path of the file the symbol lives in, if the symbol has one.
    pub fn file_path(&self, id: &str) -> Option<&'ir str> {
        self.file_map.get(id).copied()
    }

    /// Node ids in insertion order (the order of static-IR symbols).
    pub fn nodes_in_order(&self) -> impl Iterator<Item = &'ir str> + '_ {
        self.node_order.iter().copied()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }
}
