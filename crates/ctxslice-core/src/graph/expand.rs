//! Neighborhood expansion around the hot path.
//!
//! The expanded set is the union of three rules:
//! 1. the hot-path symbols themselves
//! 2. radius-1: direct callees and direct callers of every hot-path node
//! 3. interface resolution: for every interface that is hot or the callee of a
//!    hot out-edge, every symbol in the graph that calls that interface
//!    (alternative implementations' call sites and existing callers)
//!
//! Inclusion is idempotent; the set also remembers which members are
//! "protected" (hot path and rule-3 additions) so the framework filter can
//! spare them.

use std::collections::{HashMap, HashSet};

use super::CallGraph;
use crate::ir::{Symbol, SymbolKind};

/// The expanded symbol set with a deterministic iteration order.
#[derive(Debug, Default)]
pub struct ExpandedGraph<'ir> {
    order: Vec<&'ir str>,
    set: HashSet<&'ir str>,
    protected: HashSet<&'ir str>,
}

impl<'ir> ExpandedGraph<'ir> {
    fn insert(&mut self, id: &'ir str) -> bool {
        let fresh = self.set.insert(id);
        if fresh {
            self.order.push(id);
        }
        fresh
    }

    fn protect(&mut self, id: &'ir str) {
        self.protected.insert(id);
    }

    pub fn contains(&self, id: &str) -> bool {
        self.set.contains(id)
    }

    /// Hot-path members and interface-resolution additions.
    pub fn is_protected(&self, id: &str) -> bool {
        self.protected.contains(id)
    }

    /// Members in first-inclusion order (stable given stable IR ordering).
    pub fn iter_order(&self) -> impl Iterator<Item = &'ir str> + '_ {
        self.order.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Rebuild with a membership predicate, preserving order and protection.
    pub(crate) fn retain(&self, keep: impl Fn(&'ir str) -> bool) -> ExpandedGraph<'ir> {
        let mut out = ExpandedGraph::default();
        for id in self.iter_order() {
            if keep(id) {
                out.insert(id);
                if self.is_protected(id) {
                    out.protect(id);
                }
            }
        }
        out
    }
}

/// Expand the hot path by one hop plus interface resolution.
pub fn expand<'ir>(graph: &CallGraph<'ir>, hot: &[&'ir Symbol]) -> ExpandedGraph<'ir> {
    let mut expanded = ExpandedGraph::default();

    // Reverse adjacency, built in node insertion order so the caller lists
    // come out reproducible.
    let mut callers_of: HashMap<&'ir str, Vec<&'ir str>> = HashMap::new();
    for caller in graph.nodes_in_order() {
        for edge in graph.get_out_edges(caller) {
            callers_of.entry(edge.callee_id).or_default().push(caller);
        }
    }

    // Rule 1: the hot path itself.
    for sym in hot {
        expanded.insert(&sym.id);
        expanded.protect(&sym.id);
    }

    // Rule 2: radius-1 neighborhood.
    for sym in hot {
        for edge in graph.get_out_edges(&sym.id) {
            expanded.insert(edge.callee_id);
        }
        if let Some(callers) = callers_of.get(sym.id.as_str()) {
            for &caller in callers {
                expanded.insert(caller);
            }
        }
    }

    // Rule 3: interface resolution. Interfaces that are hot or sit at the
    // callee end of a hot out-edge, in deterministic discovery order.
    let mut interfaces: Vec<&'ir str> = Vec::new();
    let mut interface_set: HashSet<&'ir str> = HashSet::new();
    let consider = |id: &'ir str,
                        interfaces: &mut Vec<&'ir str>,
                        interface_set: &mut HashSet<&'ir str>| {
        if let Some(sym) = graph.get_node(id) {
            if sym.kind == SymbolKind::Interface && interface_set.insert(id) {
                interfaces.push(id);
            }
        }
    };
    for sym in hot {
        consider(&sym.id, &mut interfaces, &mut interface_set);
        for edge in graph.get_out_edges(&sym.id) {
            consider(edge.callee_id, &mut interfaces, &mut interface_set);
        }
    }

    for iface in interfaces {
        for node in graph.nodes_in_order() {
            if graph
                .get_out_edges(node)
                .iter()
                .any(|e| e.callee_id == iface)
            {
                expanded.insert(node);
                expanded.protect(node);
            }
        }
    }

    expanded
}
