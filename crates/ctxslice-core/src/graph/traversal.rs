//! Graph traversal: the runtime hot path and generic BFS/DFS walks.

use std::collections::{HashMap, HashSet, VecDeque};

use super::CallGraph;
use crate::ir::Symbol;

/// Symbols touched by runtime observation: every caller or callee of at least
/// one edge with `call_count > 0`, ordered by descending maximum such count.
/// Ties are broken by symbol id, lexicographic ascending, so the order is
/// stable across runs and platforms.
///
/// An empty result (no runtime edges) is a deliberate degradation: the
/// downstream slice will be empty, not an error.
pub fn hot_path<'ir>(graph: &CallGraph<'ir>) -> Vec<&'ir Symbol> {
    let mut max_count: HashMap<&'ir str, u64> = HashMap::new();

    for caller in graph.nodes_in_order() {
        for edge in graph.get_out_edges(caller) {
            if edge.meta.call_count == 0 {
                continue;
            }
            let n = edge.meta.call_count;
            let c = max_count.entry(caller).or_insert(0);
            *c = (*c).max(n);
            let c = max_count.entry(edge.callee_id).or_insert(0);
            *c = (*c).max(n);
        }
    }

    // Collect in node insertion order, then apply the explicit sort keys.
    let mut hot: Vec<&'ir Symbol> = graph
        .nodes_in_order()
        .filter(|id| max_count.contains_key(id))
        .filter_map(|id| graph.get_node(id))
        .collect();

    hot.sort_by(|a, b| {
        let ca = max_count[a.id.as_str()];
        let cb = max_count[b.id.as_str()];
        cb.cmp(&ca).then_with(|| a.id.cmp(&b.id))
    });

    hot
}

/// Ids reachable from `start` over outgoing edges, in BFS order. `start` is
/// included if it is a node of the graph.
pub fn bfs_reachable<'ir>(graph: &CallGraph<'ir>, start: &str) -> Vec<&'ir str> {
    let Some(start_sym) = graph.get_node(start) else {
        return Vec::new();
    };

    let mut seen: HashSet<&str> = HashSet::new();
    let mut order: Vec<&'ir str> = Vec::new();
    let mut queue: VecDeque<&'ir str> = VecDeque::new();

    seen.insert(&start_sym.id);
    order.push(&start_sym.id);
    queue.push_back(&start_sym.id);

    while let Some(id) = queue.pop_front() {
        for edge in graph.get_out_edges(id) {
            if seen.insert(edge.callee_id) {
                order.push(edge.callee_id);
                queue.push_back(edge.callee_id);
            }
        }
    }

    order
}

/// Ids reachable from `start` over outgoing edges, in DFS preorder.
pub fn dfs_reachable<'ir>(graph: &CallGraph<'ir>, start: &str) -> Vec<&'ir str> {
    let Some(start_sym) = graph.get_node(start) else {
        return Vec::new();
    };

    let mut seen: HashSet<&str> = HashSet::new();
    let mut order: Vec<&'ir str> = Vec::new();
    let mut stack: Vec<&'ir str> = vec![&start_sym.id];

    while let Some(id) = stack.pop() {
        if !seen.insert(id) {
            continue;
        }
        order.push(id);
        // Push in reverse so the first out-edge is visited first.
        for edge in graph.get_out_edges(id).iter().rev() {
            if !seen.contains(edge.callee_id) {
                stack.push(edge.callee_id);
            }
        }
    }

    order
}
