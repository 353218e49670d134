//! Slice compression: membership, edge extraction, topological order, file
//! and config maps.
//!
//! The compressor never fails on validated input; every path through here is
//! total. Output ordering is deterministic: Kahn seeds and the cycle tail
//! both follow expanded-set iteration order, file paths follow first
//! appearance in topological order.

use std::collections::{HashMap, HashSet, VecDeque};

use super::filter::{collapse_two_cycles, dedup_edges, filter_framework, DedupedEdge};
use crate::graph::{CallGraph, EdgeMeta, ExpandedGraph};
use crate::ir::Symbol;
use crate::merge::MergedIr;

/// Knobs for the compression pass.
#[derive(Debug, Clone)]
pub struct CompressOptions {
    /// Remove unprotected framework symbols before edge extraction.
    pub drop_framework: bool,
}

impl Default for CompressOptions {
    fn default() -> Self {
        Self {
            drop_framework: true,
        }
    }
}

/// A configuration key and the sliced symbols that read it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigInfluence<'ir> {
    pub config_key: &'ir str,
    /// Value from the first observed read of the key.
    pub resolved_value: Option<&'ir str>,
    pub influenced_by: Vec<&'ir str>,
}

/// The compressed, ordered subset of the codebase. Borrows from the merged
/// IR (via the graph), so the IR and graph must outlive it.
#[derive(Debug)]
pub struct Slice<'ir> {
    pub scenario: &'ir str,
    pub ordered_symbols: Vec<&'ir Symbol>,
    /// Deduplicated file paths, ordered by first appearance in topological
    /// order. The packager re-sorts for `relevant_files.txt`.
    pub relevant_files: Vec<&'ir str>,
    pub config_influences: Vec<ConfigInfluence<'ir>>,
    pub edges: Vec<DedupedEdge<'ir>>,
}

impl Slice<'_> {
    pub fn is_empty(&self) -> bool {
        self.ordered_symbols.is_empty()
    }
}

/// Compress the expanded neighborhood into a [`Slice`].
pub fn compress<'ir>(
    graph: &CallGraph<'ir>,
    expanded: &ExpandedGraph<'ir>,
    ir: &'ir MergedIr,
    opts: &CompressOptions,
) -> Slice<'ir> {
    let working;
    let members: &ExpandedGraph<'ir> = if opts.drop_framework {
        working = filter_framework(graph, expanded);
        &working
    } else {
        expanded
    };

    // Every merged edge with both endpoints in the working set, deduped and
    // with 2-cycles collapsed to one representative direction.
    let mut edges = dedup_edges(ir.call_edges.iter().filter_map(|e| {
        if members.contains(&e.caller_id) && members.contains(&e.callee_id) {
            Some((
                e.caller_id.as_str(),
                e.callee_id.as_str(),
                EdgeMeta {
                    call_count: e.call_count,
                    runtime_observed: e.runtime_observed,
                    is_static: e.is_static,
                },
            ))
        } else {
            None
        }
    }));
    collapse_two_cycles(&mut edges);

    let ordered_ids = topological_order(members, &edges);
    let ordered_symbols: Vec<&'ir Symbol> = ordered_ids
        .iter()
        .filter_map(|id| graph.get_node(id))
        .collect();

    // File paths by first appearance in topological order.
    let mut seen_paths: HashSet<&str> = HashSet::new();
    let mut relevant_files: Vec<&'ir str> = Vec::new();
    for id in &ordered_ids {
        if let Some(path) = graph.file_path(id) {
            if seen_paths.insert(path) {
                relevant_files.push(path);
            }
        }
    }

    let config_influences = config_influences(members, ir);

    Slice {
        scenario: &ir.scenario.name,
        ordered_symbols,
        relevant_files,
        config_influences,
        edges,
    }
}

/// Kahn's algorithm over the working set. Seeds and the appended cycle tail
/// follow set iteration order, which keeps output identical run-to-run.
fn topological_order<'ir>(
    members: &ExpandedGraph<'ir>,
    edges: &[DedupedEdge<'ir>],
) -> Vec<&'ir str> {
    let mut in_degree: HashMap<&'ir str, usize> = HashMap::new();
    for id in members.iter_order() {
        in_degree.insert(id, 0);
    }
    let mut out_adj: HashMap<&'ir str, Vec<&'ir str>> = HashMap::new();
    for e in edges {
        out_adj.entry(e.caller_id).or_default().push(e.callee_id);
        if let Some(d) = in_degree.get_mut(e.callee_id) {
            *d += 1;
        }
    }

    let mut queue: VecDeque<&'ir str> = members
        .iter_order()
        .filter(|id| in_degree[id] == 0)
        .collect();

    let mut order: Vec<&'ir str> = Vec::with_capacity(members.len());
    let mut placed: HashSet<&'ir str> = HashSet::new();

    while let Some(id) = queue.pop_front() {
        order.push(id);
        placed.insert(id);
        if let Some(callees) = out_adj.get(id) {
            for &callee in callees {
                if let Some(d) = in_degree.get_mut(callee) {
                    *d -= 1;
                    if *d == 0 {
                        queue.push_back(callee);
                    }
                }
            }
        }
    }

    // Cycle tail: members with positive residual in-degree.
    for id in members.iter_order() {
        if !placed.contains(id) {
            order.push(id);
        }
    }

    order
}

/// Group in-slice config reads by key, first-seen order, deduplicating
/// (key, symbol) pairs.
fn config_influences<'ir>(
    members: &ExpandedGraph<'ir>,
    ir: &'ir MergedIr,
) -> Vec<ConfigInfluence<'ir>> {
    let mut by_key: HashMap<&'ir str, usize> = HashMap::new();
    let mut seen_pairs: HashSet<(&str, &str)> = HashSet::new();
    let mut out: Vec<ConfigInfluence<'ir>> = Vec::new();

    for read in &ir.config_reads {
        if !members.contains(&read.symbol_id) {
            continue;
        }
        let key = read.config_key.as_str();
        let idx = match by_key.get(key) {
            Some(&i) => i,
            None => {
                by_key.insert(key, out.len());
                out.push(ConfigInfluence {
                    config_key: key,
                    resolved_value: read.resolved_value.as_deref(),
                    influenced_by: Vec::new(),
                });
                out.len() - 1
            }
        };
        if seen_pairs.insert((key, read.symbol_id.as_str())) {
            out[idx].influenced_by.push(&read.symbol_id);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{build_graph, expand, hot_path};
    use crate::ir::{
        CallEdge, ConfigRead, Scenario, SourceFile, Symbol, SymbolKind,
    };

    fn symbol(id: &str, kind: SymbolKind, file: &str, framework: bool) -> Symbol {
        Symbol {
            id: id.to_string(),
            kind,
            name: id.to_string(),
            language: "java".to_string(),
            file_id: Some(file.to_string()),
            line_start: 1,
            line_end: 2,
            visibility: "public".to_string(),
            container: None,
            annotations: Vec::new(),
            is_entry_point: false,
            is_framework: framework,
            is_generated: false,
        }
    }

    fn edge(caller: &str, callee: &str, count: u64, is_static: bool) -> CallEdge {
        CallEdge {
            caller_id: caller.to_string(),
            callee_id: callee.to_string(),
            is_static,
            runtime_observed: count > 0,
            call_count: count,
        }
    }

    fn merged(symbols: Vec<Symbol>, edges: Vec<CallEdge>, reads: Vec<ConfigRead>) -> MergedIr {
        MergedIr {
            language: "java".to_string(),
            repo_root: "/repo".to_string(),
            build_id: "b1".to_string(),
            adapter_version: "0.1.0".to_string(),
            scenario: Scenario {
                name: "submit-order".to_string(),
                ..Default::default()
            },
            files: vec![
                SourceFile {
                    id: "f1".to_string(),
                    path: "src/A.java".to_string(),
                    language: "java".to_string(),
                    hash: "0".repeat(64),
                },
                SourceFile {
                    id: "f2".to_string(),
                    path: "src/B.java".to_string(),
                    language: "java".to_string(),
                    hash: "1".repeat(64),
                },
            ],
            symbols,
            call_edges: edges,
            config_reads: reads,
            runtime_captured: true,
        }
    }

    fn slice_of(ir: &MergedIr) -> Slice<'_> {
        let graph = build_graph(ir);
        let hot = hot_path(&graph);
        let expanded = expand(&graph, &hot);
        compress(&graph, &expanded, ir, &CompressOptions::default())
    }

    #[test]
    fn simple_chain_orders_topologically() {
        let ir = merged(
            vec![
                symbol("a", SymbolKind::Method, "f1", false),
                symbol("b", SymbolKind::Method, "f1", false),
                symbol("c", SymbolKind::Method, "f2", false),
            ],
            vec![
                edge("a", "b", 3, true),
                edge("b", "c", 0, true),
            ],
            Vec::new(),
        );
        let s = slice_of(&ir);
        let ids: Vec<&str> = s.ordered_symbols.iter().map(|x| x.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(s.relevant_files, vec!["src/A.java", "src/B.java"]);
        assert_eq!(s.edges.len(), 2);
    }

    #[test]
    fn empty_expansion_yields_empty_slice() {
        let ir = merged(
            vec![symbol("a", SymbolKind::Method, "f1", false)],
            vec![edge("a", "a", 0, true)],
            Vec::new(),
        );
        let s = slice_of(&ir);
        assert!(s.is_empty());
        assert!(s.relevant_files.is_empty());
        assert!(s.edges.is_empty());
    }

    #[test]
    fn cycle_members_land_in_deterministic_tail() {
        // Runtime cycle x <-> y plus hot z feeding in; 2-cycle collapse
        // leaves x -> y so Kahn can finish, but a 3-cycle stays cyclic.
        let ir = merged(
            vec![
                symbol("p", SymbolKind::Method, "f1", false),
                symbol("q", SymbolKind::Method, "f1", false),
                symbol("r", SymbolKind::Method, "f2", false),
            ],
            vec![
                edge("p", "q", 1, true),
                edge("q", "r", 1, true),
                edge("r", "p", 1, true),
            ],
            Vec::new(),
        );
        let s = slice_of(&ir);
        // All three are cyclic; the tail preserves expanded order, which
        // starts from the hot path (count-sorted then lexicographic).
        assert_eq!(s.ordered_symbols.len(), 3);
        let ids: Vec<&str> = s.ordered_symbols.iter().map(|x| x.id.as_str()).collect();
        assert_eq!(ids, vec!["p", "q", "r"]);
    }

    #[test]
    fn framework_symbols_are_dropped_unless_protected() {
        let ir = merged(
            vec![
                symbol("a", SymbolKind::Method, "f1", false),
                symbol("b", SymbolKind::Method, "f1", false),
                symbol("fw", SymbolKind::Class, "f2", true),
            ],
            vec![
                edge("a", "b", 2, true),
                edge("b", "fw", 0, true),
            ],
            Vec::new(),
        );
        let s = slice_of(&ir);
        let ids: Vec<&str> = s.ordered_symbols.iter().map(|x| x.id.as_str()).collect();
        // fw arrived by radius-1 only, so the filter removes it and its edge.
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(s.edges.len(), 1);
        assert_eq!(s.relevant_files, vec!["src/A.java"]);

        let graph = build_graph(&ir);
        let hot = hot_path(&graph);
        let expanded = expand(&graph, &hot);
        let keep_all = compress(
            &graph,
            &expanded,
            &ir,
            &CompressOptions {
                drop_framework: false,
            },
        );
        assert_eq!(keep_all.ordered_symbols.len(), 3);
    }

    #[test]
    fn hot_framework_symbol_is_protected() {
        let ir = merged(
            vec![
                symbol("a", SymbolKind::Method, "f1", false),
                symbol("fw", SymbolKind::Class, "f2", true),
            ],
            vec![edge("a", "fw", 4, true)],
            Vec::new(),
        );
        let s = slice_of(&ir);
        let ids: Vec<&str> = s.ordered_symbols.iter().map(|x| x.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "fw"]);
    }

    #[test]
    fn duplicate_static_edges_collapse_with_summed_count() {
        // Two static a -> b edges with counts 0 and 3 and no runtime
        // observation of the pair: the deduped edge sums to 3 and stays
        // unobserved.
        let mut dup = edge("a", "b", 0, true);
        dup.call_count = 3;
        let ir = merged(
            vec![
                symbol("a", SymbolKind::Method, "f1", false),
                symbol("b", SymbolKind::Method, "f1", false),
            ],
            vec![edge("a", "b", 0, true), dup],
            Vec::new(),
        );
        let s = slice_of(&ir);
        assert_eq!(s.edges.len(), 1);
        assert_eq!(s.edges[0].call_count, 3);
        assert!(!s.edges[0].runtime_observed);
        assert!(s.edges[0].is_static);
    }

    #[test]
    fn config_influences_group_by_key_first_value_wins() {
        let reads = vec![
            ConfigRead {
                symbol_id: "a".to_string(),
                config_key: "db.url".to_string(),
                resolved_value: Some("jdbc:h2".to_string()),
            },
            ConfigRead {
                symbol_id: "b".to_string(),
                config_key: "db.url".to_string(),
                resolved_value: Some("jdbc:postgres".to_string()),
            },
            ConfigRead {
                symbol_id: "a".to_string(),
                config_key: "db.url".to_string(),
                resolved_value: None,
            },
            ConfigRead {
                symbol_id: "outsider".to_string(),
                config_key: "cache.ttl".to_string(),
                resolved_value: Some("60".to_string()),
            },
        ];
        let ir = merged(
            vec![
                symbol("a", SymbolKind::Method, "f1", false),
                symbol("b", SymbolKind::Method, "f1", false),
            ],
            vec![edge("a", "b", 1, true)],
            reads,
        );
        let s = slice_of(&ir);
        assert_eq!(s.config_influences.len(), 1);
        let inf = &s.config_influences[0];
        assert_eq!(inf.config_key, "db.url");
        assert_eq!(inf.resolved_value, Some("jdbc:h2"));
        assert_eq!(inf.influenced_by, vec!["a", "b"]);
    }
}
