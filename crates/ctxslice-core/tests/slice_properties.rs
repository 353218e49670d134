//! Property tests for the slice layer laws:
//! - edge dedup: one edge per pair, counts sum, flags OR
//! - topological soundness: for acyclic inputs, callers precede callees

use std::collections::HashMap;

use proptest::prelude::*;

use ctxslice_core::graph::EdgeMeta;
use ctxslice_core::ir::{CallEdge, Scenario, SourceFile, Symbol, SymbolKind};
use ctxslice_core::merge::MergedIr;
use ctxslice_core::pipeline::{slice_merged, SliceOptions};
use ctxslice_core::slice::dedup_edges;

const IDS: [&str; 5] = ["sym_a", "sym_b", "sym_c", "sym_d", "sym_e"];

fn raw_edge() -> impl Strategy<Value = (usize, usize, u64, bool, bool)> {
    (0..IDS.len(), 0..IDS.len(), 0u64..100, any::<bool>(), any::<bool>())
}

proptest! {
    #[test]
    fn dedup_law(edges in proptest::collection::vec(raw_edge(), 0..40)) {
        let input: Vec<(&str, &str, EdgeMeta)> = edges
            .iter()
            .map(|&(c, e, n, obs, st)| {
                (
                    IDS[c],
                    IDS[e],
                    EdgeMeta {
                        call_count: n,
                        runtime_observed: obs,
                        is_static: st,
                    },
                )
            })
            .collect();

        let out = dedup_edges(input.iter().copied());

        // At most one edge per pair.
        let mut seen = std::collections::HashSet::new();
        for e in &out {
            prop_assert!(seen.insert((e.caller_id, e.callee_id)));
        }

        // Sum / OR per pair.
        let mut expected: HashMap<(&str, &str), (u64, bool, bool)> = HashMap::new();
        for (c, e, m) in &input {
            let slot = expected.entry((c, e)).or_insert((0, false, false));
            slot.0 += m.call_count;
            slot.1 |= m.runtime_observed;
            slot.2 |= m.is_static;
        }
        prop_assert_eq!(out.len(), expected.len());
        for e in &out {
            let (count, obs, st) = expected[&(e.caller_id, e.callee_id)];
            prop_assert_eq!(e.call_count, count);
            prop_assert_eq!(e.runtime_observed, obs);
            prop_assert_eq!(e.is_static, st);
        }
    }
}

fn symbol(id: &str) -> Symbol {
    Symbol {
        id: id.to_string(),
        kind: SymbolKind::Method,
        name: id.to_string(),
        language: "java".to_string(),
        file_id: Some("f1".to_string()),
        line_start: 1,
        line_end: 2,
        visibility: "public".to_string(),
        container: None,
        annotations: Vec::new(),
        is_entry_point: false,
        is_framework: false,
        is_generated: false,
    }
}

fn merged_dag(n: usize, picks: &[(usize, usize)]) -> MergedIr {
    let names: Vec<String> = (0..n).map(|i| format!("sym_{i:02}")).collect();
    let mut edges = Vec::new();
    for &(a, b) in picks {
        let (a, b) = (a % n, b % n);
        if a == b {
            continue;
        }
        // Orient low -> high so the input stays acyclic.
        let (lo, hi) = if a < b { (a, b) } else { (b, a) };
        edges.push(CallEdge {
            caller_id: names[lo].clone(),
            callee_id: names[hi].clone(),
            is_static: true,
            runtime_observed: true,
            call_count: 1,
        });
    }
    MergedIr {
        language: "java".to_string(),
        repo_root: "/repo".to_string(),
        build_id: "b1".to_string(),
        adapter_version: "0.1.0".to_string(),
        scenario: Scenario {
            name: "prop".to_string(),
            ..Default::default()
        },
        files: vec![SourceFile {
            id: "f1".to_string(),
            path: "src/A.java".to_string(),
            language: "java".to_string(),
            hash: "0".repeat(64),
        }],
        symbols: names.iter().map(|s| symbol(s)).collect(),
        call_edges: edges,
        config_reads: Vec::new(),
        runtime_captured: true,
    }
}

proptest! {
    #[test]
    fn topological_soundness_on_dags(
        n in 2usize..8,
        picks in proptest::collection::vec((0usize..8, 0usize..8), 0..24),
    ) {
        let ir = merged_dag(n, &picks);
        let (slice, _) = slice_merged(&ir, &SliceOptions::default());

        let position: HashMap<&str, usize> = slice
            .ordered_symbols
            .iter()
            .enumerate()
            .map(|(i, s)| (s.id.as_str(), i))
            .collect();

        for e in &slice.edges {
            let pc = position[e.caller_id];
            let pe = position[e.callee_id];
            prop_assert!(pc < pe, "{} does not precede {}", e.caller_id, e.callee_id);
        }
    }
}
