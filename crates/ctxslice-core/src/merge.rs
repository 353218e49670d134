//! Static + runtime merge.
//!
//! Joins validated static IR with the runtime trace into a single [`MergedIr`]
//! that owns all of its string storage. The graph and slice layers borrow from
//! this structure, so it must outlive both.
//!
//! Runtime-only edges matter: a static analyzer sees `Caller -> IFace` while
//! the runtime observes the concrete dispatch `Caller -> ImplX`. Both edges
//! are kept, which is what lets expansion recover alternative implementations.

use std::collections::{HashMap, HashSet};

use crate::ir::{CallEdge, ConfigRead, RuntimeTrace, Scenario, SourceFile, Symbol};
use crate::validate::ValidationResult;

/// The merged, deduplicated IR the rest of the pipeline runs on.
#[derive(Debug)]
pub struct MergedIr {
    pub language: String,
    pub repo_root: String,
    pub build_id: String,
    pub adapter_version: String,
    pub scenario: Scenario,
    pub files: Vec<SourceFile>,
    pub symbols: Vec<Symbol>,
    pub call_edges: Vec<CallEdge>,
    pub config_reads: Vec<ConfigRead>,
    /// True if the trace carried at least one observation.
    pub runtime_captured: bool,
}

/// Merge a validated IR with a runtime trace.
///
/// - symbols are deduplicated by id, first occurrence wins
/// - static edges matched by an observed (caller, callee) pair get
///   `runtime_observed = true` and the observed count; unmatched edges keep
///   their parsed count and are never marked observed
/// - observed pairs with no static counterpart become runtime-only edges,
///   provided both endpoints survived validation
/// - config reads are concatenated static-first, runtime-appended
pub fn merge(validated: ValidationResult, trace: &RuntimeTrace) -> MergedIr {
    let ir = validated.ir;

    let mut seen: HashSet<&str> = HashSet::with_capacity(ir.symbols.len());
    let mut symbols: Vec<Symbol> = Vec::with_capacity(ir.symbols.len());
    for sym in &ir.symbols {
        if seen.insert(sym.id.as_str()) {
            symbols.push(sym.clone());
        }
    }
    let known: HashSet<&str> = symbols.iter().map(|s| s.id.as_str()).collect();

    // Index runtime pairs; duplicate observations of a pair are summed.
    let mut runtime_counts: HashMap<(&str, &str), u64> = HashMap::new();
    for obs in &trace.observed_edges {
        *runtime_counts
            .entry((obs.caller.as_str(), obs.callee.as_str()))
            .or_insert(0) += obs.call_count;
    }

    let mut matched: HashSet<(&str, &str)> = HashSet::new();
    let mut call_edges: Vec<CallEdge> = Vec::with_capacity(ir.call_edges.len());
    for edge in &ir.call_edges {
        let pair = (edge.caller_id.as_str(), edge.callee_id.as_str());
        let mut merged = edge.clone();
        match runtime_counts.get(&pair) {
            Some(count) => {
                matched.insert(pair);
                merged.runtime_observed = true;
                merged.call_count = *count;
            }
            None => {
                merged.runtime_observed = false;
            }
        }
        call_edges.push(merged);
    }

    // Runtime-only edges, in trace order, one per pair.
    let mut emitted: HashSet<(&str, &str)> = HashSet::new();
    for obs in &trace.observed_edges {
        let pair = (obs.caller.as_str(), obs.callee.as_str());
        if matched.contains(&pair) || !emitted.insert(pair) {
            continue;
        }
        if !known.contains(obs.caller.as_str()) || !known.contains(obs.callee.as_str()) {
            tracing::debug!(caller = %obs.caller, callee = %obs.callee, "dropped runtime edge with unknown endpoint");
            continue;
        }
        call_edges.push(CallEdge {
            caller_id: obs.caller.clone(),
            callee_id: obs.callee.clone(),
            is_static: false,
            runtime_observed: true,
            call_count: runtime_counts[&pair],
        });
    }

    let mut config_reads = ir.config_reads.clone();
    config_reads.extend(trace.config_reads.iter().cloned());

    MergedIr {
        language: ir.language,
        repo_root: ir.repo_root,
        build_id: ir.build_id,
        adapter_version: ir.adapter_version,
        scenario: ir.scenario,
        files: ir.files,
        symbols,
        call_edges,
        config_reads,
        runtime_captured: trace.has_observations(),
    }
}
