//! Slice artifact packaging.
//!
//! Writes the four artifacts into the output directory, creating it when
//! absent. Re-packing overwrites: packaging twice yields the same files as
//! packaging once. All timestamps are injected through [`PackageMeta`], so
//! byte-identical inputs plus a pinned clock give byte-identical artifacts.

use std::fs;
use std::path::Path;

use ctxslice_core::determinism::sorted_deduped;
use ctxslice_core::hash::hash_bytes_hex;
use ctxslice_core::ir::display_name;
use ctxslice_core::slice::Slice;
use serde::Serialize;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::StoreResult;

pub const ARCHITECTURE_FILE: &str = "architecture.md";
pub const RELEVANT_FILES_FILE: &str = "relevant_files.txt";
pub const CALL_GRAPH_FILE: &str = "call_graph.json";
pub const METADATA_FILE: &str = "metadata.json";

/// Run-level metadata recorded into `metadata.json`. Built by the caller;
/// the packager itself reads no clock and no environment.
#[derive(Debug, Clone)]
pub struct PackageMeta {
    pub scenario_name: String,
    pub adapter_version: String,
    pub language: String,
    /// RFC-3339 timestamp label.
    pub timestamp: String,
    pub timestamp_unix: i64,
    pub runtime_captured: bool,
    pub core_version: String,
}

impl PackageMeta {
    /// Meta for the current wall-clock instant. The single clock read in this
    /// crate; tests construct the struct directly instead.
    pub fn now(
        scenario_name: impl Into<String>,
        adapter_version: impl Into<String>,
        language: impl Into<String>,
        runtime_captured: bool,
    ) -> Self {
        let now = OffsetDateTime::now_utc();
        Self::at(now, scenario_name, adapter_version, language, runtime_captured)
    }

    /// Meta pinned to an explicit instant.
    pub fn at(
        instant: OffsetDateTime,
        scenario_name: impl Into<String>,
        adapter_version: impl Into<String>,
        language: impl Into<String>,
        runtime_captured: bool,
    ) -> Self {
        let timestamp = instant
            .format(&Rfc3339)
            .unwrap_or_else(|_| instant.unix_timestamp().to_string());
        Self {
            scenario_name: scenario_name.into(),
            adapter_version: adapter_version.into(),
            language: language.into(),
            timestamp,
            timestamp_unix: instant.unix_timestamp(),
            runtime_captured,
            core_version: ctxslice_core::CORE_VERSION.to_string(),
        }
    }
}

#[derive(Serialize)]
struct EdgeOut<'a> {
    caller: &'a str,
    callee: &'a str,
    call_count: u64,
    runtime_observed: bool,
    is_static: bool,
}

#[derive(Serialize)]
struct CallGraphOut<'a> {
    edges: Vec<EdgeOut<'a>>,
}

/// Write all four artifacts. Returns the serialized call-graph digest so
/// callers can display it.
pub fn write_slice(out_dir: &Path, slice: &Slice<'_>, meta: &PackageMeta) -> StoreResult<String> {
    fs::create_dir_all(out_dir)?;

    let call_graph_bytes = render_call_graph(slice)?;
    let slice_digest = hash_bytes_hex(&call_graph_bytes);

    fs::write(out_dir.join(ARCHITECTURE_FILE), render_architecture(slice))?;
    fs::write(out_dir.join(RELEVANT_FILES_FILE), render_relevant_files(slice))?;
    fs::write(out_dir.join(CALL_GRAPH_FILE), &call_graph_bytes)?;
    fs::write(
        out_dir.join(METADATA_FILE),
        render_metadata(slice, meta, &slice_digest)?,
    )?;

    tracing::debug!(out_dir = %out_dir.display(), digest = %slice_digest, "packaged slice");
    Ok(slice_digest)
}

fn render_architecture(slice: &Slice<'_>) -> String {
    let mut out = format!("# Architecture: {}\n", slice.scenario);
    if slice.is_empty() {
        return out;
    }

    out.push_str("\n## Call Path\n\n");
    for (i, sym) in slice.ordered_symbols.iter().enumerate() {
        out.push_str(&format!("{}. {}\n", i + 1, display_name(&sym.id)));
    }

    out.push_str("\n## Source Files\n\n");
    for path in &slice.relevant_files {
        out.push_str(&format!("- {path}\n"));
    }

    if !slice.config_influences.is_empty() {
        out.push_str("\n## Configuration\n\n");
        for inf in &slice.config_influences {
            let value = inf.resolved_value.unwrap_or("(unset)");
            out.push_str(&format!(
                "- `{}` = {} (read by {} symbol{})\n",
                inf.config_key,
                value,
                inf.influenced_by.len(),
                if inf.influenced_by.len() == 1 { "" } else { "s" },
            ));
        }
    }

    out
}

fn render_relevant_files(slice: &Slice<'_>) -> String {
    let sorted = sorted_deduped(&slice.relevant_files);
    let mut out = String::new();
    for path in sorted {
        out.push_str(path);
        out.push('\n');
    }
    out
}

fn render_call_graph(slice: &Slice<'_>) -> StoreResult<Vec<u8>> {
    let graph = CallGraphOut {
        edges: slice
            .edges
            .iter()
            .map(|e| EdgeOut {
                caller: e.caller_id,
                callee: e.callee_id,
                call_count: e.call_count,
                runtime_observed: e.runtime_observed,
                is_static: e.is_static,
            })
            .collect(),
    };
    let mut bytes = serde_json::to_vec_pretty(&graph).map_err(std::io::Error::other)?;
    bytes.push(b'\n');
    Ok(bytes)
}

fn render_metadata(
    slice: &Slice<'_>,
    meta: &PackageMeta,
    slice_digest: &str,
) -> StoreResult<Vec<u8>> {
    let value = serde_json::json!({
        "scenarioName": meta.scenario_name,
        "adapterVersion": meta.adapter_version,
        "language": meta.language,
        "timestamp": meta.timestamp,
        "timestampUnix": meta.timestamp_unix,
        "runtimeCaptured": meta.runtime_captured,
        "coreVersion": meta.core_version,
        "symbolCount": slice.ordered_symbols.len(),
        "edgeCount": slice.edges.len(),
        "fileCount": slice.relevant_files.len(),
        "sliceDigest": slice_digest,
    });
    let mut bytes = serde_json::to_vec_pretty(&value).map_err(std::io::Error::other)?;
    bytes.push(b'\n');
    Ok(bytes)
}
