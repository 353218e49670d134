//! IR file loading.
//!
//! Reads UTF-8 JSON from disk into owned IR values; the source buffer is
//! released as soon as serde finishes. Unknown JSON fields are tolerated,
//! absent arrays decode empty, and failures come back as values — these
//! functions never panic.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

use ctxslice_core::ir::{IrRoot, RuntimeTrace};

use crate::{StoreError, StoreResult};

/// Conventional file names within the slice directory.
pub const STATIC_IR_FILE: &str = "static_ir.json";
pub const RUNTIME_TRACE_FILE: &str = "runtime_trace.json";

fn read_json<T: DeserializeOwned>(path: &Path) -> StoreResult<T> {
    let raw = fs::read_to_string(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => StoreError::FileNotFound(path.to_path_buf()),
        _ => StoreError::Io(e),
    })?;
    serde_json::from_str(&raw).map_err(|e| StoreError::ParseFailure {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })
}

/// Load and decode `static_ir.json`.
pub fn load_static_ir(path: &Path) -> StoreResult<IrRoot> {
    let ir: IrRoot = read_json(path)?;
    tracing::debug!(
        path = %path.display(),
        symbols = ir.symbols.len(),
        edges = ir.call_edges.len(),
        "loaded static IR"
    );
    Ok(ir)
}

/// Load and decode `runtime_trace.json`.
pub fn load_runtime_trace(path: &Path) -> StoreResult<RuntimeTrace> {
    let trace: RuntimeTrace = read_json(path)?;
    tracing::debug!(
        path = %path.display(),
        observed_edges = trace.observed_edges.len(),
        "loaded runtime trace"
    );
    Ok(trace)
}

/// Locate the runtime trace within a slice directory. Adapters may nest it
/// under `runtime/`.
pub fn find_runtime_trace(slice_dir: &Path) -> Option<PathBuf> {
    let direct = slice_dir.join(RUNTIME_TRACE_FILE);
    if direct.is_file() {
        return Some(direct);
    }
    let nested = slice_dir.join("runtime").join(RUNTIME_TRACE_FILE);
    nested.is_file().then_some(nested)
}
