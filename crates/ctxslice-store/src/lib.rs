//! ctxslice-store
//!
//! File-facing half of the pipeline:
//! - [`loader`]: parse `static_ir.json` / `runtime_trace.json` into IR values
//! - [`packager`]: write the four slice artifacts under `.context-slice/`
//!
//! Everything here is deterministic given its inputs; the only clock read in
//! the crate is [`packager::PackageMeta::now`], which callers invoke
//! explicitly and tests replace with a pinned value.

use std::path::PathBuf;

use thiserror::Error;

pub mod loader;
pub mod packager;

/// Directory under the project root that holds IR inputs and slice artifacts.
pub const SLICE_DIR: &str = ".context-slice";

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("failed to parse {}: {detail}", .path.display())]
    ParseFailure { path: PathBuf, detail: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
