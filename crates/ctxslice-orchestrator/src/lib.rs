//! ctxslice-orchestrator
//!
//! Runs before the core pipeline when the user requests a fresh recording:
//! detect the project type, write the record manifest, then spawn the
//! language-specific extractor subprocess and babysit it (concurrent stderr
//! drain, timeout, kill). No shell is ever involved.

use std::path::PathBuf;

use thiserror::Error;

pub mod detect;
pub mod manifest;
pub mod record;
pub mod runner;

pub use detect::{detect_markers, detect_project_type, ProjectType};
pub use manifest::{write_manifest, RecordManifest, TransformCapture};
pub use record::{orchestrate_record, RecordOutcome, RecordRequest};
pub use runner::{run_adapter, run_adapter_cancellable, AdapterInvocation};

pub type OrchestratorResult<T> = Result<T, OrchestratorError>;

#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("unsupported project type")]
    UnsupportedLanguage,

    #[error("adapter jar not found: {}", .0.display())]
    AdapterNotFound(PathBuf),

    #[error("failed to spawn adapter: {0}")]
    SpawnFailed(#[source] std::io::Error),

    #[error("adapter failed (exit code {exit_code:?}): {stderr_tail}")]
    AdapterFailed {
        exit_code: Option<i32>,
        stderr_tail: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
