//! Error types for ctxslice-core.
//!
//! Load-time and orchestration failures live in the crates that perform I/O;
//! this enum covers the faults the pure pipeline itself can produce. The
//! compressor never fails on validated input, so the surface here is small.

use thiserror::Error;

pub type SliceResult<T> = Result<T, SliceError>;

#[derive(Debug, Error)]
pub enum SliceError {
    /// The IR schema version does not exactly match [`crate::IR_VERSION`].
    #[error("incompatible IR version: expected {expected}, got {found}")]
    IncompatibleIrVersion {
        expected: &'static str,
        found: String,
    },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("invariant violated: {0}")]
    Invariant(String),

    #[error("serialization failure: {0}")]
    Serialization(String),
}

impl SliceError {
    pub fn incompatible_ir_version(found: impl Into<String>) -> Self {
        Self::IncompatibleIrVersion {
            expected: crate::IR_VERSION,
            found: found.into(),
        }
    }

    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        Self::Invariant(msg.into())
    }

    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }
}
