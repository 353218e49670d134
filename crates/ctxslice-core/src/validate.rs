//! IR validation.
//!
//! The validator is the single gate between adapter output and the pipeline:
//! downstream stages assume every symbol resolves to a known file and every
//! edge endpoint resolves to a surviving symbol. Inconsistent entries are
//! quarantined (dropped with a warning) rather than failing the run; only a
//! schema version mismatch is fatal.

use std::collections::HashSet;
use std::fmt;

use crate::errors::{SliceError, SliceResult};
use crate::ir::IrRoot;

/// A non-fatal finding recorded while quarantining IR entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationWarning {
    /// Symbol dropped: `file_id` was absent or did not resolve in `files`.
    InvalidFileId { symbol_id: String },
    /// Edge dropped: caller is not a surviving symbol.
    InvalidCallerId { caller_id: String, callee_id: String },
    /// Edge dropped: callee is not a surviving symbol.
    InvalidCalleeId { caller_id: String, callee_id: String },
}

impl fmt::Display for ValidationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFileId { symbol_id } => {
                write!(f, "symbol {symbol_id} references an unknown file id")
            }
            Self::InvalidCallerId {
                caller_id,
                callee_id,
            } => write!(f, "edge {caller_id} -> {callee_id} has an unknown caller"),
            Self::InvalidCalleeId {
                caller_id,
                callee_id,
            } => write!(f, "edge {caller_id} -> {callee_id} has an unknown callee"),
        }
    }
}

/// Surviving IR plus the quarantine record.
#[derive(Debug)]
pub struct ValidationResult {
    pub ir: IrRoot,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }
}

/// Validate an IR root: enforce the schema version, quarantine symbols whose
/// file reference does not resolve, then quarantine edges whose endpoints do
/// not survive. Warnings are informational and influence nothing downstream.
pub fn validate(mut ir: IrRoot) -> SliceResult<ValidationResult> {
    if ir.ir_version != crate::IR_VERSION {
        return Err(SliceError::incompatible_ir_version(ir.ir_version));
    }

    let mut warnings = Vec::new();

    let file_ids: HashSet<&str> = ir.files.iter().map(|f| f.id.as_str()).collect();

    let mut valid_symbols: HashSet<String> = HashSet::with_capacity(ir.symbols.len());
    ir.symbols.retain(|sym| {
        let ok = matches!(&sym.file_id, Some(fid) if file_ids.contains(fid.as_str()));
        if ok {
            valid_symbols.insert(sym.id.clone());
        } else {
            tracing::debug!(symbol = %sym.id, "quarantined symbol: invalid file id");
            warnings.push(ValidationWarning::InvalidFileId {
                symbol_id: sym.id.clone(),
            });
        }
        ok
    });

    ir.call_edges.retain(|edge| {
        if !valid_symbols.contains(&edge.caller_id) {
            tracing::debug!(caller = %edge.caller_id, callee = %edge.callee_id, "quarantined edge: unknown caller");
            warnings.push(ValidationWarning::InvalidCallerId {
                caller_id: edge.caller_id.clone(),
                callee_id: edge.callee_id.clone(),
            });
            return false;
        }
        if !valid_symbols.contains(&edge.callee_id) {
            tracing::debug!(caller = %edge.caller_id, callee = %edge.callee_id, "quarantined edge: unknown callee");
            warnings.push(ValidationWarning::InvalidCalleeId {
                caller_id: edge.caller_id.clone(),
                callee_id: edge.callee_id.clone(),
            });
            return false;
        }
        true
    });

    Ok(ValidationResult { ir, warnings })
}
