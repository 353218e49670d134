//! IR wire model.
//!
//! Strongly-typed representations of the adapter-emitted JSON files
//! (`static_ir.json`, `runtime_trace.json`). These are "dumb" data: higher
//! layers apply validation, merging, and policy.
//!
//! Wire conventions:
//! - keys are snake_case; `static` on call edges maps to [`CallEdge::is_static`]
//! - unknown keys are ignored, absent arrays decode as empty
//! - optional keys decode as `None`
//! - unknown symbol kinds are a decode error, not a silent downcast; extending
//!   [`SymbolKind`] requires an IR version bump

use serde::{Deserialize, Serialize};

/// A source file referenced by symbols. `hash` is SHA-256 hex of the file
/// contents as computed by the adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFile {
    pub id: String,
    pub path: String,
    pub language: String,
    pub hash: String,
}

/// The closed set of symbol kinds understood by this IR version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
    Class,
    Method,
    Constructor,
    Interface,
}

impl SymbolKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Method => "method",
            Self::Constructor => "constructor",
            Self::Interface => "interface",
        }
    }
}

/// A declared symbol. `id` is globally unique within a run and encodes the
/// language and fully-qualified name (see [`display_name`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Symbol {
    pub id: String,
    pub kind: SymbolKind,
    pub name: String,
    pub language: String,
    #[serde(default)]
    pub file_id: Option<String>,
    pub line_start: u32,
    pub line_end: u32,
    pub visibility: String,
    /// Id of the enclosing class/interface, if any.
    #[serde(default)]
    pub container: Option<String>,
    #[serde(default)]
    pub annotations: Vec<String>,
    pub is_entry_point: bool,
    pub is_framework: bool,
    pub is_generated: bool,
}

/// A directed call edge between two symbol ids of the same IR.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallEdge {
    #[serde(rename = "caller")]
    pub caller_id: String,
    #[serde(rename = "callee")]
    pub callee_id: String,
    #[serde(rename = "static")]
    pub is_static: bool,
    #[serde(default)]
    pub runtime_observed: bool,
    #[serde(default)]
    pub call_count: u64,
}

/// A configuration key read observed for a symbol. `resolved_value` is `None`
/// when the key was unresolved or unset at read time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfigRead {
    pub symbol_id: String,
    pub config_key: String,
    #[serde(default)]
    pub resolved_value: Option<String>,
}

/// Runtime observation of a single symbol.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservedSymbol {
    pub symbol_id: String,
    pub call_count: u64,
}

/// Runtime observation of a caller/callee pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservedEdge {
    pub caller: String,
    pub callee: String,
    pub call_count: u64,
}

/// The scenario that was exercised to produce the runtime data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    #[serde(default)]
    pub entry_points: Vec<String>,
    #[serde(default)]
    pub run_args: Vec<String>,
    #[serde(default)]
    pub config_files: Vec<String>,
}

/// Runtime block embedded in `static_ir.json`. Permitted, but the
/// authoritative runtime data lives in `runtime_trace.json`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbeddedRuntime {
    #[serde(default)]
    pub observed_symbols: Vec<ObservedSymbol>,
    #[serde(default)]
    pub observed_edges: Vec<ObservedEdge>,
}

/// Top-level structure of `static_ir.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IrRoot {
    pub ir_version: String,
    pub language: String,
    pub repo_root: String,
    pub build_id: String,
    pub adapter_version: String,
    pub scenario: Scenario,
    #[serde(default)]
    pub files: Vec<SourceFile>,
    #[serde(default)]
    pub symbols: Vec<Symbol>,
    #[serde(default)]
    pub call_edges: Vec<CallEdge>,
    #[serde(default)]
    pub config_reads: Vec<ConfigRead>,
    #[serde(default)]
    pub runtime: EmbeddedRuntime,
}

/// Top-level structure of `runtime_trace.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuntimeTrace {
    #[serde(default)]
    pub observed_symbols: Vec<ObservedSymbol>,
    #[serde(default)]
    pub observed_edges: Vec<ObservedEdge>,
    #[serde(default)]
    pub config_reads: Vec<ConfigRead>,
}

impl RuntimeTrace {
    /// True if the trace carries any observation at all.
    pub fn has_observations(&self) -> bool {
        !self.observed_symbols.is_empty() || !self.observed_edges.is_empty()
    }
}

/// Short display form of a symbol id: the substring after the first `::`,
/// which carries the type and member. Ids without a `::` are returned whole.
pub fn display_name(id: &str) -> &str {
    match id.find("::") {
        Some(i) => &id[i + 2..],
        None => id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symbol_decodes_with_optional_fields_absent() {
        let s: Symbol = serde_json::from_value(serde_json::json!({
            "id": "java::com.shop.OrderService::submit(Order)",
            "kind": "method",
            "name": "submit",
            "language": "java",
            "line_start": 10,
            "line_end": 25,
            "visibility": "public",
            "is_entry_point": true,
            "is_framework": false,
            "is_generated": false
        }))
        .unwrap();
        assert_eq!(s.file_id, None);
        assert_eq!(s.container, None);
        assert!(s.annotations.is_empty());
    }

    #[test]
    fn unknown_symbol_kind_is_rejected() {
        let r: Result<SymbolKind, _> = serde_json::from_value(serde_json::json!("lambda"));
        assert!(r.is_err());
    }

    #[test]
    fn call_edge_uses_wire_key_static() {
        let e: CallEdge = serde_json::from_value(serde_json::json!({
            "caller": "a",
            "callee": "b",
            "static": true,
            "runtime_observed": false,
            "call_count": 0
        }))
        .unwrap();
        assert!(e.is_static);
        let v = serde_json::to_value(&e).unwrap();
        assert_eq!(v["static"], true);
    }

    #[test]
    fn unknown_fields_are_tolerated() {
        let t: RuntimeTrace = serde_json::from_value(serde_json::json!({
            "observed_symbols": [],
            "observed_edges": [],
            "config_reads": [],
            "some_future_field": {"x": 1}
        }))
        .unwrap();
        assert!(!t.has_observations());
    }

    #[test]
    fn display_name_strips_language_prefix() {
        assert_eq!(
            display_name("java::com.shop.OrderService::submit(Order)"),
            "com.shop.OrderService::submit(Order)"
        );
        assert_eq!(display_name("no-separator"), "no-separator");
    }
}
