//! Scenario configuration.
//!
//! `ctxslice.json` at the project root (or `--config`) describes how to reach
//! the adapter and what each scenario exercises. The CLI reads it; nothing in
//! the core crates does.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::Result;
use serde::Deserialize;

use ctxslice_orchestrator::TransformCapture;

use crate::errors::UserError;

pub const DEFAULT_CONFIG_FILE: &str = "ctxslice.json";

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectConfig {
    pub adapter_jar: String,
    pub agent_jar: String,
    pub namespace: String,
    #[serde(default)]
    pub transforms: TransformsConfig,
    #[serde(default)]
    pub scenarios: BTreeMap<String, ScenarioEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TransformsConfig {
    pub enabled: bool,
    pub depth: u32,
    pub max_collection_elements: u32,
}

impl Default for TransformsConfig {
    fn default() -> Self {
        let d = TransformCapture::default();
        Self {
            enabled: d.enabled,
            depth: d.depth,
            max_collection_elements: d.max_collection_elements,
        }
    }
}

impl From<&TransformsConfig> for TransformCapture {
    fn from(c: &TransformsConfig) -> Self {
        Self {
            enabled: c.enabled,
            depth: c.depth,
            max_collection_elements: c.max_collection_elements,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ScenarioEntry {
    pub entry_points: Vec<String>,
    pub run_args: Vec<String>,
    pub config_files: Vec<String>,
}

impl ProjectConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|_| {
            UserError::new(format!(
                "no scenario config at {} (create one or pass --config)",
                path.display()
            ))
        })?;
        let cfg: Self = serde_json::from_str(&raw)
            .map_err(|e| UserError::new(format!("invalid scenario config: {e}")))?;
        Ok(cfg)
    }

    /// Scenario settings by name; unknown names run with empty settings so
    /// the adapter can still resolve entry points itself.
    pub fn scenario(&self, name: &str) -> ScenarioEntry {
        match self.scenarios.get(name) {
            Some(entry) => entry.clone(),
            None => {
                tracing::warn!(scenario = name, "scenario not in config; using defaults");
                ScenarioEntry::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_parses_with_scenarios() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        std::fs::write(
            &path,
            serde_json::json!({
                "adapter_jar": "tools/adapter.jar",
                "agent_jar": "tools/agent.jar",
                "namespace": "com.shop",
                "scenarios": {
                    "submit-order": {
                        "entry_points": ["java::com.shop.Api::submit(Order)"],
                        "run_args": ["--profile", "test"]
                    }
                }
            })
            .to_string(),
        )
        .unwrap();

        let cfg = ProjectConfig::load(&path).unwrap();
        assert_eq!(cfg.namespace, "com.shop");
        let s = cfg.scenario("submit-order");
        assert_eq!(s.entry_points.len(), 1);
        assert_eq!(s.run_args, vec!["--profile", "test"]);
        assert!(cfg.scenario("unknown").entry_points.is_empty());
        assert!(cfg.transforms.enabled);
    }

    #[test]
    fn missing_config_is_a_user_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = ProjectConfig::load(&dir.path().join("nope.json")).unwrap_err();
        assert!(err.downcast_ref::<UserError>().is_some());
    }
}
