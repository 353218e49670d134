//! Record manifest.
//!
//! The manifest is file IPC from core to adapter: it is written to the
//! output directory before the subprocess is spawned, and the adapter reads
//! it by path.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::OrchestratorResult;

pub const MANIFEST_FILE: &str = "manifest.json";

/// Transform-capture settings forwarded to the agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformCapture {
    pub enabled: bool,
    pub depth: u32,
    pub max_collection_elements: u32,
}

impl Default for TransformCapture {
    fn default() -> Self {
        Self {
            enabled: true,
            depth: 2,
            max_collection_elements: 8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordManifest {
    pub scenario_name: String,
    pub entry_points: Vec<String>,
    pub run_args: Vec<String>,
    pub config_files: Vec<String>,
    pub output_dir: String,
    pub transforms_enabled: bool,
    pub transform_depth: u32,
    pub transform_max_collection_elements: u32,
}

impl RecordManifest {
    pub fn new(
        scenario_name: impl Into<String>,
        entry_points: Vec<String>,
        run_args: Vec<String>,
        config_files: Vec<String>,
        output_dir: &Path,
        transforms: &TransformCapture,
    ) -> Self {
        Self {
            scenario_name: scenario_name.into(),
            entry_points,
            run_args,
            config_files,
            output_dir: output_dir.display().to_string(),
            transforms_enabled: transforms.enabled,
            transform_depth: transforms.depth,
            transform_max_collection_elements: transforms.max_collection_elements,
        }
    }
}

/// Serialize the manifest into `<out_dir>/manifest.json` and return the path.
pub fn write_manifest(out_dir: &Path, manifest: &RecordManifest) -> OrchestratorResult<PathBuf> {
    fs::create_dir_all(out_dir)?;
    let path = out_dir.join(MANIFEST_FILE);
    let mut bytes = serde_json::to_vec_pretty(manifest).map_err(std::io::Error::other)?;
    bytes.push(b'\n');
    fs::write(&path, bytes)?;
    tracing::debug!(path = %path.display(), "wrote record manifest");
    Ok(path)
}
