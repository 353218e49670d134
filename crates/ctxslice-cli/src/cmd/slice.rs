use std::path::Path;

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use time::OffsetDateTime;

use ctxslice_core::ir::RuntimeTrace;
use ctxslice_core::pipeline::{merged_from_parts, slice_merged, SliceOptions};
use ctxslice_store::loader::{self, STATIC_IR_FILE};
use ctxslice_store::packager::{write_slice, PackageMeta};
use ctxslice_store::SLICE_DIR;

use crate::errors::UserError;
use crate::output;

/// Test hook: pins the packaged timestamp to the given unix seconds.
const FAKE_TIME_ENV: &str = "CTXSLICE_FAKE_TIME";

#[derive(Debug, Serialize)]
pub struct SliceOut {
    pub scenario: String,
    pub symbols: usize,
    pub edges: usize,
    pub files: usize,
    pub hot_path: usize,
    pub warnings: usize,
    pub slice_digest: String,
    pub output_dir: String,
}

pub fn run(project_root: &str) -> Result<()> {
    let slice_dir = Path::new(project_root).join(SLICE_DIR);
    let static_ir_path = slice_dir.join(STATIC_IR_FILE);
    if !static_ir_path.is_file() {
        return Err(UserError::new(format!(
            "no recorded IR under {} (run `ctxslice record <scenario>` first)",
            slice_dir.display()
        ))
        .into());
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::with_template("{spinner} {msg}").unwrap());
    pb.enable_steady_tick(std::time::Duration::from_millis(80));

    pb.set_message("loading IR");
    let ir = loader::load_static_ir(&static_ir_path)?;
    let trace = match loader::find_runtime_trace(&slice_dir) {
        Some(path) => loader::load_runtime_trace(&path)?,
        None => {
            tracing::warn!("no runtime trace found; slicing static IR only");
            RuntimeTrace::default()
        }
    };

    pb.set_message("validating and merging");
    let (merged, warnings) = merged_from_parts(ir, &trace)?;
    for w in &warnings {
        tracing::debug!("validation: {w}");
    }

    pb.set_message("computing slice");
    let (slice, stats) = slice_merged(&merged, &SliceOptions::default());

    pb.set_message("packaging");
    let meta = package_meta(&merged);
    let digest = write_slice(&slice_dir, &slice, &meta)?;
    pb.finish_and_clear();

    output::print(&SliceOut {
        scenario: merged.scenario.name.clone(),
        symbols: stats.sliced_symbols,
        edges: stats.sliced_edges,
        files: stats.relevant_files,
        hot_path: stats.hot_path_len,
        warnings: warnings.len(),
        slice_digest: digest,
        output_dir: slice_dir.display().to_string(),
    })?;
    Ok(())
}

fn package_meta(merged: &ctxslice_core::merge::MergedIr) -> PackageMeta {
    let pinned = std::env::var(FAKE_TIME_ENV)
        .ok()
        .and_then(|s| s.parse::<i64>().ok())
        .and_then(|secs| OffsetDateTime::from_unix_timestamp(secs).ok());

    match pinned {
        Some(instant) => PackageMeta::at(
            instant,
            &merged.scenario.name,
            &merged.adapter_version,
            &merged.language,
            merged.runtime_captured,
        ),
        None => PackageMeta::now(
            &merged.scenario.name,
            &merged.adapter_version,
            &merged.language,
            merged.runtime_captured,
        ),
    }
}
