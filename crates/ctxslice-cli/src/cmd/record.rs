use std::path::{Path, PathBuf};

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use ctxslice_orchestrator::{orchestrate_record, RecordRequest};
use ctxslice_store::SLICE_DIR;

use crate::output;
use crate::scenario::{ProjectConfig, DEFAULT_CONFIG_FILE};

#[derive(Debug, Serialize)]
pub struct RecordOut {
    pub scenario: String,
    pub project_type: String,
    pub manifest: String,
    pub output_dir: String,
}

pub async fn run(
    project_root: &str,
    scenario: &str,
    config: Option<&str>,
    run_args_override: Option<&str>,
) -> Result<()> {
    let root = Path::new(project_root);
    let config_path = match config {
        Some(p) => PathBuf::from(p),
        None => root.join(DEFAULT_CONFIG_FILE),
    };
    let cfg = ProjectConfig::load(&config_path)?;
    let entry = cfg.scenario(scenario);

    let run_args = match run_args_override {
        Some(s) => s.split_whitespace().map(str::to_string).collect(),
        None => entry.run_args,
    };

    let mut req = RecordRequest::new(
        root.to_path_buf(),
        root.join(SLICE_DIR),
        scenario,
        root.join(&cfg.adapter_jar),
        root.join(&cfg.agent_jar),
        cfg.namespace.clone(),
    );
    req.entry_points = entry.entry_points;
    req.run_args = run_args;
    req.config_files = entry.config_files;
    req.transforms = (&cfg.transforms).into();

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::with_template("{spinner} {msg}").unwrap());
    pb.enable_steady_tick(std::time::Duration::from_millis(80));
    pb.set_message(format!("recording scenario {scenario}"));

    let outcome = orchestrate_record(&req).await;
    pb.finish_and_clear();
    let outcome = outcome?;

    output::print(&RecordOut {
        scenario: scenario.to_string(),
        project_type: outcome.project_type.as_str().to_string(),
        manifest: outcome.manifest_path.display().to_string(),
        output_dir: outcome.output_dir.display().to_string(),
    })?;
    Ok(())
}
