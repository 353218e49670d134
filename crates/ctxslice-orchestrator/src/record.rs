//! Record orchestration: detect, prepare the slice directory, write the
//! manifest, then hand off to the adapter subprocess.

use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use crate::detect::{detect_project_type, ProjectType};
use crate::manifest::{write_manifest, RecordManifest, TransformCapture};
use crate::runner::{run_adapter, AdapterInvocation, DEFAULT_TIMEOUT};
use crate::OrchestratorResult;

/// Everything needed to run one fresh recording.
#[derive(Debug, Clone)]
pub struct RecordRequest {
    pub project_root: PathBuf,
    /// Slice directory under the project root, e.g. `.context-slice`.
    pub output_dir: PathBuf,
    pub scenario_name: String,
    pub entry_points: Vec<String>,
    pub run_args: Vec<String>,
    pub config_files: Vec<String>,
    pub adapter_jar: PathBuf,
    pub agent_jar: PathBuf,
    pub namespace: String,
    /// The JVM launcher; resolvable through PATH by default.
    pub java_bin: PathBuf,
    pub transforms: TransformCapture,
    pub timeout: Duration,
}

impl RecordRequest {
    pub fn new(
        project_root: PathBuf,
        output_dir: PathBuf,
        scenario_name: impl Into<String>,
        adapter_jar: PathBuf,
        agent_jar: PathBuf,
        namespace: impl Into<String>,
    ) -> Self {
        Self {
            project_root,
            output_dir,
            scenario_name: scenario_name.into(),
            entry_points: Vec::new(),
            run_args: Vec::new(),
            config_files: Vec::new(),
            adapter_jar,
            agent_jar,
            namespace: namespace.into(),
            java_bin: PathBuf::from("java"),
            transforms: TransformCapture::default(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// What a successful recording leaves behind.
#[derive(Debug)]
pub struct RecordOutcome {
    pub project_type: ProjectType,
    pub manifest_path: PathBuf,
    pub output_dir: PathBuf,
}

/// Detect the project, write the manifest, run the adapter to completion.
/// The manifest lands on disk before the subprocess starts; the adapter
/// reads it by path.
pub async fn orchestrate_record(req: &RecordRequest) -> OrchestratorResult<RecordOutcome> {
    let project_type = detect_project_type(&req.project_root)?;
    tracing::debug!(project_type = project_type.as_str(), "detected project");

    fs::create_dir_all(&req.output_dir)?;

    let manifest = RecordManifest::new(
        &req.scenario_name,
        req.entry_points.clone(),
        req.run_args.clone(),
        req.config_files.clone(),
        &req.output_dir,
        &req.transforms,
    );
    let manifest_path = write_manifest(&req.output_dir, &manifest)?;

    let mut invocation = AdapterInvocation::new(
        req.adapter_jar.clone(),
        req.agent_jar.clone(),
        req.namespace.clone(),
        manifest_path.clone(),
        req.output_dir.clone(),
    );
    invocation.java_bin = req.java_bin.clone();
    invocation.timeout = req.timeout;

    run_adapter(&invocation).await?;

    Ok(RecordOutcome {
        project_type,
        manifest_path,
        output_dir: req.output_dir.clone(),
    })
}
