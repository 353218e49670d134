//! Project-type detection.
//!
//! Probes fixed marker files at the project root, in priority order. Java
//! markers win: a `pom.xml` next to, say, a `go.mod` is treated as a Java
//! project with a warning, because the adapter we can actually run is the
//! Java one.

use std::path::Path;

use crate::{OrchestratorError, OrchestratorResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectType {
    Java,
    Go,
    Python,
    Unknown,
}

impl ProjectType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Java => "java",
            Self::Go => "go",
            Self::Python => "python",
            Self::Unknown => "unknown",
        }
    }
}

const GO_MARKER: &str = "go.mod";
const PYTHON_MARKERS: [&str; 2] = ["requirements.txt", "pyproject.toml"];
const GRADLE_MARKERS: [&str; 2] = ["build.gradle", "build.gradle.kts"];

/// Classify the project root by its build markers. Returns `Unknown` rather
/// than an error so callers can decide how hard to fail.
pub fn detect_markers(root: &Path) -> ProjectType {
    let has = |name: &str| root.join(name).is_file();

    let maven = has("pom.xml");
    let gradle = GRADLE_MARKERS.iter().any(|m| has(m));
    let go = has(GO_MARKER);
    let python = PYTHON_MARKERS.iter().any(|m| has(m));

    if maven {
        if go || python {
            tracing::warn!(
                root = %root.display(),
                "pom.xml coexists with non-Java markers; treating project as Java"
            );
        }
        return ProjectType::Java;
    }
    if gradle {
        return ProjectType::Java;
    }
    if go {
        return ProjectType::Go;
    }
    if python {
        return ProjectType::Python;
    }
    ProjectType::Unknown
}

/// Detection as the orchestrator consumes it: `Unknown` is an error.
pub fn detect_project_type(root: &Path) -> OrchestratorResult<ProjectType> {
    match detect_markers(root) {
        ProjectType::Unknown => Err(OrchestratorError::UnsupportedLanguage),
        ty => Ok(ty),
    }
}
