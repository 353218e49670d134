use std::io::Write;
use std::path::Path;

use anyhow::Result;

use ctxslice_store::packager::{ARCHITECTURE_FILE, METADATA_FILE, RELEVANT_FILES_FILE};
use ctxslice_store::SLICE_DIR;

use crate::errors::UserError;
use crate::output;

/// Assemble a task prompt from the packaged slice and print it. The HTTP
/// round-trip to a model lives outside this tool; the key check here only
/// keeps users from discovering a missing credential after copy-pasting.
pub fn run(project_root: &str, task: &str) -> Result<()> {
    if task.trim().is_empty() {
        return Err(UserError::new("missing task (usage: ctxslice prompt \"<task>\")").into());
    }
    if std::env::var_os("ANTHROPIC_API_KEY").is_none() {
        return Err(UserError::new("ANTHROPIC_API_KEY is not set").into());
    }

    let slice_dir = Path::new(project_root).join(SLICE_DIR);
    let architecture = slice_dir.join(ARCHITECTURE_FILE);
    if !architecture.is_file() || !slice_dir.join(METADATA_FILE).is_file() {
        return Err(UserError::new(format!(
            "no packaged slice under {} (run `ctxslice slice` first)",
            slice_dir.display()
        ))
        .into());
    }

    let architecture = std::fs::read_to_string(&architecture)?;
    let relevant_files =
        std::fs::read_to_string(slice_dir.join(RELEVANT_FILES_FILE)).unwrap_or_default();

    let mut out = output::stdout();
    writeln!(out, "# Task\n\n{task}\n")?;
    writeln!(out, "# Scenario context\n\n{architecture}")?;
    if !relevant_files.is_empty() {
        writeln!(out, "# Files to consider\n\n{relevant_files}")?;
    }
    writeln!(
        out,
        "Ground your answer in the call path and files above; they reflect what the scenario actually executed."
    )?;
    Ok(())
}
