//! Headless Blender invocation.

use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;
use tracing::{debug, info};

/// Blender executable looked up on `PATH` by default.
pub const DEFAULT_BLENDER: &str = "blender";

/// Errors from running the editor.
#[derive(Debug, Error)]
pub enum EditorError {
    /// The executable could not be started.
    #[error("failed to start {}: {source}", program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The editor ran but exited unsuccessfully.
    #[error("editor exited with {status}: {stderr}")]
    Failed { status: String, stderr: String },

    /// The editor exited cleanly without saving the project.
    #[error("editor did not write {}: {stderr}", project.display())]
    NoProject { project: PathBuf, stderr: String },
}

/// Runs Blender in background mode on a control script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlenderRunner {
    program: PathBuf,
}

impl Default for BlenderRunner {
    fn default() -> Self {
        Self::new(DEFAULT_BLENDER)
    }
}

impl BlenderRunner {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Run `script` headless and check that it saved `project`.
    ///
    /// Blender exits 0 after an uncaught Python exception unless told
    /// otherwise, so a missing project file counts as a failure too.
    pub fn run(&self, script: &Path, project: &Path) -> Result<(), EditorError> {
        debug!(program = %self.program.display(), script = %script.display(), "Starting editor");

        let output = Command::new(&self.program)
            .arg("--background")
            .arg("--python-exit-code")
            .arg("1")
            .arg("--python")
            .arg(script)
            .output()
            .map_err(|e| EditorError::Spawn {
                program: self.program.clone(),
                source: e,
            })?;

        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        if !output.status.success() {
            return Err(EditorError::Failed {
                status: output.status.to_string(),
                stderr,
            });
        }
        if !project.is_file() {
            return Err(EditorError::NoProject {
                project: project.to_path_buf(),
                stderr,
            });
        }

        info!(project = %project.display(), "Editor finished");
        Ok(())
    }
}
