//! Staged-change source
//!
//! Queries git for the diff of the index against HEAD. Both operations are
//! synchronous; "not a repository" is an ordinary outcome, not a crash.

use std::path::PathBuf;
use std::process::{Command, Stdio};

use crate::error::SuggestError;

/// Anything that can report the currently staged changes
pub trait ChangeSource: Send {
    /// Whether the working directory is inside a repository
    fn is_repository(&self) -> Result<bool, SuggestError>;

    /// Unified diff of the staged changes
    fn staged_diff(&self) -> Result<String, SuggestError>;

    /// Staged diff, failing when outside a repository or nothing is staged
    fn get_staged_changes(&self) -> Result<String, SuggestError> {
        if !self.is_repository()? {
            return Err(SuggestError::NotAVersionControlRepo);
        }

        let diff = self.staged_diff()?;
        if diff.trim().is_empty() {
            return Err(SuggestError::NoStagedChanges);
        }

        Ok(diff)
    }
}

/// [`ChangeSource`] backed by the `git` executable
#[derive(Debug, Clone)]
pub struct GitChangeSource {
    workdir: PathBuf,
    program: String,
}

impl GitChangeSource {
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
            program: "git".to_string(),
        }
    }

    /// Use a different git executable (name on PATH or absolute path)
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    fn git(&self) -> Result<Command, SuggestError> {
        let program = which::which(&self.program).map_err(|e| {
            SuggestError::CommandUnavailable(format!("{}: {}", self.program, e))
        })?;

        let mut command = Command::new(program);
        command
            .current_dir(&self.workdir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        Ok(command)
    }
}

impl ChangeSource for GitChangeSource {
    fn is_repository(&self) -> Result<bool, SuggestError> {
        let output = self
            .git()?
            .args(["rev-parse", "--is-inside-work-tree"])
            .output()
            .map_err(|e| SuggestError::CommandUnavailable(format!("{}: {}", self.program, e)))?;

        Ok(output.status.success() && String::from_utf8_lossy(&output.stdout).trim() == "true")
    }

    fn staged_diff(&self) -> Result<String, SuggestError> {
        let output = self
            .git()?
            .args(["diff", "--cached", "--no-color", "--no-ext-diff"])
            .output()
            .map_err(|e| SuggestError::CommandUnavailable(format!("{}: {}", self.program, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            if stderr.contains("not a git repository") {
                return Err(SuggestError::NotAVersionControlRepo);
            }
            return Err(SuggestError::ProcessNonZeroExit {
                code: output.status.code(),
                stderr: stderr.trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

#[cfg(test)]
#[path = "git_tests.rs"]
mod git_tests;
