use std::path::PathBuf;

use thiserror::Error;

/// Errors that terminate a single suggestion request
///
/// Every variant is surfaced to the user as an error notification. None are
/// retried; the user re-triggers manually.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SuggestError {
    #[error("Not inside a git repository")]
    NotAVersionControlRepo,

    #[error("No staged changes. Stage files with `git add` first.")]
    NoStagedChanges,

    #[error("Command not available: {0}")]
    CommandUnavailable(String),

    #[error("AI command timed out after {0} ms")]
    ProcessTimeout(u64),

    #[error("AI command failed (exit code {}): {stderr}", exit_code_label(.code))]
    ProcessNonZeroExit { code: Option<i32>, stderr: String },

    #[error("Malformed AI response: {0}")]
    MalformedResponse(String),

    /// Request superseded by a newer one, or the worker is shutting down
    #[error("Request cancelled")]
    Cancelled,

    #[error("IO error: {0}")]
    Io(String),
}

fn exit_code_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => code.to_string(),
        None => "none".to_string(),
    }
}

impl From<std::io::Error> for SuggestError {
    fn from(err: std::io::Error) -> Self {
        SuggestError::Io(err.to_string())
    }
}

/// Errors loading or writing the configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Failed to write config {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize config: {0}")]
    Serialize(String),

    #[error("Could not determine home directory")]
    NoHomeDir,
}

/// Errors from host buffer operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    #[error("Unknown buffer {0}")]
    UnknownBuffer(u64),

    #[error("Line range {start}..{end} out of bounds for buffer with {len} lines")]
    OutOfRange { start: usize, end: usize, len: usize },
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod error_tests;
