//! File-backed logging
//!
//! The editor owns the terminal, so log records go to a file. Nothing is
//! initialized unless `COMMIT_WHISPER_LOG` is set.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::PathBuf;

use env_logger::{Builder, Target};

pub const LOG_ENV: &str = "COMMIT_WHISPER_LOG";
pub const LOG_FILE_ENV: &str = "COMMIT_WHISPER_LOG_FILE";
const DEFAULT_LOG_FILE: &str = "commit-whisper.log";

/// Log file location: `COMMIT_WHISPER_LOG_FILE` or the temp directory
pub fn log_file_path() -> PathBuf {
    std::env::var_os(LOG_FILE_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_LOG_FILE))
}

/// Filter directives for a `COMMIT_WHISPER_LOG` value
///
/// `1`, `true` or an empty value mean "debug for this crate".
pub fn filter_directives(value: &str) -> String {
    match value.trim() {
        "" | "1" | "true" | "on" => "commit_whisper=debug".to_string(),
        other => other.to_string(),
    }
}

/// Install the file logger, returning the log path when enabled
pub fn init() -> io::Result<Option<PathBuf>> {
    let Ok(value) = std::env::var(LOG_ENV) else {
        return Ok(None);
    };

    let path = log_file_path();
    let file = OpenOptions::new().create(true).append(true).open(&path)?;

    Builder::new()
        .parse_filters(&filter_directives(&value))
        .target(Target::Pipe(Box::new(file)))
        .format(|buf, record| {
            writeln!(
                buf,
                "{} {:<5} {}: {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .try_init()
        .map_err(io::Error::other)?;

    Ok(Some(path))
}
