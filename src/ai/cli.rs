//! AI CLI invocation
//!
//! Runs the external AI command as a subprocess with the prompt on stdin,
//! bounded by a timeout and a cancellation token.

use std::io::{Read, Write};
use std::path::PathBuf;
use std::process::{Child, ChildStderr, ChildStdout, Command, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread::{self, sleep};
use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;

use super::prompt::build_prompt;
use super::response::extract_suggestion;
use crate::config::AiConfig;
use crate::error::SuggestError;

const POLL_INTERVAL_MS: u64 = 10;

/// Handle for invoking the external AI CLI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AiCli {
    command: String,
    model: String,
    max_turns: u32,
}

impl AiCli {
    pub fn new(command: impl Into<String>, model: impl Into<String>, max_turns: u32) -> Self {
        Self {
            command: command.into(),
            model: model.into(),
            max_turns,
        }
    }

    pub fn from_config(config: &AiConfig) -> Self {
        Self::new(config.command.clone(), config.model.clone(), config.max_turns)
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    /// Arguments selecting print mode, JSON output, turn limit and model
    pub fn args(&self) -> Vec<String> {
        vec![
            "-p".to_string(),
            "--output-format".to_string(),
            "json".to_string(),
            "--max-turns".to_string(),
            self.max_turns.to_string(),
            "--model".to_string(),
            self.model.clone(),
        ]
    }

    /// Resolve the executable on PATH
    pub fn resolve(&self) -> Result<PathBuf, SuggestError> {
        which::which(&self.command)
            .map_err(|e| SuggestError::CommandUnavailable(format!("{}: {}", self.command, e)))
    }

    /// Generate a commit message suggestion for `patch`
    pub fn request_suggestion(
        &self,
        patch: &str,
        timeout_ms: u64,
        cancel_token: &CancellationToken,
    ) -> Result<String, SuggestError> {
        let prompt = build_prompt(patch);
        let stdout = self.run(&prompt, timeout_ms, cancel_token)?;
        extract_suggestion(&stdout)
    }

    /// Run the CLI with `input` on stdin and return its stdout
    ///
    /// Polls for completion so the deadline and the cancellation token are
    /// honored without blocking on the child. Collecting the output is bound
    /// by the same deadline, since a process the CLI leaves running can keep
    /// its pipes open after it exits.
    pub fn run(
        &self,
        input: &str,
        timeout_ms: u64,
        cancel_token: &CancellationToken,
    ) -> Result<String, SuggestError> {
        let program = self.resolve()?;
        let deadline = Instant::now() + Duration::from_millis(timeout_ms);

        let mut child = Command::new(program)
            .args(self.args())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| SuggestError::CommandUnavailable(format!("{}: {}", self.command, e)))?;

        // Helper threads feed stdin and drain both output pipes
        if let Some(mut stdin) = child.stdin.take() {
            let input = input.to_string();
            thread::spawn(move || {
                // The child may exit without reading everything; a broken pipe is fine.
                let _ = stdin.write_all(input.as_bytes());
            });
        }
        let stdout_reader = child.stdout.take().map(spawn_reader::<ChildStdout>);
        let stderr_reader = child.stderr.take().map(spawn_reader::<ChildStderr>);

        let status = loop {
            if cancel_token.is_cancelled() {
                kill(&mut child);
                return Err(SuggestError::Cancelled);
            }

            if let Some(status) = child.try_wait()? {
                break status;
            }

            if Instant::now() >= deadline {
                kill(&mut child);
                log::debug!("{} exceeded {} ms, killed", self.command, timeout_ms);
                return Err(SuggestError::ProcessTimeout(timeout_ms));
            }

            sleep(Duration::from_millis(POLL_INTERVAL_MS));
        };

        let stdout = self.collect_output(stdout_reader, deadline, timeout_ms, cancel_token)?;
        let stderr = self.collect_output(stderr_reader, deadline, timeout_ms, cancel_token)?;

        if !status.success() {
            return Err(SuggestError::ProcessNonZeroExit {
                code: status.code(),
                stderr: stderr.trim().to_string(),
            });
        }

        Ok(stdout)
    }

    /// Wait for a pipe reader to finish, giving up at `deadline`
    fn collect_output(
        &self,
        reader: Option<Receiver<String>>,
        deadline: Instant,
        timeout_ms: u64,
        cancel_token: &CancellationToken,
    ) -> Result<String, SuggestError> {
        let Some(reader) = reader else {
            return Ok(String::new());
        };

        loop {
            if cancel_token.is_cancelled() {
                return Err(SuggestError::Cancelled);
            }

            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                log::debug!(
                    "{} kept its output open past {} ms",
                    self.command,
                    timeout_ms
                );
                return Err(SuggestError::ProcessTimeout(timeout_ms));
            }

            match reader.recv_timeout(remaining.min(Duration::from_millis(POLL_INTERVAL_MS))) {
                Ok(output) => return Ok(output),
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => return Ok(String::new()),
            }
        }
    }
}

/// Read a pipe to the end on its own thread
fn spawn_reader<R: Read + Send + 'static>(mut pipe: R) -> Receiver<String> {
    let (output_tx, output_rx) = mpsc::channel();
    thread::spawn(move || {
        let mut bytes = Vec::new();
        let _ = pipe.read_to_end(&mut bytes);
        let _ = output_tx.send(String::from_utf8_lossy(&bytes).into_owned());
    });
    output_rx
}

fn kill(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod cli_tests;
