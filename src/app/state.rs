use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

use super::host::TuiHost;
use crate::editor::EditorMode;
use crate::host::{EditorHost, NotifyLevel};
use crate::session::SuggestionController;

/// How the editor session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    /// Buffer written to disk
    Saved,
    /// Closed without saving; git aborts the commit
    Aborted,
}

/// Application state
pub struct App {
    pub host: TuiHost,
    pub controller: SuggestionController,
    pub mode: EditorMode,
    path: PathBuf,
    /// First visible row of the editor, in display rows
    pub(super) scroll_top: usize,
    should_quit: bool,
    exit_status: ExitStatus,
}

impl App {
    pub fn new(path: PathBuf, content: &str, controller: SuggestionController) -> Self {
        Self {
            host: TuiHost::new(content),
            controller,
            mode: EditorMode::default(),
            path,
            scroll_top: 0,
            should_quit: false,
            exit_status: ExitStatus::Aborted,
        }
    }

    /// Open a commit message file; a missing file starts an empty buffer
    pub fn open(path: &Path, controller: SuggestionController) -> io::Result<Self> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => String::new(),
            Err(e) => return Err(e),
        };
        Ok(Self::new(path.to_path_buf(), &content, controller))
    }

    /// Register the buffer with the controller
    pub fn start(&mut self, now: Instant) {
        let buffer = self.host.buffer();
        self.controller.attach(&mut self.host, buffer, now);
    }

    /// Per-frame housekeeping: worker responses, pending edits and timers
    pub fn update(&mut self, now: Instant) {
        self.controller.sync_text_changes(&mut self.host);
        self.controller.poll_responses(&mut self.host);
        self.controller.tick(&mut self.host, now);
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_dirty(&self) -> bool {
        self.host.is_modified()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn exit_status(&self) -> ExitStatus {
        self.exit_status
    }

    /// Write the buffer to disk, reporting the outcome as a notification
    pub fn save(&mut self) -> bool {
        match fs::write(&self.path, self.host.contents()) {
            Ok(()) => {
                log::debug!("Saved {}", self.path.display());
                self.host.mark_saved();
                let message = format!("Saved {}", self.path.display());
                self.host.notify(NotifyLevel::Info, &message);
                true
            }
            Err(e) => {
                log::warn!("Failed to save {}: {}", self.path.display(), e);
                let message = format!("Failed to save {}: {}", self.path.display(), e);
                self.host.notify(NotifyLevel::Error, &message);
                false
            }
        }
    }

    pub fn save_and_quit(&mut self) {
        if self.save() {
            self.quit(ExitStatus::Saved);
        }
    }

    pub fn abort(&mut self) {
        self.quit(ExitStatus::Aborted);
    }

    fn quit(&mut self, status: ExitStatus) {
        let buffer = self.host.buffer();
        self.controller.detach(&mut self.host, buffer);
        self.exit_status = status;
        self.should_quit = true;
    }
}

#[cfg(test)]
#[path = "state_tests.rs"]
mod state_tests;
