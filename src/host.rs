//! Host editor collaborator
//!
//! The suggestion controller never owns buffer text. It reads and edits
//! buffers, draws the ghost-text overlay, moves the cursor and shows
//! notifications through [`EditorHost`].

mod memory;

use std::fmt;

pub use memory::MemoryHost;

use crate::error::HostError;

/// Identity of an editor buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BufferId(pub u64);

impl fmt::Display for BufferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Severity of a user-facing notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyLevel {
    Info,
    Warn,
    Error,
}

/// Non-editable text drawn after the end of a buffer line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overlay {
    pub line: usize,
    pub text: String,
}

/// Operations the controller consumes from the host editor
///
/// Rows and columns are zero-based; columns count chars, not bytes.
pub trait EditorHost {
    fn lines(&self, buffer: BufferId) -> Result<Vec<String>, HostError>;

    fn line_count(&self, buffer: BufferId) -> Result<usize, HostError> {
        Ok(self.lines(buffer)?.len())
    }

    /// Replace lines `start..end` with `replacement` (`start == end` inserts)
    fn set_lines(
        &mut self,
        buffer: BufferId,
        start: usize,
        end: usize,
        replacement: &[String],
    ) -> Result<(), HostError>;

    /// Show `text` after the end of `line`, replacing any previous overlay
    fn set_overlay(&mut self, buffer: BufferId, line: usize, text: &str) -> Result<(), HostError>;

    fn clear_overlay(&mut self, buffer: BufferId) -> Result<(), HostError>;

    fn cursor(&self, buffer: BufferId) -> Result<(usize, usize), HostError>;

    fn set_cursor(&mut self, buffer: BufferId, row: usize, col: usize) -> Result<(), HostError>;

    fn notify(&mut self, level: NotifyLevel, message: &str);

    /// Number of text changes recorded for `buffer` since the last call
    ///
    /// Every edit counts, whether it came from the user or from
    /// [`EditorHost::set_lines`].
    fn take_text_changes(&mut self, buffer: BufferId) -> usize;
}

/// Check a `start..end` line range against a buffer of `len` lines
pub(crate) fn check_range(start: usize, end: usize, len: usize) -> Result<(), HostError> {
    if start > end || end > len {
        return Err(HostError::OutOfRange { start, end, len });
    }
    Ok(())
}
