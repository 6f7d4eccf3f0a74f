use ratatui::style::Style;
use tui_textarea::{CursorMove, TextArea};

use crate::error::HostError;
use crate::host::{BufferId, EditorHost, NotifyLevel, Overlay, check_range};
use crate::notification::NotificationState;

/// Single-buffer [`EditorHost`] backed by a `tui_textarea` editing engine
pub struct TuiHost {
    buffer: BufferId,
    textarea: TextArea<'static>,
    overlay: Option<Overlay>,
    pending_changes: usize,
    modified: bool,
    pub notification: NotificationState,
}

impl TuiHost {
    pub fn new(content: &str) -> Self {
        let lines = content.lines().map(str::to_string).collect();
        Self {
            buffer: BufferId(1),
            textarea: new_textarea(lines),
            overlay: None,
            pending_changes: 0,
            modified: false,
            notification: NotificationState::new(),
        }
    }

    pub fn buffer(&self) -> BufferId {
        self.buffer
    }

    pub fn textarea(&self) -> &TextArea<'static> {
        &self.textarea
    }

    pub fn overlay(&self) -> Option<&Overlay> {
        self.overlay.as_ref()
    }

    /// Apply a user edit; `edit` returns whether the text changed
    pub fn edit<F>(&mut self, edit: F) -> bool
    where
        F: FnOnce(&mut TextArea<'static>) -> bool,
    {
        let changed = edit(&mut self.textarea);
        if changed {
            self.record_change();
        }
        changed
    }

    pub fn move_cursor(&mut self, movement: CursorMove) {
        self.textarea.move_cursor(movement);
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn mark_saved(&mut self) {
        self.modified = false;
    }

    /// File contents: every line newline-terminated
    pub fn contents(&self) -> String {
        let mut contents = self.textarea.lines().join("\n");
        contents.push('\n');
        contents
    }

    fn record_change(&mut self) {
        self.pending_changes += 1;
        self.modified = true;
    }

    fn check_buffer(&self, buffer: BufferId) -> Result<(), HostError> {
        if buffer != self.buffer {
            return Err(HostError::UnknownBuffer(buffer.0));
        }
        Ok(())
    }
}

fn new_textarea(mut lines: Vec<String>) -> TextArea<'static> {
    if lines.is_empty() {
        lines.push(String::new());
    }
    let mut textarea = TextArea::new(lines);
    textarea.set_cursor_line_style(Style::default());
    textarea
}

fn jump(row: usize, col: usize) -> CursorMove {
    CursorMove::Jump(
        u16::try_from(row).unwrap_or(u16::MAX),
        u16::try_from(col).unwrap_or(u16::MAX),
    )
}

impl EditorHost for TuiHost {
    fn lines(&self, buffer: BufferId) -> Result<Vec<String>, HostError> {
        self.check_buffer(buffer)?;
        Ok(self.textarea.lines().to_vec())
    }

    fn line_count(&self, buffer: BufferId) -> Result<usize, HostError> {
        self.check_buffer(buffer)?;
        Ok(self.textarea.lines().len())
    }

    // The engine is rebuilt with the new lines, which resets its undo history
    fn set_lines(
        &mut self,
        buffer: BufferId,
        start: usize,
        end: usize,
        replacement: &[String],
    ) -> Result<(), HostError> {
        self.check_buffer(buffer)?;
        let mut lines = self.textarea.lines().to_vec();
        check_range(start, end, lines.len())?;
        lines.splice(start..end, replacement.iter().cloned());

        let (row, col) = self.textarea.cursor();
        self.textarea = new_textarea(lines);
        self.textarea.move_cursor(jump(row, col));
        self.record_change();
        Ok(())
    }

    fn set_overlay(&mut self, buffer: BufferId, line: usize, text: &str) -> Result<(), HostError> {
        self.check_buffer(buffer)?;
        check_range(line, line + 1, self.textarea.lines().len())?;
        self.overlay = Some(Overlay {
            line,
            text: text.to_string(),
        });
        Ok(())
    }

    fn clear_overlay(&mut self, buffer: BufferId) -> Result<(), HostError> {
        self.check_buffer(buffer)?;
        self.overlay = None;
        Ok(())
    }

    fn cursor(&self, buffer: BufferId) -> Result<(usize, usize), HostError> {
        self.check_buffer(buffer)?;
        Ok(self.textarea.cursor())
    }

    fn set_cursor(&mut self, buffer: BufferId, row: usize, col: usize) -> Result<(), HostError> {
        self.check_buffer(buffer)?;
        check_range(row, row + 1, self.textarea.lines().len())?;
        self.textarea.move_cursor(jump(row, col));
        Ok(())
    }

    fn notify(&mut self, level: NotifyLevel, message: &str) {
        self.notification.show(level, message);
    }

    fn take_text_changes(&mut self, buffer: BufferId) -> usize {
        if buffer != self.buffer {
            return 0;
        }
        std::mem::take(&mut self.pending_changes)
    }
}

#[cfg(test)]
#[path = "host_tests.rs"]
mod host_tests;
