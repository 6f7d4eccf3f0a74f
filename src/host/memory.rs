use std::collections::HashMap;

use super::{BufferId, EditorHost, NotifyLevel, Overlay, check_range};
use crate::error::HostError;

#[derive(Debug, Default)]
struct MemoryBuffer {
    lines: Vec<String>,
    overlay: Option<Overlay>,
    cursor: (usize, usize),
    pending_changes: usize,
}

/// In-memory [`EditorHost`] holding any number of buffers
#[derive(Debug, Default)]
pub struct MemoryHost {
    buffers: HashMap<BufferId, MemoryBuffer>,
    next_id: u64,
    notifications: Vec<(NotifyLevel, String)>,
}

impl MemoryHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a buffer with the given content
    pub fn open_buffer(&mut self, lines: &[&str]) -> BufferId {
        self.next_id += 1;
        let id = BufferId(self.next_id);
        self.buffers.insert(
            id,
            MemoryBuffer {
                lines: lines.iter().map(|l| l.to_string()).collect(),
                ..Default::default()
            },
        );
        id
    }

    pub fn close_buffer(&mut self, buffer: BufferId) {
        self.buffers.remove(&buffer);
    }

    pub fn overlay(&self, buffer: BufferId) -> Option<&Overlay> {
        self.buffers.get(&buffer).and_then(|b| b.overlay.as_ref())
    }

    pub fn notifications(&self) -> &[(NotifyLevel, String)] {
        &self.notifications
    }

    /// Replace a line as if the user typed it
    pub fn user_edit(&mut self, buffer: BufferId, row: usize, text: &str) -> Result<(), HostError> {
        let buf = self.buffer_mut(buffer)?;
        check_range(row, row + 1, buf.lines.len())?;
        buf.lines[row] = text.to_string();
        buf.cursor = (row, text.chars().count());
        buf.pending_changes += 1;
        Ok(())
    }

    fn buffer(&self, buffer: BufferId) -> Result<&MemoryBuffer, HostError> {
        self.buffers
            .get(&buffer)
            .ok_or(HostError::UnknownBuffer(buffer.0))
    }

    fn buffer_mut(&mut self, buffer: BufferId) -> Result<&mut MemoryBuffer, HostError> {
        self.buffers
            .get_mut(&buffer)
            .ok_or(HostError::UnknownBuffer(buffer.0))
    }
}

impl EditorHost for MemoryHost {
    fn lines(&self, buffer: BufferId) -> Result<Vec<String>, HostError> {
        Ok(self.buffer(buffer)?.lines.clone())
    }

    fn set_lines(
        &mut self,
        buffer: BufferId,
        start: usize,
        end: usize,
        replacement: &[String],
    ) -> Result<(), HostError> {
        let buf = self.buffer_mut(buffer)?;
        check_range(start, end, buf.lines.len())?;
        buf.lines.splice(start..end, replacement.iter().cloned());
        buf.pending_changes += 1;
        Ok(())
    }

    fn set_overlay(&mut self, buffer: BufferId, line: usize, text: &str) -> Result<(), HostError> {
        let buf = self.buffer_mut(buffer)?;
        check_range(line, line + 1, buf.lines.len())?;
        buf.overlay = Some(Overlay {
            line,
            text: text.to_string(),
        });
        Ok(())
    }

    fn clear_overlay(&mut self, buffer: BufferId) -> Result<(), HostError> {
        self.buffer_mut(buffer)?.overlay = None;
        Ok(())
    }

    fn cursor(&self, buffer: BufferId) -> Result<(usize, usize), HostError> {
        Ok(self.buffer(buffer)?.cursor)
    }

    fn set_cursor(&mut self, buffer: BufferId, row: usize, col: usize) -> Result<(), HostError> {
        let buf = self.buffer_mut(buffer)?;
        check_range(row, row + 1, buf.lines.len())?;
        let max_col = buf.lines[row].chars().count();
        buf.cursor = (row, col.min(max_col));
        Ok(())
    }

    fn notify(&mut self, level: NotifyLevel, message: &str) {
        self.notifications.push((level, message.to_string()));
    }

    fn take_text_changes(&mut self, buffer: BufferId) -> usize {
        match self.buffers.get_mut(&buffer) {
            Some(buf) => std::mem::take(&mut buf.pending_changes),
            None => 0,
        }
    }
}
