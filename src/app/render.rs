use std::borrow::Cow;

use ratatui::{
    Frame,
    layout::{Constraint, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use unicode_width::UnicodeWidthStr;

use super::state::App;
use crate::editor::EditorMode;
use crate::host::Overlay;
use crate::notification::render_notification;

const TAB_WIDTH: usize = 4;

impl App {
    /// Render the UI
    pub fn render(&mut self, frame: &mut Frame) {
        let layout =
            Layout::vertical([Constraint::Min(3), Constraint::Length(1)]).split(frame.area());

        self.render_editor(frame, layout[0]);
        self.render_status_line(frame, layout[1]);
        render_notification(frame, &mut self.host.notification);
    }

    fn render_editor(&mut self, frame: &mut Frame, area: Rect) {
        let border_color = match self.mode {
            EditorMode::Insert => Color::Cyan,
            EditorMode::Normal => Color::DarkGray,
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" {} ", self.path().display()))
            .border_style(Style::default().fg(border_color));
        let inner = block.inner(area);

        let lines = self.host.textarea().lines();
        let overlay = self.host.overlay();
        let (row, col) = self.host.textarea().cursor();
        let cursor_row = display_row(row, overlay);
        self.scroll_top = scroll_to_cursor(self.scroll_top, cursor_row, inner.height as usize);

        let paragraph = Paragraph::new(editor_lines(lines, overlay))
            .block(block)
            .scroll((u16::try_from(self.scroll_top).unwrap_or(u16::MAX), 0));
        frame.render_widget(paragraph, area);

        if inner.width == 0 || inner.height == 0 {
            return;
        }
        let prefix: String = lines
            .get(row)
            .map(|line| line.chars().take(col).collect())
            .unwrap_or_default();
        let x = (expand_tabs(&prefix).width() as u16).min(inner.width - 1);
        let y = (cursor_row - self.scroll_top) as u16;
        frame.set_cursor_position(Position::new(inner.x + x, inner.y + y));
    }

    fn render_status_line(&self, frame: &mut Frame, area: Rect) {
        let mode_color = match self.mode {
            EditorMode::Insert => Color::Cyan,
            EditorMode::Normal => Color::Yellow,
        };
        let mut spans = vec![Span::styled(
            format!(" {} ", self.mode.display()),
            Style::default()
                .fg(Color::Black)
                .bg(mode_color)
                .add_modifier(Modifier::BOLD),
        )];

        if self.is_dirty() {
            spans.push(Span::styled(" [+]", Style::default().fg(Color::Yellow)));
        }
        if self.controller.is_in_flight(self.host.buffer()) {
            spans.push(Span::styled(
                " generating…",
                Style::default().fg(Color::Cyan).add_modifier(Modifier::ITALIC),
            ));
        }

        let keymap = self.controller.keymap();
        spans.push(Span::styled(
            format!(
                "  {} accept · {} suggest · Ctrl-S save · Ctrl-X save+quit · Ctrl-C abort",
                keymap.accept, keymap.trigger
            ),
            Style::default().fg(Color::DarkGray),
        ));

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

fn ghost_style() -> Style {
    Style::default()
        .fg(Color::DarkGray)
        .add_modifier(Modifier::ITALIC)
}

fn expand_tabs(text: &str) -> Cow<'_, str> {
    if text.contains('\t') {
        Cow::Owned(text.replace('\t', &" ".repeat(TAB_WIDTH)))
    } else {
        Cow::Borrowed(text)
    }
}

/// Buffer lines with the overlay drawn in
///
/// The first overlay line follows the anchor line's text; further lines are
/// virtual rows below it.
pub(super) fn editor_lines<'a>(lines: &'a [String], overlay: Option<&'a Overlay>) -> Vec<Line<'a>> {
    let mut rendered = Vec::with_capacity(lines.len());

    for (index, line) in lines.iter().enumerate() {
        let text = Span::raw(expand_tabs(line));
        match overlay {
            Some(overlay) if overlay.line == index => {
                let mut ghost = overlay.text.lines();
                let first = ghost.next().unwrap_or_default();
                rendered.push(Line::from(vec![text, Span::styled(first, ghost_style())]));
                rendered.extend(ghost.map(|extra| Line::styled(extra, ghost_style())));
            }
            _ => rendered.push(Line::from(text)),
        }
    }

    rendered
}

/// Display row of buffer `row`, counting virtual overlay rows above it
pub(super) fn display_row(row: usize, overlay: Option<&Overlay>) -> usize {
    match overlay {
        Some(overlay) if overlay.line < row => {
            row + overlay.text.lines().count().saturating_sub(1)
        }
        _ => row,
    }
}

/// Smallest scroll change that keeps `cursor_row` visible
pub(super) fn scroll_to_cursor(top: usize, cursor_row: usize, height: usize) -> usize {
    if height == 0 || cursor_row < top {
        cursor_row
    } else if cursor_row >= top + height {
        cursor_row + 1 - height
    } else {
        top
    }
}

#[cfg(test)]
#[path = "render_tests.rs"]
mod render_tests;
