use std::time::Instant;

use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};
use unicode_width::UnicodeWidthStr;

use super::state::NotificationState;
use crate::host::NotifyLevel;

const MARGIN: u16 = 1;

/// Draw the current notification in the top-right corner of the frame
pub fn render_notification(frame: &mut Frame, notification: &mut NotificationState) {
    notification.expire(Instant::now());
    let Some(current) = notification.current() else {
        return;
    };

    let color = match current.level {
        NotifyLevel::Info => Color::Cyan,
        NotifyLevel::Warn => Color::Yellow,
        NotifyLevel::Error => Color::Red,
    };

    let area = frame.area();
    let width = (current.message.width() as u16 + 4).min(area.width.saturating_sub(MARGIN * 2));
    let popup = Rect {
        x: area.x + area.width.saturating_sub(width + MARGIN),
        y: area.y + MARGIN.min(area.height),
        width,
        height: 3.min(area.height.saturating_sub(MARGIN)),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color));
    let paragraph = Paragraph::new(Line::from(format!(" {} ", current.message)))
        .style(Style::default().fg(color))
        .block(block);

    frame.render_widget(Clear, popup);
    frame.render_widget(paragraph, popup);
}
