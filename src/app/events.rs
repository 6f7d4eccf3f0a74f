use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tui_textarea::CursorMove;

use super::state::App;
use crate::editor::EditorMode;
use crate::session::KeyOutcome;

impl App {
    pub fn handle_event(&mut self, event: Event) {
        match event {
            // Only key presses; releases and repeats would double-apply
            Event::Key(key) if key.kind == KeyEventKind::Press => self.handle_key_event(key),
            Event::Paste(text) if self.mode.accepts_text() => {
                self.host.edit(|textarea| textarea.insert_str(&text));
                self.controller.sync_text_changes(&mut self.host);
            }
            _ => {}
        }
    }

    pub fn handle_key_event(&mut self, key: KeyEvent) {
        if self.handle_global_keys(key) {
            return;
        }

        let buffer = self.host.buffer();
        if self
            .controller
            .handle_key(&mut self.host, buffer, &key, self.mode)
            == KeyOutcome::Handled
        {
            return;
        }

        match self.mode {
            EditorMode::Insert => self.handle_insert_mode_key(key),
            EditorMode::Normal => self.handle_normal_mode_key(key),
        }

        // Deliver the edit right away so a displayed suggestion is dropped
        // before the next frame
        self.controller.sync_text_changes(&mut self.host);
    }

    /// Save/quit keys that work in every mode
    /// Returns true if key was handled, false otherwise
    fn handle_global_keys(&mut self, key: KeyEvent) -> bool {
        if !key.modifiers.contains(KeyModifiers::CONTROL) {
            return false;
        }

        match key.code {
            KeyCode::Char('c') => self.abort(),
            KeyCode::Char('s') => {
                self.save();
            }
            KeyCode::Char('x') => self.save_and_quit(),
            _ => return false,
        }
        true
    }

    fn handle_insert_mode_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.mode = EditorMode::Normal,
            // Tab with nothing to accept types a literal tab
            KeyCode::Tab => {
                self.host.edit(|textarea| {
                    textarea.insert_char('\t');
                    true
                });
            }
            _ => {
                self.host.edit(|textarea| textarea.input(key));
            }
        }
    }

    fn handle_normal_mode_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('h') | KeyCode::Left => self.host.move_cursor(CursorMove::Back),
            KeyCode::Char('l') | KeyCode::Right => self.host.move_cursor(CursorMove::Forward),
            KeyCode::Char('k') | KeyCode::Up => self.host.move_cursor(CursorMove::Up),
            KeyCode::Char('j') | KeyCode::Down => self.host.move_cursor(CursorMove::Down),
            KeyCode::Char('0') | KeyCode::Char('^') | KeyCode::Home => {
                self.host.move_cursor(CursorMove::Head)
            }
            KeyCode::Char('$') | KeyCode::End => self.host.move_cursor(CursorMove::End),
            KeyCode::Char('w') => self.host.move_cursor(CursorMove::WordForward),
            KeyCode::Char('b') => self.host.move_cursor(CursorMove::WordBack),
            KeyCode::Char('e') => self.host.move_cursor(CursorMove::WordEnd),
            KeyCode::Char('g') => self.host.move_cursor(CursorMove::Top),
            KeyCode::Char('G') => self.host.move_cursor(CursorMove::Bottom),

            KeyCode::Char('i') => self.mode = EditorMode::Insert,
            KeyCode::Char('a') => {
                self.host.move_cursor(CursorMove::Forward);
                self.mode = EditorMode::Insert;
            }
            KeyCode::Char('I') => {
                self.host.move_cursor(CursorMove::Head);
                self.mode = EditorMode::Insert;
            }
            KeyCode::Char('A') => {
                self.host.move_cursor(CursorMove::End);
                self.mode = EditorMode::Insert;
            }
            KeyCode::Char('o') => {
                self.host.edit(|textarea| {
                    textarea.move_cursor(CursorMove::End);
                    textarea.insert_newline();
                    true
                });
                self.mode = EditorMode::Insert;
            }
            KeyCode::Char('O') => {
                self.host.edit(|textarea| {
                    textarea.move_cursor(CursorMove::Head);
                    textarea.insert_newline();
                    textarea.move_cursor(CursorMove::Up);
                    true
                });
                self.mode = EditorMode::Insert;
            }

            KeyCode::Char('x') => {
                self.host.edit(|textarea| textarea.delete_next_char());
            }
            KeyCode::Char('X') => {
                self.host.edit(|textarea| textarea.delete_char());
            }
            KeyCode::Char('D') => {
                self.host.edit(|textarea| textarea.delete_line_by_end());
            }
            KeyCode::Char('u') => {
                self.host.edit(|textarea| textarea.undo());
            }
            KeyCode::Char('r') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.host.edit(|textarea| textarea.redo());
            }

            _ => {}
        }
    }
}

#[cfg(test)]
#[path = "events_tests.rs"]
mod events_tests;
