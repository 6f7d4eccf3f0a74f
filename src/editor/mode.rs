/// Modes of the commit buffer editor
///
/// The suggestion accept key works in both; the configured extra trigger
/// key only fires in `Normal`, where it cannot collide with typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditorMode {
    /// Keys type text
    #[default]
    Insert,
    /// Keys move the cursor and run commands
    Normal,
}

impl EditorMode {
    /// Label for the status line
    pub fn display(&self) -> &'static str {
        match self {
            EditorMode::Insert => "INSERT",
            EditorMode::Normal => "NORMAL",
        }
    }

    pub fn accepts_text(&self) -> bool {
        matches!(self, EditorMode::Insert)
    }
}

#[cfg(test)]
#[path = "mode_tests.rs"]
mod mode_tests;
