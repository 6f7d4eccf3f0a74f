//! Key bindings
//!
//! Parses key strings from the config (`"<C-g>"`, `"ctrl+g"`, `"<Tab>"`,
//! `"F5"`) into crossterm key codes and matches key events against them.

use std::fmt;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use thiserror::Error;

use crate::config::Config;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid key binding {input:?}: {reason}")]
pub struct KeyParseError {
    pub input: String,
    pub reason: String,
}

/// A single key with modifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyBinding {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBinding {
    pub const fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    pub fn parse(input: &str) -> Result<Self, KeyParseError> {
        let error = |reason: &str| KeyParseError {
            input: input.to_string(),
            reason: reason.to_string(),
        };

        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(error("empty key"));
        }

        // Vim notation: <C-g>, <M-s>, <Tab>; plain notation: ctrl+g, alt-s
        let (body, separator) = match trimmed.strip_prefix('<').and_then(|s| s.strip_suffix('>')) {
            Some(inner) => (inner, '-'),
            None if trimmed.contains('+') => (trimmed, '+'),
            None => (trimmed, '-'),
        };

        let mut parts: Vec<&str> = body.split(separator).collect();
        // "<C-->" / "ctrl+-" style: an empty tail means the key itself is the separator
        let key_part = match parts.pop() {
            Some("") if parts.last() == Some(&"") => {
                parts.pop();
                separator.to_string()
            }
            Some("") => return Err(error("missing key after modifier")),
            Some(key) => key.to_string(),
            None => return Err(error("empty key")),
        };

        let mut modifiers = KeyModifiers::NONE;
        for part in parts {
            modifiers |= parse_modifier(part).ok_or_else(|| error("unknown modifier"))?;
        }

        let mut code = parse_code(&key_part).ok_or_else(|| error("unknown key"))?;
        // Normalize so "<C-G>" and "<C-g>" match the same key event
        if let KeyCode::Char(c) = code
            && modifiers.contains(KeyModifiers::CONTROL)
        {
            code = KeyCode::Char(c.to_ascii_lowercase());
        }

        Ok(Self { code, modifiers })
    }

    /// Whether a key event is this binding
    ///
    /// SHIFT is ignored for character keys since the character already
    /// carries the case.
    pub fn matches(&self, key: &KeyEvent) -> bool {
        let (code, modifiers) = match key.code {
            KeyCode::Char(c) => {
                let c = if key.modifiers.contains(KeyModifiers::CONTROL) {
                    c.to_ascii_lowercase()
                } else {
                    c
                };
                (KeyCode::Char(c), key.modifiers - KeyModifiers::SHIFT)
            }
            other => (other, key.modifiers),
        };

        let own_modifiers = match self.code {
            KeyCode::Char(_) => self.modifiers - KeyModifiers::SHIFT,
            _ => self.modifiers,
        };

        code == self.code && modifiers == own_modifiers
    }
}

impl fmt::Display for KeyBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            write!(f, "Ctrl-")?;
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            write!(f, "Alt-")?;
        }
        if self.modifiers.contains(KeyModifiers::SHIFT) {
            write!(f, "Shift-")?;
        }
        match self.code {
            KeyCode::Char(' ') => write!(f, "Space"),
            KeyCode::Char(c) if self.modifiers.contains(KeyModifiers::CONTROL) => {
                write!(f, "{}", c.to_ascii_uppercase())
            }
            KeyCode::Char(c) => write!(f, "{}", c),
            KeyCode::Tab => write!(f, "Tab"),
            KeyCode::Enter => write!(f, "Enter"),
            KeyCode::Esc => write!(f, "Esc"),
            KeyCode::F(n) => write!(f, "F{}", n),
            other => write!(f, "{:?}", other),
        }
    }
}

fn parse_modifier(part: &str) -> Option<KeyModifiers> {
    match part.to_ascii_lowercase().as_str() {
        "c" | "ctrl" | "control" => Some(KeyModifiers::CONTROL),
        "m" | "a" | "alt" | "meta" => Some(KeyModifiers::ALT),
        "s" | "shift" => Some(KeyModifiers::SHIFT),
        _ => None,
    }
}

fn parse_code(key: &str) -> Option<KeyCode> {
    let mut chars = key.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return Some(KeyCode::Char(c));
    }

    let lower = key.to_ascii_lowercase();
    let code = match lower.as_str() {
        "tab" => KeyCode::Tab,
        "cr" | "enter" | "return" => KeyCode::Enter,
        "esc" | "escape" => KeyCode::Esc,
        "space" => KeyCode::Char(' '),
        "bs" | "backspace" => KeyCode::Backspace,
        "lt" => KeyCode::Char('<'),
        _ => {
            let n = lower.strip_prefix('f')?.parse::<u8>().ok()?;
            if !(1..=12).contains(&n) {
                return None;
            }
            KeyCode::F(n)
        }
    };
    Some(code)
}

/// Keys the suggestion controller reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Keymap {
    /// Accepts the displayed suggestion (Normal and Insert modes)
    pub accept: KeyBinding,
    /// Requests a new suggestion (Normal and Insert modes)
    pub trigger: KeyBinding,
    /// User-configured extra trigger (Normal mode only)
    pub user_trigger: Option<KeyBinding>,
}

impl Default for Keymap {
    fn default() -> Self {
        Self {
            accept: KeyBinding::new(KeyCode::Tab, KeyModifiers::NONE),
            trigger: KeyBinding::new(KeyCode::Char('g'), KeyModifiers::CONTROL),
            user_trigger: None,
        }
    }
}

impl Keymap {
    pub fn from_config(config: &Config) -> Result<Self, KeyParseError> {
        let user_trigger = config
            .key_binding
            .as_deref()
            .map(KeyBinding::parse)
            .transpose()?;

        Ok(Self {
            user_trigger,
            ..Self::default()
        })
    }
}

#[cfg(test)]
#[path = "keymap_tests.rs"]
mod keymap_tests;
