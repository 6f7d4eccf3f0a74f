//! commit-whisper
//!
//! Generates commit messages from staged changes with an external AI CLI and
//! shows them as accept-with-Tab ghost text in the commit buffer.

pub mod ai;
pub mod app;
pub mod config;
pub mod editor;
pub mod error;
pub mod git;
pub mod host;
pub mod keymap;
pub mod logging;
pub mod notification;
pub mod placement;
pub mod session;

#[cfg(test)]
mod test_utils;
