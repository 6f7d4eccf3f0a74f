//! Command-line interface

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commit_whisper::config::{PartialAiConfig, PartialConfig};

/// AI commit-message suggestions rendered as ghost text in your commit buffer
#[derive(Parser, Debug)]
#[command(name = "commit-whisper", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Config file (default: ~/.config/commit-whisper/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// AI command timeout in milliseconds
    #[arg(long, global = true, value_name = "MS")]
    pub timeout: Option<u64>,

    /// Do not request a suggestion when an empty buffer opens
    #[arg(long, global = true)]
    pub no_auto_suggest: bool,

    /// Extra Normal-mode key that requests a suggestion (e.g. "<C-g>")
    #[arg(long, global = true, value_name = "KEY")]
    pub key: Option<String>,

    /// Model passed to the AI command
    #[arg(long, global = true)]
    pub model: Option<String>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Edit a commit message file with inline suggestions (use as GIT_EDITOR)
    Edit {
        /// Commit message file, usually .git/COMMIT_EDITMSG
        file: PathBuf,
    },
    /// Print a suggestion for the staged changes
    Suggest,
    /// Write a default config file if none exists
    Setup,
    /// Print the effective configuration
    Config,
}

impl Cli {
    /// Flags as a partial configuration merged over the config file
    pub fn overrides(&self) -> PartialConfig {
        let ai = self.model.clone().map(|model| PartialAiConfig {
            model: Some(model),
            ..Default::default()
        });

        PartialConfig {
            auto_suggest: self.no_auto_suggest.then_some(false),
            key_binding: self.key.clone(),
            timeout_ms: self.timeout,
            ai,
            ..Default::default()
        }
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod cli_tests;
