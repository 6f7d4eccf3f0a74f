// Configuration type definitions

use serde::{Deserialize, Serialize};

pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_AI_COMMAND: &str = "claude";
pub const DEFAULT_AI_MODEL: &str = "haiku";
pub const DEFAULT_COMMENT_CHAR: char = '#';

/// External AI CLI section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// Executable name or path of the AI CLI
    pub command: String,
    /// Model identifier passed with `--model`
    pub model: String,
    /// Conversational turns allowed per request
    pub max_turns: u32,
}

impl Default for AiConfig {
    fn default() -> Self {
        AiConfig {
            command: DEFAULT_AI_COMMAND.to_string(),
            model: DEFAULT_AI_MODEL.to_string(),
            max_turns: 1,
        }
    }
}

/// Root configuration structure
///
/// Built once at startup by merging the config file and command-line
/// overrides over the defaults, then only read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Request a suggestion when an empty commit buffer is opened
    pub auto_suggest: bool,
    /// Extra key that triggers a suggestion in Normal mode (e.g. "<C-g>")
    #[serde(alias = "keybinding", skip_serializing_if = "Option::is_none")]
    pub key_binding: Option<String>,
    /// Upper bound on a single AI CLI invocation
    #[serde(alias = "timeout")]
    pub timeout_ms: u64,
    /// Lines starting with this character are commit template comments
    pub comment_char: char,
    pub ai: AiConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            auto_suggest: true,
            key_binding: None,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            comment_char: DEFAULT_COMMENT_CHAR,
            ai: AiConfig::default(),
        }
    }
}

/// Partial `[ai]` section; absent fields keep their current value
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PartialAiConfig {
    pub command: Option<String>,
    pub model: Option<String>,
    pub max_turns: Option<u32>,
}

/// User-supplied options merged over the current configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PartialConfig {
    pub auto_suggest: Option<bool>,
    #[serde(alias = "keybinding")]
    pub key_binding: Option<String>,
    #[serde(alias = "timeout")]
    pub timeout_ms: Option<u64>,
    pub comment_char: Option<char>,
    pub ai: Option<PartialAiConfig>,
}

impl AiConfig {
    pub fn merge(&mut self, partial: PartialAiConfig) {
        if let Some(command) = partial.command {
            self.command = command;
        }
        if let Some(model) = partial.model {
            self.model = model;
        }
        if let Some(max_turns) = partial.max_turns {
            self.max_turns = max_turns;
        }
    }
}

impl Config {
    /// Deep-merge `partial` into this configuration
    ///
    /// Scalars present in `partial` overwrite; the nested `[ai]` section is
    /// merged field by field.
    pub fn merge(&mut self, partial: PartialConfig) {
        if let Some(auto_suggest) = partial.auto_suggest {
            self.auto_suggest = auto_suggest;
        }
        if let Some(key_binding) = partial.key_binding {
            self.key_binding = Some(key_binding);
        }
        if let Some(timeout_ms) = partial.timeout_ms {
            self.timeout_ms = timeout_ms;
        }
        if let Some(comment_char) = partial.comment_char {
            self.comment_char = comment_char;
        }
        if let Some(ai) = partial.ai {
            self.ai.merge(ai);
        }
    }

    /// Consuming form of [`Config::merge`]
    pub fn merged(mut self, partial: PartialConfig) -> Self {
        self.merge(partial);
        self
    }
}
