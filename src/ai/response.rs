//! AI CLI response parsing
//!
//! The CLI is run with `--output-format json` and prints one envelope object
//! on stdout, e.g. `{"type":"result","subtype":"success","is_error":false,"result":"feat: add x"}`.

use serde::Deserialize;

use crate::error::SuggestError;

/// Structured envelope emitted by the AI CLI
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CliEnvelope {
    /// Generated text
    #[serde(default)]
    pub result: Option<String>,
    /// Set by the CLI when the run itself failed
    #[serde(default)]
    pub is_error: bool,
    #[serde(default)]
    pub subtype: Option<String>,
}

/// Outcome of reading the CLI's stdout
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedResponse {
    Envelope(CliEnvelope),
    /// Stdout was empty or not a JSON envelope
    ParseFailed(String),
}

impl ParsedResponse {
    pub fn parse(stdout: &str) -> Self {
        let trimmed = stdout.trim();
        if trimmed.is_empty() {
            return ParsedResponse::ParseFailed("empty output".to_string());
        }

        match serde_json::from_str::<CliEnvelope>(trimmed) {
            Ok(envelope) => ParsedResponse::Envelope(envelope),
            Err(e) => ParsedResponse::ParseFailed(e.to_string()),
        }
    }

    /// Extract the cleaned suggestion text
    pub fn into_suggestion(self) -> Result<String, SuggestError> {
        let envelope = match self {
            ParsedResponse::Envelope(envelope) => envelope,
            ParsedResponse::ParseFailed(reason) => {
                return Err(SuggestError::MalformedResponse(reason));
            }
        };

        if envelope.is_error {
            let detail = envelope
                .result
                .or(envelope.subtype)
                .unwrap_or_else(|| "AI CLI reported an error".to_string());
            return Err(SuggestError::MalformedResponse(detail));
        }

        let text = envelope
            .result
            .as_deref()
            .map(clean_message)
            .unwrap_or_default();

        if text.is_empty() {
            return Err(SuggestError::MalformedResponse(
                "missing or empty result field".to_string(),
            ));
        }

        Ok(text)
    }
}

/// Parse CLI stdout straight to a suggestion string
pub fn extract_suggestion(stdout: &str) -> Result<String, SuggestError> {
    ParsedResponse::parse(stdout).into_suggestion()
}

/// Trim surrounding whitespace and unwrap a fenced code block if present
fn clean_message(raw: &str) -> String {
    let trimmed = raw.trim();

    if let Some(inner) = trimmed.strip_prefix("```")
        && let Some(inner) = inner.strip_suffix("```")
    {
        // Drop the info string on the opening fence line (e.g. ```text)
        let body = match inner.split_once('\n') {
            Some((_, rest)) => rest,
            None => inner,
        };
        return body.trim().to_string();
    }

    trimmed.to_string()
}

#[cfg(test)]
#[path = "response_tests.rs"]
mod response_tests;
