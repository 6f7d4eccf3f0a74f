//! Suggestion backends
//!
//! A backend turns "the user wants a suggestion" into a commit message. The
//! production backend reads the staged diff and asks the AI CLI.

use tokio_util::sync::CancellationToken;

use super::cli::AiCli;
use crate::config::Config;
use crate::error::SuggestError;
use crate::git::ChangeSource;

pub trait SuggestionBackend: Send + 'static {
    fn generate(&self, cancel_token: &CancellationToken) -> Result<String, SuggestError>;
}

impl<F> SuggestionBackend for F
where
    F: Fn(&CancellationToken) -> Result<String, SuggestError> + Send + 'static,
{
    fn generate(&self, cancel_token: &CancellationToken) -> Result<String, SuggestError> {
        self(cancel_token)
    }
}

/// Staged diff in, commit message out
pub struct CommitSuggester<S> {
    changes: S,
    cli: AiCli,
    timeout_ms: u64,
}

impl<S: ChangeSource> CommitSuggester<S> {
    pub fn new(changes: S, cli: AiCli, timeout_ms: u64) -> Self {
        Self {
            changes,
            cli,
            timeout_ms,
        }
    }

    pub fn from_config(changes: S, config: &Config) -> Self {
        Self::new(changes, AiCli::from_config(&config.ai), config.timeout_ms)
    }
}

impl<S: ChangeSource + 'static> SuggestionBackend for CommitSuggester<S> {
    fn generate(&self, cancel_token: &CancellationToken) -> Result<String, SuggestError> {
        let patch = self.changes.get_staged_changes()?;
        log::debug!("Requesting suggestion for {} byte diff", patch.len());
        self.cli
            .request_suggestion(&patch, self.timeout_ms, cancel_token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StaticChanges(Result<String, SuggestError>);

    impl ChangeSource for StaticChanges {
        fn is_repository(&self) -> Result<bool, SuggestError> {
            Ok(!matches!(self.0, Err(SuggestError::NotAVersionControlRepo)))
        }

        fn staged_diff(&self) -> Result<String, SuggestError> {
            match &self.0 {
                Ok(diff) => Ok(diff.clone()),
                Err(SuggestError::NotAVersionControlRepo) => Ok(String::new()),
                Err(e) => Err(e.clone()),
            }
        }
    }

    #[test]
    fn test_change_source_error_short_circuits() {
        // The CLI name is bogus; reaching it would yield CommandUnavailable
        let suggester = CommitSuggester::new(
            StaticChanges(Ok(String::new())),
            AiCli::new("no-such-ai-cli-xyz", "haiku", 1),
            1000,
        );

        let err = suggester.generate(&CancellationToken::new()).unwrap_err();
        assert_eq!(err, SuggestError::NoStagedChanges);
    }

    #[test]
    fn test_not_a_repo_short_circuits() {
        let suggester = CommitSuggester::new(
            StaticChanges(Err(SuggestError::NotAVersionControlRepo)),
            AiCli::new("no-such-ai-cli-xyz", "haiku", 1),
            1000,
        );

        let err = suggester.generate(&CancellationToken::new()).unwrap_err();
        assert_eq!(err, SuggestError::NotAVersionControlRepo);
    }

    #[test]
    fn test_missing_cli_after_diff() {
        let suggester = CommitSuggester::from_config(
            StaticChanges(Ok("+x\n".to_string())),
            &Config {
                ai: crate::config::AiConfig {
                    command: "no-such-ai-cli-xyz".to_string(),
                    ..Default::default()
                },
                ..Default::default()
            },
        );

        let err = suggester.generate(&CancellationToken::new()).unwrap_err();
        assert!(matches!(err, SuggestError::CommandUnavailable(_)));
    }

    #[test]
    fn test_closure_backend() {
        let backend = |_: &CancellationToken| -> Result<String, SuggestError> {
            Ok("feat: closure".to_string())
        };
        assert_eq!(
            backend.generate(&CancellationToken::new()).unwrap(),
            "feat: closure"
        );
    }
}
