//! Suggestion requester
//!
//! Builds the prompt from a staged diff, runs the external AI CLI and parses
//! its JSON envelope. Requests run on a background worker thread.

pub mod backend;
pub mod cli;
pub mod prompt;
pub mod response;
pub mod worker;

pub use backend::{CommitSuggester, SuggestionBackend};
pub use cli::AiCli;
pub use worker::{SuggestRequest, SuggestResponse, WorkerHandle, spawn_worker};
