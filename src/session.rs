//! Suggestion lifecycle
//!
//! One [`SuggestionSession`] per commit buffer, driven by the
//! [`SuggestionController`]:
//!
//! ```text
//! Idle --request/response--> Displayed --accept--> Idle
//!                            Displayed --user edit--> Idle
//!                            Displayed --request--> Idle (until the new response)
//! ```

pub mod controller;
pub mod debouncer;
pub mod state;

pub use controller::{AUTO_SUGGEST_DELAY_MS, AcceptOutcome, KeyOutcome, SuggestionController};
pub use debouncer::Debouncer;
pub use state::{PendingSuggestion, SessionState, SuggestionSession};
