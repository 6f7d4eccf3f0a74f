//! Per-buffer suggestion state

use tokio_util::sync::CancellationToken;

use super::debouncer::Debouncer;

/// The suggestion currently shown as ghost text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSuggestion {
    pub text: String,
    /// Buffer line the overlay is anchored to
    pub line: usize,
}

/// Lifecycle state of one buffer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Idle,
    Displayed(PendingSuggestion),
}

/// Suggestion state for a single commit buffer
#[derive(Debug, Clone)]
pub struct SuggestionSession {
    state: SessionState,
    /// Set only while the controller itself edits the buffer
    suppress: bool,
    /// Id of the newest request issued for this buffer
    latest_request_id: Option<u64>,
    /// Whether `latest_request_id` is still waiting for its response
    in_flight: bool,
    /// Cancels the worker call behind `latest_request_id`
    in_flight_token: Option<CancellationToken>,
    /// Armed once per open when auto-suggest applies
    auto_suggest: Option<Debouncer>,
}

impl SuggestionSession {
    pub fn new() -> Self {
        Self {
            state: SessionState::Idle,
            suppress: false,
            latest_request_id: None,
            in_flight: false,
            in_flight_token: None,
            auto_suggest: None,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn pending(&self) -> Option<&PendingSuggestion> {
        match &self.state {
            SessionState::Displayed(pending) => Some(pending),
            SessionState::Idle => None,
        }
    }

    pub fn is_displayed(&self) -> bool {
        matches!(self.state, SessionState::Displayed(_))
    }

    pub fn is_suppressed(&self) -> bool {
        self.suppress
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn latest_request_id(&self) -> Option<u64> {
        self.latest_request_id
    }

    pub(crate) fn set_suppressed(&mut self, suppress: bool) {
        self.suppress = suppress;
    }

    /// Record a new request; any displayed suggestion is dropped
    ///
    /// The previous request, if still running, is cancelled.
    pub(crate) fn begin_request(
        &mut self,
        request_id: u64,
        cancel_token: CancellationToken,
    ) -> Option<PendingSuggestion> {
        self.cancel_request();
        self.latest_request_id = Some(request_id);
        self.in_flight = true;
        self.in_flight_token = Some(cancel_token);
        self.take_pending()
    }

    /// Cancel the in-flight request, if any; its response will never be shown
    pub(crate) fn cancel_request(&mut self) {
        if let Some(token) = self.in_flight_token.take() {
            token.cancel();
        }
        self.in_flight = false;
    }

    /// Whether a response with `request_id` is the one this session waits for
    pub fn accepts_response(&self, request_id: u64) -> bool {
        self.in_flight && self.latest_request_id == Some(request_id)
    }

    pub(crate) fn finish_request(&mut self) {
        self.in_flight = false;
        self.in_flight_token = None;
    }

    pub(crate) fn display(&mut self, text: String, line: usize) {
        self.state = SessionState::Displayed(PendingSuggestion { text, line });
    }

    /// Move to Idle, returning the suggestion that was displayed
    pub(crate) fn take_pending(&mut self) -> Option<PendingSuggestion> {
        match std::mem::take(&mut self.state) {
            SessionState::Displayed(pending) => Some(pending),
            SessionState::Idle => None,
        }
    }

    pub(crate) fn arm_auto_suggest(&mut self, debouncer: Debouncer) {
        self.auto_suggest = Some(debouncer);
    }

    pub fn is_auto_suggest_armed(&self) -> bool {
        self.auto_suggest
            .as_ref()
            .is_some_and(Debouncer::is_pending)
    }

    /// Fire the auto-suggest timer if due; it never fires twice
    pub(crate) fn auto_suggest_due(&mut self, now: std::time::Instant) -> bool {
        let due = self
            .auto_suggest
            .as_mut()
            .is_some_and(|debouncer| debouncer.should_fire(now));
        if due {
            self.auto_suggest = None;
        }
        due
    }

    pub(crate) fn disarm_auto_suggest(&mut self) {
        self.auto_suggest = None;
    }
}

impl Default for SuggestionSession {
    fn default() -> Self {
        Self::new()
    }
}
