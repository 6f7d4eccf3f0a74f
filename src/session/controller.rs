//! Suggestion lifecycle controller
//!
//! Owns every per-buffer session and is the only code that mutates them.
//! All methods run on the editor's main thread; results from the worker
//! thread are applied when the host calls [`SuggestionController::poll_responses`].

use std::collections::HashMap;
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Instant;

use crossterm::event::KeyEvent;
use tokio_util::sync::CancellationToken;

use super::debouncer::Debouncer;
use super::state::SuggestionSession;
use crate::ai::backend::SuggestionBackend;
use crate::ai::worker::{SuggestRequest, SuggestResponse, WorkerHandle, spawn_worker};
use crate::config::Config;
use crate::editor::EditorMode;
use crate::error::{HostError, SuggestError};
use crate::host::{BufferId, EditorHost, NotifyLevel};
use crate::keymap::Keymap;
use crate::placement::{Mutation, find_target_line, has_message_content};

/// Delay between opening an empty buffer and the automatic request
pub const AUTO_SUGGEST_DELAY_MS: u64 = 100;

/// Result of the accept action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcceptOutcome {
    Accepted,
    /// No suggestion was displayed; the caller should run the key's default action
    NothingToAccept,
}

/// Whether the controller consumed a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Handled,
    Fallthrough,
}

pub struct SuggestionController {
    config: Config,
    keymap: Keymap,
    sessions: HashMap<BufferId, SuggestionSession>,
    next_request_id: u64,
    request_tx: Sender<SuggestRequest>,
    response_rx: Receiver<SuggestResponse>,
    /// Parent of every request token; cancelled when the worker shuts down
    cancel_token: CancellationToken,
    worker: Option<WorkerHandle>,
}

impl SuggestionController {
    /// Create a controller talking to an existing worker over the given channels
    pub fn new(
        config: Config,
        request_tx: Sender<SuggestRequest>,
        response_rx: Receiver<SuggestResponse>,
    ) -> Self {
        let keymap = Keymap::from_config(&config).unwrap_or_else(|e| {
            log::warn!("{}; using default keys", e);
            Keymap::default()
        });

        Self {
            config,
            keymap,
            sessions: HashMap::new(),
            next_request_id: 0,
            request_tx,
            response_rx,
            cancel_token: CancellationToken::new(),
            worker: None,
        }
    }

    /// Create a controller with its own worker thread running `backend`
    pub fn spawn<B: SuggestionBackend>(config: Config, backend: B) -> Self {
        let (request_tx, request_rx) = mpsc::channel();
        let (response_tx, response_rx) = mpsc::channel();

        let mut controller = Self::new(config, request_tx, response_rx);
        controller.worker = Some(spawn_worker(
            backend,
            request_rx,
            response_tx,
            controller.cancel_token.clone(),
        ));
        controller
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn keymap(&self) -> &Keymap {
        &self.keymap
    }

    pub fn session(&self, buffer: BufferId) -> Option<&SuggestionSession> {
        self.sessions.get(&buffer)
    }

    pub fn pending_suggestion(&self, buffer: BufferId) -> Option<&str> {
        self.session(buffer)
            .and_then(SuggestionSession::pending)
            .map(|pending| pending.text.as_str())
    }

    pub fn is_in_flight(&self, buffer: BufferId) -> bool {
        self.session(buffer)
            .is_some_and(SuggestionSession::is_in_flight)
    }

    /// Start tracking a freshly opened buffer
    ///
    /// Arms the one-shot auto-suggest timer when enabled and the buffer holds
    /// no message yet. Attaching an already tracked buffer does nothing.
    pub fn attach<H: EditorHost + ?Sized>(&mut self, host: &mut H, buffer: BufferId, now: Instant) {
        if self.sessions.contains_key(&buffer) {
            return;
        }

        // Loading the file is not a user edit
        host.take_text_changes(buffer);

        let mut session = SuggestionSession::new();
        if self.config.auto_suggest {
            match host.lines(buffer) {
                Ok(lines) if !has_message_content(&lines, self.config.comment_char) => {
                    let mut debouncer = Debouncer::new(AUTO_SUGGEST_DELAY_MS);
                    debouncer.schedule(now);
                    session.arm_auto_suggest(debouncer);
                }
                Ok(_) => log::debug!("Buffer {} already has a message", buffer),
                Err(e) => log::warn!("Cannot read buffer {}: {}", buffer, e),
            }
        }

        self.sessions.insert(buffer, session);
    }

    /// Stop tracking a closed buffer; late responses for it are dropped
    pub fn detach<H: EditorHost + ?Sized>(&mut self, host: &mut H, buffer: BufferId) {
        let Some(mut session) = self.sessions.remove(&buffer) else {
            return;
        };
        session.cancel_request();
        if session.is_displayed()
            && let Err(e) = host.clear_overlay(buffer)
        {
            log::warn!("Failed to clear overlay on buffer {}: {}", buffer, e);
        }
    }

    /// Ask the worker for a new suggestion
    ///
    /// Any displayed suggestion is discarded right away and an older request
    /// still running for the buffer is cancelled. Returns `false` when the
    /// worker is gone.
    pub fn request<H: EditorHost + ?Sized>(&mut self, host: &mut H, buffer: BufferId) -> bool {
        self.next_request_id += 1;
        let request_id = self.next_request_id;
        let cancel_token = self.cancel_token.child_token();

        let session = self.sessions.entry(buffer).or_default();
        session.disarm_auto_suggest();
        if session
            .begin_request(request_id, cancel_token.clone())
            .is_some()
            && let Err(e) = host.clear_overlay(buffer)
        {
            log::warn!("Failed to clear overlay on buffer {}: {}", buffer, e);
        }

        let request = SuggestRequest {
            buffer,
            request_id,
            cancel_token,
        };
        if self.request_tx.send(request).is_err() {
            session.finish_request();
            host.notify(NotifyLevel::Error, "Suggestion worker is not running");
            return false;
        }

        log::debug!("Sent request {} for buffer {}", request_id, buffer);
        host.notify(NotifyLevel::Info, "Generating commit message…");
        true
    }

    /// Apply every response the worker has delivered so far
    pub fn poll_responses<H: EditorHost + ?Sized>(&mut self, host: &mut H) -> usize {
        let mut handled = 0;
        while let Ok(response) = self.response_rx.try_recv() {
            self.handle_response(host, response);
            handled += 1;
        }
        handled
    }

    /// Apply one worker response, discarding it if stale
    pub fn handle_response<H: EditorHost + ?Sized>(
        &mut self,
        host: &mut H,
        response: SuggestResponse,
    ) {
        let SuggestResponse {
            buffer,
            request_id,
            result,
        } = response;
        let comment_char = self.config.comment_char;

        let Some(session) = self.sessions.get_mut(&buffer) else {
            log::debug!("Dropping response {} for closed buffer {}", request_id, buffer);
            return;
        };
        if !session.accepts_response(request_id) {
            log::debug!(
                "Dropping stale response {} for buffer {} (latest {:?})",
                request_id,
                buffer,
                session.latest_request_id()
            );
            return;
        }
        session.finish_request();

        match result {
            Ok(text) => {
                if let Err(e) = display(session, host, buffer, text, comment_char) {
                    session.take_pending();
                    if let Err(clear_err) = host.clear_overlay(buffer) {
                        log::warn!(
                            "Failed to clear overlay on buffer {}: {}",
                            buffer,
                            clear_err
                        );
                    }
                    log::warn!("Failed to display suggestion on buffer {}: {}", buffer, e);
                    host.notify(
                        NotifyLevel::Error,
                        &format!("Could not show suggestion: {}", e),
                    );
                }
            }
            Err(SuggestError::Cancelled) => {
                log::debug!("Request {} cancelled", request_id);
            }
            Err(e) => host.notify(NotifyLevel::Error, &e.to_string()),
        }
    }

    /// Turn the displayed suggestion into buffer text
    pub fn accept<H: EditorHost + ?Sized>(&mut self, host: &mut H, buffer: BufferId) -> AcceptOutcome {
        let Some(session) = self.sessions.get_mut(&buffer) else {
            return AcceptOutcome::NothingToAccept;
        };

        // Edits the host hasn't reported yet still invalidate
        flush_text_changes(session, host, buffer);

        let Some(pending) = session.take_pending() else {
            return AcceptOutcome::NothingToAccept;
        };

        if let Err(e) = host.clear_overlay(buffer) {
            log::warn!("Failed to clear overlay on buffer {}: {}", buffer, e);
        }

        let mut replacement: Vec<String> = pending.text.lines().map(str::to_string).collect();
        if replacement.is_empty() {
            replacement.push(String::new());
        }

        let result = self_edit(session, host, buffer, |host| {
            host.set_lines(buffer, pending.line, pending.line + 1, &replacement)?;
            let last_row = pending.line + replacement.len() - 1;
            let last_col = replacement.last().map_or(0, |line| line.chars().count());
            host.set_cursor(buffer, last_row, last_col)
        });

        if let Err(e) = result {
            log::warn!("Failed to insert suggestion into buffer {}: {}", buffer, e);
            host.notify(
                NotifyLevel::Error,
                &format!("Could not insert suggestion: {}", e),
            );
        }

        AcceptOutcome::Accepted
    }

    /// Text-change watcher: a user edit invalidates the displayed suggestion
    pub fn on_text_changed<H: EditorHost + ?Sized>(&mut self, host: &mut H, buffer: BufferId) {
        if let Some(session) = self.sessions.get_mut(&buffer) {
            watch_text_change(session, host, buffer);
        }
    }

    /// Deliver the host's queued text changes for every tracked buffer
    pub fn sync_text_changes<H: EditorHost + ?Sized>(&mut self, host: &mut H) {
        for (buffer, session) in self.sessions.iter_mut() {
            flush_text_changes(session, host, *buffer);
        }
    }

    /// Fire due auto-suggest timers
    pub fn tick<H: EditorHost + ?Sized>(&mut self, host: &mut H, now: Instant) {
        let comment_char = self.config.comment_char;
        let mut due: Vec<BufferId> = self
            .sessions
            .iter_mut()
            .filter_map(|(buffer, session)| session.auto_suggest_due(now).then_some(*buffer))
            .collect();
        due.sort();

        for buffer in due {
            match host.lines(buffer) {
                // Checked again: the buffer may have filled in during the delay
                Ok(lines) if !has_message_content(&lines, comment_char) => {
                    self.request(host, buffer);
                }
                Ok(_) => log::debug!("Auto-suggest skipped, buffer {} has a message", buffer),
                Err(e) => log::warn!("Cannot read buffer {}: {}", buffer, e),
            }
        }
    }

    /// Key dispatch for the accept and trigger bindings
    pub fn handle_key<H: EditorHost + ?Sized>(
        &mut self,
        host: &mut H,
        buffer: BufferId,
        key: &KeyEvent,
        mode: EditorMode,
    ) -> KeyOutcome {
        if self.keymap.accept.matches(key) {
            return match self.accept(host, buffer) {
                AcceptOutcome::Accepted => KeyOutcome::Handled,
                AcceptOutcome::NothingToAccept => KeyOutcome::Fallthrough,
            };
        }

        let user_trigger = mode == EditorMode::Normal
            && self
                .keymap
                .user_trigger
                .is_some_and(|binding| binding.matches(key));
        if user_trigger || self.keymap.trigger.matches(key) {
            self.request(host, buffer);
            return KeyOutcome::Handled;
        }

        KeyOutcome::Fallthrough
    }
}

/// Show `text` as ghost text on the placement target line
fn display<H: EditorHost + ?Sized>(
    session: &mut SuggestionSession,
    host: &mut H,
    buffer: BufferId,
    text: String,
    comment_char: char,
) -> Result<(), HostError> {
    flush_text_changes(session, host, buffer);

    let lines = host.lines(buffer)?;
    let placement = find_target_line(&lines, comment_char);
    if let Some(Mutation::InsertBlankLine { at }) = placement.mutation {
        self_edit(session, host, buffer, |host| {
            host.set_lines(buffer, at, at, &[String::new()])
        })?;
    }

    host.set_overlay(buffer, placement.target, &text)?;
    session.display(text, placement.target);
    host.set_cursor(buffer, placement.target, 0)
}

/// Run a controller-initiated edit with the suppress flag set
///
/// The host's change events for the edit are delivered while suppressed, so
/// the watcher ignores them. The flag is cleared on every path.
fn self_edit<H, T, F>(
    session: &mut SuggestionSession,
    host: &mut H,
    buffer: BufferId,
    edit: F,
) -> Result<T, HostError>
where
    H: EditorHost + ?Sized,
    F: FnOnce(&mut H) -> Result<T, HostError>,
{
    session.set_suppressed(true);
    let result = edit(host);
    flush_text_changes(session, host, buffer);
    session.set_suppressed(false);
    result
}

fn flush_text_changes<H: EditorHost + ?Sized>(
    session: &mut SuggestionSession,
    host: &mut H,
    buffer: BufferId,
) {
    if host.take_text_changes(buffer) > 0 {
        watch_text_change(session, host, buffer);
    }
}

fn watch_text_change<H: EditorHost + ?Sized>(
    session: &mut SuggestionSession,
    host: &mut H,
    buffer: BufferId,
) {
    if session.is_suppressed() {
        return;
    }

    if let Some(pending) = session.take_pending() {
        log::debug!(
            "Suggestion on line {} of buffer {} invalidated by edit",
            pending.line,
            buffer
        );
        if let Err(e) = host.clear_overlay(buffer) {
            log::warn!("Failed to clear overlay on buffer {}: {}", buffer, e);
        }
    }
}

#[cfg(test)]
#[path = "controller_tests.rs"]
mod controller_tests;
