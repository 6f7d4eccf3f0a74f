//! Tests for the suggestion lifecycle controller

use super::*;
use crate::host::{MemoryHost, Overlay};
use crate::session::{PendingSuggestion, SessionState};
use crossterm::event::{KeyCode, KeyModifiers};
use proptest::prelude::*;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

struct Harness {
    controller: SuggestionController,
    host: MemoryHost,
    request_rx: Receiver<SuggestRequest>,
    response_tx: Sender<SuggestResponse>,
}

impl Harness {
    fn new(config: Config) -> Self {
        let (request_tx, request_rx) = mpsc::channel();
        let (response_tx, response_rx) = mpsc::channel();
        Self {
            controller: SuggestionController::new(config, request_tx, response_rx),
            host: MemoryHost::new(),
            request_rx,
            response_tx,
        }
    }

    fn manual() -> Self {
        Self::new(Config {
            auto_suggest: false,
            ..Default::default()
        })
    }

    fn open(&mut self, lines: &[&str]) -> BufferId {
        let buffer = self.host.open_buffer(lines);
        self.controller
            .attach(&mut self.host, buffer, Instant::now());
        buffer
    }

    fn request(&mut self, buffer: BufferId) -> u64 {
        assert!(self.controller.request(&mut self.host, buffer));
        let request = self.request_rx.try_recv().expect("request sent to worker");
        assert_eq!(request.buffer, buffer);
        request.request_id
    }

    fn respond(&mut self, buffer: BufferId, request_id: u64, result: Result<String, SuggestError>) {
        self.response_tx
            .send(SuggestResponse {
                buffer,
                request_id,
                result,
            })
            .unwrap();
        self.controller.poll_responses(&mut self.host);
    }

    fn show(&mut self, buffer: BufferId, text: &str) {
        let id = self.request(buffer);
        self.respond(buffer, id, Ok(text.to_string()));
    }

    fn user_edit(&mut self, buffer: BufferId, row: usize, text: &str) {
        self.host.user_edit(buffer, row, text).unwrap();
        self.controller.sync_text_changes(&mut self.host);
    }

    fn lines(&self, buffer: BufferId) -> Vec<String> {
        self.host.lines(buffer).unwrap()
    }

    fn last_notification(&self) -> Option<&(NotifyLevel, String)> {
        self.host.notifications().last()
    }
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn key_with_mods(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
    KeyEvent::new(code, modifiers)
}

// =========================================================================
// Request / Display
// =========================================================================

#[test]
fn test_request_ids_increase() {
    let mut h = Harness::manual();
    let buffer = h.open(&[""]);

    let first = h.request(buffer);
    let second = h.request(buffer);

    assert!(second > first);
    assert!(h.controller.is_in_flight(buffer));
}

#[test]
fn test_request_shows_progress_notification() {
    let mut h = Harness::manual();
    let buffer = h.open(&[""]);

    h.request(buffer);

    assert_eq!(
        h.last_notification(),
        Some(&(NotifyLevel::Info, "Generating commit message…".to_string()))
    );
}

#[test]
fn test_response_displays_overlay_on_blank_line() {
    let mut h = Harness::manual();
    let buffer = h.open(&["# comment", "", "body"]);

    h.show(buffer, "feat: add x");

    assert_eq!(
        h.host.overlay(buffer),
        Some(&Overlay {
            line: 1,
            text: "feat: add x".to_string()
        })
    );
    assert_eq!(h.controller.pending_suggestion(buffer), Some("feat: add x"));
    assert_eq!(h.host.cursor(buffer).unwrap(), (1, 0));
    assert_eq!(h.lines(buffer), vec!["# comment", "", "body"]);
    assert!(!h.controller.is_in_flight(buffer));
}

#[test]
fn test_response_inserts_blank_line_before_content() {
    let mut h = Harness::manual();
    let buffer = h.open(&["# comment", "feat: x"]);

    h.show(buffer, "fix: y");

    assert_eq!(h.lines(buffer), vec!["# comment", "", "feat: x"]);
    assert_eq!(h.host.overlay(buffer).unwrap().line, 1);
}

#[test]
fn test_session_state_tracks_display() {
    let mut h = Harness::manual();
    let buffer = h.open(&[""]);
    assert_eq!(h.controller.session(buffer).unwrap().state(), &SessionState::Idle);

    h.show(buffer, "feat: add x");

    assert_eq!(
        h.controller.session(buffer).unwrap().state(),
        &SessionState::Displayed(PendingSuggestion {
            text: "feat: add x".to_string(),
            line: 0,
        })
    );
}

#[test]
fn test_display_failure_reports_and_stays_idle() {
    let mut h = Harness::manual();
    let buffer = h.open(&[""]);
    let id = h.request(buffer);

    // The host lost the buffer without the controller being told
    h.host.close_buffer(buffer);
    h.respond(buffer, id, Ok("feat: orphan".to_string()));

    assert_eq!(h.controller.pending_suggestion(buffer), None);
    assert_eq!(h.last_notification().unwrap().0, NotifyLevel::Error);
    let errors = h
        .host
        .notifications()
        .iter()
        .filter(|(level, _)| *level == NotifyLevel::Error)
        .count();
    assert_eq!(errors, 1);
    assert!(!h.controller.session(buffer).unwrap().is_suppressed());
}

#[test]
fn test_own_insertion_does_not_invalidate() {
    let mut h = Harness::manual();
    let buffer = h.open(&[]);

    h.show(buffer, "feat: add x");
    h.controller.sync_text_changes(&mut h.host);

    assert_eq!(h.lines(buffer), vec![""]);
    assert!(h.host.overlay(buffer).is_some());
    assert_eq!(h.controller.pending_suggestion(buffer), Some("feat: add x"));
    assert!(!h.controller.session(buffer).unwrap().is_suppressed());
}

#[test]
fn test_error_response_notifies_and_stays_idle() {
    let mut h = Harness::manual();
    let buffer = h.open(&[""]);

    let id = h.request(buffer);
    h.respond(buffer, id, Err(SuggestError::NoStagedChanges));

    assert_eq!(
        h.last_notification(),
        Some(&(
            NotifyLevel::Error,
            SuggestError::NoStagedChanges.to_string()
        ))
    );
    assert!(h.host.overlay(buffer).is_none());
    assert_eq!(h.controller.pending_suggestion(buffer), None);
    assert!(!h.controller.is_in_flight(buffer));
}

#[test]
fn test_cancelled_response_is_silent() {
    let mut h = Harness::manual();
    let buffer = h.open(&[""]);

    let id = h.request(buffer);
    let before = h.host.notifications().len();
    h.respond(buffer, id, Err(SuggestError::Cancelled));

    assert_eq!(h.host.notifications().len(), before);
    assert!(h.host.overlay(buffer).is_none());
}

#[test]
fn test_new_request_discards_displayed_suggestion() {
    let mut h = Harness::manual();
    let buffer = h.open(&[""]);
    h.show(buffer, "feat: old");

    h.request(buffer);

    assert!(h.host.overlay(buffer).is_none());
    assert_eq!(h.controller.pending_suggestion(buffer), None);
}

#[test]
fn test_new_request_cancels_running_request() {
    let mut h = Harness::manual();
    let buffer = h.open(&[""]);

    h.controller.request(&mut h.host, buffer);
    let first = h.request_rx.try_recv().unwrap();
    assert!(!first.cancel_token.is_cancelled());

    h.controller.request(&mut h.host, buffer);
    let second = h.request_rx.try_recv().unwrap();

    assert!(first.cancel_token.is_cancelled());
    assert!(!second.cancel_token.is_cancelled());
    assert!(h.controller.is_in_flight(buffer));
}

#[test]
fn test_request_does_not_cancel_other_buffers() {
    let mut h = Harness::manual();
    let a = h.open(&[""]);
    let b = h.open(&[""]);

    h.controller.request(&mut h.host, a);
    let for_a = h.request_rx.try_recv().unwrap();
    h.controller.request(&mut h.host, b);

    assert!(!for_a.cancel_token.is_cancelled());
}

#[test]
fn test_finished_request_token_is_not_cancelled_later() {
    let mut h = Harness::manual();
    let buffer = h.open(&[""]);

    h.controller.request(&mut h.host, buffer);
    let first = h.request_rx.try_recv().unwrap();
    h.respond(buffer, first.request_id, Ok("feat: done".to_string()));
    h.request(buffer);

    assert!(!first.cancel_token.is_cancelled());
}

#[test]
fn test_replacement_suggestion_replaces_overlay() {
    let mut h = Harness::manual();
    let buffer = h.open(&[""]);
    h.show(buffer, "feat: old");

    h.show(buffer, "feat: new");

    assert_eq!(h.host.overlay(buffer).unwrap().text, "feat: new");
    assert_eq!(h.lines(buffer), vec![""]);
}

#[test]
fn test_request_without_worker_fails() {
    let (request_tx, request_rx) = mpsc::channel();
    let (_response_tx, response_rx) = mpsc::channel();
    drop(request_rx);
    let mut controller = SuggestionController::new(Config::default(), request_tx, response_rx);
    let mut host = MemoryHost::new();
    let buffer = host.open_buffer(&[""]);

    assert!(!controller.request(&mut host, buffer));
    assert!(!controller.is_in_flight(buffer));
    assert_eq!(host.notifications().last().unwrap().0, NotifyLevel::Error);
}

// =========================================================================
// Stale Responses
// =========================================================================

#[test]
fn test_late_stale_response_does_not_overwrite_newer() {
    let mut h = Harness::manual();
    let buffer = h.open(&[""]);

    let old = h.request(buffer);
    let new = h.request(buffer);
    h.respond(buffer, new, Ok("feat: newer".to_string()));
    h.respond(buffer, old, Ok("feat: stale".to_string()));

    assert_eq!(h.controller.pending_suggestion(buffer), Some("feat: newer"));
    assert_eq!(h.host.overlay(buffer).unwrap().text, "feat: newer");
}

#[test]
fn test_early_stale_response_is_ignored() {
    let mut h = Harness::manual();
    let buffer = h.open(&[""]);

    let old = h.request(buffer);
    let new = h.request(buffer);
    h.respond(buffer, old, Ok("feat: stale".to_string()));

    assert!(h.host.overlay(buffer).is_none());
    assert!(h.controller.is_in_flight(buffer));

    h.respond(buffer, new, Ok("feat: newer".to_string()));
    assert_eq!(h.controller.pending_suggestion(buffer), Some("feat: newer"));
}

#[test]
fn test_stale_error_is_not_reported() {
    let mut h = Harness::manual();
    let buffer = h.open(&[""]);

    let old = h.request(buffer);
    h.request(buffer);
    let before = h.host.notifications().len();
    h.respond(buffer, old, Err(SuggestError::ProcessTimeout(10)));

    assert_eq!(h.host.notifications().len(), before);
}

#[test]
fn test_duplicate_response_is_ignored() {
    let mut h = Harness::manual();
    let buffer = h.open(&[""]);

    let id = h.request(buffer);
    h.respond(buffer, id, Ok("feat: once".to_string()));
    h.controller.accept(&mut h.host, buffer);
    h.respond(buffer, id, Ok("feat: once".to_string()));

    assert!(h.host.overlay(buffer).is_none());
    assert_eq!(h.lines(buffer), vec!["feat: once"]);
}

#[test]
fn test_response_for_detached_buffer_is_dropped() {
    let mut h = Harness::manual();
    let buffer = h.open(&[""]);

    h.controller.request(&mut h.host, buffer);
    let request = h.request_rx.try_recv().unwrap();
    h.controller.detach(&mut h.host, buffer);
    assert!(request.cancel_token.is_cancelled());

    h.respond(buffer, request.request_id, Ok("feat: late".to_string()));

    assert!(h.controller.session(buffer).is_none());
    assert!(h.host.overlay(buffer).is_none());
}

// =========================================================================
// Accept
// =========================================================================

#[test]
fn test_accept_inserts_text_and_moves_cursor() {
    let mut h = Harness::manual();
    let buffer = h.open(&["", "# Please enter the commit message"]);
    h.show(buffer, "feat: add x");

    let outcome = h.controller.accept(&mut h.host, buffer);

    assert_eq!(outcome, AcceptOutcome::Accepted);
    assert_eq!(
        h.lines(buffer),
        vec!["feat: add x", "# Please enter the commit message"]
    );
    assert_eq!(h.host.cursor(buffer).unwrap(), (0, 11));
    assert!(h.host.overlay(buffer).is_none());
    assert_eq!(h.controller.pending_suggestion(buffer), None);
}

#[test]
fn test_accept_multiline_suggestion() {
    let mut h = Harness::manual();
    let buffer = h.open(&["", "# comment"]);
    h.show(buffer, "feat: add parser\n\nSupports arrays.");

    h.controller.accept(&mut h.host, buffer);

    assert_eq!(
        h.lines(buffer),
        vec!["feat: add parser", "", "Supports arrays.", "# comment"]
    );
    assert_eq!(h.host.cursor(buffer).unwrap(), (2, 16));
}

#[test]
fn test_accept_ignores_cursor_position() {
    let mut h = Harness::manual();
    let buffer = h.open(&["", "# a", "# b"]);
    h.show(buffer, "chore: tidy");
    h.host.set_cursor(buffer, 2, 1).unwrap();

    assert_eq!(h.controller.accept(&mut h.host, buffer), AcceptOutcome::Accepted);
    assert_eq!(h.lines(buffer)[0], "chore: tidy");
}

#[test]
fn test_accept_without_suggestion_is_noop() {
    let mut h = Harness::manual();
    let buffer = h.open(&["# comment", ""]);

    let outcome = h.controller.accept(&mut h.host, buffer);

    assert_eq!(outcome, AcceptOutcome::NothingToAccept);
    assert_eq!(h.lines(buffer), vec!["# comment", ""]);
    assert_eq!(h.host.take_text_changes(buffer), 0);
}

#[test]
fn test_accept_unknown_buffer() {
    let mut h = Harness::manual();
    assert_eq!(
        h.controller.accept(&mut h.host, BufferId(99)),
        AcceptOutcome::NothingToAccept
    );
}

#[test]
fn test_accept_does_not_trigger_invalidation() {
    let mut h = Harness::manual();
    let buffer = h.open(&[""]);
    h.show(buffer, "feat: a");

    h.controller.accept(&mut h.host, buffer);
    h.controller.sync_text_changes(&mut h.host);

    assert!(!h.controller.session(buffer).unwrap().is_suppressed());
    assert_eq!(h.lines(buffer), vec!["feat: a"]);
}

#[test]
fn test_accept_after_unsynced_user_edit_is_noop() {
    let mut h = Harness::manual();
    let buffer = h.open(&[""]);
    h.show(buffer, "feat: a");

    // Edit happened but the host hasn't reported it yet
    h.host.user_edit(buffer, 0, "my own message").unwrap();

    assert_eq!(
        h.controller.accept(&mut h.host, buffer),
        AcceptOutcome::NothingToAccept
    );
    assert_eq!(h.lines(buffer), vec!["my own message"]);
    assert!(h.host.overlay(buffer).is_none());
}

// =========================================================================
// Invalidation
// =========================================================================

#[test]
fn test_user_edit_invalidates_immediately() {
    let mut h = Harness::manual();
    let buffer = h.open(&["", "# comment"]);
    h.show(buffer, "feat: add x");

    h.user_edit(buffer, 0, "f");

    assert!(h.host.overlay(buffer).is_none());
    assert_eq!(h.controller.pending_suggestion(buffer), None);
}

#[test]
fn test_direct_text_changed_event_invalidates() {
    let mut h = Harness::manual();
    let buffer = h.open(&[""]);
    h.show(buffer, "feat: add x");

    h.controller.on_text_changed(&mut h.host, buffer);

    assert!(h.host.overlay(buffer).is_none());
}

#[test]
fn test_edits_while_idle_never_show_overlay() {
    let mut h = Harness::manual();
    let buffer = h.open(&[""]);

    h.user_edit(buffer, 0, "a");
    h.user_edit(buffer, 0, "ab");

    assert!(h.host.overlay(buffer).is_none());
}

#[test]
fn test_edit_in_other_buffer_does_not_invalidate() {
    let mut h = Harness::manual();
    let first = h.open(&[""]);
    let second = h.open(&[""]);
    h.show(first, "feat: first");

    h.user_edit(second, 0, "typing");

    assert_eq!(h.controller.pending_suggestion(first), Some("feat: first"));
    assert_eq!(h.controller.pending_suggestion(second), None);
}

// =========================================================================
// Auto-suggest
// =========================================================================

#[test]
fn test_auto_suggest_fires_once_after_delay() {
    let mut h = Harness::new(Config::default());
    let buffer = h.host.open_buffer(&["", "# comment"]);
    let opened = Instant::now();
    h.controller.attach(&mut h.host, buffer, opened);

    h.controller.tick(&mut h.host, opened + Duration::from_millis(10));
    assert!(h.request_rx.try_recv().is_err());

    h.controller
        .tick(&mut h.host, opened + Duration::from_millis(AUTO_SUGGEST_DELAY_MS));
    assert_eq!(h.request_rx.try_recv().unwrap().buffer, buffer);

    h.controller.tick(&mut h.host, opened + Duration::from_secs(5));
    assert!(h.request_rx.try_recv().is_err());
}

#[test]
fn test_auto_suggest_skipped_when_buffer_has_message() {
    let mut h = Harness::new(Config::default());
    let buffer = h.host.open_buffer(&["fix: typo", "# comment"]);
    let opened = Instant::now();
    h.controller.attach(&mut h.host, buffer, opened);

    assert!(!h.controller.session(buffer).unwrap().is_auto_suggest_armed());
    h.controller.tick(&mut h.host, opened + Duration::from_secs(1));
    assert!(h.request_rx.try_recv().is_err());
}

#[test]
fn test_auto_suggest_rechecks_content_when_firing() {
    let mut h = Harness::new(Config::default());
    let buffer = h.host.open_buffer(&[""]);
    let opened = Instant::now();
    h.controller.attach(&mut h.host, buffer, opened);

    h.user_edit(buffer, 0, "wip: typing fast");
    h.controller.tick(&mut h.host, opened + Duration::from_secs(1));

    assert!(h.request_rx.try_recv().is_err());
}

#[test]
fn test_auto_suggest_disabled() {
    let mut h = Harness::manual();
    let buffer = h.open(&[""]);

    assert!(!h.controller.session(buffer).unwrap().is_auto_suggest_armed());
    h.controller.tick(&mut h.host, Instant::now() + Duration::from_secs(1));
    assert!(h.request_rx.try_recv().is_err());
}

#[test]
fn test_manual_request_disarms_auto_suggest() {
    let mut h = Harness::new(Config::default());
    let buffer = h.host.open_buffer(&[""]);
    let opened = Instant::now();
    h.controller.attach(&mut h.host, buffer, opened);

    h.request(buffer);
    h.controller.tick(&mut h.host, opened + Duration::from_secs(1));

    assert!(h.request_rx.try_recv().is_err());
}

#[test]
fn test_attach_twice_keeps_session() {
    let mut h = Harness::manual();
    let buffer = h.open(&[""]);
    h.show(buffer, "feat: keep");

    h.controller.attach(&mut h.host, buffer, Instant::now());

    assert_eq!(h.controller.pending_suggestion(buffer), Some("feat: keep"));
}

#[test]
fn test_detach_clears_overlay() {
    let mut h = Harness::manual();
    let buffer = h.open(&[""]);
    h.show(buffer, "feat: bye");

    h.controller.detach(&mut h.host, buffer);

    assert!(h.host.overlay(buffer).is_none());
    assert!(h.controller.session(buffer).is_none());
}

// =========================================================================
// Key Handling
// =========================================================================

#[test]
fn test_tab_without_suggestion_falls_through() {
    let mut h = Harness::manual();
    let buffer = h.open(&[""]);

    let outcome =
        h.controller
            .handle_key(&mut h.host, buffer, &key(KeyCode::Tab), EditorMode::Insert);

    assert_eq!(outcome, KeyOutcome::Fallthrough);
}

#[test]
fn test_tab_accepts_in_both_modes() {
    for mode in [EditorMode::Insert, EditorMode::Normal] {
        let mut h = Harness::manual();
        let buffer = h.open(&[""]);
        h.show(buffer, "feat: tab");

        let outcome = h
            .controller
            .handle_key(&mut h.host, buffer, &key(KeyCode::Tab), mode);

        assert_eq!(outcome, KeyOutcome::Handled);
        assert_eq!(h.lines(buffer), vec!["feat: tab"]);
    }
}

#[test]
fn test_ctrl_g_triggers_request() {
    let mut h = Harness::manual();
    let buffer = h.open(&[""]);

    let outcome = h.controller.handle_key(
        &mut h.host,
        buffer,
        &key_with_mods(KeyCode::Char('g'), KeyModifiers::CONTROL),
        EditorMode::Insert,
    );

    assert_eq!(outcome, KeyOutcome::Handled);
    assert!(h.request_rx.try_recv().is_ok());
}

#[test]
fn test_user_trigger_only_in_normal_mode() {
    let mut h = Harness::new(Config {
        auto_suggest: false,
        key_binding: Some("s".to_string()),
        ..Default::default()
    });
    let buffer = h.open(&[""]);

    let insert = h.controller.handle_key(
        &mut h.host,
        buffer,
        &key(KeyCode::Char('s')),
        EditorMode::Insert,
    );
    assert_eq!(insert, KeyOutcome::Fallthrough);
    assert!(h.request_rx.try_recv().is_err());

    let normal = h.controller.handle_key(
        &mut h.host,
        buffer,
        &key(KeyCode::Char('s')),
        EditorMode::Normal,
    );
    assert_eq!(normal, KeyOutcome::Handled);
    assert!(h.request_rx.try_recv().is_ok());
}

#[test]
fn test_invalid_user_binding_falls_back_to_defaults() {
    let h = Harness::new(Config {
        key_binding: Some("<Hyper-x>".to_string()),
        ..Default::default()
    });
    assert_eq!(h.controller.keymap(), &Keymap::default());
}

#[test]
fn test_other_keys_fall_through() {
    let mut h = Harness::manual();
    let buffer = h.open(&[""]);
    h.show(buffer, "feat: x");

    let outcome = h.controller.handle_key(
        &mut h.host,
        buffer,
        &key(KeyCode::Char('x')),
        EditorMode::Insert,
    );

    assert_eq!(outcome, KeyOutcome::Fallthrough);
    assert_eq!(h.controller.pending_suggestion(buffer), Some("feat: x"));
}

// =========================================================================
// Worker Integration
// =========================================================================

#[test]
fn test_spawned_worker_round_trip() {
    let mut controller = SuggestionController::spawn(
        Config {
            auto_suggest: false,
            ..Default::default()
        },
        |_: &CancellationToken| -> Result<String, SuggestError> { Ok("feat: from worker".to_string()) },
    );
    let mut host = MemoryHost::new();
    let buffer = host.open_buffer(&["", "# comment"]);
    controller.attach(&mut host, buffer, Instant::now());

    assert!(controller.request(&mut host, buffer));

    let deadline = Instant::now() + Duration::from_secs(5);
    while controller.pending_suggestion(buffer).is_none() && Instant::now() < deadline {
        controller.poll_responses(&mut host);
        std::thread::sleep(Duration::from_millis(5));
    }

    assert_eq!(controller.pending_suggestion(buffer), Some("feat: from worker"));
    assert_eq!(host.overlay(buffer).unwrap().line, 0);
}

#[test]
fn test_dropping_controller_cancels_running_request() {
    let (started_tx, started_rx) = mpsc::channel();
    let (cancelled_tx, cancelled_rx) = mpsc::channel();
    let mut controller = SuggestionController::spawn(
        Config {
            auto_suggest: false,
            ..Default::default()
        },
        move |token: &CancellationToken| -> Result<String, SuggestError> {
            let _ = started_tx.send(());
            let deadline = Instant::now() + Duration::from_secs(30);
            while !token.is_cancelled() && Instant::now() < deadline {
                std::thread::sleep(Duration::from_millis(5));
            }
            let _ = cancelled_tx.send(token.is_cancelled());
            Err(SuggestError::Cancelled)
        },
    );
    let mut host = MemoryHost::new();
    let buffer = host.open_buffer(&[""]);
    controller.attach(&mut host, buffer, Instant::now());
    assert!(controller.request(&mut host, buffer));
    started_rx.recv_timeout(Duration::from_secs(5)).unwrap();

    drop(controller);

    // The worker has already finished by the time drop returns
    assert_eq!(cancelled_rx.try_recv(), Ok(true));
}

// =========================================================================
// Properties
// =========================================================================

#[derive(Debug, Clone)]
enum Op {
    UserType(String),
    Request,
    RespondLatest(String),
    RespondStale(String),
    Accept,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        "[a-z ]{0,8}".prop_map(Op::UserType),
        Just(Op::Request),
        "[a-z]{1,8}".prop_map(Op::RespondLatest),
        "[a-z]{1,8}".prop_map(Op::RespondStale),
        Just(Op::Accept),
    ]
}

// Overlay visibility always mirrors the pending suggestion, and accepting
// always leaves the buffer idle.
proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_overlay_mirrors_pending_suggestion(ops in prop::collection::vec(op(), 0..24)) {
        let mut h = Harness::manual();
        let buffer = h.open(&["", "# comment"]);
        let mut issued: Vec<u64> = Vec::new();

        for op in ops {
            match op {
                Op::UserType(text) => h.user_edit(buffer, 0, &text),
                Op::Request => issued.push(h.request(buffer)),
                Op::RespondLatest(text) => {
                    if let Some(&id) = issued.last() {
                        h.respond(buffer, id, Ok(text));
                    }
                }
                Op::RespondStale(text) => {
                    if issued.len() >= 2 {
                        let stale = issued[0];
                        let before = h.controller.pending_suggestion(buffer).map(str::to_string);
                        h.respond(buffer, stale, Ok(text));
                        let after = h.controller.pending_suggestion(buffer).map(str::to_string);
                        prop_assert_eq!(before, after);
                    }
                }
                Op::Accept => {
                    h.controller.accept(&mut h.host, buffer);
                    prop_assert!(h.controller.pending_suggestion(buffer).is_none());
                    prop_assert!(h.host.overlay(buffer).is_none());
                }
            }

            let pending = h.controller.session(buffer).unwrap().pending().cloned();
            let overlay = h.host.overlay(buffer).cloned();
            prop_assert_eq!(
                pending.map(|p| (p.line, p.text)),
                overlay.map(|o| (o.line, o.text))
            );
            prop_assert!(!h.controller.session(buffer).unwrap().is_suppressed());
        }
    }

    #[test]
    fn prop_edits_while_idle_never_render(edits in prop::collection::vec("[a-z#]{0,6}", 0..16)) {
        let mut h = Harness::manual();
        let buffer = h.open(&[""]);

        for edit in edits {
            h.user_edit(buffer, 0, &edit);
            prop_assert!(h.host.overlay(buffer).is_none());
        }
    }
}
