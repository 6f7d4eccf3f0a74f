//! Suggestion worker thread
//!
//! Runs suggestion requests in a background thread so the editor never
//! blocks on git or the AI CLI. Requests arrive over a channel; results go
//! back over another channel and are applied by the main thread when it
//! polls.

use std::collections::VecDeque;
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::thread::JoinHandle;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use super::backend::SuggestionBackend;
use crate::error::SuggestError;
use crate::host::BufferId;

/// How often an idle worker checks for shutdown
const IDLE_POLL_MS: u64 = 50;

/// Request sent to the worker thread
#[derive(Debug, Clone)]
pub struct SuggestRequest {
    pub buffer: BufferId,
    /// Monotonic id used to discard stale responses
    pub request_id: u64,
    /// Cancelled when a newer request for the buffer supersedes this one
    pub cancel_token: CancellationToken,
}

impl PartialEq for SuggestRequest {
    fn eq(&self, other: &Self) -> bool {
        self.buffer == other.buffer && self.request_id == other.request_id
    }
}

impl Eq for SuggestRequest {}

/// Result sent back to the main thread
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestResponse {
    pub buffer: BufferId,
    pub request_id: u64,
    pub result: Result<String, SuggestError>,
}

/// Owns the worker thread
///
/// Dropping the handle cancels in-flight work and waits for the thread, so a
/// running AI process is killed before the handle is gone.
pub struct WorkerHandle {
    cancel_token: CancellationToken,
    thread: Option<JoinHandle<()>>,
}

impl WorkerHandle {
    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel_token
    }
}

impl Drop for WorkerHandle {
    fn drop(&mut self) {
        self.cancel_token.cancel();
        if let Some(thread) = self.thread.take()
            && thread.join().is_err()
        {
            log::warn!("Suggestion worker panicked");
        }
    }
}

/// Spawn the suggestion worker thread
///
/// Cancelling `cancel_token` shuts the worker down. Request tokens should be
/// children of it so shutdown also aborts the running request.
pub fn spawn_worker<B: SuggestionBackend>(
    backend: B,
    request_rx: Receiver<SuggestRequest>,
    response_tx: Sender<SuggestResponse>,
    cancel_token: CancellationToken,
) -> WorkerHandle {
    let worker_token = cancel_token.clone();

    let thread = std::thread::spawn(move || {
        worker_loop(&backend, request_rx, response_tx, &worker_token);
    });

    WorkerHandle {
        cancel_token,
        thread: Some(thread),
    }
}

/// Process requests until the channel closes or `cancel_token` is cancelled
fn worker_loop(
    backend: &dyn SuggestionBackend,
    request_rx: Receiver<SuggestRequest>,
    response_tx: Sender<SuggestResponse>,
    cancel_token: &CancellationToken,
) {
    let mut queue: VecDeque<SuggestRequest> = VecDeque::new();

    loop {
        if queue.is_empty() {
            match request_rx.recv_timeout(Duration::from_millis(IDLE_POLL_MS)) {
                Ok(request) => queue.push_back(request),
                Err(RecvTimeoutError::Timeout) if cancel_token.is_cancelled() => break,
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => break,
            }
        }
        drain_pending(&request_rx, &mut queue);
        coalesce(&mut queue);

        if cancel_token.is_cancelled() {
            break;
        }

        let Some(request) = queue.pop_front() else {
            continue;
        };
        if request.cancel_token.is_cancelled() {
            log::debug!("Skipping cancelled request {}", request.request_id);
            continue;
        }
        log::debug!(
            "Generating suggestion {} for buffer {}",
            request.request_id,
            request.buffer
        );

        let result = backend.generate(&request.cancel_token);
        if matches!(result, Err(SuggestError::Cancelled)) {
            // Superseded or shutting down; nobody waits for this response
            log::debug!("Suggestion {} cancelled", request.request_id);
            continue;
        }

        let response = SuggestResponse {
            buffer: request.buffer,
            request_id: request.request_id,
            result,
        };
        if response_tx.send(response).is_err() {
            // Main thread gone
            break;
        }
    }

    log::debug!("Suggestion worker shutting down");
}

/// Move every request already waiting on the channel into the queue
fn drain_pending(request_rx: &Receiver<SuggestRequest>, queue: &mut VecDeque<SuggestRequest>) {
    loop {
        match request_rx.try_recv() {
            Ok(request) => queue.push_back(request),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => return,
        }
    }
}

/// Keep only the newest queued request per buffer
///
/// Only the newest request for a buffer can ever be displayed, so older
/// ones are dropped without running. Buffers keep their first-queued order.
fn coalesce(queue: &mut VecDeque<SuggestRequest>) {
    let mut kept: VecDeque<SuggestRequest> = VecDeque::with_capacity(queue.len());
    for request in queue.drain(..) {
        match kept.iter_mut().find(|r| r.buffer == request.buffer) {
            Some(existing) => {
                log::debug!(
                    "Request {} superseded by {}",
                    existing.request_id,
                    request.request_id
                );
                *existing = request;
            }
            None => kept.push_back(request),
        }
    }
    *queue = kept;
}

#[cfg(test)]
#[path = "worker_tests.rs"]
mod worker_tests;
