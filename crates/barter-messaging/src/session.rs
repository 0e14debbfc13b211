// SPDX-FileCopyrightText: 2026 Barter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-conversation FSM that keeps one timeline in sync with the backend.
//!
//! States: Initializing -> Synchronizing <-> Idle -> Closed.
//!
//! A session owns exactly one poll task. Each cycle fetches the full timeline
//! and replaces the local one wholesale; there is no merge or dedupe. Sends
//! append the canonical message immediately and the next cycle overwrites it
//! with whatever the server returns, so a freshly sent message may vanish for
//! one cycle if the backend has not indexed it yet.
//!
//! Closing cancels the idle timer but not an in-flight request. Any fetch or
//! send that resolves after close is discarded: every mutation of the
//! snapshot re-checks the state under the watch channel's lock.

use std::sync::Arc;

use barter_core::types::wire_item_title;
use barter_core::{BarterError, ConversationIdentity, Message, MessagingApi, OutgoingMessage};
use strum::Display;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::policy::PollPolicy;

/// States in the session FSM.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum SessionState {
    /// Constructed; the first fetch has not started yet.
    Initializing,
    /// A timeline fetch is in flight.
    Synchronizing,
    /// Waiting out the poll interval.
    Idle,
    /// Torn down. Terminal.
    Closed,
}

/// Point-in-time view of a session, published on every change.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub state: SessionState,
    /// Messages in server order, plus any optimistic appends since the last cycle.
    pub timeline: Vec<Message>,
    /// True until the first cycle settles, successfully or not.
    pub loading: bool,
    /// Number of settled poll cycles.
    pub cycles: u64,
    /// Failed cycles since the last successful one.
    pub consecutive_failures: u32,
}

impl SessionSnapshot {
    fn initial() -> Self {
        Self {
            state: SessionState::Initializing,
            timeline: Vec::new(),
            loading: true,
            cycles: 0,
            consecutive_failures: 0,
        }
    }
}

/// Result of [`ChatSession::send_message`] when no transport error occurred.
#[derive(Debug, Clone, PartialEq)]
pub enum SendOutcome {
    /// Stored by the backend and appended to the local timeline.
    Delivered(Message),
    /// Blank content; nothing was sent.
    EmptyContent,
}

/// The live, client-side representation of one open conversation.
pub struct ChatSession {
    identity: ConversationIdentity,
    item_title: Option<String>,
    api: Arc<dyn MessagingApi>,
    snapshot: Arc<watch::Sender<SessionSnapshot>>,
    cancel: CancellationToken,
    poller: JoinHandle<()>,
}

impl ChatSession {
    /// Opens a session and starts its poll loop. The first fetch is issued
    /// immediately.
    ///
    /// `item_title` is the title shown for the conversation; it is sent
    /// along with each message unless it is the direct-message placeholder.
    ///
    /// Must be called from within a tokio runtime.
    pub fn open(
        identity: ConversationIdentity,
        item_title: Option<String>,
        api: Arc<dyn MessagingApi>,
        policy: Arc<dyn PollPolicy>,
    ) -> Self {
        let (tx, _rx) = watch::channel(SessionSnapshot::initial());
        let snapshot = Arc::new(tx);
        let cancel = CancellationToken::new();

        info!(
            local = %identity.local(),
            other = %identity.other(),
            item_id = identity.item_id().map(|i| i.as_str()),
            "opening chat session"
        );

        let poller = tokio::spawn(run_poll_loop(
            identity.clone(),
            api.clone(),
            policy,
            snapshot.clone(),
            cancel.clone(),
        ));

        Self {
            identity,
            item_title,
            api,
            snapshot,
            cancel,
            poller,
        }
    }

    pub fn identity(&self) -> &ConversationIdentity {
        &self.identity
    }

    /// Title shown for this conversation, if any.
    pub fn item_title(&self) -> Option<&str> {
        self.item_title.as_deref()
    }

    pub fn state(&self) -> SessionState {
        self.snapshot.borrow().state
    }

    pub fn is_closed(&self) -> bool {
        self.state() == SessionState::Closed
    }

    /// Copy of the current timeline.
    pub fn timeline(&self) -> Vec<Message> {
        self.snapshot.borrow().timeline.clone()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshot.borrow().clone()
    }

    /// Receiver notified on every state or timeline change.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshot.subscribe()
    }

    /// Sends `content` to the other participant.
    ///
    /// Blank content returns [`SendOutcome::EmptyContent`] without touching
    /// the network. On success the canonical message is appended to the
    /// timeline at once. On a transport error the timeline is untouched and
    /// the error is returned so the caller can keep the draft for a retry.
    /// If the session is closed before the backend answers, the stored
    /// message is not applied and [`BarterError::StaleSession`] is returned.
    pub async fn send_message(&self, content: &str) -> Result<SendOutcome, BarterError> {
        if content.trim().is_empty() {
            debug!("ignoring blank message");
            return Ok(SendOutcome::EmptyContent);
        }
        if self.is_closed() {
            return Err(BarterError::StaleSession);
        }

        let outgoing = OutgoingMessage {
            sender: self.identity.local().clone(),
            receiver: self.identity.other().clone(),
            content: content.to_string(),
            item_id: self.identity.item_id().cloned(),
            item_title: wire_item_title(self.item_title.as_deref()),
        };

        let sent = self.api.send_message(&outgoing).await.inspect_err(|e| {
            warn!(other = %self.identity.other(), error = %e, "failed to send message");
        })?;

        let appended = self.snapshot.send_if_modified(|s| {
            if s.state == SessionState::Closed {
                return false;
            }
            s.timeline.push(sent.clone());
            true
        });
        if !appended {
            debug!(other = %self.identity.other(), "send resolved after close, discarding");
            return Err(BarterError::StaleSession);
        }

        debug!(other = %self.identity.other(), "message sent");
        Ok(SendOutcome::Delivered(sent))
    }

    /// Marks the other participant's messages to us as read. Non-fatal.
    pub async fn mark_read(&self) {
        if let Err(e) = self
            .api
            .mark_read(self.identity.local(), self.identity.other())
            .await
        {
            warn!(other = %self.identity.other(), error = %e, "failed to mark conversation read");
        }
    }

    /// Transitions to Closed and stops the timer. Safe to call from any state,
    /// any number of times.
    pub fn close(&self) {
        let closed_now = self.snapshot.send_if_modified(|s| {
            if s.state == SessionState::Closed {
                return false;
            }
            s.state = SessionState::Closed;
            true
        });
        self.cancel.cancel();
        if closed_now {
            info!(other = %self.identity.other(), "chat session closed");
        }
    }

    /// True once the poll task has exited.
    pub fn is_poller_finished(&self) -> bool {
        self.poller.is_finished()
    }
}

impl Drop for ChatSession {
    fn drop(&mut self) {
        self.close();
    }
}

impl std::fmt::Debug for ChatSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatSession")
            .field("identity", &self.identity)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

/// Moves the FSM into Synchronizing unless it has been closed.
fn begin_cycle(snapshot: &watch::Sender<SessionSnapshot>) -> bool {
    snapshot.send_if_modified(|s| {
        if s.state == SessionState::Closed {
            return false;
        }
        s.state = SessionState::Synchronizing;
        true
    })
}

async fn run_poll_loop(
    identity: ConversationIdentity,
    api: Arc<dyn MessagingApi>,
    policy: Arc<dyn PollPolicy>,
    snapshot: Arc<watch::Sender<SessionSnapshot>>,
    cancel: CancellationToken,
) {
    let mut consecutive_failures = 0u32;

    loop {
        if !begin_cycle(&snapshot) {
            break;
        }

        // Not raced against `cancel`: the request runs to completion and a
        // late result is dropped below.
        let (timeline, error) = match api.fetch_timeline(&identity).await {
            Ok(timeline) => (Some(timeline), None),
            Err(e) => (None, Some(e)),
        };
        let failures = if error.is_some() {
            consecutive_failures.saturating_add(1)
        } else {
            0
        };

        let applied = snapshot.send_if_modified(|s| {
            if s.state == SessionState::Closed {
                return false;
            }
            if let Some(timeline) = timeline {
                s.timeline = timeline;
            }
            s.state = SessionState::Idle;
            s.loading = false;
            s.cycles += 1;
            s.consecutive_failures = failures;
            true
        });
        if !applied {
            debug!(other = %identity.other(), "fetch resolved after close, discarding");
            break;
        }
        consecutive_failures = failures;

        let cycle = snapshot.borrow().cycles;
        match error {
            Some(e) => warn!(
                other = %identity.other(),
                cycle,
                consecutive_failures,
                error = %e,
                "poll cycle failed, will retry"
            ),
            None => debug!(other = %identity.other(), cycle, "poll cycle settled"),
        }

        let delay = policy.next_delay(consecutive_failures);
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = tokio::time::sleep(delay) => {}
        }
    }

    debug!(other = %identity.other(), "poll loop stopped");
}

#[cfg(test)]
mod tests {
    use barter_test_utils::MockMessagingApi;
    use barter_test_utils::fixtures::identity;
    use tracing_test::traced_test;

    use super::*;
    use crate::policy::FixedInterval;

    #[test]
    fn session_state_display() {
        assert_eq!(SessionState::Initializing.to_string(), "initializing");
        assert_eq!(SessionState::Synchronizing.to_string(), "synchronizing");
        assert_eq!(SessionState::Idle.to_string(), "idle");
        assert_eq!(SessionState::Closed.to_string(), "closed");
    }

    #[test]
    fn initial_snapshot_is_loading() {
        let snapshot = SessionSnapshot::initial();
        assert_eq!(snapshot.state, SessionState::Initializing);
        assert!(snapshot.loading);
        assert!(snapshot.timeline.is_empty());
        assert_eq!(snapshot.cycles, 0);
    }

    #[test]
    fn begin_cycle_refuses_closed_session() {
        let (tx, _rx) = watch::channel(SessionSnapshot::initial());
        assert!(begin_cycle(&tx));
        assert_eq!(tx.borrow().state, SessionState::Synchronizing);

        tx.send_modify(|s| s.state = SessionState::Closed);
        assert!(!begin_cycle(&tx));
        assert_eq!(tx.borrow().state, SessionState::Closed);
    }

    #[tokio::test(start_paused = true)]
    #[traced_test]
    async fn failed_cycle_is_logged_and_swallowed() {
        let api = Arc::new(MockMessagingApi::new());
        api.push_fetch_error("connection refused").await;
        let session = ChatSession::open(
            identity("ayesha", "bilal", None),
            None,
            api.clone(),
            Arc::new(FixedInterval::default()),
        );

        let mut rx = session.subscribe();
        rx.wait_for(|s| s.cycles >= 1).await.unwrap();
        assert_eq!(session.state(), SessionState::Idle);
        assert!(logs_contain("poll cycle failed"));
        assert!(logs_contain("connection refused"));
    }
}
