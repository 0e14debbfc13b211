// SPDX-FileCopyrightText: 2026 Barter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock messaging backend for deterministic testing.
//!
//! `MockMessagingApi` implements `MessagingApi` with scripted fetch and send
//! outcomes, captured requests, and gates that hold calls in flight so tests
//! can resolve them after a session has closed.

use std::collections::VecDeque;

use async_trait::async_trait;
use tokio::sync::{Mutex, watch};
use tokio::time::Instant;

use barter_core::{
    BarterError, ConversationIdentity, ConversationSummary, Message, MessagingApi,
    OutgoingMessage, UserHandle,
};

enum Scripted<T> {
    Ok(T),
    Fail(String),
}

impl<T> Scripted<T> {
    fn into_result(self) -> Result<T, BarterError> {
        match self {
            Scripted::Ok(value) => Ok(value),
            Scripted::Fail(message) => Err(BarterError::Transport {
                message,
                source: None,
            }),
        }
    }
}

/// A mock messaging backend.
///
/// Fetches pop from a FIFO script. When the script is empty the last
/// successfully returned timeline is served again (initially empty). Sends
/// pop from their own script; when it is empty the outgoing message is
/// echoed back as stored with a generated id.
pub struct MockMessagingApi {
    fetch_script: Mutex<VecDeque<Scripted<Vec<Message>>>>,
    last_timeline: Mutex<Vec<Message>>,
    fetches: Mutex<Vec<(Instant, ConversationIdentity)>>,
    fetch_count: watch::Sender<usize>,
    fetch_gate: watch::Sender<bool>,

    send_script: Mutex<VecDeque<Scripted<Message>>>,
    sent: Mutex<Vec<OutgoingMessage>>,
    send_count: watch::Sender<usize>,
    send_gate: watch::Sender<bool>,

    conversations: Mutex<Scripted<Vec<ConversationSummary>>>,
    conversation_loads: Mutex<Vec<UserHandle>>,
    mark_reads: Mutex<Vec<(UserHandle, UserHandle)>>,
}

impl MockMessagingApi {
    /// Create a mock with empty scripts and open gates.
    pub fn new() -> Self {
        Self {
            fetch_script: Mutex::new(VecDeque::new()),
            last_timeline: Mutex::new(Vec::new()),
            fetches: Mutex::new(Vec::new()),
            fetch_count: watch::channel(0).0,
            fetch_gate: watch::channel(true).0,
            send_script: Mutex::new(VecDeque::new()),
            sent: Mutex::new(Vec::new()),
            send_count: watch::channel(0).0,
            send_gate: watch::channel(true).0,
            conversations: Mutex::new(Scripted::Ok(Vec::new())),
            conversation_loads: Mutex::new(Vec::new()),
            mark_reads: Mutex::new(Vec::new()),
        }
    }

    /// Queue the timeline returned by the next unscripted fetch.
    pub async fn push_timeline(&self, timeline: Vec<Message>) {
        self.fetch_script.lock().await.push_back(Scripted::Ok(timeline));
    }

    /// Queue a transport failure for the next fetch.
    pub async fn push_fetch_error(&self, message: &str) {
        self.fetch_script
            .lock()
            .await
            .push_back(Scripted::Fail(message.to_string()));
    }

    /// Fetches issued from now on block until [`release_fetches`](Self::release_fetches).
    ///
    /// A held fetch is already counted; its script entry is taken on release.
    pub fn hold_fetches(&self) {
        self.fetch_gate.send_replace(false);
    }

    pub fn release_fetches(&self) {
        self.fetch_gate.send_replace(true);
    }

    /// Number of fetches issued so far, held ones included.
    pub fn fetch_calls(&self) -> usize {
        *self.fetch_count.borrow()
    }

    /// Waits until at least `n` fetches have been issued.
    pub async fn wait_for_fetch_calls(&self, n: usize) {
        let mut rx = self.fetch_count.subscribe();
        let _ = rx.wait_for(|count| *count >= n).await;
    }

    /// Instants at which each fetch was issued.
    pub async fn fetch_instants(&self) -> Vec<Instant> {
        self.fetches.lock().await.iter().map(|(at, _)| *at).collect()
    }

    /// Conversations each fetch asked for.
    pub async fn fetched_identities(&self) -> Vec<ConversationIdentity> {
        self.fetches.lock().await.iter().map(|(_, id)| id.clone()).collect()
    }

    /// Queue the stored message returned by the next send.
    pub async fn push_send_result(&self, message: Message) {
        self.send_script.lock().await.push_back(Scripted::Ok(message));
    }

    /// Queue a transport failure for the next send.
    pub async fn push_send_error(&self, message: &str) {
        self.send_script
            .lock()
            .await
            .push_back(Scripted::Fail(message.to_string()));
    }

    pub fn hold_sends(&self) {
        self.send_gate.send_replace(false);
    }

    pub fn release_sends(&self) {
        self.send_gate.send_replace(true);
    }

    pub fn send_calls(&self) -> usize {
        *self.send_count.borrow()
    }

    pub async fn wait_for_send_calls(&self, n: usize) {
        let mut rx = self.send_count.subscribe();
        let _ = rx.wait_for(|count| *count >= n).await;
    }

    /// Every message passed to `send_message`, in call order.
    pub async fn sent(&self) -> Vec<OutgoingMessage> {
        self.sent.lock().await.clone()
    }

    /// Replace the summaries returned by `list_conversations`.
    pub async fn set_conversations(&self, conversations: Vec<ConversationSummary>) {
        *self.conversations.lock().await = Scripted::Ok(conversations);
    }

    /// Make every `list_conversations` call fail until the next `set_conversations`.
    pub async fn fail_conversations(&self, message: &str) {
        *self.conversations.lock().await = Scripted::Fail(message.to_string());
    }

    /// Users each `list_conversations` call was made for.
    pub async fn conversation_loads(&self) -> Vec<UserHandle> {
        self.conversation_loads.lock().await.clone()
    }

    /// `(receiver, sender)` pairs passed to `mark_read`.
    pub async fn mark_reads(&self) -> Vec<(UserHandle, UserHandle)> {
        self.mark_reads.lock().await.clone()
    }
}

impl Default for MockMessagingApi {
    fn default() -> Self {
        Self::new()
    }
}

async fn pass_gate(gate: &watch::Sender<bool>) {
    let mut rx = gate.subscribe();
    let _ = rx.wait_for(|open| *open).await;
}

#[async_trait]
impl MessagingApi for MockMessagingApi {
    async fn fetch_timeline(
        &self,
        identity: &ConversationIdentity,
    ) -> Result<Vec<Message>, BarterError> {
        self.fetches
            .lock()
            .await
            .push((Instant::now(), identity.clone()));
        self.fetch_count.send_modify(|count| *count += 1);

        pass_gate(&self.fetch_gate).await;

        let next = self.fetch_script.lock().await.pop_front();
        match next {
            Some(Scripted::Ok(timeline)) => {
                *self.last_timeline.lock().await = timeline.clone();
                Ok(timeline)
            }
            Some(failure) => failure.into_result(),
            None => Ok(self.last_timeline.lock().await.clone()),
        }
    }

    async fn send_message(&self, message: &OutgoingMessage) -> Result<Message, BarterError> {
        let n = {
            let mut sent = self.sent.lock().await;
            sent.push(message.clone());
            sent.len()
        };
        self.send_count.send_modify(|count| *count += 1);

        pass_gate(&self.send_gate).await;

        match self.send_script.lock().await.pop_front() {
            Some(scripted) => scripted.into_result(),
            None => Ok(Message {
                id: Some(format!("mock-msg-{n}")),
                sender: message.sender.clone(),
                receiver: message.receiver.clone(),
                content: message.content.clone(),
                item_id: message.item_id.clone(),
                item_title: message.item_title.clone(),
                timestamp: chrono::Utc::now().naive_utc(),
                read: false,
            }),
        }
    }

    async fn list_conversations(
        &self,
        user: &UserHandle,
    ) -> Result<Vec<ConversationSummary>, BarterError> {
        self.conversation_loads.lock().await.push(user.clone());
        match &*self.conversations.lock().await {
            Scripted::Ok(list) => Ok(list.clone()),
            Scripted::Fail(message) => Err(BarterError::Transport {
                message: message.clone(),
                source: None,
            }),
        }
    }

    async fn mark_read(
        &self,
        receiver: &UserHandle,
        sender: &UserHandle,
    ) -> Result<(), BarterError> {
        self.mark_reads
            .lock()
            .await
            .push((receiver.clone(), sender.clone()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{identity, message};

    #[tokio::test]
    async fn fetch_pops_script_then_repeats_last_timeline() {
        let api = MockMessagingApi::new();
        let id = identity("ayesha", "bilal", Some("42"));
        let first = vec![message("bilal", "ayesha", "Yes!", Some("42"))];
        api.push_timeline(first.clone()).await;
        api.push_fetch_error("connection refused").await;

        assert_eq!(api.fetch_timeline(&id).await.unwrap(), first);
        assert!(api.fetch_timeline(&id).await.unwrap_err().is_transport());
        assert_eq!(api.fetch_timeline(&id).await.unwrap(), first);
        assert_eq!(api.fetch_calls(), 3);
        assert_eq!(api.fetched_identities().await, vec![id.clone(), id.clone(), id]);
    }

    #[tokio::test]
    async fn unscripted_send_echoes_with_generated_id() {
        let api = MockMessagingApi::new();
        let out = OutgoingMessage {
            sender: "ayesha".into(),
            receiver: "bilal".into(),
            content: "hello".into(),
            item_id: None,
            item_title: None,
        };

        let stored = api.send_message(&out).await.unwrap();
        assert_eq!(stored.id.as_deref(), Some("mock-msg-1"));
        assert_eq!(stored.content, "hello");
        assert_eq!(api.sent().await, vec![out]);
    }

    #[tokio::test]
    async fn held_fetch_is_counted_before_release() {
        let api = std::sync::Arc::new(MockMessagingApi::new());
        api.hold_fetches();

        let task = {
            let api = api.clone();
            tokio::spawn(async move {
                api.fetch_timeline(&identity("ayesha", "bilal", None)).await
            })
        };
        api.wait_for_fetch_calls(1).await;
        assert!(!task.is_finished());

        api.release_fetches();
        assert!(task.await.unwrap().unwrap().is_empty());
    }

    #[tokio::test]
    async fn conversations_can_fail_and_recover() {
        let api = MockMessagingApi::new();
        let user = UserHandle::from("ayesha");
        api.fail_conversations("503").await;
        assert!(api.list_conversations(&user).await.is_err());

        api.set_conversations(Vec::new()).await;
        assert!(api.list_conversations(&user).await.unwrap().is_empty());
        assert_eq!(api.conversation_loads().await.len(), 2);
    }
}
