// SPDX-FileCopyrightText: 2026 Barter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Messaging backend trait.

use async_trait::async_trait;

use crate::error::BarterError;
use crate::identity::ConversationIdentity;
use crate::types::{ConversationSummary, Message, OutgoingMessage, UserHandle};

/// The REST messaging backend, as seen by the synchronization core.
///
/// Implementations report every failure as a [`BarterError`]; deciding
/// whether a failure is fatal is the caller's job.
#[async_trait]
pub trait MessagingApi: Send + Sync + 'static {
    /// Fetches the full timeline of a conversation, in server order.
    async fn fetch_timeline(
        &self,
        identity: &ConversationIdentity,
    ) -> Result<Vec<Message>, BarterError>;

    /// Stores a message and returns the canonical record.
    async fn send_message(&self, message: &OutgoingMessage) -> Result<Message, BarterError>;

    /// Lists conversation summaries for a user, in server order.
    async fn list_conversations(
        &self,
        user: &UserHandle,
    ) -> Result<Vec<ConversationSummary>, BarterError>;

    /// Marks every message from `sender` to `receiver` as read.
    async fn mark_read(&self, receiver: &UserHandle, sender: &UserHandle)
    -> Result<(), BarterError>;
}
