// SPDX-FileCopyrightText: 2026 Barter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The local user's list of conversations.

use std::sync::Arc;

use barter_core::{ConversationSummary, MessagingApi, UserHandle};
use strum::Display;
use tracing::{debug, warn};

/// Whether the last load reached the backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum IndexStatus {
    #[default]
    Ready,
    /// The load failed; the list is empty and should be shown as unavailable.
    Unavailable,
}

/// Result of one index load.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConversationList {
    pub conversations: Vec<ConversationSummary>,
    pub status: IndexStatus,
}

impl ConversationList {
    pub fn is_unavailable(&self) -> bool {
        self.status == IndexStatus::Unavailable
    }
}

/// Rebuilds the conversation list from the backend on every load.
///
/// The last result is kept only so the view can redraw it; it is never
/// served in place of a fetch.
pub struct ConversationIndex {
    api: Arc<dyn MessagingApi>,
    current: ConversationList,
}

impl ConversationIndex {
    pub fn new(api: Arc<dyn MessagingApi>) -> Self {
        Self {
            api,
            current: ConversationList::default(),
        }
    }

    /// Fetches the summaries for `user`, in server order.
    ///
    /// A failed fetch yields an empty, unavailable list rather than an error.
    pub async fn load(&mut self, user: &UserHandle) -> &ConversationList {
        self.current = match self.api.list_conversations(user).await {
            Ok(conversations) => {
                debug!(user = %user, count = conversations.len(), "conversation index loaded");
                ConversationList {
                    conversations,
                    status: IndexStatus::Ready,
                }
            }
            Err(e) => {
                warn!(user = %user, error = %e, "conversations unavailable");
                ConversationList {
                    conversations: Vec::new(),
                    status: IndexStatus::Unavailable,
                }
            }
        };
        &self.current
    }

    /// The result of the most recent load.
    pub fn current(&self) -> &ConversationList {
        &self.current
    }
}

impl std::fmt::Debug for ConversationIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConversationIndex")
            .field("current", &self.current)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use barter_test_utils::MockMessagingApi;
    use barter_test_utils::fixtures::summary;
    use tracing_test::traced_test;

    use super::*;

    #[tokio::test]
    async fn load_keeps_server_order() {
        let api = Arc::new(MockMessagingApi::new());
        let listed = vec![
            summary("zara", None, 0),
            summary("bilal", Some(("42", "Guitar Lessons")), 3),
        ];
        api.set_conversations(listed.clone()).await;

        let mut index = ConversationIndex::new(api.clone());
        let list = index.load(&"ayesha".into()).await;
        assert_eq!(list.conversations, listed);
        assert_eq!(list.status, IndexStatus::Ready);
    }

    #[tokio::test]
    async fn every_load_fetches_again() {
        let api = Arc::new(MockMessagingApi::new());
        let mut index = ConversationIndex::new(api.clone());
        let user = UserHandle::from("ayesha");

        index.load(&user).await;
        api.set_conversations(vec![summary("zara", None, 1)]).await;
        index.load(&user).await;

        assert_eq!(api.conversation_loads().await, vec![user.clone(), user]);
        assert_eq!(index.current().conversations.len(), 1);
    }

    #[tokio::test]
    #[traced_test]
    async fn failed_load_is_empty_and_unavailable() {
        let api = Arc::new(MockMessagingApi::new());
        api.set_conversations(vec![summary("zara", None, 1)]).await;
        let mut index = ConversationIndex::new(api.clone());
        let user = UserHandle::from("ayesha");
        index.load(&user).await;

        api.fail_conversations("502 Bad Gateway").await;
        let list = index.load(&user).await;
        assert!(list.conversations.is_empty());
        assert!(list.is_unavailable());
        assert!(logs_contain("conversations unavailable"));
    }
}
