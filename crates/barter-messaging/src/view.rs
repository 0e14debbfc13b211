// SPDX-FileCopyrightText: 2026 Barter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The messaging view: conversation index plus at most one open session.

use std::sync::Arc;

use barter_core::{
    BarterError, ChatIntent, ConversationIdentity, ConversationSummary, MessagingApi, UserHandle,
};
use tracing::{debug, info};

use crate::index::{ConversationIndex, ConversationList};
use crate::policy::PollPolicy;
use crate::router::ChatRouter;
use crate::session::ChatSession;

/// Owns the index and the active [`ChatSession`] for one local user.
///
/// Opening a conversation always closes the previous session first, so no
/// two sessions poll at the same time.
pub struct MessagingView {
    user: UserHandle,
    api: Arc<dyn MessagingApi>,
    router: ChatRouter,
    policy: Arc<dyn PollPolicy>,
    index: ConversationIndex,
    session: Option<ChatSession>,
}

impl MessagingView {
    pub fn new(
        user: UserHandle,
        api: Arc<dyn MessagingApi>,
        router: ChatRouter,
        policy: Arc<dyn PollPolicy>,
    ) -> Self {
        Self {
            index: ConversationIndex::new(api.clone()),
            user,
            api,
            router,
            policy,
            session: None,
        }
    }

    pub fn user(&self) -> &UserHandle {
        &self.user
    }

    pub fn router(&self) -> &ChatRouter {
        &self.router
    }

    /// Called when the view gains focus.
    ///
    /// Reloads the index, then opens the conversation named by a pending
    /// handoff intent, if any. The intent is consumed exactly once.
    pub async fn activate(&mut self) -> Result<Option<&ChatSession>, BarterError> {
        self.index.load(&self.user).await;
        match self.router.consume() {
            Some(intent) => {
                debug!(other = %intent.other_user, "consumed chat intent");
                self.open(intent).map(Some)
            }
            None => Ok(self.session.as_ref()),
        }
    }

    /// Opens the conversation `intent` refers to, closing any current one.
    pub fn open(&mut self, intent: ChatIntent) -> Result<&ChatSession, BarterError> {
        let identity = ConversationIdentity::from_intent(self.user.clone(), &intent)?;
        self.close_session();

        let title = intent.display_title().to_string();
        let session = ChatSession::open(identity, Some(title), self.api.clone(), self.policy.clone());
        Ok(&*self.session.insert(session))
    }

    /// Opens a conversation picked from the index.
    pub fn open_summary(
        &mut self,
        summary: &ConversationSummary,
    ) -> Result<&ChatSession, BarterError> {
        self.open(summary.to_intent())
    }

    /// Opens an item-less conversation with `recipient`.
    pub fn start_direct_chat(&mut self, recipient: &str) -> Result<&ChatSession, BarterError> {
        let recipient = recipient.trim();
        if recipient.is_empty() {
            return Err(BarterError::Validation("recipient must not be empty".into()));
        }
        if recipient == self.user.as_str() {
            return Err(BarterError::Validation(
                "cannot start a chat with yourself".into(),
            ));
        }
        self.open(ChatIntent::new(recipient))
    }

    /// Closes the open session and rebuilds the index.
    pub async fn leave(&mut self) -> &ConversationList {
        self.close_session();
        self.index.load(&self.user).await
    }

    pub fn session(&self) -> Option<&ChatSession> {
        self.session.as_ref()
    }

    pub fn conversations(&self) -> &ConversationList {
        self.index.current()
    }

    /// Reloads the index without touching the open session.
    pub async fn refresh_conversations(&mut self) -> &ConversationList {
        self.index.load(&self.user).await
    }

    fn close_session(&mut self) {
        if let Some(session) = self.session.take() {
            info!(other = %session.identity().other(), "leaving conversation");
            session.close();
        }
    }
}

impl std::fmt::Debug for MessagingView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MessagingView")
            .field("user", &self.user)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}
