// SPDX-FileCopyrightText: 2026 Barter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! REST implementation of [`MessagingApi`] for the campus exchange backend.
//!
//! Endpoints:
//! - `GET  /api/messages?user1=&user2=[&itemId=]`: conversation timeline
//! - `POST /api/messages`: store a message
//! - `GET  /api/messages/conversations?username=`: conversation list
//! - `PUT  /api/messages/mark-read?receiver=&sender=`: mark a thread read

pub mod client;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use barter_config::BarterConfig;
use barter_core::{
    BarterError, ConversationIdentity, ConversationSummary, Message, MessagingApi,
    OutgoingMessage, StaticToken, TokenSource, UserHandle,
};
use tracing::{debug, info};

pub use crate::client::RestClient;

const MESSAGES_PATH: &str = "/api/messages";
const CONVERSATIONS_PATH: &str = "/api/messages/conversations";
const MARK_READ_PATH: &str = "/api/messages/mark-read";

/// [`MessagingApi`] backed by the REST backend.
#[derive(Debug, Clone)]
pub struct HttpMessagingApi {
    client: RestClient,
}

impl HttpMessagingApi {
    pub fn new(client: RestClient) -> Self {
        Self { client }
    }

    /// Builds the backend client from configuration, with the configured
    /// bearer token (if any) as the token source.
    pub fn from_config(config: &BarterConfig) -> Result<Self, BarterError> {
        let tokens: Arc<dyn TokenSource> = Arc::new(StaticToken::new(config.auth.token.clone()));
        Self::from_config_with_tokens(config, tokens)
    }

    /// Builds the backend client from configuration with an explicit token source.
    pub fn from_config_with_tokens(
        config: &BarterConfig,
        tokens: Arc<dyn TokenSource>,
    ) -> Result<Self, BarterError> {
        let timeout = config.api.request_timeout_secs.map(Duration::from_secs);
        let client = RestClient::new(&config.api.base_url, timeout, tokens)?;
        info!(base_url = client.base_url(), "messaging backend client initialized");
        Ok(Self::new(client))
    }
}

#[async_trait]
impl MessagingApi for HttpMessagingApi {
    async fn fetch_timeline(
        &self,
        identity: &ConversationIdentity,
    ) -> Result<Vec<Message>, BarterError> {
        let mut query = vec![
            ("user1", identity.local().as_str()),
            ("user2", identity.other().as_str()),
        ];
        if let Some(item) = identity.item_id() {
            query.push(("itemId", item.as_str()));
        }
        let timeline: Vec<Message> = self.client.get_json(MESSAGES_PATH, &query).await?;
        debug!(
            other = %identity.other(),
            count = timeline.len(),
            "timeline fetched"
        );
        Ok(timeline)
    }

    async fn send_message(&self, message: &OutgoingMessage) -> Result<Message, BarterError> {
        self.client.post_json(MESSAGES_PATH, message).await
    }

    async fn list_conversations(
        &self,
        user: &UserHandle,
    ) -> Result<Vec<ConversationSummary>, BarterError> {
        self.client
            .get_json(CONVERSATIONS_PATH, &[("username", user.as_str())])
            .await
    }

    async fn mark_read(
        &self,
        receiver: &UserHandle,
        sender: &UserHandle,
    ) -> Result<(), BarterError> {
        self.client
            .put(
                MARK_READ_PATH,
                &[("receiver", receiver.as_str()), ("sender", sender.as_str())],
            )
            .await
    }
}
