// SPDX-FileCopyrightText: 2026 Barter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common value types exchanged with the messaging backend.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::BarterError;

/// Display title used for conversations that are not about a listed item.
///
/// Never sent to the backend as an item title.
pub const DIRECT_MESSAGE_TITLE: &str = "Direct Message";

/// Opaque username identifying a principal. Trusted as issued by the auth backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserHandle(pub String);

impl UserHandle {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserHandle {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for UserHandle {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// Identifier of a listed item.
///
/// The backend stores ids as strings but older payloads carry bare numbers,
/// so both shapes are accepted on the wire. Always serialized as a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ItemId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<u64> for ItemId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

impl<'de> Deserialize<'de> for ItemId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Unsigned(u64),
            Signed(i64),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(s) => ItemId(s),
            Raw::Unsigned(n) => ItemId(n.to_string()),
            Raw::Signed(n) => ItemId(n.to_string()),
        })
    }
}

fn deserialize_message_id<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    Ok(Option::<ItemId>::deserialize(d)?.map(|id| id.0))
}

/// A stored chat message as returned by the backend. Never mutated after decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    /// Server-assigned identifier, absent on very old records. Numeric ids
    /// are kept in their decimal form.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_message_id"
    )]
    pub id: Option<String>,
    pub sender: UserHandle,
    pub receiver: UserHandle,
    pub content: String,
    #[serde(default)]
    pub item_id: Option<ItemId>,
    #[serde(default)]
    pub item_title: Option<String>,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub timestamp: NaiveDateTime,
    #[serde(default)]
    pub read: bool,
}

/// Body of a send request. The backend fills in id, timestamp and read flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutgoingMessage {
    pub sender: UserHandle,
    pub receiver: UserHandle,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_id: Option<ItemId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_title: Option<String>,
}

/// Backend-computed summary of one conversation for the conversation list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationSummary {
    pub other_user: UserHandle,
    #[serde(default)]
    pub item_id: Option<ItemId>,
    #[serde(default)]
    pub item_title: Option<String>,
    #[serde(default)]
    pub last_message: Option<String>,
    #[serde(default)]
    pub unread_count: u64,
    #[serde(default, deserialize_with = "timestamp::deserialize_option")]
    pub timestamp: Option<NaiveDateTime>,
}

impl ConversationSummary {
    /// Builds the intent that opens this conversation.
    pub fn to_intent(&self) -> ChatIntent {
        ChatIntent {
            other_user: self.other_user.clone(),
            item_id: self.item_id.clone(),
            item_title: Some(
                self.item_title
                    .clone()
                    .unwrap_or_else(|| DIRECT_MESSAGE_TITLE.to_string()),
            ),
        }
    }
}

/// A one-shot request to open a specific conversation.
///
/// Encoded as JSON when it crosses the handoff slot, e.g.
/// `{"otherUser":"bilal","itemId":"42","itemTitle":"Guitar Lessons"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatIntent {
    pub other_user: UserHandle,
    #[serde(default)]
    pub item_id: Option<ItemId>,
    #[serde(default)]
    pub item_title: Option<String>,
}

impl ChatIntent {
    pub fn new(other_user: impl Into<UserHandle>) -> Self {
        Self {
            other_user: other_user.into(),
            item_id: None,
            item_title: None,
        }
    }

    pub fn with_item(mut self, item_id: impl Into<ItemId>, title: impl Into<String>) -> Self {
        self.item_id = Some(item_id.into());
        self.item_title = Some(title.into());
        self
    }

    /// Decodes the JSON handoff payload.
    pub fn from_json(payload: &str) -> Result<Self, BarterError> {
        serde_json::from_str(payload).map_err(|e| BarterError::Decode {
            message: format!("invalid chat intent payload: {e}"),
            source: Some(Box::new(e)),
        })
    }

    /// Encodes the intent as the JSON handoff payload.
    pub fn to_json(&self) -> Result<String, BarterError> {
        serde_json::to_string(self)
            .map_err(|e| BarterError::Internal(format!("failed to encode chat intent: {e}")))
    }

    /// Title shown in the chat header.
    pub fn display_title(&self) -> &str {
        self.item_title.as_deref().unwrap_or(DIRECT_MESSAGE_TITLE)
    }
}

/// Maps a display title to the title sent to the backend.
///
/// The direct-message placeholder is a UI label, not an item title.
pub fn wire_item_title(title: Option<&str>) -> Option<String> {
    match title {
        Some(t) if t != DIRECT_MESSAGE_TITLE && !t.trim().is_empty() => Some(t.to_string()),
        _ => None,
    }
}

/// Lenient timestamp decoding.
///
/// The backend emits zone-less local date-times; proxies in front of it have
/// been seen rewriting them as RFC 3339 with an offset, which is normalized to UTC.
mod timestamp {
    use chrono::{DateTime, NaiveDateTime};
    use serde::{Deserialize, Deserializer};

    pub fn parse(raw: &str) -> Option<NaiveDateTime> {
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.naive_utc()))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(d)?;
        parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("unrecognized timestamp `{raw}`")))
    }

    pub fn deserialize_option<'de, D: Deserializer<'de>>(
        d: D,
    ) -> Result<Option<NaiveDateTime>, D::Error> {
        match Option::<String>::deserialize(d)? {
            None => Ok(None),
            Some(raw) => parse(&raw).map(Some).ok_or_else(|| {
                serde::de::Error::custom(format!("unrecognized timestamp `{raw}`"))
            }),
        }
    }
}
