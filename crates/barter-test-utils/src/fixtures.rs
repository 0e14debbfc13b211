// SPDX-FileCopyrightText: 2026 Barter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Builders for the value types tests keep constructing.

use chrono::{NaiveDate, NaiveDateTime};

use barter_core::{ConversationIdentity, ConversationSummary, ItemId, Message};

/// Fixed timestamp so fixtures compare equal across runs.
pub fn fixed_timestamp() -> NaiveDateTime {
    timestamp_at(10, 30)
}

/// A time of day on the fixture date.
pub fn timestamp_at(hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 3, 14)
        .and_then(|d| d.and_hms_opt(hour, minute, 0))
        .unwrap_or_default()
}

/// A stored message between two users.
pub fn message(sender: &str, receiver: &str, content: &str, item_id: Option<&str>) -> Message {
    Message {
        id: None,
        sender: sender.into(),
        receiver: receiver.into(),
        content: content.to_string(),
        item_id: item_id.map(ItemId::from),
        item_title: None,
        timestamp: fixed_timestamp(),
        read: false,
    }
}

/// Identity of the conversation `local` has with `other`.
///
/// Panics on an invalid pair; fixtures are expected to be valid.
pub fn identity(local: &str, other: &str, item_id: Option<&str>) -> ConversationIdentity {
    ConversationIdentity::new(local.into(), other.into(), item_id.map(ItemId::from))
        .expect("fixture identity should be valid")
}

pub fn summary(other: &str, item: Option<(&str, &str)>, unread: u64) -> ConversationSummary {
    ConversationSummary {
        other_user: other.into(),
        item_id: item.map(|(id, _)| ItemId::from(id)),
        item_title: item.map(|(_, title)| title.to_string()),
        last_message: None,
        unread_count: unread,
        timestamp: None,
    }
}
