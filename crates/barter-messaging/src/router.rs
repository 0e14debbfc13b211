// SPDX-FileCopyrightText: 2026 Barter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Single-slot handoff of "open this chat" requests between views.
//!
//! Any view (listing detail, profile) publishes a [`ChatIntent`]; the
//! messaging view consumes it once when it activates. Publishing overwrites
//! an unread intent. The router is cheap to clone and every clone shares the
//! same slot, so both sides are handed the same instance explicitly.

use std::sync::{Arc, Mutex, PoisonError};

use barter_core::{BarterError, ChatIntent};
use strum::Display;
use tokio::sync::watch;
use tracing::{debug, info};

/// Top-level screens the host application can show.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display)]
#[strum(serialize_all = "snake_case")]
pub enum ActiveView {
    #[default]
    Home,
    Profile,
    Messages,
}

#[derive(Clone)]
pub struct ChatRouter {
    slot: Arc<Mutex<Option<ChatIntent>>>,
    view: Arc<watch::Sender<ActiveView>>,
}

impl ChatRouter {
    pub fn new() -> Self {
        let (view, _rx) = watch::channel(ActiveView::default());
        Self {
            slot: Arc::new(Mutex::new(None)),
            view: Arc::new(view),
        }
    }

    /// Stores `intent` in the slot and switches to the messaging view.
    pub fn publish(&self, intent: ChatIntent) {
        let replaced = self
            .slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(intent.clone());
        if let Some(old) = replaced {
            debug!(other = %old.other_user, "overwriting unconsumed chat intent");
        }
        info!(
            other = %intent.other_user,
            item_id = intent.item_id.as_ref().map(|i| i.as_str()),
            "chat intent published"
        );
        self.navigate(ActiveView::Messages);
    }

    /// Decodes a JSON handoff payload and publishes it.
    pub fn publish_json(&self, payload: &str) -> Result<(), BarterError> {
        let intent = ChatIntent::from_json(payload)?;
        self.publish(intent);
        Ok(())
    }

    /// Takes the pending intent, leaving the slot empty.
    pub fn consume(&self) -> Option<ChatIntent> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    pub fn active_view(&self) -> ActiveView {
        *self.view.borrow()
    }

    pub fn watch_view(&self) -> watch::Receiver<ActiveView> {
        self.view.subscribe()
    }

    pub fn navigate(&self, to: ActiveView) {
        self.view.send_if_modified(|current| {
            if *current == to {
                return false;
            }
            debug!(from = %current, to = %to, "switching view");
            *current = to;
            true
        });
    }
}

impl Default for ChatRouter {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ChatRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatRouter")
            .field("active_view", &self.active_view())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guitar_lessons() -> ChatIntent {
        ChatIntent::new("bilal").with_item(42u64, "Guitar Lessons")
    }

    #[test]
    fn consume_returns_published_intent_once() {
        let router = ChatRouter::new();
        router.publish(guitar_lessons());

        assert_eq!(router.consume(), Some(guitar_lessons()));
        assert_eq!(router.consume(), None);
    }

    #[test]
    fn consume_on_empty_slot_is_none() {
        assert_eq!(ChatRouter::new().consume(), None);
    }

    #[test]
    fn latest_publish_wins() {
        let router = ChatRouter::new();
        router.publish(ChatIntent::new("zara"));
        router.publish(guitar_lessons());

        assert_eq!(router.consume(), Some(guitar_lessons()));
        assert_eq!(router.consume(), None);
    }

    #[test]
    fn clones_share_the_slot() {
        let listing_view = ChatRouter::new();
        let messaging_view = listing_view.clone();
        listing_view.publish(guitar_lessons());

        assert_eq!(messaging_view.consume(), Some(guitar_lessons()));
        assert_eq!(listing_view.consume(), None);
    }

    #[test]
    fn publish_switches_to_messages() {
        let router = ChatRouter::new();
        let rx = router.watch_view();
        assert_eq!(router.active_view(), ActiveView::Home);

        router.publish(guitar_lessons());
        assert_eq!(router.active_view(), ActiveView::Messages);
        assert!(rx.has_changed().unwrap());
    }

    #[test]
    fn navigate_to_same_view_does_not_notify() {
        let router = ChatRouter::new();
        let mut rx = router.watch_view();
        router.navigate(ActiveView::Profile);
        rx.borrow_and_update();

        router.navigate(ActiveView::Profile);
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn publish_json_accepts_numeric_item_id() {
        let router = ChatRouter::new();
        router
            .publish_json(r#"{"otherUser":"bilal","itemId":42,"itemTitle":"Guitar Lessons"}"#)
            .unwrap();
        assert_eq!(router.consume(), Some(guitar_lessons()));
    }

    #[test]
    fn publish_json_rejects_garbage_without_touching_slot() {
        let router = ChatRouter::new();
        router.publish(ChatIntent::new("zara"));

        let err = router.publish_json("not json").unwrap_err();
        assert!(matches!(err, BarterError::Decode { .. }));
        assert_eq!(router.consume(), Some(ChatIntent::new("zara")));
    }
}
