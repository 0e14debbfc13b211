// SPDX-FileCopyrightText: 2026 Barter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation identity: the synchronization key of a chat session.

use std::hash::{Hash, Hasher};

use crate::error::BarterError;
use crate::types::{ChatIntent, ItemId, UserHandle};

/// Identifies one conversation from the local user's point of view.
///
/// Two identities are the same conversation iff their `other` participant and
/// `item_id` match. The local user is implicit and does not take part in
/// equality or hashing. An absent item is distinct from every present item.
#[derive(Debug, Clone)]
pub struct ConversationIdentity {
    local: UserHandle,
    other: UserHandle,
    item_id: Option<ItemId>,
}

impl ConversationIdentity {
    /// Builds an identity, rejecting self-conversations and blank handles.
    ///
    /// An empty item id is treated as absent.
    pub fn new(
        local: UserHandle,
        other: UserHandle,
        item_id: Option<ItemId>,
    ) -> Result<Self, BarterError> {
        if local.as_str().trim().is_empty() || other.as_str().trim().is_empty() {
            return Err(BarterError::Validation(
                "conversation participants must not be blank".into(),
            ));
        }
        if local == other {
            return Err(BarterError::Validation(format!(
                "cannot open a conversation with yourself ({local})"
            )));
        }
        Ok(Self {
            local,
            other,
            item_id: item_id.filter(|id| !id.as_str().is_empty()),
        })
    }

    /// Builds the identity a handoff intent refers to.
    pub fn from_intent(local: UserHandle, intent: &ChatIntent) -> Result<Self, BarterError> {
        Self::new(local, intent.other_user.clone(), intent.item_id.clone())
    }

    pub fn local(&self) -> &UserHandle {
        &self.local
    }

    pub fn other(&self) -> &UserHandle {
        &self.other
    }

    pub fn item_id(&self) -> Option<&ItemId> {
        self.item_id.as_ref()
    }
}

impl PartialEq for ConversationIdentity {
    fn eq(&self, other: &Self) -> bool {
        self.other == other.other && self.item_id == other.item_id
    }
}

impl Eq for ConversationIdentity {}

impl Hash for ConversationIdentity {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.other.hash(state);
        self.item_id.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn identity(local: &str, other: &str, item: Option<&str>) -> ConversationIdentity {
        ConversationIdentity::new(local.into(), other.into(), item.map(ItemId::from)).unwrap()
    }

    #[test]
    fn same_other_and_item_are_equal() {
        assert_eq!(
            identity("ayesha", "bilal", Some("42")),
            identity("ayesha", "bilal", Some("42"))
        );
    }

    #[test]
    fn absent_item_differs_from_present_item() {
        assert_ne!(
            identity("ayesha", "bilal", None),
            identity("ayesha", "bilal", Some("42"))
        );
        assert_ne!(
            identity("ayesha", "bilal", Some("41")),
            identity("ayesha", "bilal", Some("42"))
        );
    }

    #[test]
    fn different_other_differs() {
        assert_ne!(
            identity("ayesha", "bilal", Some("42")),
            identity("ayesha", "zara", Some("42"))
        );
    }

    #[test]
    fn hash_agrees_with_equality() {
        let mut set = HashSet::new();
        set.insert(identity("ayesha", "bilal", Some("42")));
        set.insert(identity("ayesha", "bilal", Some("42")));
        set.insert(identity("ayesha", "bilal", None));
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn self_conversation_is_rejected() {
        let err = ConversationIdentity::new("ayesha".into(), "ayesha".into(), None).unwrap_err();
        assert!(matches!(err, BarterError::Validation(_)));
    }

    #[test]
    fn blank_participant_is_rejected() {
        assert!(ConversationIdentity::new("ayesha".into(), "  ".into(), None).is_err());
        assert!(ConversationIdentity::new("".into(), "bilal".into(), None).is_err());
    }

    #[test]
    fn empty_item_id_is_absent() {
        let id = identity("ayesha", "bilal", Some(""));
        assert!(id.item_id().is_none());
        assert_eq!(id, identity("ayesha", "bilal", None));
    }

    #[test]
    fn from_intent_copies_other_and_item() {
        let intent = ChatIntent::new("bilal").with_item(42u64, "Guitar Lessons");
        let id = ConversationIdentity::from_intent("ayesha".into(), &intent).unwrap();
        assert_eq!(id.local().as_str(), "ayesha");
        assert_eq!(id.other().as_str(), "bilal");
        assert_eq!(id.item_id().map(ItemId::as_str), Some("42"));
    }
}
