// SPDX-FileCopyrightText: 2026 Barter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Barter messaging core.
//!
//! This crate provides the value types shared by every other crate in the
//! workspace (users, items, messages, conversation identities, handoff
//! intents), the common error type, and the collaborator traits the
//! messaging core consumes but does not implement.

pub mod error;
pub mod identity;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::BarterError;
pub use identity::ConversationIdentity;
pub use types::{
    ChatIntent, ConversationSummary, DIRECT_MESSAGE_TITLE, ItemId, Message, OutgoingMessage,
    UserHandle,
};

pub use traits::{MessagingApi, StaticToken, TokenSource};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn barter_error_has_all_variants() {
        let _config = BarterError::Config("test".into());
        let _transport = BarterError::Transport {
            message: "test".into(),
            source: Some(Box::new(std::io::Error::other("test"))),
        };
        let _http = BarterError::Http {
            status: 503,
            body: "unavailable".into(),
        };
        let _decode = BarterError::Decode {
            message: "test".into(),
            source: None,
        };
        let _validation = BarterError::Validation("test".into());
        let _stale = BarterError::StaleSession;
        let _internal = BarterError::Internal("test".into());
    }

    #[test]
    fn transport_family_classification() {
        assert!(
            BarterError::Transport {
                message: "refused".into(),
                source: None
            }
            .is_transport()
        );
        assert!(
            BarterError::Http {
                status: 500,
                body: String::new()
            }
            .is_transport()
        );
        assert!(
            BarterError::Decode {
                message: "bad json".into(),
                source: None
            }
            .is_transport()
        );
        assert!(!BarterError::Validation("empty".into()).is_transport());
        assert!(!BarterError::StaleSession.is_transport());
    }

    #[test]
    fn all_traits_are_exported() {
        fn _assert_messaging_api<T: MessagingApi>() {}
        fn _assert_token_source<T: TokenSource>() {}
    }
}
