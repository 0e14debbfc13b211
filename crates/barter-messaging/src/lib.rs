// SPDX-FileCopyrightText: 2026 Barter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation synchronization for the Barter campus exchange.
//!
//! - [`ChatSession`] keeps one conversation's timeline in sync by polling.
//! - [`ConversationIndex`] lists the local user's conversations.
//! - [`ChatRouter`] hands "open this chat" requests from other views to the
//!   [`MessagingView`], which owns at most one session at a time.

pub mod index;
pub mod policy;
pub mod router;
pub mod session;
pub mod view;

pub use index::{ConversationIndex, ConversationList, IndexStatus};
pub use policy::{
    DEFAULT_POLL_INTERVAL, ExponentialBackoff, FixedInterval, PollPolicy, policy_from_config,
};
pub use router::{ActiveView, ChatRouter};
pub use session::{ChatSession, SendOutcome, SessionSnapshot, SessionState};
pub use view::MessagingView;
