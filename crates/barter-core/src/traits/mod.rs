// SPDX-FileCopyrightText: 2026 Barter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator traits consumed by the messaging core.
//!
//! The core never talks to the network directly; it is handed an
//! implementation of [`MessagingApi`] (HTTP in production, a mock in tests)
//! and a [`TokenSource`] for bearer credentials.

pub mod auth;
pub mod messaging;

pub use auth::{StaticToken, TokenSource};
pub use messaging::MessagingApi;
