// SPDX-FileCopyrightText: 2026 Barter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Barter messaging tests.
//!
//! - [`MockMessagingApi`] - scripted backend with captured requests and
//!   gates for holding calls in flight
//! - [`fixtures`] - builders for messages, identities, and summaries

pub mod fixtures;
pub mod mock_api;

pub use mock_api::MockMessagingApi;
