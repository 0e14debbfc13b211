// SPDX-FileCopyrightText: 2026 Barter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Barter messaging core.

use thiserror::Error;

/// The primary error type used across the collaborator traits and core operations.
#[derive(Debug, Error)]
pub enum BarterError {
    /// Configuration errors (invalid base URL, bad header values).
    #[error("configuration error: {0}")]
    Config(String),

    /// The request never produced a response (connection refused, DNS, reset).
    #[error("transport error: {message}")]
    Transport {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The backend answered with a non-success status.
    #[error("backend returned {status}: {body}")]
    Http { status: u16, body: String },

    /// The backend answered 2xx but the payload did not have the expected shape.
    #[error("malformed payload: {message}")]
    Decode {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Input rejected before any network call.
    #[error("validation error: {0}")]
    Validation(String),

    /// A fetch or send resolved after its session was closed.
    #[error("session closed before the operation resolved")]
    StaleSession,

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl BarterError {
    /// Returns true for the transport family: unreachable backend, non-2xx
    /// status, or malformed payload.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            BarterError::Transport { .. } | BarterError::Http { .. } | BarterError::Decode { .. }
        )
    }
}
