// SPDX-FileCopyrightText: 2026 Barter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs.
//!
//! All structs use `#[serde(deny_unknown_fields)]` so a typo in `barter.toml`
//! fails at startup instead of silently falling back to a default.

use serde::{Deserialize, Serialize};

/// Top-level configuration. Every section is optional.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct BarterConfig {
    /// Messaging backend location and transport settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// Conversation polling settings.
    #[serde(default)]
    pub sync: SyncConfig,

    /// Credentials handed over by the auth backend.
    #[serde(default)]
    pub auth: AuthConfig,

    /// Log output settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Messaging backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ApiConfig {
    /// Origin of the REST backend; `/api/messages` paths are appended to it.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Hard per-request timeout. Unset means requests may stall indefinitely,
    /// which only delays the affected poll cycle.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: None,
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

/// Which retry schedule drives a chat session's poll loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PollPolicyKind {
    /// Same interval after every cycle, successful or not.
    #[default]
    Fixed,
    /// Doubles the interval after each consecutive failed cycle.
    Backoff,
}

/// Conversation polling configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SyncConfig {
    /// Delay between the end of one poll cycle and the start of the next.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Retry schedule after failed cycles.
    #[serde(default)]
    pub policy: PollPolicyKind,

    /// Upper bound on the delay when `policy = "backoff"`.
    #[serde(default = "default_backoff_max_ms")]
    pub backoff_max_ms: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            policy: PollPolicyKind::default(),
            backoff_max_ms: default_backoff_max_ms(),
        }
    }
}

fn default_poll_interval_ms() -> u64 {
    3000
}

fn default_backoff_max_ms() -> u64 {
    30_000
}

/// Auth configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AuthConfig {
    /// Bearer token for the messaging backend. `None` sends unauthenticated requests.
    #[serde(default)]
    pub token: Option<String>,

    /// Username of the logged-in user, used when the CLI gets no `--user`.
    #[serde(default)]
    pub username: Option<String>,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Level for the `barter` crates (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
