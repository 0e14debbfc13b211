// SPDX-FileCopyrightText: 2026 Barter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for semantic constraints serde cannot express.

use crate::diagnostic::ConfigError;
use crate::model::{BarterConfig, PollPolicyKind};

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validates a deserialized configuration, collecting every failure.
pub fn validate_config(config: &BarterConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    match reqwest::Url::parse(config.api.base_url.trim()) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        Ok(url) => errors.push(ConfigError::validation(format!(
            "api.base_url must use http or https, got `{}`",
            url.scheme()
        ))),
        Err(e) => errors.push(ConfigError::validation(format!(
            "api.base_url `{}` is not a valid URL: {e}",
            config.api.base_url
        ))),
    }

    if config.api.request_timeout_secs == Some(0) {
        errors.push(ConfigError::validation(
            "api.request_timeout_secs must be positive when set",
        ));
    }

    if config.sync.poll_interval_ms == 0 {
        errors.push(ConfigError::validation(
            "sync.poll_interval_ms must be positive",
        ));
    }

    if config.sync.policy == PollPolicyKind::Backoff
        && config.sync.backoff_max_ms < config.sync.poll_interval_ms
    {
        errors.push(ConfigError::validation(format!(
            "sync.backoff_max_ms ({}) must not be below sync.poll_interval_ms ({})",
            config.sync.backoff_max_ms, config.sync.poll_interval_ms
        )));
    }

    if let Some(username) = &config.auth.username
        && username.trim().is_empty()
    {
        errors.push(ConfigError::validation("auth.username must not be blank"));
    }

    let level = config.logging.level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ConfigError::validation(format!(
            "logging.level `{}` is not one of {}",
            config.logging.level,
            LOG_LEVELS.join(", ")
        )));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
