// SPDX-FileCopyrightText: 2026 Barter Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Poll scheduling strategies for chat sessions.
//!
//! The session loop asks its policy for the delay before the next cycle
//! after every cycle settles. The default, [`FixedInterval`], ignores
//! failures entirely: a dead backend is retried at the same cadence forever.

use std::sync::Arc;
use std::time::Duration;

use barter_config::PollPolicyKind;
use barter_config::model::SyncConfig;

/// Default delay between the end of one poll cycle and the start of the next.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(3000);

/// Decides how long a session idles between poll cycles.
pub trait PollPolicy: Send + Sync + 'static {
    /// Delay before the next cycle. `consecutive_failures` is 0 after a
    /// successful cycle.
    fn next_delay(&self, consecutive_failures: u32) -> Duration;
}

/// Same delay after every cycle, successful or not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedInterval(pub Duration);

impl Default for FixedInterval {
    fn default() -> Self {
        Self(DEFAULT_POLL_INTERVAL)
    }
}

impl PollPolicy for FixedInterval {
    fn next_delay(&self, _consecutive_failures: u32) -> Duration {
        self.0
    }
}

/// Doubles the delay per consecutive failure, capped at `max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExponentialBackoff {
    pub base: Duration,
    pub max: Duration,
}

impl PollPolicy for ExponentialBackoff {
    fn next_delay(&self, consecutive_failures: u32) -> Duration {
        let factor = 1u32.checked_shl(consecutive_failures.min(16)).unwrap_or(u32::MAX);
        self.base.saturating_mul(factor).min(self.max)
    }
}

/// Builds the policy selected in `[sync]`.
pub fn policy_from_config(config: &SyncConfig) -> Arc<dyn PollPolicy> {
    let base = Duration::from_millis(config.poll_interval_ms);
    match config.policy {
        PollPolicyKind::Fixed => Arc::new(FixedInterval(base)),
        PollPolicyKind::Backoff => Arc::new(ExponentialBackoff {
            base,
            max: Duration::from_millis(config.backoff_max_ms).max(base),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_interval_ignores_failures() {
        let policy = FixedInterval::default();
        assert_eq!(policy.next_delay(0), Duration::from_millis(3000));
        assert_eq!(policy.next_delay(1), Duration::from_millis(3000));
        assert_eq!(policy.next_delay(10_000), Duration::from_millis(3000));
    }

    #[test]
    fn backoff_doubles_and_caps() {
        let policy = ExponentialBackoff {
            base: Duration::from_secs(3),
            max: Duration::from_secs(20),
        };
        assert_eq!(policy.next_delay(0), Duration::from_secs(3));
        assert_eq!(policy.next_delay(1), Duration::from_secs(6));
        assert_eq!(policy.next_delay(2), Duration::from_secs(12));
        assert_eq!(policy.next_delay(3), Duration::from_secs(20));
        assert_eq!(policy.next_delay(u32::MAX), Duration::from_secs(20));
    }

    #[test]
    fn config_default_is_fixed_three_seconds() {
        let policy = policy_from_config(&SyncConfig::default());
        assert_eq!(policy.next_delay(0), DEFAULT_POLL_INTERVAL);
        assert_eq!(policy.next_delay(5), DEFAULT_POLL_INTERVAL);
    }

    #[test]
    fn config_backoff_policy() {
        let config = SyncConfig {
            poll_interval_ms: 1000,
            policy: PollPolicyKind::Backoff,
            backoff_max_ms: 4000,
        };
        let policy = policy_from_config(&config);
        assert_eq!(policy.next_delay(0), Duration::from_secs(1));
        assert_eq!(policy.next_delay(4), Duration::from_secs(4));
    }
}
