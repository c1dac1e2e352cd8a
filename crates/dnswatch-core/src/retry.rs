//! Bounded-retry policy for provider reconciliation attempts.

use std::time::Duration;

/// Fixed-delay retry policy applied to one reconciliation pass.
///
/// `max_attempts` counts total attempts, not re-tries: a policy with
/// `max_attempts = 5` performs at most five provider round trips per tick,
/// sleeping `delay` between consecutive attempts. The policy is a plain
/// value so tests can construct it with a zero delay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts per reconciliation pass (at least 1)
    pub max_attempts: u32,
    /// Sleep between consecutive attempts
    pub delay: Duration,
}

impl RetryPolicy {
    /// Create a policy; `max_attempts` is clamped up to 1.
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }
}
