//! Retry policy for transient page-fetch failures.

use std::time::Duration;

/// Configuration for automatic retry of transient failures.
///
/// `max_attempts` counts every call, including the first, so the default of
/// 4 allows three retries. The delay doubles after each failed attempt and is
/// capped at `max_delay`.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use openaire_lib::RetryConfig;
///
/// // Default configuration
/// let config = RetryConfig::default();
///
/// // Custom configuration
/// let custom = RetryConfig::default()
///     .max_attempts(5)
///     .initial_delay(Duration::from_millis(200))
///     .max_delay(Duration::from_secs(10));
///
/// // Single attempt, no retries
/// let no_retry = RetryConfig::no_retry();
/// assert_eq!(no_retry.max_attempts, 1);
/// ```
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of calls per page, including the first.
    pub max_attempts: u32,
    /// Delay after the first failure (doubles each attempt).
    pub initial_delay: Duration,
    /// Maximum delay between attempts.
    pub max_delay: Duration,
    /// Whether to add up to 10% random jitter to each delay.
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(30),
            jitter: true,
        }
    }
}

impl RetryConfig {
    /// Creates a config that never retries.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            ..Default::default()
        }
    }

    /// Sets the maximum number of attempts. Values below 1 are treated as 1.
    pub fn max_attempts(mut self, n: u32) -> Self {
        self.max_attempts = n.max(1);
        self
    }

    /// Sets the delay after the first failure.
    pub fn initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Sets the maximum delay between attempts.
    pub fn max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Enables or disables jitter.
    pub fn jitter(mut self, enabled: bool) -> Self {
        self.jitter = enabled;
        self
    }

    /// Returns the backoff before attempt `attempt + 1`, where `attempt` is
    /// the 1-based number of the attempt that just failed.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        let base = self
            .initial_delay
            .saturating_mul(1 << exponent)
            .min(self.max_delay);
        if !self.jitter || base.is_zero() {
            return base;
        }
        let spread = u64::try_from(base.as_millis() / 10).unwrap_or(u64::MAX);
        base.saturating_add(Duration::from_millis(rand::random_range(0..=spread)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delay_doubles_and_caps() {
        let config = RetryConfig::default()
            .initial_delay(Duration::from_secs(1))
            .max_delay(Duration::from_secs(5))
            .jitter(false);

        assert_eq!(config.delay_for(1), Duration::from_secs(1));
        assert_eq!(config.delay_for(2), Duration::from_secs(2));
        assert_eq!(config.delay_for(3), Duration::from_secs(4));
        assert_eq!(config.delay_for(4), Duration::from_secs(5));
        assert_eq!(config.delay_for(40), Duration::from_secs(5));
    }

    #[test]
    fn test_jitter_stays_within_ten_percent() {
        let config = RetryConfig::default().initial_delay(Duration::from_secs(1));
        for _ in 0..50 {
            let delay = config.delay_for(1);
            assert!(delay >= Duration::from_secs(1));
            assert!(delay <= Duration::from_millis(1100));
        }
    }

    #[test]
    fn test_attempts_never_zero() {
        assert_eq!(RetryConfig::default().max_attempts(0).max_attempts, 1);
    }

    #[test]
    fn test_jitter_saturates_at_max_duration() {
        let config = RetryConfig::default()
            .initial_delay(Duration::MAX)
            .max_delay(Duration::MAX);
        assert_eq!(config.delay_for(1), Duration::MAX);
        assert_eq!(config.delay_for(5), Duration::MAX);
    }
}
