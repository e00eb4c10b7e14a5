//! Fixed-delay throttle between successive remote calls of one job.

use std::time::Duration;

/// Default spacing between targets, under the dashboard's request ceiling.
pub const DEFAULT_CALL_DELAY: Duration = Duration::from_millis(1200);

/// Suspends only the calling task; jobs each hold their own copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimiter {
    interval: Duration,
}

impl RateLimiter {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    /// A limiter whose `wait` returns immediately.
    pub fn disabled() -> Self {
        Self::new(Duration::ZERO)
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_enabled(&self) -> bool {
        !self.interval.is_zero()
    }

    /// Sleep for the configured interval. No-op when the interval is zero.
    pub async fn wait(&self) {
        if self.is_enabled() {
            tokio::time::sleep(self.interval).await;
        }
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_CALL_DELAY)
    }
}
