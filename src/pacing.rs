//! Pacing of outbound catalog lookups
//!
//! Lookups are spaced by a fixed minimum interval. Pacing sits behind the
//! [`Pacer`] trait; tests use [`NoDelayPacer`].

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Wait-before-next-call policy
#[async_trait]
pub trait Pacer: Send + Sync {
    /// Wait until the next lookup may start
    async fn wait(&self);

    /// Human-readable name for logging
    fn name(&self) -> &'static str;
}

/// Pacer that never waits
#[derive(Debug, Default, Clone, Copy)]
pub struct NoDelayPacer;

#[async_trait]
impl Pacer for NoDelayPacer {
    async fn wait(&self) {}

    fn name(&self) -> &'static str {
        "none"
    }
}

/// Guarantees at least `min_interval` between the starts of successive calls
///
/// Spacing is measured start to start, so time spent in a slow lookup counts
/// toward the interval instead of being added on top of it.
///
/// The first call passes straight through. Each pacer tracks its own last call,
/// so separate batches using separate pacers do not throttle each other.
#[derive(Debug)]
pub struct FixedIntervalPacer {
    min_interval: Duration,
    last_call: Mutex<Option<Instant>>,
}

impl FixedIntervalPacer {
    /// Create a pacer enforcing `min_interval` between calls
    #[must_use]
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_call: Mutex::new(None),
        }
    }
}

#[async_trait]
impl Pacer for FixedIntervalPacer {
    async fn wait(&self) {
        let mut last_call = self.last_call.lock().await;

        if let Some(previous) = *last_call {
            let elapsed = previous.elapsed();
            if elapsed < self.min_interval {
                tokio::time::sleep(self.min_interval - elapsed).await;
            }
        }

        *last_call = Some(Instant::now());
    }

    fn name(&self) -> &'static str {
        "fixed_interval"
    }
}

/// Build the pacer for a configured delay (zero disables pacing)
pub fn pacer_for(delay: Duration) -> Arc<dyn Pacer> {
    if delay.is_zero() {
        Arc::new(NoDelayPacer)
    } else {
        Arc::new(FixedIntervalPacer::new(delay))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn first_call_does_not_wait() {
        let pacer = FixedIntervalPacer::new(Duration::from_secs(60));
        let start = Instant::now();

        pacer.wait().await;

        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn successive_calls_are_spaced() {
        let interval = Duration::from_millis(40);
        let pacer = FixedIntervalPacer::new(interval);
        let start = Instant::now();

        for _ in 0..3 {
            pacer.wait().await;
        }

        // Three calls, two gaps
        assert!(start.elapsed() >= interval * 2);
    }

    #[tokio::test]
    async fn slow_callers_are_not_delayed_further() {
        let interval = Duration::from_millis(100);
        let pacer = FixedIntervalPacer::new(interval);

        pacer.wait().await;
        tokio::time::sleep(Duration::from_millis(150)).await;

        let start = Instant::now();
        pacer.wait().await;
        assert!(start.elapsed() < interval);
    }

    #[tokio::test]
    async fn no_delay_pacer_returns_immediately() {
        let pacer = NoDelayPacer;
        let start = Instant::now();
        for _ in 0..100 {
            pacer.wait().await;
        }
        assert!(start.elapsed() < Duration::from_millis(50));
    }

    #[test]
    fn pacer_for_zero_is_no_delay() {
        assert_eq!(pacer_for(Duration::ZERO).name(), "none");
        assert_eq!(
            pacer_for(Duration::from_millis(500)).name(),
            "fixed_interval"
        );
    }
}
