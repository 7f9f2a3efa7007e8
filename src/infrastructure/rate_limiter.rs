//! Politeness throttle shared by every outbound request

use governor::{
    clock::DefaultClock,
    state::{direct::NotKeyed, InMemoryState},
    Quota, RateLimiter,
};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing::debug;

type DirectRateLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;
type FinishedAt = Arc<Mutex<Option<Instant>>>;

/// Enforces a minimum spacing between requests.
///
/// The single burst token is spent at construction, so even the first
/// request of a run waits one interval. Spacing is also kept from the end
/// of the previous request, so a slow render still gets the full delay
/// before the next one. Cloning shares the same budget.
#[derive(Clone)]
pub struct RequestRateLimiter {
    limiter: Option<Arc<DirectRateLimiter>>,
    last_finished: FinishedAt,
    interval: Duration,
}

impl std::fmt::Debug for RequestRateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RequestRateLimiter")
            .field("interval", &self.interval)
            .field("enabled", &self.limiter.is_some())
            .finish()
    }
}

impl RequestRateLimiter {
    /// A zero interval disables throttling
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        let limiter = Quota::with_period(interval).map(|quota| {
            let limiter = RateLimiter::direct(quota);
            // spend the burst token so the first wait is a full interval
            let _ = limiter.check();
            Arc::new(limiter)
        });
        Self {
            limiter,
            last_finished: Arc::default(),
            interval,
        }
    }

    #[must_use]
    pub fn disabled() -> Self {
        Self::new(Duration::ZERO)
    }

    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Wait until the next request may go out.
    ///
    /// Hold the returned slot for the duration of the request; dropping it
    /// marks the request as finished.
    pub async fn wait(&self) -> RequestSlot {
        let Some(limiter) = &self.limiter else {
            return RequestSlot { finished: None };
        };

        debug!("Waiting for rate limit slot ({:?})", self.interval);
        limiter.until_ready().await;
        if let Some(remaining) = self.remaining_since_last_request() {
            tokio::time::sleep(remaining).await;
        }
        RequestSlot {
            finished: Some(Arc::clone(&self.last_finished)),
        }
    }

    fn remaining_since_last_request(&self) -> Option<Duration> {
        let finished = (*self.last_finished.lock().ok()?)?;
        self.interval
            .checked_sub(finished.elapsed())
            .filter(|remaining| !remaining.is_zero())
    }
}

/// An in-flight request; records its completion time when dropped
#[must_use = "dropping the slot ends the request immediately"]
#[derive(Debug)]
pub struct RequestSlot {
    finished: Option<FinishedAt>,
}

impl Drop for RequestSlot {
    fn drop(&mut self) {
        if let Some(finished) = &self.finished {
            if let Ok(mut last) = finished.lock() {
                *last = Some(Instant::now());
            }
        }
    }
}
