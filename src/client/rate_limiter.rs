use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

#[cfg(debug_assertions)]
use crate::config::DF;

/// Fixed-window request budget shared by every clone.
#[derive(Clone)]
pub struct GlobalRateLimiter {
    inner: Arc<Mutex<InnerLimiter>>,
}

struct InnerLimiter {
    used: u32,
    // We track the specific window we are currently counting for
    // e.g. now_ms / window_ms
    current_window_idx: u64,
    limit: u32,
    window_ms: u64,
}

impl InnerLimiter {
    /// Books `cost` in the window containing `now_ms`, or returns how long to wait.
    fn try_book(&mut self, cost: u32, now_ms: u64) -> Result<(), Duration> {
        let now_idx = now_ms / self.window_ms;

        // 1. Check for New Window (Wall Clock)
        if now_idx > self.current_window_idx {
            self.used = 0;
            self.current_window_idx = now_idx;
        }

        // 2. Check Capacity. An oversized request still goes through in an empty window.
        if self.used + cost <= self.limit || self.used == 0 {
            self.used += cost;
            return Ok(());
        }

        // 3. Calculate Wait (Until next window start)
        let into_window = now_ms % self.window_ms;
        // Add a tiny buffer (50ms) to ensure we land IN the next window
        Err(Duration::from_millis(self.window_ms - into_window + 50))
    }
}

impl GlobalRateLimiter {
    pub(crate) fn new(limit: u32, window_ms: u64) -> Self {
        let window_ms = window_ms.max(1);
        Self {
            inner: Arc::new(Mutex::new(InnerLimiter {
                used: 0,
                current_window_idx: Self::now_ms() / window_ms,
                limit: limit.max(1),
                window_ms,
            })),
        }
    }

    /// Acquires permission to spend `cost` requests, sleeping until the next window if saturated.
    pub(crate) async fn acquire(&self, cost: u32, _context: &str) {
        loop {
            let wait = match self.try_acquire_at(cost, Self::now_ms()) {
                Ok(()) => return,
                Err(wait) => wait,
            };

            #[cfg(debug_assertions)]
            if DF.log_rate_limit {
                log::warn!(
                    "🛑 Rate Limit Saturated for [{}]. Waiting {:.1}s for next window...",
                    _context,
                    wait.as_secs_f64()
                );
            }

            tokio::time::sleep(wait).await;
        }
    }

    fn try_acquire_at(&self, cost: u32, now_ms: u64) -> Result<(), Duration> {
        // Counters stay valid even if a holder panicked
        let mut guard = match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.try_book(cost, now_ms)
    }

    fn now_ms() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or(Duration::ZERO)
            .as_millis() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limiter_at(limit: u32, window_ms: u64, now_ms: u64) -> GlobalRateLimiter {
        let limiter = GlobalRateLimiter::new(limit, window_ms);
        limiter.inner.lock().unwrap().current_window_idx = now_ms / window_ms;
        limiter
    }

    #[test]
    fn books_until_limit_then_waits_for_next_window() {
        let limiter = limiter_at(3, 6_000, 60_000);
        for _ in 0..3 {
            assert!(limiter.try_acquire_at(1, 61_000).is_ok());
        }
        let wait = limiter.try_acquire_at(1, 61_000).unwrap_err();
        assert_eq!(wait, Duration::from_millis(5_000 + 50));
    }

    #[test]
    fn new_window_resets_budget() {
        let limiter = limiter_at(1, 1_000, 10_000);
        assert!(limiter.try_acquire_at(1, 10_100).is_ok());
        assert!(limiter.try_acquire_at(1, 10_900).is_err());
        assert!(limiter.try_acquire_at(1, 11_000).is_ok());
    }

    #[test]
    fn clones_share_budget() {
        let limiter = limiter_at(1, 1_000, 5_000);
        let clone = limiter.clone();
        assert!(limiter.try_acquire_at(1, 5_000).is_ok());
        assert!(clone.try_acquire_at(1, 5_500).is_err());
    }

    #[tokio::test]
    async fn acquire_returns_immediately_with_budget() {
        let limiter = GlobalRateLimiter::new(10, 60_000);
        limiter.acquire(1, "test").await;
        limiter.acquire(1, "test").await;
    }
}
