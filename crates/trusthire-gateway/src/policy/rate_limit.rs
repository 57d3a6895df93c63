//! Fixed-window request limiter ("N per minute").
//!
//! The window opens on the first request after the previous one expired and
//! admits at most `limit` requests until it closes.

use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

const WINDOW: Duration = Duration::from_secs(60);

#[derive(Debug)]
struct Window {
    opened: Instant,
    used: u32,
}

/// Shared limiter for one class of endpoints.
#[derive(Debug)]
pub struct RateLimiter {
    limit: u32,
    period: Duration,
    window: Mutex<Window>,
}

impl RateLimiter {
    pub fn per_minute(limit: u32) -> Self {
        Self::new(limit, WINDOW)
    }

    pub fn new(limit: u32, period: Duration) -> Self {
        Self {
            limit: limit.max(1),
            period,
            window: Mutex::new(Window {
                opened: Instant::now(),
                used: 0,
            }),
        }
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Take one slot. On reject, returns retry-after seconds (min 1).
    pub fn check(&self) -> Result<(), u64> {
        self.check_at(Instant::now())
    }

    pub fn check_at(&self, now: Instant) -> Result<(), u64> {
        let mut w = self.window.lock().unwrap_or_else(PoisonError::into_inner);

        let age = now.saturating_duration_since(w.opened);
        if age >= self.period {
            w.opened = now;
            w.used = 0;
        }

        if w.used < self.limit {
            w.used += 1;
            return Ok(());
        }

        let wait = self.period.saturating_sub(age).as_secs_f64().ceil();
        Err((wait as u64).max(1))
    }
}
