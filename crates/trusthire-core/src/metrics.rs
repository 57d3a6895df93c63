//! In-process request metrics aggregator.
//!
//! `RequestMetrics` is updated once per completed request and read by the
//! observability endpoints. All state sits behind one mutex so that a
//! snapshot never mixes counters from before a concurrent `record` with
//! history from after it.
//!
//! History is bounded on both axes:
//! - latencies: the most recent `LATENCY_HISTORY_CAPACITY` samples (FIFO).
//! - completion timestamps: at most `TIMESTAMP_HISTORY_CAPACITY` entries, and
//!   never older than `RATE_WINDOW` after any record/snapshot.
//!
//! Time comes from a [`Clock`]. The default is monotonic, so wall-clock
//! adjustments cannot stretch or collapse the rolling window.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// Number of latency samples retained for avg/p95.
pub const LATENCY_HISTORY_CAPACITY: usize = 5000;
/// Hard cap on retained completion timestamps.
pub const TIMESTAMP_HISTORY_CAPACITY: usize = 10_000;
/// Trailing window used for `requests_per_minute`.
pub const RATE_WINDOW: Duration = Duration::from_secs(60);
/// Cost assumption used when none is configured.
pub const DEFAULT_COST_PER_REQUEST_USD: f64 = 0.002;

const MIN_UPTIME_SECONDS: f64 = 0.001;
const P95: f64 = 0.95;

/// Time source for the aggregator.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// `Instant::now()`.
#[derive(Debug, Default, Clone, Copy)]
pub struct MonotonicClock;

impl Clock for MonotonicClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now(&self) -> Instant {
        (**self).now()
    }
}

/// Point-in-time view of the aggregator.
///
/// Latency figures are rounded to 2 decimal places and `error_rate` to 4.
/// Renderers must use these values as-is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RequestSnapshot {
    pub total_requests: u64,
    pub total_errors: u64,
    pub uptime_seconds: f64,
    pub avg_latency_ms: f64,
    pub p95_latency_ms: f64,
    pub requests_per_minute: f64,
    pub error_rate: f64,
    pub estimated_cost_per_request_usd: f64,
}

#[derive(Debug, Default)]
struct History {
    total_requests: u64,
    total_errors: u64,
    latencies_ms: VecDeque<f64>,
    request_timestamps: VecDeque<Instant>,
}

impl History {
    fn push_latency(&mut self, latency_ms: f64) {
        if self.latencies_ms.len() >= LATENCY_HISTORY_CAPACITY {
            self.latencies_ms.pop_front();
        }
        self.latencies_ms.push_back(latency_ms);
    }

    fn push_timestamp(&mut self, at: Instant) {
        if self.request_timestamps.len() >= TIMESTAMP_HISTORY_CAPACITY {
            self.request_timestamps.pop_front();
        }
        self.request_timestamps.push_back(at);
    }

    /// Drop timestamps strictly older than `RATE_WINDOW`.
    fn trim_old(&mut self, now: Instant) {
        while let Some(&oldest) = self.request_timestamps.front() {
            if now.saturating_duration_since(oldest) <= RATE_WINDOW {
                break;
            }
            self.request_timestamps.pop_front();
        }
    }
}

/// Concurrency-safe sliding-window request statistics.
///
/// Construct once at startup and share by `Arc`.
#[derive(Debug)]
pub struct RequestMetrics<C = MonotonicClock> {
    clock: C,
    started_at: Instant,
    estimated_cost_per_request_usd: f64,
    history: Mutex<History>,
}

impl RequestMetrics<MonotonicClock> {
    pub fn new(estimated_cost_per_request_usd: f64) -> Self {
        Self::with_clock(estimated_cost_per_request_usd, MonotonicClock)
    }
}

impl<C: Clock> RequestMetrics<C> {
    pub fn with_clock(estimated_cost_per_request_usd: f64, clock: C) -> Self {
        Self {
            started_at: clock.now(),
            clock,
            estimated_cost_per_request_usd,
            history: Mutex::new(History::default()),
        }
    }

    // A panic elsewhere can't leave `History` half-updated, so a poisoned
    // lock is still safe to use.
    fn lock(&self) -> MutexGuard<'_, History> {
        self.history.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record one completed request.
    ///
    /// Negative latencies are stored as given.
    pub fn record(&self, latency_ms: f64, is_error: bool) {
        if latency_ms < 0.0 {
            tracing::debug!(latency_ms, "negative latency sample recorded");
        }

        let mut h = self.lock();
        // Read the clock under the lock so timestamps stay ordered and the
        // front-only trim is exact.
        let now = self.clock.now();

        h.total_requests += 1;
        if is_error {
            h.total_errors += 1;
        }
        h.push_latency(latency_ms);
        h.push_timestamp(now);
        h.trim_old(now);
    }

    /// Record one completed request timed as a `Duration`.
    pub fn record_duration(&self, latency: Duration, is_error: bool) {
        self.record(latency.as_secs_f64() * 1000.0, is_error);
    }

    /// Build a consistent snapshot of counters and history.
    pub fn snapshot(&self) -> RequestSnapshot {
        let mut h = self.lock();
        let now = self.clock.now();
        h.trim_old(now);

        let uptime_seconds = now
            .saturating_duration_since(self.started_at)
            .as_secs_f64()
            .max(MIN_UPTIME_SECONDS);

        let mut latencies: Vec<f64> = h.latencies_ms.iter().copied().collect();
        latencies.sort_by(f64::total_cmp);
        let (avg_latency_ms, p95_latency_ms) = match latencies.len() {
            0 => (0.0, 0.0),
            n => {
                let sum: f64 = latencies.iter().sum();
                let idx = nearest_rank_index(n, P95);
                (sum / n as f64, latencies.get(idx).copied().unwrap_or(0.0))
            }
        };

        let error_rate = if h.total_requests > 0 {
            h.total_errors as f64 / h.total_requests as f64
        } else {
            0.0
        };

        RequestSnapshot {
            total_requests: h.total_requests,
            total_errors: h.total_errors,
            uptime_seconds,
            avg_latency_ms: round_to(avg_latency_ms, 2),
            p95_latency_ms: round_to(p95_latency_ms, 2),
            requests_per_minute: h.request_timestamps.len() as f64,
            error_rate: round_to(error_rate, 4),
            estimated_cost_per_request_usd: self.estimated_cost_per_request_usd,
        }
    }
}

/// `floor((n - 1) * q)`, for `n >= 1`.
fn nearest_rank_index(n: usize, q: f64) -> usize {
    ((n - 1) as f64 * q) as usize
}

/// Round to `places` decimals on the exact binary value, ties to even.
pub(crate) fn round_to(value: f64, places: usize) -> f64 {
    format!("{value:.places$}").parse().unwrap_or(value)
}
