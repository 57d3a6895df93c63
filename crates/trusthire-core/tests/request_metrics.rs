//! RequestMetrics behaviour: counters, bounded history, rolling window.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use trusthire_core::metrics::{
    Clock, RequestMetrics, LATENCY_HISTORY_CAPACITY, TIMESTAMP_HISTORY_CAPACITY,
};

struct ManualClock {
    now: Mutex<Instant>,
}

impl ManualClock {
    fn new() -> Arc<Self> {
        Arc::new(Self { now: Mutex::new(Instant::now()) })
    }

    fn advance(&self, d: Duration) {
        *self.now.lock().unwrap() += d;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        *self.now.lock().unwrap()
    }
}

fn manual() -> (Arc<ManualClock>, RequestMetrics<Arc<ManualClock>>) {
    let clock = ManualClock::new();
    let m = RequestMetrics::with_clock(0.002, Arc::clone(&clock));
    (clock, m)
}

#[test]
fn empty_snapshot_is_all_zero() {
    let m = RequestMetrics::new(0.002);
    let s = m.snapshot();
    assert_eq!(s.total_requests, 0);
    assert_eq!(s.total_errors, 0);
    assert_eq!(s.avg_latency_ms, 0.0);
    assert_eq!(s.p95_latency_ms, 0.0);
    assert_eq!(s.requests_per_minute, 0.0);
    assert_eq!(s.error_rate, 0.0);
    assert!(s.uptime_seconds >= 0.001);
}

#[test]
fn uptime_has_a_floor() {
    let (_clock, m) = manual();
    assert_eq!(m.snapshot().uptime_seconds, 0.001);
}

#[test]
fn uptime_follows_the_clock() {
    let (clock, m) = manual();
    clock.advance(Duration::from_millis(2500));
    assert_eq!(m.snapshot().uptime_seconds, 2.5);
}

#[test]
fn counters_track_every_call() {
    let m = RequestMetrics::new(0.0);
    let pattern = [false, true, false, false, true, true, false];
    for (i, &err) in pattern.iter().cycle().take(70).enumerate() {
        m.record(i as f64, err);
    }
    let s = m.snapshot();
    assert_eq!(s.total_requests, 70);
    assert_eq!(s.total_errors, 30);
    assert!(s.total_errors <= s.total_requests);
    assert_eq!(s.error_rate, 0.4286);
}

#[test]
fn two_request_scenario() {
    let m = RequestMetrics::new(0.01);
    m.record(100.0, false);
    m.record(200.0, true);

    let s = m.snapshot();
    assert_eq!(s.total_requests, 2);
    assert_eq!(s.total_errors, 1);
    assert_eq!(s.avg_latency_ms, 150.0);
    // floor((2 - 1) * 0.95) = 0 -> the smaller sample
    assert_eq!(s.p95_latency_ms, 100.0);
    assert_eq!(s.error_rate, 0.5);
    assert_eq!(s.estimated_cost_per_request_usd, 0.01);
    assert_eq!(s.requests_per_minute, 2.0);
}

#[test]
fn p95_is_nearest_rank() {
    let m = RequestMetrics::new(0.0);
    // insertion order must not matter
    for v in (1..=100).rev() {
        m.record(f64::from(v * 10), false);
    }
    let s = m.snapshot();
    // sorted[94] of [10, 20, ..., 1000]
    assert_eq!(s.p95_latency_ms, 950.0);
    assert_eq!(s.avg_latency_ms, 505.0);
}

#[test]
fn latency_history_evicts_oldest_first() {
    let m = RequestMetrics::new(0.0);
    m.record(1_000_000.0, false);
    for v in 1..=LATENCY_HISTORY_CAPACITY {
        m.record(v as f64, false);
    }

    let s = m.snapshot();
    assert_eq!(s.total_requests, LATENCY_HISTORY_CAPACITY as u64 + 1);
    // The sentinel is gone: mean and p95 come from 1..=5000 only.
    assert_eq!(s.avg_latency_ms, 2500.5);
    assert_eq!(s.p95_latency_ms, 4750.0);
}

#[test]
fn latencies_are_rounded_to_two_places() {
    let m = RequestMetrics::new(0.0);
    m.record(1.0, false);
    m.record(1.0, false);
    m.record(1.004, false);
    let s = m.snapshot();
    assert_eq!(s.avg_latency_ms, 1.0);
    assert_eq!(s.p95_latency_ms, 1.0);

    m.record_duration(Duration::from_micros(12_345), false);
    assert_eq!(m.snapshot().p95_latency_ms, 1.0);
}

#[test]
fn record_duration_converts_to_millis() {
    let m = RequestMetrics::new(0.0);
    m.record_duration(Duration::from_millis(250), false);
    m.record_duration(Duration::from_micros(12_340), true);
    let s = m.snapshot();
    assert_eq!(s.avg_latency_ms, 131.17);
    assert_eq!(s.total_errors, 1);
}

#[test]
fn negative_latency_is_accepted() {
    let m = RequestMetrics::new(0.0);
    m.record(-5.0, false);
    m.record(5.0, false);
    let s = m.snapshot();
    assert_eq!(s.total_requests, 2);
    assert_eq!(s.avg_latency_ms, 0.0);
    assert_eq!(s.p95_latency_ms, -5.0);
}

#[test]
fn idle_gap_drops_throughput_to_zero() {
    let (clock, m) = manual();
    for _ in 0..25 {
        m.record(10.0, false);
    }
    assert_eq!(m.snapshot().requests_per_minute, 25.0);

    clock.advance(Duration::from_secs(61));
    let s = m.snapshot();
    assert_eq!(s.requests_per_minute, 0.0);
    // counters and latency history are unaffected by the window
    assert_eq!(s.total_requests, 25);
    assert_eq!(s.avg_latency_ms, 10.0);
}

#[test]
fn window_keeps_only_the_trailing_minute() {
    let (clock, m) = manual();
    for _ in 0..3 {
        m.record(1.0, false);
    }
    clock.advance(Duration::from_secs(30));
    m.record(1.0, false);
    m.record(1.0, false);

    clock.advance(Duration::from_secs(30));
    assert_eq!(m.snapshot().requests_per_minute, 5.0);

    clock.advance(Duration::from_secs(1));
    assert_eq!(m.snapshot().requests_per_minute, 2.0);

    // a record also prunes
    clock.advance(Duration::from_secs(30));
    m.record(1.0, false);
    assert_eq!(m.snapshot().requests_per_minute, 1.0);
}

#[test]
fn timestamp_history_is_capped() {
    let (_clock, m) = manual();
    for _ in 0..TIMESTAMP_HISTORY_CAPACITY + 50 {
        m.record(1.0, false);
    }
    let s = m.snapshot();
    assert_eq!(s.requests_per_minute, TIMESTAMP_HISTORY_CAPACITY as f64);
    assert_eq!(s.total_requests, TIMESTAMP_HISTORY_CAPACITY as u64 + 50);
}

#[test]
fn repeated_snapshots_are_identical() {
    let (_clock, m) = manual();
    m.record(12.5, false);
    m.record(40.0, true);
    m.record(7.25, false);
    assert_eq!(m.snapshot(), m.snapshot());
}

#[test]
fn repeated_snapshots_differ_only_in_uptime() {
    let m = RequestMetrics::new(0.01);
    m.record(12.5, false);
    m.record(40.0, true);

    let a = m.snapshot();
    let b = m.snapshot();
    assert_eq!(a.total_requests, b.total_requests);
    assert_eq!(a.total_errors, b.total_errors);
    assert_eq!(a.avg_latency_ms, b.avg_latency_ms);
    assert_eq!(a.p95_latency_ms, b.p95_latency_ms);
    assert_eq!(a.requests_per_minute, b.requests_per_minute);
    assert_eq!(a.error_rate, b.error_rate);
    assert_eq!(a.estimated_cost_per_request_usd, b.estimated_cost_per_request_usd);
    assert!(b.uptime_seconds >= a.uptime_seconds);
}

#[test]
fn concurrent_records_are_not_lost() {
    const WORKERS: usize = 8;
    const PER_WORKER: usize = 1000;

    let m = Arc::new(RequestMetrics::new(0.0));
    let handles: Vec<_> = (0..WORKERS)
        .map(|w| {
            let m = Arc::clone(&m);
            thread::spawn(move || {
                for i in 0..PER_WORKER {
                    m.record((w * PER_WORKER + i) as f64, i % 4 == 0);
                }
            })
        })
        .collect();

    // concurrent reader
    let reader = {
        let m = Arc::clone(&m);
        thread::spawn(move || {
            for _ in 0..50 {
                let s = m.snapshot();
                assert!(s.total_errors <= s.total_requests);
                assert!(s.requests_per_minute <= s.total_requests as f64);
            }
        })
    };

    for h in handles {
        h.join().unwrap();
    }
    reader.join().unwrap();

    let s = m.snapshot();
    assert_eq!(s.total_requests, (WORKERS * PER_WORKER) as u64);
    assert_eq!(s.total_errors, (WORKERS * PER_WORKER / 4) as u64);
    assert_eq!(s.requests_per_minute, (WORKERS * PER_WORKER) as f64);
    assert_eq!(s.error_rate, 0.25);
}

#[test]
fn exact_ties_round_to_even() {
    let m = RequestMetrics::new(0.0);
    m.record(0.125, true);
    for _ in 0..31 {
        m.record(0.125, false);
    }
    let s = m.snapshot();
    // 1/32 = 0.03125 and 0.125 are exact binary ties
    assert_eq!(s.error_rate, 0.0312);
    assert_eq!(s.avg_latency_ms, 0.12);
    assert_eq!(s.p95_latency_ms, 0.12);
}
