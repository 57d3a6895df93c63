//! Request policy.
//!
//! Snapshot endpoints take the aggregator lock and sort the latency
//! history, so scrapes are throttled by a shared limiter.

pub mod rate_limit;

pub use rate_limit::RateLimiter;
