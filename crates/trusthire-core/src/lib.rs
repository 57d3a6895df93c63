//! TrustHire core: request metrics aggregation and its read representations.
//!
//! This crate holds the in-process `RequestMetrics` aggregator, the
//! snapshot/summary types rendered by the observability endpoints, and the
//! shared error type. It carries no transport or runtime dependencies so the
//! aggregator can be embedded behind any HTTP layer.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here. Recording and
//! snapshotting never fail; degenerate input yields degenerate output.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod exposition;
pub mod metrics;

/// Shared result type.
pub use error::{Result, TrustHireError};
pub use exposition::{render_prometheus, MetricsSummary, SystemHealth};
pub use metrics::{Clock, MonotonicClock, RequestMetrics, RequestSnapshot};
