//! Request observability.
//!
//! Every request that reaches the router is timed here and fed into the
//! shared `RequestMetrics`.

pub mod timing;

pub use timing::{is_error_status, track_requests};
