//! TrustHire gateway library entry.
//!
//! Wires config, shared state, the request-timing middleware, and the
//! observability endpoints into an axum `Router`. Consumed by the binary
//! (`main.rs`) and by integration tests.

pub mod app_state;
pub mod config;
pub mod obs;
pub mod ops;
pub mod policy;
pub mod router;
