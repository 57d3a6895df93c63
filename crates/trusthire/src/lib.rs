//! Top-level facade crate for TrustHire.
//!
//! Re-exports the metrics core and the gateway library so users can depend on a single crate.

pub mod core {
    pub use trusthire_core::*;
}

pub mod gateway {
    pub use trusthire_gateway::*;
}
