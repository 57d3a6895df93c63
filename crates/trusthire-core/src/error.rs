//! Shared error type across TrustHire crates.

use thiserror::Error;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Invalid input / malformed configuration.
    BadRequest,
    /// Unsupported config version.
    UnsupportedVersion,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    /// String representation used in JSON responses and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::BadRequest => "BAD_REQUEST",
            ClientCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ClientCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, TrustHireError>;

/// Unified error type used by core and gateway.
///
/// The metrics aggregator never produces one of these; they come from
/// configuration loading and server startup.
#[derive(Debug, Error)]
pub enum TrustHireError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("internal: {0}")]
    Internal(String),
}

impl TrustHireError {
    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            TrustHireError::BadRequest(_) => ClientCode::BadRequest,
            TrustHireError::UnsupportedVersion => ClientCode::UnsupportedVersion,
            TrustHireError::Internal(_) => ClientCode::Internal,
        }
    }
}
