//! Error types for the exposure audit
//!
//! This module defines all error types used throughout the crate.
//! Every error is terminal for the current run: nothing is retried after
//! it has been reported to the caller.

use thiserror::Error;

/// Result type alias for audit operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the exposure audit
#[derive(Error, Debug)]
pub enum Error {
    /// No domain could be resolved from arguments or configuration files
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Echo endpoints exhausted, or a DNS query failed outright
    #[error("Network error: {0}")]
    Network(String),

    /// A required resolution capability is absent and cannot be provisioned
    #[error("Missing dependency: {0}")]
    DependencyMissing(String),

    /// The operation needs elevated privilege the process does not hold
    #[error("Insufficient privilege: {0}")]
    Privilege(String),

    /// A value failed typed parsing (IPv4 syntax, domain shape)
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// HTTP client errors (echo endpoints, zone API)
    #[error("HTTP error: {0}")]
    Http(String),

    /// Authentication errors
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Rate limiting errors
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Record or zone not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// I/O errors (configuration files, subprocesses)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a configuration error
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Create a network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    /// Create a missing-dependency error
    pub fn dependency_missing(msg: impl Into<String>) -> Self {
        Self::DependencyMissing(msg.into())
    }

    /// Create a privilege error
    pub fn privilege(msg: impl Into<String>) -> Self {
        Self::Privilege(msg.into())
    }

    /// Create an invalid-format error
    pub fn invalid_format(msg: impl Into<String>) -> Self {
        Self::InvalidFormat(msg.into())
    }

    /// Create an HTTP error
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }

    /// Create an authentication error
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Authentication(msg.into())
    }

    /// Create a rate limit error
    pub fn rate_limited(msg: impl Into<String>) -> Self {
        Self::RateLimited(msg.into())
    }

    /// Create a "not found" error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }
}

/// Helper for converting anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}
