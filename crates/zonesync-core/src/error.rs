//! Error types for the synchronizer
//!
//! This module defines all error types used throughout the crate.

use thiserror::Error;

/// Result type alias for synchronizer operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the synchronizer
///
/// The taxonomy maps directly to how the control loop reacts:
/// [`Error::Config`] is fatal at startup, while [`Error::Observe`] and
/// [`Error::Zone`] abandon the current cycle and leave the fingerprint
/// untouched so the next tick retries.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration errors (fatal at startup)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Node/address observation errors (transient, cycle is skipped)
    #[error("Node observation error: {0}")]
    Observe(String),

    /// Zone record read/mutation errors (transient, pass is abandoned)
    #[error("Zone record error: {0}")]
    Zone(String),

    /// Provider-specific error
    #[error("Provider error ({provider}): {message}")]
    Provider {
        /// Provider name
        provider: String,
        /// Error message
        message: String,
    },

    /// HTTP client errors (from provider APIs)
    #[error("HTTP error: {0}")]
    Http(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Network-related errors
    #[error("Network error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an observation error
    pub fn observe(msg: impl Into<String>) -> Self {
        Self::Observe(msg.into())
    }

    /// Create a zone record error
    pub fn zone(msg: impl Into<String>) -> Self {
        Self::Zone(msg.into())
    }

    /// Create a provider-specific error
    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Create an HTTP error
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }
}

/// Helper for converting anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}
