//! Error types for the auto-ipm system
//!
//! This module defines all error types used throughout the crate.

use thiserror::Error;

/// Result type alias for auto-ipm operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the auto-ipm system
#[derive(Error, Debug)]
pub enum Error {
    /// Every public-IP provider in the fallback list failed
    #[error("public IP discovery failed: all providers exhausted")]
    DiscoveryExhausted,

    /// Address template lookup failed
    #[error("address template lookup failed: {0}")]
    RemoteLookup(String),

    /// Address template member swap failed
    #[error("address template update failed: {0}")]
    RemoteSwap(String),

    /// Webhook notification delivery failed
    #[error("notification error: {0}")]
    Notification(String),

    /// Malformed schedule expression
    #[error("invalid schedule expression: {0}")]
    InvalidExpression(String),

    /// Schedule store read/write errors
    #[error("schedule store error: {0}")]
    ScheduleStore(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// Network-related errors
    #[error("network error: {0}")]
    Network(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP client errors (from collaborator APIs)
    #[error("HTTP error: {0}")]
    Http(String),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a remote lookup error
    pub fn remote_lookup(msg: impl Into<String>) -> Self {
        Self::RemoteLookup(msg.into())
    }

    /// Create a remote swap error
    pub fn remote_swap(msg: impl Into<String>) -> Self {
        Self::RemoteSwap(msg.into())
    }

    /// Create a notification error
    pub fn notification(msg: impl Into<String>) -> Self {
        Self::Notification(msg.into())
    }

    /// Create an invalid expression error
    pub fn invalid_expression(msg: impl Into<String>) -> Self {
        Self::InvalidExpression(msg.into())
    }

    /// Create a schedule store error
    pub fn schedule_store(msg: impl Into<String>) -> Self {
        Self::ScheduleStore(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
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
