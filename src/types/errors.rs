//! Application error types.
//!
//! All errors use `thiserror` for automatic Error trait derivation and provide
//! clear error messages with context.

use thiserror::Error;

/// Application result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error enum for the CMS core.
#[derive(Error, Debug)]
pub enum Error {
    /// Input validation errors (bad ids, empty fields, malformed config).
    #[error("validation error: {0}")]
    Validation(String),

    /// Resource not found (content, schema, or site missing on the relays).
    #[error("not found: {0}")]
    NotFound(String),

    /// An event exists but cannot be decoded into the requested model
    /// (wrong kind, missing `d` tag, undecodable schema row).
    #[error("invalid event: {0}")]
    InvalidEvent(String),

    /// Submitted form data failed validation against the content schema.
    #[error("schema violation: {0}")]
    SchemaViolation(String),

    /// Relay transport failures surfaced by the pool implementation.
    #[error("relay error: {0}")]
    Relay(String),

    /// Signer (NIP-07 extension) failures: unavailable, rejected, etc.
    #[error("signer error: {0}")]
    Signer(String),

    /// Serialization/deserialization errors.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

// Convenience constructors
impl Error {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn invalid_event(msg: impl Into<String>) -> Self {
        Self::InvalidEvent(msg.into())
    }

    pub fn schema_violation(msg: impl Into<String>) -> Self {
        Self::SchemaViolation(msg.into())
    }

    pub fn relay(msg: impl Into<String>) -> Self {
        Self::Relay(msg.into())
    }

    pub fn signer(msg: impl Into<String>) -> Self {
        Self::Signer(msg.into())
    }
}
