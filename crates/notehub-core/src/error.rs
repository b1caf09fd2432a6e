//! Error types for notehub.

use thiserror::Error;

use crate::validation::FieldErrors;

/// Result type alias using notehub's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for notehub operations.
#[derive(Error, Debug, Clone)]
pub enum Error {
    /// Local field validation failed; never reaches the network layer.
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    /// Resource not found on the notes service
    #[error("Not found: {0}")]
    NotFound(String),

    /// Non-success response from the notes service
    #[error("Service error ({status}): {message}")]
    Service { status: u16, message: String },

    /// Authentication/authorization rejected by the notes service
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// HTTP/network request failed before a response arrived
    #[error("Request error: {0}")]
    Request(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// True for every failure that originated at (or on the way to) the
    /// remote notes service.
    pub fn is_service_error(&self) -> bool {
        matches!(
            self,
            Error::NotFound(_)
                | Error::Service { .. }
                | Error::Unauthorized(_)
                | Error::Request(_)
                | Error::Serialization(_)
        )
    }

    /// True for local, field-scoped validation failures.
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Request(e.to_string())
    }
}

impl From<FieldErrors> for Error {
    fn from(errors: FieldErrors) -> Self {
        Error::Validation(errors)
    }
}
