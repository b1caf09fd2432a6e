//! Mapping of notes service HTTP failures onto notehub errors.

use notehub_core::Error;

/// Failure classes of the notes service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorCode {
    /// Token missing, invalid, or not allowed.
    Unauthorized,
    /// Resource does not exist (or was already deleted).
    NotFound,
    /// Payload rejected by server-side validation.
    Rejected,
    /// Too many requests.
    RateLimited,
    /// Server error.
    ServerError,
    /// Anything else.
    Unknown,
}

impl ApiErrorCode {
    /// Classify a non-success HTTP status.
    pub fn from_status(status: u16) -> Self {
        match status {
            401 | 403 => Self::Unauthorized,
            404 => Self::NotFound,
            400 | 409 | 422 => Self::Rejected,
            429 => Self::RateLimited,
            500..=599 => Self::ServerError,
            _ => Self::Unknown,
        }
    }
}

/// Convert a classified failure into a notehub [`Error`].
pub fn to_notehub_error(code: ApiErrorCode, status: u16, message: &str) -> Error {
    match code {
        ApiErrorCode::Unauthorized => Error::Unauthorized(message.to_string()),
        ApiErrorCode::NotFound => Error::NotFound(message.to_string()),
        ApiErrorCode::Rejected => Error::Service {
            status,
            message: format!("Rejected by server: {}", message),
        },
        ApiErrorCode::RateLimited => Error::Service {
            status,
            message: format!("Rate limit exceeded: {}", message),
        },
        ApiErrorCode::ServerError | ApiErrorCode::Unknown => Error::Service {
            status,
            message: message.to_string(),
        },
    }
}
