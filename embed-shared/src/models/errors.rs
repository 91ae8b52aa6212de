use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result alias used throughout the widget runtime.
pub type WidgetResult<T> = Result<T, WidgetError>;

/// Failure taxonomy for the widget runtime and the preview-configuration
/// client.
///
/// Nothing in this enum is ever thrown across the embedding boundary into
/// host-page code; callers at that boundary convert every variant into a
/// console diagnostic plus a no-op.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WidgetError {
    /// Malformed or missing required input; surfaced inline, never retried.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The referenced session or record does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The preview session was already converted; a benign no-op.
    #[error("preview session already converted")]
    AlreadyConverted,

    /// The backend cannot attribute the request to the signed-in identity
    /// yet; retried with bounded backoff.
    #[error("auth context not yet attached")]
    NotReady,

    /// The execution environment is missing something the runtime needs
    /// (host container absent, no browser window).
    #[error("environment: {0}")]
    Environment(String),

    /// A cross-frame message arrived that could not be delivered; dropped.
    #[error("undeliverable message: {0}")]
    Delivery(String),

    /// HTTP-level failure talking to the backend.
    #[error("transport: {0}")]
    Transport(String),
}

impl WidgetError {
    /// Conversion outcomes that mean "nothing left to do" rather than a
    /// fault: the record was already promoted or never existed.
    #[must_use]
    pub const fn is_benign_conversion(&self) -> bool {
        matches!(self, Self::AlreadyConverted | Self::NotFound(_))
    }
}

/// Error body returned by the backend.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct ErrorResponse {
    /// The main error message.
    pub message: String,
    /// Optional additional details about the error.
    pub details: Option<String>,
}

impl ErrorResponse {
    /// Creates a new error response with just a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            details: None,
        }
    }
}

impl std::fmt::Display for ErrorResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.details {
            Some(details) => write!(f, "{}: {}", self.message, details),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for ErrorResponse {}
