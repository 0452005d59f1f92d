//! API error types for the issue import client.

use reqwest::StatusCode;
use thiserror::Error;

/// A payload failed schema validation.
///
/// Carries the path of the offending field (e.g. `issue.created_at` or
/// `[0].status`) and a description of the violated constraint.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("validation failed at `{path}`: {message}")]
pub struct ValidationError {
    path: String,
    message: String,
}

impl ValidationError {
    /// Create a validation error for a field path.
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }

    /// The path of the field that failed validation. `.` is the document root.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The constraint violation.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<serde_path_to_error::Error<serde_json::Error>> for ValidationError {
    fn from(err: serde_path_to_error::Error<serde_json::Error>) -> Self {
        let path = err.path().to_string();
        Self::new(path, err.into_inner().to_string())
    }
}

/// Errors that can occur when talking to the issue import API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// A request or response payload did not match the schema.
    #[error("Invalid payload: {0}")]
    Validation(#[from] ValidationError),

    /// Connection-level failure (DNS, TCP, TLS, timeout).
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("HTTP {status} for url {url}")]
    HttpStatus {
        /// The response status.
        status: StatusCode,
        /// The URL that was requested.
        url: String,
        /// The response body, kept for diagnostics.
        body: String,
    },

    /// A URL could not be built or parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// A header name or value could not be used.
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// A request could not be serialized.
    #[error("Failed to serialize request: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Result type for API operations.
pub type Result<T> = std::result::Result<T, ApiError>;

impl ApiError {
    /// Create an error from a non-success HTTP response.
    pub fn from_status(status: StatusCode, url: &str, body: &str) -> Self {
        ApiError::HttpStatus {
            status,
            url: url.to_string(),
            body: body.to_string(),
        }
    }

    /// The HTTP status, if the server answered.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::HttpStatus { status, .. } => Some(*status),
            ApiError::Transport(err) => err.status(),
            _ => None,
        }
    }

    /// Whether the request never got an HTTP answer.
    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Transport(_))
    }

    /// Whether the server answered with an error status.
    pub fn is_http_status(&self) -> bool {
        matches!(self, ApiError::HttpStatus { .. })
    }

    /// Whether a payload failed validation.
    pub fn is_validation(&self) -> bool {
        matches!(self, ApiError::Validation(_))
    }
}
