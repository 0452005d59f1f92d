//! Crate-level error type.
//!
//! Aggregates configuration and API errors for callers that load settings
//! and talk to the API in one place.

use thiserror::Error;

use crate::api::error::ApiError;
use crate::config::ConfigError;

/// Any error raised by this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration-related errors.
    #[error("{0}")]
    Config(#[from] ConfigError),

    /// API-related errors.
    #[error("{0}")]
    Api(#[from] ApiError),
}

impl Error {
    /// Get a short, user-facing message.
    ///
    /// Suitable for printing in a tool built on this crate, without the
    /// underlying error chain.
    pub fn user_message(&self) -> String {
        match self {
            Error::Config(e) => match e {
                ConfigError::ReadError(_) => {
                    "Could not read configuration file. Please check the file exists and is readable.".to_string()
                }
                ConfigError::ParseError(_) => {
                    "Configuration file is invalid. Please check the file format.".to_string()
                }
                ConfigError::ValidationError(msg) => format!("Configuration error: {}", msg),
            },
            Error::Api(e) => match e {
                ApiError::Validation(err) => {
                    format!("GitHub sent or was given an invalid payload ({})", err)
                }
                ApiError::Transport(_) => {
                    "Connection failed. Please check your internet connection.".to_string()
                }
                ApiError::HttpStatus { status, .. } => match status.as_u16() {
                    401 => "Authentication failed. Please check your token.".to_string(),
                    403 => "Access denied. The token cannot import into this repository.".to_string(),
                    404 => "Repository or import not found.".to_string(),
                    422 => "GitHub rejected the import request.".to_string(),
                    _ => format!("GitHub answered with HTTP {}.", status),
                },
                ApiError::InvalidUrl(url) => format!("Invalid URL: {}", url),
                ApiError::InvalidHeader(_) => {
                    "The token or a header contains invalid characters.".to_string()
                }
                ApiError::Serialize(_) => "Could not encode the import request.".to_string(),
            },
        }
    }
}

/// Result type for crate operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ValidationError;
    use reqwest::StatusCode;

    #[test]
    fn test_error_from_config_error() {
        let err: Error = ConfigError::ValidationError("bad".to_string()).into();
        assert!(matches!(err, Error::Config(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_error_from_api_error() {
        let err: Error = ApiError::InvalidUrl("x".to_string()).into();
        assert!(matches!(err, Error::Api(ApiError::InvalidUrl(_))));
    }

    #[test]
    fn test_user_message_unauthorized() {
        let err = Error::Api(ApiError::from_status(StatusCode::UNAUTHORIZED, "u", ""));
        assert!(err.user_message().contains("Authentication failed"));
    }

    #[test]
    fn test_user_message_other_status() {
        let err = Error::Api(ApiError::from_status(StatusCode::BAD_GATEWAY, "u", ""));
        assert_eq!(err.user_message(), "GitHub answered with HTTP 502 Bad Gateway.");
    }

    #[test]
    fn test_user_message_validation() {
        let err = Error::Api(ValidationError::new("status", "unknown variant").into());
        assert!(err.user_message().contains("status"));
    }

    #[test]
    fn test_user_message_config_validation() {
        let err = Error::Config(ConfigError::ValidationError(
            "timeout_secs must be greater than zero".to_string(),
        ));
        assert!(err.user_message().contains("timeout_secs"));
    }
}
