//! Configuration for the issue import client.
//!
//! Settings are read from a TOML file and applied to the HTTP transport
//! through [`HttpClientBuilder::settings`](crate::api::HttpClientBuilder::settings).

mod settings;

use thiserror::Error;

pub use settings::Settings;

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file: {0}")]
    ReadError(#[source] std::io::Error),

    /// The configuration file is not valid TOML or has wrong types.
    #[error("failed to parse config file: {0}")]
    ParseError(#[source] toml::de::Error),

    /// The configuration parsed but holds invalid values.
    #[error("invalid configuration: {0}")]
    ValidationError(String),
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
