//! Transport settings.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ConfigError, Result};
use crate::api::{AuthScheme, DEFAULT_ACCEPT, DEFAULT_BASE_URL};

/// Settings for the HTTP transport.
///
/// Every field is optional in the file and falls back to the default.
/// The API token is deliberately not part of the settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// The API endpoint (e.g. "https://api.github.com" or a GitHub Enterprise URL).
    pub base_url: String,
    /// Connect and request timeout in seconds.
    pub timeout_secs: u64,
    /// Prefix for the token in the `Authorization` header.
    pub auth_scheme: AuthScheme,
    /// Media type sent in the `Accept` header.
    pub accept: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 5,
            auth_scheme: AuthScheme::default(),
            accept: DEFAULT_ACCEPT.to_string(),
        }
    }
}

impl Settings {
    /// Load and validate settings from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid TOML, or
    /// fails validation.
    pub fn load(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "Loading settings");
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadError)?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate settings from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let settings: Settings = toml::from_str(content).map_err(ConfigError::ParseError)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Validate these settings.
    ///
    /// Checks that:
    /// - The base URL is non-empty and uses http or https
    /// - The timeout is at least one second
    /// - The accept media type is non-empty
    pub fn validate(&self) -> Result<()> {
        if self.base_url.is_empty() {
            return Err(ConfigError::ValidationError(
                "base_url cannot be empty".to_string(),
            ));
        }

        if !self.base_url.starts_with("https://") && !self.base_url.starts_with("http://") {
            return Err(ConfigError::ValidationError(format!(
                "base_url '{}' must start with http:// or https://",
                self.base_url
            )));
        }

        if self.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "timeout_secs must be greater than zero".to_string(),
            ));
        }

        if self.accept.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "accept cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}
