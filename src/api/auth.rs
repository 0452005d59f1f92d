//! Authentication handling for the GitHub API.
//!
//! GitHub accepts a personal access token in the `Authorization` header.
//! The prefix in front of the token differs between deployments, so it is
//! configurable through [`AuthScheme`].

use std::fmt;
use std::str::FromStr;

use reqwest::header::HeaderValue;
use serde::{Deserialize, Serialize};

use super::error::{ApiError, Result};

/// Prefix written in front of the token in the `Authorization` header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthScheme {
    /// `token <token>`
    #[default]
    Token,
    /// `Token <token>`
    TokenCapitalized,
    /// `Bearer <token>`
    Bearer,
}

impl AuthScheme {
    pub fn prefix(&self) -> &'static str {
        match self {
            AuthScheme::Token => "token",
            AuthScheme::TokenCapitalized => "Token",
            AuthScheme::Bearer => "Bearer",
        }
    }
}

impl fmt::Display for AuthScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

impl FromStr for AuthScheme {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "token" => Ok(AuthScheme::Token),
            "Token" | "token_capitalized" => Ok(AuthScheme::TokenCapitalized),
            "Bearer" | "bearer" => Ok(AuthScheme::Bearer),
            other => Err(format!("unknown auth scheme '{}'", other)),
        }
    }
}

/// Token credentials for the GitHub API.
#[derive(Clone)]
pub struct Auth {
    scheme: AuthScheme,
    /// The complete header value, e.g. "token ghp_...".
    auth_header: String,
}

impl Auth {
    /// Create credentials using the default `token` scheme.
    pub fn new(token: &str) -> Self {
        Self::with_scheme(token, AuthScheme::default())
    }

    /// Create credentials with an explicit scheme.
    pub fn with_scheme(token: &str, scheme: AuthScheme) -> Self {
        Self {
            scheme,
            auth_header: build_auth_header(scheme, token),
        }
    }

    /// Get the authorization header value for HTTP requests.
    pub fn header_value(&self) -> &str {
        &self.auth_header
    }

    /// The header value marked as sensitive, ready for a header map.
    ///
    /// # Errors
    ///
    /// Returns an error if the token contains characters not allowed in headers.
    pub fn to_header(&self) -> Result<HeaderValue> {
        let mut value = HeaderValue::from_str(&self.auth_header)
            .map_err(|e| ApiError::InvalidHeader(format!("authorization: {}", e)))?;
        value.set_sensitive(true);
        Ok(value)
    }

    pub fn scheme(&self) -> AuthScheme {
        self.scheme
    }
}

impl fmt::Debug for Auth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Auth")
            .field("scheme", &self.scheme)
            .field("auth_header", &"<redacted>")
            .finish()
    }
}

fn build_auth_header(scheme: AuthScheme, token: &str) -> String {
    format!("{} {}", scheme.prefix(), token)
}
