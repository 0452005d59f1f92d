//! Configurable HTTP transport for the GitHub API.
//!
//! Owns the connection pool, base URL, default headers and timeout, and runs
//! the [`EventHooks`] around every call.

use std::sync::Arc;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{Method, Url};
use tracing::{instrument, warn};

use super::auth::{Auth, AuthScheme};
use super::error::{ApiError, Result};
use super::hooks::{ApiLogger, EventHooks, RequestRecord, ResponseRecord, TracingLogger};
use crate::config::Settings;

/// Default API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.github.com";

/// Media type selecting the issue import preview API.
pub const DEFAULT_ACCEPT: &str = "application/vnd.github.golden-comet-preview+json";

/// Default timeout in seconds, used for connecting and for the whole request.
const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// Blocking HTTP client with default headers and hooks.
///
/// The connection pool is created once in [`HttpClientBuilder::build`] and
/// released when the client is dropped.
#[derive(Debug)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    headers: HeaderMap,
    hooks: EventHooks,
}

impl HttpClient {
    /// Create a client with every default and the given token.
    pub fn new(token: &str) -> Result<Self> {
        Self::builder(token).build()
    }

    /// Start configuring a client.
    pub fn builder(token: &str) -> HttpClientBuilder {
        HttpClientBuilder::new(token)
    }

    /// Send a GET request.
    ///
    /// `url` may be absolute or a path relative to the base URL.
    pub fn get(&self, url: &str, query: &[(&str, &str)]) -> Result<ResponseRecord> {
        self.send(Method::GET, url, query, None)
    }

    /// Send a POST request with a body.
    pub fn post(&self, url: &str, body: String) -> Result<ResponseRecord> {
        self.send(Method::POST, url, &[], Some(body))
    }

    /// Send a request through the hook chain.
    ///
    /// Request hooks run before sending; response hooks run once the body has
    /// been read. With the default hooks a non-2xx status is returned as
    /// [`ApiError::HttpStatus`].
    #[instrument(level = "trace", skip(self, query, body))]
    pub fn send(
        &self,
        method: Method,
        url: &str,
        query: &[(&str, &str)],
        body: Option<String>,
    ) -> Result<ResponseRecord> {
        let url = self.resolve(url)?;

        let mut builder = self
            .client
            .request(method.clone(), url)
            .headers(self.headers.clone());
        if !query.is_empty() {
            builder = builder.query(query);
        }
        if let Some(body) = body {
            builder = builder.body(body);
        }
        let request = builder.build()?;

        let sent = RequestRecord::new(
            request.method().clone(),
            request.url().clone(),
            request.headers().clone(),
            request
                .body()
                .and_then(|b| b.as_bytes())
                .map(|b| String::from_utf8_lossy(b).into_owned()),
        );
        self.hooks.run_request(&sent)?;

        let response = self.client.execute(request)?;
        let status = response.status();
        let headers = response.headers().clone();
        let response_url = response.url().clone();
        let text = response.text()?;

        let received = ResponseRecord::new(method, response_url, status, headers, text);
        self.hooks.run_response(&received)?;

        Ok(received)
    }

    /// Turn an absolute URL or a base-relative path into a full URL.
    fn resolve(&self, url: &str) -> Result<Url> {
        if let Ok(absolute) = Url::parse(url) {
            if absolute.scheme() == "http" || absolute.scheme() == "https" {
                return Ok(absolute);
            }
            return Err(ApiError::InvalidUrl(format!(
                "'{}' is not an http(s) URL",
                url
            )));
        }

        let joined = format!("{}/{}", self.base_url, url.trim_start_matches('/'));
        Url::parse(&joined).map_err(|e| ApiError::InvalidUrl(format!("{}: {}", joined, e)))
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Headers attached to every request.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn hooks(&self) -> &EventHooks {
        &self.hooks
    }
}

/// Builder for [`HttpClient`].
///
/// Every override replaces its default outright. In particular
/// [`headers`](Self::headers) replaces the whole default header set, so the
/// `Authorization` header is only sent if the replacement contains it.
pub struct HttpClientBuilder {
    token: String,
    auth_scheme: AuthScheme,
    accept: String,
    base_url: String,
    headers: Option<HeaderMap>,
    timeout: Option<Duration>,
    hooks: Option<EventHooks>,
    logger: Option<Arc<dyn ApiLogger>>,
}

impl HttpClientBuilder {
    fn new(token: &str) -> Self {
        Self {
            token: token.to_string(),
            auth_scheme: AuthScheme::default(),
            accept: DEFAULT_ACCEPT.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            headers: None,
            timeout: Some(Duration::from_secs(DEFAULT_TIMEOUT_SECS)),
            hooks: None,
            logger: None,
        }
    }

    /// Apply file-based settings on top of the defaults.
    pub fn settings(mut self, settings: &Settings) -> Self {
        self.base_url = settings.base_url.clone();
        self.auth_scheme = settings.auth_scheme;
        self.accept = settings.accept.clone();
        self.timeout = Some(Duration::from_secs(settings.timeout_secs));
        self
    }

    pub fn base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.to_string();
        self
    }

    pub fn auth_scheme(mut self, scheme: AuthScheme) -> Self {
        self.auth_scheme = scheme;
        self
    }

    /// Media type for the default `Accept` header.
    pub fn accept(mut self, media_type: &str) -> Self {
        self.accept = media_type.to_string();
        self
    }

    /// Replace the default headers wholesale.
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.headers = Some(headers);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn without_timeout(mut self) -> Self {
        self.timeout = None;
        self
    }

    /// Replace the default hook chain.
    pub fn event_hooks(mut self, hooks: EventHooks) -> Self {
        self.hooks = Some(hooks);
        self
    }

    /// Logger used by the default hook chain.
    ///
    /// Has no effect when [`event_hooks`](Self::event_hooks) is also set.
    pub fn logger(mut self, logger: Arc<dyn ApiLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Build the client and its connection pool.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The token or media type is not a valid header value
    /// - The underlying HTTP client cannot be built
    pub fn build(self) -> Result<HttpClient> {
        let headers = match self.headers {
            Some(headers) => headers,
            None => {
                let auth = Auth::with_scheme(&self.token, self.auth_scheme);
                default_headers(&auth, &self.accept)?
            }
        };

        let client = Client::builder()
            .timeout(self.timeout)
            .connect_timeout(self.timeout)
            .build()
            .map_err(ApiError::Transport)?;

        let hooks = match self.hooks {
            Some(hooks) => hooks,
            None => EventHooks::with_logger(self.logger.unwrap_or_else(|| Arc::new(TracingLogger))),
        };

        Ok(HttpClient {
            client,
            base_url: normalize_base_url(&self.base_url),
            headers,
            hooks,
        })
    }
}

fn default_headers(auth: &Auth, accept: &str) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    headers.insert(
        header::ACCEPT,
        HeaderValue::from_str(accept)
            .map_err(|e| ApiError::InvalidHeader(format!("accept: {}", e)))?,
    );
    headers.insert(header::AUTHORIZATION, auth.to_header()?);
    Ok(headers)
}

/// Normalize the base URL by removing trailing slashes, warning on plain HTTP.
fn normalize_base_url(url: &str) -> String {
    let url = url.trim_end_matches('/');

    // Warn if not HTTPS (but don't enforce for local testing)
    if !url.starts_with("https://") && !url.contains("localhost") && !url.contains("127.0.0.1") {
        warn!("URL does not use HTTPS: {}. This is insecure for production use.", url);
    }

    url.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_base_url_removes_trailing_slash() {
        assert_eq!(normalize_base_url("https://api.github.com/"), "https://api.github.com");
    }

    #[test]
    fn test_normalize_base_url_handles_multiple_slashes() {
        assert_eq!(normalize_base_url("https://api.github.com///"), "https://api.github.com");
    }

    #[test]
    fn test_normalize_base_url_preserves_path() {
        assert_eq!(
            normalize_base_url("https://ghe.example.com/api/v3/"),
            "https://ghe.example.com/api/v3"
        );
    }

    #[test]
    fn test_default_headers() {
        let client = HttpClient::new("ghp_abc123").unwrap();
        let headers = client.headers();
        assert_eq!(headers[header::AUTHORIZATION], "token ghp_abc123");
        assert_eq!(headers[header::CONTENT_TYPE], "application/json");
        assert_eq!(headers[header::ACCEPT], DEFAULT_ACCEPT);
        assert_eq!(client.base_url(), DEFAULT_BASE_URL);
    }

    #[test]
    fn test_auth_scheme_override() {
        let client = HttpClient::builder("ghp_abc123")
            .auth_scheme(AuthScheme::TokenCapitalized)
            .build()
            .unwrap();
        assert_eq!(client.headers()[header::AUTHORIZATION], "Token ghp_abc123");
    }

    #[test]
    fn test_headers_override_replaces_defaults() {
        let mut custom = HeaderMap::new();
        custom.insert("foo", HeaderValue::from_static("Bar"));
        let client = HttpClient::builder("ghp_abc123")
            .headers(custom)
            .build()
            .unwrap();

        assert_eq!(client.headers().len(), 1);
        assert!(!client.headers().contains_key(header::AUTHORIZATION));
        assert!(!client.headers().contains_key(header::ACCEPT));
    }

    #[test]
    fn test_event_hooks_override() {
        let client = HttpClient::builder("t")
            .event_hooks(EventHooks::none())
            .build()
            .unwrap();
        assert!(client.hooks().is_empty());
    }

    #[test]
    fn test_resolve_relative_and_absolute() {
        let client = HttpClient::builder("t")
            .base_url("https://test/")
            .build()
            .unwrap();

        assert_eq!(
            client.resolve("/repos/foo/bar/import/issues").unwrap().as_str(),
            "https://test/repos/foo/bar/import/issues"
        );
        assert_eq!(
            client
                .resolve("https://api.github.com/repos/a/b/import/issues/3")
                .unwrap()
                .as_str(),
            "https://api.github.com/repos/a/b/import/issues/3"
        );
        assert!(matches!(
            client.resolve("ftp://example.com/x"),
            Err(ApiError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_settings_are_applied() {
        let settings = Settings {
            base_url: "https://ghe.example.com/api/v3".to_string(),
            timeout_secs: 10,
            auth_scheme: AuthScheme::Bearer,
            accept: "application/vnd.github+json".to_string(),
        };
        let client = HttpClient::builder("t").settings(&settings).build().unwrap();
        assert_eq!(client.base_url(), "https://ghe.example.com/api/v3");
        assert_eq!(client.headers()[header::AUTHORIZATION], "Bearer t");
        assert_eq!(client.headers()[header::ACCEPT], "application/vnd.github+json");
    }

    #[test]
    fn test_invalid_token_fails_build() {
        assert!(matches!(
            HttpClient::new("bad\ntoken"),
            Err(ApiError::InvalidHeader(_))
        ));
    }
}
