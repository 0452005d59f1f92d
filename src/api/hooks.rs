//! Request and response hooks for the HTTP transport.
//!
//! Hooks are run in order around every call: request hooks right before the
//! request is sent, response hooks once the response body has been read.
//! A hook returning an error stops the chain and fails the call.
//!
//! The default chain logs the request, then logs the response and finally
//! turns error statuses into [`ApiError::HttpStatus`], so every call is
//! logged whatever its outcome.

use std::fmt;
use std::sync::Arc;

use reqwest::header::HeaderMap;
use reqwest::{Method, StatusCode, Url};
use tracing::debug;

use super::error::{ApiError, Result};

/// A request as it is about to be sent.
#[derive(Debug, Clone)]
pub struct RequestRecord {
    method: Method,
    url: Url,
    headers: HeaderMap,
    body: Option<String>,
}

impl RequestRecord {
    pub(crate) fn new(method: Method, url: Url, headers: HeaderMap, body: Option<String>) -> Self {
        Self {
            method,
            url,
            headers,
            body,
        }
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }
}

/// A response whose body has been fully read.
#[derive(Debug, Clone)]
pub struct ResponseRecord {
    method: Method,
    url: Url,
    status: StatusCode,
    headers: HeaderMap,
    body: String,
}

impl ResponseRecord {
    pub(crate) fn new(
        method: Method,
        url: Url,
        status: StatusCode,
        headers: HeaderMap,
        body: String,
    ) -> Self {
        Self {
            method,
            url,
            status,
            headers,
            body,
        }
    }

    /// Method of the request that produced this response.
    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub(crate) fn into_body(self) -> String {
        self.body
    }
}

/// Sink for request/response log events.
///
/// Injected into the transport so callers decide where API traffic is
/// logged; [`TracingLogger`] is used when nothing else is given.
pub trait ApiLogger: Send + Sync {
    fn log_request(&self, request: &RequestRecord);
    fn log_response(&self, response: &ResponseRecord);
}

/// Logs API traffic as `tracing` debug events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl ApiLogger for TracingLogger {
    fn log_request(&self, request: &RequestRecord) {
        debug!(
            method = %request.method(),
            url = %request.url(),
            body = request.body().unwrap_or(""),
            "GitHub API request"
        );
    }

    fn log_response(&self, response: &ResponseRecord) {
        debug!(
            method = %response.method(),
            url = %response.url(),
            status = response.status().as_u16(),
            body = response.body(),
            "GitHub API response"
        );
    }
}

/// Hook run before a request is sent.
pub type RequestHook = Arc<dyn Fn(&RequestRecord) -> Result<()> + Send + Sync>;

/// Hook run after a response is received.
pub type ResponseHook = Arc<dyn Fn(&ResponseRecord) -> Result<()> + Send + Sync>;

/// Request hook that hands every request to `logger`.
pub fn log_request(logger: Arc<dyn ApiLogger>) -> RequestHook {
    Arc::new(move |request| {
        logger.log_request(request);
        Ok(())
    })
}

/// Response hook that hands every response to `logger`.
pub fn log_response(logger: Arc<dyn ApiLogger>) -> ResponseHook {
    Arc::new(move |response| {
        logger.log_response(response);
        Ok(())
    })
}

/// Response hook that fails on any status outside 2xx.
pub fn raise_for_status() -> ResponseHook {
    Arc::new(|response| {
        if response.status().is_success() {
            Ok(())
        } else {
            Err(ApiError::from_status(
                response.status(),
                response.url().as_str(),
                response.body(),
            ))
        }
    })
}

/// Ordered request and response hooks.
#[derive(Clone)]
pub struct EventHooks {
    request: Vec<RequestHook>,
    response: Vec<ResponseHook>,
}

impl EventHooks {
    /// The default chain, logging through `logger`:
    /// request = [log], response = [log, raise-for-status].
    pub fn with_logger(logger: Arc<dyn ApiLogger>) -> Self {
        Self {
            request: vec![log_request(Arc::clone(&logger))],
            response: vec![log_response(logger), raise_for_status()],
        }
    }

    /// No hooks at all: nothing is logged and error statuses pass through.
    pub fn none() -> Self {
        Self {
            request: Vec::new(),
            response: Vec::new(),
        }
    }

    /// Append a request hook.
    pub fn on_request<F>(mut self, hook: F) -> Self
    where
        F: Fn(&RequestRecord) -> Result<()> + Send + Sync + 'static,
    {
        self.request.push(Arc::new(hook));
        self
    }

    /// Append a response hook.
    pub fn on_response<F>(mut self, hook: F) -> Self
    where
        F: Fn(&ResponseRecord) -> Result<()> + Send + Sync + 'static,
    {
        self.response.push(Arc::new(hook));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.request.is_empty() && self.response.is_empty()
    }

    pub(crate) fn run_request(&self, request: &RequestRecord) -> Result<()> {
        self.request.iter().try_for_each(|hook| hook(request))
    }

    pub(crate) fn run_response(&self, response: &ResponseRecord) -> Result<()> {
        self.response.iter().try_for_each(|hook| hook(response))
    }
}

impl Default for EventHooks {
    fn default() -> Self {
        Self::with_logger(Arc::new(TracingLogger))
    }
}

impl fmt::Debug for EventHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventHooks")
            .field("request", &self.request.len())
            .field("response", &self.response.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<String>>,
    }

    impl ApiLogger for Recorder {
        fn log_request(&self, request: &RequestRecord) {
            self.events
                .lock()
                .unwrap()
                .push(format!("request {} {}", request.method(), request.url()));
        }

        fn log_response(&self, response: &ResponseRecord) {
            self.events
                .lock()
                .unwrap()
                .push(format!("response {}", response.status().as_u16()));
        }
    }

    fn request() -> RequestRecord {
        RequestRecord::new(
            Method::POST,
            Url::parse("https://api.github.com/repos/foo/bar/import/issues").unwrap(),
            HeaderMap::new(),
            Some("{}".to_string()),
        )
    }

    fn response(status: StatusCode) -> ResponseRecord {
        ResponseRecord::new(
            Method::POST,
            Url::parse("https://api.github.com/repos/foo/bar/import/issues").unwrap(),
            status,
            HeaderMap::new(),
            "body".to_string(),
        )
    }

    #[test]
    fn test_raise_for_status_passes_success() {
        let hook = raise_for_status();
        assert!(hook(&response(StatusCode::OK)).is_ok());
        assert!(hook(&response(StatusCode::ACCEPTED)).is_ok());
    }

    #[test]
    fn test_raise_for_status_fails_on_error_status() {
        let hook = raise_for_status();
        let err = hook(&response(StatusCode::BAD_GATEWAY)).unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::BAD_GATEWAY));
        assert!(err.to_string().contains("502 Bad Gateway"));

        // Redirects that were not followed are not success either.
        assert!(hook(&response(StatusCode::NOT_MODIFIED)).is_err());
    }

    #[test]
    fn test_default_chain_logs_before_raising() {
        let recorder = Arc::new(Recorder::default());
        let hooks = EventHooks::with_logger(recorder.clone());

        hooks.run_request(&request()).unwrap();
        let err = hooks.run_response(&response(StatusCode::BAD_GATEWAY));
        assert!(err.is_err());

        let events = recorder.events.lock().unwrap();
        assert_eq!(
            *events,
            vec![
                "request POST https://api.github.com/repos/foo/bar/import/issues".to_string(),
                "response 502".to_string(),
            ]
        );
    }

    #[test]
    fn test_none_runs_nothing() {
        let hooks = EventHooks::none();
        assert!(hooks.is_empty());
        assert!(hooks.run_response(&response(StatusCode::BAD_GATEWAY)).is_ok());
    }

    #[test]
    fn test_failing_hook_stops_chain() {
        let seen = Arc::new(Mutex::new(0));
        let counter = Arc::clone(&seen);
        let hooks = EventHooks::none()
            .on_response(|_| Err(ApiError::InvalidHeader("stop".to_string())))
            .on_response(move |_| {
                *counter.lock().unwrap() += 1;
                Ok(())
            });

        assert!(hooks.run_response(&response(StatusCode::OK)).is_err());
        assert_eq!(*seen.lock().unwrap(), 0);
    }

    #[test]
    fn test_debug_shows_counts() {
        let hooks = EventHooks::default();
        assert_eq!(format!("{:?}", hooks), "EventHooks { request: 1, response: 2 }");
    }
}
