//! Issue import API client.
//!
//! This module provides the three calls of the GitHub issue import API on top
//! of [`HttpClient`]. Each call is a single blocking request; there is no
//! retry, pagination or caching.

use std::fmt::Display;

use chrono::{DateTime, SecondsFormat, TimeZone};
use tracing::{debug, info, instrument};

use super::error::Result;
use super::transport::HttpClient;
use super::types::{IssueImportRequest, IssueImportStatusResponse};

/// The issue import API client.
#[derive(Debug)]
pub struct ApiClient {
    /// The HTTP transport.
    http: HttpClient,
}

impl ApiClient {
    /// Create a client on top of a configured transport.
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// Create a client with default transport settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is not a valid header value or the HTTP
    /// client cannot be built.
    pub fn with_token(token: &str) -> Result<Self> {
        Ok(Self::new(HttpClient::new(token)?))
    }

    /// Start an issue import.
    ///
    /// Calls `POST /repos/{owner}/{repo}/import/issues`. GitHub answers with
    /// `202 Accepted` and a `pending` status.
    ///
    /// # Errors
    ///
    /// Transport and HTTP status errors are returned unchanged; a response
    /// that does not match the schema is a validation error.
    #[instrument(skip(self, request), fields(owner = %owner, repo = %repo))]
    pub fn import_issue(
        &self,
        owner: &str,
        repo: &str,
        request: &IssueImportRequest,
    ) -> Result<IssueImportStatusResponse> {
        debug!("Starting issue import: {}", request.issue());

        let body = request.to_json()?;
        let response = self.http.post(&import_issues_path(owner, repo), body)?;
        let status = IssueImportStatusResponse::from_json(response.body())?;

        info!("Issue import {} is {}", status.id(), status.status());
        Ok(status)
    }

    /// Check the status of one import.
    ///
    /// `url` is the absolute status URL returned by [`import_issue`] or
    /// [`get_status_multiple`], as a string or an [`HttpUrl`].
    ///
    /// [`import_issue`]: Self::import_issue
    /// [`get_status_multiple`]: Self::get_status_multiple
    /// [`HttpUrl`]: super::types::HttpUrl
    #[instrument(skip(self, url), fields(url = %url.as_ref()))]
    pub fn get_status(&self, url: impl AsRef<str>) -> Result<IssueImportStatusResponse> {
        let response = self.http.get(url.as_ref(), &[])?;
        let status = IssueImportStatusResponse::from_json(response.body())?;

        debug!("Issue import {} is {}", status.id(), status.status());
        Ok(status)
    }

    /// List the imports started since a point in time.
    ///
    /// Calls `GET /repos/{owner}/{repo}/import/issues?since=...`. Each element
    /// is validated on its own and one invalid element fails the whole call.
    #[instrument(skip(self, since), fields(owner = %owner, repo = %repo))]
    pub fn get_status_multiple<Tz>(
        &self,
        owner: &str,
        repo: &str,
        since: DateTime<Tz>,
    ) -> Result<Vec<IssueImportStatusResponse>>
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        let since = format_since(&since);
        debug!("Listing issue imports since {}", since);

        let response = self
            .http
            .get(&import_issues_path(owner, repo), &[("since", since.as_str())])?;
        let statuses = IssueImportStatusResponse::list_from_json(response.body())?;

        debug!("Found {} issue imports", statuses.len());
        Ok(statuses)
    }

    /// The underlying transport.
    pub fn http(&self) -> &HttpClient {
        &self.http
    }
}

fn import_issues_path(owner: &str, repo: &str) -> String {
    format!(
        "/repos/{}/{}/import/issues",
        urlencoding::encode(owner),
        urlencoding::encode(repo)
    )
}

/// ISO 8601 with the caller's offset, e.g. `2024-03-01T10:00:00.123456+00:00`.
fn format_since<Tz>(since: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    since.to_rfc3339_opts(SecondsFormat::AutoSi, false)
}
