//! Issue import API request and response types.
//!
//! These types model the payloads of the GitHub issue import API
//! (`application/vnd.github.golden-comet-preview+json`). Every instance is
//! validated when it is built or parsed and cannot be modified afterwards.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeZone};
use serde::de::{self, DeserializeOwned};
use serde::{Deserialize, Deserializer, Serialize};
use url::Url;

use super::error::ValidationError;

/// A timezone-aware timestamp as sent and received by the API.
pub type Timestamp = DateTime<FixedOffset>;

/// Parse a timestamp that must carry an explicit UTC offset.
///
/// Accepts RFC 3339 (`2015-10-02T07:19:00-07:00`, `2014-01-01T12:34:58Z`).
/// Timestamps without an offset are rejected.
pub fn parse_timestamp(raw: &str) -> Result<Timestamp, ValidationError> {
    parse_aware(raw).map_err(|message| ValidationError::new(".", message))
}

fn parse_aware(raw: &str) -> Result<Timestamp, String> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed);
    }

    let naive = raw.parse::<NaiveDateTime>().is_ok()
        || NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f").is_ok();
    if naive {
        Err(format!("timestamp `{}` has no UTC offset", raw))
    } else {
        Err(format!(
            "invalid timestamp `{}`, expected RFC 3339 with a UTC offset",
            raw
        ))
    }
}

/// Deserialize an optional timestamp, rejecting naive values.
fn deserialize_aware<'de, D>(deserializer: D) -> Result<Option<Timestamp>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    raw.map(|s| parse_aware(&s).map_err(de::Error::custom))
        .transpose()
}

/// Parse JSON text into `T`, reporting the path of the first invalid field.
fn from_json_text<T: DeserializeOwned>(text: &str) -> Result<T, ValidationError> {
    let mut deserializer = serde_json::Deserializer::from_str(text);
    let value = serde_path_to_error::deserialize(&mut deserializer)?;
    deserializer
        .end()
        .map_err(|e| ValidationError::new(".", e.to_string()))?;
    Ok(value)
}

fn from_json_value<T: DeserializeOwned>(value: serde_json::Value) -> Result<T, ValidationError> {
    Ok(serde_path_to_error::deserialize(value)?)
}

/// An absolute `http` or `https` URL with a host.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct HttpUrl(Url);

impl HttpUrl {
    /// Parse and validate a URL.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        check_http_url(raw)
            .map(HttpUrl)
            .map_err(|message| ValidationError::new(".", message))
    }

    /// The URL as a string.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// The underlying parsed URL.
    pub fn as_url(&self) -> &Url {
        &self.0
    }
}

fn check_http_url(raw: &str) -> Result<Url, String> {
    let url = Url::parse(raw).map_err(|e| format!("invalid URL `{}`: {}", raw, e))?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(format!(
            "URL `{}` must use the http or https scheme",
            raw
        ));
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(format!("URL `{}` has no host", raw));
    }
    Ok(url)
}

impl FromStr for HttpUrl {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        HttpUrl::parse(s)
    }
}

impl AsRef<str> for HttpUrl {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for HttpUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for HttpUrl {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        check_http_url(&raw).map(HttpUrl).map_err(de::Error::custom)
    }
}

/// An issue to import.
///
/// `title` and `body` are required; everything else is omitted from the
/// request when unset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    title: String,
    body: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_aware"
    )]
    created_at: Option<Timestamp>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_aware"
    )]
    updated_at: Option<Timestamp>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_aware"
    )]
    closed_at: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    assignee: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    milestone: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    closed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    labels: Option<Vec<String>>,
}

impl Issue {
    /// Start building an issue with its required fields.
    pub fn builder(title: impl Into<String>, body: impl Into<String>) -> IssueBuilder {
        IssueBuilder {
            issue: Issue {
                title: title.into(),
                body: body.into(),
                created_at: None,
                updated_at: None,
                closed_at: None,
                assignee: None,
                milestone: None,
                closed: None,
                labels: None,
            },
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn created_at(&self) -> Option<Timestamp> {
        self.created_at
    }

    pub fn updated_at(&self) -> Option<Timestamp> {
        self.updated_at
    }

    pub fn closed_at(&self) -> Option<Timestamp> {
        self.closed_at
    }

    /// Login of the user the issue is assigned to.
    pub fn assignee(&self) -> Option<&str> {
        self.assignee.as_deref()
    }

    /// Number of the milestone the issue belongs to.
    pub fn milestone(&self) -> Option<u64> {
        self.milestone
    }

    pub fn closed(&self) -> Option<bool> {
        self.closed
    }

    pub fn labels(&self) -> Option<&[String]> {
        self.labels.as_deref()
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}

/// Builder for [`Issue`].
#[derive(Debug, Clone)]
pub struct IssueBuilder {
    issue: Issue,
}

impl IssueBuilder {
    pub fn created_at<Tz: TimeZone>(mut self, at: DateTime<Tz>) -> Self {
        self.issue.created_at = Some(at.fixed_offset());
        self
    }

    pub fn updated_at<Tz: TimeZone>(mut self, at: DateTime<Tz>) -> Self {
        self.issue.updated_at = Some(at.fixed_offset());
        self
    }

    pub fn closed_at<Tz: TimeZone>(mut self, at: DateTime<Tz>) -> Self {
        self.issue.closed_at = Some(at.fixed_offset());
        self
    }

    pub fn assignee(mut self, login: impl Into<String>) -> Self {
        self.issue.assignee = Some(login.into());
        self
    }

    pub fn milestone(mut self, number: u64) -> Self {
        self.issue.milestone = Some(number);
        self
    }

    pub fn closed(mut self, closed: bool) -> Self {
        self.issue.closed = Some(closed);
        self
    }

    /// Set the labels, keeping their order.
    pub fn labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.issue.labels = Some(labels.into_iter().map(Into::into).collect());
        self
    }

    /// Append one label.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.issue
            .labels
            .get_or_insert_with(Vec::new)
            .push(label.into());
        self
    }

    pub fn build(self) -> Issue {
        self.issue
    }
}

/// A comment to import along with its issue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    body: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_aware"
    )]
    created_at: Option<Timestamp>,
}

impl Comment {
    /// A comment with only a body.
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            created_at: None,
        }
    }

    /// A comment with a creation time.
    pub fn with_created_at<Tz: TimeZone>(body: impl Into<String>, at: DateTime<Tz>) -> Self {
        Self {
            body: body.into(),
            created_at: Some(at.fixed_offset()),
        }
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn created_at(&self) -> Option<Timestamp> {
        self.created_at
    }
}

/// Body of `POST /repos/{owner}/{repo}/import/issues`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueImportRequest {
    issue: Issue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    comments: Option<Vec<Comment>>,
}

impl IssueImportRequest {
    /// An import request without comments.
    pub fn new(issue: Issue) -> Self {
        Self {
            issue,
            comments: None,
        }
    }

    /// An import request with comments, kept in the given order.
    pub fn with_comments(issue: Issue, comments: impl IntoIterator<Item = Comment>) -> Self {
        Self {
            issue,
            comments: Some(comments.into_iter().collect()),
        }
    }

    /// Parse and validate a request from JSON text.
    pub fn from_json(text: &str) -> Result<Self, ValidationError> {
        from_json_text(text)
    }

    /// Validate a request from a JSON value.
    pub fn from_value(value: serde_json::Value) -> Result<Self, ValidationError> {
        from_json_value(value)
    }

    /// Serialize to JSON text. Unset optional fields are omitted, never `null`.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn to_value(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }

    pub fn issue(&self) -> &Issue {
        &self.issue
    }

    pub fn comments(&self) -> Option<&[Comment]> {
        self.comments.as_deref()
    }
}

/// One field-level failure reported for a failed import.
///
/// `field` and `value` must be present in the payload but may be `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueImportError {
    location: String,
    resource: String,
    #[serde(deserialize_with = "Option::deserialize")]
    field: Option<String>,
    #[serde(deserialize_with = "Option::deserialize")]
    value: Option<String>,
    code: String,
}

impl IssueImportError {
    /// Where in the request the failure happened, e.g. `/issue/comments[0]`.
    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    pub fn code(&self) -> &str {
        &self.code
    }
}

impl fmt::Display for IssueImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} at {}", self.resource, self.code, self.location)?;
        if let Some(field) = &self.field {
            write!(f, " (field `{}`)", field)?;
        }
        Ok(())
    }
}

/// State of an import job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueImportStatus {
    Pending,
    Imported,
    Failed,
}

impl IssueImportStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueImportStatus::Pending => "pending",
            IssueImportStatus::Imported => "imported",
            IssueImportStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for IssueImportStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IssueImportStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(IssueImportStatus::Pending),
            "imported" => Ok(IssueImportStatus::Imported),
            "failed" => Ok(IssueImportStatus::Failed),
            other => Err(ValidationError::new(
                ".",
                format!(
                    "unknown status `{}`, expected one of `pending`, `imported`, `failed`",
                    other
                ),
            )),
        }
    }
}

/// Status of an import job.
///
/// Returned by `POST /repos/{owner}/{repo}/import/issues`, by the job's own
/// status URL, and as array elements of `GET /repos/{owner}/{repo}/import/issues`.
/// `issue_url` is normally set once the job is `imported` and `errors` once it
/// has `failed`; neither pairing is enforced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueImportStatusResponse {
    id: u64,
    status: IssueImportStatus,
    url: HttpUrl,
    import_issues_url: HttpUrl,
    repository_url: HttpUrl,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    issue_url: Option<HttpUrl>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_aware"
    )]
    created_at: Option<Timestamp>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_aware"
    )]
    updated_at: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    errors: Option<Vec<IssueImportError>>,
}

impl IssueImportStatusResponse {
    /// Parse and validate a status from JSON text.
    pub fn from_json(text: &str) -> Result<Self, ValidationError> {
        from_json_text(text)
    }

    /// Validate a status from a JSON value.
    pub fn from_value(value: serde_json::Value) -> Result<Self, ValidationError> {
        from_json_value(value)
    }

    /// Parse a JSON array of statuses, validating each element on its own.
    ///
    /// The first invalid element fails the whole list; its index is part of
    /// the reported path.
    pub fn list_from_json(text: &str) -> Result<Vec<Self>, ValidationError> {
        let items: Vec<serde_json::Value> = from_json_text(text)?;
        items
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                Self::from_value(item).map_err(|e| {
                    let path = match e.path() {
                        "." => format!("[{}]", index),
                        inner => format!("[{}].{}", index, inner),
                    };
                    ValidationError::new(path, e.message())
                })
            })
            .collect()
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn status(&self) -> IssueImportStatus {
        self.status
    }

    /// This job's status URL, usable with `get_status`.
    pub fn url(&self) -> &HttpUrl {
        &self.url
    }

    pub fn import_issues_url(&self) -> &HttpUrl {
        &self.import_issues_url
    }

    pub fn repository_url(&self) -> &HttpUrl {
        &self.repository_url
    }

    /// URL of the created issue, once imported.
    pub fn issue_url(&self) -> Option<&HttpUrl> {
        self.issue_url.as_ref()
    }

    pub fn created_at(&self) -> Option<Timestamp> {
        self.created_at
    }

    pub fn updated_at(&self) -> Option<Timestamp> {
        self.updated_at
    }

    /// Field-level failures, once failed.
    pub fn errors(&self) -> Option<&[IssueImportError]> {
        self.errors.as_deref()
    }

    pub fn is_pending(&self) -> bool {
        self.status == IssueImportStatus::Pending
    }

    pub fn is_imported(&self) -> bool {
        self.status == IssueImportStatus::Imported
    }

    pub fn is_failed(&self) -> bool {
        self.status == IssueImportStatus::Failed
    }
}

impl fmt::Display for IssueImportStatusResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "import #{}: {}", self.id, self.status)
    }
}
