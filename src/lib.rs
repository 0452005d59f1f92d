//! Typed client for the GitHub issue import API.
//!
//! Three blocking calls are provided by [`ApiClient`]: start an import,
//! check one import, and list imports since a point in time. Payloads are
//! validated on the way in and out.
//!
//! ```no_run
//! use github_issues_import::{ApiClient, Issue, IssueImportRequest};
//!
//! let client = ApiClient::with_token("ghp_...")?;
//! let request = IssueImportRequest::new(Issue::builder("Title", "Body").build());
//! let status = client.import_issue("octocat", "hello-world", &request)?;
//! let status = client.get_status(status.url())?;
//! println!("{}", status);
//! # Ok::<(), github_issues_import::ApiError>(())
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod logging;

pub use api::{
    ApiClient, ApiError, AuthScheme, Comment, EventHooks, HttpClient, HttpUrl, Issue,
    IssueImportError, IssueImportRequest, IssueImportStatus, IssueImportStatusResponse,
    ValidationError,
};
pub use config::Settings;
pub use error::Error;
