//! GitHub issue import API client and types.
//!
//! This module provides the interface for communicating with the issue import
//! REST API: the payload types, the HTTP transport and the client on top.

mod auth;
mod client;
pub mod error;
pub mod hooks;
mod transport;
mod types;

pub use auth::{Auth, AuthScheme};
pub use client::ApiClient;
pub use error::{ApiError, ValidationError};
pub use hooks::{ApiLogger, EventHooks, RequestRecord, ResponseRecord, TracingLogger};
pub use transport::{HttpClient, HttpClientBuilder, DEFAULT_ACCEPT, DEFAULT_BASE_URL};
pub use types::{
    parse_timestamp, Comment, HttpUrl, Issue, IssueBuilder, IssueImportError, IssueImportRequest,
    IssueImportStatus, IssueImportStatusResponse, Timestamp,
};
