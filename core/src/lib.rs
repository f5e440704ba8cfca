//! Blocking client for the AWX automation-platform REST API.
//!
//! # Overview
//! Translates method calls into authenticated requests against the
//! versioned `/api/v2/` API, checks required parameters before sending,
//! decodes JSON replies into typed results, and polls long-running jobs
//! until they finish.
//!
//! # Design
//! - `Transport` performs every exchange: path normalization, URL and query
//!   encoding, JSON bodies, credentials, status interpretation and decoding.
//!   It is immutable after construction and safe to share between threads.
//! - `Authenticator` is the only seam for credentials (`BasicAuth`,
//!   `TokenAuth`).
//! - Resource services (`job_templates()`, `jobs()`, `inventories()`,
//!   `hosts()`, `groups()`, `organizations()`) map domain calls to endpoint
//!   paths and payload shapes and nothing else.
//! - `Poller` waits on a predicate with a deadline; each predicate run gets a
//!   cancellable `Context` so a stalled call is cut off at the deadline.

pub mod auth;
pub mod client;
pub mod config;
pub mod context;
pub mod error;
pub mod group;
pub mod host;
pub mod http;
pub mod inventory;
pub mod job;
pub mod job_template;
pub mod organization;
pub mod poll;
pub mod transport;
pub mod types;
pub mod validation;

pub use auth::{Authenticator, BasicAuth, Credentials, TokenAuth};
pub use client::Client;
pub use config::{ClientConfig, ClientConfigBuilder};
pub use context::Context;
pub use error::{ApiError, Result};
pub use http::{HttpMethod, HttpRequest, HttpResponse, RequestDescriptor};
pub use job::{check_job_status, wait_for_success_job_finish, wait_for_success_job_finish_with};
pub use poll::{wait_for, Poller, POLL_INTERVAL};
pub use transport::Transport;
pub use types::{
    CancelJobResponse, Group, Host, HostSummary, Inventory, InventoryUpdate, Job, JobEvent,
    JobLaunch, JobStatus, JobTemplate, Organization, Page, Payload, QueryParams,
};
pub use validation::validate_params;
