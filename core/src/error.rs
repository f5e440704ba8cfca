//! Error types for the AWX API client.
//!
//! # Design
//! A single `ApiError` covers every failure a call can produce, from building
//! the URL to waiting on a job. Non-2xx responses all land in `HttpError`
//! with the raw status code and body text; the body is never parsed on that
//! path. Errors raised by a polling predicate are returned to the caller
//! unchanged.

use std::time::Duration;

use thiserror::Error;

use crate::types::JobStatus;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Errors returned by the transport, the resource services and the poller.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request could not be constructed (malformed base URL, body on a
    /// method that does not carry one).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(#[source] serde_json::Error),

    /// The exchange itself failed: DNS, connect, TLS or timeout.
    #[error("request failed: {0}")]
    NetworkError(#[source] ureq::Error),

    /// The caller's context was cancelled before the exchange completed.
    #[error("request cancelled")]
    Cancelled,

    /// The response body could not be fully read.
    #[error("error reading body: {0}")]
    BodyReadError(#[source] ureq::Error),

    /// The server returned a status outside 200..=299.
    #[error("response code {status}, resp: {body}")]
    HttpError { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("error unmarshal: {0}")]
    DeserializationError(#[source] serde_json::Error),

    /// Required payload fields were absent.
    #[error("mandatory input arguments are absent: {missing:?}")]
    ValidationError { missing: Vec<String> },

    /// A launch or relaunch answered without a usable job id.
    #[error("invalid job id {0}")]
    InvalidJobId(i64),

    /// The poller's deadline elapsed before the predicate resolved.
    #[error("a timeout occurred")]
    Timeout(Duration),

    /// The awaited job reached a terminal status other than `successful`.
    #[error("task finished with bad status: {0}")]
    JobFailed(JobStatus),

    /// The poller could not run or lost its predicate worker.
    #[error("poll worker failed: {0}")]
    PollWorker(String),

    /// The transport could not run or lost its exchange worker.
    #[error("transport worker failed: {0}")]
    TransportWorker(String),

    /// Client configuration is missing or malformed.
    #[error("configuration error: {0}")]
    ConfigError(String),
}

impl ApiError {
    /// Status code of an `HttpError`, if this is one.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::HttpError { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status_code() == Some(404)
    }

    /// True for poller deadlines and for exchanges that hit their own timeout.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout(_))
            || matches!(self, Self::NetworkError(ureq::Error::Timeout(_)))
    }
}
