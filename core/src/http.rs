//! Request and response values exchanged with the transport.
//!
//! # Design
//! `RequestDescriptor` is what a resource service hands to the transport: a
//! method, a server-relative path, an optional JSON payload, header overrides
//! and query parameters. The transport resolves it into an `HttpRequest`
//! (absolute URL, final header set, encoded body) which the authenticator
//! decorates before it goes on the wire. The buffered reply comes back as an
//! `HttpResponse`. All three are plain data so that path normalization,
//! decoration and status interpretation can be tested without a network.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::error::{ApiError, Result};

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// Whether requests with this method send a JSON body.
    pub fn carries_body(self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One HTTP exchange as described by a caller, before the transport resolves
/// it against the base URL.
///
/// Built with consuming methods and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    pub method: HttpMethod,
    pub path: String,
    pub payload: Option<serde_json::Value>,
    pub headers: Vec<(String, String)>,
    pub query: BTreeMap<String, String>,
}

impl RequestDescriptor {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            payload: None,
            headers: Vec::new(),
            query: BTreeMap::new(),
        }
    }

    /// Attach a JSON payload. Only POST, PUT and PATCH carry one.
    pub fn payload<P: Serialize + ?Sized>(mut self, payload: &P) -> Result<Self> {
        if !self.method.carries_body() {
            return Err(ApiError::InvalidRequest(format!(
                "{} requests do not carry a body",
                self.method
            )));
        }
        let value = serde_json::to_value(payload).map_err(ApiError::SerializationError)?;
        self.payload = Some(value);
        Ok(self)
    }

    /// Add a header that overrides anything the transport or the
    /// authenticator set under the same name.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn query<I, K, V>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.query
            .extend(params.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// The path the request is actually issued against.
    ///
    /// Every route except creation (POST) must end in a slash on the AWX API,
    /// so one is appended when missing.
    pub fn normalized_path(&self) -> String {
        if self.method != HttpMethod::Post && !self.path.ends_with('/') {
            format!("{}/", self.path)
        } else {
            self.path.clone()
        }
    }
}

/// A fully resolved outgoing request.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    /// Set a header, replacing any existing value under the same
    /// (case-insensitive) name.
    pub fn set_header(&mut self, name: &str, value: impl Into<String>) {
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        self.headers.push((name.to_string(), value.into()));
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// A response whose body has been fully buffered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..=299).contains(&self.status)
    }

    /// Body as text, for diagnostics.
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}
