//! Blocking HTTP transport for the AWX API.
//!
//! # Design
//! `Transport` holds the base URL, the authenticator and a shared
//! `ureq::Agent`; nothing in it changes after construction, so clones can be
//! used from any number of threads at once. Each call is split the same way
//! every time:
//!
//! 1. `build_request` resolves a `RequestDescriptor` into an `HttpRequest`
//!    (path normalization, URL and query encoding, JSON body, headers,
//!    credentials).
//! 2. `send` performs the exchange on a worker thread bound to the caller's
//!    `Context` and buffers the whole body. Cancelling the context abandons
//!    the exchange immediately.
//! 3. `interpret` maps the buffered response to a decoded value or an error.
//!
//! Steps 1 and 3 are pure and tested without a network.

use std::fmt;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};
use url::Url;

use crate::auth::Authenticator;
use crate::config::ClientConfig;
use crate::context::Context;
use crate::error::{ApiError, Result};
use crate::http::{HttpMethod, HttpRequest, HttpResponse, RequestDescriptor};
use crate::types::QueryParams;

/// How often a waiting caller looks at its context while an exchange runs.
const CANCEL_CHECK_INTERVAL: Duration = Duration::from_millis(10);

#[derive(Clone)]
pub struct Transport {
    base_url: String,
    auth: Arc<dyn Authenticator>,
    agent: ureq::Agent,
    timeout: Duration,
    user_agent: String,
}

impl Transport {
    pub fn new(config: &ClientConfig) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self::with_agent(config, agent)
    }

    /// Use an existing agent, sharing its connection pool.
    pub fn with_agent(config: &ClientConfig, agent: ureq::Agent) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            auth: config.credentials.authenticator(),
            agent,
            timeout: config.timeout,
            user_agent: config.user_agent.clone(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn get<R: DeserializeOwned>(
        &self,
        ctx: &Context,
        path: &str,
        query: &QueryParams,
    ) -> Result<Option<R>> {
        let request = RequestDescriptor::new(HttpMethod::Get, path).query(query.clone());
        self.execute(ctx, &request)
    }

    pub fn post<P, R>(&self, ctx: &Context, path: &str, payload: Option<&P>) -> Result<Option<R>>
    where
        P: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.send_with_payload(ctx, HttpMethod::Post, path, payload)
    }

    pub fn put<P, R>(&self, ctx: &Context, path: &str, payload: Option<&P>) -> Result<Option<R>>
    where
        P: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.send_with_payload(ctx, HttpMethod::Put, path, payload)
    }

    pub fn patch<P, R>(&self, ctx: &Context, path: &str, payload: Option<&P>) -> Result<Option<R>>
    where
        P: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        self.send_with_payload(ctx, HttpMethod::Patch, path, payload)
    }

    /// DELETE answers with an empty body on AWX; whatever comes back is
    /// discarded.
    pub fn delete(&self, ctx: &Context, path: &str) -> Result<()> {
        let request = RequestDescriptor::new(HttpMethod::Delete, path);
        let request = self.build_request(&request)?;
        let response = self.send(ctx, &request)?;
        check_status(&response)
    }

    fn send_with_payload<P, R>(
        &self,
        ctx: &Context,
        method: HttpMethod,
        path: &str,
        payload: Option<&P>,
    ) -> Result<Option<R>>
    where
        P: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let mut request = RequestDescriptor::new(method, path);
        if let Some(payload) = payload {
            request = request.payload(payload)?;
        }
        self.execute(ctx, &request)
    }

    /// Perform one full exchange and decode a non-empty success body as `R`.
    pub fn execute<R: DeserializeOwned>(
        &self,
        ctx: &Context,
        request: &RequestDescriptor,
    ) -> Result<Option<R>> {
        let request = self.build_request(request)?;
        let response = self.send(ctx, &request)?;
        interpret(&response)
    }

    /// Resolve a descriptor into the request that goes on the wire.
    pub fn build_request(&self, descriptor: &RequestDescriptor) -> Result<HttpRequest> {
        let raw = format!("{}{}", self.base_url, descriptor.normalized_path());
        let mut url =
            Url::parse(&raw).map_err(|e| ApiError::InvalidRequest(format!("{raw}: {e}")))?;

        if !descriptor.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &descriptor.query {
                pairs.append_pair(key, value);
            }
        }

        let body = descriptor
            .payload
            .as_ref()
            .map(serde_json::to_vec)
            .transpose()
            .map_err(ApiError::SerializationError)?;

        let mut request = HttpRequest {
            method: descriptor.method,
            url: url.into(),
            headers: vec![
                ("accept".to_string(), "application/json".to_string()),
                ("user-agent".to_string(), self.user_agent.clone()),
            ],
            body,
        };
        if descriptor.method.carries_body() {
            request.set_header("content-type", "application/json");
        }

        self.auth.decorate(&mut request);

        for (name, value) in &descriptor.headers {
            request.set_header(name, value.clone());
        }
        Ok(request)
    }

    /// Execute `request` and buffer the whole response body.
    ///
    /// The exchange runs on a worker thread while this thread watches the
    /// context. Cancelling the context returns `Cancelled` at once; the
    /// abandoned exchange ends on its own timeout and its response is
    /// dropped unread. A passed deadline surfaces as the exchange's own
    /// timeout error.
    pub fn send(&self, ctx: &Context, request: &HttpRequest) -> Result<HttpResponse> {
        if ctx.is_cancelled() {
            return Err(ApiError::Cancelled);
        }
        let timeout = ctx
            .remaining()
            .map_or(self.timeout, |left| left.min(self.timeout));

        debug!(method = %request.method, url = %request.url, "sending request");

        let (tx, rx) = mpsc::sync_channel(1);
        let agent = self.agent.clone();
        let outgoing = request.clone();
        thread::Builder::new()
            .name("awx-exchange".to_string())
            .spawn(move || {
                // The receiver is gone once the caller has cancelled.
                let _ = tx.send(exchange(&agent, &outgoing, timeout));
            })
            .map_err(|e| ApiError::TransportWorker(format!("failed to spawn exchange: {e}")))?;

        let response = loop {
            match rx.recv_timeout(CANCEL_CHECK_INTERVAL) {
                Ok(result) => break result?,
                Err(RecvTimeoutError::Timeout) => {
                    if ctx.is_cancel_requested() {
                        debug!(
                            method = %request.method,
                            url = %request.url,
                            "request cancelled in flight"
                        );
                        return Err(ApiError::Cancelled);
                    }
                }
                Err(RecvTimeoutError::Disconnected) => {
                    return Err(ApiError::TransportWorker("exchange panicked".to_string()));
                }
            }
        };

        debug!(status = response.status, bytes = response.body.len(), "response received");
        if !response.is_success() {
            warn!(
                method = %request.method,
                url = %request.url,
                status = response.status,
                "unexpected status"
            );
        }
        Ok(response)
    }
}

/// Perform one blocking exchange and buffer the whole body, however large.
///
/// The response is dropped before this returns, which hands the connection
/// back to the agent on every path.
fn exchange(agent: &ureq::Agent, request: &HttpRequest, timeout: Duration) -> Result<HttpResponse> {
    let url = request.url.as_str();
    let result = match request.method {
        HttpMethod::Get => prepare(agent.get(url), request, timeout).call(),
        HttpMethod::Delete => prepare(agent.delete(url), request, timeout).call(),
        HttpMethod::Post => send_body(prepare(agent.post(url), request, timeout), request),
        HttpMethod::Put => send_body(prepare(agent.put(url), request, timeout), request),
        HttpMethod::Patch => send_body(prepare(agent.patch(url), request, timeout), request),
    };

    let mut response = result.map_err(|e| {
        warn!(method = %request.method, url = %request.url, error = %e, "request failed");
        ApiError::NetworkError(e)
    })?;

    let status = response.status().as_u16();
    let body = response
        .body_mut()
        .with_config()
        .limit(u64::MAX)
        .read_to_vec()
        .map_err(ApiError::BodyReadError)?;
    Ok(HttpResponse { status, body })
}

impl fmt::Debug for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transport")
            .field("base_url", &self.base_url)
            .field("auth", &self.auth)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

fn prepare<B>(
    builder: ureq::RequestBuilder<B>,
    request: &HttpRequest,
    timeout: Duration,
) -> ureq::RequestBuilder<B> {
    let mut builder = builder
        .config()
        .http_status_as_error(false)
        .timeout_global(Some(timeout))
        .build();
    for (name, value) in &request.headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

fn send_body(
    builder: ureq::RequestBuilder<ureq::typestate::WithBody>,
    request: &HttpRequest,
) -> std::result::Result<ureq::http::Response<ureq::Body>, ureq::Error> {
    match &request.body {
        Some(body) => builder.send(body.as_slice()),
        None => builder.send_empty(),
    }
}

/// Map non-success status codes to `ApiError::HttpError`, keeping the raw
/// body text.
fn check_status(response: &HttpResponse) -> Result<()> {
    if response.is_success() {
        return Ok(());
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body_text(),
    })
}

/// Classify a buffered response and decode its body.
///
/// Empty success bodies yield `Ok(None)` and are never handed to the JSON
/// decoder.
pub fn interpret<R: DeserializeOwned>(response: &HttpResponse) -> Result<Option<R>> {
    check_status(response)?;
    if response.body.is_empty() {
        return Ok(None);
    }
    serde_json::from_slice(&response.body)
        .map(Some)
        .map_err(ApiError::DeserializationError)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn transport(base: &str) -> Transport {
        let config = ClientConfig::builder()
            .base_url(base)
            .token("tok")
            .user_agent("awx-core-test")
            .build()
            .unwrap();
        Transport::new(&config)
    }

    fn response(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            body: body.as_bytes().to_vec(),
        }
    }

    #[test]
    fn get_request_gets_trailing_slash_and_credentials() {
        let t = transport("http://localhost:3000/");
        let req = t
            .build_request(&RequestDescriptor::new(HttpMethod::Get, "/api/v2/jobs/5"))
            .unwrap();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.url, "http://localhost:3000/api/v2/jobs/5/");
        assert_eq!(req.header("authorization"), Some("Bearer tok"));
        assert_eq!(req.header("user-agent"), Some("awx-core-test"));
        assert!(req.header("content-type").is_none());
        assert!(req.body.is_none());
    }

    #[test]
    fn post_request_keeps_path_and_encodes_payload() {
        let t = transport("http://localhost:3000");
        let payload = json!({"name": "deploy", "inventory": 1, "extra_vars": {"a": [1, 2]}});
        let req = t
            .build_request(
                &RequestDescriptor::new(HttpMethod::Post, "/api/v2/job_templates")
                    .payload(&payload)
                    .unwrap(),
            )
            .unwrap();
        assert_eq!(req.url, "http://localhost:3000/api/v2/job_templates");
        assert_eq!(req.header("content-type"), Some("application/json"));
        let sent: Value = serde_json::from_slice(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(sent, payload);
    }

    #[test]
    fn base_path_prefix_is_kept() {
        let t = transport("https://tower.example.com/awx/");
        let req = t
            .build_request(&RequestDescriptor::new(HttpMethod::Get, "/api/v2/hosts/"))
            .unwrap();
        assert_eq!(req.url, "https://tower.example.com/awx/api/v2/hosts/");
    }

    #[test]
    fn query_is_form_encoded() {
        let t = transport("http://localhost:3000");
        let req = t
            .build_request(
                &RequestDescriptor::new(HttpMethod::Get, "/api/v2/hosts")
                    .query([("name", "web 1&2"), ("page_size", "50")]),
            )
            .unwrap();
        let url = Url::parse(&req.url).unwrap();
        assert_eq!(url.path(), "/api/v2/hosts/");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("name".to_string(), "web 1&2".to_string()),
                ("page_size".to_string(), "50".to_string()),
            ]
        );
    }

    #[test]
    fn caller_headers_override_defaults() {
        let t = transport("http://localhost:3000");
        let req = t
            .build_request(
                &RequestDescriptor::new(HttpMethod::Patch, "/api/v2/hosts/3")
                    .header("Content-Type", "application/merge-patch+json")
                    .header("X-Request-Id", "42"),
            )
            .unwrap();
        assert_eq!(req.header("content-type"), Some("application/merge-patch+json"));
        assert_eq!(req.header("x-request-id"), Some("42"));
        assert_eq!(
            req.headers
                .iter()
                .filter(|(k, _)| k.eq_ignore_ascii_case("content-type"))
                .count(),
            1
        );
    }

    #[test]
    fn malformed_base_url_is_a_construction_error() {
        let t = transport("not a url");
        let err = t
            .build_request(&RequestDescriptor::new(HttpMethod::Get, "/api/v2/jobs/"))
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidRequest(_)));
    }

    #[test]
    fn cancelled_context_fails_before_sending() {
        let t = transport("http://localhost:1");
        let ctx = Context::background();
        ctx.cancel();
        let req = t
            .build_request(&RequestDescriptor::new(HttpMethod::Get, "/api/v2/jobs/"))
            .unwrap();
        assert!(matches!(t.send(&ctx, &req), Err(ApiError::Cancelled)));
    }

    #[test]
    fn interpret_decodes_success_body() {
        let value: Option<Value> = interpret(&response(200, r#"{"job": 42}"#)).unwrap();
        assert_eq!(value, Some(json!({"job": 42})));
    }

    #[test]
    fn interpret_treats_empty_body_as_no_data() {
        let value: Option<Value> = interpret(&response(204, "")).unwrap();
        assert!(value.is_none());
    }

    #[test]
    fn interpret_keeps_raw_body_on_failure() {
        let err = interpret::<Value>(&response(500, "<html>oops</html>")).unwrap_err();
        match err {
            ApiError::HttpError { status, body } => {
                assert_eq!(status, 500);
                assert_eq!(body, "<html>oops</html>");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn interpret_reports_bad_json() {
        let err = interpret::<Value>(&response(200, "not json")).unwrap_err();
        assert!(matches!(err, ApiError::DeserializationError(_)));
    }

    #[test]
    fn interpret_rejects_partial_shape() {
        #[derive(Debug, serde::Deserialize)]
        #[allow(dead_code)]
        struct Strict {
            id: i64,
        }
        let err = interpret::<Strict>(&response(200, r#"{"id": "seven"}"#)).unwrap_err();
        assert!(matches!(err, ApiError::DeserializationError(_)));
    }
}
