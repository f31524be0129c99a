//! HTTP request/response types and the transport that executes them.
//!
//! # Design
//! Endpoint builders describe requests as plain data (`HttpRequest`) and
//! decode plain-data responses (`HttpResponse`). Executing the round-trip is
//! the job of a `Transport`, so builders stay deterministic and can be tested
//! without a network. `UreqTransport` is the blocking implementation the
//! client uses by default; tests swap in recording or canned transports.
//!
//! Paths are relative to the cluster base URL (`/_cluster/health`); query
//! parameters are kept apart from the path so they can be inspected by key.

use std::fmt;
use std::time::Duration;

use serde::Serialize;
use thiserror::Error;

use crate::error::ApiError;
use crate::params::QueryParams;

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Head,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Head => "HEAD",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An HTTP request described as plain data.
///
/// Built by each endpoint's `build_request`. The transport joins `path` and
/// `params` onto the client's base URL when it executes the request.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub path: String,
    pub params: QueryParams,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
    /// Cap on the number of response bytes read, if any.
    pub max_response_size: Option<u64>,
}

impl HttpRequest {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            params: QueryParams::new(),
            headers: Vec::new(),
            body: None,
            max_response_size: None,
        }
    }

    /// Serialize `value` as the JSON body and set the content type.
    pub fn json_body<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), ApiError> {
        let body =
            serde_json::to_string(value).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        self.set_header("content-type", "application/json");
        self.body = Some(body);
        Ok(())
    }

    /// Use a pre-encoded newline-delimited JSON body.
    pub fn ndjson_body(&mut self, body: String) {
        self.set_header("content-type", "application/x-ndjson");
        self.body = Some(body);
    }

    /// Set a header, replacing any previous value with the same name.
    pub fn set_header(&mut self, name: &str, value: &str) {
        self.headers.retain(|(k, _)| !k.eq_ignore_ascii_case(name));
        self.headers.push((name.to_string(), value.to_string()));
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    /// Path plus encoded query string, e.g. `/_search?scroll=5m`.
    pub fn path_and_query(&self) -> String {
        if self.params.is_empty() {
            self.path.clone()
        } else {
            format!("{}?{}", self.path, self.params.encode())
        }
    }

    /// Absolute URL against `base_url`.
    pub fn url(&self, base_url: &str) -> String {
        format!("{}{}", base_url.trim_end_matches('/'), self.path_and_query())
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case(name))
        .map(|(_, v)| v.as_str())
}

/// Failures that prevented an HTTP response from being obtained.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("connection failed: {0}")]
    Connection(String),
    #[error("request timed out")]
    Timeout,
    #[error("{0}")]
    Other(String),
}

/// Executes `HttpRequest` values against a cluster.
pub trait Transport: Send + Sync + fmt::Debug {
    fn perform(&self, base_url: &str, request: &HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// Blocking transport backed by a shared `ureq::Agent`.
///
/// Non-2xx statuses are returned as responses, not errors, so the endpoint
/// decides how to interpret them.
#[derive(Debug, Clone)]
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new(timeout: Option<Duration>) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(timeout)
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new(None)
    }
}

fn with_headers<B>(
    mut builder: ureq::RequestBuilder<B>,
    headers: &[(String, String)],
) -> ureq::RequestBuilder<B> {
    for (name, value) in headers {
        builder = builder.header(name.as_str(), value.as_str());
    }
    builder
}

fn map_ureq_error(err: ureq::Error) -> TransportError {
    match &err {
        ureq::Error::Timeout(_) => TransportError::Timeout,
        ureq::Error::HostNotFound | ureq::Error::ConnectionFailed | ureq::Error::Io(_) => {
            TransportError::Connection(err.to_string())
        }
        _ => TransportError::Other(err.to_string()),
    }
}

impl Transport for UreqTransport {
    fn perform(&self, base_url: &str, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        let url = request.url(base_url);
        let headers = &request.headers;
        let body = request.body.as_deref().map(str::as_bytes);

        let result = match (request.method, body) {
            (HttpMethod::Get, None) => with_headers(self.agent.get(&url), headers).call(),
            (HttpMethod::Get, Some(body)) => {
                with_headers(self.agent.get(&url).force_send_body(), headers).send(body)
            }
            (HttpMethod::Head, _) => with_headers(self.agent.head(&url), headers).call(),
            (HttpMethod::Delete, None) => with_headers(self.agent.delete(&url), headers).call(),
            (HttpMethod::Delete, Some(body)) => {
                with_headers(self.agent.delete(&url).force_send_body(), headers).send(body)
            }
            (HttpMethod::Post, None) => with_headers(self.agent.post(&url), headers).send_empty(),
            (HttpMethod::Post, Some(body)) => with_headers(self.agent.post(&url), headers).send(body),
            (HttpMethod::Put, None) => with_headers(self.agent.put(&url), headers).send_empty(),
            (HttpMethod::Put, Some(body)) => with_headers(self.agent.put(&url), headers).send(body),
        };
        let mut response = result.map_err(map_ureq_error)?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(k, v)| v.to_str().ok().map(|v| (k.as_str().to_string(), v.to_string())))
            .collect();
        let body = if request.method == HttpMethod::Head {
            String::new()
        } else {
            let read = match request.max_response_size {
                Some(limit) => response.body_mut().with_config().limit(limit).read_to_string(),
                None => response.body_mut().read_to_string(),
            };
            read.map_err(map_ureq_error)?
        };

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
