//! The shared client handle and the contract every endpoint implements.
//!
//! # Design
//! `Client` holds the base URL, default headers and a shared `Transport`. It
//! carries no per-request state: endpoint builders borrow it, describe their
//! request as an `HttpRequest`, and hand it back to `Client::perform` for
//! execution. Each builder's `parse_response` decides how status codes map to
//! results, using the helpers at the bottom of this module.

use std::sync::Arc;
use std::time::Instant;

use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::{ApiError, DeleteOutcome, ErrorDetails};
use crate::http::{HttpRequest, HttpResponse, Transport, UreqTransport};

/// A request that can be built as plain data and decoded from a response.
pub trait Endpoint {
    type Response;

    fn build_request(&self) -> Result<HttpRequest, ApiError>;

    fn parse_response(&self, response: HttpResponse) -> Result<Self::Response, ApiError>;
}

/// Handle to a cluster. Cheap to clone; clones share the transport.
#[derive(Debug, Clone)]
pub struct Client {
    base_url: String,
    transport: Arc<dyn Transport>,
    default_headers: Vec<(String, String)>,
}

impl Client {
    /// Client using the default blocking transport.
    pub fn new(base_url: &str) -> Self {
        Self::with_transport(base_url, Arc::new(UreqTransport::default()))
    }

    pub fn with_transport(base_url: &str, transport: Arc<dyn Transport>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            transport,
            default_headers: Vec::new(),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        let base_url = config.base_url()?;
        let transport = Arc::new(UreqTransport::new(config.timeout()));
        Ok(Self {
            base_url,
            transport,
            default_headers: config.default_headers(),
        })
    }

    /// Replace the transport, keeping URL and headers.
    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = transport;
        self
    }

    /// Add a header sent with every request.
    pub fn default_header(mut self, name: &str, value: &str) -> Self {
        self.default_headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Execute a request as-is. Per-request headers win over defaults.
    pub fn perform(&self, mut request: HttpRequest) -> Result<HttpResponse, ApiError> {
        for (name, value) in &self.default_headers {
            if request.header(name).is_none() {
                request.headers.push((name.clone(), value.clone()));
            }
        }

        let started = Instant::now();
        let response = self
            .transport
            .perform(&self.base_url, &request)
            .map_err(|err| {
                warn!(method = %request.method, path = %request.path, error = %err, "request failed");
                err
            })?;
        let elapsed_ms = started.elapsed().as_millis() as u64;
        if response.is_success() {
            debug!(method = %request.method, path = %request.path, status = response.status, elapsed_ms, "request completed");
        } else {
            warn!(method = %request.method, path = %request.path, status = response.status, elapsed_ms, "request returned error status");
        }
        Ok(response)
    }

    /// Build, execute and decode an endpoint.
    pub fn send<E: Endpoint + ?Sized>(&self, endpoint: &E) -> Result<E::Response, ApiError> {
        let request = endpoint.build_request()?;
        let response = self.perform(request)?;
        endpoint.parse_response(response)
    }
}

/// Map non-2xx statuses to `ApiError`, attaching the engine error if the body
/// carries one.
pub fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    let details = ErrorDetails::from_body(&response.body);
    if response.status == 404 {
        return Err(ApiError::NotFound { details });
    }
    Err(ApiError::HttpError {
        status: response.status,
        details,
        body: response.body.clone(),
    })
}

/// Deserialize the body regardless of status.
pub fn decode<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, ApiError> {
    serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

/// Check the status, then deserialize the body.
pub fn decode_success<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, ApiError> {
    check_status(response)?;
    decode(response)
}

/// Decode a delete-style response where 404 still carries a body.
///
/// A 404 whose body does not decode into `T` is reported as a plain
/// `NotFound` error.
pub fn decode_delete<T: DeserializeOwned>(response: &HttpResponse) -> Result<DeleteOutcome<T>, ApiError> {
    if response.status == 404 {
        let error = ApiError::NotFound {
            details: ErrorDetails::from_body(&response.body),
        };
        return match decode(response) {
            Ok(decoded) => Ok(DeleteOutcome::NotFound {
                response: decoded,
                error,
            }),
            Err(_) => Err(error),
        };
    }
    decode_success(response).map(DeleteOutcome::Deleted)
}

/// Interpret a HEAD response: 200 means present, 404 absent.
pub fn exists_from_status(response: &HttpResponse) -> Result<bool, ApiError> {
    match response.status {
        200 => Ok(true),
        404 => Ok(false),
        status => Err(ApiError::HttpError {
            status,
            details: None,
            body: response.body.clone(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use serde::Deserialize;

    use super::*;
    use crate::http::{HttpMethod, TransportError};

    #[derive(Debug)]
    struct Canned {
        response: HttpResponse,
        seen: Mutex<Vec<HttpRequest>>,
    }

    impl Transport for Canned {
        fn perform(&self, _base_url: &str, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
            self.seen.lock().unwrap().push(request.clone());
            Ok(self.response.clone())
        }
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Ack {
        acknowledged: bool,
    }

    #[test]
    fn check_status_maps_404_to_not_found() {
        let response = HttpResponse::new(404, r#"{"error":{"type":"index_not_found_exception","reason":"no such index"},"status":404}"#);
        let err = check_status(&response).unwrap_err();
        assert_eq!(err.details().unwrap().kind, "index_not_found_exception");
        assert!(err.is_not_found());
    }

    #[test]
    fn check_status_maps_other_errors() {
        let err = check_status(&HttpResponse::new(500, "oops")).unwrap_err();
        match err {
            ApiError::HttpError { status, details, body } => {
                assert_eq!(status, 500);
                assert!(details.is_none());
                assert_eq!(body, "oops");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn decode_success_reports_bad_json() {
        let err = decode_success::<Ack>(&HttpResponse::new(200, "not json")).unwrap_err();
        assert!(matches!(err, ApiError::DeserializationError(_)));
    }

    #[test]
    fn decode_delete_distinguishes_outcomes() {
        let ok: DeleteOutcome<Ack> = decode_delete(&HttpResponse::new(200, r#"{"acknowledged":true}"#)).unwrap();
        assert!(!ok.is_not_found());

        let missing: DeleteOutcome<Ack> =
            decode_delete(&HttpResponse::new(404, r#"{"acknowledged":false}"#)).unwrap();
        assert!(missing.is_not_found());
        assert_eq!(missing.response(), &Ack { acknowledged: false });

        let undecodable = decode_delete::<Ack>(&HttpResponse::new(404, "")).unwrap_err();
        assert!(undecodable.is_not_found());

        let failed = decode_delete::<Ack>(&HttpResponse::new(500, "{}")).unwrap_err();
        assert_eq!(failed.status(), Some(500));
    }

    #[test]
    fn exists_from_status_values() {
        assert!(exists_from_status(&HttpResponse::new(200, "")).unwrap());
        assert!(!exists_from_status(&HttpResponse::new(404, "")).unwrap());
        assert!(exists_from_status(&HttpResponse::new(403, "")).is_err());
    }

    #[test]
    fn perform_adds_default_headers_without_overriding() {
        let transport = Arc::new(Canned {
            response: HttpResponse::new(200, "{}"),
            seen: Mutex::new(Vec::new()),
        });
        let client = Client::with_transport("http://localhost:9200/", transport.clone())
            .default_header("authorization", "Basic abc")
            .default_header("x-opaque-id", "default");
        assert_eq!(client.base_url(), "http://localhost:9200");

        let mut request = HttpRequest::new(HttpMethod::Get, "/");
        request.set_header("X-Opaque-Id", "mine");
        client.perform(request).unwrap();

        let seen = transport.seen.lock().unwrap();
        assert_eq!(seen[0].header("authorization"), Some("Basic abc"));
        assert_eq!(seen[0].header("x-opaque-id"), Some("mine"));
        assert_eq!(seen[0].headers.len(), 2);
    }

    #[test]
    fn from_config_validates_url() {
        assert!(Client::from_config(&ClientConfig::new("::bad::")).is_err());
        let client = Client::from_config(&ClientConfig::new("http://example.com:9200/")).unwrap();
        assert_eq!(client.base_url(), "http://example.com:9200");
    }
}
