//! Error types for the search engine client.
//!
//! # Design
//! `NotFound` gets a dedicated variant because callers frequently distinguish
//! "the resource does not exist" from "the server returned an unexpected
//! status." All other non-2xx responses land in `HttpError` with the raw
//! status code, the decoded engine error (when the body carries one) and the
//! body for debugging. Validation failures are raised before any request is
//! built and list every missing field at once.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::http::TransportError;

/// Errors returned by endpoint builders and the client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// One or more required fields were left empty.
    #[error("missing required fields: [{}]", .missing.join(", "))]
    Validation { missing: Vec<String> },

    /// A setter combination the endpoint cannot express.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The configured base URL could not be parsed.
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    /// The request never produced an HTTP response.
    #[error("transport failed: {0}")]
    Transport(#[from] TransportError),

    /// The server returned 404.
    #[error("resource not found{}", describe(.details))]
    NotFound { details: Option<ErrorDetails> },

    /// The server returned a non-2xx status other than 404.
    #[error("HTTP {status}{}", describe_or_body(.details, .body))]
    HttpError {
        status: u16,
        details: Option<ErrorDetails>,
        body: String,
    },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),

    /// A bulk commit left items with a retryable status.
    #[error("{count} bulk items need to be retried")]
    BulkItemRetry { count: usize },
}

impl ApiError {
    /// Build a validation error from the list of missing field names, or
    /// `Ok(())` when the list is empty.
    pub fn check_missing(missing: Vec<String>) -> Result<(), ApiError> {
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ApiError::Validation { missing })
        }
    }

    /// HTTP status attached to the error, if the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::NotFound { .. } => Some(404),
            ApiError::HttpError { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound { .. })
    }

    /// Error details decoded from the engine's error body.
    pub fn details(&self) -> Option<&ErrorDetails> {
        match self {
            ApiError::NotFound { details } | ApiError::HttpError { details, .. } => {
                details.as_ref()
            }
            _ => None,
        }
    }
}

fn describe(details: &Option<ErrorDetails>) -> String {
    match details {
        Some(d) if !d.kind.is_empty() => format!(": {} [type={}]", d.reason, d.kind),
        Some(d) if !d.reason.is_empty() => format!(": {}", d.reason),
        _ => String::new(),
    }
}

fn describe_or_body(details: &Option<ErrorDetails>, body: &str) -> String {
    let described = describe(details);
    if !described.is_empty() || body.is_empty() {
        described
    } else {
        format!(": {body}")
    }
}

/// The `error` object the engine embeds in failure responses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorDetails {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub reason: String,
    #[serde(rename = "resource.type", default, skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    #[serde(rename = "resource.id", default, skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index_uuid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grouped: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caused_by: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub root_cause: Vec<ErrorDetails>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failed_shards: Vec<serde_json::Value>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ErrorField {
    Detailed(ErrorDetails),
    Message(String),
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorField,
}

impl ErrorDetails {
    /// Extract the engine error from a response body. Returns `None` when the
    /// body is empty or does not carry an `error` field.
    pub fn from_body(body: &str) -> Option<ErrorDetails> {
        let envelope: ErrorEnvelope = serde_json::from_str(body).ok()?;
        Some(match envelope.error {
            ErrorField::Detailed(details) => details,
            ErrorField::Message(reason) => ErrorDetails {
                reason,
                ..ErrorDetails::default()
            },
        })
    }
}

/// Outcome of a delete-style call, where a 404 is a valid answer.
///
/// `NotFound` still carries the decoded response so callers can tell
/// "deleted", "already absent" and "request failed" (`Err`) apart.
#[derive(Debug)]
pub enum DeleteOutcome<T> {
    Deleted(T),
    NotFound { response: T, error: ApiError },
}

impl<T> DeleteOutcome<T> {
    pub fn response(&self) -> &T {
        match self {
            DeleteOutcome::Deleted(response) | DeleteOutcome::NotFound { response, .. } => {
                response
            }
        }
    }

    pub fn into_response(self) -> T {
        match self {
            DeleteOutcome::Deleted(response) | DeleteOutcome::NotFound { response, .. } => {
                response
            }
        }
    }

    /// The not-found error, if the target was already absent.
    pub fn error(&self) -> Option<&ApiError> {
        match self {
            DeleteOutcome::Deleted(_) => None,
            DeleteOutcome::NotFound { error, .. } => Some(error),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, DeleteOutcome::NotFound { .. })
    }

    /// Collapse into a plain result, turning the not-found case into `Err`.
    pub fn into_result(self) -> Result<T, ApiError> {
        match self {
            DeleteOutcome::Deleted(response) => Ok(response),
            DeleteOutcome::NotFound { error, .. } => Err(error),
        }
    }
}
