//! Helpers shared by the integration test binaries.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Arc;

use elastic_core::{Client, HttpMethod, HttpRequest, HttpResponse, Transport, TransportError};
use parking_lot::Mutex;
use serde_json::Value;

/// In-memory transport: records every request with the URL it would hit and
/// answers from a queue, falling back to `200 {}`.
#[derive(Debug, Default)]
pub struct RecordingTransport {
    queue: Mutex<VecDeque<HttpResponse>>,
    seen: Mutex<Vec<(String, HttpRequest)>>,
}

impl RecordingTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn push(&self, status: u16, body: &str) {
        self.queue.lock().push_back(HttpResponse::new(status, body));
    }

    pub fn client(self: &Arc<Self>) -> Client {
        Client::with_transport("http://localhost:9200", self.clone())
    }

    pub fn last(&self) -> (String, HttpRequest) {
        self.seen.lock().last().cloned().expect("no request recorded")
    }

    pub fn count(&self) -> usize {
        self.seen.lock().len()
    }
}

impl Transport for RecordingTransport {
    fn perform(&self, base_url: &str, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self.seen.lock().push((request.url(base_url), request.clone()));
        Ok(self.queue.lock().pop_front().unwrap_or_else(|| HttpResponse::new(200, "{}")))
    }
}

pub fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "HEAD" => HttpMethod::Head,
        "POST" => HttpMethod::Post,
        "PUT" => HttpMethod::Put,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

/// Every key in `expected` must be present in `actual` with an equal value;
/// objects are compared recursively, everything else exactly.
pub fn assert_subset(actual: &Value, expected: &Value, ctx: &str) {
    match (actual, expected) {
        (Value::Object(actual), Value::Object(expected)) => {
            for (key, want) in expected {
                let got = actual
                    .get(key)
                    .unwrap_or_else(|| panic!("{ctx}: missing key {key}"));
                assert_subset(got, want, &format!("{ctx}.{key}"));
            }
        }
        _ => assert_eq!(actual, expected, "{ctx}"),
    }
}

/// Compare a recorded request against an `expected_request` vector entry.
pub fn assert_request(req: &HttpRequest, expected: &Value, name: &str) {
    let method = parse_method(expected["method"].as_str().expect("method"));
    assert_eq!(req.method, method, "{name}: method");
    assert_eq!(req.path, expected["path"].as_str().expect("path"), "{name}: path");

    let params: Vec<(String, String)> = req.params.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
    let want: Vec<(String, String)> = expected["params"]
        .as_object()
        .map(|m| {
            m.iter()
                .map(|(k, v)| (k.clone(), v.as_str().expect("param values are strings").to_string()))
                .collect()
        })
        .unwrap_or_default();
    assert_eq!(params, want, "{name}: params");

    match &expected["body"] {
        Value::Null => assert!(req.body.is_none(), "{name}: unexpected body"),
        Value::String(ndjson) => assert_eq!(req.body.as_deref(), Some(ndjson.as_str()), "{name}: body"),
        body => {
            let sent: Value = serde_json::from_str(req.body.as_deref().expect("body")).expect("json body");
            assert_eq!(&sent, body, "{name}: body");
        }
    }
}
