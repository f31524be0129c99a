//! In-memory transport for unit tests.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::client::Client;
use crate::http::{HttpRequest, HttpResponse, Transport, TransportError};

/// Replays queued responses and records every request it receives.
#[derive(Debug, Default)]
pub(crate) struct ScriptedTransport {
    responses: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn respond(&self, status: u16, body: &str) {
        self.responses.lock().push_back(Ok(HttpResponse::new(status, body)));
    }

    pub(crate) fn fail(&self, err: TransportError) {
        self.responses.lock().push_back(Err(err));
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().clone()
    }

    pub(crate) fn client(self: &Arc<Self>) -> Client {
        Client::with_transport("http://localhost:9200", self.clone())
    }
}

impl Transport for ScriptedTransport {
    fn perform(&self, _base_url: &str, request: &HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().push(request.clone());
        self.responses
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Other("no scripted response".into())))
    }
}

/// Client whose transport is never expected to be called.
pub(crate) fn offline_client() -> Client {
    ScriptedTransport::new().client()
}
