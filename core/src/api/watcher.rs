//! Watcher watches.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::{decode, decode_delete, decode_success, Client, Endpoint};
use crate::error::{ApiError, DeleteOutcome};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::params::{expand, segment, CommonParams, Missing};

impl Client {
    pub fn watcher_put_watch(&self, id: &str) -> WatcherPutWatch<'_> {
        WatcherPutWatch::new(self).id(id)
    }

    pub fn watcher_get_watch(&self, id: &str) -> WatcherGetWatch<'_> {
        WatcherGetWatch::new(self).id(id)
    }

    pub fn watcher_delete_watch(&self, id: &str) -> WatcherDeleteWatch<'_> {
        WatcherDeleteWatch::new(self).id(id)
    }
}

fn watch_path(id: &str) -> Result<String, ApiError> {
    expand("/_watcher/watch/{id}", &[("id", segment(id))])
}

/// `PUT /_watcher/watch/{id}`
#[derive(Debug, Clone)]
pub struct WatcherPutWatch<'a> {
    client: &'a Client,
    common: CommonParams,
    id: String,
    body: Option<Value>,
    active: Option<bool>,
    if_seq_no: Option<i64>,
    if_primary_term: Option<i64>,
    version: Option<i64>,
}

impl<'a> WatcherPutWatch<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self {
            client,
            common: CommonParams::default(),
            id: String::new(),
            body: None,
            active: None,
            if_seq_no: None,
            if_primary_term: None,
            version: None,
        }
    }

    common_setters!();

    pub fn id(mut self, id: &str) -> Self {
        self.id = id.to_string();
        self
    }

    /// Watch definition: `trigger`, `input`, `condition`, `actions`.
    pub fn body_json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn active(mut self, active: bool) -> Self {
        self.active = Some(active);
        self
    }

    pub fn if_seq_no(mut self, seq_no: i64) -> Self {
        self.if_seq_no = Some(seq_no);
        self
    }

    pub fn if_primary_term(mut self, term: i64) -> Self {
        self.if_primary_term = Some(term);
        self
    }

    pub fn version(mut self, version: i64) -> Self {
        self.version = Some(version);
        self
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        Missing::new().check("Id", !self.id.is_empty()).finish()
    }

    pub fn send(self) -> Result<WatcherPutWatchResponse, ApiError> {
        self.client.send(&self)
    }
}

impl Endpoint for WatcherPutWatch<'_> {
    type Response = WatcherPutWatchResponse;

    fn build_request(&self) -> Result<HttpRequest, ApiError> {
        self.validate()?;
        let mut req = HttpRequest::new(HttpMethod::Put, watch_path(&self.id)?);
        self.common.apply(&mut req);
        let p = &mut req.params;
        p.opt("active", &self.active);
        p.opt("if_seq_no", &self.if_seq_no);
        p.opt("if_primary_term", &self.if_primary_term);
        p.opt("version", &self.version);
        if let Some(body) = &self.body {
            req.json_body(body)?;
        }
        Ok(req)
    }

    fn parse_response(&self, response: HttpResponse) -> Result<WatcherPutWatchResponse, ApiError> {
        decode_success(&response)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatcherPutWatchResponse {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_version")]
    pub version: i64,
    #[serde(rename = "_seq_no")]
    pub seq_no: i64,
    #[serde(rename = "_primary_term")]
    pub primary_term: i64,
    pub created: bool,
}

/// `GET /_watcher/watch/{id}`
#[derive(Debug, Clone)]
pub struct WatcherGetWatch<'a> {
    client: &'a Client,
    common: CommonParams,
    id: String,
}

impl<'a> WatcherGetWatch<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self {
            client,
            common: CommonParams::default(),
            id: String::new(),
        }
    }

    common_setters!();

    pub fn id(mut self, id: &str) -> Self {
        self.id = id.to_string();
        self
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        Missing::new().check("Id", !self.id.is_empty()).finish()
    }

    pub fn send(self) -> Result<WatcherGetWatchResponse, ApiError> {
        self.client.send(&self)
    }
}

impl Endpoint for WatcherGetWatch<'_> {
    type Response = WatcherGetWatchResponse;

    fn build_request(&self) -> Result<HttpRequest, ApiError> {
        self.validate()?;
        let mut req = HttpRequest::new(HttpMethod::Get, watch_path(&self.id)?);
        self.common.apply(&mut req);
        Ok(req)
    }

    fn parse_response(&self, response: HttpResponse) -> Result<WatcherGetWatchResponse, ApiError> {
        // A missing watch answers 404 with {"found":false}.
        if response.status == 404 {
            if let Ok(decoded) = decode::<WatcherGetWatchResponse>(&response) {
                if !decoded.found {
                    return Ok(decoded);
                }
            }
        }
        decode_success(&response)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatcherGetWatchResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub found: bool,
    #[serde(rename = "_version", skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
    #[serde(rename = "_seq_no", skip_serializing_if = "Option::is_none")]
    pub seq_no: Option<i64>,
    #[serde(rename = "_primary_term", skip_serializing_if = "Option::is_none")]
    pub primary_term: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub watch: Option<Value>,
}

/// `DELETE /_watcher/watch/{id}`
#[derive(Debug, Clone)]
pub struct WatcherDeleteWatch<'a> {
    client: &'a Client,
    common: CommonParams,
    id: String,
}

impl<'a> WatcherDeleteWatch<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self {
            client,
            common: CommonParams::default(),
            id: String::new(),
        }
    }

    common_setters!();

    pub fn id(mut self, id: &str) -> Self {
        self.id = id.to_string();
        self
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        Missing::new().check("Id", !self.id.is_empty()).finish()
    }

    pub fn send(self) -> Result<DeleteOutcome<WatcherDeleteWatchResponse>, ApiError> {
        self.client.send(&self)
    }
}

impl Endpoint for WatcherDeleteWatch<'_> {
    type Response = DeleteOutcome<WatcherDeleteWatchResponse>;

    fn build_request(&self) -> Result<HttpRequest, ApiError> {
        self.validate()?;
        let mut req = HttpRequest::new(HttpMethod::Delete, watch_path(&self.id)?);
        self.common.apply(&mut req);
        Ok(req)
    }

    fn parse_response(
        &self,
        response: HttpResponse,
    ) -> Result<DeleteOutcome<WatcherDeleteWatchResponse>, ApiError> {
        decode_delete(&response)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatcherDeleteWatchResponse {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_version")]
    pub version: i64,
    pub found: bool,
}
