//! The `_bulk` endpoint and the actions it carries.
//!
//! Each action renders to one or two NDJSON lines: the action metadata and,
//! for index/create/update, the document or partial update.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use super::document::GetResult;
use super::ShardsInfo;
use crate::client::{decode_success, Client, Endpoint};
use crate::error::{ApiError, ErrorDetails};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::params::{expand, segment, CommonParams, Missing};

impl Client {
    pub fn bulk(&self) -> Bulk<'_> {
        Bulk::new(self)
    }
}

fn insert_opt<T: Serialize>(map: &mut Map<String, Value>, key: &str, value: &Option<T>) {
    if let Some(value) = value {
        map.insert(key.to_string(), json!(value));
    }
}

fn to_line(value: &Value) -> Result<String, ApiError> {
    serde_json::to_string(value).map_err(|e| ApiError::SerializationError(e.to_string()))
}

/// Index or create a document.
#[derive(Debug, Clone, PartialEq)]
pub struct BulkIndexRequest {
    op_type: &'static str,
    index: Option<String>,
    id: Option<String>,
    routing: Option<String>,
    pipeline: Option<String>,
    version: Option<i64>,
    version_type: Option<String>,
    if_seq_no: Option<i64>,
    if_primary_term: Option<i64>,
    doc: Option<Value>,
}

impl BulkIndexRequest {
    /// `index` action: create or replace.
    pub fn new() -> Self {
        Self::with_op_type("index")
    }

    /// `create` action: fails if the id already exists.
    pub fn create() -> Self {
        Self::with_op_type("create")
    }

    fn with_op_type(op_type: &'static str) -> Self {
        Self {
            op_type,
            index: None,
            id: None,
            routing: None,
            pipeline: None,
            version: None,
            version_type: None,
            if_seq_no: None,
            if_primary_term: None,
            doc: None,
        }
    }

    pub fn index(mut self, index: &str) -> Self {
        self.index = Some(index.to_string());
        self
    }

    pub fn id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn routing(mut self, routing: &str) -> Self {
        self.routing = Some(routing.to_string());
        self
    }

    pub fn pipeline(mut self, pipeline: &str) -> Self {
        self.pipeline = Some(pipeline.to_string());
        self
    }

    pub fn version(mut self, version: i64) -> Self {
        self.version = Some(version);
        self
    }

    pub fn version_type(mut self, version_type: &str) -> Self {
        self.version_type = Some(version_type.to_string());
        self
    }

    pub fn if_seq_no(mut self, seq_no: i64) -> Self {
        self.if_seq_no = Some(seq_no);
        self
    }

    pub fn if_primary_term(mut self, primary_term: i64) -> Self {
        self.if_primary_term = Some(primary_term);
        self
    }

    pub fn doc(mut self, doc: Value) -> Self {
        self.doc = Some(doc);
        self
    }
}

impl Default for BulkIndexRequest {
    fn default() -> Self {
        Self::new()
    }
}

/// Partially update, upsert or script a document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BulkUpdateRequest {
    index: Option<String>,
    id: Option<String>,
    routing: Option<String>,
    version: Option<i64>,
    version_type: Option<String>,
    if_seq_no: Option<i64>,
    if_primary_term: Option<i64>,
    retry_on_conflict: Option<i64>,
    doc: Option<Value>,
    upsert: Option<Value>,
    doc_as_upsert: Option<bool>,
    detect_noop: Option<bool>,
    script: Option<Value>,
    scripted_upsert: Option<bool>,
    fetch_source: Option<bool>,
}

impl BulkUpdateRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn index(mut self, index: &str) -> Self {
        self.index = Some(index.to_string());
        self
    }

    pub fn id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn routing(mut self, routing: &str) -> Self {
        self.routing = Some(routing.to_string());
        self
    }

    pub fn version(mut self, version: i64) -> Self {
        self.version = Some(version);
        self
    }

    pub fn version_type(mut self, version_type: &str) -> Self {
        self.version_type = Some(version_type.to_string());
        self
    }

    pub fn if_seq_no(mut self, seq_no: i64) -> Self {
        self.if_seq_no = Some(seq_no);
        self
    }

    pub fn if_primary_term(mut self, primary_term: i64) -> Self {
        self.if_primary_term = Some(primary_term);
        self
    }

    pub fn retry_on_conflict(mut self, retries: i64) -> Self {
        self.retry_on_conflict = Some(retries);
        self
    }

    pub fn doc(mut self, doc: Value) -> Self {
        self.doc = Some(doc);
        self
    }

    pub fn upsert(mut self, upsert: Value) -> Self {
        self.upsert = Some(upsert);
        self
    }

    pub fn doc_as_upsert(mut self, enabled: bool) -> Self {
        self.doc_as_upsert = Some(enabled);
        self
    }

    pub fn detect_noop(mut self, enabled: bool) -> Self {
        self.detect_noop = Some(enabled);
        self
    }

    pub fn script(mut self, script: Value) -> Self {
        self.script = Some(script);
        self
    }

    pub fn scripted_upsert(mut self, enabled: bool) -> Self {
        self.scripted_upsert = Some(enabled);
        self
    }

    pub fn fetch_source(mut self, fetch: bool) -> Self {
        self.fetch_source = Some(fetch);
        self
    }
}

/// Delete a document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BulkDeleteRequest {
    index: Option<String>,
    id: Option<String>,
    routing: Option<String>,
    version: Option<i64>,
    version_type: Option<String>,
    if_seq_no: Option<i64>,
    if_primary_term: Option<i64>,
}

impl BulkDeleteRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn index(mut self, index: &str) -> Self {
        self.index = Some(index.to_string());
        self
    }

    pub fn id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn routing(mut self, routing: &str) -> Self {
        self.routing = Some(routing.to_string());
        self
    }

    pub fn version(mut self, version: i64) -> Self {
        self.version = Some(version);
        self
    }

    pub fn version_type(mut self, version_type: &str) -> Self {
        self.version_type = Some(version_type.to_string());
        self
    }

    pub fn if_seq_no(mut self, seq_no: i64) -> Self {
        self.if_seq_no = Some(seq_no);
        self
    }

    pub fn if_primary_term(mut self, primary_term: i64) -> Self {
        self.if_primary_term = Some(primary_term);
        self
    }
}

/// One action of a bulk request.
#[derive(Debug, Clone, PartialEq)]
pub enum BulkableRequest {
    Index(BulkIndexRequest),
    Update(BulkUpdateRequest),
    Delete(BulkDeleteRequest),
}

impl From<BulkIndexRequest> for BulkableRequest {
    fn from(request: BulkIndexRequest) -> Self {
        BulkableRequest::Index(request)
    }
}

impl From<BulkUpdateRequest> for BulkableRequest {
    fn from(request: BulkUpdateRequest) -> Self {
        BulkableRequest::Update(request)
    }
}

impl From<BulkDeleteRequest> for BulkableRequest {
    fn from(request: BulkDeleteRequest) -> Self {
        BulkableRequest::Delete(request)
    }
}

impl BulkableRequest {
    /// `index`, `create`, `update` or `delete`.
    pub fn action(&self) -> &'static str {
        match self {
            BulkableRequest::Index(r) => r.op_type,
            BulkableRequest::Update(_) => "update",
            BulkableRequest::Delete(_) => "delete",
        }
    }

    pub fn id(&self) -> Option<&str> {
        match self {
            BulkableRequest::Index(r) => r.id.as_deref(),
            BulkableRequest::Update(r) => r.id.as_deref(),
            BulkableRequest::Delete(r) => r.id.as_deref(),
        }
    }

    pub fn index(&self) -> Option<&str> {
        match self {
            BulkableRequest::Index(r) => r.index.as_deref(),
            BulkableRequest::Update(r) => r.index.as_deref(),
            BulkableRequest::Delete(r) => r.index.as_deref(),
        }
    }

    /// The NDJSON lines for this action, without trailing newlines.
    pub fn source(&self) -> Result<Vec<String>, ApiError> {
        let mut meta = Map::new();
        let payload = match self {
            BulkableRequest::Index(r) => {
                insert_opt(&mut meta, "_index", &r.index);
                insert_opt(&mut meta, "_id", &r.id);
                insert_opt(&mut meta, "routing", &r.routing);
                insert_opt(&mut meta, "pipeline", &r.pipeline);
                insert_opt(&mut meta, "version", &r.version);
                insert_opt(&mut meta, "version_type", &r.version_type);
                insert_opt(&mut meta, "if_seq_no", &r.if_seq_no);
                insert_opt(&mut meta, "if_primary_term", &r.if_primary_term);
                Some(r.doc.clone().unwrap_or(Value::Null))
            }
            BulkableRequest::Update(r) => {
                insert_opt(&mut meta, "_index", &r.index);
                insert_opt(&mut meta, "_id", &r.id);
                insert_opt(&mut meta, "routing", &r.routing);
                insert_opt(&mut meta, "version", &r.version);
                insert_opt(&mut meta, "version_type", &r.version_type);
                insert_opt(&mut meta, "if_seq_no", &r.if_seq_no);
                insert_opt(&mut meta, "if_primary_term", &r.if_primary_term);
                insert_opt(&mut meta, "retry_on_conflict", &r.retry_on_conflict);

                let mut body = Map::new();
                insert_opt(&mut body, "doc", &r.doc);
                insert_opt(&mut body, "upsert", &r.upsert);
                insert_opt(&mut body, "doc_as_upsert", &r.doc_as_upsert);
                insert_opt(&mut body, "detect_noop", &r.detect_noop);
                insert_opt(&mut body, "script", &r.script);
                insert_opt(&mut body, "scripted_upsert", &r.scripted_upsert);
                insert_opt(&mut body, "_source", &r.fetch_source);
                Some(Value::Object(body))
            }
            BulkableRequest::Delete(r) => {
                insert_opt(&mut meta, "_index", &r.index);
                insert_opt(&mut meta, "_id", &r.id);
                insert_opt(&mut meta, "routing", &r.routing);
                insert_opt(&mut meta, "version", &r.version);
                insert_opt(&mut meta, "version_type", &r.version_type);
                insert_opt(&mut meta, "if_seq_no", &r.if_seq_no);
                insert_opt(&mut meta, "if_primary_term", &r.if_primary_term);
                None
            }
        };

        let mut action = Map::new();
        action.insert(self.action().to_string(), Value::Object(meta));
        let mut lines = vec![to_line(&Value::Object(action))?];
        if let Some(payload) = payload {
            lines.push(to_line(&payload)?);
        }
        Ok(lines)
    }

    /// Bytes this action adds to the request body.
    pub fn estimated_size_in_bytes(&self) -> Result<u64, ApiError> {
        Ok(self.source()?.iter().map(|line| line.len() as u64 + 1).sum())
    }
}

/// `POST [/{index}]/_bulk`
#[derive(Debug, Clone)]
pub struct Bulk<'a> {
    client: &'a Client,
    common: CommonParams,
    index: Option<String>,
    requests: Vec<BulkableRequest>,
    refresh: Option<String>,
    routing: Option<String>,
    pipeline: Option<String>,
    timeout: Option<String>,
    wait_for_active_shards: Option<String>,
}

impl<'a> Bulk<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self {
            client,
            common: CommonParams::default(),
            index: None,
            requests: Vec::new(),
            refresh: None,
            routing: None,
            pipeline: None,
            timeout: None,
            wait_for_active_shards: None,
        }
    }

    common_setters!();

    /// Default index for actions that do not name one.
    pub fn index(mut self, index: &str) -> Self {
        self.index = Some(index.to_string());
        self
    }

    pub fn add(mut self, request: impl Into<BulkableRequest>) -> Self {
        self.requests.push(request.into());
        self
    }

    pub fn add_all<I>(mut self, requests: I) -> Self
    where
        I: IntoIterator<Item = BulkableRequest>,
    {
        self.requests.extend(requests);
        self
    }

    pub fn refresh(mut self, refresh: &str) -> Self {
        self.refresh = Some(refresh.to_string());
        self
    }

    pub fn routing(mut self, routing: &str) -> Self {
        self.routing = Some(routing.to_string());
        self
    }

    pub fn pipeline(mut self, pipeline: &str) -> Self {
        self.pipeline = Some(pipeline.to_string());
        self
    }

    pub fn timeout(mut self, timeout: &str) -> Self {
        self.timeout = Some(timeout.to_string());
        self
    }

    pub fn wait_for_active_shards(mut self, shards: &str) -> Self {
        self.wait_for_active_shards = Some(shards.to_string());
        self
    }

    pub fn number_of_actions(&self) -> usize {
        self.requests.len()
    }

    pub fn estimated_size_in_bytes(&self) -> Result<u64, ApiError> {
        self.requests
            .iter()
            .map(BulkableRequest::estimated_size_in_bytes)
            .sum()
    }

    /// The full NDJSON body, each line newline-terminated.
    pub fn body_as_string(&self) -> Result<String, ApiError> {
        let mut body = String::new();
        for request in &self.requests {
            for line in request.source()? {
                body.push_str(&line);
                body.push('\n');
            }
        }
        Ok(body)
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        Missing::new()
            .check("Requests", !self.requests.is_empty())
            .finish()
    }

    pub fn send(self) -> Result<BulkResponse, ApiError> {
        self.client.send(&self)
    }
}

impl Endpoint for Bulk<'_> {
    type Response = BulkResponse;

    fn build_request(&self) -> Result<HttpRequest, ApiError> {
        self.validate()?;
        let path = match self.index.as_deref().filter(|i| !i.is_empty()) {
            Some(index) => expand("/{index}/_bulk", &[("index", segment(index))])?,
            None => "/_bulk".to_string(),
        };
        let mut req = HttpRequest::new(HttpMethod::Post, path);
        self.common.apply(&mut req);
        let p = &mut req.params;
        p.opt("refresh", &self.refresh);
        p.opt("routing", &self.routing);
        p.opt("pipeline", &self.pipeline);
        p.opt("timeout", &self.timeout);
        p.opt("wait_for_active_shards", &self.wait_for_active_shards);
        req.ndjson_body(self.body_as_string()?);
        Ok(req)
    }

    fn parse_response(&self, response: HttpResponse) -> Result<BulkResponse, ApiError> {
        decode_success(&response)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BulkResponse {
    pub took: i64,
    pub errors: bool,
    /// One single-key map per action, keyed by the action name.
    pub items: Vec<BTreeMap<String, BulkResponseItem>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BulkResponseItem {
    #[serde(rename = "_index")]
    pub index: String,
    #[serde(rename = "_type", skip_serializing_if = "Option::is_none")]
    pub doc_type: Option<String>,
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_version", skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
    #[serde(rename = "_shards", skip_serializing_if = "Option::is_none")]
    pub shards: Option<ShardsInfo>,
    #[serde(rename = "_seq_no", skip_serializing_if = "Option::is_none")]
    pub seq_no: Option<i64>,
    #[serde(rename = "_primary_term", skip_serializing_if = "Option::is_none")]
    pub primary_term: Option<i64>,
    pub status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forced_refresh: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorDetails>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub get: Option<GetResult>,
}

impl BulkResponseItem {
    pub fn is_success(&self) -> bool {
        (200..=299).contains(&self.status)
    }
}

impl BulkResponse {
    /// Items for one action type.
    pub fn by_action(&self, action: &str) -> Vec<&BulkResponseItem> {
        self.items.iter().filter_map(|item| item.get(action)).collect()
    }

    /// Items for one document id, across all action types.
    pub fn by_id(&self, id: &str) -> Vec<&BulkResponseItem> {
        self.items
            .iter()
            .flat_map(|item| item.values())
            .filter(|item| item.id == id)
            .collect()
    }

    pub fn indexed(&self) -> Vec<&BulkResponseItem> {
        self.by_action("index")
    }

    pub fn created(&self) -> Vec<&BulkResponseItem> {
        self.by_action("create")
    }

    pub fn updated(&self) -> Vec<&BulkResponseItem> {
        self.by_action("update")
    }

    pub fn deleted(&self) -> Vec<&BulkResponseItem> {
        self.by_action("delete")
    }

    pub fn succeeded(&self) -> Vec<&BulkResponseItem> {
        self.items
            .iter()
            .flat_map(|item| item.values())
            .filter(|item| item.is_success())
            .collect()
    }

    pub fn failed(&self) -> Vec<&BulkResponseItem> {
        self.items
            .iter()
            .flat_map(|item| item.values())
            .filter(|item| !item.is_success())
            .collect()
    }
}
