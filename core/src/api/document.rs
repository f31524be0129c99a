//! Single-document endpoints: index, get, exists and delete.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::ShardsInfo;
use crate::client::{check_status, decode, decode_delete, decode_success, exists_from_status, Client, Endpoint};
use crate::error::{ApiError, DeleteOutcome, ErrorDetails};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::params::{expand, segment, strings, CommonParams, Missing};

impl Client {
    pub fn index(&self) -> Index<'_> {
        Index::new(self)
    }

    pub fn get(&self) -> Get<'_> {
        Get::new(self)
    }

    pub fn exists(&self) -> Exists<'_> {
        Exists::new(self)
    }

    pub fn delete(&self) -> Delete<'_> {
        Delete::new(self)
    }
}

/// Result of a write on a single document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexResponse {
    #[serde(rename = "_index")]
    pub index: String,
    #[serde(rename = "_type", skip_serializing_if = "Option::is_none")]
    pub doc_type: Option<String>,
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_version")]
    pub version: i64,
    /// `created`, `updated`, `deleted`, `not_found` or `noop`.
    pub result: String,
    #[serde(rename = "_shards", skip_serializing_if = "Option::is_none")]
    pub shards: Option<ShardsInfo>,
    #[serde(rename = "_seq_no")]
    pub seq_no: i64,
    #[serde(rename = "_primary_term")]
    pub primary_term: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forced_refresh: Option<bool>,
}

/// `PUT /{index}/_doc/{id}`, or `POST /{index}/_doc` to let the engine
/// assign the id.
#[derive(Debug, Clone)]
pub struct Index<'a> {
    client: &'a Client,
    common: CommonParams,
    index: String,
    id: Option<String>,
    body_json: Option<Value>,
    body_string: Option<String>,
    routing: Option<String>,
    pipeline: Option<String>,
    refresh: Option<String>,
    timeout: Option<String>,
    version: Option<i64>,
    version_type: Option<String>,
    op_type: Option<String>,
    if_seq_no: Option<i64>,
    if_primary_term: Option<i64>,
    wait_for_active_shards: Option<String>,
}

impl<'a> Index<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self {
            client,
            common: CommonParams::default(),
            index: String::new(),
            id: None,
            body_json: None,
            body_string: None,
            routing: None,
            pipeline: None,
            refresh: None,
            timeout: None,
            version: None,
            version_type: None,
            op_type: None,
            if_seq_no: None,
            if_primary_term: None,
            wait_for_active_shards: None,
        }
    }

    common_setters!();

    pub fn index(mut self, index: &str) -> Self {
        self.index = index.to_string();
        self
    }

    pub fn id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn body_json(mut self, body: Value) -> Self {
        self.body_json = Some(body);
        self
    }

    /// Pre-encoded JSON document.
    pub fn body_string(mut self, body: &str) -> Self {
        self.body_string = Some(body.to_string());
        self
    }

    /// Serialize `doc` as the body.
    pub fn document<T: Serialize>(self, doc: &T) -> Result<Self, ApiError> {
        let value = serde_json::to_value(doc).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(self.body_json(value))
    }

    pub fn routing(mut self, routing: &str) -> Self {
        self.routing = Some(routing.to_string());
        self
    }

    pub fn pipeline(mut self, pipeline: &str) -> Self {
        self.pipeline = Some(pipeline.to_string());
        self
    }

    /// `true`, `false` or `wait_for`.
    pub fn refresh(mut self, refresh: &str) -> Self {
        self.refresh = Some(refresh.to_string());
        self
    }

    pub fn timeout(mut self, timeout: &str) -> Self {
        self.timeout = Some(timeout.to_string());
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

    /// `index` or `create`.
    pub fn op_type(mut self, op_type: &str) -> Self {
        self.op_type = Some(op_type.to_string());
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

    pub fn wait_for_active_shards(mut self, shards: &str) -> Self {
        self.wait_for_active_shards = Some(shards.to_string());
        self
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        Missing::new()
            .check("Index", !self.index.is_empty())
            .check("BodyJson", self.body_json.is_some() || self.body_string.is_some())
            .finish()
    }

    pub fn send(self) -> Result<IndexResponse, ApiError> {
        self.client.send(&self)
    }
}

impl Endpoint for Index<'_> {
    type Response = IndexResponse;

    fn build_request(&self) -> Result<HttpRequest, ApiError> {
        self.validate()?;
        let mut req = match self.id.as_deref().filter(|id| !id.is_empty()) {
            Some(id) => HttpRequest::new(
                HttpMethod::Put,
                expand(
                    "/{index}/_doc/{id}",
                    &[("index", segment(&self.index)), ("id", segment(id))],
                )?,
            ),
            None => HttpRequest::new(
                HttpMethod::Post,
                expand("/{index}/_doc", &[("index", segment(&self.index))])?,
            ),
        };
        self.common.apply(&mut req);
        let p = &mut req.params;
        p.opt("routing", &self.routing);
        p.opt("pipeline", &self.pipeline);
        p.opt("refresh", &self.refresh);
        p.opt("timeout", &self.timeout);
        p.opt("version", &self.version);
        p.opt("version_type", &self.version_type);
        p.opt("op_type", &self.op_type);
        p.opt("if_seq_no", &self.if_seq_no);
        p.opt("if_primary_term", &self.if_primary_term);
        p.opt("wait_for_active_shards", &self.wait_for_active_shards);
        match (&self.body_json, &self.body_string) {
            (Some(body), _) => req.json_body(body)?,
            (None, Some(body)) => {
                req.set_header("content-type", "application/json");
                req.body = Some(body.clone());
            }
            (None, None) => {}
        }
        Ok(req)
    }

    fn parse_response(&self, response: HttpResponse) -> Result<IndexResponse, ApiError> {
        decode_success(&response)
    }
}

/// A fetched document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GetResult {
    #[serde(rename = "_index")]
    pub index: String,
    #[serde(rename = "_type", skip_serializing_if = "Option::is_none")]
    pub doc_type: Option<String>,
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_version", skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
    #[serde(rename = "_seq_no", skip_serializing_if = "Option::is_none")]
    pub seq_no: Option<i64>,
    #[serde(rename = "_primary_term", skip_serializing_if = "Option::is_none")]
    pub primary_term: Option<i64>,
    #[serde(rename = "_routing", skip_serializing_if = "Option::is_none")]
    pub routing: Option<String>,
    pub found: bool,
    #[serde(rename = "_source", skip_serializing_if = "Option::is_none")]
    pub source: Option<Value>,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub fields: Map<String, Value>,
}

impl GetResult {
    /// Decode `_source` into `T`; `None` when the document had no source.
    pub fn source_as<T: DeserializeOwned>(&self) -> Result<Option<T>, ApiError> {
        self.source
            .as_ref()
            .map(|s| T::deserialize(s).map_err(|e| ApiError::DeserializationError(e.to_string())))
            .transpose()
    }
}

/// `GET /{index}/_doc/{id}`
#[derive(Debug, Clone)]
pub struct Get<'a> {
    client: &'a Client,
    common: CommonParams,
    index: String,
    id: String,
    realtime: Option<bool>,
    refresh: Option<String>,
    routing: Option<String>,
    preference: Option<String>,
    stored_fields: Vec<String>,
    fetch_source: Option<bool>,
    source_includes: Vec<String>,
    source_excludes: Vec<String>,
    version: Option<i64>,
    version_type: Option<String>,
}

impl<'a> Get<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self {
            client,
            common: CommonParams::default(),
            index: String::new(),
            id: String::new(),
            realtime: None,
            refresh: None,
            routing: None,
            preference: None,
            stored_fields: Vec::new(),
            fetch_source: None,
            source_includes: Vec::new(),
            source_excludes: Vec::new(),
            version: None,
            version_type: None,
        }
    }

    common_setters!();

    pub fn index(mut self, index: &str) -> Self {
        self.index = index.to_string();
        self
    }

    pub fn id(mut self, id: &str) -> Self {
        self.id = id.to_string();
        self
    }

    pub fn realtime(mut self, realtime: bool) -> Self {
        self.realtime = Some(realtime);
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

    pub fn preference(mut self, preference: &str) -> Self {
        self.preference = Some(preference.to_string());
        self
    }

    pub fn stored_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stored_fields.extend(strings(fields));
        self
    }

    pub fn fetch_source(mut self, fetch: bool) -> Self {
        self.fetch_source = Some(fetch);
        self
    }

    pub fn source_includes<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.source_includes.extend(strings(fields));
        self
    }

    pub fn source_excludes<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.source_excludes.extend(strings(fields));
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

    pub fn validate(&self) -> Result<(), ApiError> {
        Missing::new()
            .check("Index", !self.index.is_empty())
            .check("Id", !self.id.is_empty())
            .finish()
    }

    pub fn send(self) -> Result<GetResult, ApiError> {
        self.client.send(&self)
    }
}

impl Endpoint for Get<'_> {
    type Response = GetResult;

    fn build_request(&self) -> Result<HttpRequest, ApiError> {
        self.validate()?;
        let path = expand(
            "/{index}/_doc/{id}",
            &[("index", segment(&self.index)), ("id", segment(&self.id))],
        )?;
        let mut req = HttpRequest::new(HttpMethod::Get, path);
        self.common.apply(&mut req);
        let p = &mut req.params;
        p.opt("realtime", &self.realtime);
        p.opt("refresh", &self.refresh);
        p.opt("routing", &self.routing);
        p.opt("preference", &self.preference);
        p.list("stored_fields", &self.stored_fields);
        p.opt("_source", &self.fetch_source);
        p.list("_source_includes", &self.source_includes);
        p.list("_source_excludes", &self.source_excludes);
        p.opt("version", &self.version);
        p.opt("version_type", &self.version_type);
        Ok(req)
    }

    /// A missing document is `Ok` with `found: false`; a missing index is
    /// `Err(NotFound)`.
    fn parse_response(&self, response: HttpResponse) -> Result<GetResult, ApiError> {
        if response.status == 404 {
            if let Some(details) = ErrorDetails::from_body(&response.body) {
                return Err(ApiError::NotFound { details: Some(details) });
            }
            return decode(&response).map_err(|_| ApiError::NotFound { details: None });
        }
        check_status(&response)?;
        decode(&response)
    }
}

/// `HEAD /{index}/_doc/{id}`
#[derive(Debug, Clone)]
pub struct Exists<'a> {
    client: &'a Client,
    common: CommonParams,
    index: String,
    id: String,
    realtime: Option<bool>,
    refresh: Option<String>,
    routing: Option<String>,
    preference: Option<String>,
}

impl<'a> Exists<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self {
            client,
            common: CommonParams::default(),
            index: String::new(),
            id: String::new(),
            realtime: None,
            refresh: None,
            routing: None,
            preference: None,
        }
    }

    common_setters!();

    pub fn index(mut self, index: &str) -> Self {
        self.index = index.to_string();
        self
    }

    pub fn id(mut self, id: &str) -> Self {
        self.id = id.to_string();
        self
    }

    pub fn realtime(mut self, realtime: bool) -> Self {
        self.realtime = Some(realtime);
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

    pub fn preference(mut self, preference: &str) -> Self {
        self.preference = Some(preference.to_string());
        self
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        Missing::new()
            .check("Index", !self.index.is_empty())
            .check("Id", !self.id.is_empty())
            .finish()
    }

    pub fn send(self) -> Result<bool, ApiError> {
        self.client.send(&self)
    }
}

impl Endpoint for Exists<'_> {
    type Response = bool;

    fn build_request(&self) -> Result<HttpRequest, ApiError> {
        self.validate()?;
        let path = expand(
            "/{index}/_doc/{id}",
            &[("index", segment(&self.index)), ("id", segment(&self.id))],
        )?;
        let mut req = HttpRequest::new(HttpMethod::Head, path);
        self.common.apply(&mut req);
        let p = &mut req.params;
        p.opt("realtime", &self.realtime);
        p.opt("refresh", &self.refresh);
        p.opt("routing", &self.routing);
        p.opt("preference", &self.preference);
        Ok(req)
    }

    fn parse_response(&self, response: HttpResponse) -> Result<bool, ApiError> {
        exists_from_status(&response)
    }
}

/// `DELETE /{index}/_doc/{id}`. A missing document yields
/// `DeleteOutcome::NotFound` with `result: "not_found"`.
#[derive(Debug, Clone)]
pub struct Delete<'a> {
    client: &'a Client,
    common: CommonParams,
    index: String,
    id: String,
    routing: Option<String>,
    refresh: Option<String>,
    timeout: Option<String>,
    version: Option<i64>,
    version_type: Option<String>,
    if_seq_no: Option<i64>,
    if_primary_term: Option<i64>,
    wait_for_active_shards: Option<String>,
}

impl<'a> Delete<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self {
            client,
            common: CommonParams::default(),
            index: String::new(),
            id: String::new(),
            routing: None,
            refresh: None,
            timeout: None,
            version: None,
            version_type: None,
            if_seq_no: None,
            if_primary_term: None,
            wait_for_active_shards: None,
        }
    }

    common_setters!();

    pub fn index(mut self, index: &str) -> Self {
        self.index = index.to_string();
        self
    }

    pub fn id(mut self, id: &str) -> Self {
        self.id = id.to_string();
        self
    }

    pub fn routing(mut self, routing: &str) -> Self {
        self.routing = Some(routing.to_string());
        self
    }

    pub fn refresh(mut self, refresh: &str) -> Self {
        self.refresh = Some(refresh.to_string());
        self
    }

    pub fn timeout(mut self, timeout: &str) -> Self {
        self.timeout = Some(timeout.to_string());
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

    pub fn wait_for_active_shards(mut self, shards: &str) -> Self {
        self.wait_for_active_shards = Some(shards.to_string());
        self
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        Missing::new()
            .check("Index", !self.index.is_empty())
            .check("Id", !self.id.is_empty())
            .finish()
    }

    pub fn send(self) -> Result<DeleteOutcome<IndexResponse>, ApiError> {
        self.client.send(&self)
    }
}

impl Endpoint for Delete<'_> {
    type Response = DeleteOutcome<IndexResponse>;

    fn build_request(&self) -> Result<HttpRequest, ApiError> {
        self.validate()?;
        let path = expand(
            "/{index}/_doc/{id}",
            &[("index", segment(&self.index)), ("id", segment(&self.id))],
        )?;
        let mut req = HttpRequest::new(HttpMethod::Delete, path);
        self.common.apply(&mut req);
        let p = &mut req.params;
        p.opt("routing", &self.routing);
        p.opt("refresh", &self.refresh);
        p.opt("timeout", &self.timeout);
        p.opt("version", &self.version);
        p.opt("version_type", &self.version_type);
        p.opt("if_seq_no", &self.if_seq_no);
        p.opt("if_primary_term", &self.if_primary_term);
        p.opt("wait_for_active_shards", &self.wait_for_active_shards);
        Ok(req)
    }

    fn parse_response(&self, response: HttpResponse) -> Result<Self::Response, ApiError> {
        decode_delete(&response)
    }
}
