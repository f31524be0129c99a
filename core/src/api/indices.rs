//! Index management endpoints.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use super::{AcknowledgedResponse, ShardsInfo};
use crate::client::{decode_delete, decode_success, exists_from_status, Client, Endpoint};
use crate::error::{ApiError, DeleteOutcome};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::params::{expand, segment, segments, strings, CommonParams, Missing};
use crate::query::Query;

impl Client {
    pub fn create_index(&self, index: &str) -> IndicesCreate<'_> {
        IndicesCreate::new(self).index(index)
    }

    pub fn delete_index<I, S>(&self, indices: I) -> IndicesDelete<'_>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        IndicesDelete::new(self).index(indices)
    }

    pub fn index_exists<I, S>(&self, indices: I) -> IndicesExists<'_>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        IndicesExists::new(self).index(indices)
    }

    pub fn refresh<I, S>(&self, indices: I) -> IndicesRefresh<'_>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        IndicesRefresh::new(self).index(indices)
    }

    pub fn indices_stats(&self) -> IndicesStats<'_> {
        IndicesStats::new(self)
    }

    pub fn aliases(&self) -> IndicesAliases<'_> {
        IndicesAliases::new(self)
    }

    pub fn index_get_settings(&self) -> IndicesGetSettings<'_> {
        IndicesGetSettings::new(self)
    }
}

/// `PUT /{index}`
#[derive(Debug, Clone)]
pub struct IndicesCreate<'a> {
    client: &'a Client,
    common: CommonParams,
    index: String,
    body: Option<Value>,
    settings: Option<Value>,
    mappings: Option<Value>,
    aliases: Map<String, Value>,
    wait_for_active_shards: Option<String>,
    timeout: Option<String>,
    master_timeout: Option<String>,
    include_type_name: Option<bool>,
}

impl<'a> IndicesCreate<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self {
            client,
            common: CommonParams::default(),
            index: String::new(),
            body: None,
            settings: None,
            mappings: None,
            aliases: Map::new(),
            wait_for_active_shards: None,
            timeout: None,
            master_timeout: None,
            include_type_name: None,
        }
    }

    common_setters!();

    pub fn index(mut self, index: &str) -> Self {
        self.index = index.to_string();
        self
    }

    /// Raw body; takes precedence over settings, mappings and aliases.
    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn settings(mut self, settings: Value) -> Self {
        self.settings = Some(settings);
        self
    }

    pub fn mappings(mut self, mappings: Value) -> Self {
        self.mappings = Some(mappings);
        self
    }

    pub fn alias(mut self, name: &str, definition: Value) -> Self {
        self.aliases.insert(name.to_string(), definition);
        self
    }

    pub fn wait_for_active_shards(mut self, shards: &str) -> Self {
        self.wait_for_active_shards = Some(shards.to_string());
        self
    }

    pub fn timeout(mut self, timeout: &str) -> Self {
        self.timeout = Some(timeout.to_string());
        self
    }

    pub fn master_timeout(mut self, timeout: &str) -> Self {
        self.master_timeout = Some(timeout.to_string());
        self
    }

    pub fn include_type_name(mut self, include: bool) -> Self {
        self.include_type_name = Some(include);
        self
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        Missing::new().check("Index", !self.index.is_empty()).finish()
    }

    fn body_value(&self) -> Option<Value> {
        if let Some(body) = &self.body {
            return Some(body.clone());
        }
        let mut body = Map::new();
        if let Some(settings) = &self.settings {
            body.insert("settings".into(), settings.clone());
        }
        if let Some(mappings) = &self.mappings {
            body.insert("mappings".into(), mappings.clone());
        }
        if !self.aliases.is_empty() {
            body.insert("aliases".into(), Value::Object(self.aliases.clone()));
        }
        (!body.is_empty()).then_some(Value::Object(body))
    }

    pub fn send(self) -> Result<IndicesCreateResponse, ApiError> {
        self.client.send(&self)
    }
}

impl Endpoint for IndicesCreate<'_> {
    type Response = IndicesCreateResponse;

    fn build_request(&self) -> Result<HttpRequest, ApiError> {
        self.validate()?;
        let path = expand("/{index}", &[("index", segment(&self.index))])?;
        let mut req = HttpRequest::new(HttpMethod::Put, path);
        self.common.apply(&mut req);
        let p = &mut req.params;
        p.opt("wait_for_active_shards", &self.wait_for_active_shards);
        p.opt("timeout", &self.timeout);
        p.opt("master_timeout", &self.master_timeout);
        p.opt("include_type_name", &self.include_type_name);
        if let Some(body) = self.body_value() {
            req.json_body(&body)?;
        }
        Ok(req)
    }

    fn parse_response(&self, response: HttpResponse) -> Result<IndicesCreateResponse, ApiError> {
        decode_success(&response)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicesCreateResponse {
    pub acknowledged: bool,
    pub shards_acknowledged: bool,
    pub index: String,
}

/// `DELETE /{index}`. A missing index yields `DeleteOutcome::NotFound`.
#[derive(Debug, Clone)]
pub struct IndicesDelete<'a> {
    client: &'a Client,
    common: CommonParams,
    indices: Vec<String>,
    timeout: Option<String>,
    master_timeout: Option<String>,
    ignore_unavailable: Option<bool>,
    allow_no_indices: Option<bool>,
    expand_wildcards: Option<String>,
}

impl<'a> IndicesDelete<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self {
            client,
            common: CommonParams::default(),
            indices: Vec::new(),
            timeout: None,
            master_timeout: None,
            ignore_unavailable: None,
            allow_no_indices: None,
            expand_wildcards: None,
        }
    }

    common_setters!();

    pub fn index<I, S>(mut self, indices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.indices.extend(strings(indices));
        self
    }

    pub fn timeout(mut self, timeout: &str) -> Self {
        self.timeout = Some(timeout.to_string());
        self
    }

    pub fn master_timeout(mut self, timeout: &str) -> Self {
        self.master_timeout = Some(timeout.to_string());
        self
    }

    pub fn ignore_unavailable(mut self, ignore: bool) -> Self {
        self.ignore_unavailable = Some(ignore);
        self
    }

    pub fn allow_no_indices(mut self, allow: bool) -> Self {
        self.allow_no_indices = Some(allow);
        self
    }

    pub fn expand_wildcards(mut self, expand: &str) -> Self {
        self.expand_wildcards = Some(expand.to_string());
        self
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        Missing::new().check("Index", !self.indices.is_empty()).finish()
    }

    pub fn send(self) -> Result<DeleteOutcome<AcknowledgedResponse>, ApiError> {
        self.client.send(&self)
    }
}

impl Endpoint for IndicesDelete<'_> {
    type Response = DeleteOutcome<AcknowledgedResponse>;

    fn build_request(&self) -> Result<HttpRequest, ApiError> {
        self.validate()?;
        let path = expand("/{index}", &[("index", segments(&self.indices))])?;
        let mut req = HttpRequest::new(HttpMethod::Delete, path);
        self.common.apply(&mut req);
        let p = &mut req.params;
        p.opt("timeout", &self.timeout);
        p.opt("master_timeout", &self.master_timeout);
        p.opt("ignore_unavailable", &self.ignore_unavailable);
        p.opt("allow_no_indices", &self.allow_no_indices);
        p.opt("expand_wildcards", &self.expand_wildcards);
        Ok(req)
    }

    fn parse_response(&self, response: HttpResponse) -> Result<Self::Response, ApiError> {
        decode_delete(&response)
    }
}

/// `HEAD /{index}`
#[derive(Debug, Clone)]
pub struct IndicesExists<'a> {
    client: &'a Client,
    common: CommonParams,
    indices: Vec<String>,
    local: Option<bool>,
    allow_no_indices: Option<bool>,
    expand_wildcards: Option<String>,
    ignore_unavailable: Option<bool>,
    include_defaults: Option<bool>,
    flat_settings: Option<bool>,
}

impl<'a> IndicesExists<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self {
            client,
            common: CommonParams::default(),
            indices: Vec::new(),
            local: None,
            allow_no_indices: None,
            expand_wildcards: None,
            ignore_unavailable: None,
            include_defaults: None,
            flat_settings: None,
        }
    }

    common_setters!();

    pub fn index<I, S>(mut self, indices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.indices.extend(strings(indices));
        self
    }

    pub fn local(mut self, local: bool) -> Self {
        self.local = Some(local);
        self
    }

    pub fn allow_no_indices(mut self, allow: bool) -> Self {
        self.allow_no_indices = Some(allow);
        self
    }

    pub fn expand_wildcards(mut self, expand: &str) -> Self {
        self.expand_wildcards = Some(expand.to_string());
        self
    }

    pub fn ignore_unavailable(mut self, ignore: bool) -> Self {
        self.ignore_unavailable = Some(ignore);
        self
    }

    pub fn include_defaults(mut self, include: bool) -> Self {
        self.include_defaults = Some(include);
        self
    }

    pub fn flat_settings(mut self, flat: bool) -> Self {
        self.flat_settings = Some(flat);
        self
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        Missing::new().check("Index", !self.indices.is_empty()).finish()
    }

    pub fn send(self) -> Result<bool, ApiError> {
        self.client.send(&self)
    }
}

impl Endpoint for IndicesExists<'_> {
    type Response = bool;

    fn build_request(&self) -> Result<HttpRequest, ApiError> {
        self.validate()?;
        let path = expand("/{index}", &[("index", segments(&self.indices))])?;
        let mut req = HttpRequest::new(HttpMethod::Head, path);
        self.common.apply(&mut req);
        let p = &mut req.params;
        p.opt("local", &self.local);
        p.opt("allow_no_indices", &self.allow_no_indices);
        p.opt("expand_wildcards", &self.expand_wildcards);
        p.opt("ignore_unavailable", &self.ignore_unavailable);
        p.opt("include_defaults", &self.include_defaults);
        p.opt("flat_settings", &self.flat_settings);
        Ok(req)
    }

    fn parse_response(&self, response: HttpResponse) -> Result<bool, ApiError> {
        exists_from_status(&response)
    }
}

/// `POST [/{index}]/_refresh`
#[derive(Debug, Clone)]
pub struct IndicesRefresh<'a> {
    client: &'a Client,
    common: CommonParams,
    indices: Vec<String>,
    allow_no_indices: Option<bool>,
    expand_wildcards: Option<String>,
    ignore_unavailable: Option<bool>,
}

impl<'a> IndicesRefresh<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self {
            client,
            common: CommonParams::default(),
            indices: Vec::new(),
            allow_no_indices: None,
            expand_wildcards: None,
            ignore_unavailable: None,
        }
    }

    common_setters!();

    pub fn index<I, S>(mut self, indices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.indices.extend(strings(indices));
        self
    }

    pub fn allow_no_indices(mut self, allow: bool) -> Self {
        self.allow_no_indices = Some(allow);
        self
    }

    pub fn expand_wildcards(mut self, expand: &str) -> Self {
        self.expand_wildcards = Some(expand.to_string());
        self
    }

    pub fn ignore_unavailable(mut self, ignore: bool) -> Self {
        self.ignore_unavailable = Some(ignore);
        self
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        Ok(())
    }

    pub fn send(self) -> Result<RefreshResponse, ApiError> {
        self.client.send(&self)
    }
}

impl Endpoint for IndicesRefresh<'_> {
    type Response = RefreshResponse;

    fn build_request(&self) -> Result<HttpRequest, ApiError> {
        self.validate()?;
        let path = if self.indices.is_empty() {
            "/_refresh".to_string()
        } else {
            expand("/{index}/_refresh", &[("index", segments(&self.indices))])?
        };
        let mut req = HttpRequest::new(HttpMethod::Post, path);
        self.common.apply(&mut req);
        let p = &mut req.params;
        p.opt("allow_no_indices", &self.allow_no_indices);
        p.opt("expand_wildcards", &self.expand_wildcards);
        p.opt("ignore_unavailable", &self.ignore_unavailable);
        Ok(req)
    }

    fn parse_response(&self, response: HttpResponse) -> Result<RefreshResponse, ApiError> {
        decode_success(&response)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefreshResponse {
    #[serde(rename = "_shards")]
    pub shards: ShardsInfo,
}

/// `GET [/{index}]/_stats[/{metric}]`
#[derive(Debug, Clone)]
pub struct IndicesStats<'a> {
    client: &'a Client,
    common: CommonParams,
    indices: Vec<String>,
    metrics: Vec<String>,
    level: Option<String>,
    groups: Vec<String>,
    types: Vec<String>,
    completion_fields: Vec<String>,
    fielddata_fields: Vec<String>,
    fields: Vec<String>,
}

impl<'a> IndicesStats<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self {
            client,
            common: CommonParams::default(),
            indices: Vec::new(),
            metrics: Vec::new(),
            level: None,
            groups: Vec::new(),
            types: Vec::new(),
            completion_fields: Vec::new(),
            fielddata_fields: Vec::new(),
            fields: Vec::new(),
        }
    }

    common_setters!();

    pub fn index<I, S>(mut self, indices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.indices.extend(strings(indices));
        self
    }

    /// Limit to metrics such as `docs`, `store` or `indexing`.
    pub fn metric<I, S>(mut self, metrics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.metrics.extend(strings(metrics));
        self
    }

    /// `cluster`, `indices` or `shards`.
    pub fn level(mut self, level: &str) -> Self {
        self.level = Some(level.to_string());
        self
    }

    pub fn groups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.groups.extend(strings(groups));
        self
    }

    pub fn types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.types.extend(strings(types));
        self
    }

    pub fn completion_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.completion_fields.extend(strings(fields));
        self
    }

    pub fn fielddata_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fielddata_fields.extend(strings(fields));
        self
    }

    pub fn fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields.extend(strings(fields));
        self
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        Ok(())
    }

    pub fn send(self) -> Result<IndicesStatsResponse, ApiError> {
        self.client.send(&self)
    }
}

impl Endpoint for IndicesStats<'_> {
    type Response = IndicesStatsResponse;

    fn build_request(&self) -> Result<HttpRequest, ApiError> {
        self.validate()?;
        let vars = [
            ("index", segments(&self.indices)),
            ("metric", segments(&self.metrics)),
        ];
        let template = match (self.indices.is_empty(), self.metrics.is_empty()) {
            (true, true) => "/_stats",
            (false, true) => "/{index}/_stats",
            (true, false) => "/_stats/{metric}",
            (false, false) => "/{index}/_stats/{metric}",
        };
        let mut req = HttpRequest::new(HttpMethod::Get, expand(template, &vars)?);
        self.common.apply(&mut req);
        let p = &mut req.params;
        p.opt("level", &self.level);
        p.list("groups", &self.groups);
        p.list("types", &self.types);
        p.list("completion_fields", &self.completion_fields);
        p.list("fielddata_fields", &self.fielddata_fields);
        p.list("fields", &self.fields);
        Ok(req)
    }

    fn parse_response(&self, response: HttpResponse) -> Result<IndicesStatsResponse, ApiError> {
        decode_success(&response)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicesStatsResponse {
    #[serde(rename = "_shards")]
    pub shards: ShardsInfo,
    /// Aggregated over every index.
    #[serde(rename = "_all")]
    pub all: IndexStats,
    pub indices: BTreeMap<String, IndexStats>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexStats {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uuid: Option<String>,
    pub primaries: IndexStatsDetails,
    pub total: IndexStatsDetails,
    /// Per shard number, one entry per copy. Filled with `level=shards`.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub shards: BTreeMap<String, Vec<IndexStatsDetails>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexStatsDetails {
    pub routing: Option<IndexStatsRouting>,
    pub docs: Option<IndexStatsDocs>,
    pub store: Option<IndexStatsStore>,
    pub indexing: Option<IndexStatsIndexing>,
    pub get: Option<IndexStatsGet>,
    pub search: Option<IndexStatsSearch>,
    pub merges: Option<IndexStatsMerges>,
    pub refresh: Option<IndexStatsRefresh>,
    pub recovery: Option<IndexStatsRecovery>,
    pub flush: Option<IndexStatsFlush>,
    pub warmer: Option<IndexStatsWarmer>,
    pub query_cache: Option<IndexStatsQueryCache>,
    pub fielddata: Option<IndexStatsFielddata>,
    pub completion: Option<IndexStatsCompletion>,
    pub segments: Option<IndexStatsSegments>,
    pub translog: Option<IndexStatsTranslog>,
    pub request_cache: Option<IndexStatsRequestCache>,
    pub commit: Option<IndexStatsCommit>,
    pub seq_no: Option<IndexStatsSeqNo>,
    pub retention_leases: Option<IndexStatsRetentionLeases>,
    pub shard_path: Option<IndexStatsShardPath>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexStatsRouting {
    pub state: String,
    pub primary: bool,
    pub node: String,
    pub relocating_node: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexStatsShardPath {
    pub state_path: String,
    pub data_path: String,
    pub is_custom_data_path: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexStatsDocs {
    pub count: i64,
    pub deleted: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexStatsStore {
    /// Human readable, only with `human=true`.
    pub size: Option<String>,
    pub size_in_bytes: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexStatsIndexing {
    pub index_total: i64,
    pub index_time: Option<String>,
    pub index_time_in_millis: i64,
    pub index_current: i64,
    pub index_failed: i64,
    pub delete_total: i64,
    pub delete_time: Option<String>,
    pub delete_time_in_millis: i64,
    pub delete_current: i64,
    pub noop_update_total: i64,
    pub is_throttled: bool,
    pub throttle_time: Option<String>,
    pub throttle_time_in_millis: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexStatsGet {
    pub total: i64,
    #[serde(rename = "getTime", alias = "get_time")]
    pub get_time: Option<String>,
    pub time_in_millis: i64,
    pub exists_total: i64,
    pub exists_time: Option<String>,
    pub exists_time_in_millis: i64,
    pub missing_total: i64,
    pub missing_time: Option<String>,
    pub missing_time_in_millis: i64,
    pub current: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexStatsSearch {
    pub open_contexts: i64,
    pub query_total: i64,
    pub query_time: Option<String>,
    pub query_time_in_millis: i64,
    pub query_current: i64,
    pub fetch_total: i64,
    pub fetch_time: Option<String>,
    pub fetch_time_in_millis: i64,
    pub fetch_current: i64,
    pub scroll_total: i64,
    pub scroll_time: Option<String>,
    pub scroll_time_in_millis: i64,
    pub scroll_current: i64,
    pub suggest_total: i64,
    pub suggest_time: Option<String>,
    pub suggest_time_in_millis: i64,
    pub suggest_current: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexStatsMerges {
    pub current: i64,
    pub current_docs: i64,
    pub current_size: Option<String>,
    pub current_size_in_bytes: i64,
    pub total: i64,
    pub total_time: Option<String>,
    pub total_time_in_millis: i64,
    pub total_docs: i64,
    pub total_size: Option<String>,
    pub total_size_in_bytes: i64,
    pub total_stopped_time: Option<String>,
    pub total_stopped_time_in_millis: i64,
    pub total_throttled_time: Option<String>,
    pub total_throttled_time_in_millis: i64,
    pub total_auto_throttle: Option<String>,
    pub total_auto_throttle_in_bytes: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexStatsRefresh {
    pub total: i64,
    pub total_time: Option<String>,
    pub total_time_in_millis: i64,
    pub external_total: i64,
    pub external_total_time: Option<String>,
    pub external_total_time_in_millis: i64,
    pub listeners: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexStatsRecovery {
    pub current_as_source: i64,
    pub current_as_target: i64,
    pub throttle_time: Option<String>,
    pub throttle_time_in_millis: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexStatsFlush {
    pub total: i64,
    pub total_time: Option<String>,
    pub total_time_in_millis: i64,
    pub periodic: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexStatsWarmer {
    pub current: i64,
    pub total: i64,
    pub total_time: Option<String>,
    pub total_time_in_millis: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexStatsQueryCache {
    pub memory_size: Option<String>,
    pub memory_size_in_bytes: i64,
    pub total_count: i64,
    pub hit_count: i64,
    pub miss_count: i64,
    pub cache_size: i64,
    pub cache_count: i64,
    pub evictions: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexStatsFielddata {
    pub memory_size: Option<String>,
    pub memory_size_in_bytes: i64,
    pub evictions: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexStatsCompletion {
    pub size: Option<String>,
    pub size_in_bytes: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexStatsSegments {
    pub count: i64,
    pub memory: Option<String>,
    pub memory_in_bytes: i64,
    pub terms_memory: Option<String>,
    pub terms_memory_in_bytes: i64,
    pub stored_fields_memory: Option<String>,
    pub stored_fields_memory_in_bytes: i64,
    pub term_vectors_memory: Option<String>,
    pub term_vectors_memory_in_bytes: i64,
    pub norms_memory: Option<String>,
    pub norms_memory_in_bytes: i64,
    pub points_memory: Option<String>,
    pub points_memory_in_bytes: i64,
    pub doc_values_memory: Option<String>,
    pub doc_values_memory_in_bytes: i64,
    pub index_writer_memory: Option<String>,
    pub index_writer_memory_in_bytes: i64,
    pub version_map_memory: Option<String>,
    pub version_map_memory_in_bytes: i64,
    pub fixed_bit_set: Option<String>,
    pub fixed_bit_set_memory_in_bytes: i64,
    pub max_unsafe_auto_id_timestamp: i64,
    pub file_sizes: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexStatsTranslog {
    pub operations: i64,
    pub size: Option<String>,
    pub size_in_bytes: i64,
    pub uncommitted_operations: i64,
    pub uncommitted_size: Option<String>,
    pub uncommitted_size_in_bytes: i64,
    pub earliest_last_modified_age: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexStatsRequestCache {
    pub memory_size: Option<String>,
    pub memory_size_in_bytes: i64,
    pub evictions: i64,
    pub hit_count: i64,
    pub miss_count: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexStatsCommit {
    pub id: String,
    pub generation: i64,
    pub user_data: BTreeMap<String, String>,
    pub num_docs: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexStatsSeqNo {
    pub max_seq_no: i64,
    pub local_checkpoint: i64,
    pub global_checkpoint: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexStatsRetentionLeases {
    pub primary_term: i64,
    pub version: i64,
    pub leases: Vec<IndexStatsRetentionLease>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexStatsRetentionLease {
    pub id: String,
    pub retaining_seq_no: i64,
    pub timestamp: i64,
    pub source: String,
}

/// Add an alias to one or more indices.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AliasAddAction {
    indices: Vec<String>,
    alias: String,
    filter: Option<Value>,
    routing: Option<String>,
    index_routing: Option<String>,
    search_routing: Option<String>,
    is_write_index: Option<bool>,
}

impl AliasAddAction {
    pub fn new(alias: &str) -> Self {
        Self {
            alias: alias.to_string(),
            ..Self::default()
        }
    }

    pub fn index<I, S>(mut self, indices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.indices.extend(strings(indices));
        self
    }

    pub fn filter(mut self, query: &dyn Query) -> Self {
        self.filter = Some(query.source());
        self
    }

    pub fn routing(mut self, routing: &str) -> Self {
        self.routing = Some(routing.to_string());
        self
    }

    pub fn index_routing(mut self, routing: &str) -> Self {
        self.index_routing = Some(routing.to_string());
        self
    }

    pub fn search_routing(mut self, routing: &str) -> Self {
        self.search_routing = Some(routing.to_string());
        self
    }

    pub fn is_write_index(mut self, flag: bool) -> Self {
        self.is_write_index = Some(flag);
        self
    }
}

/// Remove an alias from one or more indices.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AliasRemoveAction {
    indices: Vec<String>,
    alias: String,
}

impl AliasRemoveAction {
    pub fn new(alias: &str) -> Self {
        Self {
            alias: alias.to_string(),
            indices: Vec::new(),
        }
    }

    pub fn index<I, S>(mut self, indices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.indices.extend(strings(indices));
        self
    }
}

/// Delete an index as part of an atomic alias swap.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AliasRemoveIndexAction {
    indices: Vec<String>,
}

impl AliasRemoveIndexAction {
    pub fn new<I, S>(indices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            indices: strings(indices),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AliasAction {
    Add(AliasAddAction),
    Remove(AliasRemoveAction),
    RemoveIndex(AliasRemoveIndexAction),
}

impl From<AliasAddAction> for AliasAction {
    fn from(action: AliasAddAction) -> Self {
        AliasAction::Add(action)
    }
}

impl From<AliasRemoveAction> for AliasAction {
    fn from(action: AliasRemoveAction) -> Self {
        AliasAction::Remove(action)
    }
}

impl From<AliasRemoveIndexAction> for AliasAction {
    fn from(action: AliasRemoveIndexAction) -> Self {
        AliasAction::RemoveIndex(action)
    }
}

fn insert_indices(body: &mut Map<String, Value>, indices: &[String]) {
    match indices {
        [single] => {
            body.insert("index".into(), json!(single));
        }
        many => {
            body.insert("indices".into(), json!(many));
        }
    }
}

impl AliasAction {
    fn indices(&self) -> &[String] {
        match self {
            AliasAction::Add(a) => &a.indices,
            AliasAction::Remove(a) => &a.indices,
            AliasAction::RemoveIndex(a) => &a.indices,
        }
    }

    fn alias(&self) -> Option<&str> {
        match self {
            AliasAction::Add(a) => Some(&a.alias),
            AliasAction::Remove(a) => Some(&a.alias),
            AliasAction::RemoveIndex(_) => None,
        }
    }

    /// JSON form, e.g. `{"add":{"index":"a","alias":"b"}}`.
    pub fn source(&self) -> Value {
        let mut body = Map::new();
        insert_indices(&mut body, self.indices());
        if let Some(alias) = self.alias() {
            body.insert("alias".into(), json!(alias));
        }
        let name = match self {
            AliasAction::Add(add) => {
                let optional = [
                    ("filter", add.filter.clone()),
                    ("routing", add.routing.as_ref().map(|v| json!(v))),
                    ("index_routing", add.index_routing.as_ref().map(|v| json!(v))),
                    ("search_routing", add.search_routing.as_ref().map(|v| json!(v))),
                    ("is_write_index", add.is_write_index.map(|v| json!(v))),
                ];
                for (key, value) in optional {
                    if let Some(value) = value {
                        body.insert(key.into(), value);
                    }
                }
                "add"
            }
            AliasAction::Remove(_) => "remove",
            AliasAction::RemoveIndex(_) => "remove_index",
        };
        let mut source = Map::new();
        source.insert(name.to_string(), Value::Object(body));
        Value::Object(source)
    }

    fn missing_fields(&self, missing: &mut Missing) {
        missing.check("Index", !self.indices().is_empty());
        if let Some(alias) = self.alias() {
            missing.check("Alias", !alias.is_empty());
        }
    }
}

/// `POST /_aliases`
#[derive(Debug, Clone)]
pub struct IndicesAliases<'a> {
    client: &'a Client,
    common: CommonParams,
    actions: Vec<AliasAction>,
    timeout: Option<String>,
    master_timeout: Option<String>,
}

impl<'a> IndicesAliases<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self {
            client,
            common: CommonParams::default(),
            actions: Vec::new(),
            timeout: None,
            master_timeout: None,
        }
    }

    common_setters!();

    pub fn action(mut self, action: impl Into<AliasAction>) -> Self {
        self.actions.push(action.into());
        self
    }

    pub fn add(self, index: &str, alias: &str) -> Self {
        self.action(AliasAddAction::new(alias).index([index]))
    }

    pub fn add_with_filter(self, index: &str, alias: &str, filter: &dyn Query) -> Self {
        self.action(AliasAddAction::new(alias).index([index]).filter(filter))
    }

    pub fn remove(self, index: &str, alias: &str) -> Self {
        self.action(AliasRemoveAction::new(alias).index([index]))
    }

    pub fn timeout(mut self, timeout: &str) -> Self {
        self.timeout = Some(timeout.to_string());
        self
    }

    pub fn master_timeout(mut self, timeout: &str) -> Self {
        self.master_timeout = Some(timeout.to_string());
        self
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        let mut missing = Missing::new();
        missing.check("Actions", !self.actions.is_empty());
        for action in &self.actions {
            action.missing_fields(&mut missing);
        }
        missing.finish()
    }

    pub fn send(self) -> Result<AcknowledgedResponse, ApiError> {
        self.client.send(&self)
    }
}

impl Endpoint for IndicesAliases<'_> {
    type Response = AcknowledgedResponse;

    fn build_request(&self) -> Result<HttpRequest, ApiError> {
        self.validate()?;
        let mut req = HttpRequest::new(HttpMethod::Post, "/_aliases");
        self.common.apply(&mut req);
        req.params.opt("timeout", &self.timeout);
        req.params.opt("master_timeout", &self.master_timeout);
        let actions: Vec<Value> = self.actions.iter().map(AliasAction::source).collect();
        req.json_body(&json!({ "actions": actions }))?;
        Ok(req)
    }

    fn parse_response(&self, response: HttpResponse) -> Result<AcknowledgedResponse, ApiError> {
        decode_success(&response)
    }
}

/// `GET [/{index}]/_settings[/{name}]`
#[derive(Debug, Clone)]
pub struct IndicesGetSettings<'a> {
    client: &'a Client,
    common: CommonParams,
    indices: Vec<String>,
    names: Vec<String>,
    local: Option<bool>,
    flat_settings: Option<bool>,
    include_defaults: Option<bool>,
    allow_no_indices: Option<bool>,
    expand_wildcards: Option<String>,
    ignore_unavailable: Option<bool>,
    master_timeout: Option<String>,
}

impl<'a> IndicesGetSettings<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self {
            client,
            common: CommonParams::default(),
            indices: Vec::new(),
            names: Vec::new(),
            local: None,
            flat_settings: None,
            include_defaults: None,
            allow_no_indices: None,
            expand_wildcards: None,
            ignore_unavailable: None,
            master_timeout: None,
        }
    }

    common_setters!();

    pub fn index<I, S>(mut self, indices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.indices.extend(strings(indices));
        self
    }

    /// Setting names or wildcard patterns, e.g. `index.number_*`.
    pub fn name<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.names.extend(strings(names));
        self
    }

    pub fn local(mut self, local: bool) -> Self {
        self.local = Some(local);
        self
    }

    pub fn flat_settings(mut self, flat: bool) -> Self {
        self.flat_settings = Some(flat);
        self
    }

    pub fn include_defaults(mut self, include: bool) -> Self {
        self.include_defaults = Some(include);
        self
    }

    pub fn allow_no_indices(mut self, allow: bool) -> Self {
        self.allow_no_indices = Some(allow);
        self
    }

    pub fn expand_wildcards(mut self, expand: &str) -> Self {
        self.expand_wildcards = Some(expand.to_string());
        self
    }

    pub fn ignore_unavailable(mut self, ignore: bool) -> Self {
        self.ignore_unavailable = Some(ignore);
        self
    }

    pub fn master_timeout(mut self, timeout: &str) -> Self {
        self.master_timeout = Some(timeout.to_string());
        self
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        Ok(())
    }

    pub fn send(self) -> Result<BTreeMap<String, IndexSettings>, ApiError> {
        self.client.send(&self)
    }
}

impl Endpoint for IndicesGetSettings<'_> {
    type Response = BTreeMap<String, IndexSettings>;

    fn build_request(&self) -> Result<HttpRequest, ApiError> {
        self.validate()?;
        let index = if self.indices.is_empty() {
            "_all".to_string()
        } else {
            segments(&self.indices)
        };
        let path = if self.names.is_empty() {
            expand("/{index}/_settings", &[("index", index)])?
        } else {
            expand(
                "/{index}/_settings/{name}",
                &[("index", index), ("name", segments(&self.names))],
            )?
        };
        let mut req = HttpRequest::new(HttpMethod::Get, path);
        self.common.apply(&mut req);
        let p = &mut req.params;
        p.opt("local", &self.local);
        p.opt("flat_settings", &self.flat_settings);
        p.opt("include_defaults", &self.include_defaults);
        p.opt("allow_no_indices", &self.allow_no_indices);
        p.opt("expand_wildcards", &self.expand_wildcards);
        p.opt("ignore_unavailable", &self.ignore_unavailable);
        p.opt("master_timeout", &self.master_timeout);
        Ok(req)
    }

    fn parse_response(&self, response: HttpResponse) -> Result<Self::Response, ApiError> {
        decode_success(&response)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexSettings {
    pub settings: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defaults: Option<Map<String, Value>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::TermQuery;
    use crate::testing::{offline_client, ScriptedTransport};

    #[test]
    fn create_builds_body_from_parts() {
        let client = offline_client();
        let req = client
            .create_index("twitter")
            .settings(json!({"number_of_shards": 1}))
            .mappings(json!({"properties": {"user": {"type": "keyword"}}}))
            .alias("tweets", json!({}))
            .wait_for_active_shards("1")
            .include_type_name(false)
            .build_request()
            .unwrap();
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.path, "/twitter");
        assert_eq!(req.params.get("wait_for_active_shards"), Some("1"));
        assert_eq!(req.params.get("include_type_name"), Some("false"));
        let body: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["settings"]["number_of_shards"], 1);
        assert_eq!(body["mappings"]["properties"]["user"]["type"], "keyword");
        assert_eq!(body["aliases"]["tweets"], json!({}));
    }

    #[test]
    fn create_raw_body_wins_and_empty_has_no_body() {
        let client = offline_client();
        let req = client
            .create_index("a")
            .settings(json!({"x": 1}))
            .body(json!({"settings": {"y": 2}}))
            .build_request()
            .unwrap();
        assert_eq!(req.body.as_deref(), Some(r#"{"settings":{"y":2}}"#));
        assert!(client.create_index("a").build_request().unwrap().body.is_none());
    }

    #[test]
    fn create_requires_index() {
        let client = offline_client();
        let err = IndicesCreate::new(&client).build_request().unwrap_err();
        assert_eq!(err.to_string(), "missing required fields: [Index]");
    }

    #[test]
    fn delete_returns_not_found_with_body() {
        let transport = ScriptedTransport::new();
        transport.respond(
            404,
            r#"{"error":{"type":"index_not_found_exception","reason":"no such index [nope]"},"status":404}"#,
        );
        let client = transport.client();
        let outcome = client.delete_index(["nope"]).send().unwrap();
        assert!(outcome.is_not_found());
        assert!(!outcome.response().acknowledged);
        let err = outcome.error().unwrap();
        assert_eq!(err.details().unwrap().kind, "index_not_found_exception");
        assert_eq!(transport.requests()[0].method, HttpMethod::Delete);
        assert_eq!(transport.requests()[0].path, "/nope");
    }

    #[test]
    fn delete_joins_indices() {
        let client = offline_client();
        let req = client
            .delete_index(["a", "b/c"])
            .ignore_unavailable(true)
            .build_request()
            .unwrap();
        assert_eq!(req.path, "/a,b%2Fc");
        assert_eq!(req.params.get("ignore_unavailable"), Some("true"));
    }

    #[test]
    fn exists_maps_status_to_bool() {
        let transport = ScriptedTransport::new();
        transport.respond(200, "");
        transport.respond(404, "");
        let client = transport.client();
        assert!(client.index_exists(["twitter"]).send().unwrap());
        assert!(!client.index_exists(["missing"]).send().unwrap());
        assert_eq!(transport.requests()[0].method, HttpMethod::Head);
    }

    #[test]
    fn exists_requires_index() {
        let client = offline_client();
        assert!(IndicesExists::new(&client).validate().is_err());
    }

    #[test]
    fn refresh_paths() {
        let client = offline_client();
        assert_eq!(
            client.refresh(Vec::<String>::new()).build_request().unwrap().path,
            "/_refresh"
        );
        let req = client.refresh(["a", "b"]).build_request().unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "/a,b/_refresh");
        let refreshed = client
            .refresh(["a"])
            .parse_response(HttpResponse::new(200, r#"{"_shards":{"total":2,"successful":1,"failed":0}}"#))
            .unwrap();
        assert_eq!(refreshed.shards.total, 2);
        assert_eq!(refreshed.shards.successful, 1);
    }

    #[test]
    fn stats_paths_and_params() {
        let client = offline_client();
        assert_eq!(client.indices_stats().build_request().unwrap().path, "/_stats");
        assert_eq!(
            client.indices_stats().metric(["docs", "store"]).build_request().unwrap().path,
            "/_stats/docs,store"
        );
        let req = client
            .indices_stats()
            .index(["twitter"])
            .metric(["indexing"])
            .level("shards")
            .groups(["g1", "g2"])
            .fields(["title"])
            .build_request()
            .unwrap();
        assert_eq!(req.path, "/twitter/_stats/indexing");
        assert_eq!(req.params.get("level"), Some("shards"));
        assert_eq!(req.params.get("groups"), Some("g1,g2"));
        assert_eq!(req.params.get("fields"), Some("title"));
        assert!(!req.params.contains("types"));
    }

    #[test]
    fn stats_decode_sections() {
        let body = r#"{
            "_shards":{"total":10,"successful":5,"failed":0},
            "_all":{"primaries":{"docs":{"count":3,"deleted":1},"store":{"size_in_bytes":1024}},
                    "total":{"docs":{"count":6,"deleted":2}}},
            "indices":{"twitter":{"uuid":"abc",
                "primaries":{"get":{"total":4,"getTime":"1ms","time_in_millis":1},
                             "segments":{"count":2,"memory_in_bytes":10,"file_sizes":{}}},
                "total":{},
                "shards":{"0":[{"routing":{"state":"STARTED","primary":true,"node":"n1","relocating_node":null},
                                "seq_no":{"max_seq_no":5,"local_checkpoint":5,"global_checkpoint":5}}]}}}
        }"#;
        let client = offline_client();
        let stats = client
            .indices_stats()
            .parse_response(HttpResponse::new(200, body))
            .unwrap();
        assert_eq!(stats.shards.total, 10);
        assert_eq!(stats.all.primaries.docs.as_ref().unwrap().count, 3);
        assert_eq!(stats.all.primaries.store.as_ref().unwrap().size_in_bytes, 1024);
        assert_eq!(stats.all.total.docs.as_ref().unwrap().deleted, 2);
        let twitter = &stats.indices["twitter"];
        assert_eq!(twitter.uuid.as_deref(), Some("abc"));
        let get = twitter.primaries.get.as_ref().unwrap();
        assert_eq!(get.get_time.as_deref(), Some("1ms"));
        assert_eq!(twitter.primaries.segments.as_ref().unwrap().count, 2);
        let shard = &twitter.shards["0"][0];
        assert!(shard.routing.as_ref().unwrap().primary);
        assert_eq!(shard.seq_no.as_ref().unwrap().max_seq_no, 5);
    }

    #[test]
    fn aliases_body_shapes() {
        let client = offline_client();
        let req = client
            .aliases()
            .add("twitter", "alias1")
            .add_with_filter("twitter", "alias2", &TermQuery::new("user", "kimchy"))
            .action(AliasAddAction::new("alias3").index(["a", "b"]).routing("1").is_write_index(true))
            .remove("twitter", "old")
            .action(AliasRemoveIndexAction::new(["stale"]))
            .build_request()
            .unwrap();
        assert_eq!(req.path, "/_aliases");
        let body: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(
            body,
            json!({"actions":[
                {"add":{"index":"twitter","alias":"alias1"}},
                {"add":{"index":"twitter","alias":"alias2","filter":{"term":{"user":"kimchy"}}}},
                {"add":{"indices":["a","b"],"alias":"alias3","routing":"1","is_write_index":true}},
                {"remove":{"index":"twitter","alias":"old"}},
                {"remove_index":{"index":"stale"}}
            ]})
        );
    }

    #[test]
    fn aliases_validation_collects_every_gap() {
        let client = offline_client();
        let err = client.aliases().validate().unwrap_err();
        assert_eq!(err.to_string(), "missing required fields: [Actions]");
        let err = client
            .aliases()
            .action(AliasAddAction::new(""))
            .validate()
            .unwrap_err();
        assert_eq!(err.to_string(), "missing required fields: [Index, Alias]");
    }

    #[test]
    fn get_settings_paths_and_decode() {
        let client = offline_client();
        assert_eq!(
            client.index_get_settings().build_request().unwrap().path,
            "/_all/_settings"
        );
        let req = client
            .index_get_settings()
            .index(["twitter"])
            .name(["index.number_*"])
            .flat_settings(true)
            .build_request()
            .unwrap();
        assert_eq!(req.path, "/twitter/_settings/index.number_%2A");
        assert_eq!(req.params.get("flat_settings"), Some("true"));

        let settings = client
            .index_get_settings()
            .parse_response(HttpResponse::new(
                200,
                r#"{"twitter":{"settings":{"index":{"number_of_shards":"1"}}}}"#,
            ))
            .unwrap();
        assert_eq!(settings["twitter"].settings["index"]["number_of_shards"], "1");
    }
}
