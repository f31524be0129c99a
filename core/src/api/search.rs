//! `_search` and `_msearch`, plus the result types they share with scroll.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::ShardsInfo;
use crate::client::{decode_success, Client, Endpoint};
use crate::de::TotalHits;
use crate::error::{ApiError, ErrorDetails};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::params::{expand, segments, strings, CommonParams, Missing};
use crate::query::{Aggregation, Query, SearchSource, SortInfo};

impl Client {
    pub fn search<I, S>(&self, indices: I) -> Search<'_>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Search::new(self).index(indices)
    }

    pub fn multi_search(&self) -> MultiSearch<'_> {
        MultiSearch::new(self)
    }
}

pub(crate) fn search_path(indices: &[String], suffix: &str) -> Result<String, ApiError> {
    if indices.is_empty() {
        Ok(format!("/{suffix}"))
    } else {
        expand(&format!("/{{index}}/{suffix}"), &[("index", segments(indices))])
    }
}

pub(crate) fn to_json_line(value: &Value) -> Result<String, ApiError> {
    serde_json::to_string(value).map_err(|e| ApiError::SerializationError(e.to_string()))
}

/// `POST [/{index}]/_search`
#[derive(Debug, Clone)]
pub struct Search<'a> {
    client: &'a Client,
    common: CommonParams,
    indices: Vec<String>,
    source: SearchSource,
    body: Option<Value>,
    search_type: Option<String>,
    routing: Vec<String>,
    preference: Option<String>,
    request_cache: Option<bool>,
    ignore_unavailable: Option<bool>,
    ignore_throttled: Option<bool>,
    allow_no_indices: Option<bool>,
    expand_wildcards: Option<String>,
    lenient: Option<bool>,
    allow_partial_search_results: Option<bool>,
    typed_keys: Option<bool>,
    seq_no_primary_term: Option<bool>,
    batched_reduce_size: Option<i64>,
    max_concurrent_shard_requests: Option<i64>,
    pre_filter_shard_size: Option<i64>,
    rest_total_hits_as_int: Option<bool>,
    ccs_minimize_roundtrips: Option<bool>,
    max_response_size: Option<u64>,
}

impl<'a> Search<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self {
            client,
            common: CommonParams::default(),
            indices: Vec::new(),
            source: SearchSource::new(),
            body: None,
            search_type: None,
            routing: Vec::new(),
            preference: None,
            request_cache: None,
            ignore_unavailable: None,
            ignore_throttled: None,
            allow_no_indices: None,
            expand_wildcards: None,
            lenient: None,
            allow_partial_search_results: None,
            typed_keys: None,
            seq_no_primary_term: None,
            batched_reduce_size: None,
            max_concurrent_shard_requests: None,
            pre_filter_shard_size: None,
            rest_total_hits_as_int: None,
            ccs_minimize_roundtrips: None,
            max_response_size: None,
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

    /// Replace the whole request body.
    pub fn search_source(mut self, source: SearchSource) -> Self {
        self.source = source;
        self
    }

    /// Raw body. Takes precedence over the search source.
    pub fn body_json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn query(mut self, query: impl Query) -> Self {
        self.source = std::mem::take(&mut self.source).query(query);
        self
    }

    pub fn post_filter(mut self, filter: impl Query) -> Self {
        self.source = std::mem::take(&mut self.source).post_filter(filter);
        self
    }

    pub fn from(mut self, from: i64) -> Self {
        self.source = std::mem::take(&mut self.source).from(from);
        self
    }

    pub fn size(mut self, size: i64) -> Self {
        self.source = std::mem::take(&mut self.source).size(size);
        self
    }

    pub fn sort(mut self, field: &str, ascending: bool) -> Self {
        self.source = std::mem::take(&mut self.source).sort(field, ascending);
        self
    }

    pub fn sort_by(mut self, sort: SortInfo) -> Self {
        self.source = std::mem::take(&mut self.source).sort_by(sort);
        self
    }

    pub fn aggregation(mut self, name: &str, aggregation: impl Aggregation) -> Self {
        self.source = std::mem::take(&mut self.source).aggregation(name, aggregation);
        self
    }

    pub fn fetch_source(mut self, fetch: bool) -> Self {
        self.source = std::mem::take(&mut self.source).fetch_source(fetch);
        self
    }

    pub fn track_total_hits(mut self, track: impl Into<Value>) -> Self {
        self.source = std::mem::take(&mut self.source).track_total_hits(track);
        self
    }

    pub fn search_after<I, V>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.source = std::mem::take(&mut self.source).search_after(values);
        self
    }

    pub fn timeout(mut self, timeout: &str) -> Self {
        self.source = std::mem::take(&mut self.source).timeout(timeout);
        self
    }

    pub fn search_type(mut self, search_type: &str) -> Self {
        self.search_type = Some(search_type.to_string());
        self
    }

    pub fn routing<I, S>(mut self, routings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.routing.extend(strings(routings));
        self
    }

    pub fn preference(mut self, preference: &str) -> Self {
        self.preference = Some(preference.to_string());
        self
    }

    pub fn request_cache(mut self, enabled: bool) -> Self {
        self.request_cache = Some(enabled);
        self
    }

    pub fn ignore_unavailable(mut self, ignore: bool) -> Self {
        self.ignore_unavailable = Some(ignore);
        self
    }

    pub fn ignore_throttled(mut self, ignore: bool) -> Self {
        self.ignore_throttled = Some(ignore);
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

    pub fn lenient(mut self, lenient: bool) -> Self {
        self.lenient = Some(lenient);
        self
    }

    pub fn allow_partial_search_results(mut self, allow: bool) -> Self {
        self.allow_partial_search_results = Some(allow);
        self
    }

    /// Prefix aggregation names with their type in the response.
    pub fn typed_keys(mut self, enabled: bool) -> Self {
        self.typed_keys = Some(enabled);
        self
    }

    pub fn seq_no_primary_term(mut self, enabled: bool) -> Self {
        self.seq_no_primary_term = Some(enabled);
        self
    }

    pub fn batched_reduce_size(mut self, size: i64) -> Self {
        self.batched_reduce_size = Some(size);
        self
    }

    pub fn max_concurrent_shard_requests(mut self, max: i64) -> Self {
        self.max_concurrent_shard_requests = Some(max);
        self
    }

    pub fn pre_filter_shard_size(mut self, threshold: i64) -> Self {
        self.pre_filter_shard_size = Some(threshold);
        self
    }

    pub fn rest_total_hits_as_int(mut self, enabled: bool) -> Self {
        self.rest_total_hits_as_int = Some(enabled);
        self
    }

    pub fn ccs_minimize_roundtrips(mut self, enabled: bool) -> Self {
        self.ccs_minimize_roundtrips = Some(enabled);
        self
    }

    /// Fail the request when the response body exceeds this many bytes.
    pub fn max_response_size(mut self, bytes: u64) -> Self {
        self.max_response_size = Some(bytes);
        self
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        Ok(())
    }

    pub fn send(self) -> Result<SearchResult, ApiError> {
        self.client.send(&self)
    }
}

impl Endpoint for Search<'_> {
    type Response = SearchResult;

    fn build_request(&self) -> Result<HttpRequest, ApiError> {
        self.validate()?;
        let mut req = HttpRequest::new(HttpMethod::Post, search_path(&self.indices, "_search")?);
        self.common.apply(&mut req);
        let p = &mut req.params;
        p.opt("search_type", &self.search_type);
        p.list("routing", &self.routing);
        p.opt("preference", &self.preference);
        p.opt("request_cache", &self.request_cache);
        p.opt("allow_no_indices", &self.allow_no_indices);
        p.opt("expand_wildcards", &self.expand_wildcards);
        p.opt("lenient", &self.lenient);
        p.opt("ignore_unavailable", &self.ignore_unavailable);
        p.opt("ignore_throttled", &self.ignore_throttled);
        p.opt("seq_no_primary_term", &self.seq_no_primary_term);
        p.opt("allow_partial_search_results", &self.allow_partial_search_results);
        p.opt("typed_keys", &self.typed_keys);
        p.opt("batched_reduce_size", &self.batched_reduce_size);
        p.opt("max_concurrent_shard_requests", &self.max_concurrent_shard_requests);
        p.opt("pre_filter_shard_size", &self.pre_filter_shard_size);
        p.opt("rest_total_hits_as_int", &self.rest_total_hits_as_int);
        p.opt("ccs_minimize_roundtrips", &self.ccs_minimize_roundtrips);
        match &self.body {
            Some(body) => req.json_body(body)?,
            None => req.json_body(&self.source.source())?,
        }
        req.max_response_size = self.max_response_size;
        Ok(req)
    }

    fn parse_response(&self, response: HttpResponse) -> Result<SearchResult, ApiError> {
        decode_success(&response)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchResult {
    pub took: i64,
    pub timed_out: bool,
    pub terminated_early: bool,
    pub num_reduce_phases: i64,
    #[serde(rename = "_clusters", skip_serializing_if = "Option::is_none")]
    pub clusters: Option<ClustersInfo>,
    #[serde(rename = "_scroll_id", skip_serializing_if = "Option::is_none")]
    pub scroll_id: Option<String>,
    pub hits: SearchHits,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub suggest: BTreeMap<String, Vec<SearchSuggestion>>,
    #[serde(skip_serializing_if = "Aggregations::is_empty")]
    pub aggregations: Aggregations,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<Value>,
    #[serde(rename = "_shards", skip_serializing_if = "Option::is_none")]
    pub shards: Option<ShardsInfo>,
    /// Only set inside a multi-search response.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    /// Only set inside a multi-search response.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorDetails>,
}

impl SearchResult {
    /// Total hit count, or 0 when the response carries none.
    pub fn total_hits(&self) -> i64 {
        self.hits.total.as_ref().map_or(0, |t| t.value)
    }

    /// Decode the `_source` of every hit that has one.
    pub fn each<T: DeserializeOwned>(&self) -> Result<Vec<T>, ApiError> {
        self.hits
            .hits
            .iter()
            .filter_map(|hit| hit.source.as_ref())
            .map(|source| {
                T::deserialize(source).map_err(|e| ApiError::DeserializationError(e.to_string()))
            })
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClustersInfo {
    pub total: i64,
    pub successful: i64,
    pub skipped: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchHits {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<TotalHits>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_score: Option<f64>,
    pub hits: Vec<SearchHit>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchHit {
    #[serde(rename = "_score", skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(rename = "_index")]
    pub index: String,
    #[serde(rename = "_type", skip_serializing_if = "Option::is_none")]
    pub doc_type: Option<String>,
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_routing", skip_serializing_if = "Option::is_none")]
    pub routing: Option<String>,
    #[serde(rename = "_version", skip_serializing_if = "Option::is_none")]
    pub version: Option<i64>,
    #[serde(rename = "_seq_no", skip_serializing_if = "Option::is_none")]
    pub seq_no: Option<i64>,
    #[serde(rename = "_primary_term", skip_serializing_if = "Option::is_none")]
    pub primary_term: Option<i64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sort: Vec<Value>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub highlight: BTreeMap<String, Vec<String>>,
    #[serde(rename = "_source", skip_serializing_if = "Option::is_none")]
    pub source: Option<Value>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub fields: BTreeMap<String, Value>,
    #[serde(rename = "_explanation", skip_serializing_if = "Option::is_none")]
    pub explanation: Option<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub matched_queries: Vec<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub inner_hits: BTreeMap<String, InnerHits>,
    #[serde(rename = "_nested", skip_serializing_if = "Option::is_none")]
    pub nested: Option<Value>,
    #[serde(rename = "_shard", skip_serializing_if = "Option::is_none")]
    pub shard: Option<String>,
    #[serde(rename = "_node", skip_serializing_if = "Option::is_none")]
    pub node: Option<String>,
}

impl SearchHit {
    pub fn source_as<T: DeserializeOwned>(&self) -> Result<Option<T>, ApiError> {
        self.source
            .as_ref()
            .map(|s| T::deserialize(s).map_err(|e| ApiError::DeserializationError(e.to_string())))
            .transpose()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InnerHits {
    pub hits: SearchHits,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSuggestion {
    pub text: String,
    pub offset: i64,
    pub length: i64,
    pub options: Vec<Value>,
}

/// Aggregation results by name, decoded on demand.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Aggregations(pub BTreeMap<String, Value>);

impl Aggregations {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    fn decode<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>, ApiError> {
        self.0
            .get(name)
            .map(|v| T::deserialize(v).map_err(|e| ApiError::DeserializationError(e.to_string())))
            .transpose()
    }

    /// Buckets of a `terms` aggregation.
    pub fn terms(&self, name: &str) -> Result<Option<BucketKeyItems>, ApiError> {
        self.decode(name)
    }

    /// Buckets of a `composite` aggregation.
    pub fn composite(&self, name: &str) -> Result<Option<CompositeItems>, ApiError> {
        self.decode(name)
    }

    /// `value` of a single-value metric such as `min`, `max` or `sum`.
    pub fn value(&self, name: &str) -> Option<f64> {
        self.0.get(name)?.get("value")?.as_f64()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BucketKeyItems {
    pub doc_count_error_upper_bound: i64,
    pub sum_other_doc_count: i64,
    pub buckets: Vec<BucketKeyItem>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BucketKeyItem {
    pub key: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_as_string: Option<String>,
    pub doc_count: i64,
    /// Sub-aggregations.
    #[serde(flatten)]
    pub aggregations: Aggregations,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompositeItems {
    /// Pass to `CompositeAggregation::after_key` to fetch the next page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after_key: Option<Map<String, Value>>,
    pub buckets: Vec<CompositeBucket>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompositeBucket {
    pub key: Map<String, Value>,
    pub doc_count: i64,
    #[serde(flatten)]
    pub aggregations: Aggregations,
}

/// One search of a multi-search, or the search behind a reindex source.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchRequest {
    indices: Vec<String>,
    search_type: Option<String>,
    routing: Vec<String>,
    preference: Option<String>,
    request_cache: Option<bool>,
    ignore_unavailable: Option<bool>,
    allow_no_indices: Option<bool>,
    expand_wildcards: Option<String>,
    allow_partial_search_results: Option<bool>,
    source: SearchSource,
    body: Option<Value>,
}

impl SearchRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn index<I, S>(mut self, indices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.indices.extend(strings(indices));
        self
    }

    pub fn indices(&self) -> &[String] {
        &self.indices
    }

    pub fn has_indices(&self) -> bool {
        !self.indices.is_empty()
    }

    pub fn search_type(mut self, search_type: &str) -> Self {
        self.search_type = Some(search_type.to_string());
        self
    }

    pub fn routing<I, S>(mut self, routings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.routing.extend(strings(routings));
        self
    }

    pub fn preference(mut self, preference: &str) -> Self {
        self.preference = Some(preference.to_string());
        self
    }

    pub fn request_cache(mut self, enabled: bool) -> Self {
        self.request_cache = Some(enabled);
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

    pub fn allow_partial_search_results(mut self, allow: bool) -> Self {
        self.allow_partial_search_results = Some(allow);
        self
    }

    pub fn search_source(mut self, source: SearchSource) -> Self {
        self.source = source;
        self
    }

    pub fn body_json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn query(mut self, query: impl Query) -> Self {
        self.source = std::mem::take(&mut self.source).query(query);
        self
    }

    pub fn from(mut self, from: i64) -> Self {
        self.source = std::mem::take(&mut self.source).from(from);
        self
    }

    pub fn size(mut self, size: i64) -> Self {
        self.source = std::mem::take(&mut self.source).size(size);
        self
    }

    pub fn sort(mut self, field: &str, ascending: bool) -> Self {
        self.source = std::mem::take(&mut self.source).sort(field, ascending);
        self
    }

    pub fn aggregation(mut self, name: &str, aggregation: impl Aggregation) -> Self {
        self.source = std::mem::take(&mut self.source).aggregation(name, aggregation);
        self
    }

    /// The `_msearch` header line.
    pub fn header(&self) -> Value {
        let mut h = Map::new();
        if let Some(v) = &self.search_type {
            h.insert("search_type".into(), Value::from(v.as_str()));
        }
        match self.indices.as_slice() {
            [] => {}
            [one] => {
                h.insert("index".into(), Value::from(one.as_str()));
            }
            many => {
                h.insert("indices".into(), Value::from(many.to_vec()));
            }
        }
        if !self.routing.is_empty() {
            h.insert("routing".into(), Value::from(self.routing.join(",")));
        }
        if let Some(v) = &self.preference {
            h.insert("preference".into(), Value::from(v.as_str()));
        }
        let flags = [
            ("request_cache", self.request_cache),
            ("ignore_unavailable", self.ignore_unavailable),
            ("allow_no_indices", self.allow_no_indices),
            ("allow_partial_search_results", self.allow_partial_search_results),
        ];
        for (key, value) in flags {
            if let Some(value) = value {
                h.insert(key.into(), Value::from(value));
            }
        }
        if let Some(v) = &self.expand_wildcards {
            h.insert("expand_wildcards".into(), Value::from(v.as_str()));
        }
        Value::Object(h)
    }

    /// The search body: the raw body if set, otherwise the search source.
    pub fn body(&self) -> Value {
        match &self.body {
            Some(body) => body.clone(),
            None => self.source.source(),
        }
    }
}

/// `POST [/{index}]/_msearch`
#[derive(Debug, Clone)]
pub struct MultiSearch<'a> {
    client: &'a Client,
    common: CommonParams,
    indices: Vec<String>,
    requests: Vec<SearchRequest>,
    max_concurrent_searches: Option<i64>,
    pre_filter_shard_size: Option<i64>,
    rest_total_hits_as_int: Option<bool>,
}

impl<'a> MultiSearch<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self {
            client,
            common: CommonParams::default(),
            indices: Vec::new(),
            requests: Vec::new(),
            max_concurrent_searches: None,
            pre_filter_shard_size: None,
            rest_total_hits_as_int: None,
        }
    }

    common_setters!();

    /// Default indices for searches whose header names none.
    pub fn index<I, S>(mut self, indices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.indices.extend(strings(indices));
        self
    }

    pub fn add(mut self, request: SearchRequest) -> Self {
        self.requests.push(request);
        self
    }

    pub fn max_concurrent_searches(mut self, max: i64) -> Self {
        self.max_concurrent_searches = Some(max);
        self
    }

    pub fn pre_filter_shard_size(mut self, threshold: i64) -> Self {
        self.pre_filter_shard_size = Some(threshold);
        self
    }

    pub fn rest_total_hits_as_int(mut self, enabled: bool) -> Self {
        self.rest_total_hits_as_int = Some(enabled);
        self
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        Missing::new()
            .check("Requests", !self.requests.is_empty())
            .finish()
    }

    pub fn send(self) -> Result<MultiSearchResult, ApiError> {
        self.client.send(&self)
    }
}

impl Endpoint for MultiSearch<'_> {
    type Response = MultiSearchResult;

    fn build_request(&self) -> Result<HttpRequest, ApiError> {
        self.validate()?;
        let mut req = HttpRequest::new(HttpMethod::Post, search_path(&self.indices, "_msearch")?);
        self.common.apply(&mut req);
        let p = &mut req.params;
        p.opt("max_concurrent_searches", &self.max_concurrent_searches);
        p.opt("pre_filter_shard_size", &self.pre_filter_shard_size);
        p.opt("rest_total_hits_as_int", &self.rest_total_hits_as_int);

        let mut body = String::new();
        for request in &self.requests {
            body.push_str(&to_json_line(&request.header())?);
            body.push('\n');
            body.push_str(&to_json_line(&request.body())?);
            body.push('\n');
        }
        req.ndjson_body(body);
        Ok(req)
    }

    fn parse_response(&self, response: HttpResponse) -> Result<MultiSearchResult, ApiError> {
        decode_success(&response)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MultiSearchResult {
    pub took: i64,
    pub responses: Vec<SearchResult>,
}
