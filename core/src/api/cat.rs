//! `_cat` endpoints, always requested as JSON.
//!
//! Cat rows report every value as a string. Numeric and boolean columns are
//! decoded leniently so `"12"`, `12` and a missing column all work.

use serde::{Deserialize, Serialize};

use crate::client::{decode_success, Client, Endpoint};
use crate::de::{bool_from_any, int_from_any};
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::params::{expand, segment, segments, strings, CommonParams};

impl Client {
    pub fn cat_indices(&self) -> CatIndices<'_> {
        CatIndices::new(self)
    }

    pub fn cat_shards(&self) -> CatShards<'_> {
        CatShards::new(self)
    }
}

/// Short and camel-case column names accepted by `_cat/indices`. One alias
/// may stand for several columns across server versions. Misspelled entries
/// are aliases the server itself registers.
const CAT_INDICES_ALIASES: &[(&str, &str)] = &[
    ("cd", "creation.date"),
    ("cds", "creation.date.string"),
    ("completionSize", "completion.size"),
    ("cs", "completion.size"),
    ("dc", "docs.count"),
    ("dd", "docs.deleted"),
    ("docsCount", "docs.count"),
    ("docsDeleted", "docs.deleted"),
    ("fe", "fielddata.evictions"),
    ("fielddataEvictions", "fielddata.evictions"),
    ("fielddataMemory", "fielddata.memory_size"),
    ("fixedBitsetMemory", "segments.fixed_bitset_memory"),
    ("flushTotal", "flush.total"),
    ("flushTotalTime", "flush.total_time"),
    ("fm", "fielddata.memory_size"),
    ("ft", "flush.total"),
    ("ftt", "flush.total_time"),
    ("gc", "get.current"),
    ("getCurrent", "get.current"),
    ("getExistsTime", "get.exists_time"),
    ("getExistsTotal", "get.exists_total"),
    ("getMissingTime", "get.missing_time"),
    ("getMissingTotal", "get.missing_total"),
    ("getTime", "get.time"),
    ("getTotal", "get.total"),
    ("geti", "get.exists_time"),
    ("geto", "get.exists_total"),
    ("gmti", "get.missing_time"),
    ("gmto", "get.missing_total"),
    ("gti", "get.time"),
    ("gto", "get.total"),
    ("h", "health"),
    ("i", "index"),
    ("id", "uuid"),
    ("idc", "indexing.delete_current"),
    ("idti", "indexing.delete_time"),
    ("idto", "indexing.delete_total"),
    ("idx", "index"),
    ("iic", "indexing.index_current"),
    ("iif", "indexing.index_failed"),
    ("iiti", "indexing.index_time"),
    ("iito", "indexing.index_total"),
    ("indexingDeleteCurrent", "indexing.delete_current"),
    ("indexingDeleteTime", "indexing.delete_time"),
    ("indexingDeleteTotal", "indexing.delete_total"),
    ("indexingIdexCurrent", "indexing.index_current"),
    ("indexingIndexFailed", "indexing.index_failed"),
    ("indexingIndexTime", "indexing.index_time"),
    ("indexingIndexTotal", "indexing.index_total"),
    ("mc", "merges.current"),
    ("mcd", "merges.current_docs"),
    ("mcs", "merges.current_size"),
    ("memoryTotal", "memory.total"),
    ("mergesCurrent", "merges.current"),
    ("mergesCurrentDocs", "merges.current_docs"),
    ("mergesCurrentSize", "merges.current_size"),
    ("mergesTotal", "merges.total"),
    ("mergesTotalDocs", "merges.total_docs"),
    ("mergesTotalSize", "merges.total_size"),
    ("mergesTotalTIme", "merges.total_time"),
    ("mt", "merges.total"),
    ("mtd", "merges.total_docs"),
    ("mts", "merges.total_size"),
    ("mtt", "merges.total_time"),
    ("p", "pri"),
    ("qce", "query_cache.evictions"),
    ("qcm", "query_cache.memory_size"),
    ("queryCacheEvictions", "query_cache.evictions"),
    ("queryCacheMemory", "query_cache.memory_size"),
    ("r", "rep"),
    ("rce", "request_cache.evictions"),
    ("rchc", "request_cache.hit_count"),
    ("rcm", "request_cache.memory_size"),
    ("rcmc", "request_cache.miss_count"),
    ("refreshListeners", "refresh.listeners"),
    ("refreshTime", "refresh.time,refresh.external_time"),
    ("refreshTotal", "refresh.total,refresh.external_total"),
    ("requestCacheEvictions", "request_cache.evictions"),
    ("requestCacheHitCount", "request_cache.hit_count"),
    ("requestCacheMemory", "request_cache.memory_size"),
    ("requestCacheMissCount", "request_cache.miss_count"),
    ("rli", "refresh.listeners"),
    ("rti", "refresh.time,refresh.external_time"),
    ("rto", "refresh.total,refresh.external_total"),
    ("s", "status"),
    ("sc", "segments.count,segments.memory"),
    ("scc", "search.scroll_current"),
    ("scti", "search.scroll_time"),
    ("scto", "search.scroll_total"),
    ("searchFetchCurrent", "search.fetch_current"),
    ("searchFetchTime", "search.fetch_time"),
    ("searchFetchTotal", "search.fetch_total"),
    ("searchOpenContexts", "search.open_contexts"),
    ("searchQueryCurrent", "search.query_current"),
    ("searchQueryTime", "search.query_time"),
    ("searchQueryTotal", "search.query_total"),
    ("searchScrollCurrent", "search.scroll_current"),
    ("searchScrollTime", "search.scroll_time"),
    ("searchScrollTotal", "search.scroll_total"),
    ("segmentsCount", "segments.count"),
    ("segmentsIndexWriterMemory", "segments.index_writer_memory"),
    ("segmentsMemory", "segments.memory"),
    ("segmentsVersionMapMemory", "segments.version_map_memory"),
    ("sfbm", "segments.fixed_bitset_memory"),
    ("sfc", "search.fetch_current"),
    ("sfti", "search.fetch_time"),
    ("sfto", "search.fetch_total"),
    ("shards.primary", "pri"),
    ("shards.replica", "rep"),
    ("shardsPrimary", "pri"),
    ("shardsReplica", "rep"),
    ("siwm", "segments.index_writer_memory"),
    ("so", "search.open_contexts"),
    ("sqc", "search.query_current"),
    ("sqti", "search.query_time"),
    ("sqto", "search.query_total"),
    ("ss", "store.size"),
    ("sth", "search.throttled"),
    ("storeSize", "store.size"),
    ("suc", "suggest.current"),
    ("suggestCurrent", "suggest.current"),
    ("suggestTime", "suggest.time"),
    ("suggestTotal", "suggest.total"),
    ("suti", "suggest.time"),
    ("suto", "suggest.total"),
    ("svmm", "segments.version_map_memory"),
    ("tm", "memory.total"),
    ("warmerCurrent", "warmer.current"),
    ("warmerTotal", "warmer.total"),
    ("warmerTotalTime", "warmer.total_time"),
    ("wc", "warmer.current"),
    ("wto", "warmer.total"),
    ("wtt", "warmer.total_time"),
];

const CAT_SHARDS_ALIASES: &[(&str, &str)] = &[
    ("ur", "unassigned.reason"),
    ("ua", "unassigned.at"),
    ("uf", "unassigned.for"),
    ("ud", "unassigned.details"),
    ("rs", "recoverysource.type"),
    ("fm", "fielddata.memory_size"),
    ("qcm", "query_cache.memory_size"),
    ("gti", "get.time"),
    ("gto", "get.total"),
    ("iito", "indexing.index_total"),
    ("mt", "merges.total"),
    ("rto", "refresh.total"),
    ("sqto", "search.query_total"),
    ("sc", "segments.count"),
    ("sm", "segments.memory"),
    ("sqm", "seq_no.max"),
    ("sql", "seq_no.local_checkpoint"),
    ("sqg", "seq_no.global_checkpoint"),
];

/// Replace aliases with full column names. An alias naming several columns
/// takes the first in place and appends the rest.
fn expand_columns(columns: &[String], aliases: &[(&str, &str)]) -> Vec<String> {
    let mut out: Vec<String> = columns.to_vec();
    let mut extra = Vec::new();
    for column in out.iter_mut() {
        if let Some((_, full)) = aliases.iter().find(|(alias, _)| *alias == column.as_str()) {
            let mut names = full.split(',');
            if let Some(first) = names.next() {
                *column = first.to_string();
            }
            extra.extend(names.map(str::to_string));
        }
    }
    out.extend(extra);
    out
}

/// `GET /_cat/indices[/{index}]`
#[derive(Debug, Clone)]
pub struct CatIndices<'a> {
    client: &'a Client,
    common: CommonParams,
    index: Option<String>,
    bytes: Option<String>,
    local: Option<bool>,
    master_timeout: Option<String>,
    columns: Vec<String>,
    health: Option<String>,
    primary_only: Option<bool>,
    sort: Vec<String>,
}

impl<'a> CatIndices<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self {
            client,
            common: CommonParams::default(),
            index: None,
            bytes: None,
            local: None,
            master_timeout: None,
            columns: Vec::new(),
            health: None,
            primary_only: None,
            sort: Vec::new(),
        }
    }

    common_setters!();

    /// Index name or pattern.
    pub fn index(mut self, index: &str) -> Self {
        self.index = Some(index.to_string());
        self
    }

    /// Unit for byte values: `b`, `k`, `kb`, `m`, `mb`, `g`, `gb`, ...
    pub fn bytes(mut self, bytes: &str) -> Self {
        self.bytes = Some(bytes.to_string());
        self
    }

    pub fn local(mut self, local: bool) -> Self {
        self.local = Some(local);
        self
    }

    pub fn master_timeout(mut self, timeout: &str) -> Self {
        self.master_timeout = Some(timeout.to_string());
        self
    }

    /// Columns to return (`h`). Short aliases are expanded.
    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = strings(columns);
        self
    }

    /// `green`, `yellow` or `red`.
    pub fn health(mut self, health: &str) -> Self {
        self.health = Some(health.to_string());
        self
    }

    pub fn primary_only(mut self, primary_only: bool) -> Self {
        self.primary_only = Some(primary_only);
        self
    }

    /// Columns to sort by, e.g. `docs.count:desc`.
    pub fn sort<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sort = strings(fields);
        self
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        Ok(())
    }

    pub fn send(self) -> Result<Vec<CatIndicesRow>, ApiError> {
        self.client.send(&self)
    }
}

impl Endpoint for CatIndices<'_> {
    type Response = Vec<CatIndicesRow>;

    fn build_request(&self) -> Result<HttpRequest, ApiError> {
        self.validate()?;
        let path = match self.index.as_deref().filter(|i| !i.is_empty()) {
            Some(index) => expand("/_cat/indices/{index}", &[("index", segment(index))])?,
            None => "/_cat/indices".to_string(),
        };
        let mut req = HttpRequest::new(HttpMethod::Get, path);
        self.common.apply(&mut req);
        let p = &mut req.params;
        p.set("format", "json");
        p.opt("bytes", &self.bytes);
        p.opt("local", &self.local);
        p.opt("master_timeout", &self.master_timeout);
        p.list("h", &expand_columns(&self.columns, CAT_INDICES_ALIASES));
        p.opt("health", &self.health);
        p.opt("pri", &self.primary_only);
        p.list("s", &self.sort);
        Ok(req)
    }

    fn parse_response(&self, response: HttpResponse) -> Result<Vec<CatIndicesRow>, ApiError> {
        decode_success(&response)
    }
}

/// One index. Columns not requested stay at their defaults. `pri.*` columns
/// cover primaries only, the rest primaries and replicas.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatIndicesRow {
    pub health: String,
    pub status: String,
    pub index: String,
    pub uuid: String,
    #[serde(deserialize_with = "int_from_any")]
    pub pri: i64,
    #[serde(deserialize_with = "int_from_any")]
    pub rep: i64,
    #[serde(rename = "docs.count", deserialize_with = "int_from_any")]
    pub docs_count: i64,
    #[serde(rename = "docs.deleted", deserialize_with = "int_from_any")]
    pub docs_deleted: i64,
    #[serde(rename = "creation.date", deserialize_with = "int_from_any")]
    pub creation_date: i64,
    #[serde(rename = "creation.date.string")]
    pub creation_date_string: String,
    #[serde(rename = "store.size")]
    pub store_size: String,
    #[serde(rename = "pri.store.size")]
    pub pri_store_size: String,
    #[serde(rename = "completion.size")]
    pub completion_size: String,
    #[serde(rename = "pri.completion.size")]
    pub pri_completion_size: String,
    #[serde(rename = "fielddata.memory_size")]
    pub fielddata_memory_size: String,
    #[serde(rename = "pri.fielddata.memory_size")]
    pub pri_fielddata_memory_size: String,
    #[serde(rename = "fielddata.evictions", deserialize_with = "int_from_any")]
    pub fielddata_evictions: i64,
    #[serde(rename = "pri.fielddata.evictions", deserialize_with = "int_from_any")]
    pub pri_fielddata_evictions: i64,
    #[serde(rename = "query_cache.memory_size")]
    pub query_cache_memory_size: String,
    #[serde(rename = "pri.query_cache.memory_size")]
    pub pri_query_cache_memory_size: String,
    #[serde(rename = "query_cache.evictions", deserialize_with = "int_from_any")]
    pub query_cache_evictions: i64,
    #[serde(rename = "pri.query_cache.evictions", deserialize_with = "int_from_any")]
    pub pri_query_cache_evictions: i64,
    #[serde(rename = "request_cache.memory_size")]
    pub request_cache_memory_size: String,
    #[serde(rename = "pri.request_cache.memory_size")]
    pub pri_request_cache_memory_size: String,
    #[serde(rename = "request_cache.evictions", deserialize_with = "int_from_any")]
    pub request_cache_evictions: i64,
    #[serde(rename = "pri.request_cache.evictions", deserialize_with = "int_from_any")]
    pub pri_request_cache_evictions: i64,
    #[serde(rename = "request_cache.hit_count", deserialize_with = "int_from_any")]
    pub request_cache_hit_count: i64,
    #[serde(rename = "pri.request_cache.hit_count", deserialize_with = "int_from_any")]
    pub pri_request_cache_hit_count: i64,
    #[serde(rename = "request_cache.miss_count", deserialize_with = "int_from_any")]
    pub request_cache_miss_count: i64,
    #[serde(rename = "pri.request_cache.miss_count", deserialize_with = "int_from_any")]
    pub pri_request_cache_miss_count: i64,
    #[serde(rename = "flush.total", deserialize_with = "int_from_any")]
    pub flush_total: i64,
    #[serde(rename = "pri.flush.total", deserialize_with = "int_from_any")]
    pub pri_flush_total: i64,
    #[serde(rename = "flush.total_time")]
    pub flush_total_time: String,
    #[serde(rename = "pri.flush.total_time")]
    pub pri_flush_total_time: String,
    #[serde(rename = "get.current", deserialize_with = "int_from_any")]
    pub get_current: i64,
    #[serde(rename = "pri.get.current", deserialize_with = "int_from_any")]
    pub pri_get_current: i64,
    #[serde(rename = "get.time")]
    pub get_time: String,
    #[serde(rename = "pri.get.time")]
    pub pri_get_time: String,
    #[serde(rename = "get.total", deserialize_with = "int_from_any")]
    pub get_total: i64,
    #[serde(rename = "pri.get.total", deserialize_with = "int_from_any")]
    pub pri_get_total: i64,
    #[serde(rename = "get.exists_time")]
    pub get_exists_time: String,
    #[serde(rename = "pri.get.exists_time")]
    pub pri_get_exists_time: String,
    #[serde(rename = "get.exists_total", deserialize_with = "int_from_any")]
    pub get_exists_total: i64,
    #[serde(rename = "pri.get.exists_total", deserialize_with = "int_from_any")]
    pub pri_get_exists_total: i64,
    #[serde(rename = "get.missing_time")]
    pub get_missing_time: String,
    #[serde(rename = "pri.get.missing_time")]
    pub pri_get_missing_time: String,
    #[serde(rename = "get.missing_total", deserialize_with = "int_from_any")]
    pub get_missing_total: i64,
    #[serde(rename = "pri.get.missing_total", deserialize_with = "int_from_any")]
    pub pri_get_missing_total: i64,
    #[serde(rename = "indexing.delete_current", deserialize_with = "int_from_any")]
    pub indexing_delete_current: i64,
    #[serde(rename = "pri.indexing.delete_current", deserialize_with = "int_from_any")]
    pub pri_indexing_delete_current: i64,
    #[serde(rename = "indexing.delete_time")]
    pub indexing_delete_time: String,
    #[serde(rename = "pri.indexing.delete_time")]
    pub pri_indexing_delete_time: String,
    #[serde(rename = "indexing.delete_total", deserialize_with = "int_from_any")]
    pub indexing_delete_total: i64,
    #[serde(rename = "pri.indexing.delete_total", deserialize_with = "int_from_any")]
    pub pri_indexing_delete_total: i64,
    #[serde(rename = "indexing.index_current", deserialize_with = "int_from_any")]
    pub indexing_index_current: i64,
    #[serde(rename = "pri.indexing.index_current", deserialize_with = "int_from_any")]
    pub pri_indexing_index_current: i64,
    #[serde(rename = "indexing.index_time")]
    pub indexing_index_time: String,
    #[serde(rename = "pri.indexing.index_time")]
    pub pri_indexing_index_time: String,
    #[serde(rename = "indexing.index_total", deserialize_with = "int_from_any")]
    pub indexing_index_total: i64,
    #[serde(rename = "pri.indexing.index_total", deserialize_with = "int_from_any")]
    pub pri_indexing_index_total: i64,
    #[serde(rename = "indexing.index_failed", deserialize_with = "int_from_any")]
    pub indexing_index_failed: i64,
    #[serde(rename = "pri.indexing.index_failed", deserialize_with = "int_from_any")]
    pub pri_indexing_index_failed: i64,
    #[serde(rename = "merges.current", deserialize_with = "int_from_any")]
    pub merges_current: i64,
    #[serde(rename = "pri.merges.current", deserialize_with = "int_from_any")]
    pub pri_merges_current: i64,
    #[serde(rename = "merges.current_docs", deserialize_with = "int_from_any")]
    pub merges_current_docs: i64,
    #[serde(rename = "pri.merges.current_docs", deserialize_with = "int_from_any")]
    pub pri_merges_current_docs: i64,
    #[serde(rename = "merges.current_size")]
    pub merges_current_size: String,
    #[serde(rename = "pri.merges.current_size")]
    pub pri_merges_current_size: String,
    #[serde(rename = "merges.total", deserialize_with = "int_from_any")]
    pub merges_total: i64,
    #[serde(rename = "pri.merges.total", deserialize_with = "int_from_any")]
    pub pri_merges_total: i64,
    #[serde(rename = "merges.total_docs", deserialize_with = "int_from_any")]
    pub merges_total_docs: i64,
    #[serde(rename = "pri.merges.total_docs", deserialize_with = "int_from_any")]
    pub pri_merges_total_docs: i64,
    #[serde(rename = "merges.total_size")]
    pub merges_total_size: String,
    #[serde(rename = "pri.merges.total_size")]
    pub pri_merges_total_size: String,
    #[serde(rename = "merges.total_time")]
    pub merges_total_time: String,
    #[serde(rename = "pri.merges.total_time")]
    pub pri_merges_total_time: String,
    #[serde(rename = "refresh.total", deserialize_with = "int_from_any")]
    pub refresh_total: i64,
    #[serde(rename = "pri.refresh.total", deserialize_with = "int_from_any")]
    pub pri_refresh_total: i64,
    #[serde(rename = "refresh.external_total", deserialize_with = "int_from_any")]
    pub refresh_external_total: i64,
    #[serde(rename = "pri.refresh.external_total", deserialize_with = "int_from_any")]
    pub pri_refresh_external_total: i64,
    #[serde(rename = "refresh.time")]
    pub refresh_time: String,
    #[serde(rename = "pri.refresh.time")]
    pub pri_refresh_time: String,
    #[serde(rename = "refresh.external_time")]
    pub refresh_external_time: String,
    #[serde(rename = "pri.refresh.external_time")]
    pub pri_refresh_external_time: String,
    #[serde(rename = "refresh.listeners", deserialize_with = "int_from_any")]
    pub refresh_listeners: i64,
    #[serde(rename = "pri.refresh.listeners", deserialize_with = "int_from_any")]
    pub pri_refresh_listeners: i64,
    #[serde(rename = "search.fetch_current", deserialize_with = "int_from_any")]
    pub search_fetch_current: i64,
    #[serde(rename = "pri.search.fetch_current", deserialize_with = "int_from_any")]
    pub pri_search_fetch_current: i64,
    #[serde(rename = "search.fetch_time")]
    pub search_fetch_time: String,
    #[serde(rename = "pri.search.fetch_time")]
    pub pri_search_fetch_time: String,
    #[serde(rename = "search.fetch_total", deserialize_with = "int_from_any")]
    pub search_fetch_total: i64,
    #[serde(rename = "pri.search.fetch_total", deserialize_with = "int_from_any")]
    pub pri_search_fetch_total: i64,
    #[serde(rename = "search.open_contexts", deserialize_with = "int_from_any")]
    pub search_open_contexts: i64,
    #[serde(rename = "pri.search.open_contexts", deserialize_with = "int_from_any")]
    pub pri_search_open_contexts: i64,
    #[serde(rename = "search.query_current", deserialize_with = "int_from_any")]
    pub search_query_current: i64,
    #[serde(rename = "pri.search.query_current", deserialize_with = "int_from_any")]
    pub pri_search_query_current: i64,
    #[serde(rename = "search.query_time")]
    pub search_query_time: String,
    #[serde(rename = "pri.search.query_time")]
    pub pri_search_query_time: String,
    #[serde(rename = "search.query_total", deserialize_with = "int_from_any")]
    pub search_query_total: i64,
    #[serde(rename = "pri.search.query_total", deserialize_with = "int_from_any")]
    pub pri_search_query_total: i64,
    #[serde(rename = "search.scroll_current", deserialize_with = "int_from_any")]
    pub search_scroll_current: i64,
    #[serde(rename = "pri.search.scroll_current", deserialize_with = "int_from_any")]
    pub pri_search_scroll_current: i64,
    #[serde(rename = "search.scroll_time")]
    pub search_scroll_time: String,
    #[serde(rename = "pri.search.scroll_time")]
    pub pri_search_scroll_time: String,
    #[serde(rename = "search.scroll_total", deserialize_with = "int_from_any")]
    pub search_scroll_total: i64,
    #[serde(rename = "pri.search.scroll_total", deserialize_with = "int_from_any")]
    pub pri_search_scroll_total: i64,
    #[serde(rename = "search.throttled", deserialize_with = "bool_from_any")]
    pub search_throttled: bool,
    #[serde(rename = "segments.count", deserialize_with = "int_from_any")]
    pub segments_count: i64,
    #[serde(rename = "pri.segments.count", deserialize_with = "int_from_any")]
    pub pri_segments_count: i64,
    #[serde(rename = "segments.memory")]
    pub segments_memory: String,
    #[serde(rename = "pri.segments.memory")]
    pub pri_segments_memory: String,
    #[serde(rename = "segments.index_writer_memory")]
    pub segments_index_writer_memory: String,
    #[serde(rename = "pri.segments.index_writer_memory")]
    pub pri_segments_index_writer_memory: String,
    #[serde(rename = "segments.version_map_memory")]
    pub segments_version_map_memory: String,
    #[serde(rename = "pri.segments.version_map_memory")]
    pub pri_segments_version_map_memory: String,
    #[serde(rename = "segments.fixed_bitset_memory")]
    pub segments_fixed_bitset_memory: String,
    #[serde(rename = "pri.segments.fixed_bitset_memory")]
    pub pri_segments_fixed_bitset_memory: String,
    #[serde(rename = "warmer.current", deserialize_with = "int_from_any")]
    pub warmer_current: i64,
    #[serde(rename = "pri.warmer.current", deserialize_with = "int_from_any")]
    pub pri_warmer_current: i64,
    #[serde(rename = "warmer.total", deserialize_with = "int_from_any")]
    pub warmer_total: i64,
    #[serde(rename = "pri.warmer.total", deserialize_with = "int_from_any")]
    pub pri_warmer_total: i64,
    #[serde(rename = "warmer.total_time")]
    pub warmer_total_time: String,
    #[serde(rename = "pri.warmer.total_time")]
    pub pri_warmer_total_time: String,
    #[serde(rename = "suggest.current", deserialize_with = "int_from_any")]
    pub suggest_current: i64,
    #[serde(rename = "pri.suggest.current", deserialize_with = "int_from_any")]
    pub pri_suggest_current: i64,
    #[serde(rename = "suggest.time")]
    pub suggest_time: String,
    #[serde(rename = "pri.suggest.time")]
    pub pri_suggest_time: String,
    #[serde(rename = "suggest.total", deserialize_with = "int_from_any")]
    pub suggest_total: i64,
    #[serde(rename = "pri.suggest.total", deserialize_with = "int_from_any")]
    pub pri_suggest_total: i64,
    #[serde(rename = "memory.total")]
    pub memory_total: String,
    #[serde(rename = "pri.memory.total")]
    pub pri_memory_total: String,
}

/// `GET /_cat/shards[/{index,...}]`
#[derive(Debug, Clone)]
pub struct CatShards<'a> {
    client: &'a Client,
    common: CommonParams,
    indices: Vec<String>,
    bytes: Option<String>,
    local: Option<bool>,
    master_timeout: Option<String>,
    columns: Vec<String>,
    sort: Vec<String>,
    time: Option<String>,
}

impl<'a> CatShards<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self {
            client,
            common: CommonParams::default(),
            indices: Vec::new(),
            bytes: None,
            local: None,
            master_timeout: None,
            columns: Vec::new(),
            sort: Vec::new(),
            time: None,
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

    pub fn bytes(mut self, bytes: &str) -> Self {
        self.bytes = Some(bytes.to_string());
        self
    }

    pub fn local(mut self, local: bool) -> Self {
        self.local = Some(local);
        self
    }

    pub fn master_timeout(mut self, timeout: &str) -> Self {
        self.master_timeout = Some(timeout.to_string());
        self
    }

    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = strings(columns);
        self
    }

    pub fn sort<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sort = strings(fields);
        self
    }

    /// Unit for time values: `d`, `h`, `m`, `s`, `ms`, ...
    pub fn time(mut self, time: &str) -> Self {
        self.time = Some(time.to_string());
        self
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        Ok(())
    }

    pub fn send(self) -> Result<Vec<CatShardsRow>, ApiError> {
        self.client.send(&self)
    }
}

impl Endpoint for CatShards<'_> {
    type Response = Vec<CatShardsRow>;

    fn build_request(&self) -> Result<HttpRequest, ApiError> {
        self.validate()?;
        let path = if self.indices.is_empty() {
            "/_cat/shards".to_string()
        } else {
            expand("/_cat/shards/{index}", &[("index", segments(&self.indices))])?
        };
        let mut req = HttpRequest::new(HttpMethod::Get, path);
        self.common.apply(&mut req);
        let p = &mut req.params;
        p.set("format", "json");
        p.opt("bytes", &self.bytes);
        p.opt("local", &self.local);
        p.opt("master_timeout", &self.master_timeout);
        p.list("h", &expand_columns(&self.columns, CAT_SHARDS_ALIASES));
        p.list("s", &self.sort);
        p.opt("time", &self.time);
        Ok(req)
    }

    fn parse_response(&self, response: HttpResponse) -> Result<Vec<CatShardsRow>, ApiError> {
        decode_success(&response)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatShardsRow {
    pub index: String,
    pub uuid: String,
    #[serde(deserialize_with = "int_from_any")]
    pub shard: i64,
    /// `p` for primary, `r` for replica.
    pub prirep: String,
    /// `STARTED`, `INITIALIZING`, `RELOCATING` or `UNASSIGNED`.
    pub state: String,
    #[serde(deserialize_with = "int_from_any")]
    pub docs: i64,
    pub store: String,
    pub ip: String,
    pub id: String,
    pub node: String,
    #[serde(rename = "unassigned.reason")]
    pub unassigned_reason: String,
    #[serde(rename = "unassigned.at")]
    pub unassigned_at: String,
    #[serde(rename = "unassigned.for")]
    pub unassigned_for: String,
    #[serde(rename = "unassigned.details")]
    pub unassigned_details: String,
    #[serde(rename = "recoverysource.type")]
    pub recovery_source_type: String,
    #[serde(rename = "fielddata.memory_size")]
    pub fielddata_memory_size: String,
    #[serde(rename = "query_cache.memory_size")]
    pub query_cache_memory_size: String,
    #[serde(rename = "get.time")]
    pub get_time: String,
    #[serde(rename = "get.total", deserialize_with = "int_from_any")]
    pub get_total: i64,
    #[serde(rename = "indexing.index_total", deserialize_with = "int_from_any")]
    pub indexing_index_total: i64,
    #[serde(rename = "merges.total", deserialize_with = "int_from_any")]
    pub merges_total: i64,
    #[serde(rename = "refresh.total", deserialize_with = "int_from_any")]
    pub refresh_total: i64,
    #[serde(rename = "search.query_total", deserialize_with = "int_from_any")]
    pub search_query_total: i64,
    #[serde(rename = "segments.count", deserialize_with = "int_from_any")]
    pub segments_count: i64,
    #[serde(rename = "segments.memory")]
    pub segments_memory: String,
    #[serde(rename = "seq_no.max", deserialize_with = "int_from_any")]
    pub seq_no_max: i64,
    #[serde(rename = "seq_no.local_checkpoint", deserialize_with = "int_from_any")]
    pub seq_no_local_checkpoint: i64,
    #[serde(rename = "seq_no.global_checkpoint", deserialize_with = "int_from_any")]
    pub seq_no_global_checkpoint: i64,
    #[serde(rename = "path.data")]
    pub path_data: String,
}
