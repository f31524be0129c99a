//! Scroll cursors over large result sets.
//!
//! The first call to [`Scroll::next`] runs a search with a `scroll`
//! keep-alive; every later call posts the returned scroll id to
//! `/_search/scroll`. A page without hits ends the stream.

use serde_json::{json, Value};
use tracing::debug;

use super::search::{search_path, SearchResult};
use crate::client::{check_status, decode_success, Client, Endpoint};
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::params::{strings, CommonParams};
use crate::query::{Query, SearchSource, SortInfo};

pub const DEFAULT_KEEP_ALIVE: &str = "5m";

impl Client {
    pub fn scroll<I, S>(&self, indices: I) -> Scroll<'_>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Scroll::new(self).index(indices)
    }
}

/// A scroll cursor. Holds the current scroll id between pages.
#[derive(Debug, Clone)]
pub struct Scroll<'a> {
    client: &'a Client,
    common: CommonParams,
    indices: Vec<String>,
    keep_alive: String,
    scroll_id: Option<String>,
    source: SearchSource,
    body: Option<Value>,
    size: Option<i64>,
    routing: Vec<String>,
    preference: Option<String>,
    ignore_unavailable: Option<bool>,
    ignore_throttled: Option<bool>,
    allow_no_indices: Option<bool>,
    expand_wildcards: Option<String>,
    rest_total_hits_as_int: Option<bool>,
    max_response_size: Option<u64>,
}

impl<'a> Scroll<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self {
            client,
            common: CommonParams::default(),
            indices: Vec::new(),
            keep_alive: DEFAULT_KEEP_ALIVE.to_string(),
            scroll_id: None,
            source: SearchSource::new(),
            body: None,
            size: None,
            routing: Vec::new(),
            preference: None,
            ignore_unavailable: None,
            ignore_throttled: None,
            allow_no_indices: None,
            expand_wildcards: None,
            rest_total_hits_as_int: None,
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

    /// How long the server keeps the cursor between pages, e.g. `1m`.
    pub fn keep_alive(mut self, keep_alive: &str) -> Self {
        self.keep_alive = keep_alive.to_string();
        self
    }

    /// Resume an existing cursor.
    pub fn scroll_id(mut self, scroll_id: &str) -> Self {
        self.scroll_id = Some(scroll_id.to_string());
        self
    }

    pub fn current_scroll_id(&self) -> Option<&str> {
        self.scroll_id.as_deref()
    }

    /// Hits per page.
    pub fn size(mut self, size: i64) -> Self {
        self.size = Some(size);
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

    pub fn post_filter(mut self, filter: impl Query) -> Self {
        self.source = std::mem::take(&mut self.source).post_filter(filter);
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

    pub fn fetch_source(mut self, fetch: bool) -> Self {
        self.source = std::mem::take(&mut self.source).fetch_source(fetch);
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

    pub fn rest_total_hits_as_int(mut self, enabled: bool) -> Self {
        self.rest_total_hits_as_int = Some(enabled);
        self
    }

    pub fn max_response_size(mut self, bytes: u64) -> Self {
        self.max_response_size = Some(bytes);
        self
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        if self.keep_alive.is_empty() {
            return Err(ApiError::InvalidArgument("scroll keep-alive must not be empty".into()));
        }
        Ok(())
    }

    /// Fetch the next page. `Ok(None)` once the cursor is exhausted.
    pub fn next(&mut self) -> Result<Option<SearchResult>, ApiError> {
        let result = self.client.send(&*self)?;
        self.scroll_id = result.scroll_id.clone();
        if result.hits.hits.is_empty() {
            debug!(scroll_id = ?self.scroll_id, "scroll exhausted");
            return Ok(None);
        }
        Ok(Some(result))
    }

    /// Release the cursor on the server. No-op before the first page.
    pub fn clear(&mut self) -> Result<(), ApiError> {
        let Some(request) = self.build_clear_request()? else {
            return Ok(());
        };
        let response = self.client.perform(request)?;
        check_status(&response)?;
        self.scroll_id = None;
        Ok(())
    }

    pub fn build_clear_request(&self) -> Result<Option<HttpRequest>, ApiError> {
        let Some(scroll_id) = self.scroll_id.as_deref().filter(|id| !id.is_empty()) else {
            return Ok(None);
        };
        let mut req = HttpRequest::new(HttpMethod::Delete, "/_search/scroll");
        self.common.apply(&mut req);
        req.json_body(&json!({ "scroll_id": [scroll_id] }))?;
        Ok(Some(req))
    }

    /// Common params, with `_scroll_id` kept in any response filter.
    fn scroll_common(&self) -> CommonParams {
        let mut common = self.common.clone();
        if !common.filter_path.is_empty() && !common.filter_path.iter().any(|p| p == "_scroll_id") {
            common.filter_path.push("_scroll_id".to_string());
        }
        common
    }

    fn build_first_request(&self) -> Result<HttpRequest, ApiError> {
        let mut req = HttpRequest::new(HttpMethod::Post, search_path(&self.indices, "_search")?);
        self.scroll_common().apply(&mut req);
        let p = &mut req.params;
        p.set("scroll", &self.keep_alive);
        if let Some(size) = self.size.filter(|s| *s > 0) {
            p.set("size", size);
        }
        p.list("routing", &self.routing);
        p.opt("preference", &self.preference);
        p.opt("allow_no_indices", &self.allow_no_indices);
        p.opt("expand_wildcards", &self.expand_wildcards);
        p.opt("ignore_unavailable", &self.ignore_unavailable);
        p.opt("ignore_throttled", &self.ignore_throttled);
        p.opt("rest_total_hits_as_int", &self.rest_total_hits_as_int);
        match &self.body {
            Some(body) => req.json_body(body)?,
            None if self.source.has_sort() => req.json_body(&self.source.source())?,
            None => req.json_body(&self.source.clone().sort_by_doc().source())?,
        }
        Ok(req)
    }

    fn build_next_request(&self, scroll_id: &str) -> Result<HttpRequest, ApiError> {
        let mut req = HttpRequest::new(HttpMethod::Post, "/_search/scroll");
        self.scroll_common().apply(&mut req);
        req.params.opt("rest_total_hits_as_int", &self.rest_total_hits_as_int);
        req.json_body(&json!({ "scroll": self.keep_alive, "scroll_id": scroll_id }))?;
        Ok(req)
    }
}

impl Endpoint for Scroll<'_> {
    type Response = SearchResult;

    fn build_request(&self) -> Result<HttpRequest, ApiError> {
        self.validate()?;
        let mut req = match self.scroll_id.as_deref().filter(|id| !id.is_empty()) {
            Some(scroll_id) => self.build_next_request(scroll_id)?,
            None => self.build_first_request()?,
        };
        req.max_response_size = self.max_response_size;
        Ok(req)
    }

    fn parse_response(&self, response: HttpResponse) -> Result<SearchResult, ApiError> {
        decode_success(&response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::TermQuery;
    use crate::testing::{offline_client, ScriptedTransport};

    fn page(scroll_id: &str, ids: &[&str]) -> String {
        let hits: Vec<Value> = ids
            .iter()
            .map(|id| json!({"_index": "t", "_id": id, "_source": {"id": id}}))
            .collect();
        json!({"_scroll_id": scroll_id, "hits": {"total": {"value": 3, "relation": "eq"}, "hits": hits}})
            .to_string()
    }

    #[test]
    fn first_request_defaults_to_doc_sort_and_keep_alive() {
        let client = offline_client();
        let req = client.scroll(["t"]).size(2).build_request().unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "/t/_search");
        assert_eq!(req.params.get("scroll"), Some("5m"));
        assert_eq!(req.params.get("size"), Some("2"));
        assert_eq!(req.body.as_deref(), Some(r#"{"sort":["_doc"]}"#));
    }

    #[test]
    fn explicit_sort_is_kept() {
        let client = offline_client();
        let req = client
            .scroll(["t"])
            .query(TermQuery::new("user", "kimchy"))
            .sort("created", true)
            .build_request()
            .unwrap();
        let body: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body["sort"], json!([{"created": {"order": "asc"}}]));
    }

    #[test]
    fn filter_path_keeps_scroll_id() {
        let client = offline_client();
        let req = client
            .scroll(["t"])
            .filter_path(["hits.hits._id"])
            .build_request()
            .unwrap();
        assert_eq!(req.params.get("filter_path"), Some("hits.hits._id,_scroll_id"));

        let req = client.scroll(["t"]).build_request().unwrap();
        assert!(!req.params.contains("filter_path"));
    }

    #[test]
    fn pages_until_exhausted_then_clears() {
        let transport = ScriptedTransport::new();
        transport.respond(200, &page("c1", &["1", "2"]));
        transport.respond(200, &page("c2", &["3"]));
        transport.respond(200, &page("c3", &[]));
        transport.respond(200, r#"{"succeeded":true,"num_freed":1}"#);

        let client = transport.client();
        let mut scroll = client.scroll(["t"]).size(2).keep_alive("1m");
        let mut ids = Vec::new();
        while let Some(page) = scroll.next().unwrap() {
            ids.extend(page.hits.hits.into_iter().map(|h| h.id));
        }
        assert_eq!(ids, vec!["1", "2", "3"]);
        assert_eq!(scroll.current_scroll_id(), Some("c3"));

        scroll.clear().unwrap();
        assert_eq!(scroll.current_scroll_id(), None);

        let requests = transport.requests();
        assert_eq!(requests.len(), 4);
        assert_eq!(requests[1].path, "/_search/scroll");
        assert_eq!(requests[1].body.as_deref(), Some(r#"{"scroll":"1m","scroll_id":"c1"}"#));
        assert_eq!(requests[3].method, HttpMethod::Delete);
        assert_eq!(requests[3].body.as_deref(), Some(r#"{"scroll_id":["c3"]}"#));
    }

    #[test]
    fn clear_without_cursor_is_a_no_op() {
        let transport = ScriptedTransport::new();
        let client = transport.client();
        let mut scroll = client.scroll(["t"]);
        scroll.clear().unwrap();
        assert!(transport.requests().is_empty());
    }
}
