//! `_reindex`: copy documents from one index, or a remote cluster, into another.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::search::SearchRequest;
use crate::client::{decode_success, Client, Endpoint};
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::params::{CommonParams, Missing};
use crate::query::Query;

impl Client {
    pub fn reindex(&self) -> Reindex<'_> {
        Reindex::new(self)
    }
}

/// Where reindexed documents come from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReindexSource {
    request: SearchRequest,
    remote: Option<ReindexRemoteInfo>,
}

impl ReindexSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the search that selects source documents.
    pub fn request(mut self, request: SearchRequest) -> Self {
        self.request = request;
        self
    }

    pub fn index<I, S>(mut self, indices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.request = std::mem::take(&mut self.request).index(indices);
        self
    }

    pub fn query(mut self, query: impl Query) -> Self {
        self.request = std::mem::take(&mut self.request).query(query);
        self
    }

    pub fn sort(mut self, field: &str, ascending: bool) -> Self {
        self.request = std::mem::take(&mut self.request).sort(field, ascending);
        self
    }

    /// Documents per scroll batch.
    pub fn size(mut self, size: i64) -> Self {
        self.request = std::mem::take(&mut self.request).size(size);
        self
    }

    pub fn remote(mut self, remote: ReindexRemoteInfo) -> Self {
        self.remote = Some(remote);
        self
    }

    pub fn has_indices(&self) -> bool {
        self.request.has_indices()
    }

    pub fn source(&self) -> Value {
        let mut source = match self.request.body() {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        let indices = self.request.indices();
        let index = match indices {
            [one] => Value::from(one.as_str()),
            many => Value::from(many.to_vec()),
        };
        source.insert("index".into(), index);
        if let Some(remote) = &self.remote {
            source.insert("remote".into(), remote.source());
        }
        Value::Object(source)
    }
}

/// Connection details of a remote cluster to reindex from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReindexRemoteInfo {
    host: String,
    username: Option<String>,
    password: Option<String>,
    socket_timeout: Option<String>,
    connect_timeout: Option<String>,
}

impl ReindexRemoteInfo {
    pub fn new(host: &str) -> Self {
        Self {
            host: host.to_string(),
            ..Default::default()
        }
    }

    pub fn username(mut self, username: &str) -> Self {
        self.username = Some(username.to_string());
        self
    }

    pub fn password(mut self, password: &str) -> Self {
        self.password = Some(password.to_string());
        self
    }

    /// e.g. `1m` or `30s`.
    pub fn socket_timeout(mut self, timeout: &str) -> Self {
        self.socket_timeout = Some(timeout.to_string());
        self
    }

    pub fn connect_timeout(mut self, timeout: &str) -> Self {
        self.connect_timeout = Some(timeout.to_string());
        self
    }

    pub fn source(&self) -> Value {
        let mut source = Map::new();
        source.insert("host".into(), Value::from(self.host.as_str()));
        let optional = [
            ("username", &self.username),
            ("password", &self.password),
            ("socket_timeout", &self.socket_timeout),
            ("connect_timeout", &self.connect_timeout),
        ];
        for (key, value) in optional {
            if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
                source.insert(key.into(), Value::from(value));
            }
        }
        Value::Object(source)
    }
}

/// Where reindexed documents are written; the metadata of each bulk index action.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReindexDestination {
    index: Option<String>,
    doc_type: Option<String>,
    routing: Option<String>,
    op_type: Option<String>,
    version: Option<i64>,
    version_type: Option<String>,
    pipeline: Option<String>,
}

impl ReindexDestination {
    pub fn new(index: &str) -> Self {
        Self {
            index: Some(index.to_string()),
            ..Default::default()
        }
    }

    pub fn doc_type(mut self, doc_type: &str) -> Self {
        self.doc_type = Some(doc_type.to_string());
        self
    }

    /// `keep`, `discard`, or `=value` for a fixed routing.
    pub fn routing(mut self, routing: &str) -> Self {
        self.routing = Some(routing.to_string());
        self
    }

    /// Route each copy like its source document (the server default).
    pub fn keep(self) -> Self {
        self.routing("keep")
    }

    pub fn discard(self) -> Self {
        self.routing("discard")
    }

    /// `index` or `create`.
    pub fn op_type(mut self, op_type: &str) -> Self {
        self.op_type = Some(op_type.to_string());
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

    pub fn pipeline(mut self, pipeline: &str) -> Self {
        self.pipeline = Some(pipeline.to_string());
        self
    }

    pub fn source(&self) -> Value {
        let mut source = Map::new();
        let optional = [
            ("index", &self.index),
            ("type", &self.doc_type),
            ("routing", &self.routing),
            ("op_type", &self.op_type),
            ("version_type", &self.version_type),
            ("pipeline", &self.pipeline),
        ];
        for (key, value) in optional {
            if let Some(value) = value.as_deref().filter(|v| !v.is_empty()) {
                source.insert(key.into(), Value::from(value));
            }
        }
        if let Some(version) = self.version.filter(|v| *v > 0) {
            source.insert("version".into(), Value::from(version));
        }
        Value::Object(source)
    }
}

/// `POST /_reindex`
#[derive(Debug, Clone)]
pub struct Reindex<'a> {
    client: &'a Client,
    common: CommonParams,
    source: Option<ReindexSource>,
    destination: Option<ReindexDestination>,
    body: Option<Value>,
    conflicts: Option<String>,
    size: Option<i64>,
    script: Option<Value>,
    refresh: Option<String>,
    timeout: Option<String>,
    requests_per_second: Option<i64>,
    slices: Option<Value>,
    wait_for_active_shards: Option<String>,
    wait_for_completion: Option<bool>,
}

impl<'a> Reindex<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self {
            client,
            common: CommonParams::default(),
            source: None,
            destination: None,
            body: None,
            conflicts: None,
            size: None,
            script: None,
            refresh: None,
            timeout: None,
            requests_per_second: None,
            slices: None,
            wait_for_active_shards: None,
            wait_for_completion: None,
        }
    }

    common_setters!();

    pub fn source(mut self, source: ReindexSource) -> Self {
        self.source = Some(source);
        self
    }

    /// Shorthand for a source that copies a whole index.
    pub fn source_index(self, index: &str) -> Self {
        self.source(ReindexSource::new().index([index]))
    }

    pub fn destination(mut self, destination: ReindexDestination) -> Self {
        self.destination = Some(destination);
        self
    }

    pub fn destination_index(self, index: &str) -> Self {
        self.destination(ReindexDestination::new(index))
    }

    /// Raw body. Skips validation of source and destination.
    pub fn body_json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// `abort` or `proceed` on version conflicts.
    pub fn conflicts(mut self, conflicts: &str) -> Self {
        self.conflicts = Some(conflicts.to_string());
        self
    }

    pub fn abort_on_version_conflict(self) -> Self {
        self.conflicts("abort")
    }

    pub fn proceed_on_version_conflict(self) -> Self {
        self.conflicts("proceed")
    }

    /// Maximum number of documents to copy.
    pub fn size(mut self, size: i64) -> Self {
        self.size = Some(size);
        self
    }

    pub fn script(mut self, script: Value) -> Self {
        self.script = Some(script);
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

    pub fn requests_per_second(mut self, rps: i64) -> Self {
        self.requests_per_second = Some(rps);
        self
    }

    /// A slice count or `"auto"`.
    pub fn slices(mut self, slices: impl Into<Value>) -> Self {
        self.slices = Some(slices.into());
        self
    }

    pub fn wait_for_active_shards(mut self, shards: &str) -> Self {
        self.wait_for_active_shards = Some(shards.to_string());
        self
    }

    pub fn wait_for_completion(mut self, wait: bool) -> Self {
        self.wait_for_completion = Some(wait);
        self
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        if self.body.is_some() {
            return Ok(());
        }
        let mut missing = Missing::new();
        match &self.source {
            None => missing.check("Source", false),
            Some(source) => missing.check("Source.Index", source.has_indices()),
        };
        missing
            .check("Destination", self.destination.is_some())
            .finish()
    }

    fn body(&self) -> Value {
        if let Some(body) = &self.body {
            return body.clone();
        }
        let mut body = Map::new();
        if let Some(conflicts) = &self.conflicts {
            body.insert("conflicts".into(), Value::from(conflicts.as_str()));
        }
        if let Some(size) = self.size {
            body.insert("size".into(), Value::from(size));
        }
        if let Some(script) = &self.script {
            body.insert("script".into(), script.clone());
        }
        if let Some(source) = &self.source {
            body.insert("source".into(), source.source());
        }
        if let Some(dest) = &self.destination {
            body.insert("dest".into(), dest.source());
        }
        Value::Object(body)
    }

    /// Run the reindex and wait for it to finish.
    pub fn send(self) -> Result<BulkIndexByScrollResponse, ApiError> {
        self.client.send(&self)
    }

    /// Start the reindex as a background task and return its id.
    pub fn start_task(mut self) -> Result<StartTaskResult, ApiError> {
        if self.wait_for_completion == Some(true) {
            return Err(ApiError::InvalidArgument(
                "cannot start a task with wait_for_completion set to true".into(),
            ));
        }
        self.wait_for_completion = Some(false);
        let response = self.client.perform(self.build_request()?)?;
        decode_success(&response)
    }
}

impl Endpoint for Reindex<'_> {
    type Response = BulkIndexByScrollResponse;

    fn build_request(&self) -> Result<HttpRequest, ApiError> {
        self.validate()?;
        let mut req = HttpRequest::new(HttpMethod::Post, "/_reindex");
        self.common.apply(&mut req);
        let p = &mut req.params;
        p.opt("refresh", &self.refresh);
        p.opt("timeout", &self.timeout);
        p.opt("requests_per_second", &self.requests_per_second);
        if let Some(slices) = &self.slices {
            match slices {
                Value::String(s) => p.set("slices", s),
                other => p.set("slices", other),
            }
        }
        p.opt("wait_for_active_shards", &self.wait_for_active_shards);
        p.opt("wait_for_completion", &self.wait_for_completion);
        req.json_body(&self.body())?;
        Ok(req)
    }

    fn parse_response(&self, response: HttpResponse) -> Result<BulkIndexByScrollResponse, ApiError> {
        decode_success(&response)
    }
}

/// Outcome of reindex, update-by-query and delete-by-query.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BulkIndexByScrollResponse {
    pub took: i64,
    pub timed_out: bool,
    pub total: i64,
    pub updated: i64,
    pub created: i64,
    pub deleted: i64,
    pub batches: i64,
    pub version_conflicts: i64,
    pub noops: i64,
    pub retries: ScrollRetries,
    pub throttled: String,
    pub throttled_millis: i64,
    pub requests_per_second: f64,
    pub throttled_until: String,
    pub throttled_until_millis: i64,
    pub failures: Vec<Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollRetries {
    pub bulk: i64,
    pub search: i64,
}

/// Id of a task started with `wait_for_completion=false`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StartTaskResult {
    pub task: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::TermQuery;
    use crate::testing::{offline_client, ScriptedTransport};
    use serde_json::json;

    #[test]
    fn validation_lists_missing_parts() {
        let client = offline_client();
        let err = client.reindex().build_request().unwrap_err();
        assert_eq!(err.to_string(), "missing required fields: [Source, Destination]");

        let err = client
            .reindex()
            .source(ReindexSource::new())
            .destination_index("new")
            .build_request()
            .unwrap_err();
        assert_eq!(err.to_string(), "missing required fields: [Source.Index]");

        assert!(client.reindex().body_json(json!({})).build_request().is_ok());
    }

    #[test]
    fn body_combines_source_and_destination() {
        let client = offline_client();
        let req = client
            .reindex()
            .source(
                ReindexSource::new()
                    .index(["twitter"])
                    .query(TermQuery::new("user", "kimchy"))
                    .remote(ReindexRemoteInfo::new("http://otherhost:9200").username("elastic")),
            )
            .destination(ReindexDestination::new("new_twitter").op_type("create").keep())
            .proceed_on_version_conflict()
            .size(100)
            .slices("auto")
            .refresh("true")
            .build_request()
            .unwrap();
        assert_eq!(req.path, "/_reindex");
        assert_eq!(req.params.get("slices"), Some("auto"));
        assert_eq!(req.params.get("refresh"), Some("true"));
        let body: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(
            body,
            json!({
                "conflicts": "proceed",
                "size": 100,
                "source": {
                    "index": "twitter",
                    "query": {"term": {"user": "kimchy"}},
                    "remote": {"host": "http://otherhost:9200", "username": "elastic"}
                },
                "dest": {"index": "new_twitter", "op_type": "create", "routing": "keep"}
            })
        );
    }

    #[test]
    fn multiple_source_indices_render_as_array() {
        let source = ReindexSource::new().index(["a", "b"]).source();
        assert_eq!(source["index"], json!(["a", "b"]));
    }

    #[test]
    fn send_decodes_counters() {
        let transport = ScriptedTransport::new();
        transport.respond(
            200,
            r#"{"took":147,"timed_out":false,"total":120,"updated":0,"created":120,"deleted":0,
                "batches":1,"version_conflicts":0,"noops":0,"retries":{"bulk":0,"search":0},
                "throttled_millis":0,"requests_per_second":-1.0,"throttled_until_millis":0,"failures":[]}"#,
        );
        let resp = transport
            .client()
            .reindex()
            .source_index("twitter")
            .destination_index("new_twitter")
            .send()
            .unwrap();
        assert_eq!(resp.created, 120);
        assert_eq!(resp.requests_per_second, -1.0);
    }

    #[test]
    fn start_task_forces_async_and_rejects_waiting() {
        let client = offline_client();
        let err = client
            .reindex()
            .source_index("a")
            .destination_index("b")
            .wait_for_completion(true)
            .start_task()
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidArgument(_)));

        let transport = ScriptedTransport::new();
        transport.respond(200, r#"{"task":"oTUltX4IQMOUUVeiohTt8A:12345"}"#);
        let started = transport
            .client()
            .reindex()
            .source_index("a")
            .destination_index("b")
            .start_task()
            .unwrap();
        assert_eq!(started.task, "oTUltX4IQMOUUVeiohTt8A:12345");
        assert_eq!(transport.requests()[0].params.get("wait_for_completion"), Some("false"));
    }
}
