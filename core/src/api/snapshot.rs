//! Snapshot repositories and snapshots.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{AcknowledgedResponse, ShardsInfo};
use crate::client::{decode_delete, decode_success, Client, Endpoint};
use crate::error::{ApiError, DeleteOutcome};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::params::{expand, segment, segments, strings, CommonParams, Missing};

impl Client {
    pub fn snapshot_create_repository(&self, repository: &str) -> SnapshotCreateRepository<'_> {
        SnapshotCreateRepository::new(self).repository(repository)
    }

    pub fn snapshot_create(&self, repository: &str, snapshot: &str) -> SnapshotCreate<'_> {
        SnapshotCreate::new(self).repository(repository).snapshot(snapshot)
    }

    pub fn snapshot_get(&self, repository: &str) -> SnapshotGet<'_> {
        SnapshotGet::new(self).repository(repository)
    }

    pub fn snapshot_restore(&self, repository: &str, snapshot: &str) -> SnapshotRestore<'_> {
        SnapshotRestore::new(self).repository(repository).snapshot(snapshot)
    }

    pub fn snapshot_delete(&self, repository: &str, snapshot: &str) -> SnapshotDelete<'_> {
        SnapshotDelete::new(self).repository(repository).snapshot(snapshot)
    }
}

/// `PUT /_snapshot/{repository}`
#[derive(Debug, Clone)]
pub struct SnapshotCreateRepository<'a> {
    client: &'a Client,
    common: CommonParams,
    repository: String,
    kind: Option<String>,
    settings: Map<String, Value>,
    body: Option<Value>,
    master_timeout: Option<String>,
    timeout: Option<String>,
    verify: Option<bool>,
}

impl<'a> SnapshotCreateRepository<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self {
            client,
            common: CommonParams::default(),
            repository: String::new(),
            kind: None,
            settings: Map::new(),
            body: None,
            master_timeout: None,
            timeout: None,
            verify: None,
        }
    }

    common_setters!();

    pub fn repository(mut self, repository: &str) -> Self {
        self.repository = repository.to_string();
        self
    }

    /// Repository type, e.g. `fs` or `url`.
    pub fn kind(mut self, kind: &str) -> Self {
        self.kind = Some(kind.to_string());
        self
    }

    pub fn setting(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.settings.insert(name.to_string(), value.into());
        self
    }

    pub fn settings(mut self, settings: Map<String, Value>) -> Self {
        self.settings.extend(settings);
        self
    }

    /// Raw body; takes precedence over type and settings.
    pub fn body_json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn master_timeout(mut self, timeout: &str) -> Self {
        self.master_timeout = Some(timeout.to_string());
        self
    }

    pub fn timeout(mut self, timeout: &str) -> Self {
        self.timeout = Some(timeout.to_string());
        self
    }

    pub fn verify(mut self, verify: bool) -> Self {
        self.verify = Some(verify);
        self
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        Missing::new()
            .check("Repository", !self.repository.is_empty())
            .check("BodyJson", self.body.is_some() || self.kind.is_some())
            .finish()
    }

    fn body_value(&self) -> Value {
        if let Some(body) = &self.body {
            return body.clone();
        }
        let mut body = Map::new();
        if let Some(kind) = &self.kind {
            body.insert("type".into(), Value::String(kind.clone()));
        }
        if !self.settings.is_empty() {
            body.insert("settings".into(), Value::Object(self.settings.clone()));
        }
        Value::Object(body)
    }

    pub fn send(self) -> Result<AcknowledgedResponse, ApiError> {
        self.client.send(&self)
    }
}

impl Endpoint for SnapshotCreateRepository<'_> {
    type Response = AcknowledgedResponse;

    fn build_request(&self) -> Result<HttpRequest, ApiError> {
        self.validate()?;
        let path = expand("/_snapshot/{repository}", &[("repository", segment(&self.repository))])?;
        let mut req = HttpRequest::new(HttpMethod::Put, path);
        self.common.apply(&mut req);
        let p = &mut req.params;
        p.opt("master_timeout", &self.master_timeout);
        p.opt("timeout", &self.timeout);
        p.opt("verify", &self.verify);
        req.json_body(&self.body_value())?;
        Ok(req)
    }

    fn parse_response(&self, response: HttpResponse) -> Result<AcknowledgedResponse, ApiError> {
        decode_success(&response)
    }
}

/// `PUT /_snapshot/{repository}/{snapshot}`
#[derive(Debug, Clone)]
pub struct SnapshotCreate<'a> {
    client: &'a Client,
    common: CommonParams,
    repository: String,
    snapshot: String,
    body: Option<Value>,
    wait_for_completion: Option<bool>,
    master_timeout: Option<String>,
}

impl<'a> SnapshotCreate<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self {
            client,
            common: CommonParams::default(),
            repository: String::new(),
            snapshot: String::new(),
            body: None,
            wait_for_completion: None,
            master_timeout: None,
        }
    }

    common_setters!();

    pub fn repository(mut self, repository: &str) -> Self {
        self.repository = repository.to_string();
        self
    }

    pub fn snapshot(mut self, snapshot: &str) -> Self {
        self.snapshot = snapshot.to_string();
        self
    }

    /// Snapshot definition, e.g. `{"indices": "a,b", "include_global_state": false}`.
    pub fn body_json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn wait_for_completion(mut self, wait: bool) -> Self {
        self.wait_for_completion = Some(wait);
        self
    }

    pub fn master_timeout(mut self, timeout: &str) -> Self {
        self.master_timeout = Some(timeout.to_string());
        self
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        Missing::new()
            .check("Repository", !self.repository.is_empty())
            .check("Snapshot", !self.snapshot.is_empty())
            .finish()
    }

    pub fn send(self) -> Result<SnapshotCreateResponse, ApiError> {
        self.client.send(&self)
    }
}

impl Endpoint for SnapshotCreate<'_> {
    type Response = SnapshotCreateResponse;

    fn build_request(&self) -> Result<HttpRequest, ApiError> {
        self.validate()?;
        let path = expand(
            "/_snapshot/{repository}/{snapshot}",
            &[
                ("repository", segment(&self.repository)),
                ("snapshot", segment(&self.snapshot)),
            ],
        )?;
        let mut req = HttpRequest::new(HttpMethod::Put, path);
        self.common.apply(&mut req);
        let p = &mut req.params;
        p.opt("wait_for_completion", &self.wait_for_completion);
        p.opt("master_timeout", &self.master_timeout);
        if let Some(body) = &self.body {
            req.json_body(body)?;
        }
        Ok(req)
    }

    fn parse_response(&self, response: HttpResponse) -> Result<SnapshotCreateResponse, ApiError> {
        decode_success(&response)
    }
}

/// Without `wait_for_completion` the engine only reports `accepted`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotCreateResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accepted: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<SnapshotInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotInfo {
    pub snapshot: String,
    pub uuid: String,
    pub version_id: i64,
    pub version: String,
    pub indices: Vec<String>,
    pub include_global_state: bool,
    pub state: String,
    pub start_time: String,
    pub start_time_in_millis: i64,
    pub end_time: String,
    pub end_time_in_millis: i64,
    pub duration_in_millis: i64,
    pub failures: Vec<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shards: Option<ShardsInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

/// `GET /_snapshot/{repository}/{snapshot,...}`. No snapshot names means `_all`.
#[derive(Debug, Clone)]
pub struct SnapshotGet<'a> {
    client: &'a Client,
    common: CommonParams,
    repository: String,
    snapshots: Vec<String>,
    master_timeout: Option<String>,
    ignore_unavailable: Option<bool>,
    verbose: Option<bool>,
}

impl<'a> SnapshotGet<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self {
            client,
            common: CommonParams::default(),
            repository: String::new(),
            snapshots: Vec::new(),
            master_timeout: None,
            ignore_unavailable: None,
            verbose: None,
        }
    }

    common_setters!();

    pub fn repository(mut self, repository: &str) -> Self {
        self.repository = repository.to_string();
        self
    }

    pub fn snapshot<I, S>(mut self, snapshots: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.snapshots.extend(strings(snapshots));
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

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = Some(verbose);
        self
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        Missing::new().check("Repository", !self.repository.is_empty()).finish()
    }

    pub fn send(self) -> Result<SnapshotGetResponse, ApiError> {
        self.client.send(&self)
    }
}

impl Endpoint for SnapshotGet<'_> {
    type Response = SnapshotGetResponse;

    fn build_request(&self) -> Result<HttpRequest, ApiError> {
        self.validate()?;
        let snapshots = if self.snapshots.is_empty() {
            "_all".to_string()
        } else {
            segments(&self.snapshots)
        };
        let path = expand(
            "/_snapshot/{repository}/{snapshot}",
            &[("repository", segment(&self.repository)), ("snapshot", snapshots)],
        )?;
        let mut req = HttpRequest::new(HttpMethod::Get, path);
        self.common.apply(&mut req);
        let p = &mut req.params;
        p.opt("master_timeout", &self.master_timeout);
        p.opt("ignore_unavailable", &self.ignore_unavailable);
        p.opt("verbose", &self.verbose);
        Ok(req)
    }

    fn parse_response(&self, response: HttpResponse) -> Result<SnapshotGetResponse, ApiError> {
        decode_success(&response)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotGetResponse {
    pub snapshots: Vec<SnapshotInfo>,
}

/// `POST /_snapshot/{repository}/{snapshot}/_restore`
#[derive(Debug, Clone)]
pub struct SnapshotRestore<'a> {
    client: &'a Client,
    common: CommonParams,
    repository: String,
    snapshot: String,
    wait_for_completion: Option<bool>,
    master_timeout: Option<String>,
    indices: Vec<String>,
    ignore_unavailable: Option<bool>,
    include_global_state: Option<bool>,
    partial: Option<bool>,
    rename_pattern: Option<String>,
    rename_replacement: Option<String>,
    index_settings: Option<Value>,
    include_aliases: Option<bool>,
}

impl<'a> SnapshotRestore<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self {
            client,
            common: CommonParams::default(),
            repository: String::new(),
            snapshot: String::new(),
            wait_for_completion: None,
            master_timeout: None,
            indices: Vec::new(),
            ignore_unavailable: None,
            include_global_state: None,
            partial: None,
            rename_pattern: None,
            rename_replacement: None,
            index_settings: None,
            include_aliases: None,
        }
    }

    common_setters!();

    pub fn repository(mut self, repository: &str) -> Self {
        self.repository = repository.to_string();
        self
    }

    pub fn snapshot(mut self, snapshot: &str) -> Self {
        self.snapshot = snapshot.to_string();
        self
    }

    pub fn wait_for_completion(mut self, wait: bool) -> Self {
        self.wait_for_completion = Some(wait);
        self
    }

    pub fn master_timeout(mut self, timeout: &str) -> Self {
        self.master_timeout = Some(timeout.to_string());
        self
    }

    pub fn indices<I, S>(mut self, indices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.indices.extend(strings(indices));
        self
    }

    pub fn ignore_unavailable(mut self, ignore: bool) -> Self {
        self.ignore_unavailable = Some(ignore);
        self
    }

    pub fn include_global_state(mut self, include: bool) -> Self {
        self.include_global_state = Some(include);
        self
    }

    pub fn partial(mut self, partial: bool) -> Self {
        self.partial = Some(partial);
        self
    }

    pub fn rename_pattern(mut self, pattern: &str) -> Self {
        self.rename_pattern = Some(pattern.to_string());
        self
    }

    pub fn rename_replacement(mut self, replacement: &str) -> Self {
        self.rename_replacement = Some(replacement.to_string());
        self
    }

    pub fn index_settings(mut self, settings: Value) -> Self {
        self.index_settings = Some(settings);
        self
    }

    pub fn include_aliases(mut self, include: bool) -> Self {
        self.include_aliases = Some(include);
        self
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        Missing::new()
            .check("Repository", !self.repository.is_empty())
            .check("Snapshot", !self.snapshot.is_empty())
            .finish()
    }

    fn body_value(&self) -> Option<Value> {
        let mut body = Map::new();
        if !self.indices.is_empty() {
            body.insert("indices".into(), Value::String(self.indices.join(",")));
        }
        let flags = [
            ("ignore_unavailable", self.ignore_unavailable),
            ("include_global_state", self.include_global_state),
            ("partial", self.partial),
            ("include_aliases", self.include_aliases),
        ];
        for (name, flag) in flags {
            if let Some(flag) = flag {
                body.insert(name.into(), Value::Bool(flag));
            }
        }
        if let Some(pattern) = &self.rename_pattern {
            body.insert("rename_pattern".into(), Value::String(pattern.clone()));
        }
        if let Some(replacement) = &self.rename_replacement {
            body.insert("rename_replacement".into(), Value::String(replacement.clone()));
        }
        if let Some(settings) = &self.index_settings {
            body.insert("index_settings".into(), settings.clone());
        }
        (!body.is_empty()).then_some(Value::Object(body))
    }

    pub fn send(self) -> Result<SnapshotRestoreResponse, ApiError> {
        self.client.send(&self)
    }
}

impl Endpoint for SnapshotRestore<'_> {
    type Response = SnapshotRestoreResponse;

    fn build_request(&self) -> Result<HttpRequest, ApiError> {
        self.validate()?;
        let path = expand(
            "/_snapshot/{repository}/{snapshot}/_restore",
            &[
                ("repository", segment(&self.repository)),
                ("snapshot", segment(&self.snapshot)),
            ],
        )?;
        let mut req = HttpRequest::new(HttpMethod::Post, path);
        self.common.apply(&mut req);
        let p = &mut req.params;
        p.opt("wait_for_completion", &self.wait_for_completion);
        p.opt("master_timeout", &self.master_timeout);
        if let Some(body) = self.body_value() {
            req.json_body(&body)?;
        }
        Ok(req)
    }

    fn parse_response(&self, response: HttpResponse) -> Result<SnapshotRestoreResponse, ApiError> {
        decode_success(&response)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnapshotRestoreResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accepted: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<RestoredSnapshot>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RestoredSnapshot {
    pub snapshot: String,
    pub indices: Vec<String>,
    pub shards: ShardsInfo,
}

/// `DELETE /_snapshot/{repository}/{snapshot}`
#[derive(Debug, Clone)]
pub struct SnapshotDelete<'a> {
    client: &'a Client,
    common: CommonParams,
    repository: String,
    snapshot: String,
    master_timeout: Option<String>,
}

impl<'a> SnapshotDelete<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self {
            client,
            common: CommonParams::default(),
            repository: String::new(),
            snapshot: String::new(),
            master_timeout: None,
        }
    }

    common_setters!();

    pub fn repository(mut self, repository: &str) -> Self {
        self.repository = repository.to_string();
        self
    }

    pub fn snapshot(mut self, snapshot: &str) -> Self {
        self.snapshot = snapshot.to_string();
        self
    }

    pub fn master_timeout(mut self, timeout: &str) -> Self {
        self.master_timeout = Some(timeout.to_string());
        self
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        Missing::new()
            .check("Repository", !self.repository.is_empty())
            .check("Snapshot", !self.snapshot.is_empty())
            .finish()
    }

    pub fn send(self) -> Result<DeleteOutcome<AcknowledgedResponse>, ApiError> {
        self.client.send(&self)
    }
}

impl Endpoint for SnapshotDelete<'_> {
    type Response = DeleteOutcome<AcknowledgedResponse>;

    fn build_request(&self) -> Result<HttpRequest, ApiError> {
        self.validate()?;
        let path = expand(
            "/_snapshot/{repository}/{snapshot}",
            &[
                ("repository", segment(&self.repository)),
                ("snapshot", segment(&self.snapshot)),
            ],
        )?;
        let mut req = HttpRequest::new(HttpMethod::Delete, path);
        self.common.apply(&mut req);
        req.params.opt("master_timeout", &self.master_timeout);
        Ok(req)
    }

    fn parse_response(&self, response: HttpResponse) -> Result<DeleteOutcome<AcknowledgedResponse>, ApiError> {
        decode_delete(&response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{offline_client, ScriptedTransport};
    use serde_json::json;

    #[test]
    fn create_repository_from_type_and_settings() {
        let client = offline_client();
        let req = client
            .snapshot_create_repository("my_backup")
            .kind("fs")
            .setting("location", "/tmp/backups")
            .setting("compress", true)
            .verify(false)
            .build_request()
            .unwrap();
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.path, "/_snapshot/my_backup");
        assert_eq!(req.params.get("verify"), Some("false"));
        let body: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(
            body,
            json!({"type": "fs", "settings": {"compress": true, "location": "/tmp/backups"}})
        );
    }

    #[test]
    fn create_repository_requires_name_and_body() {
        let client = offline_client();
        let err = SnapshotCreateRepository::new(&client).build_request().unwrap_err();
        assert_eq!(err.to_string(), "missing required fields: [Repository, BodyJson]");
        let req = client
            .snapshot_create_repository("r")
            .kind("fs")
            .body_json(json!({"type": "url"}))
            .build_request()
            .unwrap();
        assert_eq!(req.body.as_deref(), Some(r#"{"type":"url"}"#));
    }

    #[test]
    fn create_snapshot_waits_and_decodes_info() {
        let transport = ScriptedTransport::new();
        transport.respond(
            200,
            r#"{"snapshot":{"snapshot":"snap_1","uuid":"u1","indices":["a"],"state":"SUCCESS","shards":{"total":1,"successful":1,"failed":0}}}"#,
        );
        let client = transport.client();
        let res = client
            .snapshot_create("my_backup", "snap_1")
            .wait_for_completion(true)
            .send()
            .unwrap();
        let info = res.snapshot.unwrap();
        assert_eq!(info.state, "SUCCESS");
        assert_eq!(info.indices, vec!["a"]);
        assert_eq!(info.shards.unwrap().successful, 1);
        let req = &transport.requests()[0];
        assert_eq!(req.path, "/_snapshot/my_backup/snap_1");
        assert_eq!(req.params.get("wait_for_completion"), Some("true"));
        assert!(req.body.is_none());
    }

    #[test]
    fn get_defaults_to_all_snapshots() {
        let client = offline_client();
        let req = client.snapshot_get("repo").build_request().unwrap();
        assert_eq!(req.path, "/_snapshot/repo/_all");
        let req = client.snapshot_get("repo").snapshot(["s1", "s 2"]).build_request().unwrap();
        assert_eq!(req.path, "/_snapshot/repo/s1,s%202");
    }

    #[test]
    fn restore_body_carries_only_set_fields() {
        let client = offline_client();
        let req = client
            .snapshot_restore("repo", "snap")
            .indices(["a", "b"])
            .include_global_state(false)
            .rename_pattern("(.+)")
            .rename_replacement("restored_$1")
            .index_settings(json!({"index.number_of_replicas": 0}))
            .build_request()
            .unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "/_snapshot/repo/snap/_restore");
        let body: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(
            body,
            json!({
                "indices": "a,b",
                "include_global_state": false,
                "rename_pattern": "(.+)",
                "rename_replacement": "restored_$1",
                "index_settings": {"index.number_of_replicas": 0}
            })
        );
        assert!(client.snapshot_restore("repo", "snap").build_request().unwrap().body.is_none());
    }

    #[test]
    fn delete_missing_snapshot_reports_not_found() {
        let transport = ScriptedTransport::new();
        transport.respond(
            404,
            r#"{"error":{"type":"snapshot_missing_exception","reason":"[repo:snap] is missing"},"status":404}"#,
        );
        let client = transport.client();
        let outcome = client.snapshot_delete("repo", "snap").send().unwrap();
        assert!(outcome.is_not_found());
        assert_eq!(
            outcome.error().unwrap().details().unwrap().kind,
            "snapshot_missing_exception"
        );
    }
}
