//! Cluster-level endpoints: health, reroute and state.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::client::{decode_success, Client, Endpoint};
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::params::{expand, segments, strings, CommonParams, Missing};

impl Client {
    pub fn cluster_health(&self) -> ClusterHealth<'_> {
        ClusterHealth::new(self)
    }

    pub fn cluster_reroute(&self) -> ClusterReroute<'_> {
        ClusterReroute::new(self)
    }

    pub fn cluster_state(&self) -> ClusterState<'_> {
        ClusterState::new(self)
    }
}

/// `GET /_cluster/health[/{index}]`
#[derive(Debug, Clone)]
pub struct ClusterHealth<'a> {
    client: &'a Client,
    common: CommonParams,
    indices: Vec<String>,
    level: Option<String>,
    local: Option<bool>,
    master_timeout: Option<String>,
    timeout: Option<String>,
    wait_for_active_shards: Option<String>,
    wait_for_nodes: Option<String>,
    wait_for_no_relocating_shards: Option<bool>,
    wait_for_no_initializing_shards: Option<bool>,
    wait_for_status: Option<String>,
    wait_for_events: Option<String>,
}

impl<'a> ClusterHealth<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self {
            client,
            common: CommonParams::default(),
            indices: Vec::new(),
            level: None,
            local: None,
            master_timeout: None,
            timeout: None,
            wait_for_active_shards: None,
            wait_for_nodes: None,
            wait_for_no_relocating_shards: None,
            wait_for_no_initializing_shards: None,
            wait_for_status: None,
            wait_for_events: None,
        }
    }

    common_setters!();

    /// Limit the report to these indices.
    pub fn index<I, S>(mut self, indices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.indices.extend(strings(indices));
        self
    }

    /// `cluster`, `indices` or `shards`.
    pub fn level(mut self, level: &str) -> Self {
        self.level = Some(level.to_string());
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

    pub fn timeout(mut self, timeout: &str) -> Self {
        self.timeout = Some(timeout.to_string());
        self
    }

    pub fn wait_for_active_shards(mut self, shards: &str) -> Self {
        self.wait_for_active_shards = Some(shards.to_string());
        self
    }

    /// Node count expression such as `>=3`.
    pub fn wait_for_nodes(mut self, nodes: &str) -> Self {
        self.wait_for_nodes = Some(nodes.to_string());
        self
    }

    pub fn wait_for_no_relocating_shards(mut self, wait: bool) -> Self {
        self.wait_for_no_relocating_shards = Some(wait);
        self
    }

    pub fn wait_for_no_initializing_shards(mut self, wait: bool) -> Self {
        self.wait_for_no_initializing_shards = Some(wait);
        self
    }

    /// `green`, `yellow` or `red`.
    pub fn wait_for_status(mut self, status: &str) -> Self {
        self.wait_for_status = Some(status.to_string());
        self
    }

    pub fn wait_for_green_status(self) -> Self {
        self.wait_for_status("green")
    }

    pub fn wait_for_yellow_status(self) -> Self {
        self.wait_for_status("yellow")
    }

    /// Priority of pending events to wait for, e.g. `languid`.
    pub fn wait_for_events(mut self, priority: &str) -> Self {
        self.wait_for_events = Some(priority.to_string());
        self
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        Ok(())
    }

    pub fn send(self) -> Result<ClusterHealthResponse, ApiError> {
        self.client.send(&self)
    }
}

impl Endpoint for ClusterHealth<'_> {
    type Response = ClusterHealthResponse;

    fn build_request(&self) -> Result<HttpRequest, ApiError> {
        self.validate()?;
        let path = if self.indices.is_empty() {
            "/_cluster/health".to_string()
        } else {
            expand("/_cluster/health/{index}", &[("index", segments(&self.indices))])?
        };
        let mut req = HttpRequest::new(HttpMethod::Get, path);
        self.common.apply(&mut req);
        let p = &mut req.params;
        p.opt("level", &self.level);
        p.opt("local", &self.local);
        p.opt("master_timeout", &self.master_timeout);
        p.opt("timeout", &self.timeout);
        p.opt("wait_for_active_shards", &self.wait_for_active_shards);
        p.opt("wait_for_nodes", &self.wait_for_nodes);
        p.opt("wait_for_no_relocating_shards", &self.wait_for_no_relocating_shards);
        p.opt("wait_for_no_initializing_shards", &self.wait_for_no_initializing_shards);
        p.opt("wait_for_status", &self.wait_for_status);
        p.opt("wait_for_events", &self.wait_for_events);
        Ok(req)
    }

    fn parse_response(&self, response: HttpResponse) -> Result<ClusterHealthResponse, ApiError> {
        decode_success(&response)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterHealthResponse {
    pub cluster_name: String,
    pub status: String,
    pub timed_out: bool,
    pub number_of_nodes: i64,
    pub number_of_data_nodes: i64,
    pub active_primary_shards: i64,
    pub active_shards: i64,
    pub relocating_shards: i64,
    pub initializing_shards: i64,
    pub unassigned_shards: i64,
    pub delayed_unassigned_shards: i64,
    pub number_of_pending_tasks: i64,
    pub number_of_in_flight_fetch: i64,
    pub task_max_waiting_in_queue_millis: i64,
    pub active_shards_percent_as_number: f64,
    /// Present when `level` is `indices` or `shards`.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub indices: BTreeMap<String, ClusterIndexHealth>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterIndexHealth {
    pub status: String,
    pub number_of_shards: i64,
    pub number_of_replicas: i64,
    pub active_primary_shards: i64,
    pub active_shards: i64,
    pub relocating_shards: i64,
    pub initializing_shards: i64,
    pub unassigned_shards: i64,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub shards: BTreeMap<String, ClusterShardHealth>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterShardHealth {
    pub status: String,
    pub primary_active: bool,
    pub active_shards: i64,
    pub relocating_shards: i64,
    pub initializing_shards: i64,
    pub unassigned_shards: i64,
}

/// A shard allocation command accepted by `_cluster/reroute`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllocationCommand {
    Move {
        index: String,
        shard: i64,
        from_node: String,
        to_node: String,
    },
    Cancel {
        index: String,
        shard: i64,
        node: String,
        allow_primary: Option<bool>,
    },
    AllocateReplica {
        index: String,
        shard: i64,
        node: String,
    },
    AllocateEmptyPrimary {
        index: String,
        shard: i64,
        node: String,
        accept_data_loss: bool,
    },
    AllocateStalePrimary {
        index: String,
        shard: i64,
        node: String,
        accept_data_loss: bool,
    },
}

impl AllocationCommand {
    pub fn name(&self) -> &'static str {
        match self {
            AllocationCommand::Move { .. } => "move",
            AllocationCommand::Cancel { .. } => "cancel",
            AllocationCommand::AllocateReplica { .. } => "allocate_replica",
            AllocationCommand::AllocateEmptyPrimary { .. } => "allocate_empty_primary",
            AllocationCommand::AllocateStalePrimary { .. } => "allocate_stale_primary",
        }
    }

    /// JSON form, e.g. `{"move":{"index":"a","shard":0,...}}`.
    pub fn source(&self) -> Value {
        let body = match self {
            AllocationCommand::Move {
                index,
                shard,
                from_node,
                to_node,
            } => json!({"index": index, "shard": shard, "from_node": from_node, "to_node": to_node}),
            AllocationCommand::Cancel {
                index,
                shard,
                node,
                allow_primary,
            } => {
                let mut body = json!({"index": index, "shard": shard, "node": node});
                if let Some(allow) = allow_primary {
                    body["allow_primary"] = json!(allow);
                }
                body
            }
            AllocationCommand::AllocateReplica { index, shard, node } => {
                json!({"index": index, "shard": shard, "node": node})
            }
            AllocationCommand::AllocateEmptyPrimary {
                index,
                shard,
                node,
                accept_data_loss,
            }
            | AllocationCommand::AllocateStalePrimary {
                index,
                shard,
                node,
                accept_data_loss,
            } => json!({"index": index, "shard": shard, "node": node, "accept_data_loss": accept_data_loss}),
        };
        let mut source = serde_json::Map::new();
        source.insert(self.name().to_string(), body);
        Value::Object(source)
    }

    fn missing_fields(&self, missing: &mut Missing) {
        let index = match self {
            AllocationCommand::Move {
                index,
                from_node,
                to_node,
                ..
            } => {
                missing.check("FromNode", !from_node.is_empty());
                missing.check("ToNode", !to_node.is_empty());
                index
            }
            AllocationCommand::Cancel { index, node, .. }
            | AllocationCommand::AllocateReplica { index, node, .. }
            | AllocationCommand::AllocateEmptyPrimary { index, node, .. }
            | AllocationCommand::AllocateStalePrimary { index, node, .. } => {
                missing.check("Node", !node.is_empty());
                index
            }
        };
        missing.check("Index", !index.is_empty());
    }
}

/// `POST /_cluster/reroute`
#[derive(Debug, Clone)]
pub struct ClusterReroute<'a> {
    client: &'a Client,
    common: CommonParams,
    commands: Vec<AllocationCommand>,
    body: Option<Value>,
    dry_run: Option<bool>,
    explain: Option<bool>,
    retry_failed: Option<bool>,
    metric: Vec<String>,
    master_timeout: Option<String>,
    timeout: Option<String>,
}

impl<'a> ClusterReroute<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self {
            client,
            common: CommonParams::default(),
            commands: Vec::new(),
            body: None,
            dry_run: None,
            explain: None,
            retry_failed: None,
            metric: Vec::new(),
            master_timeout: None,
            timeout: None,
        }
    }

    common_setters!();

    pub fn add(mut self, command: AllocationCommand) -> Self {
        self.commands.push(command);
        self
    }

    /// Use a raw body instead of the assembled commands.
    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = Some(dry_run);
        self
    }

    pub fn explain(mut self, explain: bool) -> Self {
        self.explain = Some(explain);
        self
    }

    pub fn retry_failed(mut self, retry: bool) -> Self {
        self.retry_failed = Some(retry);
        self
    }

    pub fn metric<I, S>(mut self, metrics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.metric.extend(strings(metrics));
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

    pub fn validate(&self) -> Result<(), ApiError> {
        let mut missing = Missing::new();
        for command in &self.commands {
            command.missing_fields(&mut missing);
        }
        missing.finish()
    }

    pub fn send(self) -> Result<ClusterRerouteResponse, ApiError> {
        self.client.send(&self)
    }
}

impl Endpoint for ClusterReroute<'_> {
    type Response = ClusterRerouteResponse;

    fn build_request(&self) -> Result<HttpRequest, ApiError> {
        self.validate()?;
        let mut req = HttpRequest::new(HttpMethod::Post, "/_cluster/reroute");
        self.common.apply(&mut req);
        let p = &mut req.params;
        p.opt("dry_run", &self.dry_run);
        p.opt("explain", &self.explain);
        p.opt("retry_failed", &self.retry_failed);
        p.list("metric", &self.metric);
        p.opt("master_timeout", &self.master_timeout);
        p.opt("timeout", &self.timeout);

        match &self.body {
            Some(body) => req.json_body(body)?,
            None => {
                let commands: Vec<Value> = self.commands.iter().map(AllocationCommand::source).collect();
                req.json_body(&json!({ "commands": commands }))?;
            }
        }
        Ok(req)
    }

    fn parse_response(&self, response: HttpResponse) -> Result<ClusterRerouteResponse, ApiError> {
        decode_success(&response)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterRerouteResponse {
    pub acknowledged: bool,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub state: Value,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub explanations: Vec<Value>,
}

/// `GET /_cluster/state[/{metric}[/{index}]]`
#[derive(Debug, Clone)]
pub struct ClusterState<'a> {
    client: &'a Client,
    common: CommonParams,
    indices: Vec<String>,
    metrics: Vec<String>,
    local: Option<bool>,
    master_timeout: Option<String>,
    flat_settings: Option<bool>,
    allow_no_indices: Option<bool>,
    expand_wildcards: Option<String>,
    ignore_unavailable: Option<bool>,
    wait_for_metadata_version: Option<i64>,
    wait_for_timeout: Option<String>,
}

impl<'a> ClusterState<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self {
            client,
            common: CommonParams::default(),
            indices: Vec::new(),
            metrics: Vec::new(),
            local: None,
            master_timeout: None,
            flat_settings: None,
            allow_no_indices: None,
            expand_wildcards: None,
            ignore_unavailable: None,
            wait_for_metadata_version: None,
            wait_for_timeout: None,
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

    /// `version`, `master_node`, `nodes`, `routing_table`, `metadata`,
    /// `blocks` or `_all`.
    pub fn metric<I, S>(mut self, metrics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.metrics.extend(strings(metrics));
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

    pub fn flat_settings(mut self, flat: bool) -> Self {
        self.flat_settings = Some(flat);
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

    pub fn wait_for_metadata_version(mut self, version: i64) -> Self {
        self.wait_for_metadata_version = Some(version);
        self
    }

    pub fn wait_for_timeout(mut self, timeout: &str) -> Self {
        self.wait_for_timeout = Some(timeout.to_string());
        self
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        Ok(())
    }

    pub fn send(self) -> Result<ClusterStateResponse, ApiError> {
        self.client.send(&self)
    }
}

impl Endpoint for ClusterState<'_> {
    type Response = ClusterStateResponse;

    fn build_request(&self) -> Result<HttpRequest, ApiError> {
        self.validate()?;
        let metrics = if self.metrics.is_empty() {
            "_all".to_string()
        } else {
            segments(&self.metrics)
        };
        let path = if !self.indices.is_empty() {
            expand(
                "/_cluster/state/{metrics}/{indices}",
                &[("metrics", metrics), ("indices", segments(&self.indices))],
            )?
        } else if !self.metrics.is_empty() {
            expand("/_cluster/state/{metrics}", &[("metrics", metrics)])?
        } else {
            "/_cluster/state".to_string()
        };
        let mut req = HttpRequest::new(HttpMethod::Get, path);
        self.common.apply(&mut req);
        let p = &mut req.params;
        p.opt("local", &self.local);
        p.opt("master_timeout", &self.master_timeout);
        p.opt("flat_settings", &self.flat_settings);
        p.opt("allow_no_indices", &self.allow_no_indices);
        p.opt("expand_wildcards", &self.expand_wildcards);
        p.opt("ignore_unavailable", &self.ignore_unavailable);
        p.opt("wait_for_metadata_version", &self.wait_for_metadata_version);
        p.opt("wait_for_timeout", &self.wait_for_timeout);
        Ok(req)
    }

    fn parse_response(&self, response: HttpResponse) -> Result<ClusterStateResponse, ApiError> {
        decode_success(&response)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterStateResponse {
    pub cluster_name: String,
    pub cluster_uuid: String,
    pub version: i64,
    pub state_uuid: String,
    pub master_node: String,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub blocks: Value,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub nodes: BTreeMap<String, DiscoveryNode>,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub metadata: Value,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub routing_table: Value,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub routing_nodes: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compressed_size_in_bytes: Option<i64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryNode {
    pub name: String,
    pub ephemeral_id: String,
    pub transport_address: String,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{offline_client, ScriptedTransport};

    #[test]
    fn health_without_options_has_bare_path() {
        let client = offline_client();
        let req = client.cluster_health().build_request().unwrap();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "/_cluster/health");
        assert!(req.params.is_empty());
        assert!(req.body.is_none());
    }

    #[test]
    fn health_sets_every_param() {
        let client = offline_client();
        let req = client
            .cluster_health()
            .index(["twitter", "logs 1"])
            .level("shards")
            .local(true)
            .master_timeout("1m")
            .timeout("30s")
            .wait_for_active_shards("all")
            .wait_for_nodes(">=3")
            .wait_for_no_relocating_shards(true)
            .wait_for_no_initializing_shards(false)
            .wait_for_green_status()
            .wait_for_events("languid")
            .pretty(true)
            .build_request()
            .unwrap();
        assert_eq!(req.path, "/_cluster/health/twitter,logs%201");
        let expected = [
            ("level", "shards"),
            ("local", "true"),
            ("master_timeout", "1m"),
            ("pretty", "true"),
            ("timeout", "30s"),
            ("wait_for_active_shards", "all"),
            ("wait_for_events", "languid"),
            ("wait_for_no_initializing_shards", "false"),
            ("wait_for_no_relocating_shards", "true"),
            ("wait_for_nodes", ">=3"),
            ("wait_for_status", "green"),
        ];
        assert_eq!(req.params.iter().collect::<Vec<_>>(), expected);
    }

    #[test]
    fn health_decodes_documented_payload() {
        let body = r#"{
            "cluster_name":"escluster","status":"green","timed_out":false,
            "number_of_nodes":3,"number_of_data_nodes":3,"active_primary_shards":5,
            "active_shards":10,"relocating_shards":0,"initializing_shards":0,
            "unassigned_shards":0,"delayed_unassigned_shards":0,"number_of_pending_tasks":0,
            "number_of_in_flight_fetch":0,"task_max_waiting_in_queue_millis":0,
            "active_shards_percent_as_number":100.0,
            "indices":{"twitter":{"status":"green","number_of_shards":1,"number_of_replicas":1,
              "active_primary_shards":1,"active_shards":2,"relocating_shards":0,
              "initializing_shards":0,"unassigned_shards":0,
              "shards":{"0":{"status":"green","primary_active":true,"active_shards":2,
                "relocating_shards":0,"initializing_shards":0,"unassigned_shards":0}}}}
        }"#;
        let client = offline_client();
        let health = client
            .cluster_health()
            .parse_response(HttpResponse::new(200, body))
            .unwrap();
        assert_eq!(health.cluster_name, "escluster");
        assert_eq!(health.status, "green");
        assert!(!health.timed_out);
        assert_eq!(health.number_of_nodes, 3);
        assert_eq!(health.active_shards, 10);
        assert_eq!(health.active_shards_percent_as_number, 100.0);
        let twitter = &health.indices["twitter"];
        assert_eq!(twitter.number_of_replicas, 1);
        assert!(twitter.shards["0"].primary_active);
    }

    #[test]
    fn health_send_goes_through_transport() {
        let transport = ScriptedTransport::new();
        transport.respond(200, r#"{"cluster_name":"c","status":"yellow"}"#);
        let client = transport.client();
        let health = client.cluster_health().wait_for_yellow_status().send().unwrap();
        assert_eq!(health.status, "yellow");
        let requests = transport.requests();
        assert_eq!(requests[0].params.get("wait_for_status"), Some("yellow"));
    }

    #[test]
    fn reroute_builds_commands() {
        let client = offline_client();
        let req = client
            .cluster_reroute()
            .add(AllocationCommand::Move {
                index: "test".into(),
                shard: 0,
                from_node: "node1".into(),
                to_node: "node2".into(),
            })
            .add(AllocationCommand::AllocateReplica {
                index: "test".into(),
                shard: 1,
                node: "node3".into(),
            })
            .dry_run(true)
            .metric(["none"])
            .build_request()
            .unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "/_cluster/reroute");
        assert_eq!(req.params.get("dry_run"), Some("true"));
        assert_eq!(req.params.get("metric"), Some("none"));
        let body: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(
            body,
            json!({"commands":[
                {"move":{"index":"test","shard":0,"from_node":"node1","to_node":"node2"}},
                {"allocate_replica":{"index":"test","shard":1,"node":"node3"}}
            ]})
        );
    }

    #[test]
    fn reroute_validation_lists_all_missing_fields() {
        let client = offline_client();
        let err = client
            .cluster_reroute()
            .add(AllocationCommand::Cancel {
                index: String::new(),
                shard: 0,
                node: String::new(),
                allow_primary: None,
            })
            .validate()
            .unwrap_err();
        assert_eq!(err.to_string(), "missing required fields: [Node, Index]");
    }

    #[test]
    fn allocation_command_names_and_sources() {
        let cmd = AllocationCommand::AllocateStalePrimary {
            index: "i".into(),
            shard: 2,
            node: "n".into(),
            accept_data_loss: true,
        };
        assert_eq!(cmd.name(), "allocate_stale_primary");
        assert_eq!(
            cmd.source(),
            json!({"allocate_stale_primary":{"index":"i","shard":2,"node":"n","accept_data_loss":true}})
        );
        let cancel = AllocationCommand::Cancel {
            index: "i".into(),
            shard: 0,
            node: "n".into(),
            allow_primary: Some(true),
        };
        assert_eq!(cancel.source()["cancel"]["allow_primary"], json!(true));
    }

    #[test]
    fn state_paths() {
        let client = offline_client();
        assert_eq!(client.cluster_state().build_request().unwrap().path, "/_cluster/state");
        assert_eq!(
            client.cluster_state().metric(["metadata", "nodes"]).build_request().unwrap().path,
            "/_cluster/state/metadata,nodes"
        );
        assert_eq!(
            client.cluster_state().index(["twitter"]).build_request().unwrap().path,
            "/_cluster/state/_all/twitter"
        );
        let req = client
            .cluster_state()
            .metric(["metadata"])
            .index(["a", "b"])
            .local(true)
            .wait_for_metadata_version(7)
            .build_request()
            .unwrap();
        assert_eq!(req.path, "/_cluster/state/metadata/a,b");
        assert_eq!(req.params.get("local"), Some("true"));
        assert_eq!(req.params.get("wait_for_metadata_version"), Some("7"));
    }

    #[test]
    fn state_decodes_nodes() {
        let body = r#"{"cluster_name":"es","cluster_uuid":"u1","version":12,"state_uuid":"s1",
            "master_node":"n1","nodes":{"n1":{"name":"node-1","ephemeral_id":"e","transport_address":"127.0.0.1:9300","attributes":{"zone":"a"}}}}"#;
        let client = offline_client();
        let state = client.cluster_state().parse_response(HttpResponse::new(200, body)).unwrap();
        assert_eq!(state.version, 12);
        assert_eq!(state.nodes["n1"].attributes["zone"], "a");
        assert!(state.metadata.is_null());
    }
}
