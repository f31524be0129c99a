//! Task management.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::{decode_success, Client, Endpoint};
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::params::{expand, segment, strings, CommonParams, Missing};

impl Client {
    pub fn tasks_list(&self) -> TasksList<'_> {
        TasksList::new(self)
    }

    pub fn tasks_get_task(&self, task_id: &str) -> TasksGetTask<'_> {
        TasksGetTask::new(self).task_id(task_id)
    }

    pub fn tasks_cancel(&self) -> TasksCancel<'_> {
        TasksCancel::new(self)
    }
}

/// `GET /_tasks`
#[derive(Debug, Clone)]
pub struct TasksList<'a> {
    client: &'a Client,
    common: CommonParams,
    actions: Vec<String>,
    detailed: Option<bool>,
    nodes: Vec<String>,
    parent_task_id: Option<String>,
    wait_for_completion: Option<bool>,
    timeout: Option<String>,
    group_by: Option<String>,
}

impl<'a> TasksList<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self {
            client,
            common: CommonParams::default(),
            actions: Vec::new(),
            detailed: None,
            nodes: Vec::new(),
            parent_task_id: None,
            wait_for_completion: None,
            timeout: None,
            group_by: None,
        }
    }

    common_setters!();

    pub fn actions<I, S>(mut self, actions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.actions.extend(strings(actions));
        self
    }

    pub fn detailed(mut self, detailed: bool) -> Self {
        self.detailed = Some(detailed);
        self
    }

    pub fn nodes<I, S>(mut self, nodes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.nodes.extend(strings(nodes));
        self
    }

    pub fn parent_task_id(mut self, id: &str) -> Self {
        self.parent_task_id = Some(id.to_string());
        self
    }

    pub fn wait_for_completion(mut self, wait: bool) -> Self {
        self.wait_for_completion = Some(wait);
        self
    }

    pub fn timeout(mut self, timeout: &str) -> Self {
        self.timeout = Some(timeout.to_string());
        self
    }

    /// `nodes`, `parents` or `none`.
    pub fn group_by(mut self, group_by: &str) -> Self {
        self.group_by = Some(group_by.to_string());
        self
    }

    pub fn send(self) -> Result<TasksListResponse, ApiError> {
        self.client.send(&self)
    }
}

impl Endpoint for TasksList<'_> {
    type Response = TasksListResponse;

    fn build_request(&self) -> Result<HttpRequest, ApiError> {
        let mut req = HttpRequest::new(HttpMethod::Get, "/_tasks");
        self.common.apply(&mut req);
        let p = &mut req.params;
        p.list("actions", &self.actions);
        p.opt("detailed", &self.detailed);
        p.list("nodes", &self.nodes);
        p.opt("parent_task_id", &self.parent_task_id);
        p.opt("wait_for_completion", &self.wait_for_completion);
        p.opt("timeout", &self.timeout);
        p.opt("group_by", &self.group_by);
        Ok(req)
    }

    fn parse_response(&self, response: HttpResponse) -> Result<TasksListResponse, ApiError> {
        decode_success(&response)
    }
}

/// Tasks grouped by node (the default) or flattened under `tasks` when
/// grouped by parent or not at all.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TasksListResponse {
    pub task_failures: Vec<Value>,
    pub node_failures: Vec<Value>,
    pub nodes: BTreeMap<String, DiscoveryNode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tasks: Option<Value>,
}

impl TasksListResponse {
    /// Every task across all nodes, keyed by `node:id`.
    pub fn all_tasks(&self) -> BTreeMap<String, TaskInfo> {
        self.nodes
            .values()
            .flat_map(|node| node.tasks.iter().map(|(id, task)| (id.clone(), task.clone())))
            .collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiscoveryNode {
    pub name: String,
    pub transport_address: String,
    pub host: String,
    pub ip: String,
    pub roles: Vec<String>,
    pub attributes: BTreeMap<String, Value>,
    pub tasks: BTreeMap<String, TaskInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskInfo {
    pub node: String,
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: String,
    pub action: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub start_time_in_millis: i64,
    pub running_time_in_nanos: i64,
    pub cancellable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_task_id: Option<String>,
    pub headers: BTreeMap<String, String>,
}

/// `GET /_tasks/{task_id}`
#[derive(Debug, Clone)]
pub struct TasksGetTask<'a> {
    client: &'a Client,
    common: CommonParams,
    task_id: String,
    wait_for_completion: Option<bool>,
}

impl<'a> TasksGetTask<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self {
            client,
            common: CommonParams::default(),
            task_id: String::new(),
            wait_for_completion: None,
        }
    }

    common_setters!();

    /// Task identifier in `node:id` form.
    pub fn task_id(mut self, task_id: &str) -> Self {
        self.task_id = task_id.to_string();
        self
    }

    pub fn wait_for_completion(mut self, wait: bool) -> Self {
        self.wait_for_completion = Some(wait);
        self
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        Missing::new().check("TaskId", !self.task_id.is_empty()).finish()
    }

    pub fn send(self) -> Result<TasksGetTaskResponse, ApiError> {
        self.client.send(&self)
    }
}

impl Endpoint for TasksGetTask<'_> {
    type Response = TasksGetTaskResponse;

    fn build_request(&self) -> Result<HttpRequest, ApiError> {
        self.validate()?;
        let path = expand("/_tasks/{task_id}", &[("task_id", segment(&self.task_id))])?;
        let mut req = HttpRequest::new(HttpMethod::Get, path);
        self.common.apply(&mut req);
        req.params.opt("wait_for_completion", &self.wait_for_completion);
        Ok(req)
    }

    fn parse_response(&self, response: HttpResponse) -> Result<TasksGetTaskResponse, ApiError> {
        decode_success(&response)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TasksGetTaskResponse {
    pub completed: bool,
    pub task: TaskInfo,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
}

/// `POST /_tasks[/{task_id}]/_cancel`
#[derive(Debug, Clone)]
pub struct TasksCancel<'a> {
    client: &'a Client,
    common: CommonParams,
    task_id: Option<String>,
    actions: Vec<String>,
    nodes: Vec<String>,
    parent_task_id: Option<String>,
}

impl<'a> TasksCancel<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self {
            client,
            common: CommonParams::default(),
            task_id: None,
            actions: Vec::new(),
            nodes: Vec::new(),
            parent_task_id: None,
        }
    }

    common_setters!();

    pub fn task_id(mut self, task_id: &str) -> Self {
        self.task_id = Some(task_id.to_string());
        self
    }

    pub fn actions<I, S>(mut self, actions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.actions.extend(strings(actions));
        self
    }

    pub fn nodes<I, S>(mut self, nodes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.nodes.extend(strings(nodes));
        self
    }

    pub fn parent_task_id(mut self, id: &str) -> Self {
        self.parent_task_id = Some(id.to_string());
        self
    }

    pub fn send(self) -> Result<TasksListResponse, ApiError> {
        self.client.send(&self)
    }
}

impl Endpoint for TasksCancel<'_> {
    type Response = TasksListResponse;

    fn build_request(&self) -> Result<HttpRequest, ApiError> {
        let path = match &self.task_id {
            Some(id) => expand("/_tasks/{task_id}/_cancel", &[("task_id", segment(id))])?,
            None => "/_tasks/_cancel".to_string(),
        };
        let mut req = HttpRequest::new(HttpMethod::Post, path);
        self.common.apply(&mut req);
        let p = &mut req.params;
        p.list("actions", &self.actions);
        p.list("nodes", &self.nodes);
        p.opt("parent_task_id", &self.parent_task_id);
        Ok(req)
    }

    fn parse_response(&self, response: HttpResponse) -> Result<TasksListResponse, ApiError> {
        decode_success(&response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{offline_client, ScriptedTransport};

    #[test]
    fn list_joins_multi_valued_params() {
        let client = offline_client();
        let req = client
            .tasks_list()
            .actions(["*reindex", "*search"])
            .nodes(["n1", "n2"])
            .detailed(true)
            .group_by("parents")
            .build_request()
            .unwrap();
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.path, "/_tasks");
        assert_eq!(req.params.get("actions"), Some("*reindex,*search"));
        assert_eq!(req.params.get("nodes"), Some("n1,n2"));
        assert_eq!(req.params.get("detailed"), Some("true"));
        assert_eq!(req.params.get("group_by"), Some("parents"));
        assert!(!req.params.contains("timeout"));
    }

    #[test]
    fn list_decodes_tasks_by_node() {
        let transport = ScriptedTransport::new();
        transport.respond(
            200,
            r#"{"nodes":{"n1":{"name":"node-1","roles":["data"],"tasks":{"n1:42":{"node":"n1","id":42,"type":"transport","action":"indices:data/write/reindex","start_time_in_millis":1,"running_time_in_nanos":2,"cancellable":true}}}}}"#,
        );
        let client = transport.client();
        let res = client.tasks_list().send().unwrap();
        let node = &res.nodes["n1"];
        assert_eq!(node.name, "node-1");
        let all = res.all_tasks();
        let task = &all["n1:42"];
        assert_eq!(task.id, 42);
        assert_eq!(task.kind, "transport");
        assert!(task.cancellable);
    }

    #[test]
    fn get_task_encodes_id_and_decodes_completion() {
        let transport = ScriptedTransport::new();
        transport.respond(
            200,
            r#"{"completed":true,"task":{"node":"n1","id":42,"action":"indices:data/write/reindex"},"response":{"created":10}}"#,
        );
        let client = transport.client();
        let res = client.tasks_get_task("n1:42").wait_for_completion(true).send().unwrap();
        assert!(res.completed);
        assert_eq!(res.task.id, 42);
        assert_eq!(res.response.unwrap()["created"], 10);
        let req = &transport.requests()[0];
        assert_eq!(req.path, "/_tasks/n1%3A42");
        assert_eq!(req.params.get("wait_for_completion"), Some("true"));
    }

    #[test]
    fn get_task_requires_id() {
        let client = offline_client();
        let err = TasksGetTask::new(&client).build_request().unwrap_err();
        assert_eq!(err.to_string(), "missing required fields: [TaskId]");
    }

    #[test]
    fn cancel_paths() {
        let client = offline_client();
        let req = client.tasks_cancel().task_id("n1:42").build_request().unwrap();
        assert_eq!(req.method, HttpMethod::Post);
        assert_eq!(req.path, "/_tasks/n1%3A42/_cancel");
        let req = client.tasks_cancel().actions(["*reindex"]).build_request().unwrap();
        assert_eq!(req.path, "/_tasks/_cancel");
        assert_eq!(req.params.get("actions"), Some("*reindex"));
    }
}
