//! Security roles.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::{decode_delete, decode_success, Client, Endpoint};
use crate::error::{ApiError, DeleteOutcome};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::params::{expand, segment, CommonParams, Missing};

impl Client {
    pub fn security_put_role(&self, name: &str) -> SecurityPutRole<'_> {
        SecurityPutRole::new(self).name(name)
    }

    pub fn security_get_role(&self) -> SecurityGetRole<'_> {
        SecurityGetRole::new(self)
    }

    pub fn security_delete_role(&self, name: &str) -> SecurityDeleteRole<'_> {
        SecurityDeleteRole::new(self).name(name)
    }
}

/// `PUT /_security/role/{name}`
#[derive(Debug, Clone)]
pub struct SecurityPutRole<'a> {
    client: &'a Client,
    common: CommonParams,
    name: String,
    body: Option<Value>,
    refresh: Option<String>,
}

impl<'a> SecurityPutRole<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self {
            client,
            common: CommonParams::default(),
            name: String::new(),
            body: None,
            refresh: None,
        }
    }

    common_setters!();

    pub fn name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    /// Role definition: `cluster`, `indices`, `applications` and so on.
    pub fn body_json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn refresh(mut self, refresh: &str) -> Self {
        self.refresh = Some(refresh.to_string());
        self
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        Missing::new()
            .check("Name", !self.name.is_empty())
            .check("Body", self.body.is_some())
            .finish()
    }

    pub fn send(self) -> Result<SecurityPutRoleResponse, ApiError> {
        self.client.send(&self)
    }
}

impl Endpoint for SecurityPutRole<'_> {
    type Response = SecurityPutRoleResponse;

    fn build_request(&self) -> Result<HttpRequest, ApiError> {
        self.validate()?;
        let path = expand("/_security/role/{name}", &[("name", segment(&self.name))])?;
        let mut req = HttpRequest::new(HttpMethod::Put, path);
        self.common.apply(&mut req);
        req.params.opt("refresh", &self.refresh);
        if let Some(body) = &self.body {
            req.json_body(body)?;
        }
        Ok(req)
    }

    fn parse_response(&self, response: HttpResponse) -> Result<SecurityPutRoleResponse, ApiError> {
        decode_success(&response)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityPutRoleResponse {
    pub role: RoleStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoleStatus {
    pub created: bool,
}

/// `GET /_security/role[/{name}]`
#[derive(Debug, Clone)]
pub struct SecurityGetRole<'a> {
    client: &'a Client,
    common: CommonParams,
    name: Option<String>,
}

impl<'a> SecurityGetRole<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self {
            client,
            common: CommonParams::default(),
            name: None,
        }
    }

    common_setters!();

    pub fn name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn send(self) -> Result<SecurityGetRoleResponse, ApiError> {
        self.client.send(&self)
    }
}

impl Endpoint for SecurityGetRole<'_> {
    type Response = SecurityGetRoleResponse;

    fn build_request(&self) -> Result<HttpRequest, ApiError> {
        let path = match &self.name {
            Some(name) => expand("/_security/role/{name}", &[("name", segment(name))])?,
            None => "/_security/role".to_string(),
        };
        let mut req = HttpRequest::new(HttpMethod::Get, path);
        self.common.apply(&mut req);
        Ok(req)
    }

    fn parse_response(&self, response: HttpResponse) -> Result<SecurityGetRoleResponse, ApiError> {
        decode_success(&response)
    }
}

/// Roles keyed by name.
pub type SecurityGetRoleResponse = BTreeMap<String, Role>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Role {
    pub cluster: Vec<String>,
    pub indices: Vec<IndicesPrivileges>,
    pub applications: Vec<ApplicationPrivileges>,
    pub run_as: Vec<String>,
    pub metadata: BTreeMap<String, Value>,
    pub transient_metadata: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicesPrivileges {
    pub names: Vec<String>,
    pub privileges: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_security: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<Value>,
    pub allow_restricted_indices: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationPrivileges {
    pub application: String,
    pub privileges: Vec<String>,
    pub resources: Vec<String>,
}

/// `DELETE /_security/role/{name}`
#[derive(Debug, Clone)]
pub struct SecurityDeleteRole<'a> {
    client: &'a Client,
    common: CommonParams,
    name: String,
    refresh: Option<String>,
}

impl<'a> SecurityDeleteRole<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self {
            client,
            common: CommonParams::default(),
            name: String::new(),
            refresh: None,
        }
    }

    common_setters!();

    pub fn name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn refresh(mut self, refresh: &str) -> Self {
        self.refresh = Some(refresh.to_string());
        self
    }

    pub fn validate(&self) -> Result<(), ApiError> {
        Missing::new().check("Name", !self.name.is_empty()).finish()
    }

    pub fn send(self) -> Result<DeleteOutcome<SecurityDeleteRoleResponse>, ApiError> {
        self.client.send(&self)
    }
}

impl Endpoint for SecurityDeleteRole<'_> {
    type Response = DeleteOutcome<SecurityDeleteRoleResponse>;

    fn build_request(&self) -> Result<HttpRequest, ApiError> {
        self.validate()?;
        let path = expand("/_security/role/{name}", &[("name", segment(&self.name))])?;
        let mut req = HttpRequest::new(HttpMethod::Delete, path);
        self.common.apply(&mut req);
        req.params.opt("refresh", &self.refresh);
        Ok(req)
    }

    fn parse_response(
        &self,
        response: HttpResponse,
    ) -> Result<DeleteOutcome<SecurityDeleteRoleResponse>, ApiError> {
        decode_delete(&response)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityDeleteRoleResponse {
    pub found: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{offline_client, ScriptedTransport};
    use serde_json::json;

    #[test]
    fn put_role_sends_definition() {
        let transport = ScriptedTransport::new();
        transport.respond(200, r#"{"role":{"created":true}}"#);
        let client = transport.client();
        let res = client
            .security_put_role("my-role")
            .body_json(json!({"cluster": ["all"], "indices": [{"names": ["index1"], "privileges": ["read"]}]}))
            .refresh("true")
            .send()
            .unwrap();
        assert!(res.role.created);
        let req = &transport.requests()[0];
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.path, "/_security/role/my-role");
        assert_eq!(req.params.get("refresh"), Some("true"));
    }

    #[test]
    fn put_role_requires_name_and_body() {
        let client = offline_client();
        let err = SecurityPutRole::new(&client).build_request().unwrap_err();
        assert_eq!(err.to_string(), "missing required fields: [Name, Body]");
    }

    #[test]
    fn get_roles_decodes_map() {
        let transport = ScriptedTransport::new();
        transport.respond(
            200,
            r#"{"my-role":{"cluster":["monitor"],"indices":[{"names":["logs-*"],"privileges":["read"],"allow_restricted_indices":false}],"applications":[],"run_as":[],"metadata":{"version":1},"transient_metadata":{"enabled":true}}}"#,
        );
        let client = transport.client();
        let roles = client.security_get_role().name("my-role").send().unwrap();
        let role = &roles["my-role"];
        assert_eq!(role.cluster, vec!["monitor"]);
        assert_eq!(role.indices[0].names, vec!["logs-*"]);
        assert_eq!(role.metadata["version"], json!(1));
        assert_eq!(transport.requests()[0].path, "/_security/role/my-role");
        assert_eq!(
            offline_client().security_get_role().build_request().unwrap().path,
            "/_security/role"
        );
    }

    #[test]
    fn delete_missing_role_reports_found_false() {
        let transport = ScriptedTransport::new();
        transport.respond(404, r#"{"found":false}"#);
        let client = transport.client();
        let outcome = client.security_delete_role("ghost").send().unwrap();
        assert!(outcome.is_not_found());
        assert!(!outcome.response().found);
    }
}
