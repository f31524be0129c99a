//! Index lifecycle management policies.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::AcknowledgedResponse;
use crate::client::{decode_delete, decode_success, Client, Endpoint};
use crate::error::{ApiError, DeleteOutcome};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::params::{expand, segment, segments, strings, CommonParams, Missing};

impl Client {
    pub fn ilm_put_lifecycle(&self, policy: &str) -> IlmPutLifecycle<'_> {
        IlmPutLifecycle::new(self).policy(policy)
    }

    pub fn ilm_get_lifecycle(&self) -> IlmGetLifecycle<'_> {
        IlmGetLifecycle::new(self)
    }

    pub fn ilm_delete_lifecycle(&self, policy: &str) -> IlmDeleteLifecycle<'_> {
        IlmDeleteLifecycle::new(self).policy(policy)
    }
}

/// `PUT /_ilm/policy/{policy}`
#[derive(Debug, Clone)]
pub struct IlmPutLifecycle<'a> {
    client: &'a Client,
    common: CommonParams,
    policy: String,
    body: Option<Value>,
    timeout: Option<String>,
    master_timeout: Option<String>,
}

impl<'a> IlmPutLifecycle<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self {
            client,
            common: CommonParams::default(),
            policy: String::new(),
            body: None,
            timeout: None,
            master_timeout: None,
        }
    }

    common_setters!();

    pub fn policy(mut self, policy: &str) -> Self {
        self.policy = policy.to_string();
        self
    }

    /// Full policy document, `{"policy": {"phases": {...}}}`.
    pub fn body_json(mut self, body: Value) -> Self {
        self.body = Some(body);
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

    pub fn validate(&self) -> Result<(), ApiError> {
        Missing::new()
            .check("Policy", !self.policy.is_empty())
            .check("BodyJson", self.body.is_some())
            .finish()
    }

    pub fn send(self) -> Result<AcknowledgedResponse, ApiError> {
        self.client.send(&self)
    }
}

impl Endpoint for IlmPutLifecycle<'_> {
    type Response = AcknowledgedResponse;

    fn build_request(&self) -> Result<HttpRequest, ApiError> {
        self.validate()?;
        let path = expand("/_ilm/policy/{policy}", &[("policy", segment(&self.policy))])?;
        let mut req = HttpRequest::new(HttpMethod::Put, path);
        self.common.apply(&mut req);
        let p = &mut req.params;
        p.opt("timeout", &self.timeout);
        p.opt("master_timeout", &self.master_timeout);
        if let Some(body) = &self.body {
            req.json_body(body)?;
        }
        Ok(req)
    }

    fn parse_response(&self, response: HttpResponse) -> Result<AcknowledgedResponse, ApiError> {
        decode_success(&response)
    }
}

/// `GET /_ilm/policy[/{policy,...}]`
#[derive(Debug, Clone)]
pub struct IlmGetLifecycle<'a> {
    client: &'a Client,
    common: CommonParams,
    policies: Vec<String>,
    timeout: Option<String>,
    master_timeout: Option<String>,
}

impl<'a> IlmGetLifecycle<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self {
            client,
            common: CommonParams::default(),
            policies: Vec::new(),
            timeout: None,
            master_timeout: None,
        }
    }

    common_setters!();

    pub fn policy<I, S>(mut self, policies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.policies.extend(strings(policies));
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

    pub fn send(self) -> Result<IlmGetLifecycleResponse, ApiError> {
        self.client.send(&self)
    }
}

impl Endpoint for IlmGetLifecycle<'_> {
    type Response = IlmGetLifecycleResponse;

    fn build_request(&self) -> Result<HttpRequest, ApiError> {
        let path = if self.policies.is_empty() {
            "/_ilm/policy".to_string()
        } else {
            expand("/_ilm/policy/{policy}", &[("policy", segments(&self.policies))])?
        };
        let mut req = HttpRequest::new(HttpMethod::Get, path);
        self.common.apply(&mut req);
        let p = &mut req.params;
        p.opt("timeout", &self.timeout);
        p.opt("master_timeout", &self.master_timeout);
        Ok(req)
    }

    fn parse_response(&self, response: HttpResponse) -> Result<IlmGetLifecycleResponse, ApiError> {
        decode_success(&response)
    }
}

/// Policies keyed by name.
pub type IlmGetLifecycleResponse = BTreeMap<String, IlmPolicyEntry>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IlmPolicyEntry {
    pub version: i64,
    pub modified_date: String,
    pub policy: Value,
}

/// `DELETE /_ilm/policy/{policy}`
#[derive(Debug, Clone)]
pub struct IlmDeleteLifecycle<'a> {
    client: &'a Client,
    common: CommonParams,
    policy: String,
    timeout: Option<String>,
    master_timeout: Option<String>,
}

impl<'a> IlmDeleteLifecycle<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self {
            client,
            common: CommonParams::default(),
            policy: String::new(),
            timeout: None,
            master_timeout: None,
        }
    }

    common_setters!();

    pub fn policy(mut self, policy: &str) -> Self {
        self.policy = policy.to_string();
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

    pub fn validate(&self) -> Result<(), ApiError> {
        Missing::new().check("Policy", !self.policy.is_empty()).finish()
    }

    pub fn send(self) -> Result<DeleteOutcome<AcknowledgedResponse>, ApiError> {
        self.client.send(&self)
    }
}

impl Endpoint for IlmDeleteLifecycle<'_> {
    type Response = DeleteOutcome<AcknowledgedResponse>;

    fn build_request(&self) -> Result<HttpRequest, ApiError> {
        self.validate()?;
        let path = expand("/_ilm/policy/{policy}", &[("policy", segment(&self.policy))])?;
        let mut req = HttpRequest::new(HttpMethod::Delete, path);
        self.common.apply(&mut req);
        let p = &mut req.params;
        p.opt("timeout", &self.timeout);
        p.opt("master_timeout", &self.master_timeout);
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
    fn put_requires_policy_and_body() {
        let client = offline_client();
        let err = IlmPutLifecycle::new(&client).build_request().unwrap_err();
        assert_eq!(err.to_string(), "missing required fields: [Policy, BodyJson]");

        let body = json!({"policy": {"phases": {"delete": {"min_age": "30d", "actions": {"delete": {}}}}}});
        let req = client
            .ilm_put_lifecycle("cleanup")
            .body_json(body.clone())
            .build_request()
            .unwrap();
        assert_eq!(req.method, HttpMethod::Put);
        assert_eq!(req.path, "/_ilm/policy/cleanup");
        let sent: Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(sent, body);
    }

    #[test]
    fn get_path_with_and_without_names() {
        let client = offline_client();
        assert_eq!(client.ilm_get_lifecycle().build_request().unwrap().path, "/_ilm/policy");
        let req = client.ilm_get_lifecycle().policy(["a", "b"]).build_request().unwrap();
        assert_eq!(req.path, "/_ilm/policy/a,b");
    }

    #[test]
    fn get_decodes_policy_map() {
        let transport = ScriptedTransport::new();
        transport.respond(
            200,
            r#"{"cleanup":{"version":3,"modified_date":"2020-01-01T00:00:00.000Z","policy":{"phases":{}}}}"#,
        );
        let client = transport.client();
        let res = client.ilm_get_lifecycle().policy(["cleanup"]).send().unwrap();
        let entry = &res["cleanup"];
        assert_eq!(entry.version, 3);
        assert_eq!(entry.modified_date, "2020-01-01T00:00:00.000Z");
        assert_eq!(entry.policy, json!({"phases": {}}));
    }

    #[test]
    fn delete_acknowledged() {
        let transport = ScriptedTransport::new();
        transport.respond(200, r#"{"acknowledged":true}"#);
        let client = transport.client();
        let outcome = client.ilm_delete_lifecycle("cleanup").send().unwrap();
        assert!(!outcome.is_not_found());
        assert!(outcome.response().acknowledged);
        assert_eq!(transport.requests()[0].method, HttpMethod::Delete);
    }
}
