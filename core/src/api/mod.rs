//! Endpoint builders, one module per API family.
//!
//! Every builder borrows a `Client`, accumulates parameters through chained
//! setters and implements `Endpoint`. `send()` executes it through the
//! client's transport.

use serde::{Deserialize, Serialize};

pub mod bulk;
pub mod bulk_processor;
pub mod cat;
pub mod cluster;
pub mod document;
pub mod ilm;
pub mod indices;
pub mod reindex;
pub mod scroll;
pub mod search;
pub mod security;
pub mod snapshot;
pub mod tasks;
pub mod watcher;

/// Shard counts reported by write and search operations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShardsInfo {
    pub total: i64,
    pub successful: i64,
    pub failed: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skipped: Option<i64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<ShardFailure>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShardFailure {
    #[serde(rename = "_index", skip_serializing_if = "Option::is_none")]
    pub index: Option<String>,
    #[serde(rename = "_shard", skip_serializing_if = "Option::is_none")]
    pub shard: Option<i64>,
    #[serde(rename = "_node", skip_serializing_if = "Option::is_none")]
    pub node: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "serde_json::Value::is_null")]
    pub reason: serde_json::Value,
}

/// Body of endpoints that only acknowledge the change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AcknowledgedResponse {
    pub acknowledged: bool,
}
