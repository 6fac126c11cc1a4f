//! Wire format for catalog documents.
//!
//! A catalog document is the JSON handed to the editor at runtime:
//! a `version` string plus an array of node-type docs. Field names here
//! mirror the wire exactly (`nodeType`, `inputTypes`, `retryPolicy`, ...),
//! and export serializes back to the same shape, so a loaded document
//! round-trips content-equivalently.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Top-level catalog document: `{ "version": ..., "nodes": [...] }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogDocument {
    pub version: String,
    pub nodes: Vec<NodeTypeDoc>,
}

/// One node-type entry as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct NodeTypeDoc {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    /// Optional display label for the node's category; when absent the
    /// capitalized category key is used.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_label: Option<String>,
    /// The type tag: selects the rendering/behavior family. Named
    /// `nodeType` on the wire and need not be unique across the document.
    pub node_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub input_types: Vec<String>,
    pub output_types: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub config: BTreeMap<String, ConfigValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_policy: Option<RetryPolicyDoc>,
    /// Seconds. Kept as a raw JSON number so `30` does not export as `30.0`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<serde_json::Number>,
}

/// A default value in a node type's `config` map.
///
/// The wire permits exactly four shapes: boolean, number, string, or a
/// list of strings used as an enumerated choice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Bool(bool),
    Number(serde_json::Number),
    String(String),
    Choices(Vec<String>),
}

/// Partial retry policy as supplied on the wire. Every field is optional;
/// unset fields fall back to the resolved defaults.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RetryPolicyDoc {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_retries: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backoff_strategy: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_delay: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_delay: Option<u64>,
    /// Raw JSON number so a whole-number multiplier round-trips unchanged.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backoff_multiplier: Option<serde_json::Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_on_errors: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub no_retry_on_errors: Option<Vec<String>>,
}
