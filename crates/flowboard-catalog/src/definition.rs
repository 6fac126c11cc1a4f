//! In-memory node-type definition, converted from the wire doc.
//!
//! Definitions are immutable once loaded; the registry hands them out
//! behind `Arc`. Conversion to and from [`NodeTypeDoc`] is lossless so the
//! loaded catalog exports back to a content-equivalent document.

use std::collections::BTreeMap;

use serde::Serialize;

use flowboard_config::{ConfigValue, NodeTypeDoc, RetryPolicyDoc};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeTypeDefinition {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_label: Option<String>,
    /// Discriminator selecting the rendering/behavior family. Not
    /// necessarily unique: on collision the registry keeps the most
    /// recently loaded definition reachable by tag.
    pub type_tag: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub input_types: Vec<String>,
    pub output_types: Vec<String>,
    pub config: BTreeMap<String, ConfigValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_overrides: Option<RetryPolicyDoc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<serde_json::Number>,
}

impl NodeTypeDefinition {
    pub fn from_doc(doc: NodeTypeDoc) -> Self {
        Self {
            id: doc.id,
            name: doc.name,
            description: doc.description,
            category: doc.category,
            category_label: doc.category_label,
            type_tag: doc.node_type,
            icon: doc.icon,
            input_types: doc.input_types,
            output_types: doc.output_types,
            config: doc.config,
            retry_overrides: doc.retry_policy,
            timeout: doc.timeout,
        }
    }

    pub fn to_doc(&self) -> NodeTypeDoc {
        NodeTypeDoc {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
            category: self.category.clone(),
            category_label: self.category_label.clone(),
            node_type: self.type_tag.clone(),
            icon: self.icon.clone(),
            input_types: self.input_types.clone(),
            output_types: self.output_types.clone(),
            config: self.config.clone(),
            retry_policy: self.retry_overrides.clone(),
            timeout: self.timeout.clone(),
        }
    }

    /// Declared execution timeout in seconds, when present.
    pub fn timeout_seconds(&self) -> Option<f64> {
        self.timeout.as_ref().and_then(serde_json::Number::as_f64)
    }
}
