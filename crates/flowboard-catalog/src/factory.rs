//! Creates concrete graph-node instances from registry entries.
//!
//! An unknown type tag yields `None`, never an error: dropping an
//! unrecognized block is an expected, transient editor state.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use flowboard_config::ConfigValue;

use crate::definition::NodeTypeDefinition;
use crate::registry::NodeTypeRegistry;
use crate::retry::RetryPolicy;

/// Execution timeout applied when a node type declares none.
pub const DEFAULT_TIMEOUT_SECS: f64 = 30.0;

/// Canvas placement of a node instance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// A node placed on the canvas. Owned and mutated by the surrounding
/// editor; this core only creates it.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNodeInstance {
    /// Generated per instance; distinct from the definition's `id`.
    pub instance_id: String,
    pub type_tag: String,
    pub position: Position,
    pub data: InstanceData,
}

/// Payload seeded from the type definition at creation time.
///
/// `config` is a deep copy of the definition's defaults; per-instance
/// edits must never reach the shared definition.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceData {
    pub name: String,
    pub description: String,
    pub input_types: Vec<String>,
    pub output_types: Vec<String>,
    pub config: BTreeMap<String, ConfigValue>,
    /// The full definition, for downstream rendering.
    pub definition: NodeTypeDefinition,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom: Option<serde_json::Value>,
}

/// Runtime-facing record handed to an external execution engine. This is
/// the catalog core's only execution-facing output; nothing here runs jobs.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeNode {
    pub instance_id: String,
    pub type_tag: String,
    pub config: BTreeMap<String, ConfigValue>,
    pub accepted_inputs: Vec<String>,
    pub produced_outputs: Vec<String>,
    pub retry_policy: RetryPolicy,
    pub timeout_seconds: f64,
}

pub struct NodeFactory {
    registry: Arc<NodeTypeRegistry>,
}

impl NodeFactory {
    pub fn new(registry: Arc<NodeTypeRegistry>) -> Self {
        Self { registry }
    }

    /// Instantiate a node of the given type at `position`. Returns `None`
    /// when the tag is not in the registry.
    pub fn create_instance(
        &self,
        type_tag: &str,
        position: Position,
        custom: Option<serde_json::Value>,
    ) -> Option<GraphNodeInstance> {
        let definition = match self.registry.get_by_type_tag(type_tag) {
            Some(def) => def,
            None => {
                tracing::warn!(type_tag, "no definition for type tag, instance not created");
                return None;
            }
        };

        Some(GraphNodeInstance {
            instance_id: generate_instance_id(type_tag),
            type_tag: type_tag.to_string(),
            position,
            data: InstanceData {
                name: definition.name.clone(),
                description: definition.description.clone(),
                input_types: definition.input_types.clone(),
                output_types: definition.output_types.clone(),
                config: definition.config.clone(),
                definition: (*definition).clone(),
                custom,
            },
        })
    }

    /// Build the execution hand-off record for an instance: resolved retry
    /// policy, declared ports, config defaults, and timeout.
    pub fn create_policy_backed(&self, type_tag: &str, instance_id: &str) -> Option<RuntimeNode> {
        let definition = self.registry.get_by_type_tag(type_tag)?;

        Some(RuntimeNode {
            instance_id: instance_id.to_string(),
            type_tag: type_tag.to_string(),
            config: definition.config.clone(),
            accepted_inputs: definition.input_types.clone(),
            produced_outputs: definition.output_types.clone(),
            retry_policy: RetryPolicy::resolve(definition.retry_overrides.as_ref()),
            timeout_seconds: definition.timeout_seconds().unwrap_or(DEFAULT_TIMEOUT_SECS),
        })
    }
}

/// `<tag>_<utc-millis>_<random>`: time for monotonic observability plus a v4
/// fragment for collision-freedom within a session.
fn generate_instance_id(type_tag: &str) -> String {
    let millis = chrono::Utc::now().timestamp_millis();
    let nonce = Uuid::new_v4().simple().to_string();
    format!("{type_tag}_{millis}_{}", &nonce[..8])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry_with(defs: Vec<serde_json::Value>) -> Arc<NodeTypeRegistry> {
        let registry = Arc::new(NodeTypeRegistry::new());
        let definitions = defs
            .into_iter()
            .map(|raw| NodeTypeDefinition::from_doc(serde_json::from_value(raw).unwrap()))
            .collect();
        registry.replace("1.0.0".into(), definitions);
        registry
    }

    fn filter_node() -> serde_json::Value {
        serde_json::json!({
            "id": "data_filter",
            "name": "Data Filter",
            "description": "Filter dataset rows",
            "category": "transform",
            "nodeType": "filterNode",
            "inputTypes": ["dataset"],
            "outputTypes": ["dataset"],
            "config": { "supportedOperations": ["equals", "contains"] }
        })
    }

    fn api_node() -> serde_json::Value {
        serde_json::json!({
            "id": "api_call",
            "name": "API Call",
            "description": "Make HTTP requests",
            "category": "integration",
            "nodeType": "apiCallNode",
            "inputTypes": ["dataset", "json"],
            "outputTypes": ["json"],
            "retryPolicy": { "max_retries": 5, "backoff_strategy": "linear" },
            "timeout": 45
        })
    }

    #[test]
    fn create_instance_seeds_data_from_definition() {
        let factory = NodeFactory::new(registry_with(vec![filter_node()]));
        let instance = factory
            .create_instance("filterNode", Position { x: 10.0, y: 20.0 }, None)
            .unwrap();

        assert_eq!(instance.type_tag, "filterNode");
        assert_eq!(instance.position, Position { x: 10.0, y: 20.0 });
        assert_eq!(instance.data.name, "Data Filter");
        assert_eq!(instance.data.input_types, vec!["dataset"]);
        assert_eq!(instance.data.definition.id, "data_filter");
        assert!(instance.instance_id.starts_with("filterNode_"));
    }

    #[test]
    fn unknown_type_tag_returns_none() {
        let factory = NodeFactory::new(registry_with(vec![filter_node()]));
        assert!(factory
            .create_instance("ghostNode", Position { x: 0.0, y: 0.0 }, None)
            .is_none());
        assert!(factory.create_policy_backed("ghostNode", "x").is_none());
    }

    #[test]
    fn instance_ids_are_unique() {
        let factory = NodeFactory::new(registry_with(vec![filter_node()]));
        let a = factory
            .create_instance("filterNode", Position { x: 0.0, y: 0.0 }, None)
            .unwrap();
        let b = factory
            .create_instance("filterNode", Position { x: 0.0, y: 0.0 }, None)
            .unwrap();
        assert_ne!(a.instance_id, b.instance_id);
    }

    #[test]
    fn instance_configs_are_isolated_copies() {
        let registry = registry_with(vec![filter_node()]);
        let factory = NodeFactory::new(Arc::clone(&registry));

        let mut a = factory
            .create_instance("filterNode", Position { x: 0.0, y: 0.0 }, None)
            .unwrap();
        let b = factory
            .create_instance("filterNode", Position { x: 0.0, y: 0.0 }, None)
            .unwrap();

        a.data
            .config
            .insert("newField".into(), ConfigValue::Bool(true));

        assert!(!b.data.config.contains_key("newField"));
        assert!(!registry
            .get_by_type_tag("filterNode")
            .unwrap()
            .config
            .contains_key("newField"));
    }

    #[test]
    fn custom_payload_carried_through() {
        let factory = NodeFactory::new(registry_with(vec![filter_node()]));
        let instance = factory
            .create_instance(
                "filterNode",
                Position { x: 0.0, y: 0.0 },
                Some(serde_json::json!({ "collapsed": true })),
            )
            .unwrap();
        assert_eq!(
            instance.data.custom,
            Some(serde_json::json!({ "collapsed": true }))
        );
    }

    #[test]
    fn policy_backed_node_resolves_policy_and_timeout() {
        let factory = NodeFactory::new(registry_with(vec![api_node()]));
        let runtime = factory
            .create_policy_backed("apiCallNode", "apiCallNode_123_abc")
            .unwrap();

        assert_eq!(runtime.instance_id, "apiCallNode_123_abc");
        assert_eq!(runtime.accepted_inputs, vec!["dataset", "json"]);
        assert_eq!(runtime.produced_outputs, vec!["json"]);
        assert_eq!(runtime.retry_policy.max_retries, 5);
        assert_eq!(
            runtime.retry_policy.backoff_strategy,
            crate::retry::BackoffStrategy::Linear
        );
        assert_eq!(runtime.timeout_seconds, 45.0);
    }

    #[test]
    fn policy_backed_node_defaults_timeout() {
        let factory = NodeFactory::new(registry_with(vec![filter_node()]));
        let runtime = factory.create_policy_backed("filterNode", "i1").unwrap();
        assert_eq!(runtime.timeout_seconds, DEFAULT_TIMEOUT_SECS);
        assert_eq!(runtime.retry_policy.max_retries, 3);
    }
}
