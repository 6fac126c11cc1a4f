//! Declarative structural validation for catalog documents.
//!
//! The rules live in a field table consumed by a generic walker, so a new
//! required field is a data change, not a code change. Validation is
//! all-or-nothing: every issue in the document is collected and reported as
//! one aggregated [`FlowboardError::Validation`]; a document that fails any
//! rule is rejected whole and the caller's previous state is left alone.

use std::collections::HashMap;

use serde_json::Value;

use flowboard_types::{FlowboardError, Result};

use crate::document::CatalogDocument;

// ---------------------------------------------------------------------------
// Schema description
// ---------------------------------------------------------------------------

/// What shape a field must have on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// A string with at least one character.
    NonEmptyString,
    /// An array whose elements are all strings. May be empty.
    StringArray,
    /// An object whose values are each bool, number, string, or an array
    /// of strings.
    ConfigMap,
    /// Any JSON object; its members are checked by the typed deserializer.
    Object,
    /// Any JSON number.
    Number,
}

/// One rule in the node-doc schema table.
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

/// The schema for a single element of the `nodes` array.
pub const NODE_FIELDS: &[FieldRule] = &[
    FieldRule { name: "id", kind: FieldKind::NonEmptyString, required: true },
    FieldRule { name: "name", kind: FieldKind::NonEmptyString, required: true },
    FieldRule { name: "description", kind: FieldKind::NonEmptyString, required: true },
    FieldRule { name: "category", kind: FieldKind::NonEmptyString, required: true },
    FieldRule { name: "categoryLabel", kind: FieldKind::NonEmptyString, required: false },
    FieldRule { name: "nodeType", kind: FieldKind::NonEmptyString, required: true },
    FieldRule { name: "icon", kind: FieldKind::NonEmptyString, required: false },
    FieldRule { name: "inputTypes", kind: FieldKind::StringArray, required: true },
    FieldRule { name: "outputTypes", kind: FieldKind::StringArray, required: true },
    FieldRule { name: "config", kind: FieldKind::ConfigMap, required: false },
    FieldRule { name: "retryPolicy", kind: FieldKind::Object, required: false },
    FieldRule { name: "timeout", kind: FieldKind::Number, required: false },
];

// ---------------------------------------------------------------------------
// Walker
// ---------------------------------------------------------------------------

fn is_config_scalar(value: &Value) -> bool {
    match value {
        Value::Bool(_) | Value::Number(_) | Value::String(_) => true,
        Value::Array(items) => items.iter().all(Value::is_string),
        _ => false,
    }
}

/// Check one field of a node object against its rule. Returns an issue
/// message on violation, `None` when the field conforms.
fn check_field(node: &serde_json::Map<String, Value>, rule: &FieldRule) -> Option<String> {
    let value = match node.get(rule.name) {
        Some(v) => v,
        None if rule.required => return Some(format!("missing required field '{}'", rule.name)),
        None => return None,
    };

    match rule.kind {
        FieldKind::NonEmptyString => match value.as_str() {
            Some(s) if !s.is_empty() => None,
            _ => Some(format!("'{}' must be a non-empty string", rule.name)),
        },
        FieldKind::StringArray => match value.as_array() {
            Some(items) if items.iter().all(Value::is_string) => None,
            _ => Some(format!("'{}' must be an array of strings", rule.name)),
        },
        FieldKind::ConfigMap => match value.as_object() {
            Some(map) => {
                let bad: Vec<&str> = map
                    .iter()
                    .filter(|(_, v)| !is_config_scalar(v))
                    .map(|(k, _)| k.as_str())
                    .collect();
                if bad.is_empty() {
                    None
                } else {
                    Some(format!(
                        "'{}' values must be bool, number, string, or an array of strings (offending keys: {})",
                        rule.name,
                        bad.join(", ")
                    ))
                }
            }
            None => Some(format!("'{}' must be an object", rule.name)),
        },
        FieldKind::Object => {
            if value.is_object() {
                None
            } else {
                Some(format!("'{}' must be an object", rule.name))
            }
        }
        FieldKind::Number => {
            if value.is_number() {
                None
            } else {
                Some(format!("'{}' must be a number", rule.name))
            }
        }
    }
}

/// Validate a raw JSON value against the catalog schema and produce the
/// typed document.
///
/// Duplicate `id` values are an error; duplicate `nodeType` values are
/// allowed (the registry resolves them last-write-wins).
pub fn validate_document(raw: &Value) -> Result<CatalogDocument> {
    let mut issues: Vec<String> = Vec::new();

    let root = match raw.as_object() {
        Some(obj) => obj,
        None => {
            return Err(FlowboardError::Validation(
                "document must be a JSON object".into(),
            ))
        }
    };

    match root.get("version") {
        Some(Value::String(s)) if !s.is_empty() => {}
        Some(_) | None => issues.push("'version' must be a non-empty string".into()),
    }

    match root.get("nodes") {
        Some(Value::Array(nodes)) => {
            let mut first_seen: HashMap<&str, usize> = HashMap::new();
            for (index, node) in nodes.iter().enumerate() {
                let obj = match node.as_object() {
                    Some(obj) => obj,
                    None => {
                        issues.push(format!("nodes[{index}]: must be an object"));
                        continue;
                    }
                };
                for rule in NODE_FIELDS {
                    if let Some(message) = check_field(obj, rule) {
                        issues.push(format!("nodes[{index}]: {message}"));
                    }
                }
                if let Some(id) = obj.get("id").and_then(Value::as_str) {
                    if let Some(first) = first_seen.get(id) {
                        issues.push(format!(
                            "nodes[{index}]: duplicate id '{id}' (first defined at nodes[{first}])"
                        ));
                    } else {
                        first_seen.insert(id, index);
                    }
                }
            }
        }
        Some(_) | None => issues.push("'nodes' must be an array".into()),
    }

    if !issues.is_empty() {
        return Err(FlowboardError::Validation(issues.join("; ")));
    }

    // Structure is sound; the typed deserializer catches anything the field
    // table cannot express (member types inside retryPolicy, unknown keys).
    serde_json::from_value(raw.clone())
        .map_err(|err| FlowboardError::Validation(err.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn minimal_node(id: &str, node_type: &str) -> Value {
        json!({
            "id": id,
            "name": "Some Node",
            "description": "Does a thing",
            "category": "transform",
            "nodeType": node_type,
            "inputTypes": ["dataset"],
            "outputTypes": ["dataset"]
        })
    }

    #[test]
    fn accepts_minimal_valid_document() {
        let raw = json!({ "version": "1.0.0", "nodes": [minimal_node("a", "aNode")] });
        let doc = validate_document(&raw).unwrap();
        assert_eq!(doc.version, "1.0.0");
        assert_eq!(doc.nodes.len(), 1);
        assert_eq!(doc.nodes[0].node_type, "aNode");
    }

    #[test]
    fn rejects_non_object_document() {
        let err = validate_document(&json!(["not", "an", "object"])).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn rejects_missing_version() {
        let err = validate_document(&json!({ "nodes": [] })).unwrap_err();
        assert!(err.to_string().contains("'version'"));
    }

    #[test]
    fn rejects_non_array_nodes() {
        let err =
            validate_document(&json!({ "version": "1", "nodes": {"a": 1} })).unwrap_err();
        assert!(err.to_string().contains("'nodes'"));
    }

    #[test]
    fn rejects_missing_required_node_field() {
        let mut node = minimal_node("a", "aNode");
        node.as_object_mut().unwrap().remove("description");
        let err = validate_document(&json!({ "version": "1", "nodes": [node] })).unwrap_err();
        assert!(err.to_string().contains("missing required field 'description'"));
    }

    #[test]
    fn rejects_empty_string_field() {
        let mut node = minimal_node("a", "aNode");
        node["name"] = json!("");
        let err = validate_document(&json!({ "version": "1", "nodes": [node] })).unwrap_err();
        assert!(err.to_string().contains("'name' must be a non-empty string"));
    }

    #[test]
    fn empty_port_arrays_are_allowed() {
        let mut node = minimal_node("a", "aNode");
        node["inputTypes"] = json!([]);
        let doc =
            validate_document(&json!({ "version": "1", "nodes": [node] })).unwrap();
        assert!(doc.nodes[0].input_types.is_empty());
    }

    #[test]
    fn rejects_non_string_port_array() {
        let mut node = minimal_node("a", "aNode");
        node["outputTypes"] = json!(["dataset", 42]);
        let err = validate_document(&json!({ "version": "1", "nodes": [node] })).unwrap_err();
        assert!(err.to_string().contains("'outputTypes' must be an array of strings"));
    }

    #[test]
    fn rejects_duplicate_ids_with_positions() {
        let raw = json!({
            "version": "1",
            "nodes": [minimal_node("dup", "aNode"), minimal_node("dup", "bNode")]
        });
        let err = validate_document(&raw).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("duplicate id 'dup'"));
        assert!(message.contains("nodes[0]"));
    }

    #[test]
    fn duplicate_type_tags_are_permitted() {
        let raw = json!({
            "version": "1",
            "nodes": [minimal_node("a", "sharedNode"), minimal_node("b", "sharedNode")]
        });
        assert!(validate_document(&raw).is_ok());
    }

    #[test]
    fn rejects_nested_object_config_value() {
        let mut node = minimal_node("a", "aNode");
        node["config"] = json!({ "nested": { "too": "deep" } });
        let err = validate_document(&json!({ "version": "1", "nodes": [node] })).unwrap_err();
        assert!(err.to_string().contains("offending keys: nested"));
    }

    #[test]
    fn aggregates_all_issues_in_one_error() {
        let mut bad = minimal_node("", "aNode");
        bad["inputTypes"] = json!("not-an-array");
        let err = validate_document(&json!({ "version": "1", "nodes": [bad, 17] })).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("'id' must be a non-empty string"));
        assert!(message.contains("'inputTypes' must be an array of strings"));
        assert!(message.contains("nodes[1]: must be an object"));
    }

    #[test]
    fn retry_policy_members_checked_by_typed_pass() {
        let mut node = minimal_node("a", "aNode");
        node["retryPolicy"] = json!({ "max_retries": "three" });
        let err = validate_document(&json!({ "version": "1", "nodes": [node] })).unwrap_err();
        assert!(err.is_validation());
    }
}
