//! Edge legality between node types.
//!
//! A source may feed a target iff the source's output labels intersect the
//! target's input labels: plain set membership over opaque strings, no
//! subtyping, no wildcards. The relation is neither symmetric nor
//! reflexive. Every query here derives from the one intersection
//! primitive, so the pairwise check and the partner enumerations cannot
//! drift apart.

use std::sync::Arc;

use crate::definition::NodeTypeDefinition;
use crate::factory::GraphNodeInstance;
use crate::registry::NodeTypeRegistry;

/// The single shared primitive: does any produced label appear among the
/// accepted ones?
fn ports_intersect(outputs: &[String], inputs: &[String]) -> bool {
    outputs.iter().any(|label| inputs.contains(label))
}

pub struct CompatibilityValidator {
    registry: Arc<NodeTypeRegistry>,
}

impl CompatibilityValidator {
    pub fn new(registry: Arc<NodeTypeRegistry>) -> Self {
        Self { registry }
    }

    /// Whether an edge from `source_tag` to `target_tag` is legal. Fails
    /// closed: an unresolvable tag on either side means incompatible.
    pub fn is_compatible(&self, source_tag: &str, target_tag: &str) -> bool {
        match (
            self.registry.get_by_type_tag(source_tag),
            self.registry.get_by_type_tag(target_tag),
        ) {
            (Some(source), Some(target)) => {
                ports_intersect(&source.output_types, &target.input_types)
            }
            _ => false,
        }
    }

    /// Instance-level form of [`is_compatible`](Self::is_compatible). Type
    /// tags are immutable post-creation, so legality is decided from the
    /// tags alone; it is not re-checked later.
    pub fn instances_compatible(
        &self,
        source: &GraphNodeInstance,
        target: &GraphNodeInstance,
    ) -> bool {
        self.is_compatible(&source.type_tag, &target.type_tag)
    }

    /// All definitions a node of `source_tag` may feed into.
    pub fn compatible_targets(&self, source_tag: &str) -> Vec<Arc<NodeTypeDefinition>> {
        let Some(source) = self.registry.get_by_type_tag(source_tag) else {
            return Vec::new();
        };
        self.registry
            .all_definitions()
            .filter(|target| ports_intersect(&source.output_types, &target.input_types))
            .collect()
    }

    /// All definitions that may feed into a node of `target_tag`.
    pub fn compatible_sources(&self, target_tag: &str) -> Vec<Arc<NodeTypeDefinition>> {
        let Some(target) = self.registry.get_by_type_tag(target_tag) else {
            return Vec::new();
        };
        self.registry
            .all_definitions()
            .filter(|source| ports_intersect(&source.output_types, &target.input_types))
            .collect()
    }
}
