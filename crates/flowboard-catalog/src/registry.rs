//! The authoritative in-memory index of loaded node-type definitions.
//!
//! The registry is an explicitly constructed, explicitly passed instance, so
//! tests get isolated registries instead of sharing process-wide state.
//! Writes go through [`NodeTypeRegistry::replace`], which builds the new
//! indices fully off to the side and then swaps the externally visible
//! `Arc`. No reader ever observes a mix of old and new definitions, and
//! the previous catalog stays fully queryable while a load is in flight.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use crate::definition::NodeTypeDefinition;

/// One category of the loaded catalog: display label plus its member
/// definitions in document order.
#[derive(Debug, Clone)]
pub struct CategoryGroup {
    pub key: String,
    pub label: String,
    pub members: Vec<Arc<NodeTypeDefinition>>,
}

#[derive(Debug)]
struct RegistryState {
    version: Option<String>,
    order: Vec<Arc<NodeTypeDefinition>>,
    by_id: HashMap<String, Arc<NodeTypeDefinition>>,
    by_type_tag: HashMap<String, Arc<NodeTypeDefinition>>,
    categories: Vec<CategoryGroup>,
}

impl RegistryState {
    fn empty() -> Self {
        Self {
            version: None,
            order: Vec::new(),
            by_id: HashMap::new(),
            by_type_tag: HashMap::new(),
            categories: Vec::new(),
        }
    }

    fn build(version: String, definitions: Vec<NodeTypeDefinition>) -> Self {
        let order: Vec<Arc<NodeTypeDefinition>> =
            definitions.into_iter().map(Arc::new).collect();

        let mut by_id = HashMap::with_capacity(order.len());
        let mut by_type_tag = HashMap::with_capacity(order.len());
        let mut categories: Vec<CategoryGroup> = Vec::new();
        let mut category_index: HashMap<String, usize> = HashMap::new();

        for def in &order {
            by_id.insert(def.id.clone(), Arc::clone(def));
            // Later definitions sharing a tag win the tag lookup; both stay
            // reachable by id.
            by_type_tag.insert(def.type_tag.clone(), Arc::clone(def));

            let slot = *category_index
                .entry(def.category.clone())
                .or_insert_with(|| {
                    categories.push(CategoryGroup {
                        key: def.category.clone(),
                        label: capitalize(&def.category),
                        members: Vec::new(),
                    });
                    categories.len() - 1
                });
            if let Some(ref label) = def.category_label {
                categories[slot].label = label.clone();
            }
            categories[slot].members.push(Arc::clone(def));
        }

        Self {
            version: Some(version),
            order,
            by_id,
            by_type_tag,
            categories,
        }
    }
}

fn capitalize(raw: &str) -> String {
    let mut chars = raw.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

pub struct NodeTypeRegistry {
    state: RwLock<Arc<RegistryState>>,
}

impl NodeTypeRegistry {
    /// Create an empty registry (nothing loaded).
    pub fn new() -> Self {
        Self {
            state: RwLock::new(Arc::new(RegistryState::empty())),
        }
    }

    fn snapshot(&self) -> Arc<RegistryState> {
        match self.state.read() {
            Ok(guard) => Arc::clone(&guard),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }

    fn swap(&self, next: RegistryState) {
        let next = Arc::new(next);
        match self.state.write() {
            Ok(mut guard) => *guard = next,
            Err(poisoned) => *poisoned.into_inner() = next,
        }
    }

    /// Atomically discard the previous state and install the given
    /// definitions. Callers run validation first; by the time `replace` is
    /// reached the load can no longer fail, so the old state is never left
    /// half-replaced.
    pub fn replace(&self, version: String, definitions: Vec<NodeTypeDefinition>) {
        let next = RegistryState::build(version, definitions);
        tracing::debug!(
            version = next.version.as_deref().unwrap_or(""),
            definitions = next.order.len(),
            categories = next.categories.len(),
            "registry replaced"
        );
        self.swap(next);
    }

    /// Return to the empty initial state.
    pub fn reset(&self) {
        tracing::debug!("registry reset");
        self.swap(RegistryState::empty());
    }

    pub fn get(&self, id: &str) -> Option<Arc<NodeTypeDefinition>> {
        self.snapshot().by_id.get(id).cloned()
    }

    pub fn get_by_type_tag(&self, type_tag: &str) -> Option<Arc<NodeTypeDefinition>> {
        self.snapshot().by_type_tag.get(type_tag).cloned()
    }

    /// Restartable iterator over all definitions in load order. The
    /// iterator holds its own snapshot, so it stays stable across a
    /// concurrent `replace`.
    pub fn all_definitions(&self) -> DefinitionIter {
        DefinitionIter {
            state: self.snapshot(),
            next: 0,
        }
    }

    /// Distinct type tags in first-appearance order.
    pub fn type_tags(&self) -> Vec<String> {
        let state = self.snapshot();
        let mut seen = HashSet::with_capacity(state.order.len());
        let mut tags = Vec::new();
        for def in &state.order {
            if seen.insert(def.type_tag.as_str()) {
                tags.push(def.type_tag.clone());
            }
        }
        tags
    }

    /// Ordered category groups with display labels. A category's label is
    /// its capitalized key unless a member definition supplies an explicit
    /// override (the last override in document order wins, consistent with
    /// the type-tag rule).
    pub fn categories(&self) -> Vec<CategoryGroup> {
        self.snapshot().categories.clone()
    }

    pub fn is_loaded(&self) -> bool {
        self.snapshot().version.is_some()
    }

    pub fn current_version(&self) -> Option<String> {
        self.snapshot().version.clone()
    }

    pub fn count(&self) -> usize {
        self.snapshot().order.len()
    }
}

impl Default for NodeTypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot iterator returned by [`NodeTypeRegistry::all_definitions`].
#[derive(Clone)]
pub struct DefinitionIter {
    state: Arc<RegistryState>,
    next: usize,
}

impl Iterator for DefinitionIter {
    type Item = Arc<NodeTypeDefinition>;

    fn next(&mut self) -> Option<Self::Item> {
        let item = self.state.order.get(self.next)?;
        self.next += 1;
        Some(Arc::clone(item))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.state.order.len() - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for DefinitionIter {}
