//! `NodeCatalog`, the facade the editor holds.
//!
//! Ties together document sources, schema validation, and the registry,
//! and exposes the load/export/query surface. A failed load reports a
//! readable cause and leaves the previously loaded catalog untouched;
//! the registry is only replaced after the whole document has validated.

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use flowboard_config::{
    validate_document, CatalogDocument, DocumentSource, FileSource, InlineSource, UrlSource,
};
use flowboard_types::Result;

use crate::builtin::builtin_document;
use crate::compat::CompatibilityValidator;
use crate::definition::NodeTypeDefinition;
use crate::factory::NodeFactory;
use crate::registry::{CategoryGroup, DefinitionIter, NodeTypeRegistry};

/// One sidebar group of the editor's block library.
#[derive(Debug, Clone, Serialize)]
pub struct PaletteGroup {
    pub category: String,
    pub label: String,
    pub entries: Vec<PaletteEntry>,
}

/// Display record for one block in the library sidebar. Port labels are
/// pre-joined for rendering; the icon stays a symbolic name for the UI's
/// [`flowboard_types::IconResolver`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaletteEntry {
    pub id: String,
    pub name: String,
    pub description: String,
    pub type_tag: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub inputs: String,
    pub outputs: String,
}

pub struct NodeCatalog {
    registry: Arc<NodeTypeRegistry>,
}

impl NodeCatalog {
    pub fn new() -> Self {
        Self {
            registry: Arc::new(NodeTypeRegistry::new()),
        }
    }

    /// Handle to the shared registry, for wiring up factories and
    /// validators with the same backing state.
    pub fn registry(&self) -> Arc<NodeTypeRegistry> {
        Arc::clone(&self.registry)
    }

    pub fn factory(&self) -> NodeFactory {
        NodeFactory::new(self.registry())
    }

    pub fn compatibility(&self) -> CompatibilityValidator {
        CompatibilityValidator::new(self.registry())
    }

    /// Fetch, validate, and install a catalog document. The registry swap
    /// happens only after validation succeeds, so any failure leaves the
    /// previous catalog fully intact and queryable.
    pub async fn load(&self, source: &dyn DocumentSource) -> Result<()> {
        let origin = source.origin();
        let raw = source.fetch().await?;
        let document = validate_document(&raw).inspect_err(|err| {
            tracing::warn!(origin = %origin, error = %err, "catalog load rejected");
        })?;

        let version = document.version.clone();
        let definitions: Vec<NodeTypeDefinition> = document
            .nodes
            .into_iter()
            .map(NodeTypeDefinition::from_doc)
            .collect();
        let count = definitions.len();
        self.registry.replace(document.version, definitions);
        tracing::info!(origin = %origin, version = %version, nodes = count, "catalog loaded");
        Ok(())
    }

    pub async fn load_from_value(&self, value: Value) -> Result<()> {
        self.load(&InlineSource::new(value)).await
    }

    pub async fn load_from_file(&self, path: impl AsRef<Path>) -> Result<()> {
        self.load(&FileSource::new(path)).await
    }

    pub async fn load_from_url(&self, url: &str) -> Result<()> {
        self.load(&UrlSource::new(url)).await
    }

    /// Install the built-in starter catalog.
    pub async fn load_builtin(&self) -> Result<()> {
        self.load_from_value(builtin_document()).await
    }

    /// The currently loaded catalog as a wire document, content-equivalent
    /// to what was loaded. `None` when nothing is loaded.
    pub fn export(&self) -> Option<CatalogDocument> {
        let version = self.registry.current_version()?;
        let nodes = self
            .registry
            .all_definitions()
            .map(|def| def.to_doc())
            .collect();
        Some(CatalogDocument { version, nodes })
    }

    pub fn is_loaded(&self) -> bool {
        self.registry.is_loaded()
    }

    pub fn current_version(&self) -> Option<String> {
        self.registry.current_version()
    }

    pub fn reset(&self) {
        self.registry.reset();
    }

    // Lookup delegates, so callers that only hold the facade need not pull
    // out the registry handle.

    pub fn get(&self, id: &str) -> Option<Arc<NodeTypeDefinition>> {
        self.registry.get(id)
    }

    pub fn get_by_type_tag(&self, type_tag: &str) -> Option<Arc<NodeTypeDefinition>> {
        self.registry.get_by_type_tag(type_tag)
    }

    pub fn all_definitions(&self) -> DefinitionIter {
        self.registry.all_definitions()
    }

    pub fn categories(&self) -> Vec<CategoryGroup> {
        self.registry.categories()
    }

    /// Ordered block-library view: category groups rendered to display
    /// records for the editor's sidebar.
    pub fn palette(&self) -> Vec<PaletteGroup> {
        self.registry
            .categories()
            .into_iter()
            .map(|group| PaletteGroup {
                category: group.key,
                label: group.label,
                entries: group
                    .members
                    .iter()
                    .map(|def| PaletteEntry {
                        id: def.id.clone(),
                        name: def.name.clone(),
                        description: def.description.clone(),
                        type_tag: def.type_tag.clone(),
                        icon: def.icon.clone(),
                        inputs: def.input_types.join(", "),
                        outputs: def.output_types.join(", "),
                    })
                    .collect(),
            })
            .collect()
    }
}

impl Default for NodeCatalog {
    fn default() -> Self {
        Self::new()
    }
}
