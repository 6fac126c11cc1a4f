//! Node-type catalog core: registry, retry policies, node factory, and
//! compatibility queries.
//!
//! This crate is the authoritative in-memory side of the editor: documents
//! validated by `flowboard-config` are installed into a
//! [`NodeTypeRegistry`], node instances are minted by the [`NodeFactory`],
//! and edge legality is answered by the [`CompatibilityValidator`]. The
//! [`NodeCatalog`] facade bundles the whole surface for the UI layer.

pub mod builtin;
pub mod catalog;
pub mod compat;
pub mod definition;
pub mod factory;
pub mod registry;
pub mod retry;

pub use builtin::{builtin_document, BUILTIN_CATALOG_JSON};
pub use catalog::{NodeCatalog, PaletteEntry, PaletteGroup};
pub use compat::CompatibilityValidator;
pub use definition::NodeTypeDefinition;
pub use factory::{
    GraphNodeInstance, InstanceData, NodeFactory, Position, RuntimeNode, DEFAULT_TIMEOUT_SECS,
};
pub use registry::{CategoryGroup, DefinitionIter, NodeTypeRegistry};
pub use retry::{BackoffStrategy, RetryPolicy};
