//! Catalog document ingestion: wire format, schema validation, and sources.
//!
//! This crate owns everything between "somewhere there is a JSON document"
//! and "here is a typed, structurally valid [`CatalogDocument`]". The
//! registry and everything downstream live in `flowboard-catalog`.

pub mod document;
pub mod schema;
pub mod source;

pub use document::{CatalogDocument, ConfigValue, NodeTypeDoc, RetryPolicyDoc};
pub use schema::{validate_document, FieldKind, FieldRule, NODE_FIELDS};
pub use source::{
    DocumentSource, FileSource, InlineSource, UrlSource, DEFAULT_FETCH_TIMEOUT,
};
