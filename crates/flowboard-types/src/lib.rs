//! Shared types for the Flowboard catalog core.
//!
//! This crate provides the foundational pieces used across the other
//! Flowboard crates:
//! - `FlowboardError`: unified error taxonomy for loading and validation
//! - `Result`: convenience alias
//! - `IconResolver`: capability interface the UI layer implements to turn
//!   symbolic icon names into something renderable

/// Unified error type for catalog loading and validation.
///
/// Lookup misses (an unknown node id or type tag) are deliberately *not*
/// errors; they surface as `None`/`false` from the query APIs, since
/// "drop an unrecognized block" is an expected editor state.
#[derive(Debug, thiserror::Error)]
pub enum FlowboardError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("fetch of {url} failed: {message}")]
    Network {
        url: String,
        status: Option<u16>,
        message: String,
    },

    #[error("invalid JSON from {origin}: {message}")]
    Parse { origin: String, message: String },

    #[error("catalog document rejected: {0}")]
    Validation(String),
}

impl FlowboardError {
    /// The source the failure came from, for user-facing load reports.
    pub fn origin(&self) -> Option<&str> {
        match self {
            FlowboardError::Io { path, .. } => Some(path),
            FlowboardError::Network { url, .. } => Some(url),
            FlowboardError::Parse { origin, .. } => Some(origin),
            FlowboardError::Validation(_) => None,
        }
    }

    /// Returns `true` when the document itself was readable but failed the
    /// structural rules. The previous registry must stay intact in that case.
    pub fn is_validation(&self) -> bool {
        matches!(self, FlowboardError::Validation(_))
    }
}

/// A convenience alias for `Result<T, FlowboardError>`.
pub type Result<T> = std::result::Result<T, FlowboardError>;

// ---------------------------------------------------------------------------
// IconResolver: UI-supplied capability
// ---------------------------------------------------------------------------

/// Resolves a symbolic icon name (e.g. `"IconFilter"`) into a renderable
/// handle.
///
/// The catalog core only stores and forwards symbolic names; resolution is
/// entirely the UI layer's concern, including any fallback glyph for names
/// it does not know.
pub trait IconResolver: Send + Sync {
    type Handle;

    fn resolve(&self, symbolic_name: &str) -> Option<Self::Handle>;
}
