//! Where a catalog document comes from: an inline value, a local file, or
//! a remote URL.
//!
//! Sources only produce raw parsed JSON; structural validation happens
//! afterwards in [`crate::schema`]. No retry is performed here; retry is a
//! property of processing nodes, not of configuration loading.

use std::path::{Path, PathBuf};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use flowboard_types::{FlowboardError, Result};

/// Cap on a URL fetch so a hung endpoint cannot block the editor.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(15);

#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Human-readable description of where the document comes from, used
    /// in load reports and error messages.
    fn origin(&self) -> String;

    /// Produce the raw candidate document, or fail.
    async fn fetch(&self) -> Result<Value>;
}

// ---------------------------------------------------------------------------
// InlineSource
// ---------------------------------------------------------------------------

/// An already-parsed document handed over by the caller. Returned as-is;
/// it still goes through validation.
pub struct InlineSource {
    value: Value,
}

impl InlineSource {
    pub fn new(value: Value) -> Self {
        Self { value }
    }
}

#[async_trait]
impl DocumentSource for InlineSource {
    fn origin(&self) -> String {
        "inline document".to_string()
    }

    async fn fetch(&self) -> Result<Value> {
        Ok(self.value.clone())
    }
}

// ---------------------------------------------------------------------------
// FileSource
// ---------------------------------------------------------------------------

/// A document read from a local JSON file.
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl DocumentSource for FileSource {
    fn origin(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch(&self) -> Result<Value> {
        tracing::debug!(path = %self.path.display(), "reading catalog document");
        let text = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| FlowboardError::Io {
                path: self.path.display().to_string(),
                source,
            })?;
        serde_json::from_str(&text).map_err(|err| FlowboardError::Parse {
            origin: self.path.display().to_string(),
            message: err.to_string(),
        })
    }
}

// ---------------------------------------------------------------------------
// UrlSource
// ---------------------------------------------------------------------------

/// A document fetched over HTTP(S). Transport failures and non-success
/// statuses map to [`FlowboardError::Network`]; a non-JSON body maps to
/// [`FlowboardError::Parse`].
pub struct UrlSource {
    url: String,
    client: reqwest::Client,
    timeout: Duration,
}

impl UrlSource {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: reqwest::Client::new(),
            timeout: DEFAULT_FETCH_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Use a caller-supplied client (shared connection pool).
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }
}

#[async_trait]
impl DocumentSource for UrlSource {
    fn origin(&self) -> String {
        self.url.clone()
    }

    async fn fetch(&self) -> Result<Value> {
        tracing::debug!(url = %self.url, "fetching catalog document");
        let response = self
            .client
            .get(&self.url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|err| FlowboardError::Network {
                url: self.url.clone(),
                status: None,
                message: err.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FlowboardError::Network {
                url: self.url.clone(),
                status: Some(status.as_u16()),
                message: format!("HTTP {status}"),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|err| FlowboardError::Network {
                url: self.url.clone(),
                status: Some(status.as_u16()),
                message: err.to_string(),
            })?;
        serde_json::from_str(&body).map_err(|err| FlowboardError::Parse {
            origin: self.url.clone(),
            message: err.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn inline_source_returns_value_unchanged() {
        let value = serde_json::json!({ "version": "1.0.0", "nodes": [] });
        let source = InlineSource::new(value.clone());
        assert_eq!(source.fetch().await.unwrap(), value);
        assert_eq!(source.origin(), "inline document");
    }

    #[tokio::test]
    async fn file_source_reads_and_parses() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "version": "2.0.0", "nodes": [] }}"#).unwrap();

        let source = FileSource::new(file.path());
        let value = source.fetch().await.unwrap();
        assert_eq!(value["version"], "2.0.0");
    }

    #[tokio::test]
    async fn file_source_missing_file_is_io_error() {
        let source = FileSource::new("/definitely/not/here/nodes.json");
        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, FlowboardError::Io { .. }));
        assert_eq!(err.origin(), Some("/definitely/not/here/nodes.json"));
    }

    #[tokio::test]
    async fn file_source_invalid_json_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "this is not json").unwrap();

        let source = FileSource::new(file.path());
        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, FlowboardError::Parse { .. }));
    }

    #[tokio::test]
    async fn url_source_unroutable_host_is_network_error() {
        // Reserved TLD per RFC 2606: resolution fails without touching
        // a real network endpoint.
        let source =
            UrlSource::new("http://nodes.invalid/catalog.json").with_timeout(Duration::from_secs(2));
        let err = source.fetch().await.unwrap_err();
        assert!(matches!(err, FlowboardError::Network { status: None, .. }));
    }
}
