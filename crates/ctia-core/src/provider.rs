//! Intelligence Provider seam.
//!
//! The controller consumes providers as black boxes: a query and a language
//! go in, a raw JSON payload (or an error) comes out. Validating the payload
//! against the report contract is the controller's job, not the provider's.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use crate::domain::{LanguageCode, ProviderError};

/// Asynchronous source of raw trade report payloads.
#[async_trait]
pub trait IntelligenceProvider: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &str;

    /// Produce a raw report payload for `query`, with prose in `language`.
    async fn analyze(
        &self,
        query: &str,
        language: LanguageCode,
    ) -> Result<serde_json::Value, ProviderError>;
}

/// Serves a report payload stored in a JSON file.
///
/// Used for offline demos and recorded responses; the query is ignored.
#[derive(Debug, Clone)]
pub struct FixtureProvider {
    path: PathBuf,
}

impl FixtureProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl IntelligenceProvider for FixtureProvider {
    fn name(&self) -> &str {
        "fixture"
    }

    async fn analyze(
        &self,
        query: &str,
        language: LanguageCode,
    ) -> Result<serde_json::Value, ProviderError> {
        debug!(path = %self.path.display(), query = %query, language = %language, "reading fixture report");
        let text = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| ProviderError::Transport(format!("{}: {e}", self.path.display())))?;
        if text.trim().is_empty() {
            return Err(ProviderError::EmptyResponse);
        }
        serde_json::from_str(&text).map_err(|e| ProviderError::MalformedPayload(e.to_string()))
    }
}
