//! Gemini-backed Intelligence Provider.

use async_trait::async_trait;
use ctia_core::{IntelligenceProvider, LanguageCode, ProviderError};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::GeminiConfig;
use crate::error::GeminiError;
use crate::prompt::system_instruction;
use crate::schema::{error_message, GenerateContentRequest, GenerateContentResponse};
use crate::Result;

const API_KEY_HEADER: &str = "x-goog-api-key";

/// Client for `models/{model}:generateContent`
pub struct GeminiProvider {
    config: GeminiConfig,
    http_client: reqwest::Client,
}

impl GeminiProvider {
    /// Create a new provider
    pub fn new(config: GeminiConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("ctia-gemini/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder
            .build()
            .map_err(|e| GeminiError::Client(e.to_string()))?;

        Ok(GeminiProvider {
            config,
            http_client,
        })
    }

    /// Create provider from environment variables
    pub fn from_env() -> Result<Self> {
        Self::new(GeminiConfig::from_env())
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    /// Run one report generation and return the parsed candidate JSON.
    pub async fn generate(&self, query: &str, language: LanguageCode) -> Result<Value> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or(GeminiError::MissingApiKey)?;

        let request = GenerateContentRequest::new(
            system_instruction(query, language),
            query,
            self.config.temperature,
        );
        let endpoint = self.config.endpoint();
        info!(model = %self.config.model, language = %language, "requesting trade report from Gemini");

        let response = self
            .http_client
            .post(&endpoint)
            .header(API_KEY_HEADER, api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            let message = error_message(&body);
            warn!(status = status.as_u16(), message = %message, "Gemini request failed");
            return Err(GeminiError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let envelope: GenerateContentResponse = serde_json::from_str(&body)?;
        let text = envelope.text().ok_or(GeminiError::EmptyResponse)?;
        debug!(bytes = text.len(), "received candidate text");

        Ok(serde_json::from_str(&text)?)
    }
}

#[async_trait]
impl IntelligenceProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn analyze(&self, query: &str, language: LanguageCode) -> std::result::Result<Value, ProviderError> {
        self.generate(query, language).await.map_err(ProviderError::from)
    }
}
