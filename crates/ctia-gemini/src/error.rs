//! Error types for ctia-gemini

use ctia_core::ProviderError;
use thiserror::Error;

/// Errors that can occur talking to the Gemini API
#[derive(Error, Debug)]
pub enum GeminiError {
    /// No API key in the configuration
    #[error("Gemini API key is not set (checked API_KEY, VITE_GOOGLE_API_KEY, GEMINI_API_KEY)")]
    MissingApiKey,

    /// HTTP client could not be built
    #[error("failed to build HTTP client: {0}")]
    Client(String),

    /// Request never produced a response
    #[error("HTTP error: {0}")]
    Http(String),

    /// Non-2xx answer from the API
    #[error("Gemini API returned {status}: {message}")]
    Status { status: u16, message: String },

    /// Response had no candidate text
    #[error("Gemini returned no text")]
    EmptyResponse,

    /// Response envelope or candidate text was not the expected JSON
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<reqwest::Error> for GeminiError {
    fn from(err: reqwest::Error) -> Self {
        GeminiError::Http(err.to_string())
    }
}

impl From<GeminiError> for ProviderError {
    fn from(err: GeminiError) -> Self {
        match err {
            GeminiError::MissingApiKey | GeminiError::Client(_) => {
                ProviderError::NotConfigured(err.to_string())
            }
            GeminiError::Http(message) => ProviderError::Transport(message),
            GeminiError::Status { status, message } => ProviderError::Status { status, message },
            GeminiError::EmptyResponse => ProviderError::EmptyResponse,
            GeminiError::Json(e) => ProviderError::MalformedPayload(e.to_string()),
        }
    }
}

/// Result type for Gemini operations
pub type Result<T> = std::result::Result<T, GeminiError>;
