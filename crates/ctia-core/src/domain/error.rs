//! Domain-level error taxonomy for CTIA.

use std::time::Duration;

/// Failures reported by an Intelligence Provider.
///
/// Every variant is terminal for the session that issued the call. The
/// controller logs the variant and shows only a generic message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    #[error("provider is not configured: {0}")]
    NotConfigured(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("provider returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("provider returned an empty response")]
    EmptyResponse,

    #[error("provider returned a malformed payload: {0}")]
    MalformedPayload(String),

    #[error("provider did not answer within {0:?}")]
    Timeout(Duration),
}

/// Errors produced while turning a raw payload into a `TradeReport`.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("report payload must be a JSON object, got {0}")]
    NotAnObject(&'static str),

    #[error("report payload violates the trade report contract: {0}")]
    Schema(#[from] serde_json::Error),
}

/// Unknown or unsupported language code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported language code '{code}' (expected one of: {supported})")]
pub struct LanguageError {
    pub code: String,
    pub supported: String,
}

/// CTIA domain errors.
#[derive(Debug, thiserror::Error)]
pub enum CtiaError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("report error: {0}")]
    Report(#[from] ReportError),

    #[error("language error: {0}")]
    Language(#[from] LanguageError),
}

/// Result type for CTIA domain operations.
pub type Result<T> = std::result::Result<T, CtiaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ctia_error_display() {
        let err = CtiaError::InvalidInput("query must not be empty".to_string());
        assert!(err.to_string().contains("invalid input"));

        let err = CtiaError::from(ProviderError::EmptyResponse);
        assert!(err.to_string().contains("empty response"));
    }

    #[test]
    fn test_status_error_carries_code() {
        let err = ProviderError::Status {
            status: 403,
            message: "API key not valid".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("403"));
        assert!(msg.contains("API key not valid"));
    }

    #[test]
    fn test_schema_error_wraps_serde() {
        let serde_err = serde_json::from_str::<u32>("\"x\"").unwrap_err();
        let err = CtiaError::from(ReportError::from(serde_err));
        assert!(err.to_string().contains("trade report contract"));
    }

    #[test]
    fn test_timeout_error_mentions_duration() {
        let err = ProviderError::Timeout(Duration::from_secs(30));
        assert!(err.to_string().contains("30s"));
    }
}
