//! Gemini provider configuration

use std::fmt;
use std::time::Duration;

/// Default model for report generation.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Default Generative Language API root.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f32 = 0.4;

/// Environment variables searched for the API key, in order.
pub const API_KEY_VARS: [&str; 3] = ["API_KEY", "VITE_GOOGLE_API_KEY", "GEMINI_API_KEY"];

/// Gemini configuration
#[derive(Clone)]
pub struct GeminiConfig {
    /// API key; `None` makes every call fail as not configured
    pub api_key: Option<String>,
    /// Model name, e.g. `gemini-2.5-flash`
    pub model: String,
    /// API root without trailing slash
    pub base_url: String,
    pub temperature: f32,
    /// Per-request HTTP timeout (`None` leaves it to the caller)
    pub request_timeout: Option<Duration>,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        GeminiConfig {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            request_timeout: None,
        }
    }
}

// Keep the key out of logs.
impl fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("temperature", &self.temperature)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

impl GeminiConfig {
    /// Create a new config from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let present = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mut config = Self::default();
        config.api_key = API_KEY_VARS.iter().find_map(|key| present(key));
        if let Some(model) = present("CTIA_GEMINI_MODEL") {
            config.model = model;
        }
        if let Some(base_url) = present("CTIA_GEMINI_BASE_URL") {
            config.base_url = base_url.trim_end_matches('/').to_string();
        }
        config
    }

    /// Set the API key
    pub fn with_api_key(mut self, api_key: &str) -> Self {
        self.api_key = Some(api_key.to_string());
        self
    }

    /// Set the model name
    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    /// Point at another API root (proxies, tests)
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// `generateContent` endpoint for the configured model.
    pub fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = GeminiConfig::from_lookup(lookup(&[]));
        assert!(!config.is_configured());
        assert_eq!(config.model, "gemini-2.5-flash");
        assert_eq!(
            config.endpoint(),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
        assert_eq!(config.temperature, 0.4);
    }

    #[test]
    fn test_api_key_precedence() {
        let config = GeminiConfig::from_lookup(lookup(&[
            ("GEMINI_API_KEY", "third"),
            ("VITE_GOOGLE_API_KEY", "second"),
        ]));
        assert_eq!(config.api_key.as_deref(), Some("second"));

        let config = GeminiConfig::from_lookup(lookup(&[
            ("API_KEY", "  "),
            ("GEMINI_API_KEY", "third"),
        ]));
        assert_eq!(config.api_key.as_deref(), Some("third"));
    }

    #[test]
    fn test_overrides_and_builders() {
        let config = GeminiConfig::from_lookup(lookup(&[
            ("CTIA_GEMINI_MODEL", "gemini-2.5-pro"),
            ("CTIA_GEMINI_BASE_URL", "http://localhost:8080/v1beta/"),
        ]));
        assert_eq!(
            config.endpoint(),
            "http://localhost:8080/v1beta/models/gemini-2.5-pro:generateContent"
        );

        let config = GeminiConfig::default()
            .with_api_key("k")
            .with_model("m")
            .with_request_timeout(Duration::from_secs(30));
        assert!(config.is_configured());
        assert_eq!(config.model, "m");
        assert_eq!(config.request_timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = GeminiConfig::default().with_api_key("super-secret");
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
