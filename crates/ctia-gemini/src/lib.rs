//! ctia-gemini: Google Gemini intelligence provider for CTIA
//!
//! Sends one `generateContent` request per query with a system instruction
//! that has the model play the five CTIA agents, and a response schema that
//! pins the output to the trade report shape. Validation of the returned
//! JSON is left to `ctia-core`.

pub mod client;
pub mod config;
pub mod error;
pub mod prompt;
pub mod schema;

pub use client::GeminiProvider;
pub use config::{GeminiConfig, API_KEY_VARS, DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_TEMPERATURE};
pub use error::{GeminiError, Result};
pub use prompt::system_instruction;
pub use schema::trade_report_schema;
