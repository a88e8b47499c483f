//! Session and view tracking.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::language::LanguageCode;
use super::phase::Phase;

/// Identifier tagging a session and every asynchronous call it spawns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One submitted query, from submit to terminal phase or reset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Unique identifier for this session.
    pub id: SessionId,

    /// Trimmed user query.
    pub query: String,

    /// Language the report is requested in.
    pub language: LanguageCode,

    /// Last committed phase.
    pub phase: Phase,

    /// When the session was submitted.
    pub started_at: DateTime<Utc>,
}

impl Session {
    /// Create a new session, already in the first pipeline phase.
    pub fn new(query: impl Into<String>, language: LanguageCode) -> Self {
        Self {
            id: SessionId::new(),
            query: query.into(),
            language,
            phase: Phase::Orchestrating,
            started_at: Utc::now(),
        }
    }

    pub fn elapsed_ms(&self) -> u64 {
        (Utc::now() - self.started_at).num_milliseconds().max(0) as u64
    }
}

/// Which screen presentation should show.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewState {
    #[default]
    Input,
    Processing,
    Results,
}
