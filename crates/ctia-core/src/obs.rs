//! Structured observability hooks for the analysis session lifecycle.
//!
//! This module provides:
//! - Session-scoped tracing spans via the `SessionSpan` RAII guard and
//!   [`session_span`] for instrumenting futures
//! - Emission functions for key lifecycle events: start, phase change,
//!   completion, failure, stale result, contract warnings
//!
//! Events are emitted at `info!` level unless noted (filter via `RUST_LOG`).

use tracing::{debug, info, warn};

use crate::domain::{LanguageCode, Phase, SessionId};
use crate::normalize::ReportWarning;

/// RAII guard that enters a session-scoped tracing span.
///
/// # Example
///
/// ```ignore
/// let _span = SessionSpan::enter(session.id);
/// // tracing calls here carry session_id
/// ```
pub struct SessionSpan {
    _span: tracing::span::EnteredSpan,
}

impl SessionSpan {
    /// Create and enter a span tagged with the session id.
    pub fn enter(session_id: SessionId) -> Self {
        Self {
            _span: session_span(session_id).entered(),
        }
    }
}

/// Span for work belonging to one session; attach to futures with
/// `tracing::Instrument`.
pub fn session_span(session_id: SessionId) -> tracing::Span {
    tracing::info_span!("ctia.session", session_id = %session_id)
}

/// Emit event: session started.
pub fn emit_session_started(session_id: SessionId, language: LanguageCode, provider: &str) {
    info!(
        event = "session.started",
        session_id = %session_id,
        language = %language,
        provider = %provider,
    );
}

/// Emit event: a phase was committed for the session (debug level).
pub fn emit_phase_changed(session_id: SessionId, phase: Phase) {
    debug!(event = "session.phase_changed", session_id = %session_id, phase = %phase);
}

/// Emit event: report published.
pub fn emit_session_completed(session_id: SessionId, duration_ms: u64, compliance_items: usize) {
    info!(
        event = "session.completed",
        session_id = %session_id,
        duration_ms = duration_ms,
        compliance_items = compliance_items,
    );
}

/// Emit event: session failed (warning level). Carries the underlying cause,
/// which is never shown to the user.
pub fn emit_session_failed(session_id: SessionId, duration_ms: u64, error: &dyn std::fmt::Display) {
    warn!(
        event = "session.failed",
        session_id = %session_id,
        duration_ms = duration_ms,
        error = %error,
    );
}

/// Emit event: a provider result for an abandoned session was dropped (debug level).
pub fn emit_stale_result_discarded(session_id: SessionId, current: Option<SessionId>) {
    debug!(
        event = "session.stale_result_discarded",
        session_id = %session_id,
        current = ?current.map(|id| id.to_string()),
    );
}

/// Emit event: session cleared by reset.
pub fn emit_session_reset(session_id: Option<SessionId>) {
    info!(event = "session.reset", session_id = ?session_id.map(|id| id.to_string()));
}

/// Emit one warning per non-fatal contract deviation.
pub fn emit_report_warnings(session_id: SessionId, warnings: &[ReportWarning]) {
    for warning in warnings {
        warn!(event = "report.contract_warning", session_id = %session_id, warning = %warning);
    }
}
