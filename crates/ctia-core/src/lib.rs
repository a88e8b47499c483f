//! CTIA Core Library
//!
//! Query analysis orchestrator for the Canada Trade Intelligence Assistant:
//! one free-text trade query in, one validated [`TradeReport`] out, with a
//! cosmetic multi-agent phase progression while the provider works.

pub mod controller;
pub mod domain;
pub mod driver;
pub mod fakes;
pub mod metrics;
pub mod normalize;
pub mod obs;
pub mod provider;
pub mod telemetry;

pub use controller::{
    AnalysisController, ControllerConfig, ControllerEvent, ControllerSnapshot,
    DEFAULT_FAILURE_MESSAGE, DEFAULT_SETTLE_DELAY,
};

pub use domain::{
    ComplianceRequirement, CtiaError, DutyInfo, LanguageCode, LanguageError, MarketTrendPoint,
    PartnerProfile, PartnerType, Phase, PhaseDescriptor, ProviderError, ProvincialData,
    ReportError, Result, Session, SessionId, Severity, TopPartner, TradeCommissioner, TradeReport,
    ViewState, PIPELINE,
};

pub use driver::{PhaseDriver, DEFAULT_PHASE_INTERVAL};

pub use normalize::{
    contract_warnings, format_long_date, infer_source_url, normalize_report, Clock, FixedClock,
    NormalizedReport, ReportNormalizer, ReportWarning, SystemClock, AIRS_DECISIONS_URL,
    SFCR_REGULATIONS_URL,
};

pub use provider::{FixtureProvider, IntelligenceProvider};

pub use metrics::METRICS;
pub use obs::{
    emit_phase_changed, emit_report_warnings, emit_session_completed, emit_session_failed,
    emit_session_reset, emit_session_started, emit_stale_result_discarded, session_span,
    SessionSpan,
};
pub use telemetry::init_tracing;

/// CTIA version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
