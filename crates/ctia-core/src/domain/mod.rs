//! Domain models for CTIA.
//!
//! Canonical definitions for the core entities:
//! - `Phase`: ordered pipeline-stage label
//! - `Session`: one submitted query and its lifecycle
//! - `TradeReport`: the validated report contract
//! - `LanguageCode`: supported report languages

pub mod error;
pub mod language;
pub mod phase;
pub mod report;
pub mod session;

// Re-export main types and errors
pub use error::{CtiaError, LanguageError, ProviderError, ReportError, Result};
pub use language::LanguageCode;
pub use phase::{Phase, PhaseDescriptor, PIPELINE};
pub use report::{
    ComplianceRequirement, DutyInfo, MarketTrendPoint, PartnerProfile, PartnerType,
    ProvincialData, Severity, TopPartner, TradeCommissioner, TradeReport,
};
pub use session::{Session, SessionId, ViewState};
