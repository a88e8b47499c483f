//! Pipeline phases shown to the user while a query is analyzed.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordered pipeline-stage label.
///
/// Declaration order is the pipeline order; `Ord` follows it, which is what
/// the controller relies on to keep the observed sequence monotonic.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Phase {
    #[default]
    Idle,
    Orchestrating,
    Classifying,
    CheckingCompliance,
    AnalyzingMarket,
    CalculatingDuty,
    Complete,
    Error,
}

/// Cosmetic phases emitted by the progression driver, in order.
pub const PIPELINE: [Phase; 5] = [
    Phase::Orchestrating,
    Phase::Classifying,
    Phase::CheckingCompliance,
    Phase::AnalyzingMarket,
    Phase::CalculatingDuty,
];

/// Presentation metadata for one pipeline phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseDescriptor {
    pub phase: Phase,
    /// Agent persona credited with the work.
    pub agent: &'static str,
    /// Short label for the progress rail.
    pub label: &'static str,
    /// Activity line for the live log.
    pub activity: &'static str,
}

const DESCRIPTORS: [PhaseDescriptor; 5] = [
    PhaseDescriptor {
        phase: Phase::Orchestrating,
        agent: "Supervisor",
        label: "Orchestrator",
        activity: "Decomposing query & routing tasks...",
    },
    PhaseDescriptor {
        phase: Phase::Classifying,
        agent: "Taxonomist",
        label: "Classification",
        activity: "Consulting Customs Tariff for HS Code...",
    },
    PhaseDescriptor {
        phase: Phase::CheckingCompliance,
        agent: "Compliance Officer",
        label: "Compliance",
        activity: "Querying CFIA AIRS database...",
    },
    PhaseDescriptor {
        phase: Phase::AnalyzingMarket,
        agent: "Strategic Agent",
        label: "Market Intel",
        activity: "Fetching StatCan trade volumes...",
    },
    PhaseDescriptor {
        phase: Phase::CalculatingDuty,
        agent: "Duty Agent",
        label: "Partners",
        activity: "Calculating MFN/GPT rates...",
    },
];

impl Phase {
    /// `Complete` or `Error`.
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Complete | Phase::Error)
    }

    /// One of the five cosmetic pipeline phases.
    pub fn is_pipeline(self) -> bool {
        PIPELINE.contains(&self)
    }

    /// Position within [`PIPELINE`], if this is a pipeline phase.
    pub fn pipeline_index(self) -> Option<usize> {
        PIPELINE.iter().position(|p| *p == self)
    }

    pub fn descriptor(self) -> Option<&'static PhaseDescriptor> {
        DESCRIPTORS.iter().find(|d| d.phase == self)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Phase::Idle => "IDLE",
            Phase::Orchestrating => "ORCHESTRATING",
            Phase::Classifying => "CLASSIFYING",
            Phase::CheckingCompliance => "CHECKING_COMPLIANCE",
            Phase::AnalyzingMarket => "ANALYZING_MARKET",
            Phase::CalculatingDuty => "CALCULATING_DUTY",
            Phase::Complete => "COMPLETE",
            Phase::Error => "ERROR",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
