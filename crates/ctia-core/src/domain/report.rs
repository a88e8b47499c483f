//! The trade report contract.
//!
//! Field names follow the provider's camelCase wire shape. Required fields
//! have no serde default, so a payload missing one fails to deserialize;
//! numeric fields are passed through without range checks.

use serde::{Deserialize, Serialize};

use super::error::ReportError;

/// Severity of a compliance requirement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    High,
    Medium,
    Low,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::High => "HIGH",
            Severity::Medium => "MEDIUM",
            Severity::Low => "LOW",
        }
    }
}

/// A regulation the shipment must satisfy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceRequirement {
    pub id: String,
    pub title: String,
    pub description: String,
    pub severity: Severity,
    /// e.g. "CFIA AIRS".
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
}

impl ComplianceRequirement {
    /// A usable link is present (absent and blank both count as missing).
    pub fn has_source_url(&self) -> bool {
        self.source_url
            .as_deref()
            .is_some_and(|url| !url.trim().is_empty())
    }
}

/// One month of simulated trade volume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketTrendPoint {
    /// Format `MMM-YY`.
    pub month: String,
    pub volume: f64,
    /// CAD.
    pub value: f64,
}

/// Tariff treatment for the route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DutyInfo {
    /// e.g. MFN, GPT, CUSMA.
    pub tariff_treatment: String,
    pub rate: String,
    /// e.g. "Duties Relief Program".
    pub programs: Vec<String>,
}

/// Role a prospective partner would play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PartnerType {
    Buyer,
    Supplier,
    Distributor,
    #[serde(other)]
    Other,
}

/// A B2B lead in the target market.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartnerProfile {
    pub name: String,
    #[serde(rename = "type")]
    pub partner_type: PartnerType,
    pub location: String,
    /// Fraction in `[0, 1]`, not enforced.
    pub match_score: f64,
}

impl PartnerProfile {
    /// Match score as a whole percentage, clamped to `0..=100` for display.
    pub fn match_percent(&self) -> u8 {
        if self.match_score.is_nan() {
            return 0;
        }
        (self.match_score.clamp(0.0, 1.0) * 100.0).round() as u8
    }
}

/// Trade Commissioner Service contact.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeCommissioner {
    pub name: String,
    pub title: String,
    pub location: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sectors: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expertise: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopPartner {
    pub country: String,
    /// CAD.
    pub value: f64,
    /// 0-100.
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvincialData {
    /// Province code, e.g. ON, BC, QC.
    pub province: String,
    /// CAD.
    pub value: f64,
    /// 0-100.
    pub percentage: f64,
}

/// Validated structured result of one successful session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradeReport {
    pub commodity: String,
    /// Expected 8 digits; shorter codes are accepted.
    pub hs_code: String,
    pub hs_description: String,
    pub origin_country: String,
    pub target_country: String,
    pub summary: String,
    pub compliance: Vec<ComplianceRequirement>,
    /// Expected 12 points, one per month.
    pub trends: Vec<MarketTrendPoint>,
    pub duties: DutyInfo,
    pub partners: Vec<PartnerProfile>,
    pub trade_commissioners: Vec<TradeCommissioner>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_partners: Option<Vec<TopPartner>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provincial_data: Option<Vec<ProvincialData>>,
    /// Stamped by the controller after receipt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<String>,
}

impl TradeReport {
    /// Parse a raw provider payload against the contract.
    pub fn from_value(raw: serde_json::Value) -> Result<Self, ReportError> {
        if !raw.is_object() {
            return Err(ReportError::NotAnObject(json_kind(&raw)));
        }
        Ok(serde_json::from_value(raw)?)
    }

    /// Parse a raw JSON string against the contract.
    pub fn from_json_str(text: &str) -> Result<Self, ReportError> {
        let raw: serde_json::Value = serde_json::from_str(text)?;
        Self::from_value(raw)
    }

    /// Number of requirements at the given severity.
    pub fn count_severity(&self, severity: Severity) -> usize {
        self.compliance
            .iter()
            .filter(|c| c.severity == severity)
            .count()
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}
