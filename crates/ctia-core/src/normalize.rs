//! Report normalization applied once per successful provider response.
//!
//! Two enrichments, nothing else is touched:
//! - `lastUpdated` is stamped from the local clock in the session's locale
//!   (a model has no reliable notion of "today")
//! - compliance requirements without a link get one inferred from their
//!   source and title, when a known regulator matches
//!
//! Contract deviations that do not justify rejecting the report (short HS
//! code, missing months, out-of-range scores) are reported as
//! [`ReportWarning`]s for logging.

use std::fmt;
use std::sync::Arc;

use chrono::{Datelike, NaiveDate};

use crate::domain::{LanguageCode, ReportError, TradeReport};

/// CFIA Automated Import Reference System decision database.
pub const AIRS_DECISIONS_URL: &str =
    "https://airs-sari.inspection.gc.ca/airs_external/english/decisions-eng.aspx";

/// Safe Food for Canadians Regulations (SOR/2018-108).
pub const SFCR_REGULATIONS_URL: &str =
    "https://laws-lois.justice.gc.ca/eng/regulations/SOR-2018-108/";

const AIRS_KEYWORDS: &[&str] = &["airs", "cfia"];
const SFCR_KEYWORDS: &[&str] = &["justice", "safe food", "sfcr"];

/// Source of "today" for report stamping.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Local wall clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }
}

/// Clock pinned to one date.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Non-fatal deviation from the expected report shape.
#[derive(Debug, Clone, PartialEq)]
pub enum ReportWarning {
    ShortHsCode { hs_code: String, digits: usize },
    TrendMonths { found: usize },
    MatchScoreOutOfRange { partner: String, score: f64 },
    NoComplianceRequirements,
}

impl fmt::Display for ReportWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportWarning::ShortHsCode { hs_code, digits } => {
                write!(f, "HS code '{hs_code}' has {digits} digits, expected 8")
            }
            ReportWarning::TrendMonths { found } => {
                write!(f, "trend series has {found} points, expected 12")
            }
            ReportWarning::MatchScoreOutOfRange { partner, score } => {
                write!(f, "partner '{partner}' has match score {score} outside [0, 1]")
            }
            ReportWarning::NoComplianceRequirements => f.write_str("no compliance requirements"),
        }
    }
}

/// A parsed, enriched report plus the warnings it raised.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedReport {
    pub report: TradeReport,
    pub warnings: Vec<ReportWarning>,
}

/// Parses and enriches raw provider payloads.
#[derive(Clone)]
pub struct ReportNormalizer {
    clock: Arc<dyn Clock>,
}

impl Default for ReportNormalizer {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

impl fmt::Debug for ReportNormalizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReportNormalizer")
            .field("today", &self.clock.today())
            .finish()
    }
}

impl ReportNormalizer {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Validate `raw` against the contract, then enrich it.
    ///
    /// Fails closed: a payload that does not match the contract yields an
    /// error and no partial report.
    pub fn normalize(
        &self,
        raw: serde_json::Value,
        language: LanguageCode,
    ) -> Result<NormalizedReport, ReportError> {
        let mut report = TradeReport::from_value(raw)?;
        normalize_report(&mut report, language, self.clock.today());
        let warnings = contract_warnings(&report);
        Ok(NormalizedReport { report, warnings })
    }
}

/// Apply the enrichments in place. Running it twice with the same date is a no-op.
pub fn normalize_report(report: &mut TradeReport, language: LanguageCode, today: NaiveDate) {
    report.last_updated = Some(format_long_date(today, language));

    for requirement in &mut report.compliance {
        if requirement.has_source_url() {
            continue;
        }
        requirement.source_url =
            infer_source_url(&requirement.source, &requirement.title).map(str::to_string);
    }
}

/// Canonical regulation URL for a requirement, by keyword match on its
/// source and title. AIRS takes precedence over SFCR.
pub fn infer_source_url(source: &str, title: &str) -> Option<&'static str> {
    let source = source.to_lowercase();
    let title = title.to_lowercase();
    let mentions = |keywords: &[&str]| {
        keywords
            .iter()
            .any(|k| source.contains(k) || title.contains(k))
    };

    if mentions(AIRS_KEYWORDS) {
        Some(AIRS_DECISIONS_URL)
    } else if mentions(SFCR_KEYWORDS) {
        Some(SFCR_REGULATIONS_URL)
    } else {
        None
    }
}

/// Long-form date (year, full month name, day) in the language's locale.
pub fn format_long_date(date: NaiveDate, language: LanguageCode) -> String {
    let day = date.day();
    let year = date.year();
    let month = month_name(date.month0() as usize, language);

    match language {
        LanguageCode::En | LanguageCode::Tl => format!("{month} {day}, {year}"),
        LanguageCode::Fr | LanguageCode::Ms | LanguageCode::Id => {
            format!("{day} {month} {year}")
        }
        LanguageCode::Vi => format!("{day} {month}, {year}"),
    }
}

fn month_name(month0: usize, language: LanguageCode) -> String {
    const EN: [&str; 12] = [
        "January", "February", "March", "April", "May", "June", "July", "August",
        "September", "October", "November", "December",
    ];
    const FR: [&str; 12] = [
        "janvier", "février", "mars", "avril", "mai", "juin", "juillet", "août",
        "septembre", "octobre", "novembre", "décembre",
    ];
    const MS: [&str; 12] = [
        "Januari", "Februari", "Mac", "April", "Mei", "Jun", "Julai", "Ogos",
        "September", "Oktober", "November", "Disember",
    ];
    const TL: [&str; 12] = [
        "Enero", "Pebrero", "Marso", "Abril", "Mayo", "Hunyo", "Hulyo", "Agosto",
        "Setyembre", "Oktubre", "Nobyembre", "Disyembre",
    ];
    const ID: [&str; 12] = [
        "Januari", "Februari", "Maret", "April", "Mei", "Juni", "Juli", "Agustus",
        "September", "Oktober", "November", "Desember",
    ];

    let idx = month0.min(11);
    match language {
        LanguageCode::En => EN[idx].to_string(),
        LanguageCode::Fr => FR[idx].to_string(),
        LanguageCode::Ms => MS[idx].to_string(),
        LanguageCode::Tl => TL[idx].to_string(),
        LanguageCode::Id => ID[idx].to_string(),
        LanguageCode::Vi => format!("tháng {}", idx + 1),
    }
}

/// Collect non-fatal contract deviations.
pub fn contract_warnings(report: &TradeReport) -> Vec<ReportWarning> {
    let mut warnings = Vec::new();

    let digits = report.hs_code.chars().filter(char::is_ascii_digit).count();
    if digits < 8 {
        warnings.push(ReportWarning::ShortHsCode {
            hs_code: report.hs_code.clone(),
            digits,
        });
    }

    if report.trends.len() != 12 {
        warnings.push(ReportWarning::TrendMonths {
            found: report.trends.len(),
        });
    }

    for partner in &report.partners {
        if !(0.0..=1.0).contains(&partner.match_score) {
            warnings.push(ReportWarning::MatchScoreOutOfRange {
                partner: partner.name.clone(),
                score: partner.match_score,
            });
        }
    }

    if report.compliance.is_empty() {
        warnings.push(ReportWarning::NoComplianceRequirements);
    }

    warnings
}
