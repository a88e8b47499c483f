//! In-memory fakes for the provider seam (testing only)
//!
//! Provides `ScriptedProvider`, which answers with canned outcomes after a
//! configurable delay and records every call, plus sample report payloads.

use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::domain::{LanguageCode, ProviderError};
use crate::provider::IntelligenceProvider;

// ---------------------------------------------------------------------------
// ScriptedProvider
// ---------------------------------------------------------------------------

/// One canned provider answer.
#[derive(Debug, Clone)]
pub struct ScriptedCall {
    pub delay: Duration,
    pub outcome: Result<Value, ProviderError>,
}

/// A call the provider received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub query: String,
    pub language: LanguageCode,
}

/// Provider that replays scripted answers in order, then repeats a fallback.
#[derive(Debug)]
pub struct ScriptedProvider {
    script: Mutex<VecDeque<ScriptedCall>>,
    fallback: ScriptedCall,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedProvider {
    fn with_fallback(outcome: Result<Value, ProviderError>) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback: ScriptedCall {
                delay: Duration::ZERO,
                outcome,
            },
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Always answer with `payload`.
    pub fn succeeding(payload: Value) -> Self {
        Self::with_fallback(Ok(payload))
    }

    /// Always fail with `error`.
    pub fn failing(error: ProviderError) -> Self {
        Self::with_fallback(Err(error))
    }

    /// Delay applied to the fallback answer.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.fallback.delay = delay;
        self
    }

    /// Queue an answer used before the fallback.
    pub fn then(self, delay: Duration, outcome: Result<Value, ProviderError>) -> Self {
        self.script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push_back(ScriptedCall { delay, outcome });
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[async_trait]
impl IntelligenceProvider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn analyze(&self, query: &str, language: LanguageCode) -> Result<Value, ProviderError> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(RecordedCall {
                query: query.to_string(),
                language,
            });

        let next = self
            .script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());

        if !next.delay.is_zero() {
            tokio::time::sleep(next.delay).await;
        }
        next.outcome
    }
}

// ---------------------------------------------------------------------------
// Sample payloads
// ---------------------------------------------------------------------------

fn monthly_trends(base_volume: f64, base_value: f64, year: u32) -> Value {
    const MONTHS: [&str; 12] = [
        "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
    ];
    const SEASONALITY: [f64; 12] = [
        0.82, 0.78, 0.88, 0.95, 1.02, 1.04, 0.98, 1.01, 1.12, 1.21, 1.14, 1.05,
    ];
    Value::Array(
        MONTHS
            .iter()
            .zip(SEASONALITY)
            .map(|(month, factor)| {
                json!({
                    "month": format!("{month}-{year:02}"),
                    "volume": (base_volume * factor).round(),
                    "value": (base_value * factor).round(),
                })
            })
            .collect(),
    )
}

/// Provider payload for "Export canola oil to Malaysia".
///
/// The first two compliance items carry no `sourceUrl` (AIRS and SFCR
/// inference cases); the third carries its own link.
pub fn canola_to_malaysia() -> Value {
    json!({
        "commodity": "Canola oil",
        "hsCode": "15141900",
        "hsDescription": "Low erucic acid rape or colza oil and its fractions, other than crude",
        "originCountry": "Canada",
        "targetCountry": "Malaysia",
        "summary": "Malaysia imports refined canola oil for food service and blending. Demand peaks before Hari Raya; Canadian exporters compete with Australian supply.",
        "compliance": [
            {
                "id": "cmp-1",
                "title": "Export certificate for edible oils",
                "description": "Confirm importing-country certification requirements before shipment.",
                "severity": "HIGH",
                "source": "CFIA AIRS"
            },
            {
                "id": "cmp-2",
                "title": "SFCR licence to export",
                "description": "Exporters of food commodities need a Safe Food for Canadians licence.",
                "severity": "MEDIUM",
                "source": "Department of Justice"
            },
            {
                "id": "cmp-3",
                "title": "Halal certification",
                "description": "Most Malaysian buyers require halal certification recognised by JAKIM.",
                "severity": "LOW",
                "source": "JAKIM",
                "sourceUrl": "https://www.halal.gov.my"
            }
        ],
        "trends": monthly_trends(4200.0, 6_300_000.0, 25),
        "topPartners": [
            { "country": "United States", "value": 3_900_000_000.0, "percentage": 71.2 },
            { "country": "China", "value": 610_000_000.0, "percentage": 11.1 },
            { "country": "Mexico", "value": 240_000_000.0, "percentage": 4.4 },
            { "country": "South Korea", "value": 130_000_000.0, "percentage": 2.4 },
            { "country": "Malaysia", "value": 95_000_000.0, "percentage": 1.7 }
        ],
        "provincialData": [
            { "province": "SK", "value": 2_300_000_000.0, "percentage": 42.0 },
            { "province": "AB", "value": 1_600_000_000.0, "percentage": 29.2 },
            { "province": "MB", "value": 980_000_000.0, "percentage": 17.9 },
            { "province": "ON", "value": 310_000_000.0, "percentage": 5.7 }
        ],
        "partners": [
            { "name": "Sime Darby Oils Trading", "type": "BUYER", "location": "Port Klang", "matchScore": 0.92 },
            { "name": "Lam Soon Edible Oils", "type": "DISTRIBUTOR", "location": "Shah Alam", "matchScore": 0.85 },
            { "name": "FGV Refineries", "type": "BUYER", "location": "Kuala Lumpur", "matchScore": 0.78 }
        ],
        "tradeCommissioners": [
            {
                "name": "Aisha Rahman",
                "title": "Trade Commissioner, Agriculture and Food",
                "location": "High Commission of Canada, Kuala Lumpur",
                "email": "aisha.rahman@international.gc.ca",
                "expertise": ["Agri-food", "Seafood"]
            },
            {
                "name": "Daniel Tremblay",
                "title": "Senior Trade Commissioner",
                "location": "High Commission of Canada, Kuala Lumpur",
                "email": "daniel.tremblay@international.gc.ca",
                "sectors": ["Agriculture", "Processed food"]
            }
        ],
        "duties": {
            "tariffTreatment": "MFN (CPTPP preferential)",
            "rate": "0%",
            "programs": ["CPTPP tariff elimination", "Duties Relief Program"]
        }
    })
}

/// Provider payload for "Export maple syrup to Japan".
pub fn maple_syrup_to_japan() -> Value {
    json!({
        "commodity": "Maple syrup",
        "hsCode": "17022000",
        "hsDescription": "Maple sugar and maple syrup",
        "originCountry": "Canada",
        "targetCountry": "Japan",
        "summary": "Japan is a stable premium market for Canadian maple syrup.",
        "compliance": [
            {
                "id": "cmp-1",
                "title": "Maple product grading under the Safe Food for Canadians Regulations",
                "description": "Syrup must meet Canadian grade and labelling rules.",
                "severity": "MEDIUM",
                "source": "Government of Canada"
            }
        ],
        "trends": monthly_trends(310.0, 2_100_000.0, 25),
        "partners": [
            { "name": "Meidi-Ya", "type": "DISTRIBUTOR", "location": "Tokyo", "matchScore": 0.81 }
        ],
        "tradeCommissioners": [
            {
                "name": "Emily Chen",
                "title": "Trade Commissioner",
                "location": "Embassy of Canada, Tokyo",
                "email": "emily.chen@international.gc.ca"
            }
        ],
        "duties": {
            "tariffTreatment": "CPTPP",
            "rate": "0%",
            "programs": []
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_provider_replays_then_falls_back() {
        let provider = ScriptedProvider::succeeding(json!({"n": 0})).then(
            Duration::ZERO,
            Err(ProviderError::EmptyResponse),
        );

        let first = provider.analyze("a", LanguageCode::En).await;
        let second = provider.analyze("b", LanguageCode::Fr).await;

        assert_eq!(first, Err(ProviderError::EmptyResponse));
        assert_eq!(second, Ok(json!({"n": 0})));
        assert_eq!(
            provider.calls(),
            vec![
                RecordedCall {
                    query: "a".to_string(),
                    language: LanguageCode::En
                },
                RecordedCall {
                    query: "b".to_string(),
                    language: LanguageCode::Fr
                },
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_scripted_provider_honours_delay() {
        let provider = ScriptedProvider::succeeding(json!({})).with_delay(Duration::from_secs(3));
        let start = tokio::time::Instant::now();
        provider.analyze("q", LanguageCode::En).await.unwrap();
        assert!(start.elapsed() >= Duration::from_secs(3));
        assert!(start.elapsed() < Duration::from_millis(3010));
        assert_eq!(provider.call_count(), 1);
    }

    #[test]
    fn test_sample_trends_cover_a_year() {
        let trends = monthly_trends(100.0, 1000.0, 25);
        let trends = trends.as_array().unwrap();
        assert_eq!(trends.len(), 12);
        assert_eq!(trends[0]["month"], "Jan-25");
        assert_eq!(trends[11]["month"], "Dec-25");
    }
}
