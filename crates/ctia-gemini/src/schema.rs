//! Wire types for `models/{model}:generateContent` and the trade report
//! response schema.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Top-level fields the model must always return.
pub const REQUIRED_FIELDS: [&str; 13] = [
    "commodity",
    "hsCode",
    "hsDescription",
    "originCountry",
    "targetCountry",
    "summary",
    "compliance",
    "trends",
    "topPartners",
    "provincialData",
    "partners",
    "tradeCommissioners",
    "duties",
];

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub system_instruction: Content,
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub response_mime_type: String,
    pub response_schema: Value,
    pub temperature: f32,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Candidate {
    #[serde(default)]
    pub content: Content,
}

/// Error envelope of a non-2xx answer.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorDetail {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub status: Option<String>,
}

impl Content {
    pub fn text(role: Option<&str>, text: &str) -> Self {
        Content {
            role: role.map(str::to_string),
            parts: vec![Part {
                text: Some(text.to_string()),
            }],
        }
    }
}

impl GenerateContentRequest {
    pub fn new(system_instruction: String, query: &str, temperature: f32) -> Self {
        GenerateContentRequest {
            system_instruction: Content::text(None, &system_instruction),
            contents: vec![Content::text(Some("user"), query)],
            generation_config: GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: trade_report_schema(),
                temperature,
            },
        }
    }
}

impl GenerateContentResponse {
    /// Concatenated text parts of the first candidate, `None` when blank.
    pub fn text(&self) -> Option<String> {
        let candidate = self.candidates.first()?;
        let text: String = candidate
            .content
            .parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect();
        (!text.trim().is_empty()).then_some(text)
    }
}

/// Best-effort message from an error body; falls back to the raw text.
pub fn error_message(body: &str) -> String {
    match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(parsed) => match parsed.error.status {
            Some(status) if !status.is_empty() => format!("{status}: {}", parsed.error.message),
            _ => parsed.error.message,
        },
        Err(_) => body.trim().chars().take(200).collect(),
    }
}

fn string() -> Value {
    json!({ "type": "STRING" })
}

fn number() -> Value {
    json!({ "type": "NUMBER" })
}

fn described(kind: &str, description: &str) -> Value {
    json!({ "type": kind, "description": description })
}

fn array_of(items: Value) -> Value {
    json!({ "type": "ARRAY", "items": items })
}

/// Object schema; every name in `required` must also be a property.
fn object(properties: Value, required: &[&str]) -> Value {
    json!({ "type": "OBJECT", "properties": properties, "required": required })
}

fn share_row(key: &str, key_description: Option<&str>) -> Value {
    let key_schema = match key_description {
        Some(d) => described("STRING", d),
        None => string(),
    };
    object(
        json!({
            key: key_schema,
            "value": described("NUMBER", "Total CAD value"),
            "percentage": described("NUMBER", "0-100 percentage share"),
        }),
        &[key, "value", "percentage"],
    )
}

/// Response schema describing the trade report.
///
/// Every field the core contract cannot default is listed as required,
/// at the top level and inside each nested object.
pub fn trade_report_schema() -> Value {
    let compliance = object(
        json!({
            "id": string(),
            "title": string(),
            "description": string(),
            "severity": { "type": "STRING", "enum": ["HIGH", "MEDIUM", "LOW"] },
            "source": string(),
            "sourceUrl": described("STRING", "Official URL to the regulation source"),
        }),
        &["id", "title", "description", "severity", "source"],
    );
    let trend = object(
        json!({
            "month": described("STRING", "Format MMM-YY"),
            "volume": number(),
            "value": number(),
        }),
        &["month", "volume", "value"],
    );
    let partner = object(
        json!({
            "name": string(),
            "type": { "type": "STRING", "enum": ["BUYER", "SUPPLIER", "DISTRIBUTOR"] },
            "location": string(),
            "matchScore": number(),
        }),
        &["name", "type", "location", "matchScore"],
    );
    let commissioner = object(
        json!({
            "name": string(),
            "title": string(),
            "location": string(),
            "email": string(),
            "expertise": array_of(string()),
        }),
        &["name", "title", "location", "email"],
    );
    let duties = object(
        json!({
            "tariffTreatment": string(),
            "rate": string(),
            "programs": array_of(string()),
        }),
        &["tariffTreatment", "rate", "programs"],
    );

    object(
        json!({
            "commodity": string(),
            "hsCode": described("STRING", "The 8-digit HS Code"),
            "hsDescription": described("STRING", "Official HS description"),
            "originCountry": string(),
            "targetCountry": string(),
            "summary": described("STRING", "Executive summary of the trade opportunity/risk"),
            "compliance": array_of(compliance),
            "trends": {
                "type": "ARRAY",
                "description": "12 months of simulated historical data",
                "items": trend,
            },
            "topPartners": {
                "type": "ARRAY",
                "description": "Top 5 trading partner countries for this specific commodity",
                "items": share_row("country", None),
            },
            "provincialData": {
                "type": "ARRAY",
                "description": "Breakdown of trade by Canadian province (top 5)",
                "items": share_row("province", Some("Province Code e.g. ON, BC, QC")),
            },
            "partners": array_of(partner),
            "tradeCommissioners": array_of(commissioner),
            "duties": duties,
        }),
        &REQUIRED_FIELDS,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use ctia_core::fakes::canola_to_malaysia;
    use ctia_core::TradeReport;

    #[test]
    fn test_schema_requires_core_sections() {
        let schema = trade_report_schema();
        let required: Vec<&str> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        assert_eq!(required, REQUIRED_FIELDS.to_vec());
        for field in REQUIRED_FIELDS {
            assert!(schema["properties"][field].is_object(), "{field} missing");
        }
        assert_eq!(
            schema["properties"]["provincialData"]["items"]["properties"]["province"]["description"],
            "Province Code e.g. ON, BC, QC"
        );
    }

    fn required_names(schema: &Value) -> Vec<&str> {
        schema["required"]
            .as_array()
            .map(|names| names.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    /// Walks the canola payload object by object: any key whose removal makes
    /// the core reject the report must be required at the matching schema node.
    #[test]
    fn test_schema_requires_every_field_the_contract_cannot_default() {
        let schema = trade_report_schema();
        let payload = canola_to_malaysia();
        assert!(TradeReport::from_value(payload.clone()).is_ok());

        let nodes: [(Option<&str>, bool); 8] = [
            (None, false),
            (Some("compliance"), true),
            (Some("trends"), true),
            (Some("topPartners"), true),
            (Some("provincialData"), true),
            (Some("partners"), true),
            (Some("tradeCommissioners"), true),
            (Some("duties"), false),
        ];

        for (field, is_array) in nodes {
            let (schema_node, sample) = match (field, is_array) {
                (None, _) => (&schema, &payload),
                (Some(f), true) => (&schema["properties"][f]["items"], &payload[f][0]),
                (Some(f), false) => (&schema["properties"][f], &payload[f]),
            };
            let required = required_names(schema_node);
            let keys: Vec<String> = sample
                .as_object()
                .map(|o| o.keys().cloned().collect())
                .unwrap_or_default();
            assert!(!keys.is_empty(), "{field:?} sample is empty");

            for key in keys {
                assert!(
                    schema_node["properties"][key.as_str()].is_object(),
                    "{field:?}.{key} has no schema property"
                );
                let mut trimmed = payload.clone();
                let target = match (field, is_array) {
                    (None, _) => &mut trimmed,
                    (Some(f), true) => &mut trimmed[f][0],
                    (Some(f), false) => &mut trimmed[f],
                };
                if let Some(obj) = target.as_object_mut() {
                    obj.remove(&key);
                }
                if TradeReport::from_value(trimmed).is_err() {
                    assert!(
                        required.contains(&key.as_str()),
                        "{field:?}.{key} is required by the contract but optional in the schema"
                    );
                }
            }
            for name in &required {
                assert!(
                    schema_node["properties"][*name].is_object(),
                    "{field:?}.{name} is required but not described"
                );
            }
        }
    }

    #[test]
    fn test_optional_contract_fields_stay_optional_in_nested_objects() {
        let schema = trade_report_schema();
        let compliance = required_names(&schema["properties"]["compliance"]["items"]);
        assert!(!compliance.contains(&"sourceUrl"));
        let commissioner = required_names(&schema["properties"]["tradeCommissioners"]["items"]);
        assert!(!commissioner.contains(&"expertise"));
        assert_eq!(
            required_names(&schema["properties"]["duties"]),
            ["tariffTreatment", "rate", "programs"]
        );
    }

    #[test]
    fn test_request_body_shape() {
        let body = serde_json::to_value(GenerateContentRequest::new(
            "be helpful".to_string(),
            "Export canola oil",
            0.4,
        ))
        .unwrap();

        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "be helpful");
        assert!(body["systemInstruction"].get("role").is_none());
        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "Export canola oil");
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(body["generationConfig"]["responseSchema"]["type"], "OBJECT");
        assert!((body["generationConfig"]["temperature"].as_f64().unwrap() - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_response_text_joins_first_candidate_parts() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [
                { "content": { "role": "model", "parts": [{ "text": "{\"a\":" }, { "text": "1}" }] } },
                { "content": { "parts": [{ "text": "ignored" }] } }
            ]
        }))
        .unwrap();
        assert_eq!(response.text().as_deref(), Some("{\"a\":1}"));

        let empty: GenerateContentResponse = serde_json::from_value(json!({})).unwrap();
        assert_eq!(empty.text(), None);

        let blank: GenerateContentResponse =
            serde_json::from_value(json!({ "candidates": [{ "content": { "parts": [{ "text": " " }] } }] }))
                .unwrap();
        assert_eq!(blank.text(), None);
    }

    #[test]
    fn test_error_message_extraction() {
        let body = r#"{"error":{"code":400,"message":"API key not valid.","status":"INVALID_ARGUMENT"}}"#;
        assert_eq!(error_message(body), "INVALID_ARGUMENT: API key not valid.");
        assert_eq!(error_message("  upstream connect error "), "upstream connect error");
    }
}
