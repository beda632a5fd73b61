use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Body of `POST /search`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    #[serde(deserialize_with = "text_or_number")]
    pub bedrooms: String,
    pub location: String,
    #[serde(deserialize_with = "text_or_number")]
    pub min_price: String,
    #[serde(deserialize_with = "text_or_number")]
    pub max_price: String,
}

// Form clients send numbers, scripts tend to send strings
fn text_or_number<'de, D: serde::Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    use serde::de::Error;

    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        other => Err(D::Error::custom(format!("expected string or number, got {other}"))),
    }
}

/// Summary of one finished search, written once to the audit log.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub highest_rank: u32,
    pub apartments: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub average_rent: Option<i64>,
}
