// =============================================================================
// Forecast Envelope — Auditable record of every prediction request
// =============================================================================
//
// Each predict call (accepted or rejected) is wrapped in an envelope so the
// recent history exposed over the API can be audited after the fact.
// =============================================================================

use serde::Serialize;

use crate::forecast::Forecast;

/// Auditable record of one prediction request.
#[derive(Debug, Clone, Serialize)]
pub struct ForecastEnvelope {
    /// Unique identifier for this forecast (UUID v4).
    pub id: String,

    /// Market the forecast was phrased for.
    pub market: String,

    /// "OK" or "REJECTED".
    pub outcome: String,

    /// Verdict text when the forecast completed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verdict: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub predicted_pct_change: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence_pct: Option<u8>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub projected_price_per_gram: Option<f64>,

    /// Why the request was rejected (if it was).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    /// ISO 8601 timestamp of when this envelope was created.
    pub created_at: String,
}

impl ForecastEnvelope {
    /// Record a completed forecast.
    pub fn completed(market: impl Into<String>, forecast: &Forecast) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            market: market.into(),
            outcome: "OK".to_string(),
            verdict: Some(forecast.verdict.to_string()),
            predicted_pct_change: Some(forecast.predicted_pct_change),
            confidence_pct: Some(forecast.confidence_pct),
            projected_price_per_gram: Some(forecast.projected_price_per_gram),
            reason: None,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Record a rejected request.
    pub fn rejected(market: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            market: market.into(),
            outcome: "REJECTED".to_string(),
            verdict: None,
            predicted_pct_change: None,
            confidence_pct: None,
            projected_price_per_gram: None,
            reason: Some(reason.into()),
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}
