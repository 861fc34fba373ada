// =============================================================================
// REST API Endpoints — Axum 0.7
// =============================================================================
//
// All endpoints live under `/api/v1/`. This is a local-first tool, so every
// endpoint is public; CORS is configured permissively so a browser dashboard
// on another port can talk to it.
// =============================================================================

use std::sync::Arc;

use axum::{
    extract::{Json, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use crate::app_state::AppState;
use crate::feedback::{self, SoundCue};
use crate::forecast::{Forecast, MarketReading, Predictor};
use crate::forecast_log::ForecastEnvelope;
use crate::render::{Renderer, TextCardRenderer};
use crate::share::{FileShareTarget, ShareTarget};

// =============================================================================
// Router construction
// =============================================================================

/// Build the full REST API router with CORS middleware and shared state.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/predict", post(predict))
        .route("/api/v1/forecasts", get(forecasts))
        .route("/api/v1/state", get(full_state))
        .route("/api/v1/share", post(share_card))
        .route("/api/v1/model-params", get(get_model_params))
        .route("/api/v1/model-params", post(set_model_params))
        .route("/api/v1/preferences/sound", get(get_sound))
        .route("/api/v1/preferences/sound", post(set_sound))
        .layer(cors)
        .with_state(state)
}

// =============================================================================
// Health
// =============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    state_version: u64,
    server_time: i64,
}

async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let resp = HealthResponse {
        status: "ok",
        state_version: state.current_state_version(),
        server_time: chrono::Utc::now().timestamp_millis(),
    };
    Json(resp)
}

// =============================================================================
// Predict
// =============================================================================

#[derive(Debug, Deserialize)]
struct PredictRequest {
    gold_usd_early: f64,
    gold_usd_late: f64,
    usd_inr_early: f64,
    usd_inr_late: f64,
    us10y_early: f64,
    us10y_late: f64,
    /// Today's known local 1g price, if the user has one.
    #[serde(default)]
    today_price_per_gram: Option<f64>,
}

#[derive(Serialize)]
struct PredictResponse {
    forecast: Forecast,
    card: String,
    speech: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    sound: Option<SoundCue>,
}

async fn predict(
    State(state): State<Arc<AppState>>,
    Json(req): Json<PredictRequest>,
) -> Result<impl IntoResponse, (StatusCode, Json<serde_json::Value>)> {
    let (model, market_label, delay_ms) = {
        let config = state.runtime_config.read();
        (
            config.model.clone(),
            config.market_label.clone(),
            config.predict_delay_ms,
        )
    };

    let reading = MarketReading {
        gold_usd_early: req.gold_usd_early,
        gold_usd_late: req.gold_usd_late,
        usd_inr_early: req.usd_inr_early,
        usd_inr_late: req.usd_inr_late,
        us10y_early: req.us10y_early,
        us10y_late: req.us10y_late,
    };

    let forecast = match Predictor::new(model).forecast(&reading, req.today_price_per_gram) {
        Ok(f) => f,
        Err(e) => {
            warn!(error = %e, "prediction rejected");
            state.push_forecast(ForecastEnvelope::rejected(&market_label, e.to_string()));
            return Err((
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({ "error": e.to_string() })),
            ));
        }
    };

    // Cosmetic "processing" pause; only a successful computation gets it,
    // invalid input is answered immediately.
    if delay_ms > 0 {
        tokio::time::sleep(tokio::time::Duration::from_millis(delay_ms)).await;
    }

    let card = TextCardRenderer.render(&market_label, &forecast);
    let speech = feedback::verdict_sentence(&market_label, &forecast);
    let sound = feedback::sound_cue(forecast.verdict, state.preferences.sound_on());

    info!(
        market = %market_label,
        verdict = %forecast.verdict,
        confidence = forecast.confidence_pct,
        predicted_pct = forecast.predicted_pct_change,
        projected_1g = forecast.projected_price_per_gram,
        "forecast generated"
    );

    state.push_forecast(ForecastEnvelope::completed(&market_label, &forecast));
    *state.last_forecast.write() = Some(forecast.clone());
    state.increment_version();

    Ok(Json(PredictResponse {
        forecast,
        card,
        speech,
        sound,
    }))
}

// =============================================================================
// Forecast history & state
// =============================================================================

async fn forecasts(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let recent = state.recent_forecasts.read().clone();
    Json(recent)
}

async fn full_state(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.build_snapshot())
}

// =============================================================================
// Share (download fallback: write the card into the share directory)
// =============================================================================

async fn share_card(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, Json<serde_json::Value>)> {
    let forecast = state.last_forecast.read().clone().ok_or((
        StatusCode::CONFLICT,
        Json(serde_json::json!({ "error": "Run a prediction first." })),
    ))?;

    let (market_label, share_dir) = {
        let config = state.runtime_config.read();
        (config.market_label.clone(), config.share_dir.clone())
    };

    let card = TextCardRenderer.render(&market_label, &forecast);
    let target = FileShareTarget::new(share_dir);
    match target.share("gold-prediction", &card) {
        Ok(path) => Ok(Json(serde_json::json!({
            "shared": true,
            "path": path.display().to_string(),
        }))),
        Err(e) => {
            // Degraded path: report failure without failing the request.
            warn!(error = %e, "share failed");
            Ok(Json(serde_json::json!({
                "shared": false,
                "error": e.to_string(),
            })))
        }
    }
}

// =============================================================================
// Model parameters
// =============================================================================

async fn get_model_params(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let config = state.runtime_config.read();
    Json(config.model.clone())
}

#[derive(Deserialize)]
struct ModelParamsUpdate {
    #[serde(default)]
    gold_weight: Option<f64>,
    #[serde(default)]
    fx_weight: Option<f64>,
    #[serde(default)]
    yield_weight: Option<f64>,
    #[serde(default)]
    flat_band_pct: Option<f64>,
    #[serde(default)]
    confidence_base: Option<f64>,
    #[serde(default)]
    confidence_slope: Option<f64>,
    #[serde(default)]
    confidence_floor: Option<f64>,
    #[serde(default)]
    confidence_ceiling: Option<f64>,
    #[serde(default)]
    agreement_bonus: Option<f64>,
}

async fn set_model_params(
    State(state): State<Arc<AppState>>,
    Json(update): Json<ModelParamsUpdate>,
) -> Result<impl IntoResponse, (StatusCode, Json<serde_json::Value>)> {
    // Apply the partial update to a scratch copy first; nothing touches the
    // live config until the result validates.
    let mut model = state.runtime_config.read().model.clone();
    let mut changes = Vec::new();

    macro_rules! apply_param {
        ($field:ident) => {
            if let Some(val) = update.$field {
                if (model.$field - val).abs() > f64::EPSILON {
                    changes.push(format!(
                        "{}: {} -> {}",
                        stringify!($field),
                        model.$field,
                        val
                    ));
                    model.$field = val;
                }
            }
        };
    }

    apply_param!(gold_weight);
    apply_param!(fx_weight);
    apply_param!(yield_weight);
    apply_param!(flat_band_pct);
    apply_param!(confidence_base);
    apply_param!(confidence_slope);
    apply_param!(confidence_floor);
    apply_param!(confidence_ceiling);
    apply_param!(agreement_bonus);

    if let Err(e) = model.validate() {
        warn!(error = %e, "model params update rejected");
        return Err((
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": e.to_string() })),
        ));
    }

    if !changes.is_empty() {
        info!(changes = ?changes, "model params updated");

        let config_clone = {
            let mut config = state.runtime_config.write();
            config.model = model.clone();
            config.clone()
        };

        // Save to disk (best-effort).
        if let Err(e) = config_clone.save("goldcast_config.json") {
            warn!(error = %e, "failed to save model params to disk");
        }

        state.increment_version();
    }

    Ok(Json(serde_json::json!({
        "model": model,
        "changes": changes,
    })))
}

// =============================================================================
// Sound preference
// =============================================================================

#[derive(Deserialize)]
struct SoundUpdate {
    sound_on: bool,
}

async fn get_sound(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(serde_json::json!({ "sound_on": state.preferences.sound_on() }))
}

async fn set_sound(
    State(state): State<Arc<AppState>>,
    Json(update): Json<SoundUpdate>,
) -> impl IntoResponse {
    if let Err(e) = state.preferences.set_sound_on(update.sound_on) {
        warn!(error = %e, "failed to persist sound preference");
    }
    state.increment_version();
    info!(sound_on = update.sound_on, "sound preference changed");

    Json(serde_json::json!({ "sound_on": update.sound_on }))
}
