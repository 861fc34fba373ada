// =============================================================================
// Central Application State — Goldcast Forecast Service
// =============================================================================
//
// The single source of truth for the service.  Thread safety:
//   - Atomic counter for lock-free version tracking.
//   - parking_lot::RwLock for all mutable shared collections.
//   - Arc wrappers for shared capabilities (preference store).
// =============================================================================

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use parking_lot::RwLock;
use serde::Serialize;

use crate::forecast::Forecast;
use crate::forecast_log::ForecastEnvelope;
use crate::prefs::PreferenceStore;
use crate::runtime_config::{ModelParams, RuntimeConfig};

/// Maximum number of recent forecasts to retain.
const MAX_RECENT_FORECASTS: usize = 100;

/// Central application state shared across handlers via `Arc<AppState>`.
pub struct AppState {
    /// Monotonically increasing version counter, incremented on every
    /// meaningful state mutation.
    pub state_version: AtomicU64,

    pub runtime_config: Arc<RwLock<RuntimeConfig>>,

    /// Persisted sound preference.
    pub preferences: Arc<dyn PreferenceStore>,

    /// Most recent completed forecast (what the card/speech endpoints use).
    pub last_forecast: RwLock<Option<Forecast>>,

    /// Capped audit trail of prediction requests.
    pub recent_forecasts: RwLock<Vec<ForecastEnvelope>>,

    /// Instant when the service was started. Used for uptime calculations.
    pub start_time: std::time::Instant,
}

impl AppState {
    pub fn new(config: RuntimeConfig, preferences: Arc<dyn PreferenceStore>) -> Self {
        Self {
            state_version: AtomicU64::new(1),
            runtime_config: Arc::new(RwLock::new(config)),
            preferences,
            last_forecast: RwLock::new(None),
            recent_forecasts: RwLock::new(Vec::new()),
            start_time: std::time::Instant::now(),
        }
    }

    // ── Version Management ──────────────────────────────────────────────

    /// Atomically increment the state version. Call this after every
    /// meaningful mutation.
    pub fn increment_version(&self) -> u64 {
        self.state_version.fetch_add(1, Ordering::SeqCst)
    }

    /// Read the current state version without modifying it.
    pub fn current_state_version(&self) -> u64 {
        self.state_version.load(Ordering::SeqCst)
    }

    // ── Forecast Audit ──────────────────────────────────────────────────

    /// Record a forecast envelope. The ring buffer is capped at
    /// [`MAX_RECENT_FORECASTS`]; oldest entries are evicted when the limit
    /// is reached.
    pub fn push_forecast(&self, envelope: ForecastEnvelope) {
        let mut forecasts = self.recent_forecasts.write();
        forecasts.push(envelope);
        while forecasts.len() > MAX_RECENT_FORECASTS {
            forecasts.remove(0);
        }

        self.increment_version();
    }

    // ── Snapshot Builder ────────────────────────────────────────────────

    /// Build a complete, serialisable snapshot of the service state for the
    /// REST `GET /api/v1/state` endpoint.
    pub fn build_snapshot(&self) -> StateSnapshot {
        let config = self.runtime_config.read();

        StateSnapshot {
            state_version: self.current_state_version(),
            server_time: Utc::now().timestamp_millis(),
            market_label: config.market_label.clone(),
            model: config.model.clone(),
            sound_on: self.preferences.sound_on(),
            last_forecast: self.last_forecast.read().clone(),
            recent_forecasts: self.recent_forecasts.read().clone(),
            uptime_secs: self.start_time.elapsed().as_secs(),
        }
    }
}

// =============================================================================
// Serialisable snapshot
// =============================================================================

/// Full service state snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct StateSnapshot {
    pub state_version: u64,
    pub server_time: i64,
    pub market_label: String,
    pub model: ModelParams,
    pub sound_on: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_forecast: Option<Forecast>,

    pub recent_forecasts: Vec<ForecastEnvelope>,
    pub uptime_secs: u64,
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::prefs::JsonPreferenceStore;

    fn test_state(tag: &str) -> AppState {
        let dir = std::env::temp_dir().join(format!("goldcast_state_{tag}"));
        std::fs::create_dir_all(&dir).unwrap();
        let prefs = Arc::new(JsonPreferenceStore::open(dir.join("prefs.json")));
        AppState::new(RuntimeConfig::default(), prefs)
    }

    #[test]
    fn version_increments_on_push() {
        let state = test_state("version");
        let before = state.current_state_version();
        state.push_forecast(ForecastEnvelope::rejected("Chennai", "test"));
        assert_eq!(state.current_state_version(), before + 1);
    }

    #[test]
    fn forecast_ring_is_capped() {
        let state = test_state("cap");
        for i in 0..(MAX_RECENT_FORECASTS + 10) {
            state.push_forecast(ForecastEnvelope::rejected("Chennai", format!("r{i}")));
        }
        let forecasts = state.recent_forecasts.read();
        assert_eq!(forecasts.len(), MAX_RECENT_FORECASTS);
        // Oldest entries were evicted.
        assert_eq!(forecasts[0].reason.as_deref(), Some("r10"));
    }

    #[test]
    fn snapshot_reflects_config_and_preferences() {
        let state = test_state("snapshot");
        let snap = state.build_snapshot();
        assert_eq!(snap.market_label, "Chennai");
        assert!(snap.last_forecast.is_none());
        assert!(snap.recent_forecasts.is_empty());
    }
}
