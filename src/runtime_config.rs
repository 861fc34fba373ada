// =============================================================================
// Runtime Configuration — Persisted service settings with atomic save
// =============================================================================
//
// Central configuration for the Goldcast service.  The model constants are
// empirically tuned; they are exposed here so they can be adjusted without a
// rebuild, but the defaults are the canonical values.
//
// Persistence uses an atomic tmp + rename pattern to prevent corruption on
// crash.  All fields carry `#[serde(default)]` so that adding new fields
// never breaks loading an older config file.
//
// =============================================================================

use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_market_label() -> String {
    "Chennai".to_string()
}

fn default_share_dir() -> String {
    "shared".to_string()
}

fn default_predict_delay_ms() -> u64 {
    450
}

fn default_gold_weight() -> f64 {
    0.55
}

fn default_fx_weight() -> f64 {
    0.25
}

fn default_yield_weight() -> f64 {
    0.20
}

fn default_flat_band_pct() -> f64 {
    0.10
}

fn default_confidence_base() -> f64 {
    40.0
}

fn default_confidence_slope() -> f64 {
    55.0
}

fn default_confidence_floor() -> f64 {
    35.0
}

fn default_confidence_ceiling() -> f64 {
    92.0
}

fn default_agreement_bonus() -> f64 {
    5.0
}

// =============================================================================
// ModelParams
// =============================================================================

/// Tunable constants for the weighted forecast model.
///
/// The defaults are the tuned values; there is no derivation behind them
/// beyond empirical fit, so treat them as data, not as something to re-fit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelParams {
    /// Weight on the XAU/USD percentage delta (gold moves with gold).
    #[serde(default = "default_gold_weight")]
    pub gold_weight: f64,

    /// Weight on the USD/INR percentage delta (subtracted: a strengthening
    /// dollar pressures local gold).
    #[serde(default = "default_fx_weight")]
    pub fx_weight: f64,

    /// Weight on the US10Y percentage delta (subtracted: rising yields make
    /// gold less attractive).
    #[serde(default = "default_yield_weight")]
    pub yield_weight: f64,

    /// Dead-zone half-width in percent. Combined moves inside ±this band are
    /// classified Flat to absorb noise.
    #[serde(default = "default_flat_band_pct")]
    pub flat_band_pct: f64,

    /// Confidence intercept.
    #[serde(default = "default_confidence_base")]
    pub confidence_base: f64,

    /// Confidence points per absolute percent of predicted move.
    #[serde(default = "default_confidence_slope")]
    pub confidence_slope: f64,

    /// Lower clamp for confidence.
    #[serde(default = "default_confidence_floor")]
    pub confidence_floor: f64,

    /// Upper clamp for confidence.
    #[serde(default = "default_confidence_ceiling")]
    pub confidence_ceiling: f64,

    /// Confidence adjustment when component signals agree (+) or none do (-).
    #[serde(default = "default_agreement_bonus")]
    pub agreement_bonus: f64,
}

impl Default for ModelParams {
    fn default() -> Self {
        Self {
            gold_weight: default_gold_weight(),
            fx_weight: default_fx_weight(),
            yield_weight: default_yield_weight(),
            flat_band_pct: default_flat_band_pct(),
            confidence_base: default_confidence_base(),
            confidence_slope: default_confidence_slope(),
            confidence_floor: default_confidence_floor(),
            confidence_ceiling: default_confidence_ceiling(),
            agreement_bonus: default_agreement_bonus(),
        }
    }
}

impl ModelParams {
    /// Check that every constant is finite and the confidence clamp is
    /// well-ordered.  Callers must reject a parameter set that fails this
    /// before it reaches the predictor or the config file.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("gold_weight", self.gold_weight),
            ("fx_weight", self.fx_weight),
            ("yield_weight", self.yield_weight),
            ("flat_band_pct", self.flat_band_pct),
            ("confidence_base", self.confidence_base),
            ("confidence_slope", self.confidence_slope),
            ("confidence_floor", self.confidence_floor),
            ("confidence_ceiling", self.confidence_ceiling),
            ("agreement_bonus", self.agreement_bonus),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                bail!("{name} must be a finite number, got {value}");
            }
        }
        if self.confidence_floor > self.confidence_ceiling {
            bail!(
                "confidence_floor ({}) must not exceed confidence_ceiling ({})",
                self.confidence_floor,
                self.confidence_ceiling
            );
        }
        Ok(())
    }
}

// =============================================================================
// RuntimeConfig
// =============================================================================

/// Top-level runtime configuration for the Goldcast service.
///
/// Every field has a serde default so that older JSON files missing new fields
/// will still deserialise correctly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Local market the forecast is phrased for (card title, speech line).
    #[serde(default = "default_market_label")]
    pub market_label: String,

    /// Directory where shared/downloaded verdict cards are written.
    #[serde(default = "default_share_dir")]
    pub share_dir: String,

    /// Artificial "processing" delay applied before a predict response.
    /// Purely cosmetic; set to 0 to disable.
    #[serde(default = "default_predict_delay_ms")]
    pub predict_delay_ms: u64,

    /// Tunable model constants (weights, dead-zone, confidence shape).
    #[serde(default)]
    pub model: ModelParams,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            market_label: default_market_label(),
            share_dir: default_share_dir(),
            predict_delay_ms: default_predict_delay_ms(),
            model: ModelParams::default(),
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from a JSON file at `path`.
    ///
    /// If the file does not exist, returns an error so the caller can fall
    /// back to defaults with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read runtime config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse runtime config from {}", path.display()))?;

        config
            .model
            .validate()
            .with_context(|| format!("invalid model params in {}", path.display()))?;

        info!(
            path = %path.display(),
            market = %config.market_label,
            "runtime config loaded"
        );

        Ok(config)
    }

    /// Persist the current configuration to `path` using an atomic write
    /// (write to `.tmp`, then rename).
    ///
    /// This prevents corruption if the process crashes mid-write.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        let content = serde_json::to_string_pretty(self)
            .context("failed to serialise runtime config to JSON")?;

        // Atomic write: write to a temporary sibling file, then rename.
        let tmp_path = path.with_extension("json.tmp");

        std::fs::write(&tmp_path, &content)
            .with_context(|| format!("failed to write tmp config to {}", tmp_path.display()))?;

        std::fs::rename(&tmp_path, path)
            .with_context(|| format!("failed to rename tmp config to {}", path.display()))?;

        info!(path = %path.display(), "runtime config saved (atomic)");
        Ok(())
    }
}
