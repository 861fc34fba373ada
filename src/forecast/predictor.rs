// =============================================================================
// Predictor — Weighted three-signal gold trend forecast
// =============================================================================
//
// Pure and synchronous: six quotes in, one Forecast out.  No I/O, no shared
// state.  The weighting is
//
//   predicted_pct = 0.55*Δ(XAU/USD) - 0.25*Δ(USD/INR) - 0.20*Δ(US10Y)
//
// FX and the 10Y yield act inversely to gold, hence the subtraction.  The
// verdict is Rise/Dip/Flat against a ±0.10% dead-zone, and confidence is a
// clamped linear heuristic with an agreement bonus.
// =============================================================================

use serde::{Deserialize, Serialize};

use crate::runtime_config::ModelParams;
use crate::types::Verdict;

/// Grams per troy ounce, used to derive a per-gram rupee price from XAU/USD.
pub const GRAMS_PER_TROY_OUNCE: f64 = 31.1034768;

// =============================================================================
// Inputs
// =============================================================================

/// Six manually entered quotes: each series at 17:30 and 23:00 IST.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MarketReading {
    /// XAU/USD (USD per troy ounce) at 17:30.
    pub gold_usd_early: f64,
    /// XAU/USD at 23:00.
    pub gold_usd_late: f64,
    /// USD/INR at 17:30.
    pub usd_inr_early: f64,
    /// USD/INR at 23:00.
    pub usd_inr_late: f64,
    /// US 10-year treasury yield at 17:30.
    pub us10y_early: f64,
    /// US 10-year treasury yield at 23:00.
    pub us10y_late: f64,
}

impl MarketReading {
    /// Reject any reading that is non-finite or non-positive before the model
    /// sees it.  The error names the first offending field.
    pub fn validate(&self) -> Result<(), InvalidInput> {
        let fields = [
            ("gold_usd_early", self.gold_usd_early),
            ("gold_usd_late", self.gold_usd_late),
            ("usd_inr_early", self.usd_inr_early),
            ("usd_inr_late", self.usd_inr_late),
            ("us10y_early", self.us10y_early),
            ("us10y_late", self.us10y_late),
        ];
        for (name, value) in fields {
            if !value.is_finite() || value <= 0.0 {
                return Err(InvalidInput { field: name, value });
            }
        }
        Ok(())
    }
}

// =============================================================================
// Outputs
// =============================================================================

/// Percentage change of each underlying quote between the two reading times.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ComponentDeltas {
    pub gold_delta_pct: f64,
    pub fx_delta_pct: f64,
    pub yield_delta_pct: f64,
}

/// Structured result of one prediction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Forecast {
    /// Weighted combined percentage change.
    pub predicted_pct_change: f64,
    /// Rise / Dip / Flat classification.
    pub verdict: Verdict,
    /// Clamped integer confidence in [floor, ceiling] (default [35, 92]).
    pub confidence_pct: u8,
    /// The three component deltas behind the combined signal.
    pub deltas: ComponentDeltas,
    /// Rupee price per gram the projection is based on (override or derived).
    pub base_price_per_gram: f64,
    /// Expected rupee move per gram.
    pub delta_per_gram: f64,
    /// Projected rupee price per gram for tomorrow.
    pub projected_price_per_gram: f64,
}

// =============================================================================
// Error
// =============================================================================

/// A required reading was missing, non-numeric, or non-positive.
#[derive(Debug, Clone, PartialEq)]
pub struct InvalidInput {
    pub field: &'static str,
    pub value: f64,
}

impl std::fmt::Display for InvalidInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid reading for {}: {} (must be a positive number)",
            self.field, self.value
        )
    }
}

impl std::error::Error for InvalidInput {}

// =============================================================================
// Predictor
// =============================================================================

/// The forecast engine.  Holds the model constants; everything else is passed
/// per call.
pub struct Predictor {
    params: ModelParams,
}

impl Predictor {
    pub fn new(params: ModelParams) -> Self {
        Self { params }
    }

    /// Run the full pipeline: validate, combine, classify, score, project.
    ///
    /// `override_price_per_gram` is today's known local 1g price; when absent
    /// or non-positive the base price is derived from the 23:00 quotes.
    pub fn forecast(
        &self,
        reading: &MarketReading,
        override_price_per_gram: Option<f64>,
    ) -> Result<Forecast, InvalidInput> {
        reading.validate()?;

        let deltas = ComponentDeltas {
            gold_delta_pct: pct_delta(reading.gold_usd_early, reading.gold_usd_late),
            fx_delta_pct: pct_delta(reading.usd_inr_early, reading.usd_inr_late),
            yield_delta_pct: pct_delta(reading.us10y_early, reading.us10y_late),
        };

        let predicted_pct_change = self.params.gold_weight * deltas.gold_delta_pct
            - self.params.fx_weight * deltas.fx_delta_pct
            - self.params.yield_weight * deltas.yield_delta_pct;

        let verdict = self.classify(predicted_pct_change);
        let bonus = self.agreement_bonus(&deltas, predicted_pct_change);
        let confidence_pct = self.confidence(predicted_pct_change.abs(), bonus);

        // Derived base: convert the 23:00 ounce price to rupees, then to grams.
        let derived_base =
            reading.gold_usd_late * reading.usd_inr_late / GRAMS_PER_TROY_OUNCE;
        let base_price_per_gram = match override_price_per_gram {
            Some(p) if p.is_finite() && p > 0.0 => p,
            _ => derived_base,
        };

        let delta_per_gram = base_price_per_gram * (predicted_pct_change / 100.0);
        let projected_price_per_gram =
            base_price_per_gram * (1.0 + predicted_pct_change / 100.0);

        Ok(Forecast {
            predicted_pct_change,
            verdict,
            confidence_pct,
            deltas,
            base_price_per_gram,
            delta_per_gram,
            projected_price_per_gram,
        })
    }

    /// Classify the combined signal against the dead-zone.
    fn classify(&self, predicted_pct: f64) -> Verdict {
        if predicted_pct > self.params.flat_band_pct {
            Verdict::Rise
        } else if predicted_pct < -self.params.flat_band_pct {
            Verdict::Dip
        } else {
            Verdict::Flat
        }
    }

    /// Count how many component signals point the same way as the combined
    /// signal (FX and 10Y sign-inverted) and turn the count into a bonus.
    ///
    /// A zero component delta counts against agreement, and a zero combined
    /// signal matches nothing, so a fully flat reading lands at -bonus.
    fn agreement_bonus(&self, deltas: &ComponentDeltas, predicted_pct: f64) -> f64 {
        let dir = if predicted_pct > 0.0 {
            1
        } else if predicted_pct < 0.0 {
            -1
        } else {
            0
        };

        let mut agree = 0;
        if (if deltas.gold_delta_pct > 0.0 { 1 } else { -1 }) == dir {
            agree += 1;
        }
        // FX inverted: a weakening dollar supports local gold.
        if (if deltas.fx_delta_pct < 0.0 { 1 } else { -1 }) == dir {
            agree += 1;
        }
        // 10Y inverted: falling yields support gold.
        if (if deltas.yield_delta_pct < 0.0 { 1 } else { -1 }) == dir {
            agree += 1;
        }

        if agree >= 2 {
            self.params.agreement_bonus
        } else if agree == 0 {
            -self.params.agreement_bonus
        } else {
            0.0
        }
    }

    /// Linear confidence heuristic, clamped and rounded to an integer.
    ///
    /// The bounds may arrive misordered from a hand-edited config; clamp on
    /// the ordered pair rather than panicking.
    fn confidence(&self, abs_pct: f64, bonus: f64) -> u8 {
        let raw = self.params.confidence_base + abs_pct * self.params.confidence_slope + bonus;
        let lo = self.params.confidence_floor.min(self.params.confidence_ceiling);
        let hi = self.params.confidence_floor.max(self.params.confidence_ceiling);
        raw.clamp(lo, hi).round() as u8
    }
}

impl Default for Predictor {
    fn default() -> Self {
        Self::new(ModelParams::default())
    }
}

/// Percentage change from `early` to `late`.
fn pct_delta(early: f64, late: f64) -> f64 {
    (late - early) / early * 100.0
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    fn reading(
        gold_early: f64,
        gold_late: f64,
        fx_early: f64,
        fx_late: f64,
        y_early: f64,
        y_late: f64,
    ) -> MarketReading {
        MarketReading {
            gold_usd_early: gold_early,
            gold_usd_late: gold_late,
            usd_inr_early: fx_early,
            usd_inr_late: fx_late,
            us10y_early: y_early,
            us10y_late: y_late,
        }
    }

    #[test]
    fn gold_up_fx_flat_yield_flat_is_rise() {
        let p = Predictor::default();
        let r = reading(2400.0, 2410.0, 83.0, 83.0, 4.20, 4.20);
        let f = p.forecast(&r, None).unwrap();

        assert!((f.deltas.gold_delta_pct - 0.4167).abs() < 1e-3);
        assert!((f.predicted_pct_change - 0.229).abs() < 1e-3);
        assert_eq!(f.verdict, Verdict::Rise);
        // Only gold agrees (flat FX/10Y count against), so no bonus applies:
        // round(40 + 0.229167*55) = 53.
        assert_eq!(f.confidence_pct, 53);
    }

    #[test]
    fn moves_inside_dead_zone_are_flat() {
        let p = Predictor::default();
        // Tiny gold move: 0.55 * 0.1% = 0.055% combined, inside ±0.10.
        let r = reading(2400.0, 2402.4, 83.0, 83.0, 4.20, 4.20);
        let f = p.forecast(&r, None).unwrap();
        assert!(f.predicted_pct_change.abs() <= 0.10);
        assert_eq!(f.verdict, Verdict::Flat);
    }

    #[test]
    fn combined_drop_is_dip() {
        let p = Predictor::default();
        let r = reading(2400.0, 2380.0, 83.0, 83.4, 4.20, 4.30);
        let f = p.forecast(&r, None).unwrap();
        assert!(f.predicted_pct_change < -0.10);
        assert_eq!(f.verdict, Verdict::Dip);
    }

    #[test]
    fn confidence_stays_in_bounds() {
        let p = Predictor::default();
        // Extreme move saturates the ceiling.
        let r = reading(2000.0, 2400.0, 83.0, 83.0, 4.20, 4.20);
        let f = p.forecast(&r, None).unwrap();
        assert_eq!(f.confidence_pct, 92);

        // Fully flat reading lands at the floor (zero agreement, -5 bonus).
        let r = reading(2400.0, 2400.0, 83.0, 83.0, 4.20, 4.20);
        let f = p.forecast(&r, None).unwrap();
        assert_eq!(f.confidence_pct, 35);
        assert_eq!(f.verdict, Verdict::Flat);
    }

    #[test]
    fn full_agreement_adds_exactly_the_bonus() {
        let p = Predictor::default();
        // Gold up, dollar weakening, yield falling: all three agree with Rise.
        let r = reading(2400.0, 2410.0, 83.0, 82.9, 4.20, 4.18);
        let f = p.forecast(&r, None).unwrap();

        let expected_no_bonus = 40.0 + f.predicted_pct_change.abs() * 55.0;
        let expected = (expected_no_bonus + 5.0).clamp(35.0, 92.0).round() as u8;
        assert_eq!(f.confidence_pct, expected);
        // And it is exactly 5 above what the bonus-free formula gives.
        assert_eq!(
            f.confidence_pct as f64 - expected_no_bonus.round(),
            5.0
        );
    }

    #[test]
    fn zero_agreement_subtracts_exactly_the_bonus() {
        let p = Predictor::default();
        // All deltas zero: combined signal is zero, nothing can agree.
        let r = reading(2400.0, 2400.0, 83.0, 83.0, 4.20, 4.20);
        let f = p.forecast(&r, None).unwrap();
        // 40 - 5 = 35, coinciding with the floor.
        assert_eq!(f.confidence_pct, 35);
    }

    #[test]
    fn positive_override_drives_the_projection() {
        let p = Predictor::default();
        let r = reading(2400.0, 2410.0, 83.0, 83.0, 4.20, 4.20);
        let f = p.forecast(&r, Some(7450.0)).unwrap();

        assert!((f.base_price_per_gram - 7450.0).abs() < 1e-9);
        let expected = 7450.0 * (1.0 + f.predicted_pct_change / 100.0);
        assert!((f.projected_price_per_gram - expected).abs() < 1e-9);
        let expected_delta = 7450.0 * f.predicted_pct_change / 100.0;
        assert!((f.delta_per_gram - expected_delta).abs() < 1e-9);
    }

    #[test]
    fn missing_or_nonpositive_override_falls_back_to_derived_base() {
        let p = Predictor::default();
        let r = reading(2400.0, 2410.0, 83.0, 83.0, 4.20, 4.20);
        let derived = 2410.0 * 83.0 / GRAMS_PER_TROY_OUNCE;

        for override_price in [None, Some(0.0), Some(-1.0), Some(f64::NAN)] {
            let f = p.forecast(&r, override_price).unwrap();
            assert!((f.base_price_per_gram - derived).abs() < 1e-9);
            let expected = derived * (1.0 + f.predicted_pct_change / 100.0);
            assert!((f.projected_price_per_gram - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn invalid_readings_are_rejected_before_any_output() {
        let p = Predictor::default();
        let good = reading(2400.0, 2410.0, 83.0, 83.0, 4.20, 4.20);

        let cases: [(&str, MarketReading); 4] = [
            ("gold_usd_early", MarketReading { gold_usd_early: 0.0, ..good }),
            ("gold_usd_late", MarketReading { gold_usd_late: -5.0, ..good }),
            ("usd_inr_late", MarketReading { usd_inr_late: f64::NAN, ..good }),
            ("us10y_early", MarketReading { us10y_early: f64::INFINITY, ..good }),
        ];

        for (field, r) in cases {
            let err = p.forecast(&r, None).unwrap_err();
            assert_eq!(err.field, field);
        }
    }

    #[test]
    fn misordered_confidence_bounds_do_not_panic() {
        let mut params = ModelParams::default();
        params.confidence_floor = 95.0; // above the 92 ceiling
        let p = Predictor::new(params);

        let r = reading(2400.0, 2410.0, 83.0, 83.0, 4.20, 4.20);
        let f = p.forecast(&r, None).unwrap();
        assert!((92..=95).contains(&f.confidence_pct));
    }

    #[test]
    fn confidence_is_integer_in_bounds_across_a_grid() {
        let p = Predictor::default();
        for gold_late in [2300.0, 2395.0, 2400.0, 2405.0, 2500.0] {
            for fx_late in [82.0, 83.0, 84.0] {
                for y_late in [4.0, 4.2, 4.4] {
                    let r = reading(2400.0, gold_late, 83.0, fx_late, 4.20, y_late);
                    let f = p.forecast(&r, None).unwrap();
                    assert!((35..=92).contains(&f.confidence_pct));
                }
            }
        }
    }
}
