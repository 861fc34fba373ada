// =============================================================================
// Audio & Speech Feedback — Sentence construction and sound cue selection
// =============================================================================
//
// The service only decides *what* to say and *whether* a cue fires; actual
// playback/synthesis belongs to whichever client consumes the API response.
// =============================================================================

use serde::Serialize;

use crate::forecast::Forecast;
use crate::types::Verdict;

/// Audio cue a client may play alongside the verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SoundCue {
    Ding,
}

/// Build the spoken announcement for a forecast.
pub fn verdict_sentence(market_label: &str, forecast: &Forecast) -> String {
    format!(
        "Tomorrow in {}, gold is likely to {}. Confidence around {} percent. \
         Predicted one gram price is {} rupees.",
        market_label,
        forecast.verdict.verb_phrase(),
        forecast.confidence_pct,
        forecast.projected_price_per_gram.round() as i64,
    )
}

/// The ding only fires on a Rise verdict, and only when sound is enabled.
pub fn sound_cue(verdict: Verdict, sound_on: bool) -> Option<SoundCue> {
    if sound_on && verdict == Verdict::Rise {
        Some(SoundCue::Ding)
    } else {
        None
    }
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::forecast::{MarketReading, Predictor};

    fn rise_forecast() -> Forecast {
        let r = MarketReading {
            gold_usd_early: 2400.0,
            gold_usd_late: 2410.0,
            usd_inr_early: 83.0,
            usd_inr_late: 83.0,
            us10y_early: 4.20,
            us10y_late: 4.20,
        };
        Predictor::default().forecast(&r, Some(7450.0)).unwrap()
    }

    #[test]
    fn sentence_mentions_market_verdict_confidence_and_price() {
        let f = rise_forecast();
        let line = verdict_sentence("Chennai", &f);
        assert_eq!(
            line,
            "Tomorrow in Chennai, gold is likely to rise. Confidence around 53 percent. \
             Predicted one gram price is 7467 rupees."
        );
    }

    #[test]
    fn ding_only_for_rise_with_sound_on() {
        assert_eq!(sound_cue(Verdict::Rise, true), Some(SoundCue::Ding));
        assert_eq!(sound_cue(Verdict::Rise, false), None);
        assert_eq!(sound_cue(Verdict::Dip, true), None);
        assert_eq!(sound_cue(Verdict::Flat, true), None);
    }

    #[test]
    fn sound_cue_serialises_lowercase() {
        assert_eq!(serde_json::to_string(&SoundCue::Ding).unwrap(), "\"ding\"");
    }
}
