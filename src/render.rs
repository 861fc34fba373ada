// =============================================================================
// Verdict Card Rendering — Rupee/percent formatting and the text card
// =============================================================================
//
// All display concerns live here, behind the `Renderer` trait; the forecast
// core never formats anything.  Rupee amounts use Indian digit grouping with
// zero decimal places (₹7,45,230), percentages carry an explicit sign.
// =============================================================================

use crate::forecast::Forecast;
use crate::types::Verdict;

/// Renders a forecast into a presentable card.
pub trait Renderer: Send + Sync {
    fn render(&self, market_label: &str, forecast: &Forecast) -> String;
}

// =============================================================================
// Formatting helpers
// =============================================================================

/// Format a percentage with an explicit leading `+` for positive values.
pub fn fmt_signed_pct(x: f64) -> String {
    if x > 0.0 {
        format!("+{:.2}%", x)
    } else {
        format!("{:.2}%", x)
    }
}

/// Format a rupee amount with Indian digit grouping and no decimals.
///
/// Grouping is 3 digits, then 2s: 745230 -> "₹7,45,230".
pub fn format_inr(amount: f64) -> String {
    let rounded = amount.round() as i64;
    let sign = if rounded < 0 { "-" } else { "" };
    let digits = rounded.abs().to_string();

    let grouped = if digits.len() <= 3 {
        digits
    } else {
        let (head, tail) = digits.split_at(digits.len() - 3);
        let mut parts = Vec::new();
        let head_bytes = head.as_bytes();
        let mut i = head_bytes.len();
        while i > 2 {
            parts.push(&head[i - 2..i]);
            i -= 2;
        }
        parts.push(&head[..i]);
        parts.reverse();
        format!("{},{}", parts.join(","), tail)
    };

    format!("{}₹{}", sign, grouped)
}

/// Emoji palette shown on the card for each verdict.
pub fn verdict_emojis(verdict: Verdict) -> &'static [&'static str] {
    match verdict {
        Verdict::Rise => &["💹", "📈", "✨", "💎"],
        Verdict::Dip => &["📉", "💨", "🧊", "⚠️"],
        Verdict::Flat => &["➖", "🔔", "🌙", "✨"],
    }
}

// =============================================================================
// Text card renderer
// =============================================================================

/// Plain-text verdict card.
pub struct TextCardRenderer;

impl Renderer for TextCardRenderer {
    fn render(&self, market_label: &str, forecast: &Forecast) -> String {
        let emojis = verdict_emojis(forecast.verdict).join(" ");
        format!(
            "Gold Forecast — {market}\n\
             Verdict: {verdict} {emojis}\n\
             Confidence ~ {conf}%\n\
             Change: {pct}\n\
             Per-gram move: {delta}\n\
             Predicted 1g price: {price}\n\
             Weighted model: 0.55×Δ(XAU/USD) − 0.25×Δ(USD/INR) − 0.20×Δ(US10Y)\n\
             Signals → XAU {gold}, USD/INR {fx} (inv), US10Y {y10} (inv)",
            market = market_label,
            verdict = forecast.verdict.to_string().to_uppercase(),
            emojis = emojis,
            conf = forecast.confidence_pct,
            pct = fmt_signed_pct(forecast.predicted_pct_change),
            delta = format_inr(forecast.delta_per_gram),
            price = format_inr(forecast.projected_price_per_gram),
            gold = fmt_signed_pct(forecast.deltas.gold_delta_pct),
            fx = fmt_signed_pct(forecast.deltas.fx_delta_pct),
            y10 = fmt_signed_pct(forecast.deltas.yield_delta_pct),
        )
    }
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use crate::forecast::{MarketReading, Predictor};

    #[test]
    fn signed_pct_formatting() {
        assert_eq!(fmt_signed_pct(0.229), "+0.23%");
        assert_eq!(fmt_signed_pct(-0.141), "-0.14%");
        assert_eq!(fmt_signed_pct(0.0), "0.00%");
    }

    #[test]
    fn inr_uses_indian_grouping() {
        assert_eq!(format_inr(0.4), "₹0");
        assert_eq!(format_inr(999.0), "₹999");
        assert_eq!(format_inr(7450.0), "₹7,450");
        assert_eq!(format_inr(74500.0), "₹74,500");
        assert_eq!(format_inr(745230.0), "₹7,45,230");
        assert_eq!(format_inr(17452300.0), "₹1,74,52,300");
        assert_eq!(format_inr(-7450.0), "-₹7,450");
    }

    #[test]
    fn inr_rounds_to_whole_rupees() {
        assert_eq!(format_inr(7449.6), "₹7,450");
        assert_eq!(format_inr(7449.4), "₹7,449");
    }

    #[test]
    fn card_carries_verdict_confidence_and_price() {
        let p = Predictor::default();
        let r = MarketReading {
            gold_usd_early: 2400.0,
            gold_usd_late: 2410.0,
            usd_inr_early: 83.0,
            usd_inr_late: 83.0,
            us10y_early: 4.20,
            us10y_late: 4.20,
        };
        let forecast = p.forecast(&r, Some(7450.0)).unwrap();

        let card = TextCardRenderer.render("Chennai", &forecast);
        assert!(card.contains("Chennai"));
        assert!(card.contains("RISE"));
        assert!(card.contains("Confidence ~ 53%"));
        assert!(card.contains("+0.23%"));
        assert!(card.contains("📈"));
        // 7450 * (1 + 0.229167/100) ≈ 7467
        assert!(card.contains("₹7,467"));
    }
}
