// =============================================================================
// Shared types used across the Goldcast forecast service
// =============================================================================

use serde::{Deserialize, Serialize};

/// Three-way directional call for tomorrow's local gold price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Rise,
    Dip,
    Flat,
}

impl Verdict {
    /// Verb phrase used in the spoken announcement ("likely to ...").
    pub fn verb_phrase(&self) -> &'static str {
        match self {
            Self::Rise => "rise",
            Self::Dip => "dip",
            Self::Flat => "stay flat",
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rise => write!(f, "Rise"),
            Self::Dip => write!(f, "Dip"),
            Self::Flat => write!(f, "Flat"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verdict_display_and_verb() {
        assert_eq!(Verdict::Rise.to_string(), "Rise");
        assert_eq!(Verdict::Dip.to_string(), "Dip");
        assert_eq!(Verdict::Flat.to_string(), "Flat");
        assert_eq!(Verdict::Flat.verb_phrase(), "stay flat");
    }

    #[test]
    fn verdict_serialises_as_plain_string() {
        assert_eq!(serde_json::to_string(&Verdict::Rise).unwrap(), "\"Rise\"");
        let v: Verdict = serde_json::from_str("\"Dip\"").unwrap();
        assert_eq!(v, Verdict::Dip);
    }
}
