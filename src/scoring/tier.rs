use serde::{Deserialize, Serialize};
use std::fmt;

/// Lower bound of MODERATE. The same boundaries apply to every score.
pub const MODERATE_THRESHOLD: f64 = 25.0;
pub const HIGH_THRESHOLD: f64 = 50.0;
pub const CRITICAL_THRESHOLD: f64 = 75.0;

/// Ordinal risk bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Tier {
    Low,
    Moderate,
    High,
    Critical,
}

impl Tier {
    pub fn label(&self) -> &'static str {
        match self {
            Tier::Low => "LOW",
            Tier::Moderate => "MODERATE",
            Tier::High => "HIGH",
            Tier::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub fn classify(score: f64) -> Tier {
    if score >= CRITICAL_THRESHOLD {
        Tier::Critical
    } else if score >= HIGH_THRESHOLD {
        Tier::High
    } else if score >= MODERATE_THRESHOLD {
        Tier::Moderate
    } else {
        Tier::Low
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_boundaries() {
        assert_eq!(classify(0.0), Tier::Low);
        assert_eq!(classify(24.999), Tier::Low);
        assert_eq!(classify(25.0), Tier::Moderate);
        assert_eq!(classify(49.999), Tier::Moderate);
        assert_eq!(classify(50.0), Tier::High);
        assert_eq!(classify(74.999), Tier::High);
        assert_eq!(classify(75.0), Tier::Critical);
        assert_eq!(classify(100.0), Tier::Critical);
    }

    #[test]
    fn test_tiers_are_ordered() {
        assert!(Tier::Low < Tier::Moderate);
        assert!(Tier::Moderate < Tier::High);
        assert!(Tier::High < Tier::Critical);
    }

    #[test]
    fn test_serialized_as_screaming_case() {
        assert_eq!(serde_json::to_string(&Tier::Critical).unwrap(), "\"CRITICAL\"");
        assert_eq!(Tier::Moderate.to_string(), "MODERATE");
    }

    proptest! {
        #[test]
        fn classify_agrees_with_thresholds(score in 0.0..=100.0f64) {
            let tier = classify(score);
            match tier {
                Tier::Low => prop_assert!(score < MODERATE_THRESHOLD),
                Tier::Moderate => prop_assert!((MODERATE_THRESHOLD..HIGH_THRESHOLD).contains(&score)),
                Tier::High => prop_assert!((HIGH_THRESHOLD..CRITICAL_THRESHOLD).contains(&score)),
                Tier::Critical => prop_assert!(score >= CRITICAL_THRESHOLD),
            }
        }

        #[test]
        fn classify_is_monotonic(a in 0.0..=100.0f64, b in 0.0..=100.0f64) {
            if a <= b {
                prop_assert!(classify(a) <= classify(b));
            }
        }
    }
}
