use super::category::Category;
use super::config::{ScoringConfig, WeightTable};
use super::factors::RiskFactor;
use super::tier::{CRITICAL_THRESHOLD, MODERATE_THRESHOLD};
use super::weights::{STANDARD_CATEGORY_WEIGHTS, STANDARD_ESCALATION_RATIO};

const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Validate scoring configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_scoring(config: &ScoringConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if let Some(ref version) = config.version {
        if version.trim().is_empty() {
            errors.push("scoring.version: must not be empty".to_string());
        }
    }

    if config.top_contributors == Some(0) {
        errors.push("scoring.top_contributors: must be at least 1".to_string());
    }
    if config.overall_top_contributors == Some(0) {
        errors.push("scoring.overall_top_contributors: must be at least 1".to_string());
    }

    if let Some(weights) = config.category_weights {
        for category in Category::ALL {
            let w = weights.get(category);
            if !w.is_finite() || w < 0.0 {
                errors.push(format!(
                    "scoring.category_weights.{}: must be a non-negative number, got {}",
                    field_name(category),
                    w
                ));
            }
        }
        let total = weights.total();
        if (total - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            errors.push(format!(
                "scoring.category_weights: must sum to 1, got {:.4}",
                total
            ));
        }
    }

    if let Some(ratio) = config.escalation_ratio {
        if !ratio.is_finite() || !(0.0..=1.0).contains(&ratio) {
            errors.push(format!(
                "scoring.escalation_ratio: must be within [0, 1], got {}",
                ratio
            ));
        }
    }

    // A single CRITICAL category must be able to lift the overall score out of
    // LOW, either through its own aggregation weight or through escalation.
    let weights = config.category_weights.unwrap_or(STANDARD_CATEGORY_WEIGHTS);
    let ratio = config
        .escalation_ratio
        .unwrap_or(STANDARD_ESCALATION_RATIO);
    if ratio.is_finite() {
        for category in Category::ALL {
            let lift = weights.get(category).max(ratio) * CRITICAL_THRESHOLD;
            if lift < MODERATE_THRESHOLD {
                errors.push(format!(
                    "scoring: a CRITICAL {} score would leave overall risk LOW; raise escalation_ratio to at least {:.3} or its category weight",
                    field_name(category),
                    MODERATE_THRESHOLD / CRITICAL_THRESHOLD
                ));
            }
        }
    }

    if let Some(ref multipliers) = config.asa_multipliers {
        if multipliers.len() != 5 {
            errors.push(format!(
                "scoring.asa_multipliers: expected 5 values (ASA I-V), got {}",
                multipliers.len()
            ));
        }
        for (i, m) in multipliers.iter().enumerate() {
            if !m.is_finite() || *m < 1.0 {
                errors.push(format!(
                    "scoring.asa_multipliers[{}]: must be at least 1, got {}",
                    i, m
                ));
            }
        }
        if multipliers.windows(2).any(|w| w[1] < w[0]) {
            errors.push("scoring.asa_multipliers: must be non-decreasing".to_string());
        }
    }

    if let Some(ref overrides) = config.weights {
        for category in Category::ALL {
            if let Some(table) = overrides.get(category) {
                validate_table(category, table, &mut errors);
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_table(category: Category, table: &WeightTable, errors: &mut Vec<String>) {
    for (factor, weight) in table {
        if *factor == RiskFactor::AsaPhysicalStatus {
            errors.push(format!(
                "scoring.weights.{}.{}: derived from asa_multipliers, cannot be weighted",
                field_name(category),
                factor.name()
            ));
        } else if !weight.is_finite() || *weight < 0.0 {
            errors.push(format!(
                "scoring.weights.{}.{}: must be a non-negative number, got {}",
                field_name(category),
                factor.name(),
                weight
            ));
        }
    }
}

fn field_name(category: Category) -> &'static str {
    match category {
        Category::Infection => "infection",
        Category::Readmission => "readmission",
        Category::Fall => "fall",
        Category::MentalHealth => "mental_health",
        Category::MedicationNonAdherence => "medication_non_adherence",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{CategoryWeights, WeightOverrides};

    fn empty() -> ScoringConfig {
        ScoringConfig {
            version: None,
            top_contributors: None,
            overall_top_contributors: None,
            category_weights: None,
            escalation_ratio: None,
            asa_multipliers: None,
            weights: None,
        }
    }

    #[test]
    fn test_valid_config() {
        assert!(validate_scoring(&ScoringConfig::default()).is_ok());
    }

    #[test]
    fn test_empty_config() {
        assert!(validate_scoring(&empty()).is_ok());
    }

    #[test]
    fn test_category_weights_must_sum_to_one() {
        let config = ScoringConfig {
            category_weights: Some(CategoryWeights {
                infection: 0.5,
                readmission: 0.5,
                fall: 0.5,
                mental_health: 0.0,
                medication_non_adherence: 0.0,
            }),
            ..empty()
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert!(errors[0].contains("must sum to 1"));
    }

    #[test]
    fn test_negative_category_weight() {
        let config = ScoringConfig {
            category_weights: Some(CategoryWeights {
                infection: 1.2,
                readmission: -0.2,
                fall: 0.0,
                mental_health: 0.0,
                medication_non_adherence: 0.0,
            }),
            ..empty()
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert!(errors[0].contains("scoring.category_weights.readmission"));
    }

    #[test]
    fn test_escalation_guarantee() {
        // Without escalation, a 0.1-weight category at 100 only reaches 10.
        let config = ScoringConfig {
            escalation_ratio: Some(0.0),
            ..empty()
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert_eq!(errors.len(), Category::ALL.len());
        assert!(errors[0].contains("would leave overall risk LOW"));

        let config = ScoringConfig {
            escalation_ratio: Some(0.34),
            ..empty()
        };
        assert!(validate_scoring(&config).is_ok());
    }

    #[test]
    fn test_escalation_ratio_range() {
        let config = ScoringConfig {
            escalation_ratio: Some(1.5),
            ..empty()
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert!(errors[0].contains("scoring.escalation_ratio"));
    }

    #[test]
    fn test_asa_multipliers() {
        let config = ScoringConfig {
            asa_multipliers: Some(vec![1.0, 1.3, 1.2]),
            ..empty()
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].contains("expected 5 values"));
        assert!(errors[1].contains("non-decreasing"));
    }

    #[test]
    fn test_negative_factor_weight() {
        let config = ScoringConfig {
            weights: Some(WeightOverrides {
                fall: Some([(RiskFactor::Age, -3.0)].into_iter().collect()),
                ..Default::default()
            }),
            ..empty()
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert!(errors[0].contains("scoring.weights.fall.age"));
    }

    #[test]
    fn test_asa_factor_cannot_be_weighted() {
        let config = ScoringConfig {
            weights: Some(WeightOverrides {
                infection: Some([(RiskFactor::AsaPhysicalStatus, 5.0)].into_iter().collect()),
                ..Default::default()
            }),
            ..empty()
        };
        let errors = validate_scoring(&config).unwrap_err();
        assert!(errors[0].contains("asa_physical_status"));
    }

    #[test]
    fn test_collects_all_errors() {
        let config = ScoringConfig {
            version: Some("  ".to_string()),
            top_contributors: Some(0),
            escalation_ratio: Some(-1.0),
            ..empty()
        };
        let errors = validate_scoring(&config).unwrap_err();
        // version, top_contributors, escalation range, plus the guarantee per category
        assert_eq!(errors.len(), 3 + Category::ALL.len());
    }
}
