use super::category::Category;
use super::factors::RiskFactor;
use super::validation::validate_scoring;
use super::weights::{
    standard_tables, STANDARD_ASA_MULTIPLIERS, STANDARD_CATEGORY_WEIGHTS,
    STANDARD_ESCALATION_RATIO, STANDARD_OVERALL_TOP_CONTRIBUTORS, STANDARD_TOP_CONTRIBUTORS,
    WEIGHTS_VERSION,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Points per factor at full intensity.
pub type WeightTable = BTreeMap<RiskFactor, f64>;

/// Share of each category in the overall score. Must sum to 1.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CategoryWeights {
    pub infection: f64,
    pub readmission: f64,
    pub fall: f64,
    pub mental_health: f64,
    pub medication_non_adherence: f64,
}

impl CategoryWeights {
    pub fn get(&self, category: Category) -> f64 {
        match category {
            Category::Infection => self.infection,
            Category::Readmission => self.readmission,
            Category::Fall => self.fall,
            Category::MentalHealth => self.mental_health,
            Category::MedicationNonAdherence => self.medication_non_adherence,
        }
    }

    pub fn total(&self) -> f64 {
        Category::ALL.iter().map(|c| self.get(*c)).sum()
    }
}

/// One weight table per category, fully resolved.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct CategoryTables {
    pub infection: WeightTable,
    pub readmission: WeightTable,
    pub fall: WeightTable,
    pub mental_health: WeightTable,
    pub medication_non_adherence: WeightTable,
}

impl CategoryTables {
    pub fn get(&self, category: Category) -> &WeightTable {
        match category {
            Category::Infection => &self.infection,
            Category::Readmission => &self.readmission,
            Category::Fall => &self.fall,
            Category::MentalHealth => &self.mental_health,
            Category::MedicationNonAdherence => &self.medication_non_adherence,
        }
    }

    fn get_mut(&mut self, category: Category) -> &mut WeightTable {
        match category {
            Category::Infection => &mut self.infection,
            Category::Readmission => &mut self.readmission,
            Category::Fall => &mut self.fall,
            Category::MentalHealth => &mut self.mental_health,
            Category::MedicationNonAdherence => &mut self.medication_non_adherence,
        }
    }
}

/// Per-category weight overrides. Entries replace the standard weight for
/// that factor; factors not listed keep their standard weight.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct WeightOverrides {
    #[serde(default)]
    pub infection: Option<WeightTable>,
    #[serde(default)]
    pub readmission: Option<WeightTable>,
    #[serde(default)]
    pub fall: Option<WeightTable>,
    #[serde(default)]
    pub mental_health: Option<WeightTable>,
    #[serde(default)]
    pub medication_non_adherence: Option<WeightTable>,
}

impl WeightOverrides {
    pub fn get(&self, category: Category) -> Option<&WeightTable> {
        match category {
            Category::Infection => self.infection.as_ref(),
            Category::Readmission => self.readmission.as_ref(),
            Category::Fall => self.fall.as_ref(),
            Category::MentalHealth => self.mental_health.as_ref(),
            Category::MedicationNonAdherence => self.medication_non_adherence.as_ref(),
        }
    }
}

/// Scoring configuration as written in the config file.
///
/// Every field is optional; anything left out falls back to the standard
/// tables.
///
/// Example YAML:
/// ```yaml
/// scoring:
///   version: "2024.2-local"
///   top_contributors: 3
///   category_weights:
///     infection: 0.35
///     readmission: 0.35
///     fall: 0.1
///     mental_health: 0.1
///     medication_non_adherence: 0.1
///   weights:
///     fall:
///       osteoporosis: 20
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScoringConfig {
    /// Identifies the table revision in every assessment
    #[serde(default)]
    pub version: Option<String>,

    /// Contributors kept per category (default: 5)
    #[serde(default)]
    pub top_contributors: Option<usize>,

    /// Contributors kept for the overall score (default: 5)
    #[serde(default)]
    pub overall_top_contributors: Option<usize>,

    /// Aggregation weights, must sum to 1
    #[serde(default)]
    pub category_weights: Option<CategoryWeights>,

    /// Overall score is at least this share of the worst category (default: 0.4)
    #[serde(default)]
    pub escalation_ratio: Option<f64>,

    /// Multipliers for ASA I..V, applied to infection and readmission
    #[serde(default)]
    pub asa_multipliers: Option<Vec<f64>>,

    #[serde(default)]
    pub weights: Option<WeightOverrides>,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        ScoringModel::standard().to_config()
    }
}

/// Resolved, immutable scoring model. Safe to share across threads.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoringModel {
    pub version: String,
    pub top_contributors: usize,
    pub overall_top_contributors: usize,
    pub category_weights: CategoryWeights,
    pub escalation_ratio: f64,
    pub asa_multipliers: [f64; 5],
    pub tables: CategoryTables,
}

static STANDARD_MODEL: LazyLock<ScoringModel> = LazyLock::new(|| ScoringModel {
    version: WEIGHTS_VERSION.to_string(),
    top_contributors: STANDARD_TOP_CONTRIBUTORS,
    overall_top_contributors: STANDARD_OVERALL_TOP_CONTRIBUTORS,
    category_weights: STANDARD_CATEGORY_WEIGHTS,
    escalation_ratio: STANDARD_ESCALATION_RATIO,
    asa_multipliers: STANDARD_ASA_MULTIPLIERS,
    tables: standard_tables(),
});

impl ScoringModel {
    /// The standard tables, built once.
    pub fn standard() -> &'static ScoringModel {
        &STANDARD_MODEL
    }

    /// Validate `config` and lay it over the standard tables.
    pub fn from_config(config: &ScoringConfig) -> Result<Self, Vec<String>> {
        validate_scoring(config)?;

        let mut model = Self::standard().clone();
        if let Some(ref version) = config.version {
            model.version = version.clone();
        }
        if let Some(n) = config.top_contributors {
            model.top_contributors = n;
        }
        if let Some(n) = config.overall_top_contributors {
            model.overall_top_contributors = n;
        }
        if let Some(weights) = config.category_weights {
            model.category_weights = weights;
        }
        if let Some(ratio) = config.escalation_ratio {
            model.escalation_ratio = ratio;
        }
        if let Some(ref multipliers) = config.asa_multipliers {
            // length checked by validation
            for (slot, value) in model.asa_multipliers.iter_mut().zip(multipliers) {
                *slot = *value;
            }
        }
        if let Some(ref overrides) = config.weights {
            for category in Category::ALL {
                if let Some(table) = overrides.get(category) {
                    model.tables.get_mut(category).extend(table.iter().map(|(k, v)| (*k, *v)));
                }
            }
        }
        Ok(model)
    }

    /// Multiplier for an ASA class; out-of-range classes are clamped.
    pub fn asa_multiplier(&self, asa_class: u8) -> f64 {
        let index = asa_class.clamp(1, 5) as usize - 1;
        self.asa_multipliers[index]
    }

    pub fn weight(&self, category: Category, factor: RiskFactor) -> f64 {
        self.tables
            .get(category)
            .get(&factor)
            .copied()
            .unwrap_or(0.0)
    }

    /// The fully populated config this model resolves from.
    pub fn to_config(&self) -> ScoringConfig {
        let tables = self.tables.clone();
        ScoringConfig {
            version: Some(self.version.clone()),
            top_contributors: Some(self.top_contributors),
            overall_top_contributors: Some(self.overall_top_contributors),
            category_weights: Some(self.category_weights),
            escalation_ratio: Some(self.escalation_ratio),
            asa_multipliers: Some(self.asa_multipliers.to_vec()),
            weights: Some(WeightOverrides {
                infection: Some(tables.infection),
                readmission: Some(tables.readmission),
                fall: Some(tables.fall),
                mental_health: Some(tables.mental_health),
                medication_non_adherence: Some(tables.medication_non_adherence),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_resolves_to_standard_model() {
        let model = ScoringModel::from_config(&ScoringConfig::default()).unwrap();
        assert_eq!(&model, ScoringModel::standard());
    }

    #[test]
    fn test_scoring_config_serde_roundtrip() {
        let config = ScoringConfig::default();
        let yaml = serde_saphyr::to_string(&config).unwrap();
        let parsed: ScoringConfig = serde_saphyr::from_str(&yaml).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_empty_scoring_config_parse() {
        let config: ScoringConfig = serde_saphyr::from_str("{}").unwrap();
        assert!(config.version.is_none());
        assert!(config.category_weights.is_none());
        assert!(config.weights.is_none());

        let model = ScoringModel::from_config(&config).unwrap();
        assert_eq!(&model, ScoringModel::standard());
    }

    #[test]
    fn test_partial_override_keeps_other_weights() {
        let yaml = r#"
top_contributors: 3
weights:
  fall:
    osteoporosis: 20
"#;
        let config: ScoringConfig = serde_saphyr::from_str(yaml).unwrap();
        let model = ScoringModel::from_config(&config).unwrap();

        assert_eq!(model.top_contributors, 3);
        assert_eq!(model.weight(Category::Fall, RiskFactor::Osteoporosis), 20.0);
        assert_eq!(
            model.weight(Category::Fall, RiskFactor::Age),
            ScoringModel::standard().weight(Category::Fall, RiskFactor::Age)
        );
    }

    #[test]
    fn test_unknown_factor_is_rejected_at_parse() {
        let yaml = r#"
weights:
  fall:
    moon_phase: 3
"#;
        assert!(serde_saphyr::from_str::<ScoringConfig>(yaml).is_err());
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = ScoringConfig {
            escalation_ratio: Some(2.0),
            ..ScoringConfig::default()
        };
        assert!(ScoringModel::from_config(&config).is_err());
    }

    #[test]
    fn test_asa_multiplier_clamps_class() {
        let model = ScoringModel::standard();
        assert_eq!(model.asa_multiplier(0), 1.0);
        assert_eq!(model.asa_multiplier(3), 1.25);
        assert_eq!(model.asa_multiplier(9), 1.7);
    }

    #[test]
    fn test_to_config_roundtrips_model() {
        let config: ScoringConfig = serde_saphyr::from_str("escalation_ratio: 0.5").unwrap();
        let model = ScoringModel::from_config(&config).unwrap();
        let rebuilt = ScoringModel::from_config(&model.to_config()).unwrap();
        assert_eq!(rebuilt, model);
    }
}
