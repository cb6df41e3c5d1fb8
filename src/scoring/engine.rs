use super::aggregate::{aggregate, CategoryScores};
use super::category::Category;
use super::config::ScoringModel;
use super::extract::extract;
use super::factors::{FactorSet, RiskFactor};
use super::indices::{compute_charlson, compute_lace};
use super::tier::{classify, Tier};
use crate::error::RiskError;
use crate::input::{parse_input, RiskInput};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::trace;

/// One factor's share of a score, in score points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contributor {
    #[serde(rename = "factorName")]
    pub factor: RiskFactor,
    pub weight: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryScore {
    /// Always within [0, 100].
    pub score: f64,
    pub tier: Tier,
    /// Sorted by weight, largest first. Non-empty whenever score > 0.
    pub top_contributors: Vec<Contributor>,
}

impl CategoryScore {
    /// Saturate `raw` into [0, 100] and classify it.
    pub fn new(raw: f64, top_contributors: Vec<Contributor>) -> Self {
        let score = raw.clamp(0.0, 100.0);
        Self {
            score,
            tier: classify(score),
            top_contributors,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAssessment {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<String>,
    pub overall_risk: CategoryScore,
    pub infection_risk: CategoryScore,
    pub readmission_risk: CategoryScore,
    pub fall_risk: CategoryScore,
    pub mental_health_risk: CategoryScore,
    pub medication_non_adherence_risk: CategoryScore,
    pub lace_index_score: u32,
    pub charlson_comorbidity_index: u32,
    pub weights_version: String,
}

impl RiskAssessment {
    pub fn category(&self, category: Category) -> &CategoryScore {
        match category {
            Category::Infection => &self.infection_risk,
            Category::Readmission => &self.readmission_risk,
            Category::Fall => &self.fall_risk,
            Category::MentalHealth => &self.mental_health_risk,
            Category::MedicationNonAdherence => &self.medication_non_adherence_risk,
        }
    }
}

/// Stable sort by weight descending, so ties keep their incoming order.
pub(crate) fn rank_contributors(contributors: &mut Vec<Contributor>, limit: usize) {
    contributors.sort_by(|a, b| b.weight.partial_cmp(&a.weight).unwrap_or(Ordering::Equal));
    contributors.truncate(limit);
}

/// Score one category from extracted factors.
pub fn score_category(category: Category, factors: &FactorSet, model: &ScoringModel) -> CategoryScore {
    let table = model.tables.get(category);

    let mut contributors: Vec<Contributor> = factors
        .iter()
        .filter_map(|value| {
            let weight = table.get(&value.factor)? * value.intensity;
            (weight > 0.0).then_some(Contributor {
                factor: value.factor,
                weight,
            })
        })
        .collect();

    let mut raw: f64 = contributors.iter().map(|c| c.weight).sum();

    if category.uses_asa_multiplier() {
        let multiplier = model.asa_multiplier(factors.profile.asa_class);
        let excess = raw * (multiplier - 1.0);
        if excess > 0.0 {
            contributors.push(Contributor {
                factor: RiskFactor::AsaPhysicalStatus,
                weight: excess,
            });
            raw += excess;
        }
    }

    trace!(%category, raw, "category raw sum");

    rank_contributors(&mut contributors, model.top_contributors);
    CategoryScore::new(raw, contributors)
}

/// Assess with the standard tables.
pub fn assess_risk(input: &RiskInput) -> RiskAssessment {
    assess_risk_with(input, ScoringModel::standard())
}

pub fn assess_risk_with(input: &RiskInput, model: &ScoringModel) -> RiskAssessment {
    let factors = extract(input);

    let scores = CategoryScores {
        infection: score_category(Category::Infection, &factors, model),
        readmission: score_category(Category::Readmission, &factors, model),
        fall: score_category(Category::Fall, &factors, model),
        mental_health: score_category(Category::MentalHealth, &factors, model),
        medication_non_adherence: score_category(
            Category::MedicationNonAdherence,
            &factors,
            model,
        ),
    };
    let overall_risk = aggregate(&scores, model);

    RiskAssessment {
        patient_id: input.patient_id.clone(),
        overall_risk,
        infection_risk: scores.infection,
        readmission_risk: scores.readmission,
        fall_risk: scores.fall,
        mental_health_risk: scores.mental_health,
        medication_non_adherence_risk: scores.medication_non_adherence,
        lace_index_score: compute_lace(&factors),
        charlson_comorbidity_index: compute_charlson(&factors),
        weights_version: model.version.clone(),
    }
}

/// Parse a JSON risk input and assess it with the standard tables.
pub fn assess_json(json: &str) -> Result<RiskAssessment, RiskError> {
    Ok(assess_risk(&parse_input(json)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Section;
    use crate::input::{Complexity, Demographics, Surgical};
    use crate::scoring::ScoringConfig;

    fn factors_for(input: &RiskInput) -> FactorSet {
        extract(input)
    }

    #[test]
    fn test_empty_input_scores_zero_everywhere() {
        let assessment = assess_risk(&RiskInput::default());
        assert_eq!(assessment.overall_risk.score, 0.0);
        assert_eq!(assessment.overall_risk.tier, Tier::Low);
        for category in Category::ALL {
            let score = assessment.category(category);
            assert_eq!(score.score, 0.0);
            assert!(score.top_contributors.is_empty());
        }
        assert_eq!(assessment.lace_index_score, 0);
        assert_eq!(assessment.charlson_comorbidity_index, 0);
    }

    #[test]
    fn test_contributions_are_weight_times_intensity() {
        let mut input = RiskInput::default();
        input.clinical.infection_suspected = true;
        input.clinical.drainage = true;

        let score = score_category(
            Category::Infection,
            &factors_for(&input),
            ScoringModel::standard(),
        );
        assert_eq!(score.score, 25.0);
        assert_eq!(score.tier, Tier::Moderate);
        assert_eq!(
            score.top_contributors,
            vec![
                Contributor {
                    factor: RiskFactor::SuspectedInfection,
                    weight: 15.0
                },
                Contributor {
                    factor: RiskFactor::WoundDrainage,
                    weight: 10.0
                },
            ]
        );
    }

    #[test]
    fn test_asa_excess_is_reported() {
        let mut input = RiskInput::default();
        input.clinical.infection_suspected = true;
        input.demographics.asa_class = Some(4.0);

        let score = score_category(
            Category::Infection,
            &factors_for(&input),
            ScoringModel::standard(),
        );
        // 15 * 1.45
        assert!((score.score - 21.75).abs() < 1e-9);
        let asa = score
            .top_contributors
            .iter()
            .find(|c| c.factor == RiskFactor::AsaPhysicalStatus)
            .unwrap();
        assert!((asa.weight - 6.75).abs() < 1e-9);
    }

    #[test]
    fn test_asa_does_not_touch_fall_risk() {
        let mut input = RiskInput::default();
        input.demographics.age = Some(85.0);
        let baseline = assess_risk(&input).fall_risk.score;

        input.demographics.asa_class = Some(5.0);
        assert_eq!(assess_risk(&input).fall_risk.score, baseline);
    }

    #[test]
    fn test_score_saturates_at_100() {
        let mut input = RiskInput::default();
        input.clinical.infection_suspected = true;
        input.clinical.drainage = true;
        input.clinical.swelling = true;
        input.clinical.redness = true;
        input.clinical.fever = true;
        input.clinical.vitals.temperature = Some(39.5);
        input.demographics.comorbidities = vec!["diabetes".into(), "immunosuppression".into()];
        input.demographics.smoker = true;
        input.demographics.asa_class = Some(5.0);
        input.surgical.complexity = Some(Complexity::HighlyComplex);
        input.surgical.duration_minutes = Some(480.0);
        input.surgical.reoperation = true;

        let score = assess_risk(&input).infection_risk;
        assert_eq!(score.score, 100.0);
        assert_eq!(score.tier, Tier::Critical);
    }

    #[test]
    fn test_contributors_limited_and_sorted() {
        let mut input = RiskInput::default();
        input.demographics.age = Some(70.0);
        input.demographics.comorbidities = vec![
            "chf".into(),
            "copd".into(),
            "ckd".into(),
            "diabetes".into(),
            "hypertension".into(),
        ];
        input.surgical.emergency = true;
        input.surgical.prior_admissions_12_months = 2.0;

        let score = assess_risk(&input).readmission_risk;
        assert_eq!(score.top_contributors.len(), 5);
        assert!(score
            .top_contributors
            .windows(2)
            .all(|w| w[0].weight >= w[1].weight));
    }

    #[test]
    fn test_ties_keep_extraction_order() {
        let mut input = RiskInput::default();
        // both weigh 7 on infection
        input.clinical.swelling = true;
        input.clinical.redness = true;

        let score = assess_risk(&input).infection_risk;
        let names: Vec<_> = score.top_contributors.iter().map(|c| c.factor).collect();
        assert_eq!(names, vec![RiskFactor::WoundSwelling, RiskFactor::WoundRedness]);
    }

    #[test]
    fn test_custom_model_changes_weights_version() {
        let config = ScoringConfig {
            version: Some("site-a".to_string()),
            ..ScoringConfig::default()
        };
        let model = ScoringModel::from_config(&config).unwrap();
        let assessment = assess_risk_with(&RiskInput::default(), &model);
        assert_eq!(assessment.weights_version, "site-a");
    }

    #[test]
    fn test_assess_json_missing_section() {
        let json = r#"{"demographics": {}, "surgical": {}, "compliance": {}, "clinical": {}}"#;
        let err = assess_json(json).unwrap_err();
        assert_eq!(err.missing_section(), Some(Section::Behavioral));
    }

    #[test]
    fn test_output_uses_camel_case_keys() {
        let input = RiskInput {
            patient_id: Some("p-1".to_string()),
            demographics: Demographics {
                age: Some(70.0),
                ..Default::default()
            },
            surgical: Surgical {
                emergency: true,
                ..Default::default()
            },
            ..Default::default()
        };
        let json = serde_json::to_value(assess_risk(&input)).unwrap();
        assert_eq!(json["patientId"], "p-1");
        assert!(json["overallRisk"]["topContributors"].is_array());
        assert!(json["overallRisk"]["topContributors"][0]["factorName"].is_string());
        assert!(json["medicationNonAdherenceRisk"]["tier"].is_string());
        assert!(json["laceIndexScore"].is_u64());
        assert!(json["charlsonComorbidityIndex"].is_u64());
    }
}
