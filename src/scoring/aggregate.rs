use super::category::Category;
use super::config::ScoringModel;
use super::engine::{rank_contributors, CategoryScore, Contributor};

/// The five category scores of one assessment.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryScores {
    pub infection: CategoryScore,
    pub readmission: CategoryScore,
    pub fall: CategoryScore,
    pub mental_health: CategoryScore,
    pub medication_non_adherence: CategoryScore,
}

impl CategoryScores {
    pub fn get(&self, category: Category) -> &CategoryScore {
        match category {
            Category::Infection => &self.infection,
            Category::Readmission => &self.readmission,
            Category::Fall => &self.fall,
            Category::MentalHealth => &self.mental_health,
            Category::MedicationNonAdherence => &self.medication_non_adherence,
        }
    }
}

/// Combine category scores into the overall risk.
///
/// The overall score is the weighted mean of the categories, raised to at
/// least `escalation_ratio` times the worst category so one CRITICAL category
/// cannot hide behind four quiet ones.
pub fn aggregate(scores: &CategoryScores, model: &ScoringModel) -> CategoryScore {
    let weighted: f64 = Category::ALL
        .iter()
        .map(|c| model.category_weights.get(*c) * scores.get(*c).score)
        .sum();
    let peak = Category::ALL
        .iter()
        .map(|c| scores.get(*c).score)
        .fold(0.0, f64::max);
    let overall = weighted.max(model.escalation_ratio * peak);

    CategoryScore::new(overall, merge_contributors(scores, model.overall_top_contributors))
}

/// Union of every category's contributors. A factor listed by several
/// categories keeps its largest weight and its first position.
fn merge_contributors(scores: &CategoryScores, limit: usize) -> Vec<Contributor> {
    let mut merged: Vec<Contributor> = Vec::new();
    for category in Category::ALL {
        for contributor in &scores.get(category).top_contributors {
            match merged.iter_mut().find(|c| c.factor == contributor.factor) {
                Some(existing) => existing.weight = existing.weight.max(contributor.weight),
                None => merged.push(contributor.clone()),
            }
        }
    }
    rank_contributors(&mut merged, limit);
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{RiskFactor, Tier};
    use proptest::prelude::*;

    fn score(value: f64, contributors: &[(RiskFactor, f64)]) -> CategoryScore {
        CategoryScore::new(
            value,
            contributors
                .iter()
                .map(|(factor, weight)| Contributor {
                    factor: *factor,
                    weight: *weight,
                })
                .collect(),
        )
    }

    fn scores(values: [f64; 5]) -> CategoryScores {
        let single = |v: f64| {
            if v > 0.0 {
                score(v, &[(RiskFactor::Age, v)])
            } else {
                score(0.0, &[])
            }
        };
        CategoryScores {
            infection: single(values[0]),
            readmission: single(values[1]),
            fall: single(values[2]),
            mental_health: single(values[3]),
            medication_non_adherence: single(values[4]),
        }
    }

    #[test]
    fn test_weighted_mean() {
        let result = aggregate(&scores([40.0; 5]), ScoringModel::standard());
        assert!((result.score - 40.0).abs() < 1e-9);
        assert_eq!(result.tier, Tier::Moderate);
    }

    #[test]
    fn test_single_critical_category_escalates() {
        // mental health weighs 0.1: the mean alone would be 8
        let result = aggregate(&scores([0.0, 0.0, 0.0, 80.0, 0.0]), ScoringModel::standard());
        assert!((result.score - 32.0).abs() < 1e-9);
        assert_eq!(result.tier, Tier::Moderate);
    }

    #[test]
    fn test_merge_keeps_max_weight_per_factor() {
        let scores = CategoryScores {
            infection: score(30.0, &[(RiskFactor::Diabetes, 10.0), (RiskFactor::Smoking, 8.0)]),
            readmission: score(20.0, &[(RiskFactor::Age, 12.0), (RiskFactor::Diabetes, 4.0)]),
            fall: score(25.0, &[(RiskFactor::Age, 25.0)]),
            mental_health: score(0.0, &[]),
            medication_non_adherence: score(0.0, &[]),
        };
        let result = aggregate(&scores, ScoringModel::standard());
        let merged: Vec<_> = result
            .top_contributors
            .iter()
            .map(|c| (c.factor, c.weight))
            .collect();
        assert_eq!(
            merged,
            vec![
                (RiskFactor::Age, 25.0),
                (RiskFactor::Diabetes, 10.0),
                (RiskFactor::Smoking, 8.0),
            ]
        );
    }

    #[test]
    fn test_overall_contributors_truncated() {
        let many: Vec<(RiskFactor, f64)> = vec![
            (RiskFactor::Age, 9.0),
            (RiskFactor::Smoking, 8.0),
            (RiskFactor::Diabetes, 7.0),
            (RiskFactor::Copd, 6.0),
            (RiskFactor::Stroke, 5.0),
        ];
        let others = vec![(RiskFactor::LowMood, 20.0), (RiskFactor::PoorSleep, 1.0)];
        let scores = CategoryScores {
            infection: score(35.0, &many),
            readmission: score(0.0, &[]),
            fall: score(0.0, &[]),
            mental_health: score(21.0, &others),
            medication_non_adherence: score(0.0, &[]),
        };
        let result = aggregate(&scores, ScoringModel::standard());
        assert_eq!(result.top_contributors.len(), 5);
        assert_eq!(result.top_contributors[0].factor, RiskFactor::LowMood);
        assert!(!result
            .top_contributors
            .iter()
            .any(|c| c.factor == RiskFactor::PoorSleep));
    }

    proptest! {
        #[test]
        fn overall_stays_in_bounds(values in proptest::array::uniform5(0.0..=100.0f64)) {
            let result = aggregate(&scores(values), ScoringModel::standard());
            prop_assert!((0.0..=100.0).contains(&result.score));
        }

        #[test]
        fn critical_category_never_leaves_overall_low(
            values in proptest::array::uniform5(0.0..=100.0f64),
            critical in 75.0..=100.0f64,
            slot in 0usize..5,
        ) {
            let mut values = values;
            values[slot] = critical;
            let result = aggregate(&scores(values), ScoringModel::standard());
            prop_assert!(result.tier > Tier::Low);
        }

        #[test]
        fn overall_contributors_present_when_positive(values in proptest::array::uniform5(0.0..=100.0f64)) {
            let result = aggregate(&scores(values), ScoringModel::standard());
            if result.score > 0.0 {
                prop_assert!(!result.top_contributors.is_empty());
            }
        }
    }
}
