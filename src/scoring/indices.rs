//! LACE readmission index and age-adjusted Charlson comorbidity index.

use super::factors::{band_lookup, Comorbidity, FactorSet, PatientProfile, RangeOp};

/// LACE "L": length of stay in days.
const LENGTH_OF_STAY_POINTS: &[(RangeOp, u32)] = &[
    (RangeOp::LessThan(1.0), 0),
    (RangeOp::Between(1.0, 2.0), 1),
    (RangeOp::Between(2.0, 3.0), 2),
    (RangeOp::Between(3.0, 4.0), 3),
    (RangeOp::Between(4.0, 7.0), 4),
    (RangeOp::Between(7.0, 14.0), 5),
    (RangeOp::GreaterEqual(14.0), 7),
];

const ACUTE_ADMISSION_POINTS: u32 = 3;

/// LACE "C": Charlson condition points, no age adjustment.
const COMORBIDITY_POINTS: &[(RangeOp, u32)] = &[
    (RangeOp::LessThan(1.0), 0),
    (RangeOp::Between(1.0, 2.0), 1),
    (RangeOp::Between(2.0, 3.0), 2),
    (RangeOp::Between(3.0, 4.0), 3),
    (RangeOp::GreaterEqual(4.0), 5),
];

const MAX_ED_VISIT_POINTS: u32 = 4;

/// Age adjustment on top of the Charlson condition points.
const CHARLSON_AGE_POINTS: &[(RangeOp, u32)] = &[
    (RangeOp::LessThan(50.0), 0),
    (RangeOp::Between(50.0, 60.0), 1),
    (RangeOp::Between(60.0, 70.0), 2),
    (RangeOp::Between(70.0, 80.0), 3),
    (RangeOp::GreaterEqual(80.0), 4),
];

impl Comorbidity {
    /// Charlson weight of the condition; zero for tags Charlson does not score.
    pub fn charlson_points(&self) -> u32 {
        match self {
            Comorbidity::MyocardialInfarction
            | Comorbidity::CongestiveHeartFailure
            | Comorbidity::PeripheralVascularDisease
            | Comorbidity::Stroke
            | Comorbidity::Dementia
            | Comorbidity::Copd
            | Comorbidity::LiverDisease
            | Comorbidity::Diabetes => 1,
            Comorbidity::ChronicKidneyDisease | Comorbidity::Cancer => 2,
            Comorbidity::MetastaticCancer => 6,
            Comorbidity::Hypertension
            | Comorbidity::Obesity
            | Comorbidity::Smoking
            | Comorbidity::Immunosuppression
            | Comorbidity::Osteoporosis => 0,
        }
    }
}

/// Sum of Charlson condition weights. Metastatic disease replaces, rather
/// than adds to, the localized cancer weight.
pub fn charlson_condition_points(profile: &PatientProfile) -> u32 {
    let metastatic = profile
        .comorbidities
        .contains(&Comorbidity::MetastaticCancer);
    profile
        .comorbidities
        .iter()
        .filter(|c| !(metastatic && **c == Comorbidity::Cancer))
        .map(|c| c.charlson_points())
        .sum()
}

pub fn compute_charlson(factors: &FactorSet) -> u32 {
    let profile = &factors.profile;
    let age_points = profile
        .age
        .and_then(|age| band_lookup(CHARLSON_AGE_POINTS, age))
        .unwrap_or(0);
    charlson_condition_points(profile) + age_points
}

pub fn compute_lace(factors: &FactorSet) -> u32 {
    let profile = &factors.profile;

    let length_of_stay = profile
        .length_of_stay_days
        .and_then(|days| band_lookup(LENGTH_OF_STAY_POINTS, days))
        .unwrap_or(0);
    let acuity = if profile.emergency {
        ACUTE_ADMISSION_POINTS
    } else {
        0
    };
    let comorbidity =
        band_lookup(COMORBIDITY_POINTS, charlson_condition_points(profile) as f64).unwrap_or(0);
    let emergency_visits = profile.ed_visits_last_6_months.min(MAX_ED_VISIT_POINTS);

    length_of_stay + acuity + comorbidity + emergency_visits
}
