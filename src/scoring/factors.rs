use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Every signal the scorers know how to weigh.
///
/// The serialized (snake_case) name is what shows up in weight tables and in
/// `topContributors`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskFactor {
    // Demographics and history
    Age,
    Underweight,
    ElevatedBmi,
    Smoking,
    Diabetes,
    Hypertension,
    Obesity,
    CongestiveHeartFailure,
    Copd,
    ChronicKidneyDisease,
    Immunosuppression,
    Osteoporosis,
    Cancer,
    MetastaticCancer,
    LiverDisease,
    Dementia,
    Stroke,
    MyocardialInfarction,
    PeripheralVascularDisease,
    ComorbidityBurden,
    LivesAloneWithoutCaregiver,
    LanguageAccessBarrier,
    // Surgery and utilization
    SurgicalComplexity,
    ProcedureDuration,
    ProcedureSeverity,
    EmergencySurgery,
    Reoperation,
    GeneralAnesthesia,
    LengthOfStay,
    PriorEdVisits,
    PriorAdmissions,
    // Compliance
    MedicationAdherenceGap,
    CarePlanIncompletion,
    AppointmentAttendanceGap,
    MissedMedicationDays,
    MissedAppointments,
    CostBarrier,
    Polypharmacy,
    // Clinical observations
    ElevatedTemperature,
    Tachycardia,
    Bradycardia,
    LowOxygenSaturation,
    ElevatedBloodPressure,
    LowBloodPressure,
    SuspectedInfection,
    WoundDrainage,
    WoundSwelling,
    WoundRedness,
    ReportedFever,
    WoundHealingDelay,
    UncontrolledPain,
    WorseningPain,
    // Behavioral
    LowEngagement,
    LowSessionTime,
    LowActiveDays,
    FrequentSymptomReports,
    LowMood,
    DecliningMood,
    PoorSleep,
    /// Derived from the ASA multiplier; never extracted, never weighted.
    AsaPhysicalStatus,
}

impl RiskFactor {
    pub fn name(&self) -> &'static str {
        match self {
            RiskFactor::Age => "age",
            RiskFactor::Underweight => "underweight",
            RiskFactor::ElevatedBmi => "elevated_bmi",
            RiskFactor::Smoking => "smoking",
            RiskFactor::Diabetes => "diabetes",
            RiskFactor::Hypertension => "hypertension",
            RiskFactor::Obesity => "obesity",
            RiskFactor::CongestiveHeartFailure => "congestive_heart_failure",
            RiskFactor::Copd => "copd",
            RiskFactor::ChronicKidneyDisease => "chronic_kidney_disease",
            RiskFactor::Immunosuppression => "immunosuppression",
            RiskFactor::Osteoporosis => "osteoporosis",
            RiskFactor::Cancer => "cancer",
            RiskFactor::MetastaticCancer => "metastatic_cancer",
            RiskFactor::LiverDisease => "liver_disease",
            RiskFactor::Dementia => "dementia",
            RiskFactor::Stroke => "stroke",
            RiskFactor::MyocardialInfarction => "myocardial_infarction",
            RiskFactor::PeripheralVascularDisease => "peripheral_vascular_disease",
            RiskFactor::ComorbidityBurden => "comorbidity_burden",
            RiskFactor::LivesAloneWithoutCaregiver => "lives_alone_without_caregiver",
            RiskFactor::LanguageAccessBarrier => "language_access_barrier",
            RiskFactor::SurgicalComplexity => "surgical_complexity",
            RiskFactor::ProcedureDuration => "procedure_duration",
            RiskFactor::ProcedureSeverity => "procedure_severity",
            RiskFactor::EmergencySurgery => "emergency_surgery",
            RiskFactor::Reoperation => "reoperation",
            RiskFactor::GeneralAnesthesia => "general_anesthesia",
            RiskFactor::LengthOfStay => "length_of_stay",
            RiskFactor::PriorEdVisits => "prior_ed_visits",
            RiskFactor::PriorAdmissions => "prior_admissions",
            RiskFactor::MedicationAdherenceGap => "medication_adherence_gap",
            RiskFactor::CarePlanIncompletion => "care_plan_incompletion",
            RiskFactor::AppointmentAttendanceGap => "appointment_attendance_gap",
            RiskFactor::MissedMedicationDays => "missed_medication_days",
            RiskFactor::MissedAppointments => "missed_appointments",
            RiskFactor::CostBarrier => "cost_barrier",
            RiskFactor::Polypharmacy => "polypharmacy",
            RiskFactor::ElevatedTemperature => "elevated_temperature",
            RiskFactor::Tachycardia => "tachycardia",
            RiskFactor::Bradycardia => "bradycardia",
            RiskFactor::LowOxygenSaturation => "low_oxygen_saturation",
            RiskFactor::ElevatedBloodPressure => "elevated_blood_pressure",
            RiskFactor::LowBloodPressure => "low_blood_pressure",
            RiskFactor::SuspectedInfection => "suspected_infection",
            RiskFactor::WoundDrainage => "wound_drainage",
            RiskFactor::WoundSwelling => "wound_swelling",
            RiskFactor::WoundRedness => "wound_redness",
            RiskFactor::ReportedFever => "reported_fever",
            RiskFactor::WoundHealingDelay => "wound_healing_delay",
            RiskFactor::UncontrolledPain => "uncontrolled_pain",
            RiskFactor::WorseningPain => "worsening_pain",
            RiskFactor::LowEngagement => "low_engagement",
            RiskFactor::LowSessionTime => "low_session_time",
            RiskFactor::LowActiveDays => "low_active_days",
            RiskFactor::FrequentSymptomReports => "frequent_symptom_reports",
            RiskFactor::LowMood => "low_mood",
            RiskFactor::DecliningMood => "declining_mood",
            RiskFactor::PoorSleep => "poor_sleep",
            RiskFactor::AsaPhysicalStatus => "asa_physical_status",
        }
    }
}

/// Comorbidity tags the extractor recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Comorbidity {
    Diabetes,
    Hypertension,
    Obesity,
    Smoking,
    CongestiveHeartFailure,
    Copd,
    ChronicKidneyDisease,
    Immunosuppression,
    Osteoporosis,
    Cancer,
    MetastaticCancer,
    LiverDisease,
    Dementia,
    Stroke,
    MyocardialInfarction,
    PeripheralVascularDisease,
}

const COMORBIDITY_ALIASES: &[(&str, Comorbidity)] = &[
    ("diabetes", Comorbidity::Diabetes),
    ("diabetes_mellitus", Comorbidity::Diabetes),
    ("type_1_diabetes", Comorbidity::Diabetes),
    ("type_2_diabetes", Comorbidity::Diabetes),
    ("hypertension", Comorbidity::Hypertension),
    ("htn", Comorbidity::Hypertension),
    ("high_blood_pressure", Comorbidity::Hypertension),
    ("obesity", Comorbidity::Obesity),
    ("obese", Comorbidity::Obesity),
    ("smoking", Comorbidity::Smoking),
    ("smoker", Comorbidity::Smoking),
    ("tobacco_use", Comorbidity::Smoking),
    ("chf", Comorbidity::CongestiveHeartFailure),
    ("congestive_heart_failure", Comorbidity::CongestiveHeartFailure),
    ("heart_failure", Comorbidity::CongestiveHeartFailure),
    ("copd", Comorbidity::Copd),
    ("chronic_obstructive_pulmonary_disease", Comorbidity::Copd),
    ("ckd", Comorbidity::ChronicKidneyDisease),
    ("chronic_kidney_disease", Comorbidity::ChronicKidneyDisease),
    ("renal_disease", Comorbidity::ChronicKidneyDisease),
    ("immunosuppression", Comorbidity::Immunosuppression),
    ("immunosuppressed", Comorbidity::Immunosuppression),
    ("immunocompromised", Comorbidity::Immunosuppression),
    ("osteoporosis", Comorbidity::Osteoporosis),
    ("cancer", Comorbidity::Cancer),
    ("malignancy", Comorbidity::Cancer),
    ("metastatic_cancer", Comorbidity::MetastaticCancer),
    ("metastatic_solid_tumor", Comorbidity::MetastaticCancer),
    ("liver_disease", Comorbidity::LiverDisease),
    ("cirrhosis", Comorbidity::LiverDisease),
    ("dementia", Comorbidity::Dementia),
    ("stroke", Comorbidity::Stroke),
    ("cva", Comorbidity::Stroke),
    ("cerebrovascular_disease", Comorbidity::Stroke),
    ("myocardial_infarction", Comorbidity::MyocardialInfarction),
    ("mi", Comorbidity::MyocardialInfarction),
    ("prior_mi", Comorbidity::MyocardialInfarction),
    ("peripheral_vascular_disease", Comorbidity::PeripheralVascularDisease),
    ("pvd", Comorbidity::PeripheralVascularDisease),
];

impl Comorbidity {
    /// Match a free-form tag. Case, spaces and hyphens are ignored.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let normalized: String = tag
            .trim()
            .chars()
            .map(|c| match c {
                ' ' | '-' => '_',
                c => c.to_ascii_lowercase(),
            })
            .collect();

        COMORBIDITY_ALIASES
            .iter()
            .find(|(alias, _)| *alias == normalized)
            .map(|(_, comorbidity)| *comorbidity)
    }

    pub fn factor(&self) -> RiskFactor {
        match self {
            Comorbidity::Diabetes => RiskFactor::Diabetes,
            Comorbidity::Hypertension => RiskFactor::Hypertension,
            Comorbidity::Obesity => RiskFactor::Obesity,
            Comorbidity::Smoking => RiskFactor::Smoking,
            Comorbidity::CongestiveHeartFailure => RiskFactor::CongestiveHeartFailure,
            Comorbidity::Copd => RiskFactor::Copd,
            Comorbidity::ChronicKidneyDisease => RiskFactor::ChronicKidneyDisease,
            Comorbidity::Immunosuppression => RiskFactor::Immunosuppression,
            Comorbidity::Osteoporosis => RiskFactor::Osteoporosis,
            Comorbidity::Cancer => RiskFactor::Cancer,
            Comorbidity::MetastaticCancer => RiskFactor::MetastaticCancer,
            Comorbidity::LiverDisease => RiskFactor::LiverDisease,
            Comorbidity::Dementia => RiskFactor::Dementia,
            Comorbidity::Stroke => RiskFactor::Stroke,
            Comorbidity::MyocardialInfarction => RiskFactor::MyocardialInfarction,
            Comorbidity::PeripheralVascularDisease => RiskFactor::PeripheralVascularDisease,
        }
    }

    /// Smoking is a behavior, not a disease; it does not count toward burden.
    pub fn counts_toward_burden(&self) -> bool {
        !matches!(self, Comorbidity::Smoking)
    }
}

/// Numeric band boundary, used by the band lookup tables.
#[derive(Debug, Clone, Copy)]
pub enum RangeOp {
    LessThan(f64),
    LessEqual(f64),
    GreaterThan(f64),
    GreaterEqual(f64),
    Between(f64, f64), // Half-open: low <= v < high
}

impl RangeOp {
    pub fn matches(&self, value: f64) -> bool {
        match self {
            RangeOp::LessThan(n) => value < *n,
            RangeOp::LessEqual(n) => value <= *n,
            RangeOp::GreaterThan(n) => value > *n,
            RangeOp::GreaterEqual(n) => value >= *n,
            RangeOp::Between(low, high) => value >= *low && value < *high,
        }
    }
}

/// First band whose range matches wins.
pub fn band_lookup<T: Copy>(bands: &[(RangeOp, T)], value: f64) -> Option<T> {
    bands
        .iter()
        .find(|(range, _)| range.matches(value))
        .map(|(_, v)| *v)
}

/// Age bands and their intensity on the `age` factor.
pub const AGE_BANDS: &[(RangeOp, f64)] = &[
    (RangeOp::LessThan(40.0), 0.0),
    (RangeOp::Between(40.0, 65.0), 0.35),
    (RangeOp::Between(65.0, 80.0), 0.7),
    (RangeOp::GreaterEqual(80.0), 1.0),
];

/// BMI categories. Underweight and excess weight are separate factors because
/// they weigh differently on infection and fall risk.
pub const BMI_BANDS: &[(RangeOp, Option<(RiskFactor, f64)>)] = &[
    (RangeOp::LessThan(18.5), Some((RiskFactor::Underweight, 1.0))),
    (RangeOp::Between(18.5, 25.0), None),
    (RangeOp::Between(25.0, 30.0), Some((RiskFactor::ElevatedBmi, 0.3))),
    (RangeOp::Between(30.0, 40.0), Some((RiskFactor::ElevatedBmi, 0.7))),
    (RangeOp::GreaterEqual(40.0), Some((RiskFactor::ElevatedBmi, 1.0))),
];

/// One extracted factor with its intensity in (0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FactorValue {
    pub factor: RiskFactor,
    pub intensity: f64,
}

/// Clamped, defaulted values the index calculators read directly.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PatientProfile {
    pub age: Option<f64>,
    pub comorbidities: BTreeSet<Comorbidity>,
    /// 1 to 5.
    pub asa_class: u8,
    pub emergency: bool,
    pub length_of_stay_days: Option<f64>,
    pub ed_visits_last_6_months: u32,
}

impl PatientProfile {
    pub fn burden_count(&self) -> usize {
        self.comorbidities
            .iter()
            .filter(|c| c.counts_toward_burden())
            .count()
    }
}

/// Output of extraction: the normalized profile plus factors in extraction order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FactorSet {
    pub profile: PatientProfile,
    factors: Vec<FactorValue>,
}

impl FactorSet {
    pub fn new(profile: PatientProfile) -> Self {
        Self {
            profile,
            factors: Vec::new(),
        }
    }

    /// Record a factor. Intensity is clamped to [0, 1]; zero is dropped.
    /// Recording the same factor twice keeps the larger intensity at the
    /// position of the first record.
    pub fn record(&mut self, factor: RiskFactor, intensity: f64) {
        let intensity = if intensity.is_finite() {
            intensity.clamp(0.0, 1.0)
        } else {
            0.0
        };
        if intensity <= 0.0 {
            return;
        }
        match self.factors.iter_mut().find(|f| f.factor == factor) {
            Some(existing) => existing.intensity = existing.intensity.max(intensity),
            None => self.factors.push(FactorValue { factor, intensity }),
        }
    }

    pub fn intensity(&self, factor: RiskFactor) -> f64 {
        self.factors
            .iter()
            .find(|f| f.factor == factor)
            .map_or(0.0, |f| f.intensity)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FactorValue> {
        self.factors.iter()
    }

    pub fn len(&self) -> usize {
        self.factors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factor_names_match_serde() {
        for factor in [
            RiskFactor::Age,
            RiskFactor::CongestiveHeartFailure,
            RiskFactor::Copd,
            RiskFactor::LivesAloneWithoutCaregiver,
            RiskFactor::PriorEdVisits,
            RiskFactor::AsaPhysicalStatus,
        ] {
            let json = serde_json::to_string(&factor).unwrap();
            assert_eq!(json, format!("\"{}\"", factor.name()));
        }
    }

    #[test]
    fn test_comorbidity_aliases() {
        assert_eq!(
            Comorbidity::from_tag("CHF"),
            Some(Comorbidity::CongestiveHeartFailure)
        );
        assert_eq!(
            Comorbidity::from_tag(" Congestive Heart Failure "),
            Some(Comorbidity::CongestiveHeartFailure)
        );
        assert_eq!(
            Comorbidity::from_tag("type-2-diabetes"),
            Some(Comorbidity::Diabetes)
        );
        assert_eq!(Comorbidity::from_tag("seasonal allergies"), None);
    }

    #[test]
    fn test_range_less_than() {
        let range = RangeOp::LessThan(40.0);
        assert!(range.matches(39.9));
        assert!(!range.matches(40.0));
    }

    #[test]
    fn test_range_less_equal() {
        let range = RangeOp::LessEqual(40.0);
        assert!(range.matches(40.0));
        assert!(!range.matches(40.1));
    }

    #[test]
    fn test_range_greater_than() {
        let range = RangeOp::GreaterThan(38.0);
        assert!(!range.matches(38.0));
        assert!(range.matches(38.1));
    }

    #[test]
    fn test_range_between_is_half_open() {
        let range = RangeOp::Between(40.0, 65.0);
        assert!(!range.matches(39.9));
        assert!(range.matches(40.0));
        assert!(range.matches(64.9));
        assert!(!range.matches(65.0));
    }

    #[test]
    fn test_age_bands() {
        assert_eq!(band_lookup(AGE_BANDS, 30.0), Some(0.0));
        assert_eq!(band_lookup(AGE_BANDS, 40.0), Some(0.35));
        assert_eq!(band_lookup(AGE_BANDS, 72.0), Some(0.7));
        assert_eq!(band_lookup(AGE_BANDS, 80.0), Some(1.0));
        assert_eq!(band_lookup(AGE_BANDS, 130.0), Some(1.0));
    }

    #[test]
    fn test_bmi_bands() {
        assert_eq!(
            band_lookup(BMI_BANDS, 17.0),
            Some(Some((RiskFactor::Underweight, 1.0)))
        );
        assert_eq!(band_lookup(BMI_BANDS, 22.0), Some(None));
        assert_eq!(
            band_lookup(BMI_BANDS, 35.0),
            Some(Some((RiskFactor::ElevatedBmi, 0.7)))
        );
        assert_eq!(
            band_lookup(BMI_BANDS, 45.0),
            Some(Some((RiskFactor::ElevatedBmi, 1.0)))
        );
    }

    #[test]
    fn test_record_keeps_first_position_and_max_intensity() {
        let mut set = FactorSet::default();
        set.record(RiskFactor::Smoking, 0.5);
        set.record(RiskFactor::Age, 0.7);
        set.record(RiskFactor::Smoking, 1.0);
        set.record(RiskFactor::Diabetes, 0.0);

        let order: Vec<_> = set.iter().map(|f| f.factor).collect();
        assert_eq!(order, vec![RiskFactor::Smoking, RiskFactor::Age]);
        assert_eq!(set.intensity(RiskFactor::Smoking), 1.0);
        assert_eq!(set.intensity(RiskFactor::Diabetes), 0.0);
    }

    #[test]
    fn test_record_clamps_and_rejects_non_finite() {
        let mut set = FactorSet::default();
        set.record(RiskFactor::LowMood, 3.0);
        set.record(RiskFactor::PoorSleep, f64::NAN);
        assert_eq!(set.intensity(RiskFactor::LowMood), 1.0);
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_burden_excludes_smoking() {
        let profile = PatientProfile {
            comorbidities: [Comorbidity::Smoking, Comorbidity::Diabetes]
                .into_iter()
                .collect(),
            ..Default::default()
        };
        assert_eq!(profile.burden_count(), 1);
    }
}
