use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One assessment request: a snapshot of everything known about a patient.
///
/// All five sections are required. Inside them almost every field is optional
/// and a missing value means "no risk signal".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskInput {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<String>,
    pub demographics: Demographics,
    pub surgical: Surgical,
    pub compliance: Compliance,
    pub clinical: Clinical,
    pub behavioral: Behavioral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Gender {
    Male,
    Female,
    Other,
    Unknown,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Demographics {
    pub age: Option<f64>,
    pub bmi: Option<f64>,
    pub smoker: bool,
    /// Free-form tags such as "diabetes" or "CHF". Unknown tags are ignored.
    pub comorbidities: Vec<String>,
    /// ASA physical status, 1 (healthy) to 5 (moribund). Rounded and clamped.
    pub asa_class: Option<f64>,
    pub gender: Option<Gender>,
    pub lives_alone: bool,
    pub has_caregiver: Option<bool>,
    pub primary_language_english: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SurgeryCategory {
    Cardiac,
    Thoracic,
    Neurological,
    Vascular,
    Abdominal,
    Orthopedic,
    Other,
}

impl SurgeryCategory {
    /// Best-effort category from a free-text procedure name.
    pub fn infer(surgery_type: &str) -> Option<Self> {
        const KEYWORDS: &[(&str, SurgeryCategory)] = &[
            ("bypass", SurgeryCategory::Cardiac),
            ("cabg", SurgeryCategory::Cardiac),
            ("cardiac", SurgeryCategory::Cardiac),
            ("valve", SurgeryCategory::Cardiac),
            ("heart", SurgeryCategory::Cardiac),
            ("lobectomy", SurgeryCategory::Thoracic),
            ("thora", SurgeryCategory::Thoracic),
            ("lung", SurgeryCategory::Thoracic),
            ("crani", SurgeryCategory::Neurological),
            ("spinal", SurgeryCategory::Neurological),
            ("neuro", SurgeryCategory::Neurological),
            ("aneurysm", SurgeryCategory::Vascular),
            ("endarterectomy", SurgeryCategory::Vascular),
            ("vascular", SurgeryCategory::Vascular),
            ("append", SurgeryCategory::Abdominal),
            ("cholecyst", SurgeryCategory::Abdominal),
            ("colectomy", SurgeryCategory::Abdominal),
            ("hernia", SurgeryCategory::Abdominal),
            ("bowel", SurgeryCategory::Abdominal),
            ("gastr", SurgeryCategory::Abdominal),
            ("hip", SurgeryCategory::Orthopedic),
            ("knee", SurgeryCategory::Orthopedic),
            ("arthroplasty", SurgeryCategory::Orthopedic),
            ("fracture", SurgeryCategory::Orthopedic),
            ("shoulder", SurgeryCategory::Orthopedic),
        ];

        let lowered = surgery_type.to_ascii_lowercase();
        KEYWORDS
            .iter()
            .find(|(keyword, _)| lowered.contains(keyword))
            .map(|(_, category)| *category)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Complexity {
    Minor,
    Moderate,
    Complex,
    HighlyComplex,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnesthesiaType {
    General,
    Regional,
    Local,
    Sedation,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Surgical {
    pub surgery_type: Option<String>,
    pub surgery_category: Option<SurgeryCategory>,
    pub duration_minutes: Option<f64>,
    pub complexity: Option<Complexity>,
    pub anesthesia_type: Option<AnesthesiaType>,
    pub emergency: bool,
    pub reoperation: bool,
    /// Explicit length of stay. Wins over the admission/discharge dates.
    pub length_of_stay_days: Option<f64>,
    pub admission_date: Option<NaiveDate>,
    pub discharge_date: Option<NaiveDate>,
    pub ed_visits_last_6_months: f64,
    pub prior_admissions_12_months: f64,
}

impl Surgical {
    /// Category given explicitly, else inferred from the procedure name.
    pub fn category(&self) -> Option<SurgeryCategory> {
        self.surgery_category
            .or_else(|| self.surgery_type.as_deref().and_then(SurgeryCategory::infer))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Compliance {
    /// Share of prescribed doses taken, 0 to 1.
    pub medication_adherence: Option<f64>,
    /// Share of care-plan tasks completed, 0 to 1.
    pub mission_completion: Option<f64>,
    /// Share of scheduled appointments attended, 0 to 1.
    pub appointment_attendance: Option<f64>,
    pub missed_medication_days: f64,
    pub missed_appointments: f64,
    pub cost_barrier: bool,
    pub medication_count: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Vitals {
    /// Degrees Celsius.
    pub temperature: Option<f64>,
    pub heart_rate: Option<f64>,
    pub systolic_bp: Option<f64>,
    pub diastolic_bp: Option<f64>,
    /// Percent.
    pub spo2: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WoundPhase {
    Hemostasis,
    Inflammatory,
    Proliferative,
    Maturation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Trend {
    Improving,
    Stable,
    Worsening,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Clinical {
    pub vitals: Vitals,
    pub wound_healing_phase: Option<WoundPhase>,
    pub wound_on_track: Option<bool>,
    /// 0 (none) to 10 (worst imaginable).
    pub pain_level: Option<f64>,
    pub pain_trend: Option<Trend>,
    pub infection_suspected: bool,
    pub drainage: bool,
    pub swelling: bool,
    pub redness: bool,
    pub fever: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Behavioral {
    /// App engagement, 0 to 1.
    pub engagement_score: Option<f64>,
    pub daily_session_minutes: Option<f64>,
    pub days_active_last_7: Option<f64>,
    pub symptom_reports_7d: f64,
    pub symptom_reports_30d: f64,
    /// Most recent last, each 0 to 10.
    pub mood_scores: Vec<f64>,
    /// 0 (no sleep) to 10 (restful).
    pub sleep_quality: Option<f64>,
}
