//! Standard weight tables.
//!
//! Points are pre-scaled so a maximal realistic profile lands near 100 before
//! saturation. Every table is tunable through the `scoring` config block; the
//! version string identifies which revision produced an assessment.

use super::config::{CategoryTables, CategoryWeights, WeightTable};
use super::factors::RiskFactor::{self, *};

pub const WEIGHTS_VERSION: &str = "2024.2";

pub const STANDARD_TOP_CONTRIBUTORS: usize = 5;
pub const STANDARD_OVERALL_TOP_CONTRIBUTORS: usize = 5;

/// Overall risk never drops below this share of the worst category.
pub const STANDARD_ESCALATION_RATIO: f64 = 0.4;

/// ASA I through V, applied to infection and readmission.
pub const STANDARD_ASA_MULTIPLIERS: [f64; 5] = [1.0, 1.1, 1.25, 1.45, 1.7];

pub const STANDARD_CATEGORY_WEIGHTS: CategoryWeights = CategoryWeights {
    infection: 0.30,
    readmission: 0.30,
    fall: 0.15,
    mental_health: 0.10,
    medication_non_adherence: 0.15,
};

const INFECTION: &[(RiskFactor, f64)] = &[
    (SurgicalComplexity, 12.0),
    (ProcedureDuration, 10.0),
    (ProcedureSeverity, 4.0),
    (EmergencySurgery, 6.0),
    (Reoperation, 8.0),
    (GeneralAnesthesia, 2.0),
    (LengthOfStay, 3.0),
    (Age, 4.0),
    (ElevatedBmi, 6.0),
    (Underweight, 3.0),
    (Smoking, 8.0),
    (Diabetes, 10.0),
    (Immunosuppression, 10.0),
    (Obesity, 4.0),
    (Copd, 3.0),
    (ChronicKidneyDisease, 3.0),
    (CongestiveHeartFailure, 2.0),
    (Cancer, 4.0),
    (MetastaticCancer, 6.0),
    (LiverDisease, 3.0),
    (ComorbidityBurden, 4.0),
    (ElevatedTemperature, 8.0),
    (Tachycardia, 4.0),
    (LowOxygenSaturation, 3.0),
    (SuspectedInfection, 15.0),
    (WoundDrainage, 10.0),
    (WoundSwelling, 7.0),
    (WoundRedness, 7.0),
    (ReportedFever, 10.0),
    (WoundHealingDelay, 8.0),
];

const READMISSION: &[(RiskFactor, f64)] = &[
    (Age, 12.0),
    (ComorbidityBurden, 12.0),
    (CongestiveHeartFailure, 8.0),
    (Copd, 6.0),
    (ChronicKidneyDisease, 6.0),
    (Diabetes, 4.0),
    (Hypertension, 2.0),
    (Obesity, 2.0),
    (Smoking, 3.0),
    (Cancer, 5.0),
    (MetastaticCancer, 8.0),
    (LiverDisease, 5.0),
    (Dementia, 5.0),
    (Stroke, 4.0),
    (MyocardialInfarction, 5.0),
    (PeripheralVascularDisease, 3.0),
    (Immunosuppression, 3.0),
    (ProcedureSeverity, 8.0),
    (SurgicalComplexity, 6.0),
    (ProcedureDuration, 5.0),
    (EmergencySurgery, 8.0),
    (Reoperation, 8.0),
    (LengthOfStay, 8.0),
    (PriorEdVisits, 8.0),
    (PriorAdmissions, 10.0),
    (MedicationAdherenceGap, 8.0),
    (AppointmentAttendanceGap, 6.0),
    (CarePlanIncompletion, 4.0),
    (MissedAppointments, 4.0),
    (LivesAloneWithoutCaregiver, 8.0),
    (ElevatedTemperature, 3.0),
    (Tachycardia, 3.0),
    (LowOxygenSaturation, 5.0),
    (LowBloodPressure, 4.0),
    (ElevatedBloodPressure, 2.0),
    (SuspectedInfection, 6.0),
    (WoundHealingDelay, 4.0),
    (FrequentSymptomReports, 5.0),
    (LowEngagement, 3.0),
    (LowActiveDays, 2.0),
    (UncontrolledPain, 3.0),
    (WorseningPain, 3.0),
];

const FALL: &[(RiskFactor, f64)] = &[
    (Age, 25.0),
    (Underweight, 8.0),
    (ElevatedBmi, 5.0),
    (Osteoporosis, 15.0),
    (Diabetes, 6.0),
    (Stroke, 8.0),
    (Dementia, 10.0),
    (PeripheralVascularDisease, 3.0),
    (LivesAloneWithoutCaregiver, 12.0),
    (Polypharmacy, 8.0),
    (MedicationAdherenceGap, 4.0),
    (Bradycardia, 5.0),
    (LowBloodPressure, 8.0),
    (LowOxygenSaturation, 4.0),
    (UncontrolledPain, 5.0),
    (PoorSleep, 4.0),
    (GeneralAnesthesia, 2.0),
    (LowActiveDays, 3.0),
];

const MENTAL_HEALTH: &[(RiskFactor, f64)] = &[
    (LowMood, 25.0),
    (DecliningMood, 15.0),
    (PoorSleep, 12.0),
    (FrequentSymptomReports, 10.0),
    (LowEngagement, 10.0),
    (LowSessionTime, 5.0),
    (LowActiveDays, 8.0),
    (UncontrolledPain, 6.0),
    (WorseningPain, 4.0),
    (LivesAloneWithoutCaregiver, 6.0),
    (ComorbidityBurden, 4.0),
    (CarePlanIncompletion, 3.0),
    (Dementia, 3.0),
];

const MEDICATION_NON_ADHERENCE: &[(RiskFactor, f64)] = &[
    (MedicationAdherenceGap, 35.0),
    (MissedMedicationDays, 15.0),
    (CarePlanIncompletion, 8.0),
    (AppointmentAttendanceGap, 6.0),
    (MissedAppointments, 5.0),
    (CostBarrier, 10.0),
    (LanguageAccessBarrier, 10.0),
    (Polypharmacy, 8.0),
    (LowEngagement, 6.0),
    (LivesAloneWithoutCaregiver, 4.0),
    (Dementia, 6.0),
    (LowMood, 3.0),
];

fn table(entries: &[(RiskFactor, f64)]) -> WeightTable {
    entries.iter().copied().collect()
}

pub fn standard_tables() -> CategoryTables {
    CategoryTables {
        infection: table(INFECTION),
        readmission: table(READMISSION),
        fall: table(FALL),
        mental_health: table(MENTAL_HEALTH),
        medication_non_adherence: table(MEDICATION_NON_ADHERENCE),
    }
}
