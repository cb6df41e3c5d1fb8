use super::factors::{
    band_lookup, Comorbidity, FactorSet, PatientProfile, RiskFactor, AGE_BANDS, BMI_BANDS,
};
use crate::input::{AnesthesiaType, Complexity, RiskInput, SurgeryCategory, Trend, WoundPhase};
use std::collections::BTreeSet;
use tracing::debug;

pub const MAX_AGE: f64 = 130.0;
pub const DURATION_BASELINE_MINUTES: f64 = 60.0;
pub const DURATION_CAP_MINUTES: f64 = 360.0;
pub const MAX_COUNT: f64 = 10_000.0;

/// Drop NaN/infinite values so they fall back to the neutral default.
fn finite(field: &'static str, value: Option<f64>) -> Option<f64> {
    match value {
        Some(v) if !v.is_finite() => {
            debug!(field, "ignoring non-finite value");
            None
        }
        other => other,
    }
}

fn clamp_logged(field: &'static str, value: f64, min: f64, max: f64) -> f64 {
    let clamped = value.clamp(min, max);
    if clamped != value {
        debug!(field, raw = value, clamped, "clamped out-of-range value");
    }
    clamped
}

fn bounded(field: &'static str, value: Option<f64>, min: f64, max: f64) -> Option<f64> {
    finite(field, value).map(|v| clamp_logged(field, v, min, max))
}

/// Linear ramp: 0 at `start`, 1 at `full`. Works in either direction.
fn ramp(value: f64, start: f64, full: f64) -> f64 {
    ((value - start) / (full - start)).clamp(0.0, 1.0)
}

/// Event counts arrive as plain JSON numbers: round, then clamp to [0, MAX_COUNT].
fn count(field: &'static str, value: f64) -> u32 {
    match finite(field, Some(value)) {
        Some(v) => {
            let rounded = v.round();
            if rounded != v {
                debug!(field, raw = v, rounded, "rounded fractional count");
            }
            clamp_logged(field, rounded, 0.0, MAX_COUNT) as u32
        }
        None => 0,
    }
}

fn count_ratio(count: u32, cap: u32) -> f64 {
    count.min(cap) as f64 / cap as f64
}

/// Normalize a raw input bundle into weighted-ready factors.
///
/// Never fails: missing values are neutral and out-of-range values are clamped.
pub fn extract(input: &RiskInput) -> FactorSet {
    let mut set = FactorSet::new(build_profile(input));

    extract_demographics(input, &mut set);
    extract_surgical(input, &mut set);
    extract_compliance(input, &mut set);
    extract_clinical(input, &mut set);
    extract_behavioral(input, &mut set);

    debug!(factors = set.len(), "extracted risk factors");
    set
}

fn build_profile(input: &RiskInput) -> PatientProfile {
    let demographics = &input.demographics;
    let surgical = &input.surgical;

    let mut comorbidities = BTreeSet::new();
    for tag in &demographics.comorbidities {
        match Comorbidity::from_tag(tag) {
            Some(c) => {
                comorbidities.insert(c);
            }
            None => debug!(tag = %tag, "ignoring unrecognized comorbidity tag"),
        }
    }

    let asa_class = bounded("asa_class", demographics.asa_class.map(f64::round), 1.0, 5.0)
        .map_or(1, |class| class as u8);

    PatientProfile {
        age: bounded("age", demographics.age, 0.0, MAX_AGE),
        comorbidities,
        asa_class,
        emergency: surgical.emergency,
        length_of_stay_days: length_of_stay(input),
        ed_visits_last_6_months: count(
            "ed_visits_last_6_months",
            surgical.ed_visits_last_6_months,
        ),
    }
}

/// Explicit length of stay wins; otherwise derive it from the encounter dates.
fn length_of_stay(input: &RiskInput) -> Option<f64> {
    let surgical = &input.surgical;
    if let Some(days) = bounded("length_of_stay_days", surgical.length_of_stay_days, 0.0, 365.0) {
        return Some(days);
    }
    match (surgical.admission_date, surgical.discharge_date) {
        (Some(admitted), Some(discharged)) => {
            let days = (discharged - admitted).num_days();
            if days < 0 {
                debug!(%admitted, %discharged, "discharge precedes admission, ignoring dates");
                None
            } else {
                Some(clamp_logged("length_of_stay_days", days as f64, 0.0, 365.0))
            }
        }
        _ => None,
    }
}

fn extract_demographics(input: &RiskInput, set: &mut FactorSet) {
    let demographics = &input.demographics;

    if let Some(age) = set.profile.age {
        let intensity = band_lookup(AGE_BANDS, age).unwrap_or(0.0);
        set.record(RiskFactor::Age, intensity);
    }

    if let Some(bmi) = bounded("bmi", demographics.bmi, 10.0, 80.0) {
        if let Some(Some((factor, intensity))) = band_lookup(BMI_BANDS, bmi) {
            set.record(factor, intensity);
        }
    }

    if demographics.smoker {
        set.record(RiskFactor::Smoking, 1.0);
    }

    let comorbidities: Vec<Comorbidity> = set.profile.comorbidities.iter().copied().collect();
    for comorbidity in comorbidities {
        set.record(comorbidity.factor(), 1.0);
    }
    set.record(
        RiskFactor::ComorbidityBurden,
        set.profile.burden_count().min(5) as f64 / 5.0,
    );

    // A caregiver in the home cancels the factor; an unknown caregiver status halves it.
    if demographics.lives_alone {
        match demographics.has_caregiver {
            Some(true) => {}
            Some(false) => set.record(RiskFactor::LivesAloneWithoutCaregiver, 1.0),
            None => set.record(RiskFactor::LivesAloneWithoutCaregiver, 0.5),
        }
    }

    let engagement = bounded("engagement_score", input.behavioral.engagement_score, 0.0, 1.0)
        .unwrap_or(1.0);
    if demographics.primary_language_english == Some(false) && engagement < 0.5 {
        set.record(RiskFactor::LanguageAccessBarrier, 1.0);
    }
}

fn extract_surgical(input: &RiskInput, set: &mut FactorSet) {
    let surgical = &input.surgical;

    if let Some(complexity) = surgical.complexity {
        let intensity = match complexity {
            Complexity::Minor => 0.0,
            Complexity::Moderate => 0.4,
            Complexity::Complex => 0.8,
            Complexity::HighlyComplex => 1.0,
        };
        set.record(RiskFactor::SurgicalComplexity, intensity);
    }

    if let Some(minutes) = bounded("duration_minutes", surgical.duration_minutes, 0.0, 1440.0) {
        set.record(
            RiskFactor::ProcedureDuration,
            ramp(minutes, DURATION_BASELINE_MINUTES, DURATION_CAP_MINUTES),
        );
    }

    if let Some(category) = surgical.category() {
        let intensity = match category {
            SurgeryCategory::Cardiac => 1.0,
            SurgeryCategory::Thoracic => 0.9,
            SurgeryCategory::Neurological => 0.85,
            SurgeryCategory::Vascular => 0.8,
            SurgeryCategory::Abdominal => 0.6,
            SurgeryCategory::Orthopedic => 0.5,
            SurgeryCategory::Other => 0.3,
        };
        set.record(RiskFactor::ProcedureSeverity, intensity);
    }

    if surgical.emergency {
        set.record(RiskFactor::EmergencySurgery, 1.0);
    }
    if surgical.reoperation {
        set.record(RiskFactor::Reoperation, 1.0);
    }

    match surgical.anesthesia_type {
        Some(AnesthesiaType::General) => set.record(RiskFactor::GeneralAnesthesia, 1.0),
        Some(AnesthesiaType::Sedation) => set.record(RiskFactor::GeneralAnesthesia, 0.25),
        _ => {}
    }

    if let Some(days) = set.profile.length_of_stay_days {
        set.record(RiskFactor::LengthOfStay, ramp(days, 2.0, 14.0));
    }

    set.record(
        RiskFactor::PriorEdVisits,
        count_ratio(set.profile.ed_visits_last_6_months, 4),
    );
    set.record(
        RiskFactor::PriorAdmissions,
        count_ratio(
            count("prior_admissions_12_months", surgical.prior_admissions_12_months),
            3,
        ),
    );
}

fn extract_compliance(input: &RiskInput, set: &mut FactorSet) {
    let compliance = &input.compliance;

    // Rates default to full compliance; the gap is what carries risk.
    let rate = |field, value| bounded(field, value, 0.0, 1.0).unwrap_or(1.0);
    set.record(
        RiskFactor::MedicationAdherenceGap,
        1.0 - rate("medication_adherence", compliance.medication_adherence),
    );
    set.record(
        RiskFactor::CarePlanIncompletion,
        1.0 - rate("mission_completion", compliance.mission_completion),
    );
    set.record(
        RiskFactor::AppointmentAttendanceGap,
        1.0 - rate("appointment_attendance", compliance.appointment_attendance),
    );

    set.record(
        RiskFactor::MissedMedicationDays,
        count_ratio(count("missed_medication_days", compliance.missed_medication_days), 7),
    );
    set.record(
        RiskFactor::MissedAppointments,
        count_ratio(count("missed_appointments", compliance.missed_appointments), 3),
    );

    if compliance.cost_barrier {
        set.record(RiskFactor::CostBarrier, 1.0);
    }

    let by_medications = compliance
        .medication_count
        .map_or(0.0, |n| ramp(count("medication_count", n) as f64, 4.0, 10.0));
    let by_comorbidities = set.profile.burden_count().min(6) as f64 / 6.0;
    set.record(RiskFactor::Polypharmacy, by_medications.max(by_comorbidities));
}

fn extract_clinical(input: &RiskInput, set: &mut FactorSet) {
    let clinical = &input.clinical;
    let vitals = &clinical.vitals;

    if let Some(temperature) = bounded("temperature", vitals.temperature, 30.0, 45.0) {
        if temperature > 38.0 {
            set.record(RiskFactor::ElevatedTemperature, 1.0);
        }
    }

    if let Some(heart_rate) = bounded("heart_rate", vitals.heart_rate, 0.0, 300.0) {
        if heart_rate > 100.0 {
            set.record(RiskFactor::Tachycardia, 1.0);
        } else if heart_rate < 50.0 {
            set.record(RiskFactor::Bradycardia, 1.0);
        }
    }

    if let Some(spo2) = bounded("spo2", vitals.spo2, 0.0, 100.0) {
        if spo2 < 94.0 {
            set.record(RiskFactor::LowOxygenSaturation, 1.0);
        }
    }

    let systolic = bounded("systolic_bp", vitals.systolic_bp, 40.0, 300.0);
    let diastolic = bounded("diastolic_bp", vitals.diastolic_bp, 20.0, 200.0);
    if systolic.is_some_and(|s| s > 160.0) || diastolic.is_some_and(|d| d > 110.0) {
        set.record(RiskFactor::ElevatedBloodPressure, 1.0);
    }
    if systolic.is_some_and(|s| s < 90.0) || diastolic.is_some_and(|d| d < 50.0) {
        set.record(RiskFactor::LowBloodPressure, 1.0);
    }

    let signs = [
        (clinical.infection_suspected, RiskFactor::SuspectedInfection),
        (clinical.drainage, RiskFactor::WoundDrainage),
        (clinical.swelling, RiskFactor::WoundSwelling),
        (clinical.redness, RiskFactor::WoundRedness),
        (clinical.fever, RiskFactor::ReportedFever),
    ];
    for (present, factor) in signs {
        if present {
            set.record(factor, 1.0);
        }
    }

    if clinical.wound_on_track == Some(false) {
        // A wound stalled early in healing is worse than one stalled late.
        let intensity = match clinical.wound_healing_phase {
            Some(WoundPhase::Maturation) => 0.4,
            Some(WoundPhase::Proliferative) => 0.7,
            Some(WoundPhase::Hemostasis) | Some(WoundPhase::Inflammatory) | None => 1.0,
        };
        set.record(RiskFactor::WoundHealingDelay, intensity);
    }

    if let Some(pain) = bounded("pain_level", clinical.pain_level, 0.0, 10.0) {
        set.record(RiskFactor::UncontrolledPain, ramp(pain, 4.0, 10.0));
    }
    if clinical.pain_trend == Some(Trend::Worsening) {
        set.record(RiskFactor::WorseningPain, 1.0);
    }
}

fn extract_behavioral(input: &RiskInput, set: &mut FactorSet) {
    let behavioral = &input.behavioral;

    if let Some(engagement) = bounded("engagement_score", behavioral.engagement_score, 0.0, 1.0) {
        set.record(RiskFactor::LowEngagement, ramp(engagement, 0.5, 0.0));
    }

    if let Some(minutes) =
        bounded("daily_session_minutes", behavioral.daily_session_minutes, 0.0, 1440.0)
    {
        set.record(RiskFactor::LowSessionTime, ramp(minutes, 5.0, 0.0));
    }

    if let Some(days) = behavioral.days_active_last_7 {
        let days = count("days_active_last_7", days).min(7) as f64;
        set.record(RiskFactor::LowActiveDays, ramp(days, 4.0, 0.0));
    }

    let weekly = count_ratio(count("symptom_reports_7d", behavioral.symptom_reports_7d), 7);
    let monthly = count_ratio(count("symptom_reports_30d", behavioral.symptom_reports_30d), 20);
    set.record(RiskFactor::FrequentSymptomReports, weekly.max(monthly));

    let moods: Vec<f64> = behavioral
        .mood_scores
        .iter()
        .filter_map(|m| bounded("mood_scores", Some(*m), 0.0, 10.0))
        .collect();
    if !moods.is_empty() {
        let mean = moods.iter().sum::<f64>() / moods.len() as f64;
        set.record(RiskFactor::LowMood, ramp(mean, 5.0, 0.0));
    }
    if let (Some(first), Some(last)) = (moods.first(), moods.last()) {
        if moods.len() >= 2 {
            set.record(RiskFactor::DecliningMood, ramp(first - last, 2.0, 6.0));
        }
    }

    if let Some(sleep) = bounded("sleep_quality", behavioral.sleep_quality, 0.0, 10.0) {
        set.record(RiskFactor::PoorSleep, ramp(sleep, 5.0, 0.0));
    }
}
