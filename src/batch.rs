use crate::input::{load_inputs, RiskInput};
use crate::scoring::{assess_risk_with, RiskAssessment, ScoringModel};
use anyhow::Result;
use rayon::prelude::*;
use std::cmp::Ordering;
use std::collections::HashSet;
use std::path::PathBuf;
use tracing::{debug, warn};

/// Read every input file (or stdin for `-`) into one list, in argument order.
pub fn load_batch(paths: &[PathBuf]) -> Result<Vec<RiskInput>> {
    let mut inputs = Vec::new();
    for path in paths {
        inputs.extend(load_inputs(path)?);
    }
    Ok(inputs)
}

/// Assess many patients and rank them, highest overall risk first.
///
/// A repeated `patientId` keeps the first input and drops the rest. Inputs
/// without one are named `patient-N` by their 1-based position, skipping
/// names already taken by a supplied id. Equal scores keep input order.
pub fn assess_batch(inputs: Vec<RiskInput>, model: &ScoringModel) -> Vec<RiskAssessment> {
    let total = inputs.len();

    let mut taken = HashSet::new();
    let kept: Vec<(usize, RiskInput)> = inputs
        .into_iter()
        .enumerate()
        .filter(|(index, input)| match input.patient_id {
            Some(ref id) if !taken.insert(id.clone()) => {
                warn!(patient_id = %id, index, "duplicate patient id, keeping first occurrence");
                false
            }
            _ => true,
        })
        .collect();

    let unique: Vec<(usize, String, RiskInput)> = kept
        .into_iter()
        .map(|(index, input)| {
            let id = match input.patient_id {
                Some(ref id) => id.clone(),
                None => generated_id(index, &mut taken),
            };
            (index, id, input)
        })
        .collect();

    debug!(total, unique = unique.len(), "assessing batch");

    let mut ranked: Vec<(usize, RiskAssessment)> = unique
        .par_iter()
        .map(|(index, id, input)| {
            let mut assessment = assess_risk_with(input, model);
            assessment.patient_id = Some(id.clone());
            (*index, assessment)
        })
        .collect();

    // Highest risk first, then input position
    ranked.sort_by(|(ia, a), (ib, b)| {
        b.overall_risk
            .score
            .partial_cmp(&a.overall_risk.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| ia.cmp(ib))
    });

    ranked.into_iter().map(|(_, assessment)| assessment).collect()
}

/// `patient-N` for the input at `index`, suffixed until it is unused.
fn generated_id(index: usize, taken: &mut HashSet<String>) -> String {
    let base = format!("patient-{}", index + 1);
    let mut id = base.clone();
    let mut suffix = 1;
    while taken.contains(&id) {
        suffix += 1;
        id = format!("{base}-{suffix}");
    }
    taken.insert(id.clone());
    id
}
