//! Explainable post-surgical risk scoring.
//!
//! A [`RiskInput`] snapshot is reduced to risk factors, scored per category
//! against weight tables, aggregated into an overall tier and paired with the
//! LACE and Charlson indices. Every score carries the factors that produced it.

pub mod batch;
pub mod config;
pub mod error;
pub mod input;
pub mod output;
pub mod scoring;

pub use batch::assess_batch;
pub use error::{RiskError, Section};
pub use input::{parse_input, parse_inputs, RiskInput};
pub use scoring::{
    assess_json, assess_risk, assess_risk_with, CategoryScore, Contributor, RiskAssessment,
    ScoringModel, Tier,
};
