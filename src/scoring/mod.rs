pub mod aggregate;
pub mod category;
pub mod config;
pub mod engine;
pub mod extract;
pub mod factors;
pub mod indices;
pub mod tier;
pub mod validation;
pub mod weights;

pub use aggregate::{aggregate, CategoryScores};
pub use category::Category;
pub use config::*;
pub use engine::{
    assess_json, assess_risk, assess_risk_with, score_category, CategoryScore, Contributor,
    RiskAssessment,
};
pub use extract::extract;
pub use factors::{Comorbidity, FactorSet, FactorValue, PatientProfile, RiskFactor};
pub use indices::{charlson_condition_points, compute_charlson, compute_lace};
pub use tier::{classify, Tier};
pub use validation::validate_scoring;
pub use weights::WEIGHTS_VERSION;
