use serde::{Deserialize, Serialize};

use crate::scoring::{ScoringConfig, ScoringModel};

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub scoring: Option<ScoringConfig>,
}

impl Config {
    /// Resolve the scoring block, or the standard model when there is none.
    pub fn scoring_model(&self) -> Result<ScoringModel, Vec<String>> {
        match &self.scoring {
            Some(scoring) => ScoringModel::from_config(scoring),
            None => Ok(ScoringModel::standard().clone()),
        }
    }
}
