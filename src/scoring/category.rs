use serde::{Deserialize, Serialize};
use std::fmt;

/// The five independently scored risk categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Infection,
    Readmission,
    Fall,
    MentalHealth,
    MedicationNonAdherence,
}

impl Category {
    /// Also the order used for tie-breaking when contributors are merged.
    pub const ALL: [Category; 5] = [
        Category::Infection,
        Category::Readmission,
        Category::Fall,
        Category::MentalHealth,
        Category::MedicationNonAdherence,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Infection => "Infection",
            Category::Readmission => "Readmission",
            Category::Fall => "Fall",
            Category::MentalHealth => "Mental health",
            Category::MedicationNonAdherence => "Medication non-adherence",
        }
    }

    /// ASA physical status scales only the perioperative categories.
    pub fn uses_asa_multiplier(&self) -> bool {
        matches!(self, Category::Infection | Category::Readmission)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
