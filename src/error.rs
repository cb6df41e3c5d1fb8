use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Top-level sections every risk input must carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Section {
    Demographics,
    Surgical,
    Compliance,
    Clinical,
    Behavioral,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Section::Demographics,
        Section::Surgical,
        Section::Compliance,
        Section::Clinical,
        Section::Behavioral,
    ];

    /// JSON key of the section inside a risk input document.
    pub fn key(&self) -> &'static str {
        match self {
            Section::Demographics => "demographics",
            Section::Surgical => "surgical",
            Section::Compliance => "compliance",
            Section::Clinical => "clinical",
            Section::Behavioral => "behavioral",
        }
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Section::Demographics => "Demographics",
            Section::Surgical => "Surgical",
            Section::Compliance => "Compliance",
            Section::Clinical => "Clinical",
            Section::Behavioral => "Behavioral",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum RiskError {
    #[error("missing required section: {section}")]
    MissingSection { section: Section },

    #[error("malformed risk input: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("batch entry {index}: {source}")]
    InvalidBatch {
        index: usize,
        #[source]
        source: Box<RiskError>,
    },
}

impl RiskError {
    /// The section that was absent, if this is a missing-section failure.
    pub fn missing_section(&self) -> Option<Section> {
        match self {
            RiskError::MissingSection { section } => Some(*section),
            RiskError::InvalidBatch { source, .. } => source.missing_section(),
            RiskError::Malformed(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_section_message_names_section() {
        let err = RiskError::MissingSection {
            section: Section::Compliance,
        };
        assert_eq!(err.to_string(), "missing required section: Compliance");
        assert_eq!(err.missing_section(), Some(Section::Compliance));
    }

    #[test]
    fn test_batch_error_keeps_inner_section() {
        let err = RiskError::InvalidBatch {
            index: 3,
            source: Box::new(RiskError::MissingSection {
                section: Section::Behavioral,
            }),
        };
        assert_eq!(
            err.to_string(),
            "batch entry 3: missing required section: Behavioral"
        );
        assert_eq!(err.missing_section(), Some(Section::Behavioral));
    }
}
