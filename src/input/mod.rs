pub mod types;

pub use types::{
    AnesthesiaType, Behavioral, Clinical, Complexity, Compliance, Demographics, Gender, RiskInput,
    SurgeryCategory, Surgical, Trend, Vitals, WoundPhase,
};

use crate::error::{RiskError, Section};
use anyhow::{Context, Result};
use serde_json::Value;
use std::fs;
use std::io::Read;
use std::path::Path;

/// Parse a risk input document.
///
/// A section that is absent or `null` fails with [`RiskError::MissingSection`];
/// any other shape problem is [`RiskError::Malformed`].
pub fn parse_input(json: &str) -> Result<RiskInput, RiskError> {
    let value: Value = serde_json::from_str(json)?;
    input_from_value(value)
}

pub fn input_from_value(value: Value) -> Result<RiskInput, RiskError> {
    if let Some(object) = value.as_object() {
        for section in Section::ALL {
            match object.get(section.key()) {
                None | Some(Value::Null) => return Err(RiskError::MissingSection { section }),
                Some(_) => {}
            }
        }
    }
    Ok(serde_json::from_value(value)?)
}

/// Parse a document holding either one input object or an array of them.
pub fn parse_inputs(json: &str) -> Result<Vec<RiskInput>, RiskError> {
    match serde_json::from_str::<Value>(json)? {
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(index, item)| {
                input_from_value(item).map_err(|e| RiskError::InvalidBatch {
                    index,
                    source: Box::new(e),
                })
            })
            .collect(),
        single => Ok(vec![input_from_value(single)?]),
    }
}

/// Read inputs from a file, or from stdin when `path` is `-`.
pub fn load_inputs(path: &Path) -> Result<Vec<RiskInput>> {
    let content = if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read risk input from stdin")?;
        buf
    } else {
        fs::read_to_string(path)
            .with_context(|| format!("Failed to read risk input at {}", path.display()))?
    };

    parse_inputs(&content).with_context(|| format!("Invalid risk input in {}", path.display()))
}
