//! Per-label confidence thresholds

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use senyas_core::{SenyasError, SenyasResult};

/// Confidence a label must reach before it counts as a confirmed hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdTable {
    pub default: f32,
    pub per_label: BTreeMap<String, f32>,
}

impl Default for ThresholdTable {
    fn default() -> Self {
        ThresholdTable::uniform(0.95)
    }
}

impl ThresholdTable {
    pub fn uniform(default: f32) -> Self {
        Self {
            default,
            per_label: BTreeMap::new(),
        }
    }

    pub fn with_label(mut self, label: &str, threshold: f32) -> Self {
        self.per_label.insert(label.to_string(), threshold);
        self
    }

    /// Letters: 0.95, with `I` at 0.85
    pub fn alphabet() -> Self {
        ThresholdTable::uniform(0.95).with_label("I", 0.85)
    }

    pub fn digits() -> Self {
        ThresholdTable::uniform(0.70)
    }

    pub fn phrases() -> Self {
        ThresholdTable::uniform(0.90)
    }

    pub fn threshold_for(&self, label: &str) -> f32 {
        self.per_label.get(label).copied().unwrap_or(self.default)
    }

    /// Every threshold must lie in (0, 1]
    pub fn validate(&self) -> SenyasResult<()> {
        check_unit("default threshold", self.default)?;
        for (label, threshold) in &self.per_label {
            check_unit(&format!("threshold for {label:?}"), *threshold)?;
        }
        Ok(())
    }
}

pub(crate) fn check_unit(what: &str, value: f32) -> SenyasResult<()> {
    if value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(SenyasError::InvalidConfig(format!(
            "{what} must be in (0, 1], got {value}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alphabet_defaults() {
        let table = ThresholdTable::alphabet();
        assert_eq!(table.threshold_for("A"), 0.95);
        assert_eq!(table.threshold_for("I"), 0.85);
        assert!(table.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        assert!(ThresholdTable::uniform(0.0).validate().is_err());
        assert!(ThresholdTable::uniform(1.0).validate().is_ok());
        assert!(ThresholdTable::alphabet()
            .with_label("Q", 1.2)
            .validate()
            .is_err());
    }

    #[test]
    fn test_partial_json_override() {
        let table: ThresholdTable = serde_json::from_str(r#"{"per_label": {"M": 0.8}}"#).unwrap();
        assert_eq!(table.default, 0.95);
        assert_eq!(table.threshold_for("M"), 0.8);
    }
}
