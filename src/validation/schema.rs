//! Flat field-presence schemas
//!
//! A schema lists the keys a JSON object must carry. Optional keys are kept
//! for documentation and never checked.

#![allow(dead_code)]

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Required and optional field names, in declaration order
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    pub required: Vec<String>,
    #[serde(default)]
    pub optional: Vec<String>,
}

impl Schema {
    pub fn new<S: AsRef<str>>(required: &[S]) -> Self {
        Self {
            required: required.iter().map(|s| s.as_ref().to_string()).collect(),
            optional: Vec::new(),
        }
    }

    pub fn with_optional<S: AsRef<str>>(mut self, optional: &[S]) -> Self {
        self.optional = optional.iter().map(|s| s.as_ref().to_string()).collect();
        self
    }
}

/// Outcome of a validation pass. `is_valid` is true exactly when `errors` is empty.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

impl ValidationResult {
    pub fn from_errors(errors: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }

    pub fn valid() -> Self {
        Self::from_errors(Vec::new())
    }

    /// Append another result's errors
    pub fn merge(mut self, other: ValidationResult) -> Self {
        self.errors.extend(other.errors);
        self.is_valid = self.errors.is_empty();
        self
    }

    /// Turn violations into an error listing all of them
    pub fn into_result(self) -> Result<()> {
        if self.is_valid {
            Ok(())
        } else {
            anyhow::bail!("{}", self.errors.join("; "))
        }
    }
}

/// Check that `record` carries every required key of `schema`
pub fn validate(record: &Value, schema: &Schema) -> ValidationResult {
    let fields = record.as_object();
    let errors = schema
        .required
        .iter()
        .filter(|key| !fields.is_some_and(|f| f.contains_key(key.as_str())))
        .map(|key| format!("Missing required field: {key}"))
        .collect();

    ValidationResult::from_errors(errors)
}

/// Validate every element of an array, prefixing errors with the element index
pub fn validate_array(records: &Value, schema: &Schema) -> ValidationResult {
    let Some(items) = records.as_array() else {
        return ValidationResult::from_errors(vec!["Response is not an array".to_string()]);
    };

    items
        .iter()
        .enumerate()
        .fold(ValidationResult::valid(), |acc, (i, item)| {
            let item_result = validate(item, schema);
            acc.merge(ValidationResult::from_errors(
                item_result
                    .errors
                    .into_iter()
                    .map(|e| format!("Item {i}: {e}"))
                    .collect(),
            ))
        })
}
