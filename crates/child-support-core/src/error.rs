use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChildSupportError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Unsupported financial year: {year} (no rate table configured)")]
    UnsupportedFinancialYear { year: String },

    #[error("Invalid configuration: {field}: {reason}")]
    InvalidConfig { field: String, reason: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for ChildSupportError {
    fn from(e: serde_json::Error) -> Self {
        ChildSupportError::SerializationError(e.to_string())
    }
}

impl ChildSupportError {
    pub fn invalid_config(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ChildSupportError::InvalidConfig {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// A single rejected input field. `field` is a JSON-path style locator such
/// as `children[1].carePercentages`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldViolation {
    pub field: String,
    pub reason: String,
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.reason)
    }
}

/// Every violation found in one input, not just the first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("Invalid input: {}", join_violations(.violations))]
pub struct ValidationError {
    pub violations: Vec<FieldViolation>,
}

impl ValidationError {
    pub fn single(field: impl Into<String>, reason: impl Into<String>) -> Self {
        let mut err = ValidationError::default();
        err.push(field, reason);
        err
    }

    pub fn push(&mut self, field: impl Into<String>, reason: impl Into<String>) {
        self.violations.push(FieldViolation {
            field: field.into(),
            reason: reason.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// True if any violation concerns `field` or one of its children.
    pub fn mentions(&self, field: &str) -> bool {
        self.violations.iter().any(|v| v.field.starts_with(field))
    }

    /// `Ok(())` when nothing was collected.
    pub fn into_result(self) -> Result<(), ValidationError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

fn join_violations(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

// ---------------------------------------------------------------------------
// Rule evaluation
// ---------------------------------------------------------------------------

/// Failure of a single scoring rule. Never escapes the scoring engine: the
/// rule is treated as not satisfied and the error is logged and reported.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleEvaluationError {
    #[error("unknown metric '{metric}'")]
    UnknownMetric { metric: String },

    #[error("metric '{metric}' is not a {expected}")]
    TypeMismatch {
        metric: String,
        expected: &'static str,
    },

    #[error("invalid range: min {min} exceeds max {max}")]
    InvalidRange { min: String, max: String },
}
