//! Unified error types for the domain layer
//!
//! Every resolver reports failures through [`DomainError`]. Failures are scoped to a
//! single resolution call; nothing here is fatal to the host process.

use thiserror::Error;

use crate::validation::ValidationError;
use crate::value_objects::DamageRollParseError;

/// Unified error type for domain operations
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    /// Numeric input failed validation (strict mode only)
    #[error("Validation failed: {}", format_validation(.0))]
    Validation(Vec<ValidationError>),

    /// An enum-like code was not one of the recognized values
    #[error("Unrecognized {field}: '{value}'")]
    Unrecognized { field: &'static str, value: String },

    /// A cross-reference required by the whole computation is missing
    #[error("Unresolved {kind}: '{name}'")]
    Resolution { kind: &'static str, name: String },

    /// A physical input made the formulas undefined (division by zero, NaN)
    #[error("Cannot compute {quantity}: {reason}")]
    Computation {
        quantity: &'static str,
        reason: String,
    },

    /// Skill defaults form a cycle and the cycle policy rejects them
    #[error("Circular skill defaults: {}", .chain.join(" -> "))]
    CircularDefault { chain: Vec<String> },

    /// Parse error (for value objects)
    #[error("Parse error: {0}")]
    Parse(String),
}

fn format_validation(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field_id, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

impl DomainError {
    /// Creates a validation error for a single offending field.
    ///
    /// # Example
    /// ```ignore
    /// if !sst.is_finite() {
    ///     return Err(DomainError::validation("sst", "not a number"));
    /// }
    /// ```
    pub fn validation(field_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation(vec![ValidationError::new(field_id, message)])
    }

    /// Create an unrecognized-code error
    pub fn unrecognized(field: &'static str, value: impl Into<String>) -> Self {
        Self::Unrecognized {
            field,
            value: value.into(),
        }
    }

    /// Create a missing cross-reference error
    pub fn resolution(kind: &'static str, name: impl Into<String>) -> Self {
        Self::Resolution {
            kind,
            name: name.into(),
        }
    }

    /// Create a computation error
    pub fn computation(quantity: &'static str, reason: impl Into<String>) -> Self {
        Self::Computation {
            quantity,
            reason: reason.into(),
        }
    }

    /// Creates a parse error for string-to-value conversion failures.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Fails with a computation error unless `value` is finite and strictly positive.
    pub fn require_positive(quantity: &'static str, value: f64) -> Result<f64, Self> {
        if value.is_finite() && value > 0.0 {
            Ok(value)
        } else {
            Err(Self::computation(
                quantity,
                format!("expected a positive finite value, got {value}"),
            ))
        }
    }

    /// Fails with a computation error unless `value` is finite.
    pub fn require_finite(quantity: &'static str, value: f64) -> Result<f64, Self> {
        if value.is_finite() {
            Ok(value)
        } else {
            Err(Self::computation(quantity, format!("result is {value}")))
        }
    }
}

impl From<DamageRollParseError> for DomainError {
    fn from(err: DamageRollParseError) -> Self {
        Self::Parse(err.to_string())
    }
}
