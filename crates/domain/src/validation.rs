//! Input validation pass shared by every resolver.
//!
//! Hosts historically hand us blank or non-numeric fields and expect them to be
//! read as zero. Resolvers therefore run their numeric inputs through a
//! [`Sanitizer`] first: in lenient mode bad values become `0` and are recorded,
//! in strict mode the recorded issues fail the call.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::value_objects::ValidationMode;

/// Validation error for a field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationError {
    /// Field ID with the error
    pub field_id: String,
    /// Error message
    pub message: String,
}

impl ValidationError {
    pub fn new(field_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field_id: field_id.into(),
            message: message.into(),
        }
    }
}

/// A cross-reference that could not be followed.
///
/// Unlike [`DomainError::Resolution`], these do not abort the call: the missing
/// entry contributes zero and everything else is still computed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionIssue {
    /// What kind of thing was referenced ("skill", "material")
    pub kind: String,
    /// The name that was looked up
    pub name: String,
    /// Who referenced it (skill name, arrow index, ...)
    pub referenced_by: String,
}

/// Result of a resolver call together with everything it had to paper over.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Outcome<T> {
    pub value: T,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub issues: Vec<ValidationError>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unresolved: Vec<ResolutionIssue>,
}

impl<T> Outcome<T> {
    pub fn clean(value: T) -> Self {
        Self {
            value,
            issues: Vec::new(),
            unresolved: Vec::new(),
        }
    }

    pub fn is_clean(&self) -> bool {
        self.issues.is_empty() && self.unresolved.is_empty()
    }
}

/// Collects validation issues while coercing numeric inputs.
#[derive(Debug, Default)]
pub struct Sanitizer {
    issues: Vec<ValidationError>,
}

impl Sanitizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `value` if finite, otherwise records an issue and returns `0`.
    pub fn number(&mut self, field_id: &str, value: f64) -> f64 {
        if value.is_finite() {
            value
        } else {
            self.record(field_id, format!("expected a number, got {value}; using 0"));
            0.0
        }
    }

    /// Like [`Sanitizer::number`], additionally rejecting negatives.
    pub fn non_negative(&mut self, field_id: &str, value: f64) -> f64 {
        let value = self.number(field_id, value);
        if value < 0.0 {
            self.record(field_id, format!("must not be negative, got {value}; using 0"));
            0.0
        } else {
            value
        }
    }

    /// Replaces non-finite and non-positive values with `fallback`, one issue either way.
    pub fn positive_or(&mut self, field_id: &str, value: f64, fallback: f64) -> f64 {
        if !value.is_finite() {
            self.record(
                field_id,
                format!("expected a number, got {value}; using {fallback}"),
            );
            fallback
        } else if value <= 0.0 {
            self.record(
                field_id,
                format!("must be positive, got {value}; using {fallback}"),
            );
            fallback
        } else {
            value
        }
    }

    pub fn record(&mut self, field_id: &str, message: impl Into<String>) {
        let issue = ValidationError::new(field_id, message);
        tracing::warn!(field = %issue.field_id, message = %issue.message, "input coerced");
        self.issues.push(issue);
    }

    /// Close the pass: strict mode turns any recorded issue into an error.
    pub fn finish(self, mode: ValidationMode) -> Result<Vec<ValidationError>, DomainError> {
        match mode {
            ValidationMode::Strict if !self.issues.is_empty() => {
                Err(DomainError::Validation(self.issues))
            }
            _ => Ok(self.issues),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finite_values_pass_through() {
        let mut s = Sanitizer::new();
        assert_eq!(s.number("points", 12.5), 12.5);
        assert_eq!(s.finish(ValidationMode::Strict), Ok(Vec::new()));
    }

    #[test]
    fn nan_becomes_zero_and_is_recorded() {
        let mut s = Sanitizer::new();
        assert_eq!(s.number("points", f64::NAN), 0.0);
        let issues = s.finish(ValidationMode::Lenient).expect("lenient never fails");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].field_id, "points");
    }

    #[test]
    fn strict_mode_fails_on_any_issue() {
        let mut s = Sanitizer::new();
        s.non_negative("drawWeight", -5.0);
        let err = s.finish(ValidationMode::Strict).unwrap_err();
        assert!(matches!(err, DomainError::Validation(ref v) if v.len() == 1));
    }

    #[test]
    fn strict_mode_passes_clean_input() {
        let mut s = Sanitizer::new();
        s.positive_or("caliber", 9.0, 1.0);
        assert_eq!(s.finish(ValidationMode::Strict), Ok(Vec::new()));
    }

    #[test]
    fn positive_or_uses_fallback() {
        let mut s = Sanitizer::new();
        assert_eq!(s.positive_or("capacity", 0.0, 1.0), 1.0);
        assert_eq!(s.finish(ValidationMode::Lenient).unwrap().len(), 1);
    }

    #[test]
    fn positive_or_records_one_issue_per_bad_field() {
        let mut s = Sanitizer::new();
        assert_eq!(s.positive_or("focalArray", f64::NAN, 1.0), 1.0);
        assert_eq!(s.positive_or("weightTweak", f64::NEG_INFINITY, 1.0), 1.0);
        assert_eq!(s.positive_or("caliber", -3.0, 9.0), 9.0);
        let issues = s.finish(ValidationMode::Lenient).unwrap();
        let fields: Vec<&str> = issues.iter().map(|i| i.field_id.as_str()).collect();
        assert_eq!(fields, vec!["focalArray", "weightTweak", "caliber"]);
    }
}
