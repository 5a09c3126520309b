//! Permissive numeric input.
//!
//! Hosts send numbers as numbers, as strings, as blanks, as `null` and now and
//! then as booleans. All of them are accepted; anything that is not a plain
//! number is remembered so the intake can report it.

use std::fmt;
use std::str::FromStr;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};

use armory_domain::{DomainError, Sanitizer, ValidationError, ValidationMode};

/// How a [`LenientNumber`] got its value when the input was not a plain number.
#[derive(Debug, Clone, PartialEq)]
pub enum Coercion {
    /// Parsed from a numeric string
    FromString(String),
    /// Empty or whitespace-only string, read as 0
    Blank,
    /// `null`, read as 0
    Null,
    /// Boolean, read as 1 or 0
    Bool(bool),
    /// A string that is not a number, read as 0
    NotANumber(String),
}

impl fmt::Display for Coercion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Coercion::FromString(s) => write!(f, "read number from string '{s}'"),
            Coercion::Blank => write!(f, "blank value; using 0"),
            Coercion::Null => write!(f, "null value; using 0"),
            Coercion::Bool(b) => write!(f, "boolean {b} read as {}", u8::from(*b)),
            Coercion::NotANumber(s) => write!(f, "expected a number, got '{s}'; using 0"),
        }
    }
}

/// A number that deserializes from almost anything.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LenientNumber {
    value: f64,
    coercion: Option<Coercion>,
}

impl LenientNumber {
    pub fn new(value: f64) -> Self {
        Self {
            value,
            coercion: None,
        }
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn coercion(&self) -> Option<&Coercion> {
        self.coercion.as_ref()
    }

    fn coerced(value: f64, coercion: Coercion) -> Self {
        Self {
            value,
            coercion: Some(coercion),
        }
    }

    fn from_text(text: &str) -> Self {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Self::coerced(0.0, Coercion::Blank);
        }
        match f64::from_str(trimmed) {
            Ok(v) if v.is_finite() => Self::coerced(v, Coercion::FromString(text.to_string())),
            _ => Self::coerced(0.0, Coercion::NotANumber(text.to_string())),
        }
    }
}

impl From<f64> for LenientNumber {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl<'de> Deserialize<'de> for LenientNumber {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match serde_json::Value::deserialize(deserializer)? {
            serde_json::Value::Number(n) => n
                .as_f64()
                .map(Self::new)
                .ok_or_else(|| de::Error::custom("number out of range")),
            serde_json::Value::String(s) => Ok(Self::from_text(&s)),
            serde_json::Value::Bool(b) => Ok(Self::coerced(f64::from(u8::from(b)), Coercion::Bool(b))),
            serde_json::Value::Null => Ok(Self::coerced(0.0, Coercion::Null)),
            other => Err(de::Error::custom(format!("expected a number, got {other}"))),
        }
    }
}

impl Serialize for LenientNumber {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_f64(self.value)
    }
}

/// Converts wire DTOs into domain inputs, recording every coercion.
#[derive(Debug, Default)]
pub struct Intake {
    sanitizer: Sanitizer,
}

impl Intake {
    pub fn new() -> Self {
        Self::default()
    }

    /// The number's value; a coerced input is recorded against `field`.
    pub fn number(&mut self, field: &str, input: &LenientNumber) -> f64 {
        if let Some(coercion) = input.coercion() {
            self.sanitizer.record(field, coercion.to_string());
        }
        input.value()
    }

    /// Like [`Intake::number`], falling back to `default` when the field was absent.
    pub fn number_or(&mut self, field: &str, input: &Option<LenientNumber>, default: f64) -> f64 {
        match input {
            Some(n) => self.number(field, n),
            None => default,
        }
    }

    /// Whole-number field; fractions are rounded to the nearest integer.
    pub fn integer(&mut self, field: &str, input: &LenientNumber) -> i32 {
        let value = self.number(field, input);
        if value.is_finite() {
            value.round().clamp(f64::from(i32::MIN), f64::from(i32::MAX)) as i32
        } else {
            0
        }
    }

    pub fn optional_integer(&mut self, field: &str, input: &Option<LenientNumber>) -> Option<i32> {
        input.as_ref().map(|n| self.integer(field, n))
    }

    /// Non-negative count; negatives become 0 and are recorded.
    pub fn count_or(&mut self, field: &str, input: &Option<LenientNumber>, default: u32) -> u32 {
        let Some(n) = input else {
            return default;
        };
        let value = self.integer(field, n);
        if value < 0 {
            self.sanitizer
                .record(field, format!("must not be negative, got {value}; using 0"));
            0
        } else {
            value as u32
        }
    }

    pub fn tech_level_or(&mut self, field: &str, input: &Option<LenientNumber>, default: u8) -> u8 {
        let Some(n) = input else {
            return default;
        };
        let value = self.integer(field, n);
        if !(0..=12).contains(&value) {
            self.sanitizer
                .record(field, format!("tech level {value} outside 0-12; clamped"));
        }
        value.clamp(0, 12) as u8
    }

    /// Parse an enum code, falling back to `default` when absent or blank.
    pub fn code_or<T>(&mut self, input: &Option<String>, default: T) -> Result<T, DomainError>
    where
        T: FromStr<Err = DomainError>,
    {
        match input.as_deref().map(str::trim) {
            None | Some("") => Ok(default),
            Some(code) => code.parse(),
        }
    }

    /// Close the intake; strict mode fails on any recorded coercion.
    pub fn finish(self, mode: ValidationMode) -> Result<Vec<ValidationError>, DomainError> {
        self.sanitizer.finish(mode)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> LenientNumber {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn plain_numbers_are_not_coerced() {
        let n = parse(json!(12.5));
        assert_eq!(n.value(), 12.5);
        assert!(n.coercion().is_none());
    }

    #[test]
    fn strings_blanks_nulls_and_bools() {
        assert_eq!(parse(json!(" 7 ")).value(), 7.0);
        assert!(matches!(parse(json!("7")).coercion(), Some(Coercion::FromString(_))));
        assert_eq!(parse(json!("")).coercion(), Some(&Coercion::Blank));
        assert_eq!(parse(json!(null)).value(), 0.0);
        assert_eq!(parse(json!(true)).value(), 1.0);
        let garbage = parse(json!("abc"));
        assert_eq!(garbage.value(), 0.0);
        assert!(matches!(garbage.coercion(), Some(Coercion::NotANumber(_))));
        assert_eq!(parse(json!("NaN")).value(), 0.0);
    }

    #[test]
    fn objects_are_rejected() {
        assert!(serde_json::from_value::<LenientNumber>(json!({"a": 1})).is_err());
    }

    #[test]
    fn intake_records_coercions() {
        let mut intake = Intake::new();
        assert_eq!(intake.number("st.points", &parse(json!(10))), 10.0);
        assert_eq!(intake.number("st.mod", &parse(json!("x"))), 0.0);
        assert_eq!(intake.integer("magery", &parse(json!("2.6"))), 3);
        let issues = intake.finish(ValidationMode::Lenient).unwrap();
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0].field_id, "st.mod");
    }

    #[test]
    fn strict_intake_fails() {
        let mut intake = Intake::new();
        intake.number("points", &parse(json!("")));
        assert!(matches!(
            intake.finish(ValidationMode::Strict),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn absent_fields_use_defaults() {
        let mut intake = Intake::new();
        assert_eq!(intake.number_or("tl", &None, 7.0), 7.0);
        assert_eq!(intake.count_or("capacity", &Some(parse(json!(-3))), 5), 0);
        assert_eq!(intake.tech_level_or("tl", &Some(parse(json!(15))), 7), 12);
        let code: armory_domain::Quality = intake.code_or(&None, armory_domain::Quality::Good).unwrap();
        assert_eq!(code, armory_domain::Quality::Good);
        assert_eq!(intake.finish(ValidationMode::Lenient).unwrap().len(), 2);
    }
}
