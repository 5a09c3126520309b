//! Damage roll value object
//!
//! Damage is always expressed in six-sided dice plus a flat add, written the way
//! the host sheets print it: "2d6+1", "1d6-2", "3d6".

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Average value of one six-sided die.
pub const POINTS_PER_DIE: f64 = 3.5;

/// Error when parsing a damage expression
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DamageRollParseError {
    /// The expression string is empty
    #[error("Empty damage expression")]
    Empty,
    /// Expected NdM+K with M = 6
    #[error("Invalid damage format: {0}")]
    InvalidFormat(String),
}

/// A parsed damage expression like "2d6+3"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DamageRoll {
    /// Number of six-sided dice
    pub dice: i32,
    /// Flat value added after rolling (may be negative)
    pub adds: i32,
}

impl DamageRoll {
    pub const fn new(dice: i32, adds: i32) -> Self {
        Self { dice, adds }
    }

    pub const fn zero() -> Self {
        Self { dice: 0, adds: 0 }
    }

    /// Convert raw damage points into dice: one die per 3.5 points, the
    /// remainder rounded into adds. Negative or non-finite points give no damage.
    pub fn from_points(points: f64) -> Self {
        if !points.is_finite() || points <= 0.0 {
            return Self::zero();
        }
        let dice = (points / POINTS_PER_DIE).floor();
        let adds = (points - dice * POINTS_PER_DIE).round();
        Self {
            dice: dice as i32,
            adds: adds as i32,
        }
    }

    /// Parse an expression by splitting on "d6".
    ///
    /// Supported formats:
    /// - "NdM" - N dice, no adds
    /// - "NdM+K" / "NdM-K" - N dice plus or minus K
    pub fn parse(input: &str) -> Result<Self, DamageRollParseError> {
        let input = input.trim().to_lowercase().replace(' ', "");
        if input.is_empty() {
            return Err(DamageRollParseError::Empty);
        }

        let (dice_str, adds_str) = input.split_once("d6").ok_or_else(|| {
            DamageRollParseError::InvalidFormat(format!("Missing 'd6' in '{}'", input))
        })?;

        let dice: i32 = if dice_str.is_empty() {
            1
        } else {
            parse_digits(dice_str).ok_or_else(|| {
                DamageRollParseError::InvalidFormat(format!("Invalid dice count: '{}'", dice_str))
            })?
        };

        let adds: i32 = if adds_str.is_empty() {
            0
        } else if let Some(digits) = adds_str.strip_prefix('+') {
            parse_digits(digits).ok_or_else(|| {
                DamageRollParseError::InvalidFormat(format!("Invalid adds: '{}'", adds_str))
            })?
        } else if let Some(digits) = adds_str.strip_prefix('-') {
            parse_digits(digits).map(|n| -n).ok_or_else(|| {
                DamageRollParseError::InvalidFormat(format!("Invalid adds: '{}'", adds_str))
            })?
        } else {
            return Err(DamageRollParseError::InvalidFormat(format!(
                "Expected '+' or '-' before adds in '{}'",
                input
            )));
        };

        Ok(Self { dice, adds })
    }

    /// Mean of the roll, used for ordering damage tables.
    pub fn expected_value(&self) -> f64 {
        f64::from(self.dice) * POINTS_PER_DIE + f64::from(self.adds)
    }

    /// Split into `(dice, adds)`.
    pub fn decompose(&self) -> (i32, i32) {
        (self.dice, self.adds)
    }
}

/// Unsigned decimal only; a sign here would be a second one.
fn parse_digits(text: &str) -> Option<i32> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

impl fmt::Display for DamageRoll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.adds {
            0 => write!(f, "{}d6", self.dice),
            a if a > 0 => write!(f, "{}d6+{}", self.dice, a),
            a => write!(f, "{}d6{}", self.dice, a),
        }
    }
}

impl FromStr for DamageRoll {
    type Err = DamageRollParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(DamageRoll::new(2, 1).to_string(), "2d6+1");
        assert_eq!(DamageRoll::new(1, -2).to_string(), "1d6-2");
        assert_eq!(DamageRoll::new(3, 0).to_string(), "3d6");
    }

    #[test]
    fn test_parse_with_adds() {
        assert_eq!(DamageRoll::parse("2d6+1").unwrap(), DamageRoll::new(2, 1));
        assert_eq!(DamageRoll::parse("1d6-3").unwrap(), DamageRoll::new(1, -3));
        assert_eq!(DamageRoll::parse(" 11D6 ").unwrap(), DamageRoll::new(11, 0));
    }

    #[test]
    fn test_parse_shorthand_single_die() {
        assert_eq!(DamageRoll::parse("d6+2").unwrap(), DamageRoll::new(1, 2));
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(DamageRoll::parse(""), Err(DamageRollParseError::Empty));
        assert!(matches!(
            DamageRoll::parse("2d8"),
            Err(DamageRollParseError::InvalidFormat(_))
        ));
        assert!(matches!(
            DamageRoll::parse("xd6"),
            Err(DamageRollParseError::InvalidFormat(_))
        ));
        assert!(matches!(
            DamageRoll::parse("2d6+x"),
            Err(DamageRollParseError::InvalidFormat(_))
        ));
    }

    #[test]
    fn test_parse_rejects_doubled_signs() {
        for input in ["2d6+-3", "2d6--3", "2d6++3", "2d6-+3", "-2d6", "+2d6+1", "2d6+", "2d6-"] {
            assert!(
                matches!(DamageRoll::parse(input), Err(DamageRollParseError::InvalidFormat(_))),
                "{input} should not parse"
            );
        }
        assert_eq!(DamageRoll::parse("2d6-0").unwrap(), DamageRoll::new(2, 0));
    }

    #[test]
    fn test_from_points() {
        assert_eq!(DamageRoll::from_points(0.0), DamageRoll::zero());
        assert_eq!(DamageRoll::from_points(-4.0), DamageRoll::zero());
        assert_eq!(DamageRoll::from_points(f64::NAN), DamageRoll::zero());
        assert_eq!(DamageRoll::from_points(3.5), DamageRoll::new(1, 0));
        assert_eq!(DamageRoll::from_points(8.9), DamageRoll::new(2, 2));
        assert_eq!(DamageRoll::from_points(3.4), DamageRoll::new(0, 3));
    }

    #[test]
    fn test_expected_value() {
        assert_eq!(DamageRoll::new(2, 1).expected_value(), 8.0);
        assert_eq!(DamageRoll::new(1, -6).expected_value(), -2.5);
    }

    #[test]
    fn test_display_parse_agree() {
        let roll = DamageRoll::new(4, -1);
        assert_eq!(roll.to_string().parse::<DamageRoll>().unwrap(), roll);
    }
}
