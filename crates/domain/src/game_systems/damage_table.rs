//! Striking strength to thrust/swing damage.
//!
//! The table is listed row by row up to ST 40; above that it advances in steps of
//! five. Anything past 100 reads the 100 row, anything below 0 reads the 0 row.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::value_objects::DamageRoll;

/// Highest striking strength with its own entry.
pub const MAX_STRIKING_STRENGTH: i64 = 100;

/// Thrust and swing damage for one striking strength.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrikingDamage {
    pub thrust: DamageRoll,
    pub swing: DamageRoll,
}

const fn row(td: i32, ta: i32, sd: i32, sa: i32) -> StrikingDamage {
    StrikingDamage {
        thrust: DamageRoll::new(td, ta),
        swing: DamageRoll::new(sd, sa),
    }
}

/// One row per striking strength from 0 through 40.
const LOW_ROWS: [StrikingDamage; 41] = [
    row(1, -6, 1, -5), // 0
    row(1, -6, 1, -5),
    row(1, -6, 1, -5),
    row(1, -5, 1, -4),
    row(1, -5, 1, -4),
    row(1, -4, 1, -3), // 5
    row(1, -4, 1, -3),
    row(1, -3, 1, -2),
    row(1, -3, 1, -2),
    row(1, -2, 1, -1),
    row(1, -2, 1, 0), // 10
    row(1, -1, 1, 1),
    row(1, -1, 1, 2),
    row(1, 0, 2, -1),
    row(1, 0, 2, 0),
    row(1, 1, 2, 1), // 15
    row(1, 1, 2, 2),
    row(1, 2, 3, -1),
    row(1, 2, 3, 0),
    row(2, -1, 3, 1),
    row(2, -1, 3, 2), // 20
    row(2, 0, 4, -1),
    row(2, 0, 4, 0),
    row(2, 1, 4, 1),
    row(2, 1, 4, 2),
    row(2, 2, 5, -1), // 25
    row(2, 2, 5, 0),
    row(3, -1, 5, 1),
    row(3, -1, 5, 1),
    row(3, 0, 5, 2),
    row(3, 0, 5, 2), // 30
    row(3, 1, 6, -1),
    row(3, 1, 6, -1),
    row(3, 2, 6, 0),
    row(3, 2, 6, 0),
    row(4, -1, 6, 1), // 35
    row(4, -1, 6, 1),
    row(4, 0, 6, 2),
    row(4, 0, 6, 2),
    row(4, 1, 7, -1),
    row(4, 1, 7, -1), // 40
];

/// Rows for 45, 50, ... 100.
const HIGH_ROWS: [StrikingDamage; 12] = [
    row(5, 0, 7, 1),   // 45
    row(5, 2, 8, -1),  // 50
    row(6, 0, 8, 1),   // 55
    row(7, -1, 9, 0),  // 60
    row(7, 1, 9, 2),   // 65
    row(8, 0, 10, 0),  // 70
    row(8, 2, 10, 2),  // 75
    row(9, 0, 11, 0),  // 80
    row(9, 2, 11, 2),  // 85
    row(10, 0, 12, 0), // 90
    row(10, 2, 12, 2), // 95
    row(11, 0, 13, 0), // 100
];

/// Table lookup for an integer striking strength, clamped to 0..=100.
pub fn striking_damage(sst: i64) -> StrikingDamage {
    let sst = sst.clamp(0, MAX_STRIKING_STRENGTH);
    if sst <= 40 {
        LOW_ROWS[sst as usize]
    } else {
        // 41-44 read the 40 row, 45-49 the 45 row, ...
        let step = ((sst - 40) / 5) as usize;
        if step == 0 {
            LOW_ROWS[40]
        } else {
            HIGH_ROWS[step - 1]
        }
    }
}

fn checked_sst(sst: f64) -> Result<i64, DomainError> {
    if !sst.is_finite() {
        return Err(DomainError::validation(
            "strikingStrength",
            format!("expected a number, got {sst}"),
        ));
    }
    Ok(sst.floor().clamp(0.0, MAX_STRIKING_STRENGTH as f64) as i64)
}

/// Thrust damage for a striking strength; non-finite input is an error, never NaN.
pub fn striking_strength_to_thrust(sst: f64) -> Result<DamageRoll, DomainError> {
    Ok(striking_damage(checked_sst(sst)?).thrust)
}

/// Swing damage for a striking strength; non-finite input is an error, never NaN.
pub fn striking_strength_to_swing(sst: f64) -> Result<DamageRoll, DomainError> {
    Ok(striking_damage(checked_sst(sst)?).swing)
}

/// Parse a striking strength typed by the host ("12", " 15 ").
pub fn parse_striking_strength(input: &str) -> Result<f64, DomainError> {
    input
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| {
            DomainError::validation("strikingStrength", format!("'{}' is not a number", input))
        })
}

/// Split a dice expression into `(dice, adds)` on its "d6".
pub fn decompose_damage(expression: &str) -> Result<(i32, i32), DomainError> {
    Ok(DamageRoll::parse(expression)?.decompose())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn known_rows() {
        assert_eq!(striking_damage(10).thrust.to_string(), "1d6-2");
        assert_eq!(striking_damage(10).swing.to_string(), "1d6");
        assert_eq!(striking_damage(13).swing.to_string(), "2d6-1");
        assert_eq!(striking_damage(20).thrust.to_string(), "2d6-1");
        assert_eq!(striking_damage(20).swing.to_string(), "3d6+2");
        assert_eq!(striking_damage(100).thrust.to_string(), "11d6");
        assert_eq!(striking_damage(100).swing.to_string(), "13d6");
    }

    #[test]
    fn in_between_high_values_use_lower_row() {
        assert_eq!(striking_damage(44), striking_damage(40));
        assert_eq!(striking_damage(49), striking_damage(45));
        assert_eq!(striking_damage(99), striking_damage(95));
    }

    #[test]
    fn out_of_range_clamps() {
        assert_eq!(striking_damage(250), striking_damage(100));
        assert_eq!(striking_damage(-3), striking_damage(0));
        assert_eq!(
            striking_strength_to_thrust(101.0).unwrap(),
            striking_strength_to_thrust(100.0).unwrap()
        );
    }

    #[test]
    fn non_numeric_input_is_rejected() {
        assert!(matches!(
            striking_strength_to_swing(f64::NAN),
            Err(DomainError::Validation(_))
        ));
        assert!(striking_strength_to_thrust(f64::INFINITY).is_err());
        assert!(parse_striking_strength("strong").is_err());
        assert_eq!(parse_striking_strength(" 12 ").unwrap(), 12.0);
    }

    #[test]
    fn decompose_splits_on_d6() {
        assert_eq!(decompose_damage("2d6+1").unwrap(), (2, 1));
        assert_eq!(decompose_damage("1d6-4").unwrap(), (1, -4));
        assert_eq!(decompose_damage("7d6").unwrap(), (7, 0));
        assert!(decompose_damage("2d8").is_err());
    }

    #[test]
    fn table_is_monotonic() {
        for sst in 1..=MAX_STRIKING_STRENGTH {
            let prev = striking_damage(sst - 1);
            let cur = striking_damage(sst);
            assert!(cur.thrust.expected_value() >= prev.thrust.expected_value(), "thrust at {sst}");
            assert!(cur.swing.expected_value() >= prev.swing.expected_value(), "swing at {sst}");
        }
    }

    proptest! {
        #[test]
        fn saturates_above_100(sst in 100i64..100_000) {
            prop_assert_eq!(striking_damage(sst), striking_damage(100));
        }

        #[test]
        fn swing_never_below_thrust(sst in 0i64..=100) {
            let row = striking_damage(sst);
            prop_assert!(row.swing.expected_value() >= row.thrust.expected_value());
        }
    }
}
