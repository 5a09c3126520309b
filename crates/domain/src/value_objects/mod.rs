//! Value objects shared by the resolvers

mod attribute;
mod damage_roll;
mod settings;

pub use attribute::{Attribute, AttributeKind, FatiguePointState, HitPointState};
pub use damage_roll::{DamageRoll, DamageRollParseError, POINTS_PER_DIE};
pub use settings::{CyclePolicy, RulesSettings, ValidationMode};

/// Item quality grade shared by bows, arrows and other crafted gear.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "camelCase")]
pub enum Quality {
    Cheap,
    #[default]
    Good,
    Fine,
}

impl Quality {
    pub fn cost_multiplier(&self) -> f64 {
        match self {
            Quality::Cheap => 0.7,
            Quality::Good => 1.0,
            Quality::Fine => 4.0,
        }
    }

    pub fn accuracy_modifier(&self) -> i32 {
        match self {
            Quality::Cheap => -1,
            Quality::Good => 0,
            Quality::Fine => 1,
        }
    }
}

impl std::str::FromStr for Quality {
    type Err = crate::DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cheap" => Ok(Quality::Cheap),
            "good" | "" => Ok(Quality::Good),
            "fine" => Ok(Quality::Fine),
            _ => Err(crate::DomainError::unrecognized("quality", s)),
        }
    }
}

/// Unit conversions used across the item designers.
pub mod units {
    pub const LBS_PER_KG: f64 = 2.20462;
    pub const KG_PER_LB: f64 = 0.453592;
    pub const YARDS_PER_METER: f64 = 1.09361;
    pub const GRAINS_PER_KG: f64 = 15430.0;
    pub const PASCALS_PER_PSI: f64 = 6896.0;
}
