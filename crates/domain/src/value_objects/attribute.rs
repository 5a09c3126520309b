//! Attribute allocations and health ladders
//!
//! An attribute is stored as a flat modifier plus character points spent on it.
//! The resolved value is always recomputed; nothing here caches it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Point allocation for one attribute.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Attribute {
    /// Flat modifier from traits, equipment, etc.
    #[serde(rename = "mod", default)]
    pub modifier: f64,
    /// Character points spent
    #[serde(default)]
    pub points: f64,
}

impl Attribute {
    pub const fn new(modifier: f64, points: f64) -> Self {
        Self { modifier, points }
    }

    pub const fn points(points: f64) -> Self {
        Self {
            modifier: 0.0,
            points,
        }
    }
}

/// Attribute mnemonics usable as skill bases and defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AttributeKind {
    St,
    Dx,
    Iq,
    Ht,
    Per,
    Will,
}

impl AttributeKind {
    pub const ALL: [AttributeKind; 6] = [
        AttributeKind::St,
        AttributeKind::Dx,
        AttributeKind::Iq,
        AttributeKind::Ht,
        AttributeKind::Per,
        AttributeKind::Will,
    ];

    pub fn mnemonic(&self) -> &'static str {
        match self {
            Self::St => "ST",
            Self::Dx => "DX",
            Self::Iq => "IQ",
            Self::Ht => "HT",
            Self::Per => "PER",
            Self::Will => "WILL",
        }
    }

    /// Case-insensitive lookup; `None` when the name is not an attribute.
    pub fn from_mnemonic(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.mnemonic().eq_ignore_ascii_case(name))
    }
}

impl FromStr for AttributeKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_mnemonic(s).ok_or_else(|| DomainError::unrecognized("attribute", s))
    }
}

impl fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

/// Hit point condition, ordered from best to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HitPointState {
    #[default]
    Healthy,
    Injured,
    Reeling,
    Collapse,
    Check1,
    Check2,
    Check3,
    Check4,
    Dead,
}

impl HitPointState {
    /// Derive the state from current and maximum HP.
    pub fn from_values(current: i32, max: i32) -> Self {
        let max = max.max(1);
        if current >= max {
            Self::Healthy
        } else if current * 3 >= max {
            Self::Injured
        } else if current > 0 {
            Self::Reeling
        } else if current > -max {
            Self::Collapse
        } else if current > -2 * max {
            Self::Check1
        } else if current > -3 * max {
            Self::Check2
        } else if current > -4 * max {
            Self::Check3
        } else if current > -5 * max {
            Self::Check4
        } else {
            Self::Dead
        }
    }
}

/// Fatigue point condition, ordered from best to worst.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FatiguePointState {
    #[default]
    Fresh,
    Tired,
    Collapse,
    Unconscious,
}

impl FatiguePointState {
    /// Derive the state from current and maximum FP.
    pub fn from_values(current: i32, max: i32) -> Self {
        let max = max.max(1);
        if current * 3 >= max {
            Self::Fresh
        } else if current > 0 {
            Self::Tired
        } else if current > -max {
            Self::Collapse
        } else {
            Self::Unconscious
        }
    }
}
