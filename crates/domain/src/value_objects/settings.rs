//! Rules settings value object
//!
//! The host keeps a handful of table-wide toggles (super-science lasers, heroic bow
//! damage, ...). They are passed explicitly into every resolver call rather than
//! read from ambient state, so two calls with the same inputs and settings always
//! agree.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How the input boundary reacts to blank or non-numeric fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationMode {
    /// Coerce to zero and report the coercion alongside the result
    #[default]
    Lenient,
    /// Fail the call with `DomainError::Validation`
    Strict,
}

impl FromStr for ValidationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lenient" => Ok(Self::Lenient),
            "strict" => Ok(Self::Strict),
            other => Err(format!("unknown validation mode '{other}'")),
        }
    }
}

/// What to do when skill defaults refer to each other in a loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CyclePolicy {
    /// Read other skills' previously provided levels in one pass; cycles see stale values
    #[default]
    SinglePass,
    /// Detect cycles and fail; otherwise resolve in dependency order with fresh levels
    Reject,
}

impl FromStr for CyclePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "single_pass" | "singlepass" => Ok(Self::SinglePass),
            "reject" => Ok(Self::Reject),
            other => Err(format!("unknown cycle policy '{other}'")),
        }
    }
}

impl fmt::Display for CyclePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SinglePass => write!(f, "single_pass"),
            Self::Reject => write!(f, "reject"),
        }
    }
}

/// All configurable rules settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RulesSettings {
    // ============================================================================
    // Item design
    // ============================================================================
    /// Whether custom beam weapons may use super-science options
    #[serde(default)]
    pub allow_super_science_custom_lasers: bool,

    /// Use the cinematic damage divisor for bows
    #[serde(default)]
    pub heroic_bow_damage: bool,

    /// Lowest recoil ever displayed for a custom firearm
    #[serde(default = "default_minimum_displayed_recoil")]
    pub minimum_displayed_recoil: f64,

    // ============================================================================
    // Character
    // ============================================================================
    /// Maximum dabbler bonus applied to attribute defaults
    #[serde(default = "default_dabbler_cap")]
    pub dabbler_cap: i32,

    #[serde(default)]
    pub default_cycle_policy: CyclePolicy,

    // ============================================================================
    // Input boundary
    // ============================================================================
    #[serde(default)]
    pub validation_mode: ValidationMode,
}

fn default_minimum_displayed_recoil() -> f64 { 2.0 }
fn default_dabbler_cap() -> i32 { 3 }

impl Default for RulesSettings {
    fn default() -> Self {
        Self {
            allow_super_science_custom_lasers: false,
            heroic_bow_damage: false,
            minimum_displayed_recoil: 2.0,
            dabbler_cap: 3,
            default_cycle_policy: CyclePolicy::SinglePass,
            validation_mode: ValidationMode::Lenient,
        }
    }
}

impl RulesSettings {
    /// Load from environment variables, using defaults for missing values
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            allow_super_science_custom_lasers: env_or("ARMORY_ALLOW_SUPER_SCIENCE_LASERS", defaults.allow_super_science_custom_lasers),
            heroic_bow_damage: env_or("ARMORY_HEROIC_BOW_DAMAGE", defaults.heroic_bow_damage),
            minimum_displayed_recoil: env_or("ARMORY_MIN_RECOIL", defaults.minimum_displayed_recoil),
            dabbler_cap: env_or("ARMORY_DABBLER_CAP", defaults.dabbler_cap),
            default_cycle_policy: env_or("ARMORY_DEFAULT_CYCLE_POLICY", defaults.default_cycle_policy),
            validation_mode: env_or("ARMORY_VALIDATION_MODE", defaults.validation_mode),
        }
    }

    pub fn strict(mut self) -> Self {
        self.validation_mode = ValidationMode::Strict;
        self
    }

    pub fn with_super_science(mut self, allowed: bool) -> Self {
        self.allow_super_science_custom_lasers = allowed;
        self
    }

    pub fn with_heroic_bows(mut self, heroic: bool) -> Self {
        self.heroic_bow_damage = heroic;
        self
    }

    pub fn with_cycle_policy(mut self, policy: CyclePolicy) -> Self {
        self.default_cycle_policy = policy;
        self
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key).ok().and_then(|v| v.parse().ok()).unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_compatible() {
        let settings = RulesSettings::default();
        assert!(!settings.allow_super_science_custom_lasers);
        assert_eq!(settings.dabbler_cap, 3);
        assert_eq!(settings.default_cycle_policy, CyclePolicy::SinglePass);
        assert_eq!(settings.validation_mode, ValidationMode::Lenient);
    }

    #[test]
    fn missing_fields_deserialize_to_defaults() {
        let settings: RulesSettings =
            serde_json::from_str(r#"{"heroicBowDamage": true}"#).expect("valid json");
        assert!(settings.heroic_bow_damage);
        assert_eq!(settings.minimum_displayed_recoil, 2.0);
        assert_eq!(settings.dabbler_cap, 3);
    }

    #[test]
    fn enum_fields_use_snake_case() {
        let settings: RulesSettings = serde_json::from_str(
            r#"{"defaultCyclePolicy": "reject", "validationMode": "strict"}"#,
        )
        .expect("valid json");
        assert_eq!(settings.default_cycle_policy, CyclePolicy::Reject);
        assert_eq!(settings.validation_mode, ValidationMode::Strict);
    }

    #[test]
    fn policy_parsing() {
        assert_eq!("reject".parse::<CyclePolicy>(), Ok(CyclePolicy::Reject));
        assert_eq!(" Single_Pass ".parse::<CyclePolicy>(), Ok(CyclePolicy::SinglePass));
        assert!("loop".parse::<CyclePolicy>().is_err());
        assert_eq!("STRICT".parse::<ValidationMode>(), Ok(ValidationMode::Strict));
    }

    #[test]
    fn builders_toggle_fields() {
        let settings = RulesSettings::default()
            .strict()
            .with_super_science(true)
            .with_heroic_bows(true)
            .with_cycle_policy(CyclePolicy::Reject);
        assert_eq!(settings.validation_mode, ValidationMode::Strict);
        assert!(settings.allow_super_science_custom_lasers);
        assert!(settings.heroic_bow_damage);
        assert_eq!(settings.default_cycle_policy, CyclePolicy::Reject);
    }
}
