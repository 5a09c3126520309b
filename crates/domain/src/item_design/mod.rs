//! Parametric weapon designers.
//!
//! Each designer turns physical design parameters into game statistics. They
//! share one interface so a host can hold them behind a trait object and call
//! whichever matches the item being edited.

mod bow;
mod firearm;
mod laser;

pub use bow::{
    arrow_min_diameter, bow_st_requirement, compute_bow, ArrowDesign, ArrowStats, ArrowStatus, Arrowhead,
    BowBallisticsModel, BowConstruction, BowDesign, BowStats, BowType, CrossSection,
};
pub use firearm::{
    base_wound_mod, compute_firearm, magazine_multiplier, propellant_profile, ActionType,
    FirearmBallisticsModel, FirearmDesign, FirearmStats, MagazineMaterial, MagazineStyle,
    PropellantProfile,
};
pub use laser::{
    beam_profile, compute_laser, generator_profile, round_beam_damage, BeamColor, BeamProfile,
    BeamType, Environment, EnvironmentRanges, FiringMode, GeneratorClass, GeneratorProfile,
    LaserConfiguration, LaserDesign, LaserProfile, LaserStats, LaserWeaponModel, PowerCell,
};

use crate::error::DomainError;
use crate::validation::Outcome;
use crate::value_objects::RulesSettings;

/// A weapon design calculator.
///
/// Implementations are stateless apart from read-only collaborators (such as a
/// material catalog), so one instance may serve any number of concurrent calls.
pub trait WeaponModel: Send + Sync {
    type Design;
    type Stats;

    /// Unique identifier for this designer (e.g., "firearm", "bow").
    fn model_id(&self) -> &str;

    /// Derive statistics from a design.
    ///
    /// Invalid numbers are coerced (or rejected in strict mode) before any formula
    /// runs; physically impossible inputs fail with a computation error.
    fn compute(
        &self,
        design: &Self::Design,
        settings: &RulesSettings,
    ) -> Result<Outcome<Self::Stats>, DomainError>;
}

/// Round to one decimal place for display fields.
pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Round to two decimal places (weights, costs).
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
