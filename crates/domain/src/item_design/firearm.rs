//! Custom firearm designer.
//!
//! Internal ballistics are approximated in closed form: the propellant pushes at
//! chamber pressure while it burns, then the gas expands adiabatically over the rest
//! of the barrel. Everything downstream (velocity, weight, recoil, range and cost)
//! feeds off the unrounded energy and velocity computed here.

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{round1, round2, WeaponModel};
use crate::error::DomainError;
use crate::validation::{Outcome, Sanitizer};
use crate::value_objects::units::{
    GRAINS_PER_KG, LBS_PER_KG, PASCALS_PER_PSI, YARDS_PER_METER,
};
use crate::value_objects::{DamageRoll, RulesSettings};

/// Energy released per kilogram of propellant before efficiency losses.
const PROPELLANT_ENERGY_J_PER_KG: f64 = 4.0e6;
/// Barrel steel density, kg/m³.
const STEEL_DENSITY: f64 = 7860.0;
/// Brass density, kg/m³; cases are thin so only a quarter of the volume counts.
const BRASS_DENSITY: f64 = 8500.0;
const CASE_FILL: f64 = 0.25;
/// Barrel steel yield strength at TL7, Pa.
const BARREL_YIELD_TL7: f64 = 6.0e8;
/// Drag coefficient of the range equation.
const RANGE_DRAG: f64 = 0.017;
/// Half-damage range falls where the damage formula loses this factor.
const HALF_RANGE_DIVISOR: f64 = 35.0;
const RANGE_SECTIONAL_DENSITY: f64 = 0.17;
/// Damage points per square root joule.
const DAMAGE_DIVISOR: f64 = 2.5;

/// Propellant chemistry available at a tech level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PropellantProfile {
    /// Lowest TL of the band
    pub tl: u8,
    /// Relative energy factor against modern smokeless powder
    pub ref_factor: f64,
    /// Propellant price multiplier
    pub cost_factor: f64,
    /// Propellant price per pound before the multiplier
    pub propellant_cost_per_lb: f64,
    /// Bullet metal price per pound
    pub lead_cost_per_lb: f64,
}

const fn propellant(
    tl: u8,
    ref_factor: f64,
    cost_factor: f64,
    propellant_cost_per_lb: f64,
    lead_cost_per_lb: f64,
) -> PropellantProfile {
    PropellantProfile {
        tl,
        ref_factor,
        cost_factor,
        propellant_cost_per_lb,
        lead_cost_per_lb,
    }
}

/// TL1-3 share the black powder row; one row per TL after that.
const PROPELLANT_TABLE: [PropellantProfile; 10] = [
    propellant(1, 0.08, 2.0, 5.0, 2.0),
    propellant(4, 0.10, 1.5, 5.0, 1.5),
    propellant(5, 0.15, 1.2, 8.0, 1.0),
    propellant(6, 0.22, 1.0, 10.0, 0.5),
    propellant(7, 0.25, 1.0, 10.0, 0.3),
    propellant(8, 0.28, 1.2, 10.0, 0.3),
    propellant(9, 0.31, 1.5, 10.0, 0.3),
    propellant(10, 0.35, 2.0, 10.0, 0.3),
    propellant(11, 0.40, 3.0, 10.0, 0.3),
    propellant(12, 0.45, 4.0, 10.0, 0.3),
];

/// Propellant row for a tech level; below TL1 reads TL1, above TL12 reads TL12.
pub fn propellant_profile(tl: u8) -> &'static PropellantProfile {
    PROPELLANT_TABLE
        .iter()
        .rev()
        .find(|p| p.tl <= tl)
        .unwrap_or(&PROPELLANT_TABLE[0])
}

/// Base wound modifier by bore diameter in millimetres.
pub fn base_wound_mod(caliber_mm: f64, high_energy: bool) -> i32 {
    if caliber_mm < 4.0 {
        1
    } else if caliber_mm < 8.0 {
        if high_energy {
            2
        } else {
            1
        }
    } else if caliber_mm < 10.0 {
        2
    } else if caliber_mm < 15.0 {
        3
    } else {
        4
    }
}

/// Firearm action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActionType {
    SingleShot,
    BreakAction,
    Bolt,
    Lever,
    Pump,
    Revolver,
    #[default]
    SemiAutomatic,
    Automatic,
}

impl ActionType {
    /// Receiver stiffness constant: energy a kilogram of receiver handles at TL7.
    pub fn configuration_constant(&self) -> f64 {
        match self {
            Self::SingleShot | Self::BreakAction => 160.0,
            Self::Bolt => 140.0,
            Self::Lever | Self::Pump => 120.0,
            Self::Revolver => 90.0,
            Self::SemiAutomatic => 100.0,
            Self::Automatic => 80.0,
        }
    }

    pub fn rate_of_fire(&self) -> u32 {
        match self {
            Self::SingleShot | Self::BreakAction | Self::Bolt | Self::Lever | Self::Pump => 1,
            Self::Revolver | Self::SemiAutomatic => 3,
            Self::Automatic => 10,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::SingleShot => "singleShot",
            Self::BreakAction => "breakAction",
            Self::Bolt => "bolt",
            Self::Lever => "lever",
            Self::Pump => "pump",
            Self::Revolver => "revolver",
            Self::SemiAutomatic => "semiAutomatic",
            Self::Automatic => "automatic",
        }
    }
}

impl FromStr for ActionType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "singleShot" => Ok(Self::SingleShot),
            "breakAction" => Ok(Self::BreakAction),
            "bolt" => Ok(Self::Bolt),
            "lever" => Ok(Self::Lever),
            "pump" => Ok(Self::Pump),
            "revolver" => Ok(Self::Revolver),
            "semiAutomatic" | "semi" => Ok(Self::SemiAutomatic),
            "automatic" | "auto" => Ok(Self::Automatic),
            other => Err(DomainError::unrecognized("action", other)),
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MagazineStyle {
    Internal,
    Tube,
    #[default]
    Box,
    ExtendedBox,
    Drum,
    Belt,
}

impl FromStr for MagazineStyle {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "internal" => Ok(Self::Internal),
            "tube" => Ok(Self::Tube),
            "box" => Ok(Self::Box),
            "extendedBox" => Ok(Self::ExtendedBox),
            "drum" => Ok(Self::Drum),
            "belt" => Ok(Self::Belt),
            other => Err(DomainError::unrecognized("magazine style", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MagazineMaterial {
    #[default]
    Steel,
    #[serde(alias = "aluminum")]
    Aluminium,
    Polymer,
    /// Belt links and disposable clips
    Cardboard,
}

impl FromStr for MagazineMaterial {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "steel" => Ok(Self::Steel),
            "aluminium" | "aluminum" => Ok(Self::Aluminium),
            "polymer" => Ok(Self::Polymer),
            "cardboard" => Ok(Self::Cardboard),
            other => Err(DomainError::unrecognized("magazine material", other)),
        }
    }
}

/// Magazine weight as a fraction of the ammunition it holds.
pub fn magazine_multiplier(style: MagazineStyle, material: MagazineMaterial) -> f64 {
    const TABLE: [[f64; 4]; 6] = [
        // steel, aluminium, polymer, cardboard
        [0.0, 0.0, 0.0, 0.0],     // internal
        [0.15, 0.10, 0.08, 0.05], // tube
        [0.25, 0.15, 0.12, 0.08], // box
        [0.30, 0.20, 0.15, 0.10], // extended box
        [0.60, 0.40, 0.30, 0.20], // drum
        [0.20, 0.15, 0.10, 0.05], // belt
    ];
    let row = match style {
        MagazineStyle::Internal => 0,
        MagazineStyle::Tube => 1,
        MagazineStyle::Box => 2,
        MagazineStyle::ExtendedBox => 3,
        MagazineStyle::Drum => 4,
        MagazineStyle::Belt => 5,
    };
    let col = match material {
        MagazineMaterial::Steel => 0,
        MagazineMaterial::Aluminium => 1,
        MagazineMaterial::Polymer => 2,
        MagazineMaterial::Cardboard => 3,
    };
    TABLE[row][col]
}

fn default_weight_tweak() -> f64 {
    1.0
}

fn default_aspect_ratio() -> f64 {
    1.5
}

fn default_tl() -> u8 {
    7
}

/// Physical design of a cartridge firearm. Lengths are millimetres.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FirearmDesign {
    pub caliber_mm: f64,
    /// Case mouth-to-base bore of the chamber, usually wider than the caliber
    pub chamber_bore_mm: f64,
    pub chamber_pressure_psi: f64,
    /// Distance the projectile travels while the propellant is still burning
    pub burn_length_mm: f64,
    pub barrel_length_mm: f64,
    pub case_length_mm: f64,
    pub projectile_mass_grains: f64,
    /// Projectile length over diameter
    #[serde(default = "default_aspect_ratio")]
    pub projectile_aspect_ratio: f64,
    #[serde(default)]
    pub action: ActionType,
    #[serde(default)]
    pub capacity: u32,
    /// Closed-bolt weapons hold one more round in the chamber
    #[serde(default)]
    pub closed_bolt: bool,
    #[serde(default)]
    pub magazine_style: MagazineStyle,
    #[serde(default)]
    pub magazine_material: MagazineMaterial,
    #[serde(default)]
    pub essential_materials: bool,
    #[serde(default = "default_weight_tweak")]
    pub weight_tweak: f64,
    #[serde(default = "default_tl")]
    pub tl: u8,
}

impl Default for FirearmDesign {
    fn default() -> Self {
        Self {
            caliber_mm: 9.0,
            chamber_bore_mm: 9.9,
            chamber_pressure_psi: 35_000.0,
            burn_length_mm: 10.0,
            barrel_length_mm: 102.0,
            case_length_mm: 19.0,
            projectile_mass_grains: 115.0,
            projectile_aspect_ratio: 1.5,
            action: ActionType::SemiAutomatic,
            capacity: 15,
            closed_bolt: true,
            magazine_style: MagazineStyle::Box,
            magazine_material: MagazineMaterial::Steel,
            essential_materials: false,
            weight_tweak: 1.0,
            tl: 7,
        }
    }
}

/// Derived firearm statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FirearmStats {
    pub kinetic_energy_j: f64,
    pub velocity_mps: f64,
    pub velocity_yps: f64,
    pub high_energy: bool,
    pub base_wound_mod: i32,
    pub damage_points: f64,
    pub damage: DamageRoll,
    pub acc: i32,
    pub half_range_yds: f64,
    pub max_range_yds: f64,
    pub rof: u32,
    pub shots: u32,
    pub recoil: f64,
    pub st: i32,
    pub bulk: i32,
    pub projectile_lbs: f64,
    pub powder_lbs: f64,
    pub case_lbs: f64,
    pub cartridge_lbs: f64,
    pub ammo_lbs: f64,
    pub receiver_lbs: f64,
    pub barrel_lbs: f64,
    pub magazine_lbs: f64,
    pub unloaded_lbs: f64,
    pub loaded_lbs: f64,
    pub cost_per_shot: f64,
}

/// Sanitized design in SI units.
struct Inputs {
    bore_radius: f64,
    chamber_radius: f64,
    pressure_pa: f64,
    burn_length: f64,
    barrel_length: f64,
    case_length: f64,
    projectile_kg: f64,
    aspect_ratio: f64,
    weight_tweak: f64,
    tl: u8,
}

fn sanitize(design: &FirearmDesign, s: &mut Sanitizer) -> Result<Inputs, DomainError> {
    let caliber = s.number("caliberMm", design.caliber_mm);
    let chamber_bore = s.number("chamberBoreMm", design.chamber_bore_mm);
    let pressure = s.number("chamberPressurePsi", design.chamber_pressure_psi);
    let burn = s.non_negative("burnLengthMm", design.burn_length_mm);
    let barrel = s.number("barrelLengthMm", design.barrel_length_mm);
    let case = s.number("caseLengthMm", design.case_length_mm);
    let grains = s.number("projectileMassGrains", design.projectile_mass_grains);
    let aspect_ratio = s.non_negative("projectileAspectRatio", design.projectile_aspect_ratio);
    let weight_tweak = s.positive_or("weightTweak", design.weight_tweak, 1.0);

    Ok(Inputs {
        bore_radius: DomainError::require_positive("caliber", caliber)? / 2000.0,
        chamber_radius: DomainError::require_positive("chamber bore", chamber_bore)? / 2000.0,
        pressure_pa: DomainError::require_positive("chamber pressure", pressure)?
            * PASCALS_PER_PSI,
        burn_length: burn / 1000.0,
        barrel_length: DomainError::require_positive("barrel length", barrel)? / 1000.0,
        case_length: DomainError::require_positive("case length", case)? / 1000.0,
        projectile_kg: DomainError::require_positive("projectile mass", grains)? / GRAINS_PER_KG,
        aspect_ratio,
        weight_tweak,
        tl: design.tl.clamp(1, 12),
    })
}

/// Muzzle energy in joules.
fn kinetic_energy(bore_area: f64, chamber_volume: f64, input: &Inputs) -> f64 {
    let burn = input.burn_length.min(input.barrel_length);
    let accel = input.barrel_length - burn;
    let fall_off_volume = chamber_volume + bore_area * burn;
    (input.pressure_pa
        * (bore_area * burn + fall_off_volume * (bore_area * accel / fall_off_volume + 1.0).ln()))
    .abs()
}

/// Barrel steel yield strength, improving 15% per TL.
fn barrel_yield(tl: u8) -> f64 {
    BARREL_YIELD_TL7 * 1.15f64.powi(i32::from(tl) - 7)
}

/// Derive firearm statistics from a design.
pub fn compute_firearm(
    design: &FirearmDesign,
    settings: &RulesSettings,
) -> Result<Outcome<FirearmStats>, DomainError> {
    let mut s = Sanitizer::new();
    let input = sanitize(design, &mut s)?;
    let issues = s.finish(settings.validation_mode)?;

    // 1-2. cross-sections and chamber volume
    let bore_area = PI * input.bore_radius.powi(2);
    let chamber_area = PI * input.chamber_radius.powi(2);
    let chamber_volume = chamber_area * input.case_length;

    // 3. energy
    let ke = kinetic_energy(bore_area, chamber_volume, &input);

    // 4. velocity; a third of the powder mass travels with the projectile
    let propellant = propellant_profile(input.tl);
    let powder_kg = ke / (PROPELLANT_ENERGY_J_PER_KG * propellant.ref_factor);
    let accelerated_kg = input.projectile_kg + powder_kg / 3.0;
    let velocity = DomainError::require_finite("velocity", (2.0 * ke / accelerated_kg).sqrt())?;

    // 5. wounding
    let high_energy = ke > 1000.0 || velocity > 800.0;
    let caliber_mm = input.bore_radius * 2000.0;
    let wound_mod = base_wound_mod(caliber_mm, high_energy);
    let damage_points = ke.sqrt() / DAMAGE_DIVISOR;

    // 6. weight
    let tl_stiffness = 1.4f64.powi(i32::from(input.tl) - 7);
    let mut receiver_kg = ke.powf(0.66) / (design.action.configuration_constant() * tl_stiffness);
    let wall = 2.0 * input.pressure_pa * input.bore_radius / barrel_yield(input.tl);
    let outer_radius = input.bore_radius + wall;
    let mut barrel_kg = PI
        * (outer_radius.powi(2) - input.bore_radius.powi(2))
        * input.barrel_length
        * STEEL_DENSITY;
    let case_kg = chamber_volume * BRASS_DENSITY * CASE_FILL;
    let cartridge_kg = input.projectile_kg + powder_kg + case_kg;
    let shots = design.capacity + u32::from(design.closed_bolt);
    let ammo_kg = cartridge_kg * f64::from(shots);
    let mut magazine_kg =
        magazine_multiplier(design.magazine_style, design.magazine_material) * ammo_kg;
    if design.essential_materials {
        receiver_kg /= 3.0;
        barrel_kg /= 3.0;
        magazine_kg /= 3.0;
    }
    let unloaded_kg = (receiver_kg + barrel_kg + magazine_kg) * input.weight_tweak;
    let loaded_kg = DomainError::require_positive("loaded weight", unloaded_kg + ammo_kg)?;
    let loaded_lbs = loaded_kg * LBS_PER_KG;

    // 7. recoil
    let momentum = accelerated_kg * velocity;
    let recoil = (momentum / loaded_kg)
        .round()
        .max(settings.minimum_displayed_recoil);

    // 8. range
    let sectional_density = input.projectile_kg / bore_area;
    let range_factor = sectional_density * input.aspect_ratio.sqrt() / RANGE_SECTIONAL_DENSITY;
    let max_range_m = range_factor * (velocity * RANGE_DRAG + 1.0).ln();
    let half_range_m = range_factor * (velocity * (RANGE_DRAG / HALF_RANGE_DIVISOR) + 1.0).ln();

    // 9. cost
    let cost_per_shot = propellant.lead_cost_per_lb * input.projectile_kg * LBS_PER_KG
        + propellant.propellant_cost_per_lb
            * propellant.cost_factor
            * powder_kg
            * LBS_PER_KG;

    // Barrel length over caliber stands in for sight radius
    let acc = ((input.barrel_length / (input.bore_radius * 2.0)).log10() * 2.0 - 1.0)
        .round()
        .max(0.0) as i32;

    let stats = FirearmStats {
        kinetic_energy_j: ke,
        velocity_mps: velocity,
        velocity_yps: velocity * YARDS_PER_METER,
        high_energy,
        base_wound_mod: wound_mod,
        damage_points,
        damage: DamageRoll::from_points(damage_points),
        acc,
        half_range_yds: (half_range_m * YARDS_PER_METER).round(),
        max_range_yds: (max_range_m * YARDS_PER_METER).round(),
        rof: design.action.rate_of_fire(),
        shots,
        recoil,
        st: (loaded_lbs.sqrt() * 2.4).round() as i32,
        bulk: -((loaded_lbs + 1.0).log2() * 1.5).round() as i32,
        projectile_lbs: input.projectile_kg * LBS_PER_KG,
        powder_lbs: powder_kg * LBS_PER_KG,
        case_lbs: case_kg * LBS_PER_KG,
        cartridge_lbs: cartridge_kg * LBS_PER_KG,
        ammo_lbs: round2(ammo_kg * LBS_PER_KG),
        receiver_lbs: round2(receiver_kg * input.weight_tweak * LBS_PER_KG),
        barrel_lbs: round2(barrel_kg * input.weight_tweak * LBS_PER_KG),
        magazine_lbs: round2(magazine_kg * input.weight_tweak * LBS_PER_KG),
        unloaded_lbs: round2(unloaded_kg * LBS_PER_KG),
        loaded_lbs: round2(loaded_lbs),
        cost_per_shot: round2(cost_per_shot),
    };
    tracing::debug!(
        ke = round1(ke),
        velocity = round1(velocity),
        damage = %stats.damage,
        loaded_lbs = stats.loaded_lbs,
        "firearm computed"
    );
    Ok(Outcome {
        value: stats,
        issues,
        unresolved: Vec::new(),
    })
}

/// Firearm designer behind the [`WeaponModel`] interface.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirearmBallisticsModel;

impl WeaponModel for FirearmBallisticsModel {
    type Design = FirearmDesign;
    type Stats = FirearmStats;

    fn model_id(&self) -> &str {
        "firearm"
    }

    fn compute(
        &self,
        design: &FirearmDesign,
        settings: &RulesSettings,
    ) -> Result<Outcome<FirearmStats>, DomainError> {
        compute_firearm(design, settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rifle() -> FirearmDesign {
        FirearmDesign {
            caliber_mm: 5.7,
            chamber_bore_mm: 9.6,
            chamber_pressure_psi: 55_000.0,
            burn_length_mm: 40.0,
            barrel_length_mm: 508.0,
            case_length_mm: 45.0,
            projectile_mass_grains: 62.0,
            projectile_aspect_ratio: 3.5,
            action: ActionType::Automatic,
            capacity: 30,
            ..FirearmDesign::default()
        }
    }

    fn assert_close(got: f64, want: f64, tolerance: f64) {
        assert!(
            (got - want).abs() <= tolerance,
            "expected {want:.6} but got {got:.6}"
        );
    }

    #[test]
    fn nine_millimetre_pistol() {
        let stats = compute_firearm(&FirearmDesign::default(), &RulesSettings::default())
            .unwrap()
            .value;
        assert!(!stats.high_energy);
        assert_eq!(stats.base_wound_mod, 2);
        assert_close(stats.kinetic_energy_j, 828.2863, 1e-3);
        assert_close(stats.velocity_mps, 462.9569, 1e-3);
        assert_close(stats.velocity_yps, 506.2943, 1e-3);
        assert_close(stats.damage_points, 11.5120, 1e-3);
        assert_eq!(stats.damage.to_string(), "3d6+1");
        assert_close(stats.powder_lbs, 0.0018261, 1e-6);
        assert_eq!(stats.acc, 1);
        assert_eq!(stats.half_range_yds, 187.0);
        assert_eq!(stats.max_range_yds, 2015.0);
        assert_eq!(stats.recoil, 3.0);
        assert_eq!(stats.loaded_lbs, 2.62);
        assert_eq!(stats.unloaded_lbs, 2.21);
        assert_eq!(stats.ammo_lbs, 0.4);
        assert_eq!(stats.st, 4);
        assert_eq!(stats.bulk, -3);
        assert_eq!(stats.shots, 16);
        assert_eq!(stats.rof, 3);
        assert_eq!(stats.cost_per_shot, 0.02);
    }

    #[test]
    fn small_bore_rifle_is_high_energy() {
        let stats = compute_firearm(&rifle(), &RulesSettings::default()).unwrap().value;
        assert!(stats.high_energy);
        assert_close(stats.kinetic_energy_j, 2549.6163, 1e-3);
        assert_close(stats.velocity_mps, 1023.4728, 1e-3);
        assert_eq!(stats.damage.to_string(), "5d6+3");
        assert_eq!(stats.base_wound_mod, 2);
        assert_eq!(stats.acc, 3);
        assert_eq!(stats.half_range_yds, 765.0);
        assert_eq!(stats.max_range_yds, 5519.0);
        // momentum over weight is 1.58, lifted to the displayed minimum
        assert_eq!(stats.recoil, 2.0);
        assert_eq!(stats.loaded_lbs, 6.96);
        assert_eq!(stats.st, 6);
        assert_eq!(stats.bulk, -4);
        assert_eq!(stats.rof, 10);
        assert_eq!(stats.shots, 31);
        assert_eq!(stats.cost_per_shot, 0.06);
    }

    #[test]
    fn wound_mod_bands() {
        assert_eq!(base_wound_mod(3.0, true), 1);
        assert_eq!(base_wound_mod(5.56, false), 1);
        assert_eq!(base_wound_mod(5.56, true), 2);
        assert_eq!(base_wound_mod(9.0, false), 2);
        assert_eq!(base_wound_mod(12.7, false), 3);
        assert_eq!(base_wound_mod(20.0, false), 4);
    }

    #[test]
    fn longer_barrel_means_more_energy() {
        let short = compute_firearm(&FirearmDesign::default(), &RulesSettings::default()).unwrap();
        let long = FirearmDesign {
            barrel_length_mm: 400.0,
            ..FirearmDesign::default()
        };
        let long = compute_firearm(&long, &RulesSettings::default()).unwrap();
        assert!(long.value.kinetic_energy_j > short.value.kinetic_energy_j);
        assert!(long.value.max_range_yds > short.value.max_range_yds);
    }

    #[test]
    fn essential_materials_lighten_the_gun() {
        let plain = compute_firearm(&FirearmDesign::default(), &RulesSettings::default()).unwrap();
        let essential = FirearmDesign {
            essential_materials: true,
            ..FirearmDesign::default()
        };
        let essential = compute_firearm(&essential, &RulesSettings::default()).unwrap();
        assert!(essential.value.unloaded_lbs < plain.value.unloaded_lbs);
        assert_eq!(essential.value.ammo_lbs, plain.value.ammo_lbs);
    }

    #[test]
    fn minimum_recoil_is_configurable() {
        let settings = RulesSettings {
            minimum_displayed_recoil: 10.0,
            ..RulesSettings::default()
        };
        let stats = compute_firearm(&FirearmDesign::default(), &settings).unwrap().value;
        assert_eq!(stats.recoil, 10.0);
    }

    #[test]
    fn zero_caliber_is_a_computation_error() {
        let design = FirearmDesign {
            caliber_mm: 0.0,
            ..FirearmDesign::default()
        };
        assert!(matches!(
            compute_firearm(&design, &RulesSettings::default()),
            Err(DomainError::Computation { quantity: "caliber", .. })
        ));
    }

    #[test]
    fn non_finite_weight_tweak_falls_back() {
        let design = FirearmDesign {
            weight_tweak: f64::NAN,
            ..FirearmDesign::default()
        };
        let outcome = compute_firearm(&design, &RulesSettings::default()).unwrap();
        assert_eq!(outcome.issues.len(), 1);
        assert_eq!(outcome.issues[0].field_id, "weightTweak");
        let plain = compute_firearm(&FirearmDesign::default(), &RulesSettings::default()).unwrap();
        assert_eq!(outcome.value, plain.value);
        assert!(compute_firearm(&design, &RulesSettings::default().strict()).is_err());
    }

    #[test]
    fn propellant_table_bands() {
        assert_eq!(propellant_profile(0).tl, 1);
        assert_eq!(propellant_profile(3).tl, 1);
        assert_eq!(propellant_profile(7).ref_factor, 0.25);
        assert_eq!(propellant_profile(15).tl, 12);
    }

    #[test]
    fn magazine_table() {
        assert_eq!(magazine_multiplier(MagazineStyle::Internal, MagazineMaterial::Steel), 0.0);
        assert!(
            magazine_multiplier(MagazineStyle::Drum, MagazineMaterial::Steel)
                > magazine_multiplier(MagazineStyle::Box, MagazineMaterial::Steel)
        );
        assert!("clip".parse::<MagazineStyle>().is_err());
        assert_eq!("aluminum".parse::<MagazineMaterial>().unwrap(), MagazineMaterial::Aluminium);
    }

    #[test]
    fn compute_is_idempotent() {
        let model = FirearmBallisticsModel;
        let settings = RulesSettings::default();
        assert_eq!(
            model.compute(&rifle(), &settings).unwrap(),
            model.compute(&rifle(), &settings).unwrap()
        );
        assert_eq!(model.model_id(), "firearm");
    }
}
