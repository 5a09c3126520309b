//! Custom beam weapon designer.
//!
//! Every beam type carries a fixed coefficient row; the generator class, focal
//! array and damage dice scale it. Results come back as six independent profiles,
//! one per environment (air, water, space) and firing mode (normal, hotshot).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{round2, WeaponModel};
use crate::error::DomainError;
use crate::validation::{Outcome, Sanitizer};
use crate::value_objects::{DamageRoll, RulesSettings};

/// Damage multiplier of an overcharged shot.
const HOTSHOT_FACTOR: f64 = 1.3;
/// Focal array size above which weight grows linearly.
const FOCAL_KNEE: f64 = 1.6;
const PULSE_COST_FACTOR: f64 = 1.5;
const MAX_RANGE_FACTOR: f64 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BeamType {
    #[default]
    Laser,
    ForceBeam,
    Blaster,
    NeutralParticleBeam,
    RainbowLaser,
    XRayLaser,
    GravitonBeam,
    Pulsar,
    Graser,
}

impl BeamType {
    pub const ALL: [BeamType; 9] = [
        BeamType::Laser,
        BeamType::ForceBeam,
        BeamType::Blaster,
        BeamType::NeutralParticleBeam,
        BeamType::RainbowLaser,
        BeamType::XRayLaser,
        BeamType::GravitonBeam,
        BeamType::Pulsar,
        BeamType::Graser,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Self::Laser => "laser",
            Self::ForceBeam => "forceBeam",
            Self::Blaster => "blaster",
            Self::NeutralParticleBeam => "neutralParticleBeam",
            Self::RainbowLaser => "rainbowLaser",
            Self::XRayLaser => "xRayLaser",
            Self::GravitonBeam => "gravitonBeam",
            Self::Pulsar => "pulsar",
            Self::Graser => "graser",
        }
    }
}

impl FromStr for BeamType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|b| b.code() == s)
            .ok_or_else(|| DomainError::unrecognized("beam type", s))
    }
}

impl fmt::Display for BeamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Laser wavelength. Only plain lasers use it; rainbow lasers take the best of all three.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BeamColor {
    #[default]
    Infrared,
    BlueGreen,
    Ultraviolet,
}

impl FromStr for BeamColor {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "infrared" | "ir" => Ok(Self::Infrared),
            "blueGreen" => Ok(Self::BlueGreen),
            "ultraviolet" | "uv" => Ok(Self::Ultraviolet),
            other => Err(DomainError::unrecognized("colour", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LaserConfiguration {
    #[default]
    Pistol,
    Rifle,
    Beamer,
    Cannon,
}

impl LaserConfiguration {
    fn index(&self) -> usize {
        match self {
            Self::Pistol => 0,
            Self::Rifle => 1,
            Self::Beamer => 2,
            Self::Cannon => 3,
        }
    }

    /// ST = round(factor × sqrt(weight)).
    fn st_factor(&self) -> f64 {
        match self {
            Self::Pistol => 3.3,
            Self::Rifle => 2.2,
            Self::Beamer => 3.0,
            Self::Cannon => 2.0,
        }
    }

    fn bulk(&self, weight_lbs: f64) -> i32 {
        let scale = match self {
            Self::Pistol => 1.5,
            Self::Rifle => 1.2,
            Self::Beamer => 1.0,
            Self::Cannon => 2.0,
        };
        -((weight_lbs + 1.0).log2() * scale).round() as i32
    }

    fn cost_multiplier(&self) -> f64 {
        match self {
            Self::Pistol | Self::Rifle => 1.0,
            Self::Beamer => 1.5,
            Self::Cannon => 0.8,
        }
    }

    /// Share of a momentum beam's kick that reaches the firer.
    fn recoil_factor(&self) -> f64 {
        match self {
            Self::Pistol => 1.0,
            Self::Rifle => 0.75,
            Self::Beamer => 1.25,
            Self::Cannon => 0.5,
        }
    }

    /// Recoil 1 is the floor; only momentum beams climb above it.
    fn recoil(&self, dice: f64, momentum: bool) -> i32 {
        if !momentum {
            return 1;
        }
        ((dice.sqrt() + 1.0) * self.recoil_factor()).round().max(1.0) as i32
    }
}

impl FromStr for LaserConfiguration {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pistol" => Ok(Self::Pistol),
            "rifle" => Ok(Self::Rifle),
            "beamer" => Ok(Self::Beamer),
            "cannon" => Ok(Self::Cannon),
            other => Err(DomainError::unrecognized("configuration", other)),
        }
    }
}

/// Range multipliers per environment; zero means the beam does not reach.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvironmentRanges {
    pub air: f64,
    pub water: f64,
    pub space: f64,
}

const fn env(air: f64, water: f64, space: f64) -> EnvironmentRanges {
    EnvironmentRanges { air, water, space }
}

impl EnvironmentRanges {
    pub fn get(&self, environment: Environment) -> f64 {
        match environment {
            Environment::Air => self.air,
            Environment::Water => self.water,
            Environment::Space => self.space,
        }
    }

    fn best_of(&self, other: &EnvironmentRanges) -> EnvironmentRanges {
        env(
            self.air.max(other.air),
            self.water.max(other.water),
            self.space.max(other.space),
        )
    }
}

/// Fixed coefficients for one beam type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BeamProfile {
    pub beam: BeamType,
    /// Legality class
    pub lc: u8,
    pub cost_per_lb: f64,
    pub damage_type: &'static str,
    /// `None` when the beam ignores DR outright
    pub armor_divisor: Option<f64>,
    /// Damage type and divisor when fired in pulse mode, if the beam has one
    pub pulse: Option<(&'static str, f64)>,
    /// Accuracy per configuration: pistol, rifle, beamer, cannon
    pub acc: [i32; 4],
    /// Shots per unit of cell capacity at 1 die, TL9 through TL12
    pub base_shots: [f64; 4],
    /// Range base
    pub rb: f64,
    /// Energy exponent of the weight formula
    pub e: f64,
    pub min_tl: u8,
    /// Beam pushes its target, so the weapon recoils
    pub momentum: bool,
    pub ranges: EnvironmentRanges,
    /// Water and space multipliers with a field jacket
    pub jacketed: Option<(f64, f64)>,
}

const BEAM_TABLE: [BeamProfile; 9] = [
    BeamProfile {
        beam: BeamType::Laser,
        lc: 3,
        cost_per_lb: 400.0,
        damage_type: "tbb",
        armor_divisor: Some(2.0),
        pulse: Some(("cr ex", 1.0)),
        acc: [6, 12, 8, 15],
        base_shots: [2700.0, 5400.0, 10800.0, 21600.0],
        rb: 12.0,
        e: 3.0,
        min_tl: 9,
        momentum: false,
        ranges: env(1.0, 0.0, 10.0),
        jacketed: None,
    },
    BeamProfile {
        beam: BeamType::ForceBeam,
        lc: 3,
        cost_per_lb: 600.0,
        damage_type: "cr dbk",
        armor_divisor: Some(1.0),
        pulse: None,
        acc: [3, 6, 4, 8],
        base_shots: [0.0, 0.0, 1800.0, 3600.0],
        rb: 5.0,
        e: 2.5,
        min_tl: 11,
        momentum: true,
        ranges: env(1.0, 1.0, 1.0),
        jacketed: None,
    },
    BeamProfile {
        beam: BeamType::Blaster,
        lc: 2,
        cost_per_lb: 500.0,
        damage_type: "burn sur",
        armor_divisor: Some(5.0),
        pulse: Some(("cr ex sur", 1.0)),
        acc: [5, 10, 6, 15],
        base_shots: [0.0, 1800.0, 3600.0, 7200.0],
        rb: 5.0,
        e: 2.8,
        min_tl: 10,
        momentum: false,
        ranges: env(1.0, 0.0, 0.0),
        jacketed: Some((0.1, 10.0)),
    },
    BeamProfile {
        beam: BeamType::NeutralParticleBeam,
        lc: 2,
        cost_per_lb: 450.0,
        damage_type: "burn rad sur",
        armor_divisor: Some(1.0),
        pulse: None,
        acc: [4, 8, 5, 12],
        base_shots: [0.0, 2000.0, 4000.0, 8000.0],
        rb: 5.0,
        e: 2.8,
        min_tl: 10,
        momentum: false,
        ranges: env(1.0, 0.0, 10.0),
        jacketed: Some((0.1, 10.0)),
    },
    BeamProfile {
        beam: BeamType::RainbowLaser,
        lc: 3,
        cost_per_lb: 600.0,
        damage_type: "tbb",
        armor_divisor: Some(2.0),
        pulse: Some(("cr ex", 1.0)),
        acc: [6, 12, 8, 15],
        base_shots: [0.0, 4000.0, 8000.0, 16000.0],
        rb: 12.0,
        e: 3.2,
        min_tl: 10,
        momentum: false,
        ranges: env(1.0, 0.0, 10.0),
        jacketed: None,
    },
    BeamProfile {
        beam: BeamType::XRayLaser,
        lc: 2,
        cost_per_lb: 800.0,
        damage_type: "tbb",
        armor_divisor: Some(5.0),
        pulse: Some(("cr ex", 3.0)),
        acc: [8, 15, 10, 20],
        base_shots: [0.0, 0.0, 3000.0, 6000.0],
        rb: 40.0,
        e: 4.0,
        min_tl: 11,
        momentum: false,
        ranges: env(0.3, 0.0, 10.0),
        jacketed: None,
    },
    BeamProfile {
        beam: BeamType::GravitonBeam,
        lc: 2,
        cost_per_lb: 1000.0,
        damage_type: "cr",
        armor_divisor: None,
        pulse: None,
        acc: [5, 10, 6, 12],
        base_shots: [0.0, 0.0, 0.0, 2000.0],
        rb: 10.0,
        e: 3.0,
        min_tl: 12,
        momentum: true,
        ranges: env(1.0, 1.0, 1.0),
        jacketed: None,
    },
    BeamProfile {
        beam: BeamType::Pulsar,
        lc: 1,
        cost_per_lb: 700.0,
        damage_type: "burn rad ex",
        armor_divisor: Some(3.0),
        pulse: None,
        acc: [3, 6, 4, 10],
        base_shots: [0.0, 0.0, 1000.0, 2000.0],
        rb: 4.0,
        e: 3.5,
        min_tl: 11,
        momentum: true,
        ranges: env(1.0, 0.0, 1.0),
        jacketed: Some((0.1, 10.0)),
    },
    BeamProfile {
        beam: BeamType::Graser,
        lc: 1,
        cost_per_lb: 1200.0,
        damage_type: "tbb",
        armor_divisor: Some(10.0),
        pulse: Some(("cr ex", 5.0)),
        acc: [10, 18, 12, 25],
        base_shots: [0.0, 0.0, 0.0, 4000.0],
        rb: 80.0,
        e: 5.0,
        min_tl: 12,
        momentum: false,
        ranges: env(1.0, 0.1, 10.0),
        jacketed: None,
    },
];

/// Coefficient row for a beam type.
pub fn beam_profile(beam: BeamType) -> &'static BeamProfile {
    let index = BeamType::ALL.iter().position(|b| *b == beam).unwrap_or(0);
    &BEAM_TABLE[index]
}

/// Range multipliers for a plain laser of one colour.
fn color_ranges(color: BeamColor) -> EnvironmentRanges {
    match color {
        BeamColor::Infrared => env(1.0, 0.0, 10.0),
        BeamColor::BlueGreen => env(1.0, 0.5, 10.0),
        BeamColor::Ultraviolet => env(0.5, 0.0, 10.0),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum GeneratorClass {
    Single,
    #[default]
    Semi,
    Light,
    Heavy,
    Gatling,
}

impl FromStr for GeneratorClass {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "single" => Ok(Self::Single),
            "semi" => Ok(Self::Semi),
            "light" => Ok(Self::Light),
            "heavy" => Ok(Self::Heavy),
            "gatling" => Ok(Self::Gatling),
            other => Err(DomainError::unrecognized("generator", other)),
        }
    }
}

/// Weight, cost and rate-of-fire multipliers of a generator class.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeneratorProfile {
    pub g: f64,
    pub gc: f64,
    pub rof: u32,
}

pub fn generator_profile(generator: GeneratorClass) -> GeneratorProfile {
    let (g, gc, rof) = match generator {
        GeneratorClass::Single => (1.0, 1.0, 1),
        GeneratorClass::Semi => (1.5, 1.2, 3),
        GeneratorClass::Light => (2.0, 1.5, 10),
        GeneratorClass::Heavy => (3.0, 2.0, 20),
        GeneratorClass::Gatling => (5.0, 3.0, 100),
    };
    GeneratorProfile { g, gc, rof }
}

/// Power cell size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PowerCell {
    A,
    B,
    #[default]
    C,
    D,
    E,
    F,
}

impl PowerCell {
    /// Energy relative to a C cell.
    pub fn capacity(&self) -> f64 {
        match self {
            Self::A => 0.01,
            Self::B => 0.1,
            Self::C => 1.0,
            Self::D => 10.0,
            Self::E => 100.0,
            Self::F => 1000.0,
        }
    }

    pub fn weight_lbs(&self) -> f64 {
        match self {
            Self::A => 0.005,
            Self::B => 0.05,
            Self::C => 0.5,
            Self::D => 5.0,
            Self::E => 20.0,
            Self::F => 200.0,
        }
    }

    pub fn cost(&self) -> f64 {
        match self {
            Self::A => 3.0,
            Self::B => 10.0,
            Self::C => 30.0,
            Self::D => 100.0,
            Self::E => 2000.0,
            Self::F => 20000.0,
        }
    }
}

impl FromStr for PowerCell {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "A" | "a" => Ok(Self::A),
            "B" | "b" => Ok(Self::B),
            "C" | "c" => Ok(Self::C),
            "D" | "d" => Ok(Self::D),
            "E" | "e" => Ok(Self::E),
            "F" | "f" => Ok(Self::F),
            other => Err(DomainError::unrecognized("power cell", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Environment {
    Air,
    Water,
    Space,
}

impl Environment {
    pub const ALL: [Environment; 3] = [Environment::Air, Environment::Water, Environment::Space];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FiringMode {
    Normal,
    Hotshot,
}

/// Round fractional damage dice to dice and adds.
///
/// At one die or more the fraction becomes +0, +1, +2 or the next die -1. Below one
/// die the result is a single die with a growing penalty.
pub fn round_beam_damage(dice: f64) -> DamageRoll {
    if !dice.is_finite() || dice <= 0.0 {
        return DamageRoll::zero();
    }
    if dice < 1.0 {
        let adds = match dice {
            d if d < 0.2 => -5,
            d if d < 0.3 => -4,
            d if d < 0.45 => -3,
            d if d < 0.6 => -2,
            d if d < 0.8 => -1,
            _ => 0,
        };
        return DamageRoll::new(1, adds);
    }
    let whole = dice.floor();
    let fraction = dice - whole;
    let whole = whole as i32;
    match fraction {
        f if f < 0.14 => DamageRoll::new(whole, 0),
        f if f < 0.43 => DamageRoll::new(whole, 1),
        f if f < 0.71 => DamageRoll::new(whole, 2),
        _ => DamageRoll::new(whole + 1, -1),
    }
}

/// Focal array weight factor: quartic up to the knee, linear after.
fn focal_weight_factor(array: f64) -> f64 {
    if array < FOCAL_KNEE {
        array.powi(4)
    } else {
        FOCAL_KNEE.powi(4) + 16.384 * (array - FOCAL_KNEE)
    }
}

fn default_one() -> f64 {
    1.0
}

fn default_cells() -> u32 {
    1
}

fn default_laser_tl() -> u8 {
    9
}

/// Beam weapon design selections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaserDesign {
    #[serde(default)]
    pub configuration: LaserConfiguration,
    #[serde(default)]
    pub beam_type: BeamType,
    #[serde(default)]
    pub color: BeamColor,
    #[serde(default = "default_one")]
    pub focal_array: f64,
    #[serde(default)]
    pub generator: GeneratorClass,
    pub damage_dice: f64,
    #[serde(default)]
    pub power_cell: PowerCell,
    #[serde(default = "default_cells")]
    pub cells: u32,
    #[serde(default = "default_laser_tl")]
    pub tl: u8,
    #[serde(default)]
    pub pulse: bool,
    #[serde(default)]
    pub field_jacketed: bool,
    #[serde(default)]
    pub gravitic_focus: u8,
    #[serde(default)]
    pub super_science: bool,
    #[serde(default = "default_one")]
    pub weight_tweak: f64,
}

impl LaserDesign {
    pub fn new(configuration: LaserConfiguration, beam_type: BeamType, damage_dice: f64) -> Self {
        Self {
            configuration,
            beam_type,
            color: BeamColor::Infrared,
            focal_array: 1.0,
            generator: GeneratorClass::Semi,
            damage_dice,
            power_cell: PowerCell::C,
            cells: 1,
            tl: 9,
            pulse: false,
            field_jacketed: false,
            gravitic_focus: 0,
            super_science: false,
            weight_tweak: 1.0,
        }
    }
}

/// One environment and firing mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaserProfile {
    pub environment: Environment,
    pub mode: FiringMode,
    pub damage_dice: f64,
    pub damage: DamageRoll,
    pub damage_type: String,
    /// `None` when the beam ignores DR outright
    pub armor_divisor: Option<f64>,
    pub acc: i32,
    pub half_range: f64,
    pub max_range: f64,
    pub shots: u32,
    /// False when the beam does not reach in this environment
    pub usable: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaserStats {
    pub weight_lbs: f64,
    pub loaded_weight_lbs: f64,
    pub st: i32,
    pub bulk: i32,
    pub recoil: i32,
    pub rof: u32,
    pub lc: u8,
    pub cost: f64,
    pub profiles: Vec<LaserProfile>,
}

impl LaserStats {
    pub fn profile(&self, environment: Environment, mode: FiringMode) -> Option<&LaserProfile> {
        self.profiles
            .iter()
            .find(|p| p.environment == environment && p.mode == mode)
    }
}

/// Super-science options that actually apply after checking the settings.
struct Features {
    weight_factor: f64,
    field_jacketed: bool,
    gravitic_focus: u8,
}

fn gate_features(design: &LaserDesign, settings: &RulesSettings, s: &mut Sanitizer) -> Features {
    let allowed = settings.allow_super_science_custom_lasers;
    let requested = [
        ("superScience", design.super_science),
        ("fieldJacketed", design.field_jacketed),
        ("graviticFocus", design.gravitic_focus > 0),
    ];
    if !allowed {
        for (field, on) in requested {
            if on {
                s.record(field, "super-science is disabled; option ignored");
            }
        }
    }
    Features {
        weight_factor: if allowed && design.super_science { 0.5 } else { 1.0 },
        field_jacketed: allowed && design.field_jacketed,
        gravitic_focus: if allowed { design.gravitic_focus } else { 0 },
    }
}

/// Derive beam weapon statistics and all six profiles.
pub fn compute_laser(
    design: &LaserDesign,
    settings: &RulesSettings,
) -> Result<Outcome<LaserStats>, DomainError> {
    let beam = beam_profile(design.beam_type);
    let mut s = Sanitizer::new();
    let dice = s.non_negative("damageDice", design.damage_dice);
    let array = s.positive_or("focalArray", design.focal_array, 1.0);
    let weight_tweak = s.positive_or("weightTweak", design.weight_tweak, 1.0);
    if design.tl < beam.min_tl {
        s.record(
            "tl",
            format!("{} needs TL{}, design is TL{}", beam.beam, beam.min_tl, design.tl),
        );
    }
    let pulse = if design.pulse && beam.pulse.is_none() {
        s.record("pulse", format!("{} has no pulse mode; option ignored", beam.beam));
        None
    } else if design.pulse {
        beam.pulse
    } else {
        None
    };
    let features = gate_features(design, settings, &mut s);
    let issues = s.finish(settings.validation_mode)?;

    let generator = generator_profile(design.generator);
    let weight = (dice * features.weight_factor / beam.e).powi(3)
        * focal_weight_factor(array)
        * generator.g
        * weight_tweak;
    let cells = design.cells.max(1);
    let cell_weight = design.power_cell.weight_lbs() * f64::from(cells);
    let loaded_weight = weight + cell_weight;

    let mut cost = weight * beam.cost_per_lb * generator.gc * design.configuration.cost_multiplier();
    if pulse.is_some() {
        cost *= PULSE_COST_FACTOR;
    }
    cost += design.power_cell.cost() * f64::from(cells);

    let recoil = design.configuration.recoil(dice, beam.momentum);

    let mut ranges = match design.beam_type {
        BeamType::Laser => color_ranges(design.color),
        BeamType::RainbowLaser => color_ranges(BeamColor::Infrared)
            .best_of(&color_ranges(BeamColor::BlueGreen))
            .best_of(&color_ranges(BeamColor::Ultraviolet)),
        _ => beam.ranges,
    };
    if features.field_jacketed {
        if let Some((water, space)) = beam.jacketed {
            ranges.water = ranges.water.max(water);
            ranges.space = ranges.space.max(space);
        }
    }
    let focus = 2f64.powi(i32::from(features.gravitic_focus));
    let base_half_range = dice.powi(2) * beam.rb * array * focus;

    let tl_index = usize::from(design.tl.clamp(9, 12) - 9);
    let shot_energy = beam.base_shots[tl_index] * design.power_cell.capacity() * f64::from(cells);
    let (damage_type, armor_divisor) = pulse
        .map(|(damage_type, divisor)| (damage_type, Some(divisor)))
        .unwrap_or((beam.damage_type, beam.armor_divisor));
    let acc = beam.acc[design.configuration.index()];

    let mut profiles = Vec::with_capacity(6);
    for mode in [FiringMode::Normal, FiringMode::Hotshot] {
        let mode_dice = match mode {
            FiringMode::Normal => dice,
            FiringMode::Hotshot => dice * HOTSHOT_FACTOR,
        };
        let shots = if mode_dice > 0.0 {
            (shot_energy / mode_dice.powi(3)).floor().min(f64::from(u32::MAX)) as u32
        } else {
            0
        };
        for environment in Environment::ALL {
            let half_range = (base_half_range * ranges.get(environment)).round();
            profiles.push(LaserProfile {
                environment,
                mode,
                damage_dice: mode_dice,
                damage: round_beam_damage(mode_dice),
                damage_type: damage_type.to_string(),
                armor_divisor,
                acc,
                half_range,
                max_range: half_range * MAX_RANGE_FACTOR,
                shots,
                usable: half_range > 0.0 && mode_dice > 0.0,
            });
        }
    }

    let stats = LaserStats {
        weight_lbs: round2(weight),
        loaded_weight_lbs: round2(loaded_weight),
        st: (design.configuration.st_factor() * loaded_weight.sqrt()).round() as i32,
        bulk: design.configuration.bulk(loaded_weight),
        recoil,
        rof: generator.rof,
        lc: beam.lc,
        cost: round2(cost),
        profiles,
    };
    tracing::debug!(
        beam = %design.beam_type,
        dice,
        weight_lbs = stats.weight_lbs,
        cost = stats.cost,
        "beam weapon computed"
    );
    Ok(Outcome {
        value: stats,
        issues,
        unresolved: Vec::new(),
    })
}

/// Beam weapon designer behind the [`WeaponModel`] interface.
#[derive(Debug, Clone, Copy, Default)]
pub struct LaserWeaponModel;

impl WeaponModel for LaserWeaponModel {
    type Design = LaserDesign;
    type Stats = LaserStats;

    fn model_id(&self) -> &str {
        "laser"
    }

    fn compute(
        &self,
        design: &LaserDesign,
        settings: &RulesSettings,
    ) -> Result<Outcome<LaserStats>, DomainError> {
        compute_laser(design, settings)
    }
}
