//! Custom bow and crossbow designer.
//!
//! The limb is treated as a beam loaded at its centre. Its thickness is the larger
//! of what the caller asked for and what the material's tensile strength demands;
//! its bend at full draw decides how far the string can be pulled. Arrows are
//! resolved afterwards against the bow's draw length and stored energy.
//!
//! Units are inches, pounds and psi throughout, except energies (joules) and
//! arrow velocity (m/s).

use std::f64::consts::PI;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{round1, round2, WeaponModel};
use crate::entities::{Material, MaterialCatalog, MaterialPair};
use crate::error::DomainError;
use crate::validation::{Outcome, ResolutionIssue, Sanitizer};
use crate::value_objects::units::KG_PER_LB;
use crate::value_objects::{DamageRoll, Quality, RulesSettings};

/// Damage points per square root joule, realistic scale.
const REALISTIC_DAMAGE_DIVISOR: f64 = 2.5;
/// Damage points per square root joule, heroic scale.
const HEROIC_DAMAGE_DIVISOR: f64 = 1.75;
/// Share of the limb mass that moves with the string.
const WORKING_MASS_FRACTION: f64 = 0.025;
/// Strung string half-length as a share of half the bow length.
const STRING_SLACK: f64 = 0.99;
/// Bend angle at which the limb is considered fully worked.
const MAX_THETA: f64 = 1.4;
/// Permitted riser/stock deflection per unit length.
const RISER_DEFLECTION: f64 = 0.001;
/// Share of the Euler buckling load an arrow must carry.
const ARROW_BUCKLING_FACTOR: f64 = 0.25;
const HALF_RANGE_FACTOR: f64 = 0.3;
const MAX_RANGE_FACTOR: f64 = 0.4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BowType {
    #[default]
    Bow,
    Footbow,
    Crossbow,
}

impl FromStr for BowType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bow" => Ok(Self::Bow),
            "footbow" => Ok(Self::Footbow),
            "crossbow" => Ok(Self::Crossbow),
            other => Err(DomainError::unrecognized("bow type", other)),
        }
    }
}

/// ST needed to draw the bow (or span the crossbow by hand).
pub fn bow_st_requirement(bow_type: BowType, draw_weight_lbs: f64) -> i32 {
    let factor = match bow_type {
        BowType::Bow | BowType::Crossbow => 2.5,
        BowType::Footbow => 1.25,
    };
    (factor * draw_weight_lbs.max(0.0)).sqrt().round() as i32
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BowConstruction {
    #[default]
    Straight,
    Recurve,
    Reflex,
    Compound,
}

impl BowConstruction {
    /// Extra limb stress from the construction's shape.
    pub fn stress_multiplier(&self) -> f64 {
        match self {
            Self::Straight | Self::Compound => 1.0,
            Self::Recurve => 1.3,
            Self::Reflex => 1.6,
        }
    }

    /// Joules stored per pound of draw weight per inch of draw.
    pub fn energy_coefficient(&self) -> f64 {
        match self {
            Self::Straight => 0.057,
            Self::Recurve => 0.065,
            Self::Reflex => 0.073,
            Self::Compound => 0.090,
        }
    }

    pub fn cost_multiplier(&self) -> f64 {
        match self {
            Self::Straight => 1.0,
            Self::Recurve => 1.25,
            Self::Reflex => 1.5,
            Self::Compound => 2.0,
        }
    }
}

impl FromStr for BowConstruction {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "straight" => Ok(Self::Straight),
            "recurve" => Ok(Self::Recurve),
            "reflex" => Ok(Self::Reflex),
            "compound" => Ok(Self::Compound),
            other => Err(DomainError::unrecognized("construction", other)),
        }
    }
}

/// Limb cross-section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CrossSection {
    Round,
    /// Flat-backed limb, `width = ratio × thickness`
    #[default]
    DSection,
}

impl CrossSection {
    /// `I = t⁴ / k` for a section of thickness `t`.
    pub fn k_factor(&self, width_ratio: f64) -> f64 {
        match self {
            Self::Round => 64.0 / PI,
            Self::DSection => 12.0 / width_ratio,
        }
    }

    /// Cross-sectional area for a section of thickness `t`.
    pub fn area(&self, thickness: f64, width_ratio: f64) -> f64 {
        match self {
            Self::Round => PI * thickness.powi(2) / 4.0,
            Self::DSection => thickness * thickness * width_ratio,
        }
    }
}

impl FromStr for CrossSection {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "round" => Ok(Self::Round),
            "dSection" | "d" => Ok(Self::DSection),
            other => Err(DomainError::unrecognized("cross section", other)),
        }
    }
}

/// Arrowhead style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Arrowhead {
    #[default]
    Broadhead,
    Bodkin,
    Blunt,
    Cutting,
    Flight,
}

impl Arrowhead {
    pub fn weight_lbs(&self) -> f64 {
        match self {
            Self::Broadhead => 0.0286,
            Self::Bodkin => 0.0229,
            Self::Blunt => 0.0343,
            Self::Cutting => 0.0257,
            Self::Flight => 0.0114,
        }
    }

    pub fn damage_type(&self) -> &'static str {
        match self {
            Self::Broadhead => "imp",
            Self::Bodkin => "pi",
            Self::Blunt => "cr",
            Self::Cutting => "cut",
            Self::Flight => "pi-",
        }
    }

    pub fn armor_divisor(&self) -> f64 {
        match self {
            Self::Bodkin => 2.0,
            _ => 1.0,
        }
    }

    pub fn cost(&self) -> f64 {
        match self {
            Self::Broadhead => 2.0,
            Self::Bodkin => 1.5,
            Self::Blunt => 0.5,
            Self::Cutting => 3.0,
            Self::Flight => 1.0,
        }
    }
}

impl FromStr for Arrowhead {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "broadhead" => Ok(Self::Broadhead),
            "bodkin" => Ok(Self::Bodkin),
            "blunt" => Ok(Self::Blunt),
            "cutting" => Ok(Self::Cutting),
            "flight" => Ok(Self::Flight),
            other => Err(DomainError::unrecognized("arrowhead", other)),
        }
    }
}

/// One arrow or bolt to shoot from the bow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrowDesign {
    #[serde(default)]
    pub name: String,
    pub length_in: f64,
    pub diameter_in: f64,
    pub material: String,
    #[serde(default)]
    pub arrowhead: Arrowhead,
    #[serde(default)]
    pub quality: Quality,
}

impl ArrowDesign {
    pub fn new(material: impl Into<String>, length_in: f64, diameter_in: f64) -> Self {
        Self {
            name: String::new(),
            length_in,
            diameter_in,
            material: material.into(),
            arrowhead: Arrowhead::Broadhead,
            quality: Quality::Good,
        }
    }
}

fn default_width_ratio() -> f64 {
    2.0
}

fn default_string_loops() -> u32 {
    1
}

/// Physical bow design.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BowDesign {
    #[serde(default)]
    pub bow_type: BowType,
    #[serde(default)]
    pub construction: BowConstruction,
    #[serde(default)]
    pub cross_section: CrossSection,
    /// Limb width over thickness for D-section limbs
    #[serde(default = "default_width_ratio")]
    pub width_ratio: f64,
    pub working_material: MaterialPair,
    pub riser_material: MaterialPair,
    /// Crossbow stock; the riser material is used when absent
    #[serde(default)]
    pub stock_material: Option<MaterialPair>,
    pub draw_weight_lbs: f64,
    pub target_draw_length_in: f64,
    pub total_length_in: f64,
    /// Share of the bow length that bends, in percent
    pub working_percent: f64,
    /// Requested limb thickness; the minimum for the draw weight wins if larger
    #[serde(default)]
    pub limb_thickness_in: f64,
    #[serde(default)]
    pub stock_length_in: f64,
    /// Cable loops on a compound's cams
    #[serde(default = "default_string_loops")]
    pub string_loops: u32,
    #[serde(default)]
    pub quality: Quality,
    #[serde(default)]
    pub arrows: Vec<ArrowDesign>,
}

impl BowDesign {
    /// A self bow: one material for limbs and riser.
    pub fn self_bow(material: &str, draw_weight_lbs: f64, total_length_in: f64) -> Self {
        Self {
            bow_type: BowType::Bow,
            construction: BowConstruction::Straight,
            cross_section: CrossSection::DSection,
            width_ratio: default_width_ratio(),
            working_material: MaterialPair::single(material),
            riser_material: MaterialPair::single(material),
            stock_material: None,
            draw_weight_lbs,
            target_draw_length_in: 28.0,
            total_length_in,
            working_percent: 90.0,
            limb_thickness_in: 0.0,
            stock_length_in: 0.0,
            string_loops: 1,
            quality: Quality::Good,
            arrows: Vec::new(),
        }
    }

    pub fn with_arrow(mut self, arrow: ArrowDesign) -> Self {
        self.arrows.push(arrow);
        self
    }
}

/// Why an arrow's figures should or should not be trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ArrowStatus {
    Ok,
    /// Diameter was below the buckling minimum and has been raised to it
    DiameterRaised,
    /// Shorter than the bow's draw length
    TooShort,
    /// Material not in the catalog
    MaterialMissing,
    /// No mass to shoot
    Massless,
}

impl ArrowStatus {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Ok | Self::DiameterRaised)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrowStats {
    pub index: usize,
    pub name: String,
    pub status: ArrowStatus,
    pub valid: bool,
    pub min_diameter_in: f64,
    pub diameter_in: f64,
    pub weight_lbs: f64,
    pub efficiency: f64,
    pub kinetic_energy_j: f64,
    pub velocity_mps: f64,
    pub damage_points: f64,
    pub damage: DamageRoll,
    pub damage_type: String,
    pub armor_divisor: f64,
    pub acc: i32,
    pub half_range_yds: f64,
    pub max_range_yds: f64,
    pub cost: f64,
}

impl ArrowStats {
    fn unusable(index: usize, arrow: &ArrowDesign, status: ArrowStatus) -> Self {
        Self {
            index,
            name: arrow.name.clone(),
            status,
            valid: false,
            min_diameter_in: 0.0,
            diameter_in: arrow.diameter_in,
            weight_lbs: 0.0,
            efficiency: 0.0,
            kinetic_energy_j: 0.0,
            velocity_mps: 0.0,
            damage_points: 0.0,
            damage: DamageRoll::zero(),
            damage_type: arrow.arrowhead.damage_type().to_string(),
            armor_divisor: arrow.arrowhead.armor_divisor(),
            acc: 0,
            half_range_yds: 0.0,
            max_range_yds: 0.0,
            cost: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BowStats {
    pub k_factor: f64,
    pub min_limb_thickness_in: f64,
    pub limb_thickness_in: f64,
    pub deflection_ratio: f64,
    pub theta: f64,
    pub max_draw_length_in: f64,
    pub draw_length_in: f64,
    pub riser_thickness_in: f64,
    pub stock_thickness_in: f64,
    pub limb_lbs: f64,
    pub riser_lbs: f64,
    pub stock_lbs: f64,
    pub weight_lbs: f64,
    pub stored_energy_j: f64,
    pub st: i32,
    pub bulk: i32,
    pub cost: f64,
    pub arrows: Vec<ArrowStats>,
}

/// Smallest arrow diameter that will not buckle under the bow's draw weight.
pub fn arrow_min_diameter(draw_weight_lbs: f64, length_in: f64, elastic_modulus_psi: f64) -> f64 {
    if draw_weight_lbs <= 0.0 || length_in <= 0.0 {
        return 0.0;
    }
    (64.0 * draw_weight_lbs * length_in.powi(2) * ARROW_BUCKLING_FACTOR
        / (PI.powi(3) * elastic_modulus_psi))
        .powf(0.25)
}

/// Bend angle of the limb tips for a deflection ratio.
fn theta(deflection_ratio: f64) -> f64 {
    (3.0 * deflection_ratio - 1.2 * deflection_ratio.powi(3)).clamp(0.0, MAX_THETA)
}

/// `sin θ / θ` and `(1 − cos θ) / θ`, with their limits at zero.
fn arc_factors(theta: f64) -> (f64, f64) {
    if theta.abs() < 1e-9 {
        (1.0, 0.0)
    } else {
        (theta.sin() / theta, (1.0 - theta.cos()) / theta)
    }
}

/// Thickness keeping a riser or stock of `length` within its deflection allowance.
fn stiff_thickness(draw_weight: f64, length: f64, k: f64, modulus: f64) -> f64 {
    let moment = draw_weight * length / 4.0;
    (moment * k / (2.0 * modulus * RISER_DEFLECTION)).max(0.0).cbrt()
}

struct Geometry {
    draw_weight: f64,
    target_draw: f64,
    total_length: f64,
    working_length: f64,
    non_working_length: f64,
    requested_thickness: f64,
    stock_length: f64,
    width_ratio: f64,
}

fn sanitize(design: &BowDesign, s: &mut Sanitizer) -> Result<Geometry, DomainError> {
    let draw_weight = s.non_negative("drawWeightLbs", design.draw_weight_lbs);
    let target_draw = s.non_negative("targetDrawLengthIn", design.target_draw_length_in);
    let total_length = s.number("totalLengthIn", design.total_length_in);
    let working_percent = s.positive_or("workingPercent", design.working_percent, 100.0);
    let requested_thickness = s.non_negative("limbThicknessIn", design.limb_thickness_in);
    let stock_length = s.non_negative("stockLengthIn", design.stock_length_in);
    let width_ratio = s.positive_or("widthRatio", design.width_ratio, default_width_ratio());

    let total_length = DomainError::require_positive("bow length", total_length)?;
    let working_length = total_length * working_percent.min(100.0) / 100.0;
    Ok(Geometry {
        draw_weight,
        target_draw,
        total_length,
        working_length,
        non_working_length: total_length - working_length,
        requested_thickness,
        stock_length: if design.bow_type == BowType::Crossbow {
            stock_length
        } else {
            0.0
        },
        width_ratio,
    })
}

fn resolve_material(pair: &MaterialPair, catalog: &dyn MaterialCatalog) -> Result<Material, DomainError> {
    let material = pair.resolve(catalog)?;
    material.ensure_physical()?;
    Ok(material)
}

/// Derive bow statistics and resolve every arrow against the bow.
pub fn compute_bow(
    design: &BowDesign,
    catalog: &dyn MaterialCatalog,
    settings: &RulesSettings,
) -> Result<Outcome<BowStats>, DomainError> {
    let mut s = Sanitizer::new();
    let g = sanitize(design, &mut s)?;
    let arrow_inputs: Vec<(f64, f64)> = design
        .arrows
        .iter()
        .enumerate()
        .map(|(i, a)| {
            (
                s.non_negative(&format!("arrows[{i}].lengthIn"), a.length_in),
                s.non_negative(&format!("arrows[{i}].diameterIn"), a.diameter_in),
            )
        })
        .collect();
    let issues = s.finish(settings.validation_mode)?;

    let working = resolve_material(&design.working_material, catalog)?;
    let riser = resolve_material(&design.riser_material, catalog)?;
    let stock = match (&design.stock_material, design.bow_type) {
        (Some(pair), BowType::Crossbow) => resolve_material(pair, catalog)?,
        _ => riser.clone(),
    };

    // 1-2. section factor and limb thickness
    let k = design.cross_section.k_factor(g.width_ratio);
    let style = design.construction.stress_multiplier();
    let min_thickness =
        (g.draw_weight * g.working_length * style * k / (8.0 * working.tensile_st_psi)).cbrt();
    let thickness = g.requested_thickness.max(min_thickness);

    // 3. deflection at full draw, as a share of the limb half-length
    let half_working = g.working_length / 2.0;
    let deflection_ratio = if g.draw_weight <= 0.0 || thickness <= 0.0 || half_working <= 0.0 {
        0.0
    } else {
        g.draw_weight * g.working_length.powi(3) * k
            / (48.0 * working.elastic_modulus_psi * thickness.powi(4))
            / half_working
    };

    // 4-5. draw length from tip geometry
    let theta = theta(deflection_ratio);
    let (sin_ratio, cos_ratio) = arc_factors(theta);
    let tip_span = g.non_working_length / 2.0 + half_working * sin_ratio;
    let tip_pull = half_working * cos_ratio * f64::from(design.string_loops.max(1));
    let string_half = STRING_SLACK * g.total_length / 2.0;
    let max_draw = tip_pull + (string_half.powi(2) - tip_span.powi(2)).max(0.0).sqrt();
    let draw_length = max_draw.min(g.target_draw);

    // 6. riser and stock
    let riser_thickness = stiff_thickness(g.draw_weight, g.working_length, k, riser.elastic_modulus_psi);
    let stock_thickness = if g.stock_length > 0.0 {
        stiff_thickness(g.draw_weight, g.stock_length, k, stock.elastic_modulus_psi)
    } else {
        0.0
    };

    // 7. weights
    let section = |t: f64| design.cross_section.area(t, g.width_ratio);
    let limb_lbs = working.density_lbs_cu_in * section(thickness) * g.working_length;
    let riser_lbs = riser.density_lbs_cu_in * section(riser_thickness) * g.non_working_length;
    let stock_lbs = stock.density_lbs_cu_in * section(stock_thickness) * g.stock_length;
    let weight_lbs = limb_lbs + riser_lbs + stock_lbs;

    // 8. energy
    let stored_energy = design.construction.energy_coefficient() * g.draw_weight * draw_length;

    // 10-11. bulk and cost
    let overall_length = g.working_length + g.non_working_length + g.stock_length;
    let bulk = (9.0 - 9.0 * overall_length.log10()).round() as i32;
    let cost = (working.cost_per_lb * limb_lbs
        + riser.cost_per_lb * riser_lbs
        + stock.cost_per_lb * stock_lbs)
        * design.quality.cost_multiplier()
        * design.construction.cost_multiplier();

    // 9. arrows
    let bow = BowState {
        draw_weight: g.draw_weight,
        draw_length,
        stored_energy,
        working_mass: limb_lbs * WORKING_MASS_FRACTION,
        bulk,
        damage_divisor: if settings.heroic_bow_damage {
            HEROIC_DAMAGE_DIVISOR
        } else {
            REALISTIC_DAMAGE_DIVISOR
        },
    };
    let mut unresolved = Vec::new();
    let arrows = design
        .arrows
        .iter()
        .zip(arrow_inputs)
        .enumerate()
        .map(|(index, (arrow, (length, diameter)))| {
            bow.resolve_arrow(index, arrow, length, diameter, catalog, &mut unresolved)
        })
        .collect::<Result<Vec<_>, _>>()?;

    let stats = BowStats {
        k_factor: k,
        min_limb_thickness_in: min_thickness,
        limb_thickness_in: thickness,
        deflection_ratio,
        theta,
        max_draw_length_in: max_draw,
        draw_length_in: draw_length,
        riser_thickness_in: riser_thickness,
        stock_thickness_in: stock_thickness,
        limb_lbs: round2(limb_lbs),
        riser_lbs: round2(riser_lbs),
        stock_lbs: round2(stock_lbs),
        weight_lbs: round2(weight_lbs),
        stored_energy_j: stored_energy,
        st: bow_st_requirement(design.bow_type, g.draw_weight),
        bulk,
        cost: round2(cost),
        arrows,
    };
    tracing::debug!(
        draw_length = round1(draw_length),
        stored_energy = round1(stored_energy),
        weight_lbs = stats.weight_lbs,
        arrows = stats.arrows.len(),
        "bow computed"
    );
    Ok(Outcome {
        value: stats,
        issues,
        unresolved,
    })
}

/// Bow figures an arrow needs.
struct BowState {
    draw_weight: f64,
    draw_length: f64,
    stored_energy: f64,
    working_mass: f64,
    bulk: i32,
    damage_divisor: f64,
}

impl BowState {
    /// A missing material marks the arrow unusable; a catalog entry that is not
    /// physical fails the whole call.
    fn resolve_arrow(
        &self,
        index: usize,
        arrow: &ArrowDesign,
        length: f64,
        diameter: f64,
        catalog: &dyn MaterialCatalog,
        unresolved: &mut Vec<ResolutionIssue>,
    ) -> Result<ArrowStats, DomainError> {
        let Some(material) = catalog.get_by_name(&arrow.material) else {
            tracing::warn!(index, material = %arrow.material, "arrow material not found");
            unresolved.push(ResolutionIssue {
                kind: "material".to_string(),
                name: arrow.material.clone(),
                referenced_by: format!("arrows[{index}]"),
            });
            return Ok(ArrowStats::unusable(index, arrow, ArrowStatus::MaterialMissing));
        };
        material.ensure_physical()?;

        let min_diameter = arrow_min_diameter(self.draw_weight, length, material.elastic_modulus_psi);
        let (diameter, mut status) = if diameter < min_diameter {
            (min_diameter, ArrowStatus::DiameterRaised)
        } else {
            (diameter, ArrowStatus::Ok)
        };
        if length < self.draw_length {
            status = ArrowStatus::TooShort;
        }

        let shaft_lbs = PI * (diameter / 2.0).powi(2) * length * material.density_lbs_cu_in;
        let weight_lbs = shaft_lbs + arrow.arrowhead.weight_lbs();
        if weight_lbs <= 0.0 {
            let mut stats = ArrowStats::unusable(index, arrow, ArrowStatus::Massless);
            stats.min_diameter_in = min_diameter;
            return Ok(stats);
        }

        let efficiency = 1.0 / (1.0 + self.working_mass / weight_lbs);
        let ke = efficiency * self.stored_energy;
        let velocity = (2.0 * ke / (weight_lbs * KG_PER_LB)).sqrt();
        let damage_points = ke.sqrt() / self.damage_divisor;
        let acc = if velocity > 0.0 {
            ((3.0 * velocity.log10() - 2.0 - f64::from(self.bulk + 8) * 0.25).round() as i32
                + arrow.quality.accuracy_modifier())
            .max(0)
        } else {
            0
        };
        let cost = (shaft_lbs * material.cost_per_lb + arrow.arrowhead.cost())
            * arrow.quality.cost_multiplier();

        Ok(ArrowStats {
            index,
            name: arrow.name.clone(),
            status,
            valid: status.is_valid(),
            min_diameter_in: min_diameter,
            diameter_in: diameter,
            weight_lbs,
            efficiency,
            kinetic_energy_j: ke,
            velocity_mps: velocity,
            damage_points,
            damage: DamageRoll::from_points(damage_points),
            damage_type: arrow.arrowhead.damage_type().to_string(),
            armor_divisor: arrow.arrowhead.armor_divisor(),
            acc,
            half_range_yds: (ke / weight_lbs * HALF_RANGE_FACTOR).round(),
            max_range_yds: (ke / weight_lbs * MAX_RANGE_FACTOR).round(),
            cost: round2(cost),
        })
    }
}

/// Bow designer behind the [`WeaponModel`] interface.
pub struct BowBallisticsModel<'a> {
    catalog: &'a dyn MaterialCatalog,
}

impl<'a> BowBallisticsModel<'a> {
    pub fn new(catalog: &'a dyn MaterialCatalog) -> Self {
        Self { catalog }
    }
}

impl WeaponModel for BowBallisticsModel<'_> {
    type Design = BowDesign;
    type Stats = BowStats;

    fn model_id(&self) -> &str {
        "bow"
    }

    fn compute(
        &self,
        design: &BowDesign,
        settings: &RulesSettings,
    ) -> Result<Outcome<BowStats>, DomainError> {
        compute_bow(design, self.catalog, settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{InMemoryMaterialCatalog, StaticMaterialCatalog};

    fn longbow() -> BowDesign {
        BowDesign::self_bow("Yew", 50.0, 66.0).with_arrow(ArrowDesign::new("Ash", 30.0, 0.35))
    }

    fn compute(design: &BowDesign) -> Outcome<BowStats> {
        compute_bow(design, &StaticMaterialCatalog, &RulesSettings::default()).unwrap()
    }

    fn assert_close(got: f64, want: f64, tolerance: f64) {
        assert!(
            (got - want).abs() <= tolerance,
            "expected {want:.6} but got {got:.6}"
        );
    }

    #[test]
    fn yew_longbow() {
        let outcome = compute(&longbow());
        assert!(outcome.is_clean());
        let bow = outcome.value;
        assert_eq!(bow.k_factor, 6.0);
        assert_close(bow.min_limb_thickness_in, 0.529552, 1e-6);
        assert_eq!(bow.limb_thickness_in, bow.min_limb_thickness_in);
        assert_close(bow.deflection_ratio, 0.400608, 1e-6);
        assert_close(bow.theta, 1.124673, 1e-6);
        assert_close(bow.max_draw_length_in, 33.225281, 1e-5);
        assert_eq!(bow.draw_length_in, 28.0);
        assert_close(bow.riser_thickness_in, 1.167427, 1e-6);
        assert_eq!(bow.limb_lbs, 0.81);
        assert_eq!(bow.riser_lbs, 0.44);
        assert_eq!(bow.weight_lbs, 1.24);
        assert_close(bow.stored_energy_j, 79.8, 1e-9);
        assert_eq!(bow.st, 11);
        assert_eq!(bow.bulk, -7);
        assert_eq!(bow.cost, 1.24);

        let arrow = &bow.arrows[0];
        assert_eq!(arrow.status, ArrowStatus::Ok);
        assert!(arrow.valid);
        assert_close(arrow.min_diameter_in, 0.347089, 1e-6);
        assert_close(arrow.weight_lbs, 0.098449, 1e-6);
        assert_close(arrow.efficiency, 0.830063, 1e-6);
        assert_close(arrow.kinetic_energy_j, 66.239039, 1e-5);
        assert_close(arrow.velocity_mps, 54.466919, 1e-5);
        assert_close(arrow.damage_points, 3.255495, 1e-6);
        assert_eq!(arrow.acc, 3);
        assert_eq!(arrow.damage_type, "imp");
        assert_eq!(arrow.half_range_yds, 202.0);
        assert_eq!(arrow.max_range_yds, 269.0);
        assert_eq!(arrow.cost, 2.07);
    }

    #[test]
    fn limb_geometry_helpers() {
        assert_eq!(theta(0.0), 0.0);
        assert_close(theta(0.4), 1.1232, 1e-12);
        assert_eq!(theta(1.0), MAX_THETA);
        assert_eq!(arc_factors(0.0), (1.0, 0.0));
        let (sin_ratio, cos_ratio) = arc_factors(1.0);
        assert_close(sin_ratio, 0.841471, 1e-6);
        assert_close(cos_ratio, 0.459698, 1e-6);
        // 50 lb over a 59.4 in span on a 2:1 D-section of yew
        assert_close(stiff_thickness(50.0, 59.4, 6.0, 1_400_000.0), 1.167427, 1e-6);
        assert_eq!(stiff_thickness(0.0, 59.4, 6.0, 1_400_000.0), 0.0);
        assert_close(arrow_min_diameter(50.0, 30.0, 1_600_000.0), 0.347089, 1e-6);
    }

    #[test]
    fn zero_draw_weight_gives_zero_damage() {
        let mut design = longbow();
        design.draw_weight_lbs = 0.0;
        let bow = compute(&design).value;
        assert_eq!(bow.stored_energy_j, 0.0);
        let arrow = &bow.arrows[0];
        assert_eq!(arrow.damage_points, 0.0);
        assert_eq!(arrow.damage, DamageRoll::zero());
        assert!(arrow.efficiency.is_finite());
        assert!(!arrow.velocity_mps.is_nan());
        assert_eq!(arrow.acc, 0);
    }

    #[test]
    fn heroic_scale_hits_harder() {
        let realistic = compute(&longbow()).value;
        let heroic = compute_bow(
            &longbow(),
            &StaticMaterialCatalog,
            &RulesSettings::default().with_heroic_bows(true),
        )
        .unwrap()
        .value;
        let ratio = heroic.arrows[0].damage_points / realistic.arrows[0].damage_points;
        assert!((ratio - 2.5 / 1.75).abs() < 1e-9);
    }

    #[test]
    fn short_arrow_is_flagged_not_clamped() {
        let design = BowDesign::self_bow("Yew", 50.0, 66.0).with_arrow(ArrowDesign::new("Ash", 24.0, 0.4));
        let arrow = &compute(&design).value.arrows[0];
        assert_eq!(arrow.status, ArrowStatus::TooShort);
        assert!(!arrow.valid);
        assert!(arrow.kinetic_energy_j > 0.0);
    }

    #[test]
    fn thin_arrow_is_raised_to_minimum() {
        let design = BowDesign::self_bow("Yew", 50.0, 66.0).with_arrow(ArrowDesign::new("Ash", 30.0, 0.1));
        let arrow = &compute(&design).value.arrows[0];
        assert_eq!(arrow.status, ArrowStatus::DiameterRaised);
        assert!(arrow.valid);
        assert_eq!(arrow.diameter_in, arrow.min_diameter_in);
        assert!(arrow.min_diameter_in > 0.3 && arrow.min_diameter_in < 0.4);
    }

    #[test]
    fn missing_arrow_material_does_not_fail_the_bow() {
        let design = longbow().with_arrow(ArrowDesign::new("Mithril", 30.0, 0.35));
        let outcome = compute(&design);
        assert_eq!(outcome.value.arrows.len(), 2);
        assert!(outcome.value.arrows[0].valid);
        assert_eq!(outcome.value.arrows[1].status, ArrowStatus::MaterialMissing);
        assert_eq!(outcome.unresolved.len(), 1);
        assert_eq!(outcome.unresolved[0].referenced_by, "arrows[1]");
    }

    #[test]
    fn unphysical_arrow_material_fails_the_bow() {
        let catalog = InMemoryMaterialCatalog::from_materials([
            Material::new("Yew", 0.0242, 1_400_000.0, 15_000.0, 0, 1.0),
            Material::new("Foam", 0.0, 1_000.0, 10.0, 7, 1.0),
        ]);
        let design = BowDesign::self_bow("Yew", 50.0, 66.0).with_arrow(ArrowDesign::new("Foam", 30.0, 0.35));
        assert!(matches!(
            compute_bow(&design, &catalog, &RulesSettings::default()),
            Err(DomainError::Computation { quantity: "material density", .. })
        ));

        let design = BowDesign::self_bow("Yew", 50.0, 66.0).with_arrow(ArrowDesign::new("Ash", 30.0, 0.35));
        let outcome = compute_bow(&design, &catalog, &RulesSettings::default()).unwrap();
        assert_eq!(outcome.value.arrows[0].status, ArrowStatus::MaterialMissing);
        assert_eq!(outcome.unresolved[0].name, "Ash");
    }

    #[test]
    fn missing_bow_material_fails() {
        let design = BowDesign::self_bow("Mithril", 50.0, 66.0);
        assert_eq!(
            compute_bow(&design, &StaticMaterialCatalog, &RulesSettings::default()).unwrap_err(),
            DomainError::resolution("material", "Mithril")
        );
    }

    #[test]
    fn construction_changes_energy_and_cost() {
        let straight = compute(&longbow()).value;
        let mut design = longbow();
        design.construction = BowConstruction::Recurve;
        let recurve = compute(&design).value;
        assert!(recurve.stored_energy_j > straight.stored_energy_j);
        assert_close(recurve.min_limb_thickness_in, 0.577950, 1e-6);
        // the thicker limb bends less, so the string stops short of the target draw
        assert_close(recurve.max_draw_length_in, 24.941739, 1e-5);
        assert_eq!(recurve.draw_length_in, recurve.max_draw_length_in);
        assert_close(recurve.stored_energy_j, 81.060652, 1e-5);
        assert_eq!(recurve.cost, 1.74);
    }

    #[test]
    fn laminated_limbs_blend_materials() {
        let mut design = longbow();
        design.working_material = MaterialPair::new("Horn", "Sinew");
        design.riser_material = MaterialPair::single("Ash");
        let bow = compute(&design).value;
        assert!(bow.limb_thickness_in > 0.0);
        assert!(bow.weight_lbs.is_finite());
    }

    #[test]
    fn crossbow_has_a_stock() {
        let mut design = longbow();
        design.bow_type = BowType::Crossbow;
        design.draw_weight_lbs = 150.0;
        design.total_length_in = 30.0;
        design.target_draw_length_in = 6.0;
        design.stock_length_in = 28.0;
        design.stock_material = Some(MaterialPair::single("Oak"));
        design.arrows = vec![ArrowDesign::new("Ash", 14.0, 0.5)];
        let bow = compute(&design).value;
        assert!(bow.stock_thickness_in > 0.0);
        assert!(bow.stock_lbs > 0.0);
        assert_eq!(bow.st, 19);
    }

    #[test]
    fn st_requirement() {
        assert_eq!(bow_st_requirement(BowType::Bow, 50.0), 11);
        assert_eq!(bow_st_requirement(BowType::Footbow, 100.0), 11);
        assert_eq!(bow_st_requirement(BowType::Crossbow, 0.0), 0);
    }

    #[test]
    fn zero_length_is_a_computation_error() {
        let design = BowDesign::self_bow("Yew", 50.0, 0.0);
        assert!(matches!(
            compute_bow(&design, &StaticMaterialCatalog, &RulesSettings::default()),
            Err(DomainError::Computation { quantity: "bow length", .. })
        ));
    }

    #[test]
    fn codes_parse() {
        assert_eq!("reflex".parse::<BowConstruction>().unwrap(), BowConstruction::Reflex);
        assert_eq!("bodkin".parse::<Arrowhead>().unwrap(), Arrowhead::Bodkin);
        assert!("longbow".parse::<BowType>().is_err());
    }

    #[test]
    fn compute_is_idempotent() {
        let model = BowBallisticsModel::new(&StaticMaterialCatalog);
        let settings = RulesSettings::default();
        assert_eq!(
            model.compute(&longbow(), &settings).unwrap(),
            model.compute(&longbow(), &settings).unwrap()
        );
    }
}
