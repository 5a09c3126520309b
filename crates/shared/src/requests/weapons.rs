use serde::{Deserialize, Serialize};

use armory_domain::item_design::{
    ActionType, ArrowDesign, Arrowhead, BeamColor, BeamType, BowConstruction, BowDesign, BowType,
    CrossSection, FirearmDesign, GeneratorClass, LaserConfiguration, LaserDesign, MagazineMaterial,
    MagazineStyle, PowerCell,
};
use armory_domain::{DomainError, MaterialPair, Quality};

use crate::lenient::{Intake, LenientNumber};

/// Cartridge firearm design. Absent fields take the values of a 9mm service pistol.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FirearmRequest {
    pub caliber_mm: Option<LenientNumber>,
    pub chamber_bore_mm: Option<LenientNumber>,
    pub chamber_pressure_psi: Option<LenientNumber>,
    pub burn_length_mm: Option<LenientNumber>,
    pub barrel_length_mm: Option<LenientNumber>,
    pub case_length_mm: Option<LenientNumber>,
    pub projectile_mass_grains: Option<LenientNumber>,
    pub projectile_aspect_ratio: Option<LenientNumber>,
    pub action: Option<String>,
    pub capacity: Option<LenientNumber>,
    pub closed_bolt: Option<bool>,
    pub magazine_style: Option<String>,
    pub magazine_material: Option<String>,
    pub essential_materials: bool,
    pub weight_tweak: Option<LenientNumber>,
    pub tl: Option<LenientNumber>,
}

impl FirearmRequest {
    pub fn to_domain(&self, intake: &mut Intake) -> Result<FirearmDesign, DomainError> {
        let base = FirearmDesign::default();
        Ok(FirearmDesign {
            caliber_mm: intake.number_or("caliberMm", &self.caliber_mm, base.caliber_mm),
            chamber_bore_mm: intake.number_or("chamberBoreMm", &self.chamber_bore_mm, base.chamber_bore_mm),
            chamber_pressure_psi: intake.number_or(
                "chamberPressurePsi",
                &self.chamber_pressure_psi,
                base.chamber_pressure_psi,
            ),
            burn_length_mm: intake.number_or("burnLengthMm", &self.burn_length_mm, base.burn_length_mm),
            barrel_length_mm: intake.number_or("barrelLengthMm", &self.barrel_length_mm, base.barrel_length_mm),
            case_length_mm: intake.number_or("caseLengthMm", &self.case_length_mm, base.case_length_mm),
            projectile_mass_grains: intake.number_or(
                "projectileMassGrains",
                &self.projectile_mass_grains,
                base.projectile_mass_grains,
            ),
            projectile_aspect_ratio: intake.number_or(
                "projectileAspectRatio",
                &self.projectile_aspect_ratio,
                base.projectile_aspect_ratio,
            ),
            action: intake.code_or::<ActionType>(&self.action, base.action)?,
            capacity: intake.count_or("capacity", &self.capacity, base.capacity),
            closed_bolt: self.closed_bolt.unwrap_or(base.closed_bolt),
            magazine_style: intake.code_or::<MagazineStyle>(&self.magazine_style, base.magazine_style)?,
            magazine_material: intake
                .code_or::<MagazineMaterial>(&self.magazine_material, base.magazine_material)?,
            essential_materials: self.essential_materials,
            weight_tweak: intake.number_or("weightTweak", &self.weight_tweak, base.weight_tweak),
            tl: intake.tech_level_or("tl", &self.tl, base.tl),
        })
    }
}

/// A material given either by one name or as a pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MaterialRef {
    Single(String),
    Pair { first: String, second: String },
}

impl MaterialRef {
    fn to_domain(&self) -> MaterialPair {
        match self {
            MaterialRef::Single(name) => MaterialPair::single(name.clone()),
            MaterialRef::Pair { first, second } => MaterialPair::new(first.clone(), second.clone()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrowDto {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub length_in: LenientNumber,
    #[serde(default)]
    pub diameter_in: LenientNumber,
    pub material: String,
    #[serde(default)]
    pub arrowhead: Option<String>,
    #[serde(default)]
    pub quality: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BowRequest {
    #[serde(default)]
    pub bow_type: Option<String>,
    #[serde(default)]
    pub construction: Option<String>,
    #[serde(default)]
    pub cross_section: Option<String>,
    #[serde(default)]
    pub width_ratio: Option<LenientNumber>,
    pub working_material: MaterialRef,
    /// Defaults to the working material
    #[serde(default)]
    pub riser_material: Option<MaterialRef>,
    #[serde(default)]
    pub stock_material: Option<MaterialRef>,
    #[serde(default)]
    pub draw_weight_lbs: LenientNumber,
    #[serde(default)]
    pub target_draw_length_in: Option<LenientNumber>,
    #[serde(default)]
    pub total_length_in: LenientNumber,
    #[serde(default)]
    pub working_percent: Option<LenientNumber>,
    #[serde(default)]
    pub limb_thickness_in: Option<LenientNumber>,
    #[serde(default)]
    pub stock_length_in: Option<LenientNumber>,
    #[serde(default)]
    pub string_loops: Option<LenientNumber>,
    #[serde(default)]
    pub quality: Option<String>,
    #[serde(default)]
    pub arrows: Vec<ArrowDto>,
}

impl BowRequest {
    pub fn to_domain(&self, intake: &mut Intake) -> Result<BowDesign, DomainError> {
        let working_material = self.working_material.to_domain();
        let mut design = BowDesign::self_bow(
            &working_material.first,
            intake.number("drawWeightLbs", &self.draw_weight_lbs),
            intake.number("totalLengthIn", &self.total_length_in),
        );
        design.bow_type = intake.code_or::<BowType>(&self.bow_type, design.bow_type)?;
        design.construction = intake.code_or::<BowConstruction>(&self.construction, design.construction)?;
        design.cross_section = intake.code_or::<CrossSection>(&self.cross_section, design.cross_section)?;
        design.width_ratio = intake.number_or("widthRatio", &self.width_ratio, design.width_ratio);
        design.riser_material = self
            .riser_material
            .as_ref()
            .map_or_else(|| working_material.clone(), MaterialRef::to_domain);
        design.working_material = working_material;
        design.stock_material = self.stock_material.as_ref().map(MaterialRef::to_domain);
        design.target_draw_length_in = intake.number_or(
            "targetDrawLengthIn",
            &self.target_draw_length_in,
            design.target_draw_length_in,
        );
        design.working_percent =
            intake.number_or("workingPercent", &self.working_percent, design.working_percent);
        design.limb_thickness_in =
            intake.number_or("limbThicknessIn", &self.limb_thickness_in, design.limb_thickness_in);
        design.stock_length_in =
            intake.number_or("stockLengthIn", &self.stock_length_in, design.stock_length_in);
        design.string_loops = intake.count_or("stringLoops", &self.string_loops, design.string_loops);
        design.quality = intake.code_or::<Quality>(&self.quality, design.quality)?;

        for (i, arrow) in self.arrows.iter().enumerate() {
            let mut domain = ArrowDesign::new(
                arrow.material.clone(),
                intake.number(&format!("arrows[{i}].lengthIn"), &arrow.length_in),
                intake.number(&format!("arrows[{i}].diameterIn"), &arrow.diameter_in),
            );
            domain.name = arrow.name.clone();
            domain.arrowhead = intake.code_or::<Arrowhead>(&arrow.arrowhead, domain.arrowhead)?;
            domain.quality = intake.code_or::<Quality>(&arrow.quality, domain.quality)?;
            design.arrows.push(domain);
        }
        Ok(design)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LaserRequest {
    pub configuration: Option<String>,
    pub beam_type: Option<String>,
    pub color: Option<String>,
    pub focal_array: Option<LenientNumber>,
    pub generator: Option<String>,
    pub damage_dice: LenientNumber,
    pub power_cell: Option<String>,
    pub cells: Option<LenientNumber>,
    pub tl: Option<LenientNumber>,
    pub pulse: bool,
    pub field_jacketed: bool,
    pub gravitic_focus: Option<LenientNumber>,
    pub super_science: bool,
    pub weight_tweak: Option<LenientNumber>,
}

impl LaserRequest {
    pub fn to_domain(&self, intake: &mut Intake) -> Result<LaserDesign, DomainError> {
        let configuration =
            intake.code_or::<LaserConfiguration>(&self.configuration, LaserConfiguration::Pistol)?;
        let beam_type = intake.code_or::<BeamType>(&self.beam_type, BeamType::Laser)?;
        let mut design = LaserDesign::new(
            configuration,
            beam_type,
            intake.number("damageDice", &self.damage_dice),
        );
        design.color = intake.code_or::<BeamColor>(&self.color, design.color)?;
        design.focal_array = intake.number_or("focalArray", &self.focal_array, design.focal_array);
        design.generator = intake.code_or::<GeneratorClass>(&self.generator, design.generator)?;
        design.power_cell = intake.code_or::<PowerCell>(&self.power_cell, design.power_cell)?;
        design.cells = intake.count_or("cells", &self.cells, design.cells);
        design.tl = intake.tech_level_or("tl", &self.tl, design.tl);
        design.pulse = self.pulse;
        design.field_jacketed = self.field_jacketed;
        design.gravitic_focus = intake
            .count_or("graviticFocus", &self.gravitic_focus, 0)
            .min(u32::from(u8::MAX)) as u8;
        design.super_science = self.super_science;
        design.weight_tweak = intake.number_or("weightTweak", &self.weight_tweak, design.weight_tweak);
        Ok(design)
    }
}
