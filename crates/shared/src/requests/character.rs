use serde::{Deserialize, Serialize};

use armory_domain::{
    Attribute, AttributeKind, AttributeSheet, CharacterSnapshot, CyclePolicy, DefaultEntry,
    Difficulty, DodgeConditions, DomainError, FatiguePointState, HitPointState, SkillCategory,
    SkillDefinition, SpellDefinition,
};

use crate::lenient::{Intake, LenientNumber};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AttributeDto {
    #[serde(rename = "mod", default)]
    pub modifier: LenientNumber,
    #[serde(default)]
    pub points: LenientNumber,
}

impl AttributeDto {
    fn to_domain(&self, intake: &mut Intake, field: &str) -> Attribute {
        Attribute::new(
            intake.number(&format!("{field}.mod"), &self.modifier),
            intake.number(&format!("{field}.points"), &self.points),
        )
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AttributeSheetDto {
    pub st: AttributeDto,
    pub dx: AttributeDto,
    pub iq: AttributeDto,
    pub ht: AttributeDto,
    pub per: AttributeDto,
    pub will: AttributeDto,
    pub fright_check: AttributeDto,
    pub hp: AttributeDto,
    pub fp: AttributeDto,
    pub lifting_st: AttributeDto,
    pub striking_st: AttributeDto,
    pub speed: AttributeDto,
    #[serde(rename = "move")]
    pub move_: AttributeDto,
    pub dodge: AttributeDto,
    pub size_modifier: LenientNumber,
}

impl AttributeSheetDto {
    pub fn to_domain(&self, intake: &mut Intake) -> AttributeSheet {
        AttributeSheet {
            st: self.st.to_domain(intake, "st"),
            dx: self.dx.to_domain(intake, "dx"),
            iq: self.iq.to_domain(intake, "iq"),
            ht: self.ht.to_domain(intake, "ht"),
            per: self.per.to_domain(intake, "per"),
            will: self.will.to_domain(intake, "will"),
            fright_check: self.fright_check.to_domain(intake, "frightCheck"),
            hp: self.hp.to_domain(intake, "hp"),
            fp: self.fp.to_domain(intake, "fp"),
            lifting_st: self.lifting_st.to_domain(intake, "liftingSt"),
            striking_st: self.striking_st.to_domain(intake, "strikingSt"),
            speed: self.speed.to_domain(intake, "speed"),
            move_: self.move_.to_domain(intake, "move"),
            dodge: self.dodge.to_domain(intake, "dodge"),
            size_modifier: intake.number("sizeModifier", &self.size_modifier),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ConditionsDto {
    pub combat_reflexes: bool,
    pub enhanced_dodge: LenientNumber,
    pub encumbrance_level: LenientNumber,
    pub hp_state: HitPointState,
    pub fp_state: FatiguePointState,
}

impl ConditionsDto {
    pub fn to_domain(&self, intake: &mut Intake) -> DodgeConditions {
        DodgeConditions {
            combat_reflexes: self.combat_reflexes,
            enhanced_dodge: intake.integer("enhancedDodge", &self.enhanced_dodge),
            encumbrance_level: intake.integer("encumbranceLevel", &self.encumbrance_level),
            hp_state: self.hp_state,
            fp_state: self.fp_state,
        }
    }
}

/// Resolve the attribute block only.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AttributesRequest {
    pub attributes: AttributeSheetDto,
    pub conditions: ConditionsDto,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultDto {
    pub skill: String,
    #[serde(rename = "mod", default)]
    pub modifier: LenientNumber,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillDto {
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    pub difficulty: String,
    pub base_attr: String,
    #[serde(default)]
    pub defaults: Vec<DefaultDto>,
    #[serde(default)]
    pub points: LenientNumber,
    #[serde(rename = "mod", default)]
    pub modifier: LenientNumber,
    #[serde(default)]
    pub dabbler_points: Option<LenientNumber>,
    #[serde(default)]
    pub min_level: Option<LenientNumber>,
    #[serde(default)]
    pub max_level: Option<LenientNumber>,
    #[serde(default)]
    pub level: Option<LenientNumber>,
}

impl SkillDto {
    fn to_domain(&self, intake: &mut Intake) -> Result<SkillDefinition, DomainError> {
        let field = |suffix: &str| format!("{}.{suffix}", self.name);
        let difficulty: Difficulty = self.difficulty.trim().parse()?;
        let category = intake.code_or(&self.category, SkillCategory::Skill)?;
        let defaults = self
            .defaults
            .iter()
            .map(|d| DefaultEntry::new(d.skill.clone(), intake.integer(&field("defaults.mod"), &d.modifier)))
            .collect();
        Ok(SkillDefinition {
            name: self.name.clone(),
            category,
            difficulty,
            base_attr: self.base_attr.clone(),
            defaults,
            points: intake.number(&field("points"), &self.points),
            modifier: intake.integer(&field("mod"), &self.modifier),
            dabbler_points: intake.optional_integer(&field("dabblerPoints"), &self.dabbler_points),
            min_level: intake.optional_integer(&field("minLevel"), &self.min_level),
            max_level: intake.optional_integer(&field("maxLevel"), &self.max_level),
            level: intake.optional_integer(&field("level"), &self.level),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpellDto {
    pub name: String,
    pub difficulty: String,
    pub base_attr: String,
    #[serde(default)]
    pub attribute_mod: LenientNumber,
    #[serde(default)]
    pub points: LenientNumber,
    #[serde(rename = "mod", default)]
    pub modifier: LenientNumber,
}

impl SpellDto {
    fn to_domain(&self, intake: &mut Intake) -> Result<SpellDefinition, DomainError> {
        let field = |suffix: &str| format!("{}.{suffix}", self.name);
        Ok(SpellDefinition {
            name: self.name.clone(),
            difficulty: self.difficulty.trim().parse()?,
            base_attr: self.base_attr.parse::<AttributeKind>()?,
            attribute_mod: intake.integer(&field("attributeMod"), &self.attribute_mod),
            points: intake.number(&field("points"), &self.points),
            modifier: intake.integer(&field("mod"), &self.modifier),
        })
    }
}

/// Resolve a whole character: attributes, skills, techniques and spells.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SkillsRequest {
    pub attributes: AttributeSheetDto,
    pub conditions: ConditionsDto,
    pub skills: Vec<SkillDto>,
    pub spells: Vec<SpellDto>,
    pub magery: LenientNumber,
    /// `single_pass` or `reject`; the settings' policy applies when absent
    pub cycle_policy: Option<String>,
}

impl SkillsRequest {
    pub fn to_domain(&self, intake: &mut Intake) -> Result<CharacterSnapshot, DomainError> {
        let cycle_policy = match self.cycle_policy.as_deref() {
            None => None,
            Some(code) => Some(
                code.parse::<CyclePolicy>()
                    .map_err(|_| DomainError::unrecognized("cycle policy", code))?,
            ),
        };
        Ok(CharacterSnapshot {
            attributes: self.attributes.to_domain(intake),
            conditions: self.conditions.to_domain(intake),
            skills: self
                .skills
                .iter()
                .map(|s| s.to_domain(intake))
                .collect::<Result<_, _>>()?,
            spells: self
                .spells
                .iter()
                .map(|s| s.to_domain(intake))
                .collect::<Result<_, _>>()?,
            magery: intake.integer("magery", &self.magery),
            cycle_policy,
        })
    }
}

/// Striking strength as the host sends it: a number or free text such as `"12"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StrikingStrengthInput {
    Number(f64),
    Text(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrikingDamageRequest {
    pub striking_st: StrikingStrengthInput,
}
