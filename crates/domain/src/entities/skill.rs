//! Skill entity - skills, techniques and spells as the host stores them
//!
//! A skill is bought with character points against a base attribute and may
//! default to attributes or to other skills. Techniques hang off a parent skill;
//! spells are bought against magical ability.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::value_objects::AttributeKind;

/// Skill difficulty class.
///
/// Codes are case-sensitive single or double letters; anything else is an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Difficulty {
    #[serde(rename = "E")]
    Easy,
    #[serde(rename = "A")]
    Average,
    #[serde(rename = "H")]
    Hard,
    #[serde(rename = "VH")]
    VeryHard,
    /// Wildcard: three times the cost, very hard progression
    #[serde(rename = "W")]
    Wildcard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 5] = [
        Difficulty::Easy,
        Difficulty::Average,
        Difficulty::Hard,
        Difficulty::VeryHard,
        Difficulty::Wildcard,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Self::Easy => "E",
            Self::Average => "A",
            Self::Hard => "H",
            Self::VeryHard => "VH",
            Self::Wildcard => "W",
        }
    }

    /// Offset subtracted from the point-buy curve.
    pub fn curve_offset(&self) -> i32 {
        match self {
            Self::Easy => 0,
            Self::Average => 1,
            Self::Hard => 2,
            Self::VeryHard | Self::Wildcard => 3,
        }
    }

    /// Offset below the base attribute that a single point buys.
    pub fn one_point_offset(&self) -> i32 {
        match self {
            Self::Easy => 0,
            Self::Average => 1,
            Self::Hard => 2,
            Self::VeryHard => 3,
            Self::Wildcard => 4,
        }
    }

    /// Wildcard skills cost three times as much per level.
    pub fn cost_factor(&self) -> f64 {
        match self {
            Self::Wildcard => 3.0,
            _ => 1.0,
        }
    }
}

impl FromStr for Difficulty {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "E" => Ok(Self::Easy),
            "A" => Ok(Self::Average),
            "H" => Ok(Self::Hard),
            "VH" => Ok(Self::VeryHard),
            "W" => Ok(Self::Wildcard),
            other => Err(DomainError::unrecognized("difficulty", other)),
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Whether an entry is a full skill or a technique.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SkillCategory {
    #[default]
    Skill,
    Technique,
}

impl FromStr for SkillCategory {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "skill" => Ok(Self::Skill),
            "technique" => Ok(Self::Technique),
            other => Err(DomainError::unrecognized("category", other)),
        }
    }
}

/// One default: an attribute mnemonic or another skill's exact name, plus a modifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DefaultEntry {
    pub skill: String,
    #[serde(rename = "mod", default)]
    pub modifier: i32,
}

impl DefaultEntry {
    pub fn new(skill: impl Into<String>, modifier: i32) -> Self {
        Self {
            skill: skill.into(),
            modifier,
        }
    }

    /// The attribute this default names, if it names one.
    pub fn attribute(&self) -> Option<AttributeKind> {
        AttributeKind::from_mnemonic(&self.skill)
    }
}

/// A skill or technique as provided in the character snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillDefinition {
    pub name: String,
    #[serde(default)]
    pub category: SkillCategory,
    pub difficulty: Difficulty,
    /// Attribute mnemonic for skills; parent skill name (or attribute) for techniques
    pub base_attr: String,
    #[serde(default)]
    pub defaults: Vec<DefaultEntry>,
    #[serde(default)]
    pub points: f64,
    #[serde(rename = "mod", default)]
    pub modifier: i32,
    #[serde(default)]
    pub dabbler_points: Option<i32>,
    /// Technique default penalty relative to the parent
    #[serde(default)]
    pub min_level: Option<i32>,
    /// Technique ceiling relative to the parent
    #[serde(default)]
    pub max_level: Option<i32>,
    /// Level the host last computed, read by other skills' defaults in single-pass mode
    #[serde(default)]
    pub level: Option<i32>,
}

impl SkillDefinition {
    pub fn new(name: impl Into<String>, base_attr: impl Into<String>, difficulty: Difficulty) -> Self {
        Self {
            name: name.into(),
            category: SkillCategory::Skill,
            difficulty,
            base_attr: base_attr.into(),
            defaults: Vec::new(),
            points: 0.0,
            modifier: 0,
            dabbler_points: None,
            min_level: None,
            max_level: None,
            level: None,
        }
    }

    pub fn technique(
        name: impl Into<String>,
        parent: impl Into<String>,
        difficulty: Difficulty,
        min_level: i32,
        max_level: i32,
    ) -> Self {
        let mut technique = Self::new(name, parent, difficulty);
        technique.category = SkillCategory::Technique;
        technique.min_level = Some(min_level);
        technique.max_level = Some(max_level);
        technique
    }

    pub fn with_points(mut self, points: f64) -> Self {
        self.points = points;
        self
    }

    pub fn with_modifier(mut self, modifier: i32) -> Self {
        self.modifier = modifier;
        self
    }

    pub fn with_default(mut self, skill: impl Into<String>, modifier: i32) -> Self {
        self.defaults.push(DefaultEntry::new(skill, modifier));
        self
    }

    pub fn with_dabbler(mut self, points: i32) -> Self {
        self.dabbler_points = Some(points);
        self
    }

    pub fn with_level(mut self, level: i32) -> Self {
        self.level = Some(level);
        self
    }

    pub fn is_technique(&self) -> bool {
        self.category == SkillCategory::Technique
    }

    /// Only real skills with points invested may serve as another skill's default.
    pub fn is_default_source(&self) -> bool {
        self.category == SkillCategory::Skill && self.points > 0.0
    }

    pub fn name_matches(&self, name: &str) -> bool {
        self.name.trim().eq_ignore_ascii_case(name.trim())
    }
}

/// A spell, bought against magical ability rather than a plain attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpellDefinition {
    pub name: String,
    pub difficulty: Difficulty,
    pub base_attr: AttributeKind,
    /// Attribute adjustment specific to this spell's college
    #[serde(default)]
    pub attribute_mod: i32,
    #[serde(default)]
    pub points: f64,
    #[serde(rename = "mod", default)]
    pub modifier: i32,
}

impl SpellDefinition {
    pub fn new(name: impl Into<String>, base_attr: AttributeKind, difficulty: Difficulty) -> Self {
        Self {
            name: name.into(),
            difficulty,
            base_attr,
            attribute_mod: 0,
            points: 0.0,
            modifier: 0,
        }
    }

    pub fn with_points(mut self, points: f64) -> Self {
        self.points = points;
        self
    }
}
