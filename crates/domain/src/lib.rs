//! Derived-statistics engine for a point-buy tabletop RPG.
//!
//! The crate is split the same way the rules are:
//! - [`game_systems`] resolves a character: attributes, secondary
//!   characteristics, skills, techniques and spells.
//! - [`item_design`] turns physical weapon parameters into game statistics.
//!
//! Every calculation is pure and synchronous. Inputs that are not usable numbers
//! are coerced and reported through [`Outcome::issues`] unless the caller asks
//! for [`ValidationMode::Strict`].

pub mod entities;
pub mod error;
pub mod game_systems;
pub mod item_design;
pub mod validation;
pub mod value_objects;

pub use entities::{
    DefaultEntry, Difficulty, InMemoryMaterialCatalog, Material, MaterialCatalog, MaterialPair,
    SkillCategory, SkillDefinition, SpellDefinition, StaticMaterialCatalog,
};

pub use error::DomainError;

pub use game_systems::{
    resolve_attributes, resolve_skill_list, striking_damage, AttributeSheet, CharacterSnapshot,
    DodgeConditions, ResolvedAttributes, ResolvedCharacter, SkillLevelResolver, SkillResolution,
    StrikingDamage,
};

pub use item_design::{
    BowBallisticsModel, BowDesign, BowStats, FirearmBallisticsModel, FirearmDesign,
    FirearmStats, LaserDesign, LaserStats, LaserWeaponModel, WeaponModel,
};

pub use validation::{Outcome, ResolutionIssue, Sanitizer, ValidationError};

pub use value_objects::{
    Attribute, AttributeKind, CyclePolicy, DamageRoll, FatiguePointState, HitPointState, Quality,
    RulesSettings, ValidationMode,
};
