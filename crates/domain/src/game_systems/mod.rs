//! Character rule engines.
//!
//! Each resolver turns a snapshot of raw character data into derived values.
//! Resolution is a pure function of the snapshot and [`RulesSettings`]; nothing
//! here holds state between calls.
//!
//! # Resolvers
//!
//! - Attributes and secondary characteristics (`attributes`)
//! - Striking-strength damage table (`damage_table`)
//! - Skills, techniques and spells (`skills`)
//!
//! [`RulesSettings`]: crate::value_objects::RulesSettings

mod attributes;
mod damage_table;
mod skills;

// Attribute exports
pub use attributes::{
    basic_lift, calc_sm_discount, resolve_attributes, resolve_dodge, resolve_dx, resolve_fp,
    resolve_fright_check, resolve_hp, resolve_ht, resolve_iq, resolve_iq_based,
    resolve_lifting_st, resolve_move, resolve_speed, resolve_st, resolve_striking_st,
    AttributeSheet, DodgeConditions, ResolvedAttributes,
};

// Damage table exports
pub use damage_table::{
    decompose_damage, parse_striking_strength, striking_damage, striking_strength_to_swing,
    striking_strength_to_thrust, StrikingDamage, MAX_STRIKING_STRENGTH,
};

// Skill exports
pub use skills::{
    default_is_worth, dependency_order, one_point_in_skill, one_point_in_skill_code,
    points_to_bonus, resolve_skill_list, CharacterSnapshot, DefaultCandidates, ResolvedCharacter,
    SkillLevelResolver, SkillResolution,
};
