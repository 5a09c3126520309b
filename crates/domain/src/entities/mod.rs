//! Entities supplied by the host snapshot

mod material;
mod skill;

pub use material::{
    InMemoryMaterialCatalog, Material, MaterialCatalog, MaterialPair, StaticMaterialCatalog,
};
pub use skill::{DefaultEntry, Difficulty, SkillCategory, SkillDefinition, SpellDefinition};
