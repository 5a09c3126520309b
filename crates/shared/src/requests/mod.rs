//! Compute requests sent by the host.
//!
//! Every request is one JSON object tagged by `kind`. Numeric fields are
//! [`LenientNumber`](crate::LenientNumber)s; enum codes are plain strings parsed
//! during intake so an unknown code reports the field it came from.

mod character;
mod weapons;

pub use character::{
    AttributeDto, AttributeSheetDto, AttributesRequest, ConditionsDto, DefaultDto, SkillDto,
    SkillsRequest, SpellDto, StrikingDamageRequest, StrikingStrengthInput,
};
pub use weapons::{ArrowDto, BowRequest, FirearmRequest, LaserRequest, MaterialRef};

use serde::{Deserialize, Serialize};

/// One computation, routed to one resolver.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum ComputeRequest {
    Attributes(AttributesRequest),
    Skills(SkillsRequest),
    StrikingDamage(StrikingDamageRequest),
    Firearm(FirearmRequest),
    Bow(BowRequest),
    Laser(LaserRequest),
}

impl ComputeRequest {
    pub fn kind(&self) -> &'static str {
        match self {
            ComputeRequest::Attributes(_) => "attributes",
            ComputeRequest::Skills(_) => "skills",
            ComputeRequest::StrikingDamage(_) => "strikingDamage",
            ComputeRequest::Firearm(_) => "firearm",
            ComputeRequest::Bow(_) => "bow",
            ComputeRequest::Laser(_) => "laser",
        }
    }
}
