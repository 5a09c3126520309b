//! Armory Protocol - JSON wire format between a tabletop host and the computation core
//!
//! This crate contains everything a host needs to talk to `armory-domain`:
//! - Request DTOs tagged by `kind`, with permissive numeric fields
//! - Response envelope (`ResponseResult`, `ErrorCode`) with coercion reports
//! - A stateless dispatcher (`handle_request`, `handle_json`)
//!
//! # Design Principles
//!
//! 1. **No business logic** - every formula lives in the domain crate
//! 2. **Forgiving input** - bad numbers are coerced and reported, never fatal in lenient mode
//! 3. **Strict codes** - unknown enum codes are reported, never guessed

mod dispatch;
pub mod error;
pub mod lenient;
pub mod requests;
pub mod responses;

pub use dispatch::{decode, encode, handle_json, handle_request};
pub use error::ProtocolError;
pub use lenient::{Coercion, Intake, LenientNumber};
pub use requests::{
    AttributesRequest, BowRequest, ComputeRequest, FirearmRequest, LaserRequest, SkillsRequest,
    StrikingDamageRequest,
};
pub use responses::{ComputeResponse, ErrorCode, ResponseResult};

// Domain types that appear in responses
pub use armory_domain::{ResolutionIssue, RulesSettings, ValidationError};
