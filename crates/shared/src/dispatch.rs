//! Stateless request dispatcher.
//!
//! One request in, one response out. Nothing is cached between calls, so hosts
//! may call these from as many threads as they like.

use armory_domain::game_systems::{
    parse_striking_strength, resolve_attributes, resolve_skill_list, striking_strength_to_swing,
    striking_strength_to_thrust, StrikingDamage,
};
use armory_domain::item_design::{
    BowBallisticsModel, FirearmBallisticsModel, LaserWeaponModel, WeaponModel,
};
use armory_domain::{DomainError, MaterialCatalog, Outcome, RulesSettings};

use crate::error::ProtocolError;
use crate::lenient::Intake;
use crate::requests::{ComputeRequest, StrikingStrengthInput};
use crate::responses::{ComputeResponse, ErrorCode, ResponseResult};

/// Route one request to its resolver and wrap the result.
pub fn handle_request(
    request: &ComputeRequest,
    settings: &RulesSettings,
    catalog: &dyn MaterialCatalog,
) -> ComputeResponse {
    let kind = request.kind();
    tracing::debug!(kind, "compute request");
    match compute(request, settings, catalog) {
        Ok(response) => response,
        Err(err) => {
            tracing::warn!(kind, error = %err, "compute request failed");
            ComputeResponse::failure(&err)
        }
    }
}

/// Decode a JSON request, handle it and encode the response.
///
/// Malformed input produces a `bad_request` response rather than an error, so
/// the host always gets a JSON document back.
pub fn handle_json(input: &str, settings: &RulesSettings, catalog: &dyn MaterialCatalog) -> String {
    let response = match decode(input) {
        Ok(request) => handle_request(&request, settings, catalog),
        Err(err) => {
            tracing::warn!(error = %err, "rejected compute request");
            ComputeResponse::bad_request(err.to_string())
        }
    };
    encode(&response).unwrap_or_else(|err| {
        tracing::warn!(error = %err, "failed to encode compute response");
        fallback_error(&err)
    })
}

pub fn decode(input: &str) -> Result<ComputeRequest, ProtocolError> {
    Ok(serde_json::from_str(input)?)
}

pub fn encode(response: &ComputeResponse) -> Result<String, ProtocolError> {
    serde_json::to_string(response).map_err(|e| ProtocolError::Encode(e.to_string()))
}

fn fallback_error(err: &ProtocolError) -> String {
    let response = ComputeResponse {
        result: ResponseResult::error(ErrorCode::InternalError, err.to_string()),
        issues: Vec::new(),
        unresolved: Vec::new(),
    };
    serde_json::to_string(&response)
        .unwrap_or_else(|_| r#"{"result":{"status":"error","code":"internal_error","message":"encoding failed"}}"#.to_string())
}

fn compute(
    request: &ComputeRequest,
    settings: &RulesSettings,
    catalog: &dyn MaterialCatalog,
) -> Result<ComputeResponse, DomainError> {
    let mut intake = Intake::new();
    let response = match request {
        ComputeRequest::Attributes(req) => {
            let sheet = req.attributes.to_domain(&mut intake);
            let conditions = req.conditions.to_domain(&mut intake);
            let issues = intake.finish(settings.validation_mode)?;
            ComputeResponse::from_outcome(issues, resolve_attributes(&sheet, &conditions, settings)?)
        }
        ComputeRequest::Skills(req) => {
            let snapshot = req.to_domain(&mut intake)?;
            let issues = intake.finish(settings.validation_mode)?;
            ComputeResponse::from_outcome(issues, resolve_skill_list(&snapshot, settings)?)
        }
        ComputeRequest::StrikingDamage(req) => {
            let sst = match &req.striking_st {
                StrikingStrengthInput::Number(n) => *n,
                StrikingStrengthInput::Text(text) => parse_striking_strength(text)?,
            };
            let damage = StrikingDamage {
                thrust: striking_strength_to_thrust(sst)?,
                swing: striking_strength_to_swing(sst)?,
            };
            ComputeResponse::from_outcome(Vec::new(), Outcome::clean(damage))
        }
        ComputeRequest::Firearm(req) => {
            let design = req.to_domain(&mut intake)?;
            let issues = intake.finish(settings.validation_mode)?;
            ComputeResponse::from_outcome(issues, FirearmBallisticsModel.compute(&design, settings)?)
        }
        ComputeRequest::Bow(req) => {
            let design = req.to_domain(&mut intake)?;
            let issues = intake.finish(settings.validation_mode)?;
            let model = BowBallisticsModel::new(catalog);
            ComputeResponse::from_outcome(issues, model.compute(&design, settings)?)
        }
        ComputeRequest::Laser(req) => {
            let design = req.to_domain(&mut intake)?;
            let issues = intake.finish(settings.validation_mode)?;
            ComputeResponse::from_outcome(issues, LaserWeaponModel.compute(&design, settings)?)
        }
    };
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use armory_domain::StaticMaterialCatalog;
    use serde_json::{json, Value};

    fn call(request: Value) -> Value {
        call_with(request, &RulesSettings::default())
    }

    fn call_with(request: Value, settings: &RulesSettings) -> Value {
        let output = handle_json(&request.to_string(), settings, &StaticMaterialCatalog);
        serde_json::from_str(&output).unwrap()
    }

    #[test]
    fn attributes_with_defaults() {
        let response = call(json!({"kind": "attributes"}));
        assert_eq!(response["result"]["status"], "success");
        assert_eq!(response["result"]["data"]["st"], 10);
        assert_eq!(response["result"]["data"]["dodge"], 8);
        assert!(response.get("issues").is_none());
    }

    #[test]
    fn lenient_numbers_are_reported() {
        let response = call(json!({
            "kind": "attributes",
            "attributes": {"st": {"mod": "", "points": "20"}}
        }));
        assert_eq!(response["result"]["data"]["st"], 12);
        let issues = response["issues"].as_array().unwrap();
        assert_eq!(issues.len(), 2);
        assert_eq!(issues[0]["fieldId"], "st.mod");
    }

    #[test]
    fn strict_mode_rejects_coercions() {
        let settings = RulesSettings::default().strict();
        let response = call_with(
            json!({"kind": "attributes", "attributes": {"dx": {"points": "abc"}}}),
            &settings,
        );
        assert_eq!(response["result"]["status"], "error");
        assert_eq!(response["result"]["code"], "validation_error");
    }

    #[test]
    fn skill_scenario() {
        let response = call(json!({
            "kind": "skills",
            "attributes": {"dx": {"points": 40}},
            "skills": [
                {"name": "Broadsword", "difficulty": "A", "baseAttr": "DX", "points": 4}
            ]
        }));
        let skill = &response["result"]["data"]["skills"][0];
        assert_eq!(skill["level"], 13);
    }

    #[test]
    fn unknown_difficulty_is_bad_request() {
        let response = call(json!({
            "kind": "skills",
            "skills": [{"name": "Juggling", "difficulty": "X", "baseAttr": "DX"}]
        }));
        assert_eq!(response["result"]["code"], "bad_request");
    }

    #[test]
    fn circular_defaults_under_reject_policy() {
        let response = call(json!({
            "kind": "skills",
            "cyclePolicy": "reject",
            "skills": [
                {"name": "Axe/Mace", "difficulty": "A", "baseAttr": "DX", "points": 1,
                 "defaults": [{"skill": "Flail", "mod": -4}]},
                {"name": "Flail", "difficulty": "H", "baseAttr": "DX", "points": 1,
                 "defaults": [{"skill": "Axe/Mace", "mod": -4}]}
            ]
        }));
        assert_eq!(response["result"]["code"], "unprocessable_input");
        assert_eq!(response["result"]["details"], json!(["Axe/Mace", "Flail", "Axe/Mace"]));
    }

    #[test]
    fn striking_damage_from_text() {
        let response = call(json!({"kind": "strikingDamage", "strikingSt": " 12 "}));
        assert_eq!(response["result"]["data"]["thrust"]["dice"], 1);
        let response = call(json!({"kind": "strikingDamage", "strikingSt": "twelve"}));
        assert_eq!(response["result"]["code"], "validation_error");
    }

    #[test]
    fn firearm_defaults_to_service_pistol() {
        let response = call(json!({"kind": "firearm"}));
        assert_eq!(response["result"]["status"], "success");
        assert_eq!(response["result"]["data"]["highEnergy"], false);
        assert_eq!(response["result"]["data"]["baseWoundMod"], 2);
    }

    #[test]
    fn bow_with_missing_material() {
        let response = call(json!({
            "kind": "bow",
            "workingMaterial": "Mithril",
            "drawWeightLbs": 50,
            "totalLengthIn": 72
        }));
        assert_eq!(response["result"]["code"], "not_found");

        let response = call(json!({
            "kind": "bow",
            "workingMaterial": "Yew",
            "drawWeightLbs": 50,
            "totalLengthIn": 72,
            "arrows": [{"lengthIn": 30, "diameterIn": 0.4, "material": "Unobtainium"}]
        }));
        assert_eq!(response["result"]["status"], "success");
        assert_eq!(response["unresolved"][0]["kind"], "material");
    }

    #[test]
    fn laser_profiles() {
        let response = call(json!({"kind": "laser", "damageDice": "3", "generator": "semi"}));
        let data = &response["result"]["data"];
        assert_eq!(data["profiles"].as_array().unwrap().len(), 6);
        assert_eq!(response["issues"][0]["fieldId"], "damageDice");

        let response = call(json!({"kind": "laser", "beamType": "phaser", "damageDice": 3}));
        assert_eq!(response["result"]["code"], "bad_request");
    }

    #[test]
    fn malformed_json_is_bad_request() {
        let output = handle_json("{not json", &RulesSettings::default(), &StaticMaterialCatalog);
        let response: Value = serde_json::from_str(&output).unwrap();
        assert_eq!(response["result"]["code"], "bad_request");
    }

    #[test]
    fn handling_is_idempotent() {
        let request = json!({"kind": "laser", "beamType": "xRayLaser", "damageDice": 6, "tl": 11});
        assert_eq!(call(request.clone()), call(request));
    }
}
