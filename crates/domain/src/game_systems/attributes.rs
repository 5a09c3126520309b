//! Primary and secondary attribute resolution.
//!
//! Every value is recomputed from the point allocation on each call:
//! - ST/HT: 10 + mod + points/10 (ST cost discounted by size modifier)
//! - DX/IQ: 10 + mod + points/20
//! - Per/Will: IQ + mod + points/5, Fright Check: Will + mod + points/2
//! - Basic Speed in quarter steps, Move and Dodge from Speed

use serde::{Deserialize, Serialize};

use super::damage_table::striking_damage;
use crate::error::DomainError;
use crate::validation::{Outcome, Sanitizer};
use crate::value_objects::{
    Attribute, AttributeKind, DamageRoll, FatiguePointState, HitPointState, RulesSettings,
};

/// Size-modifier discount on ST-derived costs, clamped to `[0.2, 1]`.
pub fn calc_sm_discount(size_modifier: f64) -> f64 {
    ((10.0 - size_modifier) / 10.0).clamp(0.2, 1.0)
}

fn bought(points: f64, cost_per_level: f64) -> f64 {
    (points / cost_per_level).floor()
}

fn level(base: f64, attr: &Attribute, cost_per_level: f64) -> i32 {
    (base + attr.modifier + bought(attr.points, cost_per_level)).floor() as i32
}

pub fn resolve_st(attr: &Attribute, sm_discount: f64) -> i32 {
    level(10.0, attr, 10.0 * sm_discount)
}

pub fn resolve_ht(attr: &Attribute) -> i32 {
    level(10.0, attr, 10.0)
}

pub fn resolve_dx(attr: &Attribute) -> i32 {
    level(10.0, attr, 20.0)
}

pub fn resolve_iq(attr: &Attribute) -> i32 {
    level(10.0, attr, 20.0)
}

/// Perception and Will both build on IQ.
pub fn resolve_iq_based(iq: i32, attr: &Attribute) -> i32 {
    level(f64::from(iq), attr, 5.0)
}

pub fn resolve_fright_check(will: i32, attr: &Attribute) -> i32 {
    level(f64::from(will), attr, 2.0)
}

pub fn resolve_lifting_st(st: i32, attr: &Attribute, sm_discount: f64) -> i32 {
    level(f64::from(st), attr, 3.0 * sm_discount)
}

pub fn resolve_striking_st(st: i32, attr: &Attribute, sm_discount: f64) -> i32 {
    level(f64::from(st), attr, 5.0 * sm_discount)
}

pub fn resolve_hp(st: i32, attr: &Attribute, sm_discount: f64) -> i32 {
    level(f64::from(st), attr, 2.0 * sm_discount)
}

pub fn resolve_fp(ht: i32, attr: &Attribute) -> i32 {
    level(f64::from(ht), attr, 3.0)
}

/// Basic Speed, kept at quarter-point resolution.
pub fn resolve_speed(dx: i32, ht: i32, attr: &Attribute) -> f64 {
    let raw = (f64::from(dx) + f64::from(ht)) / 4.0 + attr.modifier + attr.points / 20.0;
    (raw * 4.0).floor() / 4.0
}

pub fn resolve_move(speed: f64, attr: &Attribute) -> i32 {
    level(speed.floor(), attr, 5.0)
}

/// Basic Lift in pounds; whole pounds once it reaches 10.
pub fn basic_lift(lifting_st: i32) -> f64 {
    let lift = f64::from(lifting_st).powi(2) / 5.0;
    if lift >= 10.0 {
        lift.round()
    } else {
        lift
    }
}

/// Situational inputs to Dodge.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DodgeConditions {
    #[serde(default)]
    pub combat_reflexes: bool,
    #[serde(default)]
    pub enhanced_dodge: i32,
    /// Encumbrance level 0 (none) to 4 (extra-heavy); subtracted from Dodge
    #[serde(default)]
    pub encumbrance_level: i32,
    #[serde(default)]
    pub hp_state: HitPointState,
    #[serde(default)]
    pub fp_state: FatiguePointState,
}

/// Dodge: additive modifiers first, then halving for bad HP and for bad FP, never below 1.
pub fn resolve_dodge(speed: f64, attr: &Attribute, conditions: &DodgeConditions) -> i32 {
    let mut dodge = speed.floor() + 3.0 + attr.modifier + bought(attr.points, 15.0);
    if conditions.combat_reflexes {
        dodge += 1.0;
    }
    dodge += f64::from(conditions.enhanced_dodge);
    dodge -= f64::from(conditions.encumbrance_level.saturating_abs());

    let mut multiplier = 1.0;
    if conditions.hp_state > HitPointState::Injured {
        multiplier *= 0.5;
    }
    if conditions.fp_state > FatiguePointState::Tired {
        multiplier *= 0.5;
    }
    let scaled = (dodge * multiplier).ceil() as i32;
    scaled.max(1)
}

/// Point allocations for every attribute on the sheet.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AttributeSheet {
    pub st: Attribute,
    pub dx: Attribute,
    pub iq: Attribute,
    pub ht: Attribute,
    pub per: Attribute,
    pub will: Attribute,
    pub fright_check: Attribute,
    pub hp: Attribute,
    pub fp: Attribute,
    pub lifting_st: Attribute,
    pub striking_st: Attribute,
    pub speed: Attribute,
    #[serde(rename = "move")]
    pub move_: Attribute,
    pub dodge: Attribute,
    pub size_modifier: f64,
}

/// Fully resolved attribute values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedAttributes {
    pub st: i32,
    pub dx: i32,
    pub iq: i32,
    pub ht: i32,
    pub per: i32,
    pub will: i32,
    pub fright_check: i32,
    pub hp: i32,
    pub fp: i32,
    pub lifting_st: i32,
    pub striking_st: i32,
    pub basic_lift: f64,
    pub speed: f64,
    #[serde(rename = "move")]
    pub move_: i32,
    pub dodge: i32,
    pub thrust: DamageRoll,
    pub swing: DamageRoll,
    pub sm_discount: f64,
}

impl ResolvedAttributes {
    /// Value of an attribute usable as a skill base or default.
    pub fn value(&self, kind: AttributeKind) -> i32 {
        match kind {
            AttributeKind::St => self.st,
            AttributeKind::Dx => self.dx,
            AttributeKind::Iq => self.iq,
            AttributeKind::Ht => self.ht,
            AttributeKind::Per => self.per,
            AttributeKind::Will => self.will,
        }
    }
}

fn sanitize_attribute(s: &mut Sanitizer, field: &str, attr: &Attribute) -> Attribute {
    Attribute {
        modifier: s.number(&format!("{field}.mod"), attr.modifier),
        points: s.number(&format!("{field}.points"), attr.points),
    }
}

/// Resolve the whole sheet, coercing non-numeric inputs first.
pub fn resolve_attributes(
    sheet: &AttributeSheet,
    conditions: &DodgeConditions,
    settings: &RulesSettings,
) -> Result<Outcome<ResolvedAttributes>, DomainError> {
    let mut s = Sanitizer::new();
    let st_attr = sanitize_attribute(&mut s, "st", &sheet.st);
    let dx_attr = sanitize_attribute(&mut s, "dx", &sheet.dx);
    let iq_attr = sanitize_attribute(&mut s, "iq", &sheet.iq);
    let ht_attr = sanitize_attribute(&mut s, "ht", &sheet.ht);
    let per_attr = sanitize_attribute(&mut s, "per", &sheet.per);
    let will_attr = sanitize_attribute(&mut s, "will", &sheet.will);
    let fright_attr = sanitize_attribute(&mut s, "frightCheck", &sheet.fright_check);
    let hp_attr = sanitize_attribute(&mut s, "hp", &sheet.hp);
    let fp_attr = sanitize_attribute(&mut s, "fp", &sheet.fp);
    let lifting_attr = sanitize_attribute(&mut s, "liftingSt", &sheet.lifting_st);
    let striking_attr = sanitize_attribute(&mut s, "strikingSt", &sheet.striking_st);
    let speed_attr = sanitize_attribute(&mut s, "speed", &sheet.speed);
    let move_attr = sanitize_attribute(&mut s, "move", &sheet.move_);
    let dodge_attr = sanitize_attribute(&mut s, "dodge", &sheet.dodge);
    let size_modifier = s.number("sizeModifier", sheet.size_modifier);
    let issues = s.finish(settings.validation_mode)?;

    let sm_discount = calc_sm_discount(size_modifier);
    let st = resolve_st(&st_attr, sm_discount);
    let dx = resolve_dx(&dx_attr);
    let iq = resolve_iq(&iq_attr);
    let ht = resolve_ht(&ht_attr);
    let will = resolve_iq_based(iq, &will_attr);
    let per = resolve_iq_based(iq, &per_attr);
    let lifting_st = resolve_lifting_st(st, &lifting_attr, sm_discount);
    let striking_st = resolve_striking_st(st, &striking_attr, sm_discount);
    let speed = resolve_speed(dx, ht, &speed_attr);
    let damage = striking_damage(i64::from(striking_st));

    let resolved = ResolvedAttributes {
        st,
        dx,
        iq,
        ht,
        per,
        will,
        fright_check: resolve_fright_check(will, &fright_attr),
        hp: resolve_hp(st, &hp_attr, sm_discount),
        fp: resolve_fp(ht, &fp_attr),
        lifting_st,
        striking_st,
        basic_lift: basic_lift(lifting_st),
        speed,
        move_: resolve_move(speed, &move_attr),
        dodge: resolve_dodge(speed, &dodge_attr, conditions),
        thrust: damage.thrust,
        swing: damage.swing,
        sm_discount,
    };
    tracing::debug!(st, dx, iq, ht, speed, dodge = resolved.dodge, "attributes resolved");

    Ok(Outcome {
        value: resolved,
        issues,
        unresolved: Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::ValidationMode;
    use proptest::prelude::*;

    #[test]
    fn unbought_st_is_ten() {
        assert_eq!(resolve_st(&Attribute::new(0.0, 0.0), 1.0), 10);
    }

    #[test]
    fn st_uses_size_discount() {
        // 20 points at SM 0 buys 2 levels; at SM +3 the level costs 7
        assert_eq!(resolve_st(&Attribute::points(20.0), calc_sm_discount(0.0)), 12);
        assert_eq!(resolve_st(&Attribute::points(21.0), calc_sm_discount(3.0)), 13);
    }

    #[test]
    fn ht_ignores_size_discount() {
        assert_eq!(resolve_ht(&Attribute::points(20.0)), 12);
    }

    #[test]
    fn dx_and_iq_cost_twenty() {
        assert_eq!(resolve_dx(&Attribute::new(1.0, 40.0)), 13);
        assert_eq!(resolve_iq(&Attribute::points(19.0)), 10);
        assert_eq!(resolve_iq(&Attribute::points(-20.0)), 9);
    }

    #[test]
    fn secondary_attributes() {
        assert_eq!(resolve_iq_based(12, &Attribute::points(10.0)), 14);
        assert_eq!(resolve_fright_check(11, &Attribute::new(2.0, 2.0)), 14);
        assert_eq!(resolve_lifting_st(10, &Attribute::points(9.0), 1.0), 13);
        assert_eq!(resolve_striking_st(10, &Attribute::points(10.0), 1.0), 12);
        assert_eq!(resolve_hp(10, &Attribute::points(4.0), 1.0), 12);
        assert_eq!(resolve_fp(12, &Attribute::points(6.0)), 14);
    }

    #[test]
    fn speed_has_quarter_resolution() {
        assert_eq!(resolve_speed(10, 10, &Attribute::default()), 5.0);
        assert_eq!(resolve_speed(11, 10, &Attribute::default()), 5.25);
        assert_eq!(resolve_speed(10, 10, &Attribute::points(5.0)), 5.25);
        assert_eq!(resolve_speed(10, 10, &Attribute::points(4.0)), 5.0);
        assert_eq!(resolve_move(5.75, &Attribute::points(5.0)), 6);
    }

    #[test]
    fn basic_lift_rounds_above_ten() {
        assert_eq!(basic_lift(10), 20.0);
        assert_eq!(basic_lift(13), 34.0);
        assert_eq!(basic_lift(5), 5.0);
        assert_eq!(basic_lift(3), 1.8);
    }

    #[test]
    fn dodge_modifiers() {
        let base = Attribute::default();
        let calm = DodgeConditions::default();
        assert_eq!(resolve_dodge(5.0, &base, &calm), 8);

        let trained = DodgeConditions {
            combat_reflexes: true,
            enhanced_dodge: 1,
            encumbrance_level: 2,
            ..calm
        };
        assert_eq!(resolve_dodge(5.0, &base, &trained), 8);

        let reeling = DodgeConditions {
            hp_state: HitPointState::Reeling,
            ..calm
        };
        assert_eq!(resolve_dodge(5.0, &base, &reeling), 4);

        let spent = DodgeConditions {
            hp_state: HitPointState::Reeling,
            fp_state: FatiguePointState::Collapse,
            ..calm
        };
        assert_eq!(resolve_dodge(5.0, &base, &spent), 2);
    }

    #[test]
    fn injured_and_tired_do_not_halve() {
        let conditions = DodgeConditions {
            hp_state: HitPointState::Injured,
            fp_state: FatiguePointState::Tired,
            ..DodgeConditions::default()
        };
        assert_eq!(resolve_dodge(6.0, &Attribute::default(), &conditions), 9);
    }

    #[test]
    fn dodge_floor_for_weak_dying_character() {
        let sheet = AttributeSheet {
            st: Attribute::points(-90.0),
            dx: Attribute::points(-180.0),
            ht: Attribute::points(-90.0),
            ..AttributeSheet::default()
        };
        let conditions = DodgeConditions {
            encumbrance_level: 4,
            hp_state: HitPointState::Check4,
            fp_state: FatiguePointState::Unconscious,
            ..DodgeConditions::default()
        };
        let outcome = resolve_attributes(&sheet, &conditions, &RulesSettings::default()).unwrap();
        assert_eq!(outcome.value.st, 1);
        assert_eq!(outcome.value.dodge, 1);
    }

    #[test]
    fn extreme_inputs_saturate() {
        let conditions = DodgeConditions {
            enhanced_dodge: i32::MAX,
            encumbrance_level: i32::MIN,
            ..DodgeConditions::default()
        };
        assert_eq!(resolve_dodge(5.0, &Attribute::default(), &conditions), 8);
        assert_eq!(resolve_speed(i32::MAX, i32::MAX, &Attribute::default()), 1_073_741_823.5);
        assert!(basic_lift(i32::MAX).is_finite());

        let sheet = AttributeSheet {
            st: Attribute::points(1e12),
            dx: Attribute::points(1e12),
            ht: Attribute::points(1e12),
            ..AttributeSheet::default()
        };
        let outcome =
            resolve_attributes(&sheet, &DodgeConditions::default(), &RulesSettings::default())
                .unwrap();
        assert_eq!(outcome.value.st, i32::MAX);
        assert!(outcome.value.dodge >= 1);
    }

    #[test]
    fn resolves_full_sheet() {
        let sheet = AttributeSheet {
            st: Attribute::points(20.0),
            dx: Attribute::points(40.0),
            iq: Attribute::points(20.0),
            ht: Attribute::points(10.0),
            ..AttributeSheet::default()
        };
        let outcome =
            resolve_attributes(&sheet, &DodgeConditions::default(), &RulesSettings::default())
                .unwrap();
        let r = outcome.value;
        assert!(outcome.issues.is_empty());
        assert_eq!((r.st, r.dx, r.iq, r.ht), (12, 12, 11, 11));
        assert_eq!((r.per, r.will), (11, 11));
        assert_eq!(r.hp, 12);
        assert_eq!(r.speed, 5.75);
        assert_eq!(r.move_, 5);
        assert_eq!(r.dodge, 8);
        assert_eq!(r.thrust.to_string(), "1d6-1");
        assert_eq!(r.swing.to_string(), "1d6+2");
        assert_eq!(r.value(AttributeKind::Dx), 12);
    }

    #[test]
    fn non_numeric_inputs_coerce_or_fail() {
        let sheet = AttributeSheet {
            st: Attribute::new(f64::NAN, 10.0),
            ..AttributeSheet::default()
        };
        let lenient =
            resolve_attributes(&sheet, &DodgeConditions::default(), &RulesSettings::default())
                .unwrap();
        assert_eq!(lenient.value.st, 11);
        assert_eq!(lenient.issues.len(), 1);
        assert_eq!(lenient.issues[0].field_id, "st.mod");

        let strict = RulesSettings {
            validation_mode: ValidationMode::Strict,
            ..RulesSettings::default()
        };
        assert!(matches!(
            resolve_attributes(&sheet, &DodgeConditions::default(), &strict),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn sheet_deserializes_with_missing_fields() {
        let sheet: AttributeSheet =
            serde_json::from_str(r#"{"st": {"mod": 0, "points": 10}, "move": {"points": 5}}"#)
                .unwrap();
        assert_eq!(sheet.st.points, 10.0);
        assert_eq!(sheet.move_.points, 5.0);
        assert_eq!(sheet.size_modifier, 0.0);
    }

    proptest! {
        #[test]
        fn sm_discount_is_clamped(sm in -20.0f64..=20.0) {
            let d = calc_sm_discount(sm);
            prop_assert!((0.2..=1.0).contains(&d));
        }

        #[test]
        fn dodge_is_at_least_one(
            speed in 0.0f64..20.0,
            points in -200.0f64..200.0,
            enc in 0i32..=4,
            hp in 0usize..9,
            fp in 0usize..4,
        ) {
            let hp_states = [
                HitPointState::Healthy, HitPointState::Injured, HitPointState::Reeling,
                HitPointState::Collapse, HitPointState::Check1, HitPointState::Check2,
                HitPointState::Check3, HitPointState::Check4, HitPointState::Dead,
            ];
            let fp_states = [
                FatiguePointState::Fresh, FatiguePointState::Tired,
                FatiguePointState::Collapse, FatiguePointState::Unconscious,
            ];
            let conditions = DodgeConditions {
                encumbrance_level: enc,
                hp_state: hp_states[hp],
                fp_state: fp_states[fp],
                ..DodgeConditions::default()
            };
            prop_assert!(resolve_dodge(speed, &Attribute::points(points), &conditions) >= 1);
        }
    }
}
