//! Skill, technique and spell level resolution.
//!
//! A skill's level comes from one of two places:
//! - points invested, run through the point-buy curve for its difficulty, or
//! - the best of its defaults (attributes or other skills) when nothing is invested.
//!
//! When the best default already beats what a single point buys, the default is
//! converted into bonus points before the curve is applied ("improving skills from
//! default").
//!
//! Skills that default to each other are governed by [`CyclePolicy`].

use std::collections::HashMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::attributes::{resolve_attributes, AttributeSheet, DodgeConditions, ResolvedAttributes};
use crate::entities::{Difficulty, SkillDefinition, SpellDefinition};
use crate::error::DomainError;
use crate::validation::{Outcome, ResolutionIssue, Sanitizer, ValidationError};
use crate::value_objects::{AttributeKind, CyclePolicy, RulesSettings};

/// Level bonus bought by `points` on the standard curve, minus the difficulty offset.
///
/// 1 point buys +0, 2-3 points +1, then +1 per 4 points. Wildcard points count a third.
pub fn points_to_bonus(points: f64, difficulty: Difficulty) -> i32 {
    let points = points / difficulty.cost_factor();
    let raw = if points < 2.0 {
        0
    } else if points < 4.0 {
        1
    } else {
        1i32.saturating_add((points / 4.0).floor() as i32)
    };
    raw.saturating_sub(difficulty.curve_offset())
}

/// The level one invested point would give on top of `base_value`.
pub fn one_point_in_skill(base_value: i32, difficulty: Difficulty) -> i32 {
    base_value.saturating_sub(difficulty.one_point_offset())
}

/// Same as [`one_point_in_skill`] for hosts that still pass raw codes.
///
/// Returns `-1` for an unrecognized code instead of guessing a difficulty.
pub fn one_point_in_skill_code(base_value: i32, code: &str) -> i32 {
    match Difficulty::from_str(code) {
        Ok(difficulty) => one_point_in_skill(base_value, difficulty),
        Err(_) => -1,
    }
}

/// Character points a default at `relative_level` (default level minus base) is worth.
pub fn default_is_worth(difficulty: Difficulty, relative_level: i32) -> f64 {
    let steps = relative_level.saturating_add(difficulty.curve_offset());
    let points = match steps {
        s if s < 0 => 0.0,
        0 => 1.0,
        1 => 2.0,
        2 => 4.0,
        s => 4.0 * f64::from(s - 1),
    };
    points * difficulty.cost_factor()
}

/// Best candidates among a skill's defaults. Both start at 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DefaultCandidates {
    pub best_skill: i32,
    pub best_attribute: i32,
    /// Whether any attribute default was present
    pub has_attribute_default: bool,
}

impl DefaultCandidates {
    pub fn best(&self) -> i32 {
        self.best_skill.max(self.best_attribute)
    }
}

/// Resolved level of one skill, technique or spell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillResolution {
    pub name: String,
    pub level: i32,
    /// Level relative to the base value, displayed as e.g. "DX+1"
    pub relative_level: i32,
    /// Attribute (or parent skill) value the level is measured against
    pub base_value: i32,
    /// Whether the level came from a default rather than invested points
    pub from_default: bool,
}

/// Resolves skills against resolved attributes and the character's skill list.
///
/// Other skills' levels are read from `known_levels`. In single-pass mode these
/// start as the levels the host stored in the snapshot and are overwritten as
/// skills are resolved in order; in reject mode they are filled in dependency
/// order so every read is fresh.
pub struct SkillLevelResolver<'a> {
    attributes: &'a ResolvedAttributes,
    snapshot: &'a [SkillDefinition],
    settings: &'a RulesSettings,
    known_levels: HashMap<String, i32>,
}

fn level_key(name: &str) -> String {
    name.trim().to_ascii_lowercase()
}

impl<'a> SkillLevelResolver<'a> {
    /// Resolver seeded with the levels stored in the snapshot.
    pub fn new(
        attributes: &'a ResolvedAttributes,
        snapshot: &'a [SkillDefinition],
        settings: &'a RulesSettings,
    ) -> Self {
        let known_levels = snapshot
            .iter()
            .filter_map(|s| s.level.map(|level| (level_key(&s.name), level)))
            .collect();
        Self {
            attributes,
            snapshot,
            settings,
            known_levels,
        }
    }

    /// Resolver that knows no skill levels until they are recorded.
    pub fn fresh(
        attributes: &'a ResolvedAttributes,
        snapshot: &'a [SkillDefinition],
        settings: &'a RulesSettings,
    ) -> Self {
        Self {
            attributes,
            snapshot,
            settings,
            known_levels: HashMap::new(),
        }
    }

    pub fn record_level(&mut self, name: &str, level: i32) {
        self.known_levels.insert(level_key(name), level);
    }

    pub fn known_level(&self, name: &str) -> Option<i32> {
        self.known_levels.get(&level_key(name)).copied()
    }

    fn find_skill(&self, name: &str) -> Option<&'a SkillDefinition> {
        self.snapshot.iter().find(|s| s.name_matches(name))
    }

    /// Partition and score a skill's defaults.
    ///
    /// A default naming a skill absent from the snapshot contributes nothing and is
    /// reported in `unresolved`. Techniques and skills without points are skipped.
    pub fn collect_defaults(
        &self,
        skill: &SkillDefinition,
        unresolved: &mut Vec<ResolutionIssue>,
    ) -> DefaultCandidates {
        let mut candidates = DefaultCandidates::default();
        for entry in &skill.defaults {
            if let Some(kind) = entry.attribute() {
                let value = self.attributes.value(kind).saturating_add(entry.modifier);
                candidates.best_attribute = candidates.best_attribute.max(value);
                candidates.has_attribute_default = true;
                continue;
            }
            match self.find_skill(&entry.skill) {
                None => {
                    tracing::warn!(skill = %skill.name, missing = %entry.skill, "default names unknown skill");
                    unresolved.push(ResolutionIssue {
                        kind: "skill".to_string(),
                        name: entry.skill.clone(),
                        referenced_by: skill.name.clone(),
                    });
                }
                Some(source) if source.is_default_source() => {
                    if let Some(level) = self.known_level(&source.name) {
                        candidates.best_skill = candidates.best_skill.max(level.saturating_add(entry.modifier));
                    }
                }
                Some(_) => {}
            }
        }
        candidates
    }

    /// Resolve a skill (not a technique).
    pub fn resolve_skill(
        &self,
        skill: &SkillDefinition,
    ) -> Result<Outcome<SkillResolution>, DomainError> {
        let mut s = Sanitizer::new();
        let points = s.number(&format!("{}.points", skill.name), skill.points);
        let issues = s.finish(self.settings.validation_mode)?;

        let base_kind = AttributeKind::from_str(&skill.base_attr)?;
        let base_value = self.attributes.value(base_kind);
        let difficulty = skill.difficulty;
        let one_point = one_point_in_skill(base_value, difficulty);

        let mut unresolved = Vec::new();
        let defaults = self.collect_defaults(skill, &mut unresolved);

        let below_minimum = difficulty == Difficulty::Wildcard && points < 3.0;
        let (level, from_default) = if points <= 0.0 || below_minimum {
            let boosted = self.dabbler_boost(skill, &defaults, one_point);
            let level = defaults.best_skill.max(boosted).max(0).saturating_add(skill.modifier);
            (level, true)
        } else {
            let best = defaults.best();
            let mut effective = points;
            if best >= one_point {
                effective += default_is_worth(difficulty, best.saturating_sub(base_value));
            }
            let level = base_value
                .saturating_add(points_to_bonus(effective, difficulty))
                .saturating_add(skill.modifier);
            (level, false)
        };

        tracing::debug!(skill = %skill.name, level, from_default, "skill resolved");
        Ok(Outcome {
            value: SkillResolution {
                name: skill.name.clone(),
                level,
                relative_level: level.saturating_sub(base_value),
                base_value,
                from_default,
            },
            issues,
            unresolved,
        })
    }

    /// Attribute default plus dabbler bonus, kept below one point of real training.
    fn dabbler_boost(
        &self,
        skill: &SkillDefinition,
        defaults: &DefaultCandidates,
        one_point: i32,
    ) -> i32 {
        if !defaults.has_attribute_default {
            return 0;
        }
        let dabbler = skill.dabbler_points.unwrap_or(0).max(0);
        if dabbler == 0 {
            return defaults.best_attribute;
        }
        let boosted = defaults
            .best_attribute
            .saturating_add(dabbler.min(self.settings.dabbler_cap));
        boosted.min(one_point.saturating_sub(1).max(defaults.best_attribute))
    }

    /// Base value of a technique: its parent skill's level, or an attribute.
    fn technique_base(
        &self,
        technique: &SkillDefinition,
        unresolved: &mut Vec<ResolutionIssue>,
    ) -> i32 {
        if let Some(kind) = AttributeKind::from_mnemonic(&technique.base_attr) {
            return self.attributes.value(kind);
        }
        match self.known_level(&technique.base_attr) {
            Some(level) => level,
            None => {
                tracing::warn!(technique = %technique.name, parent = %technique.base_attr, "technique parent not resolved");
                unresolved.push(ResolutionIssue {
                    kind: "skill".to_string(),
                    name: technique.base_attr.clone(),
                    referenced_by: technique.name.clone(),
                });
                0
            }
        }
    }

    /// Resolve a technique against its parent.
    ///
    /// Average techniques buy one level per point; Hard ones pay 2 for the first
    /// level and 1 for each after. The result never passes `base + maxLevel`.
    pub fn resolve_technique(
        &self,
        technique: &SkillDefinition,
    ) -> Result<Outcome<SkillResolution>, DomainError> {
        let mut s = Sanitizer::new();
        let points = s.non_negative(&format!("{}.points", technique.name), technique.points);
        let issues = s.finish(self.settings.validation_mode)?;

        let purchased = match technique.difficulty {
            Difficulty::Average => points.floor() as i32,
            Difficulty::Hard if points < 2.0 => 0,
            Difficulty::Hard => (points.floor() as i32).saturating_sub(1),
            other => {
                return Err(DomainError::unrecognized(
                    "technique difficulty",
                    other.code(),
                ))
            }
        };

        let mut unresolved = Vec::new();
        let base = self.technique_base(technique, &mut unresolved);
        let min_level = technique.min_level.unwrap_or(0);
        let max_level = technique
            .max_level
            .unwrap_or(min_level.saturating_add(purchased));
        let level = base
            .saturating_add(min_level)
            .saturating_add(purchased)
            .min(base.saturating_add(max_level))
            .saturating_add(technique.modifier);

        tracing::debug!(technique = %technique.name, level, "technique resolved");
        Ok(Outcome {
            value: SkillResolution {
                name: technique.name.clone(),
                level,
                relative_level: level.saturating_sub(base),
                base_value: base,
                from_default: points <= 0.0,
            },
            issues,
            unresolved,
        })
    }

    /// Resolve a spell from magical ability (`attribute + college mod + magery`).
    pub fn resolve_spell(
        &self,
        spell: &SpellDefinition,
        magery: i32,
    ) -> Result<Outcome<SkillResolution>, DomainError> {
        let mut s = Sanitizer::new();
        let points = s.number(&format!("{}.points", spell.name), spell.points);
        let issues = s.finish(self.settings.validation_mode)?;

        let magical_ability = self
            .attributes
            .value(spell.base_attr)
            .saturating_add(spell.attribute_mod)
            .saturating_add(magery);
        let (level, from_default) = if points < 1.0 {
            (spell.modifier, true)
        } else {
            (
                magical_ability
                    .saturating_add(points_to_bonus(points, spell.difficulty))
                    .saturating_add(spell.modifier),
                false,
            )
        };

        tracing::debug!(spell = %spell.name, level, "spell resolved");
        Ok(Outcome {
            value: SkillResolution {
                name: spell.name.clone(),
                level,
                relative_level: level.saturating_sub(magical_ability),
                base_value: magical_ability,
                from_default,
            },
            issues,
            unresolved: Vec::new(),
        })
    }
}

/// Order in which skills must be resolved so every default reads a fresh level.
///
/// Fails with [`DomainError::CircularDefault`] on the first cycle found.
pub fn dependency_order(skills: &[SkillDefinition]) -> Result<Vec<usize>, DomainError> {
    #[derive(Clone, Copy, PartialEq)]
    enum Mark {
        Unvisited,
        Visiting,
        Done,
    }

    let index: HashMap<String, usize> = skills
        .iter()
        .enumerate()
        .filter(|(_, s)| !s.is_technique())
        .map(|(i, s)| (level_key(&s.name), i))
        .collect();

    let edges: Vec<Vec<usize>> = skills
        .iter()
        .map(|s| {
            if s.is_technique() {
                return Vec::new();
            }
            s.defaults
                .iter()
                .filter(|d| d.attribute().is_none())
                .filter_map(|d| index.get(&level_key(&d.skill)).copied())
                .filter(|&i| skills[i].is_default_source())
                .collect()
        })
        .collect();

    fn visit(
        node: usize,
        skills: &[SkillDefinition],
        edges: &[Vec<usize>],
        marks: &mut [Mark],
        path: &mut Vec<usize>,
        order: &mut Vec<usize>,
    ) -> Result<(), DomainError> {
        match marks[node] {
            Mark::Done => return Ok(()),
            Mark::Visiting => {
                let start = path.iter().position(|&n| n == node).unwrap_or(0);
                let mut chain: Vec<String> =
                    path[start..].iter().map(|&n| skills[n].name.clone()).collect();
                chain.push(skills[node].name.clone());
                return Err(DomainError::CircularDefault { chain });
            }
            Mark::Unvisited => {}
        }
        marks[node] = Mark::Visiting;
        path.push(node);
        for &next in &edges[node] {
            visit(next, skills, edges, marks, path, order)?;
        }
        path.pop();
        marks[node] = Mark::Done;
        order.push(node);
        Ok(())
    }

    let mut marks = vec![Mark::Unvisited; skills.len()];
    let mut order = Vec::with_capacity(skills.len());
    let mut path = Vec::new();
    for node in 0..skills.len() {
        if !skills[node].is_technique() {
            visit(node, skills, &edges, &mut marks, &mut path, &mut order)?;
        }
    }
    Ok(order)
}

/// Everything needed to resolve one character.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CharacterSnapshot {
    pub attributes: AttributeSheet,
    pub conditions: DodgeConditions,
    /// Skills and techniques, in the host's order
    pub skills: Vec<SkillDefinition>,
    pub spells: Vec<SpellDefinition>,
    pub magery: i32,
    /// Overrides the settings' default policy when present
    pub cycle_policy: Option<CyclePolicy>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedCharacter {
    pub attributes: ResolvedAttributes,
    pub skills: Vec<SkillResolution>,
    pub techniques: Vec<SkillResolution>,
    pub spells: Vec<SkillResolution>,
}

fn absorb(
    outcome: Outcome<SkillResolution>,
    issues: &mut Vec<ValidationError>,
    unresolved: &mut Vec<ResolutionIssue>,
) -> SkillResolution {
    issues.extend(outcome.issues);
    unresolved.extend(outcome.unresolved);
    outcome.value
}

/// Resolve attributes, then skills, then techniques, then spells.
pub fn resolve_skill_list(
    snapshot: &CharacterSnapshot,
    settings: &RulesSettings,
) -> Result<Outcome<ResolvedCharacter>, DomainError> {
    let attributes = resolve_attributes(&snapshot.attributes, &snapshot.conditions, settings)?;
    let mut issues = attributes.issues;
    let mut unresolved = attributes.unresolved;
    let attributes = attributes.value;

    let policy = snapshot.cycle_policy.unwrap_or(settings.default_cycle_policy);
    let all = snapshot.skills.as_slice();
    let skill_indices: Vec<usize> = match policy {
        CyclePolicy::SinglePass => (0..all.len()).filter(|&i| !all[i].is_technique()).collect(),
        CyclePolicy::Reject => dependency_order(all)?,
    };
    let mut resolver = match policy {
        CyclePolicy::SinglePass => SkillLevelResolver::new(&attributes, all, settings),
        CyclePolicy::Reject => SkillLevelResolver::fresh(&attributes, all, settings),
    };

    let mut by_index: Vec<Option<SkillResolution>> = vec![None; all.len()];
    for i in skill_indices {
        let resolved = absorb(resolver.resolve_skill(&all[i])?, &mut issues, &mut unresolved);
        resolver.record_level(&resolved.name, resolved.level);
        by_index[i] = Some(resolved);
    }
    let skills: Vec<SkillResolution> = by_index.into_iter().flatten().collect();

    let mut techniques = Vec::new();
    for technique in all.iter().filter(|s| s.is_technique()) {
        techniques.push(absorb(
            resolver.resolve_technique(technique)?,
            &mut issues,
            &mut unresolved,
        ));
    }

    let mut spells = Vec::with_capacity(snapshot.spells.len());
    for spell in &snapshot.spells {
        spells.push(absorb(
            resolver.resolve_spell(spell, snapshot.magery)?,
            &mut issues,
            &mut unresolved,
        ));
    }

    tracing::debug!(
        skills = skills.len(),
        techniques = techniques.len(),
        spells = spells.len(),
        ?policy,
        "character resolved"
    );
    Ok(Outcome {
        value: ResolvedCharacter {
            attributes,
            skills,
            techniques,
            spells,
        },
        issues,
        unresolved,
    })
}
