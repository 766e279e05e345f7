//! Skill resolution: costs, cooldowns and ordered effect application.
//!
//! A [`SkillResolver`] belongs to one combatant for one battle. It owns that
//! combatant's cooldown counters and the one-shot Focus bonus.

use std::collections::HashMap;

use rand::Rng;
use thiserror::Error;

use super::buffs::BuffLedger;
use super::types::{Side, Stat};
use crate::character::Combatant;
use crate::core::balance::{
    percent_of, BASIC_ATTACK_MULTIPLIER, FOCUS_MP_RESTORE_PERCENT, MP_REGEN_PERCENT,
};
use crate::core::combat_math::{apply_damage_modifier, resolve_attack, scaled_attack, AttackRoll};
use crate::data::skills::{SkillDefinition, SkillEffect, SpecialEffect, TargetScope};

/// Why a skill could not be used. Nothing is mutated when this is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkillFailure {
    #[error("Not enough MP for {skill}: need {required}, have {available}")]
    InsufficientMp {
        skill: String,
        required: u32,
        available: u32,
    },

    #[error("{skill} is on cooldown for {remaining} more turn(s)")]
    OnCooldown { skill: String, remaining: u32 },

    #[error("Unknown skill '{0}'")]
    UnknownSkill(String),
}

/// Everything a skill may touch while it resolves.
pub struct SkillContext<'a> {
    pub actor: &'a mut Combatant,
    pub actor_side: Side,
    pub target: &'a mut Combatant,
    pub ledger: &'a mut BuffLedger,
    /// Multiplier on the actor's outgoing damage (1.0 = none).
    pub outgoing_modifier: f64,
    /// Multiplier on damage the target takes (1.0 = none).
    pub incoming_modifier: f64,
}

impl SkillContext<'_> {
    /// Side that receives debuffs, DOTs and statuses for `scope`.
    fn affected_side(&self, scope: TargetScope) -> Side {
        match scope {
            TargetScope::Enemy => self.actor_side.opponent(),
            TargetScope::SelfTarget => self.actor_side,
        }
    }

    fn name_of(&self, side: Side) -> &str {
        if side == self.actor_side {
            &self.actor.name
        } else {
            &self.target.name
        }
    }
}

/// What happened when a skill or attack resolved.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SkillOutcome {
    pub skill_id: String,
    pub mp_spent: u32,
    /// HP removed from the target.
    pub damage: u32,
    /// HP restored to the actor.
    pub healed: u32,
    pub evaded: bool,
    pub crit: bool,
    /// Change to the caster's tech debt, applied by the caller.
    pub tech_debt_delta: i32,
    pub lines: Vec<String>,
}

impl SkillOutcome {
    fn new(skill_id: &str) -> Self {
        Self {
            skill_id: skill_id.to_string(),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SkillResolver {
    cooldowns: HashMap<String, u32>,
    focus_armed: bool,
}

impl SkillResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cooldown_remaining(&self, skill_id: &str) -> u32 {
        self.cooldowns.get(skill_id).copied().unwrap_or(0)
    }

    pub fn focus_armed(&self) -> bool {
        self.focus_armed
    }

    /// Check whether `actor` could use `skill` right now.
    pub fn check(&self, skill: &SkillDefinition, actor: &Combatant) -> Result<(), SkillFailure> {
        let remaining = self.cooldown_remaining(&skill.id);
        if remaining > 0 {
            return Err(SkillFailure::OnCooldown {
                skill: skill.name.clone(),
                remaining,
            });
        }
        if actor.mp < skill.mp_cost {
            return Err(SkillFailure::InsufficientMp {
                skill: skill.name.clone(),
                required: skill.mp_cost,
                available: actor.mp,
            });
        }
        Ok(())
    }

    pub fn can_use(&self, skill: &SkillDefinition, actor: &Combatant) -> bool {
        self.check(skill, actor).is_ok()
    }

    /// Spend MP, start the cooldown and apply every effect in order.
    pub fn use_skill(
        &mut self,
        skill: &SkillDefinition,
        ctx: &mut SkillContext<'_>,
        rng: &mut impl Rng,
    ) -> Result<SkillOutcome, SkillFailure> {
        self.check(skill, ctx.actor)?;

        ctx.actor.spend_mp(skill.mp_cost);
        if skill.cooldown > 0 {
            self.cooldowns.insert(skill.id.clone(), skill.cooldown);
        }

        let mut outcome = SkillOutcome::new(&skill.id);
        outcome.mp_spent = skill.mp_cost;
        outcome
            .lines
            .push(format!("{} uses {}!", ctx.actor.name, skill.name));

        let affected = ctx.affected_side(skill.target);
        for effect in &skill.effects {
            self.apply_effect(effect, affected, ctx, &mut outcome, rng);
        }
        Ok(outcome)
    }

    /// A plain attack through the same damage path as skills.
    pub fn basic_attack(&mut self, ctx: &mut SkillContext<'_>, rng: &mut impl Rng) -> SkillOutcome {
        let mut outcome = SkillOutcome::new("attack");
        outcome.lines.push(format!("{} attacks!", ctx.actor.name));
        self.strike(BASIC_ATTACK_MULTIPLIER, ctx, &mut outcome, rng);
        outcome
    }

    /// Trade the turn for MP and a one-shot damage bonus. Returns MP restored.
    pub fn use_focus(&mut self, actor: &mut Combatant) -> u32 {
        self.focus_armed = true;
        actor.restore_mp(percent_of(actor.max_mp, FOCUS_MP_RESTORE_PERCENT))
    }

    /// Per-turn MP regeneration. Returns MP restored.
    pub fn regenerate_mp(&self, actor: &mut Combatant, extra_percent: f64) -> u32 {
        actor.restore_mp(percent_of(actor.max_mp, MP_REGEN_PERCENT + extra_percent))
    }

    /// Count every cooldown down by one turn.
    pub fn tick_cooldowns(&mut self) {
        for remaining in self.cooldowns.values_mut() {
            *remaining = remaining.saturating_sub(1);
        }
        self.cooldowns.retain(|_, remaining| *remaining > 0);
    }

    pub fn reset(&mut self) {
        self.cooldowns.clear();
        self.focus_armed = false;
    }

    fn apply_effect(
        &mut self,
        effect: &SkillEffect,
        target_side: Side,
        ctx: &mut SkillContext<'_>,
        outcome: &mut SkillOutcome,
        rng: &mut impl Rng,
    ) {
        match effect {
            SkillEffect::Damage { multiplier } => {
                self.strike(*multiplier, ctx, outcome, rng);
            }
            SkillEffect::Heal { percent } => {
                let healed = ctx.actor.heal(percent_of(ctx.actor.max_hp, *percent));
                outcome.healed += healed;
                outcome
                    .lines
                    .push(format!("{} recovers {} HP", ctx.actor.name, healed));
            }
            SkillEffect::Buff {
                stat,
                value,
                duration,
            } => {
                ctx.ledger
                    .apply_buff(*stat, *value, *duration, ctx.actor_side);
                outcome.lines.push(format!(
                    "{} {} {:+} for {} turns",
                    ctx.actor.name, stat, value, duration
                ));
            }
            SkillEffect::Debuff {
                stat,
                value,
                duration,
            } => {
                ctx.ledger.apply_buff(*stat, *value, *duration, target_side);
                outcome.lines.push(format!(
                    "{} {} {:+} for {} turns",
                    ctx.name_of(target_side),
                    stat,
                    value,
                    duration
                ));
            }
            SkillEffect::Dot { damage, duration } => {
                ctx.ledger.apply_dot(*damage, *duration, target_side);
                outcome.lines.push(format!(
                    "{} takes {} damage per turn for {} turns",
                    ctx.name_of(target_side),
                    damage,
                    duration
                ));
            }
            SkillEffect::Status { status, duration } => {
                ctx.ledger.apply_status(*status, *duration, target_side);
                let line = format!("{} is {}!", ctx.name_of(target_side), status.label());
                outcome.lines.push(line);
            }
            SkillEffect::Special {
                description,
                effect,
            } => {
                let special = effect
                    .clone()
                    .unwrap_or_else(|| SpecialEffect::from_description(description));
                self.apply_special(&special, description, ctx, outcome);
            }
            SkillEffect::Unknown => {
                tracing::warn!(skill = %outcome.skill_id, "ignoring unknown skill effect type");
            }
        }
    }

    fn apply_special(
        &mut self,
        special: &SpecialEffect,
        description: &str,
        ctx: &mut SkillContext<'_>,
        outcome: &mut SkillOutcome,
    ) {
        match special {
            SpecialEffect::ReduceTechDebt { amount } => {
                outcome.tech_debt_delta -= *amount as i32;
                outcome
                    .lines
                    .push(format!("Tech debt reduced by {}", amount));
            }
            SpecialEffect::RestoreMp { percent } => {
                let restored = ctx.actor.restore_mp(percent_of(ctx.actor.max_mp, *percent));
                outcome
                    .lines
                    .push(format!("{} restores {} MP", ctx.actor.name, restored));
            }
            SpecialEffect::Cleanse => {
                let removed = ctx.ledger.cleanse(ctx.actor_side);
                outcome.lines.push(format!(
                    "{} cleanses {} effect(s)",
                    ctx.actor.name, removed
                ));
            }
            SpecialEffect::Unrecognized => {
                tracing::warn!(
                    skill = %outcome.skill_id,
                    description,
                    "special effect not recognized; no effect"
                );
            }
        }
    }

    /// One damage instance: effective stats, focus, passives, then the roll.
    fn strike(
        &mut self,
        multiplier: f64,
        ctx: &mut SkillContext<'_>,
        outcome: &mut SkillOutcome,
        rng: &mut impl Rng,
    ) -> AttackRoll {
        let actor_side = ctx.actor_side;
        let target_side = actor_side.opponent();
        let ledger = &*ctx.ledger;

        let atk = ledger.effective_stat(ctx.actor.stats.atk, Stat::Atk, actor_side);
        let attacker_spd = ledger.effective_stat(ctx.actor.stats.spd, Stat::Spd, actor_side);
        let target_def = ledger.effective_stat(ctx.target.stats.def, Stat::Def, target_side);
        let target_spd = ledger.effective_stat(ctx.target.stats.spd, Stat::Spd, target_side);

        // The focus bonus is spent on the first damage effect, hit or miss
        let focused = std::mem::take(&mut self.focus_armed);
        let raw = apply_damage_modifier(
            scaled_attack(atk, multiplier, focused),
            ctx.outgoing_modifier,
        );

        let mut roll = resolve_attack(raw, attacker_spd, target_spd, target_def, rng);
        tracing::trace!(
            raw,
            damage = roll.damage,
            crit = roll.is_crit,
            evaded = roll.evaded,
            "attack roll"
        );

        if roll.evaded {
            outcome.evaded = true;
            outcome
                .lines
                .push(format!("{} evades the attack!", ctx.target.name));
            return roll;
        }

        roll.damage = apply_damage_modifier(roll.damage, ctx.incoming_modifier);
        let dealt = ctx.target.take_damage(roll.damage);
        outcome.damage += dealt;
        outcome.crit |= roll.is_crit;
        if roll.is_crit {
            outcome
                .lines
                .push(format!("Critical hit! {} takes {} damage", ctx.target.name, dealt));
        } else {
            outcome
                .lines
                .push(format!("{} takes {} damage", ctx.target.name, dealt));
        }
        roll
    }
}
