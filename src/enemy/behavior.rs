//! Conditional, weighted enemy action selection.
//!
//! A behavior tree here is a flat ordered list of `{condition, action, weight}`
//! rules. Every enemy turn the rules are evaluated from scratch; the only
//! state that carries over between turns is the owning monster's boss phase.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::combat::types::Stat;

/// Snapshot of the facts rule conditions can look at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BehaviorContext {
    pub hp_percent: f64,
    pub phase: u8,
    /// Battle round, starting at 1.
    pub turn: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Condition {
    Always,
    HpBelow { percent: f64 },
    HpAbove { percent: f64 },
    PhaseAtLeast { phase: u8 },
    PhaseIs { phase: u8 },
    TurnAtLeast { turn: u32 },
    EveryNthTurn { n: u32 },
    #[serde(other)]
    Unknown,
}

impl Condition {
    pub fn holds(&self, ctx: &BehaviorContext) -> bool {
        match *self {
            Condition::Always => true,
            Condition::HpBelow { percent } => ctx.hp_percent < percent,
            Condition::HpAbove { percent } => ctx.hp_percent > percent,
            Condition::PhaseAtLeast { phase } => ctx.phase >= phase,
            Condition::PhaseIs { phase } => ctx.phase == phase,
            Condition::TurnAtLeast { turn } => ctx.turn >= turn,
            Condition::EveryNthTurn { n } => n > 0 && ctx.turn % n == 0,
            Condition::Unknown => {
                tracing::warn!("unrecognized behavior condition never matches");
                false
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EnemyAction {
    Attack,
    Skill {
        id: String,
    },
    Buff {
        stat: Stat,
        value: i32,
        duration: i32,
    },
    Heal {
        percent: f64,
    },
}

impl EnemyAction {
    pub fn kind(&self) -> ActionKind {
        match self {
            EnemyAction::Attack => ActionKind::Attack,
            EnemyAction::Skill { .. } => ActionKind::Skill,
            EnemyAction::Buff { .. } => ActionKind::Buff,
            EnemyAction::Heal { .. } => ActionKind::Heal,
        }
    }

    pub fn skill(id: &str) -> Self {
        EnemyAction::Skill { id: id.to_string() }
    }
}

/// Coarse action category, used for phase-scoped weight adjustments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Attack,
    Skill,
    Buff,
    Heal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehaviorRule {
    pub condition: Condition,
    pub action: EnemyAction,
    pub weight: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BehaviorTree {
    pub rules: Vec<BehaviorRule>,
}

impl BehaviorTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rule(mut self, condition: Condition, action: EnemyAction, weight: u32) -> Self {
        self.rules.push(BehaviorRule {
            condition,
            action,
            weight,
        });
        self
    }

    /// Rules whose condition holds right now, in declaration order.
    pub fn matching_rules<'a>(
        &'a self,
        ctx: &'a BehaviorContext,
    ) -> impl Iterator<Item = &'a BehaviorRule> + 'a {
        self.rules.iter().filter(move |r| r.condition.holds(ctx))
    }

    /// Pick an action using the configured weights.
    pub fn select_action(&self, ctx: &BehaviorContext, rng: &mut impl Rng) -> EnemyAction {
        self.select_action_weighted(ctx, rng, |rule| rule.weight as f64)
    }

    /// Pick an action with caller-adjusted weights. Falls back to a basic
    /// attack when nothing matches or every weight is zero.
    pub fn select_action_weighted(
        &self,
        ctx: &BehaviorContext,
        rng: &mut impl Rng,
        weight_of: impl Fn(&BehaviorRule) -> f64,
    ) -> EnemyAction {
        let candidates: Vec<(&BehaviorRule, f64)> = self
            .matching_rules(ctx)
            .map(|rule| (rule, weight_of(rule).max(0.0)))
            .filter(|(_, w)| *w > 0.0)
            .collect();

        let total: f64 = candidates.iter().map(|(_, w)| w).sum();
        if total <= 0.0 {
            return EnemyAction::Attack;
        }

        let mut roll = rng.gen::<f64>() * total;
        for (rule, weight) in &candidates {
            if roll < *weight {
                return rule.action.clone();
            }
            roll -= weight;
        }
        // Float rounding can leave the roll just past the last bucket.
        candidates
            .last()
            .map(|(rule, _)| rule.action.clone())
            .unwrap_or(EnemyAction::Attack)
    }
}
