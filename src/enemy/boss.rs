//! Boss phases: HP-threshold transitions, phase dialogue, phase-scoped AI
//! weighting and the visual intensity lookup used by rendering.

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::behavior::{ActionKind, BehaviorContext, BehaviorRule, BehaviorTree, EnemyAction};
use crate::core::balance::{BOSS_PHASE_THRESHOLDS, MAX_BOSS_PHASE};

/// Dialogue pool for one phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseDialogue {
    pub phase: u8,
    pub lines: Vec<String>,
}

/// Multiply the weight of one action kind once the boss reaches `min_phase`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseWeight {
    pub min_phase: u8,
    pub action: ActionKind,
    pub multiplier: f64,
}

/// Boss-only configuration layered on a monster definition.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BossProfile {
    #[serde(default)]
    pub dialogue: Vec<PhaseDialogue>,
    #[serde(default)]
    pub phase_weights: Vec<PhaseWeight>,
}

impl BossProfile {
    /// A random dialogue line from the phase's pool.
    pub fn get_boss_dialogue(&self, phase: u8, rng: &mut impl Rng) -> Option<&str> {
        self.dialogue
            .iter()
            .find(|d| d.phase == phase)
            .and_then(|d| d.lines.choose(rng))
            .map(String::as_str)
    }

    /// Combined weight multiplier for an action kind at a phase.
    pub fn weight_multiplier(&self, phase: u8, kind: ActionKind) -> f64 {
        self.phase_weights
            .iter()
            .filter(|w| phase >= w.min_phase && w.action == kind)
            .map(|w| w.multiplier)
            .product()
    }

    /// Select an action from `tree` with this profile's phase weighting applied.
    pub fn select_action(
        &self,
        tree: &BehaviorTree,
        ctx: &BehaviorContext,
        rng: &mut impl Rng,
    ) -> EnemyAction {
        tree.select_action_weighted(ctx, rng, |rule: &BehaviorRule| {
            rule.weight as f64 * self.weight_multiplier(ctx.phase, rule.action.kind())
        })
    }
}

/// Phase implied by current HP: 1 above 75%, then 2, 3, 4 at or below
/// 75%, 50% and 25%.
pub fn phase_for_hp(hp: u32, max_hp: u32) -> u8 {
    if max_hp == 0 {
        return MAX_BOSS_PHASE;
    }
    let percent = hp as f64 / max_hp as f64 * 100.0;
    1 + BOSS_PHASE_THRESHOLDS
        .iter()
        .filter(|&&threshold| percent <= threshold)
        .count() as u8
}

/// Reported once when a boss enters a deeper phase.
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseTransition {
    pub from: u8,
    pub to: u8,
    pub dialogue: Option<String>,
}

/// Tracks one boss's phase for the length of a battle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BossPhaseTracker {
    phase: u8,
}

impl Default for BossPhaseTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl BossPhaseTracker {
    pub fn new() -> Self {
        Self { phase: 1 }
    }

    pub fn phase(&self) -> u8 {
        self.phase
    }

    /// Call after every HP change. Returns a transition only when HP has
    /// crossed into a deeper phase than any reached before; the phase never
    /// goes back down, even if the boss heals.
    pub fn check_boss_phase(
        &mut self,
        hp: u32,
        max_hp: u32,
        profile: &BossProfile,
        rng: &mut impl Rng,
    ) -> Option<PhaseTransition> {
        let target = phase_for_hp(hp, max_hp);
        if target <= self.phase {
            return None;
        }

        let from = self.phase;
        self.phase = target;
        let dialogue = profile.get_boss_dialogue(target, rng).map(str::to_string);
        tracing::debug!(from, to = target, hp, max_hp, "boss phase transition");

        Some(PhaseTransition {
            from,
            to: target,
            dialogue,
        })
    }
}

/// Presentation parameters for a boss phase.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisualIntensity {
    /// Red tint alpha (0.0-1.0).
    pub tint: f32,
    /// Glitch overlay alpha (0.0-1.0).
    pub overlay: f32,
    /// Screen shake magnitude in pixels.
    pub shake: f32,
}

pub fn visual_intensity(phase: u8) -> VisualIntensity {
    match phase {
        0 | 1 => VisualIntensity {
            tint: 0.0,
            overlay: 0.0,
            shake: 0.0,
        },
        2 => VisualIntensity {
            tint: 0.1,
            overlay: 0.05,
            shake: 2.0,
        },
        3 => VisualIntensity {
            tint: 0.2,
            overlay: 0.1,
            shake: 4.0,
        },
        _ => VisualIntensity {
            tint: 0.35,
            overlay: 0.2,
            shake: 8.0,
        },
    }
}
