//! Timed stat modifiers, damage-over-time and status conditions per side.

use serde::{Deserialize, Serialize};

use super::types::{EffectTag, Side, Stat, StatusKind};
use crate::character::Combatant;

/// One timed modifier or DOT entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveEffect {
    pub tag: EffectTag,
    /// Positive = buff, negative = debuff. For DOT, damage per turn.
    pub value: i32,
    pub remaining_turns: i32,
    pub side: Side,
}

impl ActiveEffect {
    pub fn is_buff(&self) -> bool {
        matches!(self.tag, EffectTag::Stat(_)) && self.value > 0
    }

    pub fn is_debuff(&self) -> bool {
        matches!(self.tag, EffectTag::Stat(_)) && self.value < 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusCondition {
    pub kind: StatusKind,
    pub remaining_turns: i32,
    pub side: Side,
}

/// Ledger of every timed effect in one battle.
///
/// Effects keep insertion order so the UI can list them stably.
#[derive(Debug, Clone, Default)]
pub struct BuffLedger {
    effects: Vec<ActiveEffect>,
    statuses: Vec<StatusCondition>,
}

impl BuffLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a stat modifier. Non-positive durations are inert.
    pub fn apply_buff(&mut self, stat: Stat, value: i32, duration: i32, side: Side) {
        self.push_effect(EffectTag::Stat(stat), value, duration, side);
    }

    /// Register damage-over-time against `side`.
    pub fn apply_dot(&mut self, damage_per_turn: u32, duration: i32, side: Side) {
        self.push_effect(EffectTag::Dot, damage_per_turn as i32, duration, side);
    }

    fn push_effect(&mut self, tag: EffectTag, value: i32, duration: i32, side: Side) {
        if duration <= 0 {
            tracing::trace!(?tag, duration, "ignoring effect with no duration");
            return;
        }
        self.effects.push(ActiveEffect {
            tag,
            value,
            remaining_turns: duration,
            side,
        });
    }

    /// Base stat plus every live modifier for that stat and side, never below zero.
    pub fn effective_stat(&self, base: u32, stat: Stat, side: Side) -> u32 {
        let modifier: i64 = self
            .effects
            .iter()
            .filter(|e| e.side == side && e.tag == EffectTag::Stat(stat) && e.remaining_turns > 0)
            .map(|e| e.value as i64)
            .sum();
        (base as i64 + modifier).max(0) as u32
    }

    /// Decrement every effect and drop the expired ones. Call once per round.
    pub fn tick_buffs(&mut self) {
        for effect in &mut self.effects {
            effect.remaining_turns -= 1;
        }
        self.effects.retain(|e| e.remaining_turns > 0);
    }

    /// Total DOT damage currently registered against `side`.
    pub fn pending_dot_damage(&self, side: Side) -> u32 {
        self.effects
            .iter()
            .filter(|e| e.side == side && e.tag == EffectTag::Dot && e.remaining_turns > 0)
            .map(|e| e.value.unsigned_abs())
            .sum()
    }

    /// Apply every DOT registered against `side` to `target`.
    ///
    /// Returns the HP actually removed.
    pub fn apply_dot_effects(&self, target: &mut Combatant, side: Side) -> u32 {
        let total = self.pending_dot_damage(side);
        if total == 0 {
            return 0;
        }
        target.take_damage(total)
    }

    /// Drop every debuff and DOT on `side`. Returns how many were removed.
    pub fn cleanse(&mut self, side: Side) -> usize {
        let before = self.effects.len();
        self.effects
            .retain(|e| e.side != side || !(e.is_debuff() || e.tag == EffectTag::Dot));
        before - self.effects.len()
    }

    /// Apply a status condition. Re-application refreshes the duration to
    /// the longer of the two instead of stacking.
    pub fn apply_status(&mut self, kind: StatusKind, duration: i32, side: Side) {
        if duration <= 0 {
            return;
        }
        if let Some(existing) = self
            .statuses
            .iter_mut()
            .find(|s| s.kind == kind && s.side == side)
        {
            existing.remaining_turns = existing.remaining_turns.max(duration);
            return;
        }
        self.statuses.push(StatusCondition {
            kind,
            remaining_turns: duration,
            side,
        });
    }

    pub fn has_status(&self, kind: StatusKind, side: Side) -> bool {
        self.statuses
            .iter()
            .any(|s| s.kind == kind && s.side == side && s.remaining_turns > 0)
    }

    /// Decrement the statuses of one side and drop the expired ones.
    pub fn tick_status_effects(&mut self, side: Side) {
        for status in self.statuses.iter_mut().filter(|s| s.side == side) {
            status.remaining_turns -= 1;
        }
        self.statuses.retain(|s| s.remaining_turns > 0);
    }

    pub fn active_buffs(&self, side: Side) -> Vec<&ActiveEffect> {
        self.effects.iter().filter(|e| e.side == side).collect()
    }

    pub fn active_statuses(&self, side: Side) -> Vec<&StatusCondition> {
        self.statuses.iter().filter(|s| s.side == side).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty() && self.statuses.is_empty()
    }

    /// Forget everything. Called when a battle ends.
    pub fn clear(&mut self) {
        self.effects.clear();
        self.statuses.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::types::BaseStats;

    #[test]
    fn test_effective_stat_sums_and_clamps() {
        let mut ledger = BuffLedger::new();
        ledger.apply_buff(Stat::Atk, 5, 3, Side::Player);
        ledger.apply_buff(Stat::Atk, 3, 2, Side::Player);
        ledger.apply_buff(Stat::Atk, 100, 2, Side::Monster);
        assert_eq!(ledger.effective_stat(10, Stat::Atk, Side::Player), 18);
        assert_eq!(ledger.effective_stat(10, Stat::Def, Side::Player), 10);

        ledger.apply_buff(Stat::Def, -50, 2, Side::Player);
        assert_eq!(ledger.effective_stat(10, Stat::Def, Side::Player), 0);
    }

    #[test]
    fn test_buff_expires_after_duration_ticks() {
        let mut ledger = BuffLedger::new();
        ledger.apply_buff(Stat::Spd, 4, 3, Side::Player);
        ledger.tick_buffs();
        ledger.tick_buffs();
        assert_eq!(ledger.active_buffs(Side::Player).len(), 1);
        ledger.tick_buffs();
        assert!(ledger.active_buffs(Side::Player).is_empty());
    }

    #[test]
    fn test_zero_duration_is_inert() {
        let mut ledger = BuffLedger::new();
        ledger.apply_buff(Stat::Atk, 10, 0, Side::Player);
        ledger.apply_buff(Stat::Atk, 10, -2, Side::Player);
        ledger.apply_status(StatusKind::Stun, 0, Side::Monster);
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_dot_applies_to_side() {
        let mut ledger = BuffLedger::new();
        ledger.apply_dot(4, 2, Side::Monster);
        ledger.apply_dot(3, 1, Side::Monster);
        ledger.apply_dot(10, 1, Side::Player);

        let mut bug = Combatant::new("b", "Bug", 1, 50, 0, BaseStats::default());
        assert_eq!(ledger.apply_dot_effects(&mut bug, Side::Monster), 7);
        assert_eq!(bug.hp, 43);
        // DOT never touches stats
        assert_eq!(ledger.effective_stat(8, Stat::Atk, Side::Monster), 8);

        ledger.tick_buffs();
        assert_eq!(ledger.apply_dot_effects(&mut bug, Side::Monster), 4);
        ledger.tick_buffs();
        assert_eq!(ledger.apply_dot_effects(&mut bug, Side::Monster), 0);
    }

    #[test]
    fn test_status_refresh_not_stack() {
        let mut ledger = BuffLedger::new();
        ledger.apply_status(StatusKind::Stun, 2, Side::Monster);
        ledger.apply_status(StatusKind::Stun, 1, Side::Monster);
        assert_eq!(ledger.active_statuses(Side::Monster).len(), 1);
        assert_eq!(ledger.active_statuses(Side::Monster)[0].remaining_turns, 2);

        ledger.apply_status(StatusKind::Stun, 5, Side::Monster);
        assert_eq!(ledger.active_statuses(Side::Monster).len(), 1);
        assert_eq!(ledger.active_statuses(Side::Monster)[0].remaining_turns, 5);

        // Same kind on the other side is a separate entry
        ledger.apply_status(StatusKind::Stun, 1, Side::Player);
        assert_eq!(ledger.active_statuses(Side::Player).len(), 1);
    }

    #[test]
    fn test_tick_status_only_touches_one_side() {
        let mut ledger = BuffLedger::new();
        ledger.apply_status(StatusKind::Confusion, 1, Side::Player);
        ledger.apply_status(StatusKind::Stun, 1, Side::Monster);
        ledger.tick_status_effects(Side::Player);
        assert!(!ledger.has_status(StatusKind::Confusion, Side::Player));
        assert!(ledger.has_status(StatusKind::Stun, Side::Monster));
    }

    #[test]
    fn test_cleanse_keeps_buffs() {
        let mut ledger = BuffLedger::new();
        ledger.apply_buff(Stat::Atk, 5, 3, Side::Player);
        ledger.apply_buff(Stat::Def, -5, 3, Side::Player);
        ledger.apply_dot(3, 3, Side::Player);
        ledger.apply_buff(Stat::Def, -5, 3, Side::Monster);
        assert_eq!(ledger.cleanse(Side::Player), 2);
        assert_eq!(ledger.active_buffs(Side::Player).len(), 1);
        assert_eq!(ledger.active_buffs(Side::Monster).len(), 1);
    }
}
