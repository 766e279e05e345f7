//! Shared combat math functions for the battle engine and simulator.
//!
//! These pure functions calculate combat outcomes without side effects.
//! Live battles and the balance simulator both go through them, so any
//! change here moves every balance number at once.

use crate::core::balance::*;
use rand::Rng;

/// Result of resolving one hit against a target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttackRoll {
    /// Damage dealt (after mitigation and crit). Zero when evaded.
    pub damage: u32,
    /// Whether this hit was a critical hit.
    pub is_crit: bool,
    /// Whether the target evaded the hit entirely.
    pub evaded: bool,
}

impl AttackRoll {
    pub fn miss() -> Self {
        Self {
            damage: 0,
            is_crit: false,
            evaded: true,
        }
    }
}

/// Damage after defense: `floor(base * 100 / (100 + defense * 0.7))`, minimum 1.
pub fn mitigated_damage(base: u32, defense: u32) -> u32 {
    let reduced = base as f64 * 100.0 / (100.0 + defense as f64 * DEFENSE_MITIGATION_FACTOR);
    (reduced.floor() as u32).max(MIN_DAMAGE)
}

/// Crit chance percent for an attacker with the given speed, in [0, 30].
pub fn crit_chance(spd: i32) -> f64 {
    (BASE_CRIT_CHANCE + CRIT_CHANCE_PER_SPD * spd as f64).clamp(0.0, MAX_CRIT_CHANCE)
}

/// Evasion chance percent for a target against an attacker, in [0, 50].
pub fn evasion_chance(target_spd: i32, attacker_spd: i32) -> f64 {
    let diff = target_spd as f64 - attacker_spd as f64;
    (EVASION_PER_SPD_DIFF * diff).clamp(0.0, MAX_EVASION_CHANCE)
}

/// Roll against a percent chance.
pub fn roll_percent(chance_percent: f64, rng: &mut impl Rng) -> bool {
    if chance_percent <= 0.0 {
        return false;
    }
    rng.gen::<f64>() * 100.0 < chance_percent
}

/// Pre-mitigation damage from effective ATK and a skill multiplier.
///
/// `focused` adds the one-shot Focus bonus on top of the scaled value.
pub fn scaled_attack(atk: u32, multiplier: f64, focused: bool) -> u32 {
    let mut raw = (atk as f64 * multiplier).floor();
    if focused {
        raw = (raw * (1.0 + FOCUS_DAMAGE_BONUS_PERCENT / 100.0)).floor();
    }
    raw.max(0.0) as u32
}

/// Apply a percentage modifier (1.0 = unchanged) to a damage amount.
pub fn apply_damage_modifier(damage: u32, modifier: f64) -> u32 {
    if damage == 0 {
        return 0;
    }
    ((damage as f64 * modifier).floor() as u32).max(MIN_DAMAGE)
}

/// Resolve one hit: evasion first, then mitigation, then crit.
///
/// A miss skips both mitigation and the crit roll.
pub fn resolve_attack(
    raw_damage: u32,
    attacker_spd: u32,
    target_spd: u32,
    target_def: u32,
    rng: &mut impl Rng,
) -> AttackRoll {
    let evade = evasion_chance(target_spd as i32, attacker_spd as i32);
    if roll_percent(evade, rng) {
        return AttackRoll::miss();
    }

    let mut damage = mitigated_damage(raw_damage, target_def);
    let is_crit = roll_percent(crit_chance(attacker_spd as i32), rng);
    if is_crit {
        damage = (damage as f64 * CRIT_MULTIPLIER).floor() as u32;
    }

    AttackRoll {
        damage,
        is_crit,
        evaded: false,
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_mitigated_damage_at_least_one(base in 1u32..100_000, def in 0u32..10_000) {
            prop_assert!(mitigated_damage(base, def) >= 1);
        }

        #[test]
        fn prop_mitigated_damage_non_increasing_in_defense(
            base in 1u32..100_000,
            def in 0u32..10_000,
            extra in 0u32..1_000,
        ) {
            prop_assert!(mitigated_damage(base, def + extra) <= mitigated_damage(base, def));
        }

        #[test]
        fn prop_crit_chance_clamped(spd in any::<i32>()) {
            let c = crit_chance(spd);
            prop_assert!((0.0..=30.0).contains(&c), "got {}", c);
        }

        #[test]
        fn prop_evasion_chance_clamped(target in any::<i32>(), attacker in any::<i32>()) {
            let e = evasion_chance(target, attacker);
            prop_assert!((0.0..=50.0).contains(&e), "got {}", e);
        }
    }
}
