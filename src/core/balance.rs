//! Shared balance constants used by both the battle engine and simulator.
//!
//! All core balance numbers should be defined here.
//! Change once, test everywhere.

// =============================================================================
// DAMAGE FORMULAS
// =============================================================================

/// Defense weight inside the mitigation denominator: 100 / (100 + DEF * 0.7).
pub const DEFENSE_MITIGATION_FACTOR: f64 = 0.7;

/// Damage never drops below this after mitigation.
pub const MIN_DAMAGE: u32 = 1;

/// Base crit chance percent before speed.
pub const BASE_CRIT_CHANCE: f64 = 10.0;

/// Crit chance gained per point of speed.
pub const CRIT_CHANCE_PER_SPD: f64 = 0.5;

/// Crit chance ceiling (percent).
pub const MAX_CRIT_CHANCE: f64 = 30.0;

/// Crit damage multiplier, applied after mitigation.
pub const CRIT_MULTIPLIER: f64 = 1.5;

/// Evasion percent per point of speed advantage.
pub const EVASION_PER_SPD_DIFF: f64 = 2.0;

/// Evasion ceiling (percent).
pub const MAX_EVASION_CHANCE: f64 = 50.0;

/// Basic attacks hit for this fraction of effective ATK.
pub const BASIC_ATTACK_MULTIPLIER: f64 = 0.8;

// =============================================================================
// RESOURCES
// =============================================================================

/// MP regenerated every turn, as a percent of max MP.
pub const MP_REGEN_PERCENT: f64 = 5.0;

/// MP restored by the Focus action, as a percent of max MP.
pub const FOCUS_MP_RESTORE_PERCENT: f64 = 30.0;

/// One-shot damage bonus armed by Focus (percent).
pub const FOCUS_DAMAGE_BONUS_PERCENT: f64 = 20.0;

/// Tech debt meter ceiling.
pub const MAX_TECH_DEBT: u32 = 100;

/// Battle turns per point of tech debt accrued.
pub const TURNS_PER_TECH_DEBT: u32 = 5;

// =============================================================================
// LEVELING & PROGRESSION
// =============================================================================

/// XP for level N = XP_CURVE_BASE * N^XP_CURVE_EXPONENT
pub const XP_CURVE_BASE: f64 = 100.0;
pub const XP_CURVE_EXPONENT: f64 = 1.5;

/// Hard level cap.
pub const MAX_LEVEL: u32 = 50;

// =============================================================================
// BOSSES
// =============================================================================

/// HP percent thresholds that open boss phases 2, 3 and 4.
pub const BOSS_PHASE_THRESHOLDS: [f64; 3] = [75.0, 50.0, 25.0];

pub const MAX_BOSS_PHASE: u8 = 4;

// =============================================================================
// EVENTS
// =============================================================================

/// Chance (0.0-1.0) that any event fires at a stage boundary.
pub const EVENT_TRIGGER_CHANCE: f64 = 0.30;

// =============================================================================
// SIMULATION
// =============================================================================

/// Battles still running after this many rounds are scored as losses.
pub const DEFAULT_MAX_TURNS: u32 = 50;

/// Inline AI heals below this HP percent.
pub const SIM_EMERGENCY_HEAL_HP_PERCENT: f64 = 30.0;

/// Inline AI focuses below this MP percent.
pub const SIM_FOCUS_MP_PERCENT: f64 = 30.0;

/// Percent of a fraction, as an integer amount (floor).
pub fn percent_of(value: u32, percent: f64) -> u32 {
    (value as f64 * percent / 100.0).floor().max(0.0) as u32
}
