//! Simulation configuration.

use crate::core::balance::DEFAULT_MAX_TURNS;

/// Bounds outside which the report flags an imbalance.
#[derive(Debug, Clone, PartialEq)]
pub struct ImbalanceThresholds {
    /// Acceptable global win rate, in percent.
    pub min_win_rate: f64,
    pub max_win_rate: f64,

    /// Largest allowed gap between the best and worst class win rate,
    /// in percentage points.
    pub max_class_spread: f64,

    /// Acceptable average battle length, in turns.
    pub min_avg_turns: f64,
    pub max_avg_turns: f64,
}

impl Default for ImbalanceThresholds {
    fn default() -> Self {
        Self {
            min_win_rate: 60.0,
            max_win_rate: 95.0,
            max_class_spread: 20.0,
            min_avg_turns: 3.0,
            max_avg_turns: 20.0,
        }
    }
}

/// Configuration for a simulation run.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Number of independent battles to run
    pub num_battles: u32,

    /// Class ids to sample from (empty = every class)
    pub classes: Vec<String>,

    /// Chapter ids to sample from (empty = every chapter)
    pub chapters: Vec<u32>,

    /// Base seed; battle i uses `seed + i`
    pub seed: u64,

    /// Turn cap per battle; reaching it scores a loss
    pub max_turns: u32,

    pub thresholds: ImbalanceThresholds,

    /// Run battles across the rayon thread pool
    pub parallel: bool,

    /// Log verbosity (0 = silent, 1 = summary, 2 = per battle)
    pub verbosity: u8,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            num_battles: 1000,
            classes: Vec::new(),
            chapters: Vec::new(),
            seed: 42,
            max_turns: DEFAULT_MAX_TURNS,
            thresholds: ImbalanceThresholds::default(),
            parallel: true,
            verbosity: 1,
        }
    }
}

impl SimConfig {
    /// Quick config for checking a single chapter
    pub fn chapter_balance_test(chapter: u32) -> Self {
        Self {
            num_battles: 200,
            chapters: vec![chapter],
            ..Default::default()
        }
    }

    /// Quick config for comparing classes against each other
    pub fn class_comparison(classes: &[&str], num_battles: u32) -> Self {
        Self {
            num_battles,
            classes: classes.iter().map(|c| c.to_string()).collect(),
            ..Default::default()
        }
    }

    /// Sequential, quiet config for tests
    pub fn deterministic(num_battles: u32, seed: u64) -> Self {
        Self {
            num_battles,
            seed,
            parallel: false,
            verbosity: 0,
            ..Default::default()
        }
    }
}
