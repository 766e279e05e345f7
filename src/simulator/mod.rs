//! Game balance simulator for Monte Carlo analysis.
//!
//! Runs thousands of headless battles to analyze:
//! - Win rate per class and per chapter
//! - Battle length and damage taken
//! - Which skills the AI actually reaches for
//!
//! Battles run on `combat::Battle`, the same engine the game uses, so
//! simulation results match real play.

mod battle_sim;
mod config;
mod report;
mod runner;

pub use battle_sim::{choose_action, simulate_battle, BattleResult, SimAction};
pub use config::{ImbalanceThresholds, SimConfig};
pub use report::{GroupSummary, SimReport};
pub use runner::run_simulation;
