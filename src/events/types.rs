//! Game event catalog types.

use serde::{Deserialize, Serialize};

use crate::combat::types::Stat;

/// One state change an event can make.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventEffect {
    /// Heal a percent of max HP.
    Heal { percent: f64 },
    /// Lose a percent of max HP. Never drops the player below 1 HP.
    Damage { percent: f64 },
    RestoreMp { percent: f64 },
    /// Gain (positive) or lose (negative) gold.
    Gold { amount: i64 },
    /// Replaces any pending multiplier; consumed by the next gold award.
    GoldMultiplier { multiplier: f64 },
    TechDebt { delta: i32 },
    Exp { amount: u64 },
    /// Temporary stat change installed at the start of the next battle.
    TempBuff {
        stat: Stat,
        value: i32,
        duration: i32,
    },
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventChoice {
    pub label: String,
    pub effects: Vec<EventEffect>,
    pub result_text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameEvent {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default = "default_weight")]
    pub weight: u32,
    /// Applied immediately for auto events.
    #[serde(default)]
    pub effects: Vec<EventEffect>,
    /// Non-empty for choice events.
    #[serde(default)]
    pub choices: Vec<EventChoice>,
}

fn default_weight() -> u32 {
    1
}

impl GameEvent {
    pub fn is_choice(&self) -> bool {
        !self.choices.is_empty()
    }
}

/// A stat change queued for the next battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingEffect {
    pub stat: Stat,
    pub value: i32,
    pub duration: i32,
}

impl PendingEffect {
    pub fn is_buff(&self) -> bool {
        self.value > 0
    }
}
