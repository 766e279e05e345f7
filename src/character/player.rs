use serde::{Deserialize, Serialize};

use super::combatant::Combatant;
use crate::core::balance::{MAX_LEVEL, MAX_TECH_DEBT};
use crate::data::classes::{ClassDefinition, ClassStats};

/// The player character: a combatant plus progression resources.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub combatant: Combatant,
    pub class_id: String,
    /// EXP accumulated toward the next level.
    pub exp: u64,
    pub gold: u64,
    pub inventory: Vec<String>,
    /// Tech debt meter (0-100).
    pub tech_debt: u32,
    /// Applied to the next gold award, then reset to 1.0.
    #[serde(default = "default_gold_multiplier")]
    pub gold_multiplier: f64,
}

fn default_gold_multiplier() -> f64 {
    1.0
}

impl Player {
    /// Creates a level 1 player of the given class.
    pub fn new(name: impl Into<String>, class: &ClassDefinition) -> Self {
        let base = &class.base;
        let mut combatant = Combatant::new(
            class.id.clone(),
            name,
            1,
            base.hp,
            base.mp,
            base.combat_stats(),
        )
        .with_skills(class.skills.clone());
        combatant.passive = Some(class.passive.clone());

        Self {
            combatant,
            class_id: class.id.clone(),
            exp: 0,
            gold: 0,
            inventory: Vec::new(),
            tech_debt: 0,
            gold_multiplier: 1.0,
        }
    }

    /// Creates a player already grown to `level` (capped at the max level).
    pub fn at_level(name: impl Into<String>, class: &ClassDefinition, level: u32) -> Self {
        let mut player = Self::new(name, class);
        for _ in 1..level.clamp(1, MAX_LEVEL) {
            player.grow(&class.growth);
        }
        player.combatant.restore_full();
        player
    }

    pub fn level(&self) -> u32 {
        self.combatant.level
    }

    /// Apply one level of flat stat growth.
    pub(crate) fn grow(&mut self, growth: &ClassStats) {
        let c = &mut self.combatant;
        c.level += 1;
        c.max_hp += growth.hp;
        c.max_mp += growth.mp;
        c.stats.atk += growth.atk;
        c.stats.def += growth.def;
        c.stats.spd += growth.spd;
    }

    /// Award gold, consuming any pending gold multiplier. Returns gold gained.
    pub fn award_gold(&mut self, base_amount: u64) -> u64 {
        let gained = (base_amount as f64 * self.gold_multiplier).floor() as u64;
        self.gold_multiplier = 1.0;
        self.gold += gained;
        gained
    }

    /// Remove gold, never going below zero. Returns gold actually lost.
    pub fn spend_gold(&mut self, amount: u64) -> u64 {
        let lost = amount.min(self.gold);
        self.gold -= lost;
        lost
    }

    /// Shift the tech debt meter, clamped to 0-100. Returns the applied delta.
    pub fn add_tech_debt(&mut self, delta: i32) -> i32 {
        let before = self.tech_debt as i32;
        let after = (before + delta).clamp(0, MAX_TECH_DEBT as i32);
        self.tech_debt = after as u32;
        after - before
    }
}
