use serde::{Deserialize, Serialize};

use crate::combat::passives::PassiveKind;
use crate::combat::types::BaseStats;

/// A player or monster as it exists inside one battle.
///
/// Owned by the active battle and mutated in place each turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Combatant {
    pub id: String,
    pub name: String,
    pub level: u32,
    pub hp: u32,
    pub max_hp: u32,
    pub mp: u32,
    pub max_mp: u32,
    pub stats: BaseStats,
    /// Skill ids this combatant can use.
    pub skills: Vec<String>,
    #[serde(default)]
    pub passive: Option<PassiveKind>,
}

impl Combatant {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        level: u32,
        max_hp: u32,
        max_mp: u32,
        stats: BaseStats,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            level,
            hp: max_hp,
            max_hp,
            mp: max_mp,
            max_mp,
            stats,
            skills: Vec::new(),
            passive: None,
        }
    }

    pub fn with_skills(mut self, skills: Vec<String>) -> Self {
        self.skills = skills;
        self
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Take damage, returns the HP actually lost.
    pub fn take_damage(&mut self, amount: u32) -> u32 {
        let lost = amount.min(self.hp);
        self.hp -= lost;
        lost
    }

    /// Heal up to max HP, returns the HP actually restored.
    pub fn heal(&mut self, amount: u32) -> u32 {
        let restored = amount.min(self.max_hp - self.hp);
        self.hp += restored;
        restored
    }

    /// Restore MP up to max, returns the MP actually restored.
    pub fn restore_mp(&mut self, amount: u32) -> u32 {
        let restored = amount.min(self.max_mp - self.mp);
        self.mp += restored;
        restored
    }

    /// Spend MP if there is enough. Returns false (and spends nothing) otherwise.
    pub fn spend_mp(&mut self, cost: u32) -> bool {
        if self.mp < cost {
            return false;
        }
        self.mp -= cost;
        true
    }

    pub fn hp_percent(&self) -> f64 {
        if self.max_hp == 0 {
            return 0.0;
        }
        self.hp as f64 / self.max_hp as f64 * 100.0
    }

    pub fn mp_percent(&self) -> f64 {
        if self.max_mp == 0 {
            return 0.0;
        }
        self.mp as f64 / self.max_mp as f64 * 100.0
    }

    /// Reset HP and MP to full.
    pub fn restore_full(&mut self) {
        self.hp = self.max_hp;
        self.mp = self.max_mp;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bug() -> Combatant {
        Combatant::new("null-pointer", "NullPointer", 1, 50, 0, BaseStats::new(8, 3, 8))
    }

    #[test]
    fn test_take_damage_saturates() {
        let mut c = bug();
        assert_eq!(c.take_damage(20), 20);
        assert_eq!(c.hp, 30);
        assert_eq!(c.take_damage(100), 30);
        assert_eq!(c.hp, 0);
        assert!(!c.is_alive());
    }

    #[test]
    fn test_heal_clamps_to_max() {
        let mut c = bug();
        c.take_damage(10);
        assert_eq!(c.heal(25), 10);
        assert_eq!(c.hp, 50);
    }

    #[test]
    fn test_spend_mp_insufficient() {
        let mut c = Combatant::new("p", "P", 1, 100, 50, BaseStats::default());
        assert!(c.spend_mp(20));
        assert_eq!(c.mp, 30);
        assert!(!c.spend_mp(31));
        assert_eq!(c.mp, 30);
        assert_eq!(c.restore_mp(100), 20);
    }

    #[test]
    fn test_percentages() {
        let mut c = bug();
        c.take_damage(25);
        assert!((c.hp_percent() - 50.0).abs() < f64::EPSILON);
        assert_eq!(c.mp_percent(), 0.0);
    }
}
