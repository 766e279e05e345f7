use serde::{Deserialize, Serialize};
use std::fmt;

/// Which side of a battle an effect or combatant belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Player,
    Monster,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::Player => Side::Monster,
            Side::Monster => Side::Player,
        }
    }
}

/// Stats that timed modifiers can change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stat {
    Atk,
    Def,
    Spd,
}

impl Stat {
    pub fn label(self) -> &'static str {
        match self {
            Stat::Atk => "ATK",
            Stat::Def => "DEF",
            Stat::Spd => "SPD",
        }
    }
}

impl fmt::Display for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Binary status conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusKind {
    /// Skips the afflicted side's next action.
    Stun,
    /// Afflicted side may hit itself instead of the opponent.
    Confusion,
}

impl StatusKind {
    pub fn label(self) -> &'static str {
        match self {
            StatusKind::Stun => "Stunned",
            StatusKind::Confusion => "Confused",
        }
    }
}

/// What an active ledger effect modifies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EffectTag {
    Stat(Stat),
    /// Damage-over-time; magnitude is damage per turn.
    Dot,
}

/// Base combat stats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseStats {
    pub atk: u32,
    pub def: u32,
    pub spd: u32,
}

impl BaseStats {
    pub fn new(atk: u32, def: u32, spd: u32) -> Self {
        Self { atk, def, spd }
    }

    pub fn get(&self, stat: Stat) -> u32 {
        match stat {
            Stat::Atk => self.atk,
            Stat::Def => self.def,
            Stat::Spd => self.spd,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_opponent() {
        assert_eq!(Side::Player.opponent(), Side::Monster);
        assert_eq!(Side::Monster.opponent(), Side::Player);
    }

    #[test]
    fn test_stat_serde_names() {
        assert_eq!(serde_json::to_string(&Stat::Atk).unwrap(), "\"atk\"");
        let parsed: Stat = serde_json::from_str("\"spd\"").unwrap();
        assert_eq!(parsed, Stat::Spd);
    }

    #[test]
    fn test_base_stats_get() {
        let stats = BaseStats::new(15, 8, 12);
        assert_eq!(stats.get(Stat::Atk), 15);
        assert_eq!(stats.get(Stat::Def), 8);
        assert_eq!(stats.get(Stat::Spd), 12);
    }
}
