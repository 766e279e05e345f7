//! Playable class definitions.

use serde::{Deserialize, Serialize};

use crate::combat::passives::PassiveKind;
use crate::combat::types::BaseStats;

/// HP/MP and combat stats, used both for level-1 values and per-level growth.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassStats {
    pub hp: u32,
    pub mp: u32,
    pub atk: u32,
    pub def: u32,
    pub spd: u32,
}

impl ClassStats {
    pub const fn new(hp: u32, mp: u32, atk: u32, def: u32, spd: u32) -> Self {
        Self {
            hp,
            mp,
            atk,
            def,
            spd,
        }
    }

    pub fn combat_stats(&self) -> BaseStats {
        BaseStats::new(self.atk, self.def, self.spd)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassDefinition {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Level 1 stats.
    pub base: ClassStats,
    /// Flat stats gained per level.
    pub growth: ClassStats,
    pub skills: Vec<String>,
    pub passive: PassiveKind,
}

fn class(
    id: &str,
    name: &str,
    description: &str,
    base: ClassStats,
    growth: ClassStats,
    skills: &[&str],
    passive: PassiveKind,
) -> ClassDefinition {
    ClassDefinition {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        base,
        growth,
        skills: skills.iter().map(|s| s.to_string()).collect(),
        passive,
    }
}

/// Returns all playable classes.
pub fn builtin_classes() -> Vec<ClassDefinition> {
    vec![
        class(
            "debugger",
            "Debugger",
            "Balanced fighter who finds the weak spot every few hits",
            ClassStats::new(100, 50, 15, 8, 12),
            ClassStats::new(12, 5, 3, 2, 1),
            &["breakpoint", "stack-trace", "hotfix"],
            PassiveKind::EveryNthAttack {
                every: 3,
                bonus_percent: 50.0,
            },
        ),
        class(
            "refactorer",
            "Refactorer",
            "Sturdy tank who hardens under pressure",
            ClassStats::new(120, 40, 12, 12, 8),
            ClassStats::new(15, 4, 2, 3, 1),
            &["extract-method", "clean-code", "reduce-complexity"],
            PassiveKind::LowHpDamageReduction {
                hp_below_percent: 50.0,
                reduction_percent: 20.0,
            },
        ),
        class(
            "full-stack",
            "Full-Stack",
            "Fast generalist with deep MP reserves",
            ClassStats::new(90, 60, 14, 7, 14),
            ClassStats::new(10, 6, 3, 1, 2),
            &["full-stack-strike", "async-await", "memory-dump"],
            PassiveKind::MpRegenBonus { percent: 5.0 },
        ),
        class(
            "devops",
            "DevOps",
            "Resilient operator who rolls back from certain death once",
            ClassStats::new(110, 45, 13, 10, 10),
            ClassStats::new(13, 5, 2, 2, 1),
            &["pipeline", "monitoring", "rollback"],
            PassiveKind::AutoRevive { hp_percent: 30.0 },
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_debugger_base_stats() {
        let classes = builtin_classes();
        let debugger = classes.iter().find(|c| c.id == "debugger").unwrap();
        assert_eq!(debugger.base, ClassStats::new(100, 50, 15, 8, 12));
        assert_eq!(debugger.skills.len(), 3);
    }

    #[test]
    fn test_every_class_has_growth() {
        for class in builtin_classes() {
            assert!(class.growth.hp > 0, "{} has no HP growth", class.id);
            assert!(class.growth.atk > 0, "{} has no ATK growth", class.id);
        }
    }
}
