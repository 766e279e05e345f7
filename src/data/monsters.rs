//! Monster and boss definitions.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::character::Combatant;
use crate::combat::types::{BaseStats, Stat};
use crate::enemy::behavior::{BehaviorTree, Condition, EnemyAction};
use crate::enemy::boss::{BossProfile, PhaseDialogue, PhaseWeight};
use crate::enemy::ActionKind;

/// One possible drop from a monster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LootEntry {
    pub item: String,
    /// Drop chance (0.0-1.0).
    pub chance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonsterDefinition {
    pub id: String,
    pub name: String,
    pub chapter: u32,
    pub level: u32,
    pub max_hp: u32,
    #[serde(default)]
    pub max_mp: u32,
    pub stats: BaseStats,
    pub exp_reward: u64,
    pub gold_reward: u64,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub behavior: BehaviorTree,
    #[serde(default)]
    pub loot: Vec<LootEntry>,
    #[serde(default)]
    pub boss: Option<BossProfile>,
}

impl MonsterDefinition {
    pub fn is_boss(&self) -> bool {
        self.boss.is_some()
    }

    /// Fresh combatant for a new battle.
    pub fn to_combatant(&self) -> Combatant {
        Combatant::new(
            self.id.clone(),
            self.name.clone(),
            self.level,
            self.max_hp,
            self.max_mp,
            self.stats,
        )
        .with_skills(self.skills.clone())
    }

    /// Roll each loot entry independently.
    pub fn roll_loot(&self, rng: &mut impl Rng) -> Vec<String> {
        self.loot
            .iter()
            .filter(|entry| rng.gen::<f64>() < entry.chance)
            .map(|entry| entry.item.clone())
            .collect()
    }
}

struct Spec {
    id: &'static str,
    name: &'static str,
    chapter: u32,
    level: u32,
    hp: u32,
    stats: (u32, u32, u32),
    rewards: (u64, u64),
    skills: &'static [&'static str],
}

fn monster(spec: Spec, behavior: BehaviorTree, loot: &[(&str, f64)]) -> MonsterDefinition {
    let (atk, def, spd) = spec.stats;
    MonsterDefinition {
        id: spec.id.to_string(),
        name: spec.name.to_string(),
        chapter: spec.chapter,
        level: spec.level,
        max_hp: spec.hp,
        max_mp: 0,
        stats: BaseStats::new(atk, def, spd),
        exp_reward: spec.rewards.0,
        gold_reward: spec.rewards.1,
        skills: spec.skills.iter().map(|s| s.to_string()).collect(),
        behavior,
        loot: loot
            .iter()
            .map(|(item, chance)| LootEntry {
                item: item.to_string(),
                chance: *chance,
            })
            .collect(),
        boss: None,
    }
}

fn dialogue(phase: u8, lines: &[&str]) -> PhaseDialogue {
    PhaseDialogue {
        phase,
        lines: lines.iter().map(|l| l.to_string()).collect(),
    }
}

/// Standard grunt AI: mostly attacks, sometimes uses its signature skill.
fn grunt(skill: &str) -> BehaviorTree {
    BehaviorTree::new()
        .rule(Condition::Always, EnemyAction::Attack, 6)
        .rule(Condition::Always, EnemyAction::skill(skill), 2)
}

/// Grunt AI that patches itself up when low.
fn self_healing_grunt(skill: &str) -> BehaviorTree {
    grunt(skill).rule(
        Condition::HpBelow { percent: 30.0 },
        EnemyAction::Heal { percent: 15.0 },
        3,
    )
}

fn boss_tree(signature: &str, special: &str) -> BehaviorTree {
    BehaviorTree::new()
        .rule(Condition::Always, EnemyAction::Attack, 5)
        .rule(Condition::Always, EnemyAction::skill(signature), 2)
        .rule(
            Condition::PhaseAtLeast { phase: 2 },
            EnemyAction::skill(special),
            2,
        )
        .rule(
            Condition::PhaseIs { phase: 3 },
            EnemyAction::Buff {
                stat: Stat::Atk,
                value: 4,
                duration: 3,
            },
            1,
        )
        .rule(
            Condition::HpBelow { percent: 25.0 },
            EnemyAction::Heal { percent: 10.0 },
            1,
        )
}

fn boss_weights() -> Vec<PhaseWeight> {
    vec![
        PhaseWeight {
            min_phase: 3,
            action: ActionKind::Skill,
            multiplier: 1.5,
        },
        PhaseWeight {
            min_phase: 4,
            action: ActionKind::Attack,
            multiplier: 0.5,
        },
    ]
}

/// Returns every built-in monster, grouped by chapter.
pub fn builtin_monsters() -> Vec<MonsterDefinition> {
    let mut monsters = vec![
        // ── Chapter 1: Hello, World ──────────────────────────────────
        monster(
            Spec {
                id: "null-pointer",
                name: "NullPointer",
                chapter: 1,
                level: 1,
                hp: 50,
                stats: (8, 3, 8),
                rewards: (30, 10),
                skills: &["type-coercion"],
            },
            grunt("type-coercion"),
            &[("null-check", 0.2)],
        ),
        monster(
            Spec {
                id: "type-mismatch",
                name: "TypeMismatch",
                chapter: 1,
                level: 2,
                hp: 65,
                stats: (10, 4, 9),
                rewards: (38, 12),
                skills: &["type-coercion"],
            },
            grunt("type-coercion"),
            &[("type-annotation", 0.2)],
        ),
        monster(
            Spec {
                id: "off-by-one",
                name: "OffByOne",
                chapter: 1,
                level: 2,
                hp: 70,
                stats: (11, 4, 11),
                rewards: (40, 14),
                skills: &["segfault"],
            },
            grunt("segfault"),
            &[("boundary-test", 0.2)],
        ),
        monster(
            Spec {
                id: "stack-overflow",
                name: "StackOverflow",
                chapter: 1,
                level: 3,
                hp: 180,
                stats: (14, 6, 9),
                rewards: (120, 50),
                skills: &["stack-smash", "recursion"],
            },
            boss_tree("stack-smash", "recursion"),
            &[("tail-call-charm", 0.5)],
        ),
        // ── Chapter 2: Concurrency ───────────────────────────────────
        monster(
            Spec {
                id: "race-condition",
                name: "RaceCondition",
                chapter: 2,
                level: 5,
                hp: 120,
                stats: (20, 8, 20),
                rewards: (80, 25),
                skills: &["nondeterminism"],
            },
            grunt("nondeterminism"),
            &[("mutex", 0.2)],
        ),
        monster(
            Spec {
                id: "memory-leak",
                name: "MemoryLeak",
                chapter: 2,
                level: 5,
                hp: 150,
                stats: (17, 10, 10),
                rewards: (85, 25),
                skills: &["leak"],
            },
            self_healing_grunt("leak"),
            &[("garbage-collector", 0.2)],
        ),
        monster(
            Spec {
                id: "deadlock",
                name: "Deadlock",
                chapter: 2,
                level: 6,
                hp: 170,
                stats: (18, 16, 6),
                rewards: (90, 30),
                skills: &["lock-acquire"],
            },
            grunt("lock-acquire"),
            &[("timeout-token", 0.2)],
        ),
        monster(
            Spec {
                id: "heisenbug",
                name: "Heisenbug",
                chapter: 2,
                level: 7,
                hp: 380,
                stats: (26, 12, 18),
                rewards: (300, 120),
                skills: &["nondeterminism", "recursion"],
            },
            boss_tree("recursion", "nondeterminism"),
            &[("observer-lens", 0.5)],
        ),
        // ── Chapter 3: Legacy ────────────────────────────────────────
        monster(
            Spec {
                id: "segfault-specter",
                name: "SegfaultSpecter",
                chapter: 3,
                level: 10,
                hp: 260,
                stats: (34, 18, 18),
                rewards: (180, 50),
                skills: &["segfault"],
            },
            grunt("segfault"),
            &[("core-dump", 0.2)],
        ),
        monster(
            Spec {
                id: "infinite-loop",
                name: "InfiniteLoop",
                chapter: 3,
                level: 10,
                hp: 300,
                stats: (30, 20, 14),
                rewards: (185, 55),
                skills: &["recursion"],
            },
            self_healing_grunt("recursion"),
            &[("break-statement", 0.2)],
        ),
        monster(
            Spec {
                id: "dependency-hell",
                name: "DependencyHell",
                chapter: 3,
                level: 11,
                hp: 280,
                stats: (32, 22, 12),
                rewards: (190, 60),
                skills: &["lock-acquire"],
            },
            grunt("lock-acquire"),
            &[("lockfile", 0.2)],
        ),
        monster(
            Spec {
                id: "legacy-monolith",
                name: "LegacyMonolith",
                chapter: 3,
                level: 12,
                hp: 700,
                stats: (44, 28, 12),
                rewards: (600, 250),
                skills: &["stack-smash", "cascade-failure"],
            },
            boss_tree("stack-smash", "cascade-failure"),
            &[("strangler-fig", 0.5)],
        ),
        // ── Chapter 4: Production ────────────────────────────────────
        monster(
            Spec {
                id: "merge-conflict",
                name: "MergeConflict",
                chapter: 4,
                level: 15,
                hp: 380,
                stats: (46, 28, 22),
                rewards: (320, 90),
                skills: &["nondeterminism"],
            },
            grunt("nondeterminism"),
            &[("rebase-scroll", 0.2)],
        ),
        monster(
            Spec {
                id: "flaky-test",
                name: "FlakyTest",
                chapter: 4,
                level: 15,
                hp: 340,
                stats: (50, 24, 30),
                rewards: (330, 95),
                skills: &["segfault"],
            },
            grunt("segfault"),
            &[("retry-decorator", 0.2)],
        ),
        monster(
            Spec {
                id: "zero-day",
                name: "ZeroDay",
                chapter: 4,
                level: 16,
                hp: 420,
                stats: (52, 30, 24),
                rewards: (340, 100),
                skills: &["leak"],
            },
            self_healing_grunt("leak"),
            &[("security-patch", 0.2)],
        ),
        monster(
            Spec {
                id: "production-outage",
                name: "ProductionOutage",
                chapter: 4,
                level: 18,
                hp: 1000,
                stats: (60, 36, 24),
                rewards: (1000, 500),
                skills: &["cascade-failure", "stack-smash"],
            },
            boss_tree("cascade-failure", "stack-smash"),
            &[("postmortem", 1.0)],
        ),
    ];

    for m in &mut monsters {
        m.boss = boss_profile(&m.id);
    }
    monsters
}

fn boss_profile(id: &str) -> Option<BossProfile> {
    let dialogue = match id {
        "stack-overflow" => vec![
            dialogue(2, &["Push... push... PUSH!", "My frames run deep."]),
            dialogue(3, &["You cannot unwind me!", "Recursion is my birthright."]),
            dialogue(4, &["MAXIMUM CALL STACK SIZE EXCEEDED"]),
        ],
        "heisenbug" => vec![
            dialogue(2, &["Look closer. I am not here.", "Did you add a print statement?"]),
            dialogue(3, &["Observation changes everything!"]),
            dialogue(4, &["I only happen in production..."]),
        ],
        "legacy-monolith" => vec![
            dialogue(2, &["I have run since 1998."]),
            dialogue(3, &["No one understands me. No one dares touch me."]),
            dialogue(4, &["If I fall, everything falls with me!"]),
        ],
        "production-outage" => vec![
            dialogue(2, &["Pager duty is calling.", "Error rate climbing."]),
            dialogue(3, &["All regions degraded!"]),
            dialogue(4, &["Status page: MAJOR OUTAGE", "Rollback? There is no rollback."]),
        ],
        _ => return None,
    };

    Some(BossProfile {
        dialogue,
        phase_weights: boss_weights(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_tutorial_bug_stats() {
        let monsters = builtin_monsters();
        let bug = monsters.iter().find(|m| m.id == "null-pointer").unwrap();
        assert_eq!(bug.max_hp, 50);
        assert_eq!(bug.stats, BaseStats::new(8, 3, 8));
        assert!(!bug.is_boss());
    }

    #[test]
    fn test_one_boss_per_chapter() {
        let monsters = builtin_monsters();
        for chapter in 1..=4 {
            let bosses = monsters
                .iter()
                .filter(|m| m.chapter == chapter && m.is_boss())
                .count();
            assert_eq!(bosses, 1, "chapter {}", chapter);
        }
    }

    #[test]
    fn test_roll_loot_certain_drop() {
        let monsters = builtin_monsters();
        let outage = monsters
            .iter()
            .find(|m| m.id == "production-outage")
            .unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        assert_eq!(outage.roll_loot(&mut rng), vec!["postmortem".to_string()]);
    }

    #[test]
    fn test_to_combatant_full_hp() {
        let monsters = builtin_monsters();
        let c = monsters[0].to_combatant();
        assert_eq!(c.hp, c.max_hp);
        assert_eq!(c.skills, monsters[0].skills);
    }
}
