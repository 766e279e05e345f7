//! Skill definitions and the built-in skill catalog.

use serde::{Deserialize, Serialize};

use crate::combat::types::{Stat, StatusKind};

/// Who a skill is aimed at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetScope {
    #[default]
    Enemy,
    #[serde(rename = "self")]
    SelfTarget,
}

/// One-off effects that do not fit the regular effect types.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SpecialEffect {
    ReduceTechDebt { amount: u32 },
    RestoreMp { percent: f64 },
    /// Remove debuffs and DOTs from the caster's side.
    Cleanse,
    #[serde(other)]
    Unrecognized,
}

impl SpecialEffect {
    /// Interpret a free-text description for content that only ships text.
    pub fn from_description(description: &str) -> Self {
        let text = description.to_lowercase();
        let number = first_number(&text);

        if text.contains("tech debt") || text.contains("tech-debt") {
            SpecialEffect::ReduceTechDebt {
                amount: number.unwrap_or(10),
            }
        } else if text.contains("restore") && (text.contains("mp") || text.contains("mana")) {
            SpecialEffect::RestoreMp {
                percent: number.unwrap_or(20) as f64,
            }
        } else if text.contains("cleanse") || text.contains("remove debuff") {
            SpecialEffect::Cleanse
        } else {
            SpecialEffect::Unrecognized
        }
    }
}

fn first_number(text: &str) -> Option<u32> {
    text.split(|c: char| !c.is_ascii_digit())
        .find(|s| !s.is_empty())
        .and_then(|s| s.parse().ok())
}

/// One entry of a skill's ordered effect list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SkillEffect {
    /// Damage scaled from the caster's effective ATK.
    Damage { multiplier: f64 },
    /// Heal a percent of the caster's max HP.
    Heal { percent: f64 },
    Buff {
        stat: Stat,
        value: i32,
        duration: i32,
    },
    /// `value` is already negative in data.
    Debuff {
        stat: Stat,
        value: i32,
        duration: i32,
    },
    Dot { damage: u32, duration: i32 },
    Status { status: StatusKind, duration: i32 },
    Special {
        description: String,
        #[serde(default)]
        effect: Option<SpecialEffect>,
    },
    #[serde(other)]
    Unknown,
}

impl SkillEffect {
    pub fn special(description: &str) -> Self {
        SkillEffect::Special {
            description: description.to_string(),
            effect: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillDefinition {
    pub id: String,
    pub name: String,
    pub mp_cost: u32,
    /// Turns before the skill can be used again (0 = no cooldown).
    pub cooldown: u32,
    pub effects: Vec<SkillEffect>,
    /// Side that receives debuffs, DOTs and statuses. Buffs and heals always
    /// land on the caster.
    #[serde(default)]
    pub target: TargetScope,
    #[serde(default)]
    pub description: String,
}

impl SkillDefinition {
    pub fn new(id: &str, name: &str, mp_cost: u32, cooldown: u32) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            mp_cost,
            cooldown,
            effects: Vec::new(),
            target: TargetScope::Enemy,
            description: String::new(),
        }
    }

    pub fn effect(mut self, effect: SkillEffect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn targeting(mut self, target: TargetScope) -> Self {
        self.target = target;
        self
    }

    pub fn describe(mut self, description: &str) -> Self {
        self.description = description.to_string();
        self
    }

    /// Sum of all damage multipliers; used to rank skills by strength.
    pub fn damage_multiplier(&self) -> f64 {
        self.effects
            .iter()
            .map(|e| match e {
                SkillEffect::Damage { multiplier } => *multiplier,
                _ => 0.0,
            })
            .sum()
    }

    pub fn deals_damage(&self) -> bool {
        self.damage_multiplier() > 0.0
    }

    pub fn heals(&self) -> bool {
        self.effects
            .iter()
            .any(|e| matches!(e, SkillEffect::Heal { .. }))
    }
}

/// Returns every built-in skill, player and monster alike.
pub fn builtin_skills() -> Vec<SkillDefinition> {
    use SkillEffect::*;

    vec![
        // ── Debugger ─────────────────────────────────────────────────
        SkillDefinition::new("breakpoint", "Breakpoint", 10, 2)
            .effect(Damage { multiplier: 1.5 })
            .describe("Halt the bug mid-execution for a heavy hit"),
        SkillDefinition::new("stack-trace", "Stack Trace", 12, 3)
            .effect(Damage { multiplier: 1.0 })
            .effect(Debuff {
                stat: Stat::Def,
                value: -5,
                duration: 3,
            })
            .describe("Expose the bug's internals, lowering its DEF"),
        SkillDefinition::new("hotfix", "Hotfix", 15, 4)
            .effect(Heal { percent: 30.0 })
            .targeting(TargetScope::SelfTarget)
            .describe("Patch yourself up for 30% of max HP"),
        // ── Refactorer ───────────────────────────────────────────────
        SkillDefinition::new("extract-method", "Extract Method", 8, 1)
            .effect(Damage { multiplier: 1.3 })
            .describe("Cut the bug into smaller pieces"),
        SkillDefinition::new("clean-code", "Clean Code", 10, 3)
            .effect(Buff {
                stat: Stat::Def,
                value: 6,
                duration: 3,
            })
            .targeting(TargetScope::SelfTarget)
            .describe("Raise DEF for 3 turns"),
        SkillDefinition::new("reduce-complexity", "Reduce Complexity", 14, 3)
            .effect(Damage { multiplier: 1.2 })
            .effect(SkillEffect::special("Reduce tech debt by 10"))
            .describe("Strike and pay down 10 tech debt"),
        // ── Full-Stack ───────────────────────────────────────────────
        SkillDefinition::new("full-stack-strike", "Full-Stack Strike", 10, 2)
            .effect(Damage { multiplier: 1.4 })
            .describe("Hit the bug from frontend to backend"),
        SkillDefinition::new("async-await", "Async/Await", 8, 3)
            .effect(Buff {
                stat: Stat::Spd,
                value: 5,
                duration: 3,
            })
            .targeting(TargetScope::SelfTarget)
            .describe("Raise SPD for 3 turns"),
        SkillDefinition::new("memory-dump", "Memory Dump", 12, 3)
            .effect(Damage { multiplier: 0.8 })
            .effect(Dot {
                damage: 6,
                duration: 3,
            })
            .describe("Flood the bug with data, dealing damage over time"),
        // ── DevOps ───────────────────────────────────────────────────
        SkillDefinition::new("pipeline", "CI Pipeline", 14, 4)
            .effect(Damage { multiplier: 1.2 })
            .effect(Status {
                status: StatusKind::Stun,
                duration: 1,
            })
            .describe("Run the bug through the pipeline, stunning it"),
        SkillDefinition::new("monitoring", "Monitoring", 10, 3)
            .effect(Buff {
                stat: Stat::Atk,
                value: 5,
                duration: 3,
            })
            .targeting(TargetScope::SelfTarget)
            .describe("Raise ATK for 3 turns"),
        SkillDefinition::new("rollback", "Rollback", 16, 4)
            .effect(Heal { percent: 25.0 })
            .effect(SkillEffect::special("Cleanse all debuffs"))
            .targeting(TargetScope::SelfTarget)
            .describe("Restore a known-good state: heal and cleanse"),
        // ── Monsters ─────────────────────────────────────────────────
        SkillDefinition::new("segfault", "Segfault", 0, 3)
            .effect(Damage { multiplier: 1.6 })
            .describe("Crash into the target"),
        SkillDefinition::new("leak", "Leak", 0, 3)
            .effect(Dot {
                damage: 4,
                duration: 3,
            })
            .describe("Slowly drain the target"),
        SkillDefinition::new("lock-acquire", "Lock Acquire", 0, 4)
            .effect(Status {
                status: StatusKind::Stun,
                duration: 1,
            })
            .describe("Hold a lock the target needs"),
        SkillDefinition::new("nondeterminism", "Nondeterminism", 0, 4)
            .effect(Status {
                status: StatusKind::Confusion,
                duration: 2,
            })
            .describe("Make the target doubt reality"),
        SkillDefinition::new("type-coercion", "Type Coercion", 0, 3)
            .effect(Debuff {
                stat: Stat::Atk,
                value: -4,
                duration: 2,
            })
            .describe("Weaken the target's ATK"),
        SkillDefinition::new("stack-smash", "Stack Smash", 0, 2)
            .effect(Damage { multiplier: 2.0 })
            .describe("Boss strike"),
        SkillDefinition::new("recursion", "Infinite Recursion", 0, 4)
            .effect(Damage { multiplier: 0.7 })
            .effect(Damage { multiplier: 0.7 })
            .describe("Hit twice"),
        SkillDefinition::new("cascade-failure", "Cascade Failure", 0, 3)
            .effect(Damage { multiplier: 1.4 })
            .effect(Debuff {
                stat: Stat::Def,
                value: -4,
                duration: 2,
            })
            .describe("Boss strike that lowers DEF"),
    ]
}
