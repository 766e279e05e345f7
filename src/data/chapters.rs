//! Chapter definitions: stage counts, recommended levels and encounters.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChapterDefinition {
    pub id: u32,
    pub name: String,
    /// Number of stages; the last one is always the boss.
    pub total_stages: u32,
    pub recommended_level: u32,
    /// Regular encounters, cycled through for non-boss stages.
    pub monsters: Vec<String>,
    pub boss: String,
}

impl ChapterDefinition {
    /// Monster id fought at `stage` (1-based). The final stage is the boss.
    pub fn monster_for_stage(&self, stage: u32) -> Option<&str> {
        if stage == 0 || stage > self.total_stages {
            return None;
        }
        if stage == self.total_stages || self.monsters.is_empty() {
            return Some(&self.boss);
        }
        let index = (stage as usize - 1) % self.monsters.len();
        self.monsters.get(index).map(String::as_str)
    }

    pub fn is_boss_stage(&self, stage: u32) -> bool {
        stage == self.total_stages
    }

    /// Every monster that can appear in this chapter, boss last.
    pub fn encounter_pool(&self) -> impl Iterator<Item = &str> {
        self.monsters
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(self.boss.as_str()))
    }
}

fn chapter(
    id: u32,
    name: &str,
    total_stages: u32,
    recommended_level: u32,
    monsters: &[&str],
    boss: &str,
) -> ChapterDefinition {
    ChapterDefinition {
        id,
        name: name.to_string(),
        total_stages,
        recommended_level,
        monsters: monsters.iter().map(|m| m.to_string()).collect(),
        boss: boss.to_string(),
    }
}

/// Returns all chapters in play order.
pub fn builtin_chapters() -> Vec<ChapterDefinition> {
    vec![
        chapter(
            1,
            "Hello, World",
            4,
            1,
            &["null-pointer", "type-mismatch", "off-by-one"],
            "stack-overflow",
        ),
        chapter(
            2,
            "Concurrency",
            4,
            5,
            &["race-condition", "memory-leak", "deadlock"],
            "heisenbug",
        ),
        chapter(
            3,
            "Legacy Code",
            5,
            10,
            &["segfault-specter", "infinite-loop", "dependency-hell"],
            "legacy-monolith",
        ),
        chapter(
            4,
            "Production",
            5,
            15,
            &["merge-conflict", "flaky-test", "zero-day"],
            "production-outage",
        ),
    ]
}
