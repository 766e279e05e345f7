//! Static game content: classes, skills, monsters, chapters and events.
//!
//! Content is read-only once loaded. Build it with [`GameData::builtin`] or
//! [`GameData::from_json_str`] and pass it around by reference.

pub mod chapters;
pub mod classes;
pub mod events;
pub mod monsters;
pub mod skills;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use chapters::ChapterDefinition;
pub use classes::{ClassDefinition, ClassStats};
pub use monsters::{LootEntry, MonsterDefinition};
pub use skills::{SkillDefinition, SkillEffect, SpecialEffect, TargetScope};

use crate::enemy::EnemyAction;
use crate::events::types::GameEvent;

/// Content that fails to load.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("content JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("duplicate {kind} id '{id}'")]
    DuplicateId { kind: &'static str, id: String },

    #[error("{owner} references unknown skill '{skill}'")]
    UnknownSkill { owner: String, skill: String },

    #[error("chapter {chapter} references unknown monster '{monster}'")]
    UnknownMonster { chapter: u32, monster: String },

    #[error("chapter {chapter} has no stages")]
    EmptyChapter { chapter: u32 },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GameData {
    #[serde(default)]
    pub classes: Vec<ClassDefinition>,
    #[serde(default)]
    pub skills: Vec<SkillDefinition>,
    #[serde(default)]
    pub monsters: Vec<MonsterDefinition>,
    #[serde(default)]
    pub chapters: Vec<ChapterDefinition>,
    #[serde(default)]
    pub events: Vec<GameEvent>,
}

impl GameData {
    /// The content the game ships with.
    pub fn builtin() -> Self {
        Self {
            classes: classes::builtin_classes(),
            skills: skills::builtin_skills(),
            monsters: monsters::builtin_monsters(),
            chapters: chapters::builtin_chapters(),
            events: events::builtin_events(),
        }
    }

    /// Load content from JSON and check its cross references.
    pub fn from_json_str(json: &str) -> Result<Self, DataError> {
        let data: GameData = serde_json::from_str(json)?;
        data.validate()?;
        tracing::debug!(
            classes = data.classes.len(),
            skills = data.skills.len(),
            monsters = data.monsters.len(),
            chapters = data.chapters.len(),
            events = data.events.len(),
            "loaded game content"
        );
        Ok(data)
    }

    pub fn to_json_string(&self) -> Result<String, DataError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check ids are unique and every reference resolves.
    pub fn validate(&self) -> Result<(), DataError> {
        check_unique("class", self.classes.iter().map(|c| c.id.as_str()))?;
        check_unique("skill", self.skills.iter().map(|s| s.id.as_str()))?;
        check_unique("monster", self.monsters.iter().map(|m| m.id.as_str()))?;
        check_unique("event", self.events.iter().map(|e| e.id.as_str()))?;

        for class in &self.classes {
            self.check_skills(&class.id, &class.skills)?;
        }
        for monster in &self.monsters {
            self.check_skills(&monster.id, &monster.skills)?;
            for rule in &monster.behavior.rules {
                if let EnemyAction::Skill { id } = &rule.action {
                    self.check_skills(&monster.id, std::slice::from_ref(id))?;
                }
            }
        }
        for chapter in &self.chapters {
            if chapter.total_stages == 0 {
                return Err(DataError::EmptyChapter {
                    chapter: chapter.id,
                });
            }
            for id in chapter.encounter_pool() {
                if self.monster(id).is_none() {
                    return Err(DataError::UnknownMonster {
                        chapter: chapter.id,
                        monster: id.to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    fn check_skills(&self, owner: &str, ids: &[String]) -> Result<(), DataError> {
        match ids.iter().find(|id| self.skill(id).is_none()) {
            Some(missing) => Err(DataError::UnknownSkill {
                owner: owner.to_string(),
                skill: missing.clone(),
            }),
            None => Ok(()),
        }
    }

    pub fn class(&self, id: &str) -> Option<&ClassDefinition> {
        self.classes.iter().find(|c| c.id == id)
    }

    pub fn skill(&self, id: &str) -> Option<&SkillDefinition> {
        self.skills.iter().find(|s| s.id == id)
    }

    pub fn monster(&self, id: &str) -> Option<&MonsterDefinition> {
        self.monsters.iter().find(|m| m.id == id)
    }

    pub fn chapter(&self, id: u32) -> Option<&ChapterDefinition> {
        self.chapters.iter().find(|c| c.id == id)
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn class_ids(&self) -> Vec<String> {
        self.classes.iter().map(|c| c.id.clone()).collect()
    }

    pub fn chapter_ids(&self) -> Vec<u32> {
        self.chapters.iter().map(|c| c.id).collect()
    }
}

fn check_unique<'a>(
    kind: &'static str,
    ids: impl Iterator<Item = &'a str>,
) -> Result<(), DataError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(DataError::DuplicateId {
                kind,
                id: id.to_string(),
            });
        }
    }
    Ok(())
}
