//! Chapter and stage progression state.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::data::chapters::ChapterDefinition;

/// Best result recorded for one stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageRecord {
    pub turns: u32,
    pub damage_taken: u32,
    /// Tech debt accrued while clearing the stage.
    pub tech_debt: u32,
}

impl StageRecord {
    /// Fewer turns wins; ties go to less damage taken.
    pub fn is_better_than(&self, other: &StageRecord) -> bool {
        (self.turns, self.damage_taken) < (other.turns, other.damage_taken)
    }
}

/// Per-chapter flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterProgress {
    pub unlocked: bool,
    pub completed: bool,
    /// Highest stage cleared.
    pub stages_completed: u32,
    pub boss_defeated: bool,
    #[serde(default)]
    pub best_records: BTreeMap<u32, StageRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressionTotals {
    pub monsters_defeated: u64,
    pub tech_debt_total: u64,
    pub play_time_seconds: u64,
}

/// What a stage completion changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StageCompletion {
    pub new_best: bool,
    /// The chapter became complete with this stage.
    pub chapter_completed: bool,
    /// Set only on the completion that unlocked the next chapter.
    pub unlocked_chapter: Option<u32>,
}

/// Where the player is in the campaign. One per save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressionState {
    pub current_chapter: u32,
    pub current_stage: u32,
    pub chapters: BTreeMap<u32, ChapterProgress>,
    pub totals: ProgressionTotals,
}

impl Default for ProgressionState {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressionState {
    /// Fresh progress: chapter 1, stage 1, only chapter 1 unlocked.
    pub fn new() -> Self {
        let mut chapters = BTreeMap::new();
        chapters.insert(
            1,
            ChapterProgress {
                unlocked: true,
                ..ChapterProgress::default()
            },
        );
        Self {
            current_chapter: 1,
            current_stage: 1,
            chapters,
            totals: ProgressionTotals::default(),
        }
    }

    pub fn chapter(&self, id: u32) -> Option<&ChapterProgress> {
        self.chapters.get(&id)
    }

    pub fn is_chapter_unlocked(&self, id: u32) -> bool {
        self.chapters.get(&id).is_some_and(|c| c.unlocked)
    }

    pub fn is_chapter_completed(&self, id: u32) -> bool {
        self.chapters.get(&id).is_some_and(|c| c.completed)
    }

    pub fn best_record(&self, chapter: u32, stage: u32) -> Option<&StageRecord> {
        self.chapters.get(&chapter)?.best_records.get(&stage)
    }

    /// Record a cleared stage.
    ///
    /// Reaching the chapter's stage count completes the chapter, marks its
    /// boss defeated and unlocks the next chapter. That transition happens
    /// once; replaying the final stage changes only the records and totals.
    pub fn complete_stage(
        &mut self,
        chapter: u32,
        stage: u32,
        record: StageRecord,
        chapters: &[ChapterDefinition],
    ) -> StageCompletion {
        let mut completion = StageCompletion::default();

        self.totals.monsters_defeated += 1;
        self.totals.tech_debt_total += record.tech_debt as u64;

        let total_stages = chapters
            .iter()
            .find(|c| c.id == chapter)
            .map(|c| c.total_stages);
        let progress = self.chapters.entry(chapter).or_default();

        match progress.best_records.get(&stage) {
            Some(best) if !record.is_better_than(best) => {}
            _ => {
                progress.best_records.insert(stage, record);
                completion.new_best = true;
            }
        }
        progress.stages_completed = progress.stages_completed.max(stage);

        let Some(total_stages) = total_stages else {
            tracing::warn!(chapter, "completed a stage in an unknown chapter");
            return completion;
        };

        if !progress.completed && progress.stages_completed >= total_stages {
            progress.completed = true;
            progress.boss_defeated = true;
            completion.chapter_completed = true;
            tracing::debug!(chapter, "chapter completed");

            let next = chapter + 1;
            if chapters.iter().any(|c| c.id == next) {
                let next_progress = self.chapters.entry(next).or_default();
                if !next_progress.unlocked {
                    next_progress.unlocked = true;
                    completion.unlocked_chapter = Some(next);
                    tracing::debug!(chapter = next, "chapter unlocked");
                }
            }
        }
        completion
    }

    /// Move to the next stage, or to stage 1 of the next unlocked chapter.
    ///
    /// Returns the new position, or `None` (staying put) when there is
    /// nowhere to go, e.g. after the final stage of the final chapter.
    pub fn advance(&mut self, chapters: &[ChapterDefinition]) -> Option<(u32, u32)> {
        let current = chapters.iter().find(|c| c.id == self.current_chapter)?;
        if self.current_stage < current.total_stages {
            self.current_stage += 1;
        } else {
            let next = self.current_chapter + 1;
            if !chapters.iter().any(|c| c.id == next) || !self.is_chapter_unlocked(next) {
                return None;
            }
            self.current_chapter = next;
            self.current_stage = 1;
        }
        Some((self.current_chapter, self.current_stage))
    }

    /// Add tech debt to the lifetime total. Negative deltas are ignored.
    pub fn record_tech_debt(&mut self, delta: i32) {
        if delta > 0 {
            self.totals.tech_debt_total += delta as u64;
        }
    }

    pub fn add_play_time(&mut self, seconds: u64) {
        self.totals.play_time_seconds += seconds;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::chapters::builtin_chapters;

    fn record(turns: u32) -> StageRecord {
        StageRecord {
            turns,
            damage_taken: 10,
            tech_debt: 1,
        }
    }

    #[test]
    fn test_new_state() {
        let state = ProgressionState::new();
        assert_eq!((state.current_chapter, state.current_stage), (1, 1));
        assert!(state.is_chapter_unlocked(1));
        assert!(!state.is_chapter_unlocked(2));
    }

    #[test]
    fn test_best_record_kept() {
        let chapters = builtin_chapters();
        let mut state = ProgressionState::new();
        assert!(state.complete_stage(1, 1, record(8), &chapters).new_best);
        assert!(!state.complete_stage(1, 1, record(9), &chapters).new_best);
        assert!(state.complete_stage(1, 1, record(5), &chapters).new_best);
        assert_eq!(state.best_record(1, 1).map(|r| r.turns), Some(5));
        assert_eq!(state.totals.monsters_defeated, 3);
        assert_eq!(state.totals.tech_debt_total, 3);
    }

    #[test]
    fn test_final_stage_completes_and_unlocks_once() {
        let chapters = builtin_chapters();
        let mut state = ProgressionState::new();
        for stage in 1..4 {
            let c = state.complete_stage(1, stage, record(5), &chapters);
            assert!(!c.chapter_completed);
            assert_eq!(c.unlocked_chapter, None);
        }

        let c = state.complete_stage(1, 4, record(12), &chapters);
        assert!(c.chapter_completed);
        assert_eq!(c.unlocked_chapter, Some(2));
        let ch1 = state.chapter(1).unwrap();
        assert!(ch1.completed && ch1.boss_defeated);
        assert!(state.is_chapter_unlocked(2));

        let again = state.complete_stage(1, 4, record(10), &chapters);
        assert!(!again.chapter_completed);
        assert_eq!(again.unlocked_chapter, None);
    }

    #[test]
    fn test_advance_within_and_across_chapters() {
        let chapters = builtin_chapters();
        let mut state = ProgressionState::new();
        assert_eq!(state.advance(&chapters), Some((1, 2)));
        state.current_stage = 4;
        // Chapter 2 still locked
        assert_eq!(state.advance(&chapters), None);
        assert_eq!((state.current_chapter, state.current_stage), (1, 4));

        state.complete_stage(1, 4, record(5), &chapters);
        assert_eq!(state.advance(&chapters), Some((2, 1)));
    }

    #[test]
    fn test_advance_stops_at_final_stage() {
        let chapters = builtin_chapters();
        let mut state = ProgressionState::new();
        for ch in &chapters {
            state.complete_stage(ch.id, ch.total_stages, record(5), &chapters);
        }
        state.current_chapter = 4;
        state.current_stage = 5;
        assert_eq!(state.advance(&chapters), None);
        assert_eq!((state.current_chapter, state.current_stage), (4, 5));
        assert!(state.is_chapter_completed(4));
    }

    #[test]
    fn test_tech_debt_and_play_time() {
        let mut state = ProgressionState::new();
        state.record_tech_debt(7);
        state.record_tech_debt(-3);
        state.add_play_time(90);
        state.add_play_time(30);
        assert_eq!(state.totals.tech_debt_total, 7);
        assert_eq!(state.totals.play_time_seconds, 120);
    }
}
