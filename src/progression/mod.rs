//! Experience, chapter/stage progression and progression snapshots.

pub mod experience;
pub mod save;
pub mod stages;

pub use experience::{exp_required_for_level, LevelUpReport};
pub use save::{load_bytes, load_json, SaveError, SaveSnapshot};
pub use stages::{ChapterProgress, ProgressionState, ProgressionTotals, StageCompletion, StageRecord};
