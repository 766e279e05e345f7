//! Turn-based combat: skills, the buff/status ledger, class passives and
//! the `Battle` that ties them together.

pub mod battle;
pub mod buffs;
pub mod passives;
pub mod skills;
pub mod types;

pub use battle::{Battle, BattleOutcome, BattleRewards, BattleStats, TurnReport};
pub use buffs::{ActiveEffect, BuffLedger, StatusCondition};
pub use passives::{PassiveKind, PassiveState};
pub use skills::{SkillContext, SkillFailure, SkillOutcome, SkillResolver};
pub use types::{BaseStats, EffectTag, Side, Stat, StatusKind};
