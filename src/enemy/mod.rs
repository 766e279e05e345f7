//! Enemy AI: behavior rules and boss phase handling.

pub mod behavior;
pub mod boss;

pub use behavior::{ActionKind, BehaviorContext, BehaviorRule, BehaviorTree, Condition, EnemyAction};
pub use boss::{
    phase_for_hp, visual_intensity, BossPhaseTracker, BossProfile, PhaseDialogue,
    PhaseTransition, PhaseWeight, VisualIntensity,
};
