//! Class passive abilities and their per-battle hook state.

use serde::{Deserialize, Serialize};

use crate::character::Combatant;
use crate::core::balance::percent_of;

/// A class passive, as configured in content data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PassiveKind {
    /// Every Nth attack deals bonus damage.
    EveryNthAttack { every: u32, bonus_percent: f64 },
    /// Damage taken is reduced while HP is below a threshold.
    LowHpDamageReduction {
        hp_below_percent: f64,
        reduction_percent: f64,
    },
    /// Once per battle, survive a lethal blow and come back with some HP.
    AutoRevive { hp_percent: f64 },
    /// Extra MP regenerated each turn (percent of max MP).
    MpRegenBonus { percent: f64 },
    #[serde(other)]
    Unknown,
}

impl PassiveKind {
    pub fn describe(&self) -> String {
        match self {
            PassiveKind::EveryNthAttack {
                every,
                bonus_percent,
            } => format!("Every {} attacks deal +{:.0}% damage", every, bonus_percent),
            PassiveKind::LowHpDamageReduction {
                hp_below_percent,
                reduction_percent,
            } => format!(
                "Take {:.0}% less damage below {:.0}% HP",
                reduction_percent, hp_below_percent
            ),
            PassiveKind::AutoRevive { hp_percent } => {
                format!("Revive once at {:.0}% HP", hp_percent)
            }
            PassiveKind::MpRegenBonus { percent } => {
                format!("+{:.0}% MP regeneration per turn", percent)
            }
            PassiveKind::Unknown => "No effect".to_string(),
        }
    }
}

/// Per-battle passive bookkeeping for one combatant.
#[derive(Debug, Clone, Default)]
pub struct PassiveState {
    kind: Option<PassiveKind>,
    attacks_made: u32,
    revive_used: bool,
}

impl PassiveState {
    pub fn new(kind: Option<PassiveKind>) -> Self {
        if let Some(PassiveKind::Unknown) = kind {
            tracing::warn!("unrecognized passive ability; ignoring");
        }
        Self {
            kind,
            attacks_made: 0,
            revive_used: false,
        }
    }

    /// Count one outgoing attack and return its damage multiplier.
    pub fn next_attack_modifier(&mut self) -> f64 {
        self.attacks_made += 1;
        match self.kind {
            Some(PassiveKind::EveryNthAttack {
                every,
                bonus_percent,
            }) if every > 0 && self.attacks_made % every == 0 => 1.0 + bonus_percent / 100.0,
            _ => 1.0,
        }
    }

    /// Multiplier for damage the owner is about to take.
    pub fn incoming_modifier(&self, owner: &Combatant) -> f64 {
        match self.kind {
            Some(PassiveKind::LowHpDamageReduction {
                hp_below_percent,
                reduction_percent,
            }) if owner.hp_percent() < hp_below_percent => {
                (1.0 - reduction_percent / 100.0).max(0.0)
            }
            _ => 1.0,
        }
    }

    /// Revive the owner if it just died and the passive is still available.
    pub fn try_revive(&mut self, owner: &mut Combatant) -> bool {
        if owner.is_alive() || self.revive_used {
            return false;
        }
        match self.kind {
            Some(PassiveKind::AutoRevive { hp_percent }) => {
                self.revive_used = true;
                let hp = percent_of(owner.max_hp, hp_percent).max(1);
                owner.heal(hp);
                tracing::debug!(owner = %owner.name, hp, "auto-revive triggered");
                true
            }
            _ => false,
        }
    }

    pub fn extra_mp_regen_percent(&self) -> f64 {
        match self.kind {
            Some(PassiveKind::MpRegenBonus { percent }) => percent,
            _ => 0.0,
        }
    }

    pub fn attacks_made(&self) -> u32 {
        self.attacks_made
    }

    pub fn revive_used(&self) -> bool {
        self.revive_used
    }
}
