use crate::character::Player;
use crate::core::balance::{MAX_LEVEL, XP_CURVE_BASE, XP_CURVE_EXPONENT};
use crate::data::classes::ClassDefinition;

/// EXP needed to advance from `level` to the next level.
pub fn exp_required_for_level(level: u32) -> u64 {
    (XP_CURVE_BASE * f64::powf(level as f64, XP_CURVE_EXPONENT)).floor() as u64
}

/// Result of one EXP award.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelUpReport {
    pub previous_level: u32,
    pub new_level: u32,
    /// EXP thrown away because the player is at the level cap.
    pub exp_discarded: u64,
}

impl LevelUpReport {
    pub fn unchanged(level: u32) -> Self {
        Self {
            previous_level: level,
            new_level: level,
            exp_discarded: 0,
        }
    }

    pub fn levels_gained(&self) -> u32 {
        self.new_level - self.previous_level
    }

    pub fn leveled_up(&self) -> bool {
        self.new_level > self.previous_level
    }
}

impl Player {
    /// Add EXP and process any level-ups.
    ///
    /// Each level applies the class growth once and fully restores HP and MP.
    /// At the level cap, remaining EXP is discarded.
    pub fn add_exp(&mut self, amount: u64, class: &ClassDefinition) -> LevelUpReport {
        let previous_level = self.level();
        if previous_level >= MAX_LEVEL {
            self.exp = 0;
            return LevelUpReport {
                exp_discarded: amount,
                ..LevelUpReport::unchanged(previous_level)
            };
        }

        self.exp = self.exp.saturating_add(amount);
        while self.level() < MAX_LEVEL {
            let needed = exp_required_for_level(self.level());
            if self.exp < needed {
                break;
            }
            self.exp -= needed;
            self.grow(&class.growth);
        }

        let mut exp_discarded = 0;
        if self.level() >= MAX_LEVEL {
            exp_discarded = self.exp;
            self.exp = 0;
        }

        let report = LevelUpReport {
            previous_level,
            new_level: self.level(),
            exp_discarded,
        };
        if report.leveled_up() {
            self.combatant.restore_full();
            tracing::debug!(
                player = %self.combatant.name,
                from = previous_level,
                to = report.new_level,
                "level up"
            );
        }
        report
    }

    /// EXP still needed for the next level, or 0 at the cap.
    pub fn exp_to_next_level(&self) -> u64 {
        if self.level() >= MAX_LEVEL {
            return 0;
        }
        exp_required_for_level(self.level()).saturating_sub(self.exp)
    }
}
