//! Rolling and applying inter-stage events.

use rand::Rng;

use super::types::{EventEffect, GameEvent, PendingEffect};
use crate::character::Player;
use crate::core::balance::{percent_of, EVENT_TRIGGER_CHANCE};
use crate::data::classes::ClassDefinition;
use crate::progression::{LevelUpReport, ProgressionState};

/// The state an event is allowed to change.
pub struct EventContext<'a> {
    pub player: &'a mut Player,
    pub class: &'a ClassDefinition,
    pub progression: &'a mut ProgressionState,
}

/// Result of applying an event (or one of its choices).
#[derive(Debug, Clone, PartialEq)]
pub struct EventOutcome {
    pub event_id: String,
    /// Flavor text of the chosen option, for choice events.
    pub result_text: Option<String>,
    pub lines: Vec<String>,
    /// Buffs and debuffs to install when the next battle starts.
    pub pending: Vec<PendingEffect>,
    pub level_up: Option<LevelUpReport>,
}

impl EventOutcome {
    fn new(event: &GameEvent) -> Self {
        Self {
            event_id: event.id.clone(),
            result_text: None,
            lines: Vec::new(),
            pending: Vec::new(),
            level_up: None,
        }
    }
}

/// A choice event waiting for the player's pick.
///
/// Consumed by [`PendingChoice::choose`], so its effects can only apply once.
#[derive(Debug)]
#[must_use = "a pending choice does nothing until an option is chosen"]
pub struct PendingChoice<'e> {
    event: &'e GameEvent,
}

impl<'e> PendingChoice<'e> {
    pub fn event(&self) -> &'e GameEvent {
        self.event
    }

    pub fn options(&self) -> Vec<&'e str> {
        self.event
            .choices
            .iter()
            .map(|c| c.label.as_str())
            .collect()
    }

    /// Apply option `index`. An out-of-range index hands the choice back
    /// unapplied.
    pub fn choose(
        self,
        index: usize,
        ctx: &mut EventContext<'_>,
    ) -> Result<EventOutcome, PendingChoice<'e>> {
        let Some(choice) = self.event.choices.get(index) else {
            return Err(self);
        };
        let mut outcome = EventOutcome::new(self.event);
        outcome.result_text = Some(choice.result_text.clone());
        outcome.lines.push(choice.result_text.clone());
        apply_effects(&choice.effects, ctx, &mut outcome);
        tracing::debug!(event = %self.event.id, choice = %choice.label, "event choice applied");
        Ok(outcome)
    }
}

pub enum EventStart<'e> {
    /// Auto event, already applied.
    Applied(EventOutcome),
    PendingChoice(PendingChoice<'e>),
}

pub struct EventResolver<'e> {
    catalog: &'e [GameEvent],
    trigger_chance: f64,
}

impl<'e> EventResolver<'e> {
    pub fn new(catalog: &'e [GameEvent]) -> Self {
        Self {
            catalog,
            trigger_chance: EVENT_TRIGGER_CHANCE,
        }
    }

    /// Override the trigger gate (0.0-1.0).
    pub fn with_trigger_chance(mut self, chance: f64) -> Self {
        self.trigger_chance = chance.clamp(0.0, 1.0);
        self
    }

    /// At most one event per stage boundary: a single gate roll, then a
    /// weighted pick from the catalog.
    pub fn roll(&self, rng: &mut impl Rng) -> Option<&'e GameEvent> {
        if rng.gen::<f64>() >= self.trigger_chance {
            return None;
        }
        let total: u64 = self.catalog.iter().map(|e| e.weight as u64).sum();
        if total == 0 {
            return None;
        }

        let mut roll = rng.gen_range(0..total);
        for event in self.catalog {
            let weight = event.weight as u64;
            if roll < weight {
                tracing::debug!(event = %event.id, "event triggered");
                return Some(event);
            }
            roll -= weight;
        }
        None
    }

    /// Start an event: auto events apply now, choice events wait for a pick.
    pub fn begin(event: &'e GameEvent, ctx: &mut EventContext<'_>) -> EventStart<'e> {
        if event.is_choice() {
            return EventStart::PendingChoice(PendingChoice { event });
        }
        let mut outcome = EventOutcome::new(event);
        outcome.lines.push(event.description.clone());
        apply_effects(&event.effects, ctx, &mut outcome);
        EventStart::Applied(outcome)
    }
}

fn apply_effects(effects: &[EventEffect], ctx: &mut EventContext<'_>, outcome: &mut EventOutcome) {
    for effect in effects {
        let player = &mut *ctx.player;
        match effect {
            EventEffect::Heal { percent } => {
                let c = &mut player.combatant;
                let healed = c.heal(percent_of(c.max_hp, *percent));
                outcome.lines.push(format!("Recovered {} HP", healed));
            }
            EventEffect::Damage { percent } => {
                let c = &mut player.combatant;
                let amount = percent_of(c.max_hp, *percent).min(c.hp.saturating_sub(1));
                let lost = c.take_damage(amount);
                outcome.lines.push(format!("Lost {} HP", lost));
            }
            EventEffect::RestoreMp { percent } => {
                let c = &mut player.combatant;
                let restored = c.restore_mp(percent_of(c.max_mp, *percent));
                outcome.lines.push(format!("Recovered {} MP", restored));
            }
            EventEffect::Gold { amount } if *amount >= 0 => {
                player.gold += *amount as u64;
                outcome.lines.push(format!("Gained {} gold", amount));
            }
            EventEffect::Gold { amount } => {
                let lost = player.spend_gold(amount.unsigned_abs());
                outcome.lines.push(format!("Lost {} gold", lost));
            }
            EventEffect::GoldMultiplier { multiplier } => {
                player.gold_multiplier = multiplier.max(0.0);
                outcome
                    .lines
                    .push(format!("Next gold reward x{:.1}", multiplier));
            }
            EventEffect::TechDebt { delta } => {
                let applied = player.add_tech_debt(*delta);
                ctx.progression.record_tech_debt(applied);
                outcome.lines.push(format!("Tech debt {:+}", applied));
            }
            EventEffect::Exp { amount } => {
                let report = player.add_exp(*amount, ctx.class);
                outcome.lines.push(format!("Gained {} EXP", amount));
                if report.leveled_up() {
                    outcome
                        .lines
                        .push(format!("Level up! Now level {}", report.new_level));
                }
                outcome.level_up = Some(report);
            }
            EventEffect::TempBuff {
                stat,
                value,
                duration,
            } => {
                outcome.pending.push(PendingEffect {
                    stat: *stat,
                    value: *value,
                    duration: *duration,
                });
                outcome.lines.push(format!(
                    "{} {:+} for the next battle ({} turns)",
                    stat, value, duration
                ));
            }
            EventEffect::Unknown => {
                tracing::warn!(event = %outcome.event_id, "ignoring unknown event effect type");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::types::Stat;
    use crate::data::GameData;
    use crate::events::types::EventChoice;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn fixture() -> (ClassDefinition, Player, ProgressionState) {
        let class = GameData::builtin().class("debugger").cloned().unwrap();
        let player = Player::new("T", &class);
        (class, player, ProgressionState::new())
    }

    fn auto(effects: Vec<EventEffect>) -> GameEvent {
        GameEvent {
            id: "test".to_string(),
            title: "Test".to_string(),
            description: "A test event".to_string(),
            weight: 1,
            effects,
            choices: Vec::new(),
        }
    }

    #[test]
    fn test_gate_rate_roughly_thirty_percent() {
        let data = GameData::builtin();
        let resolver = EventResolver::new(data.events());
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let fired = (0..10_000).filter(|_| resolver.roll(&mut rng).is_some()).count();
        assert!((2700..3300).contains(&fired), "fired {} times", fired);
    }

    #[test]
    fn test_zero_chance_never_fires() {
        let data = GameData::builtin();
        let resolver = EventResolver::new(data.events()).with_trigger_chance(0.0);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!((0..100).all(|_| resolver.roll(&mut rng).is_none()));
    }

    #[test]
    fn test_auto_event_applies_immediately() {
        let (class, mut player, mut progression) = fixture();
        player.combatant.hp = 50;
        let event = auto(vec![
            EventEffect::Heal { percent: 30.0 },
            EventEffect::TechDebt { delta: 10 },
            EventEffect::Unknown,
        ]);
        let mut ctx = EventContext {
            player: &mut player,
            class: &class,
            progression: &mut progression,
        };
        match EventResolver::begin(&event, &mut ctx) {
            EventStart::Applied(outcome) => assert_eq!(outcome.event_id, "test"),
            EventStart::PendingChoice(_) => panic!("auto event should apply"),
        }
        assert_eq!(player.combatant.hp, 80);
        assert_eq!(player.tech_debt, 10);
        assert_eq!(progression.totals.tech_debt_total, 10);
    }

    #[test]
    fn test_damage_never_kills() {
        let (class, mut player, mut progression) = fixture();
        player.combatant.hp = 5;
        let event = auto(vec![EventEffect::Damage { percent: 50.0 }]);
        let mut ctx = EventContext {
            player: &mut player,
            class: &class,
            progression: &mut progression,
        };
        let _ = EventResolver::begin(&event, &mut ctx);
        assert_eq!(player.combatant.hp, 1);
    }

    #[test]
    fn test_gold_multiplier_replaced_and_consumed() {
        let (class, mut player, mut progression) = fixture();
        let event = auto(vec![
            EventEffect::GoldMultiplier { multiplier: 2.0 },
            EventEffect::GoldMultiplier { multiplier: 1.5 },
            EventEffect::Gold { amount: -20 },
        ]);
        let mut ctx = EventContext {
            player: &mut player,
            class: &class,
            progression: &mut progression,
        };
        let _ = EventResolver::begin(&event, &mut ctx);
        assert_eq!(player.gold, 0);
        assert_eq!(player.award_gold(100), 150);
        assert_eq!(player.award_gold(100), 100);
    }

    #[test]
    fn test_choice_applies_exactly_once() {
        let (class, mut player, mut progression) = fixture();
        let event = GameEvent {
            choices: vec![
                EventChoice {
                    label: "Buff".to_string(),
                    effects: vec![EventEffect::TempBuff {
                        stat: Stat::Atk,
                        value: 4,
                        duration: 2,
                    }],
                    result_text: "Stronger".to_string(),
                },
                EventChoice {
                    label: "Learn".to_string(),
                    effects: vec![EventEffect::Exp { amount: 100 }],
                    result_text: "Wiser".to_string(),
                },
            ],
            ..auto(Vec::new())
        };
        let mut ctx = EventContext {
            player: &mut player,
            class: &class,
            progression: &mut progression,
        };

        let pending = match EventResolver::begin(&event, &mut ctx) {
            EventStart::PendingChoice(p) => p,
            EventStart::Applied(_) => panic!("choice event applied without a pick"),
        };
        assert_eq!(pending.options(), vec!["Buff", "Learn"]);

        let pending = pending.choose(7, &mut ctx).unwrap_err();
        let outcome = pending.choose(1, &mut ctx).unwrap();
        assert_eq!(outcome.result_text.as_deref(), Some("Wiser"));
        assert!(outcome.level_up.unwrap().leveled_up());
        assert!(outcome.pending.is_empty());
        assert_eq!(player.level(), 2);
    }

    #[test]
    fn test_temp_buff_queued() {
        let (class, mut player, mut progression) = fixture();
        let event = auto(vec![EventEffect::TempBuff {
            stat: Stat::Def,
            value: -2,
            duration: 2,
        }]);
        let mut ctx = EventContext {
            player: &mut player,
            class: &class,
            progression: &mut progression,
        };
        let EventStart::Applied(outcome) = EventResolver::begin(&event, &mut ctx) else {
            panic!("expected auto event");
        };
        assert_eq!(outcome.pending.len(), 1);
        assert!(!outcome.pending[0].is_buff());
    }
}
