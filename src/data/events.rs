//! Built-in inter-stage event catalog.

use crate::combat::types::Stat;
use crate::events::types::{EventChoice, EventEffect, GameEvent};

fn auto(id: &str, title: &str, description: &str, effects: Vec<EventEffect>) -> GameEvent {
    GameEvent {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        weight: 1,
        effects,
        choices: Vec::new(),
    }
}

fn choice(label: &str, effects: Vec<EventEffect>, result_text: &str) -> EventChoice {
    EventChoice {
        label: label.to_string(),
        effects,
        result_text: result_text.to_string(),
    }
}

fn branching(id: &str, title: &str, description: &str, choices: Vec<EventChoice>) -> GameEvent {
    GameEvent {
        id: id.to_string(),
        title: title.to_string(),
        description: description.to_string(),
        weight: 1,
        effects: Vec::new(),
        choices,
    }
}

pub fn builtin_events() -> Vec<GameEvent> {
    vec![
        auto(
            "coffee-break",
            "Coffee Break",
            "A fresh pot in the break room. You feel recharged.",
            vec![
                EventEffect::Heal { percent: 30.0 },
                EventEffect::RestoreMp { percent: 30.0 },
            ],
        ),
        auto(
            "stack-overflow-answer",
            "Accepted Answer",
            "Someone already solved your exact problem in 2011.",
            vec![
                EventEffect::Exp { amount: 50 },
                EventEffect::TempBuff {
                    stat: Stat::Atk,
                    value: 3,
                    duration: 3,
                },
            ],
        ),
        auto(
            "prod-hotfix",
            "Friday Deploy",
            "A hotfix went out at 5pm. It did not go well.",
            vec![
                EventEffect::Damage { percent: 15.0 },
                EventEffect::TechDebt { delta: 10 },
            ],
        ),
        auto(
            "bug-bounty",
            "Bug Bounty",
            "Security pays out for the issue you reported last sprint.",
            vec![
                EventEffect::Gold { amount: 50 },
                EventEffect::GoldMultiplier { multiplier: 1.5 },
            ],
        ),
        branching(
            "code-review",
            "Code Review",
            "A senior engineer leaves 47 comments on your pull request.",
            vec![
                choice(
                    "Address every comment",
                    vec![
                        EventEffect::TechDebt { delta: -15 },
                        EventEffect::Damage { percent: 10.0 },
                    ],
                    "The codebase is cleaner. You are exhausted.",
                ),
                choice(
                    "Reply 'will fix in follow-up'",
                    vec![
                        EventEffect::TechDebt { delta: 10 },
                        EventEffect::TempBuff {
                            stat: Stat::Spd,
                            value: 2,
                            duration: 3,
                        },
                    ],
                    "Merged. The follow-up ticket will never be touched.",
                ),
            ],
        ),
        branching(
            "legacy-library",
            "Abandoned Dependency",
            "You find a library that does exactly what you need. Last commit: 2009.",
            vec![
                choice(
                    "Vendor it",
                    vec![
                        EventEffect::Gold { amount: 30 },
                        EventEffect::TechDebt { delta: 15 },
                    ],
                    "Works on the first try. For now.",
                ),
                choice(
                    "Write it yourself",
                    vec![
                        EventEffect::Exp { amount: 80 },
                        EventEffect::TempBuff {
                            stat: Stat::Def,
                            value: -2,
                            duration: 2,
                        },
                    ],
                    "You learned a lot, and you're a little slower for it.",
                ),
            ],
        ),
        branching(
            "on-call",
            "On-Call Page",
            "Your phone buzzes at 3am.",
            vec![
                choice(
                    "Fix it now",
                    vec![
                        EventEffect::Gold { amount: 40 },
                        EventEffect::Damage { percent: 20.0 },
                    ],
                    "Incident resolved. Overtime approved.",
                ),
                choice(
                    "Snooze",
                    vec![
                        EventEffect::Heal { percent: 20.0 },
                        EventEffect::TechDebt { delta: 20 },
                    ],
                    "You sleep well. The dashboard does not.",
                ),
            ],
        ),
    ]
}
