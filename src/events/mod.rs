//! Random inter-stage events.

pub mod resolver;
pub mod types;

pub use resolver::{EventContext, EventOutcome, EventResolver, EventStart, PendingChoice};
pub use types::{EventChoice, EventEffect, GameEvent, PendingEffect};
