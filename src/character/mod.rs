//! Player and monster combatant state.

pub mod combatant;
pub mod player;

pub use combatant::Combatant;
pub use player::Player;
