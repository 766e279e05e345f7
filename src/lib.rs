//! Bug Slayer - combat and progression engine
//!
//! Turn-based battles between developer classes and software bugs, the
//! enemy AI that drives them, EXP and chapter progression, random events
//! between stages, and a headless balance simulator.

pub mod character;
pub mod combat;
pub mod core;
pub mod data;
pub mod enemy;
pub mod events;
pub mod progression;
pub mod simulator;
