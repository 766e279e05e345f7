//! Balance constants and pure combat formulas.

pub mod balance;
pub mod combat_math;

pub use balance::*;
pub use combat_math::*;
