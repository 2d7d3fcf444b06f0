//! Utilities module.
//!
//! - `clock`: Injectable time source for time-derived seeds.

pub mod clock;
