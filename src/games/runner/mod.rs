//! Jetpack runner.
//!
//! The runner holds a fixed column while debris scrolls in from the right.
//! Tapping fires the jetpack against gravity; the runner can never leave the
//! playfield.

pub mod logic;
pub mod types;

pub use logic::*;
pub use types::*;
