//! Asteroid shooter.
//!
//! A ship at the bottom of the screen tracks the pointer and fires upward at
//! asteroids drifting down. Large asteroids take several hits; chaining kills
//! builds a combo that a collision or a missed asteroid resets.

pub mod logic;
pub mod types;

pub use logic::*;
pub use types::*;
