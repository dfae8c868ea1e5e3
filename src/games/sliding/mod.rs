//! Sliding tile puzzle (15-puzzle).

pub mod logic;
pub mod types;

pub use logic::*;
pub use types::*;
