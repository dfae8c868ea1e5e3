//! Match-3 candy board.

pub mod logic;
pub mod types;

pub use logic::*;
pub use types::*;
