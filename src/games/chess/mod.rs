//! Chess against a bot.

pub mod logic;
pub mod types;

pub use logic::*;
pub use types::*;
