//! Falling-object catcher.
//!
//! The player slides a basket along the bottom of the screen to catch gems
//! and crystals while dodging bombs. Objects fall faster and more often as the
//! run progresses.

pub mod logic;
pub mod types;

pub use logic::*;
pub use types::*;
