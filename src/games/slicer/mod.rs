//! Fruit slicer.
//!
//! Fruit and bombs are tossed up from below the screen. A swipe leaves a short
//! trail; any fruit the trail passes close enough to is sliced.

pub mod logic;
pub mod types;

pub use logic::*;
pub use types::*;
