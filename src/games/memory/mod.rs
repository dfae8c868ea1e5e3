//! Memory card pairs.
//!
//! All faces are shown during the preview, then hidden. Matching pairs stay
//! open; a mismatch costs a heart.

pub mod logic;
pub mod types;

pub use logic::*;
pub use types::*;
