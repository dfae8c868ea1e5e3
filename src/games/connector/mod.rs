//! Path connector ("connect the dots").
//!
//! Colored endpoint pairs sit on a grid; the player traces a path between each
//! pair without crossing other paths. Boards are routed at generation time so
//! every puzzle handed to the player has a solution.

pub mod generation;
pub mod logic;
pub mod types;

pub use generation::*;
pub use logic::*;
pub use types::*;
