//! Galaxy Trader - mini-game session engine and reward economy.
//!
//! `core` holds the pieces every game shares (session state machine, clocks,
//! entities, collision, scoring, the per-session engine). `games` holds the
//! nine mini-games. `economy` and `identity` are the collaborators a host
//! needs to gate starts and pay rewards; `arcade` ties them together.

pub mod arcade;
pub mod autoplay;
pub mod core;
pub mod economy;
pub mod error;
pub mod games;
pub mod identity;
pub mod utils;

pub use arcade::Arcade;
pub use error::{AuthError, GameError, StoreError, Toast, ToastLevel};
pub use games::{GameId, GameInput};
