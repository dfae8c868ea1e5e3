//! Shared mini-game machinery: session, clocks, entities, collision, scoring.

pub mod clock;
pub mod collision;
pub mod config;
pub mod constants;
pub mod engine;
pub mod entity;
pub mod frame;
pub mod scoring;
pub mod session;
pub mod spawner;

pub use config::{ArcadeConfig, Currency, GameConfig};
pub use engine::{EngineEvent, RewardClaim, RewardStatus, SessionEngine};
pub use frame::Frame;
pub use session::{Session, SessionState, StartGate};
