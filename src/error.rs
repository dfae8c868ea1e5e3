//! Error taxonomy shared by the engine, the economy layer and the host.
//!
//! Nothing in the start/reward path is allowed to escape as a panic: every
//! error converts into a [`Toast`] that the host shows to the player.

use crate::core::session::SessionState;
use crate::games::GameId;
use thiserror::Error;

/// Errors surfaced by the document store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("document store unavailable: {0}")]
    Unavailable(String),

    #[error("invalid document path: {0:?}")]
    InvalidPath(String),

    #[error("malformed document at {path}: {reason}")]
    Malformed { path: String, reason: String },

    #[error("could not persist store: {0}")]
    Persist(String),
}

/// Errors surfaced by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("an account already exists for {0}")]
    EmailInUse(String),

    #[error("wrong email or password")]
    InvalidCredentials,

    #[error("password must be at least {0} characters")]
    WeakPassword(usize),

    #[error("unsupported sign-in provider: {0}")]
    UnknownProvider(String),

    #[error("no user is signed in")]
    NoCurrentUser,
}

/// Errors raised by the mini-game engine and the reward protocol.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("sign in to play")]
    NotSignedIn,

    #[error("you already played {0} today, come back tomorrow")]
    DailyLimitReached(GameId),

    #[error("your reward could not be saved: {0}")]
    RewardCommitFailed(String),

    #[error("no solvable {game} board after {attempts} attempts")]
    GenerationExhausted { game: GameId, attempts: u32 },

    #[error("cannot {action} while the session is {state:?}")]
    InvalidAction {
        state: SessionState,
        action: &'static str,
    },

    #[error("simulation state corrupted: {0}")]
    CorruptState(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Severity of a user-facing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Warning,
    Error,
}

/// A short, non-fatal notification for the player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub level: ToastLevel,
    pub message: String,
    /// True when the host should offer a retry button.
    pub retryable: bool,
}

impl Toast {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: ToastLevel::Info,
            message: message.into(),
            retryable: false,
        }
    }
}

impl GameError {
    /// Convert into the notification shown to the player.
    pub fn to_toast(&self) -> Toast {
        let (level, retryable) = match self {
            GameError::NotSignedIn | GameError::DailyLimitReached(_) => (ToastLevel::Info, false),
            GameError::RewardCommitFailed(_) | GameError::Store(_) => (ToastLevel::Warning, true),
            GameError::GenerationExhausted { .. } | GameError::InvalidAction { .. } => {
                (ToastLevel::Warning, false)
            }
            GameError::CorruptState(_) => (ToastLevel::Error, false),
        };
        Toast {
            level,
            message: self.to_string(),
            retryable,
        }
    }
}
