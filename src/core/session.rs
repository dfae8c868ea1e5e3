//! Per-run session state machine shared by every mini-game.
//!
//! ```text
//! Idle ──start──▶ Preview ──preview ends──▶ Playing
//!   ▲                                        │  │  │
//!   │                     goal / time+target │  │  │ lives 0 / time short
//!   │                                        ▼  │  ▼
//!   └──play again── Win ◀────────────────────┘  AdPrompt ──watch──▶ Playing
//!   └──play again── Lost ◀──────────decline──────┘
//! ```
//!
//! Counters only move while `Playing`. Transitions are evaluated by
//! [`Session::resolve_frame`] after scoring for the frame has been applied.

use crate::core::config::GameConfig;
use crate::error::GameError;
use crate::games::GameId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle state of a single mini-game run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    Idle,
    Preview,
    Playing,
    AdPrompt,
    Win,
    Lost,
}

impl SessionState {
    /// Win and Lost wait for "Play Again" or exit.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Win | Self::Lost)
    }
}

/// Result of the asynchronous start checks, resolved before `start` runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StartGate {
    /// Signed-in (and, when required, verified) user id.
    pub user_id: Option<String>,
    /// Ledger says this game was already rewarded today.
    pub played_today: bool,
}

/// Why the session entered `AdPrompt`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdReason {
    OutOfLives,
    OutOfTime,
}

/// One in-progress run of a single mini-game.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    pub game_id: GameId,
    pub state: SessionState,
    pub user_id: Option<String>,

    pub score: u32,
    pub target_score: u32,
    pub lives: u32,
    pub time_remaining_ms: u64,
    pub duration_ms: u64,

    /// Set while in `AdPrompt`.
    pub ad_reason: Option<AdReason>,
    pub ads_watched: u32,
    /// Number of times `AdPrompt` has been entered this run.
    pub ad_prompts: u32,

    config: GameConfig,
}

impl Session {
    pub fn new(game_id: GameId, config: GameConfig) -> Self {
        Self {
            id: Uuid::new_v4(),
            game_id,
            state: SessionState::Idle,
            user_id: None,
            score: 0,
            target_score: config.target_score,
            lives: config.hearts_start,
            time_remaining_ms: config.duration_ms,
            duration_ms: config.duration_ms,
            ad_reason: None,
            ads_watched: 0,
            ad_prompts: 0,
            config,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Idle → Preview/Playing. Errors leave the session untouched.
    pub fn start(&mut self, gate: &StartGate) -> Result<SessionState, GameError> {
        if self.state != SessionState::Idle {
            return Err(GameError::InvalidAction {
                state: self.state,
                action: "start",
            });
        }
        let Some(user_id) = gate.user_id.clone() else {
            return Err(GameError::NotSignedIn);
        };
        if gate.played_today {
            return Err(GameError::DailyLimitReached(self.game_id));
        }

        self.reset_counters();
        self.id = Uuid::new_v4();
        self.user_id = Some(user_id);
        self.state = if self.config.preview_ms > 0 {
            SessionState::Preview
        } else {
            SessionState::Playing
        };
        log::debug!("session {} ({}) -> {:?}", self.id, self.game_id, self.state);
        Ok(self.state)
    }

    /// Preview → Playing.
    pub fn finish_preview(&mut self) -> bool {
        if self.state != SessionState::Preview {
            return false;
        }
        self.state = SessionState::Playing;
        true
    }

    pub fn is_playing(&self) -> bool {
        self.state == SessionState::Playing
    }

    /// Add points. Ignored outside `Playing`; never decreases the score.
    pub fn add_score(&mut self, points: u32) {
        if self.is_playing() {
            self.score = self.score.saturating_add(points);
        }
    }

    /// Take one heart. Ignored outside `Playing`.
    pub fn lose_life(&mut self) {
        if self.is_playing() {
            self.lives = self.lives.saturating_sub(1);
        }
    }

    /// Drop every remaining heart (used by games with a single sudden-death loss).
    pub fn lose_all_lives(&mut self) {
        if self.is_playing() {
            self.lives = 0;
        }
    }

    pub fn goal_reached(&self) -> bool {
        self.score >= self.target_score
    }

    /// Fraction of the run completed, by score or by elapsed time, in [0, 1].
    pub fn progress(&self) -> f64 {
        let by_score = if self.target_score == 0 {
            1.0
        } else {
            self.score as f64 / self.target_score as f64
        };
        let by_time = if self.duration_ms == 0 {
            1.0
        } else {
            1.0 - self.time_remaining_ms as f64 / self.duration_ms as f64
        };
        by_score.max(by_time).clamp(0.0, 1.0)
    }

    /// Evaluate end-of-frame transitions. Win is checked before lives so a
    /// frame that both reaches the target and empties the hearts is a win.
    pub fn resolve_frame(&mut self) -> Option<SessionState> {
        if !self.is_playing() {
            return None;
        }
        if self.goal_reached() {
            return Some(self.transition(SessionState::Win));
        }
        if self.lives == 0 {
            return Some(self.offer_ad(AdReason::OutOfLives));
        }
        None
    }

    /// Apply one countdown second. Returns the new state if time ran out.
    pub fn tick_second(&mut self, interval_ms: u64) -> Option<SessionState> {
        if !self.is_playing() {
            return None;
        }
        self.time_remaining_ms = self.time_remaining_ms.saturating_sub(interval_ms);
        if self.time_remaining_ms > 0 {
            return None;
        }
        if self.goal_reached() {
            Some(self.transition(SessionState::Win))
        } else {
            Some(self.offer_ad(AdReason::OutOfTime))
        }
    }

    fn offer_ad(&mut self, reason: AdReason) -> SessionState {
        if self.ads_watched >= self.config.max_ads {
            return self.transition(SessionState::Lost);
        }
        self.ad_reason = Some(reason);
        self.ad_prompts += 1;
        self.transition(SessionState::AdPrompt)
    }

    /// AdPrompt → Playing with the configured bonus time or hearts.
    pub fn watch_ad(&mut self) -> Result<(), GameError> {
        if self.state != SessionState::AdPrompt {
            return Err(GameError::InvalidAction {
                state: self.state,
                action: "watch an ad",
            });
        }
        match self.ad_reason.take() {
            Some(AdReason::OutOfLives) => {
                self.lives = self.config.ad_restore_hearts.max(1);
            }
            Some(AdReason::OutOfTime) | None => {
                self.time_remaining_ms = self.config.ad_bonus_ms.max(1000);
            }
        }
        self.ads_watched += 1;
        self.transition(SessionState::Playing);
        Ok(())
    }

    /// AdPrompt → Lost.
    pub fn decline_ad(&mut self) -> Result<(), GameError> {
        if self.state != SessionState::AdPrompt {
            return Err(GameError::InvalidAction {
                state: self.state,
                action: "decline the ad",
            });
        }
        self.ad_reason = None;
        self.transition(SessionState::Lost);
        Ok(())
    }

    /// Win/Lost → Idle with counters reset.
    pub fn play_again(&mut self) -> Result<(), GameError> {
        if !self.state.is_terminal() {
            return Err(GameError::InvalidAction {
                state: self.state,
                action: "play again",
            });
        }
        self.reset_counters();
        self.transition(SessionState::Idle);
        Ok(())
    }

    /// Force the session back to Idle after a simulation fault.
    pub fn abort(&mut self) {
        self.reset_counters();
        self.transition(SessionState::Idle);
    }

    fn reset_counters(&mut self) {
        self.score = 0;
        self.target_score = self.config.target_score;
        self.lives = self.config.hearts_start;
        self.time_remaining_ms = self.config.duration_ms;
        self.duration_ms = self.config.duration_ms;
        self.ad_reason = None;
        self.ads_watched = 0;
        self.ad_prompts = 0;
    }

    fn transition(&mut self, next: SessionState) -> SessionState {
        if self.state != next {
            log::debug!("session {} ({}): {:?} -> {:?}", self.id, self.game_id, self.state, next);
            self.state = next;
        }
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catcher_session() -> Session {
        Session::new(GameId::Catcher, GameConfig::for_game(GameId::Catcher))
    }

    fn signed_in() -> StartGate {
        StartGate {
            user_id: Some("u1".to_string()),
            played_today: false,
        }
    }

    #[test]
    fn test_start_requires_user() {
        let mut session = catcher_session();
        let err = session.start(&StartGate::default()).unwrap_err();
        assert_eq!(err, GameError::NotSignedIn);
        assert_eq!(session.state, SessionState::Idle);
        assert!(session.user_id.is_none());
    }

    #[test]
    fn test_start_blocked_when_played_today() {
        let mut session = catcher_session();
        let gate = StartGate {
            played_today: true,
            ..signed_in()
        };
        let err = session.start(&gate).unwrap_err();
        assert_eq!(err, GameError::DailyLimitReached(GameId::Catcher));
        assert_eq!(session.state, SessionState::Idle);
        assert!(session.user_id.is_none());
    }

    #[test]
    fn test_start_goes_to_preview_when_configured() {
        let mut config = GameConfig::for_game(GameId::Catcher);
        config.preview_ms = 1500;
        let mut session = Session::new(GameId::Catcher, config);
        assert_eq!(session.start(&signed_in()).unwrap(), SessionState::Preview);
        assert!(session.finish_preview());
        assert!(session.is_playing());
    }

    #[test]
    fn test_counters_frozen_outside_playing() {
        let mut session = catcher_session();
        session.add_score(10);
        session.lose_life();
        assert_eq!(session.score, 0);
        assert_eq!(session.lives, 3);
    }

    #[test]
    fn test_zero_lives_prompts_ad_once() {
        let mut session = catcher_session();
        session.start(&signed_in()).unwrap();
        for _ in 0..3 {
            session.lose_life();
        }
        assert_eq!(session.resolve_frame(), Some(SessionState::AdPrompt));
        assert_eq!(session.resolve_frame(), None);
        session.lose_life();
        assert_eq!(session.resolve_frame(), None);
        assert_eq!(session.ad_prompts, 1);
        assert_eq!(session.ad_reason, Some(AdReason::OutOfLives));
    }

    #[test]
    fn test_watch_ad_restores_hearts() {
        let mut session = catcher_session();
        session.start(&signed_in()).unwrap();
        session.lose_all_lives();
        session.resolve_frame();
        session.watch_ad().unwrap();
        assert!(session.is_playing());
        assert_eq!(session.lives, session.config().ad_restore_hearts);
    }

    #[test]
    fn test_second_zero_lives_after_ad_ends_in_lost() {
        let mut session = catcher_session();
        session.start(&signed_in()).unwrap();
        session.lose_all_lives();
        session.resolve_frame();
        session.watch_ad().unwrap();
        session.lose_all_lives();
        assert_eq!(session.resolve_frame(), Some(SessionState::Lost));
    }

    #[test]
    fn test_time_up_below_target_prompts_ad() {
        let mut session = catcher_session();
        session.start(&signed_in()).unwrap();
        session.time_remaining_ms = 1000;
        assert_eq!(session.tick_second(1000), Some(SessionState::AdPrompt));
        session.watch_ad().unwrap();
        assert_eq!(session.time_remaining_ms, session.config().ad_bonus_ms);
    }

    #[test]
    fn test_time_up_at_target_wins() {
        let mut session = catcher_session();
        session.start(&signed_in()).unwrap();
        session.score = session.target_score;
        session.time_remaining_ms = 500;
        assert_eq!(session.tick_second(1000), Some(SessionState::Win));
    }

    #[test]
    fn test_goal_beats_empty_hearts_in_same_frame() {
        let mut session = catcher_session();
        session.start(&signed_in()).unwrap();
        session.add_score(80);
        session.lose_all_lives();
        assert_eq!(session.resolve_frame(), Some(SessionState::Win));
    }

    #[test]
    fn test_decline_then_play_again() {
        let mut session = catcher_session();
        session.start(&signed_in()).unwrap();
        session.add_score(12);
        session.lose_all_lives();
        session.resolve_frame();
        session.decline_ad().unwrap();
        assert_eq!(session.state, SessionState::Lost);
        session.play_again().unwrap();
        assert_eq!(session.state, SessionState::Idle);
        assert_eq!(session.score, 0);
        assert_eq!(session.lives, 3);
    }

    #[test]
    fn test_invalid_actions_rejected() {
        let mut session = catcher_session();
        assert!(session.watch_ad().is_err());
        assert!(session.decline_ad().is_err());
        assert!(session.play_again().is_err());
        session.start(&signed_in()).unwrap();
        assert!(matches!(
            session.start(&signed_in()),
            Err(GameError::InvalidAction { .. })
        ));
    }

    #[test]
    fn test_progress_monotonic_inputs() {
        let mut session = catcher_session();
        session.start(&signed_in()).unwrap();
        assert_eq!(session.progress(), 0.0);
        session.add_score(40);
        assert!((session.progress() - 0.5).abs() < 1e-9);
        session.time_remaining_ms = 0;
        assert_eq!(session.progress(), 1.0);
    }
}
