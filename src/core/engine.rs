//! Per-session engine: owns the session, the mounted game, both clocks and
//! the session RNG, and fixes the order in which a frame is processed.
//!
//! Frame order:
//! 1. preview expiry
//! 2. clock dt (clamped)
//! 3. game step: integrate, then collisions, then scoring
//! 4. state invariants (non-finite state aborts to Idle)
//! 5. win check, then lives check
//! 6. countdown ticks
//! 7. clocks paused when the session left `Playing`

use crate::core::clock::{CountdownTimer, SimulationClock};
use crate::core::config::{Currency, GameConfig};
use crate::core::constants::COUNTDOWN_INTERVAL_MS;
use crate::core::frame::Frame;
use crate::core::session::{Session, SessionState, StartGate};
use crate::economy::reward::AwardOutcome;
use crate::error::{GameError, Toast};
use crate::games::{ActiveGame, GameId, GameInput};
use rand::rngs::StdRng;
use rand::SeedableRng;
use uuid::Uuid;

/// Everything the reward commit needs, captured at the moment of the win.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewardClaim {
    pub session_id: Uuid,
    pub user_id: String,
    pub game_id: GameId,
    pub score: u32,
    pub reward_amount: u64,
    pub xp_amount: u64,
    pub currency: Currency,
}

/// Progress of the single reward commit a session may trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RewardStatus {
    NotDue,
    /// `RewardDue` was emitted; waiting for the host's result.
    Pending,
    Committed { amount: u64 },
    AlreadyRewarded,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    StateChanged { from: SessionState, to: SessionState },
    /// Emitted once per session, on entering `Win`.
    RewardDue(RewardClaim),
    /// The simulation hit corrupted state and was reset to Idle.
    Aborted(GameError),
}

pub struct SessionEngine {
    pub session: Session,
    pub game: ActiveGame,
    clock: SimulationClock,
    countdown: CountdownTimer,
    preview_until: Option<u64>,
    rng: StdRng,
    reward: RewardStatus,
    mounted: bool,
}

impl SessionEngine {
    pub fn new(game_id: GameId, config: GameConfig, max_step_ms: u64, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let game = ActiveGame::new(game_id, &mut rng);
        Self {
            session: Session::new(game_id, config),
            game,
            clock: SimulationClock::new(max_step_ms),
            countdown: CountdownTimer::new(COUNTDOWN_INTERVAL_MS),
            preview_until: None,
            rng,
            reward: RewardStatus::NotDue,
            mounted: true,
        }
    }

    pub fn game_id(&self) -> GameId {
        self.session.game_id
    }

    pub fn state(&self) -> SessionState {
        self.session.state
    }

    pub fn reward_status(&self) -> &RewardStatus {
        &self.reward
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Simulated milliseconds since play began.
    pub fn simulated_ms(&self) -> u64 {
        self.clock.simulated_ms
    }

    /// Begin a run once the async start checks have resolved into `gate`.
    pub fn start(&mut self, gate: &StartGate, now_ms: u64) -> Result<SessionState, GameError> {
        if !self.mounted {
            return Err(GameError::InvalidAction {
                state: self.session.state,
                action: "start an unmounted game",
            });
        }
        let state = self.session.start(gate)?;
        self.reward = RewardStatus::NotDue;
        log::info!("starting {} session {}", self.game_id(), self.session.id);
        match state {
            SessionState::Preview => {
                self.preview_until = Some(now_ms.saturating_add(self.session.config().preview_ms));
            }
            _ => self.start_clocks(now_ms),
        }
        Ok(state)
    }

    fn start_clocks(&mut self, now_ms: u64) {
        self.clock.start(now_ms);
        self.countdown.start(now_ms);
    }

    fn stop_clocks(&mut self) {
        self.clock.pause();
        self.countdown.stop();
    }

    /// Process one host frame at `now_ms`.
    pub fn frame(&mut self, now_ms: u64) -> Vec<EngineEvent> {
        let mut events = Vec::new();
        if !self.mounted {
            return events;
        }
        let before = self.session.state;

        // 1. Preview expiry
        if let Some(until) = self.preview_until {
            if now_ms >= until && self.session.finish_preview() {
                self.preview_until = None;
                self.start_clocks(now_ms);
            }
        }

        if self.session.is_playing() {
            // 2. Clamped dt
            if let Some(dt) = self.clock.advance(now_ms) {
                // 3. Integrate, collide, score
                self.game.step(dt, &mut self.session, &mut self.rng);

                // 4. Invariants
                if let Err(err) = self.game.validate() {
                    self.abort(err, &mut events);
                    return events;
                }

                // 5. Win before lives
                self.session.resolve_frame();

                // 6. Countdown
                let ticks = self.countdown.poll(now_ms);
                for _ in 0..ticks {
                    if self.session.tick_second(self.countdown.interval_ms()).is_some() {
                        break;
                    }
                }
            }
        }

        // 7. Suspend on leaving Playing
        let after = self.session.state;
        if after != SessionState::Playing && (self.clock.is_running() || self.countdown.is_running()) {
            self.stop_clocks();
        }
        self.push_transition(before, &mut events);
        events
    }

    fn push_transition(&mut self, before: SessionState, events: &mut Vec<EngineEvent>) {
        let after = self.session.state;
        if before == after {
            return;
        }
        events.push(EngineEvent::StateChanged {
            from: before,
            to: after,
        });
        if after == SessionState::Win && self.reward == RewardStatus::NotDue {
            if let Some(claim) = self.claim() {
                self.reward = RewardStatus::Pending;
                events.push(EngineEvent::RewardDue(claim));
            }
        }
    }

    fn claim(&self) -> Option<RewardClaim> {
        let config = self.session.config();
        Some(RewardClaim {
            session_id: self.session.id,
            user_id: self.session.user_id.clone()?,
            game_id: self.session.game_id,
            score: self.session.score,
            reward_amount: config.reward_amount,
            xp_amount: config.xp_amount,
            currency: config.currency,
        })
    }

    fn abort(&mut self, err: GameError, events: &mut Vec<EngineEvent>) {
        log::error!("aborting {} session {}: {}", self.game_id(), self.session.id, err);
        let before = self.session.state;
        self.stop_clocks();
        self.preview_until = None;
        self.session.abort();
        self.game = ActiveGame::new(self.game_id(), &mut self.rng);
        self.reward = RewardStatus::NotDue;
        events.push(EngineEvent::Aborted(err));
        events.push(EngineEvent::StateChanged {
            from: before,
            to: self.session.state,
        });
    }

    /// Feed player input. Ignored unless the session is playing.
    pub fn input(&mut self, input: GameInput) -> bool {
        if !self.mounted || !self.session.is_playing() {
            return false;
        }
        self.game.input(input, &mut self.session, &mut self.rng)
    }

    /// AdPrompt → Playing. Clocks re-anchor at `now_ms` so the time spent on
    /// the prompt never reaches the simulation.
    pub fn watch_ad(&mut self, now_ms: u64) -> Result<(), GameError> {
        self.session.watch_ad()?;
        self.clock.resume(now_ms);
        self.countdown.start(now_ms);
        Ok(())
    }

    pub fn decline_ad(&mut self) -> Result<(), GameError> {
        self.session.decline_ad()
    }

    /// Win/Lost → Idle with a fresh board.
    pub fn play_again(&mut self) -> Result<(), GameError> {
        self.session.play_again()?;
        self.stop_clocks();
        self.preview_until = None;
        self.game = ActiveGame::new(self.game_id(), &mut self.rng);
        self.reward = RewardStatus::NotDue;
        Ok(())
    }

    /// Unmount: cancel both clocks. Later frames and inputs are ignored.
    pub fn exit(&mut self) {
        self.stop_clocks();
        self.preview_until = None;
        self.mounted = false;
        log::debug!("{} session {} unmounted", self.game_id(), self.session.id);
    }

    /// Record how the reward commit ended. The session stays in `Win` either
    /// way; the returned toast tells the player what happened.
    pub fn reward_result(&mut self, result: Result<AwardOutcome, GameError>) -> Toast {
        match result {
            Ok(AwardOutcome::Granted { amount, .. }) => {
                self.reward = RewardStatus::Committed { amount };
                let currency = self.session.config().currency.field();
                Toast::info(format!("You earned {amount} {currency}!"))
            }
            Ok(AwardOutcome::AlreadyRewarded) => {
                self.reward = RewardStatus::AlreadyRewarded;
                GameError::DailyLimitReached(self.game_id()).to_toast()
            }
            Err(err) => {
                self.reward = RewardStatus::Failed(err.to_string());
                err.to_toast()
            }
        }
    }

    /// Re-issue the claim after a failed commit. `None` unless the session is
    /// still in `Win` with a failed reward.
    pub fn retry_claim(&mut self) -> Option<RewardClaim> {
        if self.session.state != SessionState::Win || !matches!(self.reward, RewardStatus::Failed(_)) {
            return None;
        }
        let claim = self.claim()?;
        self.reward = RewardStatus::Pending;
        Some(claim)
    }

    /// Read-only view for the presentation layer.
    pub fn snapshot(&self) -> Frame {
        Frame {
            state: self.session.state,
            score: self.session.score,
            target_score: self.session.target_score,
            lives: self.session.lives,
            seconds_left: self.session.time_remaining_ms.div_ceil(1000),
            combo: self.game.combo(),
            sprites: self.game.sprites(),
            grid: self.game.grid(self.session.state),
        }
    }
}
