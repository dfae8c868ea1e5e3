//! The host that mounts games: it resolves the async start checks before a
//! session starts, drives frames, and commits rewards in the background.
//!
//! Reward commits are spawned on the tokio runtime and never block frames.
//! A finished commit is picked up by the next `frame` call, so a host that
//! only drives frames still sees the outcome. Every failure on the start and
//! reward paths ends up as a [`Toast`].

use crate::core::config::ArcadeConfig;
use crate::core::engine::{EngineEvent, RewardClaim, SessionEngine};
use crate::core::session::{SessionState, StartGate};
use crate::economy::ledger::today;
use crate::economy::reward::{award_once, has_played_today, AwardOutcome, AwardRequest};
use crate::economy::store::DocumentStore;
use crate::error::{GameError, Toast};
use crate::games::GameId;
use crate::identity::IdentityProvider;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::oneshot::{self, error::TryRecvError};
use uuid::Uuid;

type CommitResult = Result<AwardOutcome, GameError>;
type Commit = oneshot::Receiver<CommitResult>;

pub struct Arcade {
    store: Arc<dyn DocumentStore>,
    identity: Arc<dyn IdentityProvider>,
    config: ArcadeConfig,
    /// In-flight reward commits keyed by session id.
    commits: HashMap<Uuid, Commit>,
    toasts: Vec<Toast>,
}

impl Arcade {
    pub fn new(store: Arc<dyn DocumentStore>, identity: Arc<dyn IdentityProvider>, config: ArcadeConfig) -> Self {
        Self {
            store,
            identity,
            config,
            commits: HashMap::new(),
            toasts: Vec::new(),
        }
    }

    pub fn config(&self) -> &ArcadeConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    /// Mount a game with the configured rules.
    pub fn mount(&self, game: GameId, seed: u64) -> SessionEngine {
        SessionEngine::new(game, self.config.game(game), self.config.max_step_ms, seed)
    }

    /// Resolve sign-in and the daily limit for `game`.
    pub async fn start_gate(&self, game: GameId) -> Result<StartGate, GameError> {
        let Some(user) = self.identity.current_user().await else {
            return Ok(StartGate::default());
        };
        if self.config.require_verified_email && !user.email_verified {
            log::info!("{} must verify their email before playing", user.uid);
            return Ok(StartGate::default());
        }
        let played_today = has_played_today(self.store.as_ref(), &user.uid, game, today()).await?;
        Ok(StartGate {
            user_id: Some(user.uid),
            played_today,
        })
    }

    /// Run the start checks, then start the session. The engine does not
    /// move until both checks have resolved.
    pub async fn start(&mut self, engine: &mut SessionEngine, now_ms: u64) -> Result<SessionState, Toast> {
        let result = match self.start_gate(engine.game_id()).await {
            Ok(gate) => engine.start(&gate, now_ms),
            Err(e) => Err(e),
        };
        result.map_err(|e| {
            log::info!("{} not started: {}", engine.game_id(), e);
            let toast = e.to_toast();
            self.toasts.push(toast.clone());
            toast
        })
    }

    /// Drive one frame and react to what the engine reports. A reward commit
    /// that finished since the last frame is handed to the engine first.
    pub fn frame(&mut self, engine: &mut SessionEngine, now_ms: u64) -> Vec<EngineEvent> {
        self.poll_commit(engine);
        let events = engine.frame(now_ms);
        for event in &events {
            match event {
                EngineEvent::RewardDue(claim) => self.commit(claim.clone()),
                EngineEvent::Aborted(err) => self.toasts.push(err.to_toast()),
                EngineEvent::StateChanged { .. } => {}
            }
        }
        events
    }

    fn commit(&mut self, claim: RewardClaim) {
        let store = Arc::clone(&self.store);
        let req = AwardRequest::from_claim(&claim, today(), chrono::Utc::now().timestamp_millis());
        log::debug!("committing reward for session {}", claim.session_id);
        let (tx, rx) = oneshot::channel();
        let session_id = claim.session_id;
        tokio::spawn(async move {
            let result = award_once(store.as_ref(), &req).await;
            if tx.send(result).is_err() {
                log::debug!("reward commit {} finished after its session was left", session_id);
            }
        });
        self.commits.insert(session_id, rx);
    }

    fn poll_commit(&mut self, engine: &mut SessionEngine) {
        let id = engine.session.id;
        let result = match self.commits.get_mut(&id) {
            Some(rx) => match rx.try_recv() {
                Ok(result) => result,
                Err(TryRecvError::Empty) => return,
                Err(TryRecvError::Closed) => Err(GameError::RewardCommitFailed("commit task stopped".to_string())),
            },
            None => return,
        };
        self.commits.remove(&id);
        self.apply_commit(engine, result);
    }

    fn apply_commit(&mut self, engine: &mut SessionEngine, result: CommitResult) -> Toast {
        if let Err(e) = &result {
            log::warn!("reward commit for session {} failed: {}", engine.session.id, e);
        }
        let toast = engine.reward_result(result);
        self.toasts.push(toast.clone());
        toast
    }

    pub fn reward_pending(&self, engine: &SessionEngine) -> bool {
        self.commits.contains_key(&engine.session.id)
    }

    /// Wait for this session's reward commit and hand the result to the
    /// engine. `None` when no commit is in flight.
    pub async fn settle_reward(&mut self, engine: &mut SessionEngine) -> Option<Toast> {
        let rx = self.commits.remove(&engine.session.id)?;
        let result = rx
            .await
            .unwrap_or_else(|_| Err(GameError::RewardCommitFailed("commit task stopped".to_string())));
        Some(self.apply_commit(engine, result))
    }

    /// Retry a failed commit. False when there is nothing to retry.
    pub fn retry_reward(&mut self, engine: &mut SessionEngine) -> bool {
        match engine.retry_claim() {
            Some(claim) => {
                self.commit(claim);
                true
            }
            None => false,
        }
    }

    /// Unmount. An in-flight commit still finishes in the background.
    pub fn exit(&mut self, engine: &mut SessionEngine) {
        engine.exit();
        if self.commits.remove(&engine.session.id).is_some() {
            log::debug!("leaving reward commit {} to finish detached", engine.session.id);
        }
    }

    pub fn take_toasts(&mut self) -> Vec<Toast> {
        std::mem::take(&mut self.toasts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::engine::RewardStatus;
    use crate::economy::ledger::load_user;
    use crate::economy::store::MemoryStore;
    use crate::error::ToastLevel;
    use crate::identity::LocalIdentity;

    async fn signed_in() -> (Arc<MemoryStore>, Arc<LocalIdentity>, Arcade, String) {
        let store = Arc::new(MemoryStore::new());
        let identity = Arc::new(LocalIdentity::new());
        let user = identity.sign_up("pilot@galaxy.test", "secret1", None).await.unwrap();
        let arcade = Arcade::new(store.clone(), identity.clone(), ArcadeConfig::default());
        (store, identity, arcade, user.uid)
    }

    #[tokio::test]
    async fn test_start_requires_sign_in() {
        let (_store, identity, mut arcade, _) = signed_in().await;
        identity.sign_out().await.unwrap();
        let mut engine = arcade.mount(GameId::Catcher, 1);
        let toast = arcade.start(&mut engine, 0).await.unwrap_err();
        assert_eq!(toast.level, ToastLevel::Info);
        assert_eq!(engine.state(), SessionState::Idle);
    }

    #[tokio::test]
    async fn test_unverified_blocked_when_required() {
        let (store, identity, _, _) = signed_in().await;
        let config = ArcadeConfig {
            require_verified_email: true,
            ..ArcadeConfig::default()
        };
        let mut arcade = Arcade::new(store, identity.clone(), config);
        let mut engine = arcade.mount(GameId::Catcher, 1);
        assert!(arcade.start(&mut engine, 0).await.is_err());

        identity.confirm_email("pilot@galaxy.test").await.unwrap();
        assert_eq!(arcade.start(&mut engine, 0).await.unwrap(), SessionState::Playing);
    }

    #[tokio::test]
    async fn test_win_commits_and_blocks_replay_today() {
        let (store, _identity, mut arcade, uid) = signed_in().await;
        let mut engine = arcade.mount(GameId::Catcher, 1);
        arcade.start(&mut engine, 0).await.unwrap();
        engine.session.score = 80;
        arcade.frame(&mut engine, 16);
        assert!(arcade.reward_pending(&engine));

        let toast = arcade.settle_reward(&mut engine).await.unwrap();
        assert_eq!(toast.level, ToastLevel::Info);
        assert_eq!(load_user(store.as_ref(), &uid).await.unwrap().diamonds, 5);

        engine.play_again().unwrap();
        let toast = arcade.start(&mut engine, 100).await.unwrap_err();
        assert!(toast.message.contains("today"));
    }

    #[tokio::test]
    async fn test_failed_commit_keeps_win_and_retries() {
        let (store, _identity, mut arcade, uid) = signed_in().await;
        let mut engine = arcade.mount(GameId::Catcher, 1);
        arcade.start(&mut engine, 0).await.unwrap();
        store.set_offline(true);
        engine.session.score = 80;
        arcade.frame(&mut engine, 16);
        let toast = arcade.settle_reward(&mut engine).await.unwrap();
        assert!(toast.retryable);
        assert_eq!(engine.state(), SessionState::Win);

        store.set_offline(false);
        assert!(arcade.retry_reward(&mut engine));
        arcade.settle_reward(&mut engine).await.unwrap();
        assert_eq!(load_user(store.as_ref(), &uid).await.unwrap().diamonds, 5);
        assert!(!arcade.retry_reward(&mut engine));
    }

    #[tokio::test]
    async fn test_failed_commit_surfaces_through_frames() {
        let (store, _identity, mut arcade, _) = signed_in().await;
        let mut engine = arcade.mount(GameId::Catcher, 1);
        arcade.start(&mut engine, 0).await.unwrap();
        store.set_offline(true);
        engine.session.score = 80;
        let mut now = 16;
        arcade.frame(&mut engine, now);
        assert_eq!(*engine.reward_status(), RewardStatus::Pending);

        for _ in 0..50 {
            if !arcade.reward_pending(&engine) {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
            now += 16;
            arcade.frame(&mut engine, now);
        }

        assert!(!arcade.reward_pending(&engine));
        assert!(matches!(engine.reward_status(), RewardStatus::Failed(_)));
        assert_eq!(engine.state(), SessionState::Win);
        let toasts = arcade.take_toasts();
        assert_eq!(toasts.len(), 1);
        assert!(toasts[0].retryable);
        assert!(arcade.settle_reward(&mut engine).await.is_none());
    }

    #[tokio::test]
    async fn test_granted_commit_surfaces_through_frames() {
        let (store, _identity, mut arcade, uid) = signed_in().await;
        let mut engine = arcade.mount(GameId::Catcher, 1);
        arcade.start(&mut engine, 0).await.unwrap();
        engine.session.score = 80;
        let mut now = 16;
        arcade.frame(&mut engine, now);
        for _ in 0..50 {
            if !arcade.reward_pending(&engine) {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
            now += 16;
            arcade.frame(&mut engine, now);
        }
        assert_eq!(*engine.reward_status(), RewardStatus::Committed { amount: 5 });
        assert_eq!(load_user(store.as_ref(), &uid).await.unwrap().diamonds, 5);
    }

    #[tokio::test]
    async fn test_exit_drops_the_pending_commit() {
        let (store, _identity, mut arcade, uid) = signed_in().await;
        let mut engine = arcade.mount(GameId::Catcher, 1);
        arcade.start(&mut engine, 0).await.unwrap();
        engine.session.score = 80;
        arcade.frame(&mut engine, 16);
        arcade.exit(&mut engine);
        assert!(!arcade.reward_pending(&engine));
        let mut diamonds = 0;
        for _ in 0..50 {
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
            diamonds = load_user(store.as_ref(), &uid).await.unwrap().diamonds;
            if diamonds > 0 {
                break;
            }
        }
        assert_eq!(diamonds, 5);
    }

    #[tokio::test]
    async fn test_store_outage_at_start_is_a_toast() {
        let (store, _identity, mut arcade, _) = signed_in().await;
        store.set_offline(true);
        let mut engine = arcade.mount(GameId::Catcher, 1);
        let toast = arcade.start(&mut engine, 0).await.unwrap_err();
        assert!(toast.retryable);
        assert_eq!(engine.state(), SessionState::Idle);
        assert_eq!(arcade.take_toasts().len(), 1);
        assert!(arcade.take_toasts().is_empty());
    }
}
