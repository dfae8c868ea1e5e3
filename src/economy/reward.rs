//! Reward commit protocol: at most one reward per user, game and calendar day.
//!
//! The ledger check and the balance increments happen inside one transaction
//! on `users/{uid}`, so retries and duplicate calls grant nothing extra.

use crate::core::config::Currency;
use crate::core::engine::RewardClaim;
use crate::economy::ledger::{date_key, load_user, update_user, LedgerEntry};
use crate::economy::progression::{level_for_xp, reward_multiplier};
use crate::economy::store::DocumentStore;
use crate::error::GameError;
use crate::games::GameId;
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AwardRequest {
    pub user_id: String,
    pub game_id: GameId,
    pub reward_amount: u64,
    pub xp_amount: u64,
    pub currency: Currency,
    /// Local calendar day the reward counts against.
    pub date: NaiveDate,
    /// Wall clock for the VIP check, milliseconds since the epoch.
    pub now_ms: i64,
}

impl AwardRequest {
    pub fn from_claim(claim: &RewardClaim, date: NaiveDate, now_ms: i64) -> Self {
        Self {
            user_id: claim.user_id.clone(),
            game_id: claim.game_id,
            reward_amount: claim.reward_amount,
            xp_amount: claim.xp_amount,
            currency: claim.currency,
            date,
            now_ms,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AwardOutcome {
    Granted { amount: u64, xp: u64, new_level: u32 },
    /// The ledger already shows a reward for this game today.
    AlreadyRewarded,
}

/// Grant the reward unless today's is already recorded.
///
/// Store failures come back as `RewardCommitFailed`.
pub async fn award_once(store: &dyn DocumentStore, req: &AwardRequest) -> Result<AwardOutcome, GameError> {
    let today = date_key(req.date);
    let (granted, _) = update_user(store, &req.user_id, |user| {
        if user.played_on(req.game_id, req.date) {
            return None;
        }
        let amount = req.reward_amount.saturating_mul(reward_multiplier(user, req.now_ms));
        user.add_balance(req.currency, amount);
        user.xp = user.xp.saturating_add(req.xp_amount);
        user.level = user.level.max(level_for_xp(user.xp));
        let entry = user
            .minigames
            .entry(req.game_id.as_str().to_string())
            .or_insert_with(LedgerEntry::default);
        entry.last_played = today.clone();
        entry.reward = amount;
        Some(AwardOutcome::Granted {
            amount,
            xp: req.xp_amount,
            new_level: user.level,
        })
    })
    .await
    .map_err(|e| GameError::RewardCommitFailed(e.to_string()))?;

    match granted {
        Some(outcome) => {
            log::info!("rewarded {} for {}: {:?}", req.user_id, req.game_id, outcome);
            Ok(outcome)
        }
        None => {
            log::debug!("{} already rewarded for {} on {}", req.user_id, req.game_id, today);
            Ok(AwardOutcome::AlreadyRewarded)
        }
    }
}

/// Daily-limit check run before a session may start.
pub async fn has_played_today(
    store: &dyn DocumentStore,
    uid: &str,
    game: GameId,
    date: NaiveDate,
) -> Result<bool, GameError> {
    let user = load_user(store, uid).await?;
    Ok(user.played_on(game, date))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::economy::ledger::{ledger_path, load_user};
    use crate::economy::store::MemoryStore;
    use serde_json::json;

    fn request(date: NaiveDate) -> AwardRequest {
        AwardRequest {
            user_id: "pilot".to_string(),
            game_id: GameId::Catcher,
            reward_amount: 5,
            xp_amount: 20,
            currency: Currency::Diamonds,
            date,
            now_ms: 0,
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, d).unwrap()
    }

    #[tokio::test]
    async fn test_first_award_grants_and_writes_ledger() {
        let store = MemoryStore::new();
        let outcome = award_once(&store, &request(day(1))).await.unwrap();
        assert_eq!(
            outcome,
            AwardOutcome::Granted {
                amount: 5,
                xp: 20,
                new_level: 1
            }
        );
        let entry = store.get(&ledger_path("pilot", GameId::Catcher)).await.unwrap();
        assert_eq!(entry, Some(json!({"lastPlayed": "2024-06-01", "reward": 5})));
    }

    #[tokio::test]
    async fn test_second_award_same_day_is_noop() {
        let store = MemoryStore::new();
        award_once(&store, &request(day(1))).await.unwrap();
        let again = award_once(&store, &request(day(1))).await.unwrap();
        assert_eq!(again, AwardOutcome::AlreadyRewarded);
        let user = load_user(&store, "pilot").await.unwrap();
        assert_eq!(user.diamonds, 5);
        assert_eq!(user.xp, 20);
    }

    #[tokio::test]
    async fn test_next_day_grants_again() {
        let store = MemoryStore::new();
        award_once(&store, &request(day(1))).await.unwrap();
        award_once(&store, &request(day(2))).await.unwrap();
        assert_eq!(load_user(&store, "pilot").await.unwrap().diamonds, 10);
    }

    #[tokio::test]
    async fn test_award_keeps_other_ledger_fields() {
        let store = MemoryStore::new();
        store
            .set(
                &ledger_path("pilot", GameId::Catcher),
                json!({"lastPlayed": "2024-05-31", "reward": 5, "bestScore": 92}),
            )
            .await
            .unwrap();
        award_once(&store, &request(day(1))).await.unwrap();
        let entry = store.get(&ledger_path("pilot", GameId::Catcher)).await.unwrap();
        assert_eq!(
            entry,
            Some(json!({"lastPlayed": "2024-06-01", "reward": 5, "bestScore": 92}))
        );
    }

    #[tokio::test]
    async fn test_vip_doubles_reward() {
        let store = MemoryStore::new();
        store.set("users/pilot/vipExpiry", json!(1_000)).await.unwrap();
        let outcome = award_once(&store, &request(day(1))).await.unwrap();
        assert!(matches!(outcome, AwardOutcome::Granted { amount: 10, .. }));
    }

    #[tokio::test]
    async fn test_level_up() {
        let store = MemoryStore::new();
        let mut req = request(day(1));
        req.xp_amount = 150;
        let outcome = award_once(&store, &req).await.unwrap();
        assert!(matches!(outcome, AwardOutcome::Granted { new_level: 2, .. }));
    }

    #[tokio::test]
    async fn test_offline_surfaces_commit_failure() {
        let store = MemoryStore::new();
        store.set_offline(true);
        let err = award_once(&store, &request(day(1))).await.unwrap_err();
        assert!(matches!(err, GameError::RewardCommitFailed(_)));
    }

    #[tokio::test]
    async fn test_has_played_today() {
        let store = MemoryStore::new();
        assert!(!has_played_today(&store, "pilot", GameId::Catcher, day(1)).await.unwrap());
        award_once(&store, &request(day(1))).await.unwrap();
        assert!(has_played_today(&store, "pilot", GameId::Catcher, day(1)).await.unwrap());
        assert!(!has_played_today(&store, "pilot", GameId::Shooter, day(1)).await.unwrap());
        assert!(!has_played_today(&store, "pilot", GameId::Catcher, day(2)).await.unwrap());
    }
}
