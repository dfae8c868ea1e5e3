//! Level curve, VIP multiplier, daily login streak and referral credits.

use crate::core::constants::{
    STREAK_BASE_CREDITS, STREAK_MAX_BONUS_DAYS, VIP_REWARD_MULTIPLIER, XP_CURVE_BASE, XP_CURVE_EXPONENT,
};
use crate::economy::ledger::{date_key, update_user, UserEconomy};
use crate::economy::store::DocumentStore;
use crate::error::GameError;
use chrono::NaiveDate;

/// XP needed to advance past `level`: 100 * level^1.5.
pub fn xp_for_level(level: u32) -> u64 {
    (XP_CURVE_BASE * (level.max(1) as f64).powf(XP_CURVE_EXPONENT)).round() as u64
}

/// Level reached with `xp` total experience. Starts at 1.
pub fn level_for_xp(xp: u64) -> u32 {
    let mut level = 1;
    let mut needed = xp_for_level(level);
    while xp >= needed {
        level += 1;
        match needed.checked_add(xp_for_level(level)) {
            Some(next) => needed = next,
            None => break,
        }
    }
    level
}

/// Reward multiplier for a user at `now_ms`.
pub fn reward_multiplier(user: &UserEconomy, now_ms: i64) -> u64 {
    if user.is_vip(now_ms) {
        VIP_REWARD_MULTIPLIER
    } else {
        1
    }
}

/// Credits granted for checking in on day `streak` of a run.
pub fn streak_credits(streak: u32) -> u64 {
    STREAK_BASE_CREDITS * streak.clamp(1, STREAK_MAX_BONUS_DAYS) as u64
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakOutcome {
    pub streak: u32,
    /// Zero when the user already checked in today.
    pub credits_granted: u64,
}

/// Daily check-in. Same day is a no-op, the next day extends the streak, a
/// gap restarts it at 1.
pub async fn check_daily_streak(
    store: &dyn DocumentStore,
    uid: &str,
    today: NaiveDate,
) -> Result<StreakOutcome, GameError> {
    let today_key = date_key(today);
    let yesterday_key = today.pred_opt().map(date_key);
    let (granted, user) = update_user(store, uid, |user| {
        if user.last_login.as_deref() == Some(today_key.as_str()) {
            return None;
        }
        let continued = user.last_login.is_some() && user.last_login == yesterday_key;
        user.streak = if continued { user.streak + 1 } else { 1 };
        user.last_login = Some(today_key.clone());
        let credits = streak_credits(user.streak);
        user.credits = user.credits.saturating_add(credits);
        Some(credits)
    })
    .await?;

    if let Some(credits) = granted {
        log::info!("{uid} checked in: streak {}, +{credits} credits", user.streak);
    }
    Ok(StreakOutcome {
        streak: user.streak,
        credits_granted: granted.unwrap_or(0),
    })
}

/// Credit a referrer. Returns the new credit balance.
pub async fn credit_referral(store: &dyn DocumentStore, uid: &str, amount: u64) -> Result<u64, GameError> {
    let (balance, user) = update_user(store, uid, |user| {
        user.credits = user.credits.saturating_add(amount);
        Some(user.credits)
    })
    .await?;
    log::info!("referral credit of {amount} for {uid}");
    Ok(balance.unwrap_or(user.credits))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::economy::ledger::load_user;
    use crate::economy::store::MemoryStore;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    #[test]
    fn test_level_for_huge_xp_terminates() {
        let level = level_for_xp(u64::MAX);
        assert!(level > 1);
        assert!(level_for_xp(u64::MAX - 1) <= level);
    }

    #[test]
    fn test_level_curve() {
        assert_eq!(xp_for_level(1), 100);
        assert_eq!(xp_for_level(4), 800);
        assert_eq!(level_for_xp(0), 1);
        assert_eq!(level_for_xp(99), 1);
        assert_eq!(level_for_xp(100), 2);
        // 100 + 283 to clear level 2
        assert_eq!(level_for_xp(382), 2);
        assert_eq!(level_for_xp(383), 3);
    }

    #[test]
    fn test_vip_doubles() {
        let mut user = UserEconomy::default();
        assert_eq!(reward_multiplier(&user, 0), 1);
        user.vip_expiry = Some(5_000);
        assert_eq!(reward_multiplier(&user, 1_000), 2);
        assert_eq!(reward_multiplier(&user, 6_000), 1);
    }

    #[test]
    fn test_streak_credits_cap() {
        assert_eq!(streak_credits(1), 10);
        assert_eq!(streak_credits(3), 30);
        assert_eq!(streak_credits(30), 70);
    }

    #[tokio::test]
    async fn test_streak_progression() {
        let store = MemoryStore::new();
        let first = check_daily_streak(&store, "u", day(1)).await.unwrap();
        assert_eq!(first, StreakOutcome { streak: 1, credits_granted: 10 });

        let again = check_daily_streak(&store, "u", day(1)).await.unwrap();
        assert_eq!(again, StreakOutcome { streak: 1, credits_granted: 0 });

        let next = check_daily_streak(&store, "u", day(2)).await.unwrap();
        assert_eq!(next, StreakOutcome { streak: 2, credits_granted: 20 });

        let gap = check_daily_streak(&store, "u", day(5)).await.unwrap();
        assert_eq!(gap.streak, 1);

        assert_eq!(load_user(&store, "u").await.unwrap().credits, 40);
    }

    #[tokio::test]
    async fn test_referral_keeps_other_fields() {
        let store = MemoryStore::new();
        check_daily_streak(&store, "u", day(1)).await.unwrap();
        let balance = credit_referral(&store, "u", 50).await.unwrap();
        assert_eq!(balance, 60);
        let user = load_user(&store, "u").await.unwrap();
        assert_eq!(user.streak, 1);
    }
}
