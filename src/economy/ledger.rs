//! User economy record, reward ledger entries, and the atomic update helper
//! every economy mutation goes through.

use crate::core::config::Currency;
use crate::economy::store::{DocumentStore, TxDecision};
use crate::error::StoreError;
use crate::games::GameId;
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

pub fn user_path(uid: &str) -> String {
    format!("users/{uid}")
}

pub fn ledger_path(uid: &str, game: GameId) -> String {
    format!("users/{uid}/minigames/{game}")
}

/// Calendar-day key used for the once-per-day rule.
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Today's date in the player's local timezone.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Per-game ledger entry: the last day a reward was granted and how much.
/// Fields other writers add to the entry are kept in `extra`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LedgerEntry {
    pub last_played: String,
    pub reward: u64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The `users/{uid}` document.
///
/// Fields this crate does not model (tasks, referral codes, profile data)
/// land in `extra` and are written back untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserEconomy {
    pub credits: u64,
    pub diamonds: u64,
    pub xp: u64,
    pub level: u32,
    pub streak: u32,
    /// Date key of the last daily check-in.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login: Option<String>,
    /// VIP expiry, milliseconds since the epoch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vip_expiry: Option<i64>,
    pub minigames: BTreeMap<String, LedgerEntry>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for UserEconomy {
    fn default() -> Self {
        Self {
            credits: 0,
            diamonds: 0,
            xp: 0,
            level: 1,
            streak: 0,
            last_login: None,
            vip_expiry: None,
            minigames: BTreeMap::new(),
            extra: Map::new(),
        }
    }
}

impl UserEconomy {
    /// Parse a stored document. A missing document is a fresh user.
    pub fn from_value(path: &str, value: Option<Value>) -> Result<Self, StoreError> {
        match value {
            None => Ok(Self::default()),
            Some(value) => serde_json::from_value(value).map_err(|e| StoreError::Malformed {
                path: path.to_string(),
                reason: e.to_string(),
            }),
        }
    }

    pub fn to_value(&self) -> Result<Value, StoreError> {
        serde_json::to_value(self).map_err(|e| StoreError::Persist(e.to_string()))
    }

    pub fn balance(&self, currency: Currency) -> u64 {
        match currency {
            Currency::Diamonds => self.diamonds,
            Currency::Credits => self.credits,
        }
    }

    pub fn add_balance(&mut self, currency: Currency, amount: u64) {
        let field = match currency {
            Currency::Diamonds => &mut self.diamonds,
            Currency::Credits => &mut self.credits,
        };
        *field = field.saturating_add(amount);
    }

    pub fn is_vip(&self, now_ms: i64) -> bool {
        self.vip_expiry.is_some_and(|expiry| expiry > now_ms)
    }

    pub fn ledger(&self, game: GameId) -> Option<&LedgerEntry> {
        self.minigames.get(game.as_str())
    }

    pub fn played_on(&self, game: GameId, date: NaiveDate) -> bool {
        self.ledger(game)
            .is_some_and(|entry| entry.last_played == date_key(date))
    }
}

/// Load a user record. Missing users read as a fresh record.
pub async fn load_user(store: &dyn DocumentStore, uid: &str) -> Result<UserEconomy, StoreError> {
    let path = user_path(uid);
    let value = store.get(&path).await?;
    UserEconomy::from_value(&path, value)
}

/// Atomically apply `update` to `users/{uid}`.
///
/// `update` returns `Some(out)` to commit its changes or `None` to leave the
/// record untouched. Either way the record it saw is returned alongside.
pub async fn update_user<T, F>(
    store: &dyn DocumentStore,
    uid: &str,
    update: F,
) -> Result<(Option<T>, UserEconomy), StoreError>
where
    T: Send,
    F: FnOnce(&mut UserEconomy) -> Option<T> + Send,
{
    let path = user_path(uid);
    let mut outcome: Option<Result<(Option<T>, UserEconomy), StoreError>> = None;
    {
        let path = path.as_str();
        let outcome = &mut outcome;
        store
            .transaction(
                path,
                Box::new(move |current| {
                    let mut user = match UserEconomy::from_value(path, current) {
                        Ok(user) => user,
                        Err(e) => {
                            *outcome = Some(Err(e));
                            return TxDecision::Abort;
                        }
                    };
                    let Some(out) = update(&mut user) else {
                        *outcome = Some(Ok((None, user)));
                        return TxDecision::Abort;
                    };
                    match user.to_value() {
                        Ok(value) => {
                            *outcome = Some(Ok((Some(out), user)));
                            TxDecision::Commit(value)
                        }
                        Err(e) => {
                            *outcome = Some(Err(e));
                            TxDecision::Abort
                        }
                    }
                }),
            )
            .await?;
    }
    outcome.unwrap_or_else(|| {
        Err(StoreError::Unavailable(format!(
            "transaction on {path} did not run"
        )))
    })
}
