//! Live view of one user's economy record.
//!
//! Follows the store's change feed. Bad data never replaces what the view
//! already holds: unreadable values and lagged feeds are logged and the last
//! known record is kept (marked stale until the next full refresh).

use crate::economy::ledger::{user_path, UserEconomy};
use crate::economy::store::{is_within, segments, DocumentStore, StoreChange};
use serde_json::Value;
use tokio::sync::broadcast::{self, error::TryRecvError};

pub struct EconomyView {
    uid: String,
    root: String,
    current: UserEconomy,
    rx: broadcast::Receiver<StoreChange>,
    stale: bool,
}

impl EconomyView {
    /// Subscribe first, then read, so no change between the two is missed.
    pub async fn open(store: &dyn DocumentStore, uid: &str) -> Self {
        let rx = store.subscribe();
        let mut view = Self {
            uid: uid.to_string(),
            root: user_path(uid),
            current: UserEconomy::default(),
            rx,
            stale: true,
        };
        view.refresh(store).await;
        view
    }

    pub fn uid(&self) -> &str {
        &self.uid
    }

    pub fn current(&self) -> &UserEconomy {
        &self.current
    }

    /// True when changes may have been missed since the last refresh.
    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// Re-read the whole record.
    pub async fn refresh(&mut self, store: &dyn DocumentStore) {
        match store.get(&self.root).await {
            Ok(value) => match UserEconomy::from_value(&self.root, value) {
                Ok(user) => {
                    self.current = user;
                    self.stale = false;
                }
                Err(e) => log::warn!("keeping last economy for {}: {}", self.uid, e),
            },
            Err(e) => log::warn!("economy refresh failed for {}: {}", self.uid, e),
        }
    }

    /// Apply every change already queued. Returns how many touched this user.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        loop {
            match self.rx.try_recv() {
                Ok(change) => {
                    if self.apply(&change) {
                        applied += 1;
                    }
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
                Err(TryRecvError::Lagged(skipped)) => {
                    log::warn!("economy feed for {} lagged by {} changes", self.uid, skipped);
                    self.stale = true;
                }
            }
        }
        applied
    }

    /// Wait for the next change to this user's record.
    pub async fn changed(&mut self) -> Option<&UserEconomy> {
        loop {
            match self.rx.recv().await {
                Ok(change) => {
                    if self.apply(&change) {
                        return Some(&self.current);
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    log::warn!("economy feed for {} lagged by {} changes", self.uid, skipped);
                    self.stale = true;
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    fn apply(&mut self, change: &StoreChange) -> bool {
        if !is_within(&change.path, &self.root) {
            return false;
        }
        let Ok(mut doc) = self.current.to_value() else {
            return false;
        };
        let relative = change.path[self.root.len()..].trim_matches('/');
        let value = change.value.clone().unwrap_or(Value::Null);
        if relative.is_empty() {
            doc = value;
        } else {
            let Ok(parts) = segments(relative) else {
                return false;
            };
            set_at(&mut doc, &parts, value);
        }
        let doc = (!doc.is_null()).then_some(doc);
        match UserEconomy::from_value(&self.root, doc) {
            Ok(user) => {
                self.current = user;
                true
            }
            Err(e) => {
                log::warn!("ignoring bad update at {}: {}", change.path, e);
                false
            }
        }
    }
}

fn set_at(doc: &mut Value, parts: &[&str], value: Value) {
    let Some((last, parents)) = parts.split_last() else {
        return;
    };
    let mut node = doc;
    for key in parents {
        let Value::Object(map) = node else { return };
        node = map
            .entry(key.to_string())
            .or_insert_with(|| Value::Object(Default::default()));
    }
    if let Value::Object(map) = node {
        if value.is_null() {
            map.remove(*last);
        } else {
            map.insert(last.to_string(), value);
        }
    }
}
