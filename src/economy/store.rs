//! Path-addressed document store.
//!
//! Paths look like `users/{uid}/minigames/{game}`. Every store offers point
//! reads and writes, an atomic read-modify-write on one path, and a change
//! feed. `MemoryStore` keeps the tree in memory; `JsonFileStore` persists it
//! to a JSON file after each write.

use crate::error::StoreError;
use crate::utils::persistence;
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{broadcast, Mutex};

/// Capacity of the change feed before slow subscribers lag.
const CHANGE_BUFFER: usize = 256;

/// A write that happened somewhere in the tree.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreChange {
    pub path: String,
    /// `None` when the path was removed.
    pub value: Option<Value>,
}

/// What a transaction closure decided after seeing the current value.
#[derive(Debug, Clone, PartialEq)]
pub enum TxDecision {
    Commit(Value),
    Abort,
}

/// Transaction body: current value in, decision out. Runs exactly once while
/// the path is locked.
pub type TxUpdate<'a> = Box<dyn FnOnce(Option<Value>) -> TxDecision + Send + 'a>;

#[derive(Debug, Clone, PartialEq)]
pub struct TxResult {
    pub committed: bool,
    /// Value at the path after the transaction.
    pub value: Option<Value>,
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get(&self, path: &str) -> Result<Option<Value>, StoreError>;

    /// Overwrite the value at `path`. `Value::Null` removes it.
    async fn set(&self, path: &str, value: Value) -> Result<(), StoreError>;

    /// Atomic read-modify-write of a single path.
    async fn transaction(&self, path: &str, update: TxUpdate<'_>) -> Result<TxResult, StoreError>;

    /// Receive every change made after this call.
    fn subscribe(&self) -> broadcast::Receiver<StoreChange>;
}

/// Split a path into its segments, rejecting empty ones.
pub fn segments(path: &str) -> Result<Vec<&str>, StoreError> {
    let parts: Vec<&str> = path.trim_matches('/').split('/').collect();
    if parts.iter().any(|p| p.is_empty()) {
        return Err(StoreError::InvalidPath(path.to_string()));
    }
    Ok(parts)
}

/// True when `path` is `root` or lies below it.
pub fn is_within(path: &str, root: &str) -> bool {
    let path = path.trim_matches('/');
    let root = root.trim_matches('/');
    path == root || (path.starts_with(root) && path[root.len()..].starts_with('/'))
}

fn lookup<'a>(root: &'a Value, parts: &[&str]) -> Option<&'a Value> {
    parts.iter().try_fold(root, |node, key| node.get(*key))
}

fn insert(root: &mut Value, parts: &[&str], value: Value) {
    let Some((last, parents)) = parts.split_last() else {
        *root = value;
        return;
    };
    let mut node = root;
    for key in parents {
        if !node.is_object() {
            *node = Value::Object(Map::new());
        }
        let Value::Object(map) = node else { return };
        node = map
            .entry(key.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
    }
    if !node.is_object() {
        *node = Value::Object(Map::new());
    }
    if let Value::Object(map) = node {
        if value.is_null() {
            map.remove(*last);
        } else {
            map.insert(last.to_string(), value);
        }
    }
}

/// In-memory document tree behind a single async mutex.
pub struct MemoryStore {
    root: Mutex<Value>,
    changes: broadcast::Sender<StoreChange>,
    offline: AtomicBool,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::with_root(Value::Object(Map::new()))
    }

    pub fn with_root(root: Value) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_BUFFER);
        Self {
            root: Mutex::new(root),
            changes,
            offline: AtomicBool::new(false),
        }
    }

    /// Simulate losing the connection: every operation fails until reset.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Copy of the whole tree.
    pub async fn snapshot(&self) -> Value {
        self.root.lock().await.clone()
    }

    fn check_online(&self) -> Result<(), StoreError> {
        if self.offline.load(Ordering::SeqCst) {
            Err(StoreError::Unavailable("store is offline".to_string()))
        } else {
            Ok(())
        }
    }

    fn publish(&self, path: &str, value: Option<Value>) {
        // No subscribers is fine
        let _ = self.changes.send(StoreChange {
            path: path.trim_matches('/').to_string(),
            value,
        });
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, path: &str) -> Result<Option<Value>, StoreError> {
        self.check_online()?;
        let parts = segments(path)?;
        let root = self.root.lock().await;
        Ok(lookup(&root, &parts).cloned())
    }

    async fn set(&self, path: &str, value: Value) -> Result<(), StoreError> {
        self.check_online()?;
        let parts = segments(path)?;
        let mut root = self.root.lock().await;
        let stored = (!value.is_null()).then(|| value.clone());
        insert(&mut root, &parts, value);
        drop(root);
        self.publish(path, stored);
        Ok(())
    }

    async fn transaction(&self, path: &str, update: TxUpdate<'_>) -> Result<TxResult, StoreError> {
        self.check_online()?;
        let parts = segments(path)?;
        let mut root = self.root.lock().await;
        let current = lookup(&root, &parts).cloned();
        match update(current.clone()) {
            TxDecision::Abort => Ok(TxResult {
                committed: false,
                value: current,
            }),
            TxDecision::Commit(value) => {
                let stored = (!value.is_null()).then(|| value.clone());
                insert(&mut root, &parts, value);
                drop(root);
                self.publish(path, stored.clone());
                Ok(TxResult {
                    committed: true,
                    value: stored,
                })
            }
        }
    }

    fn subscribe(&self) -> broadcast::Receiver<StoreChange> {
        self.changes.subscribe()
    }
}

/// `MemoryStore` persisted to one JSON file after every successful write.
pub struct JsonFileStore {
    inner: MemoryStore,
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    /// Open `path`, starting empty if the file does not exist yet.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let root: Option<Value> = persistence::read_json(&path).map_err(|e| StoreError::Malformed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        log::debug!("opened store at {}", path.display());
        Ok(Self {
            inner: MemoryStore::with_root(root.unwrap_or_else(|| Value::Object(Map::new()))),
            path,
            write_lock: Mutex::new(()),
        })
    }

    /// Open `store.json` under the app directory.
    pub fn open_default() -> Result<Self, StoreError> {
        let path = persistence::app_path("store.json").map_err(|e| StoreError::Persist(e.to_string()))?;
        Self::open(path)
    }

    pub fn file_path(&self) -> &Path {
        &self.path
    }

    async fn persist(&self) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let snapshot = self.inner.snapshot().await;
        persistence::write_json(&self.path, &snapshot).map_err(|e| StoreError::Persist(e.to_string()))
    }
}

#[async_trait]
impl DocumentStore for JsonFileStore {
    async fn get(&self, path: &str) -> Result<Option<Value>, StoreError> {
        self.inner.get(path).await
    }

    async fn set(&self, path: &str, value: Value) -> Result<(), StoreError> {
        self.inner.set(path, value).await?;
        self.persist().await
    }

    async fn transaction(&self, path: &str, update: TxUpdate<'_>) -> Result<TxResult, StoreError> {
        let result = self.inner.transaction(path, update).await?;
        if result.committed {
            self.persist().await?;
        }
        Ok(result)
    }

    fn subscribe(&self) -> broadcast::Receiver<StoreChange> {
        self.inner.subscribe()
    }
}
