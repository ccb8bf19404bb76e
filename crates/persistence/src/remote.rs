use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;
use visits::Snapshot;

use crate::store::{StoreError, read_snapshot, write_snapshot};

/// The backing store's snapshot contract: one snapshot per user, `None` when
/// the user has never saved.
#[async_trait]
pub trait RemoteSnapshots: Send + Sync {
    async fn load_snapshot(&self, user: &str) -> Result<Option<Snapshot>, StoreError>;
    async fn save_snapshot(&self, user: &str, snapshot: &Snapshot) -> Result<(), StoreError>;
}

/// Remote stand-in kept in memory, with switchable failures.
#[derive(Debug, Default)]
pub struct InMemoryRemote {
    users: Mutex<HashMap<String, Snapshot>>,
    fail_loads: AtomicBool,
    fail_saves: AtomicBool,
    saves: AtomicUsize,
}

impl InMemoryRemote {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, user: impl Into<String>, snapshot: Snapshot) {
        self.users.lock().await.insert(user.into(), snapshot);
    }

    pub async fn get(&self, user: &str) -> Option<Snapshot> {
        self.users.lock().await.get(user).cloned()
    }

    pub fn set_fail_loads(&self, fail: bool) {
        self.fail_loads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Successful saves so far.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RemoteSnapshots for InMemoryRemote {
    async fn load_snapshot(&self, user: &str) -> Result<Option<Snapshot>, StoreError> {
        if self.fail_loads.load(Ordering::SeqCst) {
            return Err(StoreError::Remote(format!("load for {user} refused")));
        }
        Ok(self.get(user).await)
    }

    async fn save_snapshot(&self, user: &str, snapshot: &Snapshot) -> Result<(), StoreError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(StoreError::Remote(format!("save for {user} refused")));
        }
        self.insert(user, snapshot.clone()).await;
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// One `<user>.json` file per user under a shared directory.
#[derive(Debug)]
pub struct DirectoryRemote {
    root: PathBuf,
    lock: Mutex<()>,
}

impl DirectoryRemote {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn user_path(&self, user: &str) -> Result<PathBuf, StoreError> {
        let valid = !user.is_empty()
            && user
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
            && !user.starts_with('.');
        if !valid {
            return Err(StoreError::InvalidUser(user.to_string()));
        }
        Ok(self.root.join(format!("{user}.json")))
    }
}

#[async_trait]
impl RemoteSnapshots for DirectoryRemote {
    async fn load_snapshot(&self, user: &str) -> Result<Option<Snapshot>, StoreError> {
        let path = self.user_path(user)?;
        let _g = self.lock.lock().await;
        read_snapshot(&path).await
    }

    async fn save_snapshot(&self, user: &str, snapshot: &Snapshot) -> Result<(), StoreError> {
        let path = self.user_path(user)?;
        let _g = self.lock.lock().await;
        write_snapshot(&path, snapshot).await
    }
}
