use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;
use visits::Snapshot;

#[derive(Debug)]
pub enum StoreError {
    Io { path: PathBuf, source: io::Error },
    Corrupt { origin: String, reason: String },
    Encode(String),
    InvalidUser(String),
    Remote(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Io { path, source } => write!(f, "io error at {}: {source}", path.display()),
            StoreError::Corrupt { origin, reason } => {
                write!(f, "corrupt snapshot in {origin}: {reason}")
            }
            StoreError::Encode(e) => write!(f, "failed to encode snapshot: {e}"),
            StoreError::InvalidUser(u) => write!(f, "invalid user id {u:?}"),
            StoreError::Remote(e) => write!(f, "remote store error: {e}"),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Where the local copy of a user's snapshot lives.
#[async_trait]
pub trait LocalSnapshotStore: Send + Sync {
    /// `Ok(None)` when nothing has been saved yet.
    async fn load(&self) -> Result<Option<Snapshot>, StoreError>;
    async fn save(&self, snapshot: &Snapshot) -> Result<(), StoreError>;
}

#[derive(Debug, Default)]
pub struct InMemorySnapshotStore {
    slot: Mutex<Option<Snapshot>>,
    raw: Mutex<Option<String>>,
    saves: Mutex<usize>,
}

impl InMemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot(snapshot: Snapshot) -> Self {
        Self {
            slot: Mutex::new(Some(snapshot)),
            ..Self::default()
        }
    }

    /// A store holding unparsed text, for exercising the corrupt-data path.
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            raw: Mutex::new(Some(raw.into())),
            ..Self::default()
        }
    }

    pub async fn current(&self) -> Option<Snapshot> {
        self.slot.lock().await.clone()
    }

    pub async fn save_count(&self) -> usize {
        *self.saves.lock().await
    }
}

#[async_trait]
impl LocalSnapshotStore for InMemorySnapshotStore {
    async fn load(&self) -> Result<Option<Snapshot>, StoreError> {
        if let Some(raw) = self.raw.lock().await.as_deref() {
            return parse_snapshot(raw, "memory").map(Some);
        }
        Ok(self.slot.lock().await.clone())
    }

    async fn save(&self, snapshot: &Snapshot) -> Result<(), StoreError> {
        *self.raw.lock().await = None;
        *self.slot.lock().await = Some(snapshot.clone());
        *self.saves.lock().await += 1;
        Ok(())
    }
}

/// A JSON snapshot on disk. Writes go to a sibling temp file and are renamed
/// into place, so a crash mid-write leaves the previous snapshot intact.
#[derive(Debug)]
pub struct FileSnapshotStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileSnapshotStore {
    pub const FILE_NAME: &'static str = "snapshot.json";

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(Self::FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl LocalSnapshotStore for FileSnapshotStore {
    async fn load(&self) -> Result<Option<Snapshot>, StoreError> {
        let _g = self.lock.lock().await;
        read_snapshot(&self.path).await
    }

    async fn save(&self, snapshot: &Snapshot) -> Result<(), StoreError> {
        let _g = self.lock.lock().await;
        write_snapshot(&self.path, snapshot).await
    }
}

pub(crate) fn parse_snapshot(raw: &str, origin: &str) -> Result<Snapshot, StoreError> {
    Snapshot::from_json(raw).map_err(|e| StoreError::Corrupt {
        origin: origin.to_string(),
        reason: e.to_string(),
    })
}

pub(crate) async fn read_snapshot(path: &Path) -> Result<Option<Snapshot>, StoreError> {
    match tokio::fs::read_to_string(path).await {
        Ok(raw) => parse_snapshot(&raw, &path.display().to_string()).map(Some),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(StoreError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

pub(crate) async fn write_snapshot(path: &Path, snapshot: &Snapshot) -> Result<(), StoreError> {
    let io_err = |source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await.map_err(io_err)?;
    }
    let text = snapshot
        .to_json_pretty()
        .map_err(|e| StoreError::Encode(e.to_string()))?;
    let tmp = path.with_extension("json.tmp");
    tokio::fs::write(&tmp, text).await.map_err(io_err)?;
    tokio::fs::rename(&tmp, path).await.map_err(io_err)?;
    debug!(path = %path.display(), "snapshot written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{FileSnapshotStore, InMemorySnapshotStore, LocalSnapshotStore, StoreError};
    use pretty_assertions::assert_eq;
    use visits::{Snapshot, VisitRecord};

    fn sample() -> Snapshot {
        let mut snap = Snapshot::default();
        snap.countries_by_id.insert(
            "FRANCE".into(),
            VisitRecord {
                visited: true,
                ..VisitRecord::new("FRANCE")
            },
        );
        snap
    }

    #[tokio::test]
    async fn file_store_round_trips_and_reports_missing() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSnapshotStore::in_dir(dir.path().join("nested"));
        assert!(store.load().await.unwrap().is_none());

        store.save(&sample()).await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some(sample()));
        assert!(!store.path().with_extension("json.tmp").exists());
    }

    #[tokio::test]
    async fn file_store_flags_corrupt_json() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSnapshotStore::in_dir(dir.path());
        std::fs::write(store.path(), "{not json").unwrap();
        assert!(matches!(store.load().await, Err(StoreError::Corrupt { .. })));
    }

    #[tokio::test]
    async fn memory_store_counts_saves() {
        let store = InMemorySnapshotStore::with_raw("{not json");
        assert!(store.load().await.is_err());
        store.save(&sample()).await.unwrap();
        assert_eq!(store.load().await.unwrap(), Some(sample()));
        assert_eq!(store.save_count().await, 1);
    }
}
