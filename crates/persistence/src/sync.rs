//! Background persistence of session changes.
//!
//! The worker drains the session's change channel. Every snapshot is written to
//! local storage at once. Remote writes wait for a quiet period: each new
//! snapshot restarts the timer and only the newest one is sent. A failed remote
//! write is logged and dropped; the next change schedules a fresh attempt.
//!
//! Remote writes run on their own task, so a slow or silent remote never holds
//! up local writes. At most one remote write is in flight; snapshots that
//! arrive meanwhile collapse into a single pending one that is sent after it
//! settles. On shutdown each outstanding remote write gets `FLUSH_TIMEOUT`.

use std::future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc::UnboundedReceiver;
use tokio::task::{JoinError, JoinHandle};
use tokio::time::{self, Instant};
use tracing::{debug, info, warn};
use visits::Snapshot;

use crate::remote::RemoteSnapshots;
use crate::store::{LocalSnapshotStore, StoreError};

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_secs(2);

/// How long shutdown waits on a remote write before giving up on it.
pub const FLUSH_TIMEOUT: Duration = Duration::from_secs(10);

type RemoteWrite = JoinHandle<Result<(), StoreError>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SyncStats {
    pub local_writes: usize,
    pub local_failures: usize,
    pub remote_writes: usize,
    pub remote_failures: usize,
}

pub struct SyncWorker {
    local: Arc<dyn LocalSnapshotStore>,
    remote: Option<Arc<dyn RemoteSnapshots>>,
    user: String,
    debounce: Duration,
    stats: SyncStats,
}

pub struct SyncHandle {
    task: JoinHandle<SyncStats>,
}

impl SyncHandle {
    /// Wait for the worker to drain its channel and flush. The worker exits
    /// once every sender of the change channel has been dropped.
    pub async fn join(self) -> SyncStats {
        match self.task.await {
            Ok(stats) => stats,
            Err(err) => {
                warn!("sync worker ended abnormally: {err}");
                SyncStats::default()
            }
        }
    }

    pub fn abort(&self) {
        self.task.abort();
    }
}

impl SyncWorker {
    pub fn spawn(
        local: Arc<dyn LocalSnapshotStore>,
        remote: Option<Arc<dyn RemoteSnapshots>>,
        user: impl Into<String>,
        rx: UnboundedReceiver<Snapshot>,
        debounce: Duration,
    ) -> SyncHandle {
        let worker = SyncWorker {
            local,
            remote,
            user: user.into(),
            debounce,
            stats: SyncStats::default(),
        };
        SyncHandle {
            task: tokio::spawn(worker.run(rx)),
        }
    }

    async fn run(mut self, mut rx: UnboundedReceiver<Snapshot>) -> SyncStats {
        let mut pending: Option<Snapshot> = None;
        let mut in_flight: Option<RemoteWrite> = None;
        let timer = time::sleep(self.debounce);
        tokio::pin!(timer);

        loop {
            tokio::select! {
                msg = rx.recv() => {
                    let Some(snapshot) = msg else { break };
                    self.write_local(&snapshot).await;
                    if self.remote.is_some() {
                        timer.as_mut().reset(Instant::now() + self.debounce);
                        debug!(delay_ms = self.debounce.as_millis() as u64, "remote save scheduled");
                        pending = Some(snapshot);
                    }
                }
                () = &mut timer, if pending.is_some() && in_flight.is_none() => {
                    if let Some(snapshot) = pending.take() {
                        in_flight = self.start_remote(snapshot);
                    }
                }
                joined = settled(&mut in_flight), if in_flight.is_some() => {
                    in_flight = None;
                    self.record_remote(joined);
                }
            }
        }

        if let Some(task) = in_flight.take() {
            self.finish_remote(task).await;
        }
        if let Some(snapshot) = pending.take() {
            debug!("flushing pending remote save on shutdown");
            if let Some(task) = self.start_remote(snapshot) {
                self.finish_remote(task).await;
            }
        }
        info!(
            local = self.stats.local_writes,
            remote = self.stats.remote_writes,
            "sync worker stopped"
        );
        self.stats
    }

    async fn write_local(&mut self, snapshot: &Snapshot) {
        match self.local.save(snapshot).await {
            Ok(()) => self.stats.local_writes += 1,
            Err(err) => {
                self.stats.local_failures += 1;
                warn!("local save failed: {err}");
            }
        }
    }

    fn start_remote(&self, snapshot: Snapshot) -> Option<RemoteWrite> {
        let remote = Arc::clone(self.remote.as_ref()?);
        let user = self.user.clone();
        debug!(user = %user, "remote save started");
        Some(tokio::spawn(async move {
            remote.save_snapshot(&user, &snapshot).await
        }))
    }

    /// Wait out a remote write at shutdown, abandoning it after `FLUSH_TIMEOUT`.
    async fn finish_remote(&mut self, mut task: RemoteWrite) {
        match time::timeout(FLUSH_TIMEOUT, &mut task).await {
            Ok(joined) => self.record_remote(joined),
            Err(_) => {
                task.abort();
                self.stats.remote_failures += 1;
                warn!(
                    user = %self.user,
                    timeout_ms = FLUSH_TIMEOUT.as_millis() as u64,
                    "remote save did not finish before shutdown"
                );
            }
        }
    }

    fn record_remote(&mut self, joined: Result<Result<(), StoreError>, JoinError>) {
        match joined {
            Ok(Ok(())) => {
                self.stats.remote_writes += 1;
                debug!(user = %self.user, "remote snapshot saved");
            }
            Ok(Err(err)) => {
                self.stats.remote_failures += 1;
                warn!(user = %self.user, "remote save failed: {err}");
            }
            Err(err) => {
                self.stats.remote_failures += 1;
                warn!(user = %self.user, "remote save task ended abnormally: {err}");
            }
        }
    }
}

/// Resolves when the in-flight remote write does; never resolves without one.
async fn settled(in_flight: &mut Option<RemoteWrite>) -> Result<Result<(), StoreError>, JoinError> {
    match in_flight {
        Some(task) => task.await,
        None => future::pending().await,
    }
}
