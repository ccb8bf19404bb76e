//! Loading, merging and saving visit snapshots.
//!
//! Three sources can disagree about the same user: the local snapshot, the
//! remote snapshot and (outside this crate) a share token. Everything read
//! from storage is first normalized, then local and remote are reconciled
//! into one snapshot. Saving runs on a background [`SyncWorker`] that writes
//! locally on every change and debounces remote writes.

pub mod load;
pub mod normalize;
pub mod reconcile;
pub mod remote;
pub mod store;
pub mod sync;

pub use load::load_initial;
pub use normalize::{legacy_base_key, merge_records, normalize_records, normalize_snapshot};
pub use reconcile::{Reconciled, reconcile, reconcile_report};
pub use remote::{DirectoryRemote, InMemoryRemote, RemoteSnapshots};
pub use store::{FileSnapshotStore, InMemorySnapshotStore, LocalSnapshotStore, StoreError};
pub use sync::{DEFAULT_DEBOUNCE, FLUSH_TIMEOUT, SyncHandle, SyncStats, SyncWorker};
