use tracing::{info, warn};
use visits::Snapshot;

use crate::normalize::normalize_snapshot;
use crate::reconcile::reconcile_report;
use crate::remote::RemoteSnapshots;
use crate::store::LocalSnapshotStore;

/// Build the starting snapshot for `user`.
///
/// Never fails: unreadable local data starts fresh and an unreachable remote
/// falls back to local data. Both sides are normalized before reconciling.
pub async fn load_initial(
    local: &dyn LocalSnapshotStore,
    remote: Option<&dyn RemoteSnapshots>,
    user: &str,
) -> Snapshot {
    let local_snapshot = match local.load().await {
        Ok(Some(snapshot)) => Some(normalize_snapshot(snapshot)),
        Ok(None) => {
            info!("no local snapshot; starting fresh");
            None
        }
        Err(err) => {
            warn!("discarding unreadable local snapshot: {err}");
            None
        }
    };

    let remote_snapshot = match remote {
        None => None,
        Some(remote) => match remote.load_snapshot(user).await {
            Ok(Some(snapshot)) => Some(normalize_snapshot(snapshot)),
            Ok(None) => {
                info!(user, "no remote snapshot");
                None
            }
            Err(err) => {
                warn!(user, "remote load failed; using local data only: {err}");
                None
            }
        },
    };

    match (local_snapshot, remote_snapshot) {
        (Some(local), Some(remote)) => {
            let report = reconcile_report(&local, &remote);
            for id in &report.lossy_ties {
                warn!(country = %id, "tie kept remote record; local edits dropped");
            }
            info!(
                countries = report.snapshot.countries_by_id.len(),
                "reconciled local and remote snapshots"
            );
            report.snapshot
        }
        (Some(only), None) | (None, Some(only)) => only,
        (None, None) => Snapshot::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::load_initial;
    use crate::remote::InMemoryRemote;
    use crate::store::InMemorySnapshotStore;
    use pretty_assertions::assert_eq;
    use visits::{Snapshot, VisitRecord};

    fn with_visit(id: &str) -> Snapshot {
        let mut snap = Snapshot::default();
        snap.countries_by_id.insert(
            id.into(),
            VisitRecord {
                visited: true,
                ..VisitRecord::new(id)
            },
        );
        snap
    }

    #[tokio::test]
    async fn corrupt_local_and_missing_remote_start_fresh() {
        let local = InMemorySnapshotStore::with_raw("{broken");
        let remote = InMemoryRemote::new();
        let snap = load_initial(&local, Some(&remote), "u").await;
        assert!(snap.is_empty());
    }

    #[tokio::test]
    async fn records_without_an_id_field_take_their_key() {
        let local = InMemorySnapshotStore::with_raw(
            r#"{"countriesById":{"FRANCE":{"visited":true,"note":"Paris"},"JAPAN":{"id":"JAPAN","visited":true}}}"#,
        );
        let snap = load_initial(&local, None, "u").await;
        assert_eq!(snap.countries_by_id.len(), 2);
        let fr = &snap.countries_by_id["FRANCE"];
        assert_eq!(fr.id, "FRANCE");
        assert_eq!(fr.note.as_deref(), Some("Paris"));
        assert!(snap.countries_by_id["JAPAN"].visited);
    }

    #[tokio::test]
    async fn remote_failure_falls_back_to_normalized_local() {
        let local = InMemorySnapshotStore::with_snapshot(with_visit("FRA-1"));
        let remote = InMemoryRemote::new();
        remote.set_fail_loads(true);
        let snap = load_initial(&local, Some(&remote), "u").await;
        assert_eq!(snap.countries_by_id.keys().collect::<Vec<_>>(), vec!["FRA"]);
    }

    #[tokio::test]
    async fn both_sides_are_reconciled() {
        let local = InMemorySnapshotStore::with_snapshot(with_visit("PERU"));
        let remote = InMemoryRemote::new();
        remote.insert("u", with_visit("CHAD")).await;
        let snap = load_initial(&local, Some(&remote), "u").await;
        assert_eq!(
            snap.countries_by_id.keys().collect::<Vec<_>>(),
            vec!["CHAD", "PERU"]
        );

        let alone = load_initial(&local, None, "u").await;
        assert_eq!(alone, with_visit("PERU"));
    }
}
