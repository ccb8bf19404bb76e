//! Local versus remote reconciliation.
//!
//! Per country the copy with more filled-in facts wins and a tie goes to the
//! remote copy. Tags are always unioned. A tie can discard a local edit that
//! the remote side never saw; [`reconcile_report`] names those countries so the
//! loader can log them.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use visits::{Snapshot, VisitRecord};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Reconciled {
    pub snapshot: Snapshot,
    /// Countries where a tie replaced a differing local record.
    pub lossy_ties: Vec<String>,
}

pub fn reconcile(local: &Snapshot, remote: &Snapshot) -> Snapshot {
    reconcile_report(local, remote).snapshot
}

pub fn reconcile_report(local: &Snapshot, remote: &Snapshot) -> Reconciled {
    let mut countries: BTreeMap<String, VisitRecord> = local.countries_by_id.clone();
    let mut lossy_ties = Vec::new();

    for (id, theirs) in &remote.countries_by_id {
        let merged = match countries.get(id) {
            None => theirs.clone(),
            Some(ours) => {
                let (winner, lossy) = pick(ours, theirs);
                if lossy {
                    lossy_ties.push(id.clone());
                }
                VisitRecord {
                    id: id.clone(),
                    tags: ours.tags.union(&theirs.tags).cloned().collect(),
                    ..winner.clone()
                }
            }
        };
        countries.insert(id.clone(), merged);
    }

    let mut tags_by_id = local.tags_by_id.clone();
    for (id, def) in &remote.tags_by_id {
        tags_by_id.insert(id.clone(), def.clone());
    }

    Reconciled {
        snapshot: Snapshot {
            countries_by_id: countries,
            tags_by_id,
            settings: local.settings.merged_with(&remote.settings),
        },
        lossy_ties,
    }
}

/// Winner of one country plus whether a tie threw away different local facts.
fn pick<'a>(ours: &'a VisitRecord, theirs: &'a VisitRecord) -> (&'a VisitRecord, bool) {
    match ours.completeness().cmp(&theirs.completeness()) {
        Ordering::Greater => (ours, false),
        Ordering::Less => (theirs, false),
        Ordering::Equal => (theirs, !same_facts(ours, theirs)),
    }
}

fn same_facts(a: &VisitRecord, b: &VisitRecord) -> bool {
    a.visited == b.visited
        && a.note == b.note
        && a.rating == b.rating
        && a.visited_at == b.visited_at
}
