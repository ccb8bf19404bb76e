//! Load-time cleanup of legacy record keys.
//!
//! Older clients stored some countries under suffixed keys such as `FRA-1` or
//! `NOR-2`. Those collapse onto their bare prefix and colliding records merge.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;
use visits::{Snapshot, VisitRecord};

static LEGACY_KEY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Za-z]{2,4})-\d+$").expect("valid legacy key regex"));

/// The bare prefix of a legacy key, or `None` for keys already in canonical form.
pub fn legacy_base_key(key: &str) -> Option<&str> {
    LEGACY_KEY
        .captures(key)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Merge `incoming` into `existing`.
///
/// `visited` is OR-ed and tags are unioned, so those two fields are
/// commutative and idempotent. For note, rating and visit date the incoming
/// value wins when present; an absent value never clears a present one.
pub fn merge_records(existing: &VisitRecord, incoming: &VisitRecord) -> VisitRecord {
    VisitRecord {
        id: existing.id.clone(),
        visited: existing.visited || incoming.visited,
        tags: existing.tags.union(&incoming.tags).cloned().collect(),
        note: incoming.note.clone().or_else(|| existing.note.clone()),
        visited_at: incoming.visited_at.or(existing.visited_at),
        rating: incoming.rating.or(existing.rating),
    }
}

/// Rewrite legacy keys and merge collisions. Keys are processed in ascending
/// order; every output record's `id` equals its key.
pub fn normalize_records(records: BTreeMap<String, VisitRecord>) -> BTreeMap<String, VisitRecord> {
    let mut out: BTreeMap<String, VisitRecord> = BTreeMap::new();
    for (key, mut rec) in records {
        let target = match legacy_base_key(&key) {
            Some(base) => {
                debug!(from = %key, to = base, "rewriting legacy record key");
                base.to_string()
            }
            None => key,
        };
        rec.id = target.clone();
        let merged = match out.get(&target) {
            Some(existing) => merge_records(existing, &rec),
            None => rec,
        };
        out.insert(target, merged);
    }
    out
}

pub fn normalize_snapshot(snapshot: Snapshot) -> Snapshot {
    Snapshot {
        countries_by_id: normalize_records(snapshot.countries_by_id),
        ..snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::{legacy_base_key, merge_records, normalize_records};
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;
    use visits::{NaiveDate, Rating, VisitRecord};

    fn rec(id: &str, visited: bool, tags: &[&str]) -> VisitRecord {
        VisitRecord {
            visited,
            tags: tags.iter().map(|t| t.to_string()).collect(),
            ..VisitRecord::new(id)
        }
    }

    fn keyed(records: Vec<VisitRecord>) -> BTreeMap<String, VisitRecord> {
        records.into_iter().map(|r| (r.id.clone(), r)).collect()
    }

    #[test]
    fn recognizes_legacy_keys_only() {
        assert_eq!(legacy_base_key("FRA-1"), Some("FRA"));
        assert_eq!(legacy_base_key("nor-12"), Some("nor"));
        assert_eq!(legacy_base_key("FRANCE"), None);
        assert_eq!(legacy_base_key("GUINEA-BISSAU"), None);
        assert_eq!(legacy_base_key("A-1"), None);
        assert_eq!(legacy_base_key("ABCDE-1"), None);
        assert_eq!(legacy_base_key("FRA-"), None);
    }

    #[test]
    fn suffixed_keys_collapse_and_merge() {
        let mut a = rec("FRA-1", true, &[]);
        a.note = Some("a".to_string());
        let b = rec("FRA-2", false, &["x"]);

        let out = normalize_records(keyed(vec![a, b]));
        assert_eq!(out.len(), 1);
        let fra = &out["FRA"];
        assert_eq!(fra.id, "FRA");
        assert!(fra.visited);
        assert_eq!(fra.tags.iter().collect::<Vec<_>>(), vec!["x"]);
        assert_eq!(fra.note.as_deref(), Some("a"));
    }

    #[test]
    fn later_keys_win_scalars_but_absent_never_clears() {
        let mut a = rec("NOR-1", false, &[]);
        a.rating = Rating::new(2);
        a.visited_at = NaiveDate::from_ymd_opt(2019, 6, 1);
        let mut b = rec("NOR-2", false, &[]);
        b.rating = Rating::new(5);

        let out = normalize_records(keyed(vec![b, a]));
        let nor = &out["NOR"];
        assert_eq!(nor.rating, Rating::new(5));
        assert_eq!(nor.visited_at, NaiveDate::from_ymd_opt(2019, 6, 1));
    }

    #[test]
    fn normalizing_twice_changes_nothing() {
        let input = keyed(vec![
            rec("FRA-1", true, &["a"]),
            rec("FRA-2", false, &["b"]),
            rec("JAPAN", true, &[]),
        ]);
        let once = normalize_records(input);
        let twice = normalize_records(once.clone());
        assert_eq!(twice, once);
    }

    #[test]
    fn merge_is_commutative_on_flags_and_tags() {
        let a = rec("X", true, &["one", "two"]);
        let b = rec("X", false, &["two", "three"]);
        let ab = merge_records(&a, &b);
        let ba = merge_records(&b, &a);
        assert_eq!(ab.visited, ba.visited);
        assert_eq!(ab.tags, ba.tags);
        assert_eq!(merge_records(&ab, &ab), ab);
    }
}
