//! Immutable visit map.
//!
//! Every operation returns a new `VisitMap`; records that an operation does not
//! touch are shared (`Arc`) with the input. An operation that changes nothing
//! returns a map for which `ptr_eq` with the input holds, so callers can detect
//! change by reference instead of by deep comparison.
//!
//! None of the operations can fail. IDs outside the catalog are stored as given
//! and simply never show up in catalog-backed views.
//!
//! Sharing is per record: a single-record edit copies the outer map of `Arc`
//! handles, which is O(n) pointer clones for n records. The catalog caps n at a
//! few hundred entries, so the outer map is not structurally shared.

use std::collections::BTreeMap;
use std::sync::Arc;

use catalog::CountryCatalog;
use chrono::NaiveDate;

use crate::record::{Rating, VisitRecord};

type Records = BTreeMap<String, Arc<VisitRecord>>;

#[derive(Debug, Clone, Default)]
pub struct VisitMap {
    records: Arc<Records>,
}

impl PartialEq for VisitMap {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || self.records == other.records
    }
}

impl VisitMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: impl IntoIterator<Item = VisitRecord>) -> Self {
        let records = records
            .into_iter()
            .map(|r| (r.id.clone(), Arc::new(r)))
            .collect();
        Self {
            records: Arc::new(records),
        }
    }

    /// Same underlying map instance.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.records, &other.records)
    }

    pub fn get(&self, id: &str) -> Option<&VisitRecord> {
        self.records.get(id).map(Arc::as_ref)
    }

    /// Shared handle to a record, for identity checks across versions.
    pub fn get_shared(&self, id: &str) -> Option<&Arc<VisitRecord>> {
        self.records.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.records.contains_key(id)
    }

    pub fn is_visited(&self, id: &str) -> bool {
        self.get(id).is_some_and(|r| r.visited)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &VisitRecord> {
        self.records.values().map(Arc::as_ref)
    }

    /// Visited IDs in ascending order.
    pub fn visited_ids(&self) -> Vec<String> {
        self.iter()
            .filter(|r| r.visited)
            .map(|r| r.id.clone())
            .collect()
    }

    pub fn visited_count(&self) -> usize {
        self.iter().filter(|r| r.visited).count()
    }

    /// Records whose key is a catalog country.
    pub fn catalog_view<'a>(
        &'a self,
        catalog: &'a CountryCatalog,
    ) -> impl Iterator<Item = &'a VisitRecord> + 'a {
        self.iter().filter(move |r| catalog.contains(&r.id))
    }

    pub fn to_records(&self) -> BTreeMap<String, VisitRecord> {
        self.records
            .iter()
            .map(|(k, v)| (k.clone(), VisitRecord::clone(v)))
            .collect()
    }

    pub fn toggle_visited(&self, id: &str) -> VisitMap {
        self.update(id, |r| r.visited = !r.visited)
    }

    pub fn set_visited(&self, id: &str, visited: bool) -> VisitMap {
        self.update(id, |r| r.visited = visited)
    }

    /// Blank notes are stored as no note.
    pub fn set_note(&self, id: &str, note: Option<String>) -> VisitMap {
        let note = note
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());
        self.update(id, |r| r.note = note)
    }

    pub fn set_visited_at(&self, id: &str, date: Option<NaiveDate>) -> VisitMap {
        self.update(id, |r| r.visited_at = date)
    }

    pub fn set_rating(&self, id: &str, rating: Option<Rating>) -> VisitMap {
        self.update(id, |r| r.rating = rating)
    }

    pub fn add_tag(&self, id: &str, tag: &str) -> VisitMap {
        self.update(id, |r| {
            r.tags.insert(tag.to_string());
        })
    }

    pub fn remove_tag(&self, id: &str, tag: &str) -> VisitMap {
        self.update(id, |r| {
            r.tags.remove(tag);
        })
    }

    /// Mark or unmark many countries. Unmarking an ID that has no record is a
    /// no-op, so bulk unmarks never add placeholder records.
    pub fn mark_many<S: AsRef<str>>(&self, ids: &[S], visited: bool) -> VisitMap {
        let mut next: Option<Records> = None;
        for id in ids {
            let id = id.as_ref();
            let current = next.as_ref().unwrap_or(&*self.records).get(id);
            let replacement = match current {
                Some(rec) if rec.visited == visited => continue,
                Some(rec) => VisitRecord {
                    visited,
                    ..VisitRecord::clone(rec)
                },
                None if visited => VisitRecord {
                    visited: true,
                    ..VisitRecord::new(id)
                },
                None => continue,
            };
            next.get_or_insert_with(|| (*self.records).clone())
                .insert(id.to_string(), Arc::new(replacement));
        }
        self.finish(next)
    }

    /// Flip each ID in order, creating a default record first when absent.
    pub fn toggle_many<S: AsRef<str>>(&self, ids: &[S]) -> VisitMap {
        if ids.is_empty() {
            return self.clone();
        }
        let mut next = (*self.records).clone();
        for id in ids {
            let id = id.as_ref();
            let mut rec = next
                .get(id)
                .map(|r| VisitRecord::clone(r))
                .unwrap_or_else(|| VisitRecord::new(id));
            rec.visited = !rec.visited;
            next.insert(id.to_string(), Arc::new(rec));
        }
        self.finish(Some(next))
    }

    /// Drop `tag` from every record in one pass.
    pub fn remove_tag_everywhere(&self, tag: &str) -> VisitMap {
        let mut next: Option<Records> = None;
        for (id, rec) in self.records.iter() {
            if !rec.tags.contains(tag) {
                continue;
            }
            let mut rec = VisitRecord::clone(rec);
            rec.tags.remove(tag);
            next.get_or_insert_with(|| (*self.records).clone())
                .insert(id.clone(), Arc::new(rec));
        }
        self.finish(next)
    }

    /// Remove every record.
    pub fn clear(&self) -> VisitMap {
        if self.records.is_empty() {
            return self.clone();
        }
        VisitMap::new()
    }

    /// Drop records that are unvisited and carry no metadata.
    pub fn prune_inert(&self) -> VisitMap {
        if !self.records.values().any(|r| r.is_inert()) {
            return self.clone();
        }
        let kept = self
            .records
            .iter()
            .filter(|(_, r)| !r.is_inert())
            .map(|(k, r)| (k.clone(), Arc::clone(r)))
            .collect();
        VisitMap {
            records: Arc::new(kept),
        }
    }

    /// Apply `edit` to the record for `id` (a default record when absent).
    /// An existing record left unchanged yields `self` back, and so does an
    /// edit that would create an inert record for an absent ID.
    fn update(&self, id: &str, edit: impl FnOnce(&mut VisitRecord)) -> VisitMap {
        let existing = self.records.get(id);
        let mut rec = existing
            .map(|r| VisitRecord::clone(r))
            .unwrap_or_else(|| VisitRecord::new(id));
        edit(&mut rec);
        let unchanged = match existing {
            Some(old) => **old == rec,
            None => rec.is_inert(),
        };
        if unchanged {
            return self.clone();
        }
        let mut next = (*self.records).clone();
        next.insert(id.to_string(), Arc::new(rec));
        VisitMap {
            records: Arc::new(next),
        }
    }

    fn finish(&self, next: Option<Records>) -> VisitMap {
        match next {
            Some(records) => VisitMap {
                records: Arc::new(records),
            },
            None => self.clone(),
        }
    }
}

impl FromIterator<VisitRecord> for VisitMap {
    fn from_iter<I: IntoIterator<Item = VisitRecord>>(iter: I) -> Self {
        VisitMap::from_records(iter)
    }
}
