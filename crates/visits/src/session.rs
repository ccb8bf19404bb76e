//! The state container owned by the composition root.
//!
//! All mutation goes through [`Session::dispatch`], which keeps visit records,
//! tag definitions, settings and the current selection consistent and reports
//! whether anything changed. Persisted changes are published as whole
//! [`Snapshot`]s on an optional change sink.

use chrono::NaiveDate;
use serde_json::Value;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, warn};

use crate::record::Rating;
use crate::settings::Settings;
use crate::snapshot::Snapshot;
use crate::store::VisitMap;
use crate::tags::{TagDefinition, TagTable};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SelectOptions {
    /// Selecting the already-selected country clears the selection.
    pub toggle: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Select { id: String, opts: SelectOptions },
    ClearSelection,
    ToggleVisited(String),
    SetVisited { id: String, visited: bool },
    MarkMany { ids: Vec<String>, visited: bool },
    ToggleMany(Vec<String>),
    SetNote { id: String, note: Option<String> },
    SetVisitedAt { id: String, date: Option<NaiveDate> },
    SetRating { id: String, rating: Option<Rating> },
    AddTag { id: String, tag: String },
    RemoveTag { id: String, tag: String },
    DefineTag(TagDefinition),
    /// Remove the definition and the tag from every record.
    DeleteTag(String),
    SetSetting { key: String, value: Value },
    /// Remove every visit record. Tags and settings survive.
    ClearAll,
    /// Replace all persisted state, e.g. after loading or importing.
    Replace(Snapshot),
}

impl Action {
    fn touches_persisted_state(&self) -> bool {
        !matches!(self, Action::Select { .. } | Action::ClearSelection)
    }
}

#[derive(Debug, Default)]
pub struct Session {
    visits: VisitMap,
    tags: TagTable,
    settings: Settings,
    selected: Option<String>,
    changes: Option<UnboundedSender<Snapshot>>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        let mut session = Self::new();
        session.install(snapshot);
        session
    }

    /// Publish a snapshot on `tx` after every persisted change.
    pub fn with_change_sink(mut self, tx: UnboundedSender<Snapshot>) -> Self {
        self.changes = Some(tx);
        self
    }

    pub fn attach_change_sink(&mut self, tx: UnboundedSender<Snapshot>) {
        self.changes = Some(tx);
    }

    pub fn detach_change_sink(&mut self) -> Option<UnboundedSender<Snapshot>> {
        self.changes.take()
    }

    pub fn visits(&self) -> &VisitMap {
        &self.visits
    }

    pub fn tags(&self) -> &TagTable {
        &self.tags
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            countries_by_id: self.visits.to_records(),
            tags_by_id: self.tags.clone().into_map(),
            settings: self.settings.clone(),
        }
    }

    /// Apply one action. Returns `true` if the session changed.
    pub fn dispatch(&mut self, action: Action) -> bool {
        let persisted = action.touches_persisted_state();
        let changed = self.apply(action);
        if changed && persisted {
            self.publish();
        }
        changed
    }

    pub fn select(&mut self, id: impl Into<String>, opts: SelectOptions) -> bool {
        self.dispatch(Action::Select { id: id.into(), opts })
    }

    pub fn clear_selection(&mut self) -> bool {
        self.dispatch(Action::ClearSelection)
    }

    pub fn delete_tag(&mut self, tag: impl Into<String>) -> bool {
        self.dispatch(Action::DeleteTag(tag.into()))
    }

    fn apply(&mut self, action: Action) -> bool {
        match action {
            Action::Select { id, opts } => {
                if self.selected.as_deref() == Some(id.as_str()) {
                    if opts.toggle {
                        self.selected = None;
                        return true;
                    }
                    return false;
                }
                self.selected = Some(id);
                true
            }
            Action::ClearSelection => self.selected.take().is_some(),
            Action::ToggleVisited(id) => self.edit_visits(|v| v.toggle_visited(&id)),
            Action::SetVisited { id, visited } => {
                self.edit_visits(|v| v.set_visited(&id, visited))
            }
            Action::MarkMany { ids, visited } => self.edit_visits(|v| v.mark_many(&ids, visited)),
            Action::ToggleMany(ids) => self.edit_visits(|v| v.toggle_many(&ids)),
            Action::SetNote { id, note } => self.edit_visits(|v| v.set_note(&id, note)),
            Action::SetVisitedAt { id, date } => self.edit_visits(|v| v.set_visited_at(&id, date)),
            Action::SetRating { id, rating } => self.edit_visits(|v| v.set_rating(&id, rating)),
            Action::AddTag { id, tag } => self.edit_visits(|v| v.add_tag(&id, &tag)),
            Action::RemoveTag { id, tag } => self.edit_visits(|v| v.remove_tag(&id, &tag)),
            Action::DefineTag(def) => self.tags.upsert(def),
            Action::DeleteTag(tag) => {
                let removed = self.tags.remove(&tag).is_some();
                let cascaded = self.edit_visits(|v| v.remove_tag_everywhere(&tag));
                removed || cascaded
            }
            Action::SetSetting { key, value } => self.settings.set(key, value),
            Action::ClearAll => self.edit_visits(VisitMap::clear),
            Action::Replace(snapshot) => {
                if snapshot == self.snapshot() {
                    return false;
                }
                self.install(snapshot);
                true
            }
        }
    }

    fn edit_visits(&mut self, op: impl FnOnce(&VisitMap) -> VisitMap) -> bool {
        let next = op(&self.visits);
        if next.ptr_eq(&self.visits) {
            return false;
        }
        self.visits = next;
        true
    }

    fn install(&mut self, snapshot: Snapshot) {
        self.visits = snapshot
            .countries_by_id
            .into_iter()
            .map(|(id, mut rec)| {
                rec.id = id;
                rec
            })
            .collect();
        self.tags = snapshot.tags_by_id.into();
        self.settings = snapshot.settings;
    }

    fn publish(&mut self) {
        let Some(tx) = &self.changes else {
            return;
        };
        if tx.send(self.snapshot()).is_err() {
            warn!("change receiver dropped; detaching persistence sink");
            self.changes = None;
        } else {
            debug!(records = self.visits.len(), "published snapshot");
        }
    }
}
