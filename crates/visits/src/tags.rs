use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagDefinition {
    pub id: String,
    pub name: String,
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
}

impl TagDefinition {
    pub fn new(id: impl Into<String>, name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color: color.into(),
            emoji: None,
        }
    }

    pub fn with_emoji(mut self, emoji: impl Into<String>) -> Self {
        self.emoji = Some(emoji.into());
        self
    }
}

/// Tag definitions keyed by tag id.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagTable {
    defs: BTreeMap<String, TagDefinition>,
}

impl TagTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace. Returns `true` if the table changed.
    pub fn upsert(&mut self, def: TagDefinition) -> bool {
        if self.defs.get(&def.id) == Some(&def) {
            return false;
        }
        self.defs.insert(def.id.clone(), def);
        true
    }

    pub fn remove(&mut self, id: &str) -> Option<TagDefinition> {
        self.defs.remove(id)
    }

    pub fn get(&self, id: &str) -> Option<&TagDefinition> {
        self.defs.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.defs.contains_key(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TagDefinition> {
        self.defs.values()
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    pub fn clear(&mut self) {
        self.defs.clear();
    }

    pub fn into_map(self) -> BTreeMap<String, TagDefinition> {
        self.defs
    }
}

impl From<BTreeMap<String, TagDefinition>> for TagTable {
    fn from(defs: BTreeMap<String, TagDefinition>) -> Self {
        Self { defs }
    }
}

impl FromIterator<TagDefinition> for TagTable {
    fn from_iter<I: IntoIterator<Item = TagDefinition>>(iter: I) -> Self {
        Self {
            defs: iter.into_iter().map(|d| (d.id.clone(), d)).collect(),
        }
    }
}
