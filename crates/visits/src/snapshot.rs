use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::record::VisitRecord;
use crate::settings::Settings;
use crate::tags::TagDefinition;

/// The persisted form of a session, shared by local storage and the remote
/// store: `{countriesById, tagsById, settings}`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default)]
    pub countries_by_id: BTreeMap<String, VisitRecord>,
    #[serde(default)]
    pub tags_by_id: BTreeMap<String, TagDefinition>,
    #[serde(default)]
    pub settings: Settings,
}

impl Snapshot {
    pub fn is_empty(&self) -> bool {
        self.countries_by_id.is_empty() && self.tags_by_id.is_empty() && self.settings.is_empty()
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::Snapshot;

    #[test]
    fn missing_members_default_to_empty() {
        let snap = Snapshot::from_json("{}").unwrap();
        assert!(snap.is_empty());
    }

    #[test]
    fn reads_the_documented_layout() {
        let raw = r##"{
            "countriesById": {"FRANCE": {"id": "FRANCE", "visited": true, "tags": ["food"], "rating": 5}},
            "tagsById": {"food": {"id": "food", "name": "Food", "color": "#f00", "emoji": "🍜"}},
            "settings": {"theme": "dark"}
        }"##;
        let snap = Snapshot::from_json(raw).unwrap();
        let fr = &snap.countries_by_id["FRANCE"];
        assert!(fr.visited);
        assert!(fr.tags.contains("food"));
        assert_eq!(fr.rating.map(|r| r.get()), Some(5));
        assert_eq!(snap.tags_by_id["food"].emoji.as_deref(), Some("🍜"));
        assert_eq!(snap.settings.theme(), "dark");

        let again = Snapshot::from_json(&snap.to_json_pretty().unwrap()).unwrap();
        assert_eq!(again, snap);
    }
}
