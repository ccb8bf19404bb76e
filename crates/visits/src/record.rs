use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A 1..=5 star rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(stars: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&stars).then_some(Rating(stars))
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Rating {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Rating::new(value).ok_or_else(|| format!("rating must be 1..=5, got {value}"))
    }
}

impl From<Rating> for u8 {
    fn from(r: Rating) -> u8 {
        r.0
    }
}

/// Per-country user data. Created lazily on first mutation, never removed
/// individually.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitRecord {
    /// Mirrors the record's key in `countriesById`; stored records may omit it.
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub visited: bool,
    #[serde(default)]
    pub tags: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visited_at: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<Rating>,
}

impl VisitRecord {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    /// Not visited and carrying no metadata at all.
    pub fn is_inert(&self) -> bool {
        !self.visited
            && self.tags.is_empty()
            && self.note.is_none()
            && self.visited_at.is_none()
            && self.rating.is_none()
    }

    /// Count of filled-in facts, used to pick the richer of two copies.
    pub fn completeness(&self) -> u8 {
        u8::from(self.visited)
            + u8::from(self.note.is_some())
            + u8::from(self.rating.is_some())
            + u8::from(self.visited_at.is_some())
    }
}
