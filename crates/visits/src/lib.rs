//! Per-country visit state: records, tag definitions, settings, and the
//! session container that serializes every mutation.

pub mod record;
pub mod session;
pub mod settings;
pub mod snapshot;
pub mod store;
pub mod tags;

pub use record::{Rating, VisitRecord};
pub use session::{Action, SelectOptions, Session};
pub use settings::{DEFAULT_THEME, DEFAULT_VISITED_COLOR, Settings};
pub use snapshot::Snapshot;
pub use store::VisitMap;
pub use tags::{TagDefinition, TagTable};

/// Re-exported so callers can build `visitedAt` values without a direct
/// chrono dependency.
pub use chrono::NaiveDate;
