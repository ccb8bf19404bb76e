//! Maps features from heterogeneous geographic datasets onto canonical
//! catalog IDs.

pub mod fields;
pub mod index;
pub mod resolver;

pub use index::GeometryIndex;
pub use resolver::{
    FeatureKey, IdentityResolver, Resolution, ResolvedId, SYNTHETIC_PREFIX, UNKNOWN_TERRITORY,
};
