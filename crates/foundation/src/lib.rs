pub mod bounds;
pub mod geo;
pub mod math;
pub mod slug;

// Foundation crate: small, well-tested primitives only.
pub use bounds::*;
pub use geo::*;
pub use slug::*;
