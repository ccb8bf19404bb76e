//! Pan/zoom state for the flat world map.
//!
//! The transform never frames space outside the projection: at full zoom-out
//! the center is pinned to the origin, and at higher zoom levels it is clamped
//! into an envelope that shrinks as the zoom grows.

pub mod controller;
pub mod overrides;

pub use controller::{
    FOCUS_ZOOM, MAX_ZOOM, MIN_ZOOM, PanEnvelope, WHEEL_SENSITIVITY, ZOOM_STEP, ViewTransform,
};
pub use overrides::centroid_override;
