use foundation::{Aabb2, LonLat};
use identity::GeometryIndex;
use tracing::debug;
use visits::Session;

use crate::overrides::centroid_override;

/// Full zoom-out; the whole map is framed and panning is disabled.
pub const MIN_ZOOM: f64 = 1.0;

pub const MAX_ZOOM: f64 = 4.0;

/// Increment for the zoom buttons.
pub const ZOOM_STEP: f64 = 0.5;

/// Zoom change per unit of wheel delta. Negative deltas zoom in.
pub const WHEEL_SENSITIVITY: f64 = 0.002;

/// Zoom level used when flying to a country.
pub const FOCUS_ZOOM: f64 = 2.5;

/// Largest center offset allowed at any zoom, in degrees.
const MAX_HALF_LON: f64 = 40.0;
const MAX_HALF_LAT: f64 = 20.0;

/// Envelope half-extents scale as `k / zoom`.
const LON_SCALE: f64 = 80.0;
const LAT_SCALE: f64 = 40.0;

/// Box the map center may move within at a given zoom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanEnvelope {
    pub half_lon: f64,
    pub half_lat: f64,
}

impl PanEnvelope {
    pub fn for_zoom(zoom: f64) -> Self {
        let zoom = clamp_zoom(zoom);
        if zoom <= MIN_ZOOM {
            return PanEnvelope {
                half_lon: 0.0,
                half_lat: 0.0,
            };
        }
        PanEnvelope {
            half_lon: MAX_HALF_LON.min(LON_SCALE / zoom),
            half_lat: MAX_HALF_LAT.min(LAT_SCALE / zoom),
        }
    }

    pub fn bounds(&self) -> Aabb2 {
        Aabb2::centered(self.half_lon, self.half_lat)
    }

    pub fn clamp(&self, p: LonLat) -> LonLat {
        self.bounds().clamp(p)
    }

    pub fn contains(&self, p: LonLat) -> bool {
        self.bounds().contains(p)
    }
}

/// Zoom and center of the map view. Every mutation re-clamps the center
/// through the envelope of the resulting zoom, so the invariants hold after
/// any sequence of calls regardless of input device.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    zoom: f64,
    center: LonLat,
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self {
            zoom: MIN_ZOOM,
            center: LonLat::ORIGIN,
        }
    }
}

impl ViewTransform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn center(&self) -> LonLat {
        self.center
    }

    pub fn envelope(&self) -> PanEnvelope {
        PanEnvelope::for_zoom(self.zoom)
    }

    /// Set the zoom (clamped to `[MIN_ZOOM, MAX_ZOOM]`) and re-clamp the center.
    pub fn set_zoom(&mut self, zoom: f64) {
        if !zoom.is_finite() {
            return;
        }
        self.zoom = clamp_zoom(zoom);
        self.center = self.envelope().clamp(self.center);
    }

    pub fn zoom_in(&mut self) {
        self.set_zoom(self.zoom + ZOOM_STEP);
    }

    pub fn zoom_out(&mut self) {
        self.set_zoom(self.zoom - ZOOM_STEP);
    }

    /// Continuous zoom from a wheel or trackpad delta.
    pub fn zoom_by_wheel(&mut self, delta: f64) {
        self.set_zoom(self.zoom - delta * WHEEL_SENSITIVITY);
    }

    pub fn set_center(&mut self, lon: f64, lat: f64) {
        let proposed = LonLat::new(lon, lat);
        if !proposed.is_finite() {
            return;
        }
        self.center = self.envelope().clamp(proposed);
    }

    pub fn pan_by(&mut self, dlon: f64, dlat: f64) {
        self.set_center(self.center.lon + dlon, self.center.lat + dlat);
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Zoom to `FOCUS_ZOOM` over the country `id`.
    ///
    /// The focus point is the override for `id` when one exists, else the
    /// centroid of its geometry. Returns the committed (clamped) center, or
    /// `None` and leaves the view untouched if neither is known.
    pub fn fly_to_country(&mut self, id: &str, index: &GeometryIndex) -> Option<LonLat> {
        let Some(target) = centroid_override(id).or_else(|| index.centroid(id)) else {
            debug!(country = id, "no geometry to fly to");
            return None;
        };
        self.zoom = FOCUS_ZOOM;
        self.center = self.envelope().clamp(target);
        debug!(
            country = id,
            lon = self.center.lon,
            lat = self.center.lat,
            "flew to country"
        );
        Some(self.center)
    }

    pub fn fly_to_selection(&mut self, session: &Session, index: &GeometryIndex) -> Option<LonLat> {
        let id = session.selected()?;
        self.fly_to_country(id, index)
    }
}

fn clamp_zoom(zoom: f64) -> f64 {
    zoom.clamp(MIN_ZOOM, MAX_ZOOM)
}
