pub mod geojson;

pub use geojson::{Feature, FeatureCollection, GeoJsonError, Geometry};
