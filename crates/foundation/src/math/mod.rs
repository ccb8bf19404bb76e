pub mod centroid;

pub use centroid::*;
