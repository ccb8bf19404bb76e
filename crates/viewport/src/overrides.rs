//! Hand-picked focus points for countries whose area-weighted centroid lands
//! in the sea or on a far-flung territory.

use std::collections::HashMap;

use foundation::LonLat;
use once_cell::sync::Lazy;

const OVERRIDES: &[(&str, f64, f64)] = &[
    ("UNITED-STATES", -98.5, 39.8),
    ("CANADA", -101.0, 56.0),
    ("RUSSIA", 90.0, 61.0),
    ("FRANCE", 2.4, 46.6),
    ("NORWAY", 9.5, 61.5),
    ("DENMARK", 9.5, 56.0),
    ("NETHERLANDS", 5.3, 52.2),
    ("PORTUGAL", -8.2, 39.6),
    ("SPAIN", -3.7, 40.2),
    ("CHILE", -71.0, -33.5),
    ("ECUADOR", -78.4, -1.5),
    ("MALAYSIA", 102.0, 4.0),
    ("INDONESIA", 113.9, -2.0),
    ("NEW-ZEALAND", 172.5, -41.5),
    ("FIJI", 178.0, -17.8),
    ("KIRIBATI", 173.0, 1.4),
];

static TABLE: Lazy<HashMap<&'static str, LonLat>> = Lazy::new(|| {
    OVERRIDES
        .iter()
        .map(|&(id, lon, lat)| (id, LonLat::new(lon, lat)))
        .collect()
});

/// Focus point to use instead of the computed centroid, if any.
pub fn centroid_override(id: &str) -> Option<LonLat> {
    TABLE.get(id).copied()
}

#[cfg(test)]
mod tests {
    use super::{OVERRIDES, centroid_override};
    use catalog::CountryCatalog;

    #[test]
    fn every_override_is_a_catalog_country() {
        let catalog = CountryCatalog::global();
        for (id, lon, lat) in OVERRIDES {
            assert!(catalog.contains(id), "{id} is not a catalog id");
            assert!(lon.abs() <= 180.0 && lat.abs() <= 90.0);
        }
        assert!(centroid_override("FRANCE").is_some());
        assert!(centroid_override("JAPAN").is_none());
    }
}
