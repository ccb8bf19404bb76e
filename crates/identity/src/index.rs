use std::collections::BTreeMap;

use formats::{FeatureCollection, Geometry};
use foundation::LonLat;

use crate::resolver::IdentityResolver;

/// Geometry per resolved ID. Features that resolve to the same ID (a country
/// split across several dataset rows) are merged into one multi-part shape.
#[derive(Debug, Clone, Default)]
pub struct GeometryIndex {
    shapes: BTreeMap<String, Geometry>,
}

impl GeometryIndex {
    pub fn build(resolver: &mut IdentityResolver<'_>, collection: &FeatureCollection) -> Self {
        let ids = resolver.resolve_collection(collection);
        let mut grouped: BTreeMap<String, Vec<&Geometry>> = BTreeMap::new();
        for (resolved, feature) in ids.into_iter().zip(&collection.features) {
            if let Some(geom) = feature.geometry.as_ref() {
                grouped.entry(resolved.id).or_default().push(geom);
            }
        }
        let shapes = grouped
            .into_iter()
            .filter_map(|(id, geoms)| Geometry::union_parts(geoms).map(|g| (id, g)))
            .collect();
        Self { shapes }
    }

    pub fn insert(&mut self, id: impl Into<String>, geometry: Geometry) {
        self.shapes.insert(id.into(), geometry);
    }

    pub fn get(&self, id: &str) -> Option<&Geometry> {
        self.shapes.get(id)
    }

    pub fn centroid(&self, id: &str) -> Option<LonLat> {
        self.get(id).and_then(Geometry::centroid)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.shapes.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::GeometryIndex;
    use crate::resolver::IdentityResolver;
    use formats::FeatureCollection;

    #[test]
    fn split_countries_are_merged_under_one_id() {
        let payload = r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","properties":{"NAME":"France"},
             "geometry":{"type":"Polygon","coordinates":[[[0,40],[8,40],[8,50],[0,50],[0,40]]]}},
            {"type":"Feature","properties":{"ADMIN":"France","ISO_A3":"-99"},
             "geometry":{"type":"Polygon","coordinates":[[[8,41],[9,41],[9,43],[8,43],[8,41]]]}},
            {"type":"Feature","properties":{"NAME":"Japan"},"geometry":null}
        ]}"#;
        let fc = FeatureCollection::from_geojson_str(payload).unwrap();
        let mut resolver = IdentityResolver::builtin();
        let index = GeometryIndex::build(&mut resolver, &fc);

        assert_eq!(index.ids().collect::<Vec<_>>(), vec!["FRANCE"]);
        assert_eq!(index.get("FRANCE").unwrap().part_count(), 2);
        let c = index.centroid("FRANCE").unwrap();
        assert!(c.lon > 4.0 && c.lon < 5.0, "{c:?}");
        assert!(index.centroid("JAPAN").is_none());
    }
}
