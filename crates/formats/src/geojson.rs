use foundation::LonLat;
use foundation::math::polygons_centroid;
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(LonLat),
    MultiPoint(Vec<LonLat>),
    LineString(Vec<LonLat>),
    MultiLineString(Vec<Vec<LonLat>>),
    Polygon(Vec<Vec<LonLat>>),
    MultiPolygon(Vec<Vec<Vec<LonLat>>>),
}

impl Geometry {
    /// Total number of positions across all parts.
    pub fn vertex_count(&self) -> usize {
        match self {
            Geometry::Point(_) => 1,
            Geometry::MultiPoint(ps) | Geometry::LineString(ps) => ps.len(),
            Geometry::MultiLineString(lines) | Geometry::Polygon(lines) => {
                lines.iter().map(Vec::len).sum()
            }
            Geometry::MultiPolygon(polys) => polys.iter().flatten().map(Vec::len).sum(),
        }
    }

    /// Number of top-level parts (points, lines or polygons).
    pub fn part_count(&self) -> usize {
        match self {
            Geometry::Point(_) | Geometry::LineString(_) | Geometry::Polygon(_) => 1,
            Geometry::MultiPoint(ps) => ps.len(),
            Geometry::MultiLineString(lines) => lines.len(),
            Geometry::MultiPolygon(polys) => polys.len(),
        }
    }

    /// View as polygon parts (ring 0 outer, the rest holes). Points and lines
    /// become single degenerate rings so centroid math can still average them.
    pub fn as_polygons(&self) -> Vec<Vec<Vec<LonLat>>> {
        match self {
            Geometry::Point(p) => vec![vec![vec![*p]]],
            Geometry::MultiPoint(ps) | Geometry::LineString(ps) => vec![vec![ps.clone()]],
            Geometry::MultiLineString(lines) => {
                lines.iter().map(|line| vec![line.clone()]).collect()
            }
            Geometry::Polygon(rings) => vec![rings.clone()],
            Geometry::MultiPolygon(polys) => polys.clone(),
        }
    }

    pub fn centroid(&self) -> Option<LonLat> {
        polygons_centroid(&self.as_polygons())
    }

    /// Merge several geometries into one multi-part polygon set.
    pub fn union_parts<'a>(geoms: impl IntoIterator<Item = &'a Geometry>) -> Option<Geometry> {
        let mut polys: Vec<Vec<Vec<LonLat>>> = Vec::new();
        let mut count = 0usize;
        let mut single: Option<&Geometry> = None;
        for g in geoms {
            count += 1;
            single = Some(g);
            polys.extend(g.as_polygons());
        }
        match count {
            0 => None,
            1 => single.cloned(),
            _ => Some(Geometry::MultiPolygon(polys)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    pub id: Option<String>,
    pub properties: Map<String, Value>,
    /// GeoJSON allows `"geometry": null`.
    pub geometry: Option<Geometry>,
}

impl Feature {
    pub fn new(properties: Map<String, Value>, geometry: Option<Geometry>) -> Self {
        Self {
            id: None,
            properties,
            geometry,
        }
    }

    /// String property value, trimmed; numbers are rendered as text.
    pub fn property_text(&self, key: &str) -> Option<String> {
        match self.properties.get(key)? {
            Value::String(s) => {
                let s = s.trim();
                (!s.is_empty()).then(|| s.to_string())
            }
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    pub fn to_geojson_value(&self) -> Value {
        let mut fobj = Map::new();
        fobj.insert("type".to_string(), Value::String("Feature".to_string()));
        if let Some(id) = &self.id {
            fobj.insert("id".to_string(), Value::String(id.clone()));
        }
        fobj.insert(
            "properties".to_string(),
            Value::Object(self.properties.clone()),
        );
        fobj.insert(
            "geometry".to_string(),
            self.geometry
                .as_ref()
                .map(geometry_to_geojson_value)
                .unwrap_or(Value::Null),
        );
        Value::Object(fobj)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
}

#[derive(Debug)]
pub enum GeoJsonError {
    Json(String),
    NotAFeatureCollection,
    InvalidFeature { index: usize, reason: String },
}

impl std::fmt::Display for GeoJsonError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GeoJsonError::Json(msg) => write!(f, "JSON parse error: {msg}"),
            GeoJsonError::NotAFeatureCollection => {
                write!(f, "expected GeoJSON FeatureCollection")
            }
            GeoJsonError::InvalidFeature { index, reason } => {
                write!(f, "invalid feature at index {index}: {reason}")
            }
        }
    }
}

impl std::error::Error for GeoJsonError {}

impl FeatureCollection {
    pub fn from_geojson_str(payload: &str) -> Result<Self, GeoJsonError> {
        let value: Value =
            serde_json::from_str(payload).map_err(|e| GeoJsonError::Json(e.to_string()))?;
        Self::from_geojson_value(value)
    }

    pub fn from_geojson_value(value: Value) -> Result<Self, GeoJsonError> {
        let obj = value
            .as_object()
            .ok_or(GeoJsonError::NotAFeatureCollection)?;
        let ty = obj
            .get("type")
            .and_then(|v| v.as_str())
            .ok_or(GeoJsonError::NotAFeatureCollection)?;
        if ty != "FeatureCollection" {
            return Err(GeoJsonError::NotAFeatureCollection);
        }

        let features_val = obj
            .get("features")
            .and_then(|v| v.as_array())
            .ok_or(GeoJsonError::NotAFeatureCollection)?;

        let mut features = Vec::with_capacity(features_val.len());
        for (index, feat_val) in features_val.iter().enumerate() {
            let feat_obj = feat_val.as_object().ok_or(GeoJsonError::InvalidFeature {
                index,
                reason: "feature must be an object".to_string(),
            })?;

            let feat_type = feat_obj.get("type").and_then(|v| v.as_str()).ok_or(
                GeoJsonError::InvalidFeature {
                    index,
                    reason: "feature missing type".to_string(),
                },
            )?;
            if feat_type != "Feature" {
                return Err(GeoJsonError::InvalidFeature {
                    index,
                    reason: format!("unexpected feature type: {feat_type}"),
                });
            }

            let id = match feat_obj.get("id") {
                Some(Value::String(s)) => Some(s.clone()),
                Some(Value::Number(n)) => Some(n.to_string()),
                _ => None,
            };

            // Property bags vary wildly between datasets; a missing or non-object
            // bag is treated as empty rather than rejected.
            let properties = feat_obj
                .get("properties")
                .and_then(|v| v.as_object())
                .cloned()
                .unwrap_or_default();

            let geometry = match feat_obj.get("geometry") {
                None | Some(Value::Null) => None,
                Some(v) => Some(
                    parse_geometry(v)
                        .map_err(|reason| GeoJsonError::InvalidFeature { index, reason })?,
                ),
            };

            features.push(Feature {
                id,
                properties,
                geometry,
            });
        }

        Ok(Self { features })
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

fn geometry_to_geojson_value(geom: &Geometry) -> Value {
    let (ty, coords) = match geom {
        Geometry::Point(p) => ("Point", point_coords(p)),
        Geometry::MultiPoint(ps) => ("MultiPoint", points_coords(ps)),
        Geometry::LineString(ps) => ("LineString", points_coords(ps)),
        Geometry::MultiLineString(lines) => ("MultiLineString", rings_coords(lines)),
        Geometry::Polygon(rings) => ("Polygon", rings_coords(rings)),
        Geometry::MultiPolygon(polys) => (
            "MultiPolygon",
            Value::Array(polys.iter().map(|p| rings_coords(p)).collect()),
        ),
    };
    let mut obj = Map::new();
    obj.insert("type".to_string(), Value::String(ty.to_string()));
    obj.insert("coordinates".to_string(), coords);
    Value::Object(obj)
}

fn point_coords(p: &LonLat) -> Value {
    Value::Array(vec![Value::from(p.lon), Value::from(p.lat)])
}

fn points_coords(ps: &[LonLat]) -> Value {
    Value::Array(ps.iter().map(point_coords).collect())
}

fn rings_coords(rings: &[Vec<LonLat>]) -> Value {
    Value::Array(rings.iter().map(|r| points_coords(r)).collect())
}

fn parse_geometry(value: &Value) -> Result<Geometry, String> {
    let obj = value
        .as_object()
        .ok_or("geometry must be an object".to_string())?;
    let ty = obj
        .get("type")
        .and_then(|v| v.as_str())
        .ok_or("geometry missing type".to_string())?;

    let coords = obj
        .get("coordinates")
        .ok_or("geometry missing coordinates".to_string())?;

    match ty {
        "Point" => Ok(Geometry::Point(parse_point(coords)?)),
        "MultiPoint" => Ok(Geometry::MultiPoint(parse_points(coords)?)),
        "LineString" => Ok(Geometry::LineString(parse_points(coords)?)),
        "MultiLineString" => Ok(Geometry::MultiLineString(parse_rings(coords)?)),
        "Polygon" => Ok(Geometry::Polygon(parse_rings(coords)?)),
        "MultiPolygon" => Ok(Geometry::MultiPolygon(parse_multi_polygon(coords)?)),
        other => Err(format!("unsupported geometry type: {other}")),
    }
}

fn parse_point(coords: &Value) -> Result<LonLat, String> {
    let arr = coords
        .as_array()
        .ok_or("position must be an array".to_string())?;
    if arr.len() < 2 {
        return Err("position must have [lon, lat]".to_string());
    }
    let lon = arr[0].as_f64().ok_or("lon must be a number".to_string())?;
    let lat = arr[1].as_f64().ok_or("lat must be a number".to_string())?;
    Ok(LonLat::new(lon, lat))
}

fn parse_points(coords: &Value) -> Result<Vec<LonLat>, String> {
    let arr = coords
        .as_array()
        .ok_or("coordinates must be an array".to_string())?;
    arr.iter().map(parse_point).collect()
}

fn parse_rings(coords: &Value) -> Result<Vec<Vec<LonLat>>, String> {
    let rings = coords
        .as_array()
        .ok_or("coordinates must be an array of rings".to_string())?;
    rings.iter().map(parse_points).collect()
}

fn parse_multi_polygon(coords: &Value) -> Result<Vec<Vec<Vec<LonLat>>>, String> {
    let polys = coords
        .as_array()
        .ok_or("MultiPolygon coordinates must be an array of polygons".to_string())?;
    polys.iter().map(parse_rings).collect()
}

#[cfg(test)]
mod tests {
    use super::{FeatureCollection, GeoJsonError, Geometry};
    use foundation::LonLat;

    const SAMPLE: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "id": 250,
                "properties": {"NAME": " France ", "ISO_A3": "-99", "POP": 67000000},
                "geometry": {
                    "type": "MultiPolygon",
                    "coordinates": [
                        [[[0, 40], [8, 40], [8, 50], [0, 50], [0, 40]]],
                        [[[-54, 2], [-52, 2], [-52, 5], [-54, 5], [-54, 2]]]
                    ]
                }
            },
            {
                "type": "Feature",
                "properties": null,
                "geometry": null
            }
        ]
    }"#;

    #[test]
    fn parses_heterogeneous_features() {
        let fc = FeatureCollection::from_geojson_str(SAMPLE).unwrap();
        assert_eq!(fc.len(), 2);

        let france = &fc.features[0];
        assert_eq!(france.id.as_deref(), Some("250"));
        assert_eq!(france.property_text("NAME").as_deref(), Some("France"));
        assert_eq!(france.property_text("POP").as_deref(), Some("67000000"));
        assert_eq!(france.property_text("missing"), None);
        let geom = france.geometry.as_ref().unwrap();
        assert_eq!(geom.part_count(), 2);
        assert_eq!(geom.vertex_count(), 10);

        let blank = &fc.features[1];
        assert!(blank.properties.is_empty());
        assert!(blank.geometry.is_none());
    }

    #[test]
    fn rejects_non_collections_and_bad_geometry() {
        assert!(matches!(
            FeatureCollection::from_geojson_str(r#"{"type":"Feature"}"#),
            Err(GeoJsonError::NotAFeatureCollection)
        ));
        assert!(matches!(
            FeatureCollection::from_geojson_str("{not json"),
            Err(GeoJsonError::Json(_))
        ));
        let bad = r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","properties":{},"geometry":{"type":"Point","coordinates":[1]}}
        ]}"#;
        assert!(matches!(
            FeatureCollection::from_geojson_str(bad),
            Err(GeoJsonError::InvalidFeature { index: 0, .. })
        ));
    }

    #[test]
    fn geojson_value_round_trips_geometry() {
        let fc = FeatureCollection::from_geojson_str(SAMPLE).unwrap();
        let value = serde_json::json!({
            "type": "FeatureCollection",
            "features": [fc.features[0].to_geojson_value()],
        });
        let again = FeatureCollection::from_geojson_value(value).unwrap();
        assert_eq!(again.features[0].geometry, fc.features[0].geometry);
    }

    #[test]
    fn union_parts_builds_multi_polygon() {
        let a = Geometry::Point(LonLat::new(1.0, 1.0));
        let b = Geometry::LineString(vec![LonLat::new(0.0, 0.0), LonLat::new(2.0, 0.0)]);
        assert_eq!(Geometry::union_parts([&a]), Some(a.clone()));
        let merged = Geometry::union_parts([&a, &b]).unwrap();
        assert_eq!(merged.part_count(), 2);
        assert!(Geometry::union_parts(std::iter::empty::<&Geometry>()).is_none());
    }
}
