use std::collections::HashMap;

use catalog::CountryCatalog;
use formats::{Feature, FeatureCollection};
use foundation::hyphen_slug;
use tracing::debug;

use crate::fields::{candidate_codes, display_name};

/// Display name used when a feature carries no usable name field.
pub const UNKNOWN_TERRITORY: &str = "Unknown territory";

/// Prefix of geometry-derived IDs. Catalog IDs are `[A-Z0-9-]` only, so the
/// lowercase prefix and the `:` keep the two spaces disjoint.
pub const SYNTHETIC_PREFIX: &str = "geo:";

const SYNTHETIC_HEX_LEN: usize = 12;

/// Which resolution stage produced an ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Display name matched the catalog (canonical name or alias).
    CatalogName,
    /// An administrative code resolved to a catalog entry.
    CatalogCode,
    /// A non-catalog administrative code, used verbatim (uppercased).
    Code,
    /// Hyphen-slug of the display name.
    NameSlug,
    /// Hash of the geometry size.
    Synthetic,
}

impl Resolution {
    pub fn is_catalog(self) -> bool {
        matches!(self, Resolution::CatalogName | Resolution::CatalogCode)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedId {
    pub id: String,
    pub display_name: String,
    pub source: Resolution,
}

/// Cache key for a feature. Features have no stable object identity once
/// parsed, so callers key either by content or by position in the dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureKey {
    Content([u8; 32]),
    Index(usize),
}

impl FeatureKey {
    pub fn of(feature: &Feature) -> Self {
        let canonical = feature.to_geojson_value().to_string();
        FeatureKey::Content(*blake3::hash(canonical.as_bytes()).as_bytes())
    }
}

/// Resolves features to canonical IDs, memoizing per feature.
#[derive(Debug)]
pub struct IdentityResolver<'c> {
    catalog: &'c CountryCatalog,
    cache: HashMap<FeatureKey, ResolvedId>,
}

impl IdentityResolver<'static> {
    /// Resolver over the built-in catalog.
    pub fn builtin() -> Self {
        Self::new(CountryCatalog::global())
    }
}

impl<'c> IdentityResolver<'c> {
    pub fn new(catalog: &'c CountryCatalog) -> Self {
        Self {
            catalog,
            cache: HashMap::new(),
        }
    }

    pub fn catalog(&self) -> &'c CountryCatalog {
        self.catalog
    }

    /// Resolve keyed by feature content.
    pub fn resolve(&mut self, feature: &Feature) -> ResolvedId {
        self.resolve_keyed(FeatureKey::of(feature), feature)
    }

    /// Resolve keyed by the feature's index in its dataset. Cheaper than
    /// content hashing when the caller owns a stable collection.
    pub fn resolve_indexed(&mut self, index: usize, feature: &Feature) -> ResolvedId {
        self.resolve_keyed(FeatureKey::Index(index), feature)
    }

    pub fn resolve_collection(&mut self, collection: &FeatureCollection) -> Vec<ResolvedId> {
        collection
            .features
            .iter()
            .enumerate()
            .map(|(i, f)| self.resolve_indexed(i, f))
            .collect()
    }

    fn resolve_keyed(&mut self, key: FeatureKey, feature: &Feature) -> ResolvedId {
        if let Some(hit) = self.cache.get(&key) {
            return hit.clone();
        }
        let resolved = self.resolve_uncached(feature);
        self.cache.insert(key, resolved.clone());
        resolved
    }

    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// The resolution pipeline itself. Never fails.
    pub fn resolve_uncached(&self, feature: &Feature) -> ResolvedId {
        let name = display_name(feature);
        let display_str = name.clone().unwrap_or_else(|| UNKNOWN_TERRITORY.to_string());

        // A catalog name match wins over any code on the feature.
        if let Some(name) = name.as_deref()
            && let Some(entry) = self.catalog.lookup_name(name)
        {
            return ResolvedId {
                id: entry.id.clone(),
                display_name: display_str,
                source: Resolution::CatalogName,
            };
        }

        let codes = candidate_codes(feature);
        for code in &codes {
            if let Some(entry) = self.catalog.lookup(code) {
                debug!(code = %code, id = %entry.id, name = %display_str, "resolved by code");
                return ResolvedId {
                    id: entry.id.clone(),
                    display_name: display_str,
                    source: Resolution::CatalogCode,
                };
            }
        }
        if let Some(code) = codes.into_iter().next() {
            debug!(code = %code, name = %display_str, "non-catalog territory, using code");
            return ResolvedId {
                id: code,
                display_name: display_str,
                source: Resolution::Code,
            };
        }

        if let Some(name) = name.as_deref() {
            let slug = hyphen_slug(name);
            if !slug.is_empty() {
                debug!(slug = %slug, "non-catalog territory, using name slug");
                return ResolvedId {
                    id: slug,
                    display_name: display_str,
                    source: Resolution::NameSlug,
                };
            }
        }

        let id = synthetic_id(feature);
        debug!(id = %id, "feature has no usable name or code");
        ResolvedId {
            id,
            display_name: display_str,
            source: Resolution::Synthetic,
        }
    }
}

fn synthetic_id(feature: &Feature) -> String {
    let (vertices, parts) = feature
        .geometry
        .as_ref()
        .map(|g| (g.vertex_count(), g.part_count()))
        .unwrap_or((0, 0));
    let hash = blake3::hash(format!("{vertices}:{parts}").as_bytes());
    let hex = hash.to_hex();
    format!("{SYNTHETIC_PREFIX}{}", &hex.as_str()[..SYNTHETIC_HEX_LEN])
}

#[cfg(test)]
mod tests {
    use super::{FeatureKey, IdentityResolver, Resolution, SYNTHETIC_PREFIX, UNKNOWN_TERRITORY};
    use catalog::CountryCatalog;
    use formats::{Feature, Geometry};
    use foundation::LonLat;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn feature(props: serde_json::Value) -> Feature {
        let ring = vec![
            LonLat::new(0.0, 0.0),
            LonLat::new(1.0, 0.0),
            LonLat::new(1.0, 1.0),
            LonLat::new(0.0, 0.0),
        ];
        Feature::new(
            props.as_object().cloned().unwrap_or_default(),
            Some(Geometry::Polygon(vec![ring])),
        )
    }

    #[test]
    fn catalog_name_wins_over_conflicting_codes() {
        let r = IdentityResolver::builtin();
        // Natural Earth ships France and Norway with ISO_A3 = -99.
        let france = feature(json!({"NAME": "France", "ISO_A3": "-99", "ADM0_A3": "FRA"}));
        let got = r.resolve_uncached(&france);
        assert_eq!(got.id, "FRANCE");
        assert_eq!(got.source, Resolution::CatalogName);

        let misleading = feature(json!({"name": "Norway", "ISO_A3": "SWE"}));
        assert_eq!(r.resolve_uncached(&misleading).id, "NORWAY");
    }

    #[test]
    fn alias_variants_resolve_to_canonical_ids() {
        let r = IdentityResolver::builtin();
        let cases = [
            ("Dem. Rep. Congo", "DEMOCRATIC-REPUBLIC-OF-THE-CONGO"),
            ("United States of America", "UNITED-STATES"),
            ("Côte d'Ivoire", "COTE-D-IVOIRE"),
            ("eSwatini", "ESWATINI"),
            ("Bosnia and Herz.", "BOSNIA-AND-HERZEGOVINA"),
        ];
        for (name, id) in cases {
            assert_eq!(r.resolve_uncached(&feature(json!({"ADMIN": name}))).id, id);
        }
    }

    #[test]
    fn catalog_countries_never_receive_raw_codes() {
        let r = IdentityResolver::builtin();
        // Unknown long-form name but a valid code: still the catalog ID.
        let f = feature(json!({"NAME_LONG": "French Republic", "ISO_A3": "fra"}));
        let got = r.resolve_uncached(&f);
        assert_eq!(got.id, "FRANCE");
        assert_eq!(got.source, Resolution::CatalogCode);
    }

    #[test]
    fn territories_fall_back_to_codes_then_slugs() {
        let r = IdentityResolver::builtin();
        let greenland = feature(json!({"NAME": "Greenland", "ISO_A3": "GRL", "ISO_A2": "GL"}));
        let got = r.resolve_uncached(&greenland);
        assert_eq!(got.id, "GRL");
        assert_eq!(got.source, Resolution::Code);

        let somaliland = feature(json!({"NAME": "Somaliland", "ISO_A3": "-99", "ISO_A2": "-99"}));
        let got = r.resolve_uncached(&somaliland);
        assert_eq!(got.id, "SOMALILAND");
        assert_eq!(got.source, Resolution::NameSlug);
    }

    #[test]
    fn featureless_input_gets_a_synthetic_id() {
        let r = IdentityResolver::builtin();
        let anon = feature(json!({"ISO_A3": "-99", "POP": 12}));
        let got = r.resolve_uncached(&anon);
        assert_eq!(got.display_name, UNKNOWN_TERRITORY);
        assert_eq!(got.source, Resolution::Synthetic);
        assert!(got.id.starts_with(SYNTHETIC_PREFIX));
        assert!(!CountryCatalog::global().contains(&got.id));
        assert!(CountryCatalog::global().lookup(&got.id).is_none());

        let no_geometry = Feature::new(Default::default(), None);
        assert!(
            r.resolve_uncached(&no_geometry)
                .id
                .starts_with(SYNTHETIC_PREFIX)
        );
    }

    #[test]
    fn resolution_is_cached_and_idempotent() {
        let mut r = IdentityResolver::builtin();
        let f = feature(json!({"NAME": "Japan"}));
        let first = r.resolve(&f);
        let second = r.resolve(&f);
        assert_eq!(first, second);
        assert_eq!(r.cache_len(), 1);

        // Same content, separate instance: same key.
        let copy = f.clone();
        assert_eq!(FeatureKey::of(&copy), FeatureKey::of(&f));
        assert_eq!(r.resolve(&copy), first);
        assert_eq!(r.cache_len(), 1);

        assert_eq!(r.resolve_indexed(7, &f), r.resolve_indexed(7, &f));
        assert_eq!(r.cache_len(), 2);
        r.clear_cache();
        assert_eq!(r.cache_len(), 0);
    }

    #[test]
    fn index_keys_are_trusted_over_content() {
        let mut r = IdentityResolver::builtin();
        let japan = feature(json!({"NAME": "Japan"}));
        let chile = feature(json!({"NAME": "Chile"}));
        assert_eq!(r.resolve_indexed(0, &japan).id, "JAPAN");
        // Index 0 is already resolved for this dataset.
        assert_eq!(r.resolve_indexed(0, &chile).id, "JAPAN");
        assert_eq!(r.resolve(&chile).id, "CHILE");
    }
}
