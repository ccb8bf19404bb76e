//! The fixed 195-country reference catalog and its alias table.
//!
//! Lookup order for an arbitrary identifier:
//! 1. exact canonical ID (`"FRANCE"`)
//! 2. case/accent-insensitive name, including known alternate names
//! 3. ISO 3166-1 alpha-3
//! 4. ISO 3166-1 alpha-2

use std::collections::HashMap;

use foundation::{hyphen_slug, name_key};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

mod aliases;
mod countries;

use aliases::NAME_ALIASES;
use countries::COUNTRY_SEEDS;

/// Number of countries the catalog tracks.
pub const CATALOG_SIZE: usize = 195;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Uppercase hyphen-slug of `name`.
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iso2: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iso3: Option<String>,
}

impl CatalogEntry {
    pub fn new(name: &str, iso2: Option<&str>, iso3: Option<&str>) -> Self {
        Self {
            id: hyphen_slug(name),
            name: name.to_string(),
            iso2: iso2.map(str::to_ascii_uppercase),
            iso3: iso3.map(str::to_ascii_uppercase),
        }
    }
}

/// Problems found while indexing a catalog. The built-in table is checked by
/// tests; indexing itself keeps the first entry for any duplicated key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogIssue {
    DuplicateId(String),
    DuplicateName(String),
    DuplicateCode(String),
    UnknownAliasTarget { alias: String, target: String },
    AliasShadowsName(String),
}

impl std::fmt::Display for CatalogIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogIssue::DuplicateId(id) => write!(f, "duplicate catalog id: {id}"),
            CatalogIssue::DuplicateName(name) => write!(f, "duplicate catalog name: {name}"),
            CatalogIssue::DuplicateCode(code) => write!(f, "duplicate ISO code: {code}"),
            CatalogIssue::UnknownAliasTarget { alias, target } => {
                write!(f, "alias {alias:?} points at unknown country {target:?}")
            }
            CatalogIssue::AliasShadowsName(alias) => {
                write!(f, "alias {alias:?} collides with an existing name")
            }
        }
    }
}

static GLOBAL: Lazy<CountryCatalog> =
    Lazy::new(|| CountryCatalog::from_parts(builtin_entries(), NAME_ALIASES));

/// Immutable catalog with precomputed lookup indexes.
#[derive(Debug, Clone)]
pub struct CountryCatalog {
    entries: Vec<CatalogEntry>,
    by_id: HashMap<String, usize>,
    by_name: HashMap<String, usize>,
    by_iso3: HashMap<String, usize>,
    by_iso2: HashMap<String, usize>,
    issues: Vec<CatalogIssue>,
}

impl CountryCatalog {
    /// The built-in 195-country catalog, indexed once per process.
    pub fn global() -> &'static CountryCatalog {
        &GLOBAL
    }

    pub fn from_parts(entries: Vec<CatalogEntry>, aliases: &[(&str, &str)]) -> Self {
        let mut catalog = CountryCatalog {
            entries: Vec::with_capacity(entries.len()),
            by_id: HashMap::with_capacity(entries.len()),
            by_name: HashMap::with_capacity(entries.len() + aliases.len()),
            by_iso3: HashMap::with_capacity(entries.len()),
            by_iso2: HashMap::with_capacity(entries.len()),
            issues: Vec::new(),
        };

        for entry in entries {
            if catalog.by_id.contains_key(&entry.id) {
                catalog.issues.push(CatalogIssue::DuplicateId(entry.id));
                continue;
            }
            let idx = catalog.entries.len();
            catalog.by_id.insert(entry.id.clone(), idx);
            if catalog.by_name.insert(name_key(&entry.name), idx).is_some() {
                catalog
                    .issues
                    .push(CatalogIssue::DuplicateName(entry.name.clone()));
            }
            for (code, index) in [
                (entry.iso3.as_ref(), &mut catalog.by_iso3),
                (entry.iso2.as_ref(), &mut catalog.by_iso2),
            ] {
                if let Some(code) = code
                    && index.insert(code.clone(), idx).is_some()
                {
                    catalog.issues.push(CatalogIssue::DuplicateCode(code.clone()));
                }
            }
            catalog.entries.push(entry);
        }

        for (alias, target) in aliases {
            let Some(&idx) = catalog.by_name.get(&name_key(target)) else {
                catalog.issues.push(CatalogIssue::UnknownAliasTarget {
                    alias: alias.to_string(),
                    target: target.to_string(),
                });
                continue;
            };
            let key = name_key(alias);
            if catalog.by_name.contains_key(&key) {
                catalog
                    .issues
                    .push(CatalogIssue::AliasShadowsName(alias.to_string()));
                continue;
            }
            catalog.by_name.insert(key, idx);
        }

        catalog
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Indexing problems; empty for a well-formed catalog.
    pub fn issues(&self) -> &[CatalogIssue] {
        &self.issues
    }

    /// Exact canonical-ID lookup.
    pub fn get(&self, id: &str) -> Option<&CatalogEntry> {
        self.by_id.get(id).map(|&i| &self.entries[i])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    /// Name stage only: canonical names and alias variants, ignoring case and
    /// accents.
    pub fn lookup_name(&self, name: &str) -> Option<&CatalogEntry> {
        let key = name_key(name);
        if key.is_empty() {
            return None;
        }
        self.by_name.get(&key).map(|&i| &self.entries[i])
    }

    /// Full lookup: canonical ID, then name/alias, then ISO3, then ISO2.
    pub fn lookup(&self, identifier: &str) -> Option<&CatalogEntry> {
        let identifier = identifier.trim();
        if identifier.is_empty() {
            return None;
        }
        if let Some(entry) = self.get(identifier) {
            return Some(entry);
        }
        if let Some(entry) = self.lookup_name(identifier) {
            return Some(entry);
        }
        let code = identifier.to_ascii_uppercase();
        match code.len() {
            3 => self.by_iso3.get(&code).map(|&i| &self.entries[i]),
            2 => self.by_iso2.get(&code).map(|&i| &self.entries[i]),
            _ => None,
        }
    }
}

fn builtin_entries() -> Vec<CatalogEntry> {
    COUNTRY_SEEDS
        .iter()
        .map(|&(name, iso2, iso3)| CatalogEntry::new(name, Some(iso2), Some(iso3)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{CATALOG_SIZE, CatalogEntry, CatalogIssue, CountryCatalog};
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;

    #[test]
    fn builtin_catalog_is_well_formed() {
        let cat = CountryCatalog::global();
        assert_eq!(cat.len(), CATALOG_SIZE);
        assert_eq!(cat.issues(), &[] as &[CatalogIssue]);
        let ids: HashSet<&str> = cat.entries().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids.len(), CATALOG_SIZE);
    }

    #[test]
    fn ids_are_slugs_of_names() {
        let cat = CountryCatalog::global();
        assert_eq!(cat.get("FRANCE").unwrap().name, "France");
        assert_eq!(cat.get("COTE-D-IVOIRE").unwrap().iso3.as_deref(), Some("CIV"));
        assert_eq!(
            cat.get("SAINT-VINCENT-AND-THE-GRENADINES").unwrap().iso2.as_deref(),
            Some("VC")
        );
        for e in cat.entries() {
            assert!(
                e.id
                    .chars()
                    .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '-'),
                "{}",
                e.id
            );
        }
    }

    #[test]
    fn lookup_follows_priority_order() {
        let cat = CountryCatalog::global();
        assert_eq!(cat.lookup("JAPAN").unwrap().id, "JAPAN");
        assert_eq!(cat.lookup("japan").unwrap().id, "JAPAN");
        assert_eq!(cat.lookup("Russian Federation").unwrap().id, "RUSSIA");
        assert_eq!(cat.lookup("Côte d'Ivoire").unwrap().id, "COTE-D-IVOIRE");
        assert_eq!(cat.lookup("Türkiye").unwrap().id, "TURKEY");
        assert_eq!(cat.lookup("deu").unwrap().id, "GERMANY");
        assert_eq!(cat.lookup("GB").unwrap().id, "UNITED-KINGDOM");
        assert_eq!(cat.lookup("  Holy See ").unwrap().id, "VATICAN-CITY");
        assert!(cat.lookup("Atlantis").is_none());
        assert!(cat.lookup("").is_none());
    }

    #[test]
    fn name_stage_beats_iso_codes() {
        // "USA" is both an alias and an ISO3 code; either way it lands on the same entry.
        let cat = CountryCatalog::global();
        assert_eq!(cat.lookup("USA").unwrap().id, "UNITED-STATES");
        assert_eq!(cat.lookup("Chad").unwrap().id, "CHAD");
    }

    #[test]
    fn dependent_territories_are_not_in_the_catalog() {
        let cat = CountryCatalog::global();
        for name in ["Greenland", "Puerto Rico", "Taiwan", "Kosovo", "Western Sahara"] {
            assert!(cat.lookup_name(name).is_none(), "{name}");
        }
    }

    #[test]
    fn indexing_reports_duplicates_and_bad_aliases() {
        let cat = CountryCatalog::from_parts(
            vec![
                CatalogEntry::new("Alpha", Some("AA"), Some("AAA")),
                CatalogEntry::new("alpha", Some("AB"), Some("AAB")),
                CatalogEntry::new("Beta", Some("AA"), None),
            ],
            &[("Alef", "Alpha"), ("Gamma land", "Gamma"), ("beta", "Alpha")],
        );
        assert_eq!(cat.len(), 2);
        assert_eq!(
            cat.issues(),
            &[
                CatalogIssue::DuplicateId("ALPHA".to_string()),
                CatalogIssue::DuplicateCode("AA".to_string()),
                CatalogIssue::UnknownAliasTarget {
                    alias: "Gamma land".to_string(),
                    target: "Gamma".to_string(),
                },
                CatalogIssue::AliasShadowsName("beta".to_string()),
            ]
        );
        assert_eq!(cat.lookup("alef").unwrap().id, "ALPHA");
    }
}
