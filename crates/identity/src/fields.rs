//! Property names consulted when resolving a feature, in priority order.
//!
//! Natural Earth uses upper-case keys, most re-exports lower-case them, and a
//! few carry only one of the two; both spellings are listed.

use formats::Feature;

pub const NAME_FIELDS: &[&str] = &[
    "NAME",
    "name",
    "ADMIN",
    "admin",
    "NAME_EN",
    "name_en",
    "NAME_LONG",
    "name_long",
    "BRK_NAME",
    "SOVEREIGNT",
    "sovereignt",
];

pub const CODE_FIELDS: &[&str] = &[
    "ISO_A3",
    "iso_a3",
    "ISO_A3_EH",
    "ADM0_A3",
    "adm0_a3",
    "GU_A3",
    "SU_A3",
    "BRK_A3",
    "WB_A3",
    "ISO_A2",
    "iso_a2",
    "ISO_A2_EH",
];

/// Codes datasets use to mean "no code assigned".
const PLACEHOLDER_CODES: &[&str] = &["XX", "XXX", "ZZ", "ZZZ", "UNK"];

/// First non-blank name in `NAME_FIELDS` order.
pub fn display_name(feature: &Feature) -> Option<String> {
    NAME_FIELDS.iter().find_map(|k| feature.property_text(k))
}

/// Usable administrative codes in `CODE_FIELDS` order, uppercased, sentinels
/// removed, duplicates dropped.
pub fn candidate_codes(feature: &Feature) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for key in CODE_FIELDS {
        let Some(raw) = feature.property_text(key) else {
            continue;
        };
        if is_sentinel_code(&raw) {
            continue;
        }
        let code = raw.to_ascii_uppercase();
        if !out.contains(&code) {
            out.push(code);
        }
    }
    out
}

pub fn is_sentinel_code(raw: &str) -> bool {
    let code = raw.trim();
    if code.is_empty() || code == "-99" {
        return true;
    }
    let digits = code.strip_prefix('-').unwrap_or(code);
    if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) {
        return true;
    }
    PLACEHOLDER_CODES
        .iter()
        .any(|p| p.eq_ignore_ascii_case(code))
}

#[cfg(test)]
mod tests {
    use super::{candidate_codes, display_name, is_sentinel_code};
    use formats::Feature;
    use serde_json::json;

    fn feature(props: serde_json::Value) -> Feature {
        Feature::new(props.as_object().cloned().unwrap_or_default(), None)
    }

    #[test]
    fn sentinels_are_rejected() {
        for code in ["", "  ", "-99", "-1", "250", "0042", "XXX", "zz", "UNK"] {
            assert!(is_sentinel_code(code), "{code:?}");
        }
        for code in ["FRA", "fr", "SDS", "KOS"] {
            assert!(!is_sentinel_code(code), "{code:?}");
        }
    }

    #[test]
    fn display_name_follows_field_priority() {
        let f = feature(json!({"ADMIN": "Admin name", "name": "  ", "NAME_LONG": "Long"}));
        assert_eq!(display_name(&f).as_deref(), Some("Admin name"));
        assert_eq!(display_name(&feature(json!({"POP": 3}))), None);
    }

    #[test]
    fn candidate_codes_skip_sentinels_and_dedupe() {
        let f = feature(json!({
            "ISO_A3": "-99",
            "iso_a3": "",
            "ADM0_A3": "nor",
            "GU_A3": "NOR",
            "ISO_A2": 578,
            "ISO_A2_EH": "NO",
        }));
        assert_eq!(candidate_codes(&f), vec!["NOR".to_string(), "NO".to_string()]);
    }
}
