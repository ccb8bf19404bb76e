use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const DEFAULT_THEME: &str = "light";
pub const DEFAULT_VISITED_COLOR: &str = "#22c55e";

const THEME_KEY: &str = "theme";
const VISITED_COLOR_KEY: &str = "visitedCountryColor";

/// User settings as an open JSON object. Known keys get typed accessors;
/// anything else written by other clients is carried through untouched.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Settings {
    values: Map<String, Value>,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn theme(&self) -> &str {
        self.str_value(THEME_KEY).unwrap_or(DEFAULT_THEME)
    }

    pub fn visited_country_color(&self) -> &str {
        self.str_value(VISITED_COLOR_KEY)
            .unwrap_or(DEFAULT_VISITED_COLOR)
    }

    /// The visited color only when it differs from the default.
    pub fn custom_visited_color(&self) -> Option<&str> {
        let color = self.visited_country_color();
        (!color.eq_ignore_ascii_case(DEFAULT_VISITED_COLOR)).then_some(color)
    }

    pub fn set_theme(&mut self, theme: impl Into<String>) -> bool {
        self.set(THEME_KEY, Value::String(theme.into()))
    }

    pub fn set_visited_country_color(&mut self, color: impl Into<String>) -> bool {
        self.set(VISITED_COLOR_KEY, Value::String(color.into()))
    }

    /// Set a raw key. Returns `true` if the stored value changed.
    pub fn set(&mut self, key: impl Into<String>, value: Value) -> bool {
        let key = key.into();
        if self.values.get(&key) == Some(&value) {
            return false;
        }
        self.values.insert(key, value);
        true
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Shallow merge: every key present in `overrides` replaces ours.
    pub fn merged_with(&self, overrides: &Settings) -> Settings {
        let mut values = self.values.clone();
        for (k, v) in &overrides.values {
            values.insert(k.clone(), v.clone());
        }
        Settings { values }
    }

    fn str_value(&self, key: &str) -> Option<&str> {
        self.values.get(key).and_then(Value::as_str)
    }
}
