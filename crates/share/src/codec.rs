use std::fmt;

use base64::Engine as _;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use catalog::CountryCatalog;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use tracing::debug;
use visits::{Action, SelectOptions, Session, Snapshot, VisitRecord};

/// URL-safe alphabet, no padding on output, either form accepted on input.
const TOKEN_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// What a share link carries. `v` is kept sorted and free of duplicates so
/// equal states always produce the same token.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ShareableState {
    #[serde(default)]
    pub v: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub c: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    Empty,
    Base64(String),
    Json(String),
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::Empty => write!(f, "share token is empty"),
            DecodeError::Base64(e) => write!(f, "share token is not valid base64: {e}"),
            DecodeError::Json(e) => write!(f, "share token payload is not valid: {e}"),
        }
    }
}

impl std::error::Error for DecodeError {}

impl ShareableState {
    pub fn new(visited: impl IntoIterator<Item = impl Into<String>>) -> Self {
        let mut state = ShareableState {
            v: visited.into_iter().map(Into::into).collect(),
            ..Self::default()
        };
        state.canonicalize();
        state
    }

    pub fn with_selected(mut self, id: impl Into<String>) -> Self {
        self.s = Some(id.into());
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.c = Some(color.into());
        self
    }

    /// Share state of a session against the built-in catalog.
    pub fn from_session(session: &Session) -> Self {
        Self::from_session_in(session, CountryCatalog::global())
    }

    /// Visited catalog countries only; the color is included only when it is
    /// not the default.
    pub fn from_session_in(session: &Session, catalog: &CountryCatalog) -> Self {
        ShareableState {
            v: session
                .visits()
                .catalog_view(catalog)
                .filter(|r| r.visited)
                .map(|r| r.id.clone())
                .collect(),
            s: session.selected().map(str::to_string),
            c: session
                .settings()
                .custom_visited_color()
                .map(str::to_string),
        }
    }

    /// Load this state into `session` as a preview: the visited marks replace
    /// the session's records and tags, the color overrides the setting and the
    /// selection follows `s`. Returns `true` if the session changed.
    pub fn apply_to(&self, session: &mut Session) -> bool {
        let mut snapshot = Snapshot {
            settings: session.settings().clone(),
            ..Snapshot::default()
        };
        for id in &self.v {
            snapshot.countries_by_id.insert(
                id.clone(),
                VisitRecord {
                    visited: true,
                    ..VisitRecord::new(id.clone())
                },
            );
        }
        if let Some(color) = &self.c {
            snapshot.settings.set_visited_country_color(color.clone());
        }

        let mut changed = session.dispatch(Action::Replace(snapshot));
        changed |= match &self.s {
            Some(id) => session.select(id.clone(), SelectOptions::default()),
            None => session.clear_selection(),
        };
        changed
    }

    /// A fresh session showing only this state.
    pub fn preview_session(&self) -> Session {
        let mut session = Session::new();
        self.apply_to(&mut session);
        session
    }

    fn canonicalize(&mut self) {
        self.v.sort();
        self.v.dedup();
    }
}

pub fn encode(state: &ShareableState) -> String {
    let mut v = state.v.clone();
    v.sort();
    v.dedup();

    let mut payload = Map::new();
    payload.insert("v".to_string(), json!(v));
    if let Some(s) = &state.s {
        payload.insert("s".to_string(), json!(s));
    }
    if let Some(c) = &state.c {
        payload.insert("c".to_string(), json!(c));
    }
    TOKEN_ENGINE.encode(Value::Object(payload).to_string())
}

pub fn decode(token: &str) -> Result<ShareableState, DecodeError> {
    let token = token.trim();
    if token.is_empty() {
        return Err(DecodeError::Empty);
    }
    let bytes = TOKEN_ENGINE
        .decode(token)
        .map_err(|e| DecodeError::Base64(e.to_string()))?;
    let mut state: ShareableState =
        serde_json::from_slice(&bytes).map_err(|e| DecodeError::Json(e.to_string()))?;
    state.canonicalize();
    debug!(visited = state.v.len(), "decoded share token");
    Ok(state)
}

#[cfg(test)]
mod tests {
    use super::{DecodeError, ShareableState, decode, encode};
    use pretty_assertions::assert_eq;
    use visits::{Action, SelectOptions, Session};

    #[test]
    fn round_trips_the_documented_example() {
        let state = ShareableState::new(["FRANCE", "JAPAN"]).with_selected("JAPAN");
        let token = encode(&state);
        assert!(!token.contains('='));
        assert!(!token.contains('+') && !token.contains('/'));
        assert_eq!(decode(&token), Ok(state));
    }

    #[test]
    fn equal_states_give_equal_tokens() {
        let a = ShareableState {
            v: vec!["JAPAN".into(), "FRANCE".into(), "JAPAN".into()],
            ..ShareableState::default()
        };
        let b = ShareableState::new(["FRANCE", "JAPAN"]);
        assert_eq!(encode(&a), encode(&b));
    }

    #[test]
    fn padding_is_optional_on_input() {
        let token = encode(&ShareableState::new(["PERU"]));
        let padded = format!("{token}{}", "=".repeat((4 - token.len() % 4) % 4));
        assert_eq!(decode(&padded), decode(&token));
        assert!(decode(&token).is_ok());
    }

    #[test]
    fn malformed_tokens_fail_with_a_reason() {
        assert_eq!(decode("   "), Err(DecodeError::Empty));
        assert!(matches!(decode("%%%"), Err(DecodeError::Base64(_))));
        // "hello" in base64: valid alphabet, not JSON.
        assert!(matches!(decode("aGVsbG8"), Err(DecodeError::Json(_))));
    }

    #[test]
    fn session_export_skips_unknown_ids_and_default_color() {
        let mut session = Session::new();
        session.dispatch(Action::MarkMany {
            ids: vec!["JAPAN".into(), "FRANCE".into(), "GRL".into()],
            visited: true,
        });
        session.dispatch(Action::SetNote {
            id: "PERU".into(),
            note: Some("later".into()),
        });
        session.select("FRANCE", SelectOptions::default());

        let state = ShareableState::from_session(&session);
        assert_eq!(state.v, vec!["FRANCE".to_string(), "JAPAN".to_string()]);
        assert_eq!(state.s.as_deref(), Some("FRANCE"));
        assert_eq!(state.c, None);
    }

    #[test]
    fn import_builds_a_matching_preview() {
        let state = ShareableState::new(["FRANCE", "JAPAN"])
            .with_selected("JAPAN")
            .with_color("#ff8800");
        let preview = decode(&encode(&state)).unwrap().preview_session();
        assert_eq!(preview.visits().visited_ids(), state.v);
        assert_eq!(preview.selected(), Some("JAPAN"));
        assert_eq!(preview.settings().visited_country_color(), "#ff8800");
        assert_eq!(ShareableState::from_session(&preview), state);
    }
}
