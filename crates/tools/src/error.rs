use std::fmt;
use std::io;
use std::path::PathBuf;

use formats::GeoJsonError;
use persistence::StoreError;
use share::DecodeError;

#[derive(Debug)]
pub enum CliError {
    Config(String),
    UnknownCountry(String),
    InvalidRating(u8),
    InvalidDate(String),
    UnknownTag(String),
    NoGeometry(String),
    Read { path: PathBuf, source: io::Error },
    GeoJson(GeoJsonError),
    Share(DecodeError),
    Store(StoreError),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(msg) => write!(f, "configuration: {msg}"),
            CliError::UnknownCountry(c) => write!(f, "unknown country: {c:?}"),
            CliError::InvalidRating(r) => write!(f, "rating must be 1-5, got {r}"),
            CliError::InvalidDate(d) => write!(f, "invalid date {d:?} (expected YYYY-MM-DD)"),
            CliError::UnknownTag(t) => write!(f, "unknown tag {t:?}; define it first"),
            CliError::NoGeometry(id) => write!(f, "no geometry or focus point for {id}"),
            CliError::Read { path, source } => write!(f, "read {}: {source}", path.display()),
            CliError::GeoJson(e) => write!(f, "geojson: {e}"),
            CliError::Share(e) => write!(f, "{e}"),
            CliError::Store(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Read { source, .. } => Some(source),
            CliError::GeoJson(e) => Some(e),
            CliError::Share(e) => Some(e),
            CliError::Store(e) => Some(e),
            _ => None,
        }
    }
}

impl From<GeoJsonError> for CliError {
    fn from(e: GeoJsonError) -> Self {
        CliError::GeoJson(e)
    }
}

impl From<DecodeError> for CliError {
    fn from(e: DecodeError) -> Self {
        CliError::Share(e)
    }
}

impl From<StoreError> for CliError {
    fn from(e: StoreError) -> Self {
        CliError::Store(e)
    }
}
