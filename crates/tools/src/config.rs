use std::env;
use std::path::PathBuf;
use std::time::Duration;

use persistence::DEFAULT_DEBOUNCE;

use crate::cli::Args;
use crate::error::CliError;

pub const DEFAULT_DATA_DIR: &str = "./.passport";
pub const DEFAULT_USER: &str = "local";
pub const DEFAULT_SHARE_BASE: &str = "https://passport.example/";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub data_dir: PathBuf,
    /// `None` runs without a remote store.
    pub remote_dir: Option<PathBuf>,
    pub user: String,
    pub debounce: Duration,
    pub share_base: String,
}

impl Config {
    /// Flags first, then `PASSPORT_*` environment variables, then defaults.
    pub fn from_args(args: &Args) -> Result<Self, CliError> {
        Self::resolve(args, |key| env::var(key).ok())
    }

    pub fn resolve(
        args: &Args,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, CliError> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let data_dir = args
            .data_dir
            .clone()
            .or_else(|| var("PASSPORT_DATA_DIR").map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));
        let remote_dir = args
            .remote_dir
            .clone()
            .or_else(|| var("PASSPORT_REMOTE_DIR").map(PathBuf::from));
        let user = args
            .user
            .clone()
            .or_else(|| var("PASSPORT_USER"))
            .unwrap_or_else(|| DEFAULT_USER.to_string());
        let debounce = match args.debounce_ms {
            Some(ms) => Duration::from_millis(ms),
            None => match var("PASSPORT_SYNC_DEBOUNCE_MS") {
                Some(raw) => raw
                    .trim()
                    .parse::<u64>()
                    .map(Duration::from_millis)
                    .map_err(|e| {
                        CliError::Config(format!("PASSPORT_SYNC_DEBOUNCE_MS={raw:?}: {e}"))
                    })?,
                None => DEFAULT_DEBOUNCE,
            },
        };
        let share_base = args
            .share_base
            .clone()
            .or_else(|| var("PASSPORT_SHARE_BASE"))
            .unwrap_or_else(|| DEFAULT_SHARE_BASE.to_string());

        Ok(Config {
            data_dir,
            remote_dir,
            user,
            debounce,
            share_base,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::{Config, DEFAULT_DATA_DIR, DEFAULT_SHARE_BASE};
    use crate::cli::Args;
    use clap::Parser;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::path::PathBuf;
    use std::time::Duration;

    fn env_of(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn defaults_apply_without_flags_or_env() {
        let args = Args::try_parse_from(["passport", "list"]).unwrap();
        let cfg = Config::resolve(&args, |_| None).unwrap();
        assert_eq!(cfg.data_dir, PathBuf::from(DEFAULT_DATA_DIR));
        assert_eq!(cfg.remote_dir, None);
        assert_eq!(cfg.user, "local");
        assert_eq!(cfg.debounce, Duration::from_secs(2));
        assert_eq!(cfg.share_base, DEFAULT_SHARE_BASE);
    }

    #[test]
    fn flags_override_environment() {
        let env = env_of(&[
            ("PASSPORT_USER", "from-env"),
            ("PASSPORT_REMOTE_DIR", "/srv/remote"),
            ("PASSPORT_SYNC_DEBOUNCE_MS", "250"),
        ]);
        let args = Args::try_parse_from(["passport", "--user", "flag", "list"]).unwrap();
        let cfg = Config::resolve(&args, |k| env.get(k).cloned()).unwrap();
        assert_eq!(cfg.user, "flag");
        assert_eq!(cfg.remote_dir, Some(PathBuf::from("/srv/remote")));
        assert_eq!(cfg.debounce, Duration::from_millis(250));
    }

    #[test]
    fn bad_debounce_is_a_config_error() {
        let env = env_of(&[("PASSPORT_SYNC_DEBOUNCE_MS", "soon")]);
        let args = Args::try_parse_from(["passport", "list"]).unwrap();
        assert!(Config::resolve(&args, |k| env.get(k).cloned()).is_err());
    }
}
