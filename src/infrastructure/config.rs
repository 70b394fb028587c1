use crate::application::builders::argument_builder::{DEFAULT_MAX_TIME_SECS, TOOL_NAME};
use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const ENV_CURL: &str = "CCLEARLY_CURL";
pub const ENV_TIMEOUT: &str = "CCLEARLY_TIMEOUT";
pub const ENV_DATA_DIR: &str = "CCLEARLY_DATA_DIR";

const PROFILE_FILE: &str = "config.json";
const HISTORY_FILE: &str = "history.db";

/// Runtime configuration.
///
/// Layered as: defaults, then a JSON profile (`config.json` in the data
/// directory unless a path is given), then `CCLEARLY_*` environment
/// variables. CLI flags are applied last by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub curl_path: PathBuf,
    pub timeout_secs: u64,
    pub data_dir: PathBuf,
    pub history_enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            curl_path: PathBuf::from(TOOL_NAME),
            timeout_secs: DEFAULT_MAX_TIME_SECS,
            data_dir: default_data_dir(),
            history_enabled: true,
        }
    }
}

impl Config {
    /// Loads the profile at `profile`, or the default profile if it exists.
    /// An explicitly named profile must exist.
    pub fn load(profile: Option<&Path>) -> Result<Self> {
        let defaults = Self::default();
        let path = match profile {
            Some(path) => Some(path.to_path_buf()),
            None => Some(defaults.data_dir.join(PROFILE_FILE)).filter(|path| path.exists()),
        };
        let mut config = match path {
            Some(path) => Self::from_file(&path)?,
            None => defaults,
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("read profile: {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("parse profile: {}", path.display()))
    }

    /// Overrides fields from environment-style lookups.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(curl) = lookup(ENV_CURL) {
            self.curl_path = PathBuf::from(curl);
        }
        if let Some(timeout) = lookup(ENV_TIMEOUT) {
            self.timeout_secs = timeout
                .trim()
                .parse()
                .map_err(|e| anyhow!("Invalid {}: '{}' ({})", ENV_TIMEOUT, timeout, e))?;
        }
        if let Some(dir) = lookup(ENV_DATA_DIR) {
            self.data_dir = PathBuf::from(dir);
        }
        Ok(())
    }

    pub fn history_path(&self) -> PathBuf {
        self.data_dir.join(HISTORY_FILE)
    }
}

pub fn default_data_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(ENV_DATA_DIR) {
        return PathBuf::from(dir);
    }
    ProjectDirs::from("dev", "cclearly", "cclearly")
        .map(|dirs| dirs.data_local_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".cclearly"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn defaults_match_tool_conventions() {
        let config = Config::default();
        assert_eq!(config.curl_path, PathBuf::from("curl"));
        assert_eq!(config.timeout_secs, 30);
        assert!(config.history_enabled);
        assert!(config.history_path().ends_with("history.db"));
    }

    #[test]
    fn env_overrides_fields() {
        let mut config = Config::default();
        config
            .apply_env(lookup(&[
                (ENV_CURL, "/opt/curl/bin/curl"),
                (ENV_TIMEOUT, " 5 "),
                (ENV_DATA_DIR, "/tmp/cc"),
            ]))
            .unwrap();
        assert_eq!(config.curl_path, PathBuf::from("/opt/curl/bin/curl"));
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.history_path(), PathBuf::from("/tmp/cc/history.db"));
    }

    #[test]
    fn invalid_timeout_is_rejected() {
        let mut config = Config::default();
        let err = config.apply_env(lookup(&[(ENV_TIMEOUT, "soon")])).unwrap_err();
        assert!(err.to_string().contains(ENV_TIMEOUT));
    }

    #[test]
    fn profile_fills_missing_fields_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("profile.json");
        std::fs::write(&path, r#"{"timeout_secs": 90, "history_enabled": false}"#).unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.timeout_secs, 90);
        assert!(!config.history_enabled);
        assert_eq!(config.curl_path, PathBuf::from("curl"));
    }

    #[test]
    fn missing_named_profile_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::load(Some(&dir.path().join("nope.json"))).is_err());
    }
}
