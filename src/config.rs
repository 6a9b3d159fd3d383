//! User defaults for the projection assumptions.
//!
//! Stored as JSON at `<config_dir>/entry-delay-projection/config.json`. A
//! missing file means built-in defaults; command-line flags override both.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::models::CalendarPolicy;

const APP_NAME: &str = "entry-delay-projection";
const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub hours_per_session: f64,
    pub entry_delay: f64,
    pub calendar_policy: CalendarPolicy,
    pub title: Option<String>,
    pub knowledge_base: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hours_per_session: 7.5,
            entry_delay: 1.0,
            calendar_policy: CalendarPolicy::AllDays,
            title: None,
            knowledge_base: None,
        }
    }
}

impl Config {
    /// Loads `path` when given, otherwise the default location.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match Self::default_path() {
                Some(path) => path,
                None => return Ok(Self::default()),
            },
        };
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("failed to parse config {}", path.display()))
    }

    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_NAME).join(CONFIG_FILE))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{ "entry_delay": 0.0, "calendar_policy": "business-days", "title": "Staff" }"#,
        )
        .unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.entry_delay, 0.0);
        assert_eq!(config.hours_per_session, 7.5);
        assert_eq!(config.calendar_policy, CalendarPolicy::BusinessDaysOnly);
        assert_eq!(config.title.as_deref(), Some("Staff"));
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "calendar_policy": "fortnightly" }"#).unwrap();
        assert!(Config::load_from(&path).is_err());
    }
}
