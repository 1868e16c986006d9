//! User settings for the `cfront-distro` tool.
//!
//! Read from `settings.toml` in the platform config directory. Every key is optional.
//!
//! ```toml
//! log_filter = "cfront_distro=debug"
//! log_file = "/var/log/cfront-distro.log"
//! pretty_output = false
//! caller_reference = "site-distribution"
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::app::cfront::{CallerReferenceProvider, FixedCallerReference, UuidCallerReference};

pub const SETTINGS_FILE_NAME: &str = "settings.toml";
pub const DEFAULT_LOG_FILTER: &str = "cfront_distro=info";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// `EnvFilter` directives; `RUST_LOG` wins when set
    pub log_filter: String,
    /// Log to this file instead of stderr
    pub log_file: Option<PathBuf>,
    pub pretty_output: bool,
    /// Pin every generated `CallerReference` to this value
    pub caller_reference: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_filter: DEFAULT_LOG_FILTER.to_string(),
            log_file: None,
            pretty_output: true,
            caller_reference: None,
        }
    }
}

impl Settings {
    /// Settings from the config directory. Runs before logging is installed, so the reason a
    /// settings file was skipped comes back alongside the defaults.
    pub fn load() -> (Self, Option<anyhow::Error>) {
        match Self::default_path() {
            Some(path) => Self::load_or_default(path),
            None => (Self::default(), None),
        }
    }

    /// Defaults when `path` does not exist; defaults and the error when it cannot be used
    pub fn load_or_default(path: impl AsRef<Path>) -> (Self, Option<anyhow::Error>) {
        let path = path.as_ref();
        if !path.exists() {
            return (Self::default(), None);
        }
        match Self::load_from_path(path) {
            Ok(settings) => (settings, None),
            Err(e) => (Self::default(), Some(e)),
        }
    }

    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {:?}", path))?;
        let settings: Settings = toml::from_str(&content)
            .with_context(|| format!("Failed to parse settings in {:?}", path))?;
        Ok(settings)
    }

    pub fn save_to_path(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self).context("Failed to serialize settings")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write settings to {:?}", path))?;
        Ok(())
    }

    pub fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "", "cfront-distro")
            .map(|dirs| dirs.config_dir().join(SETTINGS_FILE_NAME))
    }

    /// Command-line reference first, then the configured one, then random UUIDs
    pub fn caller_reference_provider(
        &self,
        override_reference: Option<&str>,
    ) -> Box<dyn CallerReferenceProvider> {
        match override_reference.or(self.caller_reference.as_deref()) {
            Some(reference) => Box::new(FixedCallerReference::new(reference)),
            None => Box::new(UuidCallerReference),
        }
    }
}
