//! Configuration loading and management.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Toml};
use serde::{Deserialize, Serialize};

use wh_core::{ShiftConfig, ShiftConfigError};

/// Application configuration.
///
/// The shift definition fields are required: a run cannot proceed without
/// them, so extraction fails fast when either is absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Standard shift length as `"H:MM"`.
    pub standard_work_hours: String,

    /// Rest windows as `"HH:MM-HH:MM"`, in configuration order.
    pub rest_periods: Vec<String>,

    /// Directory holding the per-year ledger files.
    #[serde(default = "default_ledger_dir")]
    pub ledger_dir: PathBuf,
}

impl Config {
    /// Loads configuration from default locations.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load() -> Result<Self, figment::Error> {
        Self::load_from(None)
    }

    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::new();

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (WH_*)
        figment = figment.merge(Env::prefixed("WH_"));

        figment.extract()
    }

    /// Parses the shift definition fields into the engine's configuration.
    pub fn shift(&self) -> Result<ShiftConfig, ShiftConfigError> {
        ShiftConfig::from_parts(&self.standard_work_hours, &self.rest_periods)
    }
}

fn default_ledger_dir() -> PathBuf {
    dirs_data_path()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ledgers")
}

/// Returns the platform-specific config directory for wh.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("wh"))
}

/// Returns the platform-specific data directory for wh.
///
/// On Linux: `~/.local/share/wh`
pub fn dirs_data_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("wh"))
}
