//! Dispatcher settings
//!
//! Settings for the dispatcher itself (logging and plugin discovery), not the
//! configuration files commands receive. Sources are merged in increasing
//! precedence: built-in defaults, the global settings file, an explicit
//! settings file, then `PLINTH__*` environment variables.

use crate::error::SettingsError;
use crate::logging::{LogFormat, LogOutput, LoggingConfig};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

mod facade;
mod merge;
mod sources;

pub use facade::ConfigLoader;
pub use sources::global_file::global_config_path;

/// Root settings structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlinthConfig {
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Plugin discovery settings
    #[serde(default)]
    pub plugins: PluginSettings,
}

/// Where command plugins are discovered
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginSettings {
    /// Extra directories scanned for `plinth-<name>` executables, after `PATH`
    #[serde(default)]
    pub dirs: Vec<PathBuf>,

    /// Scan the directories listed in `PATH`
    #[serde(default = "default_true")]
    pub use_system_path: bool,

    /// Plugin names that are never loaded
    #[serde(default)]
    pub disabled: Vec<String>,
}

fn default_true() -> bool {
    true
}

impl Default for PluginSettings {
    fn default() -> Self {
        Self {
            dirs: Vec::new(),
            use_system_path: default_true(),
            disabled: Vec::new(),
        }
    }
}

impl PlinthConfig {
    /// Validate the merged settings.
    pub fn validate(&self) -> Result<(), SettingsError> {
        LogFormat::parse(&self.logging.format)?;
        LogOutput::parse(&self.logging.output)?;

        if let Some(name) = self.plugins.disabled.iter().find(|n| n.trim().is_empty()) {
            return Err(SettingsError::Invalid(format!(
                "plugins.disabled contains an empty name: {:?}",
                name
            )));
        }
        Ok(())
    }
}
