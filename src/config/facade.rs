//! Settings loader: merges the configured sources into a [`PlinthConfig`].

use crate::config::merge::merge_policy;
use crate::config::sources::{env_vars, explicit_file, global_file};
use crate::config::PlinthConfig;
use crate::error::SettingsError;
use std::path::Path;
use tracing::debug;

/// Entry point for loading dispatcher settings.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load defaults, the global settings file and the environment.
    pub fn load() -> Result<PlinthConfig, SettingsError> {
        Self::load_with(global_file::global_config_path().as_deref(), None)
    }

    /// Load as [`ConfigLoader::load`], then layer `path` on top. The file must exist.
    pub fn load_from_file(path: &Path) -> Result<PlinthConfig, SettingsError> {
        Self::load_with(global_file::global_config_path().as_deref(), Some(path))
    }

    /// Load from an explicit set of files.
    pub fn load_with(
        global: Option<&Path>,
        explicit: Option<&Path>,
    ) -> Result<PlinthConfig, SettingsError> {
        let mut builder = merge_policy::builder_with_defaults()?;
        if let Some(global) = global {
            builder = global_file::add_to_builder(builder, global);
        }
        if let Some(explicit) = explicit {
            debug!(settings = %explicit.display(), "loading settings file");
            builder = explicit_file::add_to_builder(builder, explicit);
        }
        builder = env_vars::add_to_builder(builder);

        let config: PlinthConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }
}
