//! Global settings file: $XDG_CONFIG_HOME/plinth/config.toml (platform config dir elsewhere)

use config::builder::DefaultState;
use config::{ConfigBuilder, File, FileFormat};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Path to the global settings file, if the platform has a config directory.
pub fn global_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "plinth").map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Add the global settings file to the builder if it exists.
pub fn add_to_builder(builder: ConfigBuilder<DefaultState>, path: &Path) -> ConfigBuilder<DefaultState> {
    if !path.is_file() {
        debug!(settings = %path.display(), "no global settings file");
        return builder;
    }
    let canonical = dunce::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
    builder.add_source(File::from(canonical.as_path()).format(FileFormat::Toml).required(false))
}
