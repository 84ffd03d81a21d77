//! Settings file named on the command line with `--settings`.

use config::builder::DefaultState;
use config::{ConfigBuilder, File, FileFormat};
use std::path::Path;

/// Add a required TOML settings file; a missing file fails the build.
pub fn add_to_builder(builder: ConfigBuilder<DefaultState>, path: &Path) -> ConfigBuilder<DefaultState> {
    builder.add_source(File::from(path).format(FileFormat::Toml).required(true))
}
