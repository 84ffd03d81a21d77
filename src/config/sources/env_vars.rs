//! Environment overrides: `PLINTH__LOGGING__LEVEL=debug`, `PLINTH__PLUGINS__DIRS=/a,/b`.

use config::builder::DefaultState;
use config::{ConfigBuilder, Environment};

/// Prefix shared by all settings environment variables.
pub const ENV_PREFIX: &str = "PLINTH";

/// Add the environment source; it takes precedence over every file.
pub fn add_to_builder(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
    builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("plugins.dirs")
            .with_list_parse_key("plugins.disabled"),
    )
}
