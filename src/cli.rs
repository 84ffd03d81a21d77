//! CLI domain: global options, grammar, routing and output only.
//! The grammar is rebuilt from the command registry on every run; nothing here is hard-coded per command.

mod grammar;
mod output;
mod parse;
mod route;
mod version;

pub use grammar::build_parser;
pub use output::map_error;
pub use parse::GlobalArgs;
pub use route::Runner;
pub use version::{resolve_version, version_for, DEVELOPMENT_VERSION};

/// Name the top-level parser reports in usage and `--version` output.
pub const PROGRAM_NAME: &str = "plinth";
