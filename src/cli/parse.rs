//! CLI parse: dispatcher-wide options shared by every invocation.

use crate::cli::PROGRAM_NAME;
use clap::{Arg, ArgAction, Args, Command, FromArgMatches};
use std::ffi::OsString;
use std::path::PathBuf;

/// Options that belong to the dispatcher rather than to any command.
///
/// They must appear before the subcommand name.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct GlobalArgs {
    /// Dispatcher settings file (layered over the global settings file)
    #[arg(long, value_name = "FILE")]
    pub settings: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Disable logging entirely
    #[arg(long)]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long, value_name = "FORMAT")]
    pub log_format: Option<String>,

    /// Log output (stderr, stdout, file)
    #[arg(long, value_name = "OUTPUT")]
    pub log_output: Option<String>,

    /// Log file path (if output is "file")
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,
}

impl GlobalArgs {
    /// Best-effort read of the global options ahead of discovery.
    ///
    /// `args` excludes the program name. Everything from the first
    /// non-option word on is left for the full parser. Help and version
    /// flags are accepted and ignored here, and anything else this pass
    /// cannot make sense of falls back to the defaults.
    pub fn bootstrap<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let lenient = Self::augment_args(
            Command::new(PROGRAM_NAME)
                .no_binary_name(true)
                .disable_help_flag(true)
                .disable_version_flag(true)
                .allow_external_subcommands(true)
                .arg(Arg::new("help").short('h').long("help").action(ArgAction::SetTrue))
                .arg(Arg::new("version").long("version").action(ArgAction::SetTrue)),
        );
        lenient
            .try_get_matches_from(args)
            .ok()
            .and_then(|matches| Self::from_arg_matches(&matches).ok())
            .unwrap_or_default()
    }
}
