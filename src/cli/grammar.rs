//! CLI grammar: one subcommand per registered command.

use crate::cli::parse::GlobalArgs;
use crate::cli::PROGRAM_NAME;
use crate::plugin::CommandRegistry;
use clap::{Args, Command};

/// Build the top-level parser for `registry`.
///
/// Subcommand names are exactly the registry keys. Each subcommand's help
/// line is the command's summary and its arguments come from the declared
/// specs.
pub fn build_parser(registry: &CommandRegistry, version: &str) -> Command {
    let mut parser = GlobalArgs::augment_args(
        Command::new(PROGRAM_NAME)
            .about("Run commands discovered from installed plugins")
            .version(version.to_string())
            .disable_help_subcommand(true)
            .arg_required_else_help(true),
    );
    if !registry.is_empty() {
        parser = parser.subcommand_required(true);
    }
    registry
        .iter()
        .fold(parser, |parser, (name, command_type)| {
            parser.subcommand(command_type.to_clap_command(name))
        })
}
