//! CLI route: parse the argument vector against the registry and dispatch to one command.

use crate::cli::grammar::build_parser;
use crate::cli::version::resolve_version;
use crate::cli::PROGRAM_NAME;
use crate::command::{from_matches, ParsedInvocation};
use crate::error::DispatchError;
use crate::manager::CommandManager;
use clap::error::ErrorKind;
use std::ffi::OsString;
use tracing::{debug, info};

/// Owns the command manager and runs one invocation against it.
pub struct Runner {
    manager: CommandManager,
    version: String,
}

impl Runner {
    /// Create a runner reporting the resolved program version.
    pub fn new(manager: CommandManager) -> Self {
        Self {
            manager,
            version: resolve_version(),
        }
    }

    /// Override the reported version string.
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn manager(&self) -> &CommandManager {
        &self.manager
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// The top-level parser for the current registry.
    pub fn parser(&self) -> clap::Command {
        build_parser(self.manager.commands(), &self.version)
    }

    /// Parse `args` (without the program name) into an invocation.
    pub fn parse<I, T>(&self, args: I) -> Result<ParsedInvocation, DispatchError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let mut parser = self.parser();
        let argv = std::iter::once(OsString::from(PROGRAM_NAME)).chain(args.into_iter().map(Into::into));
        let matches = parser.try_get_matches_from_mut(argv)?;

        let Some((name, sub_matches)) = matches.subcommand() else {
            return Err(parser
                .error(ErrorKind::MissingSubcommand, "a command is required")
                .into());
        };
        let command_type = self
            .manager
            .get(name)
            .ok_or_else(|| DispatchError::UnknownCommand(name.to_string()))?;

        let invocation = from_matches(name, sub_matches, command_type.arguments());
        debug!(command = %name, values = ?invocation.values(), "parsed invocation");
        Ok(invocation)
    }

    /// Parse `args`, run the selected command and return the process exit status.
    ///
    /// A fresh command instance is created for this run only.
    pub fn run<I, T>(&self, args: I) -> Result<i32, DispatchError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let invocation = self.parse(args)?;
        let name = invocation.command_name().to_string();
        let command_type = self
            .manager
            .get(&name)
            .ok_or_else(|| DispatchError::UnknownCommand(name.clone()))?;

        info!(command = %name, "dispatching command");
        let mut command = command_type.instantiate();
        let code = command.run(invocation)?.unwrap_or(0);
        debug!(command = %name, exit_code = code, "command finished");
        Ok(code)
    }
}
