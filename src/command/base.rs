//! Base command: argument storage and the shared load-configuration-then-application workflow.

use crate::command::{Command, CommandResult, ParsedInvocation, CONFIG_FILE_ARG};
use crate::error::CommandError;
use std::fs::File;
use std::path::Path;
use tracing::debug;

/// External collaborator that turns a configuration file into an application.
pub trait ApplicationLoader {
    type Application;

    fn load_app(&self, config_path: &Path) -> Result<Self::Application, CommandError>;
}

impl<A, F> ApplicationLoader for F
where
    F: Fn(&Path) -> Result<A, CommandError>,
{
    type Application = A;

    fn load_app(&self, config_path: &Path) -> Result<A, CommandError> {
        self(config_path)
    }
}

/// Base command that concrete commands embed.
///
/// `run` only stores the invocation; concrete commands call it first and then
/// do their work, typically through [`BaseCommand::load_application`].
#[derive(Debug, Default)]
pub struct BaseCommand {
    args: Option<ParsedInvocation>,
}

impl BaseCommand {
    pub fn new() -> Self {
        Self::default()
    }

    /// Invocation stored by the last `run`, if any.
    pub fn args(&self) -> Option<&ParsedInvocation> {
        self.args.as_ref()
    }

    /// Validate the configuration file argument and hand it to the loader.
    ///
    /// The loader is called exactly once, and only when the path names an
    /// existing regular file.
    pub fn load_application<L>(&self, loader: &L) -> Result<L::Application, CommandError>
    where
        L: ApplicationLoader + ?Sized,
    {
        let config_path = self
            .args
            .as_ref()
            .and_then(|args| args.get_str(CONFIG_FILE_ARG))
            .ok_or(CommandError::MissingConfigArgument)?;
        let config_path = Path::new(config_path);

        ensure_config_file(config_path)?;
        debug!(config_file = %config_path.display(), "loading application");
        loader.load_app(config_path)
    }
}

impl Command for BaseCommand {
    fn run(&mut self, invocation: ParsedInvocation) -> CommandResult {
        self.args = Some(invocation);
        Ok(None)
    }
}

/// Check that `path` names an existing regular file.
///
/// The file type is checked from metadata before anything is opened, so
/// FIFOs and devices are rejected without blocking. Any path that cannot be
/// inspected or opened is reported as not a file. The handle opened for the
/// check is closed before returning.
pub fn ensure_config_file(path: &Path) -> Result<(), CommandError> {
    let not_a_file = || CommandError::ConfigNotFound(path.to_path_buf());

    let metadata = std::fs::metadata(path).map_err(|_| not_a_file())?;
    if !metadata.is_file() {
        return Err(not_a_file());
    }
    let file = File::open(path).map_err(|_| not_a_file())?;
    drop(file);
    Ok(())
}
