//! Error types for the plinth command dispatcher.

use std::path::PathBuf;
use thiserror::Error;

/// A command type that does not satisfy the command contract.
///
/// Always a plugin-authoring bug; surfaced during discovery.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContractViolation {
    #[error("command has no documentation to derive a summary from")]
    MissingDocumentation,

    #[error("argument name is empty")]
    EmptyArgumentName,

    #[error("argument `{0}` is declared more than once")]
    DuplicateArgument(String),

    #[error("argument `{name}`: {reason}")]
    InvalidArgument { name: String, reason: String },

    #[error("arguments rejected by the parser: {0}")]
    RejectedByParser(String),
}

/// Failure to resolve a single plugin registration into a command type.
#[derive(Debug, Error)]
pub enum PluginError {
    #[error("contract violation: {0}")]
    Contract(#[from] ContractViolation),

    #[error("failed to load: {0}")]
    Load(String),

    #[error("loader panicked: {0}")]
    Panicked(String),

    #[error("invalid plugin descriptor: {0}")]
    Descriptor(#[from] serde_json::Error),

    #[error("plugin I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while a command runs.
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("`{}` is not a file.", .0.display())]
    ConfigNotFound(PathBuf),

    #[error("no configuration file argument was supplied")]
    MissingConfigArgument,

    #[error("failed to load application: {0}")]
    ApplicationLoad(String),

    #[error("command failed: {0}")]
    Failed(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Dispatcher settings errors.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("invalid settings: {0}")]
    Invalid(String),

    #[error("invalid logging setup: {0}")]
    Logging(String),
}

/// Top-level errors produced by the runner.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Usage(#[from] clap::Error),

    #[error("no command registered under `{0}`")]
    UnknownCommand(String),

    #[error(transparent)]
    Command(#[from] CommandError),

    #[error(transparent)]
    Settings(#[from] SettingsError),
}

impl DispatchError {
    /// Process exit status for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            DispatchError::Usage(err) => err.exit_code(),
            DispatchError::UnknownCommand(_) => 2,
            DispatchError::Command(_) | DispatchError::Settings(_) => 1,
        }
    }
}
