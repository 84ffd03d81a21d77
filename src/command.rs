//! Command contract: the shape every dispatchable command satisfies.
//!
//! A command is described by a [`CommandType`]: explicit documentation (the
//! summary is derived from its first line), an ordered list of
//! [`ArgumentSpec`]s, and a factory that creates a fresh [`Command`] instance
//! per invocation.

mod argument;
mod base;
mod invocation;

pub use argument::{default_arguments, Action, ArgOptions, ArgumentSpec, Nargs, CONFIG_FILE_ARG};
pub use base::{ensure_config_file, ApplicationLoader, BaseCommand};
pub use invocation::{ArgValue, ParsedInvocation};

pub(crate) use invocation::from_matches;

use crate::error::{CommandError, ContractViolation};
use std::collections::HashSet;
use std::fmt;

/// Outcome of a command run: `None` means success, `Some(code)` is an explicit exit status.
pub type CommandResult = Result<Option<i32>, CommandError>;

/// A runnable command instance. Created per invocation and dropped afterwards.
pub trait Command {
    /// Perform the command's work with the parsed invocation.
    fn run(&mut self, invocation: ParsedInvocation) -> CommandResult;
}

/// Statically-typed commands: documentation and arguments declared on the type itself.
pub trait CommandKind: Command + Sized + 'static {
    /// Documentation the summary is derived from.
    const DOC: &'static str;

    /// Declared arguments. Overriding replaces the default entirely.
    fn arguments() -> Vec<ArgumentSpec> {
        default_arguments()
    }

    /// Construct a fresh instance; commands take no constructor arguments.
    fn create() -> Self;
}

type CommandFactory = Box<dyn Fn() -> Box<dyn Command>>;

/// Loadable command type: documentation, argument specs and an instance factory.
pub struct CommandType {
    doc: String,
    arguments: Vec<ArgumentSpec>,
    factory: CommandFactory,
}

impl CommandType {
    /// Create a command type with the default arguments.
    pub fn new<F, C>(doc: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> C + 'static,
        C: Command + 'static,
    {
        Self {
            doc: doc.into(),
            arguments: default_arguments(),
            factory: Box::new(move || Box::new(factory())),
        }
    }

    /// Build the command type for a [`CommandKind`].
    pub fn of<K: CommandKind>() -> Self {
        Self::new(K::DOC, K::create).with_arguments(K::arguments())
    }

    /// Replace the declared arguments.
    pub fn with_arguments(mut self, arguments: Vec<ArgumentSpec>) -> Self {
        self.arguments = arguments;
        self
    }

    pub fn doc(&self) -> &str {
        &self.doc
    }

    /// One-line summary derived from the documentation.
    pub fn summary(&self) -> Result<String, ContractViolation> {
        summary(&self.doc)
    }

    pub fn arguments(&self) -> &[ArgumentSpec] {
        &self.arguments
    }

    /// Create a new command instance.
    pub fn instantiate(&self) -> Box<dyn Command> {
        (self.factory)()
    }

    /// Project onto a clap subcommand named `name`, with the summary as its help line.
    pub fn to_clap_command(&self, name: &str) -> clap::Command {
        let about = self.summary().unwrap_or_default();
        self.arguments
            .iter()
            .fold(clap::Command::new(name.to_string()).about(about), |cmd, spec| {
                cmd.arg(spec.to_clap_arg())
            })
    }

    /// Check the contract: a derivable summary and a coherent argument list.
    pub fn validate(&self) -> Result<(), ContractViolation> {
        self.summary()?;

        let mut dests = HashSet::new();
        let mut flags = HashSet::new();
        let mut seen_optional_positional = false;
        let mut seen_variadic_positional = false;

        for spec in &self.arguments {
            spec.validate()?;

            let dest = spec.dest();
            if !dests.insert(dest.clone()) {
                return Err(ContractViolation::DuplicateArgument(dest));
            }
            for flag in spec.flag_names() {
                if !flags.insert(flag.clone()) {
                    return Err(ContractViolation::DuplicateArgument(flag));
                }
            }

            if spec.is_positional() {
                if seen_variadic_positional {
                    return Err(ContractViolation::InvalidArgument {
                        name: spec.name().to_string(),
                        reason: "no positional may follow one taking a variable number of values"
                            .to_string(),
                    });
                }
                if spec.is_required() && seen_optional_positional {
                    return Err(ContractViolation::InvalidArgument {
                        name: spec.name().to_string(),
                        reason: "a required positional cannot follow an optional one".to_string(),
                    });
                }
                seen_optional_positional |= !spec.is_required();
                seen_variadic_positional |= spec.is_variadic();
            }
        }
        Ok(())
    }
}

impl fmt::Debug for CommandType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandType")
            .field("doc", &self.doc)
            .field("arguments", &self.arguments)
            .finish_non_exhaustive()
    }
}

/// Derive a one-line summary from command documentation.
///
/// Takes the first non-empty line, trims surrounding whitespace and strips
/// trailing periods. Documentation with no content is a contract violation.
pub fn summary(doc: &str) -> Result<String, ContractViolation> {
    let line = doc
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .ok_or(ContractViolation::MissingDocumentation)?;
    Ok(line.trim_end_matches('.').trim_end().to_string())
}
