//! Plugin registry adapter: turns plugin registrations into a validated name → command type map.
//!
//! A [`PluginSource`] enumerates registrations under the command namespace.
//! [`build_registry`] resolves each one in isolation: a registration that
//! fails to load, panics, or violates the command contract is logged and
//! skipped, and discovery carries on with the rest.

mod executable;
mod static_source;

pub use executable::{
    ExecutablePluginSource, COMMAND_ENV, DESCRIBE_FLAG, EXECUTABLE_PREFIX, INVOCATION_ENV,
};
pub use static_source::StaticPluginSource;

use crate::command::CommandType;
use crate::error::{ContractViolation, PluginError};
use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, warn};

/// Namespace under which command plugins register.
pub const COMMAND_NAMESPACE: &str = "plinth.command";

/// Name → command type. Later registrations under the same name replace earlier ones.
pub type CommandRegistry = BTreeMap<String, CommandType>;

type PluginLoader = Box<dyn FnOnce() -> Result<CommandType, PluginError>>;

/// A single registration: a name and a deferred loader for its command type.
pub struct PluginEntry {
    name: String,
    origin: String,
    loader: PluginLoader,
}

impl PluginEntry {
    /// `origin` describes where the registration came from (a path, `static`, ...).
    pub fn new<F>(name: impl Into<String>, origin: impl Into<String>, loader: F) -> Self
    where
        F: FnOnce() -> Result<CommandType, PluginError> + 'static,
    {
        Self {
            name: name.into(),
            origin: origin.into(),
            loader: Box::new(loader),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Run the loader.
    pub fn load(self) -> Result<CommandType, PluginError> {
        (self.loader)()
    }
}

impl fmt::Display for PluginEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.name, self.origin)
    }
}

impl fmt::Debug for PluginEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginEntry")
            .field("name", &self.name)
            .field("origin", &self.origin)
            .finish_non_exhaustive()
    }
}

/// Host-environment plugin registry.
pub trait PluginSource {
    /// Namespace the registrations are enumerated from.
    fn namespace(&self) -> &str {
        COMMAND_NAMESPACE
    }

    /// All registrations, in source-defined order.
    fn enumerate(&self) -> Vec<PluginEntry>;
}

/// Several sources enumerated back to back; later sources win name collisions.
#[derive(Default)]
pub struct ChainedPluginSource {
    sources: Vec<Box<dyn PluginSource>>,
}

impl ChainedPluginSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source(mut self, source: impl PluginSource + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }
}

impl PluginSource for ChainedPluginSource {
    fn enumerate(&self) -> Vec<PluginEntry> {
        self.sources
            .iter()
            .flat_map(|source| source.enumerate())
            .collect()
    }
}

/// Resolve every registration of `source` into a registry.
pub fn build_registry(source: &dyn PluginSource) -> CommandRegistry {
    build_registry_excluding(source, &[])
}

/// Like [`build_registry`], skipping registrations whose name is in `disabled`.
pub fn build_registry_excluding(source: &dyn PluginSource, disabled: &[String]) -> CommandRegistry {
    let namespace = source.namespace().to_string();
    let mut registry = CommandRegistry::new();

    for entry in source.enumerate() {
        if disabled.iter().any(|name| name == entry.name()) {
            debug!(%namespace, plugin = %entry, "skipping disabled plugin");
            continue;
        }

        debug!(%namespace, plugin = %entry, "loading plugin");
        let label = entry.to_string();
        let name = entry.name().to_string();

        match resolve(entry) {
            Ok(command_type) => {
                if registry.insert(name.clone(), command_type).is_some() {
                    debug!(command = %name, plugin = %label, "plugin overrides an earlier registration");
                }
            }
            Err(e) => {
                warn!(plugin = %label, error = %e, "Unable to load plugin {}: {}", label, e);
            }
        }
    }

    registry
}

fn resolve(entry: PluginEntry) -> Result<CommandType, PluginError> {
    let name = entry.name().to_string();
    validate_name(&name)?;
    let command_type = panic::catch_unwind(AssertUnwindSafe(|| entry.load()))
        .map_err(|payload| PluginError::Panicked(panic_message(payload.as_ref())))??;
    command_type.validate()?;
    check_grammar(&name, &command_type)?;
    Ok(command_type)
}

/// Build the command's subcommand once so parser assertions fail here, not at dispatch.
fn check_grammar(name: &str, command_type: &CommandType) -> Result<(), ContractViolation> {
    panic::catch_unwind(AssertUnwindSafe(|| {
        command_type.to_clap_command(name).debug_assert()
    }))
    .map_err(|payload| ContractViolation::RejectedByParser(panic_message(payload.as_ref())))
}

fn validate_name(name: &str) -> Result<(), ContractViolation> {
    if name.is_empty() || name.starts_with('-') || name.chars().any(char::is_whitespace) {
        return Err(ContractViolation::InvalidArgument {
            name: name.to_string(),
            reason: "command names must be non-empty, contain no whitespace and not start with '-'"
                .to_string(),
        });
    }
    Ok(())
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
