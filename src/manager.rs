//! Command manager: the frozen, invocation-scoped command registry.

use crate::command::CommandType;
use crate::config::PluginSettings;
use crate::plugin::{build_registry_excluding, CommandRegistry, PluginSource};
use tracing::debug;

/// Owns the result of one discovery pass. Discovery runs once, eagerly, at construction.
#[derive(Debug)]
pub struct CommandManager {
    commands: CommandRegistry,
}

impl CommandManager {
    /// Discover every command `source` registers.
    pub fn new(source: &dyn PluginSource) -> Self {
        Self::discover(source, &[])
    }

    /// Discover commands, honoring the disabled list from settings.
    pub fn with_settings(source: &dyn PluginSource, settings: &PluginSettings) -> Self {
        Self::discover(source, &settings.disabled)
    }

    fn discover(source: &dyn PluginSource, disabled: &[String]) -> Self {
        let commands = build_registry_excluding(source, disabled);
        debug!(count = commands.len(), "command discovery finished");
        Self { commands }
    }

    /// Read-only view of the registry.
    pub fn commands(&self) -> &CommandRegistry {
        &self.commands
    }

    pub fn get(&self, name: &str) -> Option<&CommandType> {
        self.commands.get(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.commands.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
