//! In-memory plugin source for embedders and tests.

use crate::command::{CommandKind, CommandType};
use crate::error::PluginError;
use crate::plugin::{PluginEntry, PluginSource};
use std::rc::Rc;

type SharedLoader = Rc<dyn Fn() -> Result<CommandType, PluginError>>;

/// Fixed list of registrations, enumerated in insertion order.
#[derive(Default, Clone)]
pub struct StaticPluginSource {
    registrations: Vec<(String, SharedLoader)>,
}

impl StaticPluginSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a loader that may fail.
    pub fn with_loader<F>(mut self, name: impl Into<String>, loader: F) -> Self
    where
        F: Fn() -> Result<CommandType, PluginError> + 'static,
    {
        self.registrations.push((name.into(), Rc::new(loader)));
        self
    }

    /// Register a loader that always produces a command type.
    pub fn with_command<F>(self, name: impl Into<String>, make: F) -> Self
    where
        F: Fn() -> CommandType + 'static,
    {
        self.with_loader(name, move || Ok(make()))
    }

    /// Register a [`CommandKind`].
    pub fn with_kind<K: CommandKind>(self, name: impl Into<String>) -> Self {
        self.with_command(name, CommandType::of::<K>)
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }
}

impl PluginSource for StaticPluginSource {
    fn enumerate(&self) -> Vec<PluginEntry> {
        self.registrations
            .iter()
            .map(|(name, loader)| {
                let loader = Rc::clone(loader);
                PluginEntry::new(name.clone(), "static", move || loader())
            })
            .collect()
    }
}
