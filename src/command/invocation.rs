//! Parsed invocation: the selected command plus its parsed argument values.

use crate::command::{Action, ArgumentSpec, CONFIG_FILE_ARG};
use clap::ArgMatches;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// A single parsed argument value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArgValue {
    Flag(bool),
    Count(u8),
    Single(String),
    Many(Vec<String>),
}

/// Result of parsing argv against the derived grammar.
///
/// Serializes flat, e.g. `{"command_name": "serve", "config_file": "app.conf"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedInvocation {
    command_name: String,
    #[serde(flatten)]
    values: BTreeMap<String, ArgValue>,
}

impl ParsedInvocation {
    pub fn new(command_name: impl Into<String>) -> Self {
        Self {
            command_name: command_name.into(),
            values: BTreeMap::new(),
        }
    }

    /// Add a value under `dest`.
    pub fn with(mut self, dest: impl Into<String>, value: ArgValue) -> Self {
        self.values.insert(dest.into(), value);
        self
    }

    pub fn command_name(&self) -> &str {
        &self.command_name
    }

    pub fn values(&self) -> &BTreeMap<String, ArgValue> {
        &self.values
    }

    pub fn get(&self, dest: &str) -> Option<&ArgValue> {
        self.values.get(dest)
    }

    pub fn get_str(&self, dest: &str) -> Option<&str> {
        match self.values.get(dest) {
            Some(ArgValue::Single(value)) => Some(value),
            _ => None,
        }
    }

    pub fn get_many(&self, dest: &str) -> Option<&[String]> {
        match self.values.get(dest) {
            Some(ArgValue::Many(values)) => Some(values),
            _ => None,
        }
    }

    /// `false` when the flag is absent.
    pub fn get_flag(&self, dest: &str) -> bool {
        matches!(self.values.get(dest), Some(ArgValue::Flag(true)))
    }

    pub fn get_count(&self, dest: &str) -> u8 {
        match self.values.get(dest) {
            Some(ArgValue::Count(count)) => *count,
            _ => 0,
        }
    }

    pub fn config_file(&self) -> Option<&Path> {
        self.get_str(CONFIG_FILE_ARG).map(Path::new)
    }
}

/// Collect the values of `specs` from a subcommand's matches.
///
/// Arguments that were neither given nor defaulted are left out.
pub(crate) fn from_matches(
    command_name: &str,
    matches: &ArgMatches,
    specs: &[ArgumentSpec],
) -> ParsedInvocation {
    let mut invocation = ParsedInvocation::new(command_name);
    for spec in specs {
        let dest = spec.dest();
        let value = match spec.options().action {
            Action::StoreTrue | Action::StoreFalse => matches
                .try_get_one::<bool>(&dest)
                .ok()
                .flatten()
                .map(|flag| ArgValue::Flag(*flag)),
            Action::Count => matches
                .try_get_one::<u8>(&dest)
                .ok()
                .flatten()
                .map(|count| ArgValue::Count(*count)),
            Action::Store | Action::Append if spec.collects_many() => matches
                .try_get_many::<String>(&dest)
                .ok()
                .flatten()
                .map(|values| ArgValue::Many(values.cloned().collect())),
            Action::Store | Action::Append => matches
                .try_get_one::<String>(&dest)
                .ok()
                .flatten()
                .map(|value| ArgValue::Single(value.clone())),
        };
        if let Some(value) = value {
            invocation.values.insert(dest, value);
        }
    }
    invocation
}
