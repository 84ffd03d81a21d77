//! Declarative argument specifications and their projection onto clap.

use crate::error::ContractViolation;
use clap::builder::PossibleValuesParser;
use clap::{Arg, ArgAction};
use serde::{Deserialize, Serialize};

/// Destination of the configuration-file argument every command inherits by default.
pub const CONFIG_FILE_ARG: &str = "config_file";

/// Destinations the dispatcher reserves for itself.
const RESERVED_DESTS: &[&str] = &["command_name", "help"];

/// What the parser does when it meets the argument.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Store a value (the last one wins)
    #[default]
    Store,
    /// Flag that stores `true` when present
    StoreTrue,
    /// Flag that stores `false` when present
    StoreFalse,
    /// Count occurrences
    Count,
    /// Collect every occurrence's value
    Append,
}

impl Action {
    fn is_flag(self) -> bool {
        matches!(self, Action::StoreTrue | Action::StoreFalse | Action::Count)
    }
}

/// Number of values an argument consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "NargsRepr", into = "NargsRepr")]
pub enum Nargs {
    /// `?`
    Optional,
    /// `*`
    ZeroOrMore,
    /// `+`
    OneOrMore,
    /// An exact count
    Exact(usize),
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum NargsRepr {
    Count(usize),
    Symbol(String),
}

impl TryFrom<NargsRepr> for Nargs {
    type Error = String;

    fn try_from(repr: NargsRepr) -> Result<Self, Self::Error> {
        match repr {
            NargsRepr::Count(count) => Ok(Nargs::Exact(count)),
            NargsRepr::Symbol(symbol) => match symbol.as_str() {
                "?" => Ok(Nargs::Optional),
                "*" => Ok(Nargs::ZeroOrMore),
                "+" => Ok(Nargs::OneOrMore),
                other => Err(format!("invalid nargs `{}` (expected ?, *, + or a count)", other)),
            },
        }
    }
}

impl From<Nargs> for NargsRepr {
    fn from(nargs: Nargs) -> Self {
        match nargs {
            Nargs::Optional => NargsRepr::Symbol("?".to_string()),
            Nargs::ZeroOrMore => NargsRepr::Symbol("*".to_string()),
            Nargs::OneOrMore => NargsRepr::Symbol("+".to_string()),
            Nargs::Exact(count) => NargsRepr::Count(count),
        }
    }
}

/// Parser options attached to an argument.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgOptions {
    pub help: Option<String>,
    pub required: Option<bool>,
    pub default: Option<String>,
    pub action: Action,
    pub nargs: Option<Nargs>,
    pub short: Option<char>,
    pub metavar: Option<String>,
    pub choices: Vec<String>,
    pub dest: Option<String>,
    /// Value stored when an optional flag with `nargs = ?` is given without one
    pub const_value: Option<String>,
}

/// One declared command-line argument.
///
/// `name` is either a positional name (`config_file`), a long flag (`--port`)
/// or a short flag (`-v`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentSpec {
    name: String,
    options: ArgOptions,
}

enum ArgKind<'a> {
    Positional,
    Long(&'a str),
    Short(&'a str),
}

impl ArgumentSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_options(name, ArgOptions::default())
    }

    pub fn with_options(name: impl Into<String>, options: ArgOptions) -> Self {
        Self {
            name: name.into(),
            options,
        }
    }

    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.options.help = Some(help.into());
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.options.required = Some(required);
        self
    }

    pub fn default_value(mut self, default: impl Into<String>) -> Self {
        self.options.default = Some(default.into());
        self
    }

    pub fn action(mut self, action: Action) -> Self {
        self.options.action = action;
        self
    }

    pub fn nargs(mut self, nargs: Nargs) -> Self {
        self.options.nargs = Some(nargs);
        self
    }

    pub fn short(mut self, short: char) -> Self {
        self.options.short = Some(short);
        self
    }

    pub fn metavar(mut self, metavar: impl Into<String>) -> Self {
        self.options.metavar = Some(metavar.into());
        self
    }

    pub fn choices<I, S>(mut self, choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options.choices = choices.into_iter().map(Into::into).collect();
        self
    }

    /// Value used when the flag appears without one. Requires `nargs = ?`.
    pub fn const_value(mut self, value: impl Into<String>) -> Self {
        self.options.const_value = Some(value.into());
        self
    }

    /// Store the parsed value under `dest` instead of the derived name.
    pub fn with_dest(mut self, dest: impl Into<String>) -> Self {
        self.options.dest = Some(dest.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn options(&self) -> &ArgOptions {
        &self.options
    }

    fn kind(&self) -> ArgKind<'_> {
        if let Some(long) = self.name.strip_prefix("--") {
            ArgKind::Long(long)
        } else if let Some(short) = self.name.strip_prefix('-') {
            ArgKind::Short(short)
        } else {
            ArgKind::Positional
        }
    }

    pub fn is_positional(&self) -> bool {
        matches!(self.kind(), ArgKind::Positional)
    }

    /// Target name the parsed value is stored under.
    pub fn dest(&self) -> String {
        if let Some(dest) = &self.options.dest {
            return dest.clone();
        }
        self.name.trim_start_matches('-').replace('-', "_")
    }

    /// Flag spellings this argument claims (`--port`, `-p`).
    pub(crate) fn flag_names(&self) -> Vec<String> {
        let mut names = Vec::new();
        if !self.is_positional() {
            names.push(self.name.clone());
        }
        if let Some(short) = self.options.short {
            names.push(format!("-{}", short));
        }
        names
    }

    /// Whether the parser demands this argument.
    ///
    /// Positionals are required unless they accept zero values; optionals are
    /// not. A default value always satisfies the requirement.
    pub fn is_required(&self) -> bool {
        if self.options.default.is_some() {
            return false;
        }
        if let Some(required) = self.options.required {
            return required;
        }
        self.is_positional()
            && !matches!(
                self.options.nargs,
                Some(Nargs::Optional) | Some(Nargs::ZeroOrMore)
            )
    }

    /// Whether the argument can take an open-ended number of values.
    pub(crate) fn is_variadic(&self) -> bool {
        matches!(
            self.options.nargs,
            Some(Nargs::ZeroOrMore) | Some(Nargs::OneOrMore)
        )
    }

    /// Whether parsed values come back as a list.
    pub(crate) fn collects_many(&self) -> bool {
        self.options.action == Action::Append
            || matches!(
                self.options.nargs,
                Some(Nargs::ZeroOrMore) | Some(Nargs::OneOrMore)
            )
            || matches!(self.options.nargs, Some(Nargs::Exact(n)) if n > 1)
    }

    /// Check that the options form an argument the parser can accept.
    pub fn validate(&self) -> Result<(), ContractViolation> {
        let invalid = |reason: &str| ContractViolation::InvalidArgument {
            name: self.name.clone(),
            reason: reason.to_string(),
        };

        match self.kind() {
            ArgKind::Positional if self.name.is_empty() => {
                return Err(ContractViolation::EmptyArgumentName)
            }
            ArgKind::Long(long) if long.is_empty() || long.starts_with('-') => {
                return Err(ContractViolation::EmptyArgumentName)
            }
            ArgKind::Short(short) if short.chars().count() != 1 => {
                return Err(invalid("single-dash flags must be exactly one character"))
            }
            ArgKind::Short(short) if !short.chars().all(is_valid_short) => {
                return Err(invalid("short flags cannot be '-' or whitespace"))
            }
            _ => {}
        }
        if self.options.short.is_some_and(|short| !is_valid_short(short)) {
            return Err(invalid("short flags cannot be '-' or whitespace"));
        }

        let dest = self.dest();
        if dest.is_empty() {
            return Err(ContractViolation::EmptyArgumentName);
        }
        if RESERVED_DESTS.contains(&dest.as_str()) {
            return Err(invalid("destination is reserved by the dispatcher"));
        }
        if self.flag_names().iter().any(|f| f == "-h" || f == "--help") {
            return Err(invalid("-h/--help is reserved for automatic help"));
        }

        let action = self.options.action;
        if self.is_positional() {
            if self.options.short.is_some() {
                return Err(invalid("short aliases only apply to optional arguments"));
            }
            if action != Action::Store {
                return Err(invalid("positional arguments only support the store action"));
            }
        }
        if action.is_flag() {
            if self.options.nargs.is_some() {
                return Err(invalid("flag actions take no values"));
            }
            if self.options.default.is_some() || self.options.metavar.is_some() {
                return Err(invalid("flag actions cannot declare a default or metavar"));
            }
            if !self.options.choices.is_empty() {
                return Err(invalid("flag actions cannot declare choices"));
            }
        }
        if self.options.const_value.is_some()
            && (self.is_positional() || self.options.nargs != Some(Nargs::Optional))
        {
            return Err(invalid("const only applies to optional flags with nargs '?'"));
        }
        if self.options.nargs == Some(Nargs::Exact(0)) {
            return Err(invalid("nargs must be at least 1"));
        }
        if self.options.required == Some(true) && self.options.default.is_some() {
            return Err(invalid("a required argument cannot have a default"));
        }
        if let Some(default) = &self.options.default {
            if !self.options.choices.is_empty() && !self.options.choices.contains(default) {
                return Err(invalid("default is not one of the declared choices"));
            }
        }
        Ok(())
    }

    /// Project onto a clap argument. Options map one-to-one onto the builder.
    pub fn to_clap_arg(&self) -> Arg {
        let mut arg = Arg::new(self.dest());
        match self.kind() {
            ArgKind::Positional => {}
            ArgKind::Long(long) => arg = arg.long(long.to_string()),
            ArgKind::Short(short) => {
                if let Some(c) = short.chars().next() {
                    arg = arg.short(c);
                }
            }
        }
        if let Some(short) = self.options.short {
            arg = arg.short(short);
        }

        arg = arg.action(match self.options.action {
            Action::Store => ArgAction::Set,
            Action::StoreTrue => ArgAction::SetTrue,
            Action::StoreFalse => ArgAction::SetFalse,
            Action::Count => ArgAction::Count,
            Action::Append => ArgAction::Append,
        });

        if let Some(nargs) = self.options.nargs {
            arg = match nargs {
                Nargs::Optional => arg.num_args(0..=1),
                Nargs::ZeroOrMore => arg.num_args(0..),
                Nargs::OneOrMore => arg.num_args(1..),
                Nargs::Exact(count) => arg.num_args(count),
            };
        }
        if let Some(value) = &self.options.const_value {
            arg = arg.default_missing_value(value.clone());
        }
        if let Some(help) = &self.options.help {
            arg = arg.help(help.clone());
        }
        if let Some(metavar) = &self.options.metavar {
            arg = arg.value_name(metavar.clone());
        }
        if let Some(default) = &self.options.default {
            arg = arg.default_value(default.clone());
        }
        if !self.options.choices.is_empty() {
            arg = arg.value_parser(PossibleValuesParser::new(self.options.choices.clone()));
        }
        if !self.options.action.is_flag() {
            arg = arg.required(self.is_required());
        }
        arg
    }
}

fn is_valid_short(short: char) -> bool {
    short != '-' && !short.is_whitespace() && !short.is_control()
}

/// The arguments a command declares when it declares none itself.
pub fn default_arguments() -> Vec<ArgumentSpec> {
    vec![ArgumentSpec::new(CONFIG_FILE_ARG).help("a configuration file")]
}
