//! Plinth: a pluggable command-line dispatcher.
//!
//! Commands are discovered from plugin registrations at startup, validated
//! against the command contract, and exposed as subcommands of a single
//! program. See [`cli::Runner`] for the entry point.

pub mod cli;
pub mod command;
pub mod config;
pub mod error;
pub mod logging;
pub mod manager;
pub mod plugin;
