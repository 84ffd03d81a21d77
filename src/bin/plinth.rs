//! Plinth CLI Binary
//!
//! Discovers `plinth-<name>` plugin executables and dispatches to one of them.

use plinth::cli::{map_error, GlobalArgs, Runner};
use plinth::config::{ConfigLoader, PlinthConfig};
use plinth::error::DispatchError;
use plinth::logging::{apply_env_overrides, init_logging, LoggingConfig};
use plinth::manager::CommandManager;
use plinth::plugin::ExecutablePluginSource;
use std::ffi::OsString;
use std::process;
use tracing::{debug, error};

fn main() {
    let args: Vec<OsString> = std::env::args_os().skip(1).collect();
    let globals = GlobalArgs::bootstrap(args.iter().cloned());

    let settings = match load_settings(&globals) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("{}", map_error(&e));
            process::exit(e.exit_code());
        }
    };

    let mut logging_settings = settings.logging.clone();
    if let Err(e) = apply_env_overrides(&mut logging_settings) {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }
    let logging_config = build_logging_config(&globals, &logging_settings);
    if let Err(e) = init_logging(&logging_config) {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }
    debug!("plinth starting");

    let source = ExecutablePluginSource::from_settings(&settings.plugins);
    let manager = CommandManager::with_settings(&source, &settings.plugins);
    let runner = Runner::new(manager);

    match runner.run(args) {
        Ok(code) => process::exit(code),
        Err(DispatchError::Usage(e)) => e.exit(),
        Err(e) => {
            error!("Command failed: {}", e);
            eprintln!("{}", map_error(&e));
            process::exit(e.exit_code());
        }
    }
}

fn load_settings(globals: &GlobalArgs) -> Result<PlinthConfig, DispatchError> {
    let settings = match &globals.settings {
        Some(path) => ConfigLoader::load_from_file(path)?,
        None => ConfigLoader::load()?,
    };
    Ok(settings)
}

/// Build logging configuration from the global options and the loaded settings
/// (environment overrides already folded in)
fn build_logging_config(globals: &GlobalArgs, settings: &LoggingConfig) -> LoggingConfig {
    // --quiet wins over everything else
    if globals.quiet {
        return LoggingConfig {
            enabled: false,
            ..settings.clone()
        };
    }

    let mut config = settings.clone();
    if globals.verbose {
        config.level = "debug".to_string();
    }

    // Override with CLI arguments (highest priority)
    if let Some(ref level) = globals.log_level {
        config.level = level.clone();
    }
    if let Some(ref format) = globals.log_format {
        config.format = format.clone();
    }
    if let Some(ref output) = globals.log_output {
        config.output = output.clone();
    }
    if let Some(ref file) = globals.log_file {
        config.file = Some(file.clone());
    }

    config
}
