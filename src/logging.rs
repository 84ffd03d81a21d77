//! Logging System
//!
//! Structured logging using the `tracing` crate. Stdout belongs to the commands
//! being dispatched, so logs go to stderr by default and only warnings (such
//! as plugins that failed to load) are shown unless the level is raised.

use crate::error::SettingsError;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Install a subscriber at all
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Log level: trace, debug, info, warn, error, off
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format: json, text
    #[serde(default = "default_format")]
    pub format: String,

    /// Output destination: stderr, stdout, file
    #[serde(default = "default_output")]
    pub output: String,

    /// Log file path when output is "file" (defaults to the platform data dir)
    #[serde(default)]
    pub file: Option<PathBuf>,

    /// Enable colored output (text format, terminal outputs only)
    #[serde(default = "default_true")]
    pub color: bool,

    /// Module-specific log levels
    #[serde(default)]
    pub modules: HashMap<String, String>,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_format() -> String {
    "text".to_string()
}

fn default_output() -> String {
    "stderr".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            level: default_log_level(),
            format: default_format(),
            output: default_output(),
            file: None,
            color: default_true(),
            modules: HashMap::new(),
        }
    }
}

/// Log line format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    pub fn parse(value: &str) -> Result<Self, SettingsError> {
        match value {
            "text" => Ok(LogFormat::Text),
            "json" => Ok(LogFormat::Json),
            other => Err(SettingsError::Logging(format!(
                "Invalid log format: {} (must be 'json' or 'text')",
                other
            ))),
        }
    }
}

/// Log destination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogOutput {
    Stderr,
    Stdout,
    File,
}

impl LogOutput {
    pub fn parse(value: &str) -> Result<Self, SettingsError> {
        match value {
            "stderr" => Ok(LogOutput::Stderr),
            "stdout" => Ok(LogOutput::Stdout),
            "file" => Ok(LogOutput::File),
            other => Err(SettingsError::Logging(format!(
                "Invalid log output: {} (must be 'stderr', 'stdout' or 'file')",
                other
            ))),
        }
    }
}

/// Default log file: `<data dir>/plinth/plinth.log`.
pub fn default_log_file_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "plinth").map(|dirs| dirs.data_local_dir().join("plinth.log"))
}

/// Environment variable overriding the level (any `EnvFilter` directive string)
pub const LOG_ENV: &str = "PLINTH_LOG";

/// Environment variable overriding the format
pub const LOG_FORMAT_ENV: &str = "PLINTH_LOG_FORMAT";

/// Environment variable overriding the output
pub const LOG_OUTPUT_ENV: &str = "PLINTH_LOG_OUTPUT";

/// Fold `PLINTH_LOG`, `PLINTH_LOG_FORMAT` and `PLINTH_LOG_OUTPUT` into `config`.
///
/// Priority order (highest to lowest):
/// 1. CLI flags (applied by the caller after this)
/// 2. Environment variables
/// 3. Settings files
/// 4. Defaults
///
/// An invalid value in any of the variables is an error.
pub fn apply_env_overrides(config: &mut LoggingConfig) -> Result<(), SettingsError> {
    apply_overrides(
        config,
        std::env::var(LOG_ENV).ok(),
        std::env::var(LOG_FORMAT_ENV).ok(),
        std::env::var(LOG_OUTPUT_ENV).ok(),
    )
}

fn apply_overrides(
    config: &mut LoggingConfig,
    level: Option<String>,
    format: Option<String>,
    output: Option<String>,
) -> Result<(), SettingsError> {
    if let Some(level) = level {
        EnvFilter::try_new(&level).map_err(|e| {
            SettingsError::Logging(format!("Invalid {} value {:?}: {}", LOG_ENV, level, e))
        })?;
        config.level = level;
    }
    if let Some(format) = format {
        LogFormat::parse(&format)?;
        config.format = format;
    }
    if let Some(output) = output {
        LogOutput::parse(&output)?;
        config.output = output;
    }
    Ok(())
}

/// Initialize the logging system from a fully resolved configuration
///
/// Fails if a global subscriber is already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<(), SettingsError> {
    if !config.enabled {
        return Ok(());
    }

    let filter = build_env_filter(config)?;
    let format = LogFormat::parse(&config.format)?;
    let output = LogOutput::parse(&config.output)?;
    let writer = make_writer(output, config)?;
    let use_color = config.color && output != LogOutput::File;

    let (json_layer, text_layer) = match format {
        LogFormat::Json => (
            Some(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_writer(writer),
            ),
            None,
        ),
        LogFormat::Text => (
            None,
            Some(
                fmt::layer()
                    .with_target(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_ansi(use_color)
                    .with_writer(writer),
            ),
        ),
    };

    Registry::default()
        .with(filter)
        .with(json_layer)
        .with(text_layer)
        .try_init()
        .map_err(|e| SettingsError::Logging(format!("Failed to install subscriber: {}", e)))
}

fn make_writer(output: LogOutput, config: &LoggingConfig) -> Result<BoxMakeWriter, SettingsError> {
    match output {
        LogOutput::Stderr => Ok(BoxMakeWriter::new(std::io::stderr)),
        LogOutput::Stdout => Ok(BoxMakeWriter::new(std::io::stdout)),
        LogOutput::File => {
            let log_file = config
                .file
                .clone()
                .or_else(default_log_file_path)
                .ok_or_else(|| {
                    SettingsError::Logging("No log file configured and no data directory".to_string())
                })?;

            if let Some(parent) = log_file.parent() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    SettingsError::Logging(format!("Failed to create log directory: {}", e))
                })?;
            }
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&log_file)
                .map_err(|e| {
                    SettingsError::Logging(format!("Failed to open log file {:?}: {}", log_file, e))
                })?;
            Ok(BoxMakeWriter::new(Mutex::new(file)))
        }
    }
}

/// Build environment filter from the level and module directives
fn build_env_filter(config: &LoggingConfig) -> Result<EnvFilter, SettingsError> {
    if config.level == "off" {
        return Ok(EnvFilter::new("off"));
    }

    let mut filter = EnvFilter::try_new(&config.level)
        .map_err(|e| SettingsError::Logging(format!("Invalid log level {:?}: {}", config.level, e)))?;

    for (module, module_level) in &config.modules {
        let directive = format!("{}={}", module, module_level);
        filter = filter.add_directive(
            directive
                .parse()
                .map_err(|e| SettingsError::Logging(format!("Invalid log directive: {}", e)))?,
        );
    }

    Ok(filter)
}
