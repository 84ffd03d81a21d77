//! Executable plugins: `plinth-<name>` programs found in plugin directories.
//!
//! Resolving a registration runs `plinth-<name> --plinth-describe`, which must
//! print a JSON descriptor on stdout:
//!
//! ```json
//! {"doc": "Run the server.", "arguments": [{"name": "config_file", "help": "a configuration file"}]}
//! ```
//!
//! Omitting `arguments` keeps the default configuration-file argument. At run
//! time the executable receives the parsed invocation as JSON in
//! `PLINTH_INVOCATION`, and its exit status becomes the command's.

use crate::command::{
    Action, ArgOptions, ArgumentSpec, Command, CommandResult, CommandType, Nargs, ParsedInvocation,
};
use crate::config::PluginSettings;
use crate::error::{CommandError, PluginError};
use crate::plugin::{PluginEntry, PluginSource};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::{self, Stdio};
use tracing::{debug, info};
use walkdir::WalkDir;

/// File-name prefix identifying plugin executables.
pub const EXECUTABLE_PREFIX: &str = "plinth-";

/// Flag asking a plugin executable for its descriptor.
pub const DESCRIBE_FLAG: &str = "--plinth-describe";

/// Environment variable carrying the JSON-encoded parsed invocation.
pub const INVOCATION_ENV: &str = "PLINTH_INVOCATION";

/// Environment variable carrying the selected command name.
pub const COMMAND_ENV: &str = "PLINTH_COMMAND";

/// Plugin source backed by executables on disk.
#[derive(Debug, Clone, Default)]
pub struct ExecutablePluginSource {
    dirs: Vec<PathBuf>,
}

impl ExecutablePluginSource {
    /// Directories are scanned in order; later directories win name collisions.
    pub fn new(dirs: Vec<PathBuf>) -> Self {
        Self { dirs }
    }

    /// System `PATH` directories (when enabled) followed by the configured ones.
    pub fn from_settings(settings: &PluginSettings) -> Self {
        let mut dirs = Vec::new();
        if settings.use_system_path {
            if let Some(path) = std::env::var_os("PATH") {
                dirs.extend(std::env::split_paths(&path));
            }
        }
        dirs.extend(settings.dirs.iter().cloned());
        Self::new(dirs)
    }

    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    fn scan_dir(dir: &Path) -> Vec<(String, PathBuf)> {
        let mut found = Vec::new();
        let walker = WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name();

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    debug!(dir = %dir.display(), error = %e, "skipping unreadable plugin directory entry");
                    continue;
                }
            };
            if !entry.file_type().is_file() || !is_executable(entry.path()) {
                continue;
            }
            if let Some(name) = command_name(entry.path()) {
                found.push((name, entry.into_path()));
            }
        }
        found
    }
}

impl PluginSource for ExecutablePluginSource {
    fn enumerate(&self) -> Vec<PluginEntry> {
        self.dirs
            .iter()
            .filter(|dir| dir.is_dir())
            .flat_map(|dir| Self::scan_dir(dir))
            .map(|(name, path)| {
                let origin = path.display().to_string();
                PluginEntry::new(name, origin, move || describe(&path))
            })
            .collect()
    }
}

/// `plinth-serve` → `serve`.
fn command_name(path: &Path) -> Option<String> {
    let file_name = if cfg!(windows) {
        path.file_stem()?
    } else {
        path.file_name()?
    };
    let name = file_name.to_str()?.strip_prefix(EXECUTABLE_PREFIX)?;
    (!name.is_empty()).then(|| name.to_string())
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    std::fs::metadata(path)
        .map(|meta| meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(windows)]
fn is_executable(path: &Path) -> bool {
    path.extension().map(|ext| ext.eq_ignore_ascii_case("exe")).unwrap_or(false)
}

#[cfg(not(any(unix, windows)))]
fn is_executable(_path: &Path) -> bool {
    true
}

/// Descriptor printed by `--plinth-describe`.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CommandDescriptor {
    doc: String,
    #[serde(default)]
    arguments: Option<Vec<ArgumentDescriptor>>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ArgumentDescriptor {
    name: String,
    help: Option<String>,
    required: Option<bool>,
    default: Option<String>,
    #[serde(default)]
    action: Action,
    nargs: Option<Nargs>,
    short: Option<char>,
    metavar: Option<String>,
    #[serde(default)]
    choices: Vec<String>,
    dest: Option<String>,
    #[serde(rename = "const")]
    const_value: Option<String>,
}

impl From<ArgumentDescriptor> for ArgumentSpec {
    fn from(descriptor: ArgumentDescriptor) -> Self {
        ArgumentSpec::with_options(
            descriptor.name,
            ArgOptions {
                help: descriptor.help,
                required: descriptor.required,
                default: descriptor.default,
                action: descriptor.action,
                nargs: descriptor.nargs,
                short: descriptor.short,
                metavar: descriptor.metavar,
                choices: descriptor.choices,
                dest: descriptor.dest,
                const_value: descriptor.const_value,
            },
        )
    }
}

fn describe(program: &Path) -> Result<CommandType, PluginError> {
    let output = process::Command::new(program)
        .arg(DESCRIBE_FLAG)
        .stdin(Stdio::null())
        .stderr(Stdio::inherit())
        .output()?;

    if !output.status.success() {
        return Err(PluginError::Load(format!(
            "`{} {}` exited with {}",
            program.display(),
            DESCRIBE_FLAG,
            output.status
        )));
    }

    let descriptor: CommandDescriptor = serde_json::from_slice(&output.stdout)?;
    let program = program.to_path_buf();
    let command_type = CommandType::new(descriptor.doc, move || ExternalCommand {
        program: program.clone(),
    });

    Ok(match descriptor.arguments {
        Some(arguments) => {
            command_type.with_arguments(arguments.into_iter().map(ArgumentSpec::from).collect())
        }
        None => command_type,
    })
}

/// Command that forwards the invocation to a plugin executable.
struct ExternalCommand {
    program: PathBuf,
}

impl Command for ExternalCommand {
    fn run(&mut self, invocation: ParsedInvocation) -> CommandResult {
        let payload = serde_json::to_string(&invocation)
            .map_err(|e| CommandError::Failed(format!("failed to encode invocation: {}", e)))?;

        info!(program = %self.program.display(), "running plugin executable");
        let status = process::Command::new(&self.program)
            .env(COMMAND_ENV, invocation.command_name())
            .env(INVOCATION_ENV, payload)
            .status()?;

        match status.code() {
            Some(0) => Ok(None),
            Some(code) => Ok(Some(code)),
            None => Err(CommandError::Failed(format!(
                "`{}` was terminated by a signal",
                self.program.display()
            ))),
        }
    }
}
