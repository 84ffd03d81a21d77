//! Shared fixtures: an in-memory `serve` command and shell-script plugins.

use plinth::command::{BaseCommand, Command, CommandKind, CommandResult, ParsedInvocation};
use plinth::error::CommandError;
use std::cell::RefCell;
use std::path::{Path, PathBuf};

thread_local! {
    static SERVED: RefCell<Vec<PathBuf>> = RefCell::new(Vec::new());
    static INSTANCES: RefCell<usize> = RefCell::new(0);
}

/// Application built from a configuration file.
#[derive(Debug, PartialEq, Eq)]
pub struct App {
    pub config_path: PathBuf,
}

/// `serve <config_file>`: loads the application and records what it served.
pub struct Serve {
    base: BaseCommand,
}

impl Command for Serve {
    fn run(&mut self, invocation: ParsedInvocation) -> CommandResult {
        self.base.run(invocation)?;
        let app = self.base.load_application(&|path: &Path| {
            Ok::<_, CommandError>(App {
                config_path: path.to_path_buf(),
            })
        })?;
        SERVED.with(|served| served.borrow_mut().push(app.config_path));
        Ok(None)
    }
}

impl CommandKind for Serve {
    const DOC: &'static str = "Run the development server.\n\nServes the application described by CONFIG_FILE.";

    fn create() -> Self {
        INSTANCES.with(|count| *count.borrow_mut() += 1);
        Serve {
            base: BaseCommand::new(),
        }
    }
}

/// Configuration paths served on this thread so far.
pub fn served() -> Vec<PathBuf> {
    SERVED.with(|served| served.borrow().clone())
}

/// `Serve` instances created on this thread so far.
pub fn instances() -> usize {
    INSTANCES.with(|count| *count.borrow())
}

#[cfg(unix)]
pub mod scripts {
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::path::{Path, PathBuf};

    /// Write an executable `plinth-<name>` script that describes itself with
    /// `descriptor` and otherwise runs `body`.
    pub fn write_plugin(dir: &Path, name: &str, descriptor: &str, body: &str) -> PathBuf {
        let path = dir.join(format!("plinth-{}", name));
        let script = format!(
            "#!/bin/sh\nif [ \"$1\" = \"--plinth-describe\" ]; then\n  printf '%s' '{}'\n  exit 0\nfi\n{}\n",
            descriptor, body
        );
        fs::write(&path, script).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }
}
