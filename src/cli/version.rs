//! Program version as reported by `--version`.
//!
//! An installed binary reports the version cargo recorded when it installed
//! the package. Anything else, such as a binary run from a build tree or a
//! lookup that fails for any reason, reports [`DEVELOPMENT_VERSION`].

use directories::BaseDirs;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Reported when the running binary is not a cargo-installed copy of the package.
pub const DEVELOPMENT_VERSION: &str = "(development)";

const PACKAGE_NAME: &str = env!("CARGO_PKG_NAME");

/// Cargo's install ledger (`$CARGO_HOME/.crates2.json`).
#[derive(Debug, Deserialize)]
struct InstallLedger {
    #[serde(default)]
    installs: BTreeMap<String, InstallRecord>,
}

#[derive(Debug, Deserialize)]
struct InstallRecord {
    #[serde(default)]
    bins: Vec<String>,
}

/// Resolve the version string for the running binary. Never fails.
pub fn resolve_version() -> String {
    let resolved = cargo_home().and_then(|root| {
        let exe = std::env::current_exe().ok()?;
        version_for(&root, &exe)
    });
    resolved.unwrap_or_else(|| {
        debug!("no installed version matches the running binary");
        DEVELOPMENT_VERSION.to_string()
    })
}

/// Version cargo recorded under `install_root` for this package, provided
/// `running_exe` sits in that root's `bin` directory.
pub fn version_for(install_root: &Path, running_exe: &Path) -> Option<String> {
    let contents = std::fs::read_to_string(install_root.join(".crates2.json")).ok()?;
    let ledger: InstallLedger = serde_json::from_str(&contents).ok()?;
    let version = ledger.installs.iter().find_map(|(key, record)| {
        // Keys look like "plinth 0.1.0 (registry+https://...)".
        let mut parts = key.split(' ');
        let name = parts.next()?;
        let version = parts.next()?;
        let ships_binary = record
            .bins
            .iter()
            .any(|bin| bin.trim_end_matches(".exe") == PACKAGE_NAME);
        (name == PACKAGE_NAME && ships_binary).then(|| version.to_string())
    })?;

    let bin_dir = dunce::canonicalize(install_root.join("bin")).ok()?;
    let exe = dunce::canonicalize(running_exe).ok()?;
    (exe.parent()? == bin_dir).then_some(version)
}

fn cargo_home() -> Option<PathBuf> {
    match std::env::var_os("CARGO_HOME") {
        Some(home) if !home.is_empty() => Some(PathBuf::from(home)),
        _ => BaseDirs::new().map(|dirs| dirs.home_dir().join(".cargo")),
    }
}
