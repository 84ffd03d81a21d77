//! Tests for the `plinth` binary: settings, plugin discovery and exit codes.

#![cfg(unix)]

use super::test_utils::scripts::write_plugin;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

struct Sandbox {
    _temp_dir: TempDir,
    root: PathBuf,
    plugins: PathBuf,
    settings: PathBuf,
}

impl Sandbox {
    fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().to_path_buf();
        let plugins = root.join("plugins");
        for dir in ["plugins", "config", "data", "home", "cargo"] {
            fs::create_dir_all(root.join(dir)).unwrap();
        }
        let settings = root.join("settings.toml");
        fs::write(
            &settings,
            format!(
                "[plugins]\nuse_system_path = false\ndirs = [\"{}\"]\n",
                plugins.display()
            ),
        )
        .unwrap();
        Self {
            _temp_dir: temp_dir,
            root,
            plugins,
            settings,
        }
    }

    fn plinth(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_plinth"))
            .env("XDG_CONFIG_HOME", self.root.join("config"))
            .env("XDG_DATA_HOME", self.root.join("data"))
            .env("HOME", self.root.join("home"))
            .env("CARGO_HOME", self.root.join("cargo"))
            .env_remove("PLINTH_LOG")
            .env_remove("PLINTH_LOG_FORMAT")
            .env_remove("PLINTH_LOG_OUTPUT")
            .arg("--settings")
            .arg(&self.settings)
            .args(args)
            .output()
            .unwrap()
    }

    fn plugin(&self, name: &str, doc: &str, body: &str) {
        write_plugin(&self.plugins, name, &format!(r#"{{"doc": "{}"}}"#, doc), body);
    }
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_plugin_exit_status_is_forwarded() {
    let sandbox = Sandbox::new();
    sandbox.plugin("serve", "Run the server.", "echo serving\nexit 0");
    sandbox.plugin("fail", "Always fails.", "exit 4");

    let output = sandbox.plinth(&["serve", "app.conf"]);
    assert!(output.status.success(), "stderr={}", stderr(&output));
    assert_eq!(stdout(&output).trim(), "serving");

    let output = sandbox.plinth(&["fail", "app.conf"]);
    assert_eq!(output.status.code(), Some(4));
}

#[test]
fn test_unknown_command_is_usage_error() {
    let sandbox = Sandbox::new();
    sandbox.plugin("serve", "Run the server.", "exit 0");

    let output = sandbox.plinth(&["deploy", "app.conf"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("deploy"));
}

#[test]
fn test_version_reports_development_marker() {
    let sandbox = Sandbox::new();

    let output = sandbox.plinth(&["--version"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "plinth (development)");
}

#[test]
fn test_help_lists_discovered_commands() {
    let sandbox = Sandbox::new();
    sandbox.plugin("serve", "Run the development server.", "exit 0");

    let output = sandbox.plinth(&["--help"]);
    assert!(output.status.success());
    let help = stdout(&output);
    assert!(help.contains("serve"));
    assert!(help.contains("Run the development server"));
}

#[test]
fn test_broken_plugin_warns_and_is_skipped() {
    let sandbox = Sandbox::new();
    sandbox.plugin("serve", "Run the server.", "exit 0");
    write_plugin(&sandbox.plugins, "broken", "not json", "exit 0");

    let output = sandbox.plinth(&["serve", "app.conf"]);
    assert!(output.status.success());
    assert!(
        stderr(&output).contains("Unable to load plugin broken"),
        "stderr={}",
        stderr(&output)
    );

    let output = sandbox.plinth(&["broken"]);
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_quiet_suppresses_plugin_warnings() {
    let sandbox = Sandbox::new();
    write_plugin(&sandbox.plugins, "broken", "not json", "exit 0");

    let output = sandbox.plinth(&["--quiet", "--version"]);
    assert!(output.status.success());
    assert!(!stderr(&output).contains("Unable to load plugin"));
}

#[test]
fn test_missing_settings_file_fails() {
    let sandbox = Sandbox::new();
    let output = Command::new(env!("CARGO_BIN_EXE_plinth"))
        .env("XDG_CONFIG_HOME", sandbox.root.join("config"))
        .env("HOME", sandbox.root.join("home"))
        .arg("--settings")
        .arg(Path::new("/nonexistent/plinth.toml"))
        .arg("--version")
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("configuration error"));
}
