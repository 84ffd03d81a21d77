//! The shared configuration-file workflow commands use to load their application.

use plinth::command::{ArgValue, BaseCommand, Command, ParsedInvocation, CONFIG_FILE_ARG};
use plinth::error::CommandError;
use std::cell::Cell;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn base_with_config(path: &Path) -> BaseCommand {
    let mut base = BaseCommand::new();
    let invocation = ParsedInvocation::new("serve").with(
        CONFIG_FILE_ARG,
        ArgValue::Single(path.display().to_string()),
    );
    assert_eq!(base.run(invocation).unwrap(), None);
    base
}

#[test]
fn test_loader_not_called_for_missing_file() {
    let temp_dir = TempDir::new().unwrap();
    let base = base_with_config(&temp_dir.path().join("missing.conf"));
    let calls = Cell::new(0);

    let result = base.load_application(&|_: &Path| {
        calls.set(calls.get() + 1);
        Ok::<_, CommandError>(())
    });

    assert!(matches!(result, Err(CommandError::ConfigNotFound(_))));
    assert_eq!(calls.get(), 0);
}

#[test]
fn test_loader_not_called_for_directory() {
    let temp_dir = TempDir::new().unwrap();
    let base = base_with_config(temp_dir.path());
    let calls = Cell::new(0);

    let result = base.load_application(&|_: &Path| {
        calls.set(calls.get() + 1);
        Ok::<_, CommandError>(())
    });

    assert!(result.is_err());
    assert_eq!(calls.get(), 0);
}

#[test]
fn test_loader_called_once_with_path_and_result_returned() {
    let temp_dir = TempDir::new().unwrap();
    let config = temp_dir.path().join("app.conf");
    fs::write(&config, "name = \"demo\"\n").unwrap();
    let base = base_with_config(&config);
    let calls = Cell::new(0);

    let app = base
        .load_application(&|path: &Path| {
            calls.set(calls.get() + 1);
            Ok::<_, CommandError>(format!("app from {}", path.display()))
        })
        .unwrap();

    assert_eq!(calls.get(), 1);
    assert_eq!(app, format!("app from {}", config.display()));
}

#[test]
fn test_loader_errors_pass_through() {
    let temp_dir = TempDir::new().unwrap();
    let config = temp_dir.path().join("app.conf");
    fs::write(&config, "").unwrap();
    let base = base_with_config(&config);

    let result = base.load_application(&|_: &Path| {
        Err::<(), _>(CommandError::ApplicationLoad("bad config".to_string()))
    });

    assert!(matches!(result, Err(CommandError::ApplicationLoad(msg)) if msg == "bad config"));
}

#[test]
fn test_missing_argument_is_reported() {
    let mut base = BaseCommand::new();
    base.run(ParsedInvocation::new("serve")).unwrap();
    let result = base.load_application(&|_: &Path| Ok::<_, CommandError>(()));
    assert!(matches!(result, Err(CommandError::MissingConfigArgument)));
}
