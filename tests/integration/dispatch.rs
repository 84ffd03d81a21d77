//! End-to-end dispatch through the runner with an in-memory plugin source.

use super::test_utils::{instances, served, Serve};
use plinth::cli::Runner;
use plinth::command::{ArgumentSpec, Command, CommandResult, CommandType, ParsedInvocation};
use plinth::error::{CommandError, DispatchError};
use plinth::manager::CommandManager;
use plinth::plugin::StaticPluginSource;
use std::fs;
use tempfile::TempDir;

struct Shell;

impl Command for Shell {
    fn run(&mut self, _invocation: ParsedInvocation) -> CommandResult {
        Ok(Some(7))
    }
}

fn runner() -> Runner {
    let source = StaticPluginSource::new()
        .with_kind::<Serve>("serve")
        .with_command("shell", || CommandType::new("Open an interactive shell.", || Shell))
        .with_loader("broken", || panic!("plugin import failed"));
    Runner::new(CommandManager::new(&source)).with_version("(development)")
}

#[test]
fn test_serve_existing_config_succeeds() {
    let temp_dir = TempDir::new().unwrap();
    let config = temp_dir.path().join("app.conf");
    fs::write(&config, "debug = true\n").unwrap();

    let code = runner()
        .run(["serve".into(), config.clone().into_os_string()])
        .unwrap();

    assert_eq!(code, 0);
    assert_eq!(served(), vec![config]);
}

#[test]
fn test_serve_missing_config_fails_before_loading() {
    let temp_dir = TempDir::new().unwrap();
    let config = temp_dir.path().join("absent.conf");

    let err = runner()
        .run(["serve".into(), config.clone().into_os_string()])
        .unwrap_err();

    match &err {
        DispatchError::Command(CommandError::ConfigNotFound(path)) => assert_eq!(path, &config),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(err.exit_code(), 1);
    assert!(err.to_string().ends_with("is not a file."));
    assert!(served().is_empty());
}

#[test]
fn test_explicit_exit_status_is_returned() {
    assert_eq!(runner().run(["shell", "app.conf"]).unwrap(), 7);
}

#[test]
fn test_unknown_subcommand_instantiates_nothing() {
    let runner = runner();
    let before = instances();

    let err = runner.run(["deploy", "app.conf"]).unwrap_err();

    assert!(matches!(err, DispatchError::Usage(_)));
    assert_ne!(err.exit_code(), 0);
    assert_eq!(instances(), before);
}

#[test]
fn test_grammar_matches_registry() {
    let runner = runner();
    let registry_names: Vec<&str> = runner.manager().names().collect();
    assert_eq!(registry_names, vec!["serve", "shell"]);

    let parser = runner.parser();
    let subcommands: Vec<String> = parser
        .get_subcommands()
        .map(|sub| sub.get_name().to_string())
        .collect();
    assert_eq!(subcommands, registry_names);

    let serve = parser.find_subcommand("serve").unwrap();
    assert_eq!(
        serve.get_about().map(ToString::to_string),
        Some("Run the development server".to_string())
    );
}

#[test]
fn test_default_argument_is_required_positional() {
    let err = runner().run(["serve"]).unwrap_err();
    assert!(matches!(err, DispatchError::Usage(_)));
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn test_help_lists_summaries() {
    let help = runner().parser().render_help().to_string();
    assert!(help.contains("serve"));
    assert!(help.contains("Run the development server"));
    assert!(help.contains("Open an interactive shell"));
    assert!(!help.contains("broken"));
}

#[test]
fn test_plugin_clap_would_reject_does_not_break_others() {
    let source = StaticPluginSource::new()
        .with_command("good", || CommandType::new("Open an interactive shell.", || Shell))
        .with_command("evil", || {
            CommandType::new("Declares an unusable flag.", || Shell)
                .with_arguments(vec![ArgumentSpec::new("--x").short('-')])
        });
    let runner = Runner::new(CommandManager::new(&source)).with_version("(development)");

    assert_eq!(runner.manager().names().collect::<Vec<_>>(), vec!["good"]);
    assert_eq!(runner.run(["good", "a.conf"]).unwrap(), 7);
}

