//! Discovery: broken plugins are skipped and later registrations win.

use plinth::command::{Command, CommandResult, CommandType, ParsedInvocation};
use plinth::config::PluginSettings;
use plinth::error::PluginError;
use plinth::manager::CommandManager;
use plinth::plugin::{ChainedPluginSource, StaticPluginSource};

struct Exit(i32);

impl Command for Exit {
    fn run(&mut self, _invocation: ParsedInvocation) -> CommandResult {
        Ok(Some(self.0))
    }
}

fn exiting(doc: &'static str, code: i32) -> CommandType {
    CommandType::new(doc, move || Exit(code))
}

#[test]
fn test_broken_plugins_never_block_discovery() {
    let source = StaticPluginSource::new()
        .with_loader("import-error", || Err(PluginError::Load("No module named 'x'".to_string())))
        .with_loader("panics", || panic!("boom"))
        .with_command("no-docs", || exiting("", 0))
        .with_command("create", || exiting("Create a project.", 0))
        .with_command("serve", || exiting("Run the server.", 0));

    let manager = CommandManager::new(&source);
    assert_eq!(manager.names().collect::<Vec<_>>(), vec!["create", "serve"]);
}

#[test]
fn test_last_registration_for_a_name_wins() {
    let builtin = StaticPluginSource::new()
        .with_command("serve", || exiting("Builtin serve.", 1))
        .with_command("shell", || exiting("Builtin shell.", 1));
    let overrides = StaticPluginSource::new().with_command("serve", || exiting("Custom serve.", 2));
    let source = ChainedPluginSource::new().with_source(builtin).with_source(overrides);

    let manager = CommandManager::new(&source);
    let serve = manager.get("serve").unwrap();
    assert_eq!(serve.summary().unwrap(), "Custom serve");
    assert_eq!(
        serve.instantiate().run(ParsedInvocation::new("serve")).unwrap(),
        Some(2)
    );
    assert_eq!(manager.get("shell").unwrap().summary().unwrap(), "Builtin shell");
}

#[test]
fn test_failed_override_keeps_earlier_registration() {
    let source = StaticPluginSource::new()
        .with_command("serve", || exiting("Working serve.", 0))
        .with_loader("serve", || Err(PluginError::Load("broken".to_string())));

    let manager = CommandManager::new(&source);
    assert_eq!(manager.get("serve").unwrap().summary().unwrap(), "Working serve");
}

#[test]
fn test_disabled_plugins_are_absent() {
    let source = StaticPluginSource::new()
        .with_command("serve", || exiting("Run the server.", 0))
        .with_command("shell", || exiting("Open a shell.", 0));
    let settings = PluginSettings {
        disabled: vec!["shell".to_string()],
        ..PluginSettings::default()
    };

    let manager = CommandManager::with_settings(&source, &settings);
    assert_eq!(manager.names().collect::<Vec<_>>(), vec!["serve"]);
}

#[cfg(unix)]
mod executables {
    use super::super::test_utils::scripts::write_plugin;
    use plinth::cli::Runner;
    use plinth::config::PluginSettings;
    use plinth::manager::CommandManager;
    use plinth::plugin::ExecutablePluginSource;
    use tempfile::TempDir;

    #[test]
    fn test_executable_plugins_dispatch_end_to_end() {
        let plugins = TempDir::new().unwrap();
        write_plugin(
            plugins.path(),
            "serve",
            r#"{"doc": "Run the server."}"#,
            "[ \"$PLINTH_COMMAND\" = \"serve\" ] || exit 9\nexit 0",
        );
        write_plugin(plugins.path(), "broken", "{", "exit 0");

        let settings = PluginSettings {
            dirs: vec![plugins.path().to_path_buf()],
            use_system_path: false,
            disabled: Vec::new(),
        };
        let source = ExecutablePluginSource::from_settings(&settings);
        let runner = Runner::new(CommandManager::with_settings(&source, &settings));

        assert_eq!(runner.manager().names().collect::<Vec<_>>(), vec!["serve"]);
        assert_eq!(runner.run(["serve", "app.conf"]).unwrap(), 0);
    }
}
