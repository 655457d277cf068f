use super::*;
use crate::context::ContextMessage;
use crate::key::{KeyCode, Modifiers};
use std::fs;
use tempfile::tempdir;

/// Built-in registry plus two do-nothing actions
fn registry() -> ContextRegistry {
    let mut registry = ContextRegistry::default();
    registry.register_action("run_action", |_| Ok(ContextMessage::Unit));
    registry.register_action("run_other_action", |_| Ok(ContextMessage::Unit));
    registry
}

fn bind_error(text: &str) -> BindError {
    let err = Config::parse_with(text, &registry()).unwrap_err();
    err.bind_error()
        .cloned()
        .unwrap_or_else(|| panic!("expected a bind error, got {err}"))
}

#[test]
fn test_empty_config_has_no_bindings() {
    let config = Config::empty();
    assert!(config.is_empty());
    assert!(config.query("normal", KeyEvent::char('a')).is_none());
    assert!(config.query("", KeyEvent::plain(KeyCode::Esc)).is_none());
    assert!(config
        .query("insert", KeyEvent::new(KeyCode::F(3), Modifiers::ALT))
        .is_none());
}

#[test]
fn test_later_binding_wins() {
    let config = Config::parse_with(
        "bind normal a run_action\nbind normal a run_other_action\n",
        &registry(),
    )
    .unwrap();
    assert_eq!(config.len(), 1);
    let factory = config.query("normal", KeyEvent::char('a')).unwrap();
    assert_eq!(factory.name(), "run_other_action");
}

#[test]
fn test_bindings_are_per_context() {
    let config = Config::parse_with(
        "bind normal a run_action\nbind insert a run_other_action\n",
        &registry(),
    )
    .unwrap();
    assert_eq!(
        config.query("normal", KeyEvent::char('a')).map(Factory::name),
        Some("run_action")
    );
    assert_eq!(
        config.query("insert", KeyEvent::char('a')).map(Factory::name),
        Some("run_other_action")
    );
    assert!(config.query("command", KeyEvent::char('a')).is_none());
}

#[test]
fn test_bind_arguments_are_kept() {
    let config =
        Config::parse_with("bind normal <F2> exec   echo   hello world", &registry()).unwrap();
    let factory = config
        .query("normal", KeyEvent::plain(KeyCode::F(2)))
        .unwrap();
    assert_eq!(factory.name(), "exec");
    assert_eq!(factory.args(), "echo hello world");
}

#[test]
fn test_legacy_bind_syntax() {
    let config = Config::parse_with("bind(normal) <C-x> run_action", &registry()).unwrap();
    assert!(config.query("normal", KeyEvent::ctrl('x')).is_some());
}

#[test]
fn test_not_enough_terms() {
    assert_eq!(bind_error("bind normal"), BindError::NotEnoughTerms);
    assert_eq!(bind_error("bind"), BindError::NotEnoughTerms);
    assert_eq!(bind_error("bind normal a"), BindError::NotEnoughTerms);
}

#[test]
fn test_unknown_context() {
    assert_eq!(
        bind_error("bind unknown_mode x"),
        BindError::NoMatchingContext {
            context: "unknown_mode".to_string()
        }
    );
}

#[test]
fn test_unknown_target() {
    assert_eq!(
        bind_error("bind normal x no_such_action"),
        BindError::NoMatchingContext {
            context: "no_such_action".to_string()
        }
    );
}

#[test]
fn test_malformed_bind_terms() {
    assert_eq!(bind_error("bind(normal a run_action"), BindError::MalformedBindTerm);
    assert_eq!(bind_error("bind no!rmal a run_action"), BindError::MalformedBindTerm);
    assert_eq!(
        bind_error("bind(nörmal) a run_action"),
        BindError::UnicodeBoundaryErrorInBind
    );
    assert_eq!(
        bind_error("bind nörmal a run_action"),
        BindError::UnicodeBoundaryErrorInBind
    );
}

#[test]
fn test_malformed_key_event_terms() {
    assert_eq!(
        bind_error("bind normal <Nope> run_action"),
        BindError::MalformedKeyEventTerm
    );
    assert_eq!(
        bind_error("bind normal ab run_action"),
        BindError::MalformedKeyEventTerm
    );
    assert_eq!(
        bind_error("bind normal <aé run_action"),
        BindError::UnicodeBoundaryErrorInKeyEvent
    );
}

#[test]
fn test_terms_checked_left_to_right() {
    // The bad context is reported before the bad key
    assert_eq!(
        bind_error("bind nowhere <Nope> run_action"),
        BindError::NoMatchingContext {
            context: "nowhere".to_string()
        }
    );
    // The bad key is reported before the missing target
    assert_eq!(
        bind_error("bind normal <Nope>"),
        BindError::MalformedKeyEventTerm
    );
}

#[test]
fn test_error_reports_line() {
    let err = Config::parse_with(
        "# comment\n\nbind normal a run_action\nbind normal\n",
        &registry(),
    )
    .unwrap_err();
    assert_eq!(err.line(), Some(4));
    assert!(err.to_string().starts_with("<string>:4:"));
}

#[test]
fn test_comments_and_blank_lines_are_skipped() {
    let config = Config::parse_with(
        "# hash comment\n\" vim comment\n   \n\tbind normal a run_action\n",
        &registry(),
    )
    .unwrap();
    assert_eq!(config.len(), 1);
}

#[test]
fn test_not_a_statement() {
    let err = Config::parse_with("bind normal a run_action\nmap a b\n", &registry()).unwrap_err();
    assert!(matches!(err, ConfigError::NotAStatement { line: 2, .. }));
}

#[test]
fn test_set_statements() {
    let config = Config::parse_with(
        "set tabstop = 2\nset noexpandtab\nset history=7\nset layout = colemak\n",
        &registry(),
    )
    .unwrap();
    let options = config.options();
    assert_eq!(options.tabstop, 2);
    assert!(!options.expandtab);
    assert_eq!(options.history, 7);
    assert_eq!(options.layout, crate::layout::LayoutType::Colemak);
    assert_eq!(options.tab_text(), "\t");
}

#[test]
fn test_bad_set_statement() {
    let err = Config::parse_with("set tabstop = 0\n", &registry()).unwrap_err();
    match err {
        ConfigError::Setting { line, error, .. } => {
            assert_eq!(line, 1);
            assert!(matches!(error, OptionError::InvalidValue { .. }));
        }
        other => panic!("expected a setting error, got {other}"),
    }

    let err = Config::parse_with("set tabstop\n", &registry()).unwrap_err();
    assert!(matches!(
        err,
        ConfigError::Setting {
            error: OptionError::MissingValue { .. },
            ..
        }
    ));
}

#[test]
fn test_failed_parse_returns_no_config() {
    let result = Config::parse_with("bind normal a run_action\nbind normal b nowhere\n", &registry());
    assert!(result.is_err());
}

#[test]
fn test_builtin_config_parses() {
    let config = Config::builtin().unwrap();
    assert!(!config.is_empty());
    assert_eq!(
        config.query("normal", KeyEvent::char(':')).map(Factory::name),
        Some("command")
    );
    assert_eq!(
        config.query("normal", KeyEvent::ctrl('s')).map(Factory::name),
        Some("write")
    );
    assert_eq!(
        config.query("normal", KeyEvent::char('G')).map(Factory::name),
        Some("file_end")
    );
}

#[test]
fn test_from_str_uses_default_registry() {
    let config: Config = "bind normal q quit".parse().unwrap();
    assert!(config.query("normal", KeyEvent::char('q')).is_some());
    assert!("bind normal q run_action".parse::<Config>().is_err());
}

#[test]
fn test_load_file_and_include() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("sub")).unwrap();
    fs::write(
        dir.path().join("fimrc"),
        "bind normal a run_action\ninclude sub/extra\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("sub/extra"),
        "bind normal a run_other_action\nbind insert <C-a> run_action\n",
    )
    .unwrap();

    let config = Config::load(dir.path().join("fimrc"), &registry()).unwrap();
    assert_eq!(
        config.query("normal", KeyEvent::char('a')).map(Factory::name),
        Some("run_other_action")
    );
    assert!(config.query("insert", KeyEvent::ctrl('a')).is_some());
}

#[test]
fn test_include_cycle_is_rejected() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a"), "include b\n").unwrap();
    fs::write(dir.path().join("b"), "bind normal a run_action\ninclude a\n").unwrap();

    let err = Config::load(dir.path().join("a"), &registry()).unwrap_err();
    match err {
        ConfigError::IncludeCycle { line, path, .. } => {
            assert_eq!(line, 2);
            assert!(path.ends_with("a"));
        }
        other => panic!("expected an include cycle, got {other}"),
    }
}

#[test]
fn test_self_include_is_rejected() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("rc"), "include rc\n").unwrap();
    let err = Config::load(dir.path().join("rc"), &registry()).unwrap_err();
    assert!(matches!(err, ConfigError::IncludeCycle { .. }));
}

#[test]
fn test_diamond_include_is_allowed() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("top"), "include left\ninclude right\n").unwrap();
    fs::write(dir.path().join("left"), "include common\n").unwrap();
    fs::write(dir.path().join("right"), "include common\n").unwrap();
    fs::write(dir.path().join("common"), "bind normal a run_action\n").unwrap();

    let config = Config::load(dir.path().join("top"), &registry()).unwrap();
    assert_eq!(config.len(), 1);
}

#[test]
fn test_missing_file_and_include() {
    let dir = tempdir().unwrap();
    let err = Config::load(dir.path().join("absent"), &registry()).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
    assert_eq!(err.line(), None);

    fs::write(dir.path().join("rc"), "include absent\n").unwrap();
    let err = Config::load(dir.path().join("rc"), &registry()).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
}

#[test]
fn test_extend_keeps_config_on_error() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("rc"),
        "set tabstop = 8\nbind normal q run_action\nbind normal\n",
    )
    .unwrap();

    let mut config = Config::builtin_with(&registry()).unwrap();
    let before = config.len();
    assert!(config
        .extend_from_file(dir.path().join("rc"), &registry())
        .is_err());
    assert_eq!(config.len(), before);
    assert_eq!(config.options().tabstop, 4);
    assert!(config.query("normal", KeyEvent::char('q')).is_none());
}

#[test]
fn test_extend_layers_over_builtin() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("rc"), "bind normal x run_action\n").unwrap();

    let mut config = Config::builtin_with(&registry()).unwrap();
    config
        .extend_from_file(dir.path().join("rc"), &registry())
        .unwrap();
    assert_eq!(
        config.query("normal", KeyEvent::char('x')).map(Factory::name),
        Some("run_action")
    );
    assert!(config.query("normal", KeyEvent::char('i')).is_some());
}

#[test]
fn test_config_error_to_fim_error() {
    let err = Config::parse_with("bind normal", &registry()).unwrap_err();
    let fim: crate::error::FimError = err.into();
    assert_eq!(fim.code, crate::constants::errors::CONFIG_PARSE);
    assert_eq!(fim.kind, crate::error::ErrorType::Config);
}

#[test]
fn test_manual_bind_and_iteration_order() {
    let registry = registry();
    let mut config = Config::empty();
    config.bind(
        "normal",
        KeyEvent::char('b'),
        registry.factory("run_action", "").unwrap(),
    );
    config.bind(
        "normal",
        KeyEvent::char('a'),
        registry.factory("run_other_action", "").unwrap(),
    );
    let keys: Vec<KeyEvent> = config.bindings("normal").map(|(k, _)| *k).collect();
    assert_eq!(keys, vec![KeyEvent::char('b'), KeyEvent::char('a')]);
    assert_eq!(config.bindings("insert").count(), 0);
}

#[test]
fn test_layout_path_relative_to_naming_file() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("sub")).unwrap();
    fs::write(dir.path().join("fimrc"), "include sub/inc\n").unwrap();
    fs::write(dir.path().join("sub/inc"), "set layout = l.layout\n").unwrap();

    let config = Config::load(dir.path().join("fimrc"), &registry()).unwrap();
    let sub = fs::canonicalize(dir.path().join("sub")).unwrap();
    assert_eq!(
        config.options().layout,
        crate::layout::LayoutType::Custom(sub.join("l.layout"))
    );
}
