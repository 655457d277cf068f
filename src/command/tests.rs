use super::{execute, parse, ExecutionResult, ParsedCommand};
use crate::constants::errors;
use crate::key::KeyEvent;
use crate::layout::LayoutType;
use crate::test_utils::editor_state;
use std::fs;
use tempfile::tempdir;

fn failure_code(result: ExecutionResult) -> String {
    match result {
        ExecutionResult::Failure(err) => err.code,
        other => panic!("expected failure, got {other:?}"),
    }
}

#[test]
fn test_parse_empty() {
    assert_eq!(parse(""), ParsedCommand::Empty);
    assert_eq!(parse(":"), ParsedCommand::Empty);
    assert_eq!(parse("   "), ParsedCommand::Empty);
}

#[test]
fn test_parse_quit() {
    assert_eq!(parse(":quit"), ParsedCommand::Quit { bangs: 0 });
    assert_eq!(parse("q"), ParsedCommand::Quit { bangs: 0 });
    assert_eq!(parse(":q!"), ParsedCommand::Quit { bangs: 1 });
    assert_eq!(parse("qui!!"), ParsedCommand::Quit { bangs: 2 });
}

#[test]
fn test_parse_write_with_path() {
    assert_eq!(
        parse(":w"),
        ParsedCommand::Write {
            path: None,
            bangs: 0
        }
    );
    assert_eq!(
        parse(":write! out.txt"),
        ParsedCommand::Write {
            path: Some("out.txt".to_string()),
            bangs: 1
        }
    );
}

#[test]
fn test_parse_write_quit_aliases() {
    let expected = ParsedCommand::WriteQuit {
        path: None,
        bangs: 0,
    };
    assert_eq!(parse("wq"), expected);
    assert_eq!(parse("x"), expected);
    assert_eq!(parse("xit"), expected);
}

#[test]
fn test_parse_prefix_and_ambiguity() {
    assert_eq!(
        parse("sou cfg"),
        ParsedCommand::Source {
            path: Some("cfg".to_string())
        }
    );
    assert_eq!(
        parse("ech  hello  there"),
        ParsedCommand::Echo {
            text: "hello  there".to_string()
        }
    );
    // "w" is an exact alias; "wr" is an unambiguous prefix
    assert!(matches!(parse("wr"), ParsedCommand::Write { .. }));
    assert!(matches!(parse("b"), ParsedCommand::Bind { .. }));
    // Both "edit" and "echo" start with "e", but "e" is an alias of edit
    assert!(matches!(parse("e"), ParsedCommand::Edit { .. }));
}

#[test]
fn test_parse_ambiguous_prefix() {
    // "s" matches both "set" and "source"
    assert_eq!(
        parse("s"),
        ParsedCommand::Ambiguous {
            prefix: "s".to_string(),
            matches: vec!["set".to_string(), "source".to_string()],
        }
    );
}

#[test]
fn test_parse_unknown() {
    assert_eq!(
        parse("frobnicate now"),
        ParsedCommand::Unknown {
            name: "frobnicate".to_string()
        }
    );
    assert_eq!(
        parse("!"),
        ParsedCommand::Unknown {
            name: "!".to_string()
        }
    );
}

#[test]
fn test_parse_set_and_bind_args() {
    assert_eq!(parse("set"), ParsedCommand::Set { args: None });
    assert_eq!(
        parse("set ts=2"),
        ParsedCommand::Set {
            args: Some("ts=2".to_string())
        }
    );
    assert_eq!(
        parse("bind normal q quit"),
        ParsedCommand::Bind {
            args: "normal q quit".to_string()
        }
    );
}

#[test]
fn test_quit_clean_document() {
    let mut ed = editor_state("text");
    assert_eq!(
        execute(ParsedCommand::Quit { bangs: 0 }, &mut ed),
        ExecutionResult::Quit
    );
}

#[test]
fn test_quit_with_unsaved_changes_fails() {
    let mut ed = editor_state("text");
    ed.document.insert_char('x');

    let result = execute(ParsedCommand::Quit { bangs: 0 }, &mut ed);
    match result {
        ExecutionResult::Failure(err) => {
            assert_eq!(err.code, errors::UNSAVED_CHANGES);
            assert_eq!(
                err.message,
                "No write since last change (add ! to override)"
            );
        }
        other => panic!("expected failure, got {other:?}"),
    }

    assert_eq!(
        execute(ParsedCommand::Quit { bangs: 1 }, &mut ed),
        ExecutionResult::Quit
    );
}

#[test]
fn test_write_without_path_fails() {
    let mut ed = editor_state("text");
    let result = execute(
        ParsedCommand::Write {
            path: None,
            bangs: 0,
        },
        &mut ed,
    );
    assert_eq!(failure_code(result), errors::NO_PATH);
}

#[test]
fn test_write_to_path() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("out.txt");
    let mut ed = editor_state("one\ntwo");
    ed.document.insert_char('>');

    let result = execute(
        ParsedCommand::Write {
            path: Some(path.display().to_string()),
            bangs: 0,
        },
        &mut ed,
    );

    let ExecutionResult::Message(message) = result else {
        panic!("expected message, got {result:?}");
    };
    assert!(message.ends_with("2L, 9B written"), "{message}");
    assert_eq!(fs::read_to_string(&path).unwrap(), ">one\ntwo\n");
    assert!(!ed.document.is_dirty());
    assert_eq!(ed.document.path(), Some(path.as_path()));
}

#[test]
fn test_write_quit() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("wq.txt");
    let mut ed = editor_state("data");
    ed.document.set_path(&path);
    ed.document.insert_char('!');

    let result = execute(
        ParsedCommand::WriteQuit {
            path: None,
            bangs: 0,
        },
        &mut ed,
    );
    assert_eq!(result, ExecutionResult::Quit);
    assert_eq!(fs::read_to_string(&path).unwrap(), "!data\n");
}

#[test]
fn test_write_quit_unnamed_clean_document_quits() {
    let mut ed = editor_state("");
    assert_eq!(
        execute(
            ParsedCommand::WriteQuit {
                path: None,
                bangs: 0
            },
            &mut ed
        ),
        ExecutionResult::Quit
    );
}

#[test]
fn test_edit_loads_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("other.txt");
    fs::write(&path, "a\nb\nc\n").unwrap();
    let mut ed = editor_state("old");

    let result = execute(
        ParsedCommand::Edit {
            path: Some(path.display().to_string()),
            bangs: 0,
        },
        &mut ed,
    );
    assert!(matches!(result, ExecutionResult::Message(_)));
    assert_eq!(ed.document.lines(), &["a", "b", "c"]);
    assert_eq!(ed.document.path(), Some(path.as_path()));
}

#[test]
fn test_edit_refuses_to_discard_changes() {
    let mut ed = editor_state("old");
    ed.document.insert_char('x');
    let result = execute(
        ParsedCommand::Edit {
            path: Some("whatever.txt".to_string()),
            bangs: 0,
        },
        &mut ed,
    );
    assert_eq!(failure_code(result), errors::UNSAVED_CHANGES);
    assert_eq!(ed.document.lines(), &["xold"]);
}

#[test]
fn test_set_changes_options() {
    let mut ed = editor_state("");
    assert_eq!(
        execute(parse("set ts=2"), &mut ed),
        ExecutionResult::Success
    );
    assert_eq!(ed.config.options().tabstop, 2);

    assert_eq!(
        execute(parse("set noet"), &mut ed),
        ExecutionResult::Success
    );
    assert!(!ed.config.options().expandtab);

    assert_eq!(
        execute(parse("set tabstop?"), &mut ed),
        ExecutionResult::Message("tabstop=2".to_string())
    );
}

#[test]
fn test_set_lists_all_options() {
    let mut ed = editor_state("");
    let ExecutionResult::Message(all) = execute(parse("set"), &mut ed) else {
        panic!("expected option listing");
    };
    assert!(all.contains("layout=qwerty"));
    assert!(all.contains("history=100"));
    assert!(all.contains("expandtab"));
}

#[test]
fn test_set_invalid_value_fails() {
    let mut ed = editor_state("");
    let result = execute(parse("set tabstop=99"), &mut ed);
    assert_eq!(failure_code(result), errors::SETTING_ERROR);
    assert_eq!(ed.config.options().tabstop, 4);

    let result = execute(parse("set bogus"), &mut ed);
    assert_eq!(failure_code(result), errors::SETTING_ERROR);
}

#[test]
fn test_set_layout_switches_layout() {
    let mut ed = editor_state("");
    assert_eq!(
        execute(parse("set layout=dvorak"), &mut ed),
        ExecutionResult::Success
    );
    assert_eq!(ed.layout().name(), "dvorak");
    assert_eq!(ed.config.options().layout, LayoutType::Dvorak);
}

#[test]
fn test_set_bad_custom_layout_reverts() {
    let mut ed = editor_state("");
    let result = execute(parse("set layout=/no/such/layout/file"), &mut ed);
    assert_eq!(failure_code(result), errors::LAYOUT_LOAD);
    assert_eq!(ed.layout().name(), "qwerty");
    assert_eq!(ed.config.options().layout, LayoutType::Qwerty);
}

#[test]
fn test_set_history_resizes_history() {
    let mut ed = editor_state("");
    execute(parse("set history=5"), &mut ed);
    assert_eq!(ed.history.capacity(), 5);
}

#[test]
fn test_bind_adds_runtime_binding() {
    let mut ed = editor_state("");
    assert_eq!(
        execute(parse("bind normal Q force_quit"), &mut ed),
        ExecutionResult::Success
    );
    let factory = ed.config.query("normal", KeyEvent::char('Q')).unwrap();
    assert_eq!(factory.name(), "force_quit");
}

#[test]
fn test_bind_errors_are_config_failures() {
    let mut ed = editor_state("");
    let result = execute(parse("bind normal"), &mut ed);
    assert_eq!(failure_code(result), errors::CONFIG_PARSE);

    let result = execute(parse("bind nowhere x quit"), &mut ed);
    match result {
        ExecutionResult::Failure(err) => assert!(err.message.contains("nowhere")),
        other => panic!("expected failure, got {other:?}"),
    }
}

#[test]
fn test_source_reloads_config() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("fimrc");
    fs::write(&path, "bind normal q quit\nset tabstop = 8\n").unwrap();
    let mut ed = editor_state("");

    let result = execute(
        ParsedCommand::Source {
            path: Some(path.display().to_string()),
        },
        &mut ed,
    );
    assert!(matches!(result, ExecutionResult::Message(_)), "{result:?}");
    assert_eq!(ed.config.options().tabstop, 8);
    assert_eq!(
        ed.config.query("normal", KeyEvent::char('q')).map(|f| f.name()),
        Some("quit")
    );
    // Built-in bindings survive the reload
    assert!(ed.config.query("normal", KeyEvent::char(':')).is_some());
    assert_eq!(ed.config_path(), Some(path.as_path()));
}

#[test]
fn test_source_failure_keeps_old_config() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("fimrc");
    fs::write(&path, "set tabstop = 8\nbind normal q no_such_target\n").unwrap();
    let mut ed = editor_state("");
    execute(parse("bind normal Q quit"), &mut ed);

    let result = execute(
        ParsedCommand::Source {
            path: Some(path.display().to_string()),
        },
        &mut ed,
    );
    assert_eq!(failure_code(result), errors::CONFIG_PARSE);
    assert_eq!(ed.config.options().tabstop, 4);
    assert!(ed.config.query("normal", KeyEvent::char('Q')).is_some());
}

#[test]
fn test_source_without_path() {
    let mut ed = editor_state("");
    let result = execute(ParsedCommand::Source { path: None }, &mut ed);
    assert_eq!(failure_code(result), errors::NO_PATH);
}

#[test]
fn test_echo_and_unknown() {
    let mut ed = editor_state("");
    assert_eq!(
        execute(parse("echo hi there"), &mut ed),
        ExecutionResult::Message("hi there".to_string())
    );

    let result = execute(parse("nope"), &mut ed);
    match result {
        ExecutionResult::Failure(err) => {
            assert_eq!(err.code, errors::UNKNOWN_COMMAND);
            assert_eq!(err.message, "Not an editor command: nope");
        }
        other => panic!("expected failure, got {other:?}"),
    }
}

#[test]
fn test_ambiguous_reports_matches() {
    let mut ed = editor_state("");
    let result = execute(parse("s"), &mut ed);
    match result {
        ExecutionResult::Failure(err) => {
            assert_eq!(err.code, errors::AMBIGUOUS_COMMAND);
            assert!(err.message.contains("set, source"));
        }
        other => panic!("expected failure, got {other:?}"),
    }
}
