//! Command executor
//! Runs parsed commands against the editor state

use super::ParsedCommand;
use crate::config::{parse_bind, Config, ConfigError};
use crate::context::ContextRegistry;
use crate::constants::errors;
use crate::document::Document;
use crate::error::{ErrorType, FimError};
use crate::state::EditorState;
use std::path::{Path, PathBuf};

/// Result of executing a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionResult {
    /// Command executed successfully
    Success,
    /// The editor should exit
    Quit,
    /// Informational text for the message line
    Message(String),
    Failure(FimError),
}

impl From<FimError> for ExecutionResult {
    fn from(err: FimError) -> Self {
        Self::Failure(err)
    }
}

/// Execute a parsed command
pub fn execute(command: ParsedCommand, ed: &mut EditorState) -> ExecutionResult {
    match command {
        ParsedCommand::Empty => ExecutionResult::Success,
        ParsedCommand::Quit { bangs } => {
            if bangs == 0 && ed.document.is_dirty() {
                return unsaved_changes();
            }
            ExecutionResult::Quit
        }
        ParsedCommand::Write { path, bangs: _ } => match write(ed, path.as_deref()) {
            Ok(message) => ExecutionResult::Message(message),
            Err(err) => err.into(),
        },
        ParsedCommand::WriteQuit { path, bangs: _ } => {
            // Nothing to write is fine as long as nothing would be lost
            if path.is_none() && ed.document.path().is_none() && !ed.document.is_dirty() {
                return ExecutionResult::Quit;
            }
            match write(ed, path.as_deref()) {
                Ok(_) => ExecutionResult::Quit,
                Err(err) => err.into(),
            }
        }
        ParsedCommand::Edit { path, bangs } => edit(ed, path.as_deref(), bangs),
        ParsedCommand::Set { args } => set(ed, args.as_deref()),
        ParsedCommand::Bind { args } => {
            let line = format!("bind {args}");
            match parse_bind(&line, &ed.registry) {
                Ok(binding) => {
                    ed.config.bind(binding.context, binding.key, binding.factory);
                    ExecutionResult::Success
                }
                Err(err) => FimError::new(
                    ErrorType::Config,
                    errors::CONFIG_PARSE,
                    format!("bind: {err}"),
                )
                .into(),
            }
        }
        ParsedCommand::Source { path } => source(ed, path.map(PathBuf::from)),
        ParsedCommand::Echo { text } => ExecutionResult::Message(text),
        ParsedCommand::Unknown { name } => FimError::new(
            ErrorType::Parse,
            errors::UNKNOWN_COMMAND,
            format!("Not an editor command: {name}"),
        )
        .into(),
        ParsedCommand::Ambiguous { prefix, matches } => FimError::new(
            ErrorType::Parse,
            errors::AMBIGUOUS_COMMAND,
            format!("Ambiguous command '{prefix}': matches {}", matches.join(", ")),
        )
        .into(),
    }
}

fn unsaved_changes() -> ExecutionResult {
    FimError::new(
        ErrorType::Execution,
        errors::UNSAVED_CHANGES,
        errors::MSG_UNSAVED_CHANGES,
    )
    .into()
}

/// Save the document; returns the message vim shows after a write
fn write(ed: &mut EditorState, path: Option<&str>) -> Result<String, FimError> {
    if path.is_none() && ed.document.path().is_none() {
        return Err(FimError::new(
            ErrorType::Execution,
            errors::NO_PATH,
            errors::MSG_NO_FILE_NAME,
        ));
    }
    let bytes = ed.document.save(path.map(Path::new))?;
    let name = ed
        .document
        .path()
        .map_or_else(String::new, |p| p.display().to_string());
    let lines = ed.document.line_count();
    tracing::info!(path = %name, bytes, "wrote document");
    Ok(format!("\"{name}\" {lines}L, {bytes}B written"))
}

fn edit(ed: &mut EditorState, path: Option<&str>, bangs: usize) -> ExecutionResult {
    if bangs == 0 && ed.document.is_dirty() {
        return unsaved_changes();
    }
    let target = match path {
        Some(path) => PathBuf::from(path),
        // `:e` alone reloads the current file
        None => match ed.document.path() {
            Some(path) => path.to_path_buf(),
            None => {
                return FimError::new(
                    ErrorType::Execution,
                    errors::NO_PATH,
                    errors::MSG_NO_FILE_NAME,
                )
                .into()
            }
        },
    };
    match Document::load(&target) {
        Ok(doc) => {
            tracing::info!(path = %target.display(), lines = doc.line_count(), "opened document");
            let message = format!("\"{}\" {}L", target.display(), doc.line_count());
            ed.document = doc;
            ExecutionResult::Message(message)
        }
        Err(err) => FimError::new(
            ErrorType::Io,
            errors::IO_ERROR,
            format!("{}: {err}", target.display()),
        )
        .into(),
    }
}

fn set(ed: &mut EditorState, args: Option<&str>) -> ExecutionResult {
    let Some(args) = args else {
        let all: Vec<String> = crate::config::options::OPTIONS
            .iter()
            .map(|desc| (desc.get)(ed.config.options()))
            .collect();
        return ExecutionResult::Message(all.join("  "));
    };

    if let Some(name) = args.strip_suffix('?') {
        return match ed.config.options().show(name.trim()) {
            Some(value) => ExecutionResult::Message(value),
            None => setting_error(format!("unknown option: {}", name.trim())),
        };
    }

    if let Err(err) = ed.config.options_mut().apply(args) {
        return setting_error(err.to_string());
    }
    match ed.sync_options() {
        Ok(()) => ExecutionResult::Success,
        Err(err) => err.into(),
    }
}

fn setting_error(message: String) -> ExecutionResult {
    FimError::new(ErrorType::Config, errors::SETTING_ERROR, message).into()
}

/// Rebuild the configuration from the built-in bindings plus `path`
fn source(ed: &mut EditorState, path: Option<PathBuf>) -> ExecutionResult {
    let Some(path) = path.or_else(|| ed.config_path().map(Path::to_path_buf)) else {
        return FimError::new(
            ErrorType::Config,
            errors::NO_PATH,
            "No config file to source",
        )
        .into();
    };
    let config = match reload(&path, &ed.registry) {
        Ok(config) => config,
        Err(err) => return FimError::from(err).into(),
    };
    let bindings = config.len();
    ed.config = config;
    ed.set_config_path(Some(path.clone()));
    if let Err(err) = ed.sync_options() {
        return err.into();
    }
    ExecutionResult::Message(format!(
        "sourced {} ({bindings} bindings)",
        path.display()
    ))
}

fn reload(path: &Path, registry: &ContextRegistry) -> Result<Config, ConfigError> {
    let mut config = Config::builtin_with(registry)?;
    config.extend_from_file(path, registry)?;
    Ok(config)
}
