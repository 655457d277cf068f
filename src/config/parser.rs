//! Config file parser
//!
//! Statements, one per line:
//!
//! ```text
//! # comment            " also a comment
//! include <path>
//! bind <context> <key-term> <target> [args...]
//! bind(<context>) <key-term> <target> [args...]
//! set <option> = <value>
//! set <option>
//! set no<option>
//! ```

use super::error::{BindError, ConfigError};
use super::options::LAYOUT_OPTION;
use super::Config;
use crate::context::{ContextRegistry, Factory};
use crate::key::KeyEvent;
use std::fs;
use std::path::{Path, PathBuf};

/// A fully validated `bind` statement
#[derive(Debug, Clone)]
pub struct Binding {
    pub context: String,
    pub key: KeyEvent,
    pub factory: Factory,
}

/// Parse a `bind` statement (the whole line, including the `bind` keyword)
///
/// Terms are checked left to right; each term is validated before the next
/// one is required.
pub fn parse_bind(line: &str, registry: &ContextRegistry) -> Result<Binding, BindError> {
    let mut terms = line.split_whitespace();
    let first = terms.next().ok_or(BindError::NotEnoughTerms)?;

    let context = if first == "bind" {
        terms.next().ok_or(BindError::NotEnoughTerms)?
    } else {
        let inner = first
            .strip_prefix("bind(")
            .ok_or(BindError::MalformedBindTerm)?;
        if !inner.is_ascii() {
            return Err(BindError::UnicodeBoundaryErrorInBind);
        }
        inner
            .strip_suffix(')')
            .ok_or(BindError::MalformedBindTerm)?
    };
    validate_context_name(context)?;
    if !registry.contains(context) {
        return Err(BindError::NoMatchingContext {
            context: context.to_string(),
        });
    }

    let key: KeyEvent = terms.next().ok_or(BindError::NotEnoughTerms)?.parse()?;

    let target = terms.next().ok_or(BindError::NotEnoughTerms)?;
    let args = terms.collect::<Vec<_>>().join(" ");
    let factory = registry
        .factory(target, &args)
        .ok_or_else(|| BindError::NoMatchingContext {
            context: target.to_string(),
        })?;

    Ok(Binding {
        context: context.to_string(),
        key,
        factory,
    })
}

fn validate_context_name(name: &str) -> Result<(), BindError> {
    if !name.is_ascii() {
        return Err(BindError::UnicodeBoundaryErrorInBind);
    }
    let valid = !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-');
    if valid {
        Ok(())
    } else {
        Err(BindError::MalformedBindTerm)
    }
}

enum Statement<'a> {
    Skip,
    Include(&'a str),
    Bind,
    Set(&'a str),
    Unknown,
}

fn classify(line: &str) -> Statement<'_> {
    let Some(first) = line.split_whitespace().next() else {
        return Statement::Skip;
    };
    if first.starts_with('#') || first.starts_with('"') {
        return Statement::Skip;
    }
    let rest = line[first.len()..].trim();
    match first {
        "bind" => Statement::Bind,
        _ if first.starts_with("bind(") => Statement::Bind,
        "set" => Statement::Set(rest),
        "include" if !rest.is_empty() => Statement::Include(rest),
        _ => Statement::Unknown,
    }
}

/// Parses config text into a [`Config`], following includes
pub(crate) struct Parser<'a> {
    registry: &'a ContextRegistry,
    /// Canonical paths of the files currently being parsed, outermost first
    chain: Vec<PathBuf>,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(registry: &'a ContextRegistry) -> Self {
        Self {
            registry,
            chain: Vec::new(),
        }
    }

    /// Parse a file as the root of an include chain
    pub(crate) fn parse_file(&mut self, config: &mut Config, path: &Path) -> Result<(), ConfigError> {
        let canonical = canonicalize(path)?;
        self.parse_canonical(config, path, canonical)
    }

    fn parse_canonical(
        &mut self,
        config: &mut Config,
        path: &Path,
        canonical: PathBuf,
    ) -> Result<(), ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let base_dir = canonical
            .parent()
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
        tracing::debug!(path = %path.display(), depth = self.chain.len(), "parsing config file");

        self.chain.push(canonical);
        let result = self.parse_text(config, &text, &path.display().to_string(), &base_dir);
        self.chain.pop();
        result
    }

    /// Parse config text; includes are resolved against `base_dir`
    pub(crate) fn parse_text(
        &mut self,
        config: &mut Config,
        text: &str,
        origin: &str,
        base_dir: &Path,
    ) -> Result<(), ConfigError> {
        for (index, raw) in text.lines().enumerate() {
            let line_no = index + 1;
            let line = raw.trim();
            match classify(line) {
                Statement::Skip => {}
                Statement::Bind => {
                    let binding =
                        parse_bind(line, self.registry).map_err(|error| ConfigError::Bind {
                            origin: origin.to_string(),
                            line: line_no,
                            error,
                        })?;
                    config.bind(binding.context, binding.key, binding.factory);
                }
                Statement::Set(statement) => {
                    let options = config.options_mut();
                    let changed =
                        options
                            .apply(statement)
                            .map_err(|error| ConfigError::Setting {
                                origin: origin.to_string(),
                                line: line_no,
                                error,
                            })?;
                    // Layout files are relative to the file that names them
                    if changed == LAYOUT_OPTION {
                        options.layout = options.layout.resolved(base_dir);
                    }
                }
                Statement::Include(target) => {
                    let path = base_dir.join(target);
                    let canonical = canonicalize(&path)?;
                    if self.chain.contains(&canonical) {
                        return Err(ConfigError::IncludeCycle {
                            origin: origin.to_string(),
                            line: line_no,
                            path,
                        });
                    }
                    self.parse_canonical(config, &path, canonical)?;
                }
                Statement::Unknown => {
                    return Err(ConfigError::NotAStatement {
                        origin: origin.to_string(),
                        line: line_no,
                    });
                }
            }
        }
        Ok(())
    }
}

fn canonicalize(path: &Path) -> Result<PathBuf, ConfigError> {
    fs::canonicalize(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}
