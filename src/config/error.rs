//! Configuration errors

use super::options::OptionError;
use crate::constants::errors;
use crate::error::{ErrorType, FimError};
use crate::key::KeyTermError;
use std::path::PathBuf;

/// Errors in a `bind` statement
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BindError {
    /// The binding names a context or target that is not registered
    #[error("no matching context {context} found")]
    NoMatchingContext { context: String },
    #[error("not enough terms (expected at least 3)")]
    NotEnoughTerms,
    #[error("incorrect syntax in bind term")]
    MalformedBindTerm,
    #[error("unexpected unicode character in bind term")]
    UnicodeBoundaryErrorInBind,
    #[error("incorrect syntax in key event term")]
    MalformedKeyEventTerm,
    #[error("unexpected unicode character in key event term")]
    UnicodeBoundaryErrorInKeyEvent,
}

impl From<KeyTermError> for BindError {
    fn from(err: KeyTermError) -> Self {
        match err {
            KeyTermError::Malformed => Self::MalformedKeyEventTerm,
            KeyTermError::UnicodeBoundary => Self::UnicodeBoundaryErrorInKeyEvent,
        }
    }
}

/// Errors raised while loading a configuration
///
/// `origin` is the file path, or `<string>` for in-memory text. Lines are 1-based.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{origin}:{line}: error parsing bind statement: {error}")]
    Bind {
        origin: String,
        line: usize,
        error: BindError,
    },
    #[error("{origin}:{line}: error parsing option statement: {error}")]
    Setting {
        origin: String,
        line: usize,
        error: OptionError,
    },
    #[error("{origin}:{line}: could not determine statement type")]
    NotAStatement { origin: String, line: usize },
    #[error("{origin}:{line}: {} is already being included", .path.display())]
    IncludeCycle {
        origin: String,
        line: usize,
        path: PathBuf,
    },
}

impl ConfigError {
    /// Line the error points at, if it came from a statement
    #[must_use]
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::Io { .. } => None,
            Self::Bind { line, .. }
            | Self::Setting { line, .. }
            | Self::NotAStatement { line, .. }
            | Self::IncludeCycle { line, .. } => Some(*line),
        }
    }

    /// The inner bind error, if this is one
    #[must_use]
    pub fn bind_error(&self) -> Option<&BindError> {
        match self {
            Self::Bind { error, .. } => Some(error),
            _ => None,
        }
    }
}

impl From<ConfigError> for FimError {
    fn from(err: ConfigError) -> Self {
        let code = match &err {
            ConfigError::Io { .. } => errors::CONFIG_IO,
            ConfigError::IncludeCycle { .. } => errors::INCLUDE_CYCLE,
            _ => errors::CONFIG_PARSE,
        };
        FimError::new(ErrorType::Config, code, err.to_string())
    }
}
