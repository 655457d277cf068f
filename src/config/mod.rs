//! Key binding configuration
//!
//! A [`Config`] maps `(context name, key event)` to the [`Factory`] of the
//! context to push, plus the editor [`Options`]. It is built once from text
//! (see [`parser`] for the format) and only queried afterwards.
//!
//! ## config/ Invariants
//!
//! - A failed load never yields a partial configuration.
//! - A later binding for the same context and key replaces the earlier one.
//! - Every stored factory names a registered context or action.
//! - A file is never parsed while it is already on the include chain.

pub mod error;
pub mod options;
pub mod parser;

pub use self::error::{BindError, ConfigError};
pub use self::options::{OptionError, Options};
pub use self::parser::{parse_bind, Binding};

use self::parser::Parser;
use crate::context::{ContextRegistry, Factory};
use crate::key::KeyEvent;
use indexmap::IndexMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Bindings shipped with the editor
pub const DEFAULT_CONFIG: &str = include_str!("default.fimrc");

/// Origin reported for errors in in-memory text
const STRING_ORIGIN: &str = "<string>";

#[derive(Debug, Clone, Default)]
pub struct Config {
    bindings: IndexMap<String, IndexMap<KeyEvent, Factory>>,
    options: Options,
}

impl Config {
    /// A configuration with no bindings and default options
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// The default bindings, resolved against the built-in registry
    pub fn builtin() -> Result<Self, ConfigError> {
        Self::builtin_with(&ContextRegistry::default())
    }

    /// The default bindings, resolved against `registry`
    pub fn builtin_with(registry: &ContextRegistry) -> Result<Self, ConfigError> {
        let mut config = Self::empty();
        Parser::new(registry).parse_text(&mut config, DEFAULT_CONFIG, "<builtin>", &cwd())?;
        Ok(config)
    }

    /// Parse config text; includes resolve against the working directory
    pub fn parse_with(text: &str, registry: &ContextRegistry) -> Result<Self, ConfigError> {
        let mut config = Self::empty();
        Parser::new(registry).parse_text(&mut config, text, STRING_ORIGIN, &cwd())?;
        Ok(config)
    }

    /// Load a config file using the built-in registry
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::load(path, &ContextRegistry::default())
    }

    /// Load a config file, resolving targets against `registry`
    pub fn load(path: impl AsRef<Path>, registry: &ContextRegistry) -> Result<Self, ConfigError> {
        let mut config = Self::empty();
        config.extend_from_file(path, registry)?;
        Ok(config)
    }

    /// Layer a config file over this one
    ///
    /// On error `self` is left untouched.
    pub fn extend_from_file(
        &mut self,
        path: impl AsRef<Path>,
        registry: &ContextRegistry,
    ) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let mut layered = self.clone();
        Parser::new(registry).parse_file(&mut layered, path)?;
        tracing::info!(
            path = %path.display(),
            bindings = layered.len(),
            "loaded config"
        );
        *self = layered;
        Ok(())
    }

    /// The factory bound to `key` in `context`, if any
    #[must_use]
    pub fn query(&self, context: &str, key: KeyEvent) -> Option<&Factory> {
        self.bindings.get(context)?.get(&key)
    }

    /// Add or replace a binding
    pub fn bind(&mut self, context: impl Into<String>, key: KeyEvent, factory: Factory) {
        let context = context.into();
        tracing::trace!(%context, %key, target = factory.name(), "bind");
        self.bindings.entry(context).or_default().insert(key, factory);
    }

    /// Bindings of one context, in definition order
    pub fn bindings(&self, context: &str) -> impl Iterator<Item = (&KeyEvent, &Factory)> {
        self.bindings.get(context).into_iter().flatten()
    }

    /// Total number of bindings
    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.values().map(IndexMap::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut Options {
        &mut self.options
    }
}

impl FromStr for Config {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_with(s, &ContextRegistry::default())
    }
}

fn cwd() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
