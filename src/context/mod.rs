//! Editor contexts
//!
//! A context is one mode of interaction (normal mode, the command line, a
//! one-shot action). Contexts live on a [`ContextStack`]; key events go to the
//! top one. A context finishes by returning a [`ContextMessage`] from any hook:
//! it is popped and the message is handed to the context beneath it.
//!
//! ## context/ Invariants
//!
//! - The stack is never empty and its bottom context is never popped.
//! - Only the top context receives key events.
//! - Every return delivers exactly one message to the context beneath.
//! - A failed dispatch leaves the stack as deep as before, holding the same contexts.

pub mod action;
pub mod command;
pub mod insert;
pub mod normal;
pub mod registry;
pub mod replace;
pub mod stack;

pub use self::action::{Action, ActionFn, Exec};
pub use self::command::CommandMode;
pub use self::insert::InsertMode;
pub use self::normal::NormalMode;
pub use self::registry::{Constructor, ContextRegistry};
pub use self::replace::ReplaceChar;
pub use self::stack::{ContextStack, DispatchReport};

use crate::error::Result;
use crate::key::KeyEvent;
use crate::state::EditorState;
use std::fmt;

/// Value a finished context hands to the context beneath it
#[derive(Debug, Clone, PartialEq)]
pub enum ContextMessage {
    Unit,
    Bool(bool),
    Int(i32),
    Float(f32),
    Str(String),
    BitSet(u32),
}

/// Common interface for all contexts
pub trait Context {
    /// Name used to look up bindings for this context
    fn name(&self) -> &str;

    /// Called once, right after the context is pushed
    fn setup(&mut self, _ed: &mut EditorState) -> Result<Option<ContextMessage>> {
        Ok(None)
    }

    /// Handle a key event while on top of the stack
    fn forward(&mut self, ed: &mut EditorState, key: KeyEvent) -> Result<Option<ContextMessage>>;

    /// Handle the message of a context that finished above this one
    fn receive(
        &mut self,
        _ed: &mut EditorState,
        _msg: ContextMessage,
    ) -> Result<Option<ContextMessage>> {
        Ok(None)
    }
}

/// A bound context constructor
///
/// Holds the target name and the argument text of a binding. Every call to
/// [`Factory::create`] builds a fresh context.
#[derive(Clone)]
pub struct Factory {
    name: String,
    args: String,
    constructor: Constructor,
}

impl Factory {
    pub fn new(name: impl Into<String>, args: impl Into<String>, constructor: Constructor) -> Self {
        Self {
            name: name.into(),
            args: args.into(),
            constructor,
        }
    }

    /// Name of the bound target
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Argument text given after the target in the binding
    #[must_use]
    pub fn args(&self) -> &str {
        &self.args
    }

    #[must_use]
    pub fn create(&self) -> Box<dyn Context> {
        (self.constructor)(&self.args)
    }
}

impl fmt::Debug for Factory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Factory")
            .field("name", &self.name)
            .field("args", &self.args)
            .finish_non_exhaustive()
    }
}
