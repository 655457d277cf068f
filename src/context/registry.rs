//! Named context constructors
//!
//! Bindings refer to their targets by name. The registry turns a name plus
//! the binding's argument text into a [`Factory`].

use super::action::{self, Action, ActionFn, Exec};
use super::{CommandMode, Context, ContextMessage, Factory, InsertMode, NormalMode, ReplaceChar};
use crate::constants::modes;
use crate::error::Result;
use crate::state::EditorState;
use indexmap::IndexMap;
use std::fmt;
use std::rc::Rc;

/// Builds a context from the argument text of a binding
pub type Constructor = Rc<dyn Fn(&str) -> Box<dyn Context>>;

#[derive(Clone)]
pub struct ContextRegistry {
    constructors: IndexMap<String, Constructor>,
}

impl Default for ContextRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl ContextRegistry {
    /// A registry that knows no names
    #[must_use]
    pub fn empty() -> Self {
        Self {
            constructors: IndexMap::new(),
        }
    }

    /// The built-in modes and actions
    #[must_use]
    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();
        registry.register_context(modes::NORMAL, |_| Box::new(NormalMode::new()));
        registry.register_context(modes::INSERT, |_| Box::new(InsertMode::new()));
        registry.register_context(modes::COMMAND, |args| {
            Box::new(CommandMode::with_prefill(args))
        });
        registry.register_context(modes::REPLACE, |_| Box::new(ReplaceChar::new()));
        registry.register_context(modes::EXEC, |args| Box::new(Exec::new(args)));
        for (name, run) in action::BUILTIN_ACTIONS {
            registry.register_action(*name, *run);
        }
        registry
    }

    /// Register a context constructor, replacing any previous one of that name
    pub fn register_context(
        &mut self,
        name: impl Into<String>,
        constructor: impl Fn(&str) -> Box<dyn Context> + 'static,
    ) {
        self.constructors.insert(name.into(), Rc::new(constructor));
    }

    /// Register a function run by a one-shot [`Action`] context
    pub fn register_action(
        &mut self,
        name: impl Into<String>,
        run: impl Fn(&mut EditorState) -> Result<ContextMessage> + 'static,
    ) {
        let name = name.into();
        let run: ActionFn = Rc::new(run);
        let action_name = name.clone();
        self.register_context(name, move |_| {
            Box::new(Action::new(action_name.clone(), Rc::clone(&run)))
        });
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.constructors.contains_key(name)
    }

    /// A factory for `name` bound to `args`
    #[must_use]
    pub fn factory(&self, name: &str, args: &str) -> Option<Factory> {
        let constructor = self.constructors.get(name)?;
        Some(Factory::new(name, args, Rc::clone(constructor)))
    }

    /// Registered names, in registration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.constructors.keys().map(String::as_str)
    }
}

impl fmt::Debug for ContextRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
