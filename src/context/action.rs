//! One-shot contexts
//!
//! [`Action`] runs a function as soon as it is pushed and finishes with the
//! function's message. [`Exec`] finishes with a command line for the context
//! beneath to execute.

use super::{Context, ContextMessage, InsertMode};
use crate::constants::modes;
use crate::document::Document;
use crate::error::Result;
use crate::key::KeyEvent;
use crate::state::EditorState;
use std::rc::Rc;

/// Function run by an [`Action`]
pub type ActionFn = Rc<dyn Fn(&mut EditorState) -> Result<ContextMessage>>;

pub struct Action {
    name: String,
    run: ActionFn,
}

impl Action {
    pub fn new(name: impl Into<String>, run: ActionFn) -> Self {
        Self {
            name: name.into(),
            run,
        }
    }
}

impl Context for Action {
    fn name(&self) -> &str {
        &self.name
    }

    fn setup(&mut self, ed: &mut EditorState) -> Result<Option<ContextMessage>> {
        tracing::debug!(action = %self.name, "run action");
        (self.run)(ed).map(Some)
    }

    fn forward(&mut self, _ed: &mut EditorState, _key: KeyEvent) -> Result<Option<ContextMessage>> {
        Ok(Some(ContextMessage::Unit))
    }
}

/// Hands a configured command line to the context beneath
pub struct Exec {
    command: String,
}

impl Exec {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

impl Context for Exec {
    fn name(&self) -> &str {
        modes::EXEC
    }

    fn setup(&mut self, _ed: &mut EditorState) -> Result<Option<ContextMessage>> {
        Ok(Some(ContextMessage::Str(std::mem::take(&mut self.command))))
    }

    fn forward(&mut self, _ed: &mut EditorState, _key: KeyEvent) -> Result<Option<ContextMessage>> {
        Ok(Some(ContextMessage::Unit))
    }
}

type BuiltinAction = fn(&mut EditorState) -> Result<ContextMessage>;

/// Actions every registry starts with
pub(crate) const BUILTIN_ACTIONS: &[(&str, BuiltinAction)] = &[
    ("quit", |ed| command(ed, "quit")),
    ("force_quit", |ed| command(ed, "quit!")),
    ("write", |ed| command(ed, "write")),
    ("write_quit", |ed| command(ed, "wq")),
    ("move_left", |ed| edit(ed, |doc| doc.move_left())),
    ("move_right", |ed| edit(ed, |doc| doc.move_right())),
    ("move_up", |ed| edit(ed, |doc| doc.move_up())),
    ("move_down", |ed| edit(ed, |doc| doc.move_down())),
    ("line_start", |ed| edit(ed, |doc| doc.line_start())),
    ("line_end", |ed| edit(ed, |doc| doc.line_end())),
    ("file_start", |ed| edit(ed, |doc| doc.file_start())),
    ("file_end", |ed| edit(ed, |doc| doc.file_end())),
    ("delete_char", |ed| edit(ed, |doc| doc.delete_char())),
    ("backspace", |ed| edit(ed, |doc| doc.backspace())),
    ("delete_line", |ed| edit(ed, |doc| doc.delete_line())),
    ("append", |ed| insert_after(ed, |doc| doc.move_right())),
    ("append_end", |ed| insert_after(ed, |doc| doc.line_end())),
    ("insert_start", |ed| insert_after(ed, |doc| doc.line_start())),
    ("open_below", |ed| insert_after(ed, |doc| doc.open_line_below())),
    ("open_above", |ed| insert_after(ed, |doc| doc.open_line_above())),
    ("clear_message", |ed| {
        ed.clear_message();
        Ok(ContextMessage::Unit)
    }),
];

fn command(ed: &mut EditorState, line: &str) -> Result<ContextMessage> {
    ed.execute_command(line)?;
    Ok(ContextMessage::Unit)
}

fn edit(ed: &mut EditorState, f: impl FnOnce(&mut Document)) -> Result<ContextMessage> {
    f(&mut ed.document);
    Ok(ContextMessage::Unit)
}

/// Run a document edit, then enter insert mode
fn insert_after(
    ed: &mut EditorState,
    f: impl FnOnce(&mut Document),
) -> Result<ContextMessage> {
    f(&mut ed.document);
    ed.push_context(Box::new(InsertMode::new()));
    Ok(ContextMessage::Unit)
}
