//! Normal mode, the root of the context stack

use super::{Context, ContextMessage};
use crate::constants::modes;
use crate::error::Result;
use crate::key::{KeyCode, KeyEvent};
use crate::state::EditorState;

/// Dispatches keys through the `normal` bindings and runs the command lines
/// finished contexts hand back
#[derive(Debug, Default)]
pub struct NormalMode;

impl NormalMode {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Context for NormalMode {
    fn name(&self) -> &str {
        modes::NORMAL
    }

    fn forward(&mut self, ed: &mut EditorState, key: KeyEvent) -> Result<Option<ContextMessage>> {
        if key == KeyEvent::plain(KeyCode::Esc) {
            ed.clear_message();
        } else if !ed.push_binding(modes::NORMAL, key) {
            tracing::debug!(%key, "unbound key in normal mode");
        }
        Ok(None)
    }

    fn receive(&mut self, ed: &mut EditorState, msg: ContextMessage) -> Result<Option<ContextMessage>> {
        if let ContextMessage::Str(line) = msg {
            // A bad command line is the user's mistake, not a failed dispatch
            if let Err(err) = ed.execute_command(&line) {
                ed.report(&err);
            }
        }
        Ok(None)
    }
}
