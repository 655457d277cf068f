//! Replace the character under the cursor (`r` in vim)

use super::{Context, ContextMessage};
use crate::constants::modes;
use crate::error::Result;
use crate::key::KeyEvent;
use crate::state::EditorState;

/// Waits for one key. A character replaces the one under the cursor; any
/// other key cancels.
#[derive(Debug, Default)]
pub struct ReplaceChar;

impl ReplaceChar {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Context for ReplaceChar {
    fn name(&self) -> &str {
        modes::REPLACE
    }

    fn forward(&mut self, ed: &mut EditorState, key: KeyEvent) -> Result<Option<ContextMessage>> {
        if let Some(c) = key.text_char() {
            let c = ed.layout().from_canonical_char(c);
            if !ed.document.replace_char(c) {
                tracing::debug!(%key, "nothing under the cursor to replace");
            }
        }
        Ok(Some(ContextMessage::Unit))
    }
}
