//! Insert mode

use super::{Context, ContextMessage};
use crate::constants::{modes, ui};
use crate::error::Result;
use crate::key::{KeyCode, KeyEvent};
use crate::state::{EditorState, MessageLine};

/// Types text into the document until Esc
#[derive(Debug, Default)]
pub struct InsertMode;

impl InsertMode {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Context for InsertMode {
    fn name(&self) -> &str {
        modes::INSERT
    }

    fn setup(&mut self, ed: &mut EditorState) -> Result<Option<ContextMessage>> {
        ed.set_message(MessageLine::Mode(ui::INSERT_BANNER.to_string()));
        Ok(None)
    }

    fn forward(&mut self, ed: &mut EditorState, key: KeyEvent) -> Result<Option<ContextMessage>> {
        if key.modifiers().is_empty() {
            if key.code() == KeyCode::Esc {
                ed.clear_message();
                return Ok(Some(ContextMessage::Unit));
            }
            if edit(ed, key.code()) {
                return Ok(None);
            }
        }

        if ed.push_binding(modes::INSERT, key) {
            return Ok(None);
        }
        if let Some(c) = key.text_char() {
            let c = ed.layout().from_canonical_char(c);
            ed.document.insert_char(c);
        }
        Ok(None)
    }
}

/// Built-in editing keys; false if `code` is not one
fn edit(ed: &mut EditorState, code: KeyCode) -> bool {
    let doc = &mut ed.document;
    match code {
        KeyCode::Enter => doc.insert_newline(),
        KeyCode::Tab => doc.insert_str(&ed.config.options().tab_text()),
        KeyCode::Backspace => doc.backspace(),
        KeyCode::Delete => doc.delete_char(),
        KeyCode::Left => doc.move_left(),
        KeyCode::Right => doc.move_right(),
        KeyCode::Up => doc.move_up(),
        KeyCode::Down => doc.move_down(),
        KeyCode::Home => doc.line_start(),
        KeyCode::End => doc.line_end(),
        _ => return false,
    }
    true
}
