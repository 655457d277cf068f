//! The `:` command line
//!
//! Edits a single line of text. Enter finishes with `Str(line)`, Esc (or
//! backspace on an empty line) finishes with `Unit`.

use super::{Context, ContextMessage};
use crate::constants::{modes, ui};
use crate::error::Result;
use crate::key::{KeyCode, KeyEvent};
use crate::state::{EditorState, MessageLine};

#[derive(Debug, Default)]
pub struct CommandMode {
    /// Line being edited
    text: String,
    /// Cursor position, in characters
    cursor: usize,
}

impl CommandMode {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with `text` already typed
    #[must_use]
    pub fn with_prefill(text: &str) -> Self {
        Self {
            text: text.to_string(),
            cursor: text.chars().count(),
        }
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    fn len(&self) -> usize {
        self.text.chars().count()
    }

    fn byte_at(&self, col: usize) -> usize {
        self.text
            .char_indices()
            .nth(col)
            .map_or(self.text.len(), |(i, _)| i)
    }

    fn replace_text(&mut self, text: &str) {
        self.text = text.to_string();
        self.cursor = self.len();
    }

    fn show(&self, ed: &mut EditorState) {
        ed.set_message(MessageLine::Prompt {
            prefix: ui::COMMAND_PROMPT,
            text: self.text.clone(),
            cursor: self.cursor,
        });
    }

    /// Built-in line editing; `None` if the key is not one
    fn edit(&mut self, ed: &mut EditorState, key: KeyEvent) -> Option<Option<ContextMessage>> {
        match key.code() {
            KeyCode::Esc => return Some(Some(ContextMessage::Unit)),
            KeyCode::Enter => {
                let line = std::mem::take(&mut self.text);
                ed.history.add(line.clone());
                return Some(Some(ContextMessage::Str(line)));
            }
            KeyCode::Backspace if self.text.is_empty() => {
                return Some(Some(ContextMessage::Unit));
            }
            KeyCode::Backspace => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    let at = self.byte_at(self.cursor);
                    self.text.remove(at);
                }
                ed.history.reset_navigation();
            }
            KeyCode::Delete => {
                if self.cursor < self.len() {
                    let at = self.byte_at(self.cursor);
                    self.text.remove(at);
                }
                ed.history.reset_navigation();
            }
            KeyCode::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyCode::Right => self.cursor = (self.cursor + 1).min(self.len()),
            KeyCode::Home => self.cursor = 0,
            KeyCode::End => self.cursor = self.len(),
            KeyCode::Up => {
                ed.history.start_navigation(&self.text);
                if let Some(entry) = ed.history.prev_match().map(str::to_string) {
                    self.replace_text(&entry);
                }
            }
            KeyCode::Down => {
                if let Some(entry) = ed.history.next_match().map(str::to_string) {
                    self.replace_text(&entry);
                }
            }
            KeyCode::Char(c) => {
                let c = ed.layout().from_canonical_char(c);
                let at = self.byte_at(self.cursor);
                self.text.insert(at, c);
                self.cursor += 1;
                ed.history.reset_navigation();
            }
            _ => return None,
        }
        Some(None)
    }
}

impl Context for CommandMode {
    fn name(&self) -> &str {
        modes::COMMAND
    }

    fn setup(&mut self, ed: &mut EditorState) -> Result<Option<ContextMessage>> {
        ed.history.reset_navigation();
        self.show(ed);
        Ok(None)
    }

    fn forward(&mut self, ed: &mut EditorState, key: KeyEvent) -> Result<Option<ContextMessage>> {
        if key.modifiers().is_empty() {
            if let Some(done) = self.edit(ed, key) {
                if done.is_some() {
                    ed.clear_message();
                } else {
                    self.show(ed);
                }
                return Ok(done);
            }
        }
        if !ed.push_binding(modes::COMMAND, key) {
            tracing::debug!(%key, "unbound key on the command line");
        }
        Ok(None)
    }

    fn receive(&mut self, ed: &mut EditorState, _msg: ContextMessage) -> Result<Option<ContextMessage>> {
        // A bound context may have replaced the prompt
        self.show(ed);
        Ok(None)
    }
}
