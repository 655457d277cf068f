//! Rendering
//! Draws the document, status bar and message line to the terminal
//!
//! ## render/ Invariants
//!
//! - Rendering reads editor state only; it never mutates it.
//! - Rendering performs no input handling.
//! - The terminal cursor ends on the prompt cursor when a prompt is shown,
//!   otherwise on the document cursor.
//! - A full redraw is always safe.

use crate::constants::ui;
use crate::document::Document;
use crate::state::{EditorState, MessageLine};
use crate::term::TerminalBackend;
use unicode_width::UnicodeWidthChar;

/// Scroll position kept between frames
#[derive(Debug, Default)]
pub struct Renderer {
    top_line: usize,
}

impl Renderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn top_line(&self) -> usize {
        self.top_line
    }

    /// Scroll so that `line` is one of `rows` visible lines
    fn scroll_to(&mut self, line: usize, rows: usize) {
        if line < self.top_line {
            self.top_line = line;
        } else if rows > 0 && line >= self.top_line + rows {
            self.top_line = line + 1 - rows;
        }
    }

    /// Draw a full frame
    ///
    /// `mode` is the name of the top context, shown in the status bar.
    pub fn render<T: TerminalBackend>(
        &mut self,
        term: &mut T,
        ed: &EditorState,
        mode: &str,
    ) -> Result<(), String> {
        let size = term.get_size()?;
        let rows = usize::from(size.rows);
        let cols = usize::from(size.cols);
        // Document rows, then the status bar, then the message line
        let text_rows = rows.saturating_sub(2);
        let doc = &ed.document;
        let tab_width = ed.config.options().tabstop;
        self.scroll_to(doc.cursor().line, text_rows);

        term.hide_cursor()?;
        for row in 0..text_rows {
            let line = match doc.lines().get(self.top_line + row) {
                Some(line) => expand_line(line, tab_width, cols),
                None => ui::EMPTY_LINE_MARKER.to_string(),
            };
            draw_row(term, row, &line)?;
        }
        if rows >= 2 {
            let status = status_line(doc, mode, cols);
            draw_row(term, text_rows, &status)?;
        }

        let (message, prompt_cursor) = message_line(ed.message());
        let message_row = rows.saturating_sub(1);
        draw_row(term, message_row, &truncate(&message, cols))?;

        let (row, col) = match prompt_cursor {
            Some(col) => (message_row, col),
            None => {
                let cursor = doc.cursor();
                let line = doc.lines().get(cursor.line).map_or("", String::as_str);
                (
                    cursor.line - self.top_line,
                    display_column(line, cursor.col, tab_width),
                )
            }
        };
        let col = col.min(cols.saturating_sub(1));
        term.move_cursor(to_u16(row), to_u16(col))?;
        term.show_cursor()?;
        Ok(())
    }
}

fn draw_row<T: TerminalBackend>(term: &mut T, row: usize, text: &str) -> Result<(), String> {
    term.move_cursor(to_u16(row), 0)?;
    term.write(text.as_bytes())?;
    term.clear_to_end_of_line()
}

fn to_u16(n: usize) -> u16 {
    u16::try_from(n).unwrap_or(u16::MAX)
}

/// Mode, file name, dirty flag and cursor position
fn status_line(doc: &Document, mode: &str, cols: usize) -> String {
    let cursor = doc.cursor();
    let left = format!(
        " {} | {}{}",
        mode.to_uppercase(),
        doc.display_name(),
        if doc.is_dirty() { " [+]" } else { "" }
    );
    let right = format!("{}:{} ", cursor.line + 1, cursor.col + 1);
    let used = text_width(&left) + text_width(&right);
    let line = if used < cols {
        format!("{left}{}{right}", " ".repeat(cols - used))
    } else {
        left
    };
    truncate(&line, cols)
}

/// Message line text, plus the display column of the prompt cursor if any
fn message_line(message: &MessageLine) -> (String, Option<usize>) {
    match message {
        MessageLine::Clear => (String::new(), None),
        MessageLine::Mode(text) => (text.clone(), None),
        MessageLine::Prompt {
            prefix,
            text,
            cursor,
        } => {
            let before: String = text.chars().take(*cursor).collect();
            let col = char_width(*prefix) + text_width(&before);
            (format!("{prefix}{text}"), Some(col))
        }
        MessageLine::Message { text, .. } => (text.clone(), None),
    }
}

fn char_width(c: char) -> usize {
    UnicodeWidthChar::width(c).unwrap_or(1)
}

fn text_width(text: &str) -> usize {
    text.chars().map(char_width).sum()
}

/// Cut `text` to at most `cols` display columns
fn truncate(text: &str, cols: usize) -> String {
    let mut width = 0;
    text.chars()
        .take_while(|&c| {
            width += char_width(c);
            width <= cols
        })
        .collect()
}

/// A document line as displayed: tabs expanded, cut to `cols`
fn expand_line(line: &str, tab_width: usize, cols: usize) -> String {
    let mut out = String::new();
    let mut width = 0;
    for c in line.chars() {
        if c == '\t' {
            let n = tab_width - width % tab_width;
            if width + n > cols {
                break;
            }
            out.extend(std::iter::repeat(' ').take(n));
            width += n;
        } else {
            let w = char_width(c);
            if width + w > cols {
                break;
            }
            out.push(c);
            width += w;
        }
    }
    out
}

/// Display column of character column `col` in `line`
pub(crate) fn display_column(line: &str, col: usize, tab_width: usize) -> usize {
    line.chars().take(col).fold(0, |width, c| {
        if c == '\t' {
            width + tab_width - width % tab_width
        } else {
            width + char_width(c)
        }
    })
}
