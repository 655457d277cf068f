//! Document model
//! A line buffer with a cursor and file metadata

use crate::constants::ui;
use std::io;
use std::path::{Path, PathBuf};

/// Cursor position as (line, column), both counted in characters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    pub line: usize,
    pub col: usize,
}

/// The text being edited
#[derive(Debug, Clone)]
pub struct Document {
    /// Never empty; an empty document is one empty line
    lines: Vec<String>,
    cursor: Cursor,
    file_path: Option<PathBuf>,
    /// Incremented on every edit
    revision: u64,
    /// Revision of last save
    last_saved_revision: u64,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create a new empty document
    #[must_use]
    pub fn new() -> Self {
        Self {
            lines: vec![String::new()],
            cursor: Cursor::default(),
            file_path: None,
            revision: 0,
            last_saved_revision: 0,
        }
    }

    /// Create an unsaved document holding `text`
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        let mut doc = Self::new();
        doc.lines = split_lines(text);
        doc
    }

    /// Load a document from a file
    ///
    /// A path that does not exist yet gives an empty document bound to it.
    pub fn load(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let mut doc = match std::fs::read_to_string(path) {
            Ok(text) => Self::from_text(&text),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Self::new(),
            Err(e) => return Err(e),
        };
        doc.file_path = Some(path.to_path_buf());
        Ok(doc)
    }

    /// Save to `path`, or to the current path when `None`
    ///
    /// Saving to a new path rebinds the document to it. Returns bytes written.
    pub fn save(&mut self, path: Option<&Path>) -> io::Result<usize> {
        let target = match path {
            Some(path) => path.to_path_buf(),
            None => self
                .file_path
                .clone()
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "No file path"))?,
        };
        let text = self.text();
        write_atomic(&target, text.as_bytes())?;
        self.file_path = Some(target);
        self.last_saved_revision = self.revision;
        Ok(text.len())
    }

    /// Contents joined with newlines, with a trailing newline
    #[must_use]
    pub fn text(&self) -> String {
        let mut text = self.lines.join("\n");
        text.push('\n');
        text
    }

    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.revision != self.last_saved_revision
    }

    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    pub fn set_path(&mut self, path: impl AsRef<Path>) {
        self.file_path = Some(path.as_ref().to_path_buf());
    }

    /// File name for the UI, or "[No Name]"
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.file_path
            .as_ref()
            .and_then(|p| p.file_name())
            .and_then(|n| n.to_str())
            .unwrap_or(ui::NO_NAME)
    }

    fn current_line(&self) -> &str {
        &self.lines[self.cursor.line]
    }

    fn line_len(&self, line: usize) -> usize {
        self.lines[line].chars().count()
    }

    fn mark_dirty(&mut self) {
        self.revision += 1;
    }

    /// Byte offset of the cursor column in the current line
    fn cursor_byte(&self) -> usize {
        byte_offset(self.current_line(), self.cursor.col)
    }

    fn clamp_col(&mut self) {
        self.cursor.col = self.cursor.col.min(self.line_len(self.cursor.line));
    }

    // Movement

    pub fn move_left(&mut self) {
        self.cursor.col = self.cursor.col.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.cursor.col < self.line_len(self.cursor.line) {
            self.cursor.col += 1;
        }
    }

    pub fn move_up(&mut self) {
        if self.cursor.line > 0 {
            self.cursor.line -= 1;
            self.clamp_col();
        }
    }

    pub fn move_down(&mut self) {
        if self.cursor.line + 1 < self.lines.len() {
            self.cursor.line += 1;
            self.clamp_col();
        }
    }

    pub fn line_start(&mut self) {
        self.cursor.col = 0;
    }

    pub fn line_end(&mut self) {
        self.cursor.col = self.line_len(self.cursor.line);
    }

    pub fn file_start(&mut self) {
        self.cursor = Cursor::default();
    }

    pub fn file_end(&mut self) {
        self.cursor.line = self.lines.len() - 1;
        self.clamp_col();
    }

    // Editing

    /// Insert a character before the cursor and step past it
    pub fn insert_char(&mut self, c: char) {
        if c == '\n' {
            self.insert_newline();
            return;
        }
        let at = self.cursor_byte();
        self.lines[self.cursor.line].insert(at, c);
        self.cursor.col += 1;
        self.mark_dirty();
    }

    pub fn insert_str(&mut self, text: &str) {
        for c in text.chars() {
            self.insert_char(c);
        }
    }

    /// Split the line at the cursor
    pub fn insert_newline(&mut self) {
        let at = self.cursor_byte();
        let tail = self.lines[self.cursor.line].split_off(at);
        self.lines.insert(self.cursor.line + 1, tail);
        self.cursor.line += 1;
        self.cursor.col = 0;
        self.mark_dirty();
    }

    /// Delete the character under the cursor; at line end, join the next line
    pub fn delete_char(&mut self) {
        let line = self.cursor.line;
        if self.cursor.col < self.line_len(line) {
            let at = self.cursor_byte();
            self.lines[line].remove(at);
            self.mark_dirty();
        } else if line + 1 < self.lines.len() {
            let next = self.lines.remove(line + 1);
            self.lines[line].push_str(&next);
            self.mark_dirty();
        }
    }

    /// Delete the character before the cursor; at line start, join with the previous line
    pub fn backspace(&mut self) {
        if self.cursor.col > 0 {
            self.cursor.col -= 1;
            self.delete_char();
        } else if self.cursor.line > 0 {
            let line = self.lines.remove(self.cursor.line);
            self.cursor.line -= 1;
            self.cursor.col = self.line_len(self.cursor.line);
            self.lines[self.cursor.line].push_str(&line);
            self.mark_dirty();
        }
    }

    /// Remove the cursor line
    pub fn delete_line(&mut self) {
        if self.lines.len() == 1 {
            self.lines[0].clear();
        } else {
            self.lines.remove(self.cursor.line);
            self.cursor.line = self.cursor.line.min(self.lines.len() - 1);
        }
        self.clamp_col();
        self.mark_dirty();
    }

    /// Overwrite the character under the cursor; returns false at line end
    pub fn replace_char(&mut self, c: char) -> bool {
        if self.cursor.col >= self.line_len(self.cursor.line) {
            return false;
        }
        let at = self.cursor_byte();
        let line = &mut self.lines[self.cursor.line];
        let len = line[at..].chars().next().map_or(0, char::len_utf8);
        line.replace_range(at..at + len, c.encode_utf8(&mut [0; 4]));
        self.mark_dirty();
        true
    }

    /// Open an empty line below the cursor and move onto it
    pub fn open_line_below(&mut self) {
        self.lines.insert(self.cursor.line + 1, String::new());
        self.cursor = Cursor {
            line: self.cursor.line + 1,
            col: 0,
        };
        self.mark_dirty();
    }

    /// Open an empty line above the cursor and move onto it
    pub fn open_line_above(&mut self) {
        self.lines.insert(self.cursor.line, String::new());
        self.cursor.col = 0;
        self.mark_dirty();
    }
}

fn split_lines(text: &str) -> Vec<String> {
    let text = text.strip_suffix('\n').unwrap_or(text);
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
        .collect()
}

fn byte_offset(line: &str, col: usize) -> usize {
    line.char_indices().nth(col).map_or(line.len(), |(i, _)| i)
}

/// Write through a temporary file and rename over the target
fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    use std::io::Write;

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let temp_path = parent.join(format!(
        ".{}.tmp",
        path.file_name().and_then(|n| n.to_str()).unwrap_or("file")
    ));
    let written = std::fs::File::create(&temp_path).and_then(|mut file| {
        file.write_all(bytes)?;
        file.sync_all()
    });
    let result = written.and_then(|()| std::fs::rename(&temp_path, path));
    if result.is_err() {
        let _ = std::fs::remove_file(&temp_path);
    }
    result
}
