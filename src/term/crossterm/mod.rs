//! Crossterm-based terminal backend
//! Cross-platform terminal operations using crossterm

use crossterm::{
    cursor,
    event::{self, Event, KeyCode as TermKeyCode, KeyEvent as TermKeyEvent, KeyModifiers},
    execute,
    terminal::{self, ClearType},
};
use std::io::{stdout, Write};

use crate::key::{KeyCode, KeyEvent, Modifiers, MAX_FUNCTION_KEY};
use crate::term::{Size, TerminalBackend};

/// Crossterm-based terminal backend implementation
pub struct CrosstermBackend {
    raw_mode_enabled: bool,
    alternate_screen_enabled: bool,
}

impl CrosstermBackend {
    pub fn new() -> Result<Self, String> {
        Ok(CrosstermBackend {
            raw_mode_enabled: false,
            alternate_screen_enabled: false,
        })
    }
}

impl TerminalBackend for CrosstermBackend {
    fn init(&mut self) -> Result<(), String> {
        // Alternate screen keeps the user's scrollback intact
        execute!(stdout(), terminal::EnterAlternateScreen)
            .map_err(|e| format!("Failed to enter alternate screen: {e}"))?;
        self.alternate_screen_enabled = true;

        terminal::enable_raw_mode().map_err(|e| format!("Failed to enable raw mode: {e}"))?;
        self.raw_mode_enabled = true;

        // Hide cursor during rendering
        execute!(stdout(), cursor::Hide).map_err(|e| format!("Failed to hide cursor: {e}"))?;

        Ok(())
    }

    fn deinit(&mut self) {
        let _ = execute!(stdout(), cursor::Show);

        if self.raw_mode_enabled {
            let _ = terminal::disable_raw_mode();
            self.raw_mode_enabled = false;
        }

        if self.alternate_screen_enabled {
            let _ = execute!(stdout(), terminal::LeaveAlternateScreen);
            self.alternate_screen_enabled = false;
        }
    }

    fn read_key(&mut self) -> Result<KeyEvent, String> {
        loop {
            if let Event::Key(key_event) =
                event::read().map_err(|e| format!("Failed to read event: {e}"))?
            {
                // Ignore key releases and repeats
                if key_event.kind != event::KeyEventKind::Press {
                    continue;
                }
                if let Some(key) = translate_key_event(key_event) {
                    return Ok(key);
                }
                tracing::trace!(event = ?key_event, "dropped untranslatable key");
            }
        }
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), String> {
        let mut out = stdout();
        out.write_all(bytes)
            .map_err(|e| format!("Write failed: {e}"))?;
        out.flush().map_err(|e| format!("Flush failed: {e}"))?;
        Ok(())
    }

    fn get_size(&self) -> Result<Size, String> {
        let (cols, rows) =
            terminal::size().map_err(|e| format!("Failed to get terminal size: {e}"))?;
        Ok(Size { rows, cols })
    }

    fn clear_screen(&mut self) -> Result<(), String> {
        execute!(stdout(), terminal::Clear(ClearType::All), cursor::MoveTo(0, 0))
            .map_err(|e| format!("Failed to clear screen: {e}"))?;
        Ok(())
    }

    fn move_cursor(&mut self, row: u16, col: u16) -> Result<(), String> {
        execute!(stdout(), cursor::MoveTo(col, row))
            .map_err(|e| format!("Failed to move cursor: {e}"))?;
        Ok(())
    }

    fn hide_cursor(&mut self) -> Result<(), String> {
        execute!(stdout(), cursor::Hide).map_err(|e| format!("Failed to hide cursor: {e}"))?;
        Ok(())
    }

    fn show_cursor(&mut self) -> Result<(), String> {
        execute!(stdout(), cursor::Show).map_err(|e| format!("Failed to show cursor: {e}"))?;
        Ok(())
    }

    fn clear_to_end_of_line(&mut self) -> Result<(), String> {
        execute!(stdout(), terminal::Clear(ClearType::UntilNewLine))
            .map_err(|e| format!("Failed to clear to end of line: {e}"))?;
        Ok(())
    }
}

/// Translate a crossterm key event into a canonical [`KeyEvent`]
///
/// Returns `None` for keys fim has no notation for (media keys, bare
/// modifiers, function keys past F24, control characters).
pub(crate) fn translate_key_event(key_event: TermKeyEvent) -> Option<KeyEvent> {
    let mut modifiers = Modifiers::empty();
    if key_event.modifiers.contains(KeyModifiers::SHIFT) {
        modifiers |= Modifiers::SHIFT;
    }
    if key_event.modifiers.contains(KeyModifiers::CONTROL) {
        modifiers |= Modifiers::CONTROL;
    }
    if key_event.modifiers.contains(KeyModifiers::ALT) {
        modifiers |= Modifiers::ALT;
    }

    let code = match key_event.code {
        // Some terminals send Enter as a character
        TermKeyCode::Char('\r' | '\n') => KeyCode::Enter,
        TermKeyCode::Char('\t') => KeyCode::Tab,
        TermKeyCode::Char(c) if c.is_control() => return None,
        TermKeyCode::Char(c) => {
            // The character already carries the shift state
            if c.is_uppercase() || !c.is_ascii_alphabetic() {
                modifiers.remove(Modifiers::SHIFT);
            }
            KeyCode::Char(c)
        }
        TermKeyCode::F(n) if (1..=MAX_FUNCTION_KEY).contains(&n) => KeyCode::F(n),
        TermKeyCode::F(_) => return None,
        TermKeyCode::Backspace => KeyCode::Backspace,
        TermKeyCode::Enter => KeyCode::Enter,
        TermKeyCode::Tab => KeyCode::Tab,
        TermKeyCode::BackTab => {
            modifiers |= Modifiers::SHIFT;
            KeyCode::Tab
        }
        TermKeyCode::Delete => KeyCode::Delete,
        TermKeyCode::Insert => KeyCode::Insert,
        TermKeyCode::Esc => KeyCode::Esc,
        TermKeyCode::Left => KeyCode::Left,
        TermKeyCode::Right => KeyCode::Right,
        TermKeyCode::Up => KeyCode::Up,
        TermKeyCode::Down => KeyCode::Down,
        TermKeyCode::Home => KeyCode::Home,
        TermKeyCode::End => KeyCode::End,
        TermKeyCode::PageUp => KeyCode::PageUp,
        TermKeyCode::PageDown => KeyCode::PageDown,
        _ => return None,
    };
    Some(KeyEvent::new(code, modifiers))
}
