//! Key representation for editor input
//!
//! A [`KeyEvent`] is the canonical identity of one key press: a [`KeyCode`]
//! plus [`Modifiers`]. Events are normalised on construction so that equal
//! key presses always compare and hash equal, which the binding table relies on.
//!
//! ## key/ Invariants
//!
//! - A `Char` event never carries `SHIFT`; the shift state lives in the character.
//! - A `Char` event carrying `CONTROL` never holds a shifted character, so
//!   `<C-S-a>`, `<C-A>` and `<C-a>` are one key, as are `<C-:>` and `<C-;>`.
//! - Every `KeyEvent` formats to a key-event term that parses back to itself.

pub mod notation;

pub use self::notation::{KeyTermError, MAX_FUNCTION_KEY};

use crate::layout::{deshift, shift};
use bitflags::bitflags;

bitflags! {
    /// Modifier keys held during a key press
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        const SHIFT   = 0b001;
        const CONTROL = 0b010;
        const ALT     = 0b100;
    }
}

/// Identity of the pressed key, independent of modifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// Printable character
    Char(char),
    /// Function key (F1..F24)
    F(u8),
    /// Editing keys
    Backspace,
    Enter,
    Tab,
    Delete,
    Insert,
    Esc,
    /// Arrow keys
    Left,
    Right,
    Up,
    Down,
    /// Navigation keys
    Home,
    End,
    PageUp,
    PageDown,
}

/// A canonical key press
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    code: KeyCode,
    modifiers: Modifiers,
}

impl KeyEvent {
    /// Create a normalised key event
    #[must_use]
    pub fn new(code: KeyCode, modifiers: Modifiers) -> Self {
        match code {
            KeyCode::Char(mut c) => {
                let mut modifiers = modifiers;
                if modifiers.contains(Modifiers::SHIFT) {
                    c = shift(c);
                    modifiers.remove(Modifiers::SHIFT);
                }
                // Terminals cannot tell ctrl+shift+key from ctrl+key
                if modifiers.contains(Modifiers::CONTROL) {
                    c = deshift(c);
                }
                Self {
                    code: KeyCode::Char(c),
                    modifiers,
                }
            }
            code => Self { code, modifiers },
        }
    }

    /// Unmodified key press
    #[must_use]
    pub fn plain(code: KeyCode) -> Self {
        Self::new(code, Modifiers::empty())
    }

    /// Unmodified character key press
    #[must_use]
    pub fn char(c: char) -> Self {
        Self::plain(KeyCode::Char(c))
    }

    /// Control + character
    #[must_use]
    pub fn ctrl(c: char) -> Self {
        Self::new(KeyCode::Char(c), Modifiers::CONTROL)
    }

    #[must_use]
    pub fn code(&self) -> KeyCode {
        self.code
    }

    #[must_use]
    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    /// The character of an unmodified (or shift-only) character key
    ///
    /// Returns `None` for named keys and for chords with control or alt,
    /// which are never text input.
    #[must_use]
    pub fn text_char(&self) -> Option<char> {
        match self.code {
            KeyCode::Char(c) if self.modifiers.is_empty() => Some(c),
            _ => None,
        }
    }

    /// Same modifiers, different code (normalisation re-applied)
    #[must_use]
    pub fn with_code(&self, code: KeyCode) -> Self {
        Self::new(code, self.modifiers)
    }
}
