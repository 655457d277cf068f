//! Key-event term notation
//!
//! The textual form of a key press used by `bind` lines and `:bind`:
//!
//! - a single character stands for itself: `a`, `A`, `:`, `<`, `é`
//! - `<Name>` for named keys: `<Esc>`, `<CR>`, `<Space>`, `<F5>`, `<lt>`
//! - modifier prefixes inside brackets: `<C-s>`, `<A-Enter>`, `<C-S-A-Del>`, `<C-->`
//! - `<U+XXXX>` for characters that have no other spelling (whitespace, controls)

use super::{KeyCode, KeyEvent, Modifiers};
use std::fmt;
use std::str::FromStr;

/// Why a key-event term failed to parse
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum KeyTermError {
    /// The term does not follow the notation
    #[error("incorrect syntax in key event term")]
    Malformed,
    /// The closing `>` would have to sit inside a multi-byte character
    #[error("unexpected unicode character in key event term")]
    UnicodeBoundary,
}

const NAMED_KEYS: &[(&str, KeyCode)] = &[
    ("BS", KeyCode::Backspace),
    ("CR", KeyCode::Enter),
    ("Enter", KeyCode::Enter),
    ("Tab", KeyCode::Tab),
    ("Del", KeyCode::Delete),
    ("Ins", KeyCode::Insert),
    ("Esc", KeyCode::Esc),
    ("Left", KeyCode::Left),
    ("Right", KeyCode::Right),
    ("Up", KeyCode::Up),
    ("Down", KeyCode::Down),
    ("Home", KeyCode::Home),
    ("End", KeyCode::End),
    ("PageUp", KeyCode::PageUp),
    ("PageDown", KeyCode::PageDown),
    ("Space", KeyCode::Char(' ')),
    ("lt", KeyCode::Char('<')),
];

/// Highest function key the notation accepts
pub const MAX_FUNCTION_KEY: u8 = 24;

impl FromStr for KeyEvent {
    type Err = KeyTermError;

    fn from_str(term: &str) -> Result<Self, Self::Err> {
        let mut chars = term.chars();
        match (chars.next(), chars.next()) {
            (None, _) => Err(KeyTermError::Malformed),
            (Some(c), None) => {
                if is_spellable(c) {
                    Ok(KeyEvent::char(c))
                } else {
                    Err(KeyTermError::Malformed)
                }
            }
            (Some('<'), Some(_)) => parse_bracketed(term),
            _ => Err(KeyTermError::Malformed),
        }
    }
}

fn parse_bracketed(term: &str) -> Result<KeyEvent, KeyTermError> {
    let close = term.len() - 1;
    if !term.is_char_boundary(close) {
        return Err(KeyTermError::UnicodeBoundary);
    }
    if &term[close..] != ">" || close < 2 {
        return Err(KeyTermError::Malformed);
    }

    let mut inner = &term[1..close];
    let mut modifiers = Modifiers::empty();
    // A modifier prefix only counts when something follows its hyphen, so
    // `<C-->` is control + '-' and `<S>` is the letter S.
    while inner.len() > 2 {
        let flag = match inner.get(..2) {
            Some("C-" | "c-") => Modifiers::CONTROL,
            Some("A-" | "a-") => Modifiers::ALT,
            Some("S-" | "s-") => Modifiers::SHIFT,
            _ => break,
        };
        if modifiers.contains(flag) {
            return Err(KeyTermError::Malformed);
        }
        modifiers.insert(flag);
        inner = &inner[2..];
    }

    let code = key_code_from_name(inner).ok_or(KeyTermError::Malformed)?;
    Ok(KeyEvent::new(code, modifiers))
}

fn key_code_from_name(name: &str) -> Option<KeyCode> {
    let mut chars = name.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return is_spellable(c).then_some(KeyCode::Char(c));
    }
    if let Some((_, code)) = NAMED_KEYS.iter().find(|(n, _)| *n == name) {
        return Some(*code);
    }
    if let Some(hex) = name.strip_prefix("U+") {
        return u32::from_str_radix(hex, 16)
            .ok()
            .and_then(char::from_u32)
            .map(KeyCode::Char);
    }
    let n = name.strip_prefix('F')?.parse::<u8>().ok()?;
    (1..=MAX_FUNCTION_KEY).contains(&n).then_some(KeyCode::F(n))
}

/// Characters that can be written literally in a term
fn is_spellable(c: char) -> bool {
    !c.is_whitespace() && !c.is_control()
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let modifiers = self.modifiers();
        if let KeyCode::Char(c) = self.code() {
            if modifiers.is_empty() && is_spellable(c) {
                return write!(f, "{c}");
            }
        }

        write!(f, "<")?;
        if modifiers.contains(Modifiers::CONTROL) {
            write!(f, "C-")?;
        }
        if modifiers.contains(Modifiers::ALT) {
            write!(f, "A-")?;
        }
        if modifiers.contains(Modifiers::SHIFT) {
            write!(f, "S-")?;
        }
        match self.code() {
            KeyCode::Char(' ') => write!(f, "Space")?,
            KeyCode::Char('<') => write!(f, "lt")?,
            KeyCode::Char(c) if is_spellable(c) => write!(f, "{c}")?,
            KeyCode::Char(c) => write!(f, "U+{:04X}", c as u32)?,
            KeyCode::F(n) => write!(f, "F{n}")?,
            code => {
                let name = NAMED_KEYS
                    .iter()
                    .find(|(_, c)| *c == code)
                    .map_or("?", |(name, _)| *name);
                write!(f, "{name}")?;
            }
        }
        write!(f, ">")
    }
}
