//! Keyboard layout translation
//!
//! Everything past the terminal speaks the canonical layout: a key is named by
//! the character it would produce on a QWERTY keyboard at the same physical
//! position. A [`Layout`] converts between the user's physical layout and that
//! canonical form.
//!
//! Layout tables only hold the unshifted half of the keyboard. Shifted
//! characters are translated by stripping the shift with [`deshift`], looking
//! the base key up, and reapplying it with [`shift`].
//!
//! ## layout/ Invariants
//!
//! - Every layout is a bijection over printable ASCII.
//! - Translation preserves shift state: unshifted keys map to unshifted keys.
//! - `from_canonical(to_canonical(k)) == k` and `to_canonical(from_canonical(k)) == k`.
//! - Characters outside printable ASCII pass through unchanged.

pub mod custom;

pub use self::custom::CustomLayout;

use crate::constants::errors;
use crate::error::{ErrorType, FimError};
use crate::key::{KeyCode, KeyEvent};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Unshifted/shifted pairs of the non-letter keys on a US keyboard
const SHIFT_PAIRS: &[(char, char)] = &[
    ('`', '~'),
    ('1', '!'),
    ('2', '@'),
    ('3', '#'),
    ('4', '$'),
    ('5', '%'),
    ('6', '^'),
    ('7', '&'),
    ('8', '*'),
    ('9', '('),
    ('0', ')'),
    ('-', '_'),
    ('=', '+'),
    ('[', '{'),
    (']', '}'),
    ('\\', '|'),
    (';', ':'),
    ('\'', '"'),
    (',', '<'),
    ('.', '>'),
    ('/', '?'),
];

/// The character produced by pressing `c` together with shift
///
/// Characters that are already shifted, and anything that is not a key on
/// the canonical keyboard, are returned unchanged.
#[must_use]
pub fn shift(c: char) -> char {
    if c.is_ascii_lowercase() {
        return c.to_ascii_uppercase();
    }
    SHIFT_PAIRS
        .iter()
        .find(|(base, _)| *base == c)
        .map_or(c, |(_, shifted)| *shifted)
}

/// Inverse of [`shift`]
#[must_use]
pub fn deshift(c: char) -> char {
    if c.is_ascii_uppercase() {
        return c.to_ascii_lowercase();
    }
    SHIFT_PAIRS
        .iter()
        .find(|(_, shifted)| *shifted == c)
        .map_or(c, |(base, _)| *base)
}

/// Whether `c` needs shift to be typed on the canonical keyboard
#[must_use]
pub fn is_shifted(c: char) -> bool {
    deshift(c) != c
}

/// Printable ASCII, space through tilde
#[must_use]
pub fn is_printable_ascii(c: char) -> bool {
    matches!(c, ' '..='~')
}

/// Translation between a physical keyboard layout and the canonical layout
pub trait Layout {
    /// Display name of the layout
    fn name(&self) -> &str;

    /// Canonical character to the character this layout produces at the same position
    fn from_canonical_char(&self, c: char) -> char;

    /// Character produced by this layout to the canonical character at the same position
    fn to_canonical_char(&self, c: char) -> char;

    /// Translate a canonical key event into this layout. Only character keys change.
    fn from_canonical(&self, key: KeyEvent) -> KeyEvent {
        match key.code() {
            KeyCode::Char(c) => key.with_code(KeyCode::Char(self.from_canonical_char(c))),
            _ => key,
        }
    }

    /// Translate a key event typed on this layout into canonical form
    fn to_canonical(&self, key: KeyEvent) -> KeyEvent {
        match key.code() {
            KeyCode::Char(c) => key.with_code(KeyCode::Char(self.to_canonical_char(c))),
            _ => key,
        }
    }
}

/// Paired lookup tables over the ASCII range
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Table {
    from: [u8; 128],
    to: [u8; 128],
}

impl Table {
    pub(crate) fn identity() -> Self {
        let mut from = [0u8; 128];
        for (i, slot) in from.iter_mut().enumerate() {
            *slot = i as u8;
        }
        Self { from, to: from }
    }

    /// Build from two equally long rows of unshifted keys, canonical and physical
    fn from_rows(canonical: &str, physical: &str) -> Self {
        let mut table = Self::identity();
        for (c, p) in canonical.bytes().zip(physical.bytes()) {
            table.set(c, p);
        }
        table
    }

    pub(crate) fn set(&mut self, canonical: u8, physical: u8) {
        self.from[usize::from(canonical)] = physical;
        self.to[usize::from(physical)] = canonical;
    }

    fn from_canonical(&self, c: char) -> char {
        translate(c, &self.from)
    }

    fn to_canonical(&self, c: char) -> char {
        translate(c, &self.to)
    }
}

fn translate(c: char, map: &[u8; 128]) -> char {
    if !is_printable_ascii(c) {
        return c;
    }
    let lookup = |c: char| char::from(map[c as usize]);
    if is_shifted(c) {
        shift(lookup(deshift(c)))
    } else {
        lookup(c)
    }
}

/// The canonical layout
#[derive(Debug, Clone, Copy, Default)]
pub struct Qwerty;

impl Layout for Qwerty {
    fn name(&self) -> &str {
        "qwerty"
    }

    fn from_canonical_char(&self, c: char) -> char {
        c
    }

    fn to_canonical_char(&self, c: char) -> char {
        c
    }
}

const QWERTY_ROWS: &str = "qwertyuiop[]asdfghjkl;'zxcvbnm,./-=";
const DVORAK_ROWS: &str = "',.pyfgcrl/=aoeuidhtns-;qjkxbmwvz[]";

/// Standard (not programmer) Dvorak
#[derive(Debug, Clone)]
pub struct Dvorak {
    table: Table,
}

impl Dvorak {
    #[must_use]
    pub fn new() -> Self {
        Self {
            table: Table::from_rows(QWERTY_ROWS, DVORAK_ROWS),
        }
    }
}

impl Default for Dvorak {
    fn default() -> Self {
        Self::new()
    }
}

impl Layout for Dvorak {
    fn name(&self) -> &str {
        "dvorak"
    }

    fn from_canonical_char(&self, c: char) -> char {
        self.table.from_canonical(c)
    }

    fn to_canonical_char(&self, c: char) -> char {
        self.table.to_canonical(c)
    }
}

const QWERTY_LETTERS: &str = "qwertyuiopasdfghjkl;zxcvbnm";
const COLEMAK_LETTERS: &str = "qwfpgjluy;arstdhneiozxcvbkm";

/// Colemak, with caps lock left alone
#[derive(Debug, Clone)]
pub struct Colemak {
    table: Table,
}

impl Colemak {
    #[must_use]
    pub fn new() -> Self {
        Self {
            table: Table::from_rows(QWERTY_LETTERS, COLEMAK_LETTERS),
        }
    }
}

impl Default for Colemak {
    fn default() -> Self {
        Self::new()
    }
}

impl Layout for Colemak {
    fn name(&self) -> &str {
        "colemak"
    }

    fn from_canonical_char(&self, c: char) -> char {
        self.table.from_canonical(c)
    }

    fn to_canonical_char(&self, c: char) -> char {
        self.table.to_canonical(c)
    }
}

/// Value of the `layout` option
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LayoutType {
    #[default]
    Qwerty,
    Dvorak,
    Colemak,
    /// Path to a layout file
    Custom(PathBuf),
}

impl LayoutType {
    /// The same layout with a relative custom path joined onto `base_dir`
    #[must_use]
    pub fn resolved(&self, base_dir: &Path) -> Self {
        match self {
            Self::Custom(path) if path.is_relative() => Self::Custom(base_dir.join(path)),
            other => other.clone(),
        }
    }
}

impl FromStr for LayoutType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_ascii_lowercase().as_str() {
            "qwerty" => Self::Qwerty,
            "dvorak" => Self::Dvorak,
            "colemak" => Self::Colemak,
            _ => Self::Custom(PathBuf::from(s)),
        })
    }
}

impl fmt::Display for LayoutType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Qwerty => write!(f, "qwerty"),
            Self::Dvorak => write!(f, "dvorak"),
            Self::Colemak => write!(f, "colemak"),
            Self::Custom(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Errors raised while loading a layout file
#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    #[error("could not read layout file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("layout file must start with `layout <name>`")]
    NoLayoutName,
    #[error("line {line}: expected `<key> => <key>`")]
    MalformedPair { line: usize },
    #[error("line {line}: layout files may only contain ASCII")]
    NonAsciiCharacter { line: usize },
    #[error("line {line}: each side of a mapping must be a single printable character")]
    NonCharacterMapping { line: usize },
    #[error("line {line}: mappings must use unshifted keys")]
    ShiftedCharacter { line: usize },
    #[error("line {line}: `{key}` is mapped more than once")]
    DuplicateMapping { line: usize, key: char },
    #[error("`{key}` is produced by the layout but never mapped back")]
    MissingMapping { key: char },
}

impl From<LayoutError> for FimError {
    fn from(err: LayoutError) -> Self {
        FimError::new(ErrorType::Layout, errors::LAYOUT_LOAD, err.to_string())
    }
}

/// Build the layout named by a `layout` option value
///
/// Relative custom layout paths are resolved against `base_dir`.
pub fn load(layout: &LayoutType, base_dir: &Path) -> Result<Box<dyn Layout>, LayoutError> {
    Ok(match layout {
        LayoutType::Qwerty => Box::new(Qwerty),
        LayoutType::Dvorak => Box::new(Dvorak::new()),
        LayoutType::Colemak => Box::new(Colemak::new()),
        LayoutType::Custom(path) => Box::new(CustomLayout::from_file(&base_dir.join(path))?),
    })
}
