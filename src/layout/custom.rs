//! User-defined layouts loaded from a file
//!
//! ```text
//! # comments and blank lines are ignored
//! layout workman
//! q => q
//! w => d
//! e => r
//! ```
//!
//! The first statement names the layout. Every other statement maps a
//! canonical key to the key at the same position on the user's keyboard.
//! Both sides are unshifted printable ASCII, and the mapped keys must form a
//! permutation. Unlisted keys map to themselves.

use super::{is_printable_ascii, is_shifted, Layout, LayoutError, Table};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone)]
pub struct CustomLayout {
    name: String,
    table: Table,
}

impl CustomLayout {
    /// Load and validate a layout file
    pub fn from_file(path: &Path) -> Result<Self, LayoutError> {
        let text = fs::read_to_string(path).map_err(|source| LayoutError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let layout = Self::parse(&text)?;
        tracing::info!(name = %layout.name, path = %path.display(), "loaded custom layout");
        Ok(layout)
    }

    /// Parse layout file contents
    pub fn parse(text: &str) -> Result<Self, LayoutError> {
        let mut statements = text
            .lines()
            .enumerate()
            .map(|(i, line)| (i + 1, line.trim()))
            .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'));

        let name = statements
            .next()
            .and_then(|(_, line)| line.strip_prefix("layout "))
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .ok_or(LayoutError::NoLayoutName)?
            .to_string();

        let mut pairs: Vec<(u8, u8)> = Vec::new();
        for (line_no, line) in statements {
            let (canonical, physical) = parse_pair(line, line_no)?;
            let duplicate = if pairs.iter().any(|&(c, _)| c == canonical) {
                Some(canonical)
            } else if pairs.iter().any(|&(_, p)| p == physical) {
                Some(physical)
            } else {
                None
            };
            if let Some(key) = duplicate {
                return Err(LayoutError::DuplicateMapping {
                    line: line_no,
                    key: char::from(key),
                });
            }
            pairs.push((canonical, physical));
        }

        if let Some(&(_, physical)) = pairs
            .iter()
            .find(|(_, p)| !pairs.iter().any(|(c, _)| c == p))
        {
            return Err(LayoutError::MissingMapping {
                key: char::from(physical),
            });
        }

        let mut table = Table::identity();
        for (canonical, physical) in pairs {
            table.set(canonical, physical);
        }
        Ok(Self { name, table })
    }
}

fn parse_pair(line: &str, line_no: usize) -> Result<(u8, u8), LayoutError> {
    if !line.is_ascii() {
        return Err(LayoutError::NonAsciiCharacter { line: line_no });
    }
    let (canonical, physical) = line
        .split_once("=>")
        .ok_or(LayoutError::MalformedPair { line: line_no })?;
    Ok((
        parse_key(canonical.trim(), line_no)?,
        parse_key(physical.trim(), line_no)?,
    ))
}

fn parse_key(side: &str, line_no: usize) -> Result<u8, LayoutError> {
    let &[key] = side.as_bytes() else {
        return Err(LayoutError::NonCharacterMapping { line: line_no });
    };
    let c = char::from(key);
    if !is_printable_ascii(c) {
        return Err(LayoutError::NonCharacterMapping { line: line_no });
    }
    if is_shifted(c) {
        return Err(LayoutError::ShiftedCharacter { line: line_no });
    }
    Ok(key)
}

impl Layout for CustomLayout {
    fn name(&self) -> &str {
        &self.name
    }

    fn from_canonical_char(&self, c: char) -> char {
        self.table.from_canonical(c)
    }

    fn to_canonical_char(&self, c: char) -> char {
        self.table.to_canonical(c)
    }
}
