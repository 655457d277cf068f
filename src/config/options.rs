//! Editor options
//! Declarative table of everything `set` can change

use crate::constants::history;
use crate::layout::LayoutType;

/// Options settable from config files and `:set`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// Keyboard layout the user types on
    pub layout: LayoutType,
    /// Number of command lines kept in history
    pub history: usize,
    /// Width of a tab stop
    pub tabstop: usize,
    /// Insert spaces instead of a tab character
    pub expandtab: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            layout: LayoutType::Qwerty,
            history: history::DEFAULT_SIZE,
            tabstop: 4,
            expandtab: true,
        }
    }
}

/// Typed value after parsing and validation
#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    Bool(bool),
    Integer(usize),
    Text(String),
}

/// How an option value is parsed
#[derive(Debug, Clone, Copy)]
pub enum OptionType {
    /// true/false, on/off, yes/no, 1/0
    Boolean,
    /// Integer with inclusive bounds
    Integer { min: usize, max: usize },
    /// Any non-empty string
    Text,
}

/// Setter function signature
///
/// Receives a parsed and validated value, never the raw string.
pub type OptionSetter = fn(&mut Options, OptionValue);

/// Formats the current value the way `:set name?` shows it
pub type OptionGetter = fn(&Options) -> String;

/// Option descriptor
#[derive(Debug, Clone, Copy)]
pub struct OptionDescriptor {
    /// Canonical option name
    pub name: &'static str,
    /// Short aliases (e.g., `et`)
    pub aliases: &'static [&'static str],
    pub ty: OptionType,
    pub set: OptionSetter,
    pub get: OptionGetter,
}

/// Errors in a `set` statement
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OptionError {
    #[error("unknown option: {name}")]
    UnknownOption { name: String },
    #[error("invalid value `{value}` for {name}: {reason}")]
    InvalidValue {
        name: String,
        value: String,
        reason: String,
    },
    #[error("option {name} needs a value")]
    MissingValue { name: String },
}

fn set_layout(options: &mut Options, value: OptionValue) {
    if let OptionValue::Text(text) = value {
        // FromStr for LayoutType never fails
        if let Ok(layout) = text.parse() {
            options.layout = layout;
        }
    }
}

fn set_history(options: &mut Options, value: OptionValue) {
    if let OptionValue::Integer(n) = value {
        options.history = n;
    }
}

fn set_tabstop(options: &mut Options, value: OptionValue) {
    if let OptionValue::Integer(n) = value {
        options.tabstop = n;
    }
}

fn set_expandtab(options: &mut Options, value: OptionValue) {
    if let OptionValue::Bool(b) = value {
        options.expandtab = b;
    }
}

/// Name of the option holding the keyboard layout
pub const LAYOUT_OPTION: &str = "layout";

pub const OPTIONS: &[OptionDescriptor] = &[
    OptionDescriptor {
        name: LAYOUT_OPTION,
        aliases: &["kl"],
        ty: OptionType::Text,
        set: set_layout,
        get: |o| format!("layout={}", o.layout),
    },
    OptionDescriptor {
        name: "history",
        aliases: &["hi"],
        ty: OptionType::Integer {
            min: 1,
            max: 10_000,
        },
        set: set_history,
        get: |o| format!("history={}", o.history),
    },
    OptionDescriptor {
        name: "tabstop",
        aliases: &["ts"],
        ty: OptionType::Integer { min: 1, max: 16 },
        set: set_tabstop,
        get: |o| format!("tabstop={}", o.tabstop),
    },
    OptionDescriptor {
        name: "expandtab",
        aliases: &["et"],
        ty: OptionType::Boolean,
        set: set_expandtab,
        get: |o| {
            if o.expandtab {
                "expandtab".to_string()
            } else {
                "noexpandtab".to_string()
            }
        },
    },
];

fn find(name: &str) -> Option<&'static OptionDescriptor> {
    OPTIONS
        .iter()
        .find(|desc| desc.name == name || desc.aliases.contains(&name))
}

fn parse_value(desc: &OptionDescriptor, value: &str) -> Result<OptionValue, OptionError> {
    let invalid = |reason: String| OptionError::InvalidValue {
        name: desc.name.to_string(),
        value: value.to_string(),
        reason,
    };
    match desc.ty {
        OptionType::Boolean => match value.to_lowercase().as_str() {
            "true" | "1" | "on" | "yes" => Ok(OptionValue::Bool(true)),
            "false" | "0" | "off" | "no" => Ok(OptionValue::Bool(false)),
            _ => Err(invalid("expected a boolean".to_string())),
        },
        OptionType::Integer { min, max } => {
            let n = value
                .parse::<usize>()
                .map_err(|_| invalid("expected an integer".to_string()))?;
            if (min..=max).contains(&n) {
                Ok(OptionValue::Integer(n))
            } else {
                Err(invalid(format!("must be between {min} and {max}")))
            }
        }
        OptionType::Text => Ok(OptionValue::Text(value.to_string())),
    }
}

impl Options {
    /// Apply one `set` statement body: `name = value`, `name`, or `noname`
    ///
    /// Returns the canonical name of the option that changed.
    pub fn apply(&mut self, statement: &str) -> Result<&'static str, OptionError> {
        let statement = statement.trim();
        if let Some((name, value)) = statement.split_once('=') {
            let (name, value) = (name.trim(), value.trim());
            let desc = find(name).ok_or_else(|| OptionError::UnknownOption {
                name: name.to_string(),
            })?;
            if value.is_empty() {
                return Err(OptionError::MissingValue {
                    name: desc.name.to_string(),
                });
            }
            let parsed = parse_value(desc, value)?;
            (desc.set)(self, parsed);
            return Ok(desc.name);
        }

        if statement.is_empty() {
            return Err(OptionError::MissingValue {
                name: String::new(),
            });
        }
        let (desc, flag) = match find(statement) {
            Some(desc) => (desc, true),
            None => match statement.strip_prefix("no").and_then(find) {
                Some(desc) if matches!(desc.ty, OptionType::Boolean) => (desc, false),
                _ => {
                    return Err(OptionError::UnknownOption {
                        name: statement.to_string(),
                    })
                }
            },
        };
        if !matches!(desc.ty, OptionType::Boolean) {
            return Err(OptionError::MissingValue {
                name: desc.name.to_string(),
            });
        }
        (desc.set)(self, OptionValue::Bool(flag));
        Ok(desc.name)
    }

    /// Current value of an option, formatted for display
    #[must_use]
    pub fn show(&self, name: &str) -> Option<String> {
        find(name).map(|desc| (desc.get)(self))
    }

    /// The text one press of tab inserts
    #[must_use]
    pub fn tab_text(&self) -> String {
        if self.expandtab {
            " ".repeat(self.tabstop)
        } else {
            "\t".to_string()
        }
    }
}
