//! Ex commands
//! Parses `:` command lines into structured commands and executes them
//!
//! ## command/ Invariants
//!
//! - Parsing never fails; unknown input becomes `ParsedCommand::Unknown`.
//! - A command name matches exactly, by alias, or by an unambiguous prefix.
//! - Commands that would discard unsaved changes need a `!`.

pub mod executor;

pub use self::executor::{execute, ExecutionResult};

/// A parsed command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedCommand {
    /// Nothing typed
    Empty,
    Quit {
        bangs: usize,
    },
    Write {
        path: Option<String>,
        bangs: usize,
    },
    WriteQuit {
        path: Option<String>,
        bangs: usize,
    },
    Edit {
        path: Option<String>,
        bangs: usize,
    },
    /// `set` with its raw argument text (None lists all options)
    Set {
        args: Option<String>,
    },
    /// `bind` with the rest of the line in config syntax
    Bind {
        args: String,
    },
    Source {
        path: Option<String>,
    },
    Echo {
        text: String,
    },
    Unknown {
        name: String,
    },
    Ambiguous {
        prefix: String,
        matches: Vec<String>,
    },
}

/// Command descriptor
#[derive(Debug, Clone, Copy)]
pub struct CommandDescriptor {
    /// Canonical name
    pub name: &'static str,
    /// Exact-match abbreviations (e.g. `w`)
    pub aliases: &'static [&'static str],
    pub description: &'static str,
    pub factory: fn(args: Option<String>, bangs: usize) -> ParsedCommand,
}

pub const COMMANDS: &[CommandDescriptor] = &[
    CommandDescriptor {
        name: "quit",
        aliases: &["q"],
        description: "Quit the editor",
        factory: |_, bangs| ParsedCommand::Quit { bangs },
    },
    CommandDescriptor {
        name: "write",
        aliases: &["w"],
        description: "Write the document, optionally to a new path",
        factory: |path, bangs| ParsedCommand::Write { path, bangs },
    },
    CommandDescriptor {
        name: "wq",
        aliases: &[],
        description: "Write and quit",
        factory: |path, bangs| ParsedCommand::WriteQuit { path, bangs },
    },
    CommandDescriptor {
        name: "xit",
        aliases: &["x"],
        description: "Write and quit",
        factory: |path, bangs| ParsedCommand::WriteQuit { path, bangs },
    },
    CommandDescriptor {
        name: "edit",
        aliases: &["e"],
        description: "Open a file",
        factory: |path, bangs| ParsedCommand::Edit { path, bangs },
    },
    CommandDescriptor {
        name: "set",
        aliases: &["se"],
        description: "Show or change an option",
        factory: |args, _| ParsedCommand::Set { args },
    },
    CommandDescriptor {
        name: "bind",
        aliases: &[],
        description: "Add a key binding",
        factory: |args, _| ParsedCommand::Bind {
            args: args.unwrap_or_default(),
        },
    },
    CommandDescriptor {
        name: "source",
        aliases: &["so"],
        description: "Reload key bindings from a config file",
        factory: |path, _| ParsedCommand::Source { path },
    },
    CommandDescriptor {
        name: "echo",
        aliases: &["ec"],
        description: "Show a message",
        factory: |text, _| ParsedCommand::Echo {
            text: text.unwrap_or_default(),
        },
    },
];

enum MatchResult {
    Found(&'static CommandDescriptor),
    Ambiguous(Vec<String>),
    Unknown,
}

fn match_command(name: &str) -> MatchResult {
    if let Some(desc) = COMMANDS
        .iter()
        .find(|d| d.name == name || d.aliases.contains(&name))
    {
        return MatchResult::Found(desc);
    }
    let matches: Vec<&'static CommandDescriptor> =
        COMMANDS.iter().filter(|d| d.name.starts_with(name)).collect();
    match matches.as_slice() {
        [] => MatchResult::Unknown,
        [desc] => MatchResult::Found(*desc),
        _ => MatchResult::Ambiguous(matches.iter().map(|d| d.name.to_string()).collect()),
    }
}

/// Parse a command line (with or without the leading `:`)
#[must_use]
pub fn parse(input: &str) -> ParsedCommand {
    let input = input.trim();
    let input = input.strip_prefix(':').unwrap_or(input).trim_start();
    if input.is_empty() {
        return ParsedCommand::Empty;
    }

    let (head, rest) = input
        .split_once(char::is_whitespace)
        .unwrap_or((input, ""));
    let name = head.trim_end_matches('!');
    let bangs = head.len() - name.len();
    let args = Some(rest.trim()).filter(|a| !a.is_empty()).map(str::to_string);

    if name.is_empty() {
        return ParsedCommand::Unknown {
            name: head.to_string(),
        };
    }
    match match_command(name) {
        MatchResult::Found(desc) => (desc.factory)(args, bangs),
        MatchResult::Ambiguous(matches) => ParsedCommand::Ambiguous {
            prefix: name.to_string(),
            matches,
        },
        MatchResult::Unknown => ParsedCommand::Unknown {
            name: head.to_string(),
        },
    }
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
