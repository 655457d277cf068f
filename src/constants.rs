//! Global constants for the fim editor

pub mod paths {
    /// Directory name used under the platform config/data directories
    pub const APP_DIR: &str = "fim";
    /// User configuration file name inside the config directory
    pub const CONFIG_FILE: &str = "fimrc";
    /// Log directory name inside the data directory
    pub const LOG_DIR: &str = "logs";
}

pub mod ui {
    /// Display text for documents with no file path
    pub const NO_NAME: &str = "[No Name]";
    /// Filler shown on rows past the end of the document
    pub const EMPTY_LINE_MARKER: &str = "~";
    /// Message line text while insert mode is active
    pub const INSERT_BANNER: &str = "-- INSERT --";
    /// Prompt character of the command line
    pub const COMMAND_PROMPT: char = ':';
}

pub mod errors {
    // Error Codes
    pub const IO_ERROR: &str = "IO_ERROR";
    pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
    pub const CONFIG_IO: &str = "CONFIG_IO";
    pub const CONFIG_PARSE: &str = "CONFIG_PARSE";
    pub const INCLUDE_CYCLE: &str = "INCLUDE_CYCLE";
    pub const LAYOUT_LOAD: &str = "LAYOUT_LOAD";
    pub const TERMINAL_ERROR: &str = "TERMINAL_ERROR";
    pub const RENDER_FAILED: &str = "RENDER_FAILED";
    pub const CASCADE_LIMIT: &str = "CASCADE_LIMIT";
    pub const UNKNOWN_COMMAND: &str = "UNKNOWN_COMMAND";
    pub const AMBIGUOUS_COMMAND: &str = "AMBIGUOUS_COMMAND";
    pub const UNSAVED_CHANGES: &str = "UNSAVED_CHANGES";
    pub const NO_PATH: &str = "NO_PATH";
    pub const SETTING_ERROR: &str = "SETTING_ERROR";

    // Error Messages
    pub const MSG_UNSAVED_CHANGES: &str = "No write since last change (add ! to override)";
    pub const MSG_NO_FILE_NAME: &str = "No file name";
}

pub mod modes {
    pub const NORMAL: &str = "normal";
    pub const INSERT: &str = "insert";
    pub const COMMAND: &str = "command";
    pub const REPLACE: &str = "replace";
    pub const EXEC: &str = "exec";
}

pub mod dispatch {
    /// Upper bound on push/pop steps a single key event may trigger
    pub const MAX_CASCADE: usize = 64;
}

pub mod history {
    /// Default number of command lines kept in history
    pub const DEFAULT_SIZE: usize = 100;
}

pub mod logging {
    /// Environment variable with the highest priority for the log filter
    pub const ENV_FILTER_VAR: &str = "FIM_LOG";
    /// Filter used when neither `FIM_LOG` nor `RUST_LOG` is set
    pub const DEFAULT_FILTER: &str = "warn,fim=info";
}
