//! Centralized error handling for fim
//! Defines common error types, severity levels, and error codes

use crate::constants::errors;
use std::fmt;

/// Severity level of an error
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    /// Informational message (not really an error)
    Info,
    /// Warning - something might be wrong but operation can continue
    Warning,
    /// Standard error - operation failed but editor can continue
    Error,
    /// Critical error - may lead to data loss or require restart
    Critical,
}

impl fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "INFO"),
            Self::Warning => write!(f, "WARN"),
            Self::Error => write!(f, "ERROR"),
            Self::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// Category of the error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorType {
    /// File system or I/O errors
    Io,
    /// Command line parsing errors
    Parse,
    /// Key binding configuration errors
    Config,
    /// Keyboard layout construction errors
    Layout,
    /// Command execution errors
    Execution,
    /// Rendering or terminal backend errors
    Renderer,
    /// Internal logic or invariant violations
    Internal,
}

impl fmt::Display for ErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io => write!(f, "IO"),
            Self::Parse => write!(f, "Parse"),
            Self::Config => write!(f, "Config"),
            Self::Layout => write!(f, "Layout"),
            Self::Execution => write!(f, "Execution"),
            Self::Renderer => write!(f, "Renderer"),
            Self::Internal => write!(f, "Internal"),
        }
    }
}

/// A structured error in fim
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FimError {
    /// How serious the error is
    pub severity: ErrorSeverity,
    /// What kind of error occurred
    pub kind: ErrorType,
    /// Machine-readable error code (e.g., "CONFIG_PARSE")
    pub code: String,
    /// Human-readable description
    pub message: String,
}

impl FimError {
    /// Create a new standard error (Severity: Error)
    pub fn new(kind: ErrorType, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: ErrorSeverity::Error,
            kind,
            code: code.into(),
            message: message.into(),
        }
    }

    /// Create a new critical error (Severity: Critical)
    pub fn critical(kind: ErrorType, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            severity: ErrorSeverity::Critical,
            kind,
            code: code.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}({}): {}",
            self.severity, self.kind, self.code, self.message
        )
    }
}

impl std::error::Error for FimError {}

impl From<std::io::Error> for FimError {
    fn from(err: std::io::Error) -> Self {
        Self::new(ErrorType::Io, errors::IO_ERROR, err.to_string())
    }
}

/// Result alias for fim operations
pub type Result<T> = std::result::Result<T, FimError>;
