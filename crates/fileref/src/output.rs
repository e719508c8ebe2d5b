//! Structured output formatting for CLI commands.
//!
//! Human-readable text by default, or a JSON envelope with metadata for
//! scripts and agents.

use chrono::Utc;
use serde::Serialize;
use std::fmt::Display;
use std::io::{self, Write};

/// Version of the JSON output format
const OUTPUT_VERSION: &str = "0.1.0";

// ============================================================================
// Output Context for Quiet Mode
// ============================================================================

/// Context for controlling output verbosity
pub struct OutputContext {
    quiet: bool,
    json: bool,
}

impl OutputContext {
    pub fn new(quiet: bool, json: bool) -> Self {
        Self { quiet, json }
    }

    /// Print essential output (always shown unless --json)
    pub fn print_data(&self, msg: impl Display) -> io::Result<()> {
        if !self.json {
            writeln_safe(&format!("{}", msg))
        } else {
            Ok(())
        }
    }

    /// Print informational message (suppressed by --quiet or --json)
    pub fn print_info(&self, msg: impl Display) -> io::Result<()> {
        if !self.quiet && !self.json {
            writeln_safe(&format!("{}", msg))
        } else {
            Ok(())
        }
    }

    /// Print a JSON document (only in --json mode)
    pub fn print_json(&self, json: &str) -> io::Result<()> {
        if self.json {
            writeln_safe(json)
        } else {
            Ok(())
        }
    }

    pub fn is_json(&self) -> bool {
        self.json
    }
}

/// Safe println that handles broken pipes gracefully
fn writeln_safe(msg: &str) -> io::Result<()> {
    match writeln!(io::stdout(), "{}", msg) {
        Ok(_) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => {
            // Expected when piping to head, etc.
            std::process::exit(0);
        }
        Err(e) => Err(e),
    }
}

// ============================================================================
// JSON Output Types
// ============================================================================

/// Wrapper for successful command output with metadata
#[derive(Debug, Serialize)]
pub struct JsonOutput<T: Serialize> {
    pub success: bool,
    pub data: T,
    pub metadata: Metadata,
}

impl<T: Serialize> JsonOutput<T> {
    pub fn success(data: T, command: impl Into<String>) -> Self {
        Self {
            success: true,
            data,
            metadata: Metadata::new(command),
        }
    }

    /// Serialize to JSON string with pretty formatting
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Wrapper for error output with suggestions
#[derive(Debug, Serialize)]
pub struct JsonError {
    pub success: bool,
    pub error: ErrorDetail,
    pub metadata: Metadata,
}

impl JsonError {
    pub fn new(
        code: impl Into<String>,
        message: impl Into<String>,
        command: impl Into<String>,
    ) -> Self {
        Self {
            success: false,
            error: ErrorDetail {
                code: code.into(),
                message: message.into(),
                suggestions: Vec::new(),
            },
            metadata: Metadata::new(command),
        }
    }

    pub fn with_suggestions(mut self, suggestions: Vec<String>) -> Self {
        self.error.suggestions.extend(suggestions);
        self
    }

    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

/// Metadata included in every JSON response
#[derive(Debug, Serialize)]
pub struct Metadata {
    pub version: String,
    pub timestamp: String,
    pub command: String,
}

impl Metadata {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            version: OUTPUT_VERSION.to_string(),
            timestamp: Utc::now().to_rfc3339(),
            command: command.into(),
        }
    }
}

/// Error codes used in JSON error output
pub struct ErrorCode;

impl ErrorCode {
    pub const NOT_FOUND: &'static str = "NOT_FOUND";
    pub const INVALID_ARGUMENT: &'static str = "INVALID_ARGUMENT";
    pub const VALIDATION_FAILED: &'static str = "VALIDATION_FAILED";
    pub const IO_ERROR: &'static str = "IO_ERROR";
    pub const INTERNAL_ERROR: &'static str = "INTERNAL_ERROR";
}

// ============================================================================
// Exit Codes
// ============================================================================

/// Process exit codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Command succeeded (0)
    Success = 0,

    /// Generic error (1)
    GenericError = 1,

    /// Invalid arguments, flags or configuration (2)
    InvalidArgument = 2,

    /// Description, context or config file not found (3)
    NotFound = 3,

    /// --strict and some referenced inputs did not resolve (4)
    ValidationFailed = 4,

    /// File system or other external failure (10)
    ExternalError = 10,
}

impl ExitCode {
    /// Convert exit code to i32 for `std::process::exit`
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Matching JSON error code
    pub fn error_code(self) -> &'static str {
        match self {
            ExitCode::Success | ExitCode::GenericError => ErrorCode::INTERNAL_ERROR,
            ExitCode::InvalidArgument => ErrorCode::INVALID_ARGUMENT,
            ExitCode::NotFound => ErrorCode::NOT_FOUND,
            ExitCode::ValidationFailed => ErrorCode::VALIDATION_FAILED,
            ExitCode::ExternalError => ErrorCode::IO_ERROR,
        }
    }
}
