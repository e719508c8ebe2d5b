//! Actionable error formatting for improved user experience.
//!
//! Errors shown to users carry:
//! - Clear error description
//! - Possible causes (diagnostics)
//! - Remediation steps (actionable fixes)

use std::fmt;
use std::path::Path;

/// An error with diagnostic context and remediation steps.
///
/// # Example
///
/// ```
/// use fileref::errors::ActionableError;
///
/// let error = ActionableError::new("Description file tasks/today.txt not found")
///     .with_cause("The path may be relative to a different directory")
///     .with_remedy("Pass the description inline: fileref parse \"<text>\"");
///
/// assert!(error.to_string().contains("To fix:"));
/// ```
#[derive(Debug, Clone)]
pub struct ActionableError {
    error: String,
    causes: Vec<String>,
    remediation: Vec<String>,
}

impl ActionableError {
    /// Create a new actionable error with the given message.
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            causes: Vec::new(),
            remediation: Vec::new(),
        }
    }

    /// Add a possible cause (diagnostic hint).
    pub fn with_cause(mut self, cause: impl Into<String>) -> Self {
        self.causes.push(cause.into());
        self
    }

    /// Add a remediation step (actionable fix).
    pub fn with_remedy(mut self, remedy: impl Into<String>) -> Self {
        self.remediation.push(remedy.into());
        self
    }

    /// The bare error message without causes or remedies
    pub fn message(&self) -> &str {
        &self.error
    }

    pub fn remedies(&self) -> &[String] {
        &self.remediation
    }

    /// Convert to a formatted error message suitable for display.
    pub fn to_error_message(&self) -> String {
        let mut msg = format!("Error: {}\n", self.error);

        if !self.causes.is_empty() {
            msg.push_str("\nPossible causes:\n");
            for cause in &self.causes {
                msg.push_str(&format!("  • {}\n", cause));
            }
        }

        if !self.remediation.is_empty() {
            msg.push_str("\nTo fix:\n");
            for remedy in &self.remediation {
                msg.push_str(&format!("  • {}\n", remedy));
            }
        }

        msg
    }
}

impl fmt::Display for ActionableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_error_message())
    }
}

impl std::error::Error for ActionableError {}

/// A description or context file could not be read.
pub fn text_file_unreadable(what: &str, path: &Path) -> ActionableError {
    ActionableError::new(format!("Could not read {} file {}", what, path.display()))
        .with_cause("The file may not exist")
        .with_cause("The path may be relative to a different working directory")
        .with_remedy(format!("Check the path: ls -l {}", path.display()))
        .with_remedy("Pass the text inline instead, or pipe it on stdin")
}

/// The configuration file is missing, unreadable or invalid.
pub fn config_invalid(detail: &str) -> ActionableError {
    ActionableError::new(format!("Invalid configuration: {}", detail))
        .with_cause("A sandbox root may be relative or both roots may be equal")
        .with_cause("The TOML may be malformed or use an unknown collision policy")
        .with_remedy("Show the effective configuration: fileref config show")
        .with_remedy("Use absolute roots, e.g. input_root = \"/home/user/input\"")
}

/// Strict mode found inputs that were named but not picked up.
pub fn unresolved_inputs(count: usize) -> ActionableError {
    ActionableError::new(format!(
        "Validation failed: {} referenced input(s) could not be resolved",
        count
    ))
    .with_cause("A file: or quoted path points at a missing file or a directory")
    .with_cause("A files: pattern names a directory that cannot be listed")
    .with_remedy("Rerun with --verbose to see each path that was checked")
    .with_remedy("Drop --strict to accept partial results")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_actionable_error_formatting() {
        let error = ActionableError::new("Test error")
            .with_cause("First cause")
            .with_remedy("First remedy");

        let msg = error.to_error_message();

        assert!(msg.contains("Error: Test error"));
        assert!(msg.contains("Possible causes:"));
        assert!(msg.contains("• First cause"));
        assert!(msg.contains("To fix:"));
        assert!(msg.contains("• First remedy"));
    }

    #[test]
    fn test_error_without_causes() {
        let msg = ActionableError::new("Simple error")
            .with_remedy("Just fix it")
            .to_error_message();

        assert!(!msg.contains("Possible causes:"));
        assert!(msg.contains("• Just fix it"));
    }

    #[test]
    fn test_text_file_unreadable_helper() {
        let error = text_file_unreadable("description", Path::new("task.txt"));

        assert_eq!(error.message(), "Could not read description file task.txt");
        assert!(error.to_string().contains("ls -l task.txt"));
    }

    #[test]
    fn test_unresolved_inputs_helper() {
        let error = unresolved_inputs(2);
        let msg = error.to_error_message();

        assert!(msg.contains("2 referenced input(s)"));
        assert!(msg.contains("--verbose"));
        assert_eq!(error.remedies().len(), 2);
    }
}
