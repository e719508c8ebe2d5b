//! Single-segment wildcard matching for `files:` patterns.
//!
//! Only `*` is special: it matches any run of characters, including none.
//! Every other character, regex metacharacters included, matches itself.

use regex::Regex;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum GlobError {
    #[error("Glob pattern is empty")]
    Empty,

    #[error("Glob pattern '{pattern}' could not be compiled: {reason}")]
    Compile { pattern: String, reason: String },
}

/// Compiled matcher for one file-name glob such as `*.csv` or `report_*.json`
///
/// # Example
///
/// ```
/// use fileref::glob::GlobMatcher;
///
/// let matcher = GlobMatcher::new("data[1]*.csv").unwrap();
/// assert!(matcher.is_match("data[1]-final.csv"));
/// assert!(!matcher.is_match("data1.csv"));
/// ```
#[derive(Debug, Clone)]
pub struct GlobMatcher {
    regex: Regex,
}

impl GlobMatcher {
    pub fn new(pattern: &str) -> Result<Self, GlobError> {
        if pattern.is_empty() {
            return Err(GlobError::Empty);
        }

        let body = pattern
            .split('*')
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join(".*");

        let regex = Regex::new(&format!("(?s)^{}$", body)).map_err(|e| GlobError::Compile {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self { regex })
    }

    /// Whether the whole file name matches the pattern
    pub fn is_match(&self, name: &str) -> bool {
        self.regex.is_match(name)
    }
}

/// Whether a token is a wildcard pattern at all
pub fn is_wildcard(token: &str) -> bool {
    token.contains('*')
}
