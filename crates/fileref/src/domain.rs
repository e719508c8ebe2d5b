//! Core data types for extracted file references.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Whether a reference is read by the task or produced by it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceKind {
    Input,
    Output,
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReferenceKind::Input => write!(f, "input"),
            ReferenceKind::Output => write!(f, "output"),
        }
    }
}

/// The pattern rule that produced a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum MatchRule {
    /// `file: ./path`
    SingleFile,
    /// `"./path.ext"` or `'./path.ext'`
    QuotedPath,
    /// `files: ./dir/*.ext`
    Wildcard,
    /// `output: ./path`
    Output,
}

impl fmt::Display for MatchRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MatchRule::SingleFile => "file",
            MatchRule::QuotedPath => "quoted",
            MatchRule::Wildcard => "files",
            MatchRule::Output => "output",
        };
        write!(f, "{}", label)
    }
}

/// One resolved mapping between a local path and its sandbox path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FileReference {
    /// Absolute, lexically normalized path on the local machine
    pub local_path: PathBuf,
    /// Destination path inside the sandbox
    pub sandbox_path: String,
    pub kind: ReferenceKind,
}

impl FileReference {
    pub fn input(local_path: impl Into<PathBuf>, sandbox_path: impl Into<String>) -> Self {
        Self {
            local_path: local_path.into(),
            sandbox_path: sandbox_path.into(),
            kind: ReferenceKind::Input,
        }
    }

    pub fn output(local_path: impl Into<PathBuf>, sandbox_path: impl Into<String>) -> Self {
        Self {
            local_path: local_path.into(),
            sandbox_path: sandbox_path.into(),
            kind: ReferenceKind::Output,
        }
    }

    pub fn is_input(&self) -> bool {
        self.kind == ReferenceKind::Input
    }
}

/// Result of scanning one task description
///
/// `references` keeps discovery order: single-file matches, then quoted
/// paths, then wildcard members, then outputs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ParseResult {
    pub references: Vec<FileReference>,
    /// The description with every resolved local path replaced by its sandbox path
    pub updated_description: String,
}

impl ParseResult {
    /// Iterate over input references in discovery order
    pub fn inputs(&self) -> impl Iterator<Item = &FileReference> {
        self.references.iter().filter(|r| r.is_input())
    }

    /// Iterate over output references in discovery order
    pub fn outputs(&self) -> impl Iterator<Item = &FileReference> {
        self.references.iter().filter(|r| !r.is_input())
    }

    pub fn is_empty(&self) -> bool {
        self.references.is_empty()
    }
}
