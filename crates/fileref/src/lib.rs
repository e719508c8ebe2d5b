//! File reference extraction for task descriptions
//!
//! Finds local file paths mentioned in free-text task descriptions, checks
//! that inputs exist, maps every reference onto a sandbox path and rewrites
//! the description to use those sandbox paths.

pub mod cli;
pub mod config;
pub mod domain;
pub mod errors;
pub mod extract;
pub mod fs;
pub mod glob;
pub mod observer;
pub mod output;
pub mod paths;
pub mod sandbox;

// Re-export commonly used types
pub use config::{ConfigError, FilerefConfig, LoadedConfig};
pub use domain::{FileReference, MatchRule, ParseResult, ReferenceKind};
pub use extract::{parse_file_references, ReferenceExtractor};
pub use observer::{ParseEvent, ParseObserver};
pub use sandbox::{CollisionPolicy, SandboxLayout};
