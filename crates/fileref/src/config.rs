//! Configuration file loading and parsing.
//!
//! fileref reads optional settings from `.fileref/config.toml` in the working
//! directory, or from a file named with `--config` / `FILEREF_CONFIG`. If no
//! config file exists, the built-in sandbox roots are used.

use crate::sandbox::{CollisionPolicy, SandboxLayout, DEFAULT_INPUT_ROOT, DEFAULT_OUTPUT_ROOT};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Directory holding the discovered config file
pub const CONFIG_DIR: &str = ".fileref";

/// Name of the discovered config file inside [`CONFIG_DIR`]
pub const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid sandbox root '{0}': sandbox roots must be absolute")]
    RelativeRoot(String),

    #[error("Invalid sandbox roots: input and output both use '{0}'")]
    SameRoots(String),
}

/// Root configuration structure loaded from `config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilerefConfig {
    /// Sandbox layout settings (optional).
    pub sandbox: Option<SandboxConfig>,
    /// Extraction settings (optional).
    pub extract: Option<ExtractConfig>,
}

/// Sandbox layout configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SandboxConfig {
    /// Root for input files (default: "/home/user/input").
    pub input_root: Option<String>,
    /// Root for output files (default: "/home/user/output").
    pub output_root: Option<String>,
    /// Same-name handling: "suffix" or "overwrite" (default: "suffix").
    pub collision: Option<CollisionPolicy>,
}

impl SandboxConfig {
    /// Get input root with default fallback.
    pub fn input_root(&self) -> String {
        self.input_root
            .clone()
            .unwrap_or_else(|| DEFAULT_INPUT_ROOT.to_string())
    }

    /// Get output root with default fallback.
    pub fn output_root(&self) -> String {
        self.output_root
            .clone()
            .unwrap_or_else(|| DEFAULT_OUTPUT_ROOT.to_string())
    }

    /// Get collision policy with default fallback.
    pub fn collision(&self) -> CollisionPolicy {
        self.collision.unwrap_or_default()
    }
}

/// Extraction configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractConfig {
    /// Directory relative paths are resolved against. Relative values are
    /// taken from the config file's directory.
    pub base_dir: Option<PathBuf>,
}

/// Command-line values that take precedence over the config file
#[derive(Debug, Clone, Default)]
pub struct LayoutOverrides {
    pub input_root: Option<String>,
    pub output_root: Option<String>,
    pub collision: Option<CollisionPolicy>,
}

impl FilerefConfig {
    /// Parse configuration from TOML text.
    pub fn from_toml_str(content: &str, origin: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: origin.to_path_buf(),
            source,
        })
    }

    /// Load an explicitly named config file. A missing file is an error.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }

        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_toml_str(&content, path)
    }

    /// Sandbox layout with `overrides` applied over file values and defaults.
    pub fn sandbox_layout(&self, overrides: &LayoutOverrides) -> Result<SandboxLayout, ConfigError> {
        let sandbox = self.sandbox.clone().unwrap_or_default();

        SandboxLayout::new(
            overrides
                .input_root
                .clone()
                .unwrap_or_else(|| sandbox.input_root()),
            overrides
                .output_root
                .clone()
                .unwrap_or_else(|| sandbox.output_root()),
            overrides.collision.unwrap_or_else(|| sandbox.collision()),
        )
    }
}

/// A configuration together with where it came from
#[derive(Debug, Clone, Default)]
pub struct LoadedConfig {
    pub config: FilerefConfig,
    /// Path of the file read, or `None` when defaults are in use
    pub source: Option<PathBuf>,
}

impl LoadedConfig {
    /// Find and load configuration.
    ///
    /// An `explicit` path must exist. Otherwise `.fileref/config.toml` under
    /// `working_dir` is used when present, and defaults when it is not.
    pub fn discover(working_dir: &Path, explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match explicit {
            Some(path) => working_dir.join(path),
            None => {
                let candidate = working_dir.join(CONFIG_DIR).join(CONFIG_FILE);
                if !candidate.exists() {
                    return Ok(Self::default());
                }
                candidate
            }
        };

        let config = FilerefConfig::load(&path)?;
        Ok(Self {
            config,
            source: Some(path),
        })
    }

    /// Base directory from the config file, made absolute against the
    /// file's directory (or `working_dir` for defaults).
    pub fn base_dir(&self, working_dir: &Path) -> Option<PathBuf> {
        let configured = self.config.extract.as_ref()?.base_dir.as_ref()?;

        // `.fileref/config.toml` describes the directory above `.fileref`
        let anchor = match self.source.as_deref().and_then(Path::parent) {
            Some(dir) if dir.file_name().is_some_and(|name| name == CONFIG_DIR) => {
                dir.parent().unwrap_or(dir).to_path_buf()
            }
            Some(dir) => dir.to_path_buf(),
            None => working_dir.to_path_buf(),
        };

        Some(crate::paths::normalize(&anchor.join(configured)))
    }
}
