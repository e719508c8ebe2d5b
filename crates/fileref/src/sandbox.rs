//! Sandbox path layout and per-call name allocation.
//!
//! Inputs land under one root and outputs under another, addressed by file
//! name only. Two different local files with the same name would map to the
//! same sandbox path; the [`CollisionPolicy`] decides what happens then.

use crate::config::ConfigError;
use crate::paths::{base_name, join_root};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Default root for input files inside the sandbox
pub const DEFAULT_INPUT_ROOT: &str = "/home/user/input";

/// Default root for output files inside the sandbox
pub const DEFAULT_OUTPUT_ROOT: &str = "/home/user/output";

/// What to do when two local paths share a file name under the same root
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    JsonSchema,
    clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum CollisionPolicy {
    /// Give later files a numbered name: `a-2.csv`, `a-3.csv`, ...
    #[default]
    Suffix,
    /// Reuse the name; the latest file wins
    Overwrite,
}

impl fmt::Display for CollisionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollisionPolicy::Suffix => write!(f, "suffix"),
            CollisionPolicy::Overwrite => write!(f, "overwrite"),
        }
    }
}

/// Fixed sandbox roots plus the collision policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct SandboxLayout {
    input_root: String,
    output_root: String,
    collision: CollisionPolicy,
}

impl SandboxLayout {
    /// Build a layout, rejecting relative or identical roots.
    pub fn new(
        input_root: impl Into<String>,
        output_root: impl Into<String>,
        collision: CollisionPolicy,
    ) -> Result<Self, ConfigError> {
        let input_root = input_root.into();
        let output_root = output_root.into();

        for root in [&input_root, &output_root] {
            if !root.starts_with('/') {
                return Err(ConfigError::RelativeRoot(root.clone()));
            }
        }
        if input_root.trim_end_matches('/') == output_root.trim_end_matches('/') {
            return Err(ConfigError::SameRoots(input_root));
        }

        Ok(Self {
            input_root,
            output_root,
            collision,
        })
    }

    pub fn input_root(&self) -> &str {
        &self.input_root
    }

    pub fn output_root(&self) -> &str {
        &self.output_root
    }

    pub fn collision(&self) -> CollisionPolicy {
        self.collision
    }

    /// Fresh allocator for the input root, scoped to one parse call
    pub fn input_allocator(&self) -> SandboxAllocator {
        SandboxAllocator::new(&self.input_root, self.collision)
    }

    /// Fresh allocator for the output root, scoped to one parse call
    pub fn output_allocator(&self) -> SandboxAllocator {
        SandboxAllocator::new(&self.output_root, self.collision)
    }
}

impl Default for SandboxLayout {
    fn default() -> Self {
        Self {
            input_root: DEFAULT_INPUT_ROOT.to_string(),
            output_root: DEFAULT_OUTPUT_ROOT.to_string(),
            collision: CollisionPolicy::default(),
        }
    }
}

/// Outcome of placing one local file under a root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Allocation {
    pub sandbox_path: String,
    /// Local path that already held the requested name, if any
    pub collided_with: Option<PathBuf>,
}

/// Assigns sandbox names under a single root
///
/// The same local path always gets the same sandbox path back.
#[derive(Debug)]
pub struct SandboxAllocator {
    root: String,
    policy: CollisionPolicy,
    by_local: HashMap<PathBuf, String>,
    by_name: HashMap<String, PathBuf>,
}

impl SandboxAllocator {
    pub fn new(root: &str, policy: CollisionPolicy) -> Self {
        Self {
            root: root.to_string(),
            policy,
            by_local: HashMap::new(),
            by_name: HashMap::new(),
        }
    }

    /// Sandbox path already assigned to `local`, if any
    pub fn lookup(&self, local: &Path) -> Option<&str> {
        self.by_local.get(local).map(String::as_str)
    }

    /// Assign a sandbox path to `local`.
    ///
    /// Returns `None` when the path has no file name to place.
    pub fn allocate(&mut self, local: &Path) -> Option<Allocation> {
        if let Some(existing) = self.by_local.get(local) {
            return Some(Allocation {
                sandbox_path: existing.clone(),
                collided_with: None,
            });
        }

        let name = base_name(local)?;
        let collided_with = self
            .by_name
            .get(&name)
            .filter(|owner| owner.as_path() != local)
            .cloned();

        let chosen = match (&collided_with, self.policy) {
            (Some(_), CollisionPolicy::Suffix) => self.next_free_name(&name),
            _ => name,
        };

        let sandbox_path = join_root(&self.root, &chosen);
        self.by_name.insert(chosen, local.to_path_buf());
        self.by_local
            .insert(local.to_path_buf(), sandbox_path.clone());

        Some(Allocation {
            sandbox_path,
            collided_with,
        })
    }

    fn next_free_name(&self, name: &str) -> String {
        let (stem, ext) = split_extension(name);
        let mut n = 2usize;
        loop {
            let candidate = match ext {
                Some(ext) => format!("{}-{}.{}", stem, n, ext),
                None => format!("{}-{}", stem, n),
            };
            if !self.by_name.contains_key(&candidate) {
                return candidate;
            }
            n += 1;
        }
    }
}

/// Split `name` at its last dot, leaving dotfiles such as `.env` whole
fn split_extension(name: &str) -> (&str, Option<&str>) {
    match name.rfind('.') {
        Some(0) | None => (name, None),
        Some(pos) => (&name[..pos], Some(&name[pos + 1..])),
    }
}
