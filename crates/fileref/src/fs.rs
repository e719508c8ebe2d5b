//! Read-only filesystem queries used during extraction.
//!
//! The extractor only ever asks two questions: "is this an existing regular
//! file?" and "what is in this directory?". Both go through [`FileSystem`] so
//! the host can be swapped for an in-memory tree.

use std::collections::BTreeSet;
use std::io;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Read-only view of a filesystem
pub trait FileSystem: Send + Sync {
    /// True when `path` exists and is a regular file. Errors count as false.
    fn is_file(&self, path: &Path) -> bool;

    /// Names of the immediate entries of `dir`, in any order
    ///
    /// Entries whose names are not valid UTF-8 are left out.
    fn list_dir(&self, dir: &Path) -> io::Result<Vec<String>>;
}

/// The machine's real filesystem
///
/// Symlinks are followed, so a link to a regular file counts as a file.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostFileSystem;

impl FileSystem for HostFileSystem {
    fn is_file(&self, path: &Path) -> bool {
        std::fs::metadata(path)
            .map(|meta| meta.is_file())
            .unwrap_or(false)
    }

    fn list_dir(&self, dir: &Path) -> io::Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            match entry.file_name().into_string() {
                Ok(name) => names.push(name),
                Err(raw) => warn!(
                    target: "fileref::fs",
                    "skipping non-UTF-8 entry {:?} in {}",
                    raw,
                    dir.display()
                ),
            }
        }
        Ok(names)
    }
}

/// In-memory file tree
///
/// Directories are implied by the files they contain; empty and unreadable
/// directories can be declared explicitly.
///
/// # Example
///
/// ```
/// use fileref::fs::{FileSystem, MemoryFileSystem};
/// use std::path::Path;
///
/// let fs = MemoryFileSystem::new().with_file("/data/a.csv");
/// assert!(fs.is_file(Path::new("/data/a.csv")));
/// assert_eq!(fs.list_dir(Path::new("/data")).unwrap(), vec!["a.csv"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryFileSystem {
    files: BTreeSet<PathBuf>,
    dirs: BTreeSet<PathBuf>,
    unreadable: BTreeSet<PathBuf>,
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a regular file and all of its parent directories
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let mut parent = path.parent();
        while let Some(dir) = parent {
            self.dirs.insert(dir.to_path_buf());
            parent = dir.parent();
        }
        self.files.insert(path);
        self
    }

    /// Add an empty directory
    pub fn with_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.dirs.insert(path.into());
        self
    }

    /// Make listing `path` fail with `PermissionDenied`
    pub fn with_unreadable_dir(mut self, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        self.dirs.insert(path.clone());
        self.unreadable.insert(path);
        self
    }
}

impl FileSystem for MemoryFileSystem {
    fn is_file(&self, path: &Path) -> bool {
        self.files.contains(path)
    }

    fn list_dir(&self, dir: &Path) -> io::Result<Vec<String>> {
        if self.unreadable.contains(dir) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("permission denied: {}", dir.display()),
            ));
        }
        if !self.dirs.contains(dir) {
            return Err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("no such directory: {}", dir.display()),
            ));
        }

        let names = self
            .files
            .iter()
            .chain(self.dirs.iter())
            .filter(|path| path.parent() == Some(dir))
            .filter_map(|path| path.file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .collect();
        Ok(names)
    }
}
