//! Local path resolution.
//!
//! Paths found in descriptions are resolved against a base directory and
//! normalized lexically. Symlinks are never followed here, so the resolved
//! path is exactly what the user wrote, made absolute.

use std::path::{Component, Path, PathBuf};

/// Resolve a raw path string against `base`.
///
/// Absolute paths are kept as-is, relative paths are joined onto `base`.
/// The result is normalized with [`normalize`].
///
/// # Examples
///
/// ```
/// use fileref::paths::resolve_path;
/// use std::path::Path;
///
/// let resolved = resolve_path(Path::new("/work"), "./data/../in/a.csv");
/// assert_eq!(resolved, Path::new("/work/in/a.csv"));
/// ```
pub fn resolve_path(base: &Path, raw: &str) -> PathBuf {
    let raw_path = Path::new(raw);
    if raw_path.is_absolute() {
        normalize(raw_path)
    } else {
        normalize(&base.join(raw_path))
    }
}

/// Remove `.` components and fold `..` into its parent.
///
/// `..` never climbs above the root of an absolute path. In a relative path
/// with nothing left to pop, `..` is kept.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();

    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => out.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            Component::Normal(name) => out.push(name),
        }
    }

    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}

/// Final component of a resolved path, if it has one
pub fn base_name(path: &Path) -> Option<String> {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .filter(|name| !name.is_empty())
}

/// Join a sandbox root and a file name with exactly one separator
pub fn join_root(root: &str, name: &str) -> String {
    format!("{}/{}", root.trim_end_matches('/'), name)
}

/// The sandbox root rendered as a directory (`/home/user/input/`)
pub fn root_dir(root: &str) -> String {
    format!("{}/", root.trim_end_matches('/'))
}
