//! Path utilities for exemption matching.

use std::path::{Component, Path, PathBuf};

/// Renders a path with `/` separators regardless of platform.
///
/// # Example
///
/// ```ignore
/// assert_eq!(to_slash(Path::new("src\\tests\\a.ts")), "src/tests/a.ts");
/// ```
#[must_use]
pub fn to_slash(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy().into_owned()),
            Component::RootDir => Some(String::new()),
            Component::ParentDir => Some("..".to_string()),
            Component::CurDir | Component::Prefix(_) => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Removes `.` segments and folds `..` into the preceding segment, without
/// touching the filesystem.
///
/// A leading `..` on a relative path is kept; one directly under the root is
/// dropped.
#[must_use]
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other),
        }
    }
    out
}

/// Returns `path` relative to `root`.
///
/// Both sides are normalized first. A path outside `root`, or equal to it,
/// comes back as the normalized path itself, so the result is never empty
/// for a non-empty input.
#[must_use]
pub fn relative_to(path: &Path, root: &Path) -> PathBuf {
    let path = normalize(path);
    match path.strip_prefix(normalize(root)) {
        Ok(rel) if !rel.as_os_str().is_empty() => rel.to_path_buf(),
        _ => path,
    }
}
