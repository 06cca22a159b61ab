//! Lexical path helpers. Nothing here touches the filesystem.

use std::path::{Component, Path, PathBuf};

/// Collapse `.` and `..` components without resolving symlinks.
///
/// A `..` that would climb above the start of a relative path is kept, so
/// `../a` stays `../a`. On an absolute path it is dropped at the root.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            other => out.push(other),
        }
    }
    out.iter().collect()
}

/// True if `rel` is relative and stays inside whatever base it is joined to.
pub fn is_forward(rel: &Path) -> bool {
    if rel.has_root() || rel.is_absolute() {
        return false;
    }
    !matches!(
        normalize(rel).components().next(),
        Some(Component::ParentDir) | Some(Component::Prefix(_))
    )
}

/// Resolve the contents of a symlink stored at `link` the way the OS would
/// for a lexical comparison: relative contents are taken from `link`'s parent.
pub fn resolve_link(link: &Path, contents: &Path) -> PathBuf {
    if contents.is_absolute() {
        return normalize(contents);
    }
    let base = link.parent().unwrap_or_else(|| Path::new(""));
    normalize(&base.join(contents))
}
