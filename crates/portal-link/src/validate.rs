//! Shape checks for announcements before anything touches the filesystem.
//!
//! Strict policy: the first problem found rejects the whole announcement.
use std::path::Path;

use portal_mesh::Announcement;

use crate::paths;
use crate::LinkError;

/// Characters permitted in a logical package name (plus ASCII alphanumerics).
const NAME_EXTRA_CHARS: &[char] = &['_', '-', '/', '@'];

fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || NAME_EXTRA_CHARS.contains(&c))
}

/// Check name, root and link entries of an announcement.
pub fn validate(announcement: &Announcement) -> Result<(), LinkError> {
    if !is_valid_name(&announcement.name) {
        return Err(LinkError::invalid(format!(
            "{:?} is not a valid package name",
            announcement.name
        )));
    }
    if !announcement.root.is_absolute() {
        return Err(LinkError::invalid(format!(
            "root {:?} is not an absolute path",
            announcement.root
        )));
    }
    if let Some(bad) = announcement
        .link
        .iter()
        .find(|link| !paths::is_forward(Path::new(link)))
    {
        return Err(LinkError::invalid(format!(
            "link {bad:?} is not a forward relative path"
        )));
    }
    if let Some(bad) = announcement
        .link
        .iter()
        .find(|link| paths::normalize(Path::new(link)).as_os_str().is_empty())
    {
        // Would replace the dependency directory itself
        return Err(LinkError::invalid(format!(
            "link {bad:?} does not name anything below the package root"
        )));
    }
    Ok(())
}
