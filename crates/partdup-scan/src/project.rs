//! Project inference from directory structure.

use std::path::{Component, Path};

use compact_str::CompactString;

use partdup_core::UNKNOWN_PROJECT;

/// Infer the project a file belongs to.
///
/// The first directory below `root` names the project. Files directly
/// inside `root`, and paths outside it, belong to [`UNKNOWN_PROJECT`].
pub fn infer_project(path: &Path, root: &Path) -> CompactString {
    let Ok(relative) = path.strip_prefix(root) else {
        return CompactString::new(UNKNOWN_PROJECT);
    };

    let parts: Vec<_> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part),
            _ => None,
        })
        .collect();

    match parts.as_slice() {
        [project, _, ..] => CompactString::new(project.to_string_lossy()),
        _ => CompactString::new(UNKNOWN_PROJECT),
    }
}
