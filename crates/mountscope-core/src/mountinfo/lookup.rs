//! Read-only queries over a parsed mount table.
//!
//! Tables are taken as slices in file order, so a later entry for the same
//! mount point shadows an earlier one.

use std::path::{Path, PathBuf};

use mountscope_common::types::MountEntry;

/// Returns the visible mount at `path`, if any.
///
/// Paths are compared by component, so trailing slashes do not matter.
/// Mount points whose bytes are not valid UTF-8 were decoded lossily by the
/// parser and can never match a real path here; reach them through
/// [`find_by_id`] or [`filter_by_type`] instead.
pub fn find_by_mount_point(entries: &[MountEntry], path: impl AsRef<Path>) -> Option<&MountEntry> {
    let path = path.as_ref();
    entries.iter().rev().find(|e| e.mount_point_path() == path)
}

/// Returns the entry with the given mount ID.
pub fn find_by_id(entries: &[MountEntry], mount_id: i64) -> Option<&MountEntry> {
    entries.iter().find(|e| e.mount_id == mount_id)
}

/// Iterates over the direct children of mount `mount_id`.
pub fn children_of(entries: &[MountEntry], mount_id: i64) -> impl Iterator<Item = &MountEntry> {
    entries
        .iter()
        .filter(move |e| e.parent_id == mount_id && e.mount_id != mount_id)
}

/// Iterates over mounts whose filesystem type is exactly `fs_type`.
pub fn filter_by_type<'a>(
    entries: &'a [MountEntry],
    fs_type: &'a str,
) -> impl Iterator<Item = &'a MountEntry> {
    entries.iter().filter(move |e| e.filesystem_type == fs_type)
}

/// Returns the decoded mount points of every `fs_type` mount, in table order.
pub fn mount_points_of_type(entries: &[MountEntry], fs_type: &str) -> Vec<PathBuf> {
    filter_by_type(entries, fs_type)
        .map(MountEntry::mount_point_path)
        .collect()
}
