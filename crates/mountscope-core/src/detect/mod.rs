//! Mount point detection by device comparison.
//!
//! A path is a mount point when `lstat(2)` reports a different device for it
//! than for its parent directory. Once that is established, `statfs(2)`
//! tells which filesystem is mounted there.
//!
//! Two limitations follow from the device comparison:
//! - a bind mount of a directory from the same device as its new parent is
//!   reported as not mounted;
//! - the namespace root `/` is its own parent, so it is always reported as
//!   not mounted.
//!
//! The parent is taken from the path's components, so a trailing slash is
//! ignored: `/mnt/usb/` is compared with `/mnt`, the same as `/mnt/usb`.

pub mod probe;

use std::io;
use std::path::{Path, PathBuf};

use mountscope_common::constants::{BPFFS_PATH, CGROUP_V2_PATH, magic};
use mountscope_common::error::{MountError, Result};
use mountscope_common::types::{FilesystemMagic, MountStatus};

pub use self::probe::SystemProbe;

/// Source of the file-status and filesystem-status data the detector needs.
pub trait StatusProbe: Send + Sync {
    /// Returns the device ID of `path` without following symlinks.
    ///
    /// # Errors
    ///
    /// Returns the OS error; `ErrorKind::NotFound` when `path` does not exist.
    fn lstat_device(&self, path: &Path) -> io::Result<u64>;

    /// Returns the superblock magic of the filesystem containing `path`.
    ///
    /// # Errors
    ///
    /// Returns the OS error.
    fn statfs_type(&self, path: &Path) -> io::Result<FilesystemMagic>;
}

/// Checks whether `path` is a mount point and whether its filesystem is of
/// type `expected`.
///
/// A nonexistent `path` is not a mount point. See the module documentation
/// for bind mounts and `/`.
///
/// # Errors
///
/// Returns [`MountError::StatusQuery`] if a status query fails for any
/// reason other than `path` not existing. A `statfs` failure is reported
/// after the device check succeeded, so [`MountError::is_mount_point`] is
/// `true` for it.
#[cfg(target_os = "linux")]
pub fn is_mount_fs(expected: FilesystemMagic, path: impl AsRef<Path>) -> Result<MountStatus> {
    is_mount_fs_with(&SystemProbe, expected, path)
}

/// Stub for non-Linux platforms.
///
/// # Errors
///
/// Always returns an error. Mount point detection requires Linux.
#[cfg(not(target_os = "linux"))]
pub fn is_mount_fs(_expected: FilesystemMagic, _path: impl AsRef<Path>) -> Result<MountStatus> {
    Err(MountError::Unsupported {
        message: "Linux required for mount point detection".into(),
    })
}

/// Same as [`is_mount_fs`] with an explicit [`StatusProbe`].
///
/// # Errors
///
/// See [`is_mount_fs`].
pub fn is_mount_fs_with<P>(
    probe: &P,
    expected: FilesystemMagic,
    path: impl AsRef<Path>,
) -> Result<MountStatus>
where
    P: StatusProbe + ?Sized,
{
    let path = path.as_ref();

    let device = match probe.lstat_device(path) {
        Ok(device) => device,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "path does not exist");
            return Ok(MountStatus::NOT_MOUNTED);
        }
        Err(e) => return Err(status_error("lstat", path, e, false)),
    };

    let parent = lexical_parent(path);
    let parent_device = probe
        .lstat_device(&parent)
        .map_err(|e| status_error("lstat", &parent, e, false))?;
    if device == parent_device {
        tracing::debug!(path = %path.display(), device, "same device as parent");
        return Ok(MountStatus::NOT_MOUNTED);
    }

    let fs_type = probe
        .statfs_type(path)
        .map_err(|e| status_error("statfs", path, e, true))?;
    tracing::debug!(
        path = %path.display(),
        fs_type = %fs_type,
        expected = %expected,
        "mount point found"
    );
    Ok(MountStatus::mounted(fs_type == expected))
}

/// Checks for a BPF filesystem mounted at `path`.
///
/// # Errors
///
/// See [`is_mount_fs`].
pub fn is_bpffs_mounted(path: impl AsRef<Path>) -> Result<MountStatus> {
    is_mount_fs(magic::BPF_FS, path)
}

/// Checks for a cgroup v2 hierarchy mounted at `path`.
///
/// # Errors
///
/// See [`is_mount_fs`].
pub fn is_cgroup2_mounted(path: impl AsRef<Path>) -> Result<MountStatus> {
    is_mount_fs(magic::CGROUP2, path)
}

/// Checks for a BPF filesystem at its conventional mount point,
/// `/sys/fs/bpf`.
///
/// # Errors
///
/// See [`is_mount_fs`].
pub fn bpffs_status() -> Result<MountStatus> {
    is_bpffs_mounted(BPFFS_PATH)
}

/// Checks for the cgroup v2 unified hierarchy at `/sys/fs/cgroup`.
///
/// # Errors
///
/// See [`is_mount_fs`].
pub fn cgroup2_status() -> Result<MountStatus> {
    is_cgroup2_mounted(CGROUP_V2_PATH)
}

/// Parent directory of `path` computed from its text alone.
fn lexical_parent(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if parent.as_os_str().is_empty() => PathBuf::from("."),
        Some(parent) => parent.to_path_buf(),
        None => path.to_path_buf(),
    }
}

fn status_error(
    op: &'static str,
    path: &Path,
    source: io::Error,
    mount_point_established: bool,
) -> MountError {
    MountError::StatusQuery {
        op,
        path: path.to_path_buf(),
        source,
        mount_point_established,
    }
}
