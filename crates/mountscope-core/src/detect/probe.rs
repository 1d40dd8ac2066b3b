//! Status queries against the running kernel.

use std::io;
use std::path::Path;

use mountscope_common::types::FilesystemMagic;

use super::StatusProbe;

/// [`StatusProbe`] backed by `lstat(2)` and `statfs(2)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemProbe;

#[cfg(target_os = "linux")]
impl StatusProbe for SystemProbe {
    fn lstat_device(&self, path: &Path) -> io::Result<u64> {
        let stat = nix::sys::stat::lstat(path)?;
        Ok(stat.st_dev)
    }

    fn statfs_type(&self, path: &Path) -> io::Result<FilesystemMagic> {
        let stat = nix::sys::statfs::statfs(path)?;
        // Superblock magics are 32-bit; `f_type` width and signedness vary by libc.
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let raw = stat.filesystem_type().0 as u32;
        Ok(FilesystemMagic::new(i64::from(raw)))
    }
}

#[cfg(not(target_os = "linux"))]
impl StatusProbe for SystemProbe {
    fn lstat_device(&self, _path: &Path) -> io::Result<u64> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "Linux required for mount point detection",
        ))
    }

    fn statfs_type(&self, _path: &Path) -> io::Result<FilesystemMagic> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "Linux required for mount point detection",
        ))
    }
}
