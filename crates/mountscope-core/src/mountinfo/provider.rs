//! Reads mount tables from procfs.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use mountscope_common::config::ProcfsConfig;
use mountscope_common::constants::MOUNTINFO_SELF_PATH;
use mountscope_common::error::{MountError, Result};
use mountscope_common::types::MountEntry;

/// Returns the mount table of the calling process.
///
/// Reads `/proc/self/mountinfo`.
///
/// # Errors
///
/// Returns [`MountError::SourceOpen`] if the file cannot be opened, or any
/// error from [`super::parse_mount_table`].
pub fn get_mount_table() -> Result<Vec<MountEntry>> {
    read_mount_table(Path::new(MOUNTINFO_SELF_PATH))
}

/// Returns the mount table as seen by process `pid`.
///
/// # Errors
///
/// Returns [`MountError::SourceOpen`] if the process does not exist or its
/// mount table is not readable, or any parse error.
pub fn get_mount_table_for_pid(pid: u32) -> Result<Vec<MountEntry>> {
    get_mount_table_with(&ProcfsConfig::default(), Some(pid))
}

/// Returns the mount table of `pid` (or of the calling process) below the
/// configured procfs root.
///
/// # Errors
///
/// Returns [`MountError::SourceOpen`] if the resolved file cannot be opened,
/// or any parse error.
pub fn get_mount_table_with(config: &ProcfsConfig, pid: Option<u32>) -> Result<Vec<MountEntry>> {
    read_mount_table(&config.mountinfo_path(pid))
}

/// Opens `path` and parses it as a mount table.
///
/// # Errors
///
/// Returns [`MountError::SourceOpen`] if `path` cannot be opened, or any
/// error from [`super::parse_mount_table`].
pub fn read_mount_table(path: &Path) -> Result<Vec<MountEntry>> {
    let file = File::open(path).map_err(|e| MountError::SourceOpen {
        path: path.to_path_buf(),
        source: e,
    })?;
    tracing::debug!(path = %path.display(), "reading mount table");
    super::parse_mount_table(BufReader::new(file))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use mountscope_common::error::MountErrorKind;

    use super::*;

    #[test]
    fn read_mount_table_reports_missing_source() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("mountinfo");
        let err = read_mount_table(&path).unwrap_err();
        assert_eq!(err.kind(), MountErrorKind::SourceOpen);
        match err {
            MountError::SourceOpen { path: reported, .. } => assert_eq!(reported, path),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn get_mount_table_with_resolves_pid_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        let pid_dir = dir.path().join("4242");
        std::fs::create_dir_all(&pid_dir).expect("create pid dir");
        let mut file = File::create(pid_dir.join("mountinfo")).expect("create mountinfo");
        writeln!(file, "1 0 0:2 / / rw - rootfs rootfs rw").expect("write");
        writeln!(file, "20 1 0:3 / /proc rw master:1 - proc proc rw").expect("write");
        drop(file);

        let config = ProcfsConfig::new(dir.path());
        let entries = get_mount_table_with(&config, Some(4242)).expect("parse table");
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].mount_point, "/proc");
        assert_eq!(entries[1].optional_fields, vec!["master:1"]);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn get_mount_table_reads_live_table() {
        let entries = get_mount_table().expect("live mount table parses");
        assert!(!entries.is_empty());
        assert!(entries.iter().any(|e| e.mount_point_path() == Path::new("/")));
    }
}
