//! Procfs location used to resolve mount tables.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Where the proc filesystem is mounted.
///
/// Tooling that inspects a container from the host, or a host procfs
/// bind-mounted into a sandbox, points `proc_root` elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcfsConfig {
    /// Mount point of the proc filesystem.
    pub proc_root: PathBuf,
}

impl ProcfsConfig {
    /// Creates a configuration rooted at `proc_root`.
    pub fn new(proc_root: impl Into<PathBuf>) -> Self {
        Self {
            proc_root: proc_root.into(),
        }
    }

    /// Returns the mount table path for `pid`, or for the calling process
    /// when `pid` is `None`.
    pub fn mountinfo_path(&self, pid: Option<u32>) -> PathBuf {
        let process = pid.map_or_else(|| "self".to_string(), |pid| pid.to_string());
        self.proc_root
            .join(process)
            .join(crate::constants::MOUNTINFO_FILE_NAME)
    }
}

impl Default for ProcfsConfig {
    fn default() -> Self {
        Self::new(crate::constants::DEFAULT_PROC_ROOT)
    }
}
