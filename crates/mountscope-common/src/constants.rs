//! System-wide constants and default paths.

/// Default mount point of the proc filesystem.
pub const DEFAULT_PROC_ROOT: &str = "/proc";

/// Mount table of the calling process.
pub const MOUNTINFO_SELF_PATH: &str = "/proc/self/mountinfo";

/// File name of the per-process mount table below `/proc/<pid>`.
pub const MOUNTINFO_FILE_NAME: &str = "mountinfo";

/// Separator between the variable and fixed halves of a `mountinfo` line.
pub const MOUNTINFO_SEPARATOR: &str = " - ";

/// Minimum number of fields before [`MOUNTINFO_SEPARATOR`].
pub const MOUNTINFO_LEFT_FIELDS: usize = 6;

/// Exact number of fields after [`MOUNTINFO_SEPARATOR`].
pub const MOUNTINFO_RIGHT_FIELDS: usize = 3;

/// Conventional mount point of the BPF filesystem.
pub const BPFFS_PATH: &str = "/sys/fs/bpf";

/// Cgroups v2 unified hierarchy mount point.
pub const CGROUP_V2_PATH: &str = "/sys/fs/cgroup";

/// Superblock magic numbers reported by `statfs(2)` in `f_type`.
///
/// Values come from the kernel's `include/uapi/linux/magic.h` and are the
/// only platform-specific numbers the detector depends on.
pub mod magic {
    use crate::types::FilesystemMagic;

    /// BPF virtual filesystem (`bpffs`).
    pub const BPF_FS: FilesystemMagic = FilesystemMagic::new(0xcafe_4a11);
    /// Cgroups v2 unified hierarchy.
    pub const CGROUP2: FilesystemMagic = FilesystemMagic::new(0x6367_7270);
    /// Cgroups v1 controller hierarchy.
    pub const CGROUP: FilesystemMagic = FilesystemMagic::new(0x0027_e0eb);
    /// Proc filesystem.
    pub const PROC: FilesystemMagic = FilesystemMagic::new(0x9fa0);
    /// Sysfs.
    pub const SYSFS: FilesystemMagic = FilesystemMagic::new(0x6265_6572);
    /// tmpfs.
    pub const TMPFS: FilesystemMagic = FilesystemMagic::new(0x0102_1994);
    /// `OverlayFS`.
    pub const OVERLAYFS: FilesystemMagic = FilesystemMagic::new(0x794c_7630);
    /// debugfs.
    pub const DEBUGFS: FilesystemMagic = FilesystemMagic::new(0x6462_6720);
    /// tracefs.
    pub const TRACEFS: FilesystemMagic = FilesystemMagic::new(0x7472_6163);

    /// Every named magic, paired with the kernel's filesystem type name.
    pub const KNOWN: &[(&str, FilesystemMagic)] = &[
        ("bpf", BPF_FS),
        ("cgroup2", CGROUP2),
        ("cgroup", CGROUP),
        ("proc", PROC),
        ("sysfs", SYSFS),
        ("tmpfs", TMPFS),
        ("overlay", OVERLAYFS),
        ("debugfs", DEBUGFS),
        ("tracefs", TRACEFS),
    ];

    /// Looks up the magic number for a filesystem type name as printed in
    /// `mountinfo`.
    pub fn for_type_name(name: &str) -> Option<FilesystemMagic> {
        KNOWN
            .iter()
            .find(|(known, _)| *known == name)
            .map(|(_, magic)| *magic)
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn well_known_values_match_kernel_headers() {
            assert_eq!(BPF_FS.as_raw(), 0xcafe_4a11);
            assert_eq!(CGROUP2.as_raw(), 0x6367_7270);
        }

        #[test]
        fn for_type_name_resolves_known_names() {
            assert_eq!(for_type_name("cgroup2"), Some(CGROUP2));
            assert_eq!(for_type_name("bpf"), Some(BPF_FS));
            assert_eq!(for_type_name("ext4"), None);
        }
    }
}
