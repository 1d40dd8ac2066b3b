//! Domain primitive types used across the mountscope workspace.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Filesystem type identifier as reported by `statfs(2)` in `f_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FilesystemMagic(i64);

impl FilesystemMagic {
    /// Wraps a raw superblock magic number.
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Returns the raw magic number.
    pub const fn as_raw(self) -> i64 {
        self.0
    }
}

impl fmt::Display for FilesystemMagic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// Outcome of a mount point check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MountStatus {
    /// The path sits on a different device than its parent directory.
    pub is_mount_point: bool,
    /// The mounted filesystem has the expected magic number.
    pub type_matches: bool,
}

impl MountStatus {
    /// The path is not a mount point.
    pub const NOT_MOUNTED: Self = Self {
        is_mount_point: false,
        type_matches: false,
    };

    /// The path is a mount point; `type_matches` reports the type check.
    pub const fn mounted(type_matches: bool) -> Self {
        Self {
            is_mount_point: true,
            type_matches,
        }
    }

    /// The path is a mount point of the expected filesystem type.
    pub const fn is_expected_mount(self) -> bool {
        self.is_mount_point && self.type_matches
    }
}

/// Mount propagation attribute decoded from a `mountinfo` optional field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Propagation {
    /// `shared:N`: member of peer group N.
    Shared(u64),
    /// `master:N`: slave to peer group N.
    Master(u64),
    /// `propagate_from:N`: receives from peer group N (nearest dominant).
    PropagateFrom(u64),
    /// `unbindable`: cannot be bind mounted.
    Unbindable,
}

impl Propagation {
    /// Decodes a single optional field. Unknown tags yield `None`.
    pub fn parse(field: &str) -> Option<Self> {
        if field == "unbindable" {
            return Some(Self::Unbindable);
        }
        let (tag, value) = field.split_once(':')?;
        let group = value.parse().ok()?;
        match tag {
            "shared" => Some(Self::Shared(group)),
            "master" => Some(Self::Master(group)),
            "propagate_from" => Some(Self::PropagateFrom(group)),
            _ => None,
        }
    }
}

impl fmt::Display for Propagation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Shared(id) => write!(f, "shared:{id}"),
            Self::Master(id) => write!(f, "master:{id}"),
            Self::PropagateFrom(id) => write!(f, "propagate_from:{id}"),
            Self::Unbindable => write!(f, "unbindable"),
        }
    }
}

/// One line of `/proc/<pid>/mountinfo`.
///
/// Field text is stored exactly as the kernel printed it. Use
/// [`MountEntry::mount_point_path`] and [`MountEntry::root_path`] for
/// decoded paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MountEntry {
    /// Unique identifier of this mount.
    pub mount_id: i64,
    /// Identifier of the parent mount (self-referential for the root).
    pub parent_id: i64,
    /// `major:minor` of the backing device.
    pub device_id: String,
    /// Directory within the filesystem that forms the root of this mount.
    pub root: String,
    /// Mount point relative to the process root.
    pub mount_point: String,
    /// Per-mount options.
    pub mount_options: String,
    /// Tagged optional fields such as `shared:1`.
    pub optional_fields: Vec<String>,
    /// Filesystem type, possibly `type.subtype`.
    pub filesystem_type: String,
    /// Filesystem-specific source.
    pub mount_source: String,
    /// Per-superblock options.
    pub super_options: String,
}

impl MountEntry {
    /// Returns the mount point with kernel octal escapes decoded.
    pub fn mount_point_path(&self) -> PathBuf {
        PathBuf::from(unescape_octal(&self.mount_point))
    }

    /// Returns the mount root with kernel octal escapes decoded.
    pub fn root_path(&self) -> PathBuf {
        PathBuf::from(unescape_octal(&self.root))
    }

    /// Returns the filesystem type without its subtype.
    pub fn filesystem_base_type(&self) -> &str {
        self.filesystem_type
            .split_once('.')
            .map_or(self.filesystem_type.as_str(), |(base, _)| base)
    }

    /// Returns the subtype part of `type.subtype`, if present.
    pub fn filesystem_subtype(&self) -> Option<&str> {
        self.filesystem_type.split_once('.').map(|(_, sub)| sub)
    }

    /// Returns the `statfs(2)` magic for this entry's filesystem type, when
    /// it is one of the named filesystems in [`crate::constants::magic`].
    pub fn filesystem_magic(&self) -> Option<FilesystemMagic> {
        crate::constants::magic::for_type_name(self.filesystem_base_type())
    }

    /// Decodes the propagation attributes carried in the optional fields.
    pub fn propagation(&self) -> Vec<Propagation> {
        self.optional_fields
            .iter()
            .filter_map(|field| Propagation::parse(field))
            .collect()
    }

    /// Checks whether `option` is one of the per-mount options.
    pub fn has_mount_option(&self, option: &str) -> bool {
        self.mount_options.split(',').any(|o| o == option)
    }

    /// Checks whether the mount is read-only.
    pub fn is_read_only(&self) -> bool {
        self.has_mount_option("ro")
    }
}

/// Decodes `\ooo` octal escapes the kernel applies to space, tab, newline
/// and backslash in mount paths.
pub fn unescape_octal(raw: &str) -> String {
    if !raw.contains('\\') {
        return raw.to_owned();
    }
    let bytes = raw.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'\\' {
            if let Some(byte) = decode_octal(&bytes[i + 1..]) {
                out.push(byte);
                i += 4;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn decode_octal(digits: &[u8]) -> Option<u8> {
    let digits = digits.get(..3)?;
    let mut value: u16 = 0;
    for &d in digits {
        if !(b'0'..=b'7').contains(&d) {
            return None;
        }
        value = value * 8 + u16::from(d - b'0');
    }
    u8::try_from(value).ok()
}
