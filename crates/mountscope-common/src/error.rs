//! Unified error types for the mountscope workspace.
//!
//! Every fallible operation returns [`MountError`]. Callers that need to
//! branch on the failure class use [`MountError::kind`] instead of matching
//! on message text.

use std::num::ParseIntError;
use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type shared across the workspace.
#[derive(Debug, Error)]
pub enum MountError {
    /// The mount table source could not be opened.
    #[error("failed to open mount information at {path}: {source}")]
    SourceOpen {
        /// Path of the mount table that was requested.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A mount table line does not follow the `mountinfo` grammar.
    #[error("invalid mountinfo entry on line {line_number} ({reason}): {line}")]
    Parse {
        /// 1-based line number within the stream.
        line_number: usize,
        /// The raw offending line.
        line: String,
        /// What was wrong with the line.
        #[source]
        reason: ParseFailure,
    },

    /// Reading the mount table stream failed mid-way.
    #[error("failed to read mount information: {source}")]
    StreamRead {
        /// Underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// A file-status or filesystem-status query failed.
    #[error("{op} {path}: {source}")]
    StatusQuery {
        /// Name of the failing operation (`lstat` or `statfs`).
        op: &'static str,
        /// Path the operation was issued against.
        path: PathBuf,
        /// Underlying OS error.
        source: std::io::Error,
        /// Whether the path had already been identified as a mount point
        /// when the query failed.
        mount_point_established: bool,
    },

    /// The operation needs a Linux kernel.
    #[error("unsupported platform: {message}")]
    Unsupported {
        /// Description of the unsupported operation.
        message: String,
    },
}

/// Reason a single `mountinfo` line was rejected.
#[derive(Debug, Error)]
pub enum ParseFailure {
    /// The ` - ` separator must appear exactly once.
    #[error("expected exactly one ' - ' separator, found {found}")]
    SeparatorCount {
        /// Number of separators present.
        found: usize,
    },

    /// Fewer than six fields before the separator.
    #[error("expected at least 6 fields before the separator, found {found}")]
    LeftFieldCount {
        /// Number of fields present.
        found: usize,
    },

    /// Not exactly three fields after the separator.
    #[error("expected 3 fields after the separator, found {found}")]
    RightFieldCount {
        /// Number of fields present.
        found: usize,
    },

    /// A mount or parent identifier is not a base-10 integer.
    #[error("invalid {field} {value:?}")]
    InvalidId {
        /// Which identifier failed (`mount ID` or `parent ID`).
        field: &'static str,
        /// The raw field text.
        value: String,
        /// Integer parse failure.
        source: ParseIntError,
    },
}

/// Coarse classification of a [`MountError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MountErrorKind {
    /// See [`MountError::SourceOpen`].
    SourceOpen,
    /// See [`MountError::Parse`].
    Parse,
    /// See [`MountError::StreamRead`].
    StreamRead,
    /// See [`MountError::StatusQuery`].
    StatusQuery,
    /// See [`MountError::Unsupported`].
    Unsupported,
}

impl MountError {
    /// Returns the classification of this error.
    pub const fn kind(&self) -> MountErrorKind {
        match self {
            Self::SourceOpen { .. } => MountErrorKind::SourceOpen,
            Self::Parse { .. } => MountErrorKind::Parse,
            Self::StreamRead { .. } => MountErrorKind::StreamRead,
            Self::StatusQuery { .. } => MountErrorKind::StatusQuery,
            Self::Unsupported { .. } => MountErrorKind::Unsupported,
        }
    }

    /// Reports whether the failing detector call had already established
    /// that its path is a mount point.
    ///
    /// Only a `statfs` failure after a device change sets this.
    pub const fn is_mount_point(&self) -> bool {
        matches!(
            self,
            Self::StatusQuery {
                mount_point_established: true,
                ..
            }
        )
    }
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, MountError>;
