//! # mountscope-core
//!
//! Mount namespace inspection for container and sandbox tooling.
//!
//! This crate provides:
//! - **Mount tables**: a parser for `/proc/<pid>/mountinfo` and readers
//!   for the calling process or any other process.
//! - **Lookups**: queries over a parsed table by mount point, ID, or type.
//! - **Detection**: `lstat(2)`/`statfs(2)` based checks for whether a path
//!   is a mount point of a given filesystem type.
//!
//! Nothing here caches state between calls. Table snapshots and detector
//! results are independent, so callers that need both to agree must
//! coordinate that themselves.

pub mod detect;
pub mod mountinfo;

pub use detect::{StatusProbe, SystemProbe, is_mount_fs, is_mount_fs_with};
pub use mountinfo::{get_mount_table, parse_mount_table};
