//! Parser for the kernel's `/proc/<pid>/mountinfo` format.
//!
//! Each line describes one mount:
//!
//! ```text
//! 36 35 98:0 /mnt1 /mnt2 rw,noatime master:1 - ext3 /dev/root rw,errors=continue
//! (1)(2)(3)   (4)   (5)      (6)      (7)   (8) (9)   (10)         (11)
//! ```
//!
//! Fields 1-6 are fixed, (7) is a variable number of optional fields, (8) is
//! the ` - ` separator and fields 9-11 are fixed again.

pub mod lookup;
pub mod provider;

use std::io::BufRead;

use mountscope_common::constants::{
    MOUNTINFO_LEFT_FIELDS, MOUNTINFO_RIGHT_FIELDS, MOUNTINFO_SEPARATOR,
};
use mountscope_common::error::{MountError, ParseFailure, Result};
use mountscope_common::types::MountEntry;

pub use self::provider::{
    get_mount_table, get_mount_table_for_pid, get_mount_table_with, read_mount_table,
};

/// Parses a complete mount table from `reader`.
///
/// Entries are returned in file order. The first malformed line aborts the
/// whole parse and nothing parsed so far is returned. An empty stream yields
/// an empty table.
///
/// # Errors
///
/// Returns [`MountError::Parse`] for a line that violates the grammar and
/// [`MountError::StreamRead`] if reading from `reader` fails.
pub fn parse_mount_table<R: BufRead>(mut reader: R) -> Result<Vec<MountEntry>> {
    let mut entries = Vec::new();
    let mut buf = Vec::new();
    let mut line_number = 0;

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        line_number += 1;

        let line = String::from_utf8_lossy(trim_line_ending(&buf));
        let entry = parse_line(&line).map_err(|reason| MountError::Parse {
            line_number,
            line: line.into_owned(),
            reason,
        })?;
        entries.push(entry);
    }

    tracing::debug!(entries = entries.len(), "parsed mount table");
    Ok(entries)
}

/// Parses mount table text held in memory.
///
/// # Errors
///
/// Returns [`MountError::Parse`] for the first malformed line.
pub fn parse_mount_table_str(text: &str) -> Result<Vec<MountEntry>> {
    parse_mount_table(text.as_bytes())
}

/// Parses a single `mountinfo` line without its trailing newline.
///
/// # Errors
///
/// Returns the [`ParseFailure`] describing why the line was rejected.
pub fn parse_line(line: &str) -> std::result::Result<MountEntry, ParseFailure> {
    let halves: Vec<&str> = line.split(MOUNTINFO_SEPARATOR).collect();
    let [left, right] = halves.as_slice() else {
        return Err(ParseFailure::SeparatorCount {
            found: halves.len() - 1,
        });
    };

    let left: Vec<&str> = left.split(' ').collect();
    if left.len() < MOUNTINFO_LEFT_FIELDS {
        return Err(ParseFailure::LeftFieldCount { found: left.len() });
    }
    let right: Vec<&str> = right.split(' ').collect();
    if right.len() != MOUNTINFO_RIGHT_FIELDS {
        return Err(ParseFailure::RightFieldCount { found: right.len() });
    }

    let (fixed, optional) = left.split_at(MOUNTINFO_LEFT_FIELDS);

    Ok(MountEntry {
        mount_id: parse_id("mount ID", fixed[0])?,
        parent_id: parse_id("parent ID", fixed[1])?,
        device_id: fixed[2].to_owned(),
        root: fixed[3].to_owned(),
        mount_point: fixed[4].to_owned(),
        mount_options: fixed[5].to_owned(),
        optional_fields: optional.iter().map(|f| (*f).to_owned()).collect(),
        filesystem_type: right[0].to_owned(),
        mount_source: right[1].to_owned(),
        super_options: right[2].to_owned(),
    })
}

fn parse_id(field: &'static str, value: &str) -> std::result::Result<i64, ParseFailure> {
    value.parse().map_err(|source| ParseFailure::InvalidId {
        field,
        value: value.to_owned(),
        source,
    })
}

fn trim_line_ending(buf: &[u8]) -> &[u8] {
    let buf = buf.strip_suffix(b"\n").unwrap_or(buf);
    buf.strip_suffix(b"\r").unwrap_or(buf)
}
