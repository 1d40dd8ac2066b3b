//! Integration tests for mount table parsing and reading.
//!
//! Covers:
//! 1. Parsing well-formed tables (field mapping, optional fields, order)
//! 2. Rejecting malformed tables as a whole
//! 3. Stream and source failures
//! 4. Lookups over a parsed table

#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

use std::io::{self, BufReader, Read};

use mountscope_common::error::{MountError, MountErrorKind, ParseFailure};
use mountscope_common::types::Propagation;
use mountscope_core::mountinfo::{self, lookup};

const HOST_TABLE: &str = "\
17 1 8:1 / / rw,relatime shared:1 - ext4 /dev/sda1 rw,errors=remount-ro
18 17 0:17 / /sys rw,nosuid,nodev,noexec,relatime shared:6 - sysfs sysfs rw
19 17 0:18 / /proc rw,nosuid,nodev,noexec,relatime shared:12 - proc proc rw
20 18 0:26 / /sys/fs/cgroup rw,nosuid,nodev,noexec,relatime shared:9 - cgroup2 cgroup2 rw,nsdelegate,memory_recursiveprot
21 18 0:27 / /sys/fs/bpf rw,nosuid,nodev,noexec,relatime shared:10 - bpf bpf rw,mode=700
22 17 0:44 / /var/lib/containers/overlay/merged rw,relatime - overlay overlay rw,lowerdir=/l1:/l2,upperdir=/u,workdir=/w
23 17 0:50 /export /srv/nfs rw master:3 propagate_from:2 - nfs4 server:/export rw,vers=4.2
";

// ── Parsing ──────────────────────────────────────────────────────────

#[test]
fn host_table_parses_in_file_order() {
    let entries = mountinfo::parse_mount_table_str(HOST_TABLE).expect("host table parses");
    let ids: Vec<i64> = entries.iter().map(|e| e.mount_id).collect();
    assert_eq!(ids, vec![17, 18, 19, 20, 21, 22, 23]);

    let root = &entries[0];
    assert_eq!(root.mount_id, 17);
    assert_eq!(root.parent_id, 1);
    assert_eq!(root.device_id, "8:1");
    assert_eq!(root.root, "/");
    assert_eq!(root.mount_point, "/");
    assert_eq!(root.mount_options, "rw,relatime");
    assert_eq!(root.optional_fields, vec!["shared:1"]);
    assert_eq!(root.filesystem_type, "ext4");
    assert_eq!(root.mount_source, "/dev/sda1");
    assert_eq!(root.super_options, "rw,errors=remount-ro");
}

#[test]
fn optional_field_counts_are_preserved() {
    let entries = mountinfo::parse_mount_table_str(HOST_TABLE).expect("host table parses");
    assert!(entries[5].optional_fields.is_empty());
    assert_eq!(entries[6].optional_fields, vec!["master:3", "propagate_from:2"]);
    assert_eq!(
        entries[6].propagation(),
        vec![Propagation::Master(3), Propagation::PropagateFrom(2)]
    );
    assert_eq!(entries[6].root, "/export");
}

#[test]
fn empty_stream_yields_empty_table() {
    let entries = mountinfo::parse_mount_table(io::empty()).expect("empty input");
    assert!(entries.is_empty());
}

#[test]
fn table_without_trailing_newline_parses() {
    let entries = mountinfo::parse_mount_table_str("19 17 0:18 / /proc rw - proc proc rw")
        .expect("single line");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].super_options, "rw");
}

// ── Rejection ────────────────────────────────────────────────────────

#[test]
fn malformed_middle_line_fails_whole_parse() {
    let text = "\
17 1 8:1 / / rw - ext4 /dev/sda1 rw
18 17 0:17 / /sys rw - sysfs sysfs rw
19 17 0:18 / /proc rw proc proc rw
20 18 0:26 / /sys/fs/cgroup rw - cgroup2 cgroup2 rw
21 18 0:27 / /sys/fs/bpf rw - bpf bpf rw
";
    let err = mountinfo::parse_mount_table_str(text).unwrap_err();
    match err {
        MountError::Parse {
            line_number,
            line,
            reason,
        } => {
            assert_eq!(line_number, 3);
            assert_eq!(line, "19 17 0:18 / /proc rw proc proc rw");
            assert!(matches!(reason, ParseFailure::SeparatorCount { found: 0 }));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn every_grammar_violation_is_a_parse_error() {
    let bad_lines = [
        "17 1 8:1 / / rw - ext4 /dev/sda1",
        "17 1 8:1 / / rw - ext4 /dev/sda1 rw extra",
        "17 1 8:1 / / - ext4 /dev/sda1 rw",
        "17 1 8:1 / / rw - ext4 - /dev/sda1 rw",
        "seventeen 1 8:1 / / rw - ext4 /dev/sda1 rw",
        "17 one 8:1 / / rw - ext4 /dev/sda1 rw",
        "99999999999999999999 1 8:1 / / rw - ext4 /dev/sda1 rw",
    ];
    for line in bad_lines {
        let err = mountinfo::parse_mount_table_str(line).unwrap_err();
        assert_eq!(err.kind(), MountErrorKind::Parse, "line: {line}");
        assert!(err.to_string().contains(line), "message names the line: {err}");
    }
}

// ── Sources ──────────────────────────────────────────────────────────

/// Yields `prefix`, then fails.
struct FailingReader {
    prefix: io::Cursor<Vec<u8>>,
}

impl Read for FailingReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.prefix.read(buf)?;
        if n == 0 {
            return Err(io::Error::other("device went away"));
        }
        Ok(n)
    }
}

#[test]
fn read_failure_mid_stream_aborts() {
    let reader = FailingReader {
        prefix: io::Cursor::new(b"17 1 8:1 / / rw - ext4 /dev/sda1 rw\n".to_vec()),
    };
    let err = mountinfo::parse_mount_table(BufReader::new(reader)).unwrap_err();
    assert_eq!(err.kind(), MountErrorKind::StreamRead);
    assert!(err.to_string().contains("device went away"));
}

#[test]
fn file_source_roundtrip() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("mountinfo");
    std::fs::write(&path, HOST_TABLE).expect("write fixture");

    let entries = mountinfo::read_mount_table(&path).expect("fixture parses");
    assert_eq!(entries.len(), 7);
}

#[test]
fn missing_source_is_distinct_from_parse_failure() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = mountinfo::read_mount_table(&dir.path().join("absent")).unwrap_err();
    assert_eq!(err.kind(), MountErrorKind::SourceOpen);
    assert!(err.to_string().contains("absent"));
}

#[cfg(target_os = "linux")]
#[test]
fn own_pid_table_matches_self_table_shape() {
    let by_pid = mountinfo::get_mount_table_for_pid(std::process::id()).expect("pid table");
    assert!(lookup::find_by_mount_point(&by_pid, "/").is_some());
}

// ── Lookups ──────────────────────────────────────────────────────────

#[test]
fn lookups_over_host_table() {
    let entries = mountinfo::parse_mount_table_str(HOST_TABLE).expect("host table parses");

    let bpf = lookup::find_by_mount_point(&entries, "/sys/fs/bpf").expect("bpffs mounted");
    assert_eq!(bpf.filesystem_type, "bpf");

    let sys_children: Vec<&str> = lookup::children_of(&entries, 18)
        .map(|e| e.mount_point.as_str())
        .collect();
    assert_eq!(sys_children, vec!["/sys/fs/cgroup", "/sys/fs/bpf"]);

    assert_eq!(lookup::filter_by_type(&entries, "overlay").count(), 1);
}

#[test]
fn parsed_table_serializes_to_json() {
    let entries = mountinfo::parse_mount_table_str(HOST_TABLE).expect("host table parses");
    let json = serde_json::to_value(&entries).expect("serialize");
    assert_eq!(json[3]["filesystem_type"], "cgroup2");
    assert_eq!(json[0]["optional_fields"][0], "shared:1");
}
