//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of Bfboot.
//! The Bfboot project belongs to the Dunimd project team.

use std::fs;
use std::path::{Path, PathBuf};

use bfboot::errors::BfError;
use bfboot::log::{BfCLogLevel, BfCLogger};
use bfboot::update::{apply_pending_update, staged_update_exists, BfUpdateOutcome};
use proptest::prelude::*;
use tempfile::{tempdir, TempDir};

struct Scripts {
    _dir: TempDir,
    staged: PathBuf,
    live: PathBuf,
}

fn scripts() -> Scripts {
    let dir = tempdir().expect("tmp");
    let scripts = dir.path().join("Scripts");
    fs::create_dir_all(&scripts).expect("scripts dir");
    Scripts {
        staged: scripts.join("_bflib.dll"),
        live: scripts.join("bflib.dll"),
        _dir: dir,
    }
}

fn pe_bytes(len: usize) -> Vec<u8> {
    let mut bytes = vec![0x4D, 0x5A];
    bytes.extend((2..len).map(|i| (i % 251) as u8));
    bytes
}

fn read(path: &Path) -> Vec<u8> {
    fs::read(path).expect("read")
}

#[test]
fn test_no_staged_file_is_a_noop() {
    let s = scripts();
    fs::write(&s.live, b"old extension").unwrap();
    let (logger, memory) = BfCLogger::BfFMemory(BfCLogLevel::Debug);

    let outcome = apply_pending_update(&s.staged, &s.live, &logger);

    assert_eq!(outcome, BfUpdateOutcome::Skipped);
    assert_eq!(read(&s.live), b"old extension");
    assert!(memory.BfFLines().is_empty());
}

#[test]
fn test_staged_update_replaces_live_extension() {
    let s = scripts();
    let staged = pe_bytes(100);
    fs::write(&s.staged, &staged).unwrap();
    fs::write(&s.live, vec![0xAA; 50]).unwrap();
    let (logger, memory) = BfCLogger::BfFMemory(BfCLogLevel::Info);

    let outcome = apply_pending_update(&s.staged, &s.live, &logger);

    match outcome {
        BfUpdateOutcome::Applied {
            bytes,
            digest,
            staged_removed,
        } => {
            assert_eq!(bytes, 100);
            assert_eq!(digest, blake3::hash(&staged).to_hex().to_string());
            assert!(staged_removed);
        }
        other => panic!("expected applied, got {other:?}"),
    }
    assert_eq!(read(&s.live), staged);
    assert!(!s.staged.exists());
    assert!(memory.BfFContains("installed updated"));
}

#[test]
fn test_install_creates_live_file_when_missing() {
    let s = scripts();
    fs::write(&s.staged, pe_bytes(16)).unwrap();
    let (logger, _memory) = BfCLogger::BfFMemory(BfCLogLevel::Info);

    let outcome = apply_pending_update(&s.staged, &s.live, &logger);

    assert!(outcome.is_applied());
    assert_eq!(read(&s.live), pe_bytes(16));
}

#[test]
fn test_empty_staged_file_is_rejected() {
    let s = scripts();
    fs::write(&s.staged, b"").unwrap();
    fs::write(&s.live, b"old extension").unwrap();
    let (logger, memory) = BfCLogger::BfFMemory(BfCLogLevel::Info);

    let outcome = apply_pending_update(&s.staged, &s.live, &logger);

    assert!(matches!(outcome.error(), Some(BfError::EmptyRead { .. })));
    assert_eq!(read(&s.live), b"old extension");
    assert!(s.staged.exists());
    assert!(memory.BfFContains("could not install updated extension"));
}

#[test]
fn test_unwritable_live_path_keeps_staged_file() {
    let s = scripts();
    fs::write(&s.staged, pe_bytes(64)).unwrap();
    // A directory in place of the live binary cannot be opened for writing.
    fs::create_dir(&s.live).unwrap();
    fs::write(s.live.join("marker"), b"keep").unwrap();
    let (logger, memory) = BfCLogger::BfFMemory(BfCLogLevel::Info);

    let outcome = apply_pending_update(&s.staged, &s.live, &logger);

    assert!(matches!(outcome.error(), Some(BfError::WriteOpen { .. })));
    assert_eq!(read(&s.staged), pe_bytes(64));
    assert!(s.live.is_dir());
    assert_eq!(read(&s.live.join("marker")), b"keep");
    assert!(memory.BfFContains("could not install updated extension"));
}

#[test]
fn test_unreadable_staged_path_reports_read_error() {
    let s = scripts();
    fs::create_dir(&s.staged).unwrap();
    fs::write(&s.live, b"old extension").unwrap();
    let (logger, _memory) = BfCLogger::BfFMemory(BfCLogLevel::Info);

    let outcome = apply_pending_update(&s.staged, &s.live, &logger);

    assert!(matches!(outcome.error(), Some(BfError::Read { .. })));
    assert!(s.staged.is_dir());
    assert_eq!(read(&s.live), b"old extension");
}

#[test]
fn test_install_without_temp_file_writes_in_place() {
    let s = scripts();
    fs::write(&s.staged, pe_bytes(48)).unwrap();
    fs::write(&s.live, b"old extension").unwrap();
    let mut tmp = s.live.clone().into_os_string();
    tmp.push(".tmp");
    fs::create_dir(&tmp).unwrap();
    let (logger, _memory) = BfCLogger::BfFMemory(BfCLogLevel::Info);

    let outcome = apply_pending_update(&s.staged, &s.live, &logger);

    assert!(outcome.is_applied());
    assert_eq!(read(&s.live), pe_bytes(48));
    assert!(!s.staged.exists());
}

#[cfg(unix)]
#[test]
fn test_install_keeps_live_permissions() {
    use std::os::unix::fs::PermissionsExt;

    let s = scripts();
    fs::write(&s.staged, pe_bytes(24)).unwrap();
    fs::write(&s.live, b"old extension").unwrap();
    fs::set_permissions(&s.live, fs::Permissions::from_mode(0o750)).unwrap();
    let (logger, _memory) = BfCLogger::BfFMemory(BfCLogLevel::Info);

    assert!(apply_pending_update(&s.staged, &s.live, &logger).is_applied());

    let mode = fs::metadata(&s.live).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o750);
    assert_eq!(read(&s.live), pe_bytes(24));
}

#[test]
fn test_second_run_without_staged_file_is_a_noop() {
    let s = scripts();
    fs::write(&s.staged, pe_bytes(32)).unwrap();
    fs::write(&s.live, b"old").unwrap();
    let (logger, _memory) = BfCLogger::BfFMemory(BfCLogLevel::Info);

    assert!(apply_pending_update(&s.staged, &s.live, &logger).is_applied());
    let after_first = read(&s.live);
    assert!(apply_pending_update(&s.staged, &s.live, &logger).is_skipped());
    assert!(apply_pending_update(&s.staged, &s.live, &logger).is_skipped());
    assert_eq!(read(&s.live), after_first);
}

#[test]
fn test_probe_sees_only_existing_files() {
    let s = scripts();
    assert!(!staged_update_exists(&s.staged));
    fs::write(&s.staged, b"x").unwrap();
    assert!(staged_update_exists(&s.staged));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_installed_bytes_equal_staged_bytes(
        staged in proptest::collection::vec(any::<u8>(), 1..2048),
        live in proptest::collection::vec(any::<u8>(), 0..512),
    ) {
        let s = scripts();
        fs::write(&s.staged, &staged).unwrap();
        fs::write(&s.live, &live).unwrap();
        let (logger, _memory) = BfCLogger::BfFMemory(BfCLogLevel::Error);

        let outcome = apply_pending_update(&s.staged, &s.live, &logger);

        prop_assert!(outcome.is_applied());
        prop_assert_eq!(read(&s.live), staged);
        prop_assert!(!s.staged.exists());
    }
}
