//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of Bfboot.
//! The Bfboot project belongs to the Dunimd project team.

use std::fs;
use std::path::PathBuf;

use bfboot::errors::BfError;
use bfboot::search_path::BfSearchPath;
use bfboot::{BfBootConfig, BfLayout};
use tempfile::tempdir;

#[test]
fn test_register_keeps_order_and_duplicates() {
    let mut path = BfSearchPath::new();
    path.register("C:/Lua/?.dll").unwrap();
    path.register("D:/Games/Scripts/?.dll").unwrap();
    path.register("D:/Games/Scripts/?.dll").unwrap();

    assert_eq!(path.len(), 3);
    assert_eq!(
        path.to_string(),
        "C:/Lua/?.dll;D:/Games/Scripts/?.dll;D:/Games/Scripts/?.dll"
    );
}

#[test]
fn test_candidates_substitute_module_name() {
    let path: BfSearchPath = "a/?.dll;;b/?/core.dll".parse().unwrap();

    assert_eq!(
        path.candidates("bflib"),
        vec![PathBuf::from("a/bflib.dll"), PathBuf::from("b/bflib/core.dll")]
    );
}

#[test]
fn test_pattern_without_placeholder_is_rejected() {
    let mut path = BfSearchPath::new();

    assert!(matches!(path.register("Scripts/bflib.dll"), Err(BfError::Config { .. })));
    assert!(matches!(
        path.register_dir("Scripts", "bflib.dll"),
        Err(BfError::Config { .. })
    ));
    assert!(path.is_empty());
}

#[test]
fn test_directory_with_separator_or_placeholder_is_searched_literally() {
    let dir = tempdir().unwrap();
    let scripts = dir.path().join("Saved;Games").join("what?dir").join("Scripts");
    fs::create_dir_all(&scripts).unwrap();
    fs::write(scripts.join("bflib.dll"), b"MZ").unwrap();

    let mut path = BfSearchPath::new();
    path.register_dir(scripts.clone(), "?.dll").unwrap();

    assert_eq!(path.len(), 1);
    assert_eq!(path.candidates("bflib"), vec![scripts.join("bflib.dll")]);
    assert_eq!(path.resolve("bflib"), Some(scripts.join("bflib.dll")));
}

#[test]
fn test_resolve_returns_first_existing_file() {
    let dir = tempdir().unwrap();
    let first = dir.path().join("first");
    let second = dir.path().join("second");
    fs::create_dir_all(&first).unwrap();
    fs::create_dir_all(&second).unwrap();
    fs::write(second.join("bflib.dll"), b"MZ").unwrap();

    let mut path = BfSearchPath::new();
    path.register(format!("{}/?.dll", first.display())).unwrap();
    path.register(format!("{}/?.dll", second.display())).unwrap();

    assert_eq!(path.resolve("bflib"), Some(second.join("bflib.dll")));
    assert_eq!(path.resolve("missing"), None);

    // A directory with the module's name is not a candidate.
    fs::create_dir_all(first.join("bflib.dll")).unwrap();
    assert_eq!(path.resolve("bflib"), Some(second.join("bflib.dll")));
}

#[test]
fn test_layout_pattern_finds_live_extension() {
    let dir = tempdir().unwrap();
    let config = BfBootConfig::default();
    let layout = BfLayout::new(dir.path().to_path_buf(), &config);
    fs::create_dir_all(&layout.scripts_dir).unwrap();
    fs::write(&layout.live, b"MZ").unwrap();

    let mut path = BfSearchPath::new();
    path.register_dir(layout.scripts_dir.clone(), layout.search_template.clone())
        .unwrap();

    assert_eq!(path.patterns(), vec![layout.search_pattern.clone()]);
    assert_eq!(path.resolve("bflib"), Some(layout.live.clone()));
    assert!(layout.search_pattern.ends_with("?.dll"));
}
