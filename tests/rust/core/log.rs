//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of Bfboot.
//! The Bfboot project belongs to the Dunimd project team.

use std::fs;
use std::sync::Arc;

use bfboot::log::{
    BfCFileHandler, BfCLogConfig, BfCLogHandler, BfCLogLevel, BfCLogRecord, BfCLogSink, BfCLogger,
    BfCMemoryHandler,
};
use tempfile::tempdir;

#[test]
fn test_logger_filters_below_threshold() {
    let (logger, memory) = BfCLogger::BfFMemory(BfCLogLevel::Warning);

    logger.log(BfCLogRecord::BfFNew(BfCLogLevel::Debug, "boot.test", "debug line"));
    logger.info("boot.test", "info line");
    logger.warn("boot.test", "warn line");
    logger.error("boot.test", "error line");

    let lines = memory.BfFLines();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], "WARNING boot.test: warn line");
    assert_eq!(lines[1], "ERROR boot.test: error line");
}

#[test]
fn test_memory_handler_clear() {
    let (logger, memory) = BfCLogger::BfFMemory(BfCLogLevel::Debug);
    logger.info("boot.test", "hello");
    assert!(memory.BfFContains("hello"));

    memory.BfFClear();
    assert!(memory.BfFLines().is_empty());
}

#[test]
fn test_logger_fans_out_to_every_handler() {
    let first = Arc::new(BfCMemoryHandler::BfFNew());
    let second = Arc::new(BfCMemoryHandler::BfFNew());
    let mut logger = BfCLogger::BfFNew(BfCLogLevel::Info);
    logger.BfFAddHandler(Arc::clone(&first));
    logger.BfFAddHandler(Arc::clone(&second));

    logger.info("boot.test", "shared");

    assert!(first.BfFContains("shared"));
    assert!(second.BfFContains("shared"));
    assert_eq!(logger.BfFHandlerCount(), 2);
}

#[test]
fn test_file_handler_writes_json_lines() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("boot.log");
    let handler = BfCFileHandler::BfFNew(&path, true, None, None);

    handler.handle(
        &BfCLogRecord::BfFNew(BfCLogLevel::Info, "boot.update.installed", "installed updated extension")
            .BfFWithField("bytes", 100),
    );
    handler.handle(&BfCLogRecord::BfFNew(BfCLogLevel::Error, "boot.load.failed", "boom"));

    let text = fs::read_to_string(&path).unwrap();
    let lines: Vec<serde_json::Value> = text
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["event"], "boot.update.installed");
    assert_eq!(lines[0]["fields"]["bytes"], 100);
    assert_eq!(lines[1]["level"], "ERROR");
}

#[test]
fn test_file_handler_rotates_by_size() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("boot.log");
    let handler = BfCFileHandler::BfFNew(&path, false, Some(64), Some(2));

    for i in 0..20 {
        handler.handle(&BfCLogRecord::BfFNew(
            BfCLogLevel::Info,
            "boot.test",
            format!("line number {i} with some padding"),
        ));
    }

    let backup_1 = dir.path().join("boot.log.1");
    let backup_2 = dir.path().join("boot.log.2");
    let backup_3 = dir.path().join("boot.log.3");
    assert!(path.exists());
    assert!(backup_1.exists());
    assert!(backup_2.exists());
    assert!(!backup_3.exists());
    assert!(fs::read_to_string(&path).unwrap().contains("line number 19"));
}

#[test]
fn test_from_config_builds_enabled_handlers() {
    let dir = tempdir().unwrap();
    let file = dir.path().join("boot.log");

    let quiet = BfCLogger::BfFFromConfig(&BfCLogConfig::default().BfFConsoleEnabled(false));
    assert_eq!(quiet.BfFHandlerCount(), 0);

    let both = BfCLogger::BfFFromConfig(
        &BfCLogConfig::default()
            .BfFDefaultLevel("error")
            .BfFFile(file.to_string_lossy()),
    );
    assert_eq!(both.BfFHandlerCount(), 2);
    assert_eq!(both.BfFThreshold(), BfCLogLevel::Error);

    both.error("boot.test", "written to file");
    assert!(fs::read_to_string(&file).unwrap().contains("written to file"));
}

#[test]
fn test_level_names_parse_loosely() {
    assert_eq!(BfCLogLevel::BfFParse("warn"), BfCLogLevel::Warning);
    assert_eq!(BfCLogLevel::BfFParse(" Debug "), BfCLogLevel::Debug);
    assert_eq!(BfCLogLevel::BfFParse("verbose"), BfCLogLevel::Info);
    assert!(BfCLogLevel::Debug < BfCLogLevel::Error);
}
