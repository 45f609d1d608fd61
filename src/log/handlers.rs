//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of Bfboot.
//! The Bfboot project belongs to the Dunimd project team.
//!
//! Licensed under the Apache License, Version 2.0 (the "License");
//! You may not use this file except in compliance with the License.
//! You may obtain a copy of the License at
//!
//!     http://www.apache.org/licenses/LICENSE-2.0
//!
//! Unless required by applicable law or agreed to in writing, software
//! distributed under the License is distributed on an "AS IS" BASIS,
//! WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
//! See the License for the specific language governing permissions and
//! limitations under the License.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use crate::log::core::BfCLogRecord;
use crate::log::formatters::{BfCJsonFormatter, BfCTextFormatter};

pub trait BfCLogHandler {
    fn handle(&self, record: &BfCLogRecord);
}

impl<T: BfCLogHandler + ?Sized> BfCLogHandler for Arc<T> {
    fn handle(&self, record: &BfCLogRecord) {
        (**self).handle(record)
    }
}

fn format_line(json: bool, record: &BfCLogRecord) -> String {
    if json {
        BfCJsonFormatter::BfFFormat(record)
    } else {
        BfCTextFormatter::BfFFormat(record)
    }
}

pub struct BfCStdoutHandler {
    json: bool,
}

impl BfCStdoutHandler {
    #[allow(non_snake_case)]
    pub fn BfFNew(json: bool) -> Self {
        BfCStdoutHandler { json }
    }
}

impl BfCLogHandler for BfCStdoutHandler {
    fn handle(&self, record: &BfCLogRecord) {
        println!("{}", format_line(self.json, record));
    }
}

/// Appends formatted lines to a file, rotating it by size.
pub struct BfCFileHandler {
    path: PathBuf,
    json: bool,
    max_bytes: Option<u64>,
    backup_count: u32,
    file: Mutex<()>,
}

impl BfCFileHandler {
    #[allow(non_snake_case)]
    pub fn BfFNew(
        path: impl Into<PathBuf>,
        json: bool,
        max_bytes: Option<u64>,
        backup_count: Option<u32>,
    ) -> Self {
        BfCFileHandler {
            path: path.into(),
            json,
            max_bytes,
            backup_count: backup_count.unwrap_or(7),
            file: Mutex::new(()),
        }
    }

    #[allow(non_snake_case)]
    pub fn BfFPath(&self) -> &Path {
        &self.path
    }

    fn backup_path(&self, idx: u32) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(format!(".{idx}"));
        PathBuf::from(name)
    }

    fn rotate_if_needed(&self) {
        let max_bytes = match self.max_bytes {
            Some(v) => v,
            None => return,
        };
        match fs::metadata(&self.path) {
            Ok(meta) if meta.len() > max_bytes => {}
            _ => return,
        }

        if self.backup_count == 0 {
            let _ = fs::remove_file(&self.path);
            return;
        }

        // path.N-1 -> path.N, ..., path -> path.1; the oldest is overwritten.
        for idx in (1..self.backup_count).rev() {
            let from = self.backup_path(idx);
            if from.exists() {
                let _ = fs::rename(&from, self.backup_path(idx + 1));
            }
        }
        let _ = fs::rename(&self.path, self.backup_path(1));
    }
}

impl BfCLogHandler for BfCFileHandler {
    fn handle(&self, record: &BfCLogRecord) {
        let _guard = self.file.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        self.rotate_if_needed();

        let line = format_line(self.json, record);
        if let Ok(mut f) = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
        {
            let _ = writeln!(f, "{}", line);
        }
    }
}

/// Keeps formatted lines in memory. Used by embedders that surface the
/// bootstrap log elsewhere, and by tests.
#[derive(Debug, Default)]
pub struct BfCMemoryHandler {
    lines: Mutex<Vec<String>>,
}

impl BfCMemoryHandler {
    #[allow(non_snake_case)]
    pub fn BfFNew() -> Self {
        BfCMemoryHandler::default()
    }

    #[allow(non_snake_case)]
    pub fn BfFLines(&self) -> Vec<String> {
        self.lines
            .lock()
            .map(|lines| lines.clone())
            .unwrap_or_default()
    }

    #[allow(non_snake_case)]
    pub fn BfFContains(&self, needle: &str) -> bool {
        self.BfFLines().iter().any(|line| line.contains(needle))
    }

    #[allow(non_snake_case)]
    pub fn BfFClear(&self) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.clear();
        }
    }
}

impl BfCLogHandler for BfCMemoryHandler {
    fn handle(&self, record: &BfCLogRecord) {
        if let Ok(mut lines) = self.lines.lock() {
            lines.push(BfCTextFormatter::BfFFormat(record));
        }
    }
}
