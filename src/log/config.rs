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

use serde::{Deserialize, Serialize};

use super::core::BfCLogLevel;

/// Configuration for the BfCLogger: console/file enablement, default
/// level, JSON formatting and size-based rotation of the log file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BfCLogConfig {
    pub default_level: String,
    pub console_enabled: bool,
    pub json_format_console: bool,
    /// Whether file logging is enabled.
    pub file_enabled: bool,
    /// Log file path when file logging is enabled.
    pub file_path: Option<String>,
    pub json_format_file: bool,
    /// Rotate once the file grows past this many bytes.
    pub max_bytes: Option<u64>,
    /// Number of rotated files to keep.
    pub backup_count: Option<u32>,
}

impl Default for BfCLogConfig {
    fn default() -> Self {
        BfCLogConfig {
            default_level: "INFO".to_string(),
            console_enabled: true,
            json_format_console: false,
            file_enabled: false,
            file_path: None,
            json_format_file: true,
            max_bytes: Some(10 * 1024 * 1024),
            backup_count: Some(7),
        }
    }
}

impl BfCLogConfig {
    #[allow(non_snake_case)]
    pub fn BfFThreshold(&self) -> BfCLogLevel {
        BfCLogLevel::BfFParse(&self.default_level)
    }

    #[allow(non_snake_case)]
    pub fn BfFDefaultLevel(mut self, level: &str) -> Self {
        self.default_level = level.to_string();
        self
    }

    #[allow(non_snake_case)]
    pub fn BfFConsoleEnabled(mut self, enabled: bool) -> Self {
        self.console_enabled = enabled;
        self
    }

    #[allow(non_snake_case)]
    pub fn BfFFile(mut self, path: impl Into<String>) -> Self {
        self.file_enabled = true;
        self.file_path = Some(path.into());
        self
    }
}
