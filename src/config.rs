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

//! # Bfboot Configuration
//!
//! [`BfBootConfig`] names every path and symbol the bootstrapper touches.
//! Each field has a default, so an empty file (or `BfBootConfig::default()`)
//! describes the stock layout:
//!
//! ```text
//! <writable_root>/Scripts/_bflib.dll   staged update
//! <writable_root>/Scripts/bflib.dll    live extension
//! <writable_root>/Scripts/?.dll        search pattern
//! ```
//!
//! Configs load from `.json`, `.yaml` or `.yml` files.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{BfError, Result};
use crate::log::BfCLogConfig;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BfBootConfig {
    /// Host-provided writable directory. Resolved through a
    /// [`crate::layout::BfWritableRoot`] when unset.
    pub writable_root: Option<PathBuf>,
    pub scripts_dir: String,
    pub module_name: String,
    pub library_extension: String,
    pub staged_prefix: String,
    /// Parameterless entry point called after load.
    pub entry_point: String,
    /// Patterns already on the host's search path. They are searched
    /// before the scripts pattern the bootstrapper registers.
    pub extra_search_paths: Vec<String>,
    pub log: BfCLogConfig,
}

impl Default for BfBootConfig {
    fn default() -> Self {
        BfBootConfig {
            writable_root: None,
            scripts_dir: "Scripts".to_string(),
            module_name: "bflib".to_string(),
            library_extension: "dll".to_string(),
            staged_prefix: "_".to_string(),
            entry_point: "initHooks".to_string(),
            extra_search_paths: Vec::new(),
            log: BfCLogConfig::default(),
        }
    }
}

impl BfBootConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a config file, picking the format from the extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let ext = path
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();
        let config: BfBootConfig = match ext.as_str() {
            "json" => serde_json::from_str(&text)?,
            "yaml" | "yml" => serde_yaml::from_str(&text)?,
            other => {
                return Err(BfError::config(format!(
                    "unsupported config format '{}' for {}",
                    other,
                    path.display()
                )))
            }
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        check_name("scripts_dir", &self.scripts_dir)?;
        check_name("module_name", &self.module_name)?;
        check_name("entry_point", &self.entry_point)?;
        if self.library_extension.contains(['/', '\\', '?']) {
            return Err(BfError::config(format!(
                "library_extension '{}' must not contain path separators or '?'",
                self.library_extension
            )));
        }
        if self.staged_prefix.contains(['/', '\\', '?']) {
            return Err(BfError::config(format!(
                "staged_prefix '{}' must not contain path separators or '?'",
                self.staged_prefix
            )));
        }
        if self.staged_prefix.is_empty() {
            return Err(BfError::config(
                "staged_prefix cannot be empty: the staged file would be the live file",
            ));
        }
        for pattern in &self.extra_search_paths {
            if !pattern.contains('?') {
                return Err(BfError::config(format!(
                    "search pattern '{}' has no '?' placeholder",
                    pattern
                )));
            }
        }
        Ok(())
    }

    /// File name of the live extension, e.g. `bflib.dll`.
    pub fn library_file_name(&self) -> String {
        if self.library_extension.is_empty() {
            self.module_name.clone()
        } else {
            format!("{}.{}", self.module_name, self.library_extension)
        }
    }

    /// File name of the staged update, e.g. `_bflib.dll`.
    pub fn staged_file_name(&self) -> String {
        format!("{}{}", self.staged_prefix, self.library_file_name())
    }

    pub fn writable_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.writable_root = Some(root.into());
        self
    }

    pub fn scripts_dir(mut self, dir: &str) -> Self {
        self.scripts_dir = dir.to_string();
        self
    }

    pub fn module_name(mut self, name: &str) -> Self {
        self.module_name = name.to_string();
        self
    }

    pub fn library_extension(mut self, ext: &str) -> Self {
        self.library_extension = ext.to_string();
        self
    }

    pub fn entry_point(mut self, symbol: &str) -> Self {
        self.entry_point = symbol.to_string();
        self
    }

    pub fn extra_search_path(mut self, pattern: &str) -> Self {
        self.extra_search_paths.push(pattern.to_string());
        self
    }

    pub fn log(mut self, log: BfCLogConfig) -> Self {
        self.log = log;
        self
    }
}

fn check_name(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(BfError::config(format!("{field} cannot be empty")));
    }
    if value.contains(['/', '\\', '?']) {
        return Err(BfError::config(format!(
            "{field} '{value}' must not contain path separators or '?'"
        )));
    }
    Ok(())
}
