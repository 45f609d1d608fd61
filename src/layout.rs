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

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::config::BfBootConfig;
use crate::errors::{BfError, Result};

/// Resolves the host's writable directory.
pub trait BfWritableRoot {
    fn writable_dir(&self) -> Result<PathBuf>;
}

impl BfWritableRoot for PathBuf {
    fn writable_dir(&self) -> Result<PathBuf> {
        Ok(self.clone())
    }
}

impl BfWritableRoot for BfBootConfig {
    fn writable_dir(&self) -> Result<PathBuf> {
        self.writable_root
            .clone()
            .ok_or_else(|| BfError::config("writable_root is not set"))
    }
}

/// Concrete paths derived from a writable root and a config.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BfLayout {
    pub root: PathBuf,
    pub scripts_dir: PathBuf,
    pub staged: PathBuf,
    pub live: PathBuf,
    /// File-name template registered under `scripts_dir`, e.g. `?.dll`.
    pub search_template: String,
    /// `<root>/<scripts>/?.<ext>`, for display.
    pub search_pattern: String,
}

impl BfLayout {
    pub fn new(root: impl Into<PathBuf>, config: &BfBootConfig) -> Self {
        let root = root.into();
        let scripts_dir = root.join(&config.scripts_dir);
        let staged = scripts_dir.join(config.staged_file_name());
        let live = scripts_dir.join(config.library_file_name());
        let search_template = if config.library_extension.is_empty() {
            "?".to_string()
        } else {
            format!("?.{}", config.library_extension)
        };
        let search_pattern = scripts_dir
            .join(&search_template)
            .to_string_lossy()
            .into_owned();
        BfLayout {
            root,
            scripts_dir,
            staged,
            live,
            search_template,
            search_pattern,
        }
    }

    pub fn resolve(resolver: &dyn BfWritableRoot, config: &BfBootConfig) -> Result<Self> {
        let root = resolver.writable_dir()?;
        if root.as_os_str().is_empty() {
            return Err(BfError::config("writable root resolved to an empty path"));
        }
        Ok(BfLayout::new(root, config))
    }
}
