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

//! # Native Search Path
//!
//! An ordered list of patterns in which `?` stands for the module name, in
//! the `;`-separated notation hosts use for their native module path:
//!
//! ```text
//! C:\Saved Games\DCS\Scripts\?.dll;.\?.dll
//! ```
//!
//! The search path is a value owned by the caller and handed to the module
//! loader at load time; registering a pattern never touches process state.
//!
//! Entries come in two forms. Host patterns ([`BfSearchPath::register`])
//! are plain strings and every `?` in them is substituted. Directory
//! entries ([`BfSearchPath::register_dir`]) keep the directory literal and
//! substitute only in the file-name template, so a directory whose name
//! contains `?` or `;` is searched as-is. The `;`-joined text form is for
//! logs and reports; such a directory does not survive a round trip
//! through it.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{BfError, Result};

pub const BF_SEARCH_PATH_SEPARATOR: char = ';';
pub const BF_SEARCH_PLACEHOLDER: char = '?';

/// One search path entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BfSearchEntry {
    /// Literal directory, never substituted.
    pub dir: Option<PathBuf>,
    /// Pattern (or file-name template under `dir`) holding the placeholder.
    pub template: String,
}

impl BfSearchEntry {
    /// The entry in host notation.
    pub fn pattern(&self) -> String {
        match &self.dir {
            Some(dir) => dir.join(&self.template).to_string_lossy().into_owned(),
            None => self.template.clone(),
        }
    }

    pub fn candidate(&self, module: &str) -> PathBuf {
        let name = self.template.replace(BF_SEARCH_PLACEHOLDER, module);
        match &self.dir {
            Some(dir) => dir.join(name),
            None => PathBuf::from(name),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BfSearchPath {
    entries: Vec<BfSearchEntry>,
}

impl BfSearchPath {
    pub fn new() -> Self {
        BfSearchPath::default()
    }

    /// Appends a host pattern after the existing entries. Duplicates are
    /// kept.
    pub fn register(&mut self, pattern: impl Into<String>) -> Result<()> {
        let pattern = pattern.into();
        check_placeholder(&pattern)?;
        self.entries.push(BfSearchEntry {
            dir: None,
            template: pattern,
        });
        Ok(())
    }

    /// Appends `dir` joined with a file-name template such as `?.dll`. Only
    /// the template is substituted. Duplicates are kept.
    pub fn register_dir(&mut self, dir: impl Into<PathBuf>, template: impl Into<String>) -> Result<()> {
        let template = template.into();
        check_placeholder(&template)?;
        if template.contains(['/', '\\']) {
            return Err(BfError::config(format!(
                "file-name template '{}' must not contain path separators",
                template
            )));
        }
        self.entries.push(BfSearchEntry {
            dir: Some(dir.into()),
            template,
        });
        Ok(())
    }

    pub fn entries(&self) -> &[BfSearchEntry] {
        &self.entries
    }

    /// Every entry in host notation, in search order.
    pub fn patterns(&self) -> Vec<String> {
        self.entries.iter().map(BfSearchEntry::pattern).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every path the module could live at, in search order.
    pub fn candidates(&self, module: &str) -> Vec<PathBuf> {
        self.entries
            .iter()
            .map(|entry| entry.candidate(module))
            .collect()
    }

    /// First candidate that exists as a file.
    pub fn resolve(&self, module: &str) -> Option<PathBuf> {
        self.candidates(module).into_iter().find(|path| path.is_file())
    }
}

fn check_placeholder(pattern: &str) -> Result<()> {
    if !pattern.contains(BF_SEARCH_PLACEHOLDER) {
        return Err(BfError::config(format!(
            "search pattern '{}' has no '{}' placeholder",
            pattern, BF_SEARCH_PLACEHOLDER
        )));
    }
    Ok(())
}

impl fmt::Display for BfSearchPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for entry in &self.entries {
            if !first {
                write!(f, "{}", BF_SEARCH_PATH_SEPARATOR)?;
            }
            first = false;
            f.write_str(&entry.pattern())?;
        }
        Ok(())
    }
}

impl FromStr for BfSearchPath {
    type Err = BfError;

    /// Empty segments (`;;`) are skipped, as hosts leave them in their paths.
    fn from_str(s: &str) -> Result<Self> {
        let mut path = BfSearchPath::new();
        for segment in s.split(BF_SEARCH_PATH_SEPARATOR) {
            let segment = segment.trim();
            if segment.is_empty() {
                continue;
            }
            path.register(segment)?;
        }
        Ok(path)
    }
}
