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

//! # Bfboot Error Module
//!
//! This module defines the error types used throughout the bootstrapper.
//!
//! ## Error Categories
//!
//! Update errors are recovered locally by the bootstrapper: they are logged,
//! the staged file is kept for the next load, and the previously installed
//! extension is loaded instead.
//!
//! - **ReadOpen**: the staged update could not be opened for reading
//! - **Read**: the staged update was opened but reading it failed
//! - **EmptyRead**: the staged update yielded no bytes
//! - **WriteOpen**: the live extension path could not be opened for writing
//! - **Write**: writing, syncing or renaming the new binary failed
//!
//! Everything else is fatal to the bootstrap and is returned to the host:
//!
//! - **Load**: the module loader could not load the extension
//! - **Symbol**: a required entry symbol is missing from the extension
//! - **Init**: the extension's entry point reported failure
//! - **Config**: invalid configuration values
//! - **State**: a bootstrap operation was called out of order
//! - **Io** / **Serde**: ambient filesystem and (de)serialization failures
//!
//! ## Usage
//!
//! ```rust
//! use bfboot::errors::{BfError, Result};
//!
//! fn check(name: &str) -> Result<()> {
//!     if name.is_empty() {
//!         return Err(BfError::config("module name cannot be empty"));
//!     }
//!     Ok(())
//! }
//! ```

use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Convenience result type used throughout Bfboot.
pub type Result<T> = std::result::Result<T, BfError>;

/// Canonical error enumeration for Bfboot.
#[derive(Clone, Debug, Error, PartialEq, Eq, Serialize, Deserialize)]
pub enum BfError {
    /// The staged update exists but could not be opened.
    #[error("could not open staged update '{path}': {message}")]
    ReadOpen { path: String, message: String },

    /// The staged update was opened but reading it failed.
    #[error("could not read staged update '{path}': {message}")]
    Read { path: String, message: String },

    /// Reading the staged update produced no data.
    #[error("staged update '{path}' is empty")]
    EmptyRead { path: String },

    /// The live extension could not be opened for writing.
    #[error("could not open '{path}' for writing: {message}")]
    WriteOpen { path: String, message: String },

    /// Writing the new binary into place failed.
    #[error("could not write '{path}': {message}")]
    Write { path: String, message: String },

    /// The module loader could not load the extension.
    #[error("could not load module '{module}': {message}")]
    Load { module: String, message: String },

    /// A symbol the bootstrapper needs is not exported by the extension.
    #[error("module '{module}' does not export '{symbol}': {message}")]
    Symbol {
        module: String,
        symbol: String,
        message: String,
    },

    /// The extension's entry point ran and reported failure.
    #[error("'{symbol}' in module '{module}' failed with status {status}")]
    Init {
        module: String,
        symbol: String,
        status: i32,
    },

    /// Invalid configuration value.
    #[error("config error: {message}")]
    Config { message: String },

    /// A bootstrap step was called out of order.
    #[error("bootstrap state error: {message}")]
    State { message: String },

    /// Errors originating from filesystem IO outside the update path.
    #[error("io error: {0}")]
    Io(String),

    /// Wrapper for serde-style serialization issues.
    #[error("serialization error: {0}")]
    Serde(String),
}

impl From<io::Error> for BfError {
    fn from(err: io::Error) -> Self {
        BfError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for BfError {
    fn from(err: serde_json::Error) -> Self {
        BfError::Serde(err.to_string())
    }
}

impl From<serde_yaml::Error> for BfError {
    fn from(err: serde_yaml::Error) -> Self {
        BfError::Serde(err.to_string())
    }
}

impl BfError {
    pub fn read_open(path: &Path, err: impl ToString) -> Self {
        BfError::ReadOpen {
            path: path.display().to_string(),
            message: err.to_string(),
        }
    }

    pub fn read(path: &Path, err: impl ToString) -> Self {
        BfError::Read {
            path: path.display().to_string(),
            message: err.to_string(),
        }
    }

    pub fn empty_read(path: &Path) -> Self {
        BfError::EmptyRead {
            path: path.display().to_string(),
        }
    }

    pub fn write_open(path: &Path, err: impl ToString) -> Self {
        BfError::WriteOpen {
            path: path.display().to_string(),
            message: err.to_string(),
        }
    }

    pub fn write(path: &Path, err: impl ToString) -> Self {
        BfError::Write {
            path: path.display().to_string(),
            message: err.to_string(),
        }
    }

    pub fn load(module: impl Into<String>, message: impl Into<String>) -> Self {
        BfError::Load {
            module: module.into(),
            message: message.into(),
        }
    }

    pub fn symbol(
        module: impl Into<String>,
        symbol: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        BfError::Symbol {
            module: module.into(),
            symbol: symbol.into(),
            message: message.into(),
        }
    }

    /// Helper to construct configuration errors.
    pub fn config<T: Into<String>>(message: T) -> Self {
        BfError::Config {
            message: message.into(),
        }
    }

    /// Helper to construct state machine errors.
    pub fn state<T: Into<String>>(message: T) -> Self {
        BfError::State {
            message: message.into(),
        }
    }

    /// True for the failures of the staged update install, which the
    /// bootstrapper logs and recovers from.
    pub fn is_update_error(&self) -> bool {
        matches!(
            self,
            BfError::ReadOpen { .. }
                | BfError::Read { .. }
                | BfError::EmptyRead { .. }
                | BfError::WriteOpen { .. }
                | BfError::Write { .. }
        )
    }
}
