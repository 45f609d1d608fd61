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

//! # Extension Bootstrapper
//!
//! Runs once per host script load, strictly in this order:
//!
//! 1. [`BfBootstrapper::register_search_path`] appends the scripts pattern
//!    to the search path handed to the loader.
//! 2. [`BfBootstrapper::apply_pending_update`] installs a staged update, if
//!    present. Failures are logged and the old binary is kept.
//! 3. [`BfBootstrapper::load_and_initialize`] loads the extension and calls
//!    its entry point. Failures here are returned to the host.
//!
//! ## State Machine
//!
//! ```text
//! Unloaded -> PathRegistered -> UpdateChecked{Applied|Skipped|Failed} -> Initialized
//! ```
//!
//! Steps called out of order fail with `BfError::State`, and so does a
//! second [`BfBootstrapper::run`].

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::BfBootConfig;
use crate::errors::{BfError, Result};
use crate::layout::{BfLayout, BfWritableRoot};
use crate::loader::{BfExtension, BfModuleLoader, BfNativeLoader};
use crate::log::{BfCLogLevel, BfCLogRecord, BfCLogSink, BfCLogger};
use crate::search_path::BfSearchPath;
use crate::update::{self, BfUpdateOutcome};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BfBootState {
    Unloaded,
    PathRegistered,
    UpdateChecked(BfUpdateOutcome),
    Initialized,
}

impl BfBootState {
    pub fn name(&self) -> &'static str {
        match self {
            BfBootState::Unloaded => "unloaded",
            BfBootState::PathRegistered => "path_registered",
            BfBootState::UpdateChecked(_) => "update_checked",
            BfBootState::Initialized => "initialized",
        }
    }
}

/// Summary of a completed [`BfBootstrapper::run`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BfBootReport {
    pub module: String,
    pub layout: BfLayout,
    pub search_path: String,
    pub update: BfUpdateOutcome,
    pub extension_path: Option<PathBuf>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

pub struct BfBootstrapper {
    config: BfBootConfig,
    layout: BfLayout,
    search_path: BfSearchPath,
    loader: Box<dyn BfModuleLoader>,
    sink: Arc<dyn BfCLogSink>,
    state: BfBootState,
    extension: Option<Box<dyn BfExtension>>,
}

impl BfBootstrapper {
    /// Builds a bootstrapper whose writable root comes from
    /// `config.writable_root`.
    pub fn new(
        config: BfBootConfig,
        loader: Box<dyn BfModuleLoader>,
        sink: Arc<dyn BfCLogSink>,
    ) -> Result<Self> {
        let root = config.writable_dir()?;
        Self::with_root(config, &root, loader, sink)
    }

    pub fn with_root(
        config: BfBootConfig,
        root: &dyn BfWritableRoot,
        loader: Box<dyn BfModuleLoader>,
        sink: Arc<dyn BfCLogSink>,
    ) -> Result<Self> {
        config.validate()?;
        let layout = BfLayout::resolve(root, &config)?;

        // Host patterns already on the path come first.
        let mut search_path = BfSearchPath::new();
        for pattern in &config.extra_search_paths {
            search_path.register(pattern.clone())?;
        }

        Ok(BfBootstrapper {
            config,
            layout,
            search_path,
            loader,
            sink,
            state: BfBootState::Unloaded,
            extension: None,
        })
    }

    /// Stock setup: `libloading` loader and a logger built from
    /// `config.log`.
    pub fn native(config: BfBootConfig) -> Result<Self> {
        let sink: Arc<dyn BfCLogSink> = Arc::new(BfCLogger::BfFFromConfig(&config.log));
        Self::new(config, Box::new(BfNativeLoader::new()), sink)
    }

    pub fn config(&self) -> &BfBootConfig {
        &self.config
    }

    pub fn layout(&self) -> &BfLayout {
        &self.layout
    }

    pub fn search_path(&self) -> &BfSearchPath {
        &self.search_path
    }

    pub fn state(&self) -> &BfBootState {
        &self.state
    }

    /// The loaded extension. It stays loaded for as long as the
    /// bootstrapper lives.
    pub fn extension(&self) -> Option<&dyn BfExtension> {
        self.extension.as_deref()
    }

    /// Appends `<root>/<scripts>/?.<ext>` to the search path. Repeated
    /// calls append duplicates.
    pub fn register_search_path(&mut self) -> Result<()> {
        match self.state {
            BfBootState::Unloaded | BfBootState::PathRegistered => {}
            ref other => {
                return Err(BfError::state(format!(
                    "cannot register the search path in state '{}'",
                    other.name()
                )))
            }
        }

        self.search_path.register_dir(
            self.layout.scripts_dir.clone(),
            self.layout.search_template.clone(),
        )?;
        self.sink.log(
            BfCLogRecord::BfFNew(
                BfCLogLevel::Debug,
                "boot.search_path.registered",
                "registered extension search pattern",
            )
            .BfFWithField("pattern", self.layout.search_pattern.clone())
            .BfFWithField("entries", self.search_path.len()),
        );
        self.state = BfBootState::PathRegistered;
        Ok(())
    }

    /// Installs a staged update if one is present. Update failures do not
    /// fail this call; they are reported in the returned outcome.
    pub fn apply_pending_update(&mut self) -> Result<BfUpdateOutcome> {
        if self.state != BfBootState::PathRegistered {
            return Err(BfError::state(format!(
                "cannot check for updates in state '{}'",
                self.state.name()
            )));
        }

        let outcome =
            update::apply_pending_update(&self.layout.staged, &self.layout.live, self.sink.as_ref());
        self.state = BfBootState::UpdateChecked(outcome.clone());
        Ok(outcome)
    }

    /// Loads the extension and calls its entry point. Any failure is
    /// returned to the caller.
    pub fn load_and_initialize(&mut self) -> Result<()> {
        if !matches!(self.state, BfBootState::UpdateChecked(_)) {
            return Err(BfError::state(format!(
                "cannot load the extension in state '{}'",
                self.state.name()
            )));
        }

        match self.load_extension() {
            Ok(extension) => {
                let mut record = BfCLogRecord::BfFNew(
                    BfCLogLevel::Info,
                    "boot.load.initialized",
                    "extension initialized",
                )
                .BfFWithField("module", extension.name().to_string())
                .BfFWithField("entry_point", self.config.entry_point.clone());
                if let Some(path) = extension.path() {
                    record = record.BfFWithField("path", path.display().to_string());
                }
                self.sink.log(record);
                self.extension = Some(extension);
                self.state = BfBootState::Initialized;
                Ok(())
            }
            Err(err) => {
                self.sink.error(
                    "boot.load.failed",
                    &format!("could not initialize extension: {err}"),
                );
                Err(err)
            }
        }
    }

    fn load_extension(&mut self) -> Result<Box<dyn BfExtension>> {
        let extension = self
            .loader
            .load(&self.config.module_name, &self.search_path)?;
        extension.call_entry(&self.config.entry_point)?;
        Ok(extension)
    }

    /// Runs the whole sequence. Only the first call on a bootstrapper is
    /// accepted.
    pub fn run(&mut self) -> Result<BfBootReport> {
        if self.state != BfBootState::Unloaded {
            return Err(BfError::state(format!(
                "bootstrap already ran (state '{}')",
                self.state.name()
            )));
        }

        let started_at = Utc::now();
        self.register_search_path()?;
        let update = self.apply_pending_update()?;
        self.load_and_initialize()?;

        Ok(BfBootReport {
            module: self.config.module_name.clone(),
            layout: self.layout.clone(),
            search_path: self.search_path.to_string(),
            update,
            extension_path: self
                .extension
                .as_ref()
                .and_then(|ext| ext.path().map(|p| p.to_path_buf())),
            started_at,
            finished_at: Utc::now(),
        })
    }
}

impl fmt::Debug for BfBootstrapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BfBootstrapper")
            .field("module", &self.config.module_name)
            .field("layout", &self.layout)
            .field("search_path", &self.search_path)
            .field("state", &self.state)
            .field("extension", &self.extension)
            .finish()
    }
}
