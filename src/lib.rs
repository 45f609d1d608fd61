//! Copyright © 2025-2026 Wenze Wei. All Rights Reserved.
//!
//! This file is part of Bfboot.
//! The Bfboot project belongs to the Dunimd Team.
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

//! # Bfboot Core Library
//!
//! Bfboot is the bootstrap step a host process runs before it can use the
//! `bflib` native extension. On every script load it:
//!
//! 1. registers `<writable root>/Scripts/?.dll` on the native search path,
//! 2. installs a staged update (`_bflib.dll`) over the live extension
//!    (`bflib.dll`) if the updater left one behind,
//! 3. loads the extension and calls its `initHooks` entry point.
//!
//! ## Module Overview
//!
//! - **bootstrap**: the ordered sequence and its state machine
//! - **update**: staged update detection and install
//! - **search_path**: the native search path as an explicit value
//! - **loader**: module loader traits and the `libloading` implementation
//! - **layout**: writable root and derived file paths
//! - **config**: JSON/YAML configuration
//! - **log**: host log sink, handlers and formatters
//! - **errors**: error taxonomy
//!
//! ## Quick Start
//!
//! ```rust
//! use bfboot::{BfBootConfig, BfBootstrapper};
//!
//! let config = BfBootConfig::new().writable_root("C:/Users/me/Saved Games/DCS");
//! let mut boot = BfBootstrapper::native(config)?;
//! let report = boot.run()?;
//! println!("{:?}", report.update);
//! ```
//!
//! ## Error Handling
//!
//! Update failures are logged and recovered; the previously installed
//! extension is loaded instead. Load and initialization failures are
//! returned as `Err(BfError)` to the host.

pub mod bootstrap;
pub mod config;
pub mod errors;
pub mod layout;
pub mod loader;
pub mod log;
pub mod search_path;
pub mod update;

pub use bootstrap::{BfBootReport, BfBootState, BfBootstrapper};
pub use config::BfBootConfig;
pub use errors::{BfError, Result};
pub use layout::{BfLayout, BfWritableRoot};
pub use loader::{BfEntryFn, BfExtension, BfModuleLoader, BfNativeExtension, BfNativeLoader};
pub use self::log::{BfCLogConfig, BfCLogLevel, BfCLogRecord, BfCLogSink, BfCLogger, BfCMemoryHandler};
pub use search_path::{BfSearchEntry, BfSearchPath};
pub use update::{apply_pending_update, staged_update_exists, BfUpdateOutcome};
