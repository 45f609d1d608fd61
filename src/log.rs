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

//! # Bfboot Log Module
//!
//! The host hands the bootstrapper a log sink that accepts one message at a
//! time. [`BfCLogSink`] is that seam; [`BfCLogger`] is the stock
//! implementation, filtering by level and fanning records out to handlers
//! (stdout, a size-rotated file, or memory).

pub mod config;
pub mod core;
pub mod formatters;
pub mod handlers;

pub use self::config::BfCLogConfig;
pub use self::core::{BfCLogLevel, BfCLogRecord, BfCLogSink, BfCLogger};
pub use self::formatters::{BfCJsonFormatter, BfCTextFormatter};
pub use self::handlers::{BfCFileHandler, BfCLogHandler, BfCMemoryHandler, BfCStdoutHandler};
