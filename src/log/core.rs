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

use std::fmt;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::log::config::BfCLogConfig;
use crate::log::handlers::{BfCFileHandler, BfCLogHandler, BfCMemoryHandler, BfCStdoutHandler};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BfCLogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl BfCLogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            BfCLogLevel::Debug => "DEBUG",
            BfCLogLevel::Info => "INFO",
            BfCLogLevel::Warning => "WARNING",
            BfCLogLevel::Error => "ERROR",
        }
    }

    /// Parses a level name, falling back to `Info` for unknown names.
    #[allow(non_snake_case)]
    pub fn BfFParse(s: &str) -> Self {
        match s.trim().to_ascii_uppercase().as_str() {
            "DEBUG" | "TRACE" => BfCLogLevel::Debug,
            "WARN" | "WARNING" => BfCLogLevel::Warning,
            "ERROR" => BfCLogLevel::Error,
            _ => BfCLogLevel::Info,
        }
    }

    fn as_log_level(&self) -> ::log::Level {
        match self {
            BfCLogLevel::Debug => ::log::Level::Debug,
            BfCLogLevel::Info => ::log::Level::Info,
            BfCLogLevel::Warning => ::log::Level::Warn,
            BfCLogLevel::Error => ::log::Level::Error,
        }
    }
}

impl fmt::Display for BfCLogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single message handed to the host log sink.
#[derive(Clone, Debug)]
pub struct BfCLogRecord {
    pub level: BfCLogLevel,
    pub event: String,
    pub message: String,
    pub fields: Map<String, Value>,
    pub timestamp: SystemTime,
}

impl BfCLogRecord {
    #[allow(non_snake_case)]
    pub fn BfFNew(level: BfCLogLevel, event: impl Into<String>, message: impl Into<String>) -> Self {
        BfCLogRecord {
            level,
            event: event.into(),
            message: message.into(),
            fields: Map::new(),
            timestamp: SystemTime::now(),
        }
    }

    #[allow(non_snake_case)]
    pub fn BfFWithField(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    #[allow(non_snake_case)]
    pub fn BfFToJson(&self) -> Value {
        let ts = self
            .timestamp
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();

        let mut data = Map::new();
        data.insert("level".into(), json!(self.level.as_str()));
        data.insert("event".into(), json!(self.event));
        data.insert("message".into(), json!(self.message));
        data.insert("timestamp_ms".into(), json!(ts));
        data.insert("fields".into(), Value::Object(self.fields.clone()));
        Value::Object(data)
    }
}

/// The host's logging sink. The bootstrapper reports every step through it.
pub trait BfCLogSink: Send + Sync {
    fn log(&self, record: BfCLogRecord);

    fn info(&self, event: &str, message: &str) {
        self.log(BfCLogRecord::BfFNew(BfCLogLevel::Info, event, message));
    }

    fn warn(&self, event: &str, message: &str) {
        self.log(BfCLogRecord::BfFNew(BfCLogLevel::Warning, event, message));
    }

    fn error(&self, event: &str, message: &str) {
        self.log(BfCLogRecord::BfFNew(BfCLogLevel::Error, event, message));
    }
}

/// Level-filtering fan-out over a set of handlers.
///
/// Every accepted record is also forwarded to the `log` facade so that an
/// embedding host with its own `log` backend sees the same stream.
pub struct BfCLogger {
    threshold: BfCLogLevel,
    handlers: Vec<Box<dyn BfCLogHandler + Send + Sync>>,
}

impl BfCLogger {
    #[allow(non_snake_case)]
    pub fn BfFNew(threshold: BfCLogLevel) -> Self {
        BfCLogger {
            threshold,
            handlers: Vec::new(),
        }
    }

    /// Builds a logger with the handlers enabled in `config`.
    #[allow(non_snake_case)]
    pub fn BfFFromConfig(config: &BfCLogConfig) -> Self {
        let mut logger = BfCLogger::BfFNew(config.BfFThreshold());
        if config.console_enabled {
            logger.BfFAddHandler(BfCStdoutHandler::BfFNew(config.json_format_console));
        }
        if config.file_enabled {
            if let Some(path) = &config.file_path {
                logger.BfFAddHandler(BfCFileHandler::BfFNew(
                    path.clone(),
                    config.json_format_file,
                    config.max_bytes,
                    config.backup_count,
                ));
            }
        }
        logger
    }

    /// A logger with a single in-memory handler, returned alongside it.
    #[allow(non_snake_case)]
    pub fn BfFMemory(threshold: BfCLogLevel) -> (Self, Arc<BfCMemoryHandler>) {
        let memory = Arc::new(BfCMemoryHandler::BfFNew());
        let mut logger = BfCLogger::BfFNew(threshold);
        logger.handlers.push(Box::new(Arc::clone(&memory)));
        (logger, memory)
    }

    #[allow(non_snake_case)]
    pub fn BfFAddHandler<H>(&mut self, handler: H)
    where
        H: BfCLogHandler + Send + Sync + 'static,
    {
        self.handlers.push(Box::new(handler));
    }

    #[allow(non_snake_case)]
    pub fn BfFThreshold(&self) -> BfCLogLevel {
        self.threshold
    }

    #[allow(non_snake_case)]
    pub fn BfFHandlerCount(&self) -> usize {
        self.handlers.len()
    }
}

impl BfCLogSink for BfCLogger {
    fn log(&self, record: BfCLogRecord) {
        if record.level < self.threshold {
            return;
        }
        ::log::log!(
            record.level.as_log_level(),
            "{}: {}",
            record.event,
            record.message
        );
        for h in &self.handlers {
            h.handle(&record);
        }
    }
}

impl fmt::Debug for BfCLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BfCLogger")
            .field("threshold", &self.threshold)
            .field("handlers", &self.handlers.len())
            .finish()
    }
}
