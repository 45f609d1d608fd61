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

use serde_json::Value;

use crate::log::core::BfCLogRecord;

pub struct BfCJsonFormatter;

impl BfCJsonFormatter {
    #[allow(non_snake_case)]
    pub fn BfFFormat(record: &BfCLogRecord) -> String {
        record.BfFToJson().to_string()
    }
}

/// `LEVEL event: message - key=value, key=value`
pub struct BfCTextFormatter;

impl BfCTextFormatter {
    #[allow(non_snake_case)]
    pub fn BfFFormat(record: &BfCLogRecord) -> String {
        let mut line = format!(
            "{} {}: {}",
            record.level.as_str(),
            record.event,
            record.message
        );
        if !record.fields.is_empty() {
            let fields = record
                .fields
                .iter()
                .map(|(k, v)| match v {
                    Value::String(s) => format!("{k}={s}"),
                    other => format!("{k}={other}"),
                })
                .collect::<Vec<_>>()
                .join(", ");
            line.push_str(" - ");
            line.push_str(&fields);
        }
        line
    }
}
