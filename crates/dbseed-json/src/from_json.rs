// DBSeed - Declarative Database Fixtures
//
// Copyright (c) 2026 DBSeed contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! JSON to canonical dataset conversion.
//!
//! The expected shape is an object mapping table names to arrays of row
//! objects:
//!
//! ```json
//! {
//!   "users": [
//!     {"id": 1, "name": "John"},
//!     {"id": 2, "name": "Jane"}
//!   ]
//! }
//! ```
//!
//! Numbers and booleans stay typed so the operation engine can make
//! type-sensitive comparisons; an explicit JSON `null` becomes
//! [`Value::Null`], and a column a row simply omits stays unset.

use crate::JsonError;
use dbseed_core::{Dataset, Row, Value};
use serde_json::Value as JsonValue;
use std::io::Read;

/// Parse a JSON dataset from a reader.
///
/// The entire stream is consumed. The reader is dropped on every exit
/// path, success or failure.
pub fn from_json(reader: impl Read) -> Result<Dataset, JsonError> {
    let root: JsonValue = serde_json::from_reader(reader)?;
    project(root)
}

/// Parse a JSON dataset from a string.
pub fn from_json_str(input: &str) -> Result<Dataset, JsonError> {
    let root: JsonValue = serde_json::from_str(input)?;
    project(root)
}

/// Parse a JSON dataset from a byte slice.
pub fn from_json_slice(input: &[u8]) -> Result<Dataset, JsonError> {
    let root: JsonValue = serde_json::from_slice(input)?;
    project(root)
}

fn project(root: JsonValue) -> Result<Dataset, JsonError> {
    let tables = match root {
        JsonValue::Object(map) => map,
        _ => return Err(JsonError::RootNotObject),
    };

    let mut dataset = Dataset::new();
    for (table_name, table_value) in tables {
        let rows = match table_value {
            JsonValue::Array(rows) => rows,
            _ => return Err(JsonError::TableNotArray(table_name)),
        };
        // An empty array still declares the table, so CLEAN_INSERT can
        // wipe it without inserting anything.
        dataset.push_table(dbseed_core::Table::new(table_name.clone()));
        for (index, row_value) in rows.into_iter().enumerate() {
            let row = project_row(&table_name, index, row_value)?;
            dataset.push_row(table_name.clone(), row);
        }
    }
    Ok(dataset)
}

fn project_row(table: &str, index: usize, value: JsonValue) -> Result<Row, JsonError> {
    let object = match value {
        JsonValue::Object(map) => map,
        _ => return Err(JsonError::RowNotObject(table.to_string(), index)),
    };

    let mut row = Row::new();
    for (column, cell) in object {
        let scalar = match cell {
            JsonValue::Null => Value::Null,
            JsonValue::Bool(b) => Value::Bool(b),
            JsonValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else if let Some(f) = n.as_f64() {
                    Value::Float(f)
                } else {
                    return Err(JsonError::IntOutOfRange(table.to_string(), column));
                }
            }
            JsonValue::String(s) => Value::Text(s),
            JsonValue::Array(_) | JsonValue::Object(_) => {
                return Err(JsonError::NestedValue(table.to_string(), column));
            }
        };
        row.set(column, scalar);
    }
    Ok(row)
}
