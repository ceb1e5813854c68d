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

//! Canonical dataset to JSON conversion.
//!
//! Unset columns are omitted from the output, which is exactly how JSON
//! expresses "not specified"; re-parsing therefore yields a structurally
//! equal dataset.

use crate::JsonError;
use dbseed_core::{Dataset, Value};
use serde_json::{Map, Number, Value as JsonValue};

/// Serialize a dataset as pretty-printed JSON.
pub fn to_json(dataset: &Dataset) -> Result<String, JsonError> {
    let mut root = Map::new();
    for table in dataset.tables() {
        let mut rows = Vec::with_capacity(table.len());
        for row in &table.rows {
            let mut object = Map::new();
            for (column, value) in row.iter() {
                let cell = match value {
                    Value::Null => JsonValue::Null,
                    Value::Bool(b) => JsonValue::Bool(*b),
                    Value::Int(i) => JsonValue::Number((*i).into()),
                    Value::Float(f) => match Number::from_f64(*f) {
                        Some(n) => JsonValue::Number(n),
                        None => {
                            return Err(JsonError::NonFiniteFloat(
                                table.name.clone(),
                                column.to_string(),
                            ))
                        }
                    },
                    Value::Text(s) => JsonValue::String(s.clone()),
                    Value::Unset => continue,
                };
                object.insert(column.to_string(), cell);
            }
            rows.push(JsonValue::Object(object));
        }
        root.insert(table.name.clone(), JsonValue::Array(rows));
    }
    Ok(serde_json::to_string_pretty(&JsonValue::Object(root))?)
}
