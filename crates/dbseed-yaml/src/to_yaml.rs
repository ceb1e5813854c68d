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

//! Canonical dataset to YAML conversion.

use crate::YamlError;
use dbseed_core::{Dataset, Value};
use serde_yaml::{Mapping, Value as YamlValue};

/// Serialize a dataset as YAML. Unset columns are omitted.
pub fn to_yaml(dataset: &Dataset) -> Result<String, YamlError> {
    let mut root = Mapping::new();
    for table in dataset.tables() {
        let mut rows = Vec::with_capacity(table.len());
        for row in &table.rows {
            let mut mapping = Mapping::new();
            for (column, value) in row.iter() {
                let cell = match value {
                    Value::Null => YamlValue::Null,
                    Value::Bool(b) => YamlValue::Bool(*b),
                    Value::Int(i) => YamlValue::Number((*i).into()),
                    Value::Float(f) => YamlValue::Number((*f).into()),
                    Value::Text(s) => YamlValue::String(s.clone()),
                    Value::Unset => continue,
                };
                mapping.insert(YamlValue::String(column.to_string()), cell);
            }
            rows.push(YamlValue::Mapping(mapping));
        }
        root.insert(
            YamlValue::String(table.name.clone()),
            YamlValue::Sequence(rows),
        );
    }
    Ok(serde_yaml::to_string(&YamlValue::Mapping(root))?)
}
