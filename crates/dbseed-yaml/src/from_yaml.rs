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

//! YAML to canonical dataset conversion.
//!
//! The expected shape mirrors the JSON codec:
//!
//! ```yaml
//! users:
//!   - id: 1
//!     name: John
//!   - id: 2
//!     name: Jane
//! ```
//!
//! Mapping order is preserved, so table order follows the document.

use crate::YamlError;
use dbseed_core::{Dataset, Row, Value};
use serde_yaml::Value as YamlValue;
use std::io::Read;

/// Parse a YAML dataset from a reader.
///
/// The entire stream is consumed. The reader is dropped on every exit
/// path, success or failure.
pub fn from_yaml(reader: impl Read) -> Result<Dataset, YamlError> {
    let root: YamlValue = serde_yaml::from_reader(reader)?;
    project(root)
}

/// Parse a YAML dataset from a string.
pub fn from_yaml_str(input: &str) -> Result<Dataset, YamlError> {
    let root: YamlValue = serde_yaml::from_str(input)?;
    project(root)
}

fn project(root: YamlValue) -> Result<Dataset, YamlError> {
    // An entirely empty document is an empty dataset, not an error; YAML
    // decodes it as null.
    let tables = match root {
        YamlValue::Mapping(map) => map,
        YamlValue::Null => return Ok(Dataset::new()),
        _ => return Err(YamlError::RootNotMapping),
    };

    let mut dataset = Dataset::new();
    for (key, table_value) in tables {
        let table_name = match key {
            YamlValue::String(s) => s,
            other => return Err(YamlError::NonStringKey(format!("{:?}", other))),
        };
        let rows = match table_value {
            YamlValue::Sequence(rows) => rows,
            // `users:` with no entries decodes as null; treat it as an
            // empty table, same as an empty sequence.
            YamlValue::Null => Vec::new(),
            _ => return Err(YamlError::TableNotSequence(table_name)),
        };
        dataset.push_table(dbseed_core::Table::new(table_name.clone()));
        for (index, row_value) in rows.into_iter().enumerate() {
            let row = project_row(&table_name, index, row_value)?;
            dataset.push_row(table_name.clone(), row);
        }
    }
    Ok(dataset)
}

fn project_row(table: &str, index: usize, value: YamlValue) -> Result<Row, YamlError> {
    let mapping = match value {
        YamlValue::Mapping(map) => map,
        _ => return Err(YamlError::RowNotMapping(table.to_string(), index)),
    };

    let mut row = Row::new();
    for (key, cell) in mapping {
        let column = match key {
            YamlValue::String(s) => s,
            other => return Err(YamlError::NonStringKey(format!("{:?}", other))),
        };
        let scalar = match cell {
            YamlValue::Null => Value::Null,
            YamlValue::Bool(b) => Value::Bool(b),
            YamlValue::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else if let Some(f) = n.as_f64() {
                    Value::Float(f)
                } else {
                    return Err(YamlError::UnsupportedValue(table.to_string(), column));
                }
            }
            YamlValue::String(s) => Value::Text(s),
            YamlValue::Sequence(_) | YamlValue::Mapping(_) => {
                return Err(YamlError::NestedValue(table.to_string(), column));
            }
            YamlValue::Tagged(_) => {
                return Err(YamlError::UnsupportedValue(table.to_string(), column));
            }
        };
        row.set(column, scalar);
    }
    Ok(row)
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Happy path tests ====================

    #[test]
    fn test_from_yaml_basic() {
        let ds = from_yaml_str("users:\n  - id: 1\n    name: John\n  - id: 2\n    name: Jane\n")
            .unwrap();
        let users = ds.table("users").unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users.rows[0].get("id"), Some(&Value::Int(1)));
        assert_eq!(
            users.rows[1].get("name"),
            Some(&Value::Text("Jane".to_string()))
        );
    }

    #[test]
    fn test_from_yaml_preserves_table_order() {
        let ds = from_yaml_str("zebra: []\nalpha: []\nmid: []\n").unwrap();
        let names: Vec<&str> = ds.table_names().collect();
        assert_eq!(names, vec!["zebra", "alpha", "mid"]);
    }

    #[test]
    fn test_from_yaml_typed_scalars() {
        let ds =
            from_yaml_str("t:\n  - i: 42\n    f: 3.5\n    b: true\n    s: x\n    n: null\n")
                .unwrap();
        let row = &ds.table("t").unwrap().rows[0];
        assert_eq!(row.get("i"), Some(&Value::Int(42)));
        assert_eq!(row.get("f"), Some(&Value::Float(3.5)));
        assert_eq!(row.get("b"), Some(&Value::Bool(true)));
        assert_eq!(row.get("s"), Some(&Value::Text("x".to_string())));
        assert_eq!(row.get("n"), Some(&Value::Null));
    }

    #[test]
    fn test_from_yaml_empty_document_is_empty_dataset() {
        assert!(from_yaml_str("").unwrap().is_empty());
    }

    #[test]
    fn test_from_yaml_bare_table_key_is_empty_table() {
        let ds = from_yaml_str("users:\n").unwrap();
        assert!(ds.table("users").unwrap().is_empty());
    }

    #[test]
    fn test_from_yaml_reader() {
        let bytes = b"t:\n  - id: 1\n";
        let ds = from_yaml(&bytes[..]).unwrap();
        assert_eq!(ds.table("t").unwrap().len(), 1);
    }

    #[test]
    fn test_from_yaml_matches_json_projection() {
        // The same logical content through both codecs must be equal.
        let yaml = from_yaml_str("users:\n  - id: 1\n    name: John\n").unwrap();
        let mut expected = Dataset::new();
        expected.push_row("users", Row::new().with("id", 1i64).with("name", "John"));
        assert_eq!(yaml, expected);
    }

    // ==================== Failure tests ====================

    #[test]
    fn test_from_yaml_syntax_error() {
        let err = from_yaml_str("users: [\n").unwrap_err();
        assert!(matches!(err, YamlError::Decode(_)));
    }

    #[test]
    fn test_from_yaml_root_not_mapping() {
        let err = from_yaml_str("- 1\n- 2\n").unwrap_err();
        assert!(matches!(err, YamlError::RootNotMapping));
    }

    #[test]
    fn test_from_yaml_table_not_sequence() {
        let err = from_yaml_str("users:\n  id: 1\n").unwrap_err();
        assert!(matches!(err, YamlError::TableNotSequence(t) if t == "users"));
    }

    #[test]
    fn test_from_yaml_row_not_mapping() {
        let err = from_yaml_str("users:\n  - 1\n").unwrap_err();
        assert!(matches!(err, YamlError::RowNotMapping(t, 0) if t == "users"));
    }

    #[test]
    fn test_from_yaml_nested_value_rejected() {
        let err = from_yaml_str("users:\n  - tags:\n      - a\n").unwrap_err();
        assert!(matches!(err, YamlError::NestedValue(t, c) if t == "users" && c == "tags"));
    }

    #[test]
    fn test_from_yaml_io_error_is_decode_error() {
        struct Broken;
        impl Read for Broken {
            fn read(&mut self, _: &mut [u8]) -> std::io::Result<usize> {
                Err(std::io::Error::new(std::io::ErrorKind::Other, "boom"))
            }
        }
        let err = from_yaml(Broken).unwrap_err();
        assert!(matches!(err, YamlError::Decode(_)));
    }

    #[test]
    fn test_from_yaml_error_converts_to_parse_kind() {
        use dbseed_core::{FixtureError, FixtureErrorKind};
        let err: FixtureError = from_yaml_str("[").unwrap_err().into();
        assert_eq!(err.kind, FixtureErrorKind::Parse);
    }
}
