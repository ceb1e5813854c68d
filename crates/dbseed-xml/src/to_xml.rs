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

//! Canonical dataset to flat XML conversion.
//!
//! Scalars are written in their display form; XML carries them as
//! attribute strings. Null and unset columns are omitted (flat XML has no
//! null syntax), so the round-trip fixpoint of this codec is datasets
//! whose values are all strings.

use crate::XmlError;
use dbseed_core::{Dataset, Value};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::Writer;
use std::io::Cursor;

/// Serialize a dataset as flat XML under a `<dataset>` root.
pub fn to_xml(dataset: &Dataset) -> Result<String, XmlError> {
    let mut writer = Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2);

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(|e| XmlError::Encode(e.to_string()))?;
    writer
        .write_event(Event::Start(BytesStart::new("dataset")))
        .map_err(|e| XmlError::Encode(e.to_string()))?;

    for table in dataset.tables() {
        for row in &table.rows {
            let mut elem = BytesStart::new(table.name.as_str());
            for (column, value) in row.iter() {
                let text = match value {
                    Value::Null | Value::Unset => continue,
                    Value::Text(s) => s.clone(),
                    other => other.to_string(),
                };
                elem.push_attribute((column, text.as_str()));
            }
            writer
                .write_event(Event::Empty(elem))
                .map_err(|e| XmlError::Encode(e.to_string()))?;
        }
    }

    writer
        .write_event(Event::End(BytesEnd::new("dataset")))
        .map_err(|e| XmlError::Encode(e.to_string()))?;

    String::from_utf8(writer.into_inner().into_inner()).map_err(|e| XmlError::Encode(e.to_string()))
}
