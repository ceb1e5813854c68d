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

//! Flat tabular XML to canonical dataset conversion.
//!
//! The dialect is the classic flat dataset form: one root element
//! (conventionally `<dataset>`) wrapping one empty element per row, where
//! the element name is the table and the attributes are the columns:
//!
//! ```xml
//! <dataset>
//!   <users id="1" name="John"/>
//!   <users id="2" name="Jane"/>
//!   <posts id="10" author_id="1"/>
//! </dataset>
//! ```
//!
//! XML attributes are strings by the format's native rules, so every
//! column value is [`Value::Text`]. The first element seen for a table
//! fixes that table's position in the dataset.

use crate::XmlError;
use dbseed_core::{Dataset, Row, Value};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::io::Read;

/// Parse a flat XML dataset from a reader.
///
/// The entire stream is consumed. The reader is dropped on every exit
/// path, success or failure.
pub fn from_xml(mut reader: impl Read) -> Result<Dataset, XmlError> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    from_xml_str(&text)
}

/// Parse a flat XML dataset from a string.
pub fn from_xml_str(input: &str) -> Result<Dataset, XmlError> {
    let mut reader = Reader::from_str(input);
    let mut dataset = Dataset::new();
    let mut depth = 0usize;
    let mut saw_root = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                depth += 1;
                match depth {
                    1 => {
                        require_bare_root(&e)?;
                        saw_root = true;
                    }
                    2 => push_row(&mut dataset, &e)?,
                    _ => {
                        let name = element_name(&e);
                        return Err(XmlError::NestedElement(name));
                    }
                }
            }
            Event::Empty(e) => match depth {
                // `<dataset/>` alone: empty dataset. A lone empty element
                // with attributes is a stray row, not a root.
                0 => {
                    require_bare_root(&e)?;
                    saw_root = true;
                }
                1 => push_row(&mut dataset, &e)?,
                _ => {
                    let name = element_name(&e);
                    return Err(XmlError::NestedElement(name));
                }
            },
            Event::End(_) => {
                depth = depth.saturating_sub(1);
            }
            Event::Text(t) => {
                let text = t.unescape()?;
                if !text.trim().is_empty() {
                    return Err(XmlError::UnexpectedText(text.into_owned()));
                }
            }
            Event::Eof => break,
            // Declarations, comments, processing instructions and CDATA
            // carry no dataset content.
            _ => {}
        }
    }

    if !saw_root {
        return Err(XmlError::MissingRoot);
    }
    Ok(dataset)
}

fn element_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.name().as_ref()).into_owned()
}

fn require_bare_root(e: &BytesStart<'_>) -> Result<(), XmlError> {
    if e.attributes().next().is_some() {
        return Err(XmlError::RootAttributes(element_name(e)));
    }
    Ok(())
}

fn push_row(dataset: &mut Dataset, e: &BytesStart<'_>) -> Result<(), XmlError> {
    let table = element_name(e);
    let mut row = Row::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|err| XmlError::Attribute(table.clone(), err.to_string()))?;
        let column = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|err| XmlError::Attribute(table.clone(), err.to_string()))?;
        row.set(column, Value::Text(value.into_owned()));
    }
    dataset.push_row(table, row);
    Ok(())
}
