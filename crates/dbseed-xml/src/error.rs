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

//! Error types for the flat XML codec.

use dbseed_core::FixtureError;
use thiserror::Error;

/// Errors raised while converting flat XML to or from the canonical model.
#[derive(Debug, Error)]
pub enum XmlError {
    /// The stream is not well-formed XML.
    #[error("XML decode error: {0}")]
    Decode(#[from] quick_xml::Error),

    /// Reading the stream failed before decoding.
    #[error("I/O error while reading XML dataset: {0}")]
    Io(#[from] std::io::Error),

    /// A malformed or unreadable attribute.
    #[error("XML attribute error in row element {0:?}: {1}")]
    Attribute(String, String),

    /// The document has no root element.
    #[error("XML dataset must have a single root element wrapping row elements")]
    MissingRoot,

    /// The root element carries attributes; a row element is probably
    /// standing in for the root.
    #[error("root element {0:?} must not carry attributes; rows belong inside the root")]
    RootAttributes(String),

    /// A row element contains child elements.
    #[error("row element {0:?} must be empty; nested elements are not allowed")]
    NestedElement(String),

    /// Non-whitespace text content outside attributes.
    #[error("unexpected text content in XML dataset: {0:?}")]
    UnexpectedText(String),

    /// Serialization produced non-UTF-8 output.
    #[error("XML encode error: {0}")]
    Encode(String),
}

impl From<XmlError> for FixtureError {
    fn from(err: XmlError) -> Self {
        FixtureError::parse(err.to_string())
    }
}
