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

//! Error types for the JSON codec.

use dbseed_core::FixtureError;
use thiserror::Error;

/// Errors raised while converting JSON to or from the canonical model.
///
/// I/O failures during the read surface through [`JsonError::Decode`]
/// (serde_json folds them into its own error), so callers have a single
/// failure branch.
#[derive(Debug, Error)]
pub enum JsonError {
    /// The stream is not syntactically valid JSON, or reading it failed.
    #[error("JSON decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// The document root is not an object of table arrays.
    #[error("JSON dataset root must be an object mapping table names to row arrays")]
    RootNotObject,

    /// A table value is not an array.
    #[error("table {0:?} must be an array of row objects")]
    TableNotArray(String),

    /// A row element is not an object.
    #[error("row {1} of table {0:?} is not an object")]
    RowNotObject(String, usize),

    /// A column holds a nested array or object.
    #[error("column {1:?} of table {0:?} holds a nested value; only scalars are allowed")]
    NestedValue(String, String),

    /// An integer column does not fit a 64-bit signed integer.
    #[error("column {1:?} of table {0:?} holds an integer out of i64 range")]
    IntOutOfRange(String, String),

    /// A float cannot be represented in JSON (NaN or infinity).
    #[error("column {1:?} of table {0:?} holds a non-finite float")]
    NonFiniteFloat(String, String),
}

impl From<JsonError> for FixtureError {
    fn from(err: JsonError) -> Self {
        FixtureError::parse(err.to_string())
    }
}
