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

//! Error types for the YAML codec.

use dbseed_core::FixtureError;
use thiserror::Error;

/// Errors raised while converting YAML to or from the canonical model.
#[derive(Debug, Error)]
pub enum YamlError {
    /// The stream is not syntactically valid YAML, or reading it failed.
    #[error("YAML decode error: {0}")]
    Decode(#[from] serde_yaml::Error),

    /// The document root is not a mapping of table sequences.
    #[error("YAML dataset root must be a mapping of table names to row sequences")]
    RootNotMapping,

    /// A mapping key is not a plain string.
    #[error("non-string key in YAML dataset: {0}")]
    NonStringKey(String),

    /// A table value is not a sequence.
    #[error("table {0:?} must be a sequence of row mappings")]
    TableNotSequence(String),

    /// A row element is not a mapping.
    #[error("row {1} of table {0:?} is not a mapping")]
    RowNotMapping(String, usize),

    /// A column holds a nested sequence or mapping.
    #[error("column {1:?} of table {0:?} holds a nested value; only scalars are allowed")]
    NestedValue(String, String),

    /// A YAML tag or number that cannot be represented as a scalar.
    #[error("column {1:?} of table {0:?} holds an unsupported YAML value")]
    UnsupportedValue(String, String),
}

impl From<YamlError> for FixtureError {
    fn from(err: YamlError) -> Self {
        FixtureError::parse(err.to_string())
    }
}
