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

//! Database operation kinds.

use crate::{FixtureError, FixtureResult};
use std::fmt;
use std::str::FromStr;

/// The closed set of database-state transitions the operation engine
/// supports. `None` is a guaranteed no-op that never touches the
/// connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OperationKind {
    /// No operation; the connection is not touched.
    #[default]
    None,
    /// Wipe the dataset's tables, then insert its rows.
    CleanInsert,
    /// Insert the dataset's rows.
    Insert,
    /// Delete exactly the dataset's rows.
    Delete,
    /// Delete all rows from the dataset's tables.
    DeleteAll,
    /// Truncate the dataset's tables.
    TruncateTable,
    /// Insert missing rows, update existing ones.
    Refresh,
    /// Update the dataset's rows.
    Update,
}

impl OperationKind {
    /// All kinds, in declaration order.
    pub const ALL: [OperationKind; 8] = [
        Self::None,
        Self::CleanInsert,
        Self::Insert,
        Self::Delete,
        Self::DeleteAll,
        Self::TruncateTable,
        Self::Refresh,
        Self::Update,
    ];

    /// The configuration-file spelling of this kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::CleanInsert => "CLEAN_INSERT",
            Self::Insert => "INSERT",
            Self::Delete => "DELETE",
            Self::DeleteAll => "DELETE_ALL",
            Self::TruncateTable => "TRUNCATE_TABLE",
            Self::Refresh => "REFRESH",
            Self::Update => "UPDATE",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for OperationKind {
    type Err = FixtureError;

    fn from_str(s: &str) -> FixtureResult<Self> {
        match s {
            "NONE" => Ok(Self::None),
            "CLEAN_INSERT" => Ok(Self::CleanInsert),
            "INSERT" => Ok(Self::Insert),
            "DELETE" => Ok(Self::Delete),
            "DELETE_ALL" => Ok(Self::DeleteAll),
            "TRUNCATE_TABLE" => Ok(Self::TruncateTable),
            "REFRESH" => Ok(Self::Refresh),
            "UPDATE" => Ok(Self::Update),
            other => Err(FixtureError::configuration(format!(
                "unknown operation kind: {:?}",
                other
            ))),
        }
    }
}
