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

//! Core data model for DBSeed.
//!
//! The canonical currency of the engine is the [`Dataset`]: an ordered
//! mapping of table name to ordered rows of typed scalar columns. Every
//! format parser produces one, the merger composes them, and the operation
//! engine consumes the result.

mod dataset;
mod error;
mod merge;
mod operation;
mod value;

pub use dataset::{Dataset, Row, Table};
pub use error::{FixtureError, FixtureErrorKind, FixtureResult};
pub use merge::merge;
pub use operation::OperationKind;
pub use value::Value;
