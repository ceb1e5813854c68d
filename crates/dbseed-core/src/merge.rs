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

//! Deterministic composition of dataset fragments.

use crate::Dataset;

/// Merge dataset fragments in declaration order.
///
/// The first fragment contributing a table name establishes that table's
/// position in the result; later fragments contributing the same name
/// append their rows after the existing ones, keeping their own internal
/// order. No row de-duplication is performed. An empty sequence yields an
/// empty dataset, which is a valid no-op fixture.
pub fn merge(datasets: impl IntoIterator<Item = Dataset>) -> Dataset {
    let mut result = Dataset::new();
    for fragment in datasets {
        for table in fragment.tables() {
            for row in &table.rows {
                result.push_row(table.name.clone(), row.clone());
            }
        }
    }
    result
}
