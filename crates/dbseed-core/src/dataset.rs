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

//! The canonical table model: rows, tables and datasets.
//!
//! Every format parser produces a [`Dataset`]; the operation engine consumes
//! one. Insertion order is preserved throughout: column order within a row,
//! row order within a table, and first-seen table order within a dataset.

use crate::Value;

/// An ordered mapping of column name to scalar value.
///
/// Column names are case-sensitive. Order is insertion order and matters
/// only for display and serialization, not for equality of the fixture
/// semantics; structural equality still compares it because parsers are
/// required to be order-deterministic.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    columns: Vec<(String, Value)>,
}

impl Row {
    /// Create an empty row.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a column value, replacing in place if the column already exists.
    pub fn set(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        let column = column.into();
        let value = value.into();
        if let Some(slot) = self.columns.iter_mut().find(|(c, _)| *c == column) {
            slot.1 = value;
        } else {
            self.columns.push((column, value));
        }
    }

    /// Builder-style [`set`](Self::set).
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(column, value);
        self
    }

    /// Get a column value. Absent columns are reported as `None`; the
    /// operation engine treats them like [`Value::Unset`].
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns
            .iter()
            .find(|(c, _)| c == column)
            .map(|(_, v)| v)
    }

    /// Column names in insertion order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(c, _)| c.as_str())
    }

    /// Column/value pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.columns.iter().map(|(c, v)| (c.as_str(), v))
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Returns true if the row has no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// A named, ordered sequence of rows.
///
/// Rows are not required to share a column set; the operation engine
/// reconciles missing columns as unset.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// Table name, unique within its dataset.
    pub name: String,
    /// Rows in insertion order.
    pub rows: Vec<Row>,
}

impl Table {
    /// Create an empty table.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rows: Vec::new(),
        }
    }

    /// Create a table with rows.
    pub fn with_rows(name: impl Into<String>, rows: Vec<Row>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    /// Append a row.
    pub fn add_row(&mut self, row: Row) {
        self.rows.push(row);
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// An ordered mapping of table name to [`Table`].
///
/// Table order is first-seen order, preserved across merged fragments.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    tables: Vec<Table>,
}

impl Dataset {
    /// Create an empty dataset. An empty dataset is a valid, no-op fixture.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a table by name.
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|t| t.name == name)
    }

    /// Tables in first-seen order.
    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    /// Table names in first-seen order.
    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.iter().map(|t| t.name.as_str())
    }

    /// Append a row to the named table, creating the table at the end of
    /// the dataset on first sight.
    pub fn push_row(&mut self, table: impl Into<String>, row: Row) {
        let table = table.into();
        match self.tables.iter_mut().find(|t| t.name == table) {
            Some(t) => t.add_row(row),
            None => self.tables.push(Table::with_rows(table, vec![row])),
        }
    }

    /// Append a whole table. Rows are folded into an existing table of the
    /// same name; a new name lands at the end.
    pub fn push_table(&mut self, table: Table) {
        match self.tables.iter_mut().find(|t| t.name == table.name) {
            Some(existing) => existing.rows.extend(table.rows),
            None => self.tables.push(table),
        }
    }

    /// Number of tables.
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Returns true if the dataset has no tables.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Total row count across all tables.
    pub fn row_count(&self) -> usize {
        self.tables.iter().map(Table::len).sum()
    }
}

impl FromIterator<Table> for Dataset {
    fn from_iter<I: IntoIterator<Item = Table>>(iter: I) -> Self {
        let mut ds = Dataset::new();
        for table in iter {
            ds.push_table(table);
        }
        ds
    }
}
