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

//! Memoization of parsed datasets.
//!
//! The cache is keyed by canonical resource identity, not by the raw
//! reference string, so two spellings of the same file share one entry.
//! It is the only structure shared across concurrent test invocations:
//! concurrent `load_or_compute` calls for the same key run the parse
//! exactly once and all callers observe the same completed dataset, while
//! distinct keys never block each other. Computation happens inside a
//! per-key `OnceCell`, outside the map locks.
//!
//! There is no eviction beyond [`DatasetCache::clear`], called at suite
//! teardown; unbounded growth within one test process is accepted.

use dashmap::DashMap;
use dbseed_core::{Dataset, FixtureResult};
use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;

type Cell = Arc<OnceCell<Arc<Dataset>>>;

/// Shared parse cache contract.
///
/// The backend is a startup-time choice injected into the orchestrator;
/// both implementations below satisfy the same at-most-once guarantee.
pub trait DatasetCache: Send + Sync {
    /// Return the dataset for `key`, computing it at most once.
    ///
    /// A failed compute propagates its error and leaves the slot empty;
    /// parses are deterministic, so callers do not retry.
    fn load_or_compute(
        &self,
        key: &str,
        compute: &dyn Fn() -> FixtureResult<Dataset>,
    ) -> FixtureResult<Arc<Dataset>>;

    /// Number of distinct cached keys.
    fn len(&self) -> usize;

    /// Returns true if nothing is cached.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Evict all entries. Used at suite teardown to bound memory and to
    /// avoid stale datasets when later runs reuse paths with different
    /// contents.
    fn clear(&self);
}

/// Lock-sharded cache backend on `DashMap`.
#[derive(Default)]
pub struct ShardedCache {
    entries: DashMap<String, Cell>,
}

impl ShardedCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }
}

impl DatasetCache for ShardedCache {
    fn load_or_compute(
        &self,
        key: &str,
        compute: &dyn Fn() -> FixtureResult<Dataset>,
    ) -> FixtureResult<Arc<Dataset>> {
        let cell: Cell = self.entries.entry(key.to_string()).or_default().clone();
        // The shard lock is released here; the parse runs inside the
        // cell, serialized per key only.
        let value = cell.get_or_try_init(|| compute().map(Arc::new))?;
        Ok(Arc::clone(value))
    }

    fn len(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.value().get().is_some())
            .count()
    }

    fn clear(&self) {
        self.entries.clear();
    }
}

/// Simple fallback backend: one `RwLock` around a `HashMap`.
///
/// Same contract as [`ShardedCache`]; the write lock is held only to
/// insert the empty cell, never during a parse.
#[derive(Default)]
pub struct SimpleCache {
    entries: RwLock<HashMap<String, Cell>>,
}

impl SimpleCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }
}

impl DatasetCache for SimpleCache {
    fn load_or_compute(
        &self,
        key: &str,
        compute: &dyn Fn() -> FixtureResult<Dataset>,
    ) -> FixtureResult<Arc<Dataset>> {
        let existing = self.entries.read().get(key).cloned();
        let cell = match existing {
            Some(cell) => cell,
            None => self
                .entries
                .write()
                .entry(key.to_string())
                .or_default()
                .clone(),
        };
        let value = cell.get_or_try_init(|| compute().map(Arc::new))?;
        Ok(Arc::clone(value))
    }

    fn len(&self) -> usize {
        self.entries
            .read()
            .values()
            .filter(|cell| cell.get().is_some())
            .count()
    }

    fn clear(&self) {
        self.entries.write().clear();
    }
}
