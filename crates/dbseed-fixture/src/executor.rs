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

//! Collaborator traits and the operation-executor adapter.
//!
//! The engine defines no SQL semantics. Connections, their factory and the
//! dataset-operation engine are opaque collaborators supplied by the
//! embedding test framework; this module pins down their seams and wraps
//! every engine failure into one uniform error type.

use dbseed_core::{Dataset, FixtureError, FixtureResult, OperationKind};
use std::sync::Arc;

/// An exclusive database connection for one test invocation.
///
/// The engine treats it as opaque; it only ever hands it to the operation
/// engine and closes it at session end.
pub trait Connection: Send {
    /// Release the connection. Called exactly once per session.
    fn close(&mut self) -> FixtureResult<()>;
}

/// Produces connections. May fail with a `Connection`-kind error.
pub trait ConnectionFactory: Send + Sync {
    /// Acquire a new connection.
    fn connection(&self) -> FixtureResult<Box<dyn Connection>>;
}

/// Executes the operation kinds against a live connection and a dataset.
///
/// Implementations own all SQL semantics (CLEAN_INSERT wiping then
/// inserting, REFRESH upserting, and so on). They are never invoked for
/// [`OperationKind::None`].
pub trait OperationEngine: Send + Sync {
    /// Apply `kind` for `dataset` on `connection`.
    fn execute(
        &self,
        kind: OperationKind,
        dataset: &Dataset,
        connection: &mut dyn Connection,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

/// Binds a dataset and an operation kind to the operation engine.
#[derive(Clone)]
pub struct OperationExecutor {
    engine: Arc<dyn OperationEngine>,
}

impl OperationExecutor {
    /// Create an executor over the given engine.
    pub fn new(engine: Arc<dyn OperationEngine>) -> Self {
        Self { engine }
    }

    /// Apply `kind` to `dataset` on `connection`.
    ///
    /// `NONE` is a guaranteed no-op: it returns without opening a
    /// statement or touching the connection or the engine. Every engine
    /// failure is wrapped into a single `Operation`-kind error carrying
    /// the kind and the table set involved.
    pub fn apply(
        &self,
        kind: OperationKind,
        dataset: &Dataset,
        connection: &mut dyn Connection,
    ) -> FixtureResult<()> {
        if kind == OperationKind::None {
            return Ok(());
        }
        self.engine
            .execute(kind, dataset, connection)
            .map_err(|cause| {
                let tables: Vec<&str> = dataset.table_names().collect();
                FixtureError::operation(format!("{} failed: {}", kind, cause))
                    .with_reference(tables.join(", "))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dbseed_core::{FixtureErrorKind, Row};
    use std::sync::Mutex;

    #[derive(Default)]
    struct ProbeConnection {
        closes: usize,
    }

    impl Connection for ProbeConnection {
        fn close(&mut self) -> FixtureResult<()> {
            self.closes += 1;
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingEngine {
        calls: Mutex<Vec<OperationKind>>,
        fail: bool,
    }

    impl OperationEngine for RecordingEngine {
        fn execute(
            &self,
            kind: OperationKind,
            _dataset: &Dataset,
            _connection: &mut dyn Connection,
        ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
            self.calls.lock().unwrap().push(kind);
            if self.fail {
                return Err("engine exploded".into());
            }
            Ok(())
        }
    }

    fn sample() -> Dataset {
        let mut ds = Dataset::new();
        ds.push_row("users", Row::new().with("id", 1i64));
        ds.push_row("posts", Row::new().with("id", 2i64));
        ds
    }

    // ==================== NONE no-op tests ====================

    #[test]
    fn test_none_never_reaches_the_engine() {
        let engine = Arc::new(RecordingEngine::default());
        let executor = OperationExecutor::new(engine.clone());
        let mut connection = ProbeConnection::default();
        executor
            .apply(OperationKind::None, &sample(), &mut connection)
            .unwrap();
        assert!(engine.calls.lock().unwrap().is_empty());
        assert_eq!(connection.closes, 0);
    }

    // ==================== Delegation tests ====================

    #[test]
    fn test_non_none_delegates_to_engine() {
        let engine = Arc::new(RecordingEngine::default());
        let executor = OperationExecutor::new(engine.clone());
        let mut connection = ProbeConnection::default();
        executor
            .apply(OperationKind::CleanInsert, &sample(), &mut connection)
            .unwrap();
        assert_eq!(
            *engine.calls.lock().unwrap(),
            vec![OperationKind::CleanInsert]
        );
    }

    #[test]
    fn test_every_non_none_kind_delegates() {
        let engine = Arc::new(RecordingEngine::default());
        let executor = OperationExecutor::new(engine.clone());
        let mut connection = ProbeConnection::default();
        for kind in OperationKind::ALL {
            executor.apply(kind, &sample(), &mut connection).unwrap();
        }
        let calls = engine.calls.lock().unwrap();
        assert_eq!(calls.len(), OperationKind::ALL.len() - 1);
        assert!(!calls.contains(&OperationKind::None));
    }

    #[test]
    fn test_engine_failure_is_wrapped_with_kind_and_tables() {
        let engine = Arc::new(RecordingEngine {
            fail: true,
            ..Default::default()
        });
        let executor = OperationExecutor::new(engine);
        let mut connection = ProbeConnection::default();
        let err = executor
            .apply(OperationKind::Delete, &sample(), &mut connection)
            .unwrap_err();
        assert_eq!(err.kind, FixtureErrorKind::Operation);
        assert!(err.message.contains("DELETE"));
        assert!(err.message.contains("engine exploded"));
        assert_eq!(err.reference.as_deref(), Some("users, posts"));
    }
}
