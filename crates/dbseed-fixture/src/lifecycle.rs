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

//! The per-test fixture lifecycle.
//!
//! One [`FixtureSession`] per test invocation moves through
//! `Idle -> Configured -> Connected -> Seeded -> Running -> TornDown ->
//! Closed`; `Closed` is terminal and reached on every path. The host
//! test-framework hook calls [`FixtureRunner::before_test`] before the
//! test body and [`FixtureRunner::after_test`] after it, passing whether
//! the body failed.
//!
//! Failure ordering, preserved exactly:
//! - a test-body failure is never masked; teardown and release still run
//!   as cleanup and their errors are logged, not surfaced;
//! - otherwise a teardown error beats a release error (the release error
//!   is recorded and suppressed);
//! - a release error surfaces only when teardown succeeded.
//!
//! The connection is acquired once per session and released exactly once,
//! on every exit path.

use crate::{
    ConfigResolver, Connection, DatasetCache, EffectiveConfig, OperationEngine, OperationExecutor,
    ResourceLocator, TestDescriptor,
};
use dbseed_core::{merge, Dataset, FixtureError, FixtureResult};
use std::sync::Arc;
use tracing::{debug, error};

/// The states of one test invocation's fixture session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Nothing resolved yet.
    Idle,
    /// Effective configuration resolved.
    Configured,
    /// Connection acquired.
    Connected,
    /// Dataset loaded and setup applied.
    Seeded,
    /// Control is with the test body.
    Running,
    /// Teardown applied.
    TornDown,
    /// Terminal: connection released.
    Closed,
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Idle => "IDLE",
            Self::Configured => "CONFIGURED",
            Self::Connected => "CONNECTED",
            Self::Seeded => "SEEDED",
            Self::Running => "RUNNING",
            Self::TornDown => "TORN_DOWN",
            Self::Closed => "CLOSED",
        };
        write!(f, "{}", name)
    }
}

/// One test invocation's fixture state. Never shared across tests.
pub struct FixtureSession {
    descriptor: TestDescriptor,
    state: SessionState,
    config: EffectiveConfig,
    connection: Option<Box<dyn Connection>>,
    dataset: Arc<Dataset>,
    suppressed: Vec<FixtureError>,
}

impl std::fmt::Debug for FixtureSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FixtureSession")
            .field("descriptor", &self.descriptor)
            .field("state", &self.state)
            .field("connection", &self.connection.is_some())
            .field("dataset", &self.dataset)
            .field("suppressed", &self.suppressed)
            .finish_non_exhaustive()
    }
}

impl FixtureSession {
    /// The test this session belongs to.
    pub fn descriptor(&self) -> &TestDescriptor {
        &self.descriptor
    }

    /// Current state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// The merged dataset seeded for this test.
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// The live connection, for injection into the test body.
    ///
    /// Valid only between `SEEDED` and `TORN_DOWN`; `None` outside that
    /// window.
    pub fn connection(&mut self) -> Option<&mut (dyn Connection + '_)> {
        match self.state {
            SessionState::Seeded | SessionState::Running => {
                self.connection.as_mut().map(|c| c.as_mut() as _)
            }
            _ => None,
        }
    }

    /// Errors that were recorded but suppressed by the failure-ordering
    /// rule (release failures shadowed by teardown failures, cleanup
    /// failures shadowed by a test-body failure).
    pub fn suppressed_errors(&self) -> &[FixtureError] {
        &self.suppressed
    }
}

/// Drives fixture sessions. Shared by all tests of a suite; holds no
/// per-test state itself.
pub struct FixtureRunner {
    locator: ResourceLocator,
    cache: Arc<dyn DatasetCache>,
    executor: OperationExecutor,
    resolver: Arc<dyn ConfigResolver>,
}

impl FixtureRunner {
    /// Assemble a runner from its collaborators. All strategy choices
    /// (cache backend, operation engine, configuration source) are made
    /// here, once, at startup.
    pub fn new(
        locator: ResourceLocator,
        cache: Arc<dyn DatasetCache>,
        engine: Arc<dyn OperationEngine>,
        resolver: Arc<dyn ConfigResolver>,
    ) -> Self {
        Self {
            locator,
            cache,
            executor: OperationExecutor::new(engine),
            resolver,
        }
    }

    /// The shared parse cache, e.g. for `clear()` at suite teardown.
    pub fn cache(&self) -> &Arc<dyn DatasetCache> {
        &self.cache
    }

    /// Prepare the database for one test: resolve configuration, acquire
    /// a connection, load and merge the datasets, apply the setup
    /// operation.
    ///
    /// On success the session is in `RUNNING` and the host executes the
    /// test body. On failure the test is aborted before the body runs; a
    /// connection that was already acquired has been released (a release
    /// failure on this path is logged, the primary error surfaces).
    pub fn before_test(&self, descriptor: TestDescriptor) -> FixtureResult<FixtureSession> {
        debug!(test = %descriptor, "resolving fixture configuration");
        // Fail fast without opening a connection when nothing resolves.
        let config = self.resolver.resolve(&descriptor)?;
        debug!(test = %descriptor, state = %SessionState::Configured, "configuration resolved");

        let connection = config.factory.connection()?;
        let mut session = FixtureSession {
            descriptor,
            state: SessionState::Connected,
            config,
            connection: Some(connection),
            dataset: Arc::new(Dataset::new()),
            suppressed: Vec::new(),
        };
        debug!(test = %session.descriptor, state = %session.state, "connection acquired");

        match self.seed(&mut session) {
            Ok(()) => {
                session.state = SessionState::Seeded;
                debug!(test = %session.descriptor, state = %session.state, "fixture seeded");
                session.state = SessionState::Running;
                Ok(session)
            }
            Err(primary) => {
                // Setup failed: the connection is still released, and the
                // setup error is the one surfaced.
                if let Err(release) = release_connection(&mut session) {
                    error!(test = %session.descriptor, error = %release,
                        "suppressed connection release failure after setup failure");
                }
                session.state = SessionState::Closed;
                Err(primary)
            }
        }
    }

    /// Restore the database after the test body: apply the teardown
    /// operation with the already-loaded dataset, then release the
    /// connection. Always reaches `CLOSED`.
    ///
    /// `body_failed` tells the orchestrator the test body itself raised;
    /// the host rethrows that failure, so cleanup errors are recorded and
    /// logged instead of returned.
    pub fn after_test(
        &self,
        session: &mut FixtureSession,
        body_failed: bool,
    ) -> FixtureResult<()> {
        if session.state == SessionState::Closed {
            return Ok(());
        }

        let teardown_result = self.teardown(session);
        session.state = SessionState::TornDown;
        debug!(test = %session.descriptor, state = %session.state, "teardown applied");

        let release_result = release_connection(session);
        session.state = SessionState::Closed;
        debug!(test = %session.descriptor, state = %session.state, "session closed");

        if body_failed {
            for err in teardown_result.err().into_iter().chain(release_result.err()) {
                error!(test = %session.descriptor, error = %err,
                    "suppressed cleanup failure after test-body failure");
                session.suppressed.push(err);
            }
            return Ok(());
        }

        match (teardown_result, release_result) {
            (Err(teardown), Err(release)) => {
                error!(test = %session.descriptor, error = %release,
                    "suppressed connection release failure after teardown failure");
                session.suppressed.push(release);
                Err(teardown)
            }
            (Err(teardown), Ok(())) => Err(teardown),
            (Ok(()), Err(release)) => Err(release),
            (Ok(()), Ok(())) => Ok(()),
        }
    }

    /// Load, cache and merge the configured datasets, then apply setup.
    ///
    /// An empty reference list is the "no dataset declared" fast path: it
    /// yields an empty dataset and performs no engine call at all.
    fn seed(&self, session: &mut FixtureSession) -> FixtureResult<()> {
        if session.config.datasets.is_empty() {
            debug!(test = %session.descriptor, "no dataset declared");
            return Ok(());
        }

        let mut fragments = Vec::new();
        for reference in &session.config.datasets {
            for resource in self.locator.resolve(reference)? {
                let parsed = self.cache.load_or_compute(resource.identity(), &|| {
                    let stream = resource.open()?;
                    resource.format().parse(stream)
                })?;
                fragments.push((*parsed).clone());
            }
        }
        session.dataset = Arc::new(merge(fragments));
        debug!(
            test = %session.descriptor,
            tables = session.dataset.len(),
            rows = session.dataset.row_count(),
            "datasets merged"
        );

        let dataset = Arc::clone(&session.dataset);
        match session.connection.as_deref_mut() {
            Some(connection) => self
                .executor
                .apply(session.config.setup, &dataset, connection),
            None => Err(FixtureError::connection(
                "no live connection while seeding",
            )),
        }
    }

    /// Apply the teardown operation with the session's dataset. The
    /// no-dataset fast path performs no engine call here either.
    fn teardown(&self, session: &mut FixtureSession) -> FixtureResult<()> {
        if session.config.datasets.is_empty() {
            return Ok(());
        }
        let dataset = Arc::clone(&session.dataset);
        match session.connection.as_deref_mut() {
            Some(connection) => {
                self.executor
                    .apply(session.config.teardown, &dataset, connection)
            }
            None => Ok(()),
        }
    }
}

/// Release the session connection. `take` makes this exactly-once; a
/// second call is a no-op.
fn release_connection(session: &mut FixtureSession) -> FixtureResult<()> {
    match session.connection.take() {
        Some(mut connection) => connection.close(),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== State display tests ====================

    #[test]
    fn test_session_state_display() {
        assert_eq!(SessionState::Idle.to_string(), "IDLE");
        assert_eq!(SessionState::Configured.to_string(), "CONFIGURED");
        assert_eq!(SessionState::Connected.to_string(), "CONNECTED");
        assert_eq!(SessionState::Seeded.to_string(), "SEEDED");
        assert_eq!(SessionState::Running.to_string(), "RUNNING");
        assert_eq!(SessionState::TornDown.to_string(), "TORN_DOWN");
        assert_eq!(SessionState::Closed.to_string(), "CLOSED");
    }
}
