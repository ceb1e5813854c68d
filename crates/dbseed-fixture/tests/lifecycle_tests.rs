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

//! End-to-end tests of the fixture lifecycle with recording collaborators.
//!
//! Every scenario asserts the two totality guarantees: the session ends
//! `CLOSED` and the connection is released exactly once, regardless of
//! how the test body or the cleanup steps fared.

use dbseed_core::{FixtureErrorKind, OperationKind, Value};
use dbseed_fixture::{
    ConfigResolver, Connection, ConnectionFactory, DatasetCache, FixtureConfig, FixtureRunner,
    LayeredResolver, OperationEngine, ResourceLocator, SessionState, ShardedCache, TestDescriptor,
};
use dbseed_core::{Dataset, FixtureError, FixtureResult};
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

// =============================================================================
// Recording collaborators
// =============================================================================

#[derive(Clone, Default)]
struct EventLog(Arc<Mutex<Vec<String>>>);

impl EventLog {
    fn push(&self, event: impl Into<String>) {
        self.0.lock().unwrap().push(event.into());
    }

    fn events(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    fn count(&self, event: &str) -> usize {
        self.0.lock().unwrap().iter().filter(|e| *e == event).count()
    }
}

struct RecordingConnection {
    log: EventLog,
    fail_close: bool,
}

impl Connection for RecordingConnection {
    fn close(&mut self) -> FixtureResult<()> {
        self.log.push("close");
        if self.fail_close {
            return Err(FixtureError::connection("release failed"));
        }
        Ok(())
    }
}

#[derive(Clone)]
struct RecordingFactory {
    log: EventLog,
    fail_connect: bool,
    fail_close: bool,
}

impl ConnectionFactory for RecordingFactory {
    fn connection(&self) -> FixtureResult<Box<dyn Connection>> {
        if self.fail_connect {
            return Err(FixtureError::connection("factory refused"));
        }
        self.log.push("connect");
        Ok(Box::new(RecordingConnection {
            log: self.log.clone(),
            fail_close: self.fail_close,
        }))
    }
}

#[derive(Clone)]
struct RecordingEngine {
    log: EventLog,
    fail_on: Option<OperationKind>,
}

impl OperationEngine for RecordingEngine {
    fn execute(
        &self,
        kind: OperationKind,
        _dataset: &Dataset,
        _connection: &mut dyn Connection,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.log.push(format!("op:{}", kind));
        if self.fail_on == Some(kind) {
            return Err(format!("{} rejected", kind).into());
        }
        Ok(())
    }
}

// =============================================================================
// Harness
// =============================================================================

struct Harness {
    runner: FixtureRunner,
    log: EventLog,
    _fixtures: Option<TempDir>,
}

struct HarnessOptions {
    datasets: Vec<String>,
    setup: OperationKind,
    teardown: OperationKind,
    fail_connect: bool,
    fail_close: bool,
    fail_on: Option<OperationKind>,
}

impl Default for HarnessOptions {
    fn default() -> Self {
        Self {
            datasets: vec!["users.json".to_string(), "posts.yml".to_string()],
            setup: OperationKind::CleanInsert,
            teardown: OperationKind::DeleteAll,
            fail_connect: false,
            fail_close: false,
            fail_on: None,
        }
    }
}

fn write_fixtures(dir: &Path) {
    fs::write(
        dir.join("users.json"),
        r#"{"users": [{"id": 1, "name": "John"}, {"id": 2, "name": "Jane"}]}"#,
    )
    .unwrap();
    fs::write(dir.join("posts.yml"), "posts:\n  - id: 10\n    author_id: 1\n").unwrap();
}

fn harness(options: HarnessOptions) -> Harness {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    let fixtures = TempDir::new().unwrap();
    write_fixtures(fixtures.path());

    let log = EventLog::default();
    let mut resolver = LayeredResolver::new();
    resolver.register_suite(
        "Suite",
        FixtureConfig::new()
            .with_factory(Arc::new(RecordingFactory {
                log: log.clone(),
                fail_connect: options.fail_connect,
                fail_close: options.fail_close,
            }))
            .with_datasets(options.datasets)
            .with_setup(options.setup)
            .with_teardown(options.teardown),
    );

    let runner = FixtureRunner::new(
        ResourceLocator::new(vec![fixtures.path().to_path_buf()]),
        Arc::new(ShardedCache::new()),
        Arc::new(RecordingEngine {
            log: log.clone(),
            fail_on: options.fail_on,
        }),
        Arc::new(resolver),
    );

    Harness {
        runner,
        log,
        _fixtures: Some(fixtures),
    }
}

fn descriptor() -> TestDescriptor {
    TestDescriptor::test("Suite", "a_test")
}

// =============================================================================
// Happy path
// =============================================================================

#[test]
fn test_full_lifecycle_happy_path() {
    let h = harness(HarnessOptions::default());

    let mut session = h.runner.before_test(descriptor()).unwrap();
    assert_eq!(session.state(), SessionState::Running);

    // Merged dataset: first-seen table order across fragments
    let names: Vec<&str> = session.dataset().table_names().collect();
    assert_eq!(names, vec!["users", "posts"]);
    assert_eq!(
        session.dataset().table("users").unwrap().rows[0].get("name"),
        Some(&Value::Text("John".to_string()))
    );

    // Connection is injectable while the body runs
    assert!(session.connection().is_some());

    h.runner.after_test(&mut session, false).unwrap();
    assert_eq!(session.state(), SessionState::Closed);
    assert!(session.connection().is_none());
    assert!(session.suppressed_errors().is_empty());

    assert_eq!(
        h.log.events(),
        vec!["connect", "op:CLEAN_INSERT", "op:DELETE_ALL", "close"]
    );
}

#[test]
fn test_teardown_reuses_loaded_dataset_without_reparsing() {
    let h = harness(HarnessOptions::default());
    let mut session = h.runner.before_test(descriptor()).unwrap();
    assert_eq!(h.runner.cache().len(), 2); // users.json + posts.yml

    // Deleting the files between setup and teardown is harmless: the
    // dataset is already loaded and cached.
    let fixtures = h._fixtures.as_ref().unwrap();
    fs::remove_file(fixtures.path().join("users.json")).unwrap();
    fs::remove_file(fixtures.path().join("posts.yml")).unwrap();

    h.runner.after_test(&mut session, false).unwrap();
    assert_eq!(h.log.count("op:DELETE_ALL"), 1);
}

#[test]
fn test_second_test_hits_parse_cache() {
    let h = harness(HarnessOptions::default());
    for _ in 0..2 {
        let mut session = h.runner.before_test(descriptor()).unwrap();
        h.runner.after_test(&mut session, false).unwrap();
    }
    // Two resources, each parsed at most once across both tests
    assert_eq!(h.runner.cache().len(), 2);
    assert_eq!(h.log.count("connect"), 2);
    assert_eq!(h.log.count("close"), 2);
}

// =============================================================================
// No-dataset fast path
// =============================================================================

#[test]
fn test_empty_dataset_list_is_a_noop_fixture() {
    let h = harness(HarnessOptions {
        datasets: vec![],
        ..Default::default()
    });

    let mut session = h.runner.before_test(descriptor()).unwrap();
    assert_eq!(session.state(), SessionState::Running);
    assert!(session.dataset().is_empty());

    h.runner.after_test(&mut session, false).unwrap();
    assert_eq!(session.state(), SessionState::Closed);

    // Connection lifecycle ran, the operation engine was never called
    assert_eq!(h.log.events(), vec!["connect", "close"]);
}

// =============================================================================
// Setup failures
// =============================================================================

#[test]
fn test_missing_reference_aborts_and_releases_connection() {
    let h = harness(HarnessOptions {
        datasets: vec!["classpath:/missing.json".to_string()],
        ..Default::default()
    });

    let err = h.runner.before_test(descriptor()).unwrap_err();
    assert_eq!(err.kind, FixtureErrorKind::ResourceNotFound);

    // The engine never ran; the already-acquired connection was released
    assert_eq!(h.log.events(), vec!["connect", "close"]);
}

#[test]
fn test_setup_operation_failure_aborts_before_body() {
    let h = harness(HarnessOptions {
        fail_on: Some(OperationKind::CleanInsert),
        ..Default::default()
    });

    let err = h.runner.before_test(descriptor()).unwrap_err();
    assert_eq!(err.kind, FixtureErrorKind::Operation);
    assert!(err.message.contains("CLEAN_INSERT"));

    assert_eq!(h.log.events(), vec!["connect", "op:CLEAN_INSERT", "close"]);
}

#[test]
fn test_setup_failure_still_surfaces_when_release_also_fails() {
    let h = harness(HarnessOptions {
        fail_on: Some(OperationKind::CleanInsert),
        fail_close: true,
        ..Default::default()
    });

    let err = h.runner.before_test(descriptor()).unwrap_err();
    // The setup error wins; the release error is logged and suppressed
    assert_eq!(err.kind, FixtureErrorKind::Operation);
    assert_eq!(h.log.count("close"), 1);
}

#[test]
fn test_unresolvable_configuration_fails_before_connecting() {
    let log = EventLog::default();
    let runner = FixtureRunner::new(
        ResourceLocator::new(vec![]),
        Arc::new(ShardedCache::new()),
        Arc::new(RecordingEngine {
            log: log.clone(),
            fail_on: None,
        }),
        Arc::new(LayeredResolver::new()),
    );

    let err = runner.before_test(descriptor()).unwrap_err();
    assert_eq!(err.kind, FixtureErrorKind::Configuration);
    assert!(log.events().is_empty());
}

#[test]
fn test_connection_failure_surfaces_as_connection_error() {
    let h = harness(HarnessOptions {
        fail_connect: true,
        ..Default::default()
    });

    let err = h.runner.before_test(descriptor()).unwrap_err();
    assert_eq!(err.kind, FixtureErrorKind::Connection);
    // Nothing to release: no connection was ever handed out
    assert_eq!(h.log.count("close"), 0);
}

// =============================================================================
// Failure ordering after the body
// =============================================================================

#[test]
fn test_teardown_error_beats_release_error() {
    let h = harness(HarnessOptions {
        fail_on: Some(OperationKind::DeleteAll),
        fail_close: true,
        ..Default::default()
    });

    let mut session = h.runner.before_test(descriptor()).unwrap();
    let err = h.runner.after_test(&mut session, false).unwrap_err();

    assert_eq!(err.kind, FixtureErrorKind::Operation);
    assert!(err.message.contains("DELETE_ALL"));
    // The release error is recorded, not surfaced
    assert_eq!(session.suppressed_errors().len(), 1);
    assert_eq!(
        session.suppressed_errors()[0].kind,
        FixtureErrorKind::Connection
    );
    assert_eq!(session.state(), SessionState::Closed);
    assert_eq!(h.log.count("close"), 1);
}

#[test]
fn test_release_error_surfaces_when_teardown_succeeds() {
    let h = harness(HarnessOptions {
        fail_close: true,
        ..Default::default()
    });

    let mut session = h.runner.before_test(descriptor()).unwrap();
    let err = h.runner.after_test(&mut session, false).unwrap_err();

    assert_eq!(err.kind, FixtureErrorKind::Connection);
    assert!(session.suppressed_errors().is_empty());
    assert_eq!(session.state(), SessionState::Closed);
}

#[test]
fn test_body_failure_is_never_masked_by_cleanup_failures() {
    let h = harness(HarnessOptions {
        fail_on: Some(OperationKind::DeleteAll),
        fail_close: true,
        ..Default::default()
    });

    let mut session = h.runner.before_test(descriptor()).unwrap();
    // The body failed; the host rethrows its error, so cleanup must
    // return Ok and only record what went wrong.
    h.runner.after_test(&mut session, true).unwrap();

    assert_eq!(session.suppressed_errors().len(), 2);
    assert_eq!(session.state(), SessionState::Closed);
    assert_eq!(h.log.count("op:DELETE_ALL"), 1);
    assert_eq!(h.log.count("close"), 1);
}

#[test]
fn test_body_failure_with_clean_teardown_reports_nothing() {
    let h = harness(HarnessOptions::default());
    let mut session = h.runner.before_test(descriptor()).unwrap();
    h.runner.after_test(&mut session, true).unwrap();
    assert!(session.suppressed_errors().is_empty());
    assert_eq!(h.log.count("close"), 1);
}

// =============================================================================
// Totality
// =============================================================================

#[test]
fn test_after_test_is_idempotent_once_closed() {
    let h = harness(HarnessOptions::default());
    let mut session = h.runner.before_test(descriptor()).unwrap();
    h.runner.after_test(&mut session, false).unwrap();
    h.runner.after_test(&mut session, false).unwrap();
    // Still exactly one release
    assert_eq!(h.log.count("close"), 1);
}

#[test]
fn test_concurrent_tests_do_not_share_sessions() {
    let h = Arc::new(harness(HarnessOptions::default()));
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let h = Arc::clone(&h);
            std::thread::spawn(move || {
                let descriptor = TestDescriptor::test("Suite", format!("test_{}", i));
                let mut session = h.runner.before_test(descriptor).unwrap();
                assert!(session.connection().is_some());
                h.runner.after_test(&mut session, false).unwrap();
                assert_eq!(session.state(), SessionState::Closed);
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(h.log.count("connect"), 4);
    assert_eq!(h.log.count("close"), 4);
    // Shared cache still parsed each resource once
    assert_eq!(h.runner.cache().len(), 2);
}

#[test]
fn test_cache_clear_at_suite_teardown() {
    let h = harness(HarnessOptions::default());
    let mut session = h.runner.before_test(descriptor()).unwrap();
    h.runner.after_test(&mut session, false).unwrap();
    assert_eq!(h.runner.cache().len(), 2);
    h.runner.cache().clear();
    assert!(h.runner.cache().is_empty());
}
