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

//! Per-test configuration resolution.
//!
//! The core never inspects test-framework metadata. Whatever front-end
//! binds to the host framework produces a [`TestDescriptor`] and registers
//! partial [`FixtureConfig`]s; resolution layers the test-level override
//! onto the suite-level default field by field (the override wins, absence
//! inherits) and fails with a `Configuration` error when no connection
//! factory can be determined.

use crate::ConnectionFactory;
use dbseed_core::{FixtureError, FixtureResult, OperationKind};
use std::collections::HashMap;
use std::sync::Arc;

/// Identity of the test being run: a suite (class) and optionally one of
/// its tests (methods).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TestDescriptor {
    /// Suite name.
    pub suite: String,
    /// Test name within the suite, when resolving a single test.
    pub test: Option<String>,
}

impl TestDescriptor {
    /// Descriptor for a whole suite.
    pub fn suite(suite: impl Into<String>) -> Self {
        Self {
            suite: suite.into(),
            test: None,
        }
    }

    /// Descriptor for one test within a suite.
    pub fn test(suite: impl Into<String>, test: impl Into<String>) -> Self {
        Self {
            suite: suite.into(),
            test: Some(test.into()),
        }
    }
}

impl std::fmt::Display for TestDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.test {
            Some(test) => write!(f, "{}::{}", self.suite, test),
            None => write!(f, "{}", self.suite),
        }
    }
}

/// A partial fixture configuration. `None` fields inherit from the layer
/// below.
#[derive(Clone, Default)]
pub struct FixtureConfig {
    /// Connection factory to acquire the session connection from.
    pub factory: Option<Arc<dyn ConnectionFactory>>,
    /// Ordered dataset references.
    pub datasets: Option<Vec<String>>,
    /// Operation applied before the test body.
    pub setup: Option<OperationKind>,
    /// Operation applied after the test body.
    pub teardown: Option<OperationKind>,
}

impl FixtureConfig {
    /// Empty configuration; everything inherits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the connection factory.
    pub fn with_factory(mut self, factory: Arc<dyn ConnectionFactory>) -> Self {
        self.factory = Some(factory);
        self
    }

    /// Set the ordered dataset references.
    pub fn with_datasets(mut self, datasets: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.datasets = Some(datasets.into_iter().map(Into::into).collect());
        self
    }

    /// Set the setup operation.
    pub fn with_setup(mut self, setup: OperationKind) -> Self {
        self.setup = Some(setup);
        self
    }

    /// Set the teardown operation.
    pub fn with_teardown(mut self, teardown: OperationKind) -> Self {
        self.teardown = Some(teardown);
        self
    }

    /// Layer `self` over `base`: each field of `self` wins when present,
    /// otherwise the base's field is inherited.
    pub fn layered_over(&self, base: &FixtureConfig) -> FixtureConfig {
        FixtureConfig {
            factory: self.factory.clone().or_else(|| base.factory.clone()),
            datasets: self.datasets.clone().or_else(|| base.datasets.clone()),
            setup: self.setup.or(base.setup),
            teardown: self.teardown.or(base.teardown),
        }
    }

    /// Finalize into an effective configuration.
    ///
    /// Defaults: no datasets, `CLEAN_INSERT` setup, `NONE` teardown. A
    /// missing connection factory is a `Configuration` error.
    pub fn into_effective(self, descriptor: &TestDescriptor) -> FixtureResult<EffectiveConfig> {
        let factory = self.factory.ok_or_else(|| {
            FixtureError::configuration(format!(
                "no connection factory resolvable for {}",
                descriptor
            ))
        })?;
        Ok(EffectiveConfig {
            factory,
            datasets: self.datasets.unwrap_or_default(),
            setup: self.setup.unwrap_or(OperationKind::CleanInsert),
            teardown: self.teardown.unwrap_or(OperationKind::None),
        })
    }
}

/// The fully resolved per-test configuration.
#[derive(Clone)]
pub struct EffectiveConfig {
    /// Connection factory for the session.
    pub factory: Arc<dyn ConnectionFactory>,
    /// Ordered dataset references; empty means "no dataset declared".
    pub datasets: Vec<String>,
    /// Setup operation.
    pub setup: OperationKind,
    /// Teardown operation.
    pub teardown: OperationKind,
}

impl std::fmt::Debug for EffectiveConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EffectiveConfig")
            .field("datasets", &self.datasets)
            .field("setup", &self.setup)
            .field("teardown", &self.teardown)
            .finish_non_exhaustive()
    }
}

/// Supplies the effective configuration for a test.
pub trait ConfigResolver: Send + Sync {
    /// Resolve the effective configuration for `descriptor`.
    fn resolve(&self, descriptor: &TestDescriptor) -> FixtureResult<EffectiveConfig>;
}

/// A registry-backed resolver: suite-level defaults layered with
/// test-level overrides.
#[derive(Default)]
pub struct LayeredResolver {
    suites: HashMap<String, FixtureConfig>,
    tests: HashMap<(String, String), FixtureConfig>,
}

impl LayeredResolver {
    /// Empty resolver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the default configuration for a suite.
    pub fn register_suite(&mut self, suite: impl Into<String>, config: FixtureConfig) {
        self.suites.insert(suite.into(), config);
    }

    /// Register an override for one test of a suite.
    pub fn register_test(
        &mut self,
        suite: impl Into<String>,
        test: impl Into<String>,
        config: FixtureConfig,
    ) {
        self.tests.insert((suite.into(), test.into()), config);
    }
}

impl ConfigResolver for LayeredResolver {
    fn resolve(&self, descriptor: &TestDescriptor) -> FixtureResult<EffectiveConfig> {
        let defaults = self.suites.get(&descriptor.suite).cloned().unwrap_or_default();
        let layered = match &descriptor.test {
            Some(test) => self
                .tests
                .get(&(descriptor.suite.clone(), test.clone()))
                .map(|overrides| overrides.layered_over(&defaults))
                .unwrap_or(defaults),
            None => defaults,
        };
        layered.into_effective(descriptor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Connection;
    use dbseed_core::FixtureErrorKind;

    struct NullFactory;

    impl ConnectionFactory for NullFactory {
        fn connection(&self) -> FixtureResult<Box<dyn Connection>> {
            Err(FixtureError::connection("null factory"))
        }
    }

    fn factory() -> Arc<dyn ConnectionFactory> {
        Arc::new(NullFactory)
    }

    // ==================== Descriptor tests ====================

    #[test]
    fn test_descriptor_display() {
        assert_eq!(TestDescriptor::suite("UserTests").to_string(), "UserTests");
        assert_eq!(
            TestDescriptor::test("UserTests", "creates_user").to_string(),
            "UserTests::creates_user"
        );
    }

    // ==================== Layering tests ====================

    #[test]
    fn test_layering_override_wins_per_field() {
        let base = FixtureConfig::new()
            .with_factory(factory())
            .with_datasets(["base.json"])
            .with_setup(OperationKind::CleanInsert)
            .with_teardown(OperationKind::DeleteAll);
        let overrides = FixtureConfig::new().with_datasets(["override.json"]);

        let layered = overrides.layered_over(&base);
        assert_eq!(layered.datasets, Some(vec!["override.json".to_string()]));
        // Inherited fields
        assert!(layered.factory.is_some());
        assert_eq!(layered.setup, Some(OperationKind::CleanInsert));
        assert_eq!(layered.teardown, Some(OperationKind::DeleteAll));
    }

    #[test]
    fn test_layering_absent_override_inherits_everything() {
        let base = FixtureConfig::new()
            .with_factory(factory())
            .with_setup(OperationKind::Insert);
        let layered = FixtureConfig::new().layered_over(&base);
        assert!(layered.factory.is_some());
        assert_eq!(layered.setup, Some(OperationKind::Insert));
    }

    // ==================== Effective config tests ====================

    #[test]
    fn test_effective_defaults() {
        let effective = FixtureConfig::new()
            .with_factory(factory())
            .into_effective(&TestDescriptor::suite("S"))
            .unwrap();
        assert!(effective.datasets.is_empty());
        assert_eq!(effective.setup, OperationKind::CleanInsert);
        assert_eq!(effective.teardown, OperationKind::None);
    }

    #[test]
    fn test_missing_factory_is_configuration_error() {
        let err = FixtureConfig::new()
            .with_datasets(["a.json"])
            .into_effective(&TestDescriptor::test("S", "t"))
            .unwrap_err();
        assert_eq!(err.kind, FixtureErrorKind::Configuration);
        assert!(err.message.contains("S::t"));
    }

    // ==================== Resolver tests ====================

    #[test]
    fn test_resolver_layers_test_over_suite() {
        let mut resolver = LayeredResolver::new();
        resolver.register_suite(
            "S",
            FixtureConfig::new()
                .with_factory(factory())
                .with_datasets(["suite.json"])
                .with_teardown(OperationKind::DeleteAll),
        );
        resolver.register_test(
            "S",
            "special",
            FixtureConfig::new().with_datasets(["special.json"]),
        );

        let effective = resolver.resolve(&TestDescriptor::test("S", "special")).unwrap();
        assert_eq!(effective.datasets, vec!["special.json".to_string()]);
        assert_eq!(effective.teardown, OperationKind::DeleteAll);

        let plain = resolver.resolve(&TestDescriptor::test("S", "plain")).unwrap();
        assert_eq!(plain.datasets, vec!["suite.json".to_string()]);
    }

    #[test]
    fn test_resolver_unknown_suite_fails_fast() {
        let resolver = LayeredResolver::new();
        let err = resolver
            .resolve(&TestDescriptor::suite("Unknown"))
            .unwrap_err();
        assert_eq!(err.kind, FixtureErrorKind::Configuration);
    }
}
