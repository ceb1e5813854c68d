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

//! The DBSeed fixture lifecycle engine.
//!
//! This crate wires the canonical dataset model to a running test: the
//! [`ResourceLocator`] maps dataset references to byte streams, the
//! format codecs (selected by [`DatasetFormat`]) parse them through a
//! shared [`DatasetCache`], the merger composes the fragments, and the
//! [`FixtureRunner`] drives the per-test state machine of connection,
//! setup operation, test body, teardown operation and release.
//!
//! SQL semantics, connections and configuration discovery stay outside:
//! they enter through the [`OperationEngine`], [`ConnectionFactory`] and
//! [`ConfigResolver`] collaborator traits.

mod cache;
mod config;
mod executor;
mod format;
mod lifecycle;
mod locator;

pub use cache::{DatasetCache, ShardedCache, SimpleCache};
pub use config::{
    ConfigResolver, EffectiveConfig, FixtureConfig, LayeredResolver, TestDescriptor,
};
pub use executor::{Connection, ConnectionFactory, OperationEngine, OperationExecutor};
pub use format::DatasetFormat;
pub use lifecycle::{FixtureRunner, FixtureSession, SessionState};
pub use locator::{ResolvedResource, ResourceLocator};
