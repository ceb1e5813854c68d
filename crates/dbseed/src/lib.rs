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

//! # DBSeed - Declarative Database Fixtures
//!
//! DBSeed seeds a database to a known state before each integration test
//! and restores it afterwards. Fixtures are declared as dataset files
//! (JSON, YAML or XML), parsed into one canonical tabular model, merged,
//! cached, and applied through a pluggable operation engine.
//!
//! ## Quick Start
//!
//! ```rust
//! use dbseed::{json, yaml, merge};
//!
//! let users = json::from_json_str(
//!     r#"{"users": [{"id": 1, "name": "Alice"}]}"#,
//! ).expect("Failed to parse");
//!
//! let posts = yaml::from_yaml_str(
//!     "posts:\n  - id: 10\n    author_id: 1\n",
//! ).expect("Failed to parse");
//!
//! // One dataset, table order preserved across fragments
//! let seed = merge([users, posts]);
//! assert_eq!(seed.table_names().collect::<Vec<_>>(), vec!["users", "posts"]);
//! ```
//!
//! ## Modules
//!
//! - [`json`]: JSON dataset codec
//! - [`yaml`]: YAML dataset codec
//! - [`xml`]: flat-XML dataset codec
//! - [`fixture`]: resource locator, parse cache and the per-test lifecycle

// Re-export core types
pub use dbseed_core::{
    // Merging
    merge,
    // Main types
    Dataset,
    // Errors
    FixtureError,
    FixtureErrorKind,
    FixtureResult,
    // Operations
    OperationKind,
    Row,
    Table,
    Value,
};

// Re-export the JSON codec
pub mod json {
    //! JSON dataset codec
    pub use dbseed_json::{from_json, from_json_slice, from_json_str, to_json, JsonError};
}

// Re-export the YAML codec
pub mod yaml {
    //! YAML dataset codec
    pub use dbseed_yaml::{from_yaml, from_yaml_str, to_yaml, YamlError};
}

// Re-export the XML codec
pub mod xml {
    //! Flat-XML dataset codec
    pub use dbseed_xml::{from_xml, from_xml_str, to_xml, XmlError};
}

// Re-export the fixture lifecycle
pub mod fixture {
    //! Resource resolution, parse caching and the per-test lifecycle
    pub use dbseed_fixture::{
        ConfigResolver, Connection, ConnectionFactory, DatasetCache, DatasetFormat,
        EffectiveConfig, FixtureConfig, FixtureRunner, FixtureSession, LayeredResolver,
        OperationEngine, OperationExecutor, ResolvedResource, ResourceLocator, SessionState,
        ShardedCache, SimpleCache, TestDescriptor,
    };
}

// Convenience functions at crate root

use dbseed_fixture::DatasetFormat;
use std::fs::File;
use std::path::Path;

/// Load a dataset from a file, selecting the codec by file extension
/// (`.json`, `.yaml`/`.yml` or `.xml`).
///
/// # Examples
///
/// ```rust,no_run
/// let seed = dbseed::load_dataset("fixtures/users.json").unwrap();
/// assert!(!seed.is_empty());
/// ```
pub fn load_dataset(path: impl AsRef<Path>) -> FixtureResult<Dataset> {
    let path = path.as_ref();
    let format = path
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(DatasetFormat::from_extension)
        .ok_or_else(|| {
            FixtureError::invalid_reference("no dataset codec for file extension")
                .with_reference(path.display().to_string())
        })?;
    let file = File::open(path).map_err(|e| {
        FixtureError::not_found(format!("cannot open dataset file: {}", e))
            .with_reference(path.display().to_string())
    })?;
    format.parse(Box::new(file))
}

/// Load and merge several dataset files into one dataset, in order.
pub fn load_datasets(
    paths: impl IntoIterator<Item = impl AsRef<Path>>,
) -> FixtureResult<Dataset> {
    let mut fragments = Vec::new();
    for path in paths {
        fragments.push(load_dataset(path)?);
    }
    Ok(merge(fragments))
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Codec dispatch tests ====================

    #[test]
    fn test_load_dataset_rejects_unknown_extension() {
        let err = load_dataset("fixtures/users.csv").unwrap_err();
        assert_eq!(err.kind, FixtureErrorKind::InvalidReference);
        assert_eq!(err.reference.as_deref(), Some("fixtures/users.csv"));
    }

    #[test]
    fn test_load_dataset_missing_file_is_not_found() {
        let err = load_dataset("does/not/exist.json").unwrap_err();
        assert_eq!(err.kind, FixtureErrorKind::ResourceNotFound);
    }
}
