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

//! Resource location: mapping dataset references to byte streams.
//!
//! A reference is a string with an optional scheme prefix:
//!
//! - `classpath:` looks the path up under the locator's configured root
//!   directories, in order; a bare reference (no scheme) does the same.
//! - `file:` loads from the local filesystem.
//! - `http:` / `https:` fetches over the network.
//!
//! A reference naming a directory expands to the lexicographically ordered
//! dataset files it contains, recursively; a file reference yields exactly
//! one resource. The canonical identity of each resolved resource (the
//! normalized `file://` path or the URL) is the parse-cache key, so two
//! spellings of the same file share one cache entry.

use crate::DatasetFormat;
use dbseed_core::{FixtureError, FixtureResult};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

/// A reference resolved to an openable byte stream.
#[derive(Clone)]
pub struct ResolvedResource {
    identity: String,
    format: DatasetFormat,
    source: ResourceSource,
}

#[derive(Clone)]
enum ResourceSource {
    File(PathBuf),
    Http(String, ureq::Agent),
}

impl std::fmt::Debug for ResolvedResource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedResource")
            .field("identity", &self.identity)
            .field("format", &self.format)
            .finish()
    }
}

impl ResolvedResource {
    /// Canonical resource identity, used as the parse-cache key.
    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// The encoding selected for this resource.
    pub fn format(&self) -> DatasetFormat {
        self.format
    }

    /// Open a fresh byte stream for this resource.
    ///
    /// Ownership of the stream passes to the caller, which must consume
    /// and drop it within a single parse call. Existence was checked at
    /// resolve time; a failure here (the resource vanished in between, or
    /// the transport broke) is wrapped as a `Parse`-kind error so the
    /// parsing call sites keep a single failure branch.
    pub fn open(&self) -> FixtureResult<Box<dyn Read>> {
        match &self.source {
            ResourceSource::File(path) => {
                let file = std::fs::File::open(path).map_err(|e| {
                    FixtureError::parse(format!("cannot open {}: {}", path.display(), e))
                        .with_reference(self.identity.clone())
                })?;
                Ok(Box::new(file))
            }
            ResourceSource::Http(url, agent) => {
                let response = agent.get(url).call().map_err(|e| {
                    FixtureError::parse(format!("cannot fetch {}: {}", url, e))
                        .with_reference(self.identity.clone())
                })?;
                Ok(Box::new(response.into_reader()))
            }
        }
    }
}

/// Maps dataset references to resolved resources.
pub struct ResourceLocator {
    classpath_roots: Vec<PathBuf>,
    agent: ureq::Agent,
}

impl ResourceLocator {
    /// Create a locator over the given classpath root directories, with a
    /// default HTTP agent (30 second timeouts).
    pub fn new(classpath_roots: Vec<PathBuf>) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(Duration::from_secs(30))
            .timeout(Duration::from_secs(30))
            .build();
        Self::with_agent(classpath_roots, agent)
    }

    /// Create a locator with an explicit HTTP agent.
    pub fn with_agent(classpath_roots: Vec<PathBuf>, agent: ureq::Agent) -> Self {
        Self {
            classpath_roots,
            agent,
        }
    }

    /// Resolve a reference to an ordered sequence of resources.
    pub fn resolve(&self, reference: &str) -> FixtureResult<Vec<ResolvedResource>> {
        let reference = reference.trim();
        if reference.is_empty() {
            return Err(FixtureError::invalid_reference("empty dataset reference"));
        }

        if let Some(rest) = reference.strip_prefix("classpath:") {
            self.resolve_classpath(reference, rest)
        } else if let Some(rest) = reference.strip_prefix("file:") {
            let path = rest.strip_prefix("//").unwrap_or(rest);
            if path.is_empty() {
                return Err(FixtureError::invalid_reference(format!(
                    "file reference has no path: {:?}",
                    reference
                )));
            }
            self.resolve_file(reference, Path::new(path))
        } else if reference.starts_with("http:") || reference.starts_with("https:") {
            self.resolve_http(reference)
        } else {
            // No recognized prefix defaults to classpath lookup.
            self.resolve_classpath(reference, reference)
        }
    }

    fn resolve_classpath(
        &self,
        reference: &str,
        path: &str,
    ) -> FixtureResult<Vec<ResolvedResource>> {
        let relative = path.trim_start_matches('/');
        if relative.is_empty() {
            return Err(FixtureError::invalid_reference(format!(
                "classpath reference has no path: {:?}",
                reference
            )));
        }
        for root in &self.classpath_roots {
            let candidate = root.join(relative);
            if candidate.exists() {
                return self.expand(reference, candidate);
            }
        }
        Err(
            FixtureError::not_found(format!("no classpath resource {:?}", relative))
                .with_reference(reference),
        )
    }

    fn resolve_file(&self, reference: &str, path: &Path) -> FixtureResult<Vec<ResolvedResource>> {
        if !path.exists() {
            return Err(
                FixtureError::not_found(format!("no such file: {}", path.display()))
                    .with_reference(reference),
            );
        }
        self.expand(reference, path.to_path_buf())
    }

    fn resolve_http(&self, reference: &str) -> FixtureResult<Vec<ResolvedResource>> {
        let format = DatasetFormat::from_path(reference).ok_or_else(|| {
            FixtureError::invalid_reference(format!(
                "cannot determine dataset format of {:?}",
                reference
            ))
        })?;
        // Existence check up front, so a dead URL fails at resolve time
        // like a missing file does.
        match self.agent.head(reference).call() {
            Ok(_) => {}
            Err(ureq::Error::Status(404, _)) => {
                return Err(FixtureError::not_found(format!("HTTP 404 for {}", reference))
                    .with_reference(reference));
            }
            Err(e) => {
                return Err(FixtureError::io(format!("cannot reach {}: {}", reference, e))
                    .with_reference(reference));
            }
        }
        Ok(vec![ResolvedResource {
            identity: reference.to_string(),
            format,
            source: ResourceSource::Http(reference.to_string(), self.agent.clone()),
        }])
    }

    fn expand(&self, reference: &str, path: PathBuf) -> FixtureResult<Vec<ResolvedResource>> {
        if path.is_dir() {
            let mut files = Vec::new();
            collect_dataset_files(&path, &mut files)?;
            files.sort();
            files
                .into_iter()
                .map(|file| self.single(reference, file))
                .collect()
        } else {
            Ok(vec![self.single(reference, path)?])
        }
    }

    fn single(&self, reference: &str, path: PathBuf) -> FixtureResult<ResolvedResource> {
        let format = path
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(DatasetFormat::from_extension)
            .ok_or_else(|| {
                FixtureError::invalid_reference(format!(
                    "unsupported dataset extension: {}",
                    path.display()
                ))
                .with_reference(reference)
            })?;
        let canonical = path.canonicalize().map_err(|e| {
            FixtureError::io(format!("cannot canonicalize {}: {}", path.display(), e))
                .with_reference(reference)
        })?;
        Ok(ResolvedResource {
            identity: format!("file://{}", canonical.display()),
            format,
            source: ResourceSource::File(canonical),
        })
    }
}

/// Recursively collect dataset files under `dir`.
///
/// Entries whose names are not valid Unicode are a known spurious
/// condition (foreign tooling dropping temp files); they are logged and
/// skipped rather than failing the whole expansion.
fn collect_dataset_files(dir: &Path, out: &mut Vec<PathBuf>) -> FixtureResult<()> {
    let entries = std::fs::read_dir(dir)
        .map_err(|e| FixtureError::io(format!("cannot read {}: {}", dir.display(), e)))?;
    for entry in entries {
        let entry =
            entry.map_err(|e| FixtureError::io(format!("cannot read {}: {}", dir.display(), e)))?;
        let path = entry.path();
        if entry.file_name().to_str().is_none() {
            warn!(directory = %dir.display(), "skipping directory entry with non-Unicode name");
            continue;
        }
        if path.is_dir() {
            collect_dataset_files(&path, out)?;
        } else if path
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(DatasetFormat::from_extension)
            .is_some()
        {
            out.push(path);
        }
    }
    Ok(())
}
