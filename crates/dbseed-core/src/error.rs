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

//! Error types for the fixture engine.
//!
//! Every failure in the engine surfaces as a single [`FixtureError`] so the
//! host test-framework hook has one catch path. The [`FixtureErrorKind`]
//! taxonomy distinguishes the failing stage.

use std::fmt;
use thiserror::Error;

/// The kind of fixture failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixtureErrorKind {
    /// Malformed or empty dataset reference.
    InvalidReference,
    /// Reference does not exist under its resolved scheme.
    ResourceNotFound,
    /// Stream is not valid for the selected encoding, or the decoded shape
    /// does not match "table name -> list of row objects".
    Parse,
    /// No resolvable connection factory, or malformed operation kind.
    Configuration,
    /// Connection factory or connection release failure.
    Connection,
    /// The dataset-operation engine failed.
    Operation,
    /// I/O failure outside a parse (locator reads, directory walks).
    Io,
}

impl fmt::Display for FixtureErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidReference => write!(f, "InvalidReferenceError"),
            Self::ResourceNotFound => write!(f, "ResourceNotFoundError"),
            Self::Parse => write!(f, "ParseError"),
            Self::Configuration => write!(f, "ConfigurationError"),
            Self::Connection => write!(f, "ConnectionError"),
            Self::Operation => write!(f, "OperationError"),
            Self::Io => write!(f, "IOError"),
        }
    }
}

/// An error raised by the fixture engine.
#[derive(Debug, Clone, Error)]
#[error("{kind}: {message}")]
pub struct FixtureError {
    /// The kind of error.
    pub kind: FixtureErrorKind,
    /// Human-readable error message, wrapping any underlying cause.
    pub message: String,
    /// The dataset reference or resource identity involved, when known.
    pub reference: Option<String>,
}

impl FixtureError {
    /// Create a new error.
    pub fn new(kind: FixtureErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            reference: None,
        }
    }

    /// Attach the dataset reference or resource identity involved.
    pub fn with_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    // Convenience constructors for each error kind
    pub fn invalid_reference(message: impl Into<String>) -> Self {
        Self::new(FixtureErrorKind::InvalidReference, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(FixtureErrorKind::ResourceNotFound, message)
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::new(FixtureErrorKind::Parse, message)
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(FixtureErrorKind::Configuration, message)
    }

    pub fn connection(message: impl Into<String>) -> Self {
        Self::new(FixtureErrorKind::Connection, message)
    }

    pub fn operation(message: impl Into<String>) -> Self {
        Self::new(FixtureErrorKind::Operation, message)
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::new(FixtureErrorKind::Io, message)
    }
}

/// Result type for fixture operations.
pub type FixtureResult<T> = Result<T, FixtureError>;
