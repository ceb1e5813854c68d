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

//! Dataset encodings and parser selection.

use dbseed_core::{Dataset, FixtureResult};
use std::io::Read;
use std::path::Path;

/// A supported dataset encoding, selected by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetFormat {
    /// JSON: object of table arrays.
    Json,
    /// YAML: mapping of table sequences.
    Yaml,
    /// Flat tabular XML: row elements with column attributes.
    Xml,
}

impl DatasetFormat {
    /// Extensions recognized as dataset files, for directory expansion.
    pub const EXTENSIONS: [&'static str; 4] = ["json", "yaml", "yml", "xml"];

    /// Select a format by file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            "xml" => Some(Self::Xml),
            _ => None,
        }
    }

    /// Select a format from a path or URL by its extension.
    pub fn from_path(path: &str) -> Option<Self> {
        Path::new(path)
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Parse a dataset from a byte stream in this encoding.
    ///
    /// The stream is consumed and dropped on every exit path; decode and
    /// I/O failures both surface as `Parse`-kind errors.
    pub fn parse(&self, reader: Box<dyn Read>) -> FixtureResult<Dataset> {
        match self {
            Self::Json => Ok(dbseed_json::from_json(reader)?),
            Self::Yaml => Ok(dbseed_yaml::from_yaml(reader)?),
            Self::Xml => Ok(dbseed_xml::from_xml(reader)?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dbseed_core::{FixtureErrorKind, Value};

    // ==================== Selection tests ====================

    #[test]
    fn test_from_extension() {
        assert_eq!(DatasetFormat::from_extension("json"), Some(DatasetFormat::Json));
        assert_eq!(DatasetFormat::from_extension("yaml"), Some(DatasetFormat::Yaml));
        assert_eq!(DatasetFormat::from_extension("yml"), Some(DatasetFormat::Yaml));
        assert_eq!(DatasetFormat::from_extension("xml"), Some(DatasetFormat::Xml));
        assert_eq!(DatasetFormat::from_extension("csv"), None);
    }

    #[test]
    fn test_from_extension_case_insensitive() {
        assert_eq!(DatasetFormat::from_extension("JSON"), Some(DatasetFormat::Json));
        assert_eq!(DatasetFormat::from_extension("Yml"), Some(DatasetFormat::Yaml));
    }

    #[test]
    fn test_from_path() {
        assert_eq!(
            DatasetFormat::from_path("fixtures/users.json"),
            Some(DatasetFormat::Json)
        );
        assert_eq!(
            DatasetFormat::from_path("http://example.com/data/users.yml"),
            Some(DatasetFormat::Yaml)
        );
        assert_eq!(DatasetFormat::from_path("no_extension"), None);
        assert_eq!(DatasetFormat::from_path("archive.tar.gz"), None);
    }

    // ==================== Dispatch tests ====================

    #[test]
    fn test_parse_dispatch_json() {
        let bytes: &[u8] = br#"{"t": [{"id": 1}]}"#;
        let ds = DatasetFormat::Json.parse(Box::new(bytes)).unwrap();
        assert_eq!(ds.table("t").unwrap().rows[0].get("id"), Some(&Value::Int(1)));
    }

    #[test]
    fn test_parse_dispatch_yaml() {
        let bytes: &[u8] = b"t:\n  - id: 1\n";
        let ds = DatasetFormat::Yaml.parse(Box::new(bytes)).unwrap();
        assert_eq!(ds.table("t").unwrap().len(), 1);
    }

    #[test]
    fn test_parse_dispatch_xml() {
        let bytes: &[u8] = br#"<dataset><t id="1"/></dataset>"#;
        let ds = DatasetFormat::Xml.parse(Box::new(bytes)).unwrap();
        assert_eq!(
            ds.table("t").unwrap().rows[0].get("id"),
            Some(&Value::Text("1".to_string()))
        );
    }

    #[test]
    fn test_parse_failure_is_parse_kind() {
        let bytes: &[u8] = b"{broken";
        let err = DatasetFormat::Json.parse(Box::new(bytes)).unwrap_err();
        assert_eq!(err.kind, FixtureErrorKind::Parse);
    }
}
