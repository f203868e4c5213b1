use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::fixture::fixture_model::Fixture;

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("Failed to read fixture {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON fixture {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid YAML fixture {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Unsupported fixture extension for {0} (expected .json, .yaml or .yml)")]
    UnsupportedFormat(PathBuf),

    #[error("Invalid fixture pattern '{pattern}': {message}")]
    Pattern { pattern: String, message: String },
}

/// Load a fixture document, picking the parser from the file extension.
pub fn load_fixture(path: &Path) -> Result<Fixture, FixtureError> {
    let content = std::fs::read_to_string(path).map_err(|e| FixtureError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    let fixture = match path.extension().and_then(|e| e.to_str()) {
        Some("json") => serde_json::from_str(&content).map_err(|e| FixtureError::Json {
            path: path.to_path_buf(),
            source: e,
        })?,
        Some("yaml") | Some("yml") => serde_yaml::from_str(&content).map_err(|e| FixtureError::Yaml {
            path: path.to_path_buf(),
            source: e,
        })?,
        _ => return Err(FixtureError::UnsupportedFormat(path.to_path_buf())),
    };

    debug!(path = %path.display(), "loaded fixture");
    Ok(fixture)
}

/// Expand a glob pattern to the fixture files it names, sorted by path for a
/// deterministic run order. A plain path matches itself.
pub fn find_fixtures(pattern: &str) -> Result<Vec<PathBuf>, FixtureError> {
    let entries = glob::glob(pattern).map_err(|e| FixtureError::Pattern {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })?;

    let mut paths = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| FixtureError::Io {
            path: e.path().to_path_buf(),
            source: std::io::Error::new(e.error().kind(), e.error().to_string()),
        })?;
        if path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}
