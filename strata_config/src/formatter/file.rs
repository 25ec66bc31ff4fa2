//! Shared plumbing and error constructors for file-backed formatters.

use camino::Utf8Path;
use serde_json::Value as JsonValue;

use crate::error::{ConfigError, ConfigResult};
use crate::flatten::{FlattenOptions, flatten};
use crate::value::ConfigMap;

/// Reads the raw text of a configuration file.
///
/// An empty path is rejected up front with `ErrorKind::InvalidInput`; other
/// failures keep the [`std::io::ErrorKind`] the filesystem reported, so a
/// missing file stays distinguishable from an unreadable one.
pub(super) fn read_source(path: &Utf8Path) -> ConfigResult<String> {
    if path.as_str().is_empty() {
        return Err(invalid_input(path, "configuration file path is empty"));
    }
    std::fs::read_to_string(path.as_std_path()).map_err(|err| io_error(path, err))
}

/// Flattens a parsed document, ignoring non-mapping roots.
///
/// Syntactically valid documents whose root is a scalar or a sequence
/// contribute nothing rather than failing; only malformed input is an error,
/// and that is raised by the parser before this point.
pub(super) fn flatten_document(document: &JsonValue, options: &FlattenOptions) -> ConfigMap {
    if document.is_object() {
        flatten(document, options)
    } else {
        ConfigMap::new()
    }
}

/// Constructs a [`ConfigError::Io`] for a formatter path.
pub(super) fn io_error(path: &Utf8Path, source: std::io::Error) -> ConfigError {
    ConfigError::Io {
        path: path.as_std_path().to_path_buf(),
        source,
    }
}

pub(super) fn invalid_input(path: &Utf8Path, message: impl Into<String>) -> ConfigError {
    io_error(
        path,
        std::io::Error::new(std::io::ErrorKind::InvalidInput, message.into()),
    )
}

pub(super) fn parse_error(
    name: String,
    source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
) -> ConfigError {
    ConfigError::Parse {
        name,
        source: source.into(),
    }
}
