//! JSON file formatter.

use camino::{Utf8Path, Utf8PathBuf};
use serde_json::Value as JsonValue;

use crate::error::ConfigResult;
use crate::flatten::FlattenOptions;
use crate::value::ConfigMap;

use super::Formatter;
use super::file::{flatten_document, parse_error, read_source};

/// Formatter reading a JSON document (RFC 8259) from disk.
///
/// # Behaviour
///
/// An empty file, a file containing only `{}`, and a syntactically valid
/// document whose root is not an object all load as an empty map without
/// error. Malformed JSON is a [`crate::ConfigError::Parse`]; a missing or
/// unreadable file is a [`crate::ConfigError::Io`].
///
/// # Examples
///
/// ```
/// use strata_config::JsonFormatter;
///
/// let formatter = JsonFormatter::new("conf/app.json");
/// assert_eq!(formatter.path().as_str(), "conf/app.json");
/// ```
#[derive(Debug, Clone)]
pub struct JsonFormatter {
    path: Utf8PathBuf,
}

impl JsonFormatter {
    /// Creates a formatter for the JSON document at `path`.
    ///
    /// The file is not touched until [`Formatter::load`] runs.
    #[must_use]
    pub fn new(path: impl Into<Utf8PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path this formatter reads from.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }
}

impl Formatter for JsonFormatter {
    fn name(&self) -> String {
        format!("json:{}", self.path)
    }

    fn load(&self, options: &FlattenOptions) -> ConfigResult<ConfigMap> {
        let contents = read_source(&self.path)?;
        if contents.trim().is_empty() {
            return Ok(ConfigMap::new());
        }
        let document: JsonValue =
            serde_json::from_str(&contents).map_err(|err| parse_error(self.name(), err))?;
        Ok(flatten_document(&document, options))
    }
}
