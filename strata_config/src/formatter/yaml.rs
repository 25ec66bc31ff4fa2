//! YAML file formatter backed by `serde-saphyr`.

use camino::{Utf8Path, Utf8PathBuf};
use serde_json::Value as JsonValue;
use serde_saphyr::Options;

use crate::error::ConfigResult;
use crate::flatten::FlattenOptions;
use crate::value::ConfigMap;

use super::Formatter;
use super::file::{flatten_document, parse_error, read_source};

/// Formatter reading a YAML document from disk.
///
/// Parsing uses strict boolean semantics, so YAML 1.1 literals such as `yes`
/// and `off` stay strings rather than booleans. Aside from the decoder the
/// contract matches [`crate::JsonFormatter`]: empty files and non-mapping
/// roots load as an empty map, malformed input is a
/// [`crate::ConfigError::Parse`].
///
/// # Examples
///
/// ```
/// use strata_config::YamlFormatter;
///
/// let formatter = YamlFormatter::new("conf/app.yaml");
/// assert_eq!(formatter.path().as_str(), "conf/app.yaml");
/// ```
#[derive(Debug, Clone)]
pub struct YamlFormatter {
    path: Utf8PathBuf,
}

impl YamlFormatter {
    /// Creates a formatter for the YAML document at `path`.
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

    /// Parses YAML contents into a generic tree using strict booleans.
    fn parse_document(&self, contents: &str) -> ConfigResult<JsonValue> {
        serde_saphyr::from_str_with_options(
            contents,
            Options {
                strict_booleans: true,
                ..Options::default()
            },
        )
        .map_err(|err| parse_error(self.name(), err.to_string()))
    }
}

impl Formatter for YamlFormatter {
    fn name(&self) -> String {
        format!("yaml:{}", self.path)
    }

    fn load(&self, options: &FlattenOptions) -> ConfigResult<ConfigMap> {
        let contents = read_source(&self.path)?;
        if contents.trim().is_empty() {
            return Ok(ConfigMap::new());
        }
        let document = self.parse_document(&contents)?;
        Ok(flatten_document(&document, options))
    }
}
