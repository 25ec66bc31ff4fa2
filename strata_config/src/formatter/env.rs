//! Environment variable formatter.

use uncased::UncasedStr;

use crate::error::ConfigResult;
use crate::flatten::FlattenOptions;
use crate::value::{ConfigMap, ConfigValue, parse_bool_token};

use super::Formatter;

/// Formatter turning environment variables into configuration keys.
///
/// The formatter holds an explicit snapshot of environment entries rather
/// than reading ambient process state on every load; [`EnvFormatter::prefixed`]
/// captures the process environment once at construction, and
/// [`EnvFormatter::with_snapshot`] accepts any entries, which keeps tests
/// hermetic.
///
/// # Behaviour
///
/// Only variables beginning with the prefix followed by an underscore are
/// considered; the match is ASCII case-insensitive and trailing underscores
/// on the prefix itself are ignored. After stripping the prefix, remaining
/// underscores become the configured separator and keys are lower-cased
/// unless `case_sensitive` is set. Values pass through a coercion ladder:
/// the boolean tokens `true`/`yes`/`1`/`on` and `false`/`no`/`0`/`off`
/// (case-insensitive) become booleans, then integers and floats are tried,
/// and anything else stays a string. Variables with an empty value are
/// dropped entirely.
///
/// A formatter configured with an empty prefix loads nothing: importing the
/// full process environment unfiltered is never what a configuration layer
/// wants, so the case is treated as a misconfiguration that logs a warning
/// and yields an empty map.
///
/// # Examples
///
/// ```
/// use strata_config::{ConfigValue, EnvFormatter, FlattenOptions, Formatter};
///
/// let snapshot = [("APP_DATABASE_PORT", "5432"), ("OTHER_KEY", "x")];
/// let formatter = EnvFormatter::with_snapshot("APP", snapshot);
/// let map = formatter.load(&FlattenOptions::default())?;
/// assert_eq!(map.get("database.port"), Some(&ConfigValue::Int(5432)));
/// assert_eq!(map.len(), 1);
/// # Ok::<(), strata_config::ConfigError>(())
/// ```
#[derive(Debug, Clone)]
pub struct EnvFormatter {
    prefix: String,
    entries: Vec<(String, String)>,
}

impl EnvFormatter {
    /// Creates a formatter over a snapshot of the current process
    /// environment.
    ///
    /// The snapshot is captured eagerly; variables that change after
    /// construction are not observed by later loads.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use strata_config::EnvFormatter;
    ///
    /// let formatter = EnvFormatter::prefixed("APP");
    /// let _ = formatter;
    /// ```
    #[must_use]
    pub fn prefixed(prefix: impl Into<String>) -> Self {
        Self::with_snapshot(prefix, std::env::vars())
    }

    /// Creates a formatter over explicitly supplied entries.
    #[must_use]
    pub fn with_snapshot<I, K, V>(prefix: impl Into<String>, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let normalised: String = prefix.into();
        Self {
            prefix: normalised.trim_end_matches('_').to_owned(),
            entries: vars
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }

    /// Prefix this formatter filters by, without trailing underscores.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl Formatter for EnvFormatter {
    fn name(&self) -> String {
        String::from("env")
    }

    fn load(&self, options: &FlattenOptions) -> ConfigResult<ConfigMap> {
        if self.prefix.is_empty() {
            tracing::warn!("environment formatter has no prefix; refusing to load the full environment");
            return Ok(ConfigMap::new());
        }
        let mut map = ConfigMap::new();
        for (key, raw) in &self.entries {
            let Some(remainder) = strip_prefix(key, &self.prefix) else {
                continue;
            };
            if raw.is_empty() || remainder.is_empty() {
                continue;
            }
            map.insert(config_key(remainder, options), coerce_scalar(raw));
        }
        Ok(map)
    }
}

/// Strips `prefix` and the separating underscore from an environment key,
/// matching the prefix case-insensitively.
fn strip_prefix<'a>(key: &'a str, prefix: &str) -> Option<&'a str> {
    let head = key.get(..prefix.len())?;
    if UncasedStr::new(head) != UncasedStr::new(prefix) {
        return None;
    }
    key.get(prefix.len()..)?.strip_prefix('_')
}

fn config_key(remainder: &str, options: &FlattenOptions) -> String {
    let mapped = remainder.replace('_', &options.separator);
    if options.case_sensitive {
        mapped
    } else {
        mapped.to_lowercase()
    }
}

fn coerce_scalar(raw: &str) -> ConfigValue {
    if let Some(flag) = parse_bool_token(raw) {
        return ConfigValue::Bool(flag);
    }
    if let Ok(int) = raw.parse::<i64>() {
        return ConfigValue::Int(int);
    }
    if let Ok(float) = raw.parse::<f64>() {
        return ConfigValue::Float(float);
    }
    ConfigValue::from(raw)
}
