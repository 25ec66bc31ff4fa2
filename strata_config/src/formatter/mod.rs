//! Pluggable configuration sources.
//!
//! Each formatter turns one raw source into a [`ConfigMap`] per load cycle.
//! File-backed formatters keep three inherent phases: read the raw text,
//! parse it into a generic tree, then hand the tree to the shared flatten
//! engine. The environment formatter replaces the first two phases with a
//! snapshot filter.

mod env;
mod file;
mod json;
#[cfg(feature = "yaml")]
mod yaml;

#[cfg(test)]
mod tests;

pub use env::EnvFormatter;
pub use json::JsonFormatter;
#[cfg(feature = "yaml")]
pub use yaml::YamlFormatter;

use crate::error::ConfigResult;
use crate::flatten::FlattenOptions;
use crate::value::ConfigMap;

/// A pluggable configuration source.
///
/// Implementations own no part of the merged store; they are invoked once
/// per load (or repeatedly on reload) and produce a fresh flat map each
/// time. The trait is dyn-compatible so heterogeneous sources can share a
/// collection.
///
/// # Examples
///
/// ```
/// use strata_config::{ConfigMap, ConfigResult, ConfigValue, FlattenOptions, Formatter};
///
/// struct Fixed;
///
/// impl Formatter for Fixed {
///     fn name(&self) -> String {
///         String::from("fixed")
///     }
///
///     fn load(&self, _options: &FlattenOptions) -> ConfigResult<ConfigMap> {
///         Ok([("greeting", ConfigValue::from("hello"))].into_iter().collect())
///     }
/// }
///
/// let map = Fixed.load(&FlattenOptions::default())?;
/// assert!(map.contains_key("greeting"));
/// # Ok::<(), strata_config::ConfigError>(())
/// ```
pub trait Formatter {
    /// Stable diagnostic identifier for this source, such as `"env"` or
    /// `"json:conf/app.json"`. Used in log output and error text, never for
    /// merge ordering.
    fn name(&self) -> String;

    /// Produces the source's current contents as a flat map.
    ///
    /// # Errors
    ///
    /// Returns a [`crate::ConfigError`] when the source cannot be read or
    /// parsed. Emptiness is not an error: sources with nothing to contribute
    /// load as an empty map.
    fn load(&self, options: &FlattenOptions) -> ConfigResult<ConfigMap>;
}
