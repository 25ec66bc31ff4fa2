//! Core data model for configuration values and flat key maps.

mod convert;

#[cfg(test)]
mod tests;

pub(crate) use convert::parse_bool_token;

use std::collections::BTreeMap;
use std::collections::btree_map;
use std::fmt;

/// A single configuration value.
///
/// Composite variants nest arbitrarily, mirroring the shape of the source
/// document. Scalars carry the widest native payloads (`i64`, `f64`) so any
/// JSON or YAML scalar survives a round trip through the flatten engine.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigValue {
    /// Explicit null from a source document.
    Null,
    /// Boolean flag.
    Bool(bool),
    /// 64-bit signed integer.
    Int(i64),
    /// 64-bit floating point number.
    Float(f64),
    /// UTF-8 string.
    String(String),
    /// Ordered sequence of values.
    Slice(Vec<ConfigValue>),
    /// Nested mapping keyed by string.
    Map(BTreeMap<String, ConfigValue>),
}

impl ConfigValue {
    /// Discriminant describing which variant this value holds.
    #[must_use]
    pub const fn kind(&self) -> ConfigKind {
        match self {
            Self::Null => ConfigKind::Null,
            Self::Bool(_) => ConfigKind::Bool,
            Self::Int(_) => ConfigKind::Int,
            Self::Float(_) => ConfigKind::Float,
            Self::String(_) => ConfigKind::String,
            Self::Slice(_) => ConfigKind::Slice,
            Self::Map(_) => ConfigKind::Map,
        }
    }

    /// Returns `true` when the value is [`ConfigValue::Null`].
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the boolean payload, or `None` for any other variant.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(flag) => Some(*flag),
            _ => None,
        }
    }

    /// Returns the integer payload, or `None` for any other variant.
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(int) => Some(*int),
            _ => None,
        }
    }

    /// Returns the float payload, or `None` for any other variant.
    ///
    /// Integers are not widened; `as_float` on [`ConfigValue::Int`] returns
    /// `None`.
    #[must_use]
    pub const fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(float) => Some(*float),
            _ => None,
        }
    }

    /// Returns the string payload, or `None` for any other variant.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(text) => Some(text.as_str()),
            _ => None,
        }
    }

    /// Returns the sequence payload, or `None` for any other variant.
    #[must_use]
    pub fn as_slice(&self) -> Option<&[Self]> {
        match self {
            Self::Slice(items) => Some(items.as_slice()),
            _ => None,
        }
    }

    /// Returns the mapping payload, or `None` for any other variant.
    #[must_use]
    pub const fn as_map(&self) -> Option<&BTreeMap<String, Self>> {
        match self {
            Self::Map(entries) => Some(entries),
            _ => None,
        }
    }
}

/// Discriminant for [`ConfigValue`] variants.
///
/// Useful for diagnostics where the payload itself is not needed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ConfigKind {
    /// Null value.
    Null,
    /// Boolean value.
    Bool,
    /// Integer value.
    Int,
    /// Floating point value.
    Float,
    /// String value.
    String,
    /// Sequence value.
    Slice,
    /// Mapping value.
    Map,
}

impl fmt::Display for ConfigKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Null => "null",
            Self::Bool => "boolean",
            Self::Int => "integer",
            Self::Float => "float",
            Self::String => "string",
            Self::Slice => "slice",
            Self::Map => "map",
        };
        f.write_str(label)
    }
}

/// Flat mapping from dot-notation key to [`ConfigValue`].
///
/// Keys are unique and stored in lexicographic order, which keeps key
/// enumeration and prefix scans deterministic. Instances are produced by the
/// flatten engine and by formatters; they can also be assembled directly, for
/// example when seeding a [`crate::Manager`] in tests.
///
/// # Examples
///
/// ```
/// use strata_config::{ConfigMap, ConfigValue};
///
/// let map: ConfigMap = [
///     ("database.host", ConfigValue::from("localhost")),
///     ("database.port", ConfigValue::from(5432)),
/// ]
/// .into_iter()
/// .collect();
/// assert_eq!(map.len(), 2);
/// assert!(map.contains_key("database.port"));
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConfigMap {
    pub(crate) entries: BTreeMap<String, ConfigValue>,
}

impl ConfigMap {
    /// Creates an empty map.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Inserts `value` at `key`, returning the previous value if present.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<ConfigValue>,
    ) -> Option<ConfigValue> {
        self.entries.insert(key.into(), value.into())
    }

    /// Returns the value stored at `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.entries.get(key)
    }

    /// Removes and returns the value stored at `key`.
    pub fn remove(&mut self, key: &str) -> Option<ConfigValue> {
        self.entries.remove(key)
    }

    /// Returns `true` when `key` has an entry.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of entries in the map.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when the map holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over keys in lexicographic order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Iterates over entries in lexicographic key order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, ConfigValue> {
        self.entries.iter()
    }
}

impl IntoIterator for ConfigMap {
    type Item = (String, ConfigValue);
    type IntoIter = btree_map::IntoIter<String, ConfigValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a ConfigMap {
    type Item = (&'a String, &'a ConfigValue);
    type IntoIter = btree_map::Iter<'a, String, ConfigValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl<K, V> FromIterator<(K, V)> for ConfigMap
where
    K: Into<String>,
    V: Into<ConfigValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<K, V> Extend<(K, V)> for ConfigMap
where
    K: Into<String>,
    V: Into<ConfigValue>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.entries.insert(key.into(), value.into());
        }
    }
}
