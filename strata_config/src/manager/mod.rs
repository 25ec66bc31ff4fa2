//! Thread-safe orchestration of sources, lookups and struct binding.

mod bind;


use std::collections::BTreeMap;
use std::ops::Bound;

use parking_lot::RwLock;
use serde::de::DeserializeOwned;

use crate::error::{ConfigError, ConfigResult};
use crate::flatten::{self, FlattenOptions};
use crate::formatter::Formatter;
use crate::merge::merge;
use crate::value::{ConfigMap, ConfigValue};

/// Thread-safe owner of the merged configuration store.
///
/// A manager holds one flat [`ConfigMap`] behind a readers-writer lock.
/// Formatters feed it via [`Manager::load`], callers read through the typed
/// accessors or bind whole subtrees with [`Manager::unmarshal`], and
/// [`Manager::set`] overrides individual keys at runtime. Lookup keys are
/// case-normalised exactly like stored keys, so `get("Database.Host")` and
/// `get("database.host")` address the same entry unless the options request
/// case sensitivity.
///
/// `get*`, `has`, `all_keys` and `all_settings` take the shared lock and run
/// concurrently with each other; `set` and `load` take the exclusive lock.
/// No operation blocks on I/O while holding the lock: formatters read their
/// sources before the store lock is taken.
///
/// # Examples
///
/// ```
/// use strata_config::Manager;
///
/// let manager = Manager::new();
/// manager.set("server.port", 8080_i64)?;
///
/// assert!(manager.has("server.port"));
/// assert_eq!(manager.get_int("server.port"), Some(8080));
/// assert_eq!(manager.get_string("server.port"), None);
/// # Ok::<(), strata_config::ConfigError>(())
/// ```
#[derive(Debug)]
pub struct Manager {
    options: FlattenOptions,
    store: RwLock<ConfigMap>,
}

impl Manager {
    /// Creates an empty manager with default [`FlattenOptions`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(FlattenOptions::default())
    }

    /// Creates an empty manager that applies `options` to every load and
    /// lookup.
    #[must_use]
    pub fn with_options(options: FlattenOptions) -> Self {
        Self {
            options,
            store: RwLock::new(ConfigMap::new()),
        }
    }

    /// Creates a manager pre-seeded with `map` under default options.
    ///
    /// Keys are case-normalised on the way in, so a seeded map behaves the
    /// same as one produced by a formatter.
    #[must_use]
    pub fn from_map(map: ConfigMap) -> Self {
        let manager = Self::new();
        {
            let mut store = manager.store.write();
            for (key, value) in map {
                let normalised = manager.normalise_key(&key);
                store.insert(normalised, value);
            }
        }
        manager
    }

    /// Options applied to every load and lookup.
    #[must_use]
    pub const fn options(&self) -> &FlattenOptions {
        &self.options
    }

    /// Loads one source and merges it over the current store.
    ///
    /// The incoming map is the higher-priority layer, so repeated loads
    /// follow an ascending priority order: each source overrides the keys it
    /// shares with earlier ones and contributes the rest. The formatter runs
    /// before the store lock is taken.
    ///
    /// # Errors
    ///
    /// Propagates the formatter's [`ConfigError`] unchanged; the caller
    /// decides whether, say, a missing file is fatal.
    pub fn load<F>(&self, formatter: &F) -> ConfigResult<()>
    where
        F: Formatter + ?Sized,
    {
        let incoming = formatter.load(&self.options)?;
        let mut store = self.store.write();
        let existing = std::mem::take(&mut *store);
        let merged = merge([incoming, existing]);
        let keys = merged.len();
        *store = merged;
        drop(store);
        tracing::debug!(source = %formatter.name(), keys, "merged configuration source");
        Ok(())
    }

    /// Returns the value under `key`, or `None` when nothing is stored
    /// there.
    ///
    /// When `key` has dot-prefixed child entries, the children are
    /// reassembled into a composite value and take priority over a literal
    /// aggregate stored at `key` itself.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<ConfigValue> {
        self.subtree(&self.normalise_key(key))
    }

    /// Returns the string under `key`.
    ///
    /// `None` covers both an absent key and a value of another kind; the two
    /// causes are indistinguishable from the return alone.
    #[must_use]
    pub fn get_string(&self, key: &str) -> Option<String> {
        match self.get(key)? {
            ConfigValue::String(text) => Some(text),
            _ => None,
        }
    }

    /// Returns the integer under `key`, `None` on absence or kind mismatch.
    #[must_use]
    pub fn get_int(&self, key: &str) -> Option<i64> {
        self.get(key)?.as_int()
    }

    /// Returns the float under `key`, `None` on absence or kind mismatch.
    /// Integers are not widened.
    #[must_use]
    pub fn get_float(&self, key: &str) -> Option<f64> {
        self.get(key)?.as_float()
    }

    /// Returns the boolean under `key`, `None` on absence or kind mismatch.
    #[must_use]
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key)?.as_bool()
    }

    /// Returns the sequence under `key`, `None` on absence or kind mismatch.
    #[must_use]
    pub fn get_slice(&self, key: &str) -> Option<Vec<ConfigValue>> {
        match self.get(key)? {
            ConfigValue::Slice(items) => Some(items),
            _ => None,
        }
    }

    /// Returns the mapping under `key`, `None` on absence or kind mismatch.
    #[must_use]
    pub fn get_map(&self, key: &str) -> Option<BTreeMap<String, ConfigValue>> {
        match self.get(key)? {
            ConfigValue::Map(entries) => Some(entries),
            _ => None,
        }
    }

    /// Stores `value` under `key`, overwriting any previous entry.
    ///
    /// Exactly one flat key is written; composite values are not expanded
    /// into child keys. Reads still see them as composites because lookups
    /// reassemble children on the fly.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidKey`] when `key` is empty or contains
    /// an empty path segment, unless the options enable `handle_empty_key`.
    pub fn set(&self, key: &str, value: impl Into<ConfigValue>) -> ConfigResult<()> {
        self.validate_key(key)?;
        let normalised = self.normalise_key(key);
        let mut store = self.store.write();
        store.insert(normalised, value);
        Ok(())
    }

    /// Returns `true` when the flat store has an entry at `key`.
    ///
    /// This is a plain map probe; it does not consider child entries, so a
    /// parent key that exists only through its children reports `false`.
    #[must_use]
    pub fn has(&self, key: &str) -> bool {
        let normalised = self.normalise_key(key);
        self.store.read().contains_key(&normalised)
    }

    /// Snapshot of every stored key in lexicographic order.
    #[must_use]
    pub fn all_keys(&self) -> Vec<String> {
        self.store.read().keys().map(str::to_owned).collect()
    }

    /// Snapshot of the entire flat store.
    #[must_use]
    pub fn all_settings(&self) -> ConfigMap {
        self.store.read().clone()
    }

    /// Binds the subtree under `key` onto a fresh `T`.
    ///
    /// An empty `key` binds the entire store. Otherwise the working subset
    /// is the entry at `key` plus every entry prefixed by `key` and the
    /// separator, reassembled into a tree the same way [`Manager::get`]
    /// does. Scalars coerce where a configuration source is looser than the
    /// target: strings parse into numbers and booleans, numbers render into
    /// strings, and numeric child keys rebuild sequences.
    ///
    /// The working subset is cloned under the shared lock and the target is
    /// populated outside it, so binding never blocks writers for longer than
    /// the clone.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::KeyNotFound`] when `key` is non-empty and matches
    ///   neither an entry nor any child entries.
    /// - [`ConfigError::InvalidTarget`] when the subtree is structured but
    ///   `T`'s root shape rejects structured data outright.
    /// - [`ConfigError::TypeMismatch`] for any failed field coercion or a
    ///   missing required field, naming the offending dotted key.
    ///
    /// # Examples
    ///
    /// ```
    /// use serde::Deserialize;
    /// use strata_config::Manager;
    ///
    /// #[derive(Deserialize)]
    /// struct Database {
    ///     host: String,
    ///     port: u16,
    /// }
    ///
    /// let manager = Manager::new();
    /// manager.set("database.host", "localhost")?;
    /// manager.set("database.port", 5432_i64)?;
    ///
    /// let database: Database = manager.unmarshal("database")?;
    /// assert_eq!(database.host, "localhost");
    /// assert_eq!(database.port, 5432);
    /// # Ok::<(), strata_config::ConfigError>(())
    /// ```
    pub fn unmarshal<T: DeserializeOwned>(&self, key: &str) -> ConfigResult<T> {
        let normalised = self.normalise_key(key);
        if normalised.is_empty() {
            let snapshot = self.all_settings();
            let tree = flatten::unflatten_with_separator(&snapshot, &self.options.separator);
            return bind::from_value(tree, "", &self.options.separator);
        }
        let Some(value) = self.subtree(&normalised) else {
            return Err(ConfigError::KeyNotFound { key: normalised });
        };
        bind::from_value(value, &normalised, &self.options.separator)
    }

    /// Binds the subtree under `key` into an existing `target`.
    ///
    /// Equivalent to [`Manager::unmarshal`] with the result assigned through
    /// the reference; the target is untouched on error.
    ///
    /// # Errors
    ///
    /// Same as [`Manager::unmarshal`].
    pub fn unmarshal_into<T: DeserializeOwned>(
        &self,
        key: &str,
        target: &mut T,
    ) -> ConfigResult<()> {
        *target = self.unmarshal(key)?;
        Ok(())
    }

    /// Clones the entry at `key` merged with the subtree its child entries
    /// describe. `None` when neither exists.
    fn subtree(&self, key: &str) -> Option<ConfigValue> {
        let store = self.store.read();
        let direct = store.get(key).cloned();
        if self.options.separator.is_empty() {
            return direct;
        }
        let child_prefix = format!("{key}{}", self.options.separator);
        let mut children = BTreeMap::new();
        for (entry_key, value) in store
            .entries
            .range::<str, _>((Bound::Included(child_prefix.as_str()), Bound::Unbounded))
        {
            if !entry_key.starts_with(child_prefix.as_str()) {
                break;
            }
            let Some(relative) = entry_key.get(child_prefix.len()..) else {
                break;
            };
            children.insert(relative.to_owned(), value.clone());
        }
        drop(store);
        if children.is_empty() {
            return direct;
        }
        let synthesised = flatten::unflatten_with_separator(
            &ConfigMap { entries: children },
            &self.options.separator,
        );
        match direct {
            Some(aggregate) => Some(flatten::merge_nodes(aggregate, synthesised)),
            None => Some(synthesised),
        }
    }

    fn normalise_key(&self, key: &str) -> String {
        if self.options.case_sensitive {
            key.to_owned()
        } else {
            key.to_lowercase()
        }
    }

    fn validate_key(&self, key: &str) -> ConfigResult<()> {
        if self.options.handle_empty_key {
            return Ok(());
        }
        if key.is_empty() {
            return Err(ConfigError::InvalidKey {
                key: key.to_owned(),
                reason: String::from("key is empty"),
            });
        }
        if !self.options.separator.is_empty()
            && key.split(self.options.separator.as_str()).any(str::is_empty)
        {
            return Err(ConfigError::InvalidKey {
                key: key.to_owned(),
                reason: String::from("key contains an empty segment"),
            });
        }
        Ok(())
    }
}

impl Default for Manager {
    fn default() -> Self {
        Self::new()
    }
}
