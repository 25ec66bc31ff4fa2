//! Recursive conversion between nested configuration trees and flat key maps.
//!
//! [`flatten`] walks a parsed document and emits one dot-notation key per
//! addressable node. Composite nodes are stored twice: once as an aggregate
//! value at their own key and once expanded into child keys, so both
//! `map.get("database")` and `map.get("database.host")` resolve.
//! [`unflatten`] reverses the process.


use std::collections::BTreeMap;

use serde_json::Value as JsonValue;

use crate::value::{ConfigMap, ConfigValue};

/// Options controlling one flatten cycle.
///
/// Instances are immutable for the duration of a load; a [`crate::Manager`]
/// keeps one set of options and passes it to every formatter it loads.
///
/// # Examples
///
/// ```
/// use strata_config::FlattenOptions;
///
/// let options = FlattenOptions {
///     separator: String::from("__"),
///     ..FlattenOptions::default()
/// };
/// assert!(options.skip_null);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FlattenOptions {
    /// Separator between key segments. Defaults to `"."`.
    pub separator: String,
    /// When `true`, null leaves receive no flat key of their own. Aggregate
    /// payloads still carry their null members so round trips preserve them.
    /// Defaults to `true`.
    pub skip_null: bool,
    /// When `true`, empty map keys are preserved instead of skipped.
    /// Defaults to `false`.
    pub handle_empty_key: bool,
    /// When `true`, key segments keep their original case instead of being
    /// lower-cased. Defaults to `false`.
    pub case_sensitive: bool,
}

impl FlattenOptions {
    /// Creates the default option set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Default for FlattenOptions {
    fn default() -> Self {
        Self {
            separator: String::from("."),
            skip_null: true,
            handle_empty_key: false,
            case_sensitive: false,
        }
    }
}

/// Flattens a parsed configuration tree into a [`ConfigMap`].
///
/// Map and slice nodes are stored as aggregates at their own key and then
/// expanded child by child; slice elements use their decimal index as the key
/// segment. A root that is not a mapping or sequence produces an empty map,
/// since scalar roots have no key to live under.
///
/// The function is infallible: `serde_json` map keys are always strings, so
/// every well-formed tree flattens.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use strata_config::{ConfigValue, FlattenOptions, flatten};
///
/// let tree = json!({"database": {"host": "localhost", "port": 5432}});
/// let map = flatten(&tree, &FlattenOptions::default());
/// assert_eq!(map.get("database.port"), Some(&ConfigValue::Int(5432)));
/// assert!(map.contains_key("database"));
/// ```
#[must_use]
pub fn flatten(tree: &JsonValue, options: &FlattenOptions) -> ConfigMap {
    let mut map = ConfigMap::new();
    flatten_into(&mut map, "", tree, options);
    map
}

fn flatten_into(map: &mut ConfigMap, prefix: &str, node: &JsonValue, options: &FlattenOptions) {
    match node {
        JsonValue::Object(entries) => {
            if !prefix.is_empty() {
                map.insert(prefix, convert_tree(node, options));
            }
            for (key, child) in entries {
                if key.is_empty() && !options.handle_empty_key {
                    continue;
                }
                let segment = normalise_segment(key, options);
                let child_prefix = join_key(prefix, &segment, &options.separator);
                flatten_into(map, &child_prefix, child, options);
            }
        }
        JsonValue::Array(items) => {
            if !prefix.is_empty() {
                map.insert(prefix, convert_tree(node, options));
            }
            for (index, child) in items.iter().enumerate() {
                let child_prefix = join_key(prefix, &index.to_string(), &options.separator);
                flatten_into(map, &child_prefix, child, options);
            }
        }
        JsonValue::Null => {
            if !prefix.is_empty() && !options.skip_null {
                map.insert(prefix, ConfigValue::Null);
            }
        }
        scalar => {
            if !prefix.is_empty() {
                map.insert(prefix, ConfigValue::from(scalar.clone()));
            }
        }
    }
}

/// Converts a subtree into a [`ConfigValue`] with the same key normalisation
/// the flat keys receive. Aggregates keep all of their members, including
/// nulls and empty keys; only the flat child keys are filtered.
fn convert_tree(node: &JsonValue, options: &FlattenOptions) -> ConfigValue {
    match node {
        JsonValue::Object(entries) => ConfigValue::Map(
            entries
                .iter()
                .map(|(key, child)| (normalise_segment(key, options), convert_tree(child, options)))
                .collect(),
        ),
        JsonValue::Array(items) => {
            ConfigValue::Slice(items.iter().map(|item| convert_tree(item, options)).collect())
        }
        other => ConfigValue::from(other.clone()),
    }
}

fn normalise_segment(key: &str, options: &FlattenOptions) -> String {
    if options.case_sensitive {
        key.to_owned()
    } else {
        key.to_lowercase()
    }
}

fn join_key(prefix: &str, segment: &str, separator: &str) -> String {
    if prefix.is_empty() {
        segment.to_owned()
    } else {
        format!("{prefix}{separator}{segment}")
    }
}

/// Rebuilds a nested tree from a flat map using the default `"."` separator.
///
/// See [`unflatten_with_separator`] for the reconstruction rules.
///
/// # Examples
///
/// ```
/// use serde_json::json;
/// use strata_config::{FlattenOptions, flatten, unflatten};
///
/// let tree = json!({"server": {"port": 8080}});
/// let rebuilt = unflatten(&flatten(&tree, &FlattenOptions::default()));
/// assert_eq!(serde_json::Value::from(rebuilt), tree);
/// ```
#[must_use]
pub fn unflatten(map: &ConfigMap) -> ConfigValue {
    unflatten_with_separator(map, ".")
}

/// Rebuilds a nested tree from a flat map.
///
/// Keys are split on the first `separator` occurrence and grouped; groups
/// recurse until only leaves remain. A flat map with no separator in any key
/// comes back unchanged as a single mapping.
///
/// # Behaviour
///
/// When a group of children collides with an aggregate stored at the
/// un-split key, the children win: they are the finer-grained record of any
/// later overwrite. Numeric child keys patch a slice aggregate element by
/// element, growing it with nulls when an index lies past the end, so
/// sequences survive the round trip instead of degrading to numeric-keyed
/// maps. Patch indices above 65 535 are ignored.
#[must_use]
pub fn unflatten_with_separator(map: &ConfigMap, separator: &str) -> ConfigValue {
    if separator.is_empty() {
        return ConfigValue::Map(map.entries.clone());
    }
    rebuild(map.entries.clone(), separator)
}

fn rebuild(entries: BTreeMap<String, ConfigValue>, separator: &str) -> ConfigValue {
    let mut result = BTreeMap::new();
    let mut groups: BTreeMap<String, BTreeMap<String, ConfigValue>> = BTreeMap::new();
    for (key, value) in entries {
        match key.split_once(separator) {
            None => {
                result.insert(key, value);
            }
            Some((head, rest)) => {
                groups
                    .entry(head.to_owned())
                    .or_default()
                    .insert(rest.to_owned(), value);
            }
        }
    }
    for (head, children) in groups {
        let rebuilt = rebuild(children, separator);
        let merged = match result.remove(&head) {
            Some(aggregate) => merge_nodes(aggregate, rebuilt),
            None => rebuilt,
        };
        result.insert(head, merged);
    }
    ConfigValue::Map(result)
}

/// Merges a tree synthesised from child keys over an aggregate value.
///
/// Children take priority leaf by leaf. A slice aggregate overlaid with an
/// all-numeric-keyed mapping is patched per index; mappings merge shallowly
/// per key; any other pairing is replaced by the children outright.
pub(crate) fn merge_nodes(aggregate: ConfigValue, children: ConfigValue) -> ConfigValue {
    match (aggregate, children) {
        (ConfigValue::Slice(items), ConfigValue::Map(overlay))
            if overlay.keys().all(|key| key.parse::<usize>().is_ok()) =>
        {
            patch_slice(items, overlay)
        }
        (ConfigValue::Map(mut base), ConfigValue::Map(overlay)) => {
            for (key, value) in overlay {
                let merged = match base.remove(&key) {
                    Some(existing) => merge_nodes(existing, value),
                    None => value,
                };
                base.insert(key, merged);
            }
            ConfigValue::Map(base)
        }
        (_, overlay) => overlay,
    }
}

/// Highest index a numeric overlay key may patch into a slice; larger
/// indices are skipped like non-numeric keys.
const MAX_SLICE_PATCH_INDEX: usize = u16::MAX as usize;

fn patch_slice(mut items: Vec<ConfigValue>, overlay: BTreeMap<String, ConfigValue>) -> ConfigValue {
    for (key, value) in overlay {
        let Ok(index) = key.parse::<usize>() else {
            continue;
        };
        if index > MAX_SLICE_PATCH_INDEX {
            continue;
        }
        if index >= items.len() {
            items.resize(index + 1, ConfigValue::Null);
        }
        if let Some(slot) = items.get_mut(index) {
            let existing = std::mem::replace(slot, ConfigValue::Null);
            *slot = merge_nodes(existing, value);
        }
    }
    ConfigValue::Slice(items)
}
