//! Conversions between [`ConfigValue`], native Rust types and JSON trees.

use std::collections::BTreeMap;

use serde::{Serialize, Serializer};
use serde_json::Value as JsonValue;

use super::ConfigValue;

/// Interprets a configuration token as a boolean.
///
/// Accepts `true`/`yes`/`1`/`on` and `false`/`no`/`0`/`off`, matched
/// case-insensitively. Any other token yields `None`.
pub(crate) fn parse_bool_token(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" | "on" => Some(true),
        "false" | "no" | "0" | "off" => Some(false),
        _ => None,
    }
}

impl From<bool> for ConfigValue {
    fn from(flag: bool) -> Self {
        Self::Bool(flag)
    }
}

impl From<i32> for ConfigValue {
    fn from(int: i32) -> Self {
        Self::Int(i64::from(int))
    }
}

impl From<i64> for ConfigValue {
    fn from(int: i64) -> Self {
        Self::Int(int)
    }
}

impl From<u32> for ConfigValue {
    fn from(int: u32) -> Self {
        Self::Int(i64::from(int))
    }
}

/// Values above `i64::MAX` degrade to [`ConfigValue::Float`].
impl From<u64> for ConfigValue {
    fn from(int: u64) -> Self {
        i64::try_from(int).map_or(Self::Float(int as f64), Self::Int)
    }
}

impl From<f64> for ConfigValue {
    fn from(float: f64) -> Self {
        Self::Float(float)
    }
}

impl From<&str> for ConfigValue {
    fn from(text: &str) -> Self {
        Self::String(text.to_owned())
    }
}

impl From<String> for ConfigValue {
    fn from(text: String) -> Self {
        Self::String(text)
    }
}

impl<T: Into<ConfigValue>> From<Vec<T>> for ConfigValue {
    fn from(items: Vec<T>) -> Self {
        Self::Slice(items.into_iter().map(Into::into).collect())
    }
}

impl<V: Into<ConfigValue>> From<BTreeMap<String, V>> for ConfigValue {
    fn from(entries: BTreeMap<String, V>) -> Self {
        Self::Map(entries.into_iter().map(|(k, v)| (k, v.into())).collect())
    }
}

impl<T: Into<ConfigValue>> From<Option<T>> for ConfigValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// Numbers outside the `i64` range degrade to floats; a number representable
/// neither as `i64` nor as `f64` becomes [`ConfigValue::Null`].
impl From<JsonValue> for ConfigValue {
    fn from(value: JsonValue) -> Self {
        match value {
            JsonValue::Null => Self::Null,
            JsonValue::Bool(flag) => Self::Bool(flag),
            JsonValue::Number(number) => number
                .as_i64()
                .map_or_else(|| number.as_f64().map_or(Self::Null, Self::Float), Self::Int),
            JsonValue::String(text) => Self::String(text),
            JsonValue::Array(items) => Self::Slice(items.into_iter().map(Self::from).collect()),
            JsonValue::Object(entries) => Self::Map(
                entries
                    .into_iter()
                    .map(|(key, child)| (key, Self::from(child)))
                    .collect(),
            ),
        }
    }
}

/// Non-finite floats have no JSON representation and become `null`.
impl From<ConfigValue> for JsonValue {
    fn from(value: ConfigValue) -> Self {
        match value {
            ConfigValue::Null => Self::Null,
            ConfigValue::Bool(flag) => Self::Bool(flag),
            ConfigValue::Int(int) => Self::Number(int.into()),
            ConfigValue::Float(float) => {
                serde_json::Number::from_f64(float).map_or(Self::Null, Self::Number)
            }
            ConfigValue::String(text) => Self::String(text),
            ConfigValue::Slice(items) => Self::Array(items.into_iter().map(Self::from).collect()),
            ConfigValue::Map(entries) => Self::Object(
                entries
                    .into_iter()
                    .map(|(key, child)| (key, Self::from(child)))
                    .collect(),
            ),
        }
    }
}

impl Serialize for ConfigValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Null => serializer.serialize_unit(),
            Self::Bool(flag) => serializer.serialize_bool(*flag),
            Self::Int(int) => serializer.serialize_i64(*int),
            Self::Float(float) => serializer.serialize_f64(*float),
            Self::String(text) => serializer.serialize_str(text),
            Self::Slice(items) => items.serialize(serializer),
            Self::Map(entries) => entries.serialize(serializer),
        }
    }
}

impl Serialize for super::ConfigMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.entries.serialize(serializer)
    }
}
