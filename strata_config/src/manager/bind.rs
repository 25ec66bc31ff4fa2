//! Serde bridge binding configuration subtrees onto arbitrary targets.
//!
//! The deserializer drives a target's `Deserialize` impl from an owned
//! [`ConfigValue`], applying the coercions a configuration layer owes its
//! callers: strings parse into numbers and booleans, scalars render into
//! strings, and numeric-keyed mappings reconstitute sequences. Errors track
//! the map keys and sequence indices they bubbled through so the manager can
//! name the offending dotted key.

use std::collections::BTreeMap;
use std::collections::btree_map;
use std::fmt;

use serde::de::value::StringDeserializer;
use serde::de::{self, DeserializeOwned, DeserializeSeed, Deserializer, IntoDeserializer, Visitor};
use serde::forward_to_deserialize_any;

use crate::error::ConfigError;
use crate::value::{ConfigValue, parse_bool_token};

/// Binds `value` onto `T`, attributing failures to the dotted path below
/// `key`.
pub(super) fn from_value<T: DeserializeOwned>(
    value: ConfigValue,
    key: &str,
    separator: &str,
) -> Result<T, ConfigError> {
    let root_structured = matches!(value, ConfigValue::Map(_) | ConfigValue::Slice(_));
    T::deserialize(ValueDeserializer::new(value))
        .map_err(|err| classify(err, key, separator, root_structured))
}

/// Maps a bind failure onto the public error surface.
///
/// A structured subtree rejected at the root by the target's shape is an
/// invalid target; everything else is a type mismatch at the joined dotted
/// key, including required fields the subtree never supplied.
fn classify(err: BindError, key: &str, separator: &str, root_structured: bool) -> ConfigError {
    let BindError { path, message, kind } = err;
    if root_structured && path.is_empty() && kind == BindErrorKind::InvalidType {
        return ConfigError::InvalidTarget { message };
    }
    let mut segments: Vec<String> = Vec::with_capacity(path.len() + 1);
    if !key.is_empty() {
        segments.push(key.to_owned());
    }
    segments.extend(path);
    ConfigError::TypeMismatch {
        key: segments.join(separator),
        message,
    }
}

#[derive(Debug)]
struct BindError {
    path: Vec<String>,
    message: String,
    kind: BindErrorKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BindErrorKind {
    InvalidType,
    Missing,
    Message,
}

impl BindError {
    fn nested(mut self, segment: &str) -> Self {
        self.path.insert(0, segment.to_owned());
        self
    }
}

impl fmt::Display for BindError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for BindError {}

impl de::Error for BindError {
    fn custom<T: fmt::Display>(msg: T) -> Self {
        Self {
            path: Vec::new(),
            message: msg.to_string(),
            kind: BindErrorKind::Message,
        }
    }

    fn invalid_type(unexp: de::Unexpected<'_>, exp: &dyn de::Expected) -> Self {
        Self {
            path: Vec::new(),
            message: format!("invalid type: {unexp}, expected {exp}"),
            kind: BindErrorKind::InvalidType,
        }
    }

    fn missing_field(field: &'static str) -> Self {
        Self {
            path: vec![field.to_owned()],
            message: format!("missing field `{field}`"),
            kind: BindErrorKind::Missing,
        }
    }
}

struct ValueDeserializer {
    value: ConfigValue,
}

impl ValueDeserializer {
    const fn new(value: ConfigValue) -> Self {
        Self { value }
    }

    fn deserialize_integer<'de, V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, BindError> {
        match self.value {
            ConfigValue::Int(int) => visitor.visit_i64(int),
            ConfigValue::String(text) => {
                let trimmed = text.trim();
                if let Ok(int) = trimmed.parse::<i64>() {
                    return visitor.visit_i64(int);
                }
                if let Ok(int) = trimmed.parse::<u64>() {
                    return visitor.visit_u64(int);
                }
                Err(de::Error::invalid_type(de::Unexpected::Str(&text), &visitor))
            }
            other => Err(de::Error::invalid_type(unexpected(&other), &visitor)),
        }
    }

    fn deserialize_float<'de, V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, BindError> {
        match self.value {
            ConfigValue::Float(float) => visitor.visit_f64(float),
            ConfigValue::Int(int) => visitor.visit_f64(int as f64),
            ConfigValue::String(text) => {
                if let Ok(float) = text.trim().parse::<f64>() {
                    return visitor.visit_f64(float);
                }
                Err(de::Error::invalid_type(de::Unexpected::Str(&text), &visitor))
            }
            other => Err(de::Error::invalid_type(unexpected(&other), &visitor)),
        }
    }
}

fn unexpected(value: &ConfigValue) -> de::Unexpected<'_> {
    match value {
        ConfigValue::Null => de::Unexpected::Unit,
        ConfigValue::Bool(flag) => de::Unexpected::Bool(*flag),
        ConfigValue::Int(int) => de::Unexpected::Signed(*int),
        ConfigValue::Float(float) => de::Unexpected::Float(*float),
        ConfigValue::String(text) => de::Unexpected::Str(text),
        ConfigValue::Slice(_) => de::Unexpected::Seq,
        ConfigValue::Map(_) => de::Unexpected::Map,
    }
}

impl<'de> Deserializer<'de> for ValueDeserializer {
    type Error = BindError;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, BindError> {
        match self.value {
            ConfigValue::Null => visitor.visit_unit(),
            ConfigValue::Bool(flag) => visitor.visit_bool(flag),
            ConfigValue::Int(int) => visitor.visit_i64(int),
            ConfigValue::Float(float) => visitor.visit_f64(float),
            ConfigValue::String(text) => visitor.visit_string(text),
            ConfigValue::Slice(items) => visit_slice(items, visitor),
            ConfigValue::Map(entries) => visit_map_entries(entries, visitor),
        }
    }

    fn deserialize_bool<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, BindError> {
        match self.value {
            ConfigValue::Bool(flag) => visitor.visit_bool(flag),
            ConfigValue::String(text) => match parse_bool_token(&text) {
                Some(flag) => visitor.visit_bool(flag),
                None => Err(de::Error::invalid_type(de::Unexpected::Str(&text), &visitor)),
            },
            other => Err(de::Error::invalid_type(unexpected(&other), &visitor)),
        }
    }

    fn deserialize_i8<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, BindError> {
        self.deserialize_integer(visitor)
    }

    fn deserialize_i16<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, BindError> {
        self.deserialize_integer(visitor)
    }

    fn deserialize_i32<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, BindError> {
        self.deserialize_integer(visitor)
    }

    fn deserialize_i64<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, BindError> {
        self.deserialize_integer(visitor)
    }

    fn deserialize_u8<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, BindError> {
        self.deserialize_integer(visitor)
    }

    fn deserialize_u16<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, BindError> {
        self.deserialize_integer(visitor)
    }

    fn deserialize_u32<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, BindError> {
        self.deserialize_integer(visitor)
    }

    fn deserialize_u64<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, BindError> {
        self.deserialize_integer(visitor)
    }

    fn deserialize_f32<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, BindError> {
        self.deserialize_float(visitor)
    }

    fn deserialize_f64<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, BindError> {
        self.deserialize_float(visitor)
    }

    fn deserialize_str<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, BindError> {
        self.deserialize_string(visitor)
    }

    fn deserialize_string<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, BindError> {
        match self.value {
            ConfigValue::String(text) => visitor.visit_string(text),
            ConfigValue::Int(int) => visitor.visit_string(int.to_string()),
            ConfigValue::Float(float) => visitor.visit_string(float.to_string()),
            ConfigValue::Bool(flag) => visitor.visit_string(flag.to_string()),
            other => Err(de::Error::invalid_type(unexpected(&other), &visitor)),
        }
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, BindError> {
        match self.value {
            ConfigValue::Null => visitor.visit_none(),
            value => visitor.visit_some(Self::new(value)),
        }
    }

    fn deserialize_seq<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, BindError> {
        match self.value {
            ConfigValue::Slice(items) => visit_slice(items, visitor),
            ConfigValue::Map(entries) => visit_indexed_map(entries, visitor),
            other => Err(de::Error::invalid_type(unexpected(&other), &visitor)),
        }
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, BindError> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, BindError> {
        match self.value {
            ConfigValue::String(variant) => visitor.visit_enum(EnumEntryAccess::new(variant, None)),
            ConfigValue::Map(entries) => {
                let mut iter = entries.into_iter();
                let Some((variant, value)) = iter.next() else {
                    return Err(de::Error::custom("cannot bind an empty map to an enum"));
                };
                if iter.next().is_some() {
                    return Err(de::Error::custom(
                        "cannot bind a map with multiple keys to an enum",
                    ));
                }
                visitor.visit_enum(EnumEntryAccess::new(variant, Some(value)))
            }
            other => Err(de::Error::invalid_type(unexpected(&other), &visitor)),
        }
    }

    forward_to_deserialize_any! {
        char bytes byte_buf unit unit_struct tuple tuple_struct map struct
        identifier ignored_any
    }
}

fn visit_slice<'de, V: Visitor<'de>>(
    items: Vec<ConfigValue>,
    visitor: V,
) -> Result<V::Value, BindError> {
    visitor.visit_seq(SliceAccess::new(items))
}

/// Reconstitutes a sequence from a numeric-keyed mapping by probing `0`,
/// `1`, ... until an index is absent. A mapping with entries but no leading
/// indices is not sequence-shaped.
fn visit_indexed_map<'de, V: Visitor<'de>>(
    mut entries: BTreeMap<String, ConfigValue>,
    visitor: V,
) -> Result<V::Value, BindError> {
    let mut items = Vec::new();
    while let Some(item) = entries.remove(items.len().to_string().as_str()) {
        items.push(item);
    }
    if items.is_empty() && !entries.is_empty() {
        return Err(de::Error::invalid_type(de::Unexpected::Map, &visitor));
    }
    visit_slice(items, visitor)
}

fn visit_map_entries<'de, V: Visitor<'de>>(
    entries: BTreeMap<String, ConfigValue>,
    visitor: V,
) -> Result<V::Value, BindError> {
    visitor.visit_map(MapEntryAccess::new(entries))
}

struct SliceAccess {
    iter: std::vec::IntoIter<ConfigValue>,
    index: usize,
}

impl SliceAccess {
    fn new(items: Vec<ConfigValue>) -> Self {
        Self {
            iter: items.into_iter(),
            index: 0,
        }
    }
}

impl<'de> de::SeqAccess<'de> for SliceAccess {
    type Error = BindError;

    fn next_element_seed<T: DeserializeSeed<'de>>(
        &mut self,
        seed: T,
    ) -> Result<Option<T::Value>, BindError> {
        let Some(value) = self.iter.next() else {
            return Ok(None);
        };
        let segment = self.index.to_string();
        self.index += 1;
        seed.deserialize(ValueDeserializer::new(value))
            .map(Some)
            .map_err(|err| err.nested(&segment))
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}

struct MapEntryAccess {
    iter: btree_map::IntoIter<String, ConfigValue>,
    pending: Option<(String, ConfigValue)>,
}

impl MapEntryAccess {
    fn new(entries: BTreeMap<String, ConfigValue>) -> Self {
        Self {
            iter: entries.into_iter(),
            pending: None,
        }
    }
}

impl<'de> de::MapAccess<'de> for MapEntryAccess {
    type Error = BindError;

    fn next_key_seed<K: DeserializeSeed<'de>>(
        &mut self,
        seed: K,
    ) -> Result<Option<K::Value>, BindError> {
        let Some((key, value)) = self.iter.next() else {
            return Ok(None);
        };
        let deserializer: StringDeserializer<BindError> = key.clone().into_deserializer();
        self.pending = Some((key, value));
        seed.deserialize(deserializer).map(Some)
    }

    fn next_value_seed<V: DeserializeSeed<'de>>(&mut self, seed: V) -> Result<V::Value, BindError> {
        let Some((key, value)) = self.pending.take() else {
            return Err(de::Error::custom("map value requested before key"));
        };
        seed.deserialize(ValueDeserializer::new(value))
            .map_err(|err| err.nested(&key))
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.iter.len())
    }
}

struct EnumEntryAccess {
    variant: String,
    value: Option<ConfigValue>,
}

impl EnumEntryAccess {
    const fn new(variant: String, value: Option<ConfigValue>) -> Self {
        Self { variant, value }
    }
}

impl<'de> de::EnumAccess<'de> for EnumEntryAccess {
    type Error = BindError;
    type Variant = VariantEntryAccess;

    fn variant_seed<V: DeserializeSeed<'de>>(
        self,
        seed: V,
    ) -> Result<(V::Value, VariantEntryAccess), BindError> {
        let deserializer: StringDeserializer<BindError> = self.variant.into_deserializer();
        let tag = seed.deserialize(deserializer)?;
        Ok((tag, VariantEntryAccess { value: self.value }))
    }
}

struct VariantEntryAccess {
    value: Option<ConfigValue>,
}

impl<'de> de::VariantAccess<'de> for VariantEntryAccess {
    type Error = BindError;

    fn unit_variant(self) -> Result<(), BindError> {
        match self.value {
            None | Some(ConfigValue::Null) => Ok(()),
            Some(value) => Err(de::Error::custom(format!(
                "unexpected {} payload for unit variant",
                value.kind()
            ))),
        }
    }

    fn newtype_variant_seed<T: DeserializeSeed<'de>>(self, seed: T) -> Result<T::Value, BindError> {
        seed.deserialize(ValueDeserializer::new(
            self.value.unwrap_or(ConfigValue::Null),
        ))
    }

    fn tuple_variant<V: Visitor<'de>>(self, _len: usize, visitor: V) -> Result<V::Value, BindError> {
        ValueDeserializer::new(self.value.unwrap_or(ConfigValue::Null)).deserialize_seq(visitor)
    }

    fn struct_variant<V: Visitor<'de>>(
        self,
        _fields: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, BindError> {
        ValueDeserializer::new(self.value.unwrap_or(ConfigValue::Null)).deserialize_any(visitor)
    }
}
