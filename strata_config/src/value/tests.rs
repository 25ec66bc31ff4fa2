//! Unit tests for the value model and its conversions.

use rstest::rstest;
use serde_json::{Value as JsonValue, json};

use super::{ConfigKind, ConfigMap, ConfigValue, parse_bool_token};

#[rstest]
#[case(ConfigValue::Null, ConfigKind::Null)]
#[case(ConfigValue::Bool(true), ConfigKind::Bool)]
#[case(ConfigValue::Int(7), ConfigKind::Int)]
#[case(ConfigValue::Float(0.5), ConfigKind::Float)]
#[case(ConfigValue::from("text"), ConfigKind::String)]
#[case(ConfigValue::Slice(vec![]), ConfigKind::Slice)]
#[case(ConfigValue::Map(std::collections::BTreeMap::new()), ConfigKind::Map)]
fn kind_matches_variant(#[case] value: ConfigValue, #[case] expected: ConfigKind) {
    assert_eq!(value.kind(), expected);
}

#[test]
fn accessors_are_strict_about_kind() {
    let int = ConfigValue::Int(3);
    assert_eq!(int.as_int(), Some(3));
    assert_eq!(int.as_float(), None);
    assert_eq!(int.as_bool(), None);
    assert_eq!(int.as_str(), None);

    let text = ConfigValue::from("on");
    assert_eq!(text.as_str(), Some("on"));
    assert_eq!(text.as_bool(), None);
}

#[rstest]
#[case("true", Some(true))]
#[case("Yes", Some(true))]
#[case("1", Some(true))]
#[case("ON", Some(true))]
#[case("false", Some(false))]
#[case("No", Some(false))]
#[case("0", Some(false))]
#[case("off", Some(false))]
#[case("2", None)]
#[case("enabled", None)]
#[case("", None)]
fn bool_tokens_follow_the_truthy_table(#[case] raw: &str, #[case] expected: Option<bool>) {
    assert_eq!(parse_bool_token(raw), expected);
}

#[test]
fn scalar_conversions_widen_to_native_payloads() {
    assert_eq!(ConfigValue::from(5i32), ConfigValue::Int(5));
    assert_eq!(ConfigValue::from(5u32), ConfigValue::Int(5));
    assert_eq!(ConfigValue::from(5u64), ConfigValue::Int(5));
    assert_eq!(ConfigValue::from(Option::<i64>::None), ConfigValue::Null);
    assert_eq!(ConfigValue::from(Some("x")), ConfigValue::from("x"));
}

#[test]
fn oversized_unsigned_degrades_to_float() {
    let converted = ConfigValue::from(u64::MAX);
    assert_eq!(converted.kind(), ConfigKind::Float);
}

#[test]
fn collections_convert_recursively() {
    let slice = ConfigValue::from(vec![1i64, 2, 3]);
    assert_eq!(
        slice,
        ConfigValue::Slice(vec![
            ConfigValue::Int(1),
            ConfigValue::Int(2),
            ConfigValue::Int(3),
        ])
    );

    let mut entries = std::collections::BTreeMap::new();
    entries.insert(String::from("flag"), ConfigValue::Bool(true));
    let map = ConfigValue::from(entries.clone());
    assert_eq!(map, ConfigValue::Map(entries));
}

#[rstest]
#[case(json!(null), ConfigValue::Null)]
#[case(json!(true), ConfigValue::Bool(true))]
#[case(json!(42), ConfigValue::Int(42))]
#[case(json!(2.5), ConfigValue::Float(2.5))]
#[case(json!("host"), ConfigValue::from("host"))]
#[case(json!([1, "x"]), ConfigValue::Slice(vec![ConfigValue::Int(1), ConfigValue::from("x")]))]
fn json_values_convert_losslessly(#[case] source: JsonValue, #[case] expected: ConfigValue) {
    let converted = ConfigValue::from(source.clone());
    assert_eq!(converted, expected);
    assert_eq!(JsonValue::from(converted), source);
}

#[test]
fn non_finite_floats_serialise_as_null() {
    assert_eq!(JsonValue::from(ConfigValue::Float(f64::NAN)), JsonValue::Null);
}

#[test]
fn values_serialise_like_their_json_counterparts() -> anyhow::Result<()> {
    let value = ConfigValue::from(json!({"server": {"port": 8080, "tags": ["a", "b"]}}));
    let serialised = serde_json::to_value(&value)?;
    anyhow::ensure!(
        serialised == json!({"server": {"port": 8080, "tags": ["a", "b"]}}),
        "unexpected serialisation: {serialised}"
    );
    Ok(())
}

#[test]
fn config_map_behaves_like_a_map() {
    let mut map: ConfigMap = [("b", ConfigValue::Int(2)), ("a", ConfigValue::Int(1))]
        .into_iter()
        .collect();
    assert_eq!(map.len(), 2);
    assert_eq!(map.keys().collect::<Vec<_>>(), vec!["a", "b"]);

    let previous = map.insert("a", ConfigValue::Int(10));
    assert_eq!(previous, Some(ConfigValue::Int(1)));
    assert_eq!(map.get("a"), Some(&ConfigValue::Int(10)));

    map.extend([("c", ConfigValue::Bool(false))]);
    assert!(map.contains_key("c"));
    assert_eq!(map.remove("c"), Some(ConfigValue::Bool(false)));
    assert!(!map.is_empty());
}
