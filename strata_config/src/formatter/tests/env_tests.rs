//! Environment formatter coverage.
//! Exercises prefix filtering, key mapping and the scalar coercion ladder
//! over injected snapshots.

use anyhow::{Result, ensure};
use rstest::rstest;

use crate::flatten::FlattenOptions;
use crate::formatter::{EnvFormatter, Formatter};
use crate::value::{ConfigMap, ConfigValue};

fn load_snapshot(prefix: &str, vars: &[(&str, &str)]) -> Result<ConfigMap> {
    let formatter = EnvFormatter::with_snapshot(prefix, vars.iter().copied());
    Ok(formatter.load(&FlattenOptions::default())?)
}

#[rstest]
#[case("true", ConfigValue::Bool(true))]
#[case("Yes", ConfigValue::Bool(true))]
#[case("off", ConfigValue::Bool(false))]
#[case("0", ConfigValue::Bool(false))]
#[case("123", ConfigValue::Int(123))]
#[case("-7", ConfigValue::Int(-7))]
#[case("2.5", ConfigValue::Float(2.5))]
#[case("localhost", ConfigValue::from("localhost"))]
#[case("10 minutes", ConfigValue::from("10 minutes"))]
fn values_climb_the_coercion_ladder(#[case] raw: &str, #[case] expected: ConfigValue) -> Result<()> {
    let map = load_snapshot("APP", &[("APP_VALUE", raw)])?;
    ensure!(
        map.get("value") == Some(&expected),
        "expected {expected:?} for {raw:?}, got {:?}",
        map.get("value")
    );
    Ok(())
}

#[test]
fn only_prefixed_variables_are_loaded() -> Result<()> {
    let map = load_snapshot(
        "APP",
        &[
            ("APP_FOO", "bar"),
            ("APP_BAR_BAZ", "qux"),
            ("OTHER_FOO", "nope"),
            ("APPENDIX_FOO", "nope"),
            ("APP", "nope"),
        ],
    )?;
    ensure!(map.len() == 2, "unexpected keys: {:?}", map.keys().collect::<Vec<_>>());
    ensure!(map.get("foo") == Some(&ConfigValue::from("bar")));
    ensure!(map.get("bar.baz") == Some(&ConfigValue::from("qux")));
    Ok(())
}

#[test]
fn prefix_matching_ignores_case() -> Result<()> {
    let map = load_snapshot("app", &[("APP_HOST", "x"), ("App_Port", "1")])?;
    ensure!(map.contains_key("host"));
    ensure!(map.contains_key("port"));
    Ok(())
}

#[test]
fn trailing_underscores_on_the_prefix_are_ignored() -> Result<()> {
    let map = load_snapshot("APP_", &[("APP_HOST", "x")])?;
    ensure!(map.get("host") == Some(&ConfigValue::from("x")));
    Ok(())
}

#[test]
fn keys_map_underscores_to_the_separator() -> Result<()> {
    let map = load_snapshot("APP", &[("APP_DATABASE_POOL_SIZE", "4")])?;
    ensure!(map.get("database.pool.size") == Some(&ConfigValue::Int(4)));
    Ok(())
}

#[test]
fn custom_separators_apply_to_env_keys() -> Result<()> {
    let options = FlattenOptions {
        separator: String::from("/"),
        ..FlattenOptions::default()
    };
    let formatter = EnvFormatter::with_snapshot("APP", [("APP_A_B", "1")]);
    let map = formatter.load(&options)?;
    ensure!(map.contains_key("a/b"), "keys: {:?}", map.keys().collect::<Vec<_>>());
    Ok(())
}

#[test]
fn case_sensitive_mode_keeps_key_case() -> Result<()> {
    let options = FlattenOptions {
        case_sensitive: true,
        ..FlattenOptions::default()
    };
    let formatter = EnvFormatter::with_snapshot("APP", [("APP_Host_Name", "x")]);
    let map = formatter.load(&options)?;
    ensure!(map.contains_key("Host.Name"));
    Ok(())
}

#[test]
fn empty_values_are_dropped() -> Result<()> {
    let map = load_snapshot("APP", &[("APP_EMPTY", ""), ("APP_SET", "x")])?;
    ensure!(!map.contains_key("empty"));
    ensure!(map.contains_key("set"));
    Ok(())
}

#[rstest]
#[case("")]
#[case("___")]
fn empty_prefixes_load_nothing(#[case] prefix: &str) -> Result<()> {
    let map = load_snapshot(prefix, &[("APP_FOO", "bar"), ("PATH", "/usr/bin")])?;
    ensure!(map.is_empty(), "expected empty map, got {:?}", map.keys().collect::<Vec<_>>());
    Ok(())
}

#[test]
fn formatter_reports_a_stable_name() {
    assert_eq!(EnvFormatter::with_snapshot("APP", Vec::<(String, String)>::new()).name(), "env");
}

#[test]
fn mixed_snapshot_flattens_with_types() -> Result<()> {
    let map = load_snapshot(
        "APP",
        &[
            ("APP_FOO", "bar"),
            ("APP_BAR_BAZ", "qux"),
            ("APP_NUMBER", "123"),
            ("APP_BOOL_TRUE", "true"),
        ],
    )?;
    ensure!(map.get("foo") == Some(&ConfigValue::from("bar")));
    ensure!(map.get("bar.baz") == Some(&ConfigValue::from("qux")));
    ensure!(map.get("number") == Some(&ConfigValue::Int(123)));
    ensure!(map.get("bool.true") == Some(&ConfigValue::Bool(true)));
    Ok(())
}
