//! YAML formatter coverage.
//! Ensures strict boolean semantics hold and that the shared file contract
//! matches the JSON formatter.

use anyhow::{Result, anyhow, ensure};
use rstest::rstest;
use tempfile::TempDir;

use crate::error::ConfigError;
use crate::flatten::FlattenOptions;
use crate::formatter::{Formatter, YamlFormatter};
use crate::value::ConfigValue;

use super::write_fixture;

#[test]
fn documents_flatten_into_dotted_keys() -> Result<()> {
    let dir = TempDir::new()?;
    let path = write_fixture(
        &dir,
        "app.yaml",
        "database:\n  host: localhost\n  port: 5432\n",
    )?;
    let map = YamlFormatter::new(path).load(&FlattenOptions::default())?;
    ensure!(map.get("database.host") == Some(&ConfigValue::from("localhost")));
    ensure!(map.get("database.port") == Some(&ConfigValue::Int(5432)));
    Ok(())
}

#[test]
fn yaml_yes_remains_a_string() -> Result<()> {
    let dir = TempDir::new()?;
    let path = write_fixture(&dir, "app.yaml", "recipient: yes\n")?;
    let map = YamlFormatter::new(path).load(&FlattenOptions::default())?;
    ensure!(
        map.get("recipient") == Some(&ConfigValue::from("yes")),
        "strict booleans should keep 'yes' a string, got {:?}",
        map.get("recipient")
    );
    Ok(())
}

#[rstest]
#[case::empty_file("")]
#[case::blank_file("   \n")]
fn empty_documents_load_as_empty(#[case] contents: &str) -> Result<()> {
    let dir = TempDir::new()?;
    let path = write_fixture(&dir, "app.yaml", contents)?;
    let map = YamlFormatter::new(path).load(&FlattenOptions::default())?;
    ensure!(map.is_empty());
    Ok(())
}

#[test]
fn sequence_roots_load_as_empty() -> Result<()> {
    let dir = TempDir::new()?;
    let path = write_fixture(&dir, "app.yaml", "- one\n- two\n")?;
    let map = YamlFormatter::new(path).load(&FlattenOptions::default())?;
    ensure!(map.is_empty());
    Ok(())
}

#[test]
fn malformed_documents_raise_parse_errors() -> Result<()> {
    let dir = TempDir::new()?;
    let path = write_fixture(&dir, "app.yaml", "recipient: [\n")?;
    let err = YamlFormatter::new(path)
        .load(&FlattenOptions::default())
        .err()
        .ok_or_else(|| anyhow!("expected a parse failure"))?;
    ensure!(
        matches!(&err, ConfigError::Parse { name, .. } if name.starts_with("yaml:")),
        "unexpected error: {err}"
    );
    Ok(())
}

#[test]
fn formatter_names_include_the_path() {
    assert_eq!(YamlFormatter::new("conf/app.yaml").name(), "yaml:conf/app.yaml");
}
