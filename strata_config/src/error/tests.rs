//! Unit tests for error display formatting.

use rstest::rstest;

use super::ConfigError;

#[rstest]
#[case(
    ConfigError::InvalidKey {
        key: String::new(),
        reason: String::from("key is empty"),
    },
    "invalid configuration key '': key is empty"
)]
#[case(
    ConfigError::KeyNotFound {
        key: String::from("database"),
    },
    "no configuration found under key 'database'"
)]
#[case(
    ConfigError::TypeMismatch {
        key: String::from("database.port"),
        message: String::from("invalid type: string \"x\", expected u16"),
    },
    "type mismatch at 'database.port': invalid type: string \"x\", expected u16"
)]
#[case(
    ConfigError::InvalidTarget {
        message: String::from("invalid type: map, expected i64"),
    },
    "invalid unmarshal target: invalid type: map, expected i64"
)]
fn display_names_the_offending_key(#[case] error: ConfigError, #[case] expected: &str) {
    assert_eq!(error.to_string(), expected);
}

#[test]
fn io_errors_surface_the_path_and_kind() {
    let error = ConfigError::Io {
        path: std::path::PathBuf::from("conf/app.json"),
        source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
    };
    let rendered = error.to_string();
    assert!(rendered.contains("conf/app.json"), "missing path: {rendered}");
    assert!(rendered.contains("gone"), "missing source: {rendered}");
}

#[test]
fn parse_errors_carry_the_formatter_name() {
    let error = ConfigError::Parse {
        name: String::from("json:conf/app.json"),
        source: "unexpected end of input".into(),
    };
    assert!(error.to_string().starts_with("failed to parse json:conf/app.json"));
}
