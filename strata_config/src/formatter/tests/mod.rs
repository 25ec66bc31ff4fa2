//! Shared fixtures for formatter unit tests along with focused submodules.

use anyhow::{Context, Result, anyhow};
use camino::Utf8PathBuf;
use tempfile::TempDir;

pub(super) mod env_tests;
#[cfg(feature = "yaml")]
pub(super) mod yaml_tests;

pub(super) fn write_fixture(dir: &TempDir, file_name: &str, contents: &str) -> Result<Utf8PathBuf> {
    let path = dir.path().join(file_name);
    std::fs::write(&path, contents).with_context(|| format!("write fixture {file_name}"))?;
    Utf8PathBuf::from_path_buf(path).map_err(|raw| anyhow!("non UTF-8 temp path: {}", raw.display()))
}
