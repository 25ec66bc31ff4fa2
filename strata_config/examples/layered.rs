//! Example demonstrating layered configuration loading.
//!
//! A defaults formatter seeds the manager, an environment snapshot overrides
//! it and a runtime `set` wins over both; the merged result then binds onto a
//! plain struct.

use std::io::{self, Write};

use serde::Deserialize;
use strata_config::{
    ConfigMap, ConfigResult, ConfigValue, EnvFormatter, FlattenOptions, Formatter, Manager,
};

#[derive(Debug, Deserialize)]
struct ServerConfig {
    host: String,
    port: u16,
    workers: i64,
}

/// Lowest-priority source: compiled-in defaults.
struct Defaults;

impl Formatter for Defaults {
    fn name(&self) -> String {
        String::from("defaults")
    }

    fn load(&self, _options: &FlattenOptions) -> ConfigResult<ConfigMap> {
        Ok([
            ("server.host", ConfigValue::from("0.0.0.0")),
            ("server.port", ConfigValue::Int(8080)),
            ("server.workers", ConfigValue::Int(4)),
        ]
        .into_iter()
        .collect())
    }
}

fn build_manager() -> ConfigResult<Manager> {
    let manager = Manager::new();
    manager.load(&Defaults)?;
    manager.load(&EnvFormatter::with_snapshot(
        "DEMO",
        [("DEMO_SERVER_HOST", "127.0.0.1")],
    ))?;
    manager.set("server.workers", 8_i64)?;
    Ok(manager)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let manager = build_manager()?;
    let server: ServerConfig = manager.unmarshal("server")?;

    with_locked_stdout(|stdout| {
        write_line(stdout, &format!("host: {}", server.host))?;
        write_line(stdout, &format!("port: {}", server.port))?;
        write_line(stdout, &format!("workers: {}", server.workers))
    })
}

fn with_locked_stdout<F>(emit: F) -> Result<(), Box<dyn std::error::Error>>
where
    F: FnOnce(&mut dyn Write) -> Result<(), Box<dyn std::error::Error>>,
{
    let mut stdout = io::stdout().lock();
    emit(&mut stdout)
}

fn write_line(writer: &mut dyn Write, message: &str) -> Result<(), Box<dyn std::error::Error>> {
    writer.write_all(message.as_bytes())?;
    writer.write_all(b"\n")?;
    Ok(())
}
