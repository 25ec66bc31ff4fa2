//! Layered configuration management with dot-notation keys.
//!
//! `strata_config` flattens JSON, YAML and environment variable sources into
//! one flat key space (`"database.host"`), merges them by priority and serves
//! typed lookups and struct binding from a thread-safe [`Manager`].
//!
//! ```
//! use strata_config::{EnvFormatter, Manager};
//!
//! let snapshot = [
//!     ("APP_DATABASE_HOST", "localhost"),
//!     ("APP_DATABASE_PORT", "5432"),
//! ];
//! let manager = Manager::new();
//! manager.load(&EnvFormatter::with_snapshot("APP", snapshot))?;
//!
//! assert_eq!(manager.get_string("database.host").as_deref(), Some("localhost"));
//! assert_eq!(manager.get_int("database.port"), Some(5432));
//! # Ok::<(), strata_config::ConfigError>(())
//! ```
//!
//! Sources load in ascending priority order: each [`Formatter`] contributes a
//! flat map and later loads override earlier ones key by key. The data model,
//! flatten engine and merge rules are public, so the pieces compose without a
//! [`Manager`] where no shared store is needed.

mod error;
mod flatten;
mod formatter;
mod manager;
mod merge;
mod value;

pub use error::{ConfigError, ConfigResult};
pub use flatten::{FlattenOptions, flatten, unflatten, unflatten_with_separator};
#[cfg(feature = "yaml")]
pub use formatter::YamlFormatter;
pub use formatter::{EnvFormatter, Formatter, JsonFormatter};
pub use manager::Manager;
pub use merge::merge;
pub use value::{ConfigKind, ConfigMap, ConfigValue};
