//! Error types shared across the configuration engine.

#[cfg(test)]
mod tests;

use thiserror::Error;

/// Convenience alias for results carrying a [`ConfigError`].
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors that can occur while loading or reading configuration.
///
/// Lookup operations such as [`crate::Manager::get_string`] and
/// [`crate::Manager::has`] never produce these; absence is modelled with
/// `Option` and `bool` so callers keep a single error channel for the
/// operations that genuinely fail.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// A key passed to [`crate::Manager::set`] was empty or malformed.
    #[error("invalid configuration key '{key}': {reason}")]
    InvalidKey {
        /// Key that failed validation.
        key: String,
        /// Explanation of the rejection.
        reason: String,
    },

    /// No configuration exists under the requested key.
    #[error("no configuration found under key '{key}'")]
    KeyNotFound {
        /// Key that matched neither an entry nor any child entries.
        key: String,
    },

    /// A value could not be coerced into the shape the target requires.
    #[error("type mismatch at '{key}': {message}")]
    TypeMismatch {
        /// Dot-notation key of the offending value, including the field path.
        key: String,
        /// Description of the failed coercion.
        message: String,
    },

    /// The unmarshal target's root shape rejects the structured subtree.
    #[error("invalid unmarshal target: {message}")]
    InvalidTarget {
        /// Description of the shape conflict.
        message: String,
    },

    /// A source document failed to parse.
    #[error("failed to parse {name}: {source}")]
    Parse {
        /// Diagnostic name of the source, as reported by its formatter.
        name: String,
        /// Underlying decoder error.
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A source file could not be read.
    ///
    /// The [`std::io::ErrorKind`] of `source` distinguishes an empty path
    /// (`InvalidInput`), a missing file (`NotFound`) and an unreadable one.
    #[error("cannot read configuration file '{}': {source}", path.display())]
    Io {
        /// Path that triggered the failure.
        path: std::path::PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}
