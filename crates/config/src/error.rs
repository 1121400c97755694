//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading gateway settings.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Settings file could not be read.
    #[error("Failed to read config file {path}")]
    Io {
        /// File that failed to load.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Settings text is not valid TOML for the expected schema.
    #[error("Failed to parse config")]
    Parse(#[from] toml::de::Error),

    /// A configured URL does not parse.
    #[error("Invalid URL for {field}: {value}")]
    InvalidUrl {
        /// Dotted settings key.
        field: String,
        /// Offending value.
        value: String,
    },
}

impl ConfigError {
    /// Create an invalid-URL error.
    pub fn invalid_url<F: Into<String>, V: Into<String>>(field: F, value: V) -> Self {
        Self::InvalidUrl {
            field: field.into(),
            value: value.into(),
        }
    }
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
