//! Core error types for decree harvesting.
//!
//! Subsystem crates define their own error enums; this module holds the
//! errors raised by the shared model and configuration layers.

use thiserror::Error;

/// Errors raised by the shared decree model.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Validation errors (invalid month, year or date range)
    #[error("validation error: {0}")]
    Validation(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// No home directory to resolve the user config path from
    #[error("no user config directory for decree-harvest")]
    NoConfigDir,

    /// Explicitly requested config file does not exist
    #[error("no config file at {path}")]
    NotFound {
        /// Requested path
        path: String,
    },

    /// Malformed TOML
    #[error("config file is not valid TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Reading or writing the config file failed
    #[error("config file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// A setting the harvest cannot run with
    #[error("invalid {field}: {reason}")]
    InvalidValue {
        /// Dotted setting name, e.g. `search.page_size`
        field: String,
        /// What is wrong with it
        reason: String,
    },
}

/// Result type alias using `CoreError`.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Result type alias for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
