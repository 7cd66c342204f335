//! Decree Core - Foundation crate for decree harvesting.
//!
//! This crate provides the decree model, error handling and configuration
//! management that the browser, scanner and CLI crates depend on.
//!
//! # Modules
//!
//! - [`error`] - Central error types using thiserror
//! - [`config`] - TOML-based configuration with XDG paths
//! - [`types`] - The `Decree` accumulator and its enums, plus `DateRange`
//!
//! # Example
//!
//! ```rust
//! use decree_core::{AppConfig, DateRange};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::default();
//! let range = DateRange::month(3, 2024)?;
//! println!("Searching {} at {}", range, config.search.search_url());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use config::{
    AppConfig, BrowserConfig, EnrichmentConfig, HttpConfig, OutputConfig, SearchConfig,
};
pub use error::{ConfigError, ConfigResult, CoreError, Result};
pub use types::{normalize_year, DateRange, Decree, DecreeType, Framing, Program};
