//! Configuration management for decree harvesting.
//!
//! Provides TOML-based configuration with XDG-compliant paths and
//! environment variable overrides.

use crate::error::{ConfigError, ConfigResult};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Main application configuration.
///
/// This is loaded from `~/.config/decree-harvest/config.toml` (or platform
/// equivalent). If the file doesn't exist, default values are used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Search interface and pagination settings
    pub search: SearchConfig,
    /// Browser automation settings
    pub browser: BrowserConfig,
    /// HTTP client settings for decree documents
    pub http: HttpConfig,
    /// Enrichment worker pool settings
    pub enrichment: EnrichmentConfig,
    /// Export settings
    pub output: OutputConfig,
}

impl AppConfig {
    /// Load configuration from the default location, falling back to defaults if not found.
    ///
    /// # Errors
    /// Returns error if:
    /// - Config directory cannot be determined
    /// - File exists but cannot be read
    /// - File contents are not valid TOML
    pub fn load() -> ConfigResult<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::debug!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration from an explicit path.
    ///
    /// # Errors
    /// Returns error if the file is missing, unreadable, invalid TOML or
    /// contains invalid values.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.display().to_string(),
            });
        }

        tracing::debug!("Loading config from {}", path.display());
        let contents = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with environment variable overrides.
    ///
    /// Supports the following environment variables:
    /// - `DECREE_HEADLESS`: Override browser headless mode (true/false)
    /// - `DECREE_MAX_WORKERS`: Fix the enrichment worker count
    /// - `DECREE_WAIT_TIMEOUT_SECS`: Override the page activation timeout
    /// - `DECREE_OUTPUT_DIR`: Override the export directory
    pub fn load_with_env() -> ConfigResult<Self> {
        let mut config = Self::load()?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Apply `DECREE_*` environment overrides on top of the current values.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("DECREE_HEADLESS") {
            if let Ok(headless) = val.parse() {
                self.browser.headless = headless;
                tracing::debug!("Override browser.headless from env: {}", headless);
            }
        }

        if let Ok(val) = std::env::var("DECREE_MAX_WORKERS") {
            if let Ok(workers) = val.parse() {
                self.enrichment.workers = Some(workers);
                tracing::debug!("Override enrichment.workers from env: {}", workers);
            }
        }

        if let Ok(val) = std::env::var("DECREE_WAIT_TIMEOUT_SECS") {
            if let Ok(secs) = val.parse() {
                self.search.wait_timeout_secs = secs;
                tracing::debug!("Override search.wait_timeout_secs from env: {}", secs);
            }
        }

        if let Ok(val) = std::env::var("DECREE_OUTPUT_DIR") {
            tracing::debug!("Override output.directory from env: {}", val);
            self.output.directory = PathBuf::from(val);
        }
    }

    /// Reject values the pipeline cannot run with.
    ///
    /// # Errors
    /// Returns `ConfigError::InvalidValue` naming the offending field.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.search.page_size == 0 {
            return Err(invalid("search.page_size", "must be greater than zero"));
        }
        if self.search.window_size == 0 {
            return Err(invalid("search.window_size", "must be greater than zero"));
        }
        if self.search.poll_interval_ms == 0 {
            return Err(invalid("search.poll_interval_ms", "must be greater than zero"));
        }
        if self.enrichment.max_workers == 0 {
            return Err(invalid("enrichment.max_workers", "must be greater than zero"));
        }
        if self.enrichment.workers == Some(0) {
            return Err(invalid("enrichment.workers", "must be greater than zero"));
        }
        Ok(())
    }

    /// Get the path to the configuration file.
    ///
    /// Uses XDG base directories: `~/.config/decree-harvest/config.toml`
    pub fn config_path() -> ConfigResult<PathBuf> {
        let dirs = ProjectDirs::from("br", "decree-harvest", "decree-harvest")
            .ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

/// Search interface and pagination settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Site root, also used to resolve relative decree links
    pub base_url: String,
    /// Advanced search page, relative to `base_url`
    pub search_path: String,
    /// Rows per page selected when results span several pages
    pub page_size: u32,
    /// Result counts up to this value are rendered on a single page
    pub single_page_limit: u32,
    /// Page-number links visible at once in the page selector
    pub window_size: u32,
    /// Maximum wait for a page or window to become active, in seconds
    pub wait_timeout_secs: u64,
    /// Interval between rendered-state polls, in milliseconds
    pub poll_interval_ms: u64,
}

impl SearchConfig {
    /// Absolute URL of the advanced search page.
    #[must_use]
    pub fn search_url(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.search_path.trim_start_matches('/')
        )
    }

    /// Page activation timeout.
    #[must_use]
    pub fn wait_timeout(&self) -> Duration {
        Duration::from_secs(self.wait_timeout_secs)
    }

    /// Poll interval for rendered-state waits.
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            base_url: "https://legis.alepe.pe.gov.br/".to_string(),
            search_path: "pesquisaAvancada.aspx".to_string(),
            page_size: 200,
            single_page_limit: 100,
            window_size: 5,
            wait_timeout_secs: 15,
            poll_interval_ms: 100,
        }
    }
}

/// Browser automation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Run browser in headless mode
    pub headless: bool,
    /// Browser window width
    pub window_width: u32,
    /// Browser window height
    pub window_height: u32,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            window_width: 800,
            window_height: 600,
        }
    }
}

/// HTTP client settings for decree documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Connection establishment timeout in seconds
    pub connect_timeout_secs: u64,
    /// Read timeout in seconds
    pub read_timeout_secs: u64,
    /// Retries after the first attempt for transient failures
    pub max_retries: u32,
    /// Base backoff delay in milliseconds, doubled per retry
    pub backoff_ms: u64,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 5,
            read_timeout_secs: 30,
            max_retries: 3,
            backoff_ms: 500,
            user_agent: concat!("decree-harvest/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Enrichment worker pool settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnrichmentConfig {
    /// Upper bound on concurrent decree fetches
    pub max_workers: usize,
    /// Workers per available core before the cap applies
    pub workers_per_core: usize,
    /// Fixed worker count, bypassing the parallelism-derived size
    pub workers: Option<usize>,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            max_workers: 32,
            workers_per_core: 5,
            workers: None,
        }
    }
}

/// Export settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory receiving the exported files
    pub directory: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("./output"),
        }
    }
}
