//! Configuration infrastructure
//!
//! Layered configuration for the scraper:
//! 1. Built-in defaults (`defaults` module)
//! 2. Optional TOML/JSON file
//! 3. Environment overrides prefixed `COACH_SCRAPER__`
//!    (e.g. `COACH_SCRAPER__FETCH__RATE_LIMIT_MS=2000`)
//!
//! The loaded configuration is validated once and treated as immutable for
//! the rest of the run.

#![allow(clippy::uninlined_format_args)]

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::domain::Gender;
use crate::infrastructure::parsing::config::ExtractionConfig;
use crate::infrastructure::scrape_error::{ScrapeError, ScrapeResult};

/// Environment variable prefix for overrides
pub const ENV_PREFIX: &str = "COACH_SCRAPER";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load config: {source}")]
    Load {
        #[from]
        source: config::ConfigError,
    },

    #[error("Configuration validation failed: {source}")]
    Invalid {
        #[from]
        source: ScrapeError,
    },
}

/// Complete scraper configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScraperConfig {
    pub fetch: FetchConfig,
    pub cascades: CascadeConfig,
    pub extraction: ExtractionConfig,
    pub logging: LoggingConfig,
}

/// Which backend renders pages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RendererKind {
    /// Headless Chrome driven over WebDriver; executes scripts
    #[serde(rename = "webdriver")]
    WebDriver,
    /// Plain HTTP GET; for sites that render server-side
    Http,
}

/// Page fetching, timing and rate-limit settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    pub renderer: RendererKind,

    /// WebDriver endpoint (chromedriver)
    pub webdriver_url: String,

    pub user_agent: String,

    /// Minimum delay before every outbound request; 0 disables throttling
    pub rate_limit_ms: u64,

    pub page_load_timeout_ms: u64,

    /// Bound on waiting for a caller-supplied DOM marker
    pub marker_timeout_ms: u64,

    /// Bound on waiting for network activity to stop
    pub network_idle_timeout_ms: u64,

    /// Fixed wait after the page is judged loaded
    pub settle_delay_ms: u64,

    /// Timeout for existence probes
    pub probe_timeout_ms: u64,

    /// Fixed wait used on roster pages before reading the coaches section
    pub roster_settle_ms: u64,

    /// Pause after clicking a tab before reading the page
    pub interaction_pause_ms: u64,
}

impl FetchConfig {
    #[must_use]
    pub const fn rate_limit(&self) -> Duration {
        Duration::from_millis(self.rate_limit_ms)
    }

    #[must_use]
    pub const fn page_load_timeout(&self) -> Duration {
        Duration::from_millis(self.page_load_timeout_ms)
    }

    #[must_use]
    pub const fn marker_timeout(&self) -> Duration {
        Duration::from_millis(self.marker_timeout_ms)
    }

    #[must_use]
    pub const fn network_idle_timeout(&self) -> Duration {
        Duration::from_millis(self.network_idle_timeout_ms)
    }

    #[must_use]
    pub const fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    #[must_use]
    pub const fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    #[must_use]
    pub const fn roster_settle(&self) -> Duration {
        Duration::from_millis(self.roster_settle_ms)
    }

    #[must_use]
    pub const fn interaction_pause(&self) -> Duration {
        Duration::from_millis(self.interaction_pause_ms)
    }

    fn validate(&self) -> ScrapeResult<()> {
        if self.page_load_timeout_ms == 0 {
            return Err(ScrapeError::configuration(
                "fetch.page_load_timeout_ms",
                "must be greater than 0",
            ));
        }
        if self.probe_timeout_ms == 0 {
            return Err(ScrapeError::configuration(
                "fetch.probe_timeout_ms",
                "must be greater than 0",
            ));
        }
        if self.renderer == RendererKind::WebDriver {
            url::Url::parse(&self.webdriver_url).map_err(|e| {
                ScrapeError::configuration("fetch.webdriver_url", e.to_string())
            })?;
        }
        Ok(())
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            renderer: RendererKind::WebDriver,
            webdriver_url: defaults::WEBDRIVER_URL.to_string(),
            user_agent: defaults::USER_AGENT.to_string(),
            rate_limit_ms: defaults::RATE_LIMIT_MS,
            page_load_timeout_ms: defaults::PAGE_LOAD_TIMEOUT_MS,
            marker_timeout_ms: defaults::MARKER_TIMEOUT_MS,
            network_idle_timeout_ms: defaults::NETWORK_IDLE_TIMEOUT_MS,
            settle_delay_ms: defaults::SETTLE_DELAY_MS,
            probe_timeout_ms: defaults::PROBE_TIMEOUT_MS,
            roster_settle_ms: defaults::ROSTER_SETTLE_MS,
            interaction_pause_ms: defaults::INTERACTION_PAUSE_MS,
        }
    }
}

/// Ordered candidate paths tried by the URL resolver
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CascadeConfig {
    pub mens_team_paths: Vec<String>,
    pub womens_team_paths: Vec<String>,
    pub coaches_paths: Vec<String>,
    pub roster_path: String,
}

impl CascadeConfig {
    #[must_use]
    pub fn team_paths(&self, gender: Gender) -> &[String] {
        match gender {
            Gender::Men => &self.mens_team_paths,
            Gender::Women => &self.womens_team_paths,
        }
    }

    /// Rejects empty cascades and paths that are not rooted
    pub fn validate(&self) -> ScrapeResult<()> {
        let cascades = [
            ("cascades.mens_team_paths", &self.mens_team_paths),
            ("cascades.womens_team_paths", &self.womens_team_paths),
            ("cascades.coaches_paths", &self.coaches_paths),
        ];
        for (field, paths) in cascades {
            if paths.is_empty() {
                return Err(ScrapeError::configuration(field, "cascade is empty"));
            }
            for path in paths {
                validate_path(field, path)?;
            }
        }
        validate_path("cascades.roster_path", &self.roster_path)
    }
}

fn validate_path(field: &str, path: &str) -> ScrapeResult<()> {
    if !path.starts_with('/') || path.len() < 2 {
        return Err(ScrapeError::configuration(
            field,
            format!("path '{}' must start with '/' and name a page", path),
        ));
    }
    if path.chars().any(char::is_whitespace) {
        return Err(ScrapeError::configuration(
            field,
            format!("path '{}' contains whitespace", path),
        ));
    }
    Ok(())
}

impl Default for CascadeConfig {
    fn default() -> Self {
        let owned = |paths: &[&str]| paths.iter().map(|p| (*p).to_string()).collect();
        Self {
            mens_team_paths: owned(defaults::MENS_TEAM_PATHS),
            womens_team_paths: owned(defaults::WOMENS_TEAM_PATHS),
            coaches_paths: owned(defaults::COACHES_PATHS),
            roster_path: defaults::ROSTER_PATH.to_string(),
        }
    }
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level: "error", "warn", "info", "debug", "trace"
    pub level: String,

    /// Enable JSON formatted file logs
    pub json_format: bool,

    pub console_output: bool,

    pub file_output: bool,

    /// Number of log files to keep (older files will be deleted)
    pub max_files: u32,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::LOG_LEVEL.to_string(),
            json_format: defaults::LOG_JSON_FORMAT,
            console_output: defaults::LOG_CONSOLE_OUTPUT,
            file_output: defaults::LOG_FILE_OUTPUT,
            max_files: defaults::LOG_MAX_FILES,
        }
    }
}

impl ScraperConfig {
    /// Load defaults, then the optional file, then environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder()
            .add_source(config::Config::try_from(&Self::default())?);

        if let Some(path) = path {
            info!("Loading configuration from: {:?}", path);
            builder = builder.add_source(config::File::from(path).required(true));
        }

        let settings = builder
            .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Load from the per-user config file when it exists
    pub fn load_default_location() -> Result<Self, ConfigError> {
        match default_config_path() {
            Some(path) if path.exists() => Self::load(Some(&path)),
            _ => Self::load(None),
        }
    }

    pub fn validate(&self) -> ScrapeResult<()> {
        self.fetch.validate()?;
        self.cascades.validate()?;
        self.extraction.validate()
    }
}

/// `<config dir>/tennis-coach-scraper/config.toml`
#[must_use]
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("tennis-coach-scraper").join("config.toml"))
}

/// Default scraping configuration values
pub mod defaults {
    /// Default chromedriver endpoint
    pub const WEBDRIVER_URL: &str = "http://localhost:9515";

    pub const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

    /// Default delay before each request in milliseconds
    pub const RATE_LIMIT_MS: u64 = 1500;

    pub const PAGE_LOAD_TIMEOUT_MS: u64 = 30_000;

    pub const MARKER_TIMEOUT_MS: u64 = 5_000;

    pub const NETWORK_IDLE_TIMEOUT_MS: u64 = 10_000;

    /// Late-render settle delay
    pub const SETTLE_DELAY_MS: u64 = 500;

    pub const PROBE_TIMEOUT_MS: u64 = 15_000;

    pub const ROSTER_SETTLE_MS: u64 = 2_000;

    pub const INTERACTION_PAUSE_MS: u64 = 1_000;

    /// Men's team page cascade. `/sports/mten` and `/sport/m-tennis` cover
    /// SEC-style sites.
    pub const MENS_TEAM_PATHS: &[&str] = &[
        "/sports/mens-tennis",
        "/sports/m-tennis",
        "/sports/mten",
        "/sport/m-tennis",
        "/m-tennis",
    ];

    pub const WOMENS_TEAM_PATHS: &[&str] = &[
        "/sports/womens-tennis",
        "/sports/w-tennis",
        "/sports/wten",
        "/sport/w-tennis",
        "/w-tennis",
    ];

    pub const COACHES_PATHS: &[&str] = &["/coaches", "/staff", "/roster/coaches", "/roster/#coaches"];

    pub const ROSTER_PATH: &str = "/roster/";

    // Log configuration defaults
    pub const LOG_LEVEL: &str = "info";

    pub const LOG_JSON_FORMAT: bool = false;

    pub const LOG_CONSOLE_OUTPUT: bool = true;

    pub const LOG_FILE_OUTPUT: bool = true;

    pub const LOG_MAX_FILES: u32 = 5;
}
