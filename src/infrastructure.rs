//! Infrastructure layer for page fetching, parsing, and runtime plumbing
//!
//! Configuration, logging, the error taxonomy, the rate limiter, the
//! renderer/probe seams with their WebDriver and HTTP backends, and the
//! HTML extraction stack.

pub mod config;
pub mod http_client;
pub mod logging;
pub mod page_fetcher;
pub mod parsing;
pub mod rate_limiter;
pub mod scrape_error;
pub mod webdriver_renderer;

pub use config::{ConfigError, LoggingConfig, RendererKind, ScraperConfig};
pub use http_client::HttpClient;
pub use logging::{init_logging, init_logging_with_config, get_log_directory};
pub use page_fetcher::{
    ElementLocator, ExistenceProbe, Interaction, PageFetcher, PageRenderer, RenderRequest,
    RenderedPage, SettleHint,
};
pub use rate_limiter::{RequestRateLimiter, RequestSlot};
pub use scrape_error::{ErrorClass, ScrapeError, ScrapeResult};
pub use webdriver_renderer::WebDriverRenderer;
