//! Page fetching seams
//!
//! `PageRenderer` turns a URL into settled HTML; `ExistenceProbe` answers
//! whether a URL serves a successful response. `PageFetcher` puts the rate
//! limiter in front of both and degrades every failure to "no content".

use async_trait::async_trait;
use scraper::Html;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use super::parsing::config::compile_selector;
use super::rate_limiter::RequestRateLimiter;
use super::scrape_error::ScrapeResult;

/// How a renderer decides the page has finished loading
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettleHint {
    /// Wait for an element matching this CSS selector
    Marker(String),
    /// Wait until no new network activity is observed
    NetworkIdle,
    /// Sleep a fixed time after load
    Fixed(Duration),
}

/// Where to find an element to interact with
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementLocator {
    Css(String),
    XPath(String),
}

/// Click the first locatable target, then pause for the UI to update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interaction {
    pub targets: Vec<ElementLocator>,
    pub pause: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderRequest {
    pub url: String,
    pub settle: SettleHint,
    pub interaction: Option<Interaction>,
    /// CSS selector whose first match (outer HTML) is returned as
    /// `RenderedPage::fragment`
    pub fragment: Option<String>,
}

impl RenderRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            settle: SettleHint::NetworkIdle,
            interaction: None,
            fragment: None,
        }
    }

    #[must_use]
    pub fn with_marker(mut self, selector: impl Into<String>) -> Self {
        self.settle = SettleHint::Marker(selector.into());
        self
    }

    #[must_use]
    pub fn with_fixed_settle(mut self, delay: Duration) -> Self {
        self.settle = SettleHint::Fixed(delay);
        self
    }

    #[must_use]
    pub fn with_interaction(mut self, interaction: Interaction) -> Self {
        self.interaction = Some(interaction);
        self
    }

    #[must_use]
    pub fn with_fragment(mut self, selector: impl Into<String>) -> Self {
        self.fragment = Some(selector.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPage {
    /// URL after redirects
    pub url: String,
    pub html: String,
    pub fragment: Option<String>,
}

/// Outer HTML of the first element matching `selector`, for renderers that
/// only hold the page source
pub fn extract_fragment(html: &str, selector: &str) -> ScrapeResult<Option<String>> {
    let selector = compile_selector(selector)?;
    let document = Html::parse_document(html);
    Ok(document.select(&selector).next().map(|element| element.html()))
}

#[async_trait]
pub trait PageRenderer: Send + Sync {
    async fn render(&self, request: &RenderRequest) -> ScrapeResult<RenderedPage>;
}

#[async_trait]
pub trait ExistenceProbe: Send + Sync {
    /// `Ok(true)` for a successful (2xx after redirects) response
    async fn exists(&self, url: &str) -> ScrapeResult<bool>;
}

/// Rate-limited access to the renderer and the probe
#[derive(Clone)]
pub struct PageFetcher {
    renderer: Arc<dyn PageRenderer>,
    probe: Arc<dyn ExistenceProbe>,
    limiter: RequestRateLimiter,
}

impl std::fmt::Debug for PageFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageFetcher")
            .field("limiter", &self.limiter)
            .finish_non_exhaustive()
    }
}

impl PageFetcher {
    pub fn new(
        renderer: Arc<dyn PageRenderer>,
        probe: Arc<dyn ExistenceProbe>,
        limiter: RequestRateLimiter,
    ) -> Self {
        Self {
            renderer,
            probe,
            limiter,
        }
    }

    /// Render a page; `None` on any navigation failure
    pub async fn fetch(&self, request: &RenderRequest) -> Option<RenderedPage> {
        let _slot = self.limiter.wait().await;
        debug!("Rendering {} ({:?})", request.url, request.settle);

        match self.renderer.render(request).await {
            Ok(page) => Some(page),
            Err(e) => {
                warn!("Fetch failed for {}: {}", request.url, e);
                None
            }
        }
    }

    /// Existence probe; transient errors count as "does not exist"
    pub async fn exists(&self, url: &str) -> bool {
        let _slot = self.limiter.wait().await;

        match self.probe.exists(url).await {
            Ok(found) => {
                debug!("Probe {} -> {}", url, found);
                found
            }
            Err(e) => {
                debug!("Probe failed for {}: {}", url, e);
                false
            }
        }
    }
}
