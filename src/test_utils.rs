//! Test utilities for the scraper
//!
//! `FixtureSite` serves canned HTML for both the renderer and the existence
//! probe so full pipelines can run without a browser or a network, and
//! records every URL it was asked about.

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::application::CoachScraper;
use crate::infrastructure::config::ScraperConfig;
use crate::infrastructure::page_fetcher::{
    extract_fragment, ExistenceProbe, PageFetcher, PageRenderer, RenderRequest, RenderedPage,
};
use crate::infrastructure::rate_limiter::RequestRateLimiter;
use crate::infrastructure::scrape_error::{ScrapeError, ScrapeResult};

/// In-memory website keyed by absolute URL
#[derive(Debug, Default)]
pub struct FixtureSite {
    pages: HashMap<String, String>,
    after_interaction: HashMap<String, String>,
    probed: Mutex<Vec<String>>,
    rendered: Mutex<Vec<String>>,
}

impl FixtureSite {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A page that exists and renders as `html`
    #[must_use]
    pub fn with_page(mut self, url: &str, html: &str) -> Self {
        self.pages.insert(url.to_string(), html.to_string());
        self
    }

    /// What `url` looks like once a UI interaction has succeeded
    #[must_use]
    pub fn with_page_after_interaction(mut self, url: &str, html: &str) -> Self {
        self.after_interaction
            .insert(url.to_string(), html.to_string());
        self
    }

    pub fn probed_urls(&self) -> Vec<String> {
        self.probed.lock().map(|log| log.clone()).unwrap_or_default()
    }

    pub fn rendered_urls(&self) -> Vec<String> {
        self.rendered.lock().map(|log| log.clone()).unwrap_or_default()
    }

    fn record(log: &Mutex<Vec<String>>, url: &str) {
        if let Ok(mut log) = log.lock() {
            log.push(url.to_string());
        }
    }
}

#[async_trait]
impl ExistenceProbe for FixtureSite {
    async fn exists(&self, url: &str) -> ScrapeResult<bool> {
        Self::record(&self.probed, url);
        Ok(self.pages.contains_key(url) || self.after_interaction.contains_key(url))
    }
}

#[async_trait]
impl PageRenderer for FixtureSite {
    async fn render(&self, request: &RenderRequest) -> ScrapeResult<RenderedPage> {
        Self::record(&self.rendered, &request.url);

        let interacted = request
            .interaction
            .as_ref()
            .and_then(|_| self.after_interaction.get(&request.url));
        let html = interacted
            .or_else(|| self.pages.get(&request.url))
            .cloned()
            .ok_or_else(|| ScrapeError::HttpStatus {
                status: 404,
                url: request.url.clone(),
            })?;

        let fragment = match &request.fragment {
            Some(selector) => extract_fragment(&html, selector)?,
            None => None,
        };
        Ok(RenderedPage {
            url: request.url.clone(),
            html,
            fragment,
        })
    }
}

/// Unthrottled fetcher over a fixture site
pub fn fixture_fetcher(site: Arc<FixtureSite>) -> PageFetcher {
    PageFetcher::new(site.clone(), site, RequestRateLimiter::disabled())
}

/// Timestamp used by `fixture_scraper`
#[must_use]
pub fn fixed_scraped_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 1, 15, 9, 30, 0)
        .single()
        .unwrap_or_default()
}

/// Default configuration without throttling
#[must_use]
pub fn fixture_config() -> ScraperConfig {
    let mut config = ScraperConfig::default();
    config.fetch.rate_limit_ms = 0;
    config
}

/// Scraper over a fixture site with a frozen clock
pub fn fixture_scraper(site: Arc<FixtureSite>) -> ScrapeResult<CoachScraper> {
    Ok(CoachScraper::new(fixture_config(), site.clone(), site)?.with_clock(fixed_scraped_at))
}
