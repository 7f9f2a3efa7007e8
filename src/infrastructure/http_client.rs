//! HTTP client for existence probes and script-free pages
//!
//! WebDriver cannot report response status, so cascade probes always go
//! through plain HTTP. The same client can also act as a renderer for sites
//! that serve their staff listings server-side.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::{redirect, Client};
use std::time::Duration;
use tracing::{debug, info};

use super::config::FetchConfig;
use super::page_fetcher::{
    extract_fragment, ExistenceProbe, PageRenderer, RenderRequest, RenderedPage, SettleHint,
};
use super::scrape_error::{ScrapeError, ScrapeResult};

const MAX_REDIRECTS: usize = 10;

#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    page_load_timeout: Duration,
    probe_timeout: Duration,
}

impl HttpClient {
    pub fn new(config: &FetchConfig) -> ScrapeResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.user_agent)
                .map_err(|e| ScrapeError::configuration("fetch.user_agent", e.to_string()))?,
        );

        let client = Client::builder()
            .default_headers(headers)
            .cookie_store(true)
            .redirect(redirect::Policy::limited(MAX_REDIRECTS))
            .build()
            .map_err(|e| ScrapeError::configuration("fetch", format!("HTTP client: {e}")))?;

        Ok(Self {
            client,
            page_load_timeout: config.page_load_timeout(),
            probe_timeout: config.probe_timeout(),
        })
    }

    async fn get(&self, url: &str, timeout: Duration) -> ScrapeResult<reqwest::Response> {
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| classify_transport_error(url, timeout, &e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response)
    }
}

fn classify_transport_error(url: &str, timeout: Duration, error: &reqwest::Error) -> ScrapeError {
    if error.is_timeout() {
        ScrapeError::Timeout {
            url: url.to_string(),
            after_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        }
    } else {
        ScrapeError::navigation(url, error)
    }
}

#[async_trait]
impl ExistenceProbe for HttpClient {
    async fn exists(&self, url: &str) -> ScrapeResult<bool> {
        match self.get(url, self.probe_timeout).await {
            Ok(response) => {
                debug!("Probe hit: {} ({})", url, response.status());
                Ok(true)
            }
            Err(ScrapeError::HttpStatus { status, .. }) => {
                debug!("Probe miss: {} ({})", url, status);
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }
}

#[async_trait]
impl PageRenderer for HttpClient {
    async fn render(&self, request: &RenderRequest) -> ScrapeResult<RenderedPage> {
        info!("Fetching URL: {}", request.url);

        let response = self.get(&request.url, self.page_load_timeout).await?;
        let final_url = response.url().to_string();
        let html = response
            .text()
            .await
            .map_err(|e| ScrapeError::navigation(&request.url, e))?;

        if request.interaction.is_some() {
            debug!("Static fetch cannot interact with {}, ignoring", request.url);
        }
        if let SettleHint::Fixed(delay) = request.settle {
            tokio::time::sleep(delay).await;
        }

        let fragment = match &request.fragment {
            Some(selector) => extract_fragment(&html, selector)?,
            None => None,
        };

        debug!("Fetched {} ({} chars)", final_url, html.len());
        Ok(RenderedPage {
            url: final_url,
            html,
            fragment,
        })
    }
}
