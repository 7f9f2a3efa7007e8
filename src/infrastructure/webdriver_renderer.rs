//! Script-capable page rendering over WebDriver (headless Chrome)
//!
//! One `WebDriverRenderer` owns one browser session. The session carries
//! navigation state, so it must only be driven by one scrape at a time.

use async_trait::async_trait;
use futures::FutureExt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use thirtyfour::prelude::*;
use thirtyfour::TimeoutConfiguration;
use tokio::time::{sleep, timeout, Instant};
use tracing::{debug, info, warn};

use super::config::FetchConfig;
use super::page_fetcher::{
    ElementLocator, Interaction, PageRenderer, RenderRequest, RenderedPage, SettleHint,
};
use super::scrape_error::{ScrapeError, ScrapeResult};

const MARKER_POLL_INTERVAL: Duration = Duration::from_millis(250);
const IDLE_POLL_INTERVAL: Duration = Duration::from_millis(500);
const SCRIPT_TIMEOUT: Duration = Duration::from_secs(10);
/// Client-side backstop on top of the session's own page-load timeout
const NAVIGATION_GRACE: Duration = Duration::from_secs(5);

// readyState plus the number of resources fetched so far
const NETWORK_PROBE_SCRIPT: &str =
    "return [document.readyState, performance.getEntriesByType('resource').length];";

// HTTP status of the current document; 0 or null when the browser does not expose it
const RESPONSE_STATUS_SCRIPT: &str = "const nav = performance.getEntriesByType('navigation')[0]; \
     return nav && nav.responseStatus ? nav.responseStatus : null;";

pub struct WebDriverRenderer {
    driver: WebDriver,
    page_load_timeout: Duration,
    marker_timeout: Duration,
    network_idle_timeout: Duration,
    settle_delay: Duration,
}

impl std::fmt::Debug for WebDriverRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebDriverRenderer")
            .field("page_load_timeout", &self.page_load_timeout)
            .field("settle_delay", &self.settle_delay)
            .finish_non_exhaustive()
    }
}

impl WebDriverRenderer {
    /// Start a headless browser session
    pub async fn connect(config: &FetchConfig) -> ScrapeResult<Self> {
        let mut caps = DesiredCapabilities::chrome();
        caps.set_headless().map_err(ScrapeError::session)?;
        caps.set_no_sandbox().map_err(ScrapeError::session)?;
        caps.set_disable_gpu().map_err(ScrapeError::session)?;
        caps.set_disable_dev_shm_usage()
            .map_err(ScrapeError::session)?;

        let driver = WebDriver::new(config.webdriver_url.as_str(), caps)
            .await
            .map_err(|e| {
                ScrapeError::session(format!(
                    "Failed to connect to WebDriver at {}: {}",
                    config.webdriver_url, e
                ))
            })?;
        info!("Browser session started ({})", config.webdriver_url);

        // chromedriver otherwise keeps a hung navigation pending on the
        // session for minutes, stalling every later command
        if let Err(e) = driver.update_timeouts(session_timeouts(config)).await {
            let _ = driver.quit().await;
            return Err(ScrapeError::session(format!(
                "Failed to set session timeouts: {e}"
            )));
        }

        Ok(Self {
            driver,
            page_load_timeout: config.page_load_timeout(),
            marker_timeout: config.marker_timeout(),
            network_idle_timeout: config.network_idle_timeout(),
            settle_delay: config.settle_delay(),
        })
    }

    /// Run `work` with a fresh session and release it on every exit path.
    /// A panic inside `work` is re-raised after the browser has quit.
    pub async fn scoped<F, Fut, T>(config: &FetchConfig, work: F) -> ScrapeResult<T>
    where
        F: FnOnce(Arc<Self>) -> Fut,
        Fut: Future<Output = T>,
    {
        let renderer = Arc::new(Self::connect(config).await?);
        let outcome = AssertUnwindSafe(work(Arc::clone(&renderer)))
            .catch_unwind()
            .await;
        renderer.quit().await;

        match outcome {
            Ok(value) => Ok(value),
            Err(panic) => std::panic::resume_unwind(panic),
        }
    }

    pub async fn quit(&self) {
        match self.driver.clone().quit().await {
            Ok(()) => info!("Browser session closed"),
            Err(e) => warn!("Failed to quit browser: {}", e),
        }
    }

    async fn navigate(&self, url: &str) -> ScrapeResult<()> {
        match timeout(self.page_load_timeout + NAVIGATION_GRACE, self.driver.goto(url)).await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(e)) => Err(ScrapeError::navigation(url, e)),
            Err(_) => Err(ScrapeError::Timeout {
                url: url.to_string(),
                after_ms: u64::try_from(self.page_load_timeout.as_millis()).unwrap_or(u64::MAX),
            }),
        }
    }

    /// Fail on a non-success response so error pages are never parsed
    async fn check_status(&self, url: &str) -> ScrapeResult<()> {
        match self.driver.execute(RESPONSE_STATUS_SCRIPT, Vec::new()).await {
            Ok(ret) => check_response_status(url, ret.json()),
            Err(e) => {
                debug!("Response status unavailable for {}: {}", url, e);
                Ok(())
            }
        }
    }

    async fn wait_for_marker(&self, selector: &str) {
        let found = self
            .driver
            .query(By::Css(selector))
            .wait(self.marker_timeout, MARKER_POLL_INTERVAL)
            .exists()
            .await
            .unwrap_or(false);
        if !found {
            debug!("Marker '{}' not seen within {:?}", selector, self.marker_timeout);
        }
    }

    /// Poll until the document is complete and the resource count stops growing
    async fn wait_for_network_idle(&self) {
        let deadline = Instant::now() + self.network_idle_timeout;
        let mut last_count = None;

        while Instant::now() < deadline {
            if let Ok(ret) = self.driver.execute(NETWORK_PROBE_SCRIPT, Vec::new()).await {
                let value = ret.json();
                let complete = value.get(0).and_then(|v| v.as_str()) == Some("complete");
                let count = value.get(1).and_then(serde_json::Value::as_u64);
                if complete && count.is_some() && count == last_count {
                    return;
                }
                last_count = count;
            }
            sleep(IDLE_POLL_INTERVAL).await;
        }
        debug!("Network did not go idle within {:?}", self.network_idle_timeout);
    }

    async fn settle(&self, hint: &SettleHint) {
        match hint {
            SettleHint::Marker(selector) => {
                self.wait_for_marker(selector).await;
                sleep(self.settle_delay).await;
            }
            SettleHint::NetworkIdle => {
                self.wait_for_network_idle().await;
                sleep(self.settle_delay).await;
            }
            SettleHint::Fixed(delay) => sleep(*delay).await,
        }
    }

    async fn interact(&self, interaction: &Interaction) {
        for target in &interaction.targets {
            let found = match target {
                ElementLocator::Css(css) => self.driver.find(By::Css(css.as_str())).await,
                ElementLocator::XPath(xpath) => self.driver.find(By::XPath(xpath.as_str())).await,
            };
            let Ok(element) = found else { continue };

            match element.click().await {
                Ok(()) => {
                    debug!("Clicked {:?}", target);
                    sleep(interaction.pause).await;
                    return;
                }
                Err(e) => debug!("Click on {:?} failed: {}", target, e),
            }
        }
        debug!("No interaction target could be clicked");
    }

    async fn fragment(&self, selector: &str) -> Option<String> {
        let element = self.driver.find(By::Css(selector)).await.ok()?;
        element.outer_html().await.ok()
    }
}

#[async_trait]
impl PageRenderer for WebDriverRenderer {
    async fn render(&self, request: &RenderRequest) -> ScrapeResult<RenderedPage> {
        info!("Rendering URL: {}", request.url);
        self.navigate(&request.url).await?;
        self.check_status(&request.url).await?;
        self.settle(&request.settle).await;

        if let Some(interaction) = &request.interaction {
            self.interact(interaction).await;
        }

        let fragment = match &request.fragment {
            Some(selector) => self.fragment(selector).await,
            None => None,
        };

        let html = self
            .driver
            .source()
            .await
            .map_err(|e| ScrapeError::navigation(&request.url, e))?;
        let url = self
            .driver
            .current_url()
            .await
            .map_or_else(|_| request.url.clone(), |u| u.to_string());

        debug!("Rendered {} ({} chars)", url, html.len());
        Ok(RenderedPage {
            url,
            html,
            fragment,
        })
    }
}

/// Script and page-load limits applied to every session
fn session_timeouts(config: &FetchConfig) -> TimeoutConfiguration {
    TimeoutConfiguration::new(Some(SCRIPT_TIMEOUT), Some(config.page_load_timeout()), None)
}

/// Map a navigation status reported by the browser to a result. An unknown
/// status is accepted.
fn check_response_status(url: &str, status: &serde_json::Value) -> ScrapeResult<()> {
    match status.as_u64().and_then(|code| u16::try_from(code).ok()) {
        Some(code) if code != 0 && !(200..300).contains(&code) => Err(ScrapeError::HttpStatus {
            status: code,
            url: url.to_string(),
        }),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_statuses_fail_the_render() {
        let err = check_response_status("https://x.edu/staff-directory", &json!(404)).unwrap_err();
        assert!(matches!(err, ScrapeError::HttpStatus { status: 404, .. }));
        assert!(check_response_status("https://x.edu", &json!(500)).is_err());
    }

    #[test]
    fn test_success_or_unknown_status_passes() {
        assert!(check_response_status("https://x.edu", &json!(200)).is_ok());
        assert!(check_response_status("https://x.edu", &json!(204)).is_ok());
        assert!(check_response_status("https://x.edu", &json!(0)).is_ok());
        assert!(check_response_status("https://x.edu", &serde_json::Value::Null).is_ok());
    }

    #[test]
    fn test_session_timeouts_follow_config() {
        let mut config = FetchConfig::default();
        config.page_load_timeout_ms = 12_000;
        let timeouts = session_timeouts(&config);
        assert_eq!(timeouts.page_load(), Some(Duration::from_secs(12)));
        assert_eq!(timeouts.script(), Some(SCRIPT_TIMEOUT));
        assert_eq!(timeouts.implicit(), None);
    }
}
