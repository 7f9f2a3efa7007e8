//! Host-pattern registry of alternate pipelines
//!
//! Looked up once per scrape with the school's athletics root. A pattern
//! matches its exact host and any subdomain of it.

use std::sync::Arc;
use tracing::debug;
use url::Url;

use super::pipeline::ScrapePipeline;
use super::staff_directory::StaffDirectoryPipeline;
use super::tabbed_roster::TabbedRosterPipeline;
use crate::infrastructure::scrape_error::{ScrapeError, ScrapeResult};

pub const STAFF_DIRECTORY_HOST: &str = "gostanford.com";
pub const TABBED_ROSTER_HOST: &str = "virginiasports.com";

#[derive(Default)]
pub struct SiteOverrideRegistry {
    entries: Vec<(String, Arc<dyn ScrapePipeline>)>,
}

impl std::fmt::Debug for SiteOverrideRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(self.entries.iter().map(|(host, p)| (host, p.name())))
            .finish()
    }
}

impl SiteOverrideRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in overrides
    pub fn with_builtin_overrides() -> ScrapeResult<Self> {
        let mut registry = Self::new();
        registry.register(STAFF_DIRECTORY_HOST, Arc::new(StaffDirectoryPipeline::default()))?;
        registry.register(TABBED_ROSTER_HOST, Arc::new(TabbedRosterPipeline))?;
        Ok(registry)
    }

    /// Add an override. Patterns are bare host names; anything else, or a
    /// pattern registered twice, is a configuration error.
    pub fn register(
        &mut self,
        host_pattern: &str,
        pipeline: Arc<dyn ScrapePipeline>,
    ) -> ScrapeResult<()> {
        let pattern = host_pattern.trim().to_ascii_lowercase();
        let is_bare_host = !pattern.is_empty()
            && pattern.contains('.')
            && pattern
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-');
        if !is_bare_host {
            return Err(ScrapeError::configuration(
                "site_overrides",
                format!("'{host_pattern}' is not a bare host name"),
            ));
        }
        if self.entries.iter().any(|(existing, _)| *existing == pattern) {
            return Err(ScrapeError::configuration(
                "site_overrides",
                format!("'{pattern}' registered twice"),
            ));
        }

        self.entries.push((pattern, pipeline));
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Override for a host, if any
    pub fn lookup_host(&self, host: &str) -> Option<Arc<dyn ScrapePipeline>> {
        let host = host.trim_end_matches('.').to_ascii_lowercase();
        self.entries
            .iter()
            .find(|(pattern, _)| {
                host == *pattern
                    || host
                        .strip_suffix(pattern.as_str())
                        .is_some_and(|prefix| prefix.ends_with('.'))
            })
            .map(|(pattern, pipeline)| {
                debug!("Site override '{}' matched {}", pipeline.name(), pattern);
                Arc::clone(pipeline)
            })
    }

    /// Override for the host of an athletics root URL, if any
    pub fn lookup(&self, athletics_url: &str) -> Option<Arc<dyn ScrapePipeline>> {
        let url = Url::parse(athletics_url).ok()?;
        self.lookup_host(url.host_str()?)
    }
}
