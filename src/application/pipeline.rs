//! Scrape pipelines
//!
//! A pipeline turns (school, gender) into a head coach, assistants and the
//! team page they were found under. `DefaultPipeline` is the generic
//! resolve → fetch → extract → classify chain; site overrides implement the
//! same trait with their own navigation.

use async_trait::async_trait;
use tracing::{debug, info};

use super::url_resolver::UrlResolver;
use crate::domain::{Gender, School};
use crate::infrastructure::config::ScraperConfig;
use crate::infrastructure::page_fetcher::{PageFetcher, RenderRequest, RenderedPage};
use crate::infrastructure::parsing::classifier::{classify, ClassifiedStaff};
use crate::infrastructure::parsing::extraction_engine::ExtractionEngine;
use crate::infrastructure::parsing::strategy::RawCandidate;
use crate::infrastructure::scrape_error::ScrapeError;

/// Section id that holds staff on roster pages
const ROSTER_COACHES_FRAGMENT: &str = "#coaches";

/// What a pipeline hands to the program assembler
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScrapeOutcome {
    pub staff: ClassifiedStaff,
    pub tennis_page_url: Option<String>,
}

impl ScrapeOutcome {
    /// No team page reached
    #[must_use]
    pub fn not_found() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn found(tennis_page_url: impl Into<String>, staff: ClassifiedStaff) -> Self {
        Self {
            staff,
            tennis_page_url: Some(tennis_page_url.into()),
        }
    }
}

/// Shared, read-only collaborators handed to every pipeline run
#[derive(Debug, Clone, Copy)]
pub struct PipelineContext<'a> {
    pub fetcher: &'a PageFetcher,
    pub resolver: &'a UrlResolver,
    pub engine: &'a ExtractionEngine,
    pub config: &'a ScraperConfig,
}

impl PipelineContext<'_> {
    /// Run the extraction chain over a rendered page
    pub fn extract_candidates(&self, html: &str, page_url: &str) -> Vec<RawCandidate> {
        let extraction = self.engine.extract_html(html, page_url);
        if extraction.is_empty() {
            let failure = ScrapeError::NoCandidates {
                url: page_url.to_string(),
                tried_strategies: self
                    .engine
                    .strategy_names()
                    .into_iter()
                    .map(str::to_string)
                    .collect(),
            };
            info!("{}", failure);
        }
        extraction.candidates
    }

    /// Render a coaches page, waiting for the configured staff marker.
    ///
    /// A URL with an element anchor (`/roster/#coaches`) points into a page
    /// that also lists players, so it is read like a roster section.
    pub async fn scrape_coaches_page(&self, coaches_url: &str) -> ClassifiedStaff {
        if let Some(selector) = anchor_selector(coaches_url) {
            let request = RenderRequest::new(coaches_url)
                .with_fixed_settle(self.config.fetch.roster_settle())
                .with_fragment(selector);
            return match self.fetcher.fetch(&request).await {
                Some(page) => classify(self.roster_candidates_from(&page).unwrap_or_default()),
                None => ClassifiedStaff::default(),
            };
        }

        let request =
            RenderRequest::new(coaches_url).with_marker(&self.config.extraction.coaches_page_marker);
        match self.fetcher.fetch(&request).await {
            Some(page) => classify(self.extract_candidates(&page.html, &page.url)),
            None => ClassifiedStaff::default(),
        }
    }

    /// Coaches page from the cascade, then the roster section when that
    /// yields nobody
    pub async fn scrape_team_staff(&self, team_url: &str) -> ClassifiedStaff {
        if let Some(coaches_url) = self.resolver.resolve_coaches_page(team_url).await {
            let staff = self.scrape_coaches_page(&coaches_url).await;
            if !staff.is_empty() {
                return staff;
            }
        }
        self.scrape_roster_section(team_url).await
    }

    /// Secondary source: the `#coaches` section of the team roster page.
    ///
    /// The first roster URL that renders either the section or a page
    /// mentioning "head coach" is the only one parsed.
    pub async fn scrape_roster_section(&self, team_url: &str) -> ClassifiedStaff {
        for roster_url in self.resolver.roster_candidates(team_url) {
            let request = RenderRequest::new(&roster_url)
                .with_fixed_settle(self.config.fetch.roster_settle())
                .with_fragment(ROSTER_COACHES_FRAGMENT);
            let Some(page) = self.fetcher.fetch(&request).await else {
                continue;
            };
            if let Some(candidates) = self.roster_candidates_from(&page) {
                info!("Roster section used: {}", page.url);
                return classify(candidates);
            }
            debug!("No coaches section on {}", roster_url);
        }
        ClassifiedStaff::default()
    }

    fn roster_candidates_from(&self, page: &RenderedPage) -> Option<Vec<RawCandidate>> {
        if let Some(section) = &page.fragment {
            return Some(self.extract_candidates(section, &page.url));
        }
        if page.html.to_lowercase().contains("head coach") {
            // whole roster pages carry players too; keep only titled people
            let candidates = self
                .extract_candidates(&page.html, &page.url)
                .into_iter()
                .filter(RawCandidate::has_title)
                .collect();
            return Some(candidates);
        }
        None
    }
}

/// `#id` selector for a URL fragment that names an element
fn anchor_selector(url: &str) -> Option<String> {
    let (_, fragment) = url.split_once('#')?;
    let is_id = fragment.starts_with(|c: char| c.is_ascii_alphabetic())
        && fragment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    is_id.then(|| format!("#{fragment}"))
}

#[async_trait]
pub trait ScrapePipeline: Send + Sync {
    /// Identifier used in logs
    fn name(&self) -> &'static str;

    async fn run(&self, ctx: &PipelineContext<'_>, school: &School, gender: Gender)
        -> ScrapeOutcome;
}

/// Resolver → fetcher → engine → classifier
#[derive(Debug, Default)]
pub struct DefaultPipeline;

#[async_trait]
impl ScrapePipeline for DefaultPipeline {
    fn name(&self) -> &'static str {
        "default"
    }

    async fn run(
        &self,
        ctx: &PipelineContext<'_>,
        school: &School,
        gender: Gender,
    ) -> ScrapeOutcome {
        let Some(team_url) = ctx
            .resolver
            .resolve_team_page(school.athletics_root(), gender)
            .await
        else {
            return ScrapeOutcome::not_found();
        };

        let staff = ctx.scrape_team_staff(&team_url).await;
        ScrapeOutcome::found(team_url, staff)
    }
}
