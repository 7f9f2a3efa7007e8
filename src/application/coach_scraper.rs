//! Coach scraping service and batch runner
//!
//! `CoachScraper` wires the shared collaborators together, picks the
//! pipeline for each school (site override or default) and assembles the
//! resulting `Program`s. Scrapes run strictly one after another.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::info;

use super::pipeline::{DefaultPipeline, PipelineContext, ScrapePipeline};
use super::program_assembler::ProgramAssembler;
use super::site_overrides::SiteOverrideRegistry;
use super::url_resolver::UrlResolver;
use crate::domain::{Gender, Program, School};
use crate::infrastructure::config::{RendererKind, ScraperConfig};
use crate::infrastructure::http_client::HttpClient;
use crate::infrastructure::page_fetcher::{ExistenceProbe, PageFetcher, PageRenderer};
use crate::infrastructure::parsing::extraction_engine::ExtractionEngine;
use crate::infrastructure::rate_limiter::RequestRateLimiter;
use crate::infrastructure::scrape_error::{ScrapeError, ScrapeResult};
use crate::infrastructure::webdriver_renderer::WebDriverRenderer;

/// Source of `scraped_at` timestamps
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

pub struct CoachScraper {
    config: ScraperConfig,
    fetcher: PageFetcher,
    resolver: UrlResolver,
    engine: ExtractionEngine,
    overrides: SiteOverrideRegistry,
    default_pipeline: Arc<dyn ScrapePipeline>,
    clock: Clock,
}

impl std::fmt::Debug for CoachScraper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoachScraper")
            .field("engine", &self.engine)
            .field("overrides", &self.overrides)
            .finish_non_exhaustive()
    }
}

impl CoachScraper {
    /// Validate the configuration and build every collaborator.
    /// Any configuration defect is returned here, before the first request.
    pub fn new(
        config: ScraperConfig,
        renderer: Arc<dyn PageRenderer>,
        probe: Arc<dyn ExistenceProbe>,
    ) -> ScrapeResult<Self> {
        config.validate()?;

        let limiter = RequestRateLimiter::new(config.fetch.rate_limit());
        let fetcher = PageFetcher::new(renderer, probe, limiter);
        let resolver = UrlResolver::new(fetcher.clone(), config.cascades.clone())?;
        let engine = ExtractionEngine::new(&config.extraction)?;
        let overrides = SiteOverrideRegistry::with_builtin_overrides()?;

        Ok(Self {
            config,
            fetcher,
            resolver,
            engine,
            overrides,
            default_pipeline: Arc::new(DefaultPipeline),
            clock: Arc::new(Utc::now),
        })
    }

    #[must_use]
    pub fn with_overrides(mut self, overrides: SiteOverrideRegistry) -> Self {
        self.overrides = overrides;
        self
    }

    #[must_use]
    pub fn with_clock(mut self, clock: impl Fn() -> DateTime<Utc> + Send + Sync + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub const fn config(&self) -> &ScraperConfig {
        &self.config
    }

    fn context(&self) -> PipelineContext<'_> {
        PipelineContext {
            fetcher: &self.fetcher,
            resolver: &self.resolver,
            engine: &self.engine,
            config: &self.config,
        }
    }

    /// Site override for the school's host, else the default chain
    pub fn pipeline_for(&self, school: &School) -> Arc<dyn ScrapePipeline> {
        self.overrides
            .lookup(&school.athletics_url)
            .unwrap_or_else(|| Arc::clone(&self.default_pipeline))
    }

    /// Scrape one (school, gender) program. Never fails: missing pages and
    /// empty listings show up as absent fields in the returned record.
    pub async fn scrape_program(&self, school: &School, gender: Gender) -> Program {
        let pipeline = self.pipeline_for(school);
        info!(
            "Scraping {} {} via '{}' pipeline",
            school.name,
            gender.team_name(),
            pipeline.name()
        );

        let outcome = pipeline.run(&self.context(), school, gender).await;
        let program = ProgramAssembler::assemble(school, gender, outcome, (self.clock)());

        info!(
            "{} {}: head coach {}, {} assistants",
            program.university,
            gender.team_name(),
            program
                .head_coach
                .as_ref()
                .map_or("not found", |coach| coach.name.as_str()),
            program.assistant_coaches.len()
        );
        program
    }

    /// Both genders, men first
    pub async fn scrape_school(&self, school: &School) -> Vec<Program> {
        let mut programs = Vec::with_capacity(Gender::ALL.len());
        for gender in Gender::ALL {
            programs.push(self.scrape_program(school, gender).await);
        }
        programs
    }

    pub async fn scrape_all(&self, schools: &[School]) -> Vec<Program> {
        let mut programs = Vec::with_capacity(schools.len() * Gender::ALL.len());
        for (index, school) in schools.iter().enumerate() {
            info!("[{}/{}] {}", index + 1, schools.len(), school.name);
            programs.extend(self.scrape_school(school).await);
        }

        let staffed = programs.iter().filter(|p| p.has_staff()).count();
        info!(
            "Batch finished: {} programs, {} with coaches",
            programs.len(),
            staffed
        );
        programs
    }
}

/// Scrape every school with the configured renderer.
///
/// The browser session is opened once for the whole batch and closed on
/// every exit path. Existence probes always use plain HTTP.
pub async fn run_batch(config: &ScraperConfig, schools: &[School]) -> Result<Vec<Program>> {
    let http = Arc::new(HttpClient::new(&config.fetch).context("Failed to build HTTP client")?);

    match config.fetch.renderer {
        RendererKind::WebDriver => {
            let programs = WebDriverRenderer::scoped(&config.fetch, |renderer| async move {
                let renderer: Arc<dyn PageRenderer> = renderer;
                let scraper = CoachScraper::new(config.clone(), renderer, http)?;
                Ok::<_, ScrapeError>(scraper.scrape_all(schools).await)
            })
            .await
            .context("Browser session failed")?
            .context("Invalid scraper configuration")?;
            Ok(programs)
        }
        RendererKind::Http => {
            let scraper = CoachScraper::new(config.clone(), http.clone(), http)
                .context("Invalid scraper configuration")?;
            Ok(scraper.scrape_all(schools).await)
        }
    }
}
