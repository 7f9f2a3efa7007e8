//! Override for sites that hide staff behind a "Coaches" tab on the roster page

use async_trait::async_trait;
use tracing::info;

use super::pipeline::{PipelineContext, ScrapeOutcome, ScrapePipeline};
use super::url_resolver::join_url;
use crate::domain::{Gender, School};
use crate::infrastructure::page_fetcher::{ElementLocator, Interaction, RenderRequest};
use crate::infrastructure::parsing::classifier::{classify, ClassifiedStaff};

const COACHES_TAB_CSS: &str = "a[href*='#coaches']";
const COACHES_TAB_XPATH: &str = "//button[contains(normalize-space(.), 'Coaches')]";

#[derive(Debug, Default)]
pub struct TabbedRosterPipeline;

impl TabbedRosterPipeline {
    #[must_use]
    pub fn coaches_tab() -> Vec<ElementLocator> {
        vec![
            ElementLocator::Css(COACHES_TAB_CSS.to_string()),
            ElementLocator::XPath(COACHES_TAB_XPATH.to_string()),
        ]
    }

    async fn scrape_roster_tab(ctx: &PipelineContext<'_>, team_url: &str) -> ClassifiedStaff {
        let roster_url = join_url(team_url, &ctx.config.cascades.roster_path);
        let request = RenderRequest::new(&roster_url)
            .with_fixed_settle(ctx.config.fetch.roster_settle())
            .with_interaction(Interaction {
                targets: Self::coaches_tab(),
                pause: ctx.config.fetch.interaction_pause(),
            });

        match ctx.fetcher.fetch(&request).await {
            Some(page) => classify(ctx.extract_candidates(&page.html, &page.url)),
            None => ClassifiedStaff::default(),
        }
    }
}

#[async_trait]
impl ScrapePipeline for TabbedRosterPipeline {
    fn name(&self) -> &'static str {
        "tabbed_roster"
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

        let mut staff = Self::scrape_roster_tab(ctx, &team_url).await;
        if staff.is_empty() {
            info!("Coaches tab empty for {}, trying coaches page", team_url);
            if let Some(coaches_url) = ctx.resolver.resolve_coaches_page(&team_url).await {
                staff = ctx.scrape_coaches_page(&coaches_url).await;
            }
        }
        ScrapeOutcome::found(team_url, staff)
    }
}
