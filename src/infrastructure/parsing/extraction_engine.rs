//! Ordered strategy runner
//!
//! Strategies run table → card → profile link → contact anchor. The first
//! one that yields any candidate wins and the rest are skipped, so a page
//! with a staff table never mixes in card or link results.

use scraper::Html;
use tracing::{debug, info};

use super::card_strategy::CardStrategy;
use super::config::ExtractionConfig;
use super::contact_anchor_strategy::ContactAnchorStrategy;
use super::profile_link_strategy::ProfileLinkStrategy;
use super::strategy::{ExtractionStrategy, RawCandidate};
use super::table_strategy::TableStrategy;
use crate::infrastructure::scrape_error::ScrapeResult;

/// Candidates plus the strategy that produced them
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    pub strategy: Option<&'static str>,
    pub candidates: Vec<RawCandidate>,
}

impl Extraction {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

pub struct ExtractionEngine {
    strategies: Vec<Box<dyn ExtractionStrategy>>,
}

impl std::fmt::Debug for ExtractionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExtractionEngine")
            .field(
                "strategies",
                &self.strategies.iter().map(|s| s.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl ExtractionEngine {
    /// Build the standard four-strategy chain. Selectors are compiled here,
    /// so a malformed configuration fails before any page is fetched.
    pub fn new(config: &ExtractionConfig) -> ScrapeResult<Self> {
        config.validate()?;
        Ok(Self::with_strategies(vec![
            Box::new(TableStrategy),
            Box::new(CardStrategy::new(config)?),
            Box::new(ProfileLinkStrategy::new(config)?),
            Box::new(ContactAnchorStrategy::new(config)),
        ]))
    }

    #[must_use]
    pub fn with_strategies(strategies: Vec<Box<dyn ExtractionStrategy>>) -> Self {
        Self { strategies }
    }

    pub fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Parse `html` and run the chain
    #[must_use]
    pub fn extract_html(&self, html: &str, page_url: &str) -> Extraction {
        let document = Html::parse_document(html);
        self.extract(&document, page_url)
    }

    #[must_use]
    pub fn extract(&self, document: &Html, page_url: &str) -> Extraction {
        for strategy in &self.strategies {
            let candidates = strategy.extract(document, page_url);
            if candidates.is_empty() {
                debug!("Strategy '{}' found nothing on {}", strategy.name(), page_url);
                continue;
            }
            info!(
                "Strategy '{}' found {} candidates on {}",
                strategy.name(),
                candidates.len(),
                page_url
            );
            return Extraction {
                strategy: Some(strategy.name()),
                candidates,
            };
        }

        debug!(
            "No candidates on {} after {:?}",
            page_url,
            self.strategy_names()
        );
        Extraction::default()
    }
}
