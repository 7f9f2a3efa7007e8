//! Parsing configuration for coach extraction
//!
//! Centralized CSS selectors and patterns used by the extraction strategies.
//! Every selector list is an ordered fallback chain.

use regex::Regex;
use scraper::Selector;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::infrastructure::scrape_error::{ScrapeError, ScrapeResult};

/// Main extraction configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Repeated staff/coach/person card containers
    pub card_selectors: Vec<String>,

    /// Name lookup inside a card, most specific first
    pub card_name_selectors: Vec<String>,

    /// Title lookup inside a card, most specific first
    pub card_title_selectors: Vec<String>,

    /// DOM marker awaited when rendering a coaches page
    pub coaches_page_marker: String,

    /// Case-insensitive regex an anchor href must match to count as a staff profile
    pub staff_profile_pattern: String,

    /// Cap on anchors inspected by the link-based strategies
    pub max_link_candidates: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            card_selectors: vec![
                ".sidearm-coaches-coach".to_string(),
                "[class*='coach-card']".to_string(),
                "[class*='staff-card']".to_string(),
                "[class*='person-card']".to_string(),
                "article[class*='coach']".to_string(),
                "li[class*='coach']".to_string(),
            ],
            card_name_selectors: vec![
                ".sidearm-coaches-coach-name".to_string(),
                "[class*='name']".to_string(),
                "h2".to_string(),
                "h3".to_string(),
                "h4".to_string(),
                "a[href*='/staff/']".to_string(),
            ],
            card_title_selectors: vec![
                ".sidearm-coaches-coach-title".to_string(),
                "[class*='title']".to_string(),
                "[class*='position']".to_string(),
            ],
            coaches_page_marker: "a[href*='mailto:'], [class*='coach'], [class*='staff']".to_string(),
            staff_profile_pattern: r"/staff/[a-zA-Z0-9-]+".to_string(),
            max_link_candidates: 15,
        }
    }
}

impl ExtractionConfig {
    pub fn validate(&self) -> ScrapeResult<()> {
        compile_selectors(&self.card_selectors)?;
        compile_selectors(&self.card_name_selectors)?;
        compile_selectors(&self.card_title_selectors)?;
        compile_selector(&self.coaches_page_marker)?;
        self.staff_profile_regex()?;
        if self.max_link_candidates == 0 {
            return Err(ScrapeError::configuration(
                "extraction.max_link_candidates",
                "must be greater than 0",
            ));
        }
        Ok(())
    }

    pub fn staff_profile_regex(&self) -> ScrapeResult<Regex> {
        Regex::new(&format!("(?i){}", self.staff_profile_pattern)).map_err(|e| {
            ScrapeError::configuration("extraction.staff_profile_pattern", e.to_string())
        })
    }
}

/// Compile one selector, surfacing failures as configuration errors
pub fn compile_selector(selector: &str) -> ScrapeResult<Selector> {
    Selector::parse(selector).map_err(|e| ScrapeError::invalid_selector(selector, e))
}

/// Compile an ordered selector list. Any invalid entry is fatal.
pub fn compile_selectors(selectors: &[String]) -> ScrapeResult<Vec<Selector>> {
    if selectors.is_empty() {
        return Err(ScrapeError::configuration(
            "extraction",
            "selector list must not be empty",
        ));
    }
    let compiled = selectors
        .iter()
        .map(|s| compile_selector(s))
        .collect::<ScrapeResult<Vec<_>>>()?;
    debug!("Compiled {} selectors", compiled.len());
    Ok(compiled)
}
