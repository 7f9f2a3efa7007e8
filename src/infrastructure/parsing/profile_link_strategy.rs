//! Anchors pointing at individual staff profiles

use regex::Regex;
use scraper::{ElementRef, Html};

use super::classifier::{
    extract_email_from_mailto, extract_phone_from_tel, looks_like_person_name, match_title,
};
use super::config::ExtractionConfig;
use super::strategy::{
    element_text, find_href_with_scheme, nearest_ancestor, ExtractionStrategy, RawCandidate,
    ANCHOR_WITH_HREF,
};
use crate::infrastructure::scrape_error::ScrapeResult;

const CONTEXT_TAGS: &[&str] = &["div", "li", "article", "section", "tr"];

#[derive(Debug)]
pub struct ProfileLinkStrategy {
    profile_href: Regex,
    max_links: usize,
}

impl ProfileLinkStrategy {
    pub fn new(config: &ExtractionConfig) -> ScrapeResult<Self> {
        Ok(Self {
            profile_href: config.staff_profile_regex()?,
            max_links: config.max_link_candidates,
        })
    }

    fn anchor_name(anchor: &ElementRef<'_>) -> Option<String> {
        let text = element_text(anchor);
        if looks_like_person_name(&text) {
            return Some(text);
        }
        ["title", "aria-label"]
            .iter()
            .filter_map(|attr| anchor.value().attr(attr))
            .map(str::trim)
            .find(|label| looks_like_person_name(label))
            .map(str::to_string)
    }

    fn read_anchor(anchor: &ElementRef<'_>) -> Option<RawCandidate> {
        let name = Self::anchor_name(anchor)?;
        let context = nearest_ancestor(anchor, CONTEXT_TAGS);

        let (title, email, phone) = context.map_or((None, None, None), |block| {
            (
                match_title(&element_text(&block)),
                find_href_with_scheme(&block, "mailto:")
                    .and_then(|href| extract_email_from_mailto(&href)),
                find_href_with_scheme(&block, "tel:").and_then(|href| extract_phone_from_tel(&href)),
            )
        });

        Some(
            RawCandidate::named(name)
                .with_title(title)
                .with_email(email)
                .with_phone(phone),
        )
    }
}

impl ExtractionStrategy for ProfileLinkStrategy {
    fn name(&self) -> &'static str {
        "profile_link"
    }

    fn extract(&self, document: &Html, _page_url: &str) -> Vec<RawCandidate> {
        document
            .select(&ANCHOR_WITH_HREF)
            .filter(|anchor| {
                anchor
                    .value()
                    .attr("href")
                    .is_some_and(|href| self.profile_href.is_match(href))
            })
            .take(self.max_links)
            .filter_map(|anchor| Self::read_anchor(&anchor))
            .collect()
    }
}
