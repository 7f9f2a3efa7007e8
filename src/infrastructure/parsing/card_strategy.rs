//! Repeated staff/coach/person card blocks

use scraper::{ElementRef, Html, Selector};

use super::classifier::{
    extract_email_from_mailto, extract_name_and_title, extract_phone_from_tel,
    looks_like_person_name, mentions_coaching_role,
};
use super::config::{compile_selectors, ExtractionConfig};
use super::strategy::{element_text, find_href_with_scheme, ExtractionStrategy, RawCandidate};
use crate::infrastructure::scrape_error::ScrapeResult;

#[derive(Debug)]
pub struct CardStrategy {
    cards: Vec<Selector>,
    names: Vec<Selector>,
    titles: Vec<Selector>,
}

impl CardStrategy {
    pub fn new(config: &ExtractionConfig) -> ScrapeResult<Self> {
        Ok(Self {
            cards: compile_selectors(&config.card_selectors)?,
            names: compile_selectors(&config.card_name_selectors)?,
            titles: compile_selectors(&config.card_title_selectors)?,
        })
    }

    /// Cards from the first selector in the chain that matches anything
    fn find_cards<'a>(&self, document: &'a Html) -> Vec<ElementRef<'a>> {
        self.cards
            .iter()
            .map(|selector| document.select(selector).collect::<Vec<_>>())
            .find(|cards| !cards.is_empty())
            .unwrap_or_default()
    }

    fn first_text(
        card: &ElementRef<'_>,
        selectors: &[Selector],
        accept: impl Fn(&str) -> bool,
    ) -> Option<String> {
        selectors.iter().find_map(|selector| {
            card.select(selector)
                .map(|element| element_text(&element))
                .find(|text| accept(text))
        })
    }

    fn read_card(&self, card: &ElementRef<'_>) -> Option<RawCandidate> {
        let mut name = Self::first_text(card, &self.names, looks_like_person_name);
        // a title-classed label that names no role ("Staff", "Biography") is not a title
        let mut title = Self::first_text(card, &self.titles, |text| {
            mentions_coaching_role(text) && !looks_like_person_name(text)
        });

        if name.is_none() || title.is_none() {
            let (fallback_name, fallback_title) = extract_name_and_title(&element_text(card));
            name = name.or(fallback_name);
            title = title.or(fallback_title);
        }

        let email = find_href_with_scheme(card, "mailto:")
            .and_then(|href| extract_email_from_mailto(&href));
        let phone =
            find_href_with_scheme(card, "tel:").and_then(|href| extract_phone_from_tel(&href));

        name.map(|name| {
            RawCandidate::named(name)
                .with_title(title)
                .with_email(email)
                .with_phone(phone)
        })
    }
}

impl ExtractionStrategy for CardStrategy {
    fn name(&self) -> &'static str {
        "card"
    }

    fn extract(&self, document: &Html, _page_url: &str) -> Vec<RawCandidate> {
        self.find_cards(document)
            .iter()
            .filter_map(|card| self.read_card(card))
            .collect()
    }
}
