//! Last resort: recover people from the text around `mailto:` anchors

use scraper::{ElementRef, Html};

use super::classifier::{
    extract_email_from_mailto, extract_name_and_title, extract_phone_from_tel,
    looks_like_person_name,
};
use super::config::ExtractionConfig;
use super::strategy::{
    element_text, find_href_with_scheme, has_scheme, nearest_ancestor, ExtractionStrategy,
    RawCandidate, ANCHOR_WITH_HREF,
};

const CONTEXT_TAGS: &[&str] = &["div", "li", "article", "tr", "section"];

#[derive(Debug)]
pub struct ContactAnchorStrategy {
    max_links: usize,
}

impl ContactAnchorStrategy {
    #[must_use]
    pub const fn new(config: &ExtractionConfig) -> Self {
        Self {
            max_links: config.max_link_candidates,
        }
    }

    fn read_anchor(anchor: &ElementRef<'_>, href: &str) -> Option<RawCandidate> {
        // an anchor without a usable address says nothing about a person
        let email = extract_email_from_mailto(href)?;
        let context = nearest_ancestor(anchor, CONTEXT_TAGS);

        let (mut name, title) = context
            .as_ref()
            .map_or((None, None), |block| extract_name_and_title(&element_text(block)));
        if name.is_none() {
            let text = element_text(anchor);
            name = looks_like_person_name(&text).then_some(text);
        }
        let phone = context
            .as_ref()
            .and_then(|block| find_href_with_scheme(block, "tel:"))
            .and_then(|href| extract_phone_from_tel(&href));

        name.map(|name| {
            RawCandidate::named(name)
                .with_title(title)
                .with_email(Some(email))
                .with_phone(phone)
        })
    }
}

impl ExtractionStrategy for ContactAnchorStrategy {
    fn name(&self) -> &'static str {
        "contact_anchor"
    }

    fn extract(&self, document: &Html, _page_url: &str) -> Vec<RawCandidate> {
        document
            .select(&ANCHOR_WITH_HREF)
            .filter_map(|anchor| {
                let href = anchor.value().attr("href")?;
                has_scheme(href, "mailto:").then_some((anchor, href))
            })
            .take(self.max_links)
            .filter_map(|(anchor, href)| Self::read_anchor(&anchor, href))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_from_surrounding_text() {
        let html = Html::parse_document(
            r#"<div><p>Head Coach Jane Doe</p><a href="mailto:jane@x.edu">Email</a>
                    <a href="tel:555-0100">Call</a></div>
               <div><a href="mailto:Sam.Lee@X.edu">Sam Lee</a></div>
               <div><a href="mailto:tickets@x.edu">Tickets Office</a></div>"#,
        );
        let found =
            ContactAnchorStrategy::new(&ExtractionConfig::default()).extract(&html, "https://x.edu");
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].name, "Jane Doe");
        assert_eq!(found[0].title.as_deref(), Some("Head Coach"));
        assert_eq!(found[0].phone.as_deref(), Some("555-0100"));
        assert_eq!(found[1].name, "Sam Lee");
        assert_eq!(found[1].email.as_deref(), Some("sam.lee@x.edu"));
    }

    #[test]
    fn test_anchors_without_valid_address_are_skipped() {
        let html = Html::parse_document(
            r#"<div><p>Jane Doe, Head Coach</p><a href="mailto:">Email</a></div>
               <div><p>Pat Kim, Assistant Coach</p><a href="mailto:not-an-address">Email</a></div>"#,
        );
        let found =
            ContactAnchorStrategy::new(&ExtractionConfig::default()).extract(&html, "https://x.edu");
        assert!(found.is_empty());
    }
}
