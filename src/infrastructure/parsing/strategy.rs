//! Extraction strategy seam and shared DOM helpers

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

use super::classifier::normalize_whitespace;
use crate::domain::Coach;

/// Unclassified (name, title?, email?, phone?) tuple produced by a strategy
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawCandidate {
    pub name: String,
    pub title: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl RawCandidate {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_title(mut self, title: Option<String>) -> Self {
        self.title = title;
        self
    }

    #[must_use]
    pub fn with_email(mut self, email: Option<String>) -> Self {
        self.email = email;
        self
    }

    #[must_use]
    pub fn with_phone(mut self, phone: Option<String>) -> Self {
        self.phone = phone;
        self
    }

    #[must_use]
    pub fn has_title(&self) -> bool {
        self.title.as_deref().is_some_and(|t| !t.trim().is_empty())
    }

    /// Convert into a domain coach; `None` for a blank name
    #[must_use]
    pub fn into_coach(self) -> Option<Coach> {
        let name = normalize_whitespace(&self.name);
        Coach::new(name).ok().map(|coach| {
            coach
                .with_title(self.title.map(|t| normalize_whitespace(&t)))
                .with_email(self.email)
                .with_phone(self.phone)
        })
    }
}

/// One way of pulling candidates out of a rendered document.
///
/// Implementations are pure over the parsed document so they can be
/// tested against static HTML.
pub trait ExtractionStrategy: Send + Sync {
    /// Short identifier used in logs
    fn name(&self) -> &'static str;

    fn extract(&self, document: &Html, page_url: &str) -> Vec<RawCandidate>;
}

pub(crate) static ANCHOR_WITH_HREF: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a[href]").expect("static selector"));

/// Whitespace-normalized text content of an element
pub(crate) fn element_text(element: &ElementRef<'_>) -> String {
    normalize_whitespace(&element.text().collect::<Vec<_>>().join(" "))
}

/// Nearest ancestor whose tag is one of `tags`
pub(crate) fn nearest_ancestor<'a>(
    element: &ElementRef<'a>,
    tags: &[&str],
) -> Option<ElementRef<'a>> {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|ancestor| tags.contains(&ancestor.value().name()))
}

/// First anchor href inside `element` (itself included) with the given scheme
pub(crate) fn find_href_with_scheme(element: &ElementRef<'_>, scheme: &str) -> Option<String> {
    let own = element
        .value()
        .attr("href")
        .filter(|href| has_scheme(href, scheme));
    own.or_else(|| {
        element
            .select(&ANCHOR_WITH_HREF)
            .filter_map(|anchor| anchor.value().attr("href"))
            .find(|href| has_scheme(href, scheme))
    })
    .map(str::to_string)
}

pub(crate) fn has_scheme(href: &str, scheme: &str) -> bool {
    href.trim_start()
        .get(..scheme.len())
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case(scheme))
}
