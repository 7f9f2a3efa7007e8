//! Team-page and coaches-page discovery by cascade probing

use tracing::{debug, info};

use crate::domain::Gender;
use crate::infrastructure::config::CascadeConfig;
use crate::infrastructure::page_fetcher::PageFetcher;
use crate::infrastructure::scrape_error::ScrapeResult;

/// Probes ordered candidate paths and returns the first that exists.
///
/// Running out of candidates is a normal "not found" outcome, never an error.
#[derive(Debug, Clone)]
pub struct UrlResolver {
    fetcher: PageFetcher,
    cascades: CascadeConfig,
}

impl UrlResolver {
    pub fn new(fetcher: PageFetcher, cascades: CascadeConfig) -> ScrapeResult<Self> {
        cascades.validate()?;
        Ok(Self { fetcher, cascades })
    }

    pub const fn fetcher(&self) -> &PageFetcher {
        &self.fetcher
    }

    pub async fn resolve_team_page(&self, root_url: &str, gender: Gender) -> Option<String> {
        let found = self
            .first_existing(root_url, self.cascades.team_paths(gender))
            .await;
        match &found {
            Some(url) => info!("{} team page: {}", gender.label(), url),
            None => info!("No {} team page under {}", gender.label(), root_url),
        }
        found
    }

    pub async fn resolve_coaches_page(&self, team_url: &str) -> Option<String> {
        let found = self
            .first_existing(team_url, &self.cascades.coaches_paths)
            .await;
        match &found {
            Some(url) => info!("Coaches page: {}", url),
            None => info!("No coaches page under {}", team_url),
        }
        found
    }

    /// Roster URLs for a team page, including the `/sport/` and short-slug
    /// spellings some site families use
    #[must_use]
    pub fn roster_candidates(&self, team_url: &str) -> Vec<String> {
        let path = &self.cascades.roster_path;
        let mut candidates = vec![join_url(team_url, path)];

        if team_url.contains("/sports/") {
            candidates.push(join_url(&team_url.replace("/sports/", "/sport/"), path));
        }
        // "womens-tennis" contains "mens-tennis", so check it first
        if team_url.contains("womens-tennis") {
            candidates.push(join_url(&team_url.replace("womens-tennis", "wten"), path));
        } else if team_url.contains("mens-tennis") {
            candidates.push(join_url(&team_url.replace("mens-tennis", "mten"), path));
        }

        let mut unique = Vec::with_capacity(candidates.len());
        for candidate in candidates {
            if !unique.contains(&candidate) {
                unique.push(candidate);
            }
        }
        unique
    }

    async fn first_existing(&self, base: &str, paths: &[String]) -> Option<String> {
        for path in paths {
            let url = join_url(base, path);
            if self.fetcher.exists(&url).await {
                return Some(url);
            }
            debug!("Cascade miss: {}", url);
        }
        None
    }
}

/// `base` without trailing slashes, then `path`
#[must_use]
pub fn join_url(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{fixture_fetcher, FixtureSite};
    use std::sync::Arc;

    fn resolver(site: &Arc<FixtureSite>) -> UrlResolver {
        UrlResolver::new(fixture_fetcher(Arc::clone(site)), CascadeConfig::default()).unwrap()
    }

    #[tokio::test]
    async fn test_first_existing_candidate_wins() {
        let site = Arc::new(
            FixtureSite::new()
                .with_page("https://u.edu/sport/m-tennis", "<html></html>")
                .with_page("https://u.edu/m-tennis", "<html></html>"),
        );
        let found = resolver(&site)
            .resolve_team_page("https://u.edu/", Gender::Men)
            .await;
        assert_eq!(found.as_deref(), Some("https://u.edu/sport/m-tennis"));
        assert_eq!(
            site.probed_urls(),
            vec![
                "https://u.edu/sports/mens-tennis",
                "https://u.edu/sports/m-tennis",
                "https://u.edu/sports/mten",
                "https://u.edu/sport/m-tennis",
            ]
        );
    }

    #[tokio::test]
    async fn test_exhausted_cascade_is_absent() {
        let site = Arc::new(FixtureSite::new());
        let resolver = resolver(&site);
        assert!(resolver
            .resolve_team_page("https://u.edu", Gender::Women)
            .await
            .is_none());
        assert!(resolver
            .resolve_coaches_page("https://u.edu/sports/womens-tennis")
            .await
            .is_none());
        assert_eq!(site.probed_urls().len(), 9);
    }

    #[test]
    fn test_roster_candidates() {
        let site = Arc::new(FixtureSite::new());
        let resolver = resolver(&site);
        assert_eq!(
            resolver.roster_candidates("https://u.edu/sports/womens-tennis/"),
            vec![
                "https://u.edu/sports/womens-tennis/roster/",
                "https://u.edu/sport/womens-tennis/roster/",
                "https://u.edu/sports/wten/roster/",
            ]
        );
        assert_eq!(
            resolver.roster_candidates("https://u.edu/m-tennis"),
            vec!["https://u.edu/m-tennis/roster/"]
        );
    }

    #[test]
    fn test_invalid_cascade_is_fatal() {
        let site = Arc::new(FixtureSite::new());
        let cascades = CascadeConfig {
            coaches_paths: Vec::new(),
            ..CascadeConfig::default()
        };
        assert!(UrlResolver::new(fixture_fetcher(site), cascades).is_err());
    }
}
