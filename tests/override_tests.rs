//! Site-override routing: staff directory and tabbed roster sites

use std::sync::Arc;

use tennis_coach_scraper::application::{
    ScrapePipeline, SiteOverrideRegistry, StaffDirectoryPipeline,
};
use tennis_coach_scraper::test_utils::{fixture_scraper, FixtureSite};
use tennis_coach_scraper::{Division, Gender, School};

const DIRECTORY: &str = r#"<html><body><table>
    <tr><th>Name</th><th>Title</th><th>Email</th></tr>
    <tr><td><a href="/staff/pat-kim">Pat Kim</a></td>
        <td>Women's Tennis Assistant Coach</td>
        <td><a href="mailto:pkim@stanford.edu">Email</a></td></tr>
    <tr><td><a href="/staff/jane-doe">Jane Doe</a></td>
        <td>Director of Women's Tennis</td><td></td></tr>
    <tr><td>Chris Poe</td><td>Head Football Coach</td><td></td></tr>
</table></body></html>"#;

fn stanford() -> School {
    School::new("Stanford University", "California", Division::NcaaD1, "https://gostanford.com")
}

fn virginia() -> School {
    School::new("University of Virginia", "Virginia", Division::NcaaD1, "https://virginiasports.com/")
}

#[tokio::test]
async fn staff_directory_site_reads_department_directory() {
    let site = Arc::new(
        FixtureSite::new()
            .with_page("https://gostanford.com/sports/womens-tennis", "<html></html>")
            .with_page("https://gostanford.com/staff-directory", DIRECTORY),
    );
    let scraper = fixture_scraper(Arc::clone(&site)).unwrap();
    assert_eq!(scraper.pipeline_for(&stanford()).name(), "staff_directory");

    let program = scraper.scrape_program(&stanford(), Gender::Women).await;

    assert_eq!(program.head_coach.as_ref().unwrap().name, "Jane Doe");
    assert_eq!(program.assistant_coaches.len(), 1);
    assert_eq!(
        program.assistant_coaches[0].email.as_deref(),
        Some("pkim@stanford.edu")
    );
    assert_eq!(
        program.tennis_page_url.as_deref(),
        Some("https://gostanford.com/sports/womens-tennis")
    );
    // the per-team coaches cascade is never consulted
    assert!(!site
        .probed_urls()
        .iter()
        .any(|url| url.ends_with("/coaches")));
}

#[tokio::test]
async fn staff_directory_without_team_page_attributes_directory_url() {
    let directory = DIRECTORY.replace("Women's Tennis", "Men's Tennis");
    let site = Arc::new(
        FixtureSite::new().with_page("https://gostanford.com/staff-directory", &directory),
    );
    let scraper = fixture_scraper(site).unwrap();

    let program = scraper.scrape_program(&stanford(), Gender::Men).await;

    assert_eq!(program.head_coach.as_ref().unwrap().name, "Jane Doe");
    assert_eq!(
        program.tennis_page_url.as_deref(),
        Some("https://gostanford.com/staff-directory")
    );
}

#[tokio::test]
async fn staff_directory_with_no_matching_rows_is_empty() {
    let site = Arc::new(
        FixtureSite::new().with_page("https://gostanford.com/staff-directory", DIRECTORY),
    );
    let scraper = fixture_scraper(site).unwrap();

    let program = scraper.scrape_program(&stanford(), Gender::Men).await;

    assert!(program.head_coach.is_none());
    assert!(program.assistant_coaches.is_empty());
    assert!(program.tennis_page_url.is_none());
}

#[tokio::test]
async fn tabbed_roster_reads_staff_after_clicking_tab() {
    let roster_url = "https://virginiasports.com/sports/mens-tennis/roster/";
    let players = r"<table><tr><td>Player One</td><td>Freshman</td></tr></table>";
    let coaches = r"<table>
        <tr><td>Jane Doe</td><td>Head Coach</td></tr>
        <tr><td>Sam Lee</td><td>Associate Head Coach</td></tr>
    </table>";
    let site = Arc::new(
        FixtureSite::new()
            .with_page("https://virginiasports.com/sports/mens-tennis", "<html></html>")
            .with_page(roster_url, players)
            .with_page_after_interaction(roster_url, coaches),
    );
    let scraper = fixture_scraper(Arc::clone(&site)).unwrap();

    let program = scraper.scrape_program(&virginia(), Gender::Men).await;

    assert_eq!(program.head_coach.as_ref().unwrap().name, "Jane Doe");
    assert_eq!(program.assistant_coaches[0].name, "Sam Lee");
    assert_eq!(
        program.tennis_page_url.as_deref(),
        Some("https://virginiasports.com/sports/mens-tennis")
    );
    assert_eq!(site.rendered_urls(), vec![roster_url]);
}

#[tokio::test]
async fn tabbed_roster_falls_back_to_coaches_page() {
    let site = Arc::new(
        FixtureSite::new()
            .with_page("https://virginiasports.com/sports/womens-tennis", "<html></html>")
            .with_page(
                "https://virginiasports.com/sports/womens-tennis/roster/",
                "<p>Roster coming soon</p>",
            )
            .with_page(
                "https://virginiasports.com/sports/womens-tennis/coaches",
                r"<table><tr><td>Ann Ames</td><td>Head Coach</td></tr></table>",
            ),
    );
    let scraper = fixture_scraper(site).unwrap();

    let program = scraper.scrape_program(&virginia(), Gender::Women).await;

    assert_eq!(program.head_coach.as_ref().unwrap().name, "Ann Ames");
}

#[tokio::test]
async fn empty_registry_routes_everything_to_default() {
    let site = Arc::new(
        FixtureSite::new()
            .with_page("https://gostanford.com/sports/mens-tennis", "<html></html>")
            .with_page(
                "https://gostanford.com/sports/mens-tennis/coaches",
                r"<table><tr><td>Alex Roe</td><td>Head Coach</td></tr></table>",
            ),
    );
    let scraper = fixture_scraper(site)
        .unwrap()
        .with_overrides(SiteOverrideRegistry::new());
    assert_eq!(scraper.pipeline_for(&stanford()).name(), "default");

    let program = scraper.scrape_program(&stanford(), Gender::Men).await;

    assert_eq!(program.head_coach.as_ref().unwrap().name, "Alex Roe");
}

#[test]
fn custom_override_applies_to_subdomains() {
    let mut registry = SiteOverrideRegistry::new();
    registry
        .register("state.edu", Arc::new(StaffDirectoryPipeline::new("/staff")))
        .unwrap();
    let scraper = fixture_scraper(Arc::new(FixtureSite::new()))
        .unwrap()
        .with_overrides(registry);

    let school = School::new("State", "Ohio", Division::NcaaD2, "https://athletics.state.edu");
    assert_eq!(scraper.pipeline_for(&school).name(), "staff_directory");
    // replacing the registry drops the built-in overrides
    assert_eq!(scraper.pipeline_for(&virginia()).name(), "default");
}
