//! End-to-end scrapes of the default pipeline against fixture sites

use std::sync::Arc;

use tennis_coach_scraper::test_utils::{fixed_scraped_at, fixture_scraper, FixtureSite};
use tennis_coach_scraper::{Division, Gender, Program, School};

const ROOT: &str = "https://state.edu";
const MENS_TEAM: &str = "https://state.edu/sports/mens-tennis";
const MENS_COACHES: &str = "https://state.edu/sports/mens-tennis/coaches";

fn school() -> School {
    School::new("State University", "Kentucky", Division::NcaaD1, ROOT)
}

async fn scrape_men(site: FixtureSite) -> (Program, Arc<FixtureSite>) {
    let site = Arc::new(site);
    let scraper = fixture_scraper(Arc::clone(&site)).expect("fixture scraper");
    let program = scraper.scrape_program(&school(), Gender::Men).await;
    (program, site)
}

fn staff_table(rows: &[(&str, &str, &str)]) -> String {
    let body: String = rows
        .iter()
        .map(|(name, title, email)| {
            format!(
                r#"<tr><td>{name}</td><td>{title}</td><td><a href="mailto:{email}">Email</a></td></tr>"#
            )
        })
        .collect();
    format!("<html><body><table>{body}</table></body></html>")
}

fn names(program: &Program) -> Vec<&str> {
    program
        .assistant_coaches
        .iter()
        .map(|c| c.name.as_str())
        .collect()
}

#[tokio::test]
async fn exhausted_team_cascade_yields_empty_program() {
    let (program, site) = scrape_men(FixtureSite::new()).await;

    assert!(program.tennis_page_url.is_none());
    assert!(program.head_coach.is_none());
    assert!(program.assistant_coaches.is_empty());
    assert_eq!(program.team_name.as_deref(), Some("Men's Tennis"));
    assert_eq!(program.athletics_url, ROOT);
    assert_eq!(site.probed_urls().len(), 5);
    assert!(site.rendered_urls().is_empty());
}

#[tokio::test]
async fn staff_table_splits_head_and_assistant() {
    let html = staff_table(&[
        ("Jane Doe", "Head Coach", "jane@x.edu"),
        ("Sam Lee", "Assistant Coach", "sam@x.edu"),
    ]);
    let site = FixtureSite::new()
        .with_page(MENS_TEAM, "<html></html>")
        .with_page(MENS_COACHES, &html);

    let (program, _) = scrape_men(site).await;

    let head = program.head_coach.as_ref().expect("head coach");
    assert_eq!(head.name, "Jane Doe");
    assert_eq!(head.title.as_deref(), Some("Head Coach"));
    assert_eq!(head.email.as_deref(), Some("jane@x.edu"));
    assert_eq!(names(&program), vec!["Sam Lee"]);
    assert_eq!(program.tennis_page_url.as_deref(), Some(MENS_TEAM));
    assert_eq!(program.scraped_at, fixed_scraped_at());
}

#[tokio::test]
async fn second_head_coach_is_demoted() {
    let html = staff_table(&[
        ("Jane Doe", "Head Coach", "jane@x.edu"),
        ("Pat Kim", "Head Coach", "pat@x.edu"),
    ]);
    let site = FixtureSite::new()
        .with_page(MENS_TEAM, "<html></html>")
        .with_page(MENS_COACHES, &html);

    let (program, _) = scrape_men(site).await;

    assert_eq!(program.head_coach.as_ref().unwrap().name, "Jane Doe");
    assert_eq!(names(&program), vec!["Pat Kim"]);
}

#[tokio::test]
async fn stop_phrases_never_become_names() {
    let html = r#"<table>
        <tr><td>Read More</td><td>Head Coach</td></tr>
        <tr><td>View Bio</td><td>Assistant Coach</td></tr>
    </table>"#;
    let site = FixtureSite::new()
        .with_page(MENS_TEAM, "<html></html>")
        .with_page(MENS_COACHES, html);

    let (program, _) = scrape_men(site).await;

    assert!(program.head_coach.is_none());
    assert!(program.assistant_coaches.is_empty());
    // team page was reached, so the partial result keeps its URL
    assert_eq!(program.tennis_page_url.as_deref(), Some(MENS_TEAM));
}

#[tokio::test]
async fn mailto_is_lowercased_and_query_stripped() {
    let html = r#"<table><tr><td>Jane Doe</td><td>Head Coach</td>
        <td><a href="mailto:Jane.Doe@Example.EDU?subject=hello">Email</a></td></tr></table>"#;
    let site = FixtureSite::new()
        .with_page(MENS_TEAM, "<html></html>")
        .with_page(MENS_COACHES, html);

    let (program, _) = scrape_men(site).await;

    assert_eq!(
        program.head_coach.as_ref().unwrap().email.as_deref(),
        Some("jane.doe@example.edu")
    );
}

#[tokio::test]
async fn table_result_wins_over_cards() {
    let html = r#"<html><body>
        <table><tr><td>Jane Doe</td><td>Head Coach</td></tr></table>
        <div class="sidearm-coaches-coach">
          <div class="sidearm-coaches-coach-name">Card Person</div>
          <div class="sidearm-coaches-coach-title">Head Coach</div>
        </div>
    </body></html>"#;
    let site = FixtureSite::new()
        .with_page(MENS_TEAM, "<html></html>")
        .with_page(MENS_COACHES, html);

    let (program, _) = scrape_men(site).await;

    assert_eq!(program.head_coach.as_ref().unwrap().name, "Jane Doe");
    assert!(program.assistant_coaches.is_empty());
}

#[tokio::test]
async fn identical_html_gives_identical_output() {
    let html = staff_table(&[
        ("Jane Doe", "Head Coach", "jane@x.edu"),
        ("Sam Lee", "Assistant Coach", "sam@x.edu"),
        ("Pat Kim", "Volunteer Assistant", "pat@x.edu"),
    ]);
    let build = || {
        FixtureSite::new()
            .with_page(MENS_TEAM, "<html></html>")
            .with_page(MENS_COACHES, &html)
    };

    let (first, _) = scrape_men(build()).await;
    let (second, _) = scrape_men(build()).await;

    assert_eq!(
        serde_json::to_vec(&first).unwrap(),
        serde_json::to_vec(&second).unwrap()
    );
}

#[tokio::test]
async fn roster_section_used_when_coaches_page_is_missing() {
    let roster = r#"<html><body>
        <section id="roster"><table>
          <tr><td>Player One</td><td>Freshman</td></tr>
        </table></section>
        <section id="coaches"><table>
          <tr><td>Jane Doe</td><td>Head Coach</td></tr>
          <tr><td>Sam Lee</td><td>Assistant Coach</td></tr>
        </table></section>
    </body></html>"#;
    let site = FixtureSite::new()
        .with_page(MENS_TEAM, "<html></html>")
        .with_page("https://state.edu/sports/mens-tennis/roster/", roster);

    let (program, site) = scrape_men(site).await;

    assert_eq!(program.head_coach.as_ref().unwrap().name, "Jane Doe");
    assert_eq!(names(&program), vec!["Sam Lee"]);
    assert_eq!(
        site.rendered_urls(),
        vec!["https://state.edu/sports/mens-tennis/roster/"]
    );
}

#[tokio::test]
async fn anchored_coaches_url_reads_only_its_section() {
    let roster = r#"<html><body>
        <section id="roster"><table>
          <tr><td>Player One</td><td>Freshman</td></tr>
          <tr><td>Player Two</td><td>Senior</td></tr>
        </table></section>
        <section id="coaches"><table>
          <tr><td>Jane Doe</td><td>Head Coach</td></tr>
        </table></section>
    </body></html>"#;
    let anchored = "https://state.edu/sports/mens-tennis/roster/#coaches";
    let site = FixtureSite::new()
        .with_page(MENS_TEAM, "<html></html>")
        .with_page(anchored, roster);

    let (program, site) = scrape_men(site).await;

    assert_eq!(program.head_coach.as_ref().unwrap().name, "Jane Doe");
    assert!(program.assistant_coaches.is_empty());
    assert_eq!(site.rendered_urls(), vec![anchored]);
}

#[tokio::test]
async fn anchored_coaches_url_without_section_drops_untitled_rows() {
    let roster = r"<html><body><table>
        <tr><td>Player One</td><td></td></tr>
        <tr><td>Jane Doe</td><td>Head Coach</td></tr>
    </table></body></html>";
    let site = FixtureSite::new()
        .with_page(MENS_TEAM, "<html></html>")
        .with_page("https://state.edu/sports/mens-tennis/roster/#coaches", roster);

    let (program, _) = scrape_men(site).await;

    assert_eq!(program.head_coach.as_ref().unwrap().name, "Jane Doe");
    assert!(program.assistant_coaches.is_empty());
}

#[tokio::test]
async fn roster_page_without_section_keeps_only_titled_people() {
    let roster = r"<html><body><table>
        <tr><td>Player One</td><td>Lexington, Ky.</td></tr>
        <tr><td>Jane Doe</td><td>Head Coach</td></tr>
    </table></body></html>";
    let site = FixtureSite::new()
        .with_page(MENS_TEAM, "<html></html>")
        .with_page("https://state.edu/sport/mens-tennis/roster/", roster);

    let (program, site) = scrape_men(site).await;

    assert_eq!(program.head_coach.as_ref().unwrap().name, "Jane Doe");
    assert!(program.assistant_coaches.is_empty());
    assert_eq!(
        site.rendered_urls(),
        vec![
            "https://state.edu/sports/mens-tennis/roster/",
            "https://state.edu/sport/mens-tennis/roster/",
        ]
    );
}

#[tokio::test]
async fn scrape_school_covers_both_genders() {
    let site = Arc::new(
        FixtureSite::new()
            .with_page("https://state.edu/sports/womens-tennis", "<html></html>")
            .with_page(
                "https://state.edu/sports/womens-tennis/staff",
                &staff_table(&[("Ann Ames", "Head Coach", "ann@x.edu")]),
            ),
    );
    let scraper = fixture_scraper(Arc::clone(&site)).unwrap();

    let programs = scraper.scrape_school(&school()).await;

    assert_eq!(programs.len(), 2);
    assert_eq!(programs[0].gender, Gender::Men);
    assert!(programs[0].tennis_page_url.is_none());
    assert_eq!(programs[1].team_name.as_deref(), Some("Women's Tennis"));
    assert_eq!(programs[1].head_coach.as_ref().unwrap().name, "Ann Ames");
}

#[tokio::test]
async fn invalid_configuration_fails_before_any_request() {
    use tennis_coach_scraper::test_utils::fixture_config;
    use tennis_coach_scraper::CoachScraper;

    let site = Arc::new(FixtureSite::new());
    let mut config = fixture_config();
    config.cascades.coaches_paths.clear();

    let err = CoachScraper::new(config, site.clone(), site.clone()).unwrap_err();

    assert!(!err.is_recoverable());
    assert!(site.probed_urls().is_empty());
}
