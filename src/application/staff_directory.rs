//! Override for athletics sites with a single, department-wide staff
//! directory instead of per-team coaches pages

use async_trait::async_trait;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info};

use super::pipeline::{PipelineContext, ScrapeOutcome, ScrapePipeline};
use super::url_resolver::join_url;
use crate::domain::{Coach, Gender, School};
use crate::infrastructure::page_fetcher::RenderRequest;
use crate::infrastructure::parsing::classifier::{
    dedupe_by_name, extract_email_from_mailto, normalize_whitespace, ClassifiedStaff,
};
use crate::infrastructure::parsing::strategy::{find_href_with_scheme, RawCandidate};

pub const DEFAULT_DIRECTORY_PATH: &str = "/staff-directory";

static ROWS: Lazy<Selector> = Lazy::new(|| Selector::parse("tr").expect("static selector"));
static CELLS: Lazy<Selector> = Lazy::new(|| Selector::parse("td, th").expect("static selector"));
static STAFF_LINK: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a[href*='/staff/']").expect("static selector"));

const ENDOWED_MARKERS: &[&str] = &["taube", "family", "endowed"];
const NAME_REJECT_WORDS: &[&str] = &["email", "phone", "office", "staff directory"];
const MIN_CELLS: usize = 2;
const MIN_NAME_CHARS: usize = 3;

#[derive(Debug, Clone)]
pub struct StaffDirectoryPipeline {
    directory_path: String,
}

impl Default for StaffDirectoryPipeline {
    fn default() -> Self {
        Self::new(DEFAULT_DIRECTORY_PATH)
    }
}

impl StaffDirectoryPipeline {
    pub fn new(directory_path: impl Into<String>) -> Self {
        Self {
            directory_path: directory_path.into(),
        }
    }

    /// Parse directory HTML into the staff for one gender's team
    #[must_use]
    pub fn parse_directory(html: &str, gender: Gender) -> ClassifiedStaff {
        let document = Html::parse_document(html);
        let sport = gender.sport_phrase();

        let candidates: Vec<RawCandidate> = document
            .select(&ROWS)
            .filter_map(|row| read_row(row, &sport))
            .collect();
        let coaches: Vec<Coach> = dedupe_by_name(candidates)
            .into_iter()
            .filter_map(RawCandidate::into_coach)
            .collect();

        split_by_director_title(coaches)
    }
}

/// "Director of ... Tennis" is the head coach; otherwise the first row
fn split_by_director_title(mut coaches: Vec<Coach>) -> ClassifiedStaff {
    if coaches.is_empty() {
        return ClassifiedStaff::default();
    }
    let head_index = coaches
        .iter()
        .position(|coach| coach.title.as_deref().is_some_and(is_directory_head_title))
        .unwrap_or(0);
    let head = coaches.remove(head_index);
    ClassifiedStaff {
        head_coach: Some(head),
        assistants: coaches,
    }
}

fn is_directory_head_title(title: &str) -> bool {
    let lower = title.to_lowercase();
    lower.contains("director of") && lower.contains("tennis") && !lower.contains("assistant")
}

/// Lower-case, unify apostrophes, collapse whitespace
fn normalize_row_text(text: &str) -> String {
    normalize_whitespace(&text.to_lowercase().replace(['’', '‘'], "'"))
}

/// `phrase` occurs in `text` not preceded by a letter, so "men's tennis"
/// never matches inside "women's tennis"
fn contains_phrase(text: &str, phrase: &str) -> bool {
    text.match_indices(phrase).any(|(start, _)| {
        !text[..start]
            .chars()
            .next_back()
            .is_some_and(char::is_alphabetic)
    })
}

fn is_team_coach_row(row_text: &str, sport: &str) -> bool {
    if !contains_phrase(row_text, sport) {
        return false;
    }
    let role_phrases = [
        format!("director of {sport}"),
        format!("director • {sport}"),
        format!("{sport} assistant coach"),
        format!("assistant {sport} coach"),
        format!("{sport} coach"),
        "head coach".to_string(),
    ];
    if role_phrases
        .iter()
        .any(|phrase| contains_phrase(row_text, phrase))
    {
        return true;
    }
    (row_text.contains("director") || row_text.contains("coach"))
        && ENDOWED_MARKERS.iter().any(|marker| row_text.contains(marker))
}

fn read_row(row: ElementRef<'_>, sport: &str) -> Option<RawCandidate> {
    let cells: Vec<ElementRef<'_>> = row.select(&CELLS).collect();
    if cells.len() < MIN_CELLS {
        return None;
    }

    let row_text = normalize_row_text(&row.text().collect::<Vec<_>>().join(" "));
    if !is_team_coach_row(&row_text, sport) {
        return None;
    }

    let cell_text = |cell: &ElementRef<'_>| normalize_whitespace(&cell.text().collect::<String>());
    let name = row
        .select(&STAFF_LINK)
        .next()
        .map(|link| cell_text(&link))
        .or_else(|| cells.first().map(cell_text))?;

    let lower_name = name.to_lowercase();
    if name.chars().count() < MIN_NAME_CHARS
        || NAME_REJECT_WORDS.iter().any(|word| lower_name.contains(word))
    {
        return None;
    }

    let title = cells[1..].iter().map(cell_text).find(|text| {
        let lower = text.to_lowercase();
        lower.contains("director") || lower.contains("coach")
    });
    let email =
        find_href_with_scheme(&row, "mailto:").and_then(|href| extract_email_from_mailto(&href));

    Some(RawCandidate::named(name).with_title(title).with_email(email))
}

#[async_trait]
impl ScrapePipeline for StaffDirectoryPipeline {
    fn name(&self) -> &'static str {
        "staff_directory"
    }

    async fn run(
        &self,
        ctx: &PipelineContext<'_>,
        school: &School,
        gender: Gender,
    ) -> ScrapeOutcome {
        let team_url = ctx
            .resolver
            .resolve_team_page(school.athletics_root(), gender)
            .await;

        let directory_url = join_url(school.athletics_root(), &self.directory_path);
        let Some(page) = ctx.fetcher.fetch(&RenderRequest::new(&directory_url)).await else {
            return ScrapeOutcome {
                staff: ClassifiedStaff::default(),
                tennis_page_url: team_url,
            };
        };

        let staff = Self::parse_directory(&page.html, gender);
        info!(
            "Staff directory {} listed {} {} coaches",
            directory_url,
            staff.len(),
            gender.label()
        );

        let tennis_page_url = match team_url {
            Some(url) => Some(url),
            None if !staff.is_empty() => {
                debug!("No team page; attributing staff to {}", directory_url);
                Some(directory_url)
            }
            None => None,
        };
        ScrapeOutcome {
            staff,
            tennis_page_url,
        }
    }
}
