//! Final record composition. No network, no parsing.

use chrono::{DateTime, Utc};
use tracing::warn;

use super::pipeline::ScrapeOutcome;
use crate::domain::{Gender, Program, School};

#[derive(Debug, Default, Clone, Copy)]
pub struct ProgramAssembler;

impl ProgramAssembler {
    /// Combine school metadata with a pipeline outcome.
    ///
    /// Coaches without a tennis page URL are dropped so that an absent URL
    /// always means an empty program.
    #[must_use]
    pub fn assemble(
        school: &School,
        gender: Gender,
        outcome: ScrapeOutcome,
        scraped_at: DateTime<Utc>,
    ) -> Program {
        let ScrapeOutcome {
            staff,
            tennis_page_url,
        } = outcome;

        let (head_coach, assistant_coaches) = if tennis_page_url.is_some() {
            (staff.head_coach, staff.assistants)
        } else {
            if !staff.is_empty() {
                warn!(
                    "Dropping {} coaches for {} ({}): no team page",
                    staff.len(),
                    school.name,
                    gender
                );
            }
            (None, Vec::new())
        };

        Program {
            university: school.name.clone(),
            state: school.state.clone(),
            division: school.division,
            gender,
            team_name: Some(gender.team_name()),
            head_coach,
            assistant_coaches,
            athletics_url: school.athletics_url.clone(),
            tennis_page_url,
            scraped_at,
        }
    }
}
