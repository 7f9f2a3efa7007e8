//! Program record handed to the export collaborator

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::coach::Coach;
use super::school::{Division, Gender};

/// One scraped (school, gender) program.
///
/// Built once by the program assembler and never mutated afterwards.
/// `tennis_page_url == None` means no coaches page was reached, so both
/// coach fields are empty as well.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    pub university: String,
    pub state: String,
    pub division: Division,
    pub gender: Gender,
    pub team_name: Option<String>,
    pub head_coach: Option<Coach>,
    pub assistant_coaches: Vec<Coach>,
    pub athletics_url: String,
    pub tennis_page_url: Option<String>,
    pub scraped_at: DateTime<Utc>,
}

impl Program {
    /// True when at least one coach was found
    #[must_use]
    pub fn has_staff(&self) -> bool {
        self.head_coach.is_some() || !self.assistant_coaches.is_empty()
    }

    /// All coaches, head first
    pub fn coaches(&self) -> impl Iterator<Item = &Coach> {
        self.head_coach.iter().chain(self.assistant_coaches.iter())
    }
}
