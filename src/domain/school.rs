//! # School and program-selection value objects
//!
//! Input records supplied by the external school directory, plus the
//! division and gender enums that select which team page is scraped.

use serde::{Deserialize, Serialize};

/// Sport every program in this crate belongs to
pub const SPORT_NAME: &str = "tennis";

/// Athletic association division tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Division {
    #[serde(rename = "NCAA D1")]
    NcaaD1,
    #[serde(rename = "NCAA D2")]
    NcaaD2,
    #[serde(rename = "NCAA D3")]
    NcaaD3,
    #[serde(rename = "NAIA")]
    Naia,
    #[serde(rename = "NJCAA")]
    Njcaa,
}

impl Division {
    /// Returns the label used in exported records
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::NcaaD1 => "NCAA D1",
            Self::NcaaD2 => "NCAA D2",
            Self::NcaaD3 => "NCAA D3",
            Self::Naia => "NAIA",
            Self::Njcaa => "NJCAA",
        }
    }
}

impl std::fmt::Display for Division {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Team gender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Men,
    Women,
}

impl Gender {
    /// Both genders in scrape order
    pub const ALL: [Self; 2] = [Self::Men, Self::Women];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Men => "Men",
            Self::Women => "Women",
        }
    }

    /// Display name of the team, e.g. `Women's Tennis`
    #[must_use]
    pub fn team_name(self) -> String {
        let mut sport = SPORT_NAME.to_string();
        if let Some(first) = sport.get_mut(0..1) {
            first.make_ascii_uppercase();
        }
        format!("{}'s {}", self.label(), sport)
    }

    /// Lower-cased sport phrase as it appears in free text, e.g. `men's tennis`
    #[must_use]
    pub fn sport_phrase(self) -> String {
        format!("{}'s {}", self.label().to_lowercase(), SPORT_NAME)
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A school as supplied by the external directory. Immutable input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct School {
    #[serde(alias = "school", alias = "university")]
    pub name: String,
    pub state: String,
    pub division: Division,
    pub athletics_url: String,
}

impl School {
    pub fn new(
        name: impl Into<String>,
        state: impl Into<String>,
        division: Division,
        athletics_url: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            state: state.into(),
            division,
            athletics_url: athletics_url.into(),
        }
    }

    /// Athletics root without a trailing slash
    #[must_use]
    pub fn athletics_root(&self) -> &str {
        self.athletics_url.trim_end_matches('/')
    }
}
