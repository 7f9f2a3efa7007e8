//! Heuristic text classification for coach candidates
//!
//! Pure functions over fixed vocabularies: name shape, contact URIs, coaching
//! titles, and the head/assistant split. Nothing here needs a network or a
//! parsed document, so every rule is unit-testable on plain strings.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use tracing::debug;

use super::strategy::RawCandidate;
use crate::domain::Coach;

/// Lower-cased phrases that disqualify text from being a person's name
pub const STOP_PHRASES: &[&str] = &[
    "head coach",
    "assistant",
    "volunteer",
    "director",
    "coach",
    "read more",
    "view bio",
    "click",
    "loading",
    "staff",
    "email",
    "phone",
    "office",
    "fax",
    "schedule",
    "roster",
    "news",
    "tickets",
    "donate",
    "contact",
    "twitter",
    "instagram",
    "facebook",
    "youtube",
    "tiktok",
    "print",
    "share",
];

/// Keywords that make a table cell a title cell
const TITLE_CELL_KEYWORDS: &[&str] = &["coach", "director", "coordinator"];

const NAME_MIN_CHARS: usize = 3;
const NAME_MAX_CHARS: usize = 60;

/// Coaching-title vocabulary. Most specific first: the first pattern that
/// matches a text wins, so "Associate Head Coach" must precede "Head Coach".
static TITLE_VOCABULARY: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"Associate Head Coach",
        r"Assistant Head Coach",
        r"Head Coach",
        r"Volunteer Assistant(?: Coach)?",
        r"Assistant Coach",
        r"Director of Tennis",
        r"Strength (?:and|&) Conditioning(?: Coach)?",
    ]
    .iter()
    .map(|pattern| Regex::new(&format!("(?i){pattern}")).expect("static title pattern"))
    .collect()
});

/// Two or more capitalised words in sequence
static NAME_SHAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b[A-Z][A-Za-z'’\-]*[a-z](?:\s+[A-Z][A-Za-z'’\-]*[a-z])+\b")
        .expect("static name pattern")
});

/// Collapse runs of whitespace into single spaces and trim
#[must_use]
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Does `text` look like a person's name?
///
/// Length 3..=60, at least two words, every word capitalised, and no
/// navigation/social/role stop phrase anywhere in it.
#[must_use]
pub fn looks_like_person_name(text: &str) -> bool {
    let length = text.chars().count();
    if !(NAME_MIN_CHARS..=NAME_MAX_CHARS).contains(&length) {
        return false;
    }

    let lower = text.to_lowercase();
    if STOP_PHRASES.iter().any(|phrase| lower.contains(phrase)) {
        return false;
    }

    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() < 2 {
        return false;
    }

    words
        .iter()
        .all(|word| word.chars().next().is_some_and(char::is_uppercase))
}

/// Email from a `mailto:` href: scheme stripped, lower-cased, query dropped.
/// Returns `None` unless the address has an `@` followed by a dotted domain.
#[must_use]
pub fn extract_email_from_mailto(href: &str) -> Option<String> {
    let lower = href.trim().to_lowercase();
    if !lower.contains("mailto:") {
        return None;
    }
    let email = lower
        .replacen("mailto:", "", 1)
        .split('?')
        .next()
        .unwrap_or_default()
        .trim()
        .to_string();

    let domain = email.split('@').nth(1)?;
    if domain.contains('.') {
        Some(email)
    } else {
        None
    }
}

/// Phone from a `tel:` href, formatting left untouched
#[must_use]
pub fn extract_phone_from_tel(href: &str) -> Option<String> {
    let trimmed = href.trim();
    let phone = trimmed
        .get(..4)
        .filter(|scheme| scheme.eq_ignore_ascii_case("tel:"))
        .and_then(|_| trimmed.get(4..))?
        .trim();
    (!phone.is_empty()).then(|| phone.to_string())
}

/// First coaching title from the vocabulary found in `text`, as written there
#[must_use]
pub fn match_title(text: &str) -> Option<String> {
    TITLE_VOCABULARY
        .iter()
        .find_map(|pattern| pattern.find(text))
        .map(|m| m.as_str().to_string())
}

/// Table-cell title rule: multi-word text mentioning a coaching keyword.
/// Single tokens such as social handles ("coachjamie") never qualify.
#[must_use]
pub fn is_title_cell(text: &str) -> bool {
    text.contains(' ') && mentions_coaching_role(text)
}

/// Text names a coaching role: a vocabulary title or a role keyword
#[must_use]
pub fn mentions_coaching_role(text: &str) -> bool {
    let lower = text.to_lowercase();
    TITLE_CELL_KEYWORDS.iter().any(|keyword| lower.contains(keyword))
        || match_title(text).is_some()
}

/// Head coach iff the title says "head coach" and is neither assistant nor associate
#[must_use]
pub fn is_head_coach_title(title: &str) -> bool {
    let lower = title.to_lowercase();
    lower.contains("head coach") && !lower.contains("assistant") && !lower.contains("associate")
}

/// Recover a (name, title) pair from a free-text window.
///
/// Title words are masked out before the name search so that
/// "Head Coach Jane Doe" yields "Jane Doe" rather than the whole phrase.
#[must_use]
pub fn extract_name_and_title(text: &str) -> (Option<String>, Option<String>) {
    let text = normalize_whitespace(text);
    let title = match_title(&text);

    let masked = TITLE_VOCABULARY
        .iter()
        .fold(text, |acc, pattern| pattern.replace_all(&acc, " | ").into_owned());

    let name = NAME_SHAPE
        .find_iter(&masked)
        .find_map(|m| best_name_window(m.as_str()));

    (name, title)
}

/// Longest run of at least two tokens, earliest first, that passes the name rule
fn best_name_window(phrase: &str) -> Option<String> {
    let tokens: Vec<&str> = phrase.split_whitespace().collect();
    for start in 0..tokens.len() {
        for end in (start + 2..=tokens.len()).rev() {
            let candidate = tokens[start..end].join(" ");
            if looks_like_person_name(&candidate) {
                return Some(candidate);
            }
        }
    }
    None
}

/// Head coach plus assistants in extraction order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassifiedStaff {
    pub head_coach: Option<Coach>,
    pub assistants: Vec<Coach>,
}

impl ClassifiedStaff {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.head_coach.is_none() && self.assistants.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        usize::from(self.head_coach.is_some()) + self.assistants.len()
    }

    /// First head-titled coach becomes head; everyone else, including later
    /// head-titled coaches, is an assistant.
    #[must_use]
    pub fn split(coaches: Vec<Coach>) -> Self {
        let mut staff = Self::default();
        for coach in coaches {
            let is_head = coach.title.as_deref().is_some_and(is_head_coach_title);
            if is_head && staff.head_coach.is_none() {
                staff.head_coach = Some(coach);
            } else {
                staff.assistants.push(coach);
            }
        }
        staff
    }
}

/// Drop repeated names, keeping the first occurrence
#[must_use]
pub fn dedupe_by_name(candidates: Vec<RawCandidate>) -> Vec<RawCandidate> {
    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter(|candidate| seen.insert(normalize_whitespace(&candidate.name)))
        .collect()
}

/// Turn one extraction pass into (head, assistants)
#[must_use]
pub fn classify(candidates: Vec<RawCandidate>) -> ClassifiedStaff {
    let total = candidates.len();
    let coaches: Vec<Coach> = dedupe_by_name(candidates)
        .into_iter()
        .filter_map(RawCandidate::into_coach)
        .collect();

    debug!("Classified {} candidates into {} coaches", total, coaches.len());
    ClassifiedStaff::split(coaches)
}
