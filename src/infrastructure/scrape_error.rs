//! Scrape error taxonomy
//!
//! Every failure the core can observe maps onto one of three classes.
//! Navigation and parse failures are degraded inside a single scrape;
//! configuration errors are setup defects and propagate to the caller.

use thiserror::Error;

/// Coarse error class used by callers to decide whether to continue
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Timeout, network error or non-success response
    NavigationFailure,
    /// Page fetched but no strategy produced a candidate
    ParseFailure,
    /// Malformed cascades, selectors or registry entries
    ConfigurationError,
}

#[derive(Error, Debug, Clone)]
pub enum ScrapeError {
    #[error("Navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("Timed out after {after_ms}ms waiting for {url}")]
    Timeout { url: String, after_ms: u64 },

    #[error("HTTP request failed: {status} - {url}")]
    HttpStatus { status: u16, url: String },

    #[error("Browser session error: {message}")]
    Session { message: String },

    #[error("No coach candidates found on {url}")]
    NoCandidates {
        url: String,
        tried_strategies: Vec<String>,
    },

    #[error("Invalid CSS selector: {selector} - {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("Configuration error in {field}: {message}")]
    Configuration { message: String, field: String },
}

impl ScrapeError {
    pub fn navigation(url: &str, reason: impl std::fmt::Display) -> Self {
        Self::Navigation {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn configuration(field: &str, message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
            field: field.to_string(),
        }
    }

    pub fn invalid_selector(selector: &str, reason: impl std::fmt::Display) -> Self {
        Self::InvalidSelector {
            selector: selector.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn session(message: impl std::fmt::Display) -> Self {
        Self::Session {
            message: message.to_string(),
        }
    }

    #[must_use]
    pub const fn class(&self) -> ErrorClass {
        match self {
            Self::Navigation { .. }
            | Self::Timeout { .. }
            | Self::HttpStatus { .. }
            | Self::Session { .. } => ErrorClass::NavigationFailure,
            Self::NoCandidates { .. } => ErrorClass::ParseFailure,
            Self::InvalidSelector { .. } | Self::Configuration { .. } => {
                ErrorClass::ConfigurationError
            }
        }
    }

    /// Whether the scrape can carry on with the next candidate
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        !matches!(self.class(), ErrorClass::ConfigurationError)
    }
}

pub type ScrapeResult<T> = Result<T, ScrapeError>;
