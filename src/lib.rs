//! Tennis Coach Scraper - coaching-staff discovery for collegiate athletics sites
//!
//! Given a school's athletics root URL and a team gender, finds the tennis
//! team page, locates its coaching-staff listing, and turns arbitrary
//! rendered HTML into structured `Program` records.

// Module declarations
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod test_utils;

pub use application::{run_batch, CoachScraper};
pub use domain::{Coach, Division, Gender, Program, School};
pub use infrastructure::{ScrapeError, ScrapeResult, ScraperConfig};
