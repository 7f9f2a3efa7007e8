//! Application layer - discovery pipelines and the scraping service
//!
//! Orchestrates infrastructure (fetching, parsing) into per-program scrapes:
//! URL resolution, the default and site-specific pipelines, and final
//! record assembly.

pub mod coach_scraper;
pub mod pipeline;
pub mod program_assembler;
pub mod site_overrides;
pub mod staff_directory;
pub mod tabbed_roster;
pub mod url_resolver;

pub use coach_scraper::{run_batch, Clock, CoachScraper};
pub use pipeline::{DefaultPipeline, PipelineContext, ScrapeOutcome, ScrapePipeline};
pub use program_assembler::ProgramAssembler;
pub use site_overrides::SiteOverrideRegistry;
pub use staff_directory::StaffDirectoryPipeline;
pub use tabbed_roster::TabbedRosterPipeline;
pub use url_resolver::UrlResolver;
