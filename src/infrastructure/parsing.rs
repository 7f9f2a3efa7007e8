//! HTML parsing for coaching-staff listings
//!
//! Classifier rules, the strategy seam with its four implementations, and
//! the engine that runs them in order.

pub mod card_strategy;
pub mod classifier;
pub mod config;
pub mod contact_anchor_strategy;
pub mod extraction_engine;
pub mod profile_link_strategy;
pub mod strategy;
pub mod table_strategy;

pub use classifier::{classify, ClassifiedStaff};
pub use config::ExtractionConfig;
pub use extraction_engine::{Extraction, ExtractionEngine};
pub use strategy::{ExtractionStrategy, RawCandidate};
