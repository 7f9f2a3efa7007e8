//! Domain module - scraped entities and input records
//!
//! Plain value types shared by every layer. Nothing here touches the
//! network or parses HTML.

pub mod coach;
pub mod program;
pub mod school;

pub use coach::{Coach, CoachError};
pub use program::Program;
pub use school::{Division, Gender, School, SPORT_NAME};
