//! Coach value object

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoachError {
    #[error("Coach name must not be empty")]
    EmptyName,
}

/// A single coaching-staff member.
///
/// Two coaches from the same extraction pass are the same person when their
/// names are equal; the other fields are best-effort.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coach {
    pub name: String,
    pub title: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl Coach {
    /// Creates a coach, rejecting blank names
    pub fn new(name: impl Into<String>) -> Result<Self, CoachError> {
        let name = name.into().trim().to_string();
        if name.is_empty() {
            return Err(CoachError::EmptyName);
        }
        Ok(Self {
            name,
            title: None,
            email: None,
            phone: None,
        })
    }

    #[must_use]
    pub fn with_title(mut self, title: Option<String>) -> Self {
        self.title = title;
        self
    }

    #[must_use]
    pub fn with_email(mut self, email: Option<String>) -> Self {
        self.email = email;
        self
    }

    #[must_use]
    pub fn with_phone(mut self, phone: Option<String>) -> Self {
        self.phone = phone;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_name_rejected() {
        assert_eq!(Coach::new("   "), Err(CoachError::EmptyName));
    }

    #[test]
    fn test_builder_fields() {
        let coach = Coach::new(" Jane Doe ")
            .unwrap()
            .with_title(Some("Head Coach".into()))
            .with_email(Some("jane@x.edu".into()));
        assert_eq!(coach.name, "Jane Doe");
        assert_eq!(coach.title.as_deref(), Some("Head Coach"));
        assert_eq!(coach.email.as_deref(), Some("jane@x.edu"));
        assert!(coach.phone.is_none());
    }
}
