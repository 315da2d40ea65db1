//! Free-form notes kept next to the task list.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Shown in listings for a note without a title.
pub const UNTITLED: &str = "Untitled Note";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    /// Last write; listings are newest first
    pub updated_at: DateTime<Utc>,
}

impl Note {
    /// A note needs a title or some content.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.title.trim().is_empty() && self.content.trim().is_empty() {
            return Err(ValidationError::EmptyField("note"));
        }
        Ok(())
    }

    pub fn display_title(&self) -> &str {
        if self.title.trim().is_empty() {
            UNTITLED
        } else {
            &self.title
        }
    }

    /// Case-insensitive match on title or content.
    pub fn matches(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.title.to_lowercase().contains(&needle) || self.content.to_lowercase().contains(&needle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn note(title: &str, content: &str) -> Note {
        Note {
            id: "n-1".into(),
            title: title.into(),
            content: content.into(),
            updated_at: Utc.with_ymd_and_hms(2024, 1, 10, 9, 0, 0).unwrap(),
        }
    }

    #[test]
    fn blank_note_is_rejected() {
        assert_eq!(note(" ", "\n").validate(), Err(ValidationError::EmptyField("note")));
        assert!(note("", "milk, eggs").validate().is_ok());
        assert!(note("Groceries", "").validate().is_ok());
    }

    #[test]
    fn untitled_notes_get_a_placeholder() {
        assert_eq!(note("", "body").display_title(), UNTITLED);
        assert_eq!(note("Ideas", "").display_title(), "Ideas");
    }

    #[test]
    fn matches_title_or_content() {
        let n = note("Groceries", "Oat milk");
        assert!(n.matches("GROC"));
        assert!(n.matches("milk"));
        assert!(!n.matches("bread"));
        assert!(n.matches(""));
    }

    #[test]
    fn serializes_with_camel_case_keys() {
        let json = serde_json::to_value(note("Ideas", "x")).unwrap();
        assert!(json["updatedAt"].is_string());
    }
}
