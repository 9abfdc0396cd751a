//! Input validation for task forms.
//!
//! The core write path does not enforce these limits; presentation layers
//! call `TaskDraft::validate` before handing input to the coordinator.

use thiserror::Error;

pub const TITLE_MAX_CHARS: usize = 100;
pub const DESCRIPTION_MAX_CHARS: usize = 500;

/// User-entered title and description for a new or edited task.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskDraft {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DraftError {
    #[error("Title is required for your task")]
    TitleRequired,
    #[error("Title must be at most {max} characters, got {actual}")]
    TitleTooLong { max: usize, actual: usize },
    #[error("Description is required for your task")]
    DescriptionRequired,
    #[error("Description must be at most {max} characters, got {actual}")]
    DescriptionTooLong { max: usize, actual: usize },
}

impl TaskDraft {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }

    /// Checks both fields, reporting the title first.
    pub fn validate(&self) -> Result<(), DraftError> {
        validate_title(&self.title)?;
        validate_description(&self.description)
    }
}

pub fn validate_title(title: &str) -> Result<(), DraftError> {
    if title.trim().is_empty() {
        return Err(DraftError::TitleRequired);
    }
    let actual = title.chars().count();
    if actual > TITLE_MAX_CHARS {
        return Err(DraftError::TitleTooLong {
            max: TITLE_MAX_CHARS,
            actual,
        });
    }
    Ok(())
}

pub fn validate_description(description: &str) -> Result<(), DraftError> {
    if description.trim().is_empty() {
        return Err(DraftError::DescriptionRequired);
    }
    let actual = description.chars().count();
    if actual > DESCRIPTION_MAX_CHARS {
        return Err(DraftError::DescriptionTooLong {
            max: DESCRIPTION_MAX_CHARS,
            actual,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{DraftError, TaskDraft, DESCRIPTION_MAX_CHARS, TITLE_MAX_CHARS};

    #[test]
    fn accepts_fields_at_the_limit() {
        let draft = TaskDraft::new("t".repeat(TITLE_MAX_CHARS), "d".repeat(DESCRIPTION_MAX_CHARS));
        assert_eq!(draft.validate(), Ok(()));
    }

    #[test]
    fn rejects_blank_fields() {
        assert_eq!(
            TaskDraft::new("   ", "d").validate(),
            Err(DraftError::TitleRequired)
        );
        assert_eq!(
            TaskDraft::new("t", "\n").validate(),
            Err(DraftError::DescriptionRequired)
        );
    }

    #[test]
    fn counts_characters_not_bytes() {
        let title = "é".repeat(TITLE_MAX_CHARS);
        assert!(title.len() > TITLE_MAX_CHARS);
        assert_eq!(TaskDraft::new(title, "d").validate(), Ok(()));

        let too_long = TaskDraft::new("t", "x".repeat(DESCRIPTION_MAX_CHARS + 1));
        assert_eq!(
            too_long.validate(),
            Err(DraftError::DescriptionTooLong {
                max: DESCRIPTION_MAX_CHARS,
                actual: DESCRIPTION_MAX_CHARS + 1,
            })
        );
    }
}
