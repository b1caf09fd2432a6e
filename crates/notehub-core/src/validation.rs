//! Local field validation for the create-note form.
//!
//! Validation runs entirely client-side; a draft that fails here is never
//! sent to the notes service.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::defaults::{CONTENT_MAX_CHARS, TITLE_MAX_CHARS, TITLE_MIN_CHARS};
use crate::models::{NewNote, NoteTag};

pub const MSG_TITLE_REQUIRED: &str = "Enter the note title";
pub const MSG_TOO_SHORT: &str = "Too Short!";
pub const MSG_TOO_LONG: &str = "Too Long!";
pub const MSG_INVALID_TAG: &str = "Invalid tag";

/// Form fields that can carry a validation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteField {
    Title,
    Content,
    Tag,
}

impl fmt::Display for NoteField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoteField::Title => write!(f, "title"),
            NoteField::Content => write!(f, "content"),
            NoteField::Tag => write!(f, "tag"),
        }
    }
}

/// A single field-scoped validation message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: NoteField,
    pub message: String,
}

/// All validation messages for one draft, at most one per field.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    /// Record a message; the first message for a field wins.
    pub fn push(&mut self, field: NoteField, message: impl Into<String>) {
        if self.get(field).is_none() {
            self.0.push(FieldError {
                field,
                message: message.into(),
            });
        }
    }

    pub fn get(&self, field: NoteField) -> Option<&str> {
        self.0
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", err.field, err.message)?;
        }
        Ok(())
    }
}

/// Editable form values. `tag` holds the raw select value so that an
/// unknown tag can be reported as a field error instead of a parse failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
    pub tag: String,
}

impl Default for NoteDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            content: String::new(),
            tag: NoteTag::default().to_string(),
        }
    }
}

impl NoteDraft {
    pub fn new(title: impl Into<String>, content: impl Into<String>, tag: NoteTag) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            tag: tag.to_string(),
        }
    }
}

/// Validate a draft, producing the create payload or every field message.
///
/// Lengths are counted in characters, not bytes.
pub fn validate_draft(draft: &NoteDraft) -> Result<NewNote, FieldErrors> {
    let mut errors = FieldErrors::default();

    let title_len = draft.title.chars().count();
    if title_len == 0 {
        errors.push(NoteField::Title, MSG_TITLE_REQUIRED);
    } else if title_len < TITLE_MIN_CHARS {
        errors.push(NoteField::Title, MSG_TOO_SHORT);
    } else if title_len > TITLE_MAX_CHARS {
        errors.push(NoteField::Title, MSG_TOO_LONG);
    }

    if draft.content.chars().count() > CONTENT_MAX_CHARS {
        errors.push(NoteField::Content, MSG_TOO_LONG);
    }

    let tag = match draft.tag.parse::<NoteTag>() {
        Ok(tag) => Some(tag),
        Err(_) => {
            errors.push(NoteField::Tag, MSG_INVALID_TAG);
            None
        }
    };

    match tag {
        Some(tag) if errors.is_empty() => Ok(NewNote {
            title: draft.title.clone(),
            content: draft.content.clone(),
            tag,
        }),
        _ => Err(errors),
    }
}
