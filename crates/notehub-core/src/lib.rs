//! # notehub-core
//!
//! Core types, traits, and validation rules for the notehub client.
//!
//! This crate provides the data structures shared by the HTTP client, the
//! query cache, and the terminal front end, along with the [`NotesService`]
//! trait that every notes backend implements.

pub mod defaults;
pub mod error;
pub mod logging;
pub mod models;
pub mod tags;
pub mod traits;
pub mod validation;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use models::*;
pub use tags::{format_tag, normalize_search, TagFilter};
pub use traits::NotesService;
pub use validation::{validate_draft, FieldError, FieldErrors, NoteDraft, NoteField};
