//! Core traits for notehub abstractions.
//!
//! [`NotesService`] is the seam between the query layer and whatever talks
//! to the remote notes API, so the cache and coordinator can be exercised
//! against an in-memory backend.

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{NewNote, Note, NoteListPage};

/// The four operations of the remote notes service.
///
/// Every call is a single request/response round trip; implementations do
/// not retry and keep no local state.
#[async_trait]
pub trait NotesService: Send + Sync {
    /// Fetch one page of notes. `search` is forwarded only when non-blank
    /// (trimmed); `tag` only when non-blank, title-cased.
    async fn list_notes(&self, page: u32, search: &str, tag: Option<&str>)
        -> Result<NoteListPage>;

    /// Fetch a single note. Missing ids fail with `Error::NotFound`.
    async fn get_note(&self, id: &str) -> Result<Note>;

    /// Create a note; the service assigns id and timestamps.
    async fn create_note(&self, note: &NewNote) -> Result<Note>;

    /// Delete a note, returning its last representation.
    async fn delete_note(&self, id: &str) -> Result<Note>;
}
