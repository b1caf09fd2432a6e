//! Prefetch boundary: warm a throwaway cache for a route and hand a
//! serializable snapshot to the client that will render it.

use std::sync::Arc;
use std::time::Instant;
use tracing::info;

use notehub_core::{NotesService, TagFilter};

use crate::cache::DehydratedState;
use crate::key::ListKey;
use crate::query_client::QueryClient;

/// Snapshot for the filtered list route.
#[derive(Debug, Clone)]
pub struct NotesPagePrefetch {
    /// Tag filter the list view must mount with.
    pub initial_tag: TagFilter,
    pub state: DehydratedState,
}

/// Snapshot for the note detail route.
#[derive(Debug, Clone)]
pub struct NoteDetailPrefetch {
    pub id: String,
    pub state: DehydratedState,
}

/// Prefetch page 1 (no search) for the tag taken from the route segments.
/// A failed prefetch yields an empty snapshot; the client fetches on mount.
pub async fn prefetch_notes_page<S: AsRef<str>>(
    service: Arc<dyn NotesService>,
    segments: &[S],
) -> NotesPagePrefetch {
    let start = Instant::now();
    let initial_tag = TagFilter::from_segments(segments);
    let client = QueryClient::new(service);

    client.prefetch_notes(&ListKey::initial(&initial_tag)).await;
    let state = client.dehydrate().await;

    info!(
        subsystem = "query",
        component = "prefetch",
        op = "notes_page",
        tag = ?initial_tag.as_deref(),
        entries = state.len(),
        duration_ms = start.elapsed().as_millis() as u64,
        "Notes page prefetched"
    );
    NotesPagePrefetch { initial_tag, state }
}

/// Prefetch a single note by id.
pub async fn prefetch_note_detail(service: Arc<dyn NotesService>, id: &str) -> NoteDetailPrefetch {
    let start = Instant::now();
    let client = QueryClient::new(service);

    client.prefetch_note(id).await;
    let state = client.dehydrate().await;

    info!(
        subsystem = "query",
        component = "prefetch",
        op = "note_detail",
        note_id = %id,
        entries = state.len(),
        duration_ms = start.elapsed().as_millis() as u64,
        "Note detail prefetched"
    );
    NoteDetailPrefetch {
        id: id.to_string(),
        state,
    }
}
