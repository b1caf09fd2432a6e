//! # notehub-query
//!
//! Client-side query layer for notehub.
//!
//! This crate provides:
//! - Query keys and a shared, namespace-versioned query cache
//! - Dehydrate/hydrate of cached results across a prefetch boundary
//! - A single-slot debouncer for typed search text
//! - The list query-state coordinator with stale-while-revalidate
//! - The validated create-note form
//!
//! Everything talks to the remote service through the
//! [`notehub_core::NotesService`] trait.

pub mod cache;
pub mod coordinator;
pub mod debounce;
pub mod form;
pub mod key;
pub mod prefetch;
pub mod query_client;

#[cfg(test)]
pub(crate) mod mock;

pub use cache::{
    CacheEvent, CacheStats, CachedQuery, DehydratedQuery, DehydratedState, EntryStatus,
    FetchTicket, QueryCache,
};
pub use coordinator::{
    CoordinatorEvent, CoordinatorOptions, ListView, QueryCoordinator, QueryState,
};
pub use debounce::Debouncer;
pub use form::{CreateNoteForm, FormPhase, SubmitOutcome};
pub use key::{ListKey, QueryData, QueryKey};
pub use prefetch::{prefetch_note_detail, prefetch_notes_page, NoteDetailPrefetch, NotesPagePrefetch};
pub use query_client::QueryClient;
