//! Cache-aware front door to a [`NotesService`].

use std::sync::Arc;
use std::time::Instant;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use notehub_core::defaults::NOTES_NAMESPACE;
use notehub_core::{Error, NewNote, Note, NoteListPage, NotesService, Result};

use crate::cache::{CacheEvent, DehydratedState, EntryStatus, FetchTicket, QueryCache};
use crate::key::{ListKey, QueryData, QueryKey};

/// A notes service paired with the shared query cache.
///
/// Reads go through the cache; mutations go straight to the service and
/// invalidate the "notes" namespace when they succeed.
#[derive(Clone)]
pub struct QueryClient {
    service: Arc<dyn NotesService>,
    cache: QueryCache,
}

impl QueryClient {
    pub fn new(service: Arc<dyn NotesService>) -> Self {
        Self::with_cache(service, QueryCache::new())
    }

    /// Share an existing cache (several views over one cache).
    pub fn with_cache(service: Arc<dyn NotesService>, cache: QueryCache) -> Self {
        Self { service, cache }
    }

    pub fn service(&self) -> &Arc<dyn NotesService> {
        &self.service
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    /// Run the service call behind a query key.
    async fn run_query(service: &dyn NotesService, key: &QueryKey) -> Result<QueryData> {
        let start = Instant::now();
        let result = match key {
            QueryKey::NoteList(list) => service
                .list_notes(list.page, &list.search, list.tag.as_deref())
                .await
                .map(QueryData::NoteList),
            QueryKey::Note { id } => service.get_note(id).await.map(QueryData::Note),
        };
        debug!(
            subsystem = "query",
            component = "client",
            query_key = %key.hash_key(),
            success = result.is_ok(),
            duration_ms = start.elapsed().as_millis() as u64,
            "Query executed"
        );
        result
    }

    /// Cache-first fetch: fresh data is returned without a request, and a
    /// fetch already in flight for `key` is joined instead of repeated.
    ///
    /// The request runs in its own task, so dropping this future never
    /// leaves the entry marked as fetching.
    async fn fetch_query(&self, key: QueryKey) -> Result<QueryData> {
        if let Some(data) = self.cache.fresh_data(&key).await {
            return Ok(data);
        }

        let mut events = self.cache.subscribe();
        if self.cache.get(&key).await.is_some_and(|e| e.is_fetching) {
            debug!(query_key = %key.hash_key(), "Joining in-flight fetch");
            return self.await_settled(&key, &mut events).await;
        }

        let ticket = self.cache.begin_fetch(&key).await;
        self.spawn_run(key, ticket)
            .await
            .map_err(|e| Error::Internal(format!("Fetch task failed: {}", e)))?
    }

    /// Wait for the fetch in flight for `key` to settle and read its outcome
    /// from the cache.
    async fn await_settled(
        &self,
        key: &QueryKey,
        events: &mut broadcast::Receiver<CacheEvent>,
    ) -> Result<QueryData> {
        loop {
            match events.recv().await {
                Ok(CacheEvent::Updated { key: settled }) if &settled == key => {}
                Ok(_) => continue,
                Err(RecvError::Lagged(_)) => {}
                Err(RecvError::Closed) => {
                    return Err(Error::Internal("cache event channel closed".to_string()))
                }
            }

            let Some(entry) = self.cache.get(key).await else {
                return Err(Error::Internal(format!(
                    "entry {} removed while fetching",
                    key.hash_key()
                )));
            };
            if entry.is_fetching {
                continue;
            }
            return match (entry.status, entry.data, entry.error) {
                (EntryStatus::Error, _, Some(err)) => Err(err),
                (_, Some(data), _) => Ok(data),
                _ => Err(Error::Internal(format!(
                    "entry {} settled without data",
                    key.hash_key()
                ))),
            };
        }
    }

    /// Run the query for `key` in a task that settles `ticket` in the cache.
    fn spawn_run(&self, key: QueryKey, ticket: FetchTicket) -> JoinHandle<Result<QueryData>> {
        let service = Arc::clone(&self.service);
        let cache = self.cache.clone();

        tokio::spawn(async move {
            let result = Self::run_query(service.as_ref(), &key).await;
            cache.complete(&key, ticket, result.clone()).await;
            result
        })
    }

    /// Fetch a list page through the cache.
    pub async fn fetch_notes(&self, key: &ListKey) -> Result<NoteListPage> {
        let data = self.fetch_query(QueryKey::NoteList(key.clone())).await?;
        data.into_list()
            .ok_or_else(|| Error::Internal("list key resolved to non-list data".to_string()))
    }

    /// Fetch a single note through the cache.
    pub async fn fetch_note(&self, id: &str) -> Result<Note> {
        let data = self.fetch_query(QueryKey::note(id)).await?;
        data.into_note()
            .ok_or_else(|| Error::Internal("note key resolved to non-note data".to_string()))
    }

    /// Warm a list entry. Failures are logged, never returned.
    pub async fn prefetch_notes(&self, key: &ListKey) {
        if let Err(e) = self.fetch_notes(key).await {
            warn!(
                subsystem = "query",
                component = "prefetch",
                page = key.page,
                error = %e,
                "List prefetch failed"
            );
        }
    }

    /// Warm a detail entry. Failures are logged, never returned.
    pub async fn prefetch_note(&self, id: &str) {
        if let Err(e) = self.fetch_note(id).await {
            warn!(
                subsystem = "query",
                component = "prefetch",
                note_id = %id,
                error = %e,
                "Note prefetch failed"
            );
        }
    }

    /// Start a background fetch for `key`. Settling is announced through
    /// the cache's `Updated` event; superseded responses are dropped.
    pub(crate) async fn spawn_fetch(&self, key: QueryKey) -> FetchTicket {
        let ticket = self.cache.begin_fetch(&key).await;
        drop(self.spawn_run(key, ticket));
        ticket
    }

    /// Mark every cached note query stale.
    pub async fn invalidate_notes(&self) -> u64 {
        self.cache.invalidate_namespace(NOTES_NAMESPACE).await
    }

    /// Create a note and invalidate the "notes" namespace on success.
    pub async fn create_note(&self, note: &NewNote) -> Result<Note> {
        let created = self.service.create_note(note).await?;
        info!(
            subsystem = "query",
            component = "client",
            op = "create_note",
            note_id = %created.id,
            "Note created, invalidating cached notes"
        );
        self.invalidate_notes().await;
        Ok(created)
    }

    /// Delete a note and invalidate the "notes" namespace on success. A
    /// failed delete leaves the cache untouched.
    pub async fn delete_note(&self, id: &str) -> Result<Note> {
        let deleted = self.service.delete_note(id).await?;
        info!(
            subsystem = "query",
            component = "client",
            op = "delete_note",
            note_id = %deleted.id,
            "Note deleted, invalidating cached notes"
        );
        self.invalidate_notes().await;
        Ok(deleted)
    }

    pub async fn dehydrate(&self) -> DehydratedState {
        self.cache.dehydrate().await
    }

    pub async fn hydrate(&self, state: &DehydratedState) -> usize {
        self.cache.hydrate(state).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockNotesService;
    use std::time::Duration;
    use notehub_core::NoteTag;

    fn client_with(service: &Arc<MockNotesService>) -> QueryClient {
        QueryClient::new(service.clone())
    }

    #[tokio::test]
    async fn test_equal_keys_hit_cache() {
        let service = Arc::new(MockNotesService::with_notes(30));
        let client = client_with(&service);
        let key = ListKey::new(1, "", None);

        let first = client.fetch_notes(&key).await.unwrap();
        let second = client.fetch_notes(&ListKey::new(1, "", None)).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(service.list_count(), 1);
        assert_eq!(first.total_pages, 3);
    }

    #[tokio::test]
    async fn test_fetch_note_twice_is_one_request() {
        let service = Arc::new(MockNotesService::with_notes(3));
        let client = client_with(&service);

        let a = client.fetch_note("seed-1").await.unwrap();
        let b = client.fetch_note("seed-1").await.unwrap();
        assert_eq!(a, b);
        assert_eq!(service.get_count(), 1);
    }

    #[tokio::test]
    async fn test_missing_note_is_not_found() {
        let service = Arc::new(MockNotesService::new());
        let client = client_with(&service);
        let err = client.fetch_note("nope").await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[tokio::test]
    async fn test_create_invalidates_lists() {
        let service = Arc::new(MockNotesService::with_notes(2));
        let client = client_with(&service);
        let key = ListKey::new(1, "", None);

        client.fetch_notes(&key).await.unwrap();
        client
            .create_note(&NewNote {
                title: "Fresh".to_string(),
                content: String::new(),
                tag: NoteTag::Work,
            })
            .await
            .unwrap();

        let page = client.fetch_notes(&key).await.unwrap();
        assert_eq!(service.list_count(), 2, "invalidated entry refetches");
        assert_eq!(page.notes.len(), 3);
    }

    #[tokio::test]
    async fn test_failed_delete_leaves_cache_alone() {
        let service = Arc::new(MockNotesService::with_notes(2));
        let client = client_with(&service);
        let key = ListKey::new(1, "", None);
        let before = client.fetch_notes(&key).await.unwrap();

        client.delete_note("seed-0").await.unwrap();
        client.fetch_notes(&key).await.unwrap();
        let version = client.cache().namespace_version("notes").await;

        let err = client.delete_note("seed-0").await.unwrap_err();
        assert!(err.is_service_error());
        assert_eq!(client.cache().namespace_version("notes").await, version);

        let after = client.fetch_notes(&key).await.unwrap();
        assert_eq!(after.notes.len(), before.notes.len() - 1);
        assert_eq!(service.list_count(), 2);
    }

    #[tokio::test]
    async fn test_prefetch_swallows_errors() {
        let service = Arc::new(MockNotesService::new());
        service.fail_lists(true);
        let client = client_with(&service);

        client.prefetch_notes(&ListKey::new(1, "", None)).await;
        let entry = client
            .cache()
            .get(&QueryKey::from(ListKey::new(1, "", None)))
            .await
            .unwrap();
        assert!(entry.error.is_some());
    }

    #[tokio::test]
    async fn test_spawn_fetch_announces_update() {
        let service = Arc::new(MockNotesService::with_notes(5));
        let client = client_with(&service);
        let mut events = client.cache().subscribe();
        let key = QueryKey::from(ListKey::new(1, "", None));

        let ticket = client.spawn_fetch(key.clone()).await;
        assert_eq!(ticket.seq, 1);
        assert_eq!(
            events.recv().await.unwrap(),
            CacheEvent::Updated { key: key.clone() }
        );
        assert!(client.cache().get(&key).await.unwrap().is_fresh());
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_joins_in_flight_request() {
        let service = Arc::new(MockNotesService::with_notes(5));
        service.set_latency(Duration::from_millis(200));
        let client = client_with(&service);
        let key = ListKey::new(1, "", None);

        client.spawn_fetch(QueryKey::from(key.clone())).await;
        let page = client.fetch_notes(&key).await.unwrap();

        assert_eq!(page.notes.len(), 5);
        assert_eq!(service.list_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_joined_fetch_reports_error() {
        let service = Arc::new(MockNotesService::new());
        service.fail_lists(true);
        service.set_latency(Duration::from_millis(200));
        let client = client_with(&service);
        let key = ListKey::new(1, "", None);

        client.spawn_fetch(QueryKey::from(key.clone())).await;
        let err = client.fetch_notes(&key).await.unwrap_err();

        assert!(err.is_service_error());
        assert_eq!(service.list_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_fetch_still_settles_entry() {
        let service = Arc::new(MockNotesService::with_notes(5));
        service.set_latency(Duration::from_millis(500));
        let client = client_with(&service);
        let key = ListKey::new(1, "", None);

        let cut_short =
            tokio::time::timeout(Duration::from_millis(100), client.fetch_notes(&key)).await;
        assert!(cut_short.is_err());

        tokio::time::sleep(Duration::from_millis(500)).await;
        let entry = client.cache().get(&QueryKey::from(key)).await.unwrap();
        assert!(!entry.is_fetching);
        assert!(entry.is_fresh());
    }
}
