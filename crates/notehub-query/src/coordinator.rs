//! Query-state coordinator for the notes list.
//!
//! Owns the `(page, effective search, tag)` triple for one mounted list view
//! and turns interaction into the fetches that view needs:
//!
//! - typed search text is debounced; when it becomes effective the page
//!   resets to the first one
//! - page changes apply immediately and are not clamped
//! - [`QueryCoordinator::resolve`] answers from the shared cache, starting a
//!   background fetch only when the current key has no fresh entry
//!
//! While a new key is in flight the previously shown page is returned as a
//! placeholder. Responses for keys that are no longer current never replace
//! what is shown. A failed key is not retried until the key changes or the
//! cache is invalidated.

use std::time::Duration;
use tokio::sync::broadcast::{self, error::RecvError};
use tracing::{debug, info, warn};

use notehub_core::defaults::{DEBOUNCE_MS, ENV_DEBOUNCE_MS, FIRST_PAGE, NOTES_NAMESPACE};
use notehub_core::{Error, NoteListPage, TagFilter};

use crate::cache::CacheEvent;
use crate::debounce::Debouncer;
use crate::key::{ListKey, QueryData, QueryKey};
use crate::query_client::QueryClient;

/// Tunables for a mounted coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoordinatorOptions {
    pub debounce: Duration,
}

impl Default for CoordinatorOptions {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(DEBOUNCE_MS),
        }
    }
}

impl CoordinatorOptions {
    /// Read `NOTEHUB_DEBOUNCE_MS`, falling back to the default quiet period.
    pub fn from_env() -> Self {
        let debounce_ms = std::env::var(ENV_DEBOUNCE_MS)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEBOUNCE_MS);
        Self {
            debounce: Duration::from_millis(debounce_ms),
        }
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }
}

/// Input state of one list view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryState {
    pub page: u32,
    /// What the user typed, shown immediately.
    pub search_text: String,
    /// Debounced search text that takes part in the key.
    pub effective_search: String,
    pub tag: TagFilter,
}

impl QueryState {
    fn initial(tag: TagFilter) -> Self {
        Self {
            page: FIRST_PAGE,
            search_text: String::new(),
            effective_search: String::new(),
            tag,
        }
    }
}

/// What the list view should display for the current key.
#[derive(Debug, Clone)]
pub enum ListView {
    /// Nothing has been shown yet and the current key is in flight.
    Loading,
    /// Fresh data for the current key.
    Ready(NoteListPage),
    /// Stale data for the current key while it is refetched.
    Revalidating(NoteListPage),
    /// The previously shown page, kept while a different key loads.
    Placeholder(NoteListPage),
    /// The last fetch for the current key failed. `previous` is the page
    /// still shown next to the error notice, if there is one.
    Failed {
        error: Error,
        previous: Option<NoteListPage>,
    },
}

impl ListView {
    pub fn data(&self) -> Option<&NoteListPage> {
        match self {
            ListView::Ready(page) | ListView::Revalidating(page) | ListView::Placeholder(page) => {
                Some(page)
            }
            ListView::Failed { previous, .. } => previous.as_ref(),
            ListView::Loading => None,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, ListView::Placeholder(_))
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ListView::Loading)
    }

    /// No fetch for the current key is outstanding.
    pub fn is_settled(&self) -> bool {
        matches!(self, ListView::Ready(_) | ListView::Failed { .. })
    }

    pub fn total_pages(&self) -> u32 {
        self.data().map(|p| p.total_pages).unwrap_or(0)
    }
}

/// Something the owner of a coordinator should react to, usually by calling
/// [`QueryCoordinator::resolve`] again.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoordinatorEvent {
    /// The debounce fired and the search text became effective.
    SearchApplied { search: String },
    /// A list fetch settled in the cache. `current` is false for keys this
    /// view has moved away from.
    Settled { key: ListKey, current: bool },
    /// Cached notes were invalidated (or change notifications were missed).
    Invalidated { version: u64 },
}

/// Debounced search/filter/pagination state over a shared [`QueryClient`].
pub struct QueryCoordinator {
    client: QueryClient,
    state: QueryState,
    debouncer: Debouncer<String>,
    last_shown: Option<(ListKey, NoteListPage)>,
    requested: Option<ListKey>,
    cache_events: broadcast::Receiver<CacheEvent>,
    events_open: bool,
}

impl QueryCoordinator {
    /// Mount a coordinator for a tag route. Page starts at 1 with no search;
    /// nothing is fetched until the first [`resolve`](Self::resolve).
    pub fn mount(client: QueryClient, tag: TagFilter, options: CoordinatorOptions) -> Self {
        let cache_events = client.cache().subscribe();
        debug!(
            subsystem = "query",
            component = "coordinator",
            tag = ?tag.as_deref(),
            debounce_ms = options.debounce.as_millis() as u64,
            "Coordinator mounted"
        );
        Self {
            client,
            state: QueryState::initial(tag),
            debouncer: Debouncer::new(options.debounce),
            last_shown: None,
            requested: None,
            cache_events,
            events_open: true,
        }
    }

    pub fn state(&self) -> &QueryState {
        &self.state
    }

    pub fn client(&self) -> &QueryClient {
        &self.client
    }

    /// Whether typed text is still waiting out the quiet period.
    pub fn search_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Store typed text and (re)arm the debounce.
    pub fn on_search_input(&mut self, raw: impl Into<String>) {
        let raw = raw.into();
        self.state.search_text = raw.clone();
        self.debouncer.arm(raw);
    }

    /// Jump to page `page`. Range checking is up to the caller.
    pub fn on_page_change(&mut self, page: u32) {
        self.state.page = page;
    }

    /// Apply pending search text now instead of waiting for the debounce.
    /// Returns false when nothing was pending.
    pub fn flush_search(&mut self) -> bool {
        match self.debouncer.cancel() {
            Some(search) => {
                self.apply_search(search);
                true
            }
            None => false,
        }
    }

    fn apply_search(&mut self, search: String) {
        debug!(
            subsystem = "query",
            component = "coordinator",
            search = %search,
            "Search applied"
        );
        self.state.effective_search = search;
        self.state.page = FIRST_PAGE;
    }

    /// The key for the current state.
    pub fn current_key(&self) -> ListKey {
        ListKey::new(
            self.state.page,
            self.state.effective_search.clone(),
            self.state.tag.as_deref().map(str::to_string),
        )
    }

    /// The page most recently returned as fresh data.
    pub fn last_shown(&self) -> Option<&NoteListPage> {
        self.last_shown.as_ref().map(|(_, page)| page)
    }

    /// Answer for the current key, starting a fetch if it is needed.
    pub async fn resolve(&mut self) -> ListView {
        let key = self.current_key();
        let query_key = QueryKey::from(key.clone());
        let cache = self.client.cache();

        if let Some(page) = cache.fresh_data(&query_key).await.and_then(QueryData::into_list) {
            self.last_shown = Some((key, page.clone()));
            return ListView::Ready(page);
        }

        let entry = cache.get(&query_key).await;
        let own_data = entry
            .as_ref()
            .and_then(|e| e.data.as_ref())
            .and_then(QueryData::as_list)
            .cloned();

        match entry {
            Some(e) if e.is_fetching => return self.pending_view(own_data),
            Some(e) if !e.is_stale && self.requested.as_ref() == Some(&key) => {
                if let Some(error) = e.error {
                    let previous = own_data
                        .or_else(|| self.last_shown.as_ref().map(|(_, page)| page.clone()));
                    return ListView::Failed { error, previous };
                }
            }
            _ => {}
        }

        info!(
            subsystem = "query",
            component = "coordinator",
            op = "fetch",
            page = key.page,
            search = %key.search,
            tag = ?key.tag,
            "Fetching notes page"
        );
        self.client.spawn_fetch(query_key).await;
        self.requested = Some(key);
        self.pending_view(own_data)
    }

    fn pending_view(&self, own_data: Option<NoteListPage>) -> ListView {
        match (own_data, &self.last_shown) {
            (Some(page), _) => ListView::Revalidating(page),
            (None, Some((_, shown))) => ListView::Placeholder(shown.clone()),
            (None, None) => ListView::Loading,
        }
    }

    /// Wait for the next debounce fire, fetch settle, or invalidation.
    pub async fn next_event(&mut self) -> CoordinatorEvent {
        loop {
            tokio::select! {
                search = self.debouncer.fired() => {
                    self.apply_search(search);
                    return CoordinatorEvent::SearchApplied {
                        search: self.state.effective_search.clone(),
                    };
                }
                event = self.cache_events.recv(), if self.events_open => match event {
                    Ok(CacheEvent::Updated { key: QueryKey::NoteList(key) }) => {
                        let current = key == self.current_key();
                        return CoordinatorEvent::Settled { key, current };
                    }
                    Ok(CacheEvent::Updated { .. }) => continue,
                    Ok(CacheEvent::Invalidated { version, .. }) => {
                        return CoordinatorEvent::Invalidated { version };
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(
                            subsystem = "query",
                            component = "coordinator",
                            skipped,
                            "Missed cache events, resynchronizing"
                        );
                        let version = self.client.cache().namespace_version(NOTES_NAMESPACE).await;
                        return CoordinatorEvent::Invalidated { version };
                    }
                    Err(RecvError::Closed) => self.events_open = false,
                },
            }
        }
    }

    /// Resolve, then keep waiting on events until the current key has data
    /// or an error.
    pub async fn settle(&mut self) -> ListView {
        loop {
            let view = self.resolve().await;
            if view.is_settled() {
                return view;
            }
            self.next_event().await;
        }
    }

    /// Tear down: the pending debounce is dropped and later responses no
    /// longer reach this view. Returns the search text that never applied.
    pub fn unmount(mut self) -> Option<String> {
        let dropped = self.debouncer.cancel();
        debug!(
            subsystem = "query",
            component = "coordinator",
            dropped_search = ?dropped,
            "Coordinator unmounted"
        );
        dropped
    }
}
