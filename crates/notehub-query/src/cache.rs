//! In-memory query cache shared by every mounted view.
//!
//! Entries are stored under the serialized form of their [`QueryKey`].
//! Each namespace carries a version counter; invalidating a namespace bumps
//! the counter, which makes every entry recorded under an older version
//! stale without touching its data. Stale entries keep serving their last
//! good value until a refetch replaces it.
//!
//! Every fetch takes a [`FetchTicket`]. Only the ticket with the latest
//! sequence number for a key may settle it, so a slow response that was
//! overtaken by a newer request for the same key is discarded.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tracing::{debug, info, trace};

use notehub_core::defaults::CACHE_EVENT_CAPACITY;
use notehub_core::{Error, Result};

use crate::key::{QueryData, QueryKey};

/// Resolution status of a cache entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryStatus {
    /// No fetch has settled yet.
    Pending,
    /// Last settled fetch succeeded.
    Success,
    /// Last settled fetch failed; earlier data (if any) is kept.
    Error,
}

/// Receipt for a started fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    /// Per-key sequence number of this fetch.
    pub seq: u64,
    /// Namespace version when the fetch started.
    pub version: u64,
}

/// Read-only view of a cache entry.
#[derive(Debug, Clone)]
pub struct CachedQuery {
    pub status: EntryStatus,
    pub data: Option<QueryData>,
    pub error: Option<Error>,
    pub is_fetching: bool,
    /// Recorded under an older namespace version.
    pub is_stale: bool,
    pub fetch_seq: u64,
    pub updated_at: Option<DateTime<Utc>>,
}

impl CachedQuery {
    /// Successful and not invalidated.
    pub fn is_fresh(&self) -> bool {
        self.status == EntryStatus::Success && !self.is_stale
    }
}

/// Change notifications broadcast to every subscriber.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheEvent {
    /// A fetch settled (successfully or not) for this key.
    Updated { key: QueryKey },
    /// Every entry in the namespace became stale.
    Invalidated { namespace: String, version: u64 },
}

/// Cache statistics for diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub fetches: u64,
    pub discarded: u64,
}

/// Serializable snapshot of successful entries, handed from the prefetching
/// side to a fresh client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DehydratedState {
    pub queries: Vec<DehydratedQuery>,
}

impl DehydratedState {
    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queries.len()
    }
}

/// One dehydrated entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DehydratedQuery {
    pub key: QueryKey,
    pub data: QueryData,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug)]
struct CacheEntry {
    key: QueryKey,
    status: EntryStatus,
    data: Option<QueryData>,
    error: Option<Error>,
    version: u64,
    fetch_seq: u64,
    is_fetching: bool,
    updated_at: Option<DateTime<Utc>>,
}

impl CacheEntry {
    fn pending(key: QueryKey) -> Self {
        Self {
            key,
            status: EntryStatus::Pending,
            data: None,
            error: None,
            version: 0,
            fetch_seq: 0,
            is_fetching: false,
            updated_at: None,
        }
    }

    fn view(&self, namespace_version: u64) -> CachedQuery {
        CachedQuery {
            status: self.status,
            data: self.data.clone(),
            error: self.error.clone(),
            is_fetching: self.is_fetching,
            is_stale: self.version < namespace_version,
            fetch_seq: self.fetch_seq,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, Default)]
struct CacheState {
    entries: HashMap<String, CacheEntry>,
    versions: HashMap<&'static str, u64>,
    stats: CacheStats,
}

impl CacheState {
    fn version(&self, namespace: &str) -> u64 {
        self.versions.get(namespace).copied().unwrap_or(0)
    }
}

struct QueryCacheInner {
    state: RwLock<CacheState>,
    events: broadcast::Sender<CacheEvent>,
}

/// Shared query cache. Cloning is cheap; clones share state.
#[derive(Clone)]
pub struct QueryCache {
    inner: Arc<QueryCacheInner>,
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(CACHE_EVENT_CAPACITY);
        Self {
            inner: Arc::new(QueryCacheInner {
                state: RwLock::new(CacheState::default()),
                events,
            }),
        }
    }

    /// Subscribe to cache change notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<CacheEvent> {
        self.inner.events.subscribe()
    }

    /// Current version of a namespace.
    pub async fn namespace_version(&self, namespace: &str) -> u64 {
        self.inner.state.read().await.version(namespace)
    }

    /// Snapshot of the entry for `key`, if any.
    pub async fn get(&self, key: &QueryKey) -> Option<CachedQuery> {
        let state = self.inner.state.read().await;
        let version = state.version(key.namespace());
        state.entries.get(&key.hash_key()).map(|e| e.view(version))
    }

    /// Fresh data for `key`, counting the lookup as a hit or miss.
    pub async fn fresh_data(&self, key: &QueryKey) -> Option<QueryData> {
        let mut state = self.inner.state.write().await;
        let version = state.version(key.namespace());
        let fresh = state
            .entries
            .get(&key.hash_key())
            .filter(|e| e.status == EntryStatus::Success && e.version >= version)
            .and_then(|e| e.data.clone());

        if fresh.is_some() {
            state.stats.hits += 1;
            debug!(query_key = %key.hash_key(), "Cache HIT");
        } else {
            state.stats.misses += 1;
            debug!(query_key = %key.hash_key(), "Cache MISS");
        }
        fresh
    }

    /// Mark a fetch as started for `key` and return its ticket. Existing
    /// data is kept so it can be shown while the fetch is outstanding.
    pub async fn begin_fetch(&self, key: &QueryKey) -> FetchTicket {
        let mut state = self.inner.state.write().await;
        let version = state.version(key.namespace());
        state.stats.fetches += 1;

        let entry = state
            .entries
            .entry(key.hash_key())
            .or_insert_with(|| CacheEntry::pending(key.clone()));
        entry.fetch_seq += 1;
        entry.is_fetching = true;

        let ticket = FetchTicket {
            seq: entry.fetch_seq,
            version,
        };
        debug!(
            query_key = %key.hash_key(),
            fetch_seq = ticket.seq,
            version = ticket.version,
            "Fetch started"
        );
        ticket
    }

    /// Settle a fetch. Returns `false` (and changes nothing) when a newer
    /// fetch for the same key has been started since `ticket` was issued,
    /// or when the entry was removed.
    pub async fn complete(
        &self,
        key: &QueryKey,
        ticket: FetchTicket,
        result: Result<QueryData>,
    ) -> bool {
        let mut state = self.inner.state.write().await;

        let applied = match state.entries.get_mut(&key.hash_key()) {
            Some(entry) if entry.fetch_seq == ticket.seq => {
                entry.is_fetching = false;
                entry.version = ticket.version;
                match result {
                    Ok(data) => {
                        entry.status = EntryStatus::Success;
                        entry.data = Some(data);
                        entry.error = None;
                        entry.updated_at = Some(Utc::now());
                    }
                    Err(err) => {
                        entry.status = EntryStatus::Error;
                        entry.error = Some(err);
                    }
                }
                true
            }
            _ => false,
        };

        if applied {
            debug!(query_key = %key.hash_key(), fetch_seq = ticket.seq, "Fetch settled");
            drop(state);
            let _ = self
                .inner
                .events
                .send(CacheEvent::Updated { key: key.clone() });
        } else {
            state.stats.discarded += 1;
            debug!(
                query_key = %key.hash_key(),
                fetch_seq = ticket.seq,
                "Discarding superseded response"
            );
        }
        applied
    }

    /// Store data directly, as if a fetch had just succeeded.
    pub async fn set_data(&self, key: &QueryKey, data: QueryData) {
        let mut state = self.inner.state.write().await;
        let version = state.version(key.namespace());
        let entry = state
            .entries
            .entry(key.hash_key())
            .or_insert_with(|| CacheEntry::pending(key.clone()));
        entry.status = EntryStatus::Success;
        entry.data = Some(data);
        entry.error = None;
        entry.version = version;
        entry.updated_at = Some(Utc::now());
    }

    /// Make every entry in `namespace` stale. Returns the new version.
    pub async fn invalidate_namespace(&self, namespace: &'static str) -> u64 {
        let mut state = self.inner.state.write().await;
        let version = state.version(namespace) + 1;
        state.versions.insert(namespace, version);
        let affected = state
            .entries
            .values()
            .filter(|e| e.key.namespace() == namespace)
            .count();
        drop(state);

        info!(
            subsystem = "query",
            component = "cache",
            op = "invalidate",
            namespace,
            version,
            affected,
            "Cache namespace invalidated"
        );
        let _ = self.inner.events.send(CacheEvent::Invalidated {
            namespace: namespace.to_string(),
            version,
        });
        version
    }

    /// Drop the entry for `key`. In-flight fetches for it will be discarded.
    pub async fn remove(&self, key: &QueryKey) -> bool {
        self.inner
            .state
            .write()
            .await
            .entries
            .remove(&key.hash_key())
            .is_some()
    }

    /// Export every successful entry.
    pub async fn dehydrate(&self) -> DehydratedState {
        let state = self.inner.state.read().await;
        let mut queries: Vec<(String, DehydratedQuery)> = state
            .entries
            .iter()
            .filter(|(_, e)| e.status == EntryStatus::Success)
            .filter_map(|(hash, e)| {
                let data = e.data.clone()?;
                let updated_at = e.updated_at?;
                trace!(query_key = %hash, "Dehydrating entry");
                Some((
                    hash.clone(),
                    DehydratedQuery {
                        key: e.key.clone(),
                        data,
                        updated_at,
                    },
                ))
            })
            .collect();
        queries.sort_by(|a, b| a.0.cmp(&b.0));

        DehydratedState {
            queries: queries.into_iter().map(|(_, q)| q).collect(),
        }
    }

    /// Import a snapshot. Entries that are already newer locally are kept.
    /// Returns the number of entries written.
    pub async fn hydrate(&self, snapshot: &DehydratedState) -> usize {
        let mut state = self.inner.state.write().await;
        let mut written = 0;

        for query in &snapshot.queries {
            let version = state.version(query.key.namespace());
            let hash = query.key.hash_key();

            if let Some(existing) = state.entries.get(&hash) {
                if existing.updated_at.is_some_and(|t| t >= query.updated_at) {
                    trace!(query_key = %hash, "Keeping newer local entry");
                    continue;
                }
            }

            let entry = state
                .entries
                .entry(hash.clone())
                .or_insert_with(|| CacheEntry::pending(query.key.clone()));
            entry.status = EntryStatus::Success;
            entry.data = Some(query.data.clone());
            entry.error = None;
            entry.version = version;
            entry.updated_at = Some(query.updated_at);
            written += 1;
            trace!(query_key = %hash, "Hydrated entry");
        }

        debug!(
            subsystem = "query",
            component = "cache",
            op = "hydrate",
            written,
            offered = snapshot.queries.len(),
            "Cache hydrated"
        );
        written
    }

    /// Current statistics.
    pub async fn stats(&self) -> CacheStats {
        self.inner.state.read().await.stats.clone()
    }

    /// Number of entries.
    pub async fn len(&self) -> usize {
        self.inner.state.read().await.entries.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
