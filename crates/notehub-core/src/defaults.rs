//! Centralized default constants for notehub.
//!
//! **This module is the single source of truth** for shared default values.
//! Crates reference these constants instead of defining their own magic
//! numbers.

// =============================================================================
// NOTES SERVICE
// =============================================================================

/// Default base URL of the remote notes service.
pub const BASE_URL: &str = "https://notehub-public.goit.study/api";

/// Number of notes requested per list page.
pub const PER_PAGE: u32 = 12;

/// Request timeout in seconds.
pub const TIMEOUT_SECS: u64 = 30;

/// Requests slower than this are logged with `slow = true`.
pub const SLOW_REQUEST_MS: u64 = 2_000;

// =============================================================================
// ENVIRONMENT
// =============================================================================

/// Bearer token for the notes service.
pub const ENV_TOKEN: &str = "NOTEHUB_TOKEN";

/// Override for [`BASE_URL`].
pub const ENV_BASE_URL: &str = "NOTEHUB_BASE_URL";

/// Override for [`TIMEOUT_SECS`].
pub const ENV_TIMEOUT_SECS: &str = "NOTEHUB_TIMEOUT_SECS";

/// Override for [`PER_PAGE`].
pub const ENV_PER_PAGE: &str = "NOTEHUB_PER_PAGE";

/// Override for [`DEBOUNCE_MS`].
pub const ENV_DEBOUNCE_MS: &str = "NOTEHUB_DEBOUNCE_MS";

// =============================================================================
// QUERY STATE
// =============================================================================

/// Quiet period before typed search text becomes the effective search.
pub const DEBOUNCE_MS: u64 = 300;

/// First page of every list query.
pub const FIRST_PAGE: u32 = 1;

/// Cache namespace shared by list and detail queries.
pub const NOTES_NAMESPACE: &str = "notes";

/// Route slug that disables tag filtering.
pub const ALL_TAGS_SLUG: &str = "all";

/// Capacity of the cache event broadcast channel.
pub const CACHE_EVENT_CAPACITY: usize = 64;

// =============================================================================
// NOTE FIELDS
// =============================================================================

/// Minimum title length in characters.
pub const TITLE_MIN_CHARS: usize = 3;

/// Maximum title length in characters.
pub const TITLE_MAX_CHARS: usize = 50;

/// Maximum content length in characters.
pub const CONTENT_MAX_CHARS: usize = 500;
