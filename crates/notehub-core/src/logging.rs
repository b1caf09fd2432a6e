//! Structured logging field name constants for notehub.
//!
//! All crates use these names for structured `tracing` fields so that log
//! output can be filtered consistently across the client, the query cache,
//! and the CLI.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Operation failed and nothing will retry it |
//! | WARN  | Recoverable issue (failed prefetch, slow request) |
//! | INFO  | Lifecycle events, mutations (create, delete, invalidate) |
//! | DEBUG | Cache decisions, key changes, debounce fires |
//! | TRACE | Per-entry iteration (hydration, snapshot export) |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Correlation ID attached to each outgoing request.
/// Format: UUIDv7 (time-ordered).
pub const REQUEST_ID: &str = "request_id";

/// Subsystem originating the log event.
/// Values: "client", "query", "cli"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
/// Examples: "http", "cache", "coordinator", "form", "prefetch"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "list_notes", "get_note", "invalidate", "hydrate"
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Note identifier being operated on.
pub const NOTE_ID: &str = "note_id";

/// Serialized cache key.
pub const QUERY_KEY: &str = "query_key";

/// Page number of a list query.
pub const PAGE: &str = "page";

/// Effective search text of a list query.
pub const SEARCH: &str = "search";

/// Tag filter of a list query.
pub const TAG: &str = "tag";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Number of notes returned.
pub const RESULT_COUNT: &str = "result_count";

/// Total page count reported by the service.
pub const TOTAL_PAGES: &str = "total_pages";

/// HTTP status code.
pub const STATUS: &str = "status";

// ─── Cache fields ──────────────────────────────────────────────────────────

/// Cache namespace ("notes").
pub const NAMESPACE: &str = "namespace";

/// Namespace version after invalidation.
pub const VERSION: &str = "version";

/// Per-key fetch sequence number.
pub const FETCH_SEQ: &str = "fetch_seq";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Boolean success/failure indicator.
pub const SUCCESS: &str = "success";

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";

/// Slow operation threshold exceeded.
pub const SLOW: &str = "slow";

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_field_names_are_unique_snake_case() {
        let fields = [
            REQUEST_ID, SUBSYSTEM, COMPONENT, OPERATION, NOTE_ID, QUERY_KEY, PAGE, SEARCH, TAG,
            DURATION_MS, RESULT_COUNT, TOTAL_PAGES, STATUS, NAMESPACE, VERSION, FETCH_SEQ, SUCCESS,
            ERROR_MSG, SLOW,
        ];
        let unique: HashSet<_> = fields.iter().collect();
        assert_eq!(unique.len(), fields.len());
        for field in fields {
            assert!(field
                .chars()
                .all(|c| c.is_ascii_lowercase() || c == '_'));
        }
    }
}
