//! # notehub-client
//!
//! HTTP implementation of [`notehub_core::NotesService`] for the remote notes
//! API.
//!
//! Every call carries a bearer token and is a single request/response round
//! trip: no retries, no local persistence.
//!
//! # Example
//!
//! ```rust,no_run
//! use notehub_client::NotehubClient;
//! use notehub_core::NotesService;
//!
//! #[tokio::main]
//! async fn main() {
//!     let client = NotehubClient::from_env().unwrap();
//!     let page = client.list_notes(1, "meeting", Some("work")).await.unwrap();
//!     println!("{} notes, {} pages", page.notes.len(), page.total_pages);
//! }
//! ```

mod client;
mod config;
mod error;
mod types;

pub use client::NotehubClient;
pub use config::ClientConfig;
pub use error::{to_notehub_error, ApiErrorCode};
pub use types::{ApiErrorBody, ListNotesParams};

// Re-export core types
pub use notehub_core::*;
